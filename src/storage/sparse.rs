use std::fmt;
use std::marker::PhantomData;
use std::slice;

/// Trait for types that can provide a `usize` index for a sparse type.
pub trait SparseIndex {
    /// The index into a sparse datatype that this value represents.
    fn sparse_index(&self) -> usize;
}

impl SparseIndex for usize {
    fn sparse_index(&self) -> usize {
        *self
    }
}

/// A list of sparse values accessed by a sparse index.
///
/// Doesn't store indices.
#[derive(Clone)]
pub struct SparseMap<K: SparseIndex, V> {
    inner: Vec<Option<V>>,
    /// The amount of filled slots.
    len: usize,
    _key: PhantomData<fn(&K)>,
}

/// Iterator over values in a [`SparseMap`].
pub struct SparseIter<'a, T> {
    inner: slice::Iter<'a, Option<T>>,
    /// The amount of filled slots left.
    len: usize,
}

impl<K: SparseIndex, V> SparseMap<K, V> {
    /// Creates a new empty sparse map.
    pub const fn new() -> Self {
        let inner = Vec::new();
        let len = 0;

        Self { inner, len, _key: PhantomData }
    }

    /// Returns the amount of values in the sparse map.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns an iterator over the values in this map.
    pub fn iter(&self) -> SparseIter<'_, V> {
        SparseIter { inner: self.inner.iter(), len: self.len }
    }

    /// Returns a reference to the value assosciated with the index.
    pub fn get(&self, index: &K) -> Option<&V> {
        self.inner.get(index.sparse_index()).and_then(Option::as_ref)
    }

    /// Inserts a value at an index.
    ///
    /// Returns the previous value if it exists.
    pub fn insert(&mut self, index: K, value: V) -> Option<V> {
        let sparse = index.sparse_index();

        if sparse >= self.inner.len() {
            self.inner.resize_with(sparse + 1, || None);
        }

        let result = self.inner[sparse].replace(value);

        if result.is_none() {
            self.len += 1;
        }

        result
    }

    /// Removes the value at the index.
    pub fn remove(&mut self, index: &K) -> Option<V> {
        self.inner
            .get_mut(index.sparse_index())
            .and_then(Option::take)
            .inspect(|_| self.len -= 1)
    }

    /// Drops every slot at or past `slots`, releasing the excess memory.
    pub fn truncate(&mut self, slots: usize) {
        if slots >= self.inner.len() {
            return;
        }

        let dropped =
            self.inner[slots..].iter().filter(|v| v.is_some()).count();

        self.inner.truncate(slots);
        self.inner.shrink_to_fit();
        self.len -= dropped;
    }

    /// Removes all values from the map.
    pub fn clear(&mut self) {
        self.inner.clear();
        self.len = 0;
    }
}

impl<K: SparseIndex, V: fmt::Debug> fmt::Debug for SparseMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<K: SparseIndex, V> Default for SparseMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, K: SparseIndex, V> IntoIterator for &'a SparseMap<K, V> {
    type IntoIter = SparseIter<'a, V>;
    type Item = &'a V;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> Iterator for SparseIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        for slot in self.inner.by_ref() {
            if let Some(value) = slot {
                self.len -= 1;

                return Some(value);
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<T> ExactSizeIterator for SparseIter<'_, T> {}
