use std::fmt;

use fixedbitset::FixedBitSet;

use crate::component::ComponentId;

/// A growable set of component bits.
///
/// Used both as an entity's presence/enabled masks and as a system's
/// required mask. Masks of different lengths compare as if the shorter one
/// were padded with zeroes.
#[derive(Default, Clone)]
pub struct ComponentMask {
    bits: FixedBitSet,
}

impl ComponentMask {
    /// Creates a new empty mask.
    pub const fn new() -> Self {
        Self { bits: FixedBitSet::new() }
    }

    /// Creates an empty mask with room for `bits` bits.
    pub fn with_capacity(bits: usize) -> Self {
        Self { bits: FixedBitSet::with_capacity(bits) }
    }

    /// Returns the amount of set bits.
    pub fn len(&self) -> usize {
        self.bits.count_ones(..)
    }

    /// Returns `true` if no bit is set.
    pub fn is_empty(&self) -> bool {
        self.bits.is_clear()
    }

    /// Returns the amount of bits the mask can hold without growing.
    pub fn capacity(&self) -> usize {
        self.bits.len()
    }

    /// Returns `true` if the bit for the component is set.
    pub fn contains(&self, component: ComponentId) -> bool {
        self.bits.contains(component.index())
    }

    /// Sets the bit for the component, growing if necessary.
    ///
    /// Returns `true` if the bit wasn't set before.
    pub fn insert(&mut self, component: ComponentId) -> bool {
        let index = component.index();

        if index >= self.bits.len() {
            self.bits.grow(index + 1);
        }

        !self.bits.put(index)
    }

    /// Clears the bit for the component.
    ///
    /// Returns `true` if the bit was set before.
    pub fn remove(&mut self, component: ComponentId) -> bool {
        let index = component.index();
        let was_set = self.bits.contains(index);

        if was_set {
            self.bits.set(index, false);
        }

        was_set
    }

    /// Sets or clears the bit for the component.
    pub fn set(&mut self, component: ComponentId, value: bool) {
        if value {
            self.insert(component);
        } else {
            self.remove(component);
        }
    }

    /// Grows the mask to hold at least `bits` bits.
    pub fn grow(&mut self, bits: usize) {
        self.bits.grow(bits);
    }

    /// Returns `true` if every bit of `self` is also set in `other`.
    pub fn is_subset(&self, other: &ComponentMask) -> bool {
        self.bits.is_subset(&other.bits)
    }

    /// Returns `true` if every bit of `other` is also set in `self`.
    pub fn is_superset(&self, other: &ComponentMask) -> bool {
        other.is_subset(self)
    }

    /// Returns an iterator over the set bits in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = ComponentId> + '_ {
        self.bits.ones().map(ComponentId::new)
    }

    /// Clears every bit, keeping the capacity.
    pub fn clear(&mut self) {
        self.bits.clear();
    }
}

impl PartialEq for ComponentMask {
    fn eq(&self, other: &Self) -> bool {
        self.is_subset(other) && other.is_subset(self)
    }
}

impl Eq for ComponentMask {}

impl FromIterator<ComponentId> for ComponentMask {
    fn from_iter<I: IntoIterator<Item = ComponentId>>(iter: I) -> Self {
        let mut mask = Self::new();

        for component in iter {
            mask.insert(component);
        }

        mask
    }
}

impl fmt::Debug for ComponentMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.bits.ones()).finish()
    }
}
