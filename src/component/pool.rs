use std::any::{type_name, Any};
use std::fmt;

/// An opaque index into a [`Pool`].
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotIndex(u32);

/// Index-stable, reference-counted storage for values of one type.
///
/// A slot with a count of zero is on the free list and holds
/// `T::default()`. Released slots are reused last-in first-out.
#[derive(Clone)]
pub struct Pool<T> {
    slots: Vec<Slot<T>>,
    free: Vec<SlotIndex>,
    /// The amount of live slots.
    len: usize,
}

#[derive(Clone)]
struct Slot<T> {
    value: T,
    refs: u32,
}

/// Object-safe interface over a [`Pool`] of any type.
///
/// Allows pools to be registered by key without a static type, see
/// [`World::try_add_component_pool`](crate::world::World::try_add_component_pool).
pub trait ErasedPool: Any {
    /// Returns the type name of the stored values.
    fn type_name(&self) -> &'static str;

    /// Returns the amount of live slots.
    fn len(&self) -> usize;

    /// Returns `true` if no slot is live.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the amount of allocated slots, live or free.
    fn capacity(&self) -> usize;

    /// Allocates a slot holding the default value.
    fn create(&mut self) -> SlotIndex;

    /// Adds a reference to a live slot.
    fn reference(&mut self, slot: SlotIndex);

    /// Releases a reference, returning `true` if the slot was freed.
    fn delete(&mut self, slot: SlotIndex) -> bool;

    /// Allocates a slot holding a copy of another slot's value.
    fn clone_slot(&mut self, slot: SlotIndex) -> SlotIndex;

    /// Returns the reference count of a slot.
    fn references(&self, slot: SlotIndex) -> u32;

    fn get_dyn(&self, slot: SlotIndex) -> &dyn Any;

    fn get_dyn_mut(&mut self, slot: SlotIndex) -> &mut dyn Any;

    /// Drops every slot.
    fn clear(&mut self);

    /// Drops trailing free slots.
    fn trim(&mut self);

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl SlotIndex {
    pub(crate) const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the position of this slot in its pool.
    pub const fn index(self) -> usize {
        self.0 as _
    }
}

impl<T: Default + Clone + 'static> Pool<T> {
    /// Creates a new empty pool.
    pub const fn new() -> Self {
        let slots = Vec::new();
        let free = Vec::new();
        let len = 0;

        Self { slots, free, len }
    }

    /// Returns the type name of the stored values.
    pub fn type_name(&self) -> &'static str {
        type_name::<T>()
    }

    /// Returns the amount of live slots.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no slot is live.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the amount of allocated slots, live or free.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Allocates a slot holding `T::default()` with a reference count of 1.
    pub fn create(&mut self) -> SlotIndex {
        self.len += 1;

        if let Some(index) = self.free.pop() {
            self.slots[index.index()].refs = 1;

            index
        } else {
            let index = u32::try_from(self.slots.len()).expect("slot overflow");

            self.slots.push(Slot { value: T::default(), refs: 1 });

            SlotIndex::new(index)
        }
    }

    /// Adds a reference to a live slot.
    ///
    /// # Panics
    ///
    /// Panics if the slot isn't live.
    #[track_caller]
    pub fn reference(&mut self, slot: SlotIndex) {
        self.live_mut(slot).refs += 1;
    }

    /// Releases a reference to a live slot.
    ///
    /// When the last reference is released the value is reset and the slot is
    /// pushed onto the free list, in which case `true` is returned.
    ///
    /// # Panics
    ///
    /// Panics if the slot isn't live.
    #[track_caller]
    pub fn delete(&mut self, slot: SlotIndex) -> bool {
        let entry = self.live_mut(slot);

        entry.refs -= 1;

        if entry.refs > 0 {
            return false;
        }

        entry.value = T::default();

        self.free.push(slot);
        self.len -= 1;

        true
    }

    /// Allocates a new slot holding a copy of the value at `slot`.
    ///
    /// The two slots are independent afterwards.
    #[track_caller]
    pub fn clone_slot(&mut self, slot: SlotIndex) -> SlotIndex {
        let value = self.live(slot).value.clone();
        let index = self.create();

        self.slots[index.index()].value = value;

        index
    }

    /// Returns the reference count of a slot, `0` if it isn't live.
    pub fn references(&self, slot: SlotIndex) -> u32 {
        self.slots.get(slot.index()).map_or(0, |slot| slot.refs)
    }

    /// Borrows the value at a slot.
    #[track_caller]
    pub fn get(&self, slot: SlotIndex) -> &T {
        let entry = &self.slots[slot.index()];

        debug_assert!(entry.refs > 0, "access to a released slot {slot:?}");

        &entry.value
    }

    /// Mutably borrows the value at a slot.
    #[track_caller]
    pub fn get_mut(&mut self, slot: SlotIndex) -> &mut T {
        let entry = &mut self.slots[slot.index()];

        debug_assert!(entry.refs > 0, "access to a released slot {slot:?}");

        &mut entry.value
    }

    /// Returns an iterator over every live value in storage order.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.slots.iter().filter(|slot| slot.refs > 0).map(|slot| &slot.value)
    }

    /// Returns a mutable iterator over every live value in storage order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        self.slots
            .iter_mut()
            .filter(|slot| slot.refs > 0)
            .map(|slot| &mut slot.value)
    }

    /// Drops every slot.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.len = 0;
    }

    /// Drops trailing free slots without moving any live one.
    pub fn trim(&mut self) {
        while self.slots.last().is_some_and(|slot| slot.refs == 0) {
            self.slots.pop();
        }

        let end = self.slots.len();

        self.free.retain(|slot| slot.index() < end);
        self.slots.shrink_to_fit();
    }

    #[track_caller]
    fn live(&self, slot: SlotIndex) -> &Slot<T> {
        match self.slots.get(slot.index()) {
            Some(entry) if entry.refs > 0 => entry,
            _ => panic!("slot {slot:?} of `{}` isn't live", type_name::<T>()),
        }
    }

    #[track_caller]
    fn live_mut(&mut self, slot: SlotIndex) -> &mut Slot<T> {
        match self.slots.get_mut(slot.index()) {
            Some(entry) if entry.refs > 0 => entry,
            _ => panic!("slot {slot:?} of `{}` isn't live", type_name::<T>()),
        }
    }
}

impl<T: Default + Clone + 'static> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Default + Clone + 'static> ErasedPool for Pool<T> {
    fn type_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn len(&self) -> usize {
        self.len
    }

    fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn create(&mut self) -> SlotIndex {
        Pool::<T>::create(self)
    }

    fn reference(&mut self, slot: SlotIndex) {
        Pool::<T>::reference(self, slot);
    }

    fn delete(&mut self, slot: SlotIndex) -> bool {
        Pool::<T>::delete(self, slot)
    }

    fn clone_slot(&mut self, slot: SlotIndex) -> SlotIndex {
        Pool::<T>::clone_slot(self, slot)
    }

    fn references(&self, slot: SlotIndex) -> u32 {
        Pool::<T>::references(self, slot)
    }

    fn get_dyn(&self, slot: SlotIndex) -> &dyn Any {
        Pool::<T>::get(self, slot)
    }

    fn get_dyn_mut(&mut self, slot: SlotIndex) -> &mut dyn Any {
        Pool::<T>::get_mut(self, slot)
    }

    fn clear(&mut self) {
        Pool::<T>::clear(self);
    }

    fn trim(&mut self) {
        Pool::<T>::trim(self);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl<T: Default + Clone + fmt::Debug + 'static> fmt::Debug for Pool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("len", &self.len)
            .field("capacity", &self.slots.len())
            .field("free", &self.free)
            .finish_non_exhaustive()
    }
}
