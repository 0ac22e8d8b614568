use std::any::Any;
use std::borrow::Cow;
use std::fmt;

use super::{ErasedPool, Pool, SlotIndex};
use crate::entity::EntityId;
use crate::storage::SparseMap;

/// The pool of one component type together with the slot each entity holds.
pub(crate) struct ComponentColumn {
    name: Cow<'static, str>,
    pool: Box<dyn ErasedPool>,
    owners: SparseMap<EntityId, SlotIndex>,
}

impl ComponentColumn {
    pub fn new(name: Cow<'static, str>, pool: Box<dyn ErasedPool>) -> Self {
        let owners = SparseMap::new();

        Self { name, pool, owners }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pool(&self) -> &dyn ErasedPool {
        &*self.pool
    }

    pub fn pool_mut(&mut self) -> &mut dyn ErasedPool {
        &mut *self.pool
    }

    /// Downcasts the pool to its concrete type.
    #[track_caller]
    pub fn typed<T: Default + Clone + 'static>(&self) -> &Pool<T> {
        self.pool.as_any().downcast_ref().unwrap_or_else(|| {
            panic!("component `{}` isn't stored in a `Pool<T>`", self.name)
        })
    }

    #[track_caller]
    pub fn typed_mut<T: Default + Clone + 'static>(&mut self) -> &mut Pool<T> {
        let name = &self.name;

        self.pool.as_any_mut().downcast_mut().unwrap_or_else(|| {
            panic!("component `{name}` isn't stored in a `Pool<T>`")
        })
    }

    /// Returns the slot held by an entity.
    pub fn slot(&self, entity: EntityId) -> Option<SlotIndex> {
        self.owners.get(&entity).copied()
    }

    /// Gives an entity a fresh default slot.
    pub fn create(&mut self, entity: EntityId) -> SlotIndex {
        let slot = self.pool.create();

        self.owners.insert(entity, slot);

        slot
    }

    /// Gives an entity another reference to the slot held by `source`.
    pub fn share(&mut self, entity: EntityId, source: SlotIndex) -> SlotIndex {
        self.pool.reference(source);
        self.owners.insert(entity, source);

        source
    }

    /// Gives an entity a copy of the slot held by `source`.
    pub fn clone_from(
        &mut self,
        entity: EntityId,
        source: SlotIndex,
    ) -> SlotIndex {
        let slot = self.pool.clone_slot(source);

        self.owners.insert(entity, slot);

        slot
    }

    /// Releases the slot held by an entity.
    ///
    /// Returns `true` if the entity held a slot.
    pub fn release(&mut self, entity: EntityId) -> bool {
        match self.owners.remove(&entity) {
            Some(slot) => {
                self.pool.delete(slot);

                true
            }
            None => false,
        }
    }

    pub fn get_dyn(&self, entity: EntityId) -> Option<&dyn Any> {
        self.slot(entity).map(|slot| self.pool.get_dyn(slot))
    }

    pub fn get_dyn_mut(&mut self, entity: EntityId) -> Option<&mut dyn Any> {
        let slot = self.slot(entity)?;

        Some(self.pool.get_dyn_mut(slot))
    }

    pub fn clear(&mut self) {
        self.pool.clear();
        self.owners.clear();
    }

    /// Trims the pool and forgets owners at or past `entity_slots`.
    pub fn trim(&mut self, entity_slots: usize) {
        self.pool.trim();
        self.owners.truncate(entity_slots);
    }
}

impl fmt::Debug for ComponentColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentColumn")
            .field("name", &self.name)
            .field("len", &self.pool.len())
            .field("owners", &self.owners.len())
            .finish()
    }
}
