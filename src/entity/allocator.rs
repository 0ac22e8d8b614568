// Adapted from the slot allocator of [HECS](https://github.com/Ralith/hecs/blob/ed23dedf77602756ffad2194558d7b23f54e2fc1/src/entities.rs#L151).

use std::num::NonZeroU32;

use super::{EntityId, EntityRecord};

/// Manages and allocates the entity records of a
/// [`World`](crate::world::World).
#[derive(Debug)]
pub(crate) struct Entities {
    slots: Vec<EntitySlot>,
    /// Freed indices, reused last-in first-out.
    free: Vec<u32>,
    /// Amount of alive and removing entities.
    len: usize,
    /// The version given to newly pushed slots.
    ///
    /// Raised whenever slots are dropped so that ids handed out before a
    /// [`clear`](Entities::clear) or [`truncate`](Entities::truncate) stay
    /// stale.
    version_floor: NonZeroU32,
    /// The children of the implicit root.
    root: Vec<EntityId>,
    /// Initial capacity of the masks of new records.
    mask_bits: usize,
}

/// Describes a possibly-live entity.
#[derive(Debug, Clone)]
pub(crate) struct EntitySlot {
    pub version: NonZeroU32,
    pub state: SlotState,
    pub record: EntityRecord,
}

/// The lifecycle of an entity slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SlotState {
    Free,
    Alive,
    /// Detached from the hierarchy, waiting for its removal command.
    Removing,
}

impl Entities {
    pub fn new(capacity: usize, mask_bits: usize) -> Self {
        let slots = Vec::with_capacity(capacity);
        let free = Vec::new();
        let len = 0;
        let version_floor = NonZeroU32::MIN;
        let root = Vec::new();

        Self { slots, free, len, version_floor, root, mask_bits }
    }

    /// Amount of alive and removing entities.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Amount of allocated records.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the slot of an entity if the id is current and not freed.
    pub fn slot(&self, entity: EntityId) -> Option<&EntitySlot> {
        self.slots.get(entity.index as usize).filter(|slot| {
            slot.version == entity.version && slot.state != SlotState::Free
        })
    }

    pub fn slot_mut(&mut self, entity: EntityId) -> Option<&mut EntitySlot> {
        self.slots.get_mut(entity.index as usize).filter(|slot| {
            slot.version == entity.version && slot.state != SlotState::Free
        })
    }

    /// Whether the entity exists, including while its removal is pending.
    pub fn contains(&self, entity: EntityId) -> bool {
        self.slot(entity).is_some()
    }

    /// Whether the entity exists and isn't pending removal.
    pub fn is_alive(&self, entity: EntityId) -> bool {
        self.state(entity) == SlotState::Alive
    }

    pub fn state(&self, entity: EntityId) -> SlotState {
        self.slot(entity).map_or(SlotState::Free, |slot| slot.state)
    }

    pub fn get(&self, entity: EntityId) -> Option<&EntityRecord> {
        self.slot(entity).map(|slot| &slot.record)
    }

    pub fn get_mut(&mut self, entity: EntityId) -> Option<&mut EntityRecord> {
        self.slot_mut(entity).map(|slot| &mut slot.record)
    }

    /// Returns the record of an entity.
    ///
    /// # Panics
    ///
    /// Panics if the entity doesn't exist.
    #[track_caller]
    pub fn record(&self, entity: EntityId) -> &EntityRecord {
        self.get(entity)
            .unwrap_or_else(|| panic!("entity not found: {entity:?}"))
    }

    #[track_caller]
    pub fn record_mut(&mut self, entity: EntityId) -> &mut EntityRecord {
        self.get_mut(entity)
            .unwrap_or_else(|| panic!("entity not found: {entity:?}"))
    }

    /// Iterates over the entities that aren't pending removal, in index order.
    pub fn iter(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            (slot.state == SlotState::Alive)
                .then(|| EntityId::new(index as _, slot.version))
        })
    }

    /// Iterates over every entity that isn't freed, in index order.
    pub fn iter_all(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            (slot.state != SlotState::Free)
                .then(|| EntityId::new(index as _, slot.version))
        })
    }

    /// Allocates a new entity under the root.
    pub fn alloc(&mut self) -> EntityId {
        self.len += 1;

        let entity = if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];

            slot.state = SlotState::Alive;

            EntityId::new(index, slot.version)
        } else {
            let index =
                u32::try_from(self.slots.len()).expect("entity overflow");

            self.slots.push(EntitySlot {
                version: self.version_floor,
                state: SlotState::Alive,
                record: EntityRecord::new(self.mask_bits),
            });

            EntityId::new(index, self.version_floor)
        };

        self.root.push(entity);

        entity
    }

    /// Marks an alive entity as pending removal.
    ///
    /// Returns `false` if the entity wasn't alive.
    pub fn mark_removing(&mut self, entity: EntityId) -> bool {
        match self.slot_mut(entity) {
            Some(slot) if slot.state == SlotState::Alive => {
                slot.state = SlotState::Removing;
                slot.record.dirty.set(true);

                true
            }
            _ => false,
        }
    }

    /// Frees an entity, allowing its index to be reused.
    ///
    /// Returns `false` if the entity didn't exist.
    pub fn free(&mut self, entity: EntityId) -> bool {
        let Some(slot) = self.slot_mut(entity) else {
            return false;
        };

        slot.state = SlotState::Free;
        slot.version = slot.version.checked_add(1).unwrap_or(NonZeroU32::MIN);
        slot.record.reset();

        self.free.push(entity.index);
        self.len -= 1;

        true
    }

    /// The children of an entity, or of the root for `None`.
    #[track_caller]
    pub fn children(&self, parent: Option<EntityId>) -> &[EntityId] {
        match parent {
            Some(parent) => &self.record(parent).children,
            None => &self.root,
        }
    }

    #[track_caller]
    pub fn children_mut(
        &mut self,
        parent: Option<EntityId>,
    ) -> &mut Vec<EntityId> {
        match parent {
            Some(parent) => &mut self.record_mut(parent).children,
            None => &mut self.root,
        }
    }

    /// Removes an entity from the child list of its parent.
    pub fn detach(&mut self, entity: EntityId) {
        let parent = self.record(entity).parent;
        let siblings = self.children_mut(parent);

        if let Some(position) = siblings.iter().position(|&id| id == entity) {
            siblings.remove(position);
        }

        self.record_mut(entity).parent = None;
    }

    /// Appends an entity to the child list of `parent`.
    pub fn attach(&mut self, entity: EntityId, parent: Option<EntityId>) {
        self.children_mut(parent).push(entity);
        self.record_mut(entity).parent = parent;
    }

    /// Whether `ancestor` is `entity` or one of its ancestors.
    pub fn is_ancestor(
        &self,
        ancestor: EntityId,
        mut entity: EntityId,
    ) -> bool {
        loop {
            if entity == ancestor {
                return true;
            }

            match self.get(entity).and_then(|record| record.parent) {
                Some(parent) => entity = parent,
                None => return false,
            }
        }
    }

    /// Returns the cached enabled state of an entity in the hierarchy,
    /// recomputing it if it was dirtied.
    ///
    /// Entities that don't exist or are pending removal are never enabled.
    pub fn world_enabled(&self, entity: EntityId) -> bool {
        let Some(slot) = self.slot(entity) else {
            return false;
        };

        if slot.state != SlotState::Alive {
            return false;
        }

        let record = &slot.record;

        if record.dirty.get() {
            let parent_enabled =
                record.parent.map_or(true, |parent| self.world_enabled(parent));

            record.world_enabled.set(record.enabled && parent_enabled);
            record.dirty.set(false);
        }

        record.world_enabled.get()
    }

    /// Pushes `entity` and all of its descendants in pre-order, marking their
    /// cached enabled state dirty.
    pub fn dirty_subtree(&self, entity: EntityId, out: &mut Vec<EntityId>) {
        let start = out.len();

        out.push(entity);

        let mut cursor = start;

        while let Some(&next) = out.get(cursor) {
            let record = self.record(next);

            record.dirty.set(true);
            out.extend_from_slice(&record.children);
            cursor += 1;
        }
    }

    /// Drops every record.
    pub fn clear(&mut self) {
        self.raise_floor(0);
        self.slots.clear();
        self.free.clear();
        self.root.clear();
        self.len = 0;
    }

    /// Drops the records past the last used one, returning the new amount of
    /// records.
    pub fn trim(&mut self) -> usize {
        let end = self
            .slots
            .iter()
            .rposition(|slot| slot.state != SlotState::Free)
            .map_or(0, |index| index + 1);

        self.raise_floor(end);
        self.slots.truncate(end);
        self.slots.shrink_to_fit();
        self.free.retain(|&index| (index as usize) < end);

        end
    }

    fn raise_floor(&mut self, from: usize) {
        for slot in &self.slots[from..] {
            // freed slots already carry a version that was never handed out
            let next = match slot.state {
                SlotState::Free => slot.version,
                _ => slot.version.checked_add(1).unwrap_or(NonZeroU32::MIN),
            };

            self.version_floor = self.version_floor.max(next);
        }
    }
}
