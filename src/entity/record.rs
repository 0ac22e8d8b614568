use std::cell::Cell;

use super::EntityId;
use crate::storage::ComponentMask;

/// The hierarchy and component state of an entity.
#[derive(Debug, Clone)]
pub(crate) struct EntityRecord {
    /// `None` when the entity sits directly under the root.
    pub parent: Option<EntityId>,
    pub children: Vec<EntityId>,
    /// The local enabled flag.
    pub enabled: bool,
    /// Cached `enabled && parent.world_enabled`, valid while not dirty.
    pub world_enabled: Cell<bool>,
    pub dirty: Cell<bool>,
    /// The components the entity holds a slot for.
    pub components: ComponentMask,
    /// The subset of `components` systems currently see.
    pub enabled_components: ComponentMask,
}

impl EntityRecord {
    pub fn new(mask_bits: usize) -> Self {
        let parent = None;
        let children = Vec::new();
        let enabled = true;
        let world_enabled = Cell::new(true);
        let dirty = Cell::new(true);
        let components = ComponentMask::with_capacity(mask_bits);
        let enabled_components = ComponentMask::with_capacity(mask_bits);

        Self {
            parent,
            children,
            enabled,
            world_enabled,
            dirty,
            components,
            enabled_components,
        }
    }

    /// Resets the record for reuse, keeping its allocations.
    pub fn reset(&mut self) {
        self.parent = None;
        self.children.clear();
        self.enabled = true;
        self.world_enabled.set(true);
        self.dirty.set(true);
        self.components.clear();
        self.enabled_components.clear();
    }
}
