use std::fmt;

use super::{EntityId, EntityNotFound};
use crate::component::{Component, ComponentNotFound};
use crate::world::World;

/// A reference to an entity and the world it lives in.
#[derive(Clone, Copy)]
pub struct EntityRef<'w> {
    world: &'w World,
    id: EntityId,
}

impl<'w> EntityRef<'w> {
    pub(crate) fn new(
        world: &'w World,
        id: EntityId,
    ) -> Result<Self, EntityNotFound> {
        world
            .contains(id)
            .then_some(Self { world, id })
            .ok_or(EntityNotFound(id))
    }

    pub(crate) const fn new_unchecked(world: &'w World, id: EntityId) -> Self {
        Self { world, id }
    }

    /// The [`EntityId`] this points to.
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// The world this entity lives in.
    pub const fn world(&self) -> &'w World {
        self.world
    }

    /// Returns the parent of this entity, `None` for the root.
    pub fn parent(&self) -> Option<EntityId> {
        self.world.parent(self.id)
    }

    /// Returns the children of this entity in insertion order.
    pub fn children(&self) -> &'w [EntityId] {
        self.world.children(self.id)
    }

    /// Returns the local enabled flag of this entity.
    pub fn is_enabled(&self) -> bool {
        self.world.is_enabled(self.id)
    }

    /// Returns `true` if this entity and all of its ancestors are enabled.
    pub fn is_world_enabled(&self) -> bool {
        self.world.is_world_enabled(self.id)
    }

    /// Returns `true` if the removal of this entity is pending.
    pub fn is_removed(&self) -> bool {
        self.world.is_removed(self.id)
    }

    /// Returns `true` if this entity holds the component.
    pub fn contains<C: Component>(&self) -> bool {
        self.world.has_component::<C>(self.id)
    }

    /// Borrows a component of this entity.
    pub fn get<C: Component>(&self) -> Result<&'w C, ComponentNotFound> {
        self.world.get_component(self.id).ok_or(ComponentNotFound {
            entity: self.id,
            component: C::name(),
        })
    }
}

impl fmt::Debug for EntityRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityRef")
            .field("id", &self.id)
            .field("parent", &self.parent())
            .field("enabled", &self.is_enabled())
            .finish_non_exhaustive()
    }
}
