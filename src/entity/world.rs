use super::{EntityId, EntityNotFound, EntityRef};
use crate::component::{Component, ComponentNotFound};
use crate::world::World;

/// A mutable reference to an entity and the world.
///
/// Returned by [`World::create_entity`] and [`World::entity_mut`].
pub struct EntityWorld<'w> {
    world: &'w mut World,
    id: EntityId,
}

impl<'w> EntityWorld<'w> {
    pub(crate) fn new(
        world: &'w mut World,
        id: EntityId,
    ) -> Result<Self, EntityNotFound> {
        if world.contains(id) {
            Ok(Self { world, id })
        } else {
            Err(EntityNotFound(id))
        }
    }

    pub(crate) fn new_unchecked(world: &'w mut World, id: EntityId) -> Self {
        Self { world, id }
    }

    /// The [`EntityId`] this points to.
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Borrows the world.
    pub fn world(&self) -> &World {
        self.world
    }

    /// Mutably borrows the world.
    pub fn world_mut(&mut self) -> &mut World {
        self.world
    }

    /// Borrows this entity as an [`EntityRef`].
    pub fn as_ref(&self) -> EntityRef<'_> {
        EntityRef::new_unchecked(self.world, self.id)
    }

    /// Returns the parent of this entity, `None` for the root.
    pub fn parent(&self) -> Option<EntityId> {
        self.world.parent(self.id)
    }

    /// Moves this entity under a new parent, see [`World::set_parent`].
    #[track_caller]
    pub fn set_parent(&mut self, parent: Option<EntityId>) -> &mut Self {
        self.world.set_parent(self.id, parent);
        self
    }

    /// Sets the local enabled flag, see [`World::set_enabled`].
    #[track_caller]
    pub fn set_enabled(&mut self, enabled: bool) -> &mut Self {
        self.world.set_enabled(self.id, enabled);
        self
    }

    /// Returns `true` if this entity holds the component.
    pub fn contains<C: Component>(&self) -> bool {
        self.world.has_component::<C>(self.id)
    }

    /// Borrows a component of this entity.
    pub fn get<C: Component>(&self) -> Result<&C, ComponentNotFound> {
        self.world.get_component(self.id).ok_or(ComponentNotFound {
            entity: self.id,
            component: C::name(),
        })
    }

    /// Mutably borrows a component of this entity.
    pub fn get_mut<C: Component>(
        &mut self,
    ) -> Result<&mut C, ComponentNotFound> {
        self.world.get_component_mut(self.id).ok_or(ComponentNotFound {
            entity: self.id,
            component: C::name(),
        })
    }

    /// Adds a default component, see [`World::add_component`].
    #[track_caller]
    pub fn add<C: Component>(&mut self) -> &mut C {
        self.world.add_component(self.id)
    }

    /// Adds a default component and edits it in place.
    ///
    /// ```
    /// # use arborist::prelude::*;
    /// #[derive(Component, Default, Clone)]
    /// struct Health(u32);
    ///
    /// let mut world = World::new();
    /// let entity = world.create_entity().with(|h: &mut Health| h.0 = 10).id();
    ///
    /// assert_eq!(world.get_component::<Health>(entity).unwrap().0, 10);
    /// ```
    #[track_caller]
    pub fn with<C: Component>(&mut self, f: impl FnOnce(&mut C)) -> &mut Self {
        f(self.add());
        self
    }

    /// Shares the component held by `source`, see [`World::add_shared`].
    #[track_caller]
    pub fn add_shared<C: Component>(&mut self, source: EntityId) -> &mut C {
        self.world.add_shared(self.id, source)
    }

    /// Copies the component held by `source`, see
    /// [`World::clone_component`].
    #[track_caller]
    pub fn clone_component<C: Component>(
        &mut self,
        source: EntityId,
    ) -> &mut C {
        self.world.clone_component(self.id, source)
    }

    /// Removes a component on the next flush.
    pub fn remove<C: Component>(&mut self) -> &mut Self {
        self.world.remove_component::<C>(self.id);
        self
    }

    /// Removes this entity and its descendants, see [`World::remove`].
    pub fn despawn(self) {
        self.world.remove(self.id);
    }
}
