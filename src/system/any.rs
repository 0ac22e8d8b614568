use std::any::Any;
use std::borrow::Cow;
use std::fmt;

use super::System;
use crate::entity::EntityId;
use crate::world::World;

/// A type-erased system as stored by the world.
pub type BoxedSystem = Box<dyn AnySystem>;

/// Object-safe version of [`System`].
///
/// Implemented for every [`System`]. Systems registered through
/// [`World::try_add_system`] declare their components at registration
/// instead of through [`System::Components`], and may implement this trait
/// directly.
pub trait AnySystem: Any {
    /// Returns the name of this system for debugging purposes.
    fn name(&self) -> Cow<'static, str>;

    /// See [`System::initialize`].
    fn initialize(&mut self, world: &mut World);

    /// See [`System::object_added`].
    fn object_added(&mut self, entity: EntityId, world: &mut World);

    /// See [`System::object_removed`].
    fn object_removed(&mut self, entity: EntityId, world: &mut World);

    /// See [`System::update`].
    fn update(&mut self, dt: f32, members: &[EntityId], world: &mut World);

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<S: System> AnySystem for S {
    fn name(&self) -> Cow<'static, str> {
        System::name(self)
    }

    fn initialize(&mut self, world: &mut World) {
        System::initialize(self, world);
    }

    fn object_added(&mut self, entity: EntityId, world: &mut World) {
        System::object_added(self, entity, world);
    }

    fn object_removed(&mut self, entity: EntityId, world: &mut World) {
        System::object_removed(self, entity, world);
    }

    fn update(&mut self, dt: f32, members: &[EntityId], world: &mut World) {
        System::update(self, dt, members, world);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

impl dyn AnySystem {
    /// Returns `true` if the system is of type `S`.
    pub fn is<S: AnySystem>(&self) -> bool {
        self.as_any().is::<S>()
    }

    pub fn downcast_ref<S: AnySystem>(&self) -> Option<&S> {
        self.as_any().downcast_ref()
    }

    pub fn downcast_mut<S: AnySystem>(&mut self) -> Option<&mut S> {
        self.as_any_mut().downcast_mut()
    }
}

impl fmt::Debug for dyn AnySystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AnySystem").field(&self.name()).finish()
    }
}
