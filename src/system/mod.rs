//! Systems, the processing units that track entities by their components.

use std::any::type_name;
use std::borrow::Cow;

pub use self::any::*;
pub(crate) use self::storage::*;
use crate::component::ComponentList;
use crate::entity::EntityId;
use crate::world::World;

mod any;
mod storage;

/// A unit of work that tracks every entity holding a set of components.
///
/// An entity is a member of a system while every component in
/// [`System::Components`] is enabled on it. Membership changes are reported
/// through [`System::object_added`] and [`System::object_removed`]; changes
/// requested from inside these hooks or from [`System::update`] are deferred
/// until the world flushes.
///
/// A system with an empty component list has no members.
pub trait System: 'static {
    /// The components an entity needs to be a member.
    type Components: ComponentList;

    /// Returns the name of this system for debugging purposes.
    ///
    /// Defaults to the [`type_name`].
    fn name(&self) -> Cow<'static, str> {
        type_name::<Self>().into()
    }

    /// Called once after registration, before existing entities are matched.
    #[expect(unused)]
    fn initialize(&mut self, world: &mut World) {}

    /// Called after an entity became a member.
    #[expect(unused)]
    fn object_added(&mut self, entity: EntityId, world: &mut World) {}

    /// Called before an entity stops being a member.
    #[expect(unused)]
    fn object_removed(&mut self, entity: EntityId, world: &mut World) {}

    /// Called once per [`World::update`] with a snapshot of the members.
    #[expect(unused)]
    fn update(&mut self, dt: f32, members: &[EntityId], world: &mut World) {}
}
