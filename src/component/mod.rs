//! Defines components, the data attached to entities, and their storage.

use std::any::{type_name, TypeId};
use std::borrow::Cow;

pub use arborist_macros::Component;
use thiserror::Error;

pub(crate) use self::column::*;
pub use self::pool::*;
pub use self::set::*;
pub(crate) use self::storage::*;
use crate::entity::EntityId;
pub use crate::storage::ComponentMask;

mod column;
mod pool;
mod set;
mod storage;
mod tuple_impl;

/// A single value attached to an entity.
///
/// Components live in a per-type [`Pool`] and are reset to their
/// [default](Default) value when their last reference is released. Sharing
/// and cloning between entities require [`Clone`].
pub trait Component: Default + Clone + 'static {
    /// A human-readable name for the component.
    fn name() -> &'static str {
        type_name::<Self>()
    }
}

/// The bit index of a component type within a [`World`](crate::world::World).
///
/// Ids are assigned per world in order of first use.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComponentId(usize);

/// The registry identity of a component or system type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeKey {
    /// A statically known Rust type.
    Type(TypeId),
    /// A type supplied from outside of Rust's type system.
    Named(Cow<'static, str>),
}

/// An error for when a requested component was not found on an entity.
#[derive(Debug, Clone, Copy, Error)]
#[error("component `{component}` not found on entity {entity:?}")]
pub struct ComponentNotFound {
    pub entity: EntityId,
    pub component: &'static str,
}

impl ComponentId {
    pub(crate) const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the bit index of this component.
    pub const fn index(self) -> usize {
        self.0
    }
}

impl TypeKey {
    /// Returns the key of a Rust type.
    pub fn of<T: 'static>() -> Self {
        Self::Type(TypeId::of::<T>())
    }

    /// Returns a key for an externally supplied type name.
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self::Named(name.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_keys() {
        struct A;
        struct B;

        assert_eq!(TypeKey::of::<A>(), TypeKey::of::<A>());
        assert_ne!(TypeKey::of::<A>(), TypeKey::of::<B>());
        assert_eq!(
            TypeKey::named("Health"),
            TypeKey::named(String::from("Health")),
        );
        assert_ne!(TypeKey::named("A"), TypeKey::of::<A>());
    }

    #[test]
    fn derived_name() {
        #[derive(Component, Default, Clone)]
        struct Plain;

        #[derive(Component, Default, Clone)]
        #[component(name = "Velocity")]
        struct Renamed;

        assert!(Plain::name().ends_with("Plain"));
        assert_eq!(Renamed::name(), "Velocity");
    }
}
