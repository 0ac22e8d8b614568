//! Defines entities, the individual objects of a world, and their hierarchy.

use std::num::NonZeroU32;

use thiserror::Error;

pub(crate) use self::allocator::*;
pub(crate) use self::record::*;
pub use self::reference::*;
pub use self::world::*;
use crate::storage::SparseIndex;

mod allocator;
mod record;
mod reference;
#[cfg(test)]
mod tests;
mod world;

/// An identifier for an entity in a world.
///
/// The version is bumped whenever the index is recycled, so ids of removed
/// entities are never mistaken for their successors.
#[repr(C, align(8))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId {
    #[cfg(target_endian = "little")]
    pub(crate) index: u32,
    pub(crate) version: NonZeroU32,
    #[cfg(target_endian = "big")]
    pub(crate) index: u32,
}

/// An error for when a requested entity was not found in the world.
#[derive(Debug, Clone, Copy, Error)]
#[error("entity not found: {0:?}")]
pub struct EntityNotFound(pub EntityId);

impl EntityId {
    pub(crate) const fn new(index: u32, version: NonZeroU32) -> Self {
        Self { index, version }
    }

    /// Returns the index of this entity, stable until it is recycled.
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Returns the version of this entity.
    pub const fn version(self) -> u32 {
        self.version.get()
    }
}

impl SparseIndex for EntityId {
    fn sparse_index(&self) -> usize {
        self.index as _
    }
}
