/// Configuration of a [`World`](super::World).
///
/// ```
/// # use arborist::prelude::*;
/// let world = World::with_config(
///     WorldConfig::new()
///         .with_max_component_types(128)
///         .with_entity_capacity(1024),
/// );
///
/// assert_eq!(world.config().max_component_types, 128);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorldConfig {
    /// The maximum amount of distinct component types.
    ///
    /// Registering more types than this panics.
    pub max_component_types: usize,
    /// The amount of entity records to allocate up front.
    pub entity_capacity: usize,
}

impl WorldConfig {
    /// The default ceiling on distinct component types.
    pub const DEFAULT_MAX_COMPONENT_TYPES: usize = 64;

    /// Creates the default configuration.
    pub const fn new() -> Self {
        Self {
            max_component_types: Self::DEFAULT_MAX_COMPONENT_TYPES,
            entity_capacity: 0,
        }
    }

    /// Sets [`WorldConfig::max_component_types`].
    pub const fn with_max_component_types(mut self, max: usize) -> Self {
        self.max_component_types = max;
        self
    }

    /// Sets [`WorldConfig::entity_capacity`].
    pub const fn with_entity_capacity(mut self, capacity: usize) -> Self {
        self.entity_capacity = capacity;
        self
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self::new()
    }
}
