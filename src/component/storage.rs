use std::borrow::Cow;

use indexmap::IndexMap;
use tracing::debug;

use super::{Component, ComponentColumn, ComponentId, ErasedPool, Pool, TypeKey};

/// Registry of the component types of a world.
///
/// The position of a type in the registry is its [`ComponentId`].
#[derive(Debug)]
pub(crate) struct Components {
    columns: IndexMap<TypeKey, ComponentColumn>,
    /// The maximum amount of distinct types.
    max: usize,
}

impl Components {
    pub fn new(max: usize) -> Self {
        let columns = IndexMap::new();

        Self { columns, max }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns the id of a component, registering it if necessary.
    pub fn register<C: Component>(&mut self) -> ComponentId {
        self.register_with(TypeKey::of::<C>(), C::name(), || {
            Box::new(Pool::<C>::new())
        })
    }

    /// Returns the id of the type with this key, registering the pool built by
    /// `factory` if necessary.
    ///
    /// # Panics
    ///
    /// Panics if registering would exceed the type ceiling.
    #[track_caller]
    pub fn register_with(
        &mut self,
        key: TypeKey,
        name: impl Into<Cow<'static, str>>,
        factory: impl FnOnce() -> Box<dyn ErasedPool>,
    ) -> ComponentId {
        if let Some(index) = self.columns.get_index_of(&key) {
            return ComponentId::new(index);
        }

        assert!(
            self.columns.len() < self.max,
            "exceeded the maximum of {} component types",
            self.max,
        );

        let name = name.into();

        debug!(%name, id = self.columns.len(), "registered component type");

        let column = ComponentColumn::new(name, factory());
        let (index, _) = self.columns.insert_full(key, column);

        ComponentId::new(index)
    }

    pub fn id<C: Component>(&self) -> Option<ComponentId> {
        self.id_of(&TypeKey::of::<C>())
    }

    pub fn id_of(&self, key: &TypeKey) -> Option<ComponentId> {
        self.columns.get_index_of(key).map(ComponentId::new)
    }

    pub fn get(&self, id: ComponentId) -> Option<&ComponentColumn> {
        self.columns.get_index(id.index()).map(|(_, column)| column)
    }

    #[track_caller]
    pub fn column(&self, id: ComponentId) -> &ComponentColumn {
        self.get(id).unwrap_or_else(|| panic!("unknown component: {id:?}"))
    }

    #[track_caller]
    pub fn column_mut(&mut self, id: ComponentId) -> &mut ComponentColumn {
        self.columns
            .get_index_mut(id.index())
            .map(|(_, column)| column)
            .unwrap_or_else(|| panic!("unknown component: {id:?}"))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ComponentColumn> {
        self.columns.values_mut()
    }
}
