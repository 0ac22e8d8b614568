use std::any::Any;
use std::borrow::Cow;

use super::World;
use crate::commands::Command;
use crate::component::{
    Component,
    ComponentColumn,
    ComponentId,
    ErasedPool,
    Pool,
    SlotIndex,
    TypeKey,
};
use crate::entity::EntityId;

/// # Component methods
///
/// Adding a component makes it present immediately, systems see it once the
/// world flushes. Removing a component is deferred entirely.
impl World {
    /// Returns the id of a component type, registering its pool if necessary.
    ///
    /// # Panics
    ///
    /// Panics if registering would exceed
    /// [`WorldConfig::max_component_types`](super::WorldConfig::max_component_types).
    #[track_caller]
    pub fn register_component<C: Component>(&mut self) -> ComponentId {
        self.components.register::<C>()
    }

    /// Registers a pool built by `factory` under a key, unless the key is
    /// already registered.
    ///
    /// Returns the id of the component either way.
    ///
    /// # Panics
    ///
    /// Panics if registering would exceed
    /// [`WorldConfig::max_component_types`](super::WorldConfig::max_component_types).
    #[track_caller]
    pub fn try_add_component_pool(
        &mut self,
        key: TypeKey,
        name: impl Into<Cow<'static, str>>,
        factory: impl FnOnce() -> Box<dyn ErasedPool>,
    ) -> ComponentId {
        self.components.register_with(key, name, factory)
    }

    /// Returns the id of a component type if it is registered.
    pub fn component_id<C: Component>(&self) -> Option<ComponentId> {
        self.components.id::<C>()
    }

    /// Returns the id of the component registered under a key.
    pub fn component_id_of(&self, key: &TypeKey) -> Option<ComponentId> {
        self.components.id_of(key)
    }

    /// Returns the amount of registered component types.
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Returns the name a component was registered with.
    ///
    /// # Panics
    ///
    /// Panics if the component isn't registered.
    #[track_caller]
    pub fn component_name(&self, component: ComponentId) -> &str {
        self.components.column(component).name()
    }

    /// Returns the pool of a component type if it is registered.
    pub fn pool<C: Component>(&self) -> Option<&Pool<C>> {
        let component = self.components.id::<C>()?;

        self.components.column(component).pool().as_any().downcast_ref()
    }

    /// Returns the type-erased pool of a component.
    ///
    /// # Panics
    ///
    /// Panics if the component isn't registered.
    #[track_caller]
    pub fn pool_dyn(&self, component: ComponentId) -> &dyn ErasedPool {
        self.components.column(component).pool()
    }

    /// Adds a default component to an entity, returning the existing value if
    /// the entity already has one.
    ///
    /// # Panics
    ///
    /// Panics if the entity doesn't exist.
    #[track_caller]
    pub fn add_component<C: Component>(&mut self, entity: EntityId) -> &mut C {
        let component = self.components.register::<C>();
        let slot = self.attach_slot(entity, component, ComponentColumn::create);

        self.components.column_mut(component).typed_mut::<C>().get_mut(slot)
    }

    /// Adds a component to an entity that shares the value held by `source`.
    ///
    /// The shared value is only reset once every sharing entity released it.
    /// Returns the existing value if the entity already has the component.
    ///
    /// # Panics
    ///
    /// Panics if either entity doesn't exist or if `source` doesn't have the
    /// component.
    #[track_caller]
    pub fn add_shared<C: Component>(
        &mut self,
        entity: EntityId,
        source: EntityId,
    ) -> &mut C {
        let component = self.components.register::<C>();
        let source = self.source_slot(source, component);
        let slot = self.attach_slot(entity, component, |column, entity| {
            column.share(entity, source)
        });

        self.components.column_mut(component).typed_mut::<C>().get_mut(slot)
    }

    /// Adds a copy of the component held by `source` to an entity.
    ///
    /// Returns the existing value if the entity already has the component.
    ///
    /// # Panics
    ///
    /// Panics if either entity doesn't exist or if `source` doesn't have the
    /// component.
    #[track_caller]
    pub fn clone_component<C: Component>(
        &mut self,
        entity: EntityId,
        source: EntityId,
    ) -> &mut C {
        let component = self.components.register::<C>();
        let source = self.source_slot(source, component);
        let slot = self.attach_slot(entity, component, |column, entity| {
            column.clone_from(entity, source)
        });

        self.components.column_mut(component).typed_mut::<C>().get_mut(slot)
    }

    /// Removes a component from an entity on the next flush.
    ///
    /// Does nothing if the entity doesn't have the component.
    pub fn remove_component<C: Component>(&mut self, entity: EntityId) {
        if let Some(component) = self.components.id::<C>() {
            self.remove_component_id(entity, component);
        }
    }

    /// Returns `true` if the entity holds the component, enabled or not.
    pub fn has_component<C: Component>(&self, entity: EntityId) -> bool {
        self.components
            .id::<C>()
            .is_some_and(|component| self.has_component_id(entity, component))
    }

    /// Returns `true` if systems currently see the component on the entity.
    pub fn is_component_enabled<C: Component>(&self, entity: EntityId) -> bool {
        self.components.id::<C>().is_some_and(|component| {
            self.is_component_enabled_id(entity, component)
        })
    }

    /// Borrows a component of an entity.
    ///
    /// Returns `None` if the entity doesn't exist or doesn't have the
    /// component.
    pub fn get_component<C: Component>(&self, entity: EntityId) -> Option<&C> {
        let component = self.components.id::<C>()?;

        if !self.has_component_id(entity, component) {
            return None;
        }

        let column = self.components.column(component);

        Some(column.typed::<C>().get(column.slot(entity)?))
    }

    /// Mutably borrows a component of an entity.
    ///
    /// Returns `None` if the entity doesn't exist or doesn't have the
    /// component.
    pub fn get_component_mut<C: Component>(
        &mut self,
        entity: EntityId,
    ) -> Option<&mut C> {
        let component = self.components.id::<C>()?;

        if !self.has_component_id(entity, component) {
            return None;
        }

        let column = self.components.column_mut(component);
        let slot = column.slot(entity)?;

        Some(column.typed_mut::<C>().get_mut(slot))
    }
}

/// Component methods by [`ComponentId`].
impl World {
    /// Adds a default component to an entity by id.
    ///
    /// # Panics
    ///
    /// Panics if the entity doesn't exist or the component isn't registered.
    #[track_caller]
    pub fn add_component_id(
        &mut self,
        entity: EntityId,
        component: ComponentId,
    ) -> &mut dyn Any {
        let slot = self.attach_slot(entity, component, ComponentColumn::create);

        self.components.column_mut(component).pool_mut().get_dyn_mut(slot)
    }

    /// Adds a component by id that shares the value held by `source`.
    ///
    /// # Panics
    ///
    /// Panics if either entity doesn't exist, if the component isn't
    /// registered or if `source` doesn't have the component.
    #[track_caller]
    pub fn add_shared_id(
        &mut self,
        entity: EntityId,
        source: EntityId,
        component: ComponentId,
    ) -> &mut dyn Any {
        let source = self.source_slot(source, component);
        let slot = self.attach_slot(entity, component, |column, entity| {
            column.share(entity, source)
        });

        self.components.column_mut(component).pool_mut().get_dyn_mut(slot)
    }

    /// Adds a copy of the component held by `source` by id.
    ///
    /// # Panics
    ///
    /// Panics if either entity doesn't exist, if the component isn't
    /// registered or if `source` doesn't have the component.
    #[track_caller]
    pub fn clone_component_id(
        &mut self,
        entity: EntityId,
        source: EntityId,
        component: ComponentId,
    ) -> &mut dyn Any {
        let source = self.source_slot(source, component);
        let slot = self.attach_slot(entity, component, |column, entity| {
            column.clone_from(entity, source)
        });

        self.components.column_mut(component).pool_mut().get_dyn_mut(slot)
    }

    /// Removes a component from an entity by id on the next flush.
    ///
    /// Does nothing if the entity doesn't have the component.
    pub fn remove_component_id(
        &mut self,
        entity: EntityId,
        component: ComponentId,
    ) {
        if self.has_component_id(entity, component) {
            self.commands.push(Command::RemoveComponent { entity, component });
        }
    }

    /// Returns `true` if the entity holds the component, enabled or not.
    pub fn has_component_id(
        &self,
        entity: EntityId,
        component: ComponentId,
    ) -> bool {
        self.entities
            .get(entity)
            .is_some_and(|record| record.components.contains(component))
    }

    /// Returns `true` if systems currently see the component on the entity.
    pub fn is_component_enabled_id(
        &self,
        entity: EntityId,
        component: ComponentId,
    ) -> bool {
        self.entities.get(entity).is_some_and(|record| {
            record.enabled_components.contains(component)
        })
    }

    /// Borrows a component of an entity by id.
    pub fn get_component_dyn(
        &self,
        entity: EntityId,
        component: ComponentId,
    ) -> Option<&dyn Any> {
        if !self.has_component_id(entity, component) {
            return None;
        }

        self.components.get(component)?.get_dyn(entity)
    }

    /// Mutably borrows a component of an entity by id.
    pub fn get_component_dyn_mut(
        &mut self,
        entity: EntityId,
        component: ComponentId,
    ) -> Option<&mut dyn Any> {
        if !self.has_component_id(entity, component) {
            return None;
        }

        self.components.column_mut(component).get_dyn_mut(entity)
    }

    /// Gives an entity a slot for a component unless it already holds one,
    /// queueing the component to be enabled.
    #[track_caller]
    fn attach_slot(
        &mut self,
        entity: EntityId,
        component: ComponentId,
        attach: impl FnOnce(&mut ComponentColumn, EntityId) -> SlotIndex,
    ) -> SlotIndex {
        let column = self.components.column_mut(component);
        let record = self.entities.record_mut(entity);

        if record.components.contains(component) {
            return column
                .slot(entity)
                .expect("present component without a slot");
        }

        let slot = attach(column, entity);

        record.components.insert(component);
        self.commands.push(Command::EnableComponent { entity, component });

        slot
    }

    /// Returns the slot `source` holds for a component.
    #[track_caller]
    fn source_slot(
        &self,
        source: EntityId,
        component: ComponentId,
    ) -> SlotIndex {
        let column = self.components.column(component);
        let present = self
            .entities
            .record(source)
            .components
            .contains(component);

        present.then(|| column.slot(source)).flatten().unwrap_or_else(|| {
            panic!("{source:?} has no component `{}`", column.name())
        })
    }
}
