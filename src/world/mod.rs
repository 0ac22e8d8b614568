//! Defines the [`World`], the owner of all entities, components and systems.

use std::{mem, thread};

use tracing::{debug, trace, trace_span};

pub use self::config::*;
use crate::commands::{Command, Commands, Queue};
use crate::component::{ComponentId, Components};
use crate::entity::{
    Entities,
    EntityId,
    EntityNotFound,
    EntityRef,
    EntityWorld,
    SlotState,
};
use crate::system::{AnySystem, Systems};

mod component;
mod config;
mod system;
#[cfg(test)]
mod tests;

/// Stores all entities, components and systems.
///
/// Structural changes that affect system membership are deferred: they are
/// applied by [`World::flush`], which [`World::update`] calls after running
/// every system.
///
/// - [Entity methods](#entity-methods)
/// - [Component methods](#component-methods)
/// - [System methods](#system-methods)
#[derive(Debug)]
pub struct World {
    pub(crate) entities: Entities,
    pub(crate) components: Components,
    pub(crate) systems: Systems,
    /// Deferred membership changes.
    pub(crate) commands: Commands,
    config: WorldConfig,
    /// Depth of running system hooks and updates.
    running: usize,
}

impl World {
    /// Creates a new empty world.
    pub fn new() -> Self {
        Self::with_config(WorldConfig::new())
    }

    /// Creates a new empty world with the given configuration.
    pub fn with_config(config: WorldConfig) -> Self {
        let entities =
            Entities::new(config.entity_capacity, config.max_component_types);
        let components = Components::new(config.max_component_types);
        let systems = Systems::new();
        let commands = Commands::new();
        let running = 0;

        Self { entities, components, systems, commands, config, running }
    }

    /// Returns the configuration of this world.
    pub const fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Returns the pending deferred commands.
    pub const fn commands(&self) -> &Commands {
        &self.commands
    }

    /// Runs every system's [`update`](crate::system::System::update) in
    /// registration order, then [flushes](World::flush).
    ///
    /// Systems registered during the update first run on the next one.
    ///
    /// # Panics
    ///
    /// Panics if called from inside a system.
    #[track_caller]
    pub fn update(&mut self, dt: f32) {
        self.assert_not_running("update");

        let _span = trace_span!("update", dt).entered();
        let mut members = Vec::new();

        for slot in self.systems.slots() {
            let Some(entry) = self.systems.get(slot) else {
                // removed by an earlier system
                continue;
            };

            members.clear();
            members.extend_from_slice(&entry.members);

            let Some(mut system) = self.systems.take(slot) else {
                continue;
            };

            self.running += 1;
            system.update(dt, &members, self);
            self.running -= 1;
            self.systems.restore(slot, system);
        }

        self.flush();
    }

    /// Applies every pending command, the creation queue first.
    ///
    /// Commands pushed to a queue while it drains are applied in the same
    /// flush. Commands pushed to the creation queue while the removal queue
    /// drains wait for the next one.
    ///
    /// # Panics
    ///
    /// Panics if called from inside a system hook or update.
    #[track_caller]
    pub fn flush(&mut self) {
        self.assert_not_running("flush");

        let created = self.drain(Queue::Create);
        let removed = self.drain(Queue::Remove);

        if created + removed > 0 {
            trace!(created, removed, "flushed commands");
        }
    }

    fn drain(&mut self, queue: Queue) -> usize {
        let mut count = 0;

        while let Some(command) = self.commands.pop(queue) {
            command.apply(self);
            count += 1;
        }

        count
    }

    /// Removes every entity, component value and pending command.
    ///
    /// Systems observe the removal of their members. Registered component
    /// types and systems are kept.
    ///
    /// # Panics
    ///
    /// Panics if called from inside a system hook or update.
    #[track_caller]
    pub fn clear(&mut self) {
        self.assert_not_running("clear");

        let entities: Vec<_> = self.entities.iter_all().collect();

        for &entity in &entities {
            self.disable_all(entity);
        }

        self.commands.clear();
        self.entities.clear();

        for column in self.components.iter_mut() {
            column.clear();
        }

        for entry in self.systems.entries_mut() {
            entry.members.clear();
        }

        debug!(entities = entities.len(), "cleared world");
    }

    /// Shrinks entity storage to the last used record and trims every pool.
    ///
    /// Surviving entity ids and component values are left untouched.
    ///
    /// # Panics
    ///
    /// Panics if called from inside a system hook or update.
    #[track_caller]
    pub fn trim(&mut self) {
        self.assert_not_running("trim");

        let capacity = self.entities.trim();

        for column in self.components.iter_mut() {
            column.trim(capacity);
        }

        debug!(capacity, "trimmed world");
    }

    #[track_caller]
    fn assert_not_running(&self, operation: &str) {
        assert!(
            self.running == 0,
            "cannot {operation} the world from inside a system",
        );
    }
}

/// # Entity methods
impl World {
    /// Returns the amount of entities, including those pending removal.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` if this world contains no entities.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the amount of allocated entity records.
    pub fn capacity(&self) -> usize {
        self.entities.capacity()
    }

    /// Returns `true` if the entity exists, including while its removal is
    /// pending.
    pub fn contains(&self, entity: EntityId) -> bool {
        self.entities.contains(entity)
    }

    /// Returns `true` if the entity was removed or its removal is pending.
    pub fn is_removed(&self, entity: EntityId) -> bool {
        !self.entities.is_alive(entity)
    }

    /// Returns an iterator over the entities that aren't pending removal.
    pub fn iter(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.iter()
    }

    /// Borrows an entity in this world.
    ///
    /// Returns an error if the entity doesn't exist in this world.
    pub fn entity(
        &self,
        entity: EntityId,
    ) -> Result<EntityRef<'_>, EntityNotFound> {
        EntityRef::new(self, entity)
    }

    /// Mutably borrows an entity and this world.
    ///
    /// Returns an error if the entity doesn't exist in this world.
    pub fn entity_mut(
        &mut self,
        entity: EntityId,
    ) -> Result<EntityWorld<'_>, EntityNotFound> {
        EntityWorld::new(self, entity)
    }

    /// Creates a new enabled entity under the root.
    pub fn create_entity(&mut self) -> EntityWorld<'_> {
        let entity = self.entities.alloc();

        EntityWorld::new_unchecked(self, entity)
    }

    /// Creates a copy of an entity under the same parent.
    ///
    /// Every component is cloned into a new slot and every child is cloned
    /// recursively beneath the copy.
    ///
    /// # Panics
    ///
    /// Panics if the entity doesn't exist or is pending removal.
    #[track_caller]
    pub fn clone_entity(&mut self, source: EntityId) -> EntityId {
        assert!(
            self.entities.is_alive(source),
            "cannot clone {source:?}: entity not found or being removed",
        );

        let parent = self.entities.record(source).parent;

        self.clone_subtree(source, parent)
    }

    fn clone_subtree(
        &mut self,
        source: EntityId,
        parent: Option<EntityId>,
    ) -> EntityId {
        let record = self.entities.record(source);
        let enabled = record.enabled;
        let components: Vec<_> = record.components.iter().collect();
        let children = record.children.clone();

        let entity = self.entities.alloc();

        if parent.is_some() {
            self.entities.detach(entity);
            self.entities.attach(entity, parent);
        }

        let record = self.entities.record_mut(entity);

        record.enabled = enabled;
        record.dirty.set(true);

        for component in components {
            self.clone_component_id(entity, source, component);
        }

        for child in children {
            self.clone_subtree(child, Some(entity));
        }

        entity
    }

    /// Removes an entity and all of its descendants.
    ///
    /// The entity is detached from the hierarchy immediately. Its components
    /// are disabled and released when the world flushes, until then it still
    /// answers queries. Does nothing if the entity doesn't exist or is already
    /// being removed.
    pub fn remove(&mut self, entity: EntityId) {
        if !self.entities.mark_removing(entity) {
            return;
        }

        self.entities.detach(entity);

        let record = self.entities.record_mut(entity);
        let children = mem::take(&mut record.children);

        for child in children {
            self.remove(child);
        }

        self.commands.push(Command::RemoveEntity { entity });
    }

    /// Returns the parent of an entity, `None` for the root or a missing
    /// entity.
    pub fn parent(&self, entity: EntityId) -> Option<EntityId> {
        self.entities.get(entity).and_then(|record| record.parent)
    }

    /// Returns the children of an entity in insertion order.
    pub fn children(&self, entity: EntityId) -> &[EntityId] {
        self.entities
            .get(entity)
            .map(|record| record.children.as_slice())
            .unwrap_or_default()
    }

    /// Returns the entities directly under the root in insertion order.
    pub fn root_children(&self) -> &[EntityId] {
        self.entities.children(None)
    }

    /// Moves an entity under a new parent, or under the root for `None`.
    ///
    /// Does nothing if the parent is unchanged or the entity is pending
    /// removal. If the entity's enabled state in the hierarchy changes, its
    /// components and those of its descendants are enabled or disabled on the
    /// next flush.
    ///
    /// # Panics
    ///
    /// Panics if either entity doesn't exist, if the parent is pending
    /// removal, or if the parent is the entity itself or one of its
    /// descendants.
    #[track_caller]
    pub fn set_parent(&mut self, entity: EntityId, parent: Option<EntityId>) {
        let current = self.entities.record(entity).parent;

        if self.entities.state(entity) != SlotState::Alive || current == parent
        {
            return;
        }

        if let Some(parent) = parent {
            assert!(
                self.entities.is_alive(parent),
                "cannot parent {entity:?} to {parent:?}: entity not found or \
                 being removed",
            );
            assert!(
                !self.entities.is_ancestor(entity, parent),
                "cannot parent {entity:?} to itself or its descendant \
                 {parent:?}",
            );
        }

        let was_enabled = self.entities.world_enabled(entity);

        self.entities.detach(entity);
        self.entities.attach(entity, parent);

        let mut subtree = Vec::new();

        self.entities.dirty_subtree(entity, &mut subtree);

        if self.entities.world_enabled(entity) != was_enabled {
            self.refresh_later(subtree);
        }
    }

    /// Returns the local enabled flag of an entity.
    pub fn is_enabled(&self, entity: EntityId) -> bool {
        self.entities.get(entity).is_some_and(|record| record.enabled)
    }

    /// Returns `true` if the entity and all of its ancestors are enabled.
    ///
    /// Always `false` for missing entities and entities pending removal.
    pub fn is_world_enabled(&self, entity: EntityId) -> bool {
        self.entities.world_enabled(entity)
    }

    /// Sets the local enabled flag of an entity.
    ///
    /// The components of the entity and its descendants follow on the next
    /// flush.
    ///
    /// # Panics
    ///
    /// Panics if the entity doesn't exist.
    #[track_caller]
    pub fn set_enabled(&mut self, entity: EntityId, enabled: bool) {
        let record = self.entities.record_mut(entity);

        if record.enabled == enabled {
            return;
        }

        record.enabled = enabled;

        let mut subtree = Vec::new();

        self.entities.dirty_subtree(entity, &mut subtree);
        self.refresh_later(subtree);
    }

    fn refresh_later(&mut self, entities: Vec<EntityId>) {
        for entity in entities {
            self.commands.push(Command::Refresh { entity });
        }
    }
}

/// Membership engine.
impl World {
    /// The single transition routine between enabled and disabled for a
    /// component of an entity.
    ///
    /// A component ends up enabled only if it is present and the entity is
    /// enabled in the hierarchy. Transitions that don't change state are
    /// no-ops.
    pub(crate) fn set_component_enabled(
        &mut self,
        entity: EntityId,
        component: ComponentId,
        enable: bool,
    ) {
        let Some(record) = self.entities.get(entity) else {
            return;
        };

        let enabled = record.enabled_components.contains(component);
        let enable = enable
            && record.components.contains(component)
            && self.entities.world_enabled(entity);

        if enable == enabled {
            return;
        }

        if enable {
            let interested = self.systems.interested(component).to_vec();

            self.entities
                .record_mut(entity)
                .enabled_components
                .insert(component);

            for slot in interested {
                let Some(entry) = self.systems.get_mut(slot) else {
                    continue;
                };

                let record = self.entities.record(entity);

                if !entry.mask.is_subset(&record.enabled_components) {
                    continue;
                }

                entry.members.push(entity);
                self.notify(slot, entity, true);
            }
        } else {
            // a removal hook may register a system that picks up the entity
            // while the bit is still set
            while let Some(slot) = self.leaving(entity, component) {
                self.notify(slot, entity, false);
                self.evict(slot, entity);
            }

            if let Some(record) = self.entities.get_mut(entity) {
                record.enabled_components.remove(component);
            }
        }
    }

    /// The first system interested in a component that still lists the
    /// entity as a member.
    fn leaving(
        &self,
        entity: EntityId,
        component: ComponentId,
    ) -> Option<usize> {
        self.systems.interested(component).iter().copied().find(|&slot| {
            self.systems
                .get(slot)
                .is_some_and(|entry| entry.members.contains(&entity))
        })
    }

    /// Calls the added or removed hook of a system.
    ///
    /// Skipped if the system is running, its membership still changes.
    pub(crate) fn notify(
        &mut self,
        slot: usize,
        entity: EntityId,
        added: bool,
    ) {
        self.with_system(slot, |system, world| {
            if added {
                system.object_added(entity, world);
            } else {
                system.object_removed(entity, world);
            }
        });
    }

    /// Runs a hook of a system with the system taken out of its slot.
    ///
    /// The world can't be flushed, cleared or trimmed while the hook runs.
    pub(crate) fn with_system(
        &mut self,
        slot: usize,
        f: impl FnOnce(&mut dyn AnySystem, &mut World),
    ) {
        let Some(mut system) = self.systems.take(slot) else {
            return;
        };

        self.running += 1;
        f(&mut *system, self);
        self.running -= 1;

        self.systems.restore(slot, system);
    }

    pub(crate) fn evict(&mut self, slot: usize, entity: EntityId) {
        let Some(entry) = self.systems.get_mut(slot) else {
            return;
        };

        let position = entry.members.iter().position(|&e| e == entity);

        if let Some(position) = position {
            entry.members.remove(position);
        }
    }

    /// Enables a component if the entity isn't pending removal.
    pub(crate) fn enable_component(
        &mut self,
        entity: EntityId,
        component: ComponentId,
    ) {
        if self.entities.is_alive(entity) {
            self.set_component_enabled(entity, component, true);
        }
    }

    /// Brings every present component in line with the entity's enabled state
    /// in the hierarchy.
    pub(crate) fn refresh(&mut self, entity: EntityId) {
        if !self.entities.is_alive(entity) {
            return;
        }

        let components: Vec<_> =
            self.entities.record(entity).components.iter().collect();

        for component in components {
            self.set_component_enabled(entity, component, true);
        }
    }

    /// Disables and releases a component, clearing its presence bit.
    pub(crate) fn release_component(
        &mut self,
        entity: EntityId,
        component: ComponentId,
    ) {
        let present = self
            .entities
            .get(entity)
            .is_some_and(|record| record.components.contains(component));

        if !present {
            return;
        }

        self.set_component_enabled(entity, component, false);
        self.components.column_mut(component).release(entity);
        self.entities.record_mut(entity).components.remove(component);
    }

    /// Disables and releases every component of a removed entity, then frees
    /// it.
    pub(crate) fn release_entity(&mut self, entity: EntityId) {
        if self.entities.state(entity) != SlotState::Removing {
            return;
        }

        let components = self.disable_all(entity);

        for component in components {
            self.components.column_mut(component).release(entity);
        }

        self.entities.free(entity);
    }

    /// Disables every component of an entity, returning the present ones.
    fn disable_all(&mut self, entity: EntityId) -> Vec<ComponentId> {
        let components: Vec<_> =
            self.entities.record(entity).components.iter().collect();

        for &component in &components {
            self.set_component_enabled(entity, component, false);
        }

        components
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for World {
    fn drop(&mut self) {
        if !thread::panicking() && self.running == 0 {
            self.clear();
        }

        self.systems.clear();
    }
}
