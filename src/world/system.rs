use tracing::debug;

use super::World;
use crate::component::{ComponentSetBuilder, TypeKey};
use crate::entity::EntityId;
use crate::storage::ComponentMask;
use crate::system::{AnySystem, BoxedSystem, System};

/// # System methods
impl World {
    /// Registers a default-constructed system unless one of its type is
    /// registered, returning the registered system.
    ///
    /// On registration the system is [initialized](System::initialize), then
    /// every entity that already qualifies becomes a member.
    ///
    /// # Panics
    ///
    /// Panics if called from one of the hooks of `S`.
    #[track_caller]
    pub fn create_system<S: System + Default>(&mut self) -> &mut S {
        if !self.has_system::<S>() {
            self.register_system(TypeKey::of::<S>(), |builder| {
                builder.extend::<S::Components>();

                Box::new(S::default())
            });
        }

        self.registered_mut()
    }

    /// Registers a system unless one of its type is registered, returning the
    /// registered system.
    ///
    /// See [`World::create_system`].
    #[track_caller]
    pub fn add_system<S: System>(&mut self, system: S) -> &mut S {
        if !self.has_system::<S>() {
            self.register_system(TypeKey::of::<S>(), |builder| {
                builder.extend::<S::Components>();

                Box::new(system)
            });
        }

        self.registered_mut()
    }

    /// Registers the system built by `factory` under a key unless the key is
    /// registered, returning the registered system.
    ///
    /// The factory declares the required components on the builder.
    ///
    /// # Panics
    ///
    /// Panics if called from one of the hooks of the registered system.
    #[track_caller]
    pub fn try_add_system(
        &mut self,
        key: TypeKey,
        factory: impl FnOnce(&mut ComponentSetBuilder<'_>) -> BoxedSystem,
    ) -> &mut dyn AnySystem {
        let slot = match self.systems.slot_of(&key) {
            Some(slot) => slot,
            None => self.register_system(key, factory),
        };

        self.systems
            .get_mut(slot)
            .and_then(|entry| entry.system.as_deref_mut())
            .expect("system is running")
    }

    /// Unregisters a system, returning it.
    ///
    /// Every member is reported as removed first.
    ///
    /// # Panics
    ///
    /// Panics if the system is running.
    #[track_caller]
    pub fn remove_system<S: AnySystem>(&mut self) -> Option<S> {
        let system = self.remove_system_key(&TypeKey::of::<S>())?;

        system.into_any().downcast().ok().map(|system| *system)
    }

    /// Unregisters the system registered under a key, returning it.
    ///
    /// # Panics
    ///
    /// Panics if the system is running.
    #[track_caller]
    pub fn remove_system_key(
        &mut self,
        key: &TypeKey,
    ) -> Option<BoxedSystem> {
        let slot = self.systems.slot_of(key)?;
        let entry = self.systems.get(slot)?;

        assert!(
            entry.system.is_some(),
            "cannot remove system `{}` while it runs",
            entry.name,
        );

        for entity in entry.members.clone() {
            self.notify(slot, entity, false);
            self.evict(slot, entity);
        }

        let entry = self.systems.remove(key)?;

        debug!(name = %entry.name, "removed system");

        entry.system
    }

    /// Returns `true` if a system of this type is registered.
    pub fn has_system<S: AnySystem>(&self) -> bool {
        self.systems.slot_of(&TypeKey::of::<S>()).is_some()
    }

    /// Returns the amount of registered systems.
    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    /// Borrows a registered system.
    ///
    /// Returns `None` if the system isn't registered or is running.
    pub fn system<S: AnySystem>(&self) -> Option<&S> {
        let slot = self.systems.slot_of(&TypeKey::of::<S>())?;

        self.systems.get(slot)?.system.as_deref()?.downcast_ref()
    }

    /// Mutably borrows a registered system.
    ///
    /// Returns `None` if the system isn't registered or is running.
    pub fn system_mut<S: AnySystem>(&mut self) -> Option<&mut S> {
        let slot = self.systems.slot_of(&TypeKey::of::<S>())?;

        self.systems.get_mut(slot)?.system.as_deref_mut()?.downcast_mut()
    }

    /// Returns the members of a system in order of qualification.
    ///
    /// Empty if the system isn't registered.
    pub fn members<S: AnySystem>(&self) -> &[EntityId] {
        self.members_of(&TypeKey::of::<S>())
    }

    /// Returns the members of the system registered under a key.
    pub fn members_of(&self, key: &TypeKey) -> &[EntityId] {
        self.systems
            .slot_of(key)
            .and_then(|slot| self.systems.get(slot))
            .map(|entry| entry.members.as_slice())
            .unwrap_or_default()
    }

    /// Returns the components a system requires.
    pub fn system_mask<S: AnySystem>(&self) -> Option<&ComponentMask> {
        let slot = self.systems.slot_of(&TypeKey::of::<S>())?;

        self.systems.get(slot).map(|entry| &entry.mask)
    }

    fn register_system(
        &mut self,
        key: TypeKey,
        factory: impl FnOnce(&mut ComponentSetBuilder<'_>) -> BoxedSystem,
    ) -> usize {
        let mut builder = ComponentSetBuilder::new(&mut self.components);
        let system = factory(&mut builder);
        let mask = builder.build();

        debug!(name = %system.name(), components = ?mask, "registered system");

        let slot = self.systems.insert(key, mask.clone(), system);

        self.with_system(slot, |system, world| system.initialize(world));

        if mask.is_empty() {
            return slot;
        }

        let qualified: Vec<_> = self
            .entities
            .iter()
            .filter(|&entity| {
                mask.is_subset(&self.entities.record(entity).enabled_components)
            })
            .collect();

        for entity in qualified {
            let Some(entry) = self.systems.get_mut(slot) else {
                break;
            };

            entry.members.push(entity);
            self.notify(slot, entity, true);
        }

        slot
    }

    #[track_caller]
    fn registered_mut<S: AnySystem>(&mut self) -> &mut S {
        self.system_mut().expect("system is running")
    }
}
