use std::borrow::Cow;
use std::fmt;

use indexmap::IndexMap;

use super::AnySystem;
use crate::component::{ComponentId, TypeKey};
use crate::entity::EntityId;
use crate::storage::ComponentMask;

/// Registry of the systems of a world.
///
/// Slots are never reused, so slot order is registration order.
#[derive(Default)]
pub(crate) struct Systems {
    keys: IndexMap<TypeKey, usize>,
    entries: Vec<Option<SystemEntry>>,
    /// Component bit to the slots of the systems requiring it.
    interest: Vec<Vec<usize>>,
}

pub(crate) struct SystemEntry {
    pub name: Cow<'static, str>,
    pub mask: ComponentMask,
    /// Members in order of qualification.
    pub members: Vec<EntityId>,
    /// Taken out while one of the system's hooks runs.
    pub system: Option<Box<dyn AnySystem>>,
}

impl Systems {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn slot_of(&self, key: &TypeKey) -> Option<usize> {
        self.keys.get(key).copied()
    }

    /// Returns the slots of all registered systems in registration order.
    pub fn slots(&self) -> Vec<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(slot, entry)| entry.as_ref().map(|_| slot))
            .collect()
    }

    pub fn get(&self, slot: usize) -> Option<&SystemEntry> {
        self.entries.get(slot).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, slot: usize) -> Option<&mut SystemEntry> {
        self.entries.get_mut(slot).and_then(Option::as_mut)
    }

    pub fn entries_mut(&mut self) -> impl Iterator<Item = &mut SystemEntry> {
        self.entries.iter_mut().flatten()
    }

    /// The slots of the systems whose mask includes the component.
    pub fn interested(&self, component: ComponentId) -> &[usize] {
        self.interest
            .get(component.index())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Registers a system, returning its slot.
    pub fn insert(
        &mut self,
        key: TypeKey,
        mask: ComponentMask,
        system: Box<dyn AnySystem>,
    ) -> usize {
        let slot = self.entries.len();

        for component in mask.iter() {
            if component.index() >= self.interest.len() {
                self.interest.resize_with(component.index() + 1, Vec::new);
            }

            self.interest[component.index()].push(slot);
        }

        self.entries.push(Some(SystemEntry {
            name: system.name(),
            mask,
            members: Vec::new(),
            system: Some(system),
        }));
        self.keys.insert(key, slot);

        slot
    }

    /// Unregisters a system.
    pub fn remove(&mut self, key: &TypeKey) -> Option<SystemEntry> {
        let slot = self.keys.shift_remove(key)?;
        let entry = self.entries.get_mut(slot)?.take()?;

        for component in entry.mask.iter() {
            self.interest[component.index()].retain(|&other| other != slot);
        }

        Some(entry)
    }

    /// Takes a system out of its slot so that it can borrow the world.
    pub fn take(&mut self, slot: usize) -> Option<Box<dyn AnySystem>> {
        self.get_mut(slot).and_then(|entry| entry.system.take())
    }

    /// Puts back a system taken with [`Systems::take`].
    ///
    /// The system is dropped if its slot was unregistered meanwhile.
    pub fn restore(&mut self, slot: usize, system: Box<dyn AnySystem>) {
        if let Some(entry) = self.get_mut(slot) {
            entry.system = Some(system);
        }
    }

    /// Drops every system.
    pub fn clear(&mut self) {
        self.keys.clear();
        self.entries.clear();
        self.interest.clear();
    }
}

impl fmt::Debug for Systems {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().flatten().map(|entry| {
                (&entry.name, (&entry.mask, entry.members.len()))
            }))
            .finish()
    }
}
