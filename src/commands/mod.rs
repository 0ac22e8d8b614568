//! Deferred structural changes to be applied to the world.
//!
//! Requests made while systems run only update presence masks and hierarchy
//! links immediately. Everything that changes what systems see is pushed as a
//! [`Command`] and applied when the world [flushes](crate::world::World::flush).

use std::collections::VecDeque;
use std::fmt;

use crate::component::ComponentId;
use crate::entity::EntityId;
use crate::world::World;

/// A deferred change, re-validated when applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Enables a component if it is still present and the entity is enabled
    /// in the hierarchy.
    EnableComponent { entity: EntityId, component: ComponentId },
    /// Brings every present component of an entity in line with its enabled
    /// state in the hierarchy.
    Refresh { entity: EntityId },
    /// Disables a component and releases its slot.
    RemoveComponent { entity: EntityId, component: ComponentId },
    /// Disables every component of an entity, releases its slots and frees it.
    RemoveEntity { entity: EntityId },
}

/// One of the two command queues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Queue {
    /// Drained first.
    Create,
    /// Drained after [`Queue::Create`].
    Remove,
}

/// The two FIFO queues of pending [commands](Command).
#[derive(Default, Clone)]
pub struct Commands {
    create: VecDeque<Command>,
    remove: VecDeque<Command>,
}

impl Command {
    /// Returns the queue this command is pushed to.
    pub const fn queue(&self) -> Queue {
        match self {
            Self::EnableComponent { .. } | Self::Refresh { .. } => {
                Queue::Create
            }
            Self::RemoveComponent { .. } | Self::RemoveEntity { .. } => {
                Queue::Remove
            }
        }
    }

    /// Returns the entity this command acts on.
    pub const fn entity(&self) -> EntityId {
        match *self {
            Self::EnableComponent { entity, .. }
            | Self::Refresh { entity }
            | Self::RemoveComponent { entity, .. }
            | Self::RemoveEntity { entity } => entity,
        }
    }

    /// Applies this command on a world.
    pub(crate) fn apply(self, world: &mut World) {
        match self {
            Self::EnableComponent { entity, component } => {
                world.enable_component(entity, component);
            }
            Self::Refresh { entity } => world.refresh(entity),
            Self::RemoveComponent { entity, component } => {
                world.release_component(entity, component);
            }
            Self::RemoveEntity { entity } => world.release_entity(entity),
        }
    }
}

impl Commands {
    /// Creates new empty queues.
    pub const fn new() -> Self {
        let create = VecDeque::new();
        let remove = VecDeque::new();

        Self { create, remove }
    }

    /// Returns the amount of pending commands in both queues.
    pub fn len(&self) -> usize {
        self.create.len() + self.remove.len()
    }

    /// Returns `true` if no command is pending.
    pub fn is_empty(&self) -> bool {
        self.create.is_empty() && self.remove.is_empty()
    }

    /// Returns the pending commands of a queue in order.
    pub fn iter(&self, queue: Queue) -> impl Iterator<Item = &Command> + '_ {
        self.queue(queue).iter()
    }

    /// Pushes a command to the back of its queue.
    pub(crate) fn push(&mut self, command: Command) {
        match command.queue() {
            Queue::Create => self.create.push_back(command),
            Queue::Remove => self.remove.push_back(command),
        }
    }

    /// Pops the command at the front of a queue.
    pub(crate) fn pop(&mut self, queue: Queue) -> Option<Command> {
        match queue {
            Queue::Create => self.create.pop_front(),
            Queue::Remove => self.remove.pop_front(),
        }
    }

    pub(crate) fn clear(&mut self) {
        self.create.clear();
        self.remove.clear();
    }

    fn queue(&self, queue: Queue) -> &VecDeque<Command> {
        match queue {
            Queue::Create => &self.create,
            Queue::Remove => &self.remove,
        }
    }
}

impl fmt::Debug for Commands {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Commands")
            .field("create", &self.create)
            .field("remove", &self.remove)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use super::*;

    fn entity(index: u32) -> EntityId {
        EntityId::new(index, NonZeroU32::MIN)
    }

    #[test]
    fn routes_by_queue() {
        let mut commands = Commands::new();

        commands.push(Command::RemoveEntity { entity: entity(0) });
        commands.push(Command::Refresh { entity: entity(1) });
        commands.push(Command::EnableComponent {
            entity: entity(2),
            component: ComponentId::new(0),
        });

        assert_eq!(commands.len(), 3);
        assert_eq!(commands.iter(Queue::Create).count(), 2);
        assert_eq!(commands.iter(Queue::Remove).count(), 1);

        assert_eq!(
            commands.pop(Queue::Create),
            Some(Command::Refresh { entity: entity(1) }),
        );
        assert_eq!(
            commands.pop(Queue::Create).map(|c| c.entity()),
            Some(entity(2)),
        );
        assert_eq!(commands.pop(Queue::Create), None);
        assert!(!commands.is_empty());

        commands.clear();

        assert!(commands.is_empty());
    }
}
