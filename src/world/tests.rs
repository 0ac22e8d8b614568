use std::cell::Cell;
use std::rc::Rc;

use crate::prelude::*;

#[derive(Component, Debug, Clone, PartialEq)]
struct Transform {
    x: i32,
}

impl Default for Transform {
    fn default() -> Self {
        Self { x: 666 }
    }
}

#[derive(Component, Debug, Default, Clone, PartialEq)]
struct Renderable {
    image: u32,
}

#[derive(Default)]
struct RenderSystem {
    added: usize,
    removed: usize,
}

impl RenderSystem {
    fn count(&self) -> usize {
        self.added - self.removed
    }
}

impl System for RenderSystem {
    type Components = (Transform, Renderable);

    fn object_added(&mut self, _entity: EntityId, _world: &mut World) {
        self.added += 1;
    }

    fn object_removed(&mut self, _entity: EntityId, _world: &mut World) {
        self.removed += 1;
    }
}

fn renderable(world: &mut World) -> EntityId {
    world
        .create_entity()
        .with(|_: &mut Transform| {})
        .with(|_: &mut Renderable| {})
        .id()
}

#[test]
fn create_entity() {
    let mut world = World::new();
    let entity = world.create_entity().id();

    assert_eq!(world.len(), 1);
    assert_eq!(world.root_children(), [entity]);
    assert!(world.contains(entity));
    assert!(world.is_world_enabled(entity));
}

#[test]
fn remove_applies_on_flush() {
    let mut world = World::new();
    let entity = world.create_entity().id();

    world.remove(entity);

    // detached right away, freed on flush
    assert!(world.root_children().is_empty());
    assert!(world.contains(entity));
    assert!(world.is_removed(entity));
    assert_eq!(world.len(), 1);

    world.update(0.0);

    assert!(!world.contains(entity));
    assert!(world.is_empty());
}

#[test]
fn remove_twice_is_noop() {
    let mut world = World::new();
    let entity = world.create_entity().id();

    world.remove(entity);
    world.remove(entity);

    assert_eq!(world.commands().len(), 1);

    world.update(0.0);
    world.remove(entity);

    assert!(world.commands().is_empty());
}

#[test]
fn clear_removes_every_entity() {
    let mut world = World::new();
    let entities: Vec<_> = (0..10).map(|_| renderable(&mut world)).collect();

    world.update(0.0);
    world.clear();

    assert!(world.is_empty());
    assert!(world.root_children().is_empty());
    assert!(world.commands().is_empty());
    assert_eq!(world.pool::<Transform>().unwrap().len(), 0);

    for entity in entities {
        assert!(!world.contains(entity));
    }
}

#[test]
fn clear_keeps_types_and_systems() {
    let mut world = World::new();

    world.create_system::<RenderSystem>();
    renderable(&mut world);
    world.update(0.0);

    assert_eq!(world.system::<RenderSystem>().unwrap().count(), 1);

    world.clear();

    assert_eq!(world.system::<RenderSystem>().unwrap().count(), 0);
    assert!(world.members::<RenderSystem>().is_empty());
    assert!(world.component_id::<Transform>().is_some());

    renderable(&mut world);
    world.update(0.0);

    assert_eq!(world.system::<RenderSystem>().unwrap().count(), 1);
}

#[test]
fn stale_ids_after_clear() {
    let mut world = World::new();
    let old = world.create_entity().id();

    world.clear();

    let new = world.create_entity().id();

    assert_eq!(new.index(), old.index());
    assert!(!world.contains(old));
    assert!(world.contains(new));
}

#[test]
fn add_component_twice_returns_existing() {
    let mut world = World::new();
    let entity = world.create_entity().id();

    world.add_component::<Transform>(entity).x = 4;

    assert_eq!(world.add_component::<Transform>(entity).x, 4);
    assert!(world.has_component::<Transform>(entity));
    assert_eq!(world.pool::<Transform>().unwrap().len(), 1);
    assert_eq!(world.commands().len(), 1);
}

#[test]
fn component_enabled_on_flush() {
    let mut world = World::new();
    let entity = world.create_entity().id();

    world.add_component::<Transform>(entity);

    assert!(world.has_component::<Transform>(entity));
    assert!(!world.is_component_enabled::<Transform>(entity));

    world.flush();

    assert!(world.is_component_enabled::<Transform>(entity));
}

#[test]
fn remove_component_applies_on_flush() {
    let mut world = World::new();
    let entity = world.create_entity().id();

    world.add_component::<Transform>(entity).x = 123;
    world.remove_component::<Transform>(entity);

    assert!(world.has_component::<Transform>(entity));
    assert_eq!(world.get_component::<Transform>(entity).unwrap().x, 123);

    world.update(0.0);

    assert!(!world.has_component::<Transform>(entity));
    assert_eq!(world.get_component::<Transform>(entity), None);
}

#[test]
fn readded_component_is_reset() {
    let mut world = World::new();
    let entity = world.create_entity().id();

    world.add_component::<Transform>(entity).x = 123;
    world.remove_component::<Transform>(entity);
    world.update(0.0);

    assert_eq!(world.add_component::<Transform>(entity).x, 666);
}

#[test]
fn repeated_removal_releases_once() {
    let mut world = World::new();
    let entity = world.create_entity().id();

    for i in 0..100 {
        if i % 3 == 0 {
            world.add_component::<Transform>(entity);
        } else {
            world.remove_component::<Transform>(entity);
        }
    }

    world.remove_component::<Transform>(entity);
    world.update(0.0);

    assert!(!world.has_component::<Transform>(entity));
    assert!(world.pool::<Transform>().unwrap().is_empty());
}

#[test]
fn remove_absent_component_is_noop() {
    let mut world = World::new();
    let entity = world.create_entity().id();

    world.remove_component::<Transform>(entity);
    world.add_component::<Renderable>(entity);
    world.flush();
    world.remove_component::<Transform>(entity);

    assert!(world.commands().is_empty());
}

#[test]
fn shared_component() {
    let mut world = World::new();
    let source = world.create_entity().id();
    let copy = world.create_entity().id();

    world.add_component::<Transform>(source).x = 123;

    assert_eq!(world.add_shared::<Transform>(copy, source).x, 123);

    world.get_component_mut::<Transform>(copy).unwrap().x = 7;

    assert_eq!(world.get_component::<Transform>(source).unwrap().x, 7);
    assert_eq!(world.pool::<Transform>().unwrap().len(), 1);

    // the value survives until every sharer released it
    world.remove_component::<Transform>(source);
    world.update(0.0);

    assert_eq!(world.get_component::<Transform>(copy).unwrap().x, 7);

    world.remove_component::<Transform>(copy);
    world.update(0.0);

    assert!(world.pool::<Transform>().unwrap().is_empty());
}

#[test]
fn cloned_component() {
    let mut world = World::new();
    let source = world.create_entity().id();
    let copy = world.create_entity().id();

    world.add_component::<Transform>(source).x = 123;

    assert_eq!(world.clone_component::<Transform>(copy, source).x, 123);

    world.get_component_mut::<Transform>(copy).unwrap().x = 1;

    assert_eq!(world.get_component::<Transform>(source).unwrap().x, 123);
    assert_eq!(world.pool::<Transform>().unwrap().len(), 2);
}

#[test]
#[should_panic = "has no component"]
fn share_missing_component() {
    let mut world = World::new();
    let source = world.create_entity().id();
    let copy = world.create_entity().id();

    world.add_shared::<Transform>(copy, source);
}

#[test]
#[should_panic = "entity not found"]
fn add_component_to_stale_entity() {
    let mut world = World::new();
    let entity = world.create_entity().id();

    world.remove(entity);
    world.flush();
    world.add_component::<Transform>(entity);
}

#[test]
fn trim_after_removal() {
    let mut world = World::new();

    world.create_entity();

    let b = world.create_entity().id();
    let c = world.create_entity().id();

    assert_eq!(world.len(), 3);
    assert_eq!(world.capacity(), 3);

    world.remove(b);
    world.remove(c);
    world.trim();

    // pending removals still hold their records
    assert_eq!(world.capacity(), 3);

    world.update(0.0);
    world.trim();

    assert_eq!(world.capacity(), 1);
    assert_eq!(world.len(), 1);
}

#[test]
fn trim_keeps_surviving_indices() {
    let mut world = World::new();
    let a = world.create_entity().with(|t: &mut Transform| t.x = 1).id();
    let b = world.create_entity().id();
    let c = world.create_entity().with(|t: &mut Transform| t.x = 3).id();

    world.remove(b);
    world.update(0.0);
    world.trim();

    assert_eq!(world.capacity(), 3);
    assert_eq!(world.len(), 2);
    assert_eq!(world.get_component::<Transform>(a).unwrap().x, 1);
    assert_eq!(world.get_component::<Transform>(c).unwrap().x, 3);
}

#[test]
fn trim_never_revives_ids() {
    let mut world = World::new();

    world.create_entity();

    let removed = world.create_entity().with(|t: &mut Transform| t.x = 2).id();

    world.remove(removed);
    world.update(0.0);
    world.trim();

    assert_eq!(world.capacity(), 1);
    assert!(world.pool::<Transform>().unwrap().is_empty());

    let new = world.create_entity().id();

    assert_eq!(new.index(), removed.index());
    assert!(!world.contains(removed));
    assert_eq!(world.get_component::<Transform>(new), None);
}

#[test]
fn creation_queue_drains_first() {
    let mut world = World::new();

    world.create_system::<RenderSystem>();

    let entity = renderable(&mut world);

    world.remove_component::<Renderable>(entity);
    world.update(0.0);

    let system = world.system::<RenderSystem>().unwrap();

    assert_eq!((system.added, system.removed), (1, 1));
    assert!(!world.has_component::<Renderable>(entity));
}

#[test]
fn drop_reports_removals_and_drops_systems() {
    struct Tracked {
        live: Rc<Cell<i32>>,
        drops: Rc<Cell<i32>>,
    }

    impl System for Tracked {
        type Components = (Transform, Renderable);

        fn object_added(&mut self, _entity: EntityId, _world: &mut World) {
            self.live.set(self.live.get() + 1);
        }

        fn object_removed(&mut self, _entity: EntityId, _world: &mut World) {
            self.live.set(self.live.get() - 1);
        }
    }

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.drops.set(self.drops.get() + 1);
        }
    }

    let live = Rc::new(Cell::new(0));
    let drops = Rc::new(Cell::new(0));

    {
        let mut world = World::new();

        world.add_system(Tracked { live: live.clone(), drops: drops.clone() });
        renderable(&mut world);
        world.update(0.0);

        assert_eq!(live.get(), 1);
    }

    assert_eq!(live.get(), 0);
    assert_eq!(drops.get(), 1);
}

#[test]
fn named_component_pool() {
    let mut world = World::new();
    let health = world.try_add_component_pool(
        TypeKey::named("Health"),
        "Health",
        || Box::new(Pool::<u32>::new()),
    );
    let again = world.try_add_component_pool(
        TypeKey::named("Health"),
        "Ignored",
        || unreachable!(),
    );

    assert_eq!(health, again);
    assert_eq!(world.component_name(health), "Health");
    assert_eq!(world.component_id_of(&TypeKey::named("Health")), Some(health));

    let entity = world.create_entity().id();

    *world.add_component_id(entity, health).downcast_mut::<u32>().unwrap() = 5;

    let value = world.get_component_dyn(entity, health).unwrap();

    assert_eq!(value.downcast_ref::<u32>(), Some(&5));
    assert!(world.has_component_id(entity, health));

    world.remove_component_id(entity, health);
    world.update(0.0);

    assert!(!world.has_component_id(entity, health));
    assert!(world.get_component_dyn(entity, health).is_none());
    assert_eq!(world.pool_dyn(health).len(), 0);
}

#[test]
fn component_ids_follow_first_use() {
    let mut world = World::new();
    let entity = world.create_entity().id();

    world.add_component::<Renderable>(entity);
    world.add_component::<Transform>(entity);

    let index = |id: Option<ComponentId>| id.map(ComponentId::index);

    assert_eq!(index(world.component_id::<Renderable>()), Some(0));
    assert_eq!(index(world.component_id::<Transform>()), Some(1));
    assert_eq!(world.component_count(), 2);
}

#[test]
#[should_panic = "exceeded the maximum of 1 component types"]
fn component_type_ceiling() {
    let mut world =
        World::with_config(WorldConfig::new().with_max_component_types(1));
    let entity = world.create_entity().id();

    world.add_component::<Transform>(entity);
    world.add_component::<Renderable>(entity);
}

#[test]
fn entity_capacity_is_reserved_not_used() {
    let world = World::with_config(WorldConfig::new().with_entity_capacity(16));

    assert_eq!(world.capacity(), 0);
    assert_eq!(world.config().entity_capacity, 16);
    assert_eq!(world.config().max_component_types, 64);
}

#[test]
fn pending_commands() {
    let mut world = World::new();
    let entity = world.create_entity().id();

    world.add_component::<Transform>(entity);
    world.remove(entity);

    let commands = world.commands();
    let create: Vec<_> = commands.iter(Queue::Create).copied().collect();
    let remove: Vec<_> = commands.iter(Queue::Remove).copied().collect();
    let component = world.component_id::<Transform>().unwrap();

    assert_eq!(create, [Command::EnableComponent { entity, component }]);
    assert_eq!(remove, [Command::RemoveEntity { entity }]);

    world.flush();

    assert!(world.commands().is_empty());
    assert!(world.pool::<Transform>().unwrap().is_empty());
}
