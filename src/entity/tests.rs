use crate::prelude::*;

#[derive(Component, Debug, Default, Clone, PartialEq)]
struct Transform {
    x: i32,
}

#[derive(Component, Debug, Default, Clone, PartialEq)]
struct Renderable {
    image: u32,
}

#[test]
fn removed_index_is_recycled_with_new_version() {
    let mut world = World::new();
    let old = world.create_entity().id();

    world.remove(old);
    world.flush();

    let new = world.create_entity().id();

    assert_eq!(new.index(), old.index());
    assert_eq!(new.version(), old.version() + 1);
    assert!(!world.contains(old));
    assert!(world.contains(new));
    assert_eq!(
        world.entity(old).unwrap_err().to_string(),
        format!("entity not found: {old:?}"),
    );
}

#[test]
fn children_keep_insertion_order() {
    let mut world = World::new();
    let parent = world.create_entity().id();
    let a = world.create_entity().id();
    let b = world.create_entity().id();

    assert_eq!(world.root_children(), [parent, a, b]);
    assert_eq!(world.parent(a), None);

    world.set_parent(b, Some(parent));
    world.set_parent(a, Some(parent));

    assert_eq!(world.root_children(), [parent]);
    assert_eq!(world.children(parent), [b, a]);
    assert_eq!(world.parent(a), Some(parent));

    world.set_parent(b, None);

    assert_eq!(world.root_children(), [parent, b]);
    assert_eq!(world.children(parent), [a]);
    assert_eq!(world.parent(b), None);
}

#[test]
fn world_enabled_follows_ancestors() {
    let mut world = World::new();
    let parent = world.create_entity().id();
    let child = world.create_entity().set_parent(Some(parent)).id();
    let grandchild = world.create_entity().set_parent(Some(child)).id();

    assert!(world.is_world_enabled(grandchild));

    world.set_enabled(parent, false);

    assert!(!world.is_world_enabled(child));
    assert!(!world.is_world_enabled(grandchild));
    assert!(world.is_enabled(grandchild));

    world.set_parent(child, None);

    assert!(world.is_world_enabled(grandchild));

    world.set_enabled(child, false);
    world.set_parent(child, Some(parent));
    world.set_enabled(parent, true);

    assert!(world.is_world_enabled(parent));
    assert!(!world.is_world_enabled(grandchild));
}

#[test]
fn pending_removal_detaches_subtree() {
    let mut world = World::new();
    let parent = world.create_entity().id();
    let child = world.create_entity().set_parent(Some(parent)).id();

    world.remove(parent);

    assert_eq!(world.len(), 2);
    assert!(world.contains(child));
    assert!(world.is_removed(child));
    assert!(!world.is_world_enabled(child));
    assert!(world.is_enabled(child));
    assert!(world.root_children().is_empty());
    assert!(world.children(parent).is_empty());
    assert_eq!(world.parent(child), None);
    assert_eq!(world.iter().count(), 0);

    world.flush();

    assert!(world.is_empty());
    assert!(!world.contains(child));
}

#[test]
#[should_panic = "to itself or its descendant"]
fn parent_to_self() {
    let mut world = World::new();
    let entity = world.create_entity().id();

    world.set_parent(entity, Some(entity));
}

#[test]
#[should_panic = "to itself or its descendant"]
fn parent_to_descendant() {
    let mut world = World::new();
    let parent = world.create_entity().id();
    let child = world.create_entity().set_parent(Some(parent)).id();
    let grandchild = world.create_entity().set_parent(Some(child)).id();

    world.set_parent(parent, Some(grandchild));
}

#[test]
#[should_panic = "entity not found or being removed"]
fn parent_to_removed_entity() {
    let mut world = World::new();
    let entity = world.create_entity().id();
    let removed = world.create_entity().id();

    world.remove(removed);
    world.set_parent(entity, Some(removed));
}

#[test]
fn reparenting_removed_entity_does_nothing() {
    let mut world = World::new();
    let parent = world.create_entity().id();
    let removed = world.create_entity().id();

    world.remove(removed);
    world.set_parent(removed, Some(parent));

    assert!(world.children(parent).is_empty());
    assert_eq!(world.parent(removed), None);
}

#[test]
fn clone_copies_subtree() {
    let mut world = World::new();
    let parent = world.create_entity().with(|t: &mut Transform| t.x = 3).id();
    let child = world
        .create_entity()
        .set_parent(Some(parent))
        .with(|t: &mut Transform| t.x = 4)
        .with(|_: &mut Renderable| {})
        .set_enabled(false)
        .id();

    world.update(0.0);

    let copy = world.clone_entity(parent);

    assert_eq!(world.root_children(), [parent, copy]);
    assert_eq!(
        world.get_component::<Transform>(copy),
        Some(&Transform { x: 3 }),
    );

    let &[child_copy] = world.children(copy) else {
        panic!("expected a single child");
    };

    assert_ne!(child_copy, child);
    assert!(!world.is_enabled(child_copy));
    assert!(world.has_component::<Renderable>(child_copy));
    assert_eq!(world.pool::<Transform>().unwrap().len(), 4);

    world.get_component_mut::<Transform>(child_copy).unwrap().x = 5;

    assert_eq!(world.get_component::<Transform>(child).unwrap().x, 4);
    assert!(!world.is_component_enabled::<Transform>(copy));

    world.update(0.0);

    assert!(world.is_component_enabled::<Transform>(copy));
    assert!(!world.is_component_enabled::<Transform>(child_copy));
}

#[test]
fn entity_handles() {
    let mut world = World::new();
    let parent = world.create_entity().id();
    let entity = world
        .create_entity()
        .set_parent(Some(parent))
        .with(|t: &mut Transform| t.x = 1)
        .id();

    let handle = world.entity(entity).unwrap();

    assert_eq!(handle.id(), entity);
    assert_eq!(handle.parent(), Some(parent));
    assert_eq!(world.entity(parent).unwrap().children(), [entity]);
    assert!(handle.contains::<Transform>());
    assert_eq!(handle.get::<Transform>().unwrap().x, 1);

    let error = handle.get::<Renderable>().unwrap_err();

    assert_eq!(error.entity, entity);
    assert_eq!(
        error.to_string(),
        format!(
            "component `{}` not found on entity {entity:?}",
            std::any::type_name::<Renderable>(),
        ),
    );

    let mut handle = world.entity_mut(entity).unwrap();

    handle.get_mut::<Transform>().unwrap().x = 2;
    handle.set_enabled(false).remove::<Transform>();

    assert!(!handle.as_ref().is_enabled());
    assert!(handle.contains::<Transform>());

    handle.world_mut().flush();

    assert!(!handle.contains::<Transform>());

    handle.despawn();

    assert!(world.is_removed(entity));
    assert!(world.entity(entity).unwrap().is_removed());

    world.flush();

    assert!(matches!(
        world.entity_mut(entity),
        Err(EntityNotFound(id)) if id == entity,
    ));
}
