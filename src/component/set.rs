use super::{Component, ComponentId, Components};
use crate::storage::ComponentMask;

/// A list of component types, implemented for components and tuples of them.
///
/// Used by [`System::Components`](crate::system::System::Components) to
/// declare the components a system requires.
pub trait ComponentList: 'static {
    /// Inserts every component of this list into the builder.
    fn components(builder: &mut ComponentSetBuilder<'_>);
}

/// Builder for the required mask of a system.
pub struct ComponentSetBuilder<'w> {
    mask: ComponentMask,
    components: &'w mut Components,
}

impl<C: Component> ComponentList for C {
    fn components(builder: &mut ComponentSetBuilder<'_>) {
        builder.insert::<C>();
    }
}

impl<'w> ComponentSetBuilder<'w> {
    pub(crate) fn new(components: &'w mut Components) -> Self {
        let mask = ComponentMask::new();

        Self { mask, components }
    }

    /// Inserts a component, registering its pool if necessary.
    pub fn insert<C: Component>(&mut self) -> ComponentId {
        let id = self.components.register::<C>();

        self.mask.insert(id);

        id
    }

    /// Inserts an already registered component.
    ///
    /// # Panics
    ///
    /// Panics if the component isn't registered.
    #[track_caller]
    pub fn insert_id(&mut self, id: ComponentId) {
        assert!(
            self.components.get(id).is_some(),
            "unknown component: {id:?}",
        );

        self.mask.insert(id);
    }

    /// Inserts every component of a list.
    pub fn extend<L: ComponentList>(&mut self) {
        L::components(self);
    }

    pub(crate) fn build(self) -> ComponentMask {
        self.mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Component, Default, Clone)]
    struct A;

    #[derive(Component, Default, Clone)]
    struct B;

    #[derive(Component, Default, Clone)]
    struct C;

    #[test]
    fn tuples_insert_every_member() {
        let mut components = Components::new(64);

        components.register::<C>();

        let mut builder = ComponentSetBuilder::new(&mut components);

        builder.extend::<(A, (B, A))>();

        let mask = builder.build();

        assert_eq!(mask.len(), 2);
        assert!(!mask.contains(ComponentId::new(0)));
        assert!(mask.contains(components.id::<A>().unwrap()));
        assert!(mask.contains(components.id::<B>().unwrap()));
    }

    #[test]
    fn unit_is_empty() {
        let mut components = Components::new(64);
        let mut builder = ComponentSetBuilder::new(&mut components);

        builder.extend::<()>();

        assert!(builder.build().is_empty());
    }
}
