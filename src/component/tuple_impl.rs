macro_rules! tuple_impl {
    ($($c:ident),*) => {
        tuple_impl!([] [$($c)*]);
    };

    ([$($c:ident)*] []) => {
        impl<$($c),*> crate::component::ComponentList for ($($c,)*)
        where
            $($c: crate::component::ComponentList),*
        {
            #[allow(unused)]
            fn components(
                builder: &mut crate::component::ComponentSetBuilder<'_>,
            ) {
                $($c::components(builder);)*
            }
        }
    };

    ([$($rest:ident)*]  [$head:ident $($tail:ident)*]) => {
        tuple_impl!([$($rest)*] []);
        tuple_impl!([$($rest)* $head] [$($tail)*]);
    };
}

tuple_impl!(C0, C1, C2, C3, C4, C5, C6, C7, C8, C9, C10, C11);
