//! Derive macros for `arborist`.

use proc_macro::TokenStream;

mod component;

/// Derives `Component` for a type.
///
/// The type must also implement `Default` and `Clone`. The registered name
/// defaults to the type name and can be overridden:
///
/// ```ignore
/// #[derive(Default, Clone, Component)]
/// #[component(name = "Transform")]
/// struct Transform { x: f32 }
/// ```
#[proc_macro_derive(Component, attributes(component))]
pub fn derive_component(input: TokenStream) -> TokenStream {
    component::derive(input)
}

fn crate_path() -> syn::Result<syn::Path> {
    syn::parse_str(option_env!("ARBORIST_PATH").unwrap_or("arborist"))
}
