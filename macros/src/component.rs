use proc_macro::TokenStream;
use quote::quote;
use syn::parse::{Parse, ParseStream};
use syn::{parse_macro_input, DeriveInput, Generics, Ident, LitStr, Path};

use crate::crate_path;

pub fn derive(input: TokenStream) -> TokenStream {
    let DeriveComponent { ident, generics, name, crate_path } =
        parse_macro_input!(input);
    let (impl_generics, type_generics, where_clause) =
        generics.split_for_impl();

    // only override `Component::name` when asked to
    let name = name.map(|name| {
        quote! {
            fn name() -> &'static str {
                #name
            }
        }
    });

    quote! {
        #[automatically_derived]
        impl #impl_generics ::#crate_path::component::Component
            for #ident #type_generics
        #where_clause
        {
            #name
        }
    }
    .into()
}

struct DeriveComponent {
    ident: Ident,
    generics: Generics,
    name: Option<LitStr>,
    crate_path: Path,
}

impl Parse for DeriveComponent {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let DeriveInput { attrs, ident, generics, .. } = input.parse()?;
        let crate_path = crate_path()?;
        let mut name = None;

        let attrs =
            attrs.iter().filter(|attr| attr.path().is_ident("component"));

        for attr in attrs {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    name = Some(meta.value()?.parse()?);

                    Ok(())
                } else {
                    Err(meta.error("expected `name = \"...\"`"))
                }
            })?;
        }

        Ok(Self { ident, generics, name, crate_path })
    }
}
