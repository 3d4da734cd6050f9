use syn::parse_quote;

pub(crate) fn crate_path() -> syn::Path {
    parse_quote!(::matchable)
}

pub(crate) fn private_module() -> syn::Path {
    parse_quote!(::matchable::__private)
}

/// The associated constant holding a property's key, `color` -> `COLOR`.
pub(crate) fn property_key_ident(name: &syn::Ident) -> syn::Ident {
    use syn::ext::IdentExt as _;

    let upper = name.unraw().to_string().to_uppercase();
    syn::Ident::new(&upper, name.span())
}
