mod escape;
mod matchable;
mod parsing;
mod tokens;

/// Turns an enum into a closed variant type. See the `matchable` crate for the options.
#[proc_macro_attribute]
pub fn matchable(
    attr: proc_macro::TokenStream,
    item: proc_macro::TokenStream,
) -> proc_macro::TokenStream {
    let (Ok(tokens) | Err(tokens)) =
        matchable::matchable(attr.into(), item.into()).map_err(|e| e.into_compile_error());
    tokens.into()
}
