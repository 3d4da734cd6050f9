use proc_macro2::{Span, TokenStream};
use syn::{ext::IdentExt as _, spanned::Spanned as _};

pub(crate) type CommaList<T> = syn::punctuated::Punctuated<T, syn::Token![,]>;

pub(crate) const ATTR_IDENT: &str = "matchable";

mod kw {
    syn::custom_keyword!(serde);
    syn::custom_keyword!(unescape);
    syn::custom_keyword!(spread);
    syn::custom_keyword!(spread_vect);
    syn::custom_keyword!(property);
    syn::custom_keyword!(rename);
}

#[derive(Clone, Default)]
pub(crate) struct Parened<T> {
    paren: syn::token::Paren,
    pub element: T,
}

impl<T: syn::parse::Parse> syn::parse::Parse for Parened<T> {
    fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
        let content;

        Ok(Self {
            paren: syn::parenthesized!(content in input),
            element: content.parse()?,
        })
    }
}

impl<T: quote::ToTokens> quote::ToTokens for Parened<T> {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let Self { paren, element } = self;

        paren.surround(tokens, |tokens| {
            element.to_tokens(tokens);
        });
    }
}

/// `name: Type`
#[derive(Clone)]
pub(crate) struct Declared {
    pub name: syn::Ident,
    colon: syn::Token![:],
    pub ty: syn::Type,
}

impl Declared {
    /// The name without any `r#` prefix.
    pub(crate) fn key(&self) -> String {
        self.name.unraw().to_string()
    }
}

impl syn::parse::Parse for Declared {
    fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
        Ok(Self {
            name: input.parse()?,
            colon: input.parse()?,
            ty: input.parse()?,
        })
    }
}

impl quote::ToTokens for Declared {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let Self { name, colon, ty } = self;

        name.to_tokens(tokens);
        colon.to_tokens(tokens);
        ty.to_tokens(tokens);
    }
}

/// One option of `#[matchable(...)]` on the enum.
pub(crate) enum EnumOption {
    Serde(kw::serde),
    Unescape(kw::unescape),
    Spread(kw::spread, Parened<Declared>),
    SpreadVect(kw::spread_vect, Parened<Declared>),
    Property(kw::property, Parened<Declared>),
}

impl syn::parse::Parse for EnumOption {
    fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
        let lookahead = input.lookahead1();
        let option = if lookahead.peek(kw::serde) {
            Self::Serde(input.parse()?)
        } else if lookahead.peek(kw::unescape) {
            Self::Unescape(input.parse()?)
        } else if lookahead.peek(kw::spread) {
            Self::Spread(input.parse()?, input.parse()?)
        } else if lookahead.peek(kw::spread_vect) {
            Self::SpreadVect(input.parse()?, input.parse()?)
        } else if lookahead.peek(kw::property) {
            Self::Property(input.parse()?, input.parse()?)
        } else {
            return Err(lookahead.error());
        };

        Ok(option)
    }
}

impl quote::ToTokens for EnumOption {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        match self {
            Self::Serde(kw) => kw.to_tokens(tokens),
            Self::Unescape(kw) => kw.to_tokens(tokens),
            Self::Spread(kw, declared) => {
                kw.to_tokens(tokens);
                declared.to_tokens(tokens);
            }
            Self::SpreadVect(kw, declared) => {
                kw.to_tokens(tokens);
                declared.to_tokens(tokens);
            }
            Self::Property(kw, declared) => {
                kw.to_tokens(tokens);
                declared.to_tokens(tokens);
            }
        }
    }
}

/// One option of `#[matchable(...)]` on a variant.
pub(crate) enum VariantOption {
    Rename {
        rename: kw::rename,
        eq: syn::Token![=],
        name: syn::LitStr,
    },
    /// `spread = expr`, `property = expr` or `property_vect = [..]`
    Value {
        name: syn::Ident,
        eq: syn::Token![=],
        value: syn::Expr,
    },
}

impl syn::parse::Parse for VariantOption {
    fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
        if input.peek(kw::rename) && input.peek2(syn::Token![=]) {
            Ok(Self::Rename {
                rename: input.parse()?,
                eq: input.parse()?,
                name: input.parse()?,
            })
        } else {
            Ok(Self::Value {
                name: input.parse()?,
                eq: input.parse()?,
                value: input.parse()?,
            })
        }
    }
}

/// Removes every `#[matchable(...)]` from `attrs`, parsing each as a list of `T`.
pub(crate) fn take_options<T: syn::parse::Parse>(
    attrs: &mut Vec<syn::Attribute>,
) -> syn::Result<Vec<T>> {
    let mut options = vec![];
    let mut result = Ok(());

    attrs.retain(|attr| {
        if !attr.path().is_ident(ATTR_IDENT) {
            return true;
        }
        match attr.parse_args_with(CommaList::<T>::parse_terminated) {
            Ok(list) => options.extend(list),
            Err(e) => combine(&mut result, e),
        }
        false
    });

    result.map(|()| options)
}

pub(crate) fn combine(result: &mut syn::Result<()>, error: syn::Error) {
    match result {
        Ok(()) => *result = Err(error),
        Err(existing) => existing.combine(error),
    }
}

/// Everything given on the enum, merged across all its `#[matchable(...)]` attributes.
#[derive(Default)]
pub(crate) struct EnumOptions {
    pub serde: Option<Span>,
    pub unescape: bool,
    pub spreads: Vec<Declared>,
    pub spread_vects: Vec<Declared>,
    pub properties: Vec<Declared>,
}

/// What a variant-level `name = value` refers to.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum ValueTarget {
    Spread(usize),
    SpreadVect(usize),
    Property(usize),
    PropertyVect(usize),
}

impl EnumOptions {
    pub(crate) fn new(options: Vec<EnumOption>) -> syn::Result<Self> {
        let mut this = Self::default();
        let mut result = Ok(());

        for option in options {
            let span = option.span();
            match option {
                EnumOption::Serde(_) => {
                    if this.serde.replace(span).is_some() {
                        combine(&mut result, syn::Error::new(span, "serde is given twice"));
                    }
                }
                EnumOption::Unescape(_) => this.unescape = true,
                EnumOption::Spread(_, declared) => this.spreads.push(declared.element),
                EnumOption::SpreadVect(_, declared) => this.spread_vects.push(declared.element),
                EnumOption::Property(_, declared) => this.properties.push(declared.element),
            }
        }

        let mut seen = std::collections::HashSet::new();
        for declared in this.declared() {
            let key = declared.key();
            if !seen.insert(key.clone()) {
                combine(
                    &mut result,
                    syn::Error::new(declared.name.span(), format!("`{key}` is declared twice")),
                );
            }
        }

        result.map(|()| this)
    }

    fn declared(&self) -> impl Iterator<Item = &Declared> {
        self.spreads
            .iter()
            .chain(&self.spread_vects)
            .chain(&self.properties)
    }

    pub(crate) fn target(&self, name: &syn::Ident) -> syn::Result<ValueTarget> {
        let key = name.unraw().to_string();
        let find = |list: &[Declared], key: &str| list.iter().position(|d| d.key() == key);

        if let Some(index) = find(&self.spreads, &key) {
            Ok(ValueTarget::Spread(index))
        } else if let Some(index) = find(&self.spread_vects, &key) {
            Ok(ValueTarget::SpreadVect(index))
        } else if let Some(index) = find(&self.properties, &key) {
            Ok(ValueTarget::Property(index))
        } else if let Some(index) = key
            .strip_suffix("_vect")
            .and_then(|base| find(&self.properties, base))
        {
            Ok(ValueTarget::PropertyVect(index))
        } else {
            Err(syn::Error::new(
                name.span(),
                format!("no spread or property named `{key}`"),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use syn::parse_quote;

    use super::*;

    #[test]
    fn enum_options() {
        let list: CommaList<EnumOption> = parse_quote! {
            serde, spread(floor: Floor), spread_vect(neighbors: Room), property(color: Option<Color>)
        };
        let options = EnumOptions::new(list.into_iter().collect()).unwrap();
        assert!(options.serde.is_some());
        assert!(!options.unescape);
        assert_eq!(options.spreads[0].key(), "floor");
        assert_eq!(options.spread_vects[0].key(), "neighbors");
        assert_eq!(options.properties[0].key(), "color");

        assert_eq!(
            options.target(&parse_quote!(floor)).unwrap(),
            ValueTarget::Spread(0)
        );
        assert_eq!(
            options.target(&parse_quote!(color_vect)).unwrap(),
            ValueTarget::PropertyVect(0)
        );
        assert!(options.target(&parse_quote!(missing)).is_err());
    }

    #[test]
    fn duplicate_names() {
        let list: CommaList<EnumOption> = parse_quote! {
            spread(x: A), property(x: B)
        };
        assert!(EnumOptions::new(list.into_iter().collect()).is_err());
    }

    #[test]
    fn take_options_keeps_other_attrs() {
        let mut attrs: Vec<syn::Attribute> = vec![
            parse_quote!(#[doc = "docs"]),
            parse_quote!(#[matchable(rename = "x y")]),
            parse_quote!(#[matchable(floor = Floor::Tile)]),
        ];
        let options: Vec<VariantOption> = take_options(&mut attrs).unwrap();
        assert_eq!(attrs.len(), 1);
        assert_eq!(options.len(), 2);
        assert!(matches!(&options[0], VariantOption::Rename { name, .. } if name.value() == "x y"));
    }
}
