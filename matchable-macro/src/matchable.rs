use std::collections::HashMap;

use proc_macro2::TokenStream;
use quote::{ToTokens as _, quote};
use syn::{ext::IdentExt as _, spanned::Spanned as _};

use crate::{
    escape,
    parsing::{self, EnumOption, EnumOptions, ValueTarget, VariantOption},
    tokens,
};

enum Kind {
    Unit { display: String },
    Merged(syn::Type),
}

struct Variant {
    ident: syn::Ident,
    kind: Kind,
    values: Vec<(ValueTarget, syn::Expr)>,
}

impl Variant {
    fn pattern(&self, enum_ident: &syn::Ident) -> TokenStream {
        let ident = &self.ident;
        match self.kind {
            Kind::Unit { .. } => quote!(#enum_ident::#ident),
            Kind::Merged(_) => quote!(#enum_ident::#ident(_)),
        }
    }

    fn value(&self, target: ValueTarget) -> Option<&syn::Expr> {
        self.values
            .iter()
            .find(|(t, _)| *t == target)
            .map(|(_, expr)| expr)
    }
}

pub(crate) fn matchable(attr: TokenStream, item: TokenStream) -> syn::Result<TokenStream> {
    let mut item = match syn::parse2::<syn::Item>(item)? {
        syn::Item::Enum(item) => item,
        other => {
            return Err(syn::Error::new(
                other.span(),
                "matchable must be applied to an enum",
            ));
        }
    };

    let mut options: Vec<EnumOption> = syn::parse::Parser::parse2(
        parsing::CommaList::<EnumOption>::parse_terminated,
        attr,
    )?
    .into_iter()
    .collect();
    options.extend(parsing::take_options::<EnumOption>(&mut item.attrs)?);
    let options = EnumOptions::new(options)?;

    if !item.generics.params.is_empty() || item.generics.where_clause.is_some() {
        return Err(syn::Error::new(
            item.generics.span(),
            "matchable enums cannot be generic",
        ));
    }

    let variants = read_variants(&options, &mut item)?;

    let crate_path = tokens::crate_path();
    let private_module = tokens::private_module();
    let ident = &item.ident;
    let vis = &item.vis;
    let type_name = ident.unraw().to_string();

    let mut unit_count = 0usize;
    let mut merged_types = vec![];
    let mut index_arms = vec![];
    let mut as_str_arms = vec![];
    let mut identifier_arms = vec![];
    let mut table_pushes = vec![];
    let mut conversions = vec![];

    for variant in &variants {
        let offset = quote!(#unit_count #(+ <#merged_types as #crate_path::Matchable>::COUNT)*);
        let variant_ident = &variant.ident;

        match &variant.kind {
            Kind::Unit { display } => {
                let identifier = variant_ident.to_string();
                index_arms.push(quote!(#ident::#variant_ident => #offset));
                as_str_arms.push(quote!(#ident::#variant_ident => #display));
                identifier_arms.push(quote!(#ident::#variant_ident => #identifier));
                table_pushes.push(quote!(variants.push(#ident::#variant_ident);));
                unit_count += 1;
            }
            Kind::Merged(ty) => {
                index_arms.push(quote! {
                    #ident::#variant_ident(inner) => #offset + #crate_path::Matchable::declaration_index(inner)
                });
                as_str_arms.push(quote! {
                    #ident::#variant_ident(inner) => #crate_path::Matchable::as_str(inner)
                });
                identifier_arms.push(quote! {
                    #ident::#variant_ident(inner) => #crate_path::Matchable::identifier_str(inner)
                });
                table_pushes.push(quote! {
                    variants.extend(
                        <#ty as #crate_path::Matchable>::variants()
                            .iter()
                            .copied()
                            .map(#ident::#variant_ident),
                    );
                });

                conversions.push(quote! {
                    impl #private_module::From<#ty> for #ident {
                        fn from(value: #ty) -> Self {
                            #ident::#variant_ident(value)
                        }
                    }

                    impl #private_module::TryFrom<#ident> for #ty {
                        type Error = #ident;

                        #[allow(irrefutable_let_patterns)]
                        fn try_from(value: #ident) -> #private_module::Result<Self, #ident> {
                            if let #ident::#variant_ident(value) = value {
                                #private_module::Ok(value)
                            } else {
                                #private_module::Err(value)
                            }
                        }
                    }
                });

                merged_types.push(ty.clone());
            }
        }
    }

    let count = quote!(#unit_count #(+ <#merged_types as #crate_path::Matchable>::COUNT)*);

    let spread_fns = options.spreads.iter().enumerate().map(|(index, declared)| {
        let name = &declared.name;
        let ty = &declared.ty;
        let arms = variants.iter().map(|variant| {
            let pattern = variant.pattern(ident);
            match variant.value(ValueTarget::Spread(index)) {
                Some(expr) => quote!(#pattern => #private_module::Some(#expr)),
                None => quote!(#pattern => #private_module::None),
            }
        });

        quote! {
            #vis fn #name(self) -> #private_module::Option<#ty> {
                match self {
                    #(#arms,)*
                }
            }
        }
    });

    let spread_vect_fns = options.spread_vects.iter().enumerate().map(|(index, declared)| {
        let name = &declared.name;
        let ty = &declared.ty;
        let arms = variants.iter().map(|variant| {
            let pattern = variant.pattern(ident);
            match variant.value(ValueTarget::SpreadVect(index)) {
                Some(expr) => quote! {
                    #pattern => {
                        const VALUES: &[#ty] = &#expr;
                        VALUES
                    }
                },
                None => quote!(#pattern => &[]),
            }
        });

        quote! {
            #vis fn #name(self) -> &'static [#ty] {
                match self {
                    #(#arms,)*
                }
            }
        }
    });

    let property_consts = options.properties.iter().map(|declared| {
        let key_ident = tokens::property_key_ident(&declared.name);
        let key = declared.key();
        let ty = &declared.ty;
        quote! {
            #vis const #key_ident: #crate_path::PropertyKey<#ident, #ty> =
                #crate_path::PropertyKey::new(#key);
        }
    });

    // `Self::KEY` would resolve to a variant of the same name.
    let property_key = |declared: &parsing::Declared| {
        let key = declared.key();
        let ty = &declared.ty;
        quote!(#crate_path::PropertyKey::<#ident, #ty>::new(#key))
    };

    let mut initial_values = vec![];
    for variant in &variants {
        let variant_ident = &variant.ident;
        for (target, expr) in &variant.values {
            match *target {
                ValueTarget::Property(index) => {
                    let key = property_key(&options.properties[index]);
                    initial_values.push(quote! {
                        registry.set(&#key, #ident::#variant_ident, #expr);
                    });
                }
                ValueTarget::PropertyVect(index) => {
                    let key = property_key(&options.properties[index]);
                    initial_values.push(quote! {
                        registry.set_vect(
                            &#key,
                            #ident::#variant_ident,
                            #private_module::Vec::from(#expr),
                        );
                    });
                }
                ValueTarget::Spread(_) | ValueTarget::SpreadVect(_) => {}
            }
        }
    }
    let init_properties = (!initial_values.is_empty()).then(|| {
        quote! {
            fn init_properties(registry: &mut #crate_path::Registry<Self>) {
                #(#initial_values)*
            }
        }
    });

    let serde = options.serde.map(|span| {
        let serde_crate = quote::quote_spanned!(span=> #private_module::serde::serde_crate);
        quote! {
            impl #serde_crate::Serialize for #ident {
                fn serialize<__S>(&self, serializer: __S) -> #private_module::Result<__S::Ok, __S::Error>
                where
                    __S: #serde_crate::Serializer,
                {
                    #crate_path::serde::serialize(self, serializer)
                }
            }

            impl<'de> #serde_crate::Deserialize<'de> for #ident {
                fn deserialize<__D>(deserializer: __D) -> #private_module::Result<Self, __D::Error>
                where
                    __D: #serde_crate::Deserializer<'de>,
                {
                    #crate_path::serde::deserialize(deserializer)
                }
            }
        }
    });

    Ok(quote! {
        #[derive(
            ::core::clone::Clone,
            ::core::marker::Copy,
            ::core::cmp::PartialEq,
            ::core::cmp::Eq,
            ::core::hash::Hash,
            ::core::fmt::Debug,
        )]
        #item

        const _: () = {
            impl #crate_path::Matchable for #ident {
                const TYPE_NAME: &'static str = #type_name;
                const COUNT: usize = #count;

                fn tables() -> &'static #private_module::Tables<Self> {
                    static TABLES: #private_module::OnceLock<#private_module::Tables<#ident>> =
                        #private_module::OnceLock::new();
                    TABLES.get_or_init(|| {
                        #[allow(unused_mut)]
                        let mut variants = #private_module::Vec::<#ident>::with_capacity(
                            <#ident as #crate_path::Matchable>::COUNT,
                        );
                        #(#table_pushes)*
                        #private_module::Tables::new(variants)
                    })
                }

                fn declaration_index(self) -> usize {
                    match self {
                        #(#index_arms,)*
                    }
                }

                fn as_str(self) -> &'static str {
                    match self {
                        #(#as_str_arms,)*
                    }
                }

                fn identifier_str(self) -> &'static str {
                    match self {
                        #(#identifier_arms,)*
                    }
                }

                #init_properties
            }

            impl #private_module::PartialOrd for #ident {
                fn partial_cmp(&self, other: &Self) -> #private_module::Option<#private_module::Ordering> {
                    #private_module::Some(#private_module::Ord::cmp(self, other))
                }
            }

            impl #private_module::Ord for #ident {
                fn cmp(&self, other: &Self) -> #private_module::Ordering {
                    #private_module::Ord::cmp(
                        &#crate_path::Matchable::declaration_index(*self),
                        &#crate_path::Matchable::declaration_index(*other),
                    )
                }
            }

            impl #private_module::fmt::Display for #ident {
                fn fmt(&self, f: &mut #private_module::fmt::Formatter<'_>) -> #private_module::fmt::Result {
                    f.write_str(#crate_path::Matchable::as_str(*self))
                }
            }

            impl #private_module::FromStr for #ident {
                type Err = #crate_path::UnknownVariant;

                fn from_str(s: &str) -> #private_module::Result<Self, #crate_path::UnknownVariant> {
                    <Self as #crate_path::Matchable>::from_string(s)
                        .ok_or_else(|| #crate_path::UnknownVariant::new::<Self>(s))
                }
            }

            impl #ident {
                #(#spread_fns)*
                #(#spread_vect_fns)*
                #(#property_consts)*
            }

            #(#conversions)*

            #serde
        };
    })
}

fn read_variants(options: &EnumOptions, item: &mut syn::ItemEnum) -> syn::Result<Vec<Variant>> {
    let mut variants = vec![];
    let mut result = Ok(());

    for variant in &mut item.variants {
        match read_variant(options, variant) {
            Ok(variant) => variants.push(variant),
            Err(e) => parsing::combine(&mut result, e),
        }
    }
    result?;

    let mut result = Ok(());
    let mut displays = HashMap::new();
    let mut merged = HashMap::new();
    for variant in &variants {
        let duplicate = match &variant.kind {
            Kind::Unit { display } => displays
                .insert(display.clone(), &variant.ident)
                .map(|_| format!("display string \"{display}\" is used twice")),
            Kind::Merged(ty) => {
                let ty = ty.to_token_stream().to_string();
                merged
                    .insert(ty.clone(), &variant.ident)
                    .map(|_| format!("`{ty}` is merged twice"))
            }
        };
        if let Some(message) = duplicate {
            parsing::combine(&mut result, syn::Error::new(variant.ident.span(), message));
        }
    }

    result.map(|()| variants)
}

fn read_variant(options: &EnumOptions, variant: &mut syn::Variant) -> syn::Result<Variant> {
    let variant_options: Vec<VariantOption> = parsing::take_options(&mut variant.attrs)?;

    if let Some((eq, _)) = &variant.discriminant {
        return Err(syn::Error::new(
            eq.span(),
            "matchable variants cannot have explicit discriminants",
        ));
    }

    let mut rename: Option<syn::LitStr> = None;
    let mut values: Vec<(ValueTarget, syn::Expr)> = vec![];
    for option in variant_options {
        match option {
            VariantOption::Rename { name, .. } => {
                if rename.is_some() {
                    return Err(syn::Error::new(name.span(), "variant is renamed twice"));
                }
                rename = Some(name);
            }
            VariantOption::Value { name, value, .. } => {
                let target = options.target(&name)?;
                if values.iter().any(|(t, _)| *t == target) {
                    return Err(syn::Error::new(
                        name.span(),
                        format!("`{}` is given twice", name.unraw()),
                    ));
                }
                values.push((target, value));
            }
        }
    }

    let kind = match &variant.fields {
        syn::Fields::Unit => {
            let display = match &rename {
                Some(rename) => rename.value(),
                None => {
                    let identifier = variant.ident.unraw().to_string();
                    if options.unescape {
                        escape::unescape(&identifier)
                    } else {
                        identifier
                    }
                }
            };
            Kind::Unit { display }
        }
        syn::Fields::Unnamed(fields) if fields.unnamed.len() == 1 => {
            if let Some(rename) = &rename {
                return Err(syn::Error::new(
                    rename.span(),
                    "merged variants keep the display strings of their source type",
                ));
            }
            if let Some((_, expr)) = values.first() {
                return Err(syn::Error::new(
                    expr.span(),
                    "merged variants cannot be given spread or property values",
                ));
            }
            Kind::Merged(fields.unnamed[0].ty.clone())
        }
        fields => {
            return Err(syn::Error::new(
                fields.span(),
                "matchable variants must be unit variants or single-field tuple variants",
            ));
        }
    };

    Ok(Variant {
        ident: variant.ident.clone(),
        kind,
        values,
    })
}
