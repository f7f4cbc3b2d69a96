use std::collections::HashMap;

use proc_macro::TokenStream;
use quote::quote;
use syn::{
    Data, DeriveInput, Error, Fields, Ident, LitStr, Result, Token, Variant, parenthesized,
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
};

pub(crate) fn expand_charset_names(input: &DeriveInput) -> Result<TokenStream> {
    let Data::Enum(data) = &input.data else {
        Err(Error::new(
            input.span(),
            "`CharsetNames` may only be derived on enums.",
        ))?
    };

    let variants = data
        .variants
        .iter()
        .map(VariantMetadata::parse)
        .collect::<Result<Vec<_>>>()?;

    // Names are matched case-insensitively, so they must be unique that way
    // across every variant.
    let mut seen: HashMap<String, Ident> = HashMap::new();

    for variant in &variants {
        for name in variant.names() {
            let key = name.value().to_ascii_lowercase();

            if let Some(other) = seen.insert(key, variant.ident.clone()) {
                Err(Error::new(
                    name.span(),
                    format!("Charset name `{}` is already used by `{other}`.", name.value()),
                ))?;
            }
        }
    }

    let all = variants.iter().map(|v| {
        let ident = &v.ident;
        quote! { Self::#ident }
    });

    let canonical = variants.iter().map(|v| {
        let VariantMetadata { ident, name, .. } = v;
        quote! { Self::#ident => #name, }
    });

    let aliases = variants.iter().map(|v| {
        let VariantMetadata { ident, aliases, .. } = v;
        quote! { Self::#ident => &[#(#aliases),*], }
    });

    let name = &input.ident;

    let expanded = quote! {
        impl CharsetNames for #name {
            const ALL: &'static [Self] = &[#(#all),*];

            fn canonical_name(&self) -> &'static str {
                match self {
                    #(#canonical)*
                }
            }

            fn aliases(&self) -> &'static [&'static str] {
                match self {
                    #(#aliases)*
                }
            }
        }
    };

    Ok(expanded.into())
}

#[derive(Debug)]
struct VariantMetadata {
    ident: Ident,
    name: LitStr,
    aliases: Vec<LitStr>,
}

impl VariantMetadata {
    fn parse(variant: &Variant) -> Result<Self> {
        if !matches!(variant.fields, Fields::Unit) {
            Err(Error::new(
                variant.span(),
                "`CharsetNames` variants may not hold fields.",
            ))?
        }

        let Some(attr) = variant.attrs.iter().find(|a| a.path().is_ident("charset")) else {
            Err(Error::new(
                variant.span(),
                "Variant must have a `charset(\"name\")` attribute.",
            ))?
        };

        let CharsetAttribute { name, aliases } = attr.meta.require_list()?.parse_args()?;

        Ok(Self {
            ident: variant.ident.clone(),
            name,
            aliases,
        })
    }

    fn names(&self) -> impl Iterator<Item = &LitStr> {
        std::iter::once(&self.name).chain(&self.aliases)
    }
}

/// `charset("canonical", aliases("alias", ...))`, the alias list optional.
#[derive(Debug)]
struct CharsetAttribute {
    name: LitStr,
    aliases: Vec<LitStr>,
}

impl Parse for CharsetAttribute {
    fn parse(input: ParseStream) -> Result<Self> {
        let name = input.parse::<LitStr>()?;
        let mut aliases = Vec::new();

        if input.parse::<Option<Token![,]>>()?.is_some() && !input.is_empty() {
            let keyword = input.parse::<Ident>()?;
            if keyword != "aliases" {
                Err(Error::new(keyword.span(), "Expected `aliases(...)`."))?;
            }

            let content;
            parenthesized!(content in input);
            aliases = Punctuated::<LitStr, Token![,]>::parse_terminated(&content)?
                .into_iter()
                .collect();
        }

        Ok(Self { name, aliases })
    }
}
