use proc_macro::TokenStream;
use quote::quote;
use syn::parse::{Parse, ParseStream};
use syn::{Attribute, Expr, Ident, LitStr, Token, Type, braced, parse_macro_input};

pub(crate) struct EventVariant {
    pub docs: Vec<Attribute>,
    pub markers: Vec<Attribute>,
    pub message: LitStr,
    pub name: Ident,
    pub fields: Vec<(Ident, Type)>,
    pub level: Expr,
}

pub(crate) struct EventEnum {
    pub name: Ident,
    pub variants: Vec<EventVariant>,
}

impl EventVariant {
    pub fn has_marker(&self, marker: &str) -> bool {
        self.markers.iter().any(|attr| attr.path().is_ident(marker))
    }
}

impl Parse for EventEnum {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let name = input.parse::<Ident>()?;

        let content;
        braced!(content in input);

        let mut variants = Vec::new();
        while !content.is_empty() {
            let attributes = content.call(Attribute::parse_outer)?;

            let mut docs = Vec::new();
            let mut markers = Vec::new();
            let mut message = None;
            for attribute in attributes {
                if attribute.path().is_ident("error") {
                    message = Some(attribute.parse_args::<LitStr>()?);
                } else if attribute.path().is_ident("doc") {
                    docs.push(attribute);
                } else {
                    markers.push(attribute);
                }
            }
            let message =
                message.ok_or_else(|| content.error("expected #[error(\"...\")] attribute"))?;

            let name = content.parse::<Ident>()?;

            let mut fields = Vec::new();
            if content.peek(syn::token::Brace) {
                let field_content;
                braced!(field_content in content);
                while !field_content.is_empty() {
                    let field_name = field_content.parse::<Ident>()?;
                    field_content.parse::<Token![:]>()?;
                    let field_type = field_content.parse::<Type>()?;
                    fields.push((field_name, field_type));
                    if field_content.peek(Token![,]) {
                        field_content.parse::<Token![,]>()?;
                    }
                }
            }

            content.parse::<Token![=>]>()?;
            let level = content.parse::<Expr>()?;

            if content.peek(Token![,]) {
                content.parse::<Token![,]>()?;
            }

            variants.push(EventVariant {
                docs,
                markers,
                message,
                name,
                fields,
                level,
            });
        }

        Ok(EventEnum { name, variants })
    }
}

pub fn loggable_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as EventEnum);

    let enum_name = &input.name;

    let enum_variants = input.variants.iter().map(|variant| {
        let docs = &variant.docs;
        let message = &variant.message;
        let name = &variant.name;
        if variant.fields.is_empty() {
            quote! {
                #(#docs)*
                #[error(#message)]
                #name
            }
        } else {
            let fields = variant
                .fields
                .iter()
                .map(|(field, ty)| quote! { #field: #ty });
            quote! {
                #(#docs)*
                #[error(#message)]
                #name { #(#fields,)* }
            }
        }
    });

    let level_arms = input.variants.iter().map(|variant| {
        let name = &variant.name;
        let level = &variant.level;
        if variant.fields.is_empty() {
            quote! { Self::#name => #level }
        } else {
            quote! { Self::#name { .. } => #level }
        }
    });

    quote! {
        #[allow(dead_code)]
        #[derive(Debug, Clone, thiserror::Error, serde::Serialize, serde::Deserialize)]
        pub enum #enum_name {
            #(#enum_variants,)*
        }

        impl #enum_name {
            #[allow(dead_code)]
            pub fn level(&self) -> tracing::Level {
                match self {
                    #(#level_arms,)*
                }
            }
        }
    }
    .into()
}
