use crate::case::snake_case;
use crate::loggable::EventEnum;
use proc_macro::TokenStream;
use quote::quote;
use syn::parse_macro_input;

pub fn traceable_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as EventEnum);

    let enum_name = &input.name;

    let enum_variants = input.variants.iter().map(|variant| {
        let docs = &variant.docs;
        let message = &variant.message;
        let name = &variant.name;
        let fields = variant
            .fields
            .iter()
            .map(|(field, ty)| quote! { #field: #ty });

        match (variant.has_marker("no_source"), variant.fields.is_empty()) {
            (true, true) => quote! {
                #(#docs)*
                #[error(#message)]
                #name
            },
            (true, false) => quote! {
                #(#docs)*
                #[error(#message)]
                #name { #(#fields,)* }
            },
            (false, _) => quote! {
                #(#docs)*
                #[error(#message)]
                #name { #(#fields,)* err: String }
            },
        }
    });

    let level_arms = input.variants.iter().map(|variant| {
        let name = &variant.name;
        let level = &variant.level;
        if variant.has_marker("no_source") && variant.fields.is_empty() {
            quote! { Self::#name => #level }
        } else {
            quote! { Self::#name { .. } => #level }
        }
    });

    let constructors = input.variants.iter().filter_map(|variant| {
        let no_source = variant.has_marker("no_source");
        if no_source && variant.fields.is_empty() {
            return None;
        }

        let name = &variant.name;
        let constructor = snake_case(name);
        let params = variant
            .fields
            .iter()
            .map(|(field, ty)| quote! { #field: impl Into<#ty> });
        let assignments = variant
            .fields
            .iter()
            .map(|(field, _)| quote! { #field: #field.into() });

        if no_source {
            Some(quote! {
                pub fn #constructor(#(#params),*) -> Self {
                    Self::#name { #(#assignments,)* }
                }
            })
        } else {
            Some(quote! {
                pub fn #constructor(#(#params,)* err: impl std::fmt::Display) -> Self {
                    Self::#name { #(#assignments,)* err: err.to_string() }
                }
            })
        }
    });

    quote! {
        #[allow(dead_code)]
        #[derive(Debug, Clone, thiserror::Error, serde::Serialize, serde::Deserialize)]
        pub enum #enum_name {
            #(#enum_variants,)*
        }

        #[allow(dead_code)]
        impl #enum_name {
            pub fn level(&self) -> tracing::Level {
                match self {
                    #(#level_arms,)*
                }
            }

            #(#constructors)*
        }
    }
    .into()
}
