use proc_macro::TokenStream;
use quote::quote;
use syn::parse::{Parse, ParseStream};
use syn::{Expr, Ident, Token, parse_macro_input};

struct LogInput {
    event: Expr,
    fields: Vec<(Ident, Expr)>,
}

impl Parse for LogInput {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let event = input.parse::<Expr>()?;

        let mut fields = Vec::new();
        while input.peek(Token![,]) {
            input.parse::<Token![,]>()?;
            if input.is_empty() {
                break;
            }
            let key = input.parse::<Ident>()?;
            input.parse::<Token![=]>()?;
            let value = input.parse::<Expr>()?;
            fields.push((key, value));
        }

        Ok(LogInput { event, fields })
    }
}

pub fn log_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as LogInput);

    let event = &input.event;
    let keys: Vec<_> = input.fields.iter().map(|(key, _)| key).collect();
    let values: Vec<_> = input.fields.iter().map(|(_, value)| value).collect();

    let emit = |macro_name: proc_macro2::TokenStream| {
        quote! {
            #macro_name!(#(#keys = %#values,)* "{}", message)
        }
    };
    let error = emit(quote! { tracing::error });
    let warn = emit(quote! { tracing::warn });
    let info = emit(quote! { tracing::info });
    let debug = emit(quote! { tracing::debug });
    let trace = emit(quote! { tracing::trace });

    quote! {
        {
            let event = &#event;
            let message = event.to_string();

            match event.level() {
                tracing::Level::ERROR => #error,
                tracing::Level::WARN => #warn,
                tracing::Level::INFO => #info,
                tracing::Level::DEBUG => #debug,
                _ => #trace,
            }
        }
    }
    .into()
}
