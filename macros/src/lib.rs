mod case;
mod log;
mod loggable;
mod traceable;

use proc_macro::TokenStream;

/// Emits an error or log event at the level its variant declares.
///
/// `log!(event)` or `log!(event, key = value, ...)`; every extra pair is
/// recorded as a structured field formatted with `Display`.
#[proc_macro]
pub fn log(input: TokenStream) -> TokenStream {
    log::log_impl(input)
}

/// Declares a log event enum whose variants carry a `tracing::Level`.
#[proc_macro]
pub fn loggable(input: TokenStream) -> TokenStream {
    loggable::loggable_impl(input)
}

/// Declares an error enum whose variants carry a `tracing::Level` and,
/// unless marked `#[no_source]`, the rendered cause in an `err` field.
#[proc_macro]
pub fn traceable(input: TokenStream) -> TokenStream {
    traceable::traceable_impl(input)
}
