use proc_macro2::Ident;
use quote::format_ident;

pub fn snake_case(ident: &Ident) -> Ident {
    let name = ident.to_string();
    let mut snake = String::with_capacity(name.len() + 4);
    let mut previous_lower = false;
    for ch in name.chars() {
        if ch.is_uppercase() {
            if previous_lower {
                snake.push('_');
            }
            snake.extend(ch.to_lowercase());
            previous_lower = false;
        } else {
            snake.push(ch);
            previous_lower = ch.is_lowercase() || ch.is_ascii_digit();
        }
    }
    format_ident!("{}", snake, span = ident.span())
}
