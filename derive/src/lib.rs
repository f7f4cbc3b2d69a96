use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod charset_names;

#[proc_macro_derive(CharsetNames, attributes(charset))]
pub fn derive_charset_names(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match charset_names::expand_charset_names(&input) {
        Ok(tokens) => tokens,
        Err(err) => err.to_compile_error().into(),
    }
}
