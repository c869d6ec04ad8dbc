use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{
    Attribute, Data, DeriveInput, Error, Field, Fields, Ident, LitStr, Result, Type, Visibility, parse_macro_input,
    spanned::Spanned,
};

mod parsed;

use parsed::ParsedRecord;

/// Derives `colmap::types::Record` (and `Described`) for a struct with named fields.
///
/// Field annotations go in `#[record(...)]`; each `key = "value"` becomes a tag entry
/// and a bare `inline` is shorthand for `inline = "true"`:
///
/// ```text
/// #[derive(Record, Default)]
/// pub struct Person {
///     #[record(db = "-")]
///     pub id: i64,
///     pub first_name: String,
///     #[record(db = ",inline")]
///     pub home: Address,
///     #[record(field = "nick")]
///     pub nickname: Option<String>,
/// }
/// ```
///
/// Only `pub` fields are exported. Field types must implement `Described` and
/// `FromValue`; inline fields must themselves derive `Record`. A field tagged
/// `db = "-"` (without a `field` override) is never assigned, so its type only
/// needs `Described`.
#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match ParsedRecord::from_input(&input) {
        Ok(parsed) => parsed.emit().into(),
        Err(err) => err.to_compile_error().into(),
    }
}
