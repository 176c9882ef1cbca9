use proc_macro::TokenStream;

mod model;

/// Generate a codec, codec factory and `Codable` impl for a struct with
/// named fields.
///
/// Struct attributes: `#[codec(accumulate)]`, `#[codec(namespace = "..")]`.
/// Field attributes: `rename = ".."`, `alias = ".."` (repeatable), `skip`,
/// `with = "path::to::module"`.
#[proc_macro_derive(Codec, attributes(codec))]
pub fn derive_codec(input: TokenStream) -> TokenStream {
    model::derive_codec(input.into()).into()
}
