//! Core runtime for precodec: JSON token streams, the codec traits, and the
//! registry that resolves a type token to a generated or builtin codec.

pub mod codec;
pub mod error;
pub mod registry;
pub mod stream;

pub use error::Error;

///
/// Prelude
///
/// Prelude contains the vocabulary a hand-written codec needs.
///

pub mod prelude {
    pub use crate::{
        codec::{Codable, Codec},
        error::StreamError,
        registry::Registry,
        stream::{JsonReader, JsonWriter, Token},
    };
}
