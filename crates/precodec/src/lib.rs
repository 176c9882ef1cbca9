//! ## Crate layout
//! - `build`: emitters, emission driver and the `build!` macro for build scripts.
//! - `core`: JSON streams, codec traits, builtin codecs and the registry.
//! - `schema`: model and field descriptors with their validation.
//!
//! `#[derive(Codec)]` and `include_codecs!` are the two ways generated codecs
//! reach a crate; the free functions below run them through the shared
//! [`Registry::global`] instance.

pub use precodec_build as build;
pub use precodec_core as core;
pub use precodec_schema as schema;

// generated code names the runtime as ::precodec::..., including inside this crate
extern crate self as precodec;

/// Paths used by generated code. Not part of the public API.
#[doc(hidden)]
pub mod __internal {
    pub use precodec_core as core;
}

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//
// Macros
//

pub use precodec_build::build;
pub use precodec_derive::Codec;

/// Include the codecs a build script wrote for `namespace`.
///
/// The namespace is given as a directory path (`"models"`, `"app/models"`).
/// The second form names a custom `index_file`.
#[macro_export]
macro_rules! include_codecs {
    ($namespace:literal) => {
        include!(concat!(env!("OUT_DIR"), "/", $namespace, "/codecs.rs"));
    };
    ($namespace:literal, $index:literal) => {
        include!(concat!(env!("OUT_DIR"), "/", $namespace, "/", $index));
    };
}

pub use precodec_core::{
    Error,
    codec::{Codable, Codec},
    error::{ResolveError, StreamError},
    registry::{CodecFactory, Registry, TypeToken},
    stream::{JsonReader, JsonWriter},
};

//
// Global helpers
//

pub fn to_writer<T: Codable>(out: &mut dyn std::io::Write, value: &T) -> Result<(), Error> {
    Registry::global().to_writer(out, value)
}

pub fn to_string<T: Codable>(value: &T) -> Result<String, Error> {
    Registry::global().to_string(value)
}

pub fn to_string_pretty<T: Codable>(value: &T) -> Result<String, Error> {
    Registry::global().to_string_pretty(value)
}

pub fn from_str<T: Codable>(json: &str) -> Result<T, Error> {
    Registry::global().from_str(json)
}

pub fn from_slice<T: Codable>(json: &[u8]) -> Result<T, Error> {
    Registry::global().from_slice(json)
}

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        Codec,
        core::{
            codec::Codable,
            registry::Registry,
            stream::{JsonReader, JsonWriter},
        },
    };
}

///
/// TESTS
///
