//! Model and field descriptors consumed by the precodec emitters.
//!
//! Descriptors are plain data: the derive macro extracts them from a struct,
//! build scripts assemble them with [`ModelDef::builder`].

pub mod error;
pub mod field;
pub mod identity;
pub mod model;
pub mod validate;

pub use error::SchemaError;
pub use model::ModelDef;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        error::SchemaError,
        field::{FieldDef, FieldStrategy, NameCandidates},
        identity::TypeIdentity,
        model::{Construction, ModelBuilder, ModelDef},
        validate::validate_model,
    };
}
