//! Codec generation for precodec models.
//!
//! [`generate`] turns one validated [`ModelDef`] into the tokens of its codec,
//! codec factory and `Codable` impl. The derive macro calls it directly; build
//! scripts go through the [`driver::Generator`], which renders the tokens to
//! source units.

mod codec;
mod factory;
mod macros;
mod util;

pub mod config;
pub mod driver;

pub use config::{BuildConfig, ConfigError};
pub use driver::{Generator, MemorySink, OutDirSink, ProcessingError, Sink, SourceUnit};
pub use precodec_schema as schema;

use precodec_schema::{
    SchemaError,
    field::{FieldDef, FieldStrategy},
    model::{Construction, ModelDef},
};
use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};
use syn::GenericParam;

/// Validate `model` and emit everything its codec needs.
pub fn generate(model: &ModelDef) -> Result<TokenStream, SchemaError> {
    model.validate()?;

    Ok(CodecBuilder::new(model).generate())
}

///
/// CodecBuilder
///
/// Shared naming and bounds for one model's emitted items.
///

pub(crate) struct CodecBuilder<'a> {
    pub(crate) model: &'a ModelDef,
    pub(crate) rt: TokenStream,
}

impl<'a> CodecBuilder<'a> {
    pub(crate) fn new(model: &'a ModelDef) -> Self {
        Self {
            model,
            rt: util::runtime(),
        }
    }

    pub(crate) fn generate(&self) -> TokenStream {
        let mut tokens = quote!();
        tokens.extend(codec::generate(self));
        tokens.extend(factory::generate(self));

        tokens
    }

    /// `Model<T, ..>` as a type.
    pub(crate) fn model_ty(&self) -> TokenStream {
        let ident = self.model.identity.ident();
        let (_, ty_generics, _) = self.model.generics.split_for_impl();

        quote!(#ident #ty_generics)
    }

    /// Where clause for the emitted struct definitions: `'static` on every
    /// type parameter, nothing that needs the runtime traits.
    pub(crate) fn struct_where(&self) -> TokenStream {
        let bounds = self
            .type_params()
            .map(|param| quote!(#param: 'static))
            .collect::<Vec<_>>();

        util::where_clause_with_bounds(self.model.generics.where_clause.as_ref(), &bounds)
    }

    /// Where clause for every emitted impl: type parameters must be codable,
    /// and the chosen construction mode must be able to produce a value.
    pub(crate) fn impl_where(&self) -> TokenStream {
        let rt = &self.rt;
        let mut bounds = self
            .type_params()
            .map(|param| quote!(#param: #rt::codec::Codable))
            .collect::<Vec<_>>();

        match self.model.construction {
            Construction::Default => {
                let model_ty = self.model_ty();
                bounds.push(quote!(#model_ty: ::core::default::Default));
            }
            Construction::Accumulate => {
                for field in &self.model.fields {
                    let ty = &field.ty;
                    bounds.push(quote!(#ty: ::core::default::Default));
                }
            }
        }

        util::where_clause_with_bounds(self.model.generics.where_clause.as_ref(), &bounds)
    }

    pub(crate) fn delegates(&self) -> impl Iterator<Item = &FieldDef> {
        self.model
            .fields
            .iter()
            .filter(|field| matches!(field.strategy, FieldStrategy::Delegate))
    }

    fn type_params(&self) -> impl Iterator<Item = &Ident> {
        self.model
            .generics
            .params
            .iter()
            .filter_map(|param| match param {
                GenericParam::Type(param) => Some(&param.ident),
                _ => None,
            })
    }
}

/// Struct member holding a delegate field's nested codec.
pub(crate) fn codec_slot(field: &FieldDef) -> Ident {
    format_ident!("{}_codec", field.member_name())
}

/// Local accumulating a field's value in `Accumulate` mode.
pub(crate) fn value_slot(field: &FieldDef) -> Ident {
    format_ident!("{}_slot", field.member_name())
}
