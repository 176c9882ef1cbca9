use crate::{
    error::SchemaError,
    field::{FieldDef, FieldStrategy, parse_member},
    identity::TypeIdentity,
    validate::validate_model,
};
use proc_macro2::Ident;
use syn::{Generics, Visibility};

///
/// Construction
///
/// How the read procedure produces the target value.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Construction {
    /// Default-construct the model, then assign each field as it is read.
    #[default]
    Default,

    /// Collect each field into its own slot, then build the model once the
    /// object is closed. The model itself need not implement `Default`.
    Accumulate,
}

///
/// ModelDef
///
/// Everything the emitters need to know about one model. Field order is
/// the write order.
///

#[derive(Clone, Debug)]
pub struct ModelDef {
    pub identity: TypeIdentity,
    pub vis: Visibility,
    pub generics: Generics,
    pub fields: Vec<FieldDef>,
    pub skipped: Vec<Ident>,
    pub construction: Construction,
}

impl ModelDef {
    #[must_use]
    pub fn builder(identity: TypeIdentity) -> ModelBuilder {
        ModelBuilder::new(identity)
    }

    pub fn validate(&self) -> Result<(), SchemaError> {
        validate_model(self)
    }

    /// True when at least one field needs a registry-resolved codec.
    #[must_use]
    pub fn has_delegates(&self) -> bool {
        self.fields
            .iter()
            .any(|field| matches!(field.strategy, FieldStrategy::Delegate))
    }
}

///
/// ModelBuilder
///
/// Programmatic route to a `ModelDef`, used from build scripts where no
/// struct definition is available to derive from.
///

pub struct ModelBuilder {
    identity: TypeIdentity,
    vis: Visibility,
    generics: Generics,
    fields: Vec<FieldDef>,
    skipped: Vec<Ident>,
    construction: Construction,
}

impl ModelBuilder {
    fn new(identity: TypeIdentity) -> Self {
        Self {
            identity,
            vis: syn::parse_quote!(pub),
            generics: Generics::default(),
            fields: Vec::new(),
            skipped: Vec::new(),
            construction: Construction::Default,
        }
    }

    #[must_use]
    pub fn vis(mut self, vis: Visibility) -> Self {
        self.vis = vis;
        self
    }

    #[must_use]
    pub fn generics(mut self, generics: Generics) -> Self {
        self.generics = generics;
        self
    }

    /// Generic parameters from a fragment such as `"<T>"`.
    pub fn generics_str(self, generics: &str) -> Result<Self, SchemaError> {
        let parsed = syn::parse_str::<Generics>(generics)
            .map_err(|err| SchemaError::parse(generics, "generic parameters", err))?;

        Ok(self.generics(parsed))
    }

    #[must_use]
    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Member kept off the wire; it is left at its default on read.
    pub fn skip(mut self, member: &str) -> Result<Self, SchemaError> {
        self.skipped.push(parse_member(member)?);

        Ok(self)
    }

    #[must_use]
    pub const fn accumulate(mut self) -> Self {
        self.construction = Construction::Accumulate;
        self
    }

    pub fn build(self) -> Result<ModelDef, SchemaError> {
        let model = ModelDef {
            identity: self.identity,
            vis: self.vis,
            generics: self.generics,
            fields: self.fields,
            skipped: self.skipped,
            construction: self.construction,
        };
        model.validate()?;

        Ok(model)
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    fn person() -> ModelBuilder {
        ModelDef::builder(TypeIdentity::new("models", "Person"))
            .field(FieldDef::parse("name", "String").unwrap().alias("n"))
            .field(FieldDef::parse("age", "u32").unwrap())
    }

    #[test]
    fn builds_in_declared_order() {
        let model = person().build().unwrap();
        let names: Vec<_> = model.fields.iter().map(FieldDef::canonical_name).collect();

        assert_eq!(names, ["name", "age"]);
        assert_eq!(model.construction, Construction::Default);
        assert!(model.has_delegates());
    }

    #[test]
    fn accepts_generics_fragment() {
        let model = ModelDef::builder(TypeIdentity::new("models", "Page"))
            .generics_str("<T>")
            .unwrap()
            .field(FieldDef::parse("items", "Vec<T>").unwrap())
            .accumulate()
            .build()
            .unwrap();

        assert_eq!(model.generics.type_params().count(), 1);
        assert_eq!(model.construction, Construction::Accumulate);
    }

    #[test]
    fn build_runs_validation() {
        let err = person()
            .field(FieldDef::parse("nick", "String").unwrap().alias("n"))
            .build()
            .unwrap_err();

        assert!(matches!(err, SchemaError::DuplicateAlias { .. }));
    }

    #[test]
    fn skip_accepts_keywords_and_catches_raw_duplicates() {
        let model = person().skip("type").unwrap().build().unwrap();
        assert_eq!(model.skipped[0].to_string(), "r#type");

        let err = person()
            .field(FieldDef::parse("type", "u8").unwrap())
            .skip("r#type")
            .unwrap()
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateMember { .. }));
    }
}
