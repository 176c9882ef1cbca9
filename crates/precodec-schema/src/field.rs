use crate::error::SchemaError;
use derive_more::{Deref, IntoIterator};
use proc_macro2::Ident;
use syn::{Path, Type, ext::IdentExt};

///
/// NameCandidates
///
/// Wire names a field answers to, in priority order. The first is the
/// canonical name used when writing; the rest are read-only aliases.
/// Never empty, never holds the same name twice.
///

#[derive(Clone, Debug, Deref, Eq, IntoIterator, PartialEq)]
pub struct NameCandidates(Vec<String>);

impl NameCandidates {
    pub fn new(canonical: impl Into<String>) -> Self {
        Self(vec![canonical.into()])
    }

    #[must_use]
    pub fn canonical(&self) -> &str {
        &self.0[0]
    }

    #[must_use]
    pub fn aliases(&self) -> &[String] {
        &self.0[1..]
    }

    /// Replace the canonical name. A matching alias is folded into it.
    pub fn set_canonical(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.0.retain(|existing| *existing != name);

        if self.0.is_empty() {
            self.0.push(name);
        } else {
            self.0[0] = name;
        }
    }

    /// Append an alias; repeats of a known name are ignored.
    pub fn push(&mut self, alias: impl Into<String>) {
        let alias = alias.into();
        if !self.0.contains(&alias) {
            self.0.push(alias);
        }
    }
}

///
/// FieldStrategy
///
/// How a field's value crosses the wire.
///

#[derive(Clone, Debug)]
pub enum FieldStrategy {
    /// Nested codec for the field's type, resolved through the registry once
    /// when the model codec is created.
    Delegate,

    /// Inline codec: a module exposing `write(writer, &value)` and
    /// `read(reader)`.
    With(Path),
}

///
/// FieldDef
///

#[derive(Clone, Debug)]
pub struct FieldDef {
    pub member: Ident,
    pub ty: Type,
    pub names: NameCandidates,
    pub strategy: FieldStrategy,
}

impl FieldDef {
    /// Delegate field whose canonical wire name is the member name.
    #[must_use]
    pub fn new(member: Ident, ty: Type) -> Self {
        let names = NameCandidates::new(member.unraw().to_string());

        Self {
            member,
            ty,
            names,
            strategy: FieldStrategy::Delegate,
        }
    }

    /// Build from source fragments, e.g. `FieldDef::parse("tags", "Vec<String>")`.
    pub fn parse(member: &str, ty: &str) -> Result<Self, SchemaError> {
        let member = parse_member(member)?;
        let ty = syn::parse_str::<Type>(ty).map_err(|err| SchemaError::parse(ty, "a type", err))?;

        Ok(Self::new(member, ty))
    }

    #[must_use]
    pub fn rename(mut self, name: impl Into<String>) -> Self {
        self.names.set_canonical(name);
        self
    }

    #[must_use]
    pub fn alias(mut self, name: impl Into<String>) -> Self {
        self.names.push(name);
        self
    }

    #[must_use]
    pub fn with(mut self, path: Path) -> Self {
        self.strategy = FieldStrategy::With(path);
        self
    }

    /// `with` from a path fragment such as `"crate::codecs::unix_time"`.
    pub fn with_path(self, path: &str) -> Result<Self, SchemaError> {
        let parsed =
            syn::parse_str::<Path>(path).map_err(|err| SchemaError::parse(path, "a path", err))?;

        Ok(self.with(parsed))
    }

    #[must_use]
    pub fn canonical_name(&self) -> &str {
        self.names.canonical()
    }

    /// Member name without any `r#` prefix.
    #[must_use]
    pub fn member_name(&self) -> String {
        self.member.unraw().to_string()
    }
}

/// Struct member from source text; keywords are accepted as raw idents.
pub(crate) fn parse_member(member: &str) -> Result<Ident, SchemaError> {
    syn::parse_str::<Ident>(member)
        .or_else(|_| syn::parse_str::<Ident>(&format!("r#{member}")))
        .map_err(|err| SchemaError::parse(member, "a field name", err))
}

///
/// TESTS
///
