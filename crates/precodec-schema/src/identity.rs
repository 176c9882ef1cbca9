use crate::error::SchemaError;
use proc_macro2::Ident;
use quote::format_ident;
use std::fmt::{self, Display};

///
/// TypeIdentity
///
/// Where a model lives (`namespace`) and what it is called (`name`).
/// The namespace addresses output units; the name becomes the Rust type and
/// the prefix of every emitted item.
///

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TypeIdentity {
    namespace: String,
    name: String,
}

impl TypeIdentity {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `namespace::Name`, or just `Name` without a namespace.
    #[must_use]
    pub fn path(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}::{}", self.namespace, self.name)
        }
    }

    /// Panics on a name that is not an identifier; validated identities
    /// never are.
    #[must_use]
    pub fn ident(&self) -> Ident {
        format_ident!("{}", self.name)
    }

    #[must_use]
    pub fn codec_ident(&self) -> Ident {
        format_ident!("{}Codec", self.name)
    }

    #[must_use]
    pub fn factory_ident(&self) -> Ident {
        format_ident!("{}CodecFactory", self.name)
    }

    pub(crate) fn validate(&self) -> Result<(), SchemaError> {
        let invalid = |reason: String| SchemaError::InvalidIdentity {
            identity: self.path(),
            reason,
        };

        syn::parse_str::<Ident>(&self.name)
            .map_err(|_| invalid(format!("'{}' is not a type name", self.name)))?;

        if self.namespace.is_empty() {
            return Ok(());
        }
        for segment in self.namespace.split("::") {
            if segment.is_empty() || !segment.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(invalid(format!("bad namespace segment '{segment}'")));
            }
        }

        Ok(())
    }
}

impl Display for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_emitted_items() {
        let identity = TypeIdentity::new("app::models", "Person");

        assert_eq!(identity.path(), "app::models::Person");
        assert_eq!(identity.codec_ident().to_string(), "PersonCodec");
        assert_eq!(identity.factory_ident().to_string(), "PersonCodecFactory");
    }

    #[test]
    fn rejects_bad_identities() {
        assert!(TypeIdentity::new("models", "Person").validate().is_ok());
        assert!(TypeIdentity::new("", "Person").validate().is_ok());
        assert!(TypeIdentity::new("models", "not a name").validate().is_err());
        assert!(TypeIdentity::new("a::::b", "Person").validate().is_err());
    }
}
