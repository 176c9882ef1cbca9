use thiserror::Error as ThisError;

///
/// SchemaError
///
/// A model descriptor that cannot be turned into a codec. Raised before any
/// tokens are emitted.
///

#[remain::sorted]
#[derive(Debug, ThisError)]
pub enum SchemaError {
    #[error("wire name '{name}' is claimed by both '{first}' and '{second}' in {model}")]
    DuplicateAlias {
        model: String,
        name: String,
        first: String,
        second: String,
    },

    #[error("member '{member}' appears more than once in {model}")]
    DuplicateMember { model: String, member: String },

    #[error("field '{member}' of {model} has an empty wire name")]
    EmptyName { model: String, member: String },

    #[error("invalid type identity '{identity}': {reason}")]
    InvalidIdentity { identity: String, reason: String },

    #[error("{model} borrows data; codecs need owned ('static) models")]
    Lifetime { model: String },

    #[error("cannot parse '{fragment}' as {expected}: {source}")]
    Parse {
        fragment: String,
        expected: &'static str,
        #[source]
        source: syn::Error,
    },
}

impl SchemaError {
    pub(crate) fn parse(fragment: &str, expected: &'static str, source: syn::Error) -> Self {
        Self::Parse {
            fragment: fragment.to_string(),
            expected,
            source,
        }
    }
}
