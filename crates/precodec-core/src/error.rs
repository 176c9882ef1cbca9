use crate::stream::Token;
use std::{fmt::Display, io};
use thiserror::Error as ThisError;

///
/// Error
///
/// Top-level runtime error returned by the registry convenience helpers.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Stream(#[from] StreamError),
}

///
/// StreamError
///
/// Raised by the streaming layer for malformed or truncated input and for
/// sink failures while writing. Generated codecs never wrap or repair it.
///

#[remain::sorted]
#[derive(Debug, ThisError)]
pub enum StreamError {
    #[error("{0}")]
    Custom(String),

    #[error("illegal writer state: {0}")]
    IllegalState(&'static str),

    #[error("invalid number '{text}' for {target} at offset {offset}")]
    InvalidNumber {
        text: String,
        target: &'static str,
        offset: usize,
    },

    #[error("invalid string at offset {offset}: {reason}")]
    InvalidString { offset: usize, reason: String },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("non-finite number {0} cannot be written")]
    NonFiniteNumber(f64),

    #[error("expected {expected} but found '{found}' at offset {offset}")]
    Syntax {
        expected: &'static str,
        found: char,
        offset: usize,
    },

    #[error("trailing data at offset {offset}")]
    TrailingData { offset: usize },

    #[error("unexpected end of input at offset {offset}")]
    UnexpectedEof { offset: usize },

    #[error("expected {expected} but found {found} at offset {offset}")]
    UnexpectedToken {
        expected: &'static str,
        found: Token,
        offset: usize,
    },

    #[error("codec for {type_name} used before its resolution completed")]
    Unresolved { type_name: &'static str },
}

impl StreamError {
    /// Build a free-form error, typically from a hand-written `with` codec.
    pub fn custom(message: impl Display) -> Self {
        Self::Custom(message.to_string())
    }

    #[must_use]
    /// True when the input ended before the current value was complete.
    pub const fn is_eof(&self) -> bool {
        matches!(self, Self::UnexpectedEof { .. })
    }
}

///
/// ResolveError
///
/// Codec lookup failure. A factory declining a token is *not* an error; this
/// is only raised once every route has been exhausted or returned garbage.
///

#[derive(Debug, ThisError)]
pub enum ResolveError {
    #[error("no codec registered for {type_name}")]
    NoCodec { type_name: &'static str },

    #[error("factory claimed {requested} but produced a codec for {produced}")]
    TypeMismatch {
        requested: &'static str,
        produced: &'static str,
    },
}
