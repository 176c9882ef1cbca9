//! Forward-only JSON token streams.
//!
//! The reader and writer keep a scope stack so that separators (`,` and `:`)
//! are handled by the stream and never by codec code.

mod reader;
mod writer;

pub use reader::JsonReader;
pub use writer::JsonWriter;

use std::fmt;

///
/// Token
///
/// Kind of the next token in a [`JsonReader`].
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Token {
    BeginArray,
    EndArray,
    BeginObject,
    EndObject,
    Name,
    String,
    Number,
    Bool,
    Null,
    EndDocument,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::BeginArray => "'['",
            Self::EndArray => "']'",
            Self::BeginObject => "'{'",
            Self::EndObject => "'}'",
            Self::Name => "a name",
            Self::String => "a string",
            Self::Number => "a number",
            Self::Bool => "a boolean",
            Self::Null => "null",
            Self::EndDocument => "end of document",
        };

        f.write_str(label)
    }
}

// Nesting state shared by the reader and writer.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Scope {
    EmptyDocument,
    NonEmptyDocument,
    EmptyArray,
    NonEmptyArray,
    EmptyObject,
    NonEmptyObject,
    DanglingName,
}
