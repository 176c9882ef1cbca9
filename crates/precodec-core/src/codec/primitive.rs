use super::{Codable, Codec};
use crate::{
    error::{ResolveError, StreamError},
    registry::Registry,
    stream::{JsonReader, JsonWriter},
};
use std::sync::Arc;

///
/// PrimitiveCodec
///
/// Stateless codec for every scalar the stream reads natively.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct PrimitiveCodec;

// Integers are read through the widest stream type and narrowed, so an
// out-of-range value fails instead of wrapping.
macro_rules! integer_codec {
    ($($ty:ty => $wide:ty, $next:ident, $value:ident;)*) => {
        $(
            impl Codec<$ty> for PrimitiveCodec {
                fn write(&self, writer: &mut JsonWriter<'_>, value: &$ty) -> Result<(), StreamError> {
                    let wide = <$wide>::try_from(*value).map_err(StreamError::custom)?;

                    writer.$value(wide)
                }

                fn read(&self, reader: &mut JsonReader<'_>) -> Result<$ty, StreamError> {
                    let offset = reader.offset();
                    let wide = reader.$next()?;

                    <$ty>::try_from(wide).map_err(|_| StreamError::InvalidNumber {
                        text: wide.to_string(),
                        target: stringify!($ty),
                        offset,
                    })
                }
            }

            impl Codable for $ty {
                fn default_codec(_: &Registry) -> Result<Arc<dyn Codec<Self>>, ResolveError> {
                    Ok(Arc::new(PrimitiveCodec))
                }
            }
        )*
    };
}

integer_codec! {
    i8 => i64, next_i64, i64_value;
    i16 => i64, next_i64, i64_value;
    i32 => i64, next_i64, i64_value;
    i64 => i64, next_i64, i64_value;
    isize => i64, next_i64, i64_value;
    u8 => u64, next_u64, u64_value;
    u16 => u64, next_u64, u64_value;
    u32 => u64, next_u64, u64_value;
    u64 => u64, next_u64, u64_value;
    usize => u64, next_u64, u64_value;
}

impl Codec<bool> for PrimitiveCodec {
    fn write(&self, writer: &mut JsonWriter<'_>, value: &bool) -> Result<(), StreamError> {
        writer.bool_value(*value)
    }

    fn read(&self, reader: &mut JsonReader<'_>) -> Result<bool, StreamError> {
        reader.next_bool()
    }
}

impl Codec<f64> for PrimitiveCodec {
    fn write(&self, writer: &mut JsonWriter<'_>, value: &f64) -> Result<(), StreamError> {
        writer.f64_value(*value)
    }

    fn read(&self, reader: &mut JsonReader<'_>) -> Result<f64, StreamError> {
        reader.next_f64()
    }
}

impl Codec<f32> for PrimitiveCodec {
    fn write(&self, writer: &mut JsonWriter<'_>, value: &f32) -> Result<(), StreamError> {
        writer.f32_value(*value)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn read(&self, reader: &mut JsonReader<'_>) -> Result<f32, StreamError> {
        reader.next_f64().map(|value| value as f32)
    }
}

impl Codec<String> for PrimitiveCodec {
    fn write(&self, writer: &mut JsonWriter<'_>, value: &String) -> Result<(), StreamError> {
        writer.string_value(value)
    }

    fn read(&self, reader: &mut JsonReader<'_>) -> Result<String, StreamError> {
        reader.next_string()
    }
}

impl Codec<char> for PrimitiveCodec {
    fn write(&self, writer: &mut JsonWriter<'_>, value: &char) -> Result<(), StreamError> {
        writer.string_value(value.encode_utf8(&mut [0; 4]))
    }

    fn read(&self, reader: &mut JsonReader<'_>) -> Result<char, StreamError> {
        let offset = reader.offset();
        let text = reader.next_string()?;
        let mut chars = text.chars();

        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(StreamError::InvalidString {
                offset,
                reason: format!("expected a single character, found {text:?}"),
            }),
        }
    }
}

macro_rules! scalar_codable {
    ($($ty:ty),*) => {
        $(
            impl Codable for $ty {
                fn default_codec(_: &Registry) -> Result<Arc<dyn Codec<Self>>, ResolveError> {
                    Ok(Arc::new(PrimitiveCodec))
                }
            }
        )*
    };
}

scalar_codable!(bool, f32, f64, String, char);

///
/// TESTS
///
