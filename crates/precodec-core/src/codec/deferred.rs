use super::Codec;
use crate::{
    error::StreamError,
    stream::{JsonReader, JsonWriter},
};
use std::{
    any::type_name,
    sync::{Arc, OnceLock},
};
use tracing::warn;

///
/// DeferredCodec
///
/// Stand-in handed out while a recursive type's codec is still being built.
/// The registry binds it to the finished codec before anyone can use it.
///

pub(crate) struct DeferredCodec<T: 'static> {
    target: OnceLock<Arc<dyn Codec<T>>>,
}

impl<T: 'static> DeferredCodec<T> {
    pub(crate) const fn new() -> Self {
        Self {
            target: OnceLock::new(),
        }
    }

    /// First bind wins; a later one means the same token was resolved twice
    /// and is logged, not applied.
    pub(crate) fn bind(&self, codec: Arc<dyn Codec<T>>) {
        if self.target.set(codec).is_err() {
            warn!(type_name = type_name::<T>(), "deferred codec bound twice, keeping the first");
        }
    }

    fn target(&self) -> Result<&Arc<dyn Codec<T>>, StreamError> {
        self.target.get().ok_or(StreamError::Unresolved {
            type_name: type_name::<T>(),
        })
    }
}

impl<T: 'static> Codec<T> for DeferredCodec<T> {
    fn write(&self, writer: &mut JsonWriter<'_>, value: &T) -> Result<(), StreamError> {
        self.target()?.write(writer, value)
    }

    fn read(&self, reader: &mut JsonReader<'_>) -> Result<T, StreamError> {
        self.target()?.read(reader)
    }
}

///
/// TESTS
///
