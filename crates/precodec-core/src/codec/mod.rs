mod collection;
mod deferred;
mod primitive;

pub use collection::{BoxCodec, MapCodec, OptionCodec, VecCodec};
pub use primitive::PrimitiveCodec;

pub(crate) use deferred::DeferredCodec;

use crate::{
    error::{ResolveError, StreamError},
    registry::{Registry, TypeToken},
    stream::{JsonReader, JsonWriter},
};
use std::{any::Any, fmt, sync::Arc};

///
/// Codec
///
/// Paired write/read procedures for one type. Implementations hold no
/// per-call state, so one instance serves any number of threads.
///

pub trait Codec<T>: Send + Sync {
    fn write(&self, writer: &mut JsonWriter<'_>, value: &T) -> Result<(), StreamError>;

    fn read(&self, reader: &mut JsonReader<'_>) -> Result<T, StreamError>;
}

///
/// Codable
///
/// Static route to a type's own codec, used by the registry when no
/// registered factory claims the type.
///

pub trait Codable: Sized + 'static {
    fn default_codec(registry: &Registry) -> Result<Arc<dyn Codec<Self>>, ResolveError>;
}

///
/// ErasedCodec
///
/// An `Arc<dyn Codec<T>>` with `T` erased, tagged with the token of `T`.
///

#[derive(Clone)]
pub struct ErasedCodec {
    token: TypeToken,
    inner: Arc<dyn Any + Send + Sync>,
}

impl ErasedCodec {
    #[must_use]
    pub fn new<T: 'static>(codec: Arc<dyn Codec<T>>) -> Self {
        Self {
            token: TypeToken::of::<T>(),
            inner: Arc::new(codec),
        }
    }

    #[must_use]
    pub const fn token(&self) -> TypeToken {
        self.token
    }

    /// Recover the typed codec; `None` if `T` is not the erased type.
    #[must_use]
    pub fn downcast<T: 'static>(&self) -> Option<Arc<dyn Codec<T>>> {
        self.inner.downcast_ref::<Arc<dyn Codec<T>>>().cloned()
    }
}

impl fmt::Debug for ErasedCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErasedCodec")
            .field("token", &self.token)
            .finish_non_exhaustive()
    }
}

///
/// TESTS
///
