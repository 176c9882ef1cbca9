use super::{Registry, TypeToken};
use crate::{
    codec::{Codec, ErasedCodec},
    error::ResolveError,
};
use std::sync::Arc;

///
/// CodecFactory
///
/// Consulted by the registry for each token it has not cached yet.
/// `None` means "not mine" and lets the registry try the next route.
///

pub trait CodecFactory: Send + Sync {
    fn create(
        &self,
        registry: &Registry,
        token: &TypeToken,
    ) -> Option<Result<ErasedCodec, ResolveError>>;
}

impl<F> CodecFactory for F
where
    F: Fn(&Registry, &TypeToken) -> Option<Result<ErasedCodec, ResolveError>> + Send + Sync,
{
    fn create(
        &self,
        registry: &Registry,
        token: &TypeToken,
    ) -> Option<Result<ErasedCodec, ResolveError>> {
        self(registry, token)
    }
}

///
/// ExactFactory
///
/// Claims exactly one token and always hands back the same codec.
///

pub struct ExactFactory {
    codec: ErasedCodec,
}

impl ExactFactory {
    #[must_use]
    pub fn new<T: 'static>(codec: Arc<dyn Codec<T>>) -> Self {
        Self {
            codec: ErasedCodec::new(codec),
        }
    }
}

impl CodecFactory for ExactFactory {
    fn create(&self, _: &Registry, token: &TypeToken) -> Option<Result<ErasedCodec, ResolveError>> {
        (self.codec.token() == *token).then(|| Ok(self.codec.clone()))
    }
}
