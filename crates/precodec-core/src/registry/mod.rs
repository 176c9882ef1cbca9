mod factory;
mod token;

pub use factory::{CodecFactory, ExactFactory};
pub use token::TypeToken;

use crate::{
    codec::{Codable, Codec, DeferredCodec, ErasedCodec},
    error::{Error, ResolveError},
    stream::{JsonReader, JsonWriter},
};
use parking_lot::{ReentrantMutex, RwLock};
use std::{
    any::Any,
    cell::RefCell,
    collections::HashMap,
    io::Write,
    mem,
    sync::{Arc, LazyLock},
};
use tracing::{debug, trace};

static GLOBAL: LazyLock<Registry> = LazyLock::new(Registry::new);

///
/// Creating
///
/// State of the creation in progress on the thread holding the lock.
/// Codecs finished while an outer creation is still running are staged, not
/// cached: they may hold deferred codecs that are not bound yet.
///

#[derive(Default)]
struct Creating {
    // deferred codecs handed out per token still being created
    waiting: HashMap<TypeToken, Vec<Box<dyn Any + Send>>>,
    staged: HashMap<TypeToken, ErasedCodec>,
    failed: bool,
}

///
/// Registry
///
/// Resolves a `TypeToken` to a codec. Routes, in order: the cache, each
/// registered factory, then the type's own `Codable::default_codec`.
/// Every resolved codec is cached, so a codec is created at most once per
/// registry and shared by every caller.
///

pub struct Registry {
    factories: Vec<Box<dyn CodecFactory>>,
    cache: RwLock<HashMap<TypeToken, ErasedCodec>>,
    creating: ReentrantMutex<RefCell<Creating>>,
}

impl Registry {
    /// Registry with no factories; every type uses its default codec.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Process-wide registry with no registered factories.
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Resolve the codec for `T`, creating and caching it on first use.
    pub fn codec<T: Codable>(&self) -> Result<Arc<dyn Codec<T>>, ResolveError> {
        let token = TypeToken::of::<T>();
        if let Some(codec) = self.cached::<T>(&token) {
            return Ok(codec);
        }

        let creating = self.creating.lock();

        // another thread may have finished while we waited for the lock, or
        // an outer creation on this thread already staged it
        let found = Self::staged::<T>(&creating, &token).or_else(|| self.cached(&token));
        if let Some(codec) = found {
            return Ok(codec);
        }

        {
            let mut state = creating.borrow_mut();
            if let Some(deferred) = state.waiting.get_mut(&token) {
                trace!(token = %token, "recursive request, handing out deferred codec");

                let codec = Arc::new(DeferredCodec::<T>::new());
                deferred.push(Box::new(Arc::clone(&codec)));

                return Ok(codec as Arc<dyn Codec<T>>);
            }
            state.waiting.insert(token, Vec::new());
        }

        let created = self.create::<T>(&token);
        let deferred = creating
            .borrow_mut()
            .waiting
            .remove(&token)
            .unwrap_or_default();

        let codec = match created {
            Ok(codec) => codec,
            Err(err) => {
                self.settle(&creating, None);
                return Err(err);
            }
        };

        for pending in deferred {
            if let Ok(pending) = pending.downcast::<Arc<DeferredCodec<T>>>() {
                trace!(token = %token, "binding deferred codec");
                pending.bind(Arc::clone(&codec));
            }
        }

        debug!(token = %token, "codec created");
        self.settle(&creating, Some((token, ErasedCodec::new(Arc::clone(&codec)))));

        Ok(codec)
    }

    /// Type-erased lookup over the cache and the registered factories.
    /// Default codecs need the static type and are not reachable from here.
    pub fn resolve(&self, token: &TypeToken) -> Result<ErasedCodec, ResolveError> {
        if let Some(codec) = self.cache.read().get(token) {
            return Ok(codec.clone());
        }

        let creating = self.creating.lock();
        let staged = creating.borrow().staged.get(token).cloned();
        if let Some(codec) = staged.or_else(|| self.cache.read().get(token).cloned()) {
            return Ok(codec);
        }

        let claimed = self.claim(token).ok_or(ResolveError::NoCodec {
            type_name: token.name(),
        })?;
        let codec = match claimed {
            Ok(codec) if codec.token() == *token => codec,
            Ok(codec) => {
                self.settle(&creating, None);
                return Err(ResolveError::TypeMismatch {
                    requested: token.name(),
                    produced: codec.token().name(),
                });
            }
            Err(err) => {
                self.settle(&creating, None);
                return Err(err);
            }
        };

        debug!(token = %token, "codec resolved by token");
        self.settle(&creating, Some((*token, codec.clone())));

        Ok(codec)
    }

    pub fn to_writer<T: Codable>(&self, out: &mut dyn Write, value: &T) -> Result<(), Error> {
        let mut writer = JsonWriter::new(out);
        self.codec::<T>()?.write(&mut writer, value)?;
        writer.finish()?;

        Ok(())
    }

    pub fn to_string<T: Codable>(&self, value: &T) -> Result<String, Error> {
        let mut buf = Vec::new();
        self.to_writer(&mut buf, value)?;

        Ok(utf8(buf))
    }

    /// Like `to_string`, indented two spaces per level.
    pub fn to_string_pretty<T: Codable>(&self, value: &T) -> Result<String, Error> {
        let mut buf = Vec::new();
        let mut writer = JsonWriter::with_indent(&mut buf, "  ");
        self.codec::<T>()?.write(&mut writer, value)?;
        writer.finish()?;

        Ok(utf8(buf))
    }

    pub fn from_str<T: Codable>(&self, json: &str) -> Result<T, Error> {
        self.from_slice(json.as_bytes())
    }

    /// Read exactly one value; anything after it is an error.
    pub fn from_slice<T: Codable>(&self, json: &[u8]) -> Result<T, Error> {
        let codec = self.codec::<T>()?;
        let mut reader = JsonReader::from_slice(json);
        let value = codec.read(&mut reader)?;
        reader.finish()?;

        Ok(value)
    }

    //
    // helpers
    //

    fn cached<T: 'static>(&self, token: &TypeToken) -> Option<Arc<dyn Codec<T>>> {
        self.cache.read().get(token).and_then(ErasedCodec::downcast)
    }

    fn staged<T: 'static>(
        creating: &RefCell<Creating>,
        token: &TypeToken,
    ) -> Option<Arc<dyn Codec<T>>> {
        creating
            .borrow()
            .staged
            .get(token)
            .and_then(ErasedCodec::downcast)
    }

    // Record the outcome of one creation. Once the outermost creation on this
    // thread is done, staged codecs are published together, or all dropped if
    // any creation in the tree failed.
    fn settle(&self, creating: &RefCell<Creating>, created: Option<(TypeToken, ErasedCodec)>) {
        let mut state = creating.borrow_mut();
        match created {
            Some((token, codec)) => {
                state.staged.insert(token, codec);
            }
            None => state.failed = true,
        }

        if !state.waiting.is_empty() {
            return;
        }

        let staged = mem::take(&mut state.staged);
        if mem::take(&mut state.failed) {
            debug!(dropped = staged.len(), "creation failed, dropping staged codecs");
        } else {
            self.cache.write().extend(staged);
        }
    }

    fn claim(&self, token: &TypeToken) -> Option<Result<ErasedCodec, ResolveError>> {
        self.factories
            .iter()
            .find_map(|factory| factory.create(self, token))
    }

    fn create<T: Codable>(&self, token: &TypeToken) -> Result<Arc<dyn Codec<T>>, ResolveError> {
        match self.claim(token) {
            Some(claimed) => {
                let erased = claimed?;

                erased
                    .downcast::<T>()
                    .ok_or(ResolveError::TypeMismatch {
                        requested: token.name(),
                        produced: erased.token().name(),
                    })
            }
            None => {
                trace!(token = %token, "no factory claimed token, using default codec");
                T::default_codec(self)
            }
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

// the serializer only emits valid UTF-8
fn utf8(buf: Vec<u8>) -> String {
    String::from_utf8(buf).unwrap_or_else(|err| String::from_utf8_lossy(err.as_bytes()).into_owned())
}

///
/// RegistryBuilder
///

#[derive(Default)]
pub struct RegistryBuilder {
    factories: Vec<Box<dyn CodecFactory>>,
}

impl RegistryBuilder {
    /// Append a factory; earlier factories win over later ones.
    #[must_use]
    pub fn factory(mut self, factory: impl CodecFactory + 'static) -> Self {
        self.factories.push(Box::new(factory));
        self
    }

    /// Pin the codec used for `T`, overriding its default codec.
    #[must_use]
    pub fn codec<T: 'static>(self, codec: Arc<dyn Codec<T>>) -> Self {
        self.factory(ExactFactory::new(codec))
    }

    #[must_use]
    pub fn build(self) -> Registry {
        Registry {
            factories: self.factories,
            cache: RwLock::new(HashMap::new()),
            creating: ReentrantMutex::new(RefCell::new(Creating::default())),
        }
    }
}

///
/// TESTS
///
