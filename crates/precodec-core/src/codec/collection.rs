use super::{Codable, Codec};
use crate::{
    error::{ResolveError, StreamError},
    registry::Registry,
    stream::{JsonReader, JsonWriter, Token},
};
use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

///
/// OptionCodec
///
/// `None` is written as `null`; `null` reads back as `None`.
///

pub struct OptionCodec<T: 'static> {
    inner: Arc<dyn Codec<T>>,
}

impl<T: 'static> OptionCodec<T> {
    #[must_use]
    pub fn new(inner: Arc<dyn Codec<T>>) -> Self {
        Self { inner }
    }
}

impl<T: 'static> Codec<Option<T>> for OptionCodec<T> {
    fn write(&self, writer: &mut JsonWriter<'_>, value: &Option<T>) -> Result<(), StreamError> {
        match value {
            Some(inner) => self.inner.write(writer, inner),
            None => writer.null_value(),
        }
    }

    fn read(&self, reader: &mut JsonReader<'_>) -> Result<Option<T>, StreamError> {
        if reader.peek()? == Token::Null {
            reader.next_null()?;
            return Ok(None);
        }

        self.inner.read(reader).map(Some)
    }
}

impl<T: Codable> Codable for Option<T> {
    fn default_codec(registry: &Registry) -> Result<Arc<dyn Codec<Self>>, ResolveError> {
        Ok(Arc::new(OptionCodec::new(registry.codec::<T>()?)))
    }
}

///
/// BoxCodec
///

pub struct BoxCodec<T: 'static> {
    inner: Arc<dyn Codec<T>>,
}

impl<T: 'static> Codec<Box<T>> for BoxCodec<T> {
    fn write(&self, writer: &mut JsonWriter<'_>, value: &Box<T>) -> Result<(), StreamError> {
        self.inner.write(writer, value)
    }

    fn read(&self, reader: &mut JsonReader<'_>) -> Result<Box<T>, StreamError> {
        self.inner.read(reader).map(Box::new)
    }
}

impl<T: Codable> Codable for Box<T> {
    fn default_codec(registry: &Registry) -> Result<Arc<dyn Codec<Self>>, ResolveError> {
        Ok(Arc::new(BoxCodec {
            inner: registry.codec::<T>()?,
        }))
    }
}

///
/// VecCodec
///

pub struct VecCodec<T: 'static> {
    element: Arc<dyn Codec<T>>,
}

impl<T: 'static> VecCodec<T> {
    #[must_use]
    pub fn new(element: Arc<dyn Codec<T>>) -> Self {
        Self { element }
    }
}

impl<T: 'static> Codec<Vec<T>> for VecCodec<T> {
    fn write(&self, writer: &mut JsonWriter<'_>, value: &Vec<T>) -> Result<(), StreamError> {
        writer.begin_array()?;
        for item in value {
            self.element.write(writer, item)?;
        }
        writer.end_array()
    }

    fn read(&self, reader: &mut JsonReader<'_>) -> Result<Vec<T>, StreamError> {
        let mut items = Vec::new();

        reader.begin_array()?;
        while reader.has_next()? {
            items.push(self.element.read(reader)?);
        }
        reader.end_array()?;

        Ok(items)
    }
}

impl<T: Codable> Codable for Vec<T> {
    fn default_codec(registry: &Registry) -> Result<Arc<dyn Codec<Self>>, ResolveError> {
        Ok(Arc::new(VecCodec::new(registry.codec::<T>()?)))
    }
}

///
/// MapCodec
///
/// String-keyed maps as JSON objects. A repeated key keeps the last value.
///

pub struct MapCodec<V: 'static> {
    value: Arc<dyn Codec<V>>,
}

impl<V: 'static> MapCodec<V> {
    #[must_use]
    pub fn new(value: Arc<dyn Codec<V>>) -> Self {
        Self { value }
    }

    fn write_entries<'v>(
        &self,
        writer: &mut JsonWriter<'_>,
        entries: impl Iterator<Item = (&'v String, &'v V)>,
    ) -> Result<(), StreamError> {
        writer.begin_object()?;
        for (key, value) in entries {
            writer.name(key)?;
            self.value.write(writer, value)?;
        }
        writer.end_object()
    }

    fn read_entries(
        &self,
        reader: &mut JsonReader<'_>,
        mut insert: impl FnMut(String, V),
    ) -> Result<(), StreamError> {
        reader.begin_object()?;
        while reader.has_next()? {
            let key = reader.next_name()?;
            insert(key, self.value.read(reader)?);
        }
        reader.end_object()
    }
}

impl<V: 'static> Codec<BTreeMap<String, V>> for MapCodec<V> {
    fn write(
        &self,
        writer: &mut JsonWriter<'_>,
        value: &BTreeMap<String, V>,
    ) -> Result<(), StreamError> {
        self.write_entries(writer, value.iter())
    }

    fn read(&self, reader: &mut JsonReader<'_>) -> Result<BTreeMap<String, V>, StreamError> {
        let mut map = BTreeMap::new();
        self.read_entries(reader, |key, value| {
            map.insert(key, value);
        })?;

        Ok(map)
    }
}

impl<V: 'static> Codec<HashMap<String, V>> for MapCodec<V> {
    fn write(
        &self,
        writer: &mut JsonWriter<'_>,
        value: &HashMap<String, V>,
    ) -> Result<(), StreamError> {
        self.write_entries(writer, value.iter())
    }

    fn read(&self, reader: &mut JsonReader<'_>) -> Result<HashMap<String, V>, StreamError> {
        let mut map = HashMap::new();
        self.read_entries(reader, |key, value| {
            map.insert(key, value);
        })?;

        Ok(map)
    }
}

impl<V: Codable> Codable for BTreeMap<String, V> {
    fn default_codec(registry: &Registry) -> Result<Arc<dyn Codec<Self>>, ResolveError> {
        Ok(Arc::new(MapCodec::new(registry.codec::<V>()?)))
    }
}

impl<V: Codable> Codable for HashMap<String, V> {
    fn default_codec(registry: &Registry) -> Result<Arc<dyn Codec<Self>>, ResolveError> {
        Ok(Arc::new(MapCodec::new(registry.codec::<V>()?)))
    }
}

///
/// TESTS
///
