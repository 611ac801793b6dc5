//! Encoder/decoder traits and the replaceable per-call registries keyed by
//! [`MimeType`].

use std::{collections::HashMap, fmt, sync::Arc};

use bytes::Bytes;

use crate::{error::ContentError, mimetype::MimeType, value::Value};

/// Serializes a [`Value`] tree into one content type.
///
/// Any `Fn(&Value) -> Result<Vec<u8>, ContentError>` closure is an encoder.
pub trait ContentEncoder: Send + Sync {
    fn encode(&self, value: &Value) -> Result<Vec<u8>, ContentError>;

    /// Encode optional content; `None` yields an empty payload without
    /// invoking the format serializer.
    fn encode_optional(&self, value: Option<&Value>) -> Result<Vec<u8>, ContentError> {
        match value {
            Some(value) => self.encode(value),
            None => Ok(Vec::new()),
        }
    }
}

/// Parses a payload of one content type into a [`Value`] tree.
///
/// Any `Fn(Bytes) -> Result<Value, ContentError>` closure is a decoder.
pub trait ContentDecoder: Send + Sync {
    fn decode(&self, data: Bytes) -> Result<Value, ContentError>;
}

impl<F> ContentEncoder for F
where
    F: Fn(&Value) -> Result<Vec<u8>, ContentError> + Send + Sync,
{
    fn encode(&self, value: &Value) -> Result<Vec<u8>, ContentError> {
        self(value)
    }
}

impl<F> ContentDecoder for F
where
    F: Fn(Bytes) -> Result<Value, ContentError> + Send + Sync,
{
    fn decode(&self, data: Bytes) -> Result<Value, ContentError> {
        self(data)
    }
}

/// Immutable mapping from content type to codec.
///
/// Overriding entries always produces a new registry, so a shared default
/// can be read concurrently while callers derive their own variants.
pub struct CodecRegistry<C: ?Sized> {
    codecs: HashMap<MimeType, Arc<C>>,
}

pub type EncoderRegistry = CodecRegistry<dyn ContentEncoder>;
pub type DecoderRegistry = CodecRegistry<dyn ContentDecoder>;

/// Builder for [`CodecRegistry`].
pub struct CodecRegistryBuilder<C: ?Sized> {
    codecs: HashMap<MimeType, Arc<C>>,
}

impl<C: ?Sized> CodecRegistry<C> {
    pub fn new() -> Self {
        Self {
            codecs: HashMap::new(),
        }
    }

    /// Create a builder for [`CodecRegistry`].
    pub fn builder() -> CodecRegistryBuilder<C> {
        CodecRegistryBuilder {
            codecs: HashMap::new(),
        }
    }

    /// Start a builder from this registry's entries.
    pub fn to_builder(&self) -> CodecRegistryBuilder<C> {
        CodecRegistryBuilder {
            codecs: self.codecs.clone(),
        }
    }

    pub fn get(&self, mimetype: &MimeType) -> Option<&Arc<C>> {
        self.codecs.get(mimetype)
    }

    pub fn contains(&self, mimetype: &MimeType) -> bool {
        self.codecs.contains_key(mimetype)
    }

    pub fn mimetypes(&self) -> impl Iterator<Item = &MimeType> {
        self.codecs.keys()
    }

    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }

    /// Copy of this registry with one entry added or replaced.
    pub fn with_shared(&self, mimetype: impl Into<MimeType>, codec: Arc<C>) -> Self {
        self.to_builder().with_shared(mimetype, codec).build()
    }

    /// Copy of this registry with every entry of `overrides` laid over it.
    pub fn merged(&self, overrides: &Self) -> Self {
        let mut codecs = self.codecs.clone();
        codecs.extend(
            overrides
                .codecs
                .iter()
                .map(|(k, v)| (k.clone(), Arc::clone(v))),
        );
        Self { codecs }
    }
}

impl EncoderRegistry {
    /// Copy of this registry with `encoder` registered for `mimetype`.
    pub fn with_encoder(
        &self,
        mimetype: impl Into<MimeType>,
        encoder: impl ContentEncoder + 'static,
    ) -> Self {
        self.with_shared(mimetype, Arc::new(encoder))
    }
}

impl DecoderRegistry {
    /// Copy of this registry with `decoder` registered for `mimetype`.
    pub fn with_decoder(
        &self,
        mimetype: impl Into<MimeType>,
        decoder: impl ContentDecoder + 'static,
    ) -> Self {
        self.with_shared(mimetype, Arc::new(decoder))
    }
}

impl<C: ?Sized> Clone for CodecRegistry<C> {
    fn clone(&self) -> Self {
        Self {
            codecs: self.codecs.clone(),
        }
    }
}

impl<C: ?Sized> Default for CodecRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ?Sized> fmt::Debug for CodecRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.codecs.keys()).finish()
    }
}

impl<C: ?Sized> CodecRegistryBuilder<C> {
    /// Register a shared codec, replacing any previous one for the type.
    pub fn with_shared(mut self, mimetype: impl Into<MimeType>, codec: Arc<C>) -> Self {
        self.codecs.insert(mimetype.into(), codec);
        self
    }

    /// Build the registry.
    pub fn build(self) -> CodecRegistry<C> {
        CodecRegistry {
            codecs: self.codecs,
        }
    }
}

impl CodecRegistryBuilder<dyn ContentEncoder> {
    /// Register an encoder.
    pub fn with_encoder(
        self,
        mimetype: impl Into<MimeType>,
        encoder: impl ContentEncoder + 'static,
    ) -> Self {
        self.with_shared(mimetype, Arc::new(encoder))
    }
}

impl CodecRegistryBuilder<dyn ContentDecoder> {
    /// Register a decoder.
    pub fn with_decoder(
        self,
        mimetype: impl Into<MimeType>,
        decoder: impl ContentDecoder + 'static,
    ) -> Self {
        self.with_shared(mimetype, Arc::new(decoder))
    }
}
