//! Encode/decode dispatch: content type resolution, header handling, schema
//! binding and codec selection.

use bytes::Bytes;
use contentcodec_core::{
    ContentError, DataSchema, DecoderRegistry, EncoderRegistry, Headers, MimeType, Value,
};
use tracing::{debug, trace};

use crate::registry::{default_decoders, default_encoders};

/// Types tried, in order, when decoding without a declared type.
const SNIFF_ORDER: [MimeType; 2] = [MimeType::Json, MimeType::Text];

/// Per-call encoding configuration.
#[derive(Debug, Clone, Default)]
pub struct EncodeOptions<'r> {
    mimetype: Option<MimeType>,
    validate: bool,
    encoders: Option<&'r EncoderRegistry>,
}

impl<'r> EncodeOptions<'r> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the content type. Aliases resolve as in [`MimeType::from_name`].
    pub fn with_mimetype(mut self, mimetype: impl Into<MimeType>) -> Self {
        self.mimetype = Some(mimetype.into());
        self
    }

    /// Run the schema's validators before dumping an object.
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    /// Use `encoders` instead of [`default_encoders`].
    pub fn with_encoders(mut self, encoders: &'r EncoderRegistry) -> Self {
        self.encoders = Some(encoders);
        self
    }

    pub fn mimetype(&self) -> Option<&MimeType> {
        self.mimetype.as_ref()
    }

    fn encoders(&self) -> &'r EncoderRegistry {
        self.encoders.unwrap_or_else(|| default_encoders())
    }
}

/// Per-call decoding configuration.
#[derive(Debug, Clone, Default)]
pub struct DecodeOptions<'r> {
    mimetype: Option<MimeType>,
    sniff: bool,
    decoders: Option<&'r DecoderRegistry>,
}

impl<'r> DecodeOptions<'r> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the content type of the payload.
    pub fn with_mimetype(mut self, mimetype: impl Into<MimeType>) -> Self {
        self.mimetype = Some(mimetype.into());
        self
    }

    /// Allow guessing the type when none is declared.
    pub fn with_sniffing(mut self, sniff: bool) -> Self {
        self.sniff = sniff;
        self
    }

    /// Use `decoders` instead of [`default_decoders`].
    pub fn with_decoders(mut self, decoders: &'r DecoderRegistry) -> Self {
        self.decoders = Some(decoders);
        self
    }

    pub fn mimetype(&self) -> Option<&MimeType> {
        self.mimetype.as_ref()
    }

    fn decoders(&self) -> &'r DecoderRegistry {
        self.decoders.unwrap_or_else(|| default_decoders())
    }
}

/// Encode a [`Value`] tree.
///
/// `None` content yields an empty payload without resolving a type or
/// touching `headers`. Otherwise the resolved type's canonical string is
/// written to `headers` before the codec runs. Without a declared type,
/// strings encode as `text/plain` and everything else as JSON.
///
/// If no codec is registered for the type, bytes and strings pass through
/// unchanged and any other content fails with
/// [`ContentError::TypeUnknown`].
pub fn encode_content(
    content: Option<&Value>,
    headers: Option<&mut Headers>,
    options: &EncodeOptions<'_>,
) -> Result<Vec<u8>, ContentError> {
    let Some(content) = content else {
        return Ok(Vec::new());
    };
    let mimetype = resolve_encode_type(options.mimetype(), None, content);
    if let Some(headers) = headers {
        MimeType::write_header(headers, Some(&mimetype));
    }
    encode_with(content, &mimetype, options.encoders())
}

/// Encode a domain object through `schema`.
///
/// With validation requested, a failing validator aborts with
/// [`ContentError::Validation`] before anything is dumped or encoded. The
/// schema's bound type applies when no type is declared.
pub fn encode_object<S: DataSchema>(
    object: Option<&S::Object>,
    schema: &S,
    headers: Option<&mut Headers>,
    options: &EncodeOptions<'_>,
) -> Result<Vec<u8>, ContentError> {
    let Some(object) = object else {
        return Ok(Vec::new());
    };
    if options.validate {
        schema.validate(object)?;
    }
    let content = schema.dump(object)?;
    let mimetype = resolve_encode_type(options.mimetype(), schema.bound_mimetype(), &content);
    if let Some(headers) = headers {
        MimeType::write_header(headers, Some(&mimetype));
    }
    encode_with(&content, &mimetype, options.encoders())
}

/// Decode a payload into a generic [`Value`] tree.
///
/// An empty payload is always [`ContentError::NoContent`]. Without a declared
/// type the payload is sniffed if allowed (JSON, then plain text) and is
/// otherwise [`ContentError::TypeUnknown`]. BSON payloads decode to
/// [`Value::Document`] views backed by `data`.
pub fn decode_content(
    data: impl Into<Bytes>,
    options: &DecodeOptions<'_>,
) -> Result<Value, ContentError> {
    decode_with(data.into(), options.mimetype(), options)
}

/// Decode a payload and load it through `schema`.
///
/// Returns the loaded object together with the generic tree it was loaded
/// from. The schema receives the tree with every document view expanded.
/// The schema's bound type applies when no type is declared.
pub fn decode_object<S: DataSchema>(
    data: impl Into<Bytes>,
    schema: &S,
    options: &DecodeOptions<'_>,
) -> Result<(S::Object, Value), ContentError> {
    let bound = schema.bound_mimetype();
    let mimetype = options.mimetype().or(bound.as_ref());
    let content = decode_with(data.into(), mimetype, options)?;
    let object = schema.load(content.expanded()?)?;
    Ok((object, content))
}

fn resolve_encode_type(
    declared: Option<&MimeType>,
    bound: Option<MimeType>,
    content: &Value,
) -> MimeType {
    if let Some(mimetype) = declared {
        debug!(%mimetype, "using declared content type");
        return mimetype.clone();
    }
    if let Some(mimetype) = bound {
        debug!(%mimetype, "using schema-bound content type");
        return mimetype;
    }
    let mimetype = match content {
        Value::String(_) => MimeType::Text,
        _ => MimeType::Json,
    };
    debug!(%mimetype, "defaulted content type");
    mimetype
}

fn encode_with(
    content: &Value,
    mimetype: &MimeType,
    encoders: &EncoderRegistry,
) -> Result<Vec<u8>, ContentError> {
    if let Some(encoder) = encoders.get(mimetype) {
        debug!(%mimetype, "encoding content");
        return encoder.encode(content);
    }
    match content {
        Value::Bytes(data) => {
            debug!(%mimetype, len = data.len(), "no encoder registered, passing bytes through");
            Ok(data.to_vec())
        }
        Value::String(text) => {
            debug!(%mimetype, len = text.len(), "no encoder registered, passing text through");
            Ok(text.as_bytes().to_vec())
        }
        _ => Err(ContentError::type_unknown(Some(mimetype))),
    }
}

fn decode_with(
    data: Bytes,
    mimetype: Option<&MimeType>,
    options: &DecodeOptions<'_>,
) -> Result<Value, ContentError> {
    if data.is_empty() {
        return Err(ContentError::NoContent);
    }
    let decoders = options.decoders();
    match mimetype {
        Some(mimetype) => {
            let decoder = decoders
                .get(mimetype)
                .ok_or_else(|| ContentError::type_unknown(Some(mimetype)))?;
            debug!(%mimetype, len = data.len(), "decoding content");
            decoder.decode(data)
        }
        None if options.sniff => sniff(data, decoders),
        None => Err(ContentError::type_unknown(None)),
    }
}

fn sniff(data: Bytes, decoders: &DecoderRegistry) -> Result<Value, ContentError> {
    let mut attempted = Vec::with_capacity(SNIFF_ORDER.len());
    for mimetype in &SNIFF_ORDER {
        let Some(decoder) = decoders.get(mimetype) else {
            continue;
        };
        attempted.push(mimetype.to_string());
        match decoder.decode(data.clone()) {
            Ok(value) => {
                debug!(%mimetype, "sniffed content type");
                return Ok(value);
            }
            Err(error) => trace!(%mimetype, %error, "sniff attempt failed"),
        }
    }
    Err(ContentError::SniffFailed { attempted })
}
