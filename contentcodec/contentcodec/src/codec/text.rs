use bytes::Bytes;
use contentcodec_core::{ContentDecoder, ContentEncoder, ContentError, MimeType, Value};

/// `text/plain` codec: UTF-8 strings only, never parsed further.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextCodec;

impl ContentEncoder for TextCodec {
    fn encode(&self, value: &Value) -> Result<Vec<u8>, ContentError> {
        match value {
            Value::String(text) => Ok(text.as_bytes().to_vec()),
            other => Err(ContentError::unrepresentable(&MimeType::Text, other)),
        }
    }
}

impl ContentDecoder for TextCodec {
    fn decode(&self, data: Bytes) -> Result<Value, ContentError> {
        std::str::from_utf8(&data)
            .map(Value::string)
            .map_err(|e| ContentError::decode(&MimeType::Text, e))
    }
}
