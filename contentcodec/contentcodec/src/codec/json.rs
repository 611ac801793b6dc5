use bytes::Bytes;
use contentcodec_core::{ContentDecoder, ContentEncoder, ContentError, MimeType, Value};

use super::require_container;
use crate::normalize::normalize_for_encode;

/// `application/json` codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl ContentEncoder for JsonCodec {
    fn encode(&self, value: &Value) -> Result<Vec<u8>, ContentError> {
        let normalized = normalize_for_encode(value, &MimeType::Json)?;
        serde_json::to_vec(&normalized).map_err(|e| ContentError::encode(&MimeType::Json, e))
    }
}

impl ContentDecoder for JsonCodec {
    fn decode(&self, data: Bytes) -> Result<Value, ContentError> {
        let value: Value =
            serde_json::from_slice(&data).map_err(|e| ContentError::decode(&MimeType::Json, e))?;
        require_container(value, &MimeType::Json)
    }
}
