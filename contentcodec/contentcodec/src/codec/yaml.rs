use bytes::Bytes;
use contentcodec_core::{ContentDecoder, ContentEncoder, ContentError, MimeType, Value};

use super::require_container;
use crate::normalize::normalize_for_encode;

/// `application/yaml` codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlCodec;

impl ContentEncoder for YamlCodec {
    fn encode(&self, value: &Value) -> Result<Vec<u8>, ContentError> {
        let normalized = normalize_for_encode(value, &MimeType::Yaml)?;
        serde_yaml::to_string(&normalized)
            .map(String::into_bytes)
            .map_err(|e| ContentError::encode(&MimeType::Yaml, e))
    }
}

impl ContentDecoder for YamlCodec {
    fn decode(&self, data: Bytes) -> Result<Value, ContentError> {
        let value: Value =
            serde_yaml::from_slice(&data).map_err(|e| ContentError::decode(&MimeType::Yaml, e))?;
        require_container(value, &MimeType::Yaml)
    }
}
