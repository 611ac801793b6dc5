//! Encode/decode pair for [`MimeType::Proto`].

use bytes::Bytes;
use contentcodec_core::{ContentDecoder, ContentEncoder, ContentError, MimeType, Value};
use prost::Message;
use prost_reflect::{DynamicMessage, MessageDescriptor, ReflectMessage};

use crate::error::ProtoSchemaError;

/// Protobuf codec.
///
/// Encoding accepts pre-serialized [`Value::Bytes`] or a `DynamicMessage`
/// carried as [`Value::Opaque`]. Decoding yields the raw payload as
/// [`Value::Bytes`], unless the codec was built with
/// [`ProtoCodec::for_message`], in which case the payload is parsed into an
/// opaque `DynamicMessage`.
#[derive(Debug, Clone, Default)]
pub struct ProtoCodec {
    descriptor: Option<MessageDescriptor>,
}

impl ProtoCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Codec bound to one message type.
    pub fn for_message(descriptor: MessageDescriptor) -> Self {
        Self {
            descriptor: Some(descriptor),
        }
    }

    pub fn descriptor(&self) -> Option<&MessageDescriptor> {
        self.descriptor.as_ref()
    }
}

impl ContentEncoder for ProtoCodec {
    fn encode(&self, value: &Value) -> Result<Vec<u8>, ContentError> {
        match value {
            Value::Bytes(data) => Ok(data.to_vec()),
            Value::Opaque(opaque) => {
                let message = opaque
                    .downcast_ref::<DynamicMessage>()
                    .ok_or_else(|| ContentError::unrepresentable(&MimeType::Proto, value))?;
                if let Some(expected) = &self.descriptor {
                    let actual = message.descriptor();
                    if actual != *expected {
                        return Err(ContentError::encode(
                            &MimeType::Proto,
                            ProtoSchemaError::mismatch(expected, &actual),
                        ));
                    }
                }
                Ok(message.encode_to_vec())
            }
            other => Err(ContentError::unrepresentable(&MimeType::Proto, other)),
        }
    }
}

impl ContentDecoder for ProtoCodec {
    fn decode(&self, data: Bytes) -> Result<Value, ContentError> {
        let Some(descriptor) = &self.descriptor else {
            return Ok(Value::bytes(&data));
        };
        DynamicMessage::decode(descriptor.clone(), data)
            .map(Value::opaque)
            .map_err(|e| ContentError::decode(&MimeType::Proto, e))
    }
}
