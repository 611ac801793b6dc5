//! [`DataSchema`] over a protobuf message descriptor.

use contentcodec_core::{ContentError, DataSchema, MimeType, ValidationError, Value};
use prost::Message;
use prost_reflect::{DescriptorPool, DynamicMessage, MessageDescriptor, ReflectMessage};

use crate::error::ProtoSchemaError;

/// Resolve `message_name` (e.g. `"my.package.MyMessage"`) in serialized
/// `google.protobuf.FileDescriptorSet` bytes.
pub fn parse_message_descriptor(
    message_name: &str,
    descriptor_set: &[u8],
) -> Result<MessageDescriptor, ProtoSchemaError> {
    let pool =
        DescriptorPool::decode(descriptor_set).map_err(|e| ProtoSchemaError::SchemaParse {
            message_name: message_name.to_string(),
            source: Box::new(e),
        })?;
    pool.get_message_by_name(message_name)
        .ok_or_else(|| ProtoSchemaError::MessageNotFound {
            message_name: message_name.to_string(),
        })
}

/// Schema whose objects are messages of one protobuf type.
///
/// `dump` and `load` are the message's own wire serialization, so content
/// bound to this schema always travels as [`MimeType::Proto`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtoSchema {
    descriptor: MessageDescriptor,
}

impl ProtoSchema {
    pub fn new(descriptor: MessageDescriptor) -> Self {
        Self { descriptor }
    }

    /// Build a schema from serialized `FileDescriptorSet` bytes.
    pub fn from_file_descriptor_set(
        message_name: &str,
        descriptor_set: &[u8],
    ) -> Result<Self, ProtoSchemaError> {
        parse_message_descriptor(message_name, descriptor_set).map(Self::new)
    }

    pub fn descriptor(&self) -> &MessageDescriptor {
        &self.descriptor
    }

    fn check(&self, message: &DynamicMessage) -> Result<(), ProtoSchemaError> {
        let actual = message.descriptor();
        if actual == self.descriptor {
            Ok(())
        } else {
            Err(ProtoSchemaError::mismatch(&self.descriptor, &actual))
        }
    }
}

impl DataSchema for ProtoSchema {
    type Object = DynamicMessage;

    fn dump(&self, object: &DynamicMessage) -> Result<Value, ContentError> {
        self.check(object)
            .map_err(|e| ContentError::encode(&MimeType::Proto, e))?;
        Ok(Value::from(object.encode_to_vec()))
    }

    fn load(&self, value: Value) -> Result<DynamicMessage, ContentError> {
        match value {
            Value::Bytes(data) => DynamicMessage::decode(self.descriptor.clone(), data.as_ref())
                .map_err(|e| ContentError::decode(&MimeType::Proto, e)),
            Value::Opaque(opaque) => {
                let message = opaque
                    .downcast_ref::<DynamicMessage>()
                    .ok_or_else(|| {
                        ContentError::decode(
                            &MimeType::Proto,
                            format!("expected a protobuf message, got {}", opaque.type_name()),
                        )
                    })?;
                self.check(message)
                    .map_err(|e| ContentError::decode(&MimeType::Proto, e))?;
                Ok(message.clone())
            }
            other => Err(ContentError::decode(
                &MimeType::Proto,
                other.type_mismatch("bytes"),
            )),
        }
    }

    fn validate(&self, object: &DynamicMessage) -> Result<(), ValidationError> {
        self.check(object)
            .map_err(|e| ValidationError::field("message", e.to_string()))
    }

    fn bound_mimetype(&self) -> Option<MimeType> {
        Some(MimeType::Proto)
    }
}
