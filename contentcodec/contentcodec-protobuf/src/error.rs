//! Error types for descriptor handling.

use prost_reflect::MessageDescriptor;

/// Error raised while resolving a protobuf message descriptor.
#[derive(Debug, thiserror::Error)]
pub enum ProtoSchemaError {
    /// Descriptor data (a serialized `FileDescriptorSet`) could not be parsed.
    #[error("failed to parse descriptor set for '{message_name}': {source}")]
    SchemaParse {
        message_name: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The descriptor set parsed but does not declare the message.
    #[error("message descriptor not found: '{message_name}'")]
    MessageNotFound { message_name: String },

    /// A message of another type was handed to a bound schema or codec.
    #[error("expected message '{expected}', got '{actual}'")]
    MessageMismatch { expected: String, actual: String },
}

impl ProtoSchemaError {
    pub(crate) fn mismatch(expected: &MessageDescriptor, actual: &MessageDescriptor) -> Self {
        Self::MessageMismatch {
            expected: expected.full_name().to_string(),
            actual: actual.full_name().to_string(),
        }
    }
}
