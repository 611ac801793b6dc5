//! Error types for content encoding and decoding.

use std::{collections::BTreeMap, fmt};

use crate::{mimetype::MimeType, value::Value};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Error returned by codecs, schemas and the dispatch functions.
///
/// `NoContent` and `SniffFailed` are specializations of a decode failure:
/// [`ContentError::is_decode_error`] is true for them as well as for `Decode`.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// No codec is registered for the content type, or no content type was
    /// given and sniffing was not allowed.
    #[error("no codec registered for content type '{mimetype}'")]
    TypeUnknown { mimetype: String },

    /// Payload bytes could not be parsed as the declared format.
    #[error("failed to decode '{mimetype}' content: {source}")]
    Decode {
        mimetype: String,
        #[source]
        source: BoxError,
    },

    /// The payload to decode was empty.
    #[error("no content to decode")]
    NoContent,

    /// Every candidate format was tried while sniffing and none matched.
    #[error("could not infer content type, tried: {}", attempted.join(", "))]
    SniffFailed { attempted: Vec<String> },

    /// The format serializer rejected a value.
    #[error("failed to encode content as '{mimetype}': {source}")]
    Encode {
        mimetype: String,
        #[source]
        source: BoxError,
    },

    /// A value has no normalization rule for the target format.
    #[error("value of type '{type_name}' cannot be represented as '{mimetype}'")]
    Unrepresentable { mimetype: String, type_name: String },

    /// A schema rejected the shape of the content.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A content type was required but none was given.
    #[error("a content type is required")]
    MimeTypeRequired,
}

impl ContentError {
    pub fn decode(mimetype: &MimeType, source: impl Into<BoxError>) -> Self {
        Self::Decode {
            mimetype: mimetype.to_string(),
            source: source.into(),
        }
    }

    pub fn encode(mimetype: &MimeType, source: impl Into<BoxError>) -> Self {
        Self::Encode {
            mimetype: mimetype.to_string(),
            source: source.into(),
        }
    }

    pub fn unrepresentable(mimetype: &MimeType, value: &Value) -> Self {
        Self::Unrepresentable {
            mimetype: mimetype.to_string(),
            type_name: value.type_name().to_string(),
        }
    }

    pub fn type_unknown(mimetype: Option<&MimeType>) -> Self {
        Self::TypeUnknown {
            mimetype: mimetype.map_or_else(|| "<none>".to_string(), MimeType::to_string),
        }
    }

    /// True for every decode-time failure, including [`ContentError::NoContent`].
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            Self::Decode { .. } | Self::NoContent | Self::SniffFailed { .. }
        )
    }

    pub fn is_no_content(&self) -> bool {
        matches!(self, Self::NoContent)
    }

    pub fn is_encode_error(&self) -> bool {
        matches!(self, Self::Encode { .. } | Self::Unrepresentable { .. })
    }

    pub fn is_type_unknown(&self) -> bool {
        matches!(self, Self::TypeUnknown { .. })
    }

    pub fn is_validation_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Field-level validation failure raised by a [`DataSchema`](crate::DataSchema).
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
pub struct ValidationError {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationError {
    pub fn new() -> Self {
        Self::default()
    }

    /// A failure for a single field.
    pub fn field(name: impl Into<String>, message: impl Into<String>) -> Self {
        let mut error = Self::new();
        error.add(name, message);
        error
    }

    pub fn add(&mut self, name: impl Into<String>, message: impl Into<String>) {
        self.fields
            .entry(name.into())
            .or_default()
            .push(message.into());
    }

    pub fn merge(&mut self, other: ValidationError) {
        for (name, messages) in other.fields {
            self.fields.entry(name).or_default().extend(messages);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Messages recorded for `name`.
    pub fn messages(&self, name: &str) -> &[String] {
        self.fields.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("validation failed")?;
        for (i, (name, messages)) in self.fields.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{sep}{name}: {}", messages.join(", "))?;
        }
        Ok(())
    }
}

/// Error returned when a [`Value`] accessor finds a different variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected {expected}, found {actual}")]
pub struct ValueTypeError {
    pub expected: String,
    pub actual: String,
}

impl ValueTypeError {
    pub fn new(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}
