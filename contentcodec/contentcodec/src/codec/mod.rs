//! Built-in codecs. The structured ones normalize their input for the
//! target format before serializing; plain text takes strings only.

mod document;
mod json;
mod text;
mod yaml;

use contentcodec_core::{ContentError, MimeType, Value};

pub use self::{document::BsonCodec, json::JsonCodec, text::TextCodec, yaml::YamlCodec};

/// Structured-text payloads must hold a mapping or a sequence at the top.
fn require_container(value: Value, mimetype: &MimeType) -> Result<Value, ContentError> {
    match value {
        Value::Map(_) | Value::List(_) => Ok(value),
        other => Err(ContentError::decode(
            mimetype,
            format!(
                "top-level {} is not a mapping or a sequence",
                other.type_name()
            ),
        )),
    }
}
