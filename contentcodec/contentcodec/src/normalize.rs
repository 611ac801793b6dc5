//! Per-format normalization of [`Value`] trees.
//!
//! Text formats (JSON, YAML, plain text) only carry the native subset, so
//! identifiers, timestamps and decimals become their text form, binary data
//! becomes lowercase hex and BSON documents are expanded. BSON keeps every
//! extra scalar natively but needs a document at the top level, so a bare
//! list is wrapped under [`LIST_WRAPPER_KEY`]. Other content types get the
//! tree unchanged.

use contentcodec_core::{ContentError, MimeType, Value, ValueKind, ValueMap};

/// Key of the single-element document a top-level list is wrapped in for BSON.
pub const LIST_WRAPPER_KEY: &str = "__list__";

/// Rewrite `value` into the subset `mimetype` can represent.
///
/// Values with no rule for the target (opaque values, or a top-level scalar
/// for BSON) fail with [`ContentError::Unrepresentable`].
pub fn normalize_for_encode(value: &Value, mimetype: &MimeType) -> Result<Value, ContentError> {
    match mimetype {
        MimeType::Json | MimeType::Yaml | MimeType::Text => to_text_subset(value, mimetype),
        MimeType::Bson => to_document_root(value),
        MimeType::Proto | MimeType::Unknown(_) => Ok(value.clone()),
    }
}

/// Undo encode-side wrapping on a freshly decoded tree.
///
/// For BSON, a document whose only element is a list under
/// [`LIST_WRAPPER_KEY`] becomes that list; its document items stay views
/// over the payload. Every other tree is returned as is.
pub fn denormalize_for_decode(value: Value, mimetype: &MimeType) -> Result<Value, ContentError> {
    if *mimetype != MimeType::Bson {
        return Ok(value);
    }
    let unwrapped = match &value {
        Value::Document(doc) => doc.unwrap_list(LIST_WRAPPER_KEY)?,
        Value::Map(map) if map.len() == 1 => match map.get(LIST_WRAPPER_KEY) {
            Some(Value::List(items)) => Some(items.clone()),
            _ => None,
        },
        _ => None,
    };
    Ok(unwrapped.map_or(value, Value::List))
}

fn to_text_subset(value: &Value, target: &MimeType) -> Result<Value, ContentError> {
    match value.kind() {
        // JSON has no NaN or infinity literal.
        ValueKind::Native if *target == MimeType::Json && is_non_finite(value) => {
            Err(ContentError::unrepresentable(target, value))
        }
        ValueKind::Native => Ok(value.clone()),
        ValueKind::Identifier | ValueKind::Timestamp | ValueKind::Decimal => value
            .scalar_text()
            .map(Value::from)
            .ok_or_else(|| ContentError::unrepresentable(target, value)),
        ValueKind::Binary => match value {
            Value::Bytes(data) => Ok(Value::from(hex::encode(data))),
            _ => Err(ContentError::unrepresentable(target, value)),
        },
        ValueKind::Document => to_text_subset(&value.expanded()?, target),
        ValueKind::Container => map_children(value, |child| to_text_subset(child, target)),
        ValueKind::Opaque => Err(ContentError::unrepresentable(target, value)),
    }
}

fn is_non_finite(value: &Value) -> bool {
    matches!(value, Value::Float(v) if !v.is_finite())
}

fn to_document_root(value: &Value) -> Result<Value, ContentError> {
    match value {
        Value::Map(_) | Value::Document(_) => to_document_subset(value),
        Value::List(_) => Ok(Value::map([(
            LIST_WRAPPER_KEY,
            to_document_subset(value)?,
        )])),
        other => Err(ContentError::unrepresentable(&MimeType::Bson, other)),
    }
}

fn to_document_subset(value: &Value) -> Result<Value, ContentError> {
    match value.kind() {
        ValueKind::Container => map_children(value, to_document_subset),
        ValueKind::Opaque => Err(ContentError::unrepresentable(&MimeType::Bson, value)),
        _ => Ok(value.clone()),
    }
}

fn map_children(
    value: &Value,
    f: impl Fn(&Value) -> Result<Value, ContentError>,
) -> Result<Value, ContentError> {
    match value {
        Value::List(items) => items
            .iter()
            .map(&f)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List),
        Value::Map(map) => map
            .iter()
            .map(|(key, child)| Ok((key, f(child)?)))
            .collect::<Result<ValueMap, ContentError>>()
            .map(Value::Map),
        other => Ok(other.clone()),
    }
}
