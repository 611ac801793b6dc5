use bytes::Bytes;
use contentcodec_core::{
    ContentDecoder, ContentEncoder, ContentError, DocumentView, MimeType, Value, map_to_document,
};

use crate::normalize::{denormalize_for_decode, normalize_for_encode};

/// `application/bson` codec.
///
/// Decoding returns a [`Value::Document`] view over the payload (or a list of
/// views when the payload is a wrapped list) instead of parsing eagerly.
#[derive(Debug, Clone, Copy, Default)]
pub struct BsonCodec;

impl ContentEncoder for BsonCodec {
    fn encode(&self, value: &Value) -> Result<Vec<u8>, ContentError> {
        let document = match normalize_for_encode(value, &MimeType::Bson)? {
            Value::Map(map) => map_to_document(&map)?,
            Value::Document(view) => return Ok(view.as_bytes().to_vec()),
            other => return Err(ContentError::unrepresentable(&MimeType::Bson, &other)),
        };
        let mut buf = Vec::new();
        document
            .to_writer(&mut buf)
            .map_err(|e| ContentError::encode(&MimeType::Bson, e))?;
        Ok(buf)
    }
}

impl ContentDecoder for BsonCodec {
    fn decode(&self, data: Bytes) -> Result<Value, ContentError> {
        let view = DocumentView::from_bytes(data)?;
        denormalize_for_decode(Value::Document(view), &MimeType::Bson)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_input_is_written_verbatim() {
        let view = DocumentView::from_document(&bson::doc! {"key": "value"}).unwrap();
        let encoded = BsonCodec.encode(&Value::Document(view.clone())).unwrap();
        assert_eq!(encoded, view.as_bytes());
    }

    #[test]
    fn decoded_list_items_share_the_payload() {
        let encoded = BsonCodec
            .encode(&Value::List(vec![
                Value::map([("a", Value::Int(1))]),
                Value::map([("a", Value::Int(2))]),
            ]))
            .unwrap();
        let decoded = BsonCodec.decode(Bytes::from(encoded)).unwrap();

        let Value::List(items) = &decoded else {
            panic!("expected list, got {decoded:?}");
        };
        assert!(items.iter().all(|item| matches!(item, Value::Document(_))));
        assert_eq!(items[1], Value::map([("a", Value::Int(2))]));
    }

    #[test]
    fn truncated_payload_is_a_decode_error() {
        let err = BsonCodec
            .decode(Bytes::from_static(&[0x05, 0x00, 0x00]))
            .unwrap_err();
        assert!(err.is_decode_error());
    }
}
