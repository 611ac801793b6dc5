
use bytes::Bytes;
use contentcodec_core::{ContentDecoder, ContentEncoder, ContentError, Value};
use contentcodec_protobuf::{DynamicMessage, ProtoCodec, parse_message_descriptor};
use prost::Message;
use prost_reflect::ReflectMessage;
use prost_reflect::Value as ProtoValue;
use test_helpers::*;

fn tags_message(tags: &[&str]) -> DynamicMessage {
    let descriptor = parse_message_descriptor("test.Tags", &point_and_tags_fds()).unwrap();
    let mut message = DynamicMessage::new(descriptor);
    message.set_field_by_name(
        "tags",
        ProtoValue::List(
            tags.iter()
                .map(|t| ProtoValue::String(t.to_string()))
                .collect(),
        ),
    );
    message
}

#[test]
fn bytes_pass_through_unchanged() {
    let codec = ProtoCodec::new();
    assert_eq!(codec.encode(&Value::bytes(b"\x08\x01")).unwrap(), b"\x08\x01");
}

#[test]
fn opaque_message_is_serialized() {
    let message = tags_message(&["a", "b"]);
    let encoded = ProtoCodec::new().encode(&Value::opaque(message.clone())).unwrap();
    assert_eq!(encoded, message.encode_to_vec());
}

#[test]
fn other_values_are_unrepresentable() {
    let codec = ProtoCodec::new();
    for value in [
        Value::string("text"),
        Value::map([("a", Value::Int(1))]),
        Value::opaque(7u8),
    ] {
        let err = codec.encode(&value).unwrap_err();
        assert!(matches!(err, ContentError::Unrepresentable { .. }), "{err}");
    }
}

#[test]
fn unbound_decoder_yields_raw_bytes() {
    let payload = tags_message(&["x"]).encode_to_vec();
    let value = ProtoCodec::new().decode(Bytes::from(payload.clone())).unwrap();
    assert_eq!(value, Value::from(payload));
}

#[test]
fn bound_decoder_yields_a_message() {
    let message = tags_message(&["x", "y", "z"]);
    let codec = ProtoCodec::for_message(message.descriptor());

    let value = codec.decode(Bytes::from(message.encode_to_vec())).unwrap();
    let Value::Opaque(opaque) = &value else {
        panic!("expected opaque message, got {value:?}");
    };
    let decoded = opaque.downcast_ref::<DynamicMessage>().unwrap();
    assert_eq!(decoded, &message);

    assert_eq!(codec.encode(&value).unwrap(), message.encode_to_vec());
}

#[test]
fn bound_codec_rejects_other_message_types() {
    let point = parse_message_descriptor("test.Point", &point_and_tags_fds()).unwrap();
    let codec = ProtoCodec::for_message(point);

    let err = codec.encode(&Value::opaque(tags_message(&[]))).unwrap_err();
    assert!(err.is_encode_error());
    assert!(
        codec
            .decode(Bytes::from_static(&[0xff]))
            .unwrap_err()
            .is_decode_error()
    );
}
