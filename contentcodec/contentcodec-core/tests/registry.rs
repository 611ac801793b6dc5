use bytes::Bytes;
use contentcodec_core::{
    ContentDecoder, ContentEncoder, ContentError, DecoderRegistry, EncoderRegistry, MimeType,
    ValidationError, Value,
};

fn fixed_encoder(payload: &'static [u8]) -> impl ContentEncoder {
    move |_: &Value| -> Result<Vec<u8>, ContentError> { Ok(payload.to_vec()) }
}

#[test]
fn closures_are_codecs() {
    let encoder = fixed_encoder(b"abc");
    assert_eq!(encoder.encode(&Value::Null).unwrap(), b"abc");

    let decoder = |data: Bytes| -> Result<Value, ContentError> { Ok(Value::bytes(&data)) };
    assert_eq!(
        decoder.decode(Bytes::from_static(b"xy")).unwrap(),
        Value::bytes(b"xy")
    );
}

#[test]
fn encode_optional_none_skips_the_encoder() {
    let encoder = |_: &Value| -> Result<Vec<u8>, ContentError> {
        panic!("encoder must not run for absent content")
    };
    assert!(encoder.encode_optional(None).unwrap().is_empty());
}

#[test]
fn with_encoder_returns_a_fresh_registry() {
    let base = EncoderRegistry::builder()
        .with_encoder(MimeType::Json, fixed_encoder(b"json"))
        .build();
    let extended = base.with_encoder("text/csv", fixed_encoder(b"csv"));

    assert_eq!(base.len(), 1);
    assert!(!base.contains(&MimeType::from("text/csv")));
    assert_eq!(extended.len(), 2);

    let csv = extended.get(&MimeType::Unknown("text/csv".into())).unwrap();
    assert_eq!(csv.encode(&Value::Null).unwrap(), b"csv");
}

#[test]
fn registration_resolves_aliases() {
    let registry = EncoderRegistry::new().with_encoder("JSON", fixed_encoder(b"{}"));
    assert!(registry.contains(&MimeType::Json));
}

#[test]
fn merged_overrides_shadow_base_entries() {
    let base = EncoderRegistry::builder()
        .with_encoder(MimeType::Json, fixed_encoder(b"base"))
        .with_encoder(MimeType::Yaml, fixed_encoder(b"base"))
        .build();
    let overrides = EncoderRegistry::new().with_encoder(MimeType::Json, fixed_encoder(b"over"));

    let merged = base.merged(&overrides);

    let encode = |m: MimeType| merged.get(&m).unwrap().encode(&Value::Null).unwrap();
    assert_eq!(encode(MimeType::Json), b"over");
    assert_eq!(encode(MimeType::Yaml), b"base");
    assert_eq!(
        base.get(&MimeType::Json).unwrap().encode(&Value::Null).unwrap(),
        b"base"
    );
}

#[test]
fn decoder_registry_lookup_misses_unknown_types() {
    let registry = DecoderRegistry::new().with_decoder(
        MimeType::Text,
        |data: Bytes| -> Result<Value, ContentError> { Ok(Value::bytes(&data)) },
    );
    assert!(registry.get(&MimeType::Text).is_some());
    assert!(registry.get(&MimeType::from("application/unknown")).is_none());
    assert_eq!(registry.mimetypes().collect::<Vec<_>>(), vec![&MimeType::Text]);
}

#[test]
fn error_kind_predicates_follow_the_hierarchy() {
    assert!(ContentError::NoContent.is_decode_error());
    assert!(ContentError::NoContent.is_no_content());

    let sniff = ContentError::SniffFailed {
        attempted: vec!["application/json".into(), "text/plain".into()],
    };
    assert!(sniff.is_decode_error());
    assert!(!sniff.is_no_content());
    assert_eq!(
        sniff.to_string(),
        "could not infer content type, tried: application/json, text/plain"
    );

    let decode = ContentError::decode(&MimeType::Json, "bad");
    assert!(decode.is_decode_error());
    assert!(!decode.is_no_content());
    assert!(!decode.is_encode_error());

    let unrepresentable = ContentError::unrepresentable(&MimeType::Yaml, &Value::opaque(1u8));
    assert!(unrepresentable.is_encode_error());
    assert!(!unrepresentable.is_decode_error());

    assert!(ContentError::type_unknown(None).is_type_unknown());
    assert_eq!(
        ContentError::type_unknown(None).to_string(),
        "no codec registered for content type '<none>'"
    );

    let validation: ContentError = ValidationError::field("num", "must be 10").into();
    assert!(validation.is_validation_error());
    assert!(!validation.is_encode_error());
    assert!(!validation.is_decode_error());
}

#[test]
fn validation_error_collects_field_messages() {
    let mut error = ValidationError::field("num", "must be 10");
    error.merge(ValidationError::field("num", "must be even"));
    error.add("name", "required");

    assert_eq!(error.messages("num"), ["must be 10", "must be even"]);
    assert_eq!(error.messages("missing"), [] as [String; 0]);
    assert_eq!(
        error.to_string(),
        "validation failed: name: required; num: must be 10, must be even"
    );
}
