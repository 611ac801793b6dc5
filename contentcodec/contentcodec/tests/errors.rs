use bytes::Bytes;
use contentcodec::{
    ContentError, DecodeOptions, EncodeOptions, MimeType, Value, decode_content,
    default_decoders, default_encoders, encode_content,
};

/// Stand-in for a numeric type no format knows how to write.
#[derive(Debug)]
struct Fraction;

#[test]
fn unknown_type_rejects_structured_content() {
    let options = EncodeOptions::new().with_mimetype("application/unknown");
    let err = encode_content(
        Some(&Value::map([("key", Value::string("dict"))])),
        None,
        &options,
    )
    .unwrap_err();
    assert!(err.is_type_unknown(), "{err}");
    assert_eq!(
        err.to_string(),
        "no codec registered for content type 'application/unknown'"
    );
}

#[test]
fn sniffing_gives_up_on_binary_garbage() {
    let err = decode_content(
        &[0xffu8, 0xfe, 0x00, 0x81][..],
        &DecodeOptions::new().with_sniffing(true),
    )
    .unwrap_err();
    assert!(err.is_decode_error());
    assert!(!err.is_no_content());
    let ContentError::SniffFailed { attempted } = &err else {
        panic!("expected SniffFailed, got {err:?}");
    };
    assert_eq!(attempted, &["application/json", "text/plain"]);
}

#[test]
fn undeclared_type_without_sniffing_is_unknown() {
    let err = decode_content(&b"Some Bin Data"[..], &DecodeOptions::new()).unwrap_err();
    assert!(err.is_type_unknown());
}

#[test]
fn unregistered_decoder_is_unknown() {
    let options = DecodeOptions::new().with_mimetype("application/unknown");
    let err = decode_content(&b"Some Bin Data"[..], &options).unwrap_err();
    assert!(err.is_type_unknown());
}

#[test]
fn json_bare_string_is_a_decode_error() {
    let options = DecodeOptions::new().with_mimetype(MimeType::Json);
    let err = decode_content(&b"\"Some Data\""[..], &options).unwrap_err();
    assert!(err.is_decode_error());
    assert!(matches!(err, ContentError::Decode { .. }));
}

#[test]
fn malformed_yaml_and_bson_are_decode_errors() {
    for (mimetype, payload) in [
        (MimeType::Yaml, &b"key: [unterminated"[..]),
        (MimeType::Bson, &b"\x10\x00\x00\x00garbage"[..]),
    ] {
        let options = DecodeOptions::new().with_mimetype(mimetype.clone());
        let err = decode_content(payload, &options).unwrap_err();
        assert!(err.is_decode_error(), "{mimetype}: {err}");
    }
}

#[test]
fn corrupt_bson_element_is_a_decode_error() {
    let mut payload = Vec::new();
    bson::doc! {"a": 1, "b": 2, "c": "xyz"}
        .to_writer(&mut payload)
        .unwrap();
    // Length prefix of "xyz", followed by its 4 bytes and the document terminator.
    let at = payload.len() - 1 - 4 - 4;
    payload[at..at + 4].copy_from_slice(&65_539i32.to_le_bytes());

    let options = DecodeOptions::new().with_mimetype(MimeType::Bson);
    let err = decode_content(payload, &options).unwrap_err();
    assert!(err.is_decode_error(), "{err}");
    assert!(!err.is_no_content());
}

#[test]
fn json_rejects_non_finite_floats() {
    let options = EncodeOptions::new().with_mimetype(MimeType::Json);
    for f in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let content = Value::map([("f", Value::Float(f))]);
        let err = encode_content(Some(&content), None, &options).unwrap_err();
        assert!(matches!(err, ContentError::Unrepresentable { .. }), "{f}: {err}");
    }
}

#[test]
fn text_rejects_everything_but_strings() {
    let options = EncodeOptions::new().with_mimetype(MimeType::Text);
    for content in [
        Value::Int(5),
        Value::Bool(true),
        Value::from(uuid::Uuid::new_v4()),
        Value::from(rust_decimal::Decimal::new(15, 1)),
        Value::bytes([1u8, 2]),
    ] {
        let err = encode_content(Some(&content), None, &options).unwrap_err();
        assert!(err.is_encode_error(), "{content:?}: {err}");
    }
}

#[test]
fn values_without_a_rule_fail_to_encode() {
    let content = Value::map([("key", Value::opaque(Fraction))]);
    for mimetype in [MimeType::Json, MimeType::Yaml, MimeType::Bson, MimeType::Text] {
        let options = EncodeOptions::new().with_mimetype(mimetype.clone());
        let err = encode_content(Some(&content), None, &options).unwrap_err();
        assert!(err.is_encode_error(), "{mimetype}: {err}");
    }
}

#[test]
fn empty_payload_is_no_content() {
    let err = decode_content(Bytes::new(), &DecodeOptions::new()).unwrap_err();
    assert!(err.is_no_content());
    assert!(err.is_decode_error());

    let options = DecodeOptions::new()
        .with_mimetype(MimeType::Json)
        .with_sniffing(true);
    assert!(decode_content(Vec::new(), &options).unwrap_err().is_no_content());
}

fn csv_encode(value: &Value) -> Result<Vec<u8>, ContentError> {
    let csv = MimeType::from("text/csv");
    let rows = value
        .as_list()
        .ok_or_else(|| ContentError::unrepresentable(&csv, value))?;
    let Some(first) = rows.first().and_then(Value::as_map) else {
        return Ok(Vec::new());
    };
    let columns: Vec<&str> = first.keys().collect();

    let mut out = columns.join(",");
    out.push('\n');
    for row in rows {
        let cells = columns
            .iter()
            .map(|column| {
                row.get(column)
                    .and_then(Value::scalar_text)
                    .ok_or_else(|| ContentError::unrepresentable(&csv, row))
            })
            .collect::<Result<Vec<_>, _>>()?;
        out.push_str(&cells.join(","));
        out.push('\n');
    }
    Ok(out.into_bytes())
}

fn csv_decode(data: Bytes) -> Result<Value, ContentError> {
    let text =
        std::str::from_utf8(&data).map_err(|e| ContentError::decode(&"text/csv".into(), e))?;
    let mut lines = text.lines();
    let columns: Vec<&str> = lines.next().unwrap_or_default().split(',').collect();
    let rows = lines
        .map(|line| {
            Value::Map(
                columns
                    .iter()
                    .zip(line.split(','))
                    .map(|(column, cell)| (*column, Value::string(cell)))
                    .collect(),
            )
        })
        .collect();
    Ok(Value::List(rows))
}

#[test]
fn custom_registry_adds_a_format_per_call() {
    let encoders = default_encoders().with_encoder("text/csv", csv_encode);
    let decoders = default_decoders().with_decoder("text/csv", csv_decode);
    assert!(!default_encoders().contains(&MimeType::from("text/csv")));

    let data = Value::List(vec![
        Value::map([("key", Value::string("value1"))]),
        Value::map([("key", Value::string("value2"))]),
    ]);
    let encoded = encode_content(
        Some(&data),
        None,
        &EncodeOptions::new()
            .with_mimetype("text/csv")
            .with_encoders(&encoders),
    )
    .unwrap();
    assert_eq!(encoded, b"key\nvalue1\nvalue2\n");

    let decoded = decode_content(
        encoded,
        &DecodeOptions::new()
            .with_mimetype("text/csv")
            .with_decoders(&decoders),
    )
    .unwrap();
    assert_eq!(decoded, data);
}

#[test]
fn custom_registry_can_shadow_a_default() {
    let encoders = default_encoders().with_encoder(
        MimeType::Json,
        |_: &Value| -> Result<Vec<u8>, ContentError> { Ok(b"{}".to_vec()) },
    );
    let options = EncodeOptions::new()
        .with_mimetype(MimeType::Json)
        .with_encoders(&encoders);
    let encoded = encode_content(Some(&Value::map([("a", Value::Int(1))])), None, &options);
    assert_eq!(encoded.unwrap(), b"{}");
}
