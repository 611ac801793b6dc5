//! Zero-copy views over BSON documents and conversions between BSON elements
//! and [`Value`].

use std::{fmt, sync::Arc};

use bson::{
    Binary, Bson, Decimal128, Document, RawArray, RawBsonRef, RawDocument, spec::BinarySubtype,
};
use bytes::Bytes;
use chrono::DateTime;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{error::ContentError, map::ValueMap, mimetype::MimeType, value::Value};

/// Exponent bias of the IEEE 754-2008 decimal128 format.
const DECIMAL128_EXPONENT_BIAS: i32 = 6176;
/// Largest scale a [`Decimal`] can carry.
const MAX_DECIMAL_SCALE: u32 = 28;

/// Encoded BSON document backed by a shared payload buffer.
///
/// Sub-documents handed out by [`DocumentView::unwrap_list`] slice the same
/// buffer instead of copying it.
#[derive(Clone)]
pub struct DocumentView {
    bytes: Bytes,
}

impl DocumentView {
    /// Wrap encoded document bytes after checking every element, nested ones
    /// included. Nothing is copied.
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Result<Self, ContentError> {
        let bytes = bytes.into();
        let raw = RawDocument::from_bytes(bytes.as_ref()).map_err(bson_decode_error)?;
        check_document(raw)?;
        Ok(Self { bytes })
    }

    /// Encode an owned document into a view.
    pub fn from_document(document: &Document) -> Result<Self, ContentError> {
        let mut buf = Vec::new();
        document
            .to_writer(&mut buf)
            .map_err(|e| ContentError::encode(&MimeType::Bson, e))?;
        Ok(Self { bytes: buf.into() })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn raw(&self) -> Result<&RawDocument, ContentError> {
        RawDocument::from_bytes(self.bytes.as_ref()).map_err(bson_decode_error)
    }

    /// Parse into an owned document.
    pub fn to_document(&self) -> Result<Document, ContentError> {
        Document::from_reader(self.bytes.as_ref()).map_err(bson_decode_error)
    }

    /// Expand into a [`Value::Map`], converting nested documents as well.
    pub fn to_value(&self) -> Result<Value, ContentError> {
        raw_document_to_map(self.raw()?).map(Value::Map)
    }

    /// Look up and convert a single top-level element.
    pub fn get(&self, key: &str) -> Result<Option<Value>, ContentError> {
        self.raw()?
            .get(key)
            .map_err(bson_decode_error)?
            .map(raw_to_value)
            .transpose()
    }

    pub fn keys(&self) -> Result<Vec<String>, ContentError> {
        self.raw()?
            .into_iter()
            .map(|element| element.map(|(key, _)| key.to_string()))
            .collect::<Result<_, _>>()
            .map_err(bson_decode_error)
    }

    /// If this document holds exactly one element, named `key` and holding
    /// an array, return the array items. Document items stay views over
    /// this buffer.
    pub fn unwrap_list(&self, key: &str) -> Result<Option<Vec<Value>>, ContentError> {
        let raw = self.raw()?;
        let mut elements = raw.into_iter();
        let array = match (elements.next(), elements.next()) {
            (Some(first), None) => match first.map_err(bson_decode_error)? {
                (name, RawBsonRef::Array(array)) if name == key => array,
                _ => return Ok(None),
            },
            _ => return Ok(None),
        };

        array
            .into_iter()
            .map(|item| match item.map_err(bson_decode_error)? {
                RawBsonRef::Document(doc) => Ok(Value::Document(DocumentView {
                    bytes: self.bytes.slice_ref(doc.as_bytes()),
                })),
                other => raw_to_value(other),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }
}

impl fmt::Debug for DocumentView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_value() {
            Ok(value) => f.debug_tuple("DocumentView").field(&value).finish(),
            Err(_) => f
                .debug_struct("DocumentView")
                .field("len", &self.bytes.len())
                .finish_non_exhaustive(),
        }
    }
}

fn bson_decode_error(e: impl Into<crate::error::BoxError>) -> ContentError {
    ContentError::decode(&MimeType::Bson, e)
}

fn check_document(doc: &RawDocument) -> Result<(), ContentError> {
    for element in doc {
        let (_, value) = element.map_err(bson_decode_error)?;
        check_element(value)?;
    }
    Ok(())
}

fn check_element(value: RawBsonRef<'_>) -> Result<(), ContentError> {
    match value {
        RawBsonRef::Document(doc) => check_document(doc),
        RawBsonRef::Array(array) => {
            for item in array {
                check_element(item.map_err(bson_decode_error)?)?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

fn raw_document_to_map(doc: &RawDocument) -> Result<ValueMap, ContentError> {
    let mut map = ValueMap::new();
    for element in doc {
        let (key, value) = element.map_err(bson_decode_error)?;
        map.insert(key, raw_to_value(value)?);
    }
    Ok(map)
}

fn raw_array_to_list(array: &RawArray) -> Result<Vec<Value>, ContentError> {
    array
        .into_iter()
        .map(|item| raw_to_value(item.map_err(bson_decode_error)?))
        .collect()
}

/// Convert a borrowed BSON element into a [`Value`].
///
/// Generic binary stays binary, UUID-subtype binary becomes [`Value::Uuid`],
/// object ids become their hex string. Elements without a [`Value`]
/// counterpart (regular expressions, code, min/max keys, db pointers) are
/// decode errors.
fn raw_to_value(raw: RawBsonRef<'_>) -> Result<Value, ContentError> {
    let value = match raw {
        RawBsonRef::Null | RawBsonRef::Undefined => Value::Null,
        RawBsonRef::Boolean(v) => Value::Bool(v),
        RawBsonRef::Int32(v) => Value::Int(v.into()),
        RawBsonRef::Int64(v) => Value::Int(v),
        RawBsonRef::Double(v) => Value::Float(v),
        RawBsonRef::String(v) | RawBsonRef::Symbol(v) => Value::string(v),
        RawBsonRef::Binary(bin) => match bin.subtype {
            BinarySubtype::Uuid if bin.bytes.len() == 16 => {
                Value::Uuid(Uuid::from_slice(bin.bytes).map_err(bson_decode_error)?)
            }
            _ => Value::Bytes(Arc::from(bin.bytes)),
        },
        RawBsonRef::ObjectId(oid) => Value::string(oid.to_hex()),
        RawBsonRef::DateTime(dt) => {
            let millis = dt.timestamp_millis();
            let utc = DateTime::from_timestamp_millis(millis).ok_or_else(|| {
                bson_decode_error(format!("datetime out of range: {millis} ms"))
            })?;
            Value::DateTime(utc.fixed_offset())
        }
        RawBsonRef::Timestamp(ts) => {
            Value::Int((i64::from(ts.time) << 32) | i64::from(ts.increment))
        }
        RawBsonRef::Decimal128(d) => Value::Decimal(decimal_from_bson(d).ok_or_else(|| {
            bson_decode_error(format!("decimal128 {d:?} does not fit a 96-bit decimal"))
        })?),
        RawBsonRef::Document(doc) => Value::Map(raw_document_to_map(doc)?),
        RawBsonRef::Array(array) => Value::List(raw_array_to_list(array)?),
        other => {
            return Err(bson_decode_error(format!(
                "unsupported BSON element type {:?}",
                other.element_type()
            )));
        }
    };
    Ok(value)
}

/// Convert a [`Value`] into an owned BSON element.
///
/// Identifiers, timestamps, decimals and binary data keep their native BSON
/// types. Timestamps are truncated to millisecond precision.
pub fn value_to_bson(value: &Value) -> Result<Bson, ContentError> {
    let bson = match value {
        Value::Null => Bson::Null,
        Value::Bool(v) => Bson::Boolean(*v),
        Value::Int(v) => match i32::try_from(*v) {
            Ok(small) => Bson::Int32(small),
            Err(_) => Bson::Int64(*v),
        },
        Value::UInt(v) => match i64::try_from(*v) {
            Ok(v) => Bson::Int64(v),
            Err(_) => Bson::Decimal128(decimal_to_bson(Decimal::from(*v))),
        },
        Value::Float(v) => Bson::Double(*v),
        Value::String(v) => Bson::String(v.to_string()),
        Value::Bytes(v) => Bson::Binary(Binary {
            subtype: BinarySubtype::Generic,
            bytes: v.to_vec(),
        }),
        Value::Uuid(v) => Bson::Binary(Binary {
            subtype: BinarySubtype::Uuid,
            bytes: v.as_bytes().to_vec(),
        }),
        Value::DateTime(v) => Bson::DateTime(bson::DateTime::from_millis(v.timestamp_millis())),
        Value::Decimal(v) => Bson::Decimal128(decimal_to_bson(*v)),
        Value::Document(doc) => Bson::Document(doc.to_document()?),
        Value::List(items) => Bson::Array(
            items
                .iter()
                .map(value_to_bson)
                .collect::<Result<_, _>>()?,
        ),
        Value::Map(map) => Bson::Document(map_to_document(map)?),
        Value::Opaque(_) => return Err(ContentError::unrepresentable(&MimeType::Bson, value)),
    };
    Ok(bson)
}

pub fn map_to_document(map: &ValueMap) -> Result<Document, ContentError> {
    let mut document = Document::new();
    for (key, value) in map.iter() {
        document.insert(key, value_to_bson(value)?);
    }
    Ok(document)
}

/// Encode a decimal as IEEE 754-2008 decimal128 (binary integer decimal).
fn decimal_to_bson(value: Decimal) -> Decimal128 {
    let sign = if value.is_sign_negative() { 1u128 << 127 } else { 0 };
    let exponent = (DECIMAL128_EXPONENT_BIAS - value.scale() as i32) as u128;
    let coefficient = value.mantissa().unsigned_abs();
    Decimal128::from_bytes((sign | (exponent << 113) | coefficient).to_le_bytes())
}

/// Decode a decimal128 if it is finite and fits a [`Decimal`].
fn decimal_from_bson(value: Decimal128) -> Option<Decimal> {
    let bits = u128::from_le_bytes(value.bytes());
    // Infinity, NaN and the large-coefficient form all set both combination bits.
    if (bits >> 125) & 0b11 == 0b11 {
        return None;
    }
    let negative = bits >> 127 == 1;
    let mut exponent = ((bits >> 113) & 0x3FFF) as i32 - DECIMAL128_EXPONENT_BIAS;
    let mut coefficient = i128::try_from(bits & ((1u128 << 113) - 1)).ok()?;

    while exponent > 0 {
        coefficient = coefficient.checked_mul(10)?;
        exponent -= 1;
    }
    let mut scale = exponent.unsigned_abs();
    while scale > MAX_DECIMAL_SCALE {
        if coefficient % 10 != 0 {
            return None;
        }
        coefficient /= 10;
        scale -= 1;
    }
    if negative {
        coefficient = -coefficient;
    }
    Decimal::try_from_i128_with_scale(coefficient, scale).ok()
}
