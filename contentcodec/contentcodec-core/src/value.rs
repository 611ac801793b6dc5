//! Dynamically typed value tree exchanged between schemas, the normalizer
//! and codecs.

use std::{any::Any, fmt, sync::Arc};

use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    document::DocumentView,
    error::{ContentError, ValueTypeError},
    map::ValueMap,
};

/// In-memory content.
///
/// `Null`, `Bool`, `Int`, `UInt`, `Float`, `String`, `List` and `Map` are
/// native to every structured format. The remaining scalars need a per-format
/// normalization rule; see [`ValueKind`].
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    /// Unsigned integer beyond the `i64` range. Smaller values decode as `Int`.
    UInt(u64),
    Float(f64),
    String(Arc<str>),
    /// Raw binary data.
    Bytes(Arc<[u8]>),
    Uuid(Uuid),
    DateTime(DateTime<FixedOffset>),
    Decimal(Decimal),
    /// BSON document still in its encoded form.
    Document(DocumentView),
    List(Vec<Value>),
    Map(ValueMap),
    /// Rust value without a built-in wire representation.
    Opaque(OpaqueValue),
}

/// Per-node tag the normalizer dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Representable by every structured format as-is.
    Native,
    Identifier,
    Timestamp,
    Decimal,
    Binary,
    Document,
    /// List or map; normalized by recursion.
    Container,
    /// No normalization rule exists.
    Opaque,
}

impl Value {
    pub fn string(s: impl AsRef<str>) -> Self {
        Self::String(Arc::from(s.as_ref()))
    }

    pub fn bytes(b: impl AsRef<[u8]>) -> Self {
        Self::Bytes(Arc::from(b.as_ref()))
    }

    pub fn opaque<T: Any + Send + Sync>(value: T) -> Self {
        Self::Opaque(OpaqueValue::new(value))
    }

    pub fn map<K: Into<Arc<str>>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Self::Map(entries.into_iter().collect())
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null
            | Value::Bool(_)
            | Value::Int(_)
            | Value::UInt(_)
            | Value::Float(_)
            | Value::String(_) => ValueKind::Native,
            Value::Bytes(_) => ValueKind::Binary,
            Value::Uuid(_) => ValueKind::Identifier,
            Value::DateTime(_) => ValueKind::Timestamp,
            Value::Decimal(_) => ValueKind::Decimal,
            Value::Document(_) => ValueKind::Document,
            Value::List(_) | Value::Map(_) => ValueKind::Container,
            Value::Opaque(_) => ValueKind::Opaque,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::UInt(_) => "uint",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Uuid(_) => "uuid",
            Value::DateTime(_) => "datetime",
            Value::Decimal(_) => "decimal",
            Value::Document(_) => "document",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Opaque(v) => v.type_name(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Look up a key of a `Map`. Other variants have no keys.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Map(map) => map.get(key),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&ValueMap> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn try_bool(&self) -> Result<Option<bool>, ValueTypeError> {
        match self {
            Value::Bool(v) => Ok(Some(*v)),
            Value::Null => Ok(None),
            _ => Err(self.type_mismatch("bool")),
        }
    }

    pub fn try_i64(&self) -> Result<Option<i64>, ValueTypeError> {
        match self {
            Value::Int(v) => Ok(Some(*v)),
            Value::UInt(v) => i64::try_from(*v)
                .map(Some)
                .map_err(|_| self.type_mismatch("int")),
            Value::Null => Ok(None),
            _ => Err(self.type_mismatch("int")),
        }
    }

    pub fn try_u64(&self) -> Result<Option<u64>, ValueTypeError> {
        match self {
            Value::UInt(v) => Ok(Some(*v)),
            Value::Int(v) => u64::try_from(*v)
                .map(Some)
                .map_err(|_| self.type_mismatch("uint")),
            Value::Null => Ok(None),
            _ => Err(self.type_mismatch("uint")),
        }
    }

    pub fn try_f64(&self) -> Result<Option<f64>, ValueTypeError> {
        match self {
            Value::Float(v) => Ok(Some(*v)),
            Value::Int(v) => Ok(Some(*v as f64)),
            Value::UInt(v) => Ok(Some(*v as f64)),
            Value::Null => Ok(None),
            _ => Err(self.type_mismatch("float")),
        }
    }

    pub fn try_str(&self) -> Result<Option<&str>, ValueTypeError> {
        match self {
            Value::String(v) => Ok(Some(v.as_ref())),
            Value::Null => Ok(None),
            _ => Err(self.type_mismatch("string")),
        }
    }

    pub fn try_bytes(&self) -> Result<Option<&[u8]>, ValueTypeError> {
        match self {
            Value::Bytes(v) => Ok(Some(v.as_ref())),
            Value::Null => Ok(None),
            _ => Err(self.type_mismatch("bytes")),
        }
    }

    pub fn type_mismatch(&self, expected: impl Into<String>) -> ValueTypeError {
        ValueTypeError::new(expected, self.type_name())
    }

    /// Text form of a scalar, as used by text formats and header values.
    ///
    /// Identifiers use the hyphenated form, timestamps RFC 3339 with the
    /// offset kept. Returns `None` for containers, binary data, documents and
    /// opaque values.
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            Value::Bool(v) => Some(v.to_string()),
            Value::Int(v) => Some(v.to_string()),
            Value::UInt(v) => Some(v.to_string()),
            Value::Float(v) => Some(v.to_string()),
            Value::String(v) => Some(v.to_string()),
            Value::Uuid(v) => Some(v.hyphenated().to_string()),
            Value::DateTime(v) => Some(v.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Value::Decimal(v) => Some(v.to_string()),
            _ => None,
        }
    }

    /// Copy of this tree with every [`Value::Document`] expanded into maps
    /// and lists.
    pub fn expanded(&self) -> Result<Value, ContentError> {
        match self {
            Value::Document(doc) => doc.to_value(),
            Value::List(items) => items
                .iter()
                .map(Value::expanded)
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            Value::Map(map) => map
                .iter()
                .map(|(k, v)| Ok((k, v.expanded()?)))
                .collect::<Result<ValueMap, ContentError>>()
                .map(Value::Map),
            other => Ok(other.clone()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::UInt(a), Value::UInt(b)) => a == b,
            (Value::Int(i), Value::UInt(u)) | (Value::UInt(u), Value::Int(i)) => {
                u64::try_from(*i).is_ok_and(|i| i == *u)
            }
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Uuid(a), Value::Uuid(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            (Value::Decimal(a), Value::Decimal(b)) => a == b,
            (Value::Document(a), Value::Document(b)) if a.as_bytes() == b.as_bytes() => true,
            (Value::Document(doc), other) | (other, Value::Document(doc)) => {
                doc.to_value().is_ok_and(|expanded| &expanded == other)
            }
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Opaque(a), Value::Opaque(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        match i64::try_from(v) {
            Ok(v) => Value::Int(v),
            Err(_) => Value::UInt(v),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::string(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(Arc::from(v))
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(Arc::from(v))
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Uuid(v)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(v: DateTime<FixedOffset>) -> Self {
        Value::DateTime(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::DateTime(v.fixed_offset())
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Value::Decimal(v)
    }
}

impl From<DocumentView> for Value {
    fn from(v: DocumentView) -> Self {
        Value::Document(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}

impl From<ValueMap> for Value {
    fn from(v: ValueMap) -> Self {
        Value::Map(v)
    }
}

/// Shared handle to an arbitrary Rust value carried through a [`Value`] tree.
///
/// Built-in codecs reject opaque values; custom codecs may downcast them.
#[derive(Clone)]
pub struct OpaqueValue {
    type_name: &'static str,
    inner: Arc<dyn Any + Send + Sync>,
}

impl OpaqueValue {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            inner: Arc::new(value),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        (*self.inner).downcast_ref::<T>()
    }

    /// Whether both handles share the same allocation.
    pub fn ptr_eq(&self, other: &OpaqueValue) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for OpaqueValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("OpaqueValue").field(&self.type_name).finish()
    }
}
