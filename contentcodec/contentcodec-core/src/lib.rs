//! Format-agnostic core types and codec contracts for `contentcodec`.
//!
//! This crate provides the dynamically typed [`Value`] tree, the [`MimeType`]
//! registry with its header helpers, the [`ContentEncoder`] /
//! [`ContentDecoder`] traits with their replaceable registries, and the
//! [`DataSchema`] capability trait.

mod codec;
mod document;
mod error;
mod headers;
mod map;
mod mimetype;
mod schema;
mod value;
mod value_serde;

pub use codec::{
    CodecRegistry, CodecRegistryBuilder, ContentDecoder, ContentEncoder, DecoderRegistry,
    EncoderRegistry,
};
pub use document::{DocumentView, map_to_document, value_to_bson};
pub use error::{BoxError, ContentError, ValidationError, ValueTypeError};
pub use headers::{CONTENT_TYPE_HEADER, Headers, convert_params_headers};
pub use map::ValueMap;
pub use mimetype::MimeType;
pub use schema::DataSchema;
pub use value::{OpaqueValue, Value, ValueKind};
