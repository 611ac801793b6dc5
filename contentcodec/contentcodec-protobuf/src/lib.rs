//! Protocol buffer support for contentcodec.
//!
//! [`ProtoSchema`] binds a message descriptor as a [`DataSchema`] whose
//! objects are `prost_reflect::DynamicMessage`s, and [`ProtoCodec`] is the
//! encode/decode pair registered for [`MimeType::Proto`].
//!
//! [`DataSchema`]: contentcodec_core::DataSchema
//! [`MimeType::Proto`]: contentcodec_core::MimeType::Proto

mod codec;
mod error;
mod schema;

pub use codec::ProtoCodec;
pub use error::ProtoSchemaError;
pub use prost_reflect::{DynamicMessage, MessageDescriptor};
pub use schema::{ProtoSchema, parse_message_descriptor};
