//! MIME-typed content encoding and decoding.
//!
//! [`encode_content`] and [`decode_content`] dispatch a [`Value`] tree to the
//! codec registered for a [`MimeType`]: JSON, YAML, BSON and plain text are
//! built in, protocol buffers come with the default `protobuf` feature, and
//! callers can pass their own registries to add or shadow formats per call.
//! [`encode_object`] and [`decode_object`] do the same for domain objects
//! bound to a [`DataSchema`].

mod codec;
mod dispatch;
mod normalize;
mod registry;
mod schema;

pub use codec::{BsonCodec, JsonCodec, TextCodec, YamlCodec};
pub use contentcodec_core as core;
pub use contentcodec_core::{
    CONTENT_TYPE_HEADER, ContentDecoder, ContentEncoder, ContentError, DataSchema,
    DecoderRegistry, DocumentView, EncoderRegistry, Headers, MimeType, ValidationError, Value,
    ValueMap, convert_params_headers,
};
#[cfg(feature = "protobuf")]
pub use contentcodec_protobuf as protobuf;
pub use dispatch::{
    DecodeOptions, EncodeOptions, decode_content, decode_object, encode_content, encode_object,
};
pub use normalize::{LIST_WRAPPER_KEY, denormalize_for_decode, normalize_for_encode};
pub use registry::{default_decoders, default_encoders};
pub use schema::SerdeSchema;
