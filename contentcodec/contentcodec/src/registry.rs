//! Process-wide default codec registries.

use std::sync::LazyLock;

use contentcodec_core::{DecoderRegistry, EncoderRegistry, MimeType};
#[cfg(feature = "protobuf")]
use contentcodec_protobuf::ProtoCodec;

use crate::codec::{BsonCodec, JsonCodec, TextCodec, YamlCodec};

static DEFAULT_ENCODERS: LazyLock<EncoderRegistry> = LazyLock::new(|| {
    let builder = EncoderRegistry::builder()
        .with_encoder(MimeType::Json, JsonCodec)
        .with_encoder(MimeType::Yaml, YamlCodec)
        .with_encoder(MimeType::Bson, BsonCodec)
        .with_encoder(MimeType::Text, TextCodec);
    #[cfg(feature = "protobuf")]
    let builder = builder.with_encoder(MimeType::Proto, ProtoCodec::new());
    builder.build()
});

static DEFAULT_DECODERS: LazyLock<DecoderRegistry> = LazyLock::new(|| {
    let builder = DecoderRegistry::builder()
        .with_decoder(MimeType::Json, JsonCodec)
        .with_decoder(MimeType::Yaml, YamlCodec)
        .with_decoder(MimeType::Bson, BsonCodec)
        .with_decoder(MimeType::Text, TextCodec);
    #[cfg(feature = "protobuf")]
    let builder = builder.with_decoder(MimeType::Proto, ProtoCodec::new());
    builder.build()
});

/// Encoders used when a call does not supply its own registry.
///
/// Derive a custom registry with
/// [`EncoderRegistry::with_encoder`](contentcodec_core::EncoderRegistry::with_encoder);
/// the shared default itself never changes.
pub fn default_encoders() -> &'static EncoderRegistry {
    &DEFAULT_ENCODERS
}

/// Decoders used when a call does not supply its own registry.
pub fn default_decoders() -> &'static DecoderRegistry {
    &DEFAULT_DECODERS
}
