//! Schema capability bound to a single encode or decode call.

use crate::{
    error::{ContentError, ValidationError},
    mimetype::MimeType,
    value::Value,
};

/// Bidirectional mapping between a domain object and a [`Value`] tree.
///
/// On encode, [`DataSchema::validate`] runs when the caller asks for
/// validation, then [`DataSchema::dump`] produces the tree handed to the
/// codec. On decode, [`DataSchema::load`] receives the decoded tree with
/// every binary document already expanded.
pub trait DataSchema {
    type Object;

    fn dump(&self, object: &Self::Object) -> Result<Value, ContentError>;

    fn load(&self, value: Value) -> Result<Self::Object, ContentError>;

    /// Run the schema's declared validators against `object`.
    fn validate(&self, _object: &Self::Object) -> Result<(), ValidationError> {
        Ok(())
    }

    /// Content type this schema always encodes to, if any.
    fn bound_mimetype(&self) -> Option<MimeType> {
        None
    }
}
