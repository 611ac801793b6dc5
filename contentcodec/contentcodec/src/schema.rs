//! [`DataSchema`] adapter for `serde` types.

use std::{fmt, marker::PhantomData};

use contentcodec_core::{ContentError, DataSchema, MimeType, ValidationError, Value};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::normalize::normalize_for_encode;

type Validator<T> = Box<dyn Fn(&T) -> Result<(), ValidationError> + Send + Sync>;

/// Schema for any `Serialize + DeserializeOwned` type.
///
/// Objects go through the JSON data model: `dump` yields the tree
/// `serde_json` would write, and `load` normalizes the decoded tree with the
/// JSON rules before deserializing, so identifiers and timestamps decoded
/// natively from BSON load the same way as their JSON strings. Load failures
/// are reported as validation errors under the `_schema` field.
pub struct SerdeSchema<T> {
    validators: Vec<Validator<T>>,
    mimetype: Option<MimeType>,
    _object: PhantomData<fn() -> T>,
}

impl<T> SerdeSchema<T> {
    pub fn new() -> Self {
        Self {
            validators: Vec::new(),
            mimetype: None,
            _object: PhantomData,
        }
    }

    /// Add a validator run by [`DataSchema::validate`]. Every validator runs
    /// and their failures are merged.
    pub fn with_validator(
        mut self,
        validator: impl Fn(&T) -> Result<(), ValidationError> + Send + Sync + 'static,
    ) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    /// Bind the schema to one content type, used when a call declares none.
    pub fn with_mimetype(mut self, mimetype: impl Into<MimeType>) -> Self {
        self.mimetype = Some(mimetype.into());
        self
    }
}

impl<T> Default for SerdeSchema<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for SerdeSchema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerdeSchema")
            .field("object", &std::any::type_name::<T>())
            .field("validators", &self.validators.len())
            .field("mimetype", &self.mimetype)
            .finish()
    }
}

impl<T: Serialize + DeserializeOwned> DataSchema for SerdeSchema<T> {
    type Object = T;

    fn dump(&self, object: &T) -> Result<Value, ContentError> {
        let json =
            serde_json::to_value(object).map_err(|e| ContentError::encode(&MimeType::Json, e))?;
        Value::deserialize(json).map_err(|e| ContentError::encode(&MimeType::Json, e))
    }

    fn load(&self, value: Value) -> Result<T, ContentError> {
        let normalized = normalize_for_encode(&value, &MimeType::Json)?;
        serde_json::to_value(&normalized)
            .and_then(serde_json::from_value)
            .map_err(|e| ValidationError::field("_schema", e.to_string()).into())
    }

    fn validate(&self, object: &T) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new();
        for validator in &self.validators {
            if let Err(error) = validator(object) {
                errors.merge(error);
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn bound_mimetype(&self) -> Option<MimeType> {
        self.mimetype.clone()
    }
}
