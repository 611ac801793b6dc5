//! Ordered string mapping shared by content-type, error and paging headers.

use crate::{error::ContentError, map::ValueMap, mimetype::MimeType};

/// Header carrying the canonical content-type wire string.
pub const CONTENT_TYPE_HEADER: &str = "Content-Type";

/// Ordered string-to-string mapping for headers and query parameters.
///
/// Keys compare ASCII case-insensitively and keep their first spelling;
/// insertion order is preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(k, _)| k.eq_ignore_ascii_case(key))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.position(key).map(|i| self.entries[i].1.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Insert or replace a value, returning the replaced one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        match self.position(&key) {
            Some(i) => Some(std::mem::replace(&mut self.entries[i].1, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.position(key).map(|i| self.entries.remove(i).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (k, v) in iter {
            headers.insert(k, v);
        }
        headers
    }
}

/// Stringify scalar parameters for use as header or query values.
///
/// Lists, maps and binary values have no header representation and are
/// rejected.
pub fn convert_params_headers(params: &ValueMap) -> Result<Headers, ContentError> {
    params
        .iter()
        .map(|(key, value)| {
            value
                .scalar_text()
                .map(|text| (key, text))
                .ok_or_else(|| ContentError::unrepresentable(&MimeType::Text, value))
        })
        .collect()
}
