use std::{collections::HashMap, fmt, sync::LazyLock};

use crate::{
    error::ContentError,
    headers::{CONTENT_TYPE_HEADER, Headers},
};

/// Content types with a built-in codec.
///
/// Resolution from a name is forgiving (case, `application/` and `x-`
/// prefixes, trailing parameters), while [`MimeType::as_str`] always yields
/// the one canonical wire string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MimeType {
    /// JSON (`application/json`)
    Json,
    /// YAML (`application/yaml`)
    Yaml,
    /// BSON (`application/bson`)
    Bson,
    /// UTF-8 plain text (`text/plain`)
    Text,
    /// Protocol Buffers (`application/protobuf`)
    Proto,
    /// Unknown/custom content type, kept exactly as given.
    Unknown(String),
}

static ALIASES: LazyLock<HashMap<&'static str, MimeType>> = LazyLock::new(|| {
    HashMap::from([
        ("json", MimeType::Json),
        ("yaml", MimeType::Yaml),
        ("yml", MimeType::Yaml),
        ("bson", MimeType::Bson),
        ("text/plain", MimeType::Text),
        ("text", MimeType::Text),
        ("plain", MimeType::Text),
        ("protobuf", MimeType::Proto),
        ("proto", MimeType::Proto),
    ])
});

/// Reduce a content-type name to its alias lookup key.
fn alias_key(name: &str) -> String {
    let essence = name.split(';').next().unwrap_or_default();
    let lowered = essence.trim().to_ascii_lowercase();
    let stripped = lowered.strip_prefix("application/").unwrap_or(&lowered);
    stripped.strip_prefix("x-").unwrap_or(stripped).to_string()
}

impl MimeType {
    /// Every content type with a canonical wire string.
    pub fn known() -> [MimeType; 5] {
        [
            MimeType::Json,
            MimeType::Yaml,
            MimeType::Bson,
            MimeType::Text,
            MimeType::Proto,
        ]
    }

    /// Resolve a content-type name or alias.
    ///
    /// Names that match no alias resolve to [`MimeType::Unknown`] holding the
    /// original string; rejecting them is left to the dispatch layer.
    pub fn from_name(name: &str) -> Self {
        ALIASES
            .get(alias_key(name).as_str())
            .cloned()
            .unwrap_or_else(|| Self::Unknown(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Json => "application/json",
            Self::Yaml => "application/yaml",
            Self::Bson => "application/bson",
            Self::Text => "text/plain",
            Self::Proto => "application/protobuf",
            Self::Unknown(s) => s,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }

    /// Canonical wire string of an optional content type.
    pub fn wire_string(mimetype: Option<&MimeType>) -> Result<&str, ContentError> {
        mimetype
            .map(MimeType::as_str)
            .ok_or(ContentError::MimeTypeRequired)
    }

    /// Whether `candidate` names `target`. `None` never matches.
    pub fn is_mimetype(candidate: Option<&str>, target: &MimeType) -> bool {
        candidate.is_some_and(|name| &MimeType::from_name(name) == target)
    }

    /// Store the canonical wire string under the content-type header.
    ///
    /// Leaves `headers` untouched when `mimetype` is `None`.
    pub fn write_header(headers: &mut Headers, mimetype: Option<&MimeType>) {
        if let Some(mimetype) = mimetype {
            headers.insert(CONTENT_TYPE_HEADER, mimetype.as_str());
        }
    }

    /// Resolve the content-type header, if present.
    pub fn read_header(headers: &Headers) -> Option<MimeType> {
        headers.get(CONTENT_TYPE_HEADER).map(MimeType::from_name)
    }
}

impl From<&str> for MimeType {
    fn from(s: &str) -> Self {
        Self::from_name(s)
    }
}

impl From<String> for MimeType {
    fn from(s: String) -> Self {
        Self::from_name(&s)
    }
}

impl From<&MimeType> for MimeType {
    fn from(m: &MimeType) -> Self {
        m.clone()
    }
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
