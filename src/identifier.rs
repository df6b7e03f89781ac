// src/identifier.rs
use std::fmt;

const PROFILES_PREFIX: &str = "/profiles";

/// A trimmed, non-empty profile reference typed by the user.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProfileId(String);

impl ProfileId {
    /// Trim the raw input field value. Empty or whitespace-only input yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the identifier only holds RFC 3986 unreserved characters
    /// and can be spliced into a path segment as-is.
    pub fn is_url_safe(&self) -> bool {
        self.0
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~'))
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Path of the analysis endpoint. The identifier is interpolated verbatim.
pub fn analyze_path(id: &ProfileId) -> String {
    format!("{}/{}/analyze", PROFILES_PREFIX, id)
}

/// Path of the stored profile endpoint.
pub fn profile_path(id: &ProfileId) -> String {
    format!("{}/{}", PROFILES_PREFIX, id)
}
