//! Chem light identity.
//!
//! A chem light is identified on the wire by an opaque string. Recipients
//! decide create-vs-update by whether they already hold an entity with that
//! ID, so a caller that wants to move or recolour an existing marker must
//! reuse the ID it was first sent with.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for one chem light marker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportId(pub String);

impl ReportId {
    /// Generate a fresh random identifier (UUID v4, hyphenated).
    pub fn generate() -> Self {
        ReportId(uuid::Uuid::new_v4().to_string())
    }

    /// Resolve the identifier for a create-or-update send.
    ///
    /// `None` and the empty string both mean "new marker" and yield a fresh
    /// ID. Any other value is reused verbatim.
    pub fn resolve(requested: Option<&str>) -> Self {
        match requested {
            Some(id) if !id.is_empty() => ReportId(id.to_string()),
            _ => ReportId::generate(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ReportId {
    fn from(id: &str) -> Self {
        ReportId(id.to_string())
    }
}

impl From<String> for ReportId {
    fn from(id: String) -> Self {
        ReportId(id)
    }
}
