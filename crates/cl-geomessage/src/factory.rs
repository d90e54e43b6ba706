//! Document factory: hands out empty geomessage builders for a report type.

use crate::message::{field_names, GeomessageBuilder, GEOMESSAGE_VERSION};
use cl_common::{Error, Result};

/// Produces a builder whose first field is the report `type`.
///
/// Implementations may fail when their environment is misconfigured; the
/// standard factory validates its configuration once, up front.
pub trait DocumentFactory: Send + Sync {
    fn new_document(&self, report_type: &str) -> Result<GeomessageBuilder>;
}

/// Factory for the standard geomessage envelope.
#[derive(Debug, Clone)]
pub struct StandardDocumentFactory {
    version: String,
}

impl StandardDocumentFactory {
    /// Create a factory writing the given envelope version.
    ///
    /// The version must be `<major>.<minor>` with decimal components.
    pub fn new(version: impl Into<String>) -> Result<Self> {
        let version = version.into();
        if !is_dotted_version(&version) {
            return Err(Error::DocumentFactory(format!(
                "invalid geomessage version {:?}",
                version
            )));
        }
        Ok(Self { version })
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

impl Default for StandardDocumentFactory {
    fn default() -> Self {
        Self {
            version: GEOMESSAGE_VERSION.to_string(),
        }
    }
}

impl DocumentFactory for StandardDocumentFactory {
    fn new_document(&self, report_type: &str) -> Result<GeomessageBuilder> {
        GeomessageBuilder::new(self.version.clone()).add_field(field_names::TYPE, report_type)
    }
}

fn is_dotted_version(version: &str) -> bool {
    let mut parts = version.split('.');
    let (Some(major), Some(minor), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    [major, minor]
        .iter()
        .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()))
}
