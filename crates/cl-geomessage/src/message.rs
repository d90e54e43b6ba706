//! Geomessage model and ordered-field builder.
//!
//! A geomessage is a flat, ordered list of named text fields wrapped in a
//! versioned envelope. Field order carries no meaning for recipients but is
//! preserved so rendered output is stable.

use cl_common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Envelope version written on every geomessage.
pub const GEOMESSAGE_VERSION: &str = "1.0";

/// Field names used by location reports.
pub mod field_names {
    pub const TYPE: &str = "type";
    pub const ID: &str = "id";
    pub const WKID: &str = "wkid";
    pub const CONTROL_POINTS: &str = "controlpoints";
    pub const ACTION: &str = "action";
    pub const UNIQUE_DESIGNATION: &str = "uniquedesignation";
    pub const COLOR: &str = "color";
    pub const DATETIME_SUBMITTED: &str = "datetimesubmitted";
    pub const DATETIME_MODIFIED: &str = "datetimemodified";
}

/// Lifecycle signal carried by a geomessage.
///
/// There is no separate create action: recipients treat an `Update` for an
/// ID they do not hold as a create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Update,
    Remove,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Update => "UPDATE",
            Action::Remove => "REMOVE",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "UPDATE" => Ok(Action::Update),
            "REMOVE" => Ok(Action::Remove),
            _ => Err(format!("unknown geomessage action: {}", s)),
        }
    }
}

/// One named text field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub value: String,
}

/// A finished geomessage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geomessage {
    version: String,
    fields: Vec<Field>,
}

impl Geomessage {
    /// Envelope version.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Fields in insertion order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Value of the first field with this name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Field names in insertion order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|field| field.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn report_type(&self) -> Option<&str> {
        self.get(field_names::TYPE)
    }

    pub fn id(&self) -> Option<&str> {
        self.get(field_names::ID)
    }

    /// Parsed `action` field, if present and recognised.
    pub fn action(&self) -> Option<Action> {
        self.get(field_names::ACTION)
            .and_then(|value| value.parse().ok())
    }
}

/// Builder for geomessages. Field names are checked as XML element names
/// because every sink may end up rendering the message as XML.
#[derive(Debug, Clone)]
pub struct GeomessageBuilder {
    version: String,
    fields: Vec<Field>,
}

impl GeomessageBuilder {
    /// Start an empty message with the given envelope version.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            fields: Vec::new(),
        }
    }

    /// Append a text field.
    pub fn add_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if !is_valid_field_name(&name) {
            return Err(Error::InvalidFieldName(name));
        }
        self.fields.push(Field {
            name,
            value: value.into(),
        });
        Ok(self)
    }

    /// Append a text field only when a value is present.
    pub fn add_optional_field(
        self,
        name: impl Into<String>,
        value: Option<impl Into<String>>,
    ) -> Result<Self> {
        match value {
            Some(value) => self.add_field(name, value),
            None => Ok(self),
        }
    }

    pub fn build(self) -> Geomessage {
        Geomessage {
            version: self.version,
            fields: self.fields,
        }
    }
}

/// ASCII subset of XML `Name`: a letter or underscore, then letters,
/// digits, `_`, `-` or `.`.
fn is_valid_field_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    if name
        .get(..3)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("xml"))
    {
        return false;
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}
