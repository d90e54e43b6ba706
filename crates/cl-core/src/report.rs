//! Field sets for chem light geomessages.
//!
//! An UPDATE carries the full report; a REMOVE carries only enough to
//! identify the marker:
//!
//! | field               | UPDATE        | REMOVE |
//! |---------------------|---------------|--------|
//! | `type`              | yes           | yes    |
//! | `id`                | yes           | yes    |
//! | `wkid`              | yes           |        |
//! | `controlpoints`     | yes           |        |
//! | `action`            | `UPDATE`      | `REMOVE` |
//! | `uniquedesignation` | if set        |        |
//! | `color`             | yes           |        |
//! | `datetimesubmitted` | now           |        |
//! | `datetimemodified`  | same as above |        |

use chrono::{DateTime, Utc};
use cl_common::{format_geomessage_date, ColorEncoder, ReportId, Result};
use cl_geomessage::{field_names, Action, DocumentFactory, Geomessage};

/// Geomessage `type` for chem lights.
pub const REPORT_TYPE: &str = "chemlight";

/// Location and colour of one chem light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChemLightPosition {
    pub x: f64,
    pub y: f64,
    pub wkid: u32,
    pub argb: u32,
}

/// Assemble the UPDATE message for a chem light.
///
/// Both timestamps are stamped with `now`; an update does not carry the
/// marker's original submission time forward.
pub fn update_message(
    factory: &dyn DocumentFactory,
    encoder: &dyn ColorEncoder,
    id: &ReportId,
    position: &ChemLightPosition,
    designation: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Geomessage> {
    let color = encoder.encode(position.argb)?;
    let stamp = format_geomessage_date(now);

    Ok(factory
        .new_document(REPORT_TYPE)?
        .add_field(field_names::ID, id.as_str())?
        .add_field(field_names::WKID, position.wkid.to_string())?
        .add_field(
            field_names::CONTROL_POINTS,
            control_points(position.x, position.y),
        )?
        .add_field(field_names::ACTION, Action::Update.as_str())?
        .add_optional_field(field_names::UNIQUE_DESIGNATION, designation)?
        .add_field(field_names::COLOR, color)?
        .add_field(field_names::DATETIME_SUBMITTED, stamp.as_str())?
        .add_field(field_names::DATETIME_MODIFIED, stamp)?
        .build())
}

/// Assemble the REMOVE message for a chem light. The id is forwarded as
/// given, including the empty string.
pub fn remove_message(factory: &dyn DocumentFactory, id: &str) -> Result<Geomessage> {
    Ok(factory
        .new_document(REPORT_TYPE)?
        .add_field(field_names::ID, id)?
        .add_field(field_names::ACTION, Action::Remove.as_str())?
        .build())
}

/// `"<x>,<y>"` with each coordinate rendered by [`format_coordinate`].
pub fn control_points(x: f64, y: f64) -> String {
    format!("{},{}", format_coordinate(x), format_coordinate(y))
}

/// Shortest round-trip decimal, keeping a `.0` on integral values so that
/// `34` travels as `34.0`.
pub fn format_coordinate(value: f64) -> String {
    let mut s = value.to_string();
    if value.is_finite() && !s.contains('.') {
        s.push_str(".0");
    }
    s
}
