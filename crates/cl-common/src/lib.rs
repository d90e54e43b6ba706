//! Chem light common types.
//!
//! Foundational pieces shared by the geomessage and controller crates:
//! - Report identity (`ReportId`)
//! - AFM GeoEvent colour encoding
//! - Clock abstraction and the geomessage timestamp format
//! - The shared error type

pub mod clock;
pub mod color;
pub mod error;
pub mod id;

pub use clock::{format_geomessage_date, Clock, SystemClock, GEOMESSAGE_DATE_FORMAT};
pub use color::{afm_color_string, parse_argb, AfmColorEncoder, ColorEncoder};
pub use error::{Error, ErrorCategory, Result};
pub use id::ReportId;

/// Spatial reference used when a caller gives plain longitude/latitude.
pub const WGS84_WKID: u32 = 4326;
