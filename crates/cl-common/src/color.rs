//! Colour encoding for chem light reports.
//!
//! Colours arrive as packed alpha+RGB integers (`0xAARRGGBB`). Downstream
//! GeoEvent consumers expect the AFM convention: the four standard chem
//! light colours travel as the palette digits `1`-`4`, everything else as
//! an `#RRGGBB` hex string with the alpha channel dropped.

use crate::Result;

/// Opaque red.
pub const RED: u32 = 0xFFFF_0000;
/// Opaque green.
pub const GREEN: u32 = 0xFF00_FF00;
/// Opaque blue.
pub const BLUE: u32 = 0xFF00_00FF;
/// Opaque yellow.
pub const YELLOW: u32 = 0xFFFF_FF00;

/// Converts a packed alpha+RGB colour into the string carried on the wire.
pub trait ColorEncoder: Send + Sync {
    fn encode(&self, argb: u32) -> Result<String>;
}

/// The AFM GeoEvent colour convention. Total over `u32`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AfmColorEncoder;

impl ColorEncoder for AfmColorEncoder {
    fn encode(&self, argb: u32) -> Result<String> {
        Ok(afm_color_string(argb))
    }
}

/// Encode a colour using the AFM GeoEvent convention.
pub fn afm_color_string(argb: u32) -> String {
    match argb {
        RED => "1".to_string(),
        GREEN => "2".to_string(),
        BLUE => "3".to_string(),
        YELLOW => "4".to_string(),
        other => format!("#{:06x}", other & 0x00FF_FFFF),
    }
}

/// Parse a colour from the command line: `0xAARRGGBB`, `#AARRGGBB`,
/// `#RRGGBB` (opaque) or a decimal integer.
///
/// Only the `#` form has the six-digit opaque shorthand; `0x` values are
/// taken literally, so `0x00FF00` is fully transparent green.
pub fn parse_argb(s: &str) -> std::result::Result<u32, String> {
    let s = s.trim();
    let invalid = |e: std::num::ParseIntError| format!("invalid color {s:?}: {e}");

    if let Some(digits) = s.strip_prefix('#') {
        let value = u32::from_str_radix(digits, 16).map_err(invalid)?;
        return Ok(if digits.len() == 6 {
            0xFF00_0000 | value
        } else {
            value
        });
    }
    if let Some(digits) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        return u32::from_str_radix(digits, 16).map_err(invalid);
    }
    s.parse::<u32>().map_err(invalid)
}
