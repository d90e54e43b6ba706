//! XML rendering of geomessages.
//!
//! Output shape:
//!
//! ```text
//! <geomessages><geomessage v="1.0"><type>chemlight</type>...</geomessage></geomessages>
//! ```
//!
//! Each field becomes one element whose text is the escaped value. Values
//! containing characters XML 1.0 cannot carry at all (most C0 controls,
//! `U+FFFE`, `U+FFFF`) are rejected with [`Error::Render`] rather than
//! written into a malformed document.

use crate::message::Geomessage;
use cl_common::{Error, Result};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

const ROOT_ELEMENT: &str = "geomessages";
const MESSAGE_ELEMENT: &str = "geomessage";
const VERSION_ATTRIBUTE: &str = "v";

/// Render a geomessage as a single-line XML document.
pub fn to_xml(message: &Geomessage) -> Result<String> {
    check_xml_chars(VERSION_ATTRIBUTE, message.version())?;
    let mut writer = Writer::new(Vec::new());

    write(&mut writer, Event::Start(BytesStart::new(ROOT_ELEMENT)))?;

    let mut start = BytesStart::new(MESSAGE_ELEMENT);
    start.push_attribute((VERSION_ATTRIBUTE, message.version()));
    write(&mut writer, Event::Start(start))?;

    for field in message.fields() {
        check_xml_chars(&field.name, &field.value)?;
        write(&mut writer, Event::Start(BytesStart::new(field.name.as_str())))?;
        write(&mut writer, Event::Text(BytesText::new(&field.value)))?;
        write(&mut writer, Event::End(BytesEnd::new(field.name.as_str())))?;
    }

    write(&mut writer, Event::End(BytesEnd::new(MESSAGE_ELEMENT)))?;
    write(&mut writer, Event::End(BytesEnd::new(ROOT_ELEMENT)))?;

    String::from_utf8(writer.into_inner()).map_err(|e| Error::Render(e.to_string()))
}

/// Render a geomessage as a JSON object.
pub fn to_json(message: &Geomessage) -> Result<String> {
    serde_json::to_string(message).map_err(|e| Error::Render(e.to_string()))
}

/// Whether XML 1.0 allows `c` anywhere in a document.
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}

fn check_xml_chars(name: &str, value: &str) -> Result<()> {
    match value.chars().find(|c| !is_xml_char(*c)) {
        Some(c) => Err(Error::Render(format!(
            "{name} contains U+{:04X}, which XML 1.0 does not allow",
            c as u32
        ))),
        None => Ok(()),
    }
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| Error::Render(e.to_string()))
}
