//! Fuzz target for geomessage construction and rendering.
//!
//! Arbitrary field names must either be rejected by the builder or render
//! cleanly. Arbitrary values either render to a document free of
//! characters XML forbids, or fail with a render error.

#![no_main]

use arbitrary::Arbitrary;
use cl_common::Error;
use cl_geomessage::{to_json, to_xml, GeomessageBuilder, GEOMESSAGE_VERSION};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    fields: Vec<(String, String)>,
}

fuzz_target!(|input: Input| {
    let mut builder = GeomessageBuilder::new(GEOMESSAGE_VERSION);
    for (name, value) in input.fields {
        builder = match builder.clone().add_field(name, value) {
            Ok(next) => next,
            Err(_) => builder,
        };
    }
    let message = builder.build();
    match to_xml(&message) {
        Ok(xml) => assert!(!xml
            .chars()
            .any(|c| c < ' ' && !matches!(c, '\t' | '\n' | '\r'))),
        Err(err) => assert!(matches!(err, Error::Render(_))),
    }
    assert!(to_json(&message).is_ok());
});
