//! Fuzz target for the chem light controller.
//!
//! Any coordinates, colour, ID and designation must produce exactly one
//! delivered UPDATE carrying the AFM encoding of the colour, and any remove
//! ID exactly one REMOVE, without panicking.

#![no_main]

use arbitrary::Arbitrary;
use cl_common::afm_color_string;
use cl_core::ChemLightController;
use cl_geomessage::MemorySink;
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

#[derive(Debug, Arbitrary)]
struct Input {
    x: f64,
    y: f64,
    wkid: u32,
    argb: u32,
    id: Option<String>,
    designation: Option<String>,
}

fuzz_target!(|input: Input| {
    let sink = Arc::new(MemorySink::new());
    let controller = ChemLightController::new(sink.clone(), input.designation);

    controller.send_chem_light(input.x, input.y, input.wkid, input.argb, input.id.as_deref());
    controller.remove_chem_light(input.id.as_deref());

    let messages = sink.take();
    let expected = if input.id.is_some() { 2 } else { 1 };
    assert_eq!(messages.len(), expected);
    assert_eq!(
        messages[0].get("color"),
        Some(afm_color_string(input.argb).as_str())
    );
});
