//! Chem light reporting core.
//!
//! Formats chem light location reports as geomessages and hands each one to
//! a [`MessageSink`](cl_geomessage::MessageSink) exactly once:
//! - [`ChemLightController`] decides create/update/remove semantics and
//!   swallows failures into the log stream
//! - [`report`] holds the field sets for UPDATE and REMOVE messages
//! - [`config`] and [`logging`] carry the ambient setup used by the CLI
//!
//! # Example
//!
//! ```
//! use cl_core::ChemLightController;
//! use cl_geomessage::MemorySink;
//! use std::sync::Arc;
//!
//! let sink = Arc::new(MemorySink::new());
//! let controller = ChemLightController::new(sink.clone(), Some("Alice".to_string()));
//!
//! controller.send_chem_light(-117.1, 34.0, 4326, 0xFFFF0000, None);
//! let created = sink.take().remove(0);
//! let id = created.id().unwrap().to_string();
//!
//! controller.send_chem_light(-117.2, 34.1, 4326, 0xFF00FF00, Some(&id));
//! controller.remove_chem_light(Some(&id));
//! assert_eq!(sink.len(), 2);
//! ```

pub mod config;
pub mod controller;
pub mod exit_codes;
pub mod logging;
pub mod report;

pub use config::{load_config, ChemLightConfig, ConfigError, ConfigOptions, ResolvedConfig};
pub use controller::{ChemLightController, ControllerBuilder};
pub use report::{ChemLightPosition, REPORT_TYPE};
