//! Geomessage documents for chem light reporting.
//!
//! A geomessage is the canonical structured message passed between the
//! components of the mapping system. This crate provides:
//! - The ordered-field [`Geomessage`] model and its builder
//! - A [`DocumentFactory`] seam for producing empty documents
//! - XML and JSON rendering
//! - [`MessageSink`] implementations for in-process and line-oriented delivery
//!
//! # Example
//!
//! ```
//! use cl_geomessage::{field_names, DocumentFactory, MemorySink, MessageSink, StandardDocumentFactory};
//!
//! let message = StandardDocumentFactory::default()
//!     .new_document("chemlight")?
//!     .add_field(field_names::ID, "light-1")?
//!     .add_field(field_names::ACTION, "REMOVE")?
//!     .build();
//!
//! let sink = MemorySink::new();
//! sink.send_message(&message)?;
//! assert_eq!(sink.len(), 1);
//! # Ok::<(), cl_common::Error>(())
//! ```

pub mod factory;
pub mod message;
pub mod sink;
pub mod xml;

pub use factory::{DocumentFactory, StandardDocumentFactory};
pub use message::{field_names, Action, Field, Geomessage, GeomessageBuilder, GEOMESSAGE_VERSION};
pub use sink::{ChannelSink, FanoutSink, LineFormat, MemorySink, MessageSink, WriterSink};
pub use xml::{to_json, to_xml};
