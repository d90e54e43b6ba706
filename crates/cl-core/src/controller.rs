//! Chem light controller: sends and removes chem light markers.
//!
//! Every operation is fire-and-forget. A failure anywhere between resolving
//! the ID and handing the message to the sink (including a panic inside a
//! collaborator) is logged at ERROR and dropped; the caller never sees it.
//! Exactly one message reaches the sink per successful call, none per
//! failed call.
//!
//! Marker lifecycle is a convention between caller and recipients: send
//! without an ID to create, send again with the same ID to update, remove
//! with that ID to delete. The controller does not track which IDs exist.
//!
//! Catching a collaborator panic does not suppress the process panic hook:
//! the default hook still prints the panic to stderr before the ERROR event
//! is emitted. Embedders that need the log stream to be the only output
//! should install their own hook with [`std::panic::set_hook`].

use crate::config::ChemLightConfig;
use crate::logging::event_names;
use crate::report::{self, ChemLightPosition};
use cl_common::{
    AfmColorEncoder, Clock, ColorEncoder, Error, ReportId, Result, SystemClock, WGS84_WKID,
};
use cl_geomessage::{DocumentFactory, Geomessage, MessageSink, StandardDocumentFactory};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, RwLock};
use tracing::{debug, error};

/// Sends chem light geomessages to a [`MessageSink`].
///
/// The controller is `Send + Sync` and may be shared across threads. Its
/// only mutable state is the sender's unique designation; concurrent
/// writers race with last-writer-wins semantics.
pub struct ChemLightController {
    sink: Arc<dyn MessageSink>,
    factory: Arc<dyn DocumentFactory>,
    encoder: Arc<dyn ColorEncoder>,
    clock: Arc<dyn Clock>,
    unique_designation: RwLock<Option<String>>,
}

impl ChemLightController {
    /// Create a controller with the standard document factory, AFM colour
    /// encoding and the system clock.
    ///
    /// `unique_designation` identifies the sender. Typically a
    /// human-readable username, but any opaque string works.
    pub fn new(sink: Arc<dyn MessageSink>, unique_designation: Option<String>) -> Self {
        Self::builder(sink)
            .with_unique_designation(unique_designation)
            .build()
    }

    /// Start building a controller with substitutable collaborators.
    pub fn builder(sink: Arc<dyn MessageSink>) -> ControllerBuilder {
        ControllerBuilder::new(sink)
    }

    /// Create a controller from resolved configuration.
    ///
    /// Fails with [`Error::Config`] when the configuration does not validate,
    /// and with [`Error::DocumentFactory`] when the configured geomessage
    /// version cannot back a document factory.
    pub fn from_config(sink: Arc<dyn MessageSink>, config: &ChemLightConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|err| Error::Config(err.to_string()))?;
        let factory = StandardDocumentFactory::new(config.geomessage_version.clone())?;
        Ok(Self::builder(sink)
            .with_document_factory(Arc::new(factory))
            .with_unique_designation(config.unique_designation.clone())
            .build())
    }

    /// Send a new chem light at a longitude/latitude (WGS84).
    pub fn send_chem_light_lon_lat(&self, longitude: f64, latitude: f64, argb: u32) {
        self.send_chem_light(longitude, latitude, WGS84_WKID, argb, None);
    }

    /// Send or update a chem light at a longitude/latitude (WGS84).
    pub fn send_chem_light_lon_lat_with_id(
        &self,
        longitude: f64,
        latitude: f64,
        argb: u32,
        id: Option<&str>,
    ) {
        self.send_chem_light(longitude, latitude, WGS84_WKID, argb, id);
    }

    /// Send a new chem light in an explicit spatial reference.
    pub fn send_new_chem_light(&self, x: f64, y: f64, wkid: u32, argb: u32) {
        self.send_chem_light(x, y, wkid, argb, None);
    }

    /// Send a chem light.
    ///
    /// With `id` `None` or empty a fresh ID is generated and recipients see
    /// a new marker. A non-empty `id` is reused verbatim; recipients that
    /// already hold that marker move and recolour it.
    pub fn send_chem_light(&self, x: f64, y: f64, wkid: u32, argb: u32, id: Option<&str>) {
        let position = ChemLightPosition { x, y, wkid, argb };
        let outcome = guarded(|| {
            let id = ReportId::resolve(id);
            let designation = self.unique_designation();
            let message = report::update_message(
                self.factory.as_ref(),
                self.encoder.as_ref(),
                &id,
                &position,
                designation.as_deref(),
                self.clock.now(),
            )?;
            self.deliver(&message)?;
            Ok(id)
        });

        match outcome {
            Ok(id) => debug!(
                target: event_names::SEND,
                id = %id,
                wkid,
                "Sent chem light"
            ),
            Err(err) => error!(
                target: event_names::SEND,
                error = %err,
                code = err.code(),
                category = %err.category(),
                "Could not send chem light"
            ),
        }
    }

    /// Send a REMOVE for the chem light with this ID.
    ///
    /// `None` does nothing. An empty string is forwarded as-is.
    pub fn remove_chem_light(&self, id: Option<&str>) {
        let Some(id) = id else {
            return;
        };

        let outcome = guarded(|| {
            let message = report::remove_message(self.factory.as_ref(), id)?;
            self.deliver(&message)
        });

        match outcome {
            Ok(()) => debug!(target: event_names::REMOVE, id, "Sent chem light remove message"),
            Err(err) => error!(
                target: event_names::REMOVE,
                error = %err,
                code = err.code(),
                category = %err.category(),
                "Could not send chem light remove message"
            ),
        }
    }

    /// The sender's unique designation, if any.
    pub fn unique_designation(&self) -> Option<String> {
        self.unique_designation
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Replace the sender's unique designation. Applies to every later send.
    pub fn set_unique_designation(&self, unique_designation: Option<String>) {
        *self
            .unique_designation
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = unique_designation;
    }

    fn deliver(&self, message: &Geomessage) -> Result<()> {
        self.sink.send_message(message)
    }
}

impl std::fmt::Debug for ChemLightController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChemLightController")
            .field("unique_designation", &self.unique_designation())
            .finish_non_exhaustive()
    }
}

/// Run `f`, turning a panic into [`Error::CollaboratorPanic`].
fn guarded<T>(f: impl FnOnce() -> Result<T>) -> Result<T> {
    panic::catch_unwind(AssertUnwindSafe(f))
        .unwrap_or_else(|payload| Err(Error::from_panic(payload.as_ref())))
}

/// Builder for [`ChemLightController`].
pub struct ControllerBuilder {
    sink: Arc<dyn MessageSink>,
    factory: Arc<dyn DocumentFactory>,
    encoder: Arc<dyn ColorEncoder>,
    clock: Arc<dyn Clock>,
    unique_designation: Option<String>,
}

impl ControllerBuilder {
    fn new(sink: Arc<dyn MessageSink>) -> Self {
        Self {
            sink,
            factory: Arc::new(StandardDocumentFactory::default()),
            encoder: Arc::new(AfmColorEncoder),
            clock: Arc::new(SystemClock),
            unique_designation: None,
        }
    }

    pub fn with_unique_designation(mut self, unique_designation: Option<String>) -> Self {
        self.unique_designation = unique_designation;
        self
    }

    pub fn with_document_factory(mut self, factory: Arc<dyn DocumentFactory>) -> Self {
        self.factory = factory;
        self
    }

    pub fn with_color_encoder(mut self, encoder: Arc<dyn ColorEncoder>) -> Self {
        self.encoder = encoder;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn build(self) -> ChemLightController {
        ChemLightController {
            sink: self.sink,
            factory: self.factory,
            encoder: self.encoder,
            clock: self.clock,
            unique_designation: RwLock::new(self.unique_designation),
        }
    }
}
