//! End-to-end controller behaviour against real sinks.
//!
//! Covers:
//! - create (generated ID) / update (reused ID) / remove field sets
//! - designation set and unset between sends
//! - per-send timestamp stamping
//! - failures in collaborators: zero deliveries, one ERROR event, no panic
//! - concurrent sends and designation changes

use chrono::{DateTime, Duration, TimeZone, Utc};
use cl_common::{Clock, ColorEncoder, Error, Result};
use cl_core::ChemLightController;
use cl_geomessage::{
    ChannelSink, DocumentFactory, Geomessage, GeomessageBuilder, MemorySink, MessageSink,
};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::thread;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

// ============================================================================
// Helpers
// ============================================================================

/// One recorded tracing event.
#[derive(Clone, Debug)]
struct CapturedEvent {
    level: Level,
    target: String,
    message: String,
    category: Option<String>,
}

/// Records level, target, message and error category of every event.
#[derive(Clone, Default)]
struct CapturedEvents(Arc<Mutex<Vec<CapturedEvent>>>);

impl CapturedEvents {
    fn error_events(&self) -> Vec<CapturedEvent> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|event| event.level == Level::ERROR)
            .cloned()
            .collect()
    }

    fn errors(&self) -> Vec<(String, String)> {
        self.error_events()
            .into_iter()
            .map(|event| (event.target, event.message))
            .collect()
    }
}

#[derive(Default)]
struct EventVisitor {
    message: String,
    category: Option<String>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        match field.name() {
            "message" => self.message = format!("{:?}", value),
            "category" => self.category = Some(format!("{:?}", value)),
            _ => {}
        }
    }
}

impl<S: Subscriber> Layer<S> for CapturedEvents {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);
        self.0.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            target: event.metadata().target().to_string(),
            message: visitor.message,
            category: visitor.category,
        });
    }
}

fn with_captured_logs<T>(f: impl FnOnce() -> T) -> (T, CapturedEvents) {
    let captured = CapturedEvents::default();
    let subscriber = tracing_subscriber::registry().with(captured.clone());
    let out = tracing::subscriber::with_default(subscriber, f);
    (out, captured)
}

/// Advances one minute per call.
struct SteppingClock {
    next: Mutex<DateTime<Utc>>,
}

impl SteppingClock {
    fn starting_at(start: DateTime<Utc>) -> Self {
        Self {
            next: Mutex::new(start),
        }
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let mut next = self.next.lock().unwrap();
        let now = *next;
        *next = now + Duration::minutes(1);
        now
    }
}

struct RejectingEncoder;

impl ColorEncoder for RejectingEncoder {
    fn encode(&self, argb: u32) -> Result<String> {
        Err(Error::ColorEncoding {
            argb,
            reason: "palette unavailable".to_string(),
        })
    }
}

struct PanickingEncoder;

impl ColorEncoder for PanickingEncoder {
    fn encode(&self, _argb: u32) -> Result<String> {
        panic!("color table corrupted");
    }
}

struct UnavailableFactory;

impl DocumentFactory for UnavailableFactory {
    fn new_document(&self, _report_type: &str) -> Result<GeomessageBuilder> {
        Err(Error::DocumentFactory("no XML backend configured".to_string()))
    }
}

struct DownSink;

impl MessageSink for DownSink {
    fn send_message(&self, _message: &Geomessage) -> Result<()> {
        Err(Error::Delivery("network unreachable".to_string()))
    }
}

fn memory_controller(designation: Option<&str>) -> (ChemLightController, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let controller = ChemLightController::new(sink.clone(), designation.map(String::from));
    (controller, sink)
}

// ============================================================================
// Create / update / remove
// ============================================================================

#[test]
fn test_send_without_id_generates_fresh_unique_ids() {
    let (controller, sink) = memory_controller(None);

    for _ in 0..50 {
        controller.send_chem_light(-117.1, 34.0, 4326, 0xFFFF_0000, None);
    }
    controller.send_chem_light(-117.1, 34.0, 4326, 0xFFFF_0000, Some(""));

    let messages = sink.take();
    assert_eq!(messages.len(), 51);

    let ids: HashSet<String> = messages
        .iter()
        .map(|m| m.id().unwrap().to_string())
        .collect();
    assert_eq!(ids.len(), 51);
    for id in &ids {
        assert!(!id.is_empty());
        assert!(uuid::Uuid::parse_str(id).is_ok());
    }
    assert!(messages
        .iter()
        .all(|m| m.get("action") == Some("UPDATE")));
}

#[test]
fn test_send_with_id_reuses_it_verbatim() {
    let (controller, sink) = memory_controller(None);

    controller.send_chem_light(1.0, 2.0, 4326, 0xFF00_FF00, Some("light-42"));
    controller.send_chem_light(1.5, 2.5, 4326, 0xFF00_00FF, Some("light-42"));

    let messages = sink.take();
    assert_eq!(messages.len(), 2);
    assert!(messages.iter().all(|m| m.id() == Some("light-42")));
    assert_eq!(messages[1].get("controlpoints"), Some("1.5,2.5"));
    assert_eq!(messages[1].get("color"), Some("3"));
}

#[test]
fn test_concrete_red_light_scenario() {
    let start = Utc.with_ymd_and_hms(2026, 3, 1, 8, 15, 0).unwrap();
    let sink = Arc::new(MemorySink::new());
    let controller = ChemLightController::builder(sink.clone())
        .with_clock(Arc::new(SteppingClock::starting_at(start)))
        .build();

    controller.send_chem_light(-117.1, 34.0, 4326, 0xFFFF_0000, None);

    let messages = sink.take();
    assert_eq!(messages.len(), 1);
    let message = &messages[0];
    assert_eq!(
        message.field_names(),
        vec![
            "type",
            "id",
            "wkid",
            "controlpoints",
            "action",
            "color",
            "datetimesubmitted",
            "datetimemodified",
        ]
    );
    assert_eq!(message.get("type"), Some("chemlight"));
    assert_eq!(message.get("wkid"), Some("4326"));
    assert_eq!(message.get("controlpoints"), Some("-117.1,34.0"));
    assert_eq!(message.get("action"), Some("UPDATE"));
    assert_eq!(message.get("color"), Some("1"));
    assert_eq!(message.get("datetimesubmitted"), Some("2026-03-01 08:15:00"));
    assert_eq!(message.get("datetimemodified"), Some("2026-03-01 08:15:00"));
}

#[test]
fn test_remove_carries_only_type_id_and_action() {
    let (controller, sink) = memory_controller(Some("Alice"));

    controller.remove_chem_light(Some("light-42"));

    let messages = sink.take();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].field_names(), vec!["type", "id", "action"]);
    assert_eq!(messages[0].get("type"), Some("chemlight"));
    assert_eq!(messages[0].id(), Some("light-42"));
    assert_eq!(messages[0].get("action"), Some("REMOVE"));
}

#[test]
fn test_remove_none_is_a_silent_no_op() {
    let (controller, sink) = memory_controller(None);

    let ((), logs) = with_captured_logs(|| controller.remove_chem_light(None));

    assert!(sink.is_empty());
    assert!(logs.errors().is_empty());
}

#[test]
fn test_remove_forwards_empty_id_while_send_regenerates() {
    let (controller, sink) = memory_controller(None);

    controller.remove_chem_light(Some(""));
    controller.send_chem_light(0.0, 0.0, 4326, 0xFFFF_0000, Some(""));

    let messages = sink.take();
    assert_eq!(messages[0].id(), Some(""));
    assert_eq!(messages[0].get("action"), Some("REMOVE"));
    assert!(!messages[1].id().unwrap().is_empty());
}

#[test]
fn test_full_marker_lifecycle_over_a_channel() {
    let sink = Arc::new(ChannelSink::new());
    let rx = sink.subscribe().unwrap();
    let controller = ChemLightController::new(sink.clone(), None);

    controller.send_chem_light_lon_lat(-117.1, 34.0, 0xFFFF_0000);
    let created = rx.recv().unwrap();
    let id = created.id().unwrap().to_string();

    controller.send_chem_light_lon_lat_with_id(-117.2, 34.1, 0xFFFF_FF00, Some(&id));
    let updated = rx.recv().unwrap();

    controller.remove_chem_light(Some(&id));
    let removed = rx.recv().unwrap();

    assert_eq!(updated.id(), Some(id.as_str()));
    assert_eq!(updated.get("color"), Some("4"));
    assert_eq!(removed.id(), Some(id.as_str()));
    assert_eq!(removed.len(), 3);
    assert!(rx.try_recv().is_err());
}

// ============================================================================
// Designation
// ============================================================================

#[test]
fn test_designation_is_included_only_while_set() {
    let (controller, sink) = memory_controller(None);

    controller.set_unique_designation(Some("Alice".to_string()));
    controller.send_chem_light(0.0, 0.0, 4326, 0xFFFF_0000, None);
    controller.set_unique_designation(None);
    controller.send_chem_light(0.0, 0.0, 4326, 0xFFFF_0000, None);

    let messages = sink.take();
    assert_eq!(messages[0].get("uniquedesignation"), Some("Alice"));
    assert!(!messages[1].contains("uniquedesignation"));
}

#[test]
fn test_initial_designation_applies_from_construction() {
    let (controller, sink) = memory_controller(Some("Bravo-6"));
    assert_eq!(controller.unique_designation().as_deref(), Some("Bravo-6"));

    controller.send_chem_light(0.0, 0.0, 4326, 0xFFFF_0000, None);
    assert_eq!(sink.take()[0].get("uniquedesignation"), Some("Bravo-6"));
}

// ============================================================================
// Timestamps
// ============================================================================

#[test]
fn test_each_send_restamps_both_timestamps() {
    // Updates do not carry the original submission time forward: every
    // send stamps submitted and modified with its own "now".
    let start = Utc.with_ymd_and_hms(2026, 3, 1, 8, 15, 0).unwrap();
    let sink = Arc::new(MemorySink::new());
    let controller = ChemLightController::builder(sink.clone())
        .with_clock(Arc::new(SteppingClock::starting_at(start)))
        .build();

    controller.send_chem_light(0.0, 0.0, 4326, 0xFFFF_0000, Some("light-1"));
    controller.send_chem_light(0.0, 0.0, 4326, 0xFFFF_0000, Some("light-1"));

    let messages = sink.take();
    assert_eq!(messages[0].get("datetimesubmitted"), Some("2026-03-01 08:15:00"));
    assert_eq!(messages[0].get("datetimemodified"), Some("2026-03-01 08:15:00"));
    assert_eq!(messages[1].get("datetimesubmitted"), Some("2026-03-01 08:16:00"));
    assert_eq!(messages[1].get("datetimemodified"), Some("2026-03-01 08:16:00"));
}

// ============================================================================
// Failure handling
// ============================================================================

#[test]
fn test_encoder_error_is_logged_and_swallowed() {
    let sink = Arc::new(MemorySink::new());
    let controller = ChemLightController::builder(sink.clone())
        .with_color_encoder(Arc::new(RejectingEncoder))
        .build();

    let ((), logs) = with_captured_logs(|| {
        controller.send_chem_light(-117.1, 34.0, 4326, 0xFFFF_0000, None);
    });

    assert!(sink.is_empty());
    let errors = logs.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].0, "chemlight.send");
    assert_eq!(errors[0].1, "Could not send chem light");
    assert_eq!(
        logs.error_events()[0].category.as_deref(),
        Some("document")
    );
}

#[test]
fn test_encoder_panic_is_logged_and_swallowed() {
    let sink = Arc::new(MemorySink::new());
    let controller = ChemLightController::builder(sink.clone())
        .with_color_encoder(Arc::new(PanickingEncoder))
        .build();

    let ((), logs) = with_captured_logs(|| {
        controller.send_chem_light(-117.1, 34.0, 4326, 0xFFFF_0000, None);
    });

    assert!(sink.is_empty());
    assert_eq!(logs.errors().len(), 1);

    // The controller is still usable afterwards.
    controller.remove_chem_light(Some("light-1"));
    assert_eq!(sink.len(), 1);
}

#[test]
fn test_factory_failure_is_logged_for_send_and_remove() {
    let sink = Arc::new(MemorySink::new());
    let controller = ChemLightController::builder(sink.clone())
        .with_document_factory(Arc::new(UnavailableFactory))
        .build();

    let ((), logs) = with_captured_logs(|| {
        controller.send_chem_light(0.0, 0.0, 4326, 0xFFFF_0000, None);
        controller.remove_chem_light(Some("light-1"));
    });

    assert!(sink.is_empty());
    let errors = logs.errors();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0].1, "Could not send chem light");
    assert_eq!(
        errors[1],
        (
            "chemlight.remove".to_string(),
            "Could not send chem light remove message".to_string()
        )
    );
}

#[test]
fn test_sink_failure_is_logged_and_swallowed() {
    let controller = ChemLightController::new(Arc::new(DownSink), None);

    let ((), logs) = with_captured_logs(|| {
        controller.send_chem_light(0.0, 0.0, 4326, 0xFFFF_0000, None);
        controller.remove_chem_light(Some("light-1"));
    });

    let categories: Vec<_> = logs
        .error_events()
        .into_iter()
        .map(|event| event.category)
        .collect();
    assert_eq!(
        categories,
        vec![Some("delivery".to_string()), Some("delivery".to_string())]
    );
}

#[test]
fn test_successful_sends_log_no_errors() {
    let (controller, sink) = memory_controller(None);

    let ((), logs) = with_captured_logs(|| {
        controller.send_chem_light(0.0, 0.0, 4326, 0xFFFF_0000, None);
        controller.remove_chem_light(Some("light-1"));
    });

    assert_eq!(sink.len(), 2);
    assert!(logs.errors().is_empty());
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn test_concurrent_sends_and_designation_changes() {
    let (controller, sink) = memory_controller(None);
    let controller = Arc::new(controller);
    let names = ["Alpha", "Bravo", "Charlie", "Delta"];

    let handles: Vec<_> = names
        .iter()
        .map(|name| {
            let controller = Arc::clone(&controller);
            let name = name.to_string();
            thread::spawn(move || {
                for i in 0..25 {
                    controller.set_unique_designation(Some(name.clone()));
                    controller.send_chem_light(i as f64, 0.0, 4326, 0xFFFF_0000, None);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let messages = sink.take();
    assert_eq!(messages.len(), 100);
    for message in &messages {
        let designation = message.get("uniquedesignation").unwrap();
        assert!(names.contains(&designation), "torn value {designation:?}");
    }
}
