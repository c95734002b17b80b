//! Shared test utilities for the core crates
//!
//! - `LogCapture`: records `tracing` events so tests can assert on what was logged
//! - `json_body`: collects an axum response body and parses it as JSON
//! - `assertions`: envelope assertion helpers
//!
//! # Usage
//!
//! ```rust
//! use test_utils::LogCapture;
//!
//! let capture = LogCapture::new();
//! let _guard = capture.set_default();
//!
//! tracing::warn!(request_id = "req-1", "something happened");
//!
//! let events = capture.events();
//! assert_eq!(events[0].message, "something happened");
//! assert_eq!(events[0].field("request_id"), Some("req-1"));
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use http_body_util::BodyExt;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::prelude::*;

/// One recorded `tracing` event.
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: Level,
    pub target: String,
    pub message: String,
    pub fields: BTreeMap<String, String>,
}

impl CapturedEvent {
    /// Field value as text (`%`/`?` values without quotes).
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

#[derive(Default)]
struct EventVisitor {
    message: String,
    fields: BTreeMap<String, String>,
}

impl EventVisitor {
    fn record(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            self.message = value;
        } else {
            self.fields.insert(field.name().to_string(), value);
        }
    }
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.record(field, format!("{value:?}"));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.record(field, value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.record(field, value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.record(field, value.to_string());
    }
}

/// `tracing` layer that keeps every event it sees.
///
/// Clones share the same buffer, so keep one handle for assertions and
/// install another with [`LogCapture::set_default`].
#[derive(Clone, Default)]
pub struct LogCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl LogCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make this capture the subscriber of the current thread until the guard drops.
    ///
    /// `#[tokio::test]` runs on a current-thread runtime, so async tests are
    /// covered as well.
    pub fn set_default(&self) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::registry().with(self.clone());
        tracing::subscriber::set_default(subscriber)
    }

    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn events_for_target(&self, target: &str) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|event| event.target == target)
            .collect()
    }

    pub fn events_at(&self, level: Level) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|event| event.level == level)
            .collect()
    }

    /// True when any event's message contains `needle`.
    pub fn contains_message(&self, needle: &str) -> bool {
        self.events()
            .iter()
            .any(|event| event.message.contains(needle))
    }

    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

impl<S: Subscriber> Layer<S> for LogCapture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let captured = CapturedEvent {
            level: *event.metadata().level(),
            target: event.metadata().target().to_string(),
            message: visitor.message,
            fields: visitor.fields,
        };

        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(captured);
    }
}

/// Collect a response body and parse it as JSON.
pub async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Envelope assertion helpers
pub mod assertions {
    use serde_json::Value;

    /// Assert the `meta` block of an envelope and return its request id.
    pub fn assert_meta(envelope: &Value, code: u16, message: &str) -> String {
        let meta = &envelope["meta"];
        assert_eq!(meta["code"], code, "unexpected meta.code in {envelope}");
        assert_eq!(meta["message"], message, "unexpected meta.message in {envelope}");

        let request_id = meta["request_id"]
            .as_str()
            .unwrap_or_else(|| panic!("meta.request_id missing in {envelope}"));
        assert!(!request_id.is_empty(), "meta.request_id is empty");
        request_id.to_string()
    }

    /// Assert that a request id is a UUID.
    pub fn assert_uuid(value: &str, context: &str) {
        assert!(
            uuid::Uuid::parse_str(value).is_ok(),
            "{}: expected a UUID, got {}",
            context,
            value
        );
    }
}
