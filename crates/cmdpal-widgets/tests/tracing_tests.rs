#![forbid(unsafe_code)]

//! Palette telemetry integration tests.
//!
//! Events and spans enabled:
//!   cargo test -p cmdpal-widgets --features tracing --test tracing_tests
//!
//! Zero-overhead verification (no feature):
//!   cargo test -p cmdpal-widgets --test tracing_tests -- zero_overhead

use std::collections::HashMap;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use cmdpal_core::event::{Event, KeyCode, KeyEvent};
#[cfg(feature = "tracing")]
use cmdpal_widgets::actions::{Action, ActionGraph, aggregate};
use cmdpal_widgets::command_palette::CommandPalette;
use cmdpal_widgets::source::ItemSource;
#[cfg(feature = "tracing")]
use cmdpal_widgets::source::Scope;
use cmdpal_widgets::sources::StringListSource;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

// ============================================================================
// Test Infrastructure
// ============================================================================

/// A captured event or span with its target and fields.
#[derive(Debug, Clone)]
#[allow(dead_code)]
struct Captured {
    name: String,
    target: String,
    level: tracing::Level,
    fields: HashMap<String, String>,
}

impl Captured {
    fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// A tracing Layer that records every event and span it sees.
struct Capture {
    events: Arc<Mutex<Vec<Captured>>>,
    spans: Arc<Mutex<Vec<Captured>>>,
}

/// Handle to read captured records afterwards.
struct CaptureHandle {
    events: Arc<Mutex<Vec<Captured>>>,
    spans: Arc<Mutex<Vec<Captured>>>,
}

impl CaptureHandle {
    fn events(&self) -> Vec<Captured> {
        self.events.lock().unwrap().clone()
    }

    fn spans(&self) -> Vec<Captured> {
        self.spans.lock().unwrap().clone()
    }

    /// `event` field values of palette events, in emission order.
    fn palette_events(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|e| e.target == "cmdpal_widgets::command_palette")
            .filter_map(|e| e.field("event").map(str::to_owned))
            .collect()
    }
}

/// Visitor that extracts fields as strings.
struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

fn captured(meta: &tracing::Metadata<'_>, visitor: FieldVisitor) -> Captured {
    Captured {
        name: meta.name().to_string(),
        target: meta.target().to_string(),
        level: *meta.level(),
        fields: visitor.0.into_iter().collect(),
    }
}

impl<S> tracing_subscriber::Layer<S> for Capture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(Vec::new());
        attrs.record(&mut visitor);
        self.spans
            .lock()
            .unwrap()
            .push(captured(attrs.metadata(), visitor));
    }

    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        self.events
            .lock()
            .unwrap()
            .push(captured(event.metadata(), visitor));
    }
}

/// Run `f` under a subscriber that captures everything.
fn with_capture<F: FnOnce()>(f: F) -> CaptureHandle {
    let events = Arc::new(Mutex::new(Vec::new()));
    let spans = Arc::new(Mutex::new(Vec::new()));
    let layer = Capture {
        events: Arc::clone(&events),
        spans: Arc::clone(&spans),
    };
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    CaptureHandle { events, spans }
}

fn fruit() -> Rc<dyn ItemSource> {
    Rc::new(StringListSource::new(["Apple", "Banana", "Grape"]))
}

fn press(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code))
}

// ============================================================================
// Tests
// ============================================================================

#[test]
#[cfg(feature = "tracing")]
fn lifecycle_events_in_order() {
    let handle = with_capture(|| {
        let mut palette = CommandPalette::new();
        palette.activate(fruit(), None);
        palette.handle_event(&press(KeyCode::Char('a')));
        palette.handle_event(&press(KeyCode::Down));
        palette.handle_event(&press(KeyCode::Enter));
    });

    assert_eq!(
        handle.palette_events(),
        ["activate", "query_changed", "commit", "deactivate"]
    );
}

#[test]
#[cfg(feature = "tracing")]
fn activate_reports_result_count() {
    let handle = with_capture(|| {
        let mut palette = CommandPalette::new();
        palette.activate(fruit(), None);
    });

    let events = handle.events();
    let activate = events
        .iter()
        .find(|e| e.field("event") == Some("activate"))
        .expect("activate event");
    assert_eq!(activate.level, tracing::Level::INFO);
    assert_eq!(activate.field("results"), Some("3"));
    assert_eq!(activate.field("scoped"), Some("false"));
}

#[test]
#[cfg(feature = "tracing")]
fn rejected_scope_warns() {
    let handle = with_capture(|| {
        let mut palette = CommandPalette::new();
        palette.activate(fruit(), Some(Scope::new(0)));
    });

    let events = handle.events();
    let rejected = events
        .iter()
        .find(|e| e.field("event") == Some("scope_rejected"))
        .expect("scope_rejected event");
    assert_eq!(rejected.level, tracing::Level::WARN);
    assert_eq!(rejected.field("root"), Some("0"));
}

#[test]
#[cfg(feature = "tracing")]
fn escape_logs_deactivate_once() {
    let handle = with_capture(|| {
        let mut palette = CommandPalette::new();
        palette.activate(fruit(), None);
        palette.handle_event(&press(KeyCode::Escape));
        palette.deactivate();
    });

    assert_eq!(handle.palette_events(), ["activate", "deactivate"]);
}

#[test]
#[cfg(feature = "tracing")]
fn resize_is_logged() {
    let handle = with_capture(|| {
        let mut palette = CommandPalette::new();
        palette.handle_event(&Event::Resize {
            width: 120,
            height: 40,
        });
    });

    let events = handle.events();
    let resize = events
        .iter()
        .find(|e| e.field("event") == Some("resize"))
        .expect("resize event");
    assert_eq!(resize.field("width"), Some("120"));
}

#[test]
#[cfg(feature = "tracing")]
fn aggregation_runs_in_a_span() {
    let handle = with_capture(|| {
        let mut graph = ActionGraph::new();
        let file = graph.add_menu_bar_menu("File");
        let quit = graph.add(Action::new("Quit"));
        graph.menu_push(file, quit);
        assert_eq!(aggregate(&graph).len(), 2);
    });

    let spans = handle.spans();
    let span = spans
        .iter()
        .find(|s| s.name == "action_aggregate")
        .expect("action_aggregate span");
    assert_eq!(span.field("actions"), Some("2"));

    let events = handle.events();
    let summary = events
        .iter()
        .find(|e| e.target == "cmdpal_widgets::actions")
        .expect("aggregation summary");
    assert_eq!(summary.field("from_menus"), Some("2"));
    assert_eq!(summary.field("from_toolbars"), Some("0"));
}

#[test]
fn zero_overhead_without_feature() {
    let handle = with_capture(|| {
        let mut palette = CommandPalette::new();
        palette.activate(fruit(), None);
        palette.handle_event(&press(KeyCode::Char('g')));
        palette.handle_event(&press(KeyCode::Escape));
    });

    if cfg!(feature = "tracing") {
        assert!(!handle.palette_events().is_empty());
    } else {
        assert!(handle.events().is_empty());
        assert!(handle.spans().is_empty());
    }
}
