use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

/// Fields of one captured WARN event, rendered as strings
pub(crate) type Warning = HashMap<String, String>;

#[derive(Default)]
struct FieldRecorder(Warning);

impl Visit for FieldRecorder {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{:?}", value));
    }
}

#[derive(Clone, Default)]
struct WarningLayer {
    warnings: Arc<Mutex<Vec<Warning>>>,
}

impl<S: Subscriber> Layer<S> for WarningLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() != Level::WARN {
            return;
        }
        let mut recorder = FieldRecorder::default();
        event.record(&mut recorder);
        self.warnings.lock().unwrap().push(recorder.0);
    }
}

/// Run `f` with a subscriber that records every WARN event on this thread
pub(crate) fn capture_warnings<T>(f: impl FnOnce() -> T) -> (T, Vec<Warning>) {
    let layer = WarningLayer::default();
    let warnings = Arc::clone(&layer.warnings);
    let subscriber = tracing_subscriber::registry().with(layer);

    let result = tracing::subscriber::with_default(subscriber, f);
    let captured = warnings.lock().unwrap().clone();
    (result, captured)
}
