use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use tracing::Level;

/// Destination for service events.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Records `name` with an optional JSON payload.
    async fn emit(&self, name: &str, data: Option<Value>);

    /// Same as [`emit`](Self::emit) for callers that cannot await. Must not
    /// block or panic.
    fn try_emit(&self, name: &str, data: Option<Value>);
}

/// Drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpEventSink;

#[async_trait]
impl EventSink for NoOpEventSink {
    async fn emit(&self, _name: &str, _data: Option<Value>) {}

    fn try_emit(&self, _name: &str, _data: Option<Value>) {}
}

/// Writes each event as a `tracing` record at a fixed level.
#[derive(Debug, Clone, Copy)]
pub struct LoggingEventSink {
    level: Level,
}

impl LoggingEventSink {
    /// Logs at `level`.
    #[must_use]
    pub const fn new(level: Level) -> Self {
        Self { level }
    }

    /// Logs at `DEBUG`.
    #[must_use]
    pub const fn debug() -> Self {
        Self::new(Level::DEBUG)
    }

    fn record(&self, name: &str, data: Option<&Value>) {
        let payload = data.map(ToString::to_string).unwrap_or_default();
        if self.level == Level::TRACE {
            tracing::trace!(event = name, %payload, "moodlens event");
        } else if self.level == Level::DEBUG {
            tracing::debug!(event = name, %payload, "moodlens event");
        } else if self.level == Level::WARN {
            tracing::warn!(event = name, %payload, "moodlens event");
        } else if self.level == Level::ERROR {
            tracing::error!(event = name, %payload, "moodlens event");
        } else {
            tracing::info!(event = name, %payload, "moodlens event");
        }
    }
}

impl Default for LoggingEventSink {
    fn default() -> Self {
        Self::new(Level::INFO)
    }
}

#[async_trait]
impl EventSink for LoggingEventSink {
    async fn emit(&self, name: &str, data: Option<Value>) {
        self.record(name, data.as_ref());
    }

    fn try_emit(&self, name: &str, data: Option<Value>) {
        self.record(name, data.as_ref());
    }
}

/// One event captured by [`CollectingEventSink`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordedEvent {
    /// Event name, e.g. `rewrite.completed`.
    pub name: String,
    /// Payload, if any.
    pub data: Option<Value>,
    /// When the event was recorded.
    pub at: DateTime<Utc>,
}

/// Keeps events in memory, in emission order.
#[derive(Debug, Default)]
pub struct CollectingEventSink {
    events: Mutex<Vec<RecordedEvent>>,
}

impl CollectingEventSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events.lock().clone()
    }

    /// Event names, in emission order.
    #[must_use]
    pub fn event_types(&self) -> Vec<String> {
        self.events.lock().iter().map(|e| e.name.clone()).collect()
    }

    /// Events whose name starts with `prefix`.
    #[must_use]
    pub fn events_of_type(&self, prefix: &str) -> Vec<RecordedEvent> {
        let events = self.events.lock();
        events.iter().filter(|e| e.name.starts_with(prefix)).cloned().collect()
    }

    /// Payload of the first event named exactly `name`.
    #[must_use]
    pub fn payload(&self, name: &str) -> Option<Value> {
        let events = self.events.lock();
        events.iter().find(|e| e.name == name).and_then(|e| e.data.clone())
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// True when nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forgets everything recorded so far.
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

#[async_trait]
impl EventSink for CollectingEventSink {
    async fn emit(&self, name: &str, data: Option<Value>) {
        self.try_emit(name, data);
    }

    fn try_emit(&self, name: &str, data: Option<Value>) {
        self.events.lock().push(RecordedEvent {
            name: name.to_string(),
            data,
            at: Utc::now(),
        });
    }
}
