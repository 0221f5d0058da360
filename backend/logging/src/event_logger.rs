//! Viewer Event Logger
//!
//! Structured events (sample loads, load failures, render fallbacks) emitted
//! through `tracing` under the `viewer_events` target.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::redact::redact_sensitive_data;

pub const EVENT_TARGET: &str = "viewer_events";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewerEvent {
    SampleLoaded {
        path: String,
        samples: usize,
        errors: usize,
    },
    /// A line (or the whole file) could not be read.
    LoadFailure {
        path: String,
        line: Option<usize>,
        message: String,
    },
    /// The renderer showed something in a simpler form than requested.
    RenderFallback { context: String, reason: String },
}

#[derive(Debug, Serialize)]
pub struct EventLogEntry {
    pub source: String,
    pub timestamp: DateTime<Utc>,
    pub event: ViewerEvent,
}

pub struct EventLogger;

impl EventLogger {
    /// Redact, timestamp and emit one event. Returns the entry as logged.
    pub fn log_event(source: &str, mut event: ViewerEvent) -> EventLogEntry {
        match &mut event {
            ViewerEvent::SampleLoaded { .. } => {}
            ViewerEvent::LoadFailure { message, .. } => *message = redact_sensitive_data(message),
            ViewerEvent::RenderFallback { reason, .. } => *reason = redact_sensitive_data(reason),
        }

        let entry = EventLogEntry {
            source: source.into(),
            timestamp: Utc::now(),
            event,
        };
        let json = serde_json::to_string(&entry).unwrap_or_default();

        match &entry.event {
            ViewerEvent::SampleLoaded { .. } => info!(target: EVENT_TARGET, event = %json, "Samples loaded"),
            ViewerEvent::LoadFailure { .. } => warn!(target: EVENT_TARGET, event = %json, "Load failure"),
            ViewerEvent::RenderFallback { .. } => debug!(target: EVENT_TARGET, event = %json, "Render fallback"),
        }
        entry
    }
}
