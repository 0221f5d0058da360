//! Structured logging for sampleview.
//!
//! Handles subscriber setup with an optional rolling NDJSON file, redaction,
//! and viewer event logging.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{EventLogEntry, EventLogger, ViewerEvent, EVENT_TARGET};
pub use logger::{init_logger, LOG_FILE_NAME};
pub use redact::redact_sensitive_data;
