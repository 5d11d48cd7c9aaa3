//! Observability for satcov
//!
//! Provides:
//! - Structured JSON-lines logging
//! - Typed pipeline events
//! - Begin/complete scopes with timing
//! - Peak resident memory sampling
//!
//! The decoder and persistence layers never log or time themselves; the
//! conversion pipeline wraps them with these tools.

mod events;
mod logger;
mod memory;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use memory::MemoryProbe;
pub use scope::{ObservationScope, Timer};

/// Log a pipeline event
pub fn log_event(event: Event) {
    log_event_with_fields(event, &[]);
}

/// Log a pipeline event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
