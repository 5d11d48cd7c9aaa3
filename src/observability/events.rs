//! Observable events of a conversion run

use std::fmt;

use super::logger::Severity;

/// Point events emitted around the decode / trim / save / verify pipeline.
///
/// Begin and complete markers for whole stages come from
/// [`ObservationScope`](super::ObservationScope) instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Configuration resolved
    ConfigLoaded,
    /// Input container read into memory
    InputRead,
    /// Trailing bytes after the declared structure were ignored
    TrailingBytesIgnored,
    /// Reference entry trimmed from an axis
    TrimApplied,
    /// Array file written
    ArraySaved,
    /// Array file reloaded and compared
    VerifyComplete,
    /// Reloaded tensor differs from the one written
    VerifyMismatch,
    /// Peak resident memory sample
    MemoryPeak,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::InputRead => "INPUT_READ",
            Event::TrailingBytesIgnored => "TRAILING_BYTES_IGNORED",
            Event::TrimApplied => "TRIM_APPLIED",
            Event::ArraySaved => "ARRAY_SAVED",
            Event::VerifyComplete => "VERIFY_COMPLETE",
            Event::VerifyMismatch => "VERIFY_MISMATCH",
            Event::MemoryPeak => "MEMORY_PEAK",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::VerifyMismatch => Severity::Error,
            Event::TrailingBytesIgnored => Severity::Warn,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
