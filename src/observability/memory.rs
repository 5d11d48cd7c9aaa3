//! Peak resident memory probe
//!
//! Reads the high-water mark of resident memory for the current process.
//! Only Linux exposes it without extra dependencies (`VmHWM` in
//! `/proc/self/status`); elsewhere the probe reports `None`.

use std::fs;

/// Samples process memory usage.
pub struct MemoryProbe;

impl MemoryProbe {
    /// Peak resident set size in KiB, if the platform exposes it.
    pub fn peak_resident_kb() -> Option<u64> {
        let status = fs::read_to_string("/proc/self/status").ok()?;
        parse_status_field(&status, "VmHWM:")
    }
}

/// Extracts a `kB` value from `/proc/<pid>/status` text.
fn parse_status_field(status: &str, key: &str) -> Option<u64> {
    status
        .lines()
        .find(|line| line.starts_with(key))
        .and_then(|line| line[key.len()..].split_whitespace().next())
        .and_then(|value| value.parse().ok())
}
