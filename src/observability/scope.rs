//! Begin/complete logging around a unit of work
//!
//! - `{name}_BEGIN` on creation
//! - `{name}_COMPLETE` with `elapsed_ms` on `complete`
//! - `{name}_FAILED` with the reason on `fail`
//! - `{name}_INCOMPLETE` if dropped without either

use std::time::Instant;

use super::logger::Logger;

/// A scope that logs its own start, outcome and duration.
///
/// ```ignore
/// let scope = ObservationScope::new("DECODE");
/// let tensor = decoder.decode(&bytes)?;
/// scope.complete_with_fields(&[("shape", format!("{:?}", tensor.shape()).as_str())]);
/// ```
pub struct ObservationScope<'a> {
    name: &'a str,
    timer: Timer,
    completed: bool,
}

impl<'a> ObservationScope<'a> {
    pub fn new(name: &'a str) -> Self {
        Self::with_fields(name, &[])
    }

    /// Create a scope, logging `fields` on the BEGIN line
    pub fn with_fields(name: &'a str, fields: &[(&str, &str)]) -> Self {
        Logger::info(&format!("{}_BEGIN", name), fields);
        Self {
            name,
            timer: Timer::new(),
            completed: false,
        }
    }

    pub fn complete(self) {
        self.complete_with_fields(&[]);
    }

    pub fn complete_with_fields(mut self, fields: &[(&str, &str)]) {
        self.completed = true;
        let elapsed = self.timer.elapsed_ms().to_string();
        let mut all: Vec<(&str, &str)> = Vec::with_capacity(fields.len() + 1);
        all.push(("elapsed_ms", elapsed.as_str()));
        all.extend_from_slice(fields);
        Logger::info(&format!("{}_COMPLETE", self.name), &all);
    }

    pub fn fail(self, reason: &str) {
        self.fail_with_fields(reason, &[]);
    }

    /// Log `{name}_FAILED` once, carrying `reason` plus `fields`
    pub fn fail_with_fields(mut self, reason: &str, fields: &[(&str, &str)]) {
        self.completed = true;
        Logger::error(
            &format!("{}_FAILED", self.name),
            &failure_fields(reason, fields),
        );
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Milliseconds since the scope was opened
    pub fn elapsed_ms(&self) -> u128 {
        self.timer.elapsed_ms()
    }
}

fn failure_fields<'f>(reason: &'f str, fields: &[(&'f str, &'f str)]) -> Vec<(&'f str, &'f str)> {
    let mut all = Vec::with_capacity(fields.len() + 1);
    all.push(("reason", reason));
    all.extend_from_slice(fields);
    all
}

impl Drop for ObservationScope<'_> {
    fn drop(&mut self) {
        if !self.completed {
            Logger::warn(
                &format!("{}_INCOMPLETE", self.name),
                &[("reason", "scope dropped without completion")],
            );
        }
    }
}

/// Wall-clock timer
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.start.elapsed().as_millis()
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}
