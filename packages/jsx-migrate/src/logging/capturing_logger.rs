// Capturing Logger
//
// Logger that keeps every message in memory, for tests and for callers that
// want to attach diagnostics to a report.

use std::sync::Mutex;

use super::logger::{LogLevel, Logger};

#[derive(Default)]
pub struct CapturingLogger {
    entries: Mutex<Vec<(LogLevel, String)>>,
}

impl CapturingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything logged so far.
    pub fn entries(&self) -> Vec<(LogLevel, String)> {
        match self.entries.lock() {
            Ok(entries) => entries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn messages(&self, level: LogLevel) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }

    fn push(&self, level: LogLevel, msg: &str) {
        let mut entries = match self.entries.lock() {
            Ok(entries) => entries,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.push((level, msg.to_string()));
    }
}

impl Logger for CapturingLogger {
    fn level(&self) -> LogLevel {
        LogLevel::Debug
    }
    fn debug(&self, msg: &str) {
        self.push(LogLevel::Debug, msg);
    }
    fn info(&self, msg: &str) {
        self.push(LogLevel::Info, msg);
    }
    fn warn(&self, msg: &str) {
        self.push(LogLevel::Warn, msg);
    }
    fn error(&self, msg: &str) {
        self.push(LogLevel::Error, msg);
    }
}
