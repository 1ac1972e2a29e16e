// Console Logger
//
// Every level goes to stderr: stdout is reserved for migrated code when a
// driver prints files instead of writing them.

use super::logger::{LogLevel, Logger};

pub struct ConsoleLogger {
    level: LogLevel,
    prefix: Option<String>,
}

impl ConsoleLogger {
    pub fn new(level: LogLevel) -> Self {
        Self {
            level,
            prefix: None,
        }
    }

    /// Tag every line, e.g. with the tool name when several tools share a
    /// terminal.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn format_line(&self, level: LogLevel, msg: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{} [{}] {}", prefix, level, msg),
            None => format!("[{}] {}", level, msg),
        }
    }

    fn emit(&self, level: LogLevel, msg: &str) {
        if self.is_enabled(level) {
            eprintln!("{}", self.format_line(level, msg));
        }
    }
}

impl Logger for ConsoleLogger {
    fn level(&self) -> LogLevel {
        self.level
    }

    fn debug(&self, msg: &str) {
        self.emit(LogLevel::Debug, msg);
    }

    fn info(&self, msg: &str) {
        self.emit(LogLevel::Info, msg);
    }

    fn warn(&self, msg: &str) {
        self.emit(LogLevel::Warn, msg);
    }

    fn error(&self, msg: &str) {
        self.emit(LogLevel::Error, msg);
    }
}
