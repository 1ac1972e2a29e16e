//! Logging
//!
//! The engine never prints directly; everything goes through an injected
//! [`Logger`].

pub mod capturing_logger;
pub mod console_logger;
pub mod logger;

pub use capturing_logger::CapturingLogger;
pub use console_logger::ConsoleLogger;
pub use logger::{LogLevel, Logger, NullLogger, UnknownLogLevel};
