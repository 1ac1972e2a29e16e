//! Parse errors

use thiserror::Error;

/// The source could not be parsed into a [`Document`](crate::Document).
#[derive(Debug, Clone, Error)]
pub enum ParseError {
    #[error("{path}: {}", .messages.join("; "))]
    Syntax { path: String, messages: Vec<String> },
    #[error("{path}: parser aborted")]
    Panicked { path: String },
}
