//! Errors

use std::path::PathBuf;

use thiserror::Error;

/// A file could not be migrated at all.
#[derive(Debug, Error)]
pub enum MigrateError {
    #[error("failed to parse {0}")]
    Parse(#[from] jsx_tree::ParseError),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A property value could not be transformed.
///
/// Raised per attribute; the migrator isolates it to that attribute.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    #[error("`{prop}` has no usable value for breakpoint `{breakpoint}` in {snippet}")]
    MalformedResponsive {
        prop: String,
        breakpoint: String,
        snippet: String,
    },
}

/// The migration notes sink rejected a write.
#[derive(Debug, Error)]
pub enum NotesError {
    #[error("migration notes are held by another writer")]
    Contention,
    #[error("failed to write migration notes to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A mapping configuration is well-formed JSON but not a usable table.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("`{0}` is not a valid JSX identifier")]
    InvalidIdentifier(String),
    #[error("package name must not be empty ({0})")]
    EmptyPackage(&'static str),
    #[error("unsupported value for {context}: {value}")]
    UnsupportedValue { context: String, value: String },
}
