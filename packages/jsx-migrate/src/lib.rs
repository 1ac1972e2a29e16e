#![deny(clippy::all)]

/**
 * JSX component migration engine
 *
 * Rewrites usages of one component library into another from a declarative
 * mapping table: tag renames, property renames and value transforms, import
 * consolidation, and inline review annotations.
 */
// Re-export the tree facade; rule functions receive its types
pub use jsx_tree as tree;

pub mod annotations;
pub mod batch;
pub mod config;
pub mod error;
pub mod imports;
pub mod logging;
pub mod migrator;
pub mod notes;
pub mod repo;
pub mod resolver;
pub mod rules;
pub mod transform;

pub use batch::{collect_files, migrate_files, BatchOptions, BatchSummary, FileResult};
pub use config::MappingConfig;
pub use error::{ConfigError, MigrateError, NotesError, TransformError};
pub use logging::{CapturingLogger, ConsoleLogger, LogLevel, Logger, NullLogger, UnknownLogLevel};
pub use migrator::{Diagnostic, FileContext, FileReport, MigrationOutcome, Migrator};
pub use notes::{MigrationNotes, NotesSink};
pub use repo::{RepoMetadata, StaticRepoMetadata};
pub use resolver::MappingResolver;
pub use rules::{
    candidate, Addition, ComponentMeta, ComponentRule, MappingTable, Occurrence, PropChange,
    PropContext, PropName, PropTarget, PropUpdate, PropsMeta, RuleContext, TodoComments,
};
pub use transform::{transform, EnumTable, KeyTransform, ValueMapping, GLOBAL_VALUES};

/// Engine version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
