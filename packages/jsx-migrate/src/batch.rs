//! Batch driver
//!
//! Runs many files through one [`Migrator`] in parallel. Every file gets its
//! own document; only the logger and the notes sink are shared.

use std::fs;
use std::path::{Path, PathBuf};

use glob::glob;
use rayon::prelude::*;

use crate::error::MigrateError;
use crate::logging::Logger;
use crate::migrator::{FileContext, MigrationOutcome, Migrator};
use crate::notes::NotesSink;
use crate::repo::RepoMetadata;

#[derive(Debug, Clone, Copy, Default)]
pub struct BatchOptions {
    /// Write changed files back to disk; otherwise only report.
    pub write: bool,
}

impl BatchOptions {
    pub fn dry_run() -> Self {
        Self { write: false }
    }

    pub fn write() -> Self {
        Self { write: true }
    }
}

#[derive(Debug)]
pub struct FileResult {
    pub path: PathBuf,
    pub outcome: Result<MigrationOutcome, MigrateError>,
    pub written: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub files: usize,
    pub changed: usize,
    pub failed: usize,
    pub migrated: usize,
    pub unresolved: usize,
    pub diagnostics: usize,
}

impl BatchSummary {
    pub fn of(results: &[FileResult]) -> Self {
        results.iter().fold(Self::default(), |mut summary, result| {
            summary.files += 1;
            match &result.outcome {
                Ok(outcome) => {
                    summary.changed += outcome.changed as usize;
                    summary.migrated += outcome.report.migrated;
                    summary.unresolved += outcome.report.unresolved;
                    summary.diagnostics += outcome.report.diagnostics.len();
                }
                Err(_) => summary.failed += 1,
            }
            summary
        })
    }
}

/// Expand glob patterns into a sorted, de-duplicated file list.
pub fn collect_files<I, S>(patterns: I) -> anyhow::Result<Vec<PathBuf>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut files = Vec::new();
    for pattern in patterns {
        let pattern = pattern.as_ref();
        let paths = glob(pattern)
            .map_err(|e| anyhow::anyhow!("invalid glob pattern `{}`: {}", pattern, e))?;
        files.extend(paths.filter_map(Result::ok).filter(|p| p.is_file()));
    }
    files.sort();
    files.dedup();
    Ok(files)
}

/// Migrate every file; a failing file never stops the others.
pub fn migrate_files(
    migrator: &Migrator<'_>,
    files: &[PathBuf],
    options: BatchOptions,
    logger: &dyn Logger,
    notes: Option<&dyn NotesSink>,
    repo: Option<&dyn RepoMetadata>,
) -> Vec<FileResult> {
    let results: Vec<FileResult> = files
        .par_iter()
        .map(|path| {
            let ctx = FileContext {
                path,
                logger,
                notes,
                repo,
            };
            migrate_file(migrator, &ctx, options)
        })
        .collect();

    let summary = BatchSummary::of(&results);
    logger.info(&format!(
        "{} file(s), {} changed, {} failed; {} occurrence(s) migrated, {} unresolved, {} diagnostic(s)",
        summary.files,
        summary.changed,
        summary.failed,
        summary.migrated,
        summary.unresolved,
        summary.diagnostics
    ));
    results
}

fn migrate_file(migrator: &Migrator<'_>, ctx: &FileContext<'_>, options: BatchOptions) -> FileResult {
    let path = ctx.path.to_path_buf();
    let outcome = read(ctx.path).and_then(|source| migrator.migrate_source(&source, ctx));
    let mut written = false;

    let outcome = match outcome {
        Ok(outcome) if options.write && outcome.changed => {
            match fs::write(ctx.path, &outcome.code) {
                Ok(()) => {
                    written = true;
                    Ok(outcome)
                }
                Err(source) => Err(MigrateError::Io {
                    path: path.clone(),
                    source,
                }),
            }
        }
        other => other,
    };

    if let Err(err) = &outcome {
        ctx.logger.error(&err.to_string());
    }
    FileResult {
        path,
        outcome,
        written,
    }
}

fn read(path: &Path) -> Result<String, MigrateError> {
    fs::read_to_string(path).map_err(|source| MigrateError::Io {
        path: path.to_path_buf(),
        source,
    })
}
