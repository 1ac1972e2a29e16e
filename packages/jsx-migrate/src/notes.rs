//! Migration notes sink
//!
//! Longer-form guidance attached to a component rule is collected here
//! across every migrated file and written out as one Markdown document.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use anyhow::Context;
use indexmap::{IndexMap, IndexSet};

use crate::error::NotesError;
use crate::repo::RepoMetadata;

/// Receives migration notes; shared by every file of a batch.
pub trait NotesSink: Send + Sync {
    fn add_migration_notes(
        &self,
        component: &str,
        notes: &[String],
        file: &Path,
    ) -> Result<(), NotesError>;
}

#[derive(Debug, Default, Clone)]
struct ComponentNotes {
    notes: IndexSet<String>,
    files: IndexSet<PathBuf>,
}

/// In-memory notes, accumulated per component and flushed once.
#[derive(Debug, Default)]
pub struct MigrationNotes {
    components: Mutex<IndexMap<String, ComponentNotes>>,
}

impl MigrationNotes {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> Result<MutexGuard<'_, IndexMap<String, ComponentNotes>>, NotesError> {
        self.components.lock().map_err(|_| NotesError::Contention)
    }

    pub fn is_empty(&self) -> bool {
        self.entries().map(|e| e.is_empty()).unwrap_or(true)
    }

    /// Notes recorded for `component`, in first-seen order.
    pub fn notes_for(&self, component: &str) -> Vec<String> {
        self.entries()
            .ok()
            .and_then(|e| e.get(component).map(|c| c.notes.iter().cloned().collect()))
            .unwrap_or_default()
    }

    /// Files in which `component` was migrated with notes.
    pub fn files_for(&self, component: &str) -> Vec<PathBuf> {
        self.entries()
            .ok()
            .and_then(|e| e.get(component).map(|c| c.files.iter().cloned().collect()))
            .unwrap_or_default()
    }

    pub fn render_markdown(&self, repo: Option<&dyn RepoMetadata>) -> Result<String, NotesError> {
        let entries = self.entries()?;
        let mut out = String::from("# Migration notes\n");
        for (component, notes) in entries.iter() {
            out.push_str(&format!("\n## {}\n\n", component));
            for note in &notes.notes {
                out.push_str(&format!("- {}\n", note));
            }
            out.push_str("\nFiles:\n\n");
            for file in &notes.files {
                let display = file.display().to_string();
                match repo.and_then(|r| r.file_url(file)) {
                    Some(url) => out.push_str(&format!("- [{}]({})\n", display, url)),
                    None => out.push_str(&format!("- {}\n", display)),
                }
            }
        }
        Ok(out)
    }

    pub fn flush(&self, path: &Path, repo: Option<&dyn RepoMetadata>) -> anyhow::Result<()> {
        let markdown = self.render_markdown(repo)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(path, markdown).map_err(|source| NotesError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(())
    }
}

impl NotesSink for MigrationNotes {
    fn add_migration_notes(
        &self,
        component: &str,
        notes: &[String],
        file: &Path,
    ) -> Result<(), NotesError> {
        let mut entries = self.entries()?;
        let entry = entries.entry(component.to_string()).or_default();
        entry.notes.extend(notes.iter().cloned());
        entry.files.insert(file.to_path_buf());
        Ok(())
    }
}
