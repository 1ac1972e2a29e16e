//! Repository metadata
//!
//! Only used to enrich annotation text (links to files, notes documents);
//! the rewriting logic never depends on it.

use std::path::Path;

pub trait RepoMetadata: Send + Sync {
    fn repository_url(&self) -> Option<String>;
    fn file_url(&self, path: &Path) -> Option<String>;
}

/// Metadata known up front, e.g. from the caller's configuration.
#[derive(Debug, Clone)]
pub struct StaticRepoMetadata {
    pub base_url: String,
    pub branch: String,
}

impl StaticRepoMetadata {
    pub fn new(base_url: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            branch: branch.into(),
        }
    }
}

impl RepoMetadata for StaticRepoMetadata {
    fn repository_url(&self) -> Option<String> {
        Some(self.base_url.clone())
    }

    fn file_url(&self, path: &Path) -> Option<String> {
        let relative = path.to_string_lossy().replace('\\', "/");
        Some(format!(
            "{}/blob/{}/{}",
            self.base_url,
            self.branch,
            relative.trim_start_matches("./")
        ))
    }
}
