pub mod cache;
#[cfg(test)]
pub mod memory;
pub mod types;

pub use cache::CacheStore;
pub use types::{Comment, PullRef, PullRequest, User};

use std::collections::BTreeSet;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Cache directory not found: {0}")]
    MissingDir(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to scan cache directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Read-only access to an already materialized corpus of pull request data.
///
/// These four queries are everything the note engine needs from storage.
pub trait RecordStore {
    /// All pull requests, in ascending number order.
    fn pull_requests(&self) -> &[PullRequest];

    /// Issue comments on a pull request, oldest first.
    fn comments(&self, pull: &PullRequest) -> Result<Vec<Comment>, StoreError>;

    /// Distinct logins that submitted a review on a pull request.
    /// May include the pull request's own author.
    fn reviewers(&self, pull: &PullRequest) -> Result<BTreeSet<String>, StoreError>;

    /// Profile for a login, if one was cached.
    fn user(&self, login: &str) -> Option<&User>;
}
