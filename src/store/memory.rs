//! In-memory record store and fixtures for engine tests.

use std::collections::{BTreeSet, HashMap};

use super::types::RepoRef;
use super::{Comment, PullRequest, RecordStore, StoreError, User};

#[derive(Debug, Default)]
pub struct MemoryStore {
    pulls: Vec<PullRequest>,
    comments: HashMap<u64, Vec<Comment>>,
    reviews: HashMap<u64, Vec<String>>,
    users: HashMap<String, User>,
    /// Pull numbers whose comment and review queries fail
    broken: BTreeSet<u64>,
}

/// Helper to create a minimal PullRequest for testing.
pub fn pull(number: u64, author: &str, title: &str, labels: &[&str]) -> PullRequest {
    PullRequest {
        number,
        title: title.to_string(),
        body: None,
        html_url: format!("https://github.com/org/repo/pull/{}", number),
        author: author.to_string(),
        labels: labels.iter().map(|l| l.to_string()).collect(),
        repo: RepoRef {
            owner: "org".to_string(),
            name: "repo".to_string(),
        },
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pull(mut self, pull: PullRequest) -> Self {
        self.pulls.push(pull);
        self.pulls.sort_by_key(|p| p.number);
        self
    }

    pub fn with_comment(mut self, number: u64, author: &str, body: &str) -> Self {
        self.comments.entry(number).or_default().push(Comment {
            author: Some(author.to_string()),
            body: body.to_string(),
        });
        self
    }

    pub fn with_review(mut self, number: u64, reviewer: &str) -> Self {
        self.reviews
            .entry(number)
            .or_default()
            .push(reviewer.to_string());
        self
    }

    pub fn with_user(mut self, login: &str, name: Option<&str>) -> Self {
        self.users.insert(
            login.to_string(),
            User {
                login: login.to_string(),
                display_name: name.map(str::to_string),
                html_url: format!("https://github.com/{}", login),
            },
        );
        self
    }

    pub fn with_broken_threads(mut self, number: u64) -> Self {
        self.broken.insert(number);
        self
    }

    fn failure(&self, number: u64) -> StoreError {
        StoreError::Read {
            path: format!("memory-{}", number).into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "broken fixture"),
        }
    }
}

impl RecordStore for MemoryStore {
    fn pull_requests(&self) -> &[PullRequest] {
        &self.pulls
    }

    fn comments(&self, pull: &PullRequest) -> Result<Vec<Comment>, StoreError> {
        if self.broken.contains(&pull.number) {
            return Err(self.failure(pull.number));
        }
        Ok(self.comments.get(&pull.number).cloned().unwrap_or_default())
    }

    fn reviewers(&self, pull: &PullRequest) -> Result<BTreeSet<String>, StoreError> {
        if self.broken.contains(&pull.number) {
            return Err(self.failure(pull.number));
        }
        Ok(self
            .reviews
            .get(&pull.number)
            .map(|r| r.iter().cloned().collect())
            .unwrap_or_default())
    }

    fn user(&self, login: &str) -> Option<&User> {
        self.users.get(login)
    }
}
