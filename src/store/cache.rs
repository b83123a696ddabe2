use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};
use walkdir::WalkDir;

use super::types::{Cached, RawComment, RawPull, RawReview};
use super::{Comment, PullRequest, RecordStore, StoreError, User};

/// Record store backed by a directory of cached GitHub API responses.
///
/// File naming:
///   {owner}-{repo}-pull-{n}             pull request
///   {owner}-{repo}-issue-{n}-comments   issue comments
///   {owner}-{repo}-issue-{n}-reviews    reviews
///   user-{login}                        user profile
///
/// Pull requests and users are loaded up front. Comments and reviews are
/// read per query so one bad file only affects its own pull request.
#[derive(Debug)]
pub struct CacheStore {
    pulls: Vec<PullRequest>,
    users: HashMap<String, User>,
    /// File name -> path, for comment and review lookups
    files: HashMap<String, PathBuf>,
}

impl CacheStore {
    #[instrument(skip(dir), fields(dir = %dir.display()))]
    pub fn open(dir: &Path) -> Result<Self, StoreError> {
        if !dir.is_dir() {
            return Err(StoreError::MissingDir(dir.to_path_buf()));
        }

        let mut pulls = BTreeMap::new();
        let mut users = HashMap::new();
        let mut files = HashMap::new();

        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            let path = entry.path();

            if name.starts_with("user-") {
                match read_cached::<User>(path) {
                    Ok(user) => {
                        users.insert(user.login.clone(), user);
                    }
                    Err(err) => warn!(error = %err, "skipping unreadable user record"),
                }
            } else if name.contains("-pull-") {
                match read_cached::<RawPull>(path) {
                    Ok(raw) => {
                        let pull = PullRequest::from(raw);
                        pulls.insert(pull.number, pull);
                    }
                    Err(err) => warn!(error = %err, "skipping unreadable pull request record"),
                }
            } else if name.ends_with("-comments") || name.ends_with("-reviews") {
                files.insert(name, path.to_path_buf());
            }
        }

        info!(
            pulls = pulls.len(),
            users = users.len(),
            threads = files.len(),
            "loaded cache"
        );
        Ok(Self {
            pulls: pulls.into_values().collect(),
            users,
            files,
        })
    }

    fn thread_path(&self, pull: &PullRequest, kind: &str) -> Option<&PathBuf> {
        let name = format!(
            "{}-{}-issue-{}-{}",
            pull.repo.owner, pull.repo.name, pull.number, kind
        );
        self.files.get(&name)
    }
}

impl RecordStore for CacheStore {
    fn pull_requests(&self) -> &[PullRequest] {
        &self.pulls
    }

    fn comments(&self, pull: &PullRequest) -> Result<Vec<Comment>, StoreError> {
        let Some(path) = self.thread_path(pull, "comments") else {
            debug!(pr = pull.number, "no cached comments");
            return Ok(Vec::new());
        };
        let raw: Vec<RawComment> = read_cached(path)?;
        Ok(raw.into_iter().map(Comment::from).collect())
    }

    fn reviewers(&self, pull: &PullRequest) -> Result<BTreeSet<String>, StoreError> {
        let Some(path) = self.thread_path(pull, "reviews") else {
            debug!(pr = pull.number, "no cached reviews");
            return Ok(BTreeSet::new());
        };
        let raw: Vec<RawReview> = read_cached(path)?;
        Ok(raw.into_iter().filter_map(|r| r.user).map(|u| u.login).collect())
    }

    fn user(&self, login: &str) -> Option<&User> {
        self.users.get(login)
    }
}

fn read_cached<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let contents = fs::read_to_string(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let cached: Cached<T> = serde_json::from_str(&contents).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(cached.data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn pull_json(number: u64, author: &str) -> String {
        format!(
            r#"{{"data": {{
                "number": {number},
                "title": "Fix crash",
                "body": "Notes: Fixed crash on startup.",
                "html_url": "https://github.com/transmission/transmission/pull/{number}",
                "user": {{"login": "{author}"}},
                "labels": [{{"name": "scope:core"}}],
                "base": {{"repo": {{"name": "transmission", "owner": {{"login": "transmission"}}}}}}
            }}}}"#
        )
    }

    fn write(dir: &Path, name: &str, contents: &str) {
        std::fs::write(dir.join(name), contents).unwrap();
    }

    #[test]
    fn test_open_missing_dir() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope");
        assert!(matches!(
            CacheStore::open(&missing),
            Err(StoreError::MissingDir(_))
        ));
    }

    #[test]
    fn test_loads_pulls_in_number_order() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "transmission-transmission-pull-20", &pull_json(20, "alice"));
        write(temp.path(), "transmission-transmission-pull-3", &pull_json(3, "bob"));

        let store = CacheStore::open(temp.path()).unwrap();
        let numbers: Vec<u64> = store.pull_requests().iter().map(|p| p.number).collect();
        assert_eq!(numbers, vec![3, 20]);
    }

    #[test]
    fn test_skips_malformed_pull_record() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "transmission-transmission-pull-1", "{not json");
        write(temp.path(), "transmission-transmission-pull-2", &pull_json(2, "alice"));

        let store = CacheStore::open(temp.path()).unwrap();
        assert_eq!(store.pull_requests().len(), 1);
    }

    #[test]
    fn test_comments_reviews_and_users() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("nested");
        std::fs::create_dir_all(&nested).unwrap();
        write(temp.path(), "transmission-transmission-pull-7", &pull_json(7, "alice"));
        write(
            &nested,
            "transmission-transmission-issue-7-comments",
            r#"{"data": [
                {"user": {"login": "ckerr"}, "body": "first"},
                {"user": null, "body": "second"}
            ]}"#,
        );
        write(
            &nested,
            "transmission-transmission-issue-7-reviews",
            r#"{"data": [
                {"user": {"login": "bob"}},
                {"user": {"login": "bob"}},
                {"user": {"login": "alice"}}
            ]}"#,
        );
        write(
            temp.path(),
            "user-alice",
            r#"{"data": {
                "login": "alice",
                "name": "Alice A.",
                "html_url": "https://github.com/alice"
            }}"#,
        );

        let store = CacheStore::open(temp.path()).unwrap();
        let pull = &store.pull_requests()[0];

        let comments = store.comments(pull).unwrap();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].author.as_deref(), Some("ckerr"));

        let reviewers = store.reviewers(pull).unwrap();
        assert_eq!(reviewers.into_iter().collect::<Vec<_>>(), vec!["alice", "bob"]);

        assert_eq!(
            store.user("alice").and_then(|u| u.display_name.as_deref()),
            Some("Alice A.")
        );
        assert!(store.user("bob").is_none());
    }

    #[test]
    fn test_missing_threads_are_empty() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "transmission-transmission-pull-9", &pull_json(9, "alice"));

        let store = CacheStore::open(temp.path()).unwrap();
        let pull = &store.pull_requests()[0];
        assert!(store.comments(pull).unwrap().is_empty());
        assert!(store.reviewers(pull).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_comments_is_an_error() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "transmission-transmission-pull-9", &pull_json(9, "alice"));
        write(temp.path(), "transmission-transmission-issue-9-comments", "[[[");

        let store = CacheStore::open(temp.path()).unwrap();
        let pull = &store.pull_requests()[0];
        assert!(matches!(store.comments(pull), Err(StoreError::Parse { .. })));
    }
}
