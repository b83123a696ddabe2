use serde::Deserialize;

/// Repository a pull request belongs to; addresses its comments and reviews.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

/// A pull request snapshot. Identity is `number`.
#[derive(Debug, Clone)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    /// Free text, paragraphs separated by blank lines
    pub body: Option<String>,
    pub html_url: String,
    /// Author's GitHub login
    pub author: String,
    /// Label names in the order the API delivered them
    pub labels: Vec<String>,
    pub repo: RepoRef,
}

impl PullRequest {
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    pub fn has_any_label(&self, labels: &[String]) -> bool {
        labels.iter().any(|l| self.has_label(l))
    }

    pub fn pull_ref(&self) -> PullRef {
        PullRef {
            number: self.number,
            html_url: self.html_url.clone(),
        }
    }
}

/// A citation of one pull request in the rendered output.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct PullRef {
    pub number: u64,
    pub html_url: String,
}

/// An issue comment on a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// None when the account was deleted
    pub author: Option<String>,
    pub body: String,
}

/// A GitHub user profile, required to credit a login.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    pub login: String,
    #[serde(rename = "name", default)]
    pub display_name: Option<String>,
    pub html_url: String,
}

/// The envelope every cached API response is stored in.
#[derive(Debug, Deserialize)]
pub(crate) struct Cached<T> {
    pub data: T,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawAccount {
    pub login: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawLabel {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawRepo {
    pub name: String,
    pub owner: RawAccount,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawBase {
    pub repo: RawRepo,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawPull {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    pub html_url: String,
    pub user: RawAccount,
    #[serde(default)]
    pub labels: Vec<RawLabel>,
    pub base: RawBase,
}

impl From<RawPull> for PullRequest {
    fn from(raw: RawPull) -> Self {
        PullRequest {
            number: raw.number,
            title: raw.title,
            body: raw.body,
            html_url: raw.html_url,
            author: raw.user.login,
            labels: raw.labels.into_iter().map(|l| l.name).collect(),
            repo: RepoRef {
                owner: raw.base.repo.owner.login,
                name: raw.base.repo.name,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawComment {
    #[serde(default)]
    pub user: Option<RawAccount>,
    #[serde(default)]
    pub body: Option<String>,
}

impl From<RawComment> for Comment {
    fn from(raw: RawComment) -> Self {
        Comment {
            author: raw.user.map(|u| u.login),
            body: raw.body.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawReview {
    #[serde(default)]
    pub user: Option<RawAccount>,
}
