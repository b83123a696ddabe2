use std::cmp::Ordering;

use crate::store::{PullRef, User};

/// Which component a pull request was classified into.
///
/// Ordering follows component priority: listed components in configured
/// order, then the fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ComponentId {
    Listed(usize),
    Fallback,
}

/// One bullet: a note and every pull request that resolved to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub note: String,
    /// Ascending by number, never empty
    pub pulls: Vec<PullRef>,
    /// Highest rank-label index across the pulls, None when unranked
    pub rank: Option<usize>,
}

impl Entry {
    pub fn first_number(&self) -> u64 {
        self.pulls.first().map(|p| p.number).unwrap_or(u64::MAX)
    }

    /// Higher rank first, then the earliest pull request.
    pub fn display_order(&self, other: &Entry) -> Ordering {
        other
            .rank
            .cmp(&self.rank)
            .then_with(|| self.first_number().cmp(&other.first_number()))
    }
}

/// A highlighted entry, attributed to its component unless it is the fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight {
    pub component: Option<String>,
    pub entry: Entry,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub component: String,
    pub entries: Vec<Entry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreditLine {
    /// Every pull request in the component the login reviewed
    CodeReview(Vec<PullRef>),
    /// One distinct note the login authored, with the pulls behind it
    Authored { note: String, pulls: Vec<PullRef> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credit {
    pub user: User,
    pub lines: Vec<CreditLine>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreditSection {
    pub component: String,
    pub credits: Vec<Credit>,
}

/// Everything the renderer needs, already ordered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderPlan {
    pub title: String,
    pub highlights: Vec<Highlight>,
    /// Non-empty component sections in priority order
    pub sections: Vec<Section>,
    /// Non-empty credit sections in priority order
    pub thanks: Vec<CreditSection>,
}
