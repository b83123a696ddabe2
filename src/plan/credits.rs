use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

use super::types::{ComponentId, Credit, CreditLine, CreditSection};
use super::{component_ids, component_name, Classified};
use crate::config::Config;
use crate::store::{PullRef, PullRequest, RecordStore};

/// Distinct reviewers of each pull request, minus the pull request's author.
///
/// Anyone who comments in a review thread is listed as a reviewer, including
/// the submitter; crediting someone for reviewing their own work reads oddly.
pub fn reviewers_by_pull<S: RecordStore + ?Sized>(
    store: &S,
    classified: &[Classified<'_>],
) -> BTreeMap<u64, BTreeSet<String>> {
    classified
        .iter()
        .map(|c| {
            let mut logins = store.reviewers(c.pull).unwrap_or_else(|err| {
                warn!(pr = c.pull.number, error = %err, "could not load reviews, ignoring them");
                BTreeSet::new()
            });
            logins.remove(&c.pull.author);
            (c.pull.number, logins)
        })
        .collect()
}

/// Per-component contributor credit, in component priority order.
pub fn build<S: RecordStore + ?Sized>(
    store: &S,
    config: &Config,
    classified: &[Classified<'_>],
) -> Vec<CreditSection> {
    let reviewers = reviewers_by_pull(store, classified);

    component_ids(config)
        .filter_map(|id| {
            let credits = component_credits(store, config, classified, &reviewers, id);
            if credits.is_empty() {
                return None;
            }
            Some(CreditSection {
                component: component_name(config, id).to_string(),
                credits,
            })
        })
        .collect()
}

fn component_credits<S: RecordStore + ?Sized>(
    store: &S,
    config: &Config,
    classified: &[Classified<'_>],
    reviewers: &BTreeMap<u64, BTreeSet<String>>,
    id: ComponentId,
) -> Vec<Credit> {
    let pulls: Vec<&Classified> = classified.iter().filter(|c| c.component == id).collect();

    // login -> note -> pulls
    let mut authored: BTreeMap<&str, BTreeMap<&str, Vec<&PullRequest>>> = BTreeMap::new();
    // login -> reviewed pulls
    let mut reviewed: BTreeMap<&str, Vec<&PullRequest>> = BTreeMap::new();

    for c in &pulls {
        if let Some(note) = c.note_text() {
            authored
                .entry(c.pull.author.as_str())
                .or_default()
                .entry(note)
                .or_default()
                .push(c.pull);
        }
        for login in reviewers.get(&c.pull.number).into_iter().flatten() {
            reviewed.entry(login.as_str()).or_default().push(c.pull);
        }
    }

    let mut logins: Vec<&str> = authored
        .keys()
        .chain(reviewed.keys())
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .filter(|login| !config.is_omitted_login(login))
        .collect();
    logins.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b)));

    logins
        .into_iter()
        .filter_map(|login| {
            let Some(user) = store.user(login) else {
                debug!(login, "no cached profile, skipping credit");
                return None;
            };

            let mut lines = Vec::new();
            if let Some(pulls) = reviewed.get(login) {
                lines.push(CreditLine::CodeReview(sorted_refs(pulls)));
            }

            let mut notes: Vec<(String, Vec<PullRef>)> = authored
                .get(login)
                .into_iter()
                .flatten()
                .map(|(note, pulls)| (note.to_string(), sorted_refs(pulls)))
                .collect();
            notes.sort_by_key(|(_, pulls)| pulls.first().map(|p| p.number));
            lines.extend(
                notes
                    .into_iter()
                    .map(|(note, pulls)| CreditLine::Authored { note, pulls }),
            );

            Some(Credit {
                user: user.clone(),
                lines,
            })
        })
        .collect()
}

fn sorted_refs(pulls: &[&PullRequest]) -> Vec<PullRef> {
    let mut refs: Vec<PullRef> = pulls.iter().map(|p| p.pull_ref()).collect();
    refs.sort();
    refs.dedup();
    refs
}
