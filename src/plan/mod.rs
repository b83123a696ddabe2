pub mod classify;
pub mod credits;
pub mod types;

pub use classify::classify;
#[cfg(test)]
pub use types::CreditSection;
pub use types::{ComponentId, Credit, CreditLine, Entry, Highlight, RenderPlan, Section};

use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

use crate::config::Config;
use crate::notes::{Note, NoteResolver};
use crate::store::{PullRequest, RecordStore};

/// A pull request that passed the ignore filter, with its component and note.
#[derive(Debug)]
pub struct Classified<'a> {
    pub pull: &'a PullRequest,
    pub component: ComponentId,
    pub note: Note,
}

impl Classified<'_> {
    pub fn note_text(&self) -> Option<&str> {
        self.note.text()
    }
}

/// Components in priority order, fallback last.
pub fn component_ids(config: &Config) -> impl Iterator<Item = ComponentId> {
    (0..config.components.len())
        .map(ComponentId::Listed)
        .chain(std::iter::once(ComponentId::Fallback))
}

pub fn component_name(config: &Config, id: ComponentId) -> &str {
    match id {
        ComponentId::Listed(i) => &config.components[i].name,
        ComponentId::Fallback => &config.fallback_component,
    }
}

/// Drop ignored pull requests, then classify and resolve each survivor once.
pub fn classify_all<'a, S: RecordStore + ?Sized>(
    store: &'a S,
    config: &Config,
) -> Vec<Classified<'a>> {
    let resolver = NoteResolver::new(config);
    store
        .pull_requests()
        .iter()
        .filter(|pull| {
            let ignored = pull.has_any_label(&config.labels.ignore);
            if ignored {
                debug!(pr = pull.number, "ignored by label");
            }
            !ignored
        })
        .map(|pull| Classified {
            pull,
            component: classify(pull, &config.components),
            note: resolver.resolve(store, pull),
        })
        .collect()
}

/// Build the full render plan: highlights, component sections, and credits.
#[instrument(skip(store, config))]
pub fn build<S: RecordStore + ?Sized>(store: &S, config: &Config, version: &str) -> RenderPlan {
    let classified = classify_all(store, config);
    info!(
        pulls = store.pull_requests().len(),
        kept = classified.len(),
        "classified pull requests"
    );

    let is_highlight = |c: &Classified| c.pull.has_label(&config.labels.highlight);

    let mut highlight_groups: BTreeMap<(ComponentId, &str), Vec<&PullRequest>> =
        BTreeMap::new();
    let mut section_groups: BTreeMap<ComponentId, BTreeMap<&str, Vec<&PullRequest>>> =
        BTreeMap::new();
    for c in &classified {
        let Some(note) = c.note_text() else { continue };
        if is_highlight(c) {
            highlight_groups.entry((c.component, note)).or_default().push(c.pull);
        } else {
            section_groups
                .entry(c.component)
                .or_default()
                .entry(note)
                .or_default()
                .push(c.pull);
        }
    }

    let mut highlights: Vec<Highlight> = highlight_groups
        .into_iter()
        .map(|((id, note), pulls)| Highlight {
            component: match id {
                ComponentId::Fallback => None,
                listed => Some(component_name(config, listed).to_string()),
            },
            entry: entry(note, &pulls, &config.labels.rank),
        })
        .collect();
    highlights.sort_by(|a, b| a.entry.display_order(&b.entry));

    let sections: Vec<Section> = component_ids(config)
        .filter_map(|id| {
            let groups = section_groups.remove(&id)?;
            let mut entries: Vec<Entry> = groups
                .into_iter()
                .map(|(note, pulls)| entry(note, &pulls, &config.labels.rank))
                .collect();
            entries.sort_by(|a, b| a.display_order(b));
            Some(Section {
                component: component_name(config, id).to_string(),
                entries,
            })
        })
        .collect();

    let thanks = credits::build(store, config, &classified);

    info!(
        highlights = highlights.len(),
        sections = sections.len(),
        credit_sections = thanks.len(),
        "built render plan"
    );
    RenderPlan {
        title: format!("{} {}", config.project, version),
        highlights,
        sections,
        thanks,
    }
}

/// Highest index in `rank_labels` of any label the pull request carries.
pub fn label_rank(pull: &PullRequest, rank_labels: &[String]) -> Option<usize> {
    rank_labels.iter().rposition(|l| pull.has_label(l))
}

fn entry(note: &str, pulls: &[&PullRequest], rank_labels: &[String]) -> Entry {
    let mut refs: Vec<_> = pulls.iter().map(|p| p.pull_ref()).collect();
    refs.sort();
    Entry {
        note: note.to_string(),
        pulls: refs,
        rank: pulls.iter().filter_map(|p| label_rank(p, rank_labels)).max(),
    }
}
