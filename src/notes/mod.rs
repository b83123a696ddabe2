pub mod normalize;

pub use normalize::normalize;

use tracing::{debug, warn};

use crate::config::Config;
use crate::store::{PullRequest, RecordStore};

const NOTES_PREFIX: &str = "notes: ";

/// Result of scanning one text for a `notes:` paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// A paragraph supplied note text
    Note(String),
    /// A paragraph explicitly said there is nothing to report
    Omit,
    /// No paragraph carried the prefix; try the next source
    NoMatch,
}

/// Where a resolved note came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteSource {
    DocsOverride,
    Comment { author: String },
    Body,
    Title,
}

/// The canonical note for one pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Note {
    Resolved { text: String, source: NoteSource },
    /// Explicitly suppressed; the pull request is never listed
    Omitted,
}

impl Note {
    pub fn text(&self) -> Option<&str> {
        match self {
            Note::Resolved { text, .. } => Some(text),
            Note::Omitted => None,
        }
    }
}

/// Split text into paragraphs at blank (whitespace-only) lines.
/// Accepts both `\n` and `\r\n` line endings.
pub fn paragraphs(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                out.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        out.push(current.join("\n"));
    }
    out
}

/// Find the first paragraph starting (case-insensitively) with `notes: `.
pub fn extract(text: &str, no_notes_aliases: &[String]) -> Extraction {
    for paragraph in paragraphs(text) {
        let has_prefix = paragraph
            .get(..NOTES_PREFIX.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(NOTES_PREFIX));
        if !has_prefix {
            continue;
        }

        let note = paragraph[NOTES_PREFIX.len()..].trim();
        let lowered = note.to_lowercase();
        if no_notes_aliases.iter().any(|a| a.to_lowercase() == lowered) {
            return Extraction::Omit;
        }
        return Extraction::Note(note.to_string());
    }
    Extraction::NoMatch
}

/// Derives the canonical note for a pull request.
///
/// First hit wins: docs override, newest trusted `notes:` comment, the pull
/// request body, then the title.
pub struct NoteResolver<'a> {
    config: &'a Config,
}

impl<'a> NoteResolver<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    pub fn resolve<S: RecordStore + ?Sized>(&self, store: &S, pull: &PullRequest) -> Note {
        let note = self.select(store, pull);
        match &note {
            Note::Resolved { text, source } => {
                debug!(pr = pull.number, ?source, note = %text, "resolved note")
            }
            Note::Omitted => debug!(pr = pull.number, "note explicitly omitted"),
        }
        note
    }

    fn select<S: RecordStore + ?Sized>(&self, store: &S, pull: &PullRequest) -> Note {
        if let Some(summary) = self.config.docs_summary() {
            if pull.has_any_label(&self.config.labels.docs) {
                return resolved(summary, NoteSource::DocsOverride);
            }
        }

        let aliases = &self.config.notes.no_notes_aliases;

        let comments = store.comments(pull).unwrap_or_else(|err| {
            warn!(pr = pull.number, error = %err, "could not load comments, ignoring them");
            Vec::new()
        });
        let trusted = comments.iter().rev().filter_map(|c| {
            let author = c.author.as_deref()?;
            self.is_trusted(author).then_some((author, c.body.as_str()))
        });
        for (author, body) in trusted {
            match extract(body, aliases) {
                Extraction::Note(text) => {
                    return resolved(
                        &text,
                        NoteSource::Comment {
                            author: author.to_string(),
                        },
                    )
                }
                Extraction::Omit => return Note::Omitted,
                Extraction::NoMatch => {}
            }
        }

        if let Some(body) = pull.body.as_deref() {
            match extract(body, aliases) {
                Extraction::Note(text) => return resolved(&text, NoteSource::Body),
                Extraction::Omit => return Note::Omitted,
                Extraction::NoMatch => {}
            }
        }

        resolved(&pull.title, NoteSource::Title)
    }

    fn is_trusted(&self, login: &str) -> bool {
        self.config.notes.trusted_writers.iter().any(|w| w == login)
    }
}

fn resolved(text: &str, source: NoteSource) -> Note {
    Note::Resolved {
        text: normalize(text),
        source,
    }
}
