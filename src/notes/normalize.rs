/// Leading imperative verbs and their past-tense forms.
const PAST_TENSE: &[(&str, &str)] = &[
    ("Add", "Added"),
    ("Allow", "Allowed"),
    ("Bump", "Bumped"),
    ("Change", "Changed"),
    ("Deprecate", "Deprecated"),
    ("Disable", "Disabled"),
    ("Drop", "Dropped"),
    ("Enable", "Enabled"),
    ("Fix", "Fixed"),
    ("Improve", "Improved"),
    ("Make", "Made"),
    ("Move", "Moved"),
    ("Prevent", "Prevented"),
    ("Refactor", "Refactored"),
    ("Remove", "Removed"),
    ("Rename", "Renamed"),
    ("Show", "Showed"),
    ("Support", "Supported"),
    ("Update", "Updated"),
    ("Use", "Used"),
];

/// Tidy a selected note into a release-notes sentence.
///
/// Trims, capitalizes the first character, ensures a trailing period, then
/// rewrites a leading imperative verb into the past tense. Nothing else in
/// the sentence is touched. An empty note stays empty.
pub fn normalize(note: &str) -> String {
    let trimmed = note.trim();
    let mut chars = trimmed.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };

    let mut sentence: String = first.to_uppercase().chain(chars).collect();
    if !sentence.ends_with('.') {
        sentence.push('.');
    }
    past_tense(&sentence)
}

fn past_tense(sentence: &str) -> String {
    for (present, past) in PAST_TENSE {
        if let Some(rest) = sentence
            .strip_prefix(present)
            .and_then(|r| r.strip_prefix(' '))
        {
            return format!("{} {}", past, rest);
        }
    }
    sentence.to_string()
}
