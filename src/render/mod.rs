use std::path::Path;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::plan::{Credit, CreditLine, Entry, RenderPlan};
use crate::store::{PullRef, User};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to write release notes: {0}")]
    FileWrite(#[from] std::io::Error),
}

/// Write the release notes to stdout (default) or to a markdown file.
#[instrument(skip(plan), fields(title = %plan.title))]
pub fn output(plan: &RenderPlan, output_path: Option<&Path>) -> Result<(), RenderError> {
    let md = markdown(plan);
    match output_path {
        None => {
            debug!("writing release notes to stdout");
            print!("{}", md);
            Ok(())
        }
        Some(path) => {
            debug!(path = %path.display(), "writing release notes to file");
            std::fs::write(path, md)?;
            Ok(())
        }
    }
}

/// Render the plan as markdown:
///
/// # Transmission 4.0.0
///
/// ## Highlights
/// * Core: Added magnet support. ([#1](...))
///
/// ## Core
/// * Fixed crash on startup. ([#102](...), [#103](...))
///
/// ## Thank you
/// ### Contributions to `Core`:
/// * [@alice (Alice)](...):
///   * Code review for [#105](...)
///   * Added foo. ([#104](...))
pub fn markdown(plan: &RenderPlan) -> String {
    let mut md = String::new();
    md.push_str(&format!("# {}\n\n", plan.title));

    if !plan.highlights.is_empty() {
        md.push_str("## Highlights\n\n");
        for highlight in &plan.highlights {
            match &highlight.component {
                Some(component) => {
                    md.push_str(&format!("* {}: {}\n", component, format_entry(&highlight.entry)));
                }
                None => {
                    md.push_str(&format!("* {}\n", format_entry(&highlight.entry)));
                }
            }
        }
        md.push('\n');
    }

    for section in &plan.sections {
        md.push_str(&format!("## {}\n\n", section.component));
        for entry in &section.entries {
            md.push_str(&format!("* {}\n", format_entry(entry)));
        }
        md.push('\n');
    }

    if !plan.thanks.is_empty() {
        md.push_str("## Thank you\n\n");
        md.push_str(
            "Last but certainly not least, a big ***Thank You*** to these contributors:\n\n",
        );
        for section in &plan.thanks {
            md.push_str(&format!("### Contributions to `{}`:\n\n", section.component));
            for credit in &section.credits {
                write_credit(&mut md, credit);
            }
            md.push('\n');
        }
    }

    md
}

fn write_credit(md: &mut String, credit: &Credit) {
    let user = format_user(&credit.user);
    match credit.lines.as_slice() {
        [line] => {
            md.push_str(&format!("* {}: {}\n", user, format_line(line)));
        }
        lines => {
            md.push_str(&format!("* {}:\n", user));
            for line in lines {
                md.push_str(&format!("  * {}\n", format_line(line)));
            }
        }
    }
}

fn format_line(line: &CreditLine) -> String {
    match line {
        CreditLine::CodeReview(pulls) => format!("Code review for {}", format_refs(pulls)),
        CreditLine::Authored { note, pulls } => format_note(note, pulls),
    }
}

fn format_entry(entry: &Entry) -> String {
    format_note(&entry.note, &entry.pulls)
}

fn format_note(note: &str, pulls: &[PullRef]) -> String {
    format!("{} ({})", note, format_refs(pulls))
}

fn format_refs(pulls: &[PullRef]) -> String {
    pulls
        .iter()
        .map(|p| format!("[#{}]({})", p.number, p.html_url))
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_user(user: &User) -> String {
    match &user.display_name {
        Some(name) => format!("[@{} ({})]({})", user.login, name, user.html_url),
        None => format!("[@{}]({})", user.login, user.html_url),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{CreditSection, Highlight, Section};
    use tempfile::TempDir;

    fn pref(number: u64) -> PullRef {
        PullRef {
            number,
            html_url: format!("https://github.com/org/repo/pull/{}", number),
        }
    }

    fn sample_plan() -> RenderPlan {
        RenderPlan {
            title: "Transmission 4.0.0".to_string(),
            highlights: vec![
                Highlight {
                    component: Some("Core".to_string()),
                    entry: Entry {
                        note: "Added magnet support.".to_string(),
                        pulls: vec![pref(1)],
                        rank: Some(7),
                    },
                },
                Highlight {
                    component: None,
                    entry: Entry {
                        note: "Added dark mode.".to_string(),
                        pulls: vec![pref(2)],
                        rank: Some(7),
                    },
                },
            ],
            sections: vec![Section {
                component: "Core".to_string(),
                entries: vec![Entry {
                    note: "Fixed crash on startup.".to_string(),
                    pulls: vec![pref(102), pref(103)],
                    rank: None,
                }],
            }],
            thanks: vec![CreditSection {
                component: "Core".to_string(),
                credits: vec![
                    Credit {
                        user: User {
                            login: "alice".to_string(),
                            display_name: Some("Alice".to_string()),
                            html_url: "https://github.com/alice".to_string(),
                        },
                        lines: vec![
                            CreditLine::CodeReview(vec![pref(105)]),
                            CreditLine::Authored {
                                note: "Added foo.".to_string(),
                                pulls: vec![pref(104)],
                            },
                        ],
                    },
                    Credit {
                        user: User {
                            login: "bob".to_string(),
                            display_name: None,
                            html_url: "https://github.com/bob".to_string(),
                        },
                        lines: vec![CreditLine::Authored {
                            note: "Fixed bar.".to_string(),
                            pulls: vec![pref(105)],
                        }],
                    },
                ],
            }],
        }
    }

    #[test]
    fn test_markdown_layout() {
        let md = markdown(&sample_plan());
        assert!(md.starts_with("# Transmission 4.0.0\n\n## Highlights\n\n"));
        assert!(md.contains(
            "* Core: Added magnet support. ([#1](https://github.com/org/repo/pull/1))\n"
        ));
        assert!(md.contains("* Added dark mode. ([#2](https://github.com/org/repo/pull/2))\n"));
        assert!(md.contains(
            "* Fixed crash on startup. \
             ([#102](https://github.com/org/repo/pull/102), \
             [#103](https://github.com/org/repo/pull/103))\n"
        ));
        assert!(md.contains("## Thank you\n"));
        assert!(md.contains("### Contributions to `Core`:\n"));
    }

    #[test]
    fn test_credit_layout() {
        let md = markdown(&sample_plan());
        assert!(md.contains(
            "* [@alice (Alice)](https://github.com/alice):\n\
             \x20 * Code review for [#105](https://github.com/org/repo/pull/105)\n\
             \x20 * Added foo. ([#104](https://github.com/org/repo/pull/104))\n"
        ));
        assert!(md.contains(
            "* [@bob](https://github.com/bob): \
             Fixed bar. ([#105](https://github.com/org/repo/pull/105))\n"
        ));
    }

    #[test]
    fn test_empty_plan_has_only_title() {
        let plan = RenderPlan {
            title: "Transmission 4.0.0".to_string(),
            highlights: vec![],
            sections: vec![],
            thanks: vec![],
        };
        assert_eq!(markdown(&plan), "# Transmission 4.0.0\n\n");
    }

    #[test]
    fn test_output_to_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("notes.md");
        output(&sample_plan(), Some(&path)).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, markdown(&sample_plan()));
    }

    #[test]
    fn test_output_to_missing_dir_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing").join("notes.md");
        assert!(matches!(
            output(&sample_plan(), Some(&path)),
            Err(RenderError::FileWrite(_))
        ));
    }
}
