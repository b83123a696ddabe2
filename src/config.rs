use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level configuration loaded from .release-notes.toml.
///
/// All fields are optional. The defaults describe the Transmission repository,
/// so the tool works with zero config.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Title prefix for the generated document
    pub project: String,

    /// Release components in priority order. The fallback is not listed here.
    pub components: Vec<Component>,

    /// Name of the catch-all component, always classified last
    pub fallback_component: String,

    pub labels: LabelConfig,

    pub notes: NotesConfig,

    pub credits: CreditsConfig,
}

/// A named release component and the labels that select it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Component {
    pub name: String,
    #[serde(default)]
    pub labels: Vec<String>,
}

impl Component {
    pub fn new(name: &str, labels: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            labels: labels.iter().map(|l| l.to_string()).collect(),
        }
    }

    pub fn matches(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    /// Pull requests carrying this label go to the highlights section
    pub highlight: String,
    /// Documentation category, eligible for the docs summary override
    pub docs: Vec<String>,
    /// Pull requests carrying any of these are never listed or credited
    pub ignore: Vec<String>,
    /// Sort ranking, lowest priority first
    pub rank: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotesConfig {
    /// Logins whose `notes:` comments override the pull request body
    pub trusted_writers: Vec<String>,
    /// Single line used for every documentation pull request. Empty disables it.
    pub docs_summary: Option<String>,
    /// Case-insensitive values of a `notes:` paragraph meaning "do not list"
    pub no_notes_aliases: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CreditsConfig {
    /// Logins never credited (maintainers, bots)
    pub omit_logins: Vec<String>,
    /// Also omit any login ending in `[bot]`
    pub omit_bots: bool,
}

const MAINTAINERS: &[&str] = &["ckerr", "mikedld", "livings124", "Coeur"];

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project: "Transmission".to_string(),
            components: vec![
                Component::new("Core", &["scope:core", "scope:3rdparty"]),
                Component::new("macOS Client", &["scope:mac"]),
                Component::new("Qt Client", &["scope:qt"]),
                Component::new("GTK Client", &["scope:gtk"]),
                Component::new("Web Client", &["scope:web"]),
                Component::new("Daemon", &["scope:daemon"]),
                Component::new("transmission-cli", &["scope:cli"]),
                Component::new("transmission-edit", &["scope:edit"]),
                Component::new("transmission-remote", &["scope:remote"]),
                Component::new("transmission-create", &["scope:create"]),
                Component::new("transmission-show", &["scope:show"]),
                Component::new("Docs", &["scope:docs"]),
            ],
            fallback_component: "Unknown".to_string(),
            labels: LabelConfig::default(),
            notes: NotesConfig::default(),
            credits: CreditsConfig::default(),
        }
    }
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            highlight: "notes:highlight".to_string(),
            docs: strings(&["type:docs", "scope:docs"]),
            ignore: strings(&["type:refactor", "type:fixup", "notes:none"]),
            rank: strings(&[
                "type:docs",
                "type:test",
                "type:refactor",
                "type:ui",
                "type:perf",
                "type:fix",
                "type:feat",
                "notes:highlight",
            ]),
        }
    }
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            trusted_writers: strings(MAINTAINERS),
            docs_summary: None,
            no_notes_aliases: strings(&["none", "none.", "no-notes", "no-notes."]),
        }
    }
}

impl Default for CreditsConfig {
    fn default() -> Self {
        Self {
            omit_logins: strings(MAINTAINERS),
            omit_bots: true,
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, .release-notes.toml in the
    /// current directory is used if present, else the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Config, ConfigError> {
        let config = match explicit {
            Some(path) => Self::load_from(path)?,
            None => {
                let path = Path::new(".release-notes.toml");
                if path.exists() {
                    Self::load_from(path)?
                } else {
                    Config::default()
                }
            }
        };
        config.validate()?;
        Ok(config)
    }

    /// Load from a specific path (useful for testing).
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = BTreeSet::new();
        for name in self
            .components
            .iter()
            .map(|c| c.name.as_str())
            .chain(std::iter::once(self.fallback_component.as_str()))
        {
            if name.trim().is_empty() {
                return Err(ConfigError::Invalid("component name is empty".to_string()));
            }
            if !seen.insert(name) {
                return Err(ConfigError::Invalid(format!(
                    "component \"{}\" is defined more than once",
                    name
                )));
            }
        }
        Ok(())
    }

    /// The configured docs override, or None when unset or blank.
    pub fn docs_summary(&self) -> Option<&str> {
        self.notes
            .docs_summary
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn is_omitted_login(&self, login: &str) -> bool {
        (self.credits.omit_bots && login.ends_with("[bot]"))
            || self.credits.omit_logins.iter().any(|l| l == login)
    }
}
