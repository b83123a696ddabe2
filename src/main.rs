mod config;
mod notes;
mod plan;
mod render;
mod store;

use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info, info_span};
use tracing_subscriber::EnvFilter;

use crate::store::{CacheStore, RecordStore};

/// Release Notes: builds a markdown release-notes document and contributor
/// credits from a directory of cached GitHub pull request data.
#[derive(Parser, Debug)]
#[command(name = "release-notes", version, about)]
struct Cli {
    /// Version being released (e.g., 4.0.0)
    #[arg(value_name = "VERSION")]
    release: String,

    /// Directory holding the cached pull request, comment, review and user records
    #[arg(long, env = "NOTES_CACHE_PATH", default_value = ".cache")]
    cache_dir: PathBuf,

    /// Configuration file (defaults to .release-notes.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Optional output file path for the markdown document
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {}", "error:".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let version = cli.release.trim();
    if version.is_empty() {
        return Err("a release version is required, e.g. `release-notes 4.0.0`".into());
    }

    let _main_span = info_span!("release_notes", version = %version).entered();

    info!("loading configuration");
    let config = config::Config::load(cli.config.as_deref())?;
    debug!(components = config.components.len(), "loaded configuration");

    info!(cache_dir = %cli.cache_dir.display(), "loading cached records");
    let store = CacheStore::open(&cli.cache_dir)?;
    info!(pulls = store.pull_requests().len(), "loaded pull requests");

    let plan = plan::build(&store, &config, version);
    render::output(&plan, cli.output.as_deref())?;
    info!(
        sections = plan.sections.len(),
        highlights = plan.highlights.len(),
        "done"
    );

    Ok(())
}
