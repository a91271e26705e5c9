use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::{ArgAction, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
pub struct KeyVal {
    pub key: String,
    pub value: String,
}

impl std::str::FromStr for KeyVal {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((key, value)) = s.split_once('=') else {
            return Err(anyhow!("--set expects key=value, got: {s}"));
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(anyhow!("--set has an empty key: {s}"));
        }
        Ok(Self {
            key: key.to_ascii_lowercase(),
            value: value.trim().to_string(),
        })
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "sprintboard",
    version,
    about = "Sprint calendar: month grid, task buckets and a per-session agenda",
    disable_help_subcommand = true
)]
pub struct GlobalCli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Config file (TOML).
    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Board snapshot (JSON) holding projects, sprints and tasks.
    #[arg(long = "store", global = true)]
    pub store: Option<PathBuf>,

    /// Project id or name; defaults to the snapshot's selection.
    #[arg(long = "project", global = true)]
    pub project: Option<String>,

    /// Sprint id or name inside the project.
    #[arg(long = "sprint", global = true)]
    pub sprint: Option<String>,

    /// Month to display first, as YYYY-MM.
    #[arg(long = "month", global = true)]
    pub month: Option<String>,

    #[arg(
        long = "set",
        value_parser = clap::builder::ValueParser::new(|s: &str| s.parse::<KeyVal>()),
        action = ArgAction::Append,
        global = true
    )]
    pub overrides: Vec<KeyVal>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Print the month once.
    Show,
    /// Interactive session with an agenda that lives until exit.
    Shell,
}

/// `-q` wins over `-v`; with neither only warnings are shown.
fn log_level(verbose: u8, quiet: u8) -> &'static str {
    match (quiet, verbose) {
        (2.., _) => "error",
        (1, _) | (0, 0) => "warn",
        (0, 1) => "info",
        (0, 2) => "debug",
        (0, _) => "trace",
    }
}

/// Logs go to stderr so `show` output stays clean on stdout. `RUST_LOG`
/// replaces the flag-derived filter entirely.
pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let level = log_level(verbose, quiet);
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(format!("warn,sprintboard_core={level}"))
            .map_err(|e| anyhow!("invalid log filter for level {level}: {e}"))?,
    };

    let stderr_is_terminal = std::io::stderr().is_terminal();
    if let Err(err) = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(stderr_is_terminal)
        .with_target(verbose >= 2)
        .try_init()
    {
        debug!(error = %err, "tracing subscriber already installed");
    }

    Ok(())
}
