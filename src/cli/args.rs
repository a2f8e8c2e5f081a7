//! CLI argument definitions
//!
//! Global CLI options and configuration merging logic.

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::Config;

#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq)]
pub(crate) enum ColorMode {
    /// Auto-detect based on terminal (default)
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

#[derive(Parser)]
#[command(name = "codexstats")]
#[command(
    about = "Usage statistics report for the OpenAI Codex CLI",
    long_about = "Reads ~/.codex/history.jsonl and ~/.codex/sessions/ and writes a markdown \
                  report with daily, monthly and token usage statistics.",
    version
)]
pub(crate) struct Cli {
    /// Codex home directory (default: $CODEX_HOME or ~/.codex)
    #[arg(long, value_name = "DIR")]
    pub(crate) codex_home: Option<PathBuf>,

    /// Report file to write (default: <codex home>/usage-statistics.md)
    #[arg(short, long, value_name = "FILE")]
    pub(crate) output: Option<PathBuf>,

    /// Monthly message quota to compare usage against (default: 1500)
    #[arg(long, value_name = "MESSAGES")]
    pub(crate) quota: Option<u64>,

    /// Timezone for date bucketing (e.g., "UTC", "America/New_York"; default: local)
    #[arg(long, value_name = "TZ")]
    pub(crate) timezone: Option<String>,

    /// Locale for number formatting (e.g., "en", "de", "fr")
    #[arg(long, value_name = "LOCALE")]
    pub(crate) locale: Option<String>,

    /// Print aggregates as JSON instead of writing the report
    #[arg(short, long)]
    pub(crate) json: bool,

    /// Also print a monthly summary table
    #[arg(short, long)]
    pub(crate) summary: bool,

    /// Color output mode for the summary table
    #[arg(long, value_enum, default_value = "auto")]
    pub(crate) color: ColorMode,

    /// Disable colored output (shorthand for --color=never)
    #[arg(long)]
    pub(crate) no_color: bool,

    /// Suppress progress messages
    #[arg(short, long)]
    pub(crate) quiet: bool,

    /// Report skipped lines and unreadable files on stderr
    #[arg(long)]
    pub(crate) debug: bool,
}

impl Cli {
    /// Merge config file values into CLI (CLI args take precedence)
    pub(crate) fn with_config(mut self, config: &Config) -> Self {
        // For boolean flags, config only applies if CLI is false (default)
        if !self.debug && config.debug {
            self.debug = true;
        }
        if !self.quiet && config.quiet {
            self.quiet = true;
        }

        // Options: only apply if CLI didn't set them
        if self.codex_home.is_none() {
            self.codex_home = config.codex_home.clone();
        }
        if self.output.is_none() {
            self.output = config.output.clone();
        }
        if self.quota.is_none() {
            self.quota = config.quota_limit;
        }
        if self.timezone.is_none() {
            self.timezone = config.timezone.clone();
        }
        if self.locale.is_none() {
            self.locale = config.locale.clone();
        }

        self
    }

    pub(crate) fn use_color(&self) -> bool {
        if self.no_color {
            return false;
        }
        match self.color {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => std::io::stdout().is_terminal(),
        }
    }
}
