use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::consts::{
    CODEX_HOME_ENV, DEFAULT_CODEX_DIR, DEFAULT_QUOTA_LIMIT, HISTORY_FILE, OUTPUT_FILE,
    SESSION_SUBDIR,
};
use crate::error::AppError;
use crate::output::NumberFormat;
use crate::utils::Timezone;

/// Values read from the optional TOML config file
#[derive(Debug, Default, Deserialize)]
pub(crate) struct Config {
    #[serde(default)]
    pub(crate) codex_home: Option<PathBuf>,
    #[serde(default)]
    pub(crate) output: Option<PathBuf>,
    #[serde(default)]
    pub(crate) quota_limit: Option<u64>,
    #[serde(default)]
    pub(crate) timezone: Option<String>,
    #[serde(default)]
    pub(crate) locale: Option<String>,
    #[serde(default)]
    pub(crate) debug: bool,
    #[serde(default)]
    pub(crate) quiet: bool,
}

impl Config {
    pub(crate) fn load() -> Self {
        Self::load_internal(false)
    }

    pub(crate) fn load_quiet() -> Self {
        Self::load_internal(true)
    }

    fn load_internal(quiet: bool) -> Self {
        // Try config locations in order of priority
        for path in Self::get_config_paths() {
            if path.exists()
                && let Ok(content) = fs::read_to_string(&path)
            {
                match toml::from_str::<Config>(&content) {
                    Ok(config) => {
                        if !quiet {
                            eprintln!("Loaded config from {}", path.display());
                        }
                        return config;
                    }
                    Err(e) => {
                        if !quiet {
                            eprintln!("Warning: Failed to parse {}: {}", path.display(), e);
                        }
                    }
                }
            }
        }

        Self::default()
    }

    fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. XDG config: ~/.config/codexstats/config.toml (Linux/cross-platform)
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join("codexstats").join("config.toml"));
        }

        // 2. macOS Application Support: ~/Library/Application Support/codexstats/config.toml
        if let Some(config_dir) = dirs::config_dir() {
            let macos_path = config_dir.join("codexstats").join("config.toml");
            if !paths.contains(&macos_path) {
                paths.push(macos_path);
            }
        }

        // 3. Home directory: ~/.codexstats.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".codexstats.toml"));
        }

        paths
    }
}

/// What the run produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OutputMode {
    /// Write the markdown report to `output_file`
    Markdown,
    /// Print aggregates as JSON on stdout, write nothing
    Json,
}

/// Fully resolved settings for one pipeline run
#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub(crate) history_file: PathBuf,
    pub(crate) sessions_dir: PathBuf,
    pub(crate) output_file: PathBuf,
    pub(crate) quota_limit: u64,
    pub(crate) timezone: Timezone,
    pub(crate) number_format: NumberFormat,
    pub(crate) mode: OutputMode,
    pub(crate) summary: bool,
    pub(crate) use_color: bool,
    pub(crate) quiet: bool,
}

impl Settings {
    /// Defaults for a given Codex home directory
    pub(crate) fn for_codex_home(codex_home: &Path) -> Self {
        Settings {
            history_file: codex_home.join(HISTORY_FILE),
            sessions_dir: codex_home.join(SESSION_SUBDIR),
            output_file: codex_home.join(OUTPUT_FILE),
            quota_limit: DEFAULT_QUOTA_LIMIT,
            timezone: Timezone::Local,
            number_format: NumberFormat::default(),
            mode: OutputMode::Markdown,
            summary: false,
            use_color: false,
            quiet: false,
        }
    }

    /// Validate CLI values (already merged with the config file)
    pub(crate) fn resolve(cli: &Cli) -> Result<Self, AppError> {
        let codex_home = cli.codex_home.clone().unwrap_or_else(default_codex_home);
        let mut settings = Settings::for_codex_home(&codex_home);

        if let Some(output) = &cli.output {
            settings.output_file = output.clone();
        }
        if let Some(quota) = cli.quota {
            if quota == 0 {
                return Err(AppError::InvalidQuota { input: quota });
            }
            settings.quota_limit = quota;
        }
        settings.timezone = Timezone::parse(cli.timezone.as_deref())?;
        settings.number_format = NumberFormat::from_locale(cli.locale.as_deref())?;
        settings.summary = cli.summary;
        settings.use_color = cli.use_color();
        if cli.json {
            settings.mode = OutputMode::Json;
        }
        // JSON owns stdout, so progress lines are dropped
        settings.quiet = cli.quiet || cli.json;

        Ok(settings)
    }
}

/// `$CODEX_HOME`, else `~/.codex`
fn default_codex_home() -> PathBuf {
    if let Ok(codex_home) = env::var(CODEX_HOME_ENV)
        && !codex_home.trim().is_empty()
    {
        return PathBuf::from(codex_home);
    }
    match dirs::home_dir() {
        Some(home) => home.join(DEFAULT_CODEX_DIR),
        None => PathBuf::from(DEFAULT_CODEX_DIR),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["codexstats"];
        argv.extend_from_slice(args);
        Cli::parse_from(argv)
    }

    #[test]
    fn test_config_paths() {
        let paths = Config::get_config_paths();
        assert!(!paths.is_empty());
        assert!(paths.iter().all(|p| p.to_string_lossy().contains("codexstats")));
    }

    #[test]
    fn config_parses_all_keys() {
        let config: Config = toml::from_str(
            r#"
            codex_home = "/data/codex"
            output = "/tmp/report.md"
            quota_limit = 300
            timezone = "UTC"
            locale = "de"
            debug = true
            "#,
        )
        .unwrap();
        assert_eq!(config.codex_home, Some(PathBuf::from("/data/codex")));
        assert_eq!(config.quota_limit, Some(300));
        assert_eq!(config.timezone.as_deref(), Some("UTC"));
        assert!(config.debug);
        assert!(!config.quiet);
    }

    #[test]
    fn defaults_follow_codex_home() {
        let settings = Settings::for_codex_home(Path::new("/home/u/.codex"));
        assert_eq!(settings.history_file, Path::new("/home/u/.codex/history.jsonl"));
        assert_eq!(settings.sessions_dir, Path::new("/home/u/.codex/sessions"));
        assert_eq!(
            settings.output_file,
            Path::new("/home/u/.codex/usage-statistics.md")
        );
        assert_eq!(settings.quota_limit, 1500);
        assert_eq!(settings.timezone, Timezone::Local);
        assert_eq!(settings.mode, OutputMode::Markdown);
    }

    #[test]
    fn resolve_applies_cli_overrides() {
        let settings = Settings::resolve(&cli(&[
            "--codex-home",
            "/srv/codex",
            "--output",
            "/tmp/out.md",
            "--quota",
            "900",
            "--timezone",
            "UTC",
        ]))
        .unwrap();
        assert_eq!(settings.history_file, Path::new("/srv/codex/history.jsonl"));
        assert_eq!(settings.output_file, Path::new("/tmp/out.md"));
        assert_eq!(settings.quota_limit, 900);
        assert_eq!(settings.timezone, Timezone::Named(chrono_tz::UTC));
    }

    #[test]
    fn resolve_rejects_zero_quota() {
        let err = Settings::resolve(&cli(&["--codex-home", "/x", "--quota", "0"])).unwrap_err();
        assert!(matches!(err, AppError::InvalidQuota { input: 0 }));
    }

    #[test]
    fn resolve_rejects_bad_timezone_and_locale() {
        assert!(Settings::resolve(&cli(&["--codex-home", "/x", "--timezone", "Mars/Base"])).is_err());
        assert!(Settings::resolve(&cli(&["--codex-home", "/x", "--locale", "xx"])).is_err());
    }

    #[test]
    fn json_mode_is_quiet() {
        let settings = Settings::resolve(&cli(&["--codex-home", "/x", "--json"])).unwrap();
        assert_eq!(settings.mode, OutputMode::Json);
        assert!(settings.quiet);
    }
}
