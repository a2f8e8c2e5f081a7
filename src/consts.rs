/// Standard date format used throughout the codebase: "2025-01-15"
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// Number of leading characters of a date key that form its "YYYY-MM" month key
pub(crate) const MONTH_KEY_LEN: usize = 7;

/// Lines longer than this are discarded instead of buffered
pub(crate) const MAX_LINE_BYTES: usize = 10 * 1024 * 1024;

/// How many days the busiest-days ranking keeps
pub(crate) const TOP_DAYS_LIMIT: usize = 10;

/// Monthly message quota the report compares usage against
pub(crate) const DEFAULT_QUOTA_LIMIT: u64 = 1500;

pub(crate) const DEFAULT_CODEX_DIR: &str = ".codex";
pub(crate) const CODEX_HOME_ENV: &str = "CODEX_HOME";
pub(crate) const HISTORY_FILE: &str = "history.jsonl";
pub(crate) const SESSION_SUBDIR: &str = "sessions";
pub(crate) const OUTPUT_FILE: &str = "usage-statistics.md";
