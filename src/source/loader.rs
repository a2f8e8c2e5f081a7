//! Loaders that turn the Codex home directory into aggregates

use std::path::Path;
use std::time::Instant;

use crate::core::{DailyCounts, MonthlyTokenTotals, fold_sessions};
use crate::source::codex::{SessionFile, read_session_snapshot};
use crate::source::history::load_daily_counts;
use crate::utils::{Timezone, parse_debug_enabled};

/// Per-date message counts from the history log
pub(crate) fn load_history(path: &Path, timezone: Timezone) -> DailyCounts {
    let start = Instant::now();
    let counts = load_daily_counts(path, timezone);
    if parse_debug_enabled() {
        eprintln!(
            "[DEBUG] Parsed {} in {:.2}ms ({} days)",
            path.display(),
            start.elapsed().as_secs_f64() * 1000.0,
            counts.len()
        );
    }
    counts
}

/// Fold the last token snapshot of every session file into monthly totals.
///
/// Files are read one at a time and their snapshot dropped once folded in.
pub(crate) fn load_session_tokens(files: &[SessionFile]) -> MonthlyTokenTotals {
    let start = Instant::now();
    let monthly = fold_sessions(
        files
            .iter()
            .map(|file| (file.month_key.clone(), read_session_snapshot(&file.path))),
    );
    if parse_debug_enabled() {
        eprintln!(
            "[DEBUG] Parsed {} session files in {:.2}ms ({} months)",
            files.len(),
            start.elapsed().as_secs_f64() * 1000.0,
            monthly.len()
        );
    }
    monthly
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::codex::find_session_files;
    use std::fs;
    use tempfile::TempDir;

    fn token_line(total: u64) -> String {
        format!(
            r#"{{"type":"event_msg","payload":{{"type":"token_count","info":{{"total_token_usage":{{"input_tokens":{total},"total_tokens":{total}}}}}}}}}"#
        )
    }

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn session_tokens_per_month() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("sessions");
        write(
            &root.join("2025/01/10/a.jsonl"),
            &[token_line(10), token_line(25), token_line(40)].join("\n"),
        );
        write(&root.join("2025/01/11/b.jsonl"), &token_line(60));
        write(&root.join("2025/02/01/c.jsonl"), r#"{"type":"session_meta"}"#);

        let files = find_session_files(&root);
        let monthly = load_session_tokens(&files);

        assert_eq!(monthly["2025-01"].usage.total_tokens, 100);
        assert_eq!(monthly["2025-01"].usage.input_tokens, 100);
        assert_eq!(monthly["2025-01"].session_count, 2);
        assert_eq!(monthly["2025-02"].usage.total_tokens, 0);
        assert_eq!(monthly["2025-02"].session_count, 1);
    }

    #[test]
    fn no_session_files_is_empty() {
        assert!(load_session_tokens(&[]).is_empty());
    }
}
