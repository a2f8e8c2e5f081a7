//! Codex prompt history (`history.jsonl`)

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::core::{DailyCounts, HistoryEvent, count_daily};
use crate::source::decoder::JsonlRecords;
use crate::utils::{Timezone, parse_debug_enabled};

/// Messages per date in the history log.
///
/// A missing or unreadable log is an empty history, not an error.
pub(crate) fn load_daily_counts(path: &Path, timezone: Timezone) -> DailyCounts {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(err) => {
            if parse_debug_enabled() {
                eprintln!("Failed to open {}: {}", path.display(), err);
            }
            return DailyCounts::new();
        }
    };

    let mut records: JsonlRecords<'_, _, HistoryEvent> =
        JsonlRecords::new(BufReader::new(file), path);
    let counts = count_daily(records.by_ref(), timezone);

    if parse_debug_enabled() && records.skipped() > 0 {
        eprintln!(
            "[DEBUG] Skipped {} unreadable lines in {}",
            records.skipped(),
            path.display()
        );
    }

    counts
}
