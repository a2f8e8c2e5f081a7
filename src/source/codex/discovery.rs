//! Session file discovery under `sessions/YYYY/MM/DD/*.jsonl`

use std::path::{Path, PathBuf};

use crate::utils::parse_debug_enabled;

/// A session transcript and the month its directory belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SessionFile {
    /// "YYYY-MM" built from the year and month directory names
    pub(crate) month_key: String,
    pub(crate) path: PathBuf,
}

/// Month key from `<root>/<year>/<month>/<day>/<file>`
fn month_key_for(path: &Path) -> Option<String> {
    let day_dir = path.parent()?;
    let month_dir = day_dir.parent()?;
    let year_dir = month_dir.parent()?;
    let month = month_dir.file_name()?.to_str()?;
    let year = year_dir.file_name()?.to_str()?;
    Some(format!("{year}-{month}"))
}

/// List every `*.jsonl` file exactly three directory levels below
/// `sessions_dir`, sorted by path.
///
/// A missing root, or missing branches below it, simply contribute nothing.
pub(crate) fn find_session_files(sessions_dir: &Path) -> Vec<SessionFile> {
    if !sessions_dir.is_dir() {
        return Vec::new();
    }

    let root = glob::Pattern::escape(&sessions_dir.to_string_lossy());
    let pattern = format!("{root}/*/*/*/*.jsonl");

    let entries = match glob::glob(&pattern) {
        Ok(entries) => entries,
        Err(err) => {
            if parse_debug_enabled() {
                eprintln!("Invalid session pattern {pattern}: {err}");
            }
            return Vec::new();
        }
    };

    let mut files: Vec<SessionFile> = entries
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(err) => {
                if parse_debug_enabled() {
                    eprintln!("Failed to read {}: {}", err.path().display(), err.error());
                }
                None
            }
        })
        .filter(|path| path.is_file())
        .filter_map(|path| {
            let month_key = month_key_for(&path)?;
            Some(SessionFile { month_key, path })
        })
        .collect();

    files.sort_by(|a, b| a.path.cmp(&b.path));
    files
}
