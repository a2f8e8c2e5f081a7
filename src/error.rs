use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("Invalid timezone: {input}")]
    InvalidTimezone { input: String },

    #[error("Unsupported locale: {input}")]
    UnsupportedLocale { input: String },

    #[error("Invalid quota limit: {input} (expected a positive number of messages)")]
    InvalidQuota { input: u64 },

    #[error("Failed to write {}: {source}", path.display())]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode aggregates as JSON: {0}")]
    Json(#[from] serde_json::Error),
}
