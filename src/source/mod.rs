//! Data sources inside the Codex home directory
//!
//! `history.jsonl` feeds the daily message counts and the `sessions/` tree
//! feeds the monthly token totals. Both share the tolerant JSONL decoder.

pub(crate) mod codex;
pub(crate) mod decoder;
pub(crate) mod history;
pub(crate) mod loader;

pub(crate) use codex::find_session_files;
pub(crate) use loader::{load_history, load_session_tokens};
