//! OpenAI Codex CLI session source
//!
//! Parses JSONL transcripts from the `sessions/YYYY/MM/DD/` tree of the
//! Codex home directory.

mod discovery;
mod parser;

pub(crate) use discovery::{SessionFile, find_session_files};
pub(crate) use parser::read_session_snapshot;
