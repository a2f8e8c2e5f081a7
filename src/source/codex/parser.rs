//! OpenAI Codex CLI session transcript parser
//!
//! Session files carry periodic `token_count` events whose
//! `total_token_usage` is the session's running total. Only the last one per
//! file matters.

use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::core::{SessionEvent, TokenUsage, last_snapshot};
use crate::source::decoder::JsonlRecords;
use crate::utils::parse_debug_enabled;

const EVENT_MSG: &str = "event_msg";
const TOKEN_COUNT: &str = "token_count";

// ============================================================================
// Internal types for JSONL parsing
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawJsonEntry {
    #[serde(rename = "type")]
    entry_type: Option<String>,
    payload: Option<Payload>,
}

#[derive(Debug, Deserialize)]
struct Payload {
    #[serde(rename = "type")]
    payload_type: Option<String>,
    info: Option<TokenInfo>,
}

#[derive(Debug, Deserialize)]
struct TokenInfo {
    total_token_usage: Option<TokenUsage>,
}

impl From<RawJsonEntry> for SessionEvent {
    fn from(raw: RawJsonEntry) -> Self {
        if raw.entry_type.as_deref() != Some(EVENT_MSG) {
            return SessionEvent::Other;
        }
        let Some(payload) = raw.payload else {
            return SessionEvent::Other;
        };
        if payload.payload_type.as_deref() != Some(TOKEN_COUNT) {
            return SessionEvent::Other;
        }
        SessionEvent::TokenCount(payload.info.and_then(|info| info.total_token_usage))
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Final cumulative token snapshot of one session file.
///
/// Missing or unreadable files contribute a zero snapshot.
pub(crate) fn read_session_snapshot(path: &Path) -> TokenUsage {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(err) => {
            if parse_debug_enabled() {
                eprintln!("Failed to open {}: {}", path.display(), err);
            }
            return TokenUsage::default();
        }
    };

    let mut records: JsonlRecords<'_, _, RawJsonEntry> =
        JsonlRecords::new(BufReader::new(file), path);
    let snapshot = last_snapshot(records.by_ref().map(SessionEvent::from));

    if parse_debug_enabled() && records.skipped() > 0 {
        eprintln!(
            "[DEBUG] Skipped {} unreadable lines in {}",
            records.skipped(),
            path.display()
        );
    }

    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::decoder::decode_line;
    use std::fs;
    use tempfile::TempDir;

    fn token_line(total: u64) -> String {
        format!(
            r#"{{"timestamp":"2026-02-06T10:00:00Z","type":"event_msg","payload":{{"type":"token_count","info":{{"total_token_usage":{{"input_tokens":{},"cached_input_tokens":{},"output_tokens":{},"reasoning_output_tokens":{},"total_tokens":{}}},"last_token_usage":{{"total_tokens":1}}}}}}}}"#,
            total / 2,
            total / 10,
            total / 2,
            total / 20,
            total
        )
    }

    fn event(line: &str) -> Option<SessionEvent> {
        decode_line::<RawJsonEntry>(line.as_bytes()).map(SessionEvent::from)
    }

    #[test]
    fn token_count_event_decodes_snapshot() {
        let ev = event(&token_line(100)).unwrap();
        let SessionEvent::TokenCount(Some(usage)) = ev else {
            panic!("expected token count, got {ev:?}");
        };
        assert_eq!(usage.total_tokens, 100);
        assert_eq!(usage.input_tokens, 50);
        assert_eq!(usage.cached_input_tokens, 10);
        assert_eq!(usage.reasoning_output_tokens, 5);
    }

    #[test]
    fn token_count_with_null_info_has_no_snapshot() {
        let ev = event(r#"{"type":"event_msg","payload":{"type":"token_count","info":null}}"#);
        assert_eq!(ev, Some(SessionEvent::TokenCount(None)));
    }

    #[test]
    fn other_events_are_ignored() {
        assert_eq!(
            event(r#"{"type":"turn_context","payload":{"model":"gpt-5"}}"#),
            Some(SessionEvent::Other)
        );
        assert_eq!(
            event(r#"{"type":"event_msg","payload":{"type":"agent_message","message":"hi"}}"#),
            Some(SessionEvent::Other)
        );
        assert_eq!(event(r#"{"type":"event_msg"}"#), Some(SessionEvent::Other));
        assert_eq!(event(r#"{"payload":{"type":"token_count"}}"#), Some(SessionEvent::Other));
    }

    #[test]
    fn snapshot_is_last_not_sum() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rollout.jsonl");
        let content = [
            r#"{"type":"session_meta","payload":{"id":"abc"}}"#.to_string(),
            token_line(10),
            "{broken".to_string(),
            token_line(25),
            r#"{"type":"event_msg","payload":{"type":"token_count","info":null}}"#.to_string(),
            token_line(40),
        ]
        .join("\n");
        fs::write(&path, content).unwrap();

        assert_eq!(read_session_snapshot(&path).total_tokens, 40);
    }

    #[test]
    fn session_without_token_count_is_zero() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rollout.jsonl");
        fs::write(&path, r#"{"type":"session_meta","payload":{"id":"abc"}}"#).unwrap();
        assert_eq!(read_session_snapshot(&path), TokenUsage::default());
    }

    #[test]
    fn missing_session_file_is_zero() {
        let dir = TempDir::new().unwrap();
        assert_eq!(
            read_session_snapshot(&dir.path().join("gone.jsonl")),
            TokenUsage::default()
        );
    }
}
