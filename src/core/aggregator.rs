//! Aggregation folds over decoded events.
//!
//! File access lives in `source`; everything here works on plain sequences
//! so each step can be tested without touching the filesystem.

use crate::consts::DATE_FORMAT;
use crate::core::types::{DailyCounts, HistoryEvent, MonthlyTokenTotals, SessionEvent, TokenUsage};
use crate::utils::Timezone;

/// Count history events per calendar date in `timezone`.
///
/// Events without a positive timestamp, or with one chrono cannot
/// represent, are skipped.
pub(crate) fn count_daily<I>(events: I, timezone: Timezone) -> DailyCounts
where
    I: IntoIterator<Item = HistoryEvent>,
{
    let mut counts = DailyCounts::new();
    for event in events {
        let Some(ts) = event.dated_timestamp() else {
            continue;
        };
        if let Some(date) = timezone.date_of(ts) {
            counts.record(date.format(DATE_FORMAT).to_string());
        }
    }
    counts
}

/// Final cumulative snapshot of one session.
///
/// Snapshots are running totals, so each one replaces the previous; summing
/// them would count early turns several times.
pub(crate) fn last_snapshot<I>(events: I) -> TokenUsage
where
    I: IntoIterator<Item = SessionEvent>,
{
    let mut last = TokenUsage::default();
    for event in events {
        if let SessionEvent::TokenCount(Some(usage)) = event {
            last = usage;
        }
    }
    last
}

/// Fold per-session snapshots into monthly totals.
///
/// Every contribution counts as one session, including zero-usage ones.
pub(crate) fn fold_sessions<I>(contributions: I) -> MonthlyTokenTotals
where
    I: IntoIterator<Item = (String, TokenUsage)>,
{
    let mut monthly = MonthlyTokenTotals::new();
    for (month, snapshot) in contributions {
        monthly.entry(month).or_default().add_session(&snapshot);
    }
    monthly
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::grand_total;

    fn utc() -> Timezone {
        Timezone::Named(chrono_tz::UTC)
    }

    fn event(ts: Option<i64>) -> HistoryEvent {
        HistoryEvent {
            session_id: Some("s".into()),
            timestamp: ts,
            text: None,
        }
    }

    fn total(n: u64) -> TokenUsage {
        TokenUsage {
            total_tokens: n,
            ..Default::default()
        }
    }

    // --- count_daily ---

    #[test]
    fn count_daily_buckets_by_date() {
        // 2024-01-01T10:00Z, 2024-01-01T23:59:59Z, 2024-01-02T00:00Z
        let events = vec![
            event(Some(1_704_103_200)),
            event(Some(1_704_153_599)),
            event(Some(1_704_153_600)),
        ];
        let counts = count_daily(events, utc());
        assert_eq!(counts.get("2024-01-01"), Some(2));
        assert_eq!(counts.get("2024-01-02"), Some(1));
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn count_daily_skips_undated_events() {
        let events = vec![
            event(None),
            event(Some(0)),
            event(Some(-5)),
            event(Some(i64::MAX)),
            event(Some(1_704_103_200)),
        ];
        let counts = count_daily(events, utc());
        assert_eq!(counts.len(), 1);
        assert_eq!(counts.total(), 1);
    }

    #[test]
    fn count_daily_total_matches_positive_timestamps() {
        let timestamps = [1_700_000_000, 0, 1_710_000_000, -1, 1_720_000_000, 1_720_000_100];
        let events: Vec<_> = timestamps.iter().map(|ts| event(Some(*ts))).collect();
        let counts = count_daily(events, utc());
        let positive = timestamps.iter().filter(|ts| **ts > 0).count() as u64;
        assert_eq!(counts.total(), positive);
    }

    #[test]
    fn count_daily_empty_input() {
        assert!(count_daily(Vec::new(), utc()).is_empty());
    }

    #[test]
    fn count_daily_respects_timezone() {
        // 2024-01-01T02:00Z is Dec 31 in New York
        let ny = Timezone::Named(chrono_tz::America::New_York);
        let counts = count_daily(vec![event(Some(1_704_074_400))], ny);
        assert_eq!(counts.get("2023-12-31"), Some(1));
    }

    // --- last_snapshot ---

    #[test]
    fn last_snapshot_keeps_final_cumulative_value() {
        let events = vec![
            SessionEvent::TokenCount(Some(total(10))),
            SessionEvent::Other,
            SessionEvent::TokenCount(Some(total(25))),
            SessionEvent::TokenCount(Some(total(40))),
            SessionEvent::Other,
        ];
        assert_eq!(last_snapshot(events).total_tokens, 40);
    }

    #[test]
    fn last_snapshot_ignores_empty_token_count() {
        let events = vec![
            SessionEvent::TokenCount(Some(total(25))),
            SessionEvent::TokenCount(None),
        ];
        assert_eq!(last_snapshot(events).total_tokens, 25);
    }

    #[test]
    fn last_snapshot_without_token_count_is_zero() {
        let events = vec![SessionEvent::Other, SessionEvent::TokenCount(None)];
        assert_eq!(last_snapshot(events), TokenUsage::default());
    }

    // --- fold_sessions ---

    #[test]
    fn fold_sessions_sums_per_month() {
        let monthly = fold_sessions(vec![
            ("2025-01".to_string(), total(40)),
            ("2025-01".to_string(), total(60)),
            ("2025-02".to_string(), total(5)),
        ]);
        assert_eq!(monthly.len(), 2);
        assert_eq!(monthly["2025-01"].usage.total_tokens, 100);
        assert_eq!(monthly["2025-01"].session_count, 2);
        assert_eq!(monthly["2025-02"].session_count, 1);
    }

    #[test]
    fn fold_sessions_counts_zero_usage_session() {
        let monthly = fold_sessions(vec![("2025-03".to_string(), TokenUsage::default())]);
        assert_eq!(monthly["2025-03"].session_count, 1);
        assert_eq!(monthly["2025-03"].usage, TokenUsage::default());
    }

    #[test]
    fn fold_sessions_is_order_independent() {
        let a = vec![
            ("2025-01".to_string(), total(1)),
            ("2025-02".to_string(), total(2)),
            ("2025-01".to_string(), total(3)),
        ];
        let mut b = a.clone();
        b.reverse();
        assert_eq!(fold_sessions(a), fold_sessions(b));
    }

    #[test]
    fn fold_sessions_saturates_huge_snapshots() {
        let monthly = fold_sessions(vec![
            ("2025-01".to_string(), total(u64::MAX)),
            ("2025-01".to_string(), total(u64::MAX)),
            ("2025-02".to_string(), total(1)),
        ]);
        assert_eq!(monthly["2025-01"].usage.total_tokens, u64::MAX);
        assert_eq!(monthly["2025-01"].session_count, 2);
        assert_eq!(grand_total(&monthly).usage.total_tokens, u64::MAX);
    }
}
