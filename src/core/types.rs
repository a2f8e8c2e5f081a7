//! Core data types shared by the aggregators, the statistics calculator and
//! the renderers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::consts::MONTH_KEY_LEN;

/// One prompt recorded in the history log.
///
/// Only `ts` drives aggregation; `session_id` and `text` may be absent or null.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct HistoryEvent {
    #[serde(default)]
    pub(crate) session_id: Option<String>,
    /// Epoch seconds; missing or non-positive means "undated"
    #[serde(rename = "ts", default)]
    pub(crate) timestamp: Option<i64>,
    #[serde(default)]
    pub(crate) text: Option<String>,
}

impl HistoryEvent {
    pub(crate) fn dated_timestamp(&self) -> Option<i64> {
        self.timestamp.filter(|ts| *ts > 0)
    }
}

/// A decoded session transcript line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SessionEvent {
    /// `event_msg` / `token_count`; `None` when the event carried no usage info
    TokenCount(Option<TokenUsage>),
    Other,
}

/// Cumulative token usage snapshot reported by a Codex session.
///
/// Each `token_count` event carries the running total for the session so
/// far, not the usage of the latest turn.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct TokenUsage {
    pub(crate) input_tokens: u64,
    #[serde(alias = "cache_read_input_tokens")]
    pub(crate) cached_input_tokens: u64,
    pub(crate) output_tokens: u64,
    pub(crate) reasoning_output_tokens: u64,
    pub(crate) total_tokens: u64,
}

impl TokenUsage {
    /// Field-wise sum, clamped at `u64::MAX`
    pub(crate) fn add(&mut self, other: &TokenUsage) {
        self.input_tokens = self.input_tokens.saturating_add(other.input_tokens);
        self.cached_input_tokens = self
            .cached_input_tokens
            .saturating_add(other.cached_input_tokens);
        self.output_tokens = self.output_tokens.saturating_add(other.output_tokens);
        self.reasoning_output_tokens = self
            .reasoning_output_tokens
            .saturating_add(other.reasoning_output_tokens);
        self.total_tokens = self.total_tokens.saturating_add(other.total_tokens);
    }
}

/// Token totals and session count for one "YYYY-MM" month
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) struct MonthlyTokens {
    #[serde(flatten)]
    pub(crate) usage: TokenUsage,
    pub(crate) session_count: u64,
}

impl MonthlyTokens {
    pub(crate) fn add_session(&mut self, snapshot: &TokenUsage) {
        self.usage.add(snapshot);
        self.session_count = self.session_count.saturating_add(1);
    }
}

/// Month key → token totals, iterated in ascending month order
pub(crate) type MonthlyTokenTotals = BTreeMap<String, MonthlyTokens>;

/// Sum of every month's usage and session count
pub(crate) fn grand_total(monthly: &MonthlyTokenTotals) -> MonthlyTokens {
    let mut total = MonthlyTokens::default();
    for month in monthly.values() {
        total.usage.add(&month.usage);
        total.session_count = total.session_count.saturating_add(month.session_count);
    }
    total
}

/// Message count per calendar date ("YYYY-MM-DD").
///
/// Keys appear on first occurrence and counts only ever grow.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub(crate) struct DailyCounts(BTreeMap<String, u64>);

impl DailyCounts {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, date: String) {
        *self.0.entry(date).or_insert(0) += 1;
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of distinct active dates
    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }

    pub(crate) fn total(&self) -> u64 {
        self.0.values().fold(0u64, |acc, n| acc.saturating_add(*n))
    }

    #[cfg(test)]
    pub(crate) fn get(&self, date: &str) -> Option<u64> {
        self.0.get(date).copied()
    }

    /// Dates in ascending order with their counts
    pub(crate) fn iter(&self) -> impl DoubleEndedIterator<Item = (&str, u64)> {
        self.0.iter().map(|(date, count)| (date.as_str(), *count))
    }
}

impl FromIterator<(String, u64)> for DailyCounts {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        let mut counts = DailyCounts::new();
        for (date, count) in iter {
            let total = counts.0.entry(date).or_insert(0);
            *total = total.saturating_add(count);
        }
        counts
    }
}

/// "YYYY-MM" prefix of a "YYYY-MM-DD" key
pub(crate) fn month_key(date: &str) -> &str {
    date.get(..MONTH_KEY_LEN).unwrap_or(date)
}

/// A date and its message count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct DayCount {
    pub(crate) date: String,
    pub(crate) count: u64,
}

/// A month key and its message count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct MonthCount {
    pub(crate) month: String,
    pub(crate) count: u64,
}

/// Summary derived once from [`DailyCounts`]
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub(crate) struct Statistics {
    pub(crate) total_messages: u64,
    pub(crate) active_days: usize,
    /// First and last active date
    pub(crate) date_range: Option<(String, String)>,
    pub(crate) monthly_messages: BTreeMap<String, u64>,
    pub(crate) top_days: Vec<DayCount>,
    pub(crate) peak_day: Option<DayCount>,
    pub(crate) peak_month: Option<MonthCount>,
    pub(crate) avg_per_day: f64,
    pub(crate) daily_counts: DailyCounts,
}

impl Statistics {
    /// True when there was no dated history at all
    pub(crate) fn is_empty(&self) -> bool {
        self.active_days == 0
    }

    /// Average messages per month that had any activity
    pub(crate) fn avg_per_month(&self) -> f64 {
        if self.monthly_messages.is_empty() {
            return 0.0;
        }
        self.total_messages as f64 / self.monthly_messages.len() as f64
    }
}

/// Everything the pipeline hands to a renderer
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct Aggregates {
    pub(crate) statistics: Statistics,
    pub(crate) monthly_tokens: MonthlyTokenTotals,
}

impl Aggregates {
    /// Session files counted for a month, zero when none were found
    pub(crate) fn sessions_in(&self, month: &str) -> u64 {
        self.monthly_tokens
            .get(month)
            .map_or(0, |m| m.session_count)
    }
}
