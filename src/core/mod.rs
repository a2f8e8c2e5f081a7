//! Core module - event types, aggregation folds and statistics

mod aggregator;
mod stats;
mod types;

pub(crate) use aggregator::{count_daily, fold_sessions, last_snapshot};
pub(crate) use stats::calculate_statistics;
pub(crate) use types::{
    Aggregates, DailyCounts, DayCount, HistoryEvent, MonthlyTokenTotals, MonthlyTokens,
    SessionEvent, Statistics, TokenUsage, grand_total, month_key,
};
