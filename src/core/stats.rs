//! Summary, ranking and peak statistics over daily message counts

use std::collections::BTreeMap;

use crate::consts::TOP_DAYS_LIMIT;
use crate::core::types::{DailyCounts, DayCount, MonthCount, Statistics, month_key};

/// Rank days busiest first; equal counts keep ascending date order.
pub(crate) fn rank_days(daily: &DailyCounts) -> Vec<DayCount> {
    let mut days: Vec<DayCount> = daily
        .iter()
        .map(|(date, count)| DayCount {
            date: date.to_string(),
            count,
        })
        .collect();
    // Stable sort over ascending dates gives the date tie-break for free
    days.sort_by(|a, b| b.count.cmp(&a.count));
    days
}

pub(crate) fn monthly_messages(daily: &DailyCounts) -> BTreeMap<String, u64> {
    let mut monthly: BTreeMap<String, u64> = BTreeMap::new();
    for (date, count) in daily.iter() {
        let total = monthly.entry(month_key(date).to_string()).or_insert(0);
        *total = total.saturating_add(count);
    }
    monthly
}

/// Busiest month; ties go to the earliest month.
fn peak_month(monthly: &BTreeMap<String, u64>) -> Option<MonthCount> {
    let mut peak: Option<MonthCount> = None;
    for (month, &count) in monthly {
        if peak.as_ref().is_none_or(|p| count > p.count) {
            peak = Some(MonthCount {
                month: month.clone(),
                count,
            });
        }
    }
    peak
}

/// Derive [`Statistics`] from daily counts.
///
/// Empty input yields `Statistics::default()`, whose `is_empty()` tells the
/// caller there is nothing to report.
pub(crate) fn calculate_statistics(daily: DailyCounts) -> Statistics {
    if daily.is_empty() {
        return Statistics::default();
    }

    let total_messages = daily.total();
    let active_days = daily.len();

    let date_range = daily
        .iter()
        .next()
        .zip(daily.iter().next_back())
        .map(|((first, _), (last, _))| (first.to_string(), last.to_string()));

    let monthly_messages = monthly_messages(&daily);
    let ranked = rank_days(&daily);
    let peak_day = ranked.first().cloned();
    let top_days = ranked.into_iter().take(TOP_DAYS_LIMIT).collect();
    let peak_month = peak_month(&monthly_messages);

    Statistics {
        total_messages,
        active_days,
        date_range,
        monthly_messages,
        top_days,
        peak_day,
        peak_month,
        avg_per_day: total_messages as f64 / active_days as f64,
        daily_counts: daily,
    }
}
