use serde::Serialize;

use crate::core::{Aggregates, MonthlyTokenTotals, MonthlyTokens, Statistics, grand_total};

#[derive(Serialize)]
struct JsonReport<'a> {
    statistics: &'a Statistics,
    monthly_tokens: &'a MonthlyTokenTotals,
    totals: MonthlyTokens,
}

/// Aggregates as pretty-printed JSON.
///
/// Maps are ordered, so unchanged input always produces identical bytes.
pub(crate) fn output_aggregates_json(aggregates: &Aggregates) -> Result<String, serde_json::Error> {
    let report = JsonReport {
        statistics: &aggregates.statistics,
        monthly_tokens: &aggregates.monthly_tokens,
        totals: grand_total(&aggregates.monthly_tokens),
    };
    serde_json::to_string_pretty(&report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DailyCounts, TokenUsage, calculate_statistics, fold_sessions};
    use serde_json::Value;

    fn sample() -> Aggregates {
        let daily: DailyCounts = [("2024-01-01".to_string(), 4), ("2024-01-02".to_string(), 6)]
            .into_iter()
            .collect();
        Aggregates {
            statistics: calculate_statistics(daily),
            monthly_tokens: fold_sessions(vec![(
                "2024-01".to_string(),
                TokenUsage {
                    input_tokens: 30,
                    total_tokens: 40,
                    ..Default::default()
                },
            )]),
        }
    }

    #[test]
    fn json_contains_statistics_and_tokens() {
        let json: Value = serde_json::from_str(&output_aggregates_json(&sample()).unwrap()).unwrap();
        assert_eq!(json["statistics"]["total_messages"].as_u64(), Some(10));
        assert_eq!(json["statistics"]["avg_per_day"].as_f64(), Some(5.0));
        assert_eq!(json["statistics"]["daily_counts"]["2024-01-02"].as_u64(), Some(6));
        assert_eq!(json["statistics"]["top_days"][0]["date"].as_str(), Some("2024-01-02"));
        assert_eq!(json["monthly_tokens"]["2024-01"]["total_tokens"].as_u64(), Some(40));
        assert_eq!(json["monthly_tokens"]["2024-01"]["session_count"].as_u64(), Some(1));
        assert_eq!(json["totals"]["input_tokens"].as_u64(), Some(30));
    }

    #[test]
    fn json_output_is_stable() {
        let a = output_aggregates_json(&sample()).unwrap();
        let b = output_aggregates_json(&sample()).unwrap();
        assert_eq!(a, b);
    }
}
