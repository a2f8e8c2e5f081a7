use comfy_table::{Cell, Color};

use crate::core::{Aggregates, grand_total};

use super::format::{
    NumberFormat, create_styled_table, format_compact, format_month_name, format_number,
    header_cell, right_cell,
};

/// Options for the terminal summary table
#[derive(Debug, Clone, Copy)]
pub(crate) struct SummaryTableOptions {
    pub(crate) use_color: bool,
    pub(crate) number_format: NumberFormat,
}

/// Monthly messages, sessions and tokens as a terminal table
pub(crate) fn render_summary_table(aggregates: &Aggregates, options: SummaryTableOptions) -> String {
    let fmt = options.number_format;
    let mut table = create_styled_table();
    table.set_header(
        ["Month", "Messages", "Sessions", "Input", "Output", "Cached", "Reasoning", "Total"]
            .iter()
            .map(|h| header_cell(h, options.use_color)),
    );

    // Months with messages or with sessions, in order
    let mut months: Vec<&str> = aggregates
        .statistics
        .monthly_messages
        .keys()
        .chain(aggregates.monthly_tokens.keys())
        .map(String::as_str)
        .collect();
    months.sort_unstable();
    months.dedup();

    for month in months {
        let messages = aggregates
            .statistics
            .monthly_messages
            .get(month)
            .copied()
            .unwrap_or(0);
        let tokens = aggregates.monthly_tokens.get(month).copied().unwrap_or_default();
        let usage = tokens.usage;
        table.add_row(vec![
            Cell::new(format_month_name(month)),
            right_cell(&format_number(messages, fmt), None, false),
            right_cell(&format_number(tokens.session_count, fmt), None, false),
            right_cell(&format_compact(usage.input_tokens, fmt), None, false),
            right_cell(&format_compact(usage.output_tokens, fmt), None, false),
            right_cell(&format_compact(usage.cached_input_tokens, fmt), None, false),
            right_cell(&format_compact(usage.reasoning_output_tokens, fmt), None, false),
            right_cell(&format_compact(usage.total_tokens, fmt), None, false),
        ]);
    }

    let total = grand_total(&aggregates.monthly_tokens);
    let total_color = options.use_color.then_some(Color::Yellow);
    table.add_row(vec![
        right_cell("Total", total_color, true),
        right_cell(
            &format_number(aggregates.statistics.total_messages, fmt),
            total_color,
            true,
        ),
        right_cell(&format_number(total.session_count, fmt), total_color, true),
        right_cell(&format_compact(total.usage.input_tokens, fmt), total_color, true),
        right_cell(&format_compact(total.usage.output_tokens, fmt), total_color, true),
        right_cell(&format_compact(total.usage.cached_input_tokens, fmt), total_color, true),
        right_cell(
            &format_compact(total.usage.reasoning_output_tokens, fmt),
            total_color,
            true,
        ),
        right_cell(&format_compact(total.usage.total_tokens, fmt), total_color, true),
    ]);

    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DailyCounts, TokenUsage, calculate_statistics, fold_sessions};

    #[test]
    fn summary_table_lists_months_and_total() {
        let daily: DailyCounts = [("2024-01-05".to_string(), 3)].into_iter().collect();
        let aggregates = Aggregates {
            statistics: calculate_statistics(daily),
            monthly_tokens: fold_sessions(vec![
                (
                    "2024-01".to_string(),
                    TokenUsage {
                        total_tokens: 2_500,
                        ..Default::default()
                    },
                ),
                ("2024-02".to_string(), TokenUsage::default()),
            ]),
        };
        let out = render_summary_table(
            &aggregates,
            SummaryTableOptions {
                use_color: false,
                number_format: NumberFormat::default(),
            },
        );
        assert!(out.contains("Jan 2024"));
        assert!(out.contains("Feb 2024"));
        assert!(out.contains("2.5K"));
        assert!(out.contains("Total"));
    }
}
