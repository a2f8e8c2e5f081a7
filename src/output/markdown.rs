//! Markdown usage report
//!
//! A fixed-layout document over [`Aggregates`]. The generation date is an
//! input so the same aggregates always render the same bytes.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::core::{Aggregates, DayCount, TokenUsage, grand_total, month_key};

use super::format::{
    NumberFormat, format_compact, format_month_name, format_number, format_rounded,
    format_short_date, percent_of, weekday_name,
};

/// Days the busiest-day analysis extrapolates a peak day over
const DAYS_PER_MONTH: u64 = 30;

#[derive(Debug, Clone)]
pub(crate) struct RenderOptions {
    pub(crate) quota_limit: u64,
    pub(crate) generated_on: NaiveDate,
    pub(crate) number_format: NumberFormat,
    /// Shown in the header and footer, e.g. "`~/.codex/history.jsonl` and `~/.codex/sessions/`"
    pub(crate) data_source: String,
}

struct Renderer<'a> {
    aggregates: &'a Aggregates,
    opts: &'a RenderOptions,
    lines: Vec<String>,
}

impl<'a> Renderer<'a> {
    fn new(aggregates: &'a Aggregates, opts: &'a RenderOptions) -> Self {
        Self {
            aggregates,
            opts,
            lines: Vec::new(),
        }
    }

    fn num(&self, n: u64) -> String {
        format_number(n, self.opts.number_format)
    }

    fn compact(&self, n: u64) -> String {
        format_compact(n, self.opts.number_format)
    }

    fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    fn rule(&mut self) {
        self.push("");
        self.push("---");
        self.push("");
    }

    fn header(&mut self) {
        self.push("# Codex CLI Usage Statistics");
        self.push("");
        self.push(format!(
            "**Generated**: {}",
            self.opts.generated_on.format("%B %d, %Y")
        ));
        self.push(format!("**Data Source**: {}", self.opts.data_source));
        self.rule();
    }

    fn summary(&mut self) {
        let aggregates = self.aggregates;
        let stats = &aggregates.statistics;
        let range = match &stats.date_range {
            Some((first, last)) => format!("{first} - {last}"),
            None => "-".to_string(),
        };
        let peak = match &stats.peak_day {
            Some(day) => format!("{} ({} messages)", day.date, self.num(day.count)),
            None => "-".to_string(),
        };

        self.push("## Summary");
        self.push("");
        self.push("| Metric | Value |");
        self.push("|--------|-------|");
        self.push(format!("| **Total Messages** | {} |", self.num(stats.total_messages)));
        self.push(format!("| **Active Days** | {} |", stats.active_days));
        self.push(format!("| **Date Range** | {range} |"));
        self.push(format!(
            "| **Average per Active Day** | ~{} messages |",
            format_rounded(stats.avg_per_day, self.opts.number_format)
        ));
        self.push(format!("| **Peak Day** | {peak} |"));
        self.rule();
    }

    fn token_summary(&mut self, totals: &TokenUsage) {
        self.push("## Token Usage Summary");
        self.push("");
        self.push("| Metric | Tokens |");
        self.push("|--------|--------|");
        for (label, value) in [
            ("Total Tokens", totals.total_tokens),
            ("Input Tokens", totals.input_tokens),
            ("Output Tokens", totals.output_tokens),
            ("Cached Input", totals.cached_input_tokens),
            ("Reasoning Output", totals.reasoning_output_tokens),
        ] {
            self.push(format!(
                "| **{label}** | {} ({}) |",
                self.num(value),
                self.compact(value)
            ));
        }
        self.rule();
    }

    fn monthly_breakdown(&mut self) {
        let quota = self.opts.quota_limit;
        self.push("## Monthly Breakdown");
        self.push("");
        self.push("| Month | Messages | Sessions | Quota % |");
        self.push("|-------|----------|----------|---------|");

        let mut total_sessions = 0u64;
        let aggregates = self.aggregates;
        let monthly = &aggregates.statistics.monthly_messages;
        let mut rows = Vec::with_capacity(monthly.len());
        for (month, &messages) in monthly {
            let sessions = aggregates.sessions_in(month);
            total_sessions = total_sessions.saturating_add(sessions);
            rows.push(format!(
                "| {} | {} | {} | {}% |",
                format_month_name(month),
                self.num(messages),
                self.num(sessions),
                format_rounded(percent_of(messages as f64, quota), self.opts.number_format)
            ));
        }
        self.lines.extend(rows);
        self.push(format!(
            "| **Total** | **{}** | **{}** | — |",
            self.num(self.aggregates.statistics.total_messages),
            self.num(total_sessions)
        ));
        self.push("");
        self.push(format!("*Quota allows {} messages/month*", self.num(quota)));
        self.rule();
    }

    fn monthly_tokens(&mut self, totals: &TokenUsage) {
        self.push("## Monthly Token Usage");
        self.push("");
        self.push("| Month | Total | Input | Output | Cached | Reasoning |");
        self.push("|-------|-------|-------|--------|--------|-----------|");

        let rows: Vec<String> = self
            .aggregates
            .monthly_tokens
            .iter()
            .map(|(month, tokens)| {
                let u = &tokens.usage;
                format!(
                    "| {} | {} | {} | {} | {} | {} |",
                    format_month_name(month),
                    self.compact(u.total_tokens),
                    self.compact(u.input_tokens),
                    self.compact(u.output_tokens),
                    self.compact(u.cached_input_tokens),
                    self.compact(u.reasoning_output_tokens)
                )
            })
            .collect();
        self.lines.extend(rows);
        self.push(format!(
            "| **Total** | **{}** | **{}** | **{}** | **{}** | **{}** |",
            self.compact(totals.total_tokens),
            self.compact(totals.input_tokens),
            self.compact(totals.output_tokens),
            self.compact(totals.cached_input_tokens),
            self.compact(totals.reasoning_output_tokens)
        ));
        self.rule();
    }

    fn top_days(&mut self) {
        self.push("## Top 10 Busiest Days");
        self.push("");
        self.push("| Rank | Date | Messages | Day of Week |");
        self.push("|------|------|----------|-------------|");
        let rows: Vec<String> = self
            .aggregates
            .statistics
            .top_days
            .iter()
            .enumerate()
            .map(|(i, day)| {
                format!(
                    "| {} | {} | {} | {} |",
                    i + 1,
                    day.date,
                    self.num(day.count),
                    weekday_name(&day.date)
                )
            })
            .collect();
        self.lines.extend(rows);
        self.rule();
    }

    fn daily_breakdown(&mut self) {
        self.push("## Daily Breakdown (All Active Days)");
        self.push("");

        let mut by_month: BTreeMap<&str, Vec<DayCount>> = BTreeMap::new();
        for (date, count) in self.aggregates.statistics.daily_counts.iter() {
            by_month.entry(month_key(date)).or_default().push(DayCount {
                date: date.to_string(),
                count,
            });
        }

        let mut section = Vec::new();
        for (month, days) in &by_month {
            let month_total: u64 = days.iter().map(|d| d.count).sum();
            section.push(format!(
                "### {} ({} messages, {} days)",
                format_month_name(month),
                self.num(month_total),
                days.len()
            ));
            section.push("| Date | Messages |".to_string());
            section.push("|------|----------|".to_string());
            for day in days {
                section.push(format!(
                    "| {} | {} |",
                    format_short_date(&day.date),
                    self.num(day.count)
                ));
            }
            section.push(String::new());
        }
        self.lines.extend(section);
    }

    fn quota_analysis(&mut self) {
        let aggregates = self.aggregates;
        let stats = &aggregates.statistics;
        let quota = self.opts.quota_limit;
        let fmt = self.opts.number_format;

        let (peak_month_name, peak_month_count) = match &stats.peak_month {
            Some(peak) => (format_month_name(&peak.month), peak.count),
            None => ("-".to_string(), 0),
        };
        let avg_month = stats.avg_per_month();
        let peak_day_projection = stats
            .peak_day
            .as_ref()
            .map_or(0, |d| d.count)
            .saturating_mul(DAYS_PER_MONTH);

        let peak_assess = if peak_month_count > quota { "Exceed" } else { "Pass" };
        let avg_assess = if avg_month > quota as f64 { "Exceed" } else { "Pass" };
        let projection_assess = if peak_day_projection > quota {
            "Would exceed"
        } else {
            "Pass"
        };

        self.push("---");
        self.push("");
        self.push("## Usage Pattern Analysis");
        self.push("");
        self.push("### Quota Comparison");
        self.push("");
        self.push("| Metric | Your Usage | Quota Limit | Assessment |");
        self.push("|--------|------------|-------------|------------|");
        self.push(format!(
            "| Peak Month | {} ({peak_month_name}) | {} | {peak_assess} ({}% of limit) |",
            self.num(peak_month_count),
            self.num(quota),
            format_rounded(percent_of(peak_month_count as f64, quota), fmt)
        ));
        self.push(format!(
            "| Average Month | ~{} | {} | {avg_assess} ({}% of limit) |",
            format_rounded(avg_month, fmt),
            self.num(quota),
            format_rounded(percent_of(avg_month, quota), fmt)
        ));
        self.push(format!(
            "| Peak Day x {DAYS_PER_MONTH} | {} (theoretical) | {} | {projection_assess} if every day was peak |",
            self.num(peak_day_projection),
            self.num(quota)
        ));
        self.rule();
        self.push(format!("*Data extracted from {}*", self.opts.data_source));
    }

    fn render(mut self) -> String {
        let totals = grand_total(&self.aggregates.monthly_tokens).usage;
        self.header();
        self.summary();
        self.token_summary(&totals);
        self.monthly_breakdown();
        self.monthly_tokens(&totals);
        self.top_days();
        self.daily_breakdown();
        self.quota_analysis();
        let mut doc = self.lines.join("\n");
        doc.push('\n');
        doc
    }
}

/// Render the full markdown report
pub(crate) fn render_markdown(aggregates: &Aggregates, opts: &RenderOptions) -> String {
    Renderer::new(aggregates, opts).render()
}
