use std::fs;

use chrono::Local;

use crate::config::{OutputMode, Settings};
use crate::core::{Aggregates, calculate_statistics, grand_total};
use crate::error::AppError;
use crate::output::{
    RenderOptions, SummaryTableOptions, format_number, output_aggregates_json, render_markdown,
    render_summary_table,
};
use crate::source::{find_session_files, load_history, load_session_tokens};

/// Progress lines on stdout, silenced by `--quiet`
struct Progress {
    quiet: bool,
}

impl Progress {
    fn step(&self, message: impl AsRef<str>) {
        if !self.quiet {
            println!("{}", message.as_ref());
        }
    }
}

/// Read both sources and derive every aggregate.
///
/// Returns `None` when the history holds no dated message.
fn collect_aggregates(settings: &Settings, progress: &Progress) -> Option<Aggregates> {
    let fmt = settings.number_format;

    progress.step("Parsing history.jsonl...");
    let statistics = calculate_statistics(load_history(&settings.history_file, settings.timezone));
    if statistics.is_empty() {
        return None;
    }
    progress.step(format!(
        "Found {} messages across {} days",
        format_number(statistics.total_messages, fmt),
        format_number(statistics.active_days as u64, fmt)
    ));

    progress.step("Counting session files...");
    let files = find_session_files(&settings.sessions_dir);
    progress.step(format!(
        "Found {} session files",
        format_number(files.len() as u64, fmt)
    ));

    progress.step("Collecting token statistics from sessions (this may take a moment)...");
    let monthly_tokens = load_session_tokens(&files);
    progress.step(format!(
        "Found {} total tokens across all sessions",
        format_number(grand_total(&monthly_tokens).usage.total_tokens, fmt)
    ));

    progress.step("Calculating statistics...");
    Some(Aggregates {
        statistics,
        monthly_tokens,
    })
}

fn render_options(settings: &Settings) -> RenderOptions {
    RenderOptions {
        quota_limit: settings.quota_limit,
        generated_on: Local::now().date_naive(),
        number_format: settings.number_format,
        data_source: format!(
            "`{}` and `{}/`",
            settings.history_file.display(),
            settings.sessions_dir.display()
        ),
    }
}

/// Run the whole pipeline once
pub(crate) fn run(settings: &Settings) -> Result<(), AppError> {
    let progress = Progress {
        quiet: settings.quiet,
    };

    let Some(aggregates) = collect_aggregates(settings, &progress) else {
        // stdout carries only JSON in JSON mode
        match settings.mode {
            OutputMode::Json => eprintln!("No history data found."),
            OutputMode::Markdown => println!("No history data found."),
        }
        return Ok(());
    };

    match settings.mode {
        OutputMode::Json => {
            println!("{}", output_aggregates_json(&aggregates)?);
        }
        OutputMode::Markdown => {
            progress.step("Generating markdown...");
            let markdown = render_markdown(&aggregates, &render_options(settings));

            let path = &settings.output_file;
            progress.step(format!("Writing to {}...", path.display()));
            fs::write(path, markdown).map_err(|source| AppError::WriteOutput {
                path: path.clone(),
                source,
            })?;
            progress.step(format!("Done! Statistics written to {}", path.display()));
        }
    }

    if settings.summary {
        println!(
            "{}",
            render_summary_table(
                &aggregates,
                SummaryTableOptions {
                    use_color: settings.use_color,
                    number_format: settings.number_format,
                },
            )
        );
    }

    Ok(())
}
