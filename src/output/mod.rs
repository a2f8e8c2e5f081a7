mod format;
mod json;
mod markdown;
mod table;

pub(crate) use format::{NumberFormat, format_number};
pub(crate) use json::output_aggregates_json;
pub(crate) use markdown::{RenderOptions, render_markdown};
pub(crate) use table::{SummaryTableOptions, render_summary_table};
