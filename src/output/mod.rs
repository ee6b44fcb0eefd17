pub mod formatter;
pub mod report;

pub use formatter::{
    format_percentile, format_raw_breakdown, format_report_table, format_report_tsv,
    format_score, should_use_colors,
};
pub use report::{save_report, DiagnosticEntry, ReportDocument};
