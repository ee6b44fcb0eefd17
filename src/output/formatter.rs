use owo_colors::OwoColorize;
use std::io::IsTerminal;

use crate::evaluation::{RawScores, ScoreReport};
use crate::normalize::NormalizedScore;
use crate::scoring::OverallBreakdown;

/// Placeholder for scores that could not be computed
pub const NOT_AVAILABLE: &str = "n/a";

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a normalized score with two decimals, or "n/a" when absent
pub fn format_score(result: Option<NormalizedScore>) -> String {
    match result {
        Some(r) => format!("{:.2}", r.score),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Format a percentile with one decimal and a percent sign, or "n/a"
pub fn format_percentile(result: Option<NormalizedScore>) -> String {
    match result {
        Some(r) => format!("{:.1}%", r.percentile),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn raw_value(raw: &RawScores, name: &str) -> f64 {
    match name {
        "overall" => raw.overall,
        "github" => raw.detail.github,
        "articles" => raw.detail.articles,
        "events" => raw.detail.events,
        _ => raw.detail.tags,
    }
}

/// Format a report as an aligned table with columns: Name, Raw, Score, Percentile
pub fn format_report_table(raw: &RawScores, report: &ScoreReport, use_colors: bool) -> String {
    let header = format!(
        "{:<10}{:>12}{:>8}{:>12}",
        "", "raw", "score", "percentile"
    );

    let mut lines = vec![if use_colors {
        header.dimmed().to_string()
    } else {
        header
    }];

    for (name, result) in report.rows() {
        let raw_str = format!("{:>12.4}", raw_value(raw, name));
        let score_str = format!("{:>8}", format_score(result));
        let pct_str = format!("{:>12}", format_percentile(result));

        let line = if use_colors {
            let score_colored = match result {
                Some(r) if r.score >= 3.5 => score_str.green().bold().to_string(),
                Some(r) if r.score < 2.5 => score_str.yellow().to_string(),
                Some(_) => score_str.bold().to_string(),
                None => score_str.dimmed().to_string(),
            };
            format!("{:<10}{}{}{}", name.cyan(), raw_str, score_colored, pct_str)
        } else {
            format!("{:<10}{}{}{}", name, raw_str, score_str, pct_str)
        };
        lines.push(line);
    }

    lines.join("\n")
}

/// Format a report as tab-separated values for scripting
/// Columns: name, raw, score, percentile (no headers, no colors)
pub fn format_report_tsv(raw: &RawScores, report: &ScoreReport) -> String {
    report
        .rows()
        .iter()
        .map(|(name, result)| {
            let (score, pct) = match result {
                Some(r) => (format!("{:.4}", r.score), format!("{:.4}", r.percentile)),
                None => (NOT_AVAILABLE.to_string(), NOT_AVAILABLE.to_string()),
            };
            format!("{}\t{:.6}\t{}\t{}", name, raw_value(raw, name), score, pct)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format raw scores with each category's share of the overall score
pub fn format_raw_breakdown(breakdown: &OverallBreakdown, use_colors: bool) -> String {
    let mut lines = Vec::with_capacity(breakdown.contributions.len() + 1);
    for item in &breakdown.contributions {
        let name = format!("{:<10}", item.category.key());
        let line = format!("{:>12.4}  (+{:.4})", item.value, item.contribution);
        if use_colors {
            lines.push(format!("{}{}", name.cyan(), line));
        } else {
            lines.push(format!("{}{}", name, line));
        }
    }
    let total = format!("{:<10}{:>12.4}", "overall", breakdown.score);
    lines.push(if use_colors {
        total.bold().to_string()
    } else {
        total
    });
    lines.join("\n")
}
