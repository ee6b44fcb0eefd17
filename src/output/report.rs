use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::diagnostics::Severity;
use crate::evaluation::{RawScores, ScoreReport};

/// JSON document describing one evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct ReportDocument {
    pub evaluated_at: DateTime<Utc>,
    pub subject: String,
    pub is_reference_person: bool,
    pub raw: RawScores,
    pub scores: ScoreReport,
    pub diagnostics: Vec<DiagnosticEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticEntry {
    pub severity: String,
    pub message: String,
}

impl From<(Severity, String)> for DiagnosticEntry {
    fn from((severity, message): (Severity, String)) -> Self {
        Self {
            severity: severity.to_string(),
            message,
        }
    }
}

impl ReportDocument {
    pub fn new(
        subject: &str,
        is_reference_person: bool,
        raw: RawScores,
        scores: ScoreReport,
        diagnostics: Vec<(Severity, String)>,
    ) -> Self {
        Self {
            evaluated_at: Utc::now(),
            subject: subject.to_string(),
            is_reference_person,
            raw,
            scores,
            diagnostics: diagnostics.into_iter().map(DiagnosticEntry::from).collect(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize report")
    }
}

/// Save a report to a JSON file atomically
///
/// Uses atomic-write-file so a crash never leaves a half-written report.
pub fn save_report(path: &Path, report: &ReportDocument) -> Result<()> {
    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, report).context("Failed to serialize report")?;

    file.commit()
        .with_context(|| format!("Failed to save report to {}", path.display()))?;

    Ok(())
}
