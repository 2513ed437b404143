//! Run summary and report for batch conversions

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::cli::CliUtils;
use crate::conversion::converter::FileReport;
use crate::error::{ConversionError, FailureStage};

/// One diagnostic about one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFailure {
    pub path: PathBuf,
    pub stage: FailureStage,
    pub reason: String,
    /// Message shown to the operator
    pub message: String,
}

impl FileFailure {
    /// Describe a per-file error; run-level errors have no stage and yield `None`
    pub fn from_error(source: &Path, error: &ConversionError) -> Option<Self> {
        Some(Self {
            path: source.to_path_buf(),
            stage: error.stage()?,
            reason: error.reason(),
            message: error.user_message(),
        })
    }
}

/// Totals for one run over an input root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub input_root: PathBuf,
    pub output_root: PathBuf,
    /// Documents handed to the converter
    pub discovered: usize,
    /// Documents exported successfully
    pub converted: usize,
    /// Documents that could not be exported
    pub failed: usize,
    /// Entries that were not PSD files
    pub skipped: usize,
    pub failures: Vec<FileFailure>,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub finished_at: chrono::DateTime<chrono::Utc>,
    pub elapsed_ms: u64,
}

impl RunSummary {
    /// Create an empty summary stamped with the current time
    pub fn new(input_root: &Path, output_root: &Path) -> Self {
        let now = chrono::Utc::now();
        Self {
            input_root: input_root.to_path_buf(),
            output_root: output_root.to_path_buf(),
            discovered: 0,
            converted: 0,
            failed: 0,
            skipped: 0,
            failures: Vec::new(),
            started_at: now,
            finished_at: now,
            elapsed_ms: 0,
        }
    }

    /// Account for one converted document, returning its diagnostics
    pub fn record(&mut self, report: &FileReport) -> Vec<FileFailure> {
        self.discovered += 1;
        if report.succeeded() {
            self.converted += 1;
        } else {
            self.failed += 1;
        }

        let failures: Vec<FileFailure> = report
            .errors()
            .filter_map(|e| FileFailure::from_error(&report.source, e))
            .collect();
        self.failures.extend(failures.iter().cloned());
        failures
    }

    /// Stamp the end of the run
    pub fn finish(&mut self, started: Instant, skipped: usize) {
        self.skipped = skipped;
        self.finished_at = chrono::Utc::now();
        self.elapsed_ms = started.elapsed().as_millis() as u64;
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Get a formatted summary
    pub fn summary(&self) -> String {
        format!(
            "Conversion complete: {} of {} files converted, {} failed in {}",
            self.converted,
            self.discovered,
            self.failed,
            CliUtils::format_duration(Duration::from_millis(self.elapsed_ms))
        )
    }

    /// Export to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Import from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
