//! Diagnostic sink and completion signal

use log::error;

use crate::cli::CliUtils;
use crate::conversion::stats::{FileFailure, RunSummary};

/// Receives per-file diagnostics and the end-of-run acknowledgement
pub trait NotificationSink {
    /// A single document failed at some stage. Never stops the run.
    fn report_failure(&mut self, failure: &FileFailure);

    /// The traversal finished
    fn report_completion(&mut self, summary: &RunSummary);
}

impl<S: NotificationSink + ?Sized> NotificationSink for &mut S {
    fn report_failure(&mut self, failure: &FileFailure) {
        (**self).report_failure(failure)
    }

    fn report_completion(&mut self, summary: &RunSummary) {
        (**self).report_completion(summary)
    }
}

/// Logs failures and prints the completion line
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink {
    quiet: bool,
}

impl ConsoleSink {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl NotificationSink for ConsoleSink {
    fn report_failure(&mut self, failure: &FileFailure) {
        error!("{}", failure.message);
    }

    fn report_completion(&mut self, summary: &RunSummary) {
        CliUtils::show_success(&summary.summary(), self.quiet);
    }
}

/// Keeps every notification in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub failures: Vec<FileFailure>,
    pub completions: Vec<RunSummary>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NotificationSink for MemorySink {
    fn report_failure(&mut self, failure: &FileFailure) {
        self.failures.push(failure.clone());
    }

    fn report_completion(&mut self, summary: &RunSummary) {
        self.completions.push(summary.clone());
    }
}
