use std::path::{Path, PathBuf};
use std::time::Instant;

use log::{debug, info};

use crate::cli::path_mapping::{output_target, OutputTarget};
use crate::cli::selection::{DirectorySelector, INPUT_PROMPT, OUTPUT_PROMPT};
use crate::conversion::config::ExportOptions;
use crate::conversion::converter::convert_document;
use crate::conversion::engine::DocumentEngine;
use crate::conversion::stats::RunSummary;
use crate::conversion::ConversionResult;
use crate::discovery::walker::walk;
use crate::notify::NotificationSink;

/// The input and output roots of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roots {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl Roots {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }
}

/// Convert every PSD document under the input root, one at a time.
///
/// Per-file failures go to `sink` and never stop the run. Only a directory that
/// cannot be listed returns an error. The completion signal is left to the caller.
pub fn run_pipeline<E, S>(
    roots: &Roots,
    engine: &E,
    options: &ExportOptions,
    sink: &mut S,
) -> ConversionResult<RunSummary>
where
    E: DocumentEngine + ?Sized,
    S: NotificationSink + ?Sized,
{
    let started = Instant::now();
    let mut summary = RunSummary::new(&roots.input, &roots.output);
    info!(
        "Converting {} -> {}",
        roots.input.display(),
        roots.output.display()
    );

    let stats = walk(&roots.input, |file| {
        let report = convert_document(engine, &file, &roots.output, options);
        for failure in summary.record(&report) {
            sink.report_failure(&failure);
        }
    })?;

    summary.finish(started, stats.skipped);
    info!("{}", summary.summary());
    Ok(summary)
}

/// Ask for both roots, then convert and acknowledge completion.
///
/// Returns `Ok(None)` without touching the filesystem when either prompt is declined.
pub fn run_session<D, E, S>(
    selector: &mut D,
    engine: &E,
    options: &ExportOptions,
    sink: &mut S,
) -> ConversionResult<Option<RunSummary>>
where
    D: DirectorySelector + ?Sized,
    E: DocumentEngine + ?Sized,
    S: NotificationSink + ?Sized,
{
    let Some(roots) = select_roots(selector) else {
        debug!("Folder selection declined; nothing to do");
        return Ok(None);
    };

    let summary = run_pipeline(&roots, engine, options, sink)?;
    sink.report_completion(&summary);
    Ok(Some(summary))
}

/// Ask for the input root, then the output root. Stops at the first decline.
pub fn select_roots<D>(selector: &mut D) -> Option<Roots>
where
    D: DirectorySelector + ?Sized,
{
    let input = selector.select_directory(INPUT_PROMPT)?;
    let output = selector.select_directory(OUTPUT_PROMPT)?;
    Some(Roots { input, output })
}

/// List every conversion a run would perform, without opening or creating anything
pub fn plan(roots: &Roots) -> ConversionResult<Vec<(PathBuf, OutputTarget)>> {
    let mut planned = Vec::new();
    walk(&roots.input, |file| {
        let target = output_target(&roots.output, &file);
        planned.push((file.path, target));
    })?;
    Ok(planned)
}

/// Root-relative display form of a path, used in operator messages
pub fn display_relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}
