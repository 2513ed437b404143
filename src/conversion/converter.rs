//! Single-document conversion with guaranteed cleanup

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, error};

use crate::cli::path_mapping::output_target;
use crate::conversion::config::ExportOptions;
use crate::conversion::engine::{Document, DocumentEngine};
use crate::discovery::DiscoveredFile;
use crate::error::{ConversionError, EngineResult};

/// Result of converting one document
#[derive(Debug)]
pub enum ConversionOutcome {
    Success,
    Failure(ConversionError),
}

impl ConversionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ConversionOutcome::Success)
    }

    pub fn error(&self) -> Option<&ConversionError> {
        match self {
            ConversionOutcome::Success => None,
            ConversionOutcome::Failure(err) => Some(err),
        }
    }
}

/// Everything that happened while converting one document
#[derive(Debug)]
pub struct FileReport {
    pub source: PathBuf,
    pub target: PathBuf,
    pub outcome: ConversionOutcome,
    /// Closing failed after the document had been opened
    pub close_error: Option<ConversionError>,
}

impl FileReport {
    pub fn succeeded(&self) -> bool {
        self.outcome.is_success()
    }

    /// Every failure of this document, conversion first, then close
    pub fn errors(&self) -> impl Iterator<Item = &ConversionError> {
        self.outcome.error().into_iter().chain(self.close_error.as_ref())
    }
}

/// Owns an opened document and makes sure it is closed exactly once
pub struct DocumentGuard<D: Document> {
    path: PathBuf,
    document: Option<D>,
}

impl<D: Document> DocumentGuard<D> {
    pub fn new(path: &Path, document: D) -> Self {
        Self {
            path: path.to_path_buf(),
            document: Some(document),
        }
    }

    pub fn document_mut(&mut self) -> &mut D {
        // only `close` takes the document, and it consumes the guard
        self.document
            .as_mut()
            .unwrap_or_else(|| unreachable!("document taken before close"))
    }

    /// Close the document and report the result
    pub fn close(mut self) -> EngineResult<()> {
        match self.document.take() {
            Some(document) => document.close(),
            None => Ok(()),
        }
    }
}

impl<D: Document> Drop for DocumentGuard<D> {
    fn drop(&mut self) {
        if let Some(document) = self.document.take() {
            if let Err(e) = document.close() {
                error!(
                    "Failed to close document: {}\nReason: {}",
                    self.path.display(),
                    e
                );
            }
        }
    }
}

/// Convert one PSD document into a PNG under `output_root`.
///
/// The mirrored output folder is created first. A document that opens is always
/// closed afterwards, whether or not the export succeeded. No failure escapes:
/// everything is recorded in the returned report.
pub fn convert_document<E>(
    engine: &E,
    file: &DiscoveredFile,
    output_root: &Path,
    options: &ExportOptions,
) -> FileReport
where
    E: DocumentEngine + ?Sized,
{
    let target = output_target(output_root, file);
    let mut report = FileReport {
        source: file.path.clone(),
        target: target.file.clone(),
        outcome: ConversionOutcome::Success,
        close_error: None,
    };

    if let Err(e) = fs::create_dir_all(&target.folder) {
        report.outcome =
            ConversionOutcome::Failure(ConversionError::output_folder(&target.folder, e));
        return report;
    }

    let document = match engine.open(&file.path) {
        Ok(document) => document,
        Err(e) => {
            report.outcome = ConversionOutcome::Failure(ConversionError::open(&file.path, e));
            return report;
        }
    };

    let mut guard = DocumentGuard::new(&file.path, document);
    if let Err(e) = guard.document_mut().export(&target.file, options) {
        report.outcome = ConversionOutcome::Failure(ConversionError::export(&file.path, e));
    }

    if let Err(e) = guard.close() {
        report.close_error = Some(ConversionError::close(&file.path, e));
    }

    if report.succeeded() {
        debug!("{} -> {}", file.path.display(), target.file.display());
    }
    report
}
