//! PSD to PNG batch converter
//!
//! Walks a directory tree of layered PSD documents and exports each one as a
//! flattened PNG under an output root, mirroring the relative folder layout.
//! Failures are isolated per file; only an unreadable directory stops a run.

pub mod cli;
pub mod conversion;
pub mod discovery;
pub mod error;
pub mod notify;

// Re-export commonly used types
pub use conversion::{
    convert_document, run_pipeline, run_session, ConversionOutcome, ExportOptions, FileReport,
    PsdEngine, Roots, RunSummary,
};
pub use discovery::DiscoveredFile;
pub use error::{ConversionError, ConversionResult, EngineError, FailureStage};
pub use notify::{ConsoleSink, MemorySink, NotificationSink};
