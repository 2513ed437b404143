//! PSD to PNG conversion module
//!
//! This module contains the document engine, the per-file converter, the batch
//! pipeline, export options and run statistics.

pub mod batch;
pub mod config;
pub mod converter;
pub mod engine;
pub mod stats;

pub use batch::{plan, run_pipeline, run_session, select_roots, Roots};
pub use config::ExportOptions;
pub use converter::{convert_document, ConversionOutcome, DocumentGuard, FileReport};
pub use engine::{Document, DocumentEngine, PsdDocument, PsdEngine};
pub use stats::{FileFailure, RunSummary};

pub use crate::error::ConversionResult;
