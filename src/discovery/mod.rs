//! Source document discovery
//!
//! Finds the PSD documents under an input root and describes each one relative
//! to that root.

pub mod filter;
pub mod walker;

pub use filter::{has_source_extension, SOURCE_EXTENSION, TARGET_EXTENSION};
pub use walker::{find_psd_files, walk, DiscoveredFile, WalkStats};
