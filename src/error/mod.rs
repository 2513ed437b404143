//! Error types and handling infrastructure for PSD to PNG conversion

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Stage of a single file's conversion at which a failure happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    /// Creating the mirrored output folder
    OutputFolder,
    /// Opening (reading and decoding) the source document
    Open,
    /// Exporting the flattened image
    Export,
    /// Closing the opened document
    Close,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureStage::OutputFolder => "output folder",
            FailureStage::Open => "open",
            FailureStage::Export => "export",
            FailureStage::Close => "close",
        };
        f.write_str(name)
    }
}

/// Errors raised by a document engine
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported or corrupt document: {message}")]
    Decode { message: String },

    #[error("Encoding error: {message}")]
    Encode { message: String },

    #[error("Invalid export options: {message}")]
    Options { message: String },
}

impl EngineError {
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    pub fn encode(message: impl Into<String>) -> Self {
        Self::Encode {
            message: message.into(),
        }
    }

    pub fn options(message: impl Into<String>) -> Self {
        Self::Options {
            message: message.into(),
        }
    }
}

impl From<image::ImageError> for EngineError {
    fn from(error: image::ImageError) -> Self {
        match error {
            image::ImageError::IoError(io) => Self::Io(io),
            other => Self::encode(other.to_string()),
        }
    }
}

/// Main error type for conversion operations
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("Failed to create output folder {}: {source}", .path.display())]
    OutputFolder {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: EngineError,
    },

    #[error("Failed to export {}: {source}", .path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: EngineError,
    },

    #[error("Failed to close document {}: {source}", .path.display())]
    Close {
        path: PathBuf,
        #[source]
        source: EngineError,
    },

    #[error("Failed to list directory: {source}")]
    DirectoryEnumeration {
        path: Option<PathBuf>,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {message}")]
    Configuration { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConversionError {
    pub fn output_folder(path: &Path, source: std::io::Error) -> Self {
        Self::OutputFolder {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn open(path: &Path, source: EngineError) -> Self {
        Self::Open {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn export(path: &Path, source: EngineError) -> Self {
        Self::Export {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn close(path: &Path, source: EngineError) -> Self {
        Self::Close {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn directory_enumeration(path: Option<PathBuf>, source: std::io::Error) -> Self {
        Self::DirectoryEnumeration { path, source }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Per-file stage of the failure, `None` for run-level errors
    pub fn stage(&self) -> Option<FailureStage> {
        match self {
            Self::OutputFolder { .. } => Some(FailureStage::OutputFolder),
            Self::Open { .. } => Some(FailureStage::Open),
            Self::Export { .. } => Some(FailureStage::Export),
            Self::Close { .. } => Some(FailureStage::Close),
            _ => None,
        }
    }

    /// Path the error refers to, when known
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::OutputFolder { path, .. }
            | Self::Open { path, .. }
            | Self::Export { path, .. }
            | Self::Close { path, .. } => Some(path),
            Self::DirectoryEnumeration { path, .. } => path.as_deref(),
            _ => None,
        }
    }

    /// Human-readable reason without the path prefix
    pub fn reason(&self) -> String {
        match self {
            Self::OutputFolder { source, .. } | Self::DirectoryEnumeration { source, .. } => {
                source.to_string()
            }
            Self::Open { source, .. }
            | Self::Export { source, .. }
            | Self::Close { source, .. } => source.to_string(),
            Self::Configuration { message } => message.clone(),
            Self::Io(err) => err.to_string(),
        }
    }

    /// Create a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Open { path, .. } | Self::Export { path, .. } => {
                format!(
                    "Failed to open or export: {}\nReason: {}",
                    path.display(),
                    self.reason()
                )
            }
            Self::Close { path, .. } => {
                format!(
                    "Failed to close document: {}\nReason: {}",
                    path.display(),
                    self.reason()
                )
            }
            Self::DirectoryEnumeration { path: Some(path), .. } => {
                format!(
                    "Cannot read directory {}: {}",
                    path.display(),
                    self.reason()
                )
            }
            _ => self.to_string(),
        }
    }
}

/// Result type for conversion operations
pub type ConversionResult<T> = Result<T, ConversionError>;

/// Convenience result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
