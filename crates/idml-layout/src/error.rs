//! Error types for idml-layout
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized Result type for IDML operations
pub type Result<T> = std::result::Result<T, IdmlError>;

/// Stage of the load pipeline an error belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorPhase {
    /// Locating, extracting or reading package files
    Loading,
    /// Interpreting the XML content of a file that was found
    Parsing,
}

/// Errors that can occur during IDML loading and parsing
#[derive(Error, Debug)]
pub enum IdmlError {
    /// The `.idml` package file does not exist
    #[error("IDML file not found: {}", .0.display())]
    PackageNotFound(PathBuf),

    /// The extracted package directory does not exist
    #[error("IDML directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    /// The package has no `designmap.xml`
    #[error("designmap.xml not found in: {}", .0.display())]
    MissingDesignMap(PathBuf),

    /// The zip archive could not be extracted
    #[error("Failed to extract IDML package: {0}")]
    Extract(String),

    /// I/O error (read error, temp directory creation, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Malformed XML in one of the package files
    #[error("XML parse error in {file}: {message}")]
    Xml {
        /// Package-relative path of the offending file
        file: String,
        /// Parser message
        message: String,
    },

    /// Well-formed XML whose structure is not a valid IDML part
    #[error("Invalid IDML structure in {file}: {message}")]
    InvalidStructure {
        /// Package-relative path of the offending file
        file: String,
        /// What was wrong
        message: String,
    },
}

impl IdmlError {
    /// Which pipeline stage produced this error
    #[must_use = "returns the phase of the error"]
    pub const fn phase(&self) -> ErrorPhase {
        match self {
            Self::PackageNotFound(_)
            | Self::DirectoryNotFound(_)
            | Self::MissingDesignMap(_)
            | Self::Extract(_)
            | Self::Io(_) => ErrorPhase::Loading,
            Self::Xml { .. } | Self::InvalidStructure { .. } => ErrorPhase::Parsing,
        }
    }

    #[inline]
    pub(crate) fn xml(file: &str, message: impl ToString) -> Self {
        Self::Xml {
            file: file.to_string(),
            message: message.to_string(),
        }
    }

    #[inline]
    pub(crate) fn structure(file: &str, message: impl ToString) -> Self {
        Self::InvalidStructure {
            file: file.to_string(),
            message: message.to_string(),
        }
    }
}

impl From<zip::result::ZipError> for IdmlError {
    #[inline]
    fn from(err: zip::result::ZipError) -> Self {
        Self::Extract(err.to_string())
    }
}
