//! Error types for discovery and loading.
//!
//! Every failure is structural (wrong path, bad header, bad band selection,
//! decoder failure), so nothing here is retried. Callers branch on
//! [`BridgeError::kind`].

use std::path::PathBuf;

use eo_common::GridTag;
use thiserror::Error;

use crate::family::ProductFamily;
use crate::reader::ReaderError;

/// Result type for bridge operations.
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Errors raised by the registry, discovery handlers and cube loaders.
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("unrecognized product: {}", .path.display())]
    UnrecognizedProduct { path: PathBuf },

    #[error("product {} matches several families: {}", .path.display(), join(.families))]
    AmbiguousProduct {
        path: PathBuf,
        families: Vec<ProductFamily>,
    },

    #[error("{family} handler does not own {}", .path.display())]
    PathMismatch { family: ProductFamily, path: PathBuf },

    #[error("malformed {family} product {}: {reason}", .path.display())]
    MalformedProduct {
        family: ProductFamily,
        path: PathBuf,
        reason: String,
    },

    #[error("unsupported band(s) for {family}: {}", .bands.join(", "))]
    UnsupportedBand {
        family: ProductFamily,
        bands: Vec<String>,
        available: Vec<String>,
    },

    #[error("band selection for {family} mixes grids: {}", describe_selection(.selection))]
    IncompatibleGridSelection {
        family: ProductFamily,
        selection: Vec<(String, GridTag)>,
    },

    #[error("format reader failed for {}", .path.display())]
    ReaderFailure {
        path: PathBuf,
        #[source]
        source: ReaderError,
    },

    #[error("recognition rule of {family} overlaps {existing}")]
    OverlappingRecognition {
        family: ProductFamily,
        existing: ProductFamily,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Discriminant of [`BridgeError`] for callers that react per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnrecognizedProduct,
    AmbiguousProduct,
    PathMismatch,
    MalformedProduct,
    UnsupportedBand,
    IncompatibleGridSelection,
    ReaderFailure,
    OverlappingRecognition,
    Config,
    Io,
}

impl BridgeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BridgeError::UnrecognizedProduct { .. } => ErrorKind::UnrecognizedProduct,
            BridgeError::AmbiguousProduct { .. } => ErrorKind::AmbiguousProduct,
            BridgeError::PathMismatch { .. } => ErrorKind::PathMismatch,
            BridgeError::MalformedProduct { .. } => ErrorKind::MalformedProduct,
            BridgeError::UnsupportedBand { .. } => ErrorKind::UnsupportedBand,
            BridgeError::IncompatibleGridSelection { .. } => ErrorKind::IncompatibleGridSelection,
            BridgeError::ReaderFailure { .. } => ErrorKind::ReaderFailure,
            BridgeError::OverlappingRecognition { .. } => ErrorKind::OverlappingRecognition,
            BridgeError::Config(_) => ErrorKind::Config,
            BridgeError::Io { .. } => ErrorKind::Io,
        }
    }

    /// Create a MalformedProduct error.
    pub fn malformed(
        family: ProductFamily,
        path: impl Into<PathBuf>,
        reason: impl ToString,
    ) -> Self {
        Self::MalformedProduct {
            family,
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a ReaderFailure error.
    pub fn reader_failure(path: impl Into<PathBuf>, source: ReaderError) -> Self {
        Self::ReaderFailure {
            path: path.into(),
            source,
        }
    }
}

fn join(families: &[ProductFamily]) -> String {
    families
        .iter()
        .map(ProductFamily::id)
        .collect::<Vec<_>>()
        .join(", ")
}

fn describe_selection(selection: &[(String, GridTag)]) -> String {
    selection
        .iter()
        .map(|(band, tag)| format!("{band} ({tag})"))
        .collect::<Vec<_>>()
        .join(", ")
}
