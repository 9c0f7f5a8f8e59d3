use std::path::PathBuf;
use thiserror::Error;

use crate::validation::ValidationReport;

/// The main error type for compass-data operations.
#[derive(Debug, Error)]
pub enum LocatorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON table from {path}: {source}")]
    TableJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse YAML table from {path}: {source}")]
    TableYaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The identifier has no entry in the dataset registry.
    #[error("Unknown dataset identifier '{0}'")]
    UnknownDataset(String),

    /// The record exists but carries no id field at all for the selected source.
    #[error("{identifier} is not supported in {source_name}")]
    NotInSource {
        identifier: String,
        source_name: &'static str,
    },

    /// The record's id for the selected source is null or empty.
    #[error("{identifier} is not supported in {source_name}")]
    UnsupportedSource {
        identifier: String,
        source_name: &'static str,
    },

    #[error("No valid url for {path}! Please make sure `{path}` is correct")]
    NoArchiveUrl { path: String },

    #[error("Transfer failed: {0}")]
    Transfer(#[from] TransferError),

    #[error("Could not determine the user's home directory")]
    NoHomeDir,

    #[error("Validation failed with {error_count} error(s) and {warning_count} warning(s)")]
    ValidationFailed {
        error_count: usize,
        warning_count: usize,
        report: ValidationReport,
    },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Failures raised by the fetch-and-extract primitive.
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("invalid archive url '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error("request to {url} failed: {message}")]
    Http { url: String, message: String },

    #[error("IO error while handling {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("checksum mismatch for {path}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("unsupported archive type: {0}")]
    UnsupportedArchive(PathBuf),

    #[error("failed to extract {path}: {message}")]
    Extract { path: PathBuf, message: String },
}
