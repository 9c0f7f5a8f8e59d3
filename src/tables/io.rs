//! Reading the lookup tables.
//!
//! Tables are stored as JSON objects (`.json`) or YAML mappings
//! (`.yaml` / `.yml`), keyed by dataset identifier or relative dataset path:
//!
//! ```json
//! {
//!   "opencompass/gsm8k": {
//!     "ms_id": "opencompass/gsm8k",
//!     "hf_id": "opencompass/gsm8k",
//!     "om_id": "OpenCompass/gsm8k",
//!     "local": "./data/gsm8k/"
//!   }
//! }
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::de::DeserializeOwned;

use super::model::{ArchiveTable, DatasetRegistry};
use crate::error::LocatorError;

/// On-disk encoding of a table file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableFormat {
    Json,
    Yaml,
}

impl TableFormat {
    /// Picks the format from the file extension; anything that is not
    /// `.yaml`/`.yml` is read as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => TableFormat::Yaml,
            _ => TableFormat::Json,
        }
    }
}

/// Reads a dataset registry from a JSON or YAML file.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn read_registry(path: &Path) -> Result<DatasetRegistry, LocatorError> {
    read_table(path)
}

/// Reads an archive table from a JSON or YAML file.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn read_archive_table(path: &Path) -> Result<ArchiveTable, LocatorError> {
    read_table(path)
}

/// Parses a dataset registry from a JSON string.
pub fn registry_from_json_str(json: &str) -> Result<DatasetRegistry, serde_json::Error> {
    serde_json::from_str(json)
}

/// Parses a dataset registry from raw JSON bytes.
///
/// Useful for fuzzing without UTF-8 validation upfront.
pub fn registry_from_json_slice(bytes: &[u8]) -> Result<DatasetRegistry, serde_json::Error> {
    serde_json::from_slice(bytes)
}

/// Parses an archive table from a JSON string.
pub fn archive_table_from_json_str(json: &str) -> Result<ArchiveTable, serde_json::Error> {
    serde_json::from_str(json)
}

/// Parses an archive table from raw JSON bytes.
pub fn archive_table_from_json_slice(bytes: &[u8]) -> Result<ArchiveTable, serde_json::Error> {
    serde_json::from_slice(bytes)
}

fn read_table<T: DeserializeOwned>(path: &Path) -> Result<T, LocatorError> {
    let file = File::open(path).map_err(LocatorError::Io)?;
    let reader = BufReader::new(file);

    match TableFormat::from_path(path) {
        TableFormat::Json => {
            serde_json::from_reader(reader).map_err(|source| LocatorError::TableJson {
                path: path.to_path_buf(),
                source,
            })
        }
        TableFormat::Yaml => {
            serde_yaml::from_reader(reader).map_err(|source| LocatorError::TableYaml {
                path: path.to_path_buf(),
                source,
            })
        }
    }
}
