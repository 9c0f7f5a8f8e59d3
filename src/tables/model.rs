//! Record and table types for the dataset registry and the archive table.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use super::keys;
use crate::error::LocatorError;

/// Per-dataset entry of the registry.
///
/// `None` for a source id means the source has no copy of the dataset; an
/// empty string marks it as intentionally unsupported. `om_id` additionally
/// distinguishes a key that is absent from the table entry altogether
/// (`None`) from one that is present but null (`Some(None)`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetRecord {
    /// ModelScope dataset id.
    #[serde(default)]
    pub ms_id: Option<String>,

    /// OpenMind dataset id.
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub om_id: Option<Option<String>>,

    /// Hugging Face dataset id.
    #[serde(default)]
    pub hf_id: Option<String>,

    /// Relative path of the dataset under the cache root.
    pub local: String,
}

impl DatasetRecord {
    /// Creates a record that only knows its local path.
    pub fn local(local: impl Into<String>) -> Self {
        Self {
            ms_id: None,
            om_id: None,
            hf_id: None,
            local: local.into(),
        }
    }

    /// Sets the ModelScope id.
    pub fn with_ms_id(mut self, id: impl Into<String>) -> Self {
        self.ms_id = Some(id.into());
        self
    }

    /// Sets the OpenMind id (the key becomes present).
    pub fn with_om_id(mut self, id: impl Into<String>) -> Self {
        self.om_id = Some(Some(id.into()));
        self
    }

    /// Sets the Hugging Face id.
    pub fn with_hf_id(mut self, id: impl Into<String>) -> Self {
        self.hf_id = Some(id.into());
        self
    }
}

// A present-but-null field deserializes to `Some(None)`; `#[serde(default)]`
// covers the missing-key case.
fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// Download location and checksum of a dataset archive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveRecord {
    /// HTTP(S) URL of the archive.
    pub url: String,

    /// Expected MD5 of the archive, lowercase hex.
    pub md5: String,
}

impl ArchiveRecord {
    pub fn new(url: impl Into<String>, md5: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            md5: md5.into(),
        }
    }
}

/// Dataset identifier -> [`DatasetRecord`].
///
/// Inserting an identifier twice keeps the last record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatasetRegistry {
    records: BTreeMap<String, DatasetRecord>,
}

impl DatasetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, identifier: impl Into<String>, record: DatasetRecord) {
        self.records.insert(identifier.into(), record);
    }

    pub fn get(&self, identifier: &str) -> Option<&DatasetRecord> {
        self.records.get(identifier)
    }

    /// Looks up `identifier`, failing with [`LocatorError::UnknownDataset`].
    pub fn lookup(&self, identifier: &str) -> Result<&DatasetRecord, LocatorError> {
        self.records
            .get(identifier)
            .ok_or_else(|| LocatorError::UnknownDataset(identifier.to_string()))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DatasetRecord)> {
        self.records.iter().map(|(id, record)| (id.as_str(), record))
    }
}

impl<K: Into<String>> FromIterator<(K, DatasetRecord)> for DatasetRegistry {
    fn from_iter<I: IntoIterator<Item = (K, DatasetRecord)>>(iter: I) -> Self {
        let mut registry = Self::new();
        for (identifier, record) in iter {
            registry.insert(identifier, record);
        }
        registry
    }
}

/// Relative dataset path -> [`ArchiveRecord`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArchiveTable {
    entries: BTreeMap<String, ArchiveRecord>,
}

impl ArchiveTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, record: ArchiveRecord) {
        self.entries.insert(key.into(), record);
    }

    pub fn get(&self, key: &str) -> Option<&ArchiveRecord> {
        self.entries.get(key)
    }

    /// Merges `other` into this table; entries of `other` replace existing ones.
    pub fn merge(&mut self, other: ArchiveTable) {
        self.entries.extend(other.entries);
    }

    /// Finds the archive entry for a relative dataset path.
    ///
    /// Exact matches on [`keys::candidate_keys`] are tried in order first.
    /// Failing that, the longest key that occurs inside `path`, once trimmed
    /// of leading and trailing `/` and `.`, wins. Ties go to the
    /// lexicographically smallest key.
    pub fn find(&self, path: &str) -> Option<(&str, &ArchiveRecord)> {
        for candidate in keys::candidate_keys(path) {
            if let Some((key, record)) = self.entries.get_key_value(candidate.as_str()) {
                return Some((key.as_str(), record));
            }
        }

        let mut best: Option<(usize, &String, &ArchiveRecord)> = None;
        for (key, record) in &self.entries {
            let Some(weight) = keys::containment_match(key, path) else {
                continue;
            };
            if best.map_or(true, |(best_weight, _, _)| weight > best_weight) {
                best = Some((weight, key, record));
            }
        }
        best.map(|(_, key, record)| (key.as_str(), record))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArchiveRecord)> {
        self.entries.iter().map(|(key, record)| (key.as_str(), record))
    }
}

impl<K: Into<String>> FromIterator<(K, ArchiveRecord)> for ArchiveTable {
    fn from_iter<I: IntoIterator<Item = (K, ArchiveRecord)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (key, record) in iter {
            table.insert(key, record);
        }
        table
    }
}
