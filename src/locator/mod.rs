//! Dataset location resolution.
//!
//! [`DatasetLocator`] turns a logical dataset identifier into something a
//! dataset loader can open:
//!
//! - an identifier starting with `/` is already a location and is returned
//!   as is;
//! - with a preferred remote source selected, the record's id for that
//!   source is returned verbatim;
//! - otherwise the record's `local` path is joined onto the cache root and,
//!   if nothing is there yet, the dataset archive is downloaded, verified and
//!   extracted.
//!
//! # Re-downloads
//!
//! [`DatasetLocator::ensure_downloaded`] does not check whether
//! `cache_root / relative_path` already exists; [`DatasetLocator::resolve_path`]
//! does that before delegating. Calling `ensure_downloaded` directly always
//! downloads unless the default data folder already has the dataset.
//!
//! # Concurrency
//!
//! Nothing here coordinates between processes. Two processes resolving the
//! same missing dataset both download it and extract into the same
//! directory.

mod config;
mod overrides;

use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use tracing::{debug, info};

pub use config::{
    home_dir, DatasetSource, LocatorConfig, CACHE_ENV, DEFAULT_ARCHIVE_SUBDIR,
    DEFAULT_CACHE_SUBDIR, OVERRIDE_FILE_NAME, SOURCE_ENV,
};
pub use overrides::load_override_table;

use crate::error::LocatorError;
use crate::fetch::{ArchiveFetcher, HttpArchiveFetcher};
use crate::tables::{ArchiveTable, DatasetRegistry};

/// Outcome of [`DatasetLocator::resolve_path`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolvedLocation {
    /// A filesystem path (absolute identifier, cached or freshly downloaded).
    Path(PathBuf),
    /// An id to be handed to the selected remote source's loader.
    Remote { source: DatasetSource, id: String },
}

impl ResolvedLocation {
    /// The filesystem path, if this is one.
    pub fn path(&self) -> Option<&Path> {
        match self {
            ResolvedLocation::Path(path) => Some(path),
            ResolvedLocation::Remote { .. } => None,
        }
    }

    /// The remote id, if this is one.
    pub fn remote_id(&self) -> Option<&str> {
        match self {
            ResolvedLocation::Path(_) => None,
            ResolvedLocation::Remote { id, .. } => Some(id),
        }
    }
}

impl fmt::Display for ResolvedLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedLocation::Path(path) => write!(f, "{}", path.display()),
            ResolvedLocation::Remote { id, .. } => f.write_str(id),
        }
    }
}

/// Resolves dataset identifiers against injected lookup tables.
pub struct DatasetLocator<F = HttpArchiveFetcher> {
    registry: DatasetRegistry,
    archives: ArchiveTable,
    config: LocatorConfig,
    fetcher: F,
}

impl DatasetLocator<HttpArchiveFetcher> {
    /// Creates a locator that downloads over HTTP.
    pub fn new(registry: DatasetRegistry, archives: ArchiveTable, config: LocatorConfig) -> Self {
        Self::with_fetcher(registry, archives, config, HttpArchiveFetcher::new())
    }
}

impl<F: ArchiveFetcher> DatasetLocator<F> {
    /// Creates a locator with a custom fetch-and-extract primitive.
    pub fn with_fetcher(
        registry: DatasetRegistry,
        archives: ArchiveTable,
        config: LocatorConfig,
        fetcher: F,
    ) -> Self {
        Self {
            registry,
            archives,
            config,
            fetcher,
        }
    }

    pub fn config(&self) -> &LocatorConfig {
        &self.config
    }

    pub fn registry(&self) -> &DatasetRegistry {
        &self.registry
    }

    pub fn archives(&self) -> &ArchiveTable {
        &self.archives
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Resolves `identifier` to a location.
    ///
    /// With `local_mode` set the preferred source is ignored and the cache is
    /// always used.
    ///
    /// # Errors
    /// - [`LocatorError::UnknownDataset`] if the identifier is not registered
    /// - [`LocatorError::NotInSource`] if OpenMind is selected and the record
    ///   has no `om_id`
    /// - [`LocatorError::UnsupportedSource`] if the selected source's id is
    ///   null or empty
    /// - anything [`DatasetLocator::ensure_downloaded`] returns
    pub fn resolve_path(
        &self,
        identifier: &str,
        local_mode: bool,
    ) -> Result<ResolvedLocation, LocatorError> {
        if is_rooted(identifier) {
            return Ok(ResolvedLocation::Path(PathBuf::from(identifier)));
        }

        if local_mode {
            return self.resolve_cached(identifier).map(ResolvedLocation::Path);
        }

        let Some(source) = self.config.source else {
            return self.resolve_cached(identifier).map(ResolvedLocation::Path);
        };

        let record = self.registry.lookup(identifier)?;
        let id = match source {
            DatasetSource::ModelScope => record.ms_id.as_deref(),
            DatasetSource::HuggingFace => record.hf_id.as_deref(),
            DatasetSource::OpenMind => match &record.om_id {
                Some(id) => id.as_deref(),
                None => {
                    return Err(LocatorError::NotInSource {
                        identifier: identifier.to_string(),
                        source_name: source.display_name(),
                    })
                }
            },
        };

        match id.filter(|id| !id.is_empty()) {
            Some(id) => {
                debug!(identifier, source = %source, id, "resolved to remote id");
                Ok(ResolvedLocation::Remote {
                    source,
                    id: id.to_string(),
                })
            }
            None => Err(LocatorError::UnsupportedSource {
                identifier: identifier.to_string(),
                source_name: source.display_name(),
            }),
        }
    }

    /// Materializes `relative_path` under `cache_root`, removing the archive
    /// after extraction.
    ///
    /// See [`DatasetLocator::ensure_downloaded_with`].
    pub fn ensure_downloaded(
        &self,
        relative_path: &str,
        cache_root: &Path,
    ) -> Result<PathBuf, LocatorError> {
        self.ensure_downloaded_with(relative_path, cache_root, true)
    }

    /// Materializes `relative_path` under `cache_root`.
    ///
    /// Returns the default data folder's copy if it exists. Otherwise merges
    /// the user override file into the archive table, looks up the archive
    /// for `relative_path`, fetches and extracts it, and returns
    /// `cache_root / relative_path` without checking that it now exists.
    ///
    /// # Errors
    /// - [`LocatorError::NoArchiveUrl`] if no archive entry matches
    /// - [`LocatorError::Transfer`] if the fetch primitive fails
    pub fn ensure_downloaded_with(
        &self,
        relative_path: &str,
        cache_root: &Path,
        remove_archive_after_extract: bool,
    ) -> Result<PathBuf, LocatorError> {
        let shipped = self.config.default_data_folder.join(relative_path);
        if shipped.exists() {
            info!(path = %shipped.display(), "loading data from the default data folder");
            return Ok(shipped);
        }

        info!(
            "{} does not exist, downloading it; set {} to reuse previously downloaded data",
            relative_path, CACHE_ENV
        );

        let archives = self.effective_archive_table();
        let (key, archive) =
            archives
                .find(relative_path)
                .ok_or_else(|| LocatorError::NoArchiveUrl {
                    path: relative_path.to_string(),
                })?;
        debug!(path = relative_path, key, url = %archive.url, "matched archive entry");

        let destination = cache_root.join(&self.config.archive_subdir);
        self.fetcher.fetch_and_extract(
            &archive.url,
            &destination,
            &archive.md5,
            remove_archive_after_extract,
        )?;

        Ok(cache_root.join(relative_path))
    }

    fn resolve_cached(&self, identifier: &str) -> Result<PathBuf, LocatorError> {
        let record = self.registry.lookup(identifier)?;
        let cache_root = &self.config.cache_root;
        let candidate = cache_root.join(&record.local);
        if candidate.exists() {
            debug!(identifier, path = %candidate.display(), "found cached dataset");
            return Ok(candidate);
        }
        self.ensure_downloaded(&record.local, cache_root)
    }

    fn effective_archive_table(&self) -> Cow<'_, ArchiveTable> {
        let overrides = self
            .config
            .override_file
            .as_deref()
            .and_then(load_override_table);

        match overrides {
            Some(overrides) => {
                let mut merged = self.archives.clone();
                merged.merge(overrides);
                Cow::Owned(merged)
            }
            None => Cow::Borrowed(&self.archives),
        }
    }
}

fn is_rooted(identifier: &str) -> bool {
    identifier.starts_with('/') || identifier.starts_with(MAIN_SEPARATOR)
}
