//! Locator configuration and the preferred-source selector.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::warn;

use crate::error::LocatorError;

/// Environment variable naming the cache root.
pub const CACHE_ENV: &str = "COMPASS_DATA_CACHE";

/// Environment variable selecting the preferred remote source.
pub const SOURCE_ENV: &str = "DATASET_SOURCE";

/// File name of the user-local archive table override, under the home directory.
pub const OVERRIDE_FILE_NAME: &str = ".OPENCOMPASS_INTERNAL_DATA_URL.json";

/// Cache root and default data folder, relative to the home directory.
pub const DEFAULT_CACHE_SUBDIR: &str = ".cache/opencompass";

/// Subdirectory of the cache root that archives are extracted into.
///
/// Archives carry the dataset directory at their top level (`gsm8k/...`)
/// while registry paths start with `data/` (`./data/gsm8k/`).
pub const DEFAULT_ARCHIVE_SUBDIR: &str = "data";

/// Remote dataset registry preferred over the local cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DatasetSource {
    ModelScope,
    OpenMind,
    HuggingFace,
}

impl DatasetSource {
    /// Human-readable registry name used in error messages.
    pub fn display_name(self) -> &'static str {
        match self {
            DatasetSource::ModelScope => "ModelScope",
            DatasetSource::OpenMind => "OpenMind",
            DatasetSource::HuggingFace => "HuggingFace",
        }
    }

    /// The selector value that chooses this source.
    pub fn selector(self) -> &'static str {
        match self {
            DatasetSource::ModelScope => "ModelScope",
            DatasetSource::OpenMind => "OpenMind",
            DatasetSource::HuggingFace => "HF",
        }
    }

    /// Interprets a selector value; unrecognized values select no source.
    pub fn from_selector(value: Option<&str>) -> Option<Self> {
        let value = value?.trim();
        if value.is_empty() {
            return None;
        }
        match value.parse() {
            Ok(source) => Some(source),
            Err(_) => {
                warn!(
                    selector = value,
                    "unrecognized {} value, using the local cache",
                    SOURCE_ENV
                );
                None
            }
        }
    }
}

impl FromStr for DatasetSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ModelScope" => Ok(DatasetSource::ModelScope),
            "OpenMind" => Ok(DatasetSource::OpenMind),
            "HF" => Ok(DatasetSource::HuggingFace),
            other => Err(format!(
                "unknown dataset source '{other}' (expected ModelScope, OpenMind or HF)"
            )),
        }
    }
}

impl fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.selector())
    }
}

/// Where the locator looks for and materializes datasets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocatorConfig {
    /// Directory downloaded datasets are materialized under.
    pub cache_root: PathBuf,

    /// Directory that may already hold pre-extracted datasets.
    pub default_data_folder: PathBuf,

    /// Subdirectory of the cache root that archives are extracted into.
    pub archive_subdir: PathBuf,

    /// User-local archive table override; `None` disables it.
    pub override_file: Option<PathBuf>,

    /// Preferred remote source, if any.
    pub source: Option<DatasetSource>,
}

impl LocatorConfig {
    /// Default layout for a user whose home directory is `home`.
    pub fn for_home(home: &Path) -> Self {
        let default_root = home.join(DEFAULT_CACHE_SUBDIR);
        Self {
            cache_root: default_root.clone(),
            default_data_folder: default_root,
            archive_subdir: PathBuf::from(DEFAULT_ARCHIVE_SUBDIR),
            override_file: Some(home.join(OVERRIDE_FILE_NAME)),
            source: None,
        }
    }

    /// Builds the configuration from the process environment.
    ///
    /// # Errors
    /// Fails if the home directory cannot be determined.
    pub fn from_env() -> Result<Self, LocatorError> {
        let home = home_dir().ok_or(LocatorError::NoHomeDir)?;
        Ok(Self::from_vars(
            &home,
            std::env::var(CACHE_ENV).ok().as_deref(),
            std::env::var(SOURCE_ENV).ok().as_deref(),
        ))
    }

    /// Builds the configuration from explicit variable values.
    ///
    /// An empty cache value counts as unset.
    pub fn from_vars(home: &Path, cache_root: Option<&str>, source: Option<&str>) -> Self {
        let mut config = Self::for_home(home);
        if let Some(root) = cache_root.filter(|root| !root.is_empty()) {
            config.cache_root = PathBuf::from(root);
        }
        config.source = DatasetSource::from_selector(source);
        config
    }

    pub fn with_cache_root(mut self, cache_root: impl Into<PathBuf>) -> Self {
        self.cache_root = cache_root.into();
        self
    }

    pub fn with_default_data_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.default_data_folder = folder.into();
        self
    }

    pub fn with_archive_subdir(mut self, subdir: impl Into<PathBuf>) -> Self {
        self.archive_subdir = subdir.into();
        self
    }

    pub fn with_override_file(mut self, path: Option<PathBuf>) -> Self {
        self.override_file = path;
        self
    }

    pub fn with_source(mut self, source: Option<DatasetSource>) -> Self {
        self.source = source;
        self
    }
}

/// The current user's home directory.
pub fn home_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_values_are_exact() {
        assert_eq!(
            DatasetSource::from_selector(Some("ModelScope")),
            Some(DatasetSource::ModelScope)
        );
        assert_eq!(
            DatasetSource::from_selector(Some("OpenMind")),
            Some(DatasetSource::OpenMind)
        );
        assert_eq!(
            DatasetSource::from_selector(Some("HF")),
            Some(DatasetSource::HuggingFace)
        );
        assert_eq!(DatasetSource::from_selector(Some("hf")), None);
        assert_eq!(DatasetSource::from_selector(Some("")), None);
        assert_eq!(DatasetSource::from_selector(None), None);
    }

    #[test]
    fn selector_round_trips_through_display() {
        for source in [
            DatasetSource::ModelScope,
            DatasetSource::OpenMind,
            DatasetSource::HuggingFace,
        ] {
            assert_eq!(source.to_string().parse::<DatasetSource>(), Ok(source));
        }
    }

    #[test]
    fn defaults_live_under_home() {
        let config = LocatorConfig::for_home(Path::new("/home/ada"));
        assert_eq!(config.cache_root, Path::new("/home/ada/.cache/opencompass"));
        assert_eq!(config.default_data_folder, config.cache_root);
        assert_eq!(config.archive_subdir, Path::new("data"));
        assert_eq!(
            config.override_file.as_deref(),
            Some(Path::new("/home/ada/.OPENCOMPASS_INTERNAL_DATA_URL.json"))
        );
        assert_eq!(config.source, None);
    }

    #[test]
    fn vars_override_cache_root_and_source() {
        let config =
            LocatorConfig::from_vars(Path::new("/home/ada"), Some("/data/cache"), Some("HF"));
        assert_eq!(config.cache_root, Path::new("/data/cache"));
        assert_eq!(config.default_data_folder, Path::new("/home/ada/.cache/opencompass"));
        assert_eq!(config.source, Some(DatasetSource::HuggingFace));

        let config = LocatorConfig::from_vars(Path::new("/home/ada"), Some(""), Some("nope"));
        assert_eq!(config.cache_root, Path::new("/home/ada/.cache/opencompass"));
        assert_eq!(config.source, None);
    }
}
