#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use compass_data::fetch::ArchiveFetcher;
use compass_data::locator::OVERRIDE_FILE_NAME;
use compass_data::{LocatorConfig, TransferError};

/// One invocation of the fetch-and-extract primitive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchCall {
    pub url: String,
    pub destination: PathBuf,
    pub md5: String,
    pub remove_finished: bool,
}

/// Fetcher that records its calls instead of touching the network.
#[derive(Default)]
pub struct RecordingFetcher {
    calls: Mutex<Vec<FetchCall>>,
    fail_with_mismatch: bool,
    materialize: Option<PathBuf>,
}

impl RecordingFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call fails with a checksum mismatch.
    pub fn failing() -> Self {
        Self {
            fail_with_mismatch: true,
            ..Self::default()
        }
    }

    /// Every call creates `path` (as an "extracted" file) before returning.
    pub fn materializing(path: PathBuf) -> Self {
        Self {
            materialize: Some(path),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<FetchCall> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("calls lock").len()
    }
}

impl ArchiveFetcher for RecordingFetcher {
    fn fetch_and_extract(
        &self,
        url: &str,
        destination: &Path,
        md5: &str,
        remove_finished: bool,
    ) -> Result<(), TransferError> {
        self.calls.lock().expect("calls lock").push(FetchCall {
            url: url.to_string(),
            destination: destination.to_path_buf(),
            md5: md5.to_string(),
            remove_finished,
        });

        if self.fail_with_mismatch {
            return Err(TransferError::ChecksumMismatch {
                path: destination.join("archive.zip"),
                expected: md5.to_string(),
                actual: "d41d8cd98f00b204e9800998ecf8427e".to_string(),
            });
        }

        if let Some(path) = &self.materialize {
            write_file(path, "downloaded content");
        }
        Ok(())
    }
}

/// A throwaway home directory with a cache root inside it.
pub struct TestHome {
    pub temp: tempfile::TempDir,
}

impl TestHome {
    pub fn new() -> Self {
        Self {
            temp: tempfile::tempdir().expect("tempdir"),
        }
    }

    pub fn home(&self) -> &Path {
        self.temp.path()
    }

    pub fn cache_root(&self) -> PathBuf {
        self.home().join("cache")
    }

    pub fn override_file(&self) -> PathBuf {
        self.home().join(OVERRIDE_FILE_NAME)
    }

    /// Default layout under this home, with the cache root moved to `cache/`.
    pub fn config(&self) -> LocatorConfig {
        LocatorConfig::for_home(self.home()).with_cache_root(self.cache_root())
    }
}

pub fn write_file(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, contents).expect("write file");
}
