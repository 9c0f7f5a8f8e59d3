use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info};

use super::checksum::verify_md5;
use super::extract::extract_archive;
use super::ArchiveFetcher;
use crate::error::TransferError;

/// Downloads archives over HTTP(S) with `ureq`.
///
/// The archive is streamed to a hidden `.part` file in the destination,
/// verified, renamed to its final name and then extracted in place.
#[derive(Clone)]
pub struct HttpArchiveFetcher {
    agent: ureq::Agent,
}

impl HttpArchiveFetcher {
    /// Creates a fetcher without a global timeout.
    pub fn new() -> Self {
        Self::with_timeout(None)
    }

    /// Creates a fetcher whose requests fail after `timeout` in total.
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(timeout)
            .build();
        Self {
            agent: config.into(),
        }
    }

    fn download(&self, url: &url::Url, target: &Path) -> Result<(), TransferError> {
        let mut response = self
            .agent
            .get(url.as_str())
            .call()
            .map_err(|source| TransferError::Http {
                url: url.to_string(),
                message: source.to_string(),
            })?;

        let io_err = |source| TransferError::Io {
            path: target.to_path_buf(),
            source,
        };

        let file = File::create(target).map_err(io_err)?;
        let mut writer = BufWriter::new(file);
        let mut reader = response.body_mut().as_reader();
        let bytes = io::copy(&mut reader, &mut writer).map_err(io_err)?;
        writer.flush().map_err(io_err)?;

        debug!(url = %url, bytes, "archive transferred");
        Ok(())
    }
}

impl Default for HttpArchiveFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveFetcher for HttpArchiveFetcher {
    fn fetch_and_extract(
        &self,
        url: &str,
        destination: &Path,
        md5: &str,
        remove_finished: bool,
    ) -> Result<(), TransferError> {
        let parsed = parse_archive_url(url)?;
        let file_name = archive_file_name(&parsed)?;

        fs::create_dir_all(destination).map_err(|source| TransferError::Io {
            path: destination.to_path_buf(),
            source,
        })?;

        let archive_path = destination.join(&file_name);
        let partial_path = partial_path(destination, &file_name);

        info!(url = %parsed, destination = %destination.display(), "downloading archive");
        let downloaded = self
            .download(&parsed, &partial_path)
            .and_then(|()| verify_md5(&partial_path, md5));
        if let Err(err) = downloaded {
            let _ = fs::remove_file(&partial_path);
            return Err(err);
        }

        fs::rename(&partial_path, &archive_path).map_err(|source| TransferError::Io {
            path: archive_path.clone(),
            source,
        })?;

        info!(archive = %archive_path.display(), "extracting archive");
        extract_archive(&archive_path, destination)?;

        if remove_finished {
            fs::remove_file(&archive_path).map_err(|source| TransferError::Io {
                path: archive_path.clone(),
                source,
            })?;
        }

        Ok(())
    }
}

/// Parses `url` and requires an `http` or `https` scheme.
pub(crate) fn parse_archive_url(url: &str) -> Result<url::Url, TransferError> {
    let parsed = url::Url::parse(url).map_err(|source| TransferError::InvalidUrl {
        url: url.to_string(),
        message: source.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(TransferError::InvalidUrl {
            url: url.to_string(),
            message: format!("expected an http or https url, found scheme '{other}'"),
        }),
    }
}

fn archive_file_name(url: &url::Url) -> Result<String, TransferError> {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .ok_or_else(|| TransferError::InvalidUrl {
            url: url.to_string(),
            message: "url path does not name an archive file".to_string(),
        })
}

fn partial_path(destination: &Path, file_name: &str) -> PathBuf {
    destination.join(format!(".{}.{}.part", file_name, std::process::id()))
}
