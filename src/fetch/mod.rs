//! Fetch-and-extract primitive.
//!
//! The locator never talks to the network itself. It hands an archive URL,
//! a destination directory and the expected checksum to an
//! [`ArchiveFetcher`], which must transfer the archive, verify it, extract it
//! into the destination and optionally delete the archive afterwards.
//! [`HttpArchiveFetcher`] is the production implementation.

pub mod checksum;
pub mod extract;
mod http;

use std::path::Path;

pub use http::HttpArchiveFetcher;

use crate::error::TransferError;

/// Transfers, verifies and unpacks a dataset archive.
pub trait ArchiveFetcher {
    /// Downloads `url` into `destination`, checks it against `md5`, extracts
    /// it into `destination` and, when `remove_finished` is set, deletes the
    /// downloaded archive.
    ///
    /// # Errors
    /// Any transfer, checksum or extraction failure.
    fn fetch_and_extract(
        &self,
        url: &str,
        destination: &Path,
        md5: &str,
        remove_finished: bool,
    ) -> Result<(), TransferError>;
}

impl<F: ArchiveFetcher + ?Sized> ArchiveFetcher for &F {
    fn fetch_and_extract(
        &self,
        url: &str,
        destination: &Path,
        md5: &str,
        remove_finished: bool,
    ) -> Result<(), TransferError> {
        (**self).fetch_and_extract(url, destination, md5, remove_finished)
    }
}

impl<F: ArchiveFetcher + ?Sized> ArchiveFetcher for Box<F> {
    fn fetch_and_extract(
        &self,
        url: &str,
        destination: &Path,
        md5: &str,
        remove_finished: bool,
    ) -> Result<(), TransferError> {
        (**self).fetch_and_extract(url, destination, md5, remove_finished)
    }
}
