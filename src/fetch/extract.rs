//! Archive extraction.
//!
//! The archive kind is chosen from the file name: `.zip`, `.tar`,
//! `.tar.gz`/`.tgz`, or a bare `.gz` which is decompressed next to itself.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use flate2::read::GzDecoder;

use crate::error::TransferError;

/// Kind of archive, derived from its file name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArchiveKind {
    Zip,
    Tar,
    TarGz,
    Gz,
}

impl ArchiveKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?.to_ascii_lowercase();
        if name.ends_with(".zip") {
            Some(ArchiveKind::Zip)
        } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Some(ArchiveKind::TarGz)
        } else if name.ends_with(".tar") {
            Some(ArchiveKind::Tar)
        } else if name.ends_with(".gz") {
            Some(ArchiveKind::Gz)
        } else {
            None
        }
    }
}

/// Extracts `archive` into `destination`.
pub fn extract_archive(archive: &Path, destination: &Path) -> Result<(), TransferError> {
    let kind = ArchiveKind::from_path(archive)
        .ok_or_else(|| TransferError::UnsupportedArchive(archive.to_path_buf()))?;

    let file = File::open(archive).map_err(|source| TransferError::Io {
        path: archive.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);

    let extract_err = |message: String| TransferError::Extract {
        path: archive.to_path_buf(),
        message,
    };

    match kind {
        ArchiveKind::Zip => {
            let mut zip = zip::ZipArchive::new(reader).map_err(|e| extract_err(e.to_string()))?;
            zip.extract(destination)
                .map_err(|e| extract_err(e.to_string()))
        }
        ArchiveKind::Tar => tar::Archive::new(reader)
            .unpack(destination)
            .map_err(|e| extract_err(e.to_string())),
        ArchiveKind::TarGz => tar::Archive::new(GzDecoder::new(reader))
            .unpack(destination)
            .map_err(|e| extract_err(e.to_string())),
        ArchiveKind::Gz => {
            let stem = archive
                .file_stem()
                .ok_or_else(|| TransferError::UnsupportedArchive(archive.to_path_buf()))?;
            let target = destination.join(stem);
            let mut out = File::create(&target).map_err(|source| TransferError::Io {
                path: target.clone(),
                source,
            })?;
            io::copy(&mut GzDecoder::new(reader), &mut out)
                .map(|_| ())
                .map_err(|e| extract_err(e.to_string()))
        }
    }
}
