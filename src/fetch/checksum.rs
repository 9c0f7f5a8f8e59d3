//! MD5 verification of downloaded archives.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use md5::{Digest, Md5};

use crate::error::TransferError;

/// Computes the lowercase hex MD5 of a file, streaming its contents.
pub fn md5_file(path: &Path) -> Result<String, TransferError> {
    let io_err = |source| TransferError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(io_err)?;
    let mut reader = BufReader::new(file);
    let mut hasher = Md5::new();
    io::copy(&mut reader, &mut hasher).map_err(io_err)?;

    Ok(hex::encode(hasher.finalize()))
}

/// Verifies that the file at `path` hashes to `expected` (case-insensitive).
pub fn verify_md5(path: &Path, expected: &str) -> Result<(), TransferError> {
    let actual = md5_file(path)?;
    if actual.eq_ignore_ascii_case(expected.trim()) {
        Ok(())
    } else {
        Err(TransferError::ChecksumMismatch {
            path: path.to_path_buf(),
            expected: expected.to_string(),
            actual,
        })
    }
}

/// Returns true if `value` is a 32-character lowercase hexadecimal digest.
pub fn is_md5_hex(value: &str) -> bool {
    value.len() == 32 && value.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn md5_of_known_content() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("empty.bin");
        std::fs::write(&path, b"").expect("write");
        assert_eq!(
            md5_file(&path).expect("hash"),
            "d41d8cd98f00b204e9800998ecf8427e"
        );

        std::fs::write(&path, b"hello world").expect("write");
        verify_md5(&path, "5EB63BBBE01EEED093CB22BB8F5ACDC3").expect("uppercase accepted");
    }

    #[test]
    fn mismatch_reports_both_digests() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("data.bin");
        std::fs::write(&path, b"hello world").expect("write");

        match verify_md5(&path, "d41d8cd98f00b204e9800998ecf8427e").expect_err("mismatch") {
            TransferError::ChecksumMismatch {
                expected, actual, ..
            } => {
                assert_eq!(expected, "d41d8cd98f00b204e9800998ecf8427e");
                assert_eq!(actual, "5eb63bbbe01eeed093cb22bb8f5acdc3");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn md5_hex_format() {
        assert!(is_md5_hex("09b7e06e6f98c5cca8ad597b3d7b42f0"));
        assert!(!is_md5_hex("09B7E06E6F98C5CCA8AD597B3D7B42F0"));
        assert!(!is_md5_hex("fake_md5"));
        assert!(!is_md5_hex(""));
    }
}
