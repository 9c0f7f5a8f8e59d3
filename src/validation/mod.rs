//! Lookup table validation.
//!
//! Checks the dataset registry and the archive table for entries that would
//! make resolution or download fail:
//! - Registry integrity (non-empty relative `local` paths)
//! - Archive integrity (http(s) URLs, well-formed MD5 checksums)
//! - Coverage (every registered dataset has a matching archive entry)

mod report;

pub use report::{IssueCode, IssueContext, Severity, ValidationIssue, ValidationReport};

use crate::fetch::checksum::is_md5_hex;
use crate::tables::{ArchiveTable, DatasetRegistry};

/// Options for validation behavior.
#[derive(Clone, Debug, Default)]
pub struct ValidateOptions {
    /// If true, treat warnings as errors.
    pub strict: bool,

    /// If true, report registered datasets that have no archive entry.
    pub check_coverage: bool,
}

/// Validates both tables and returns a report of all issues found.
pub fn validate_tables(
    registry: &DatasetRegistry,
    archives: &ArchiveTable,
    opts: &ValidateOptions,
) -> ValidationReport {
    let mut report = ValidationReport::new();

    validate_registry(registry, &mut report);
    validate_archives(archives, &mut report);

    if opts.check_coverage {
        validate_coverage(registry, archives, &mut report);
    }

    report
}

/// Validates all records of the registry.
fn validate_registry(registry: &DatasetRegistry, report: &mut ValidationReport) {
    for (identifier, record) in registry.iter() {
        let context = || IssueContext::Dataset {
            identifier: identifier.to_string(),
        };

        if record.local.trim().is_empty() {
            report.add(ValidationIssue::error(
                IssueCode::EmptyLocalPath,
                "local path is empty",
                context(),
            ));
        } else if record.local.starts_with('/') {
            report.add(ValidationIssue::error(
                IssueCode::AbsoluteLocalPath,
                format!(
                    "local path '{}' is absolute and would bypass the cache root",
                    record.local
                ),
                context(),
            ));
        }

        let om_id = record.om_id.as_ref().and_then(|id| id.as_deref());
        for (field, value) in [
            ("ms_id", record.ms_id.as_deref()),
            ("om_id", om_id),
            ("hf_id", record.hf_id.as_deref()),
        ] {
            if value == Some("") {
                report.add(ValidationIssue::warning(
                    IssueCode::EmptySourceId,
                    format!("{} is an empty string (unsupported by that source)", field),
                    context(),
                ));
            }
        }
    }
}

/// Validates all entries of the archive table.
fn validate_archives(archives: &ArchiveTable, report: &mut ValidationReport) {
    for (key, record) in archives.iter() {
        let context = || IssueContext::Archive {
            key: key.to_string(),
        };

        if key.trim_matches(|c| c == '/' || c == '.').is_empty() {
            report.add(ValidationIssue::error(
                IssueCode::EmptyArchiveKey,
                "archive key does not name a path",
                context(),
            ));
        }

        match url::Url::parse(&record.url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => report.add(ValidationIssue::error(
                IssueCode::InvalidArchiveUrl,
                format!("url '{}' uses unsupported scheme '{}'", record.url, url.scheme()),
                context(),
            )),
            Err(err) => report.add(ValidationIssue::error(
                IssueCode::InvalidArchiveUrl,
                format!("url '{}' is invalid: {}", record.url, err),
                context(),
            )),
        }

        if !is_md5_hex(&record.md5) {
            report.add(ValidationIssue::error(
                IssueCode::InvalidMd5,
                format!(
                    "md5 '{}' is not 32 lowercase hexadecimal characters",
                    record.md5
                ),
                context(),
            ));
        }
    }
}

/// Reports registered datasets that no archive entry can materialize.
fn validate_coverage(
    registry: &DatasetRegistry,
    archives: &ArchiveTable,
    report: &mut ValidationReport,
) {
    for (identifier, record) in registry.iter() {
        if record.local.trim().is_empty() {
            continue;
        }
        if archives.find(&record.local).is_none() {
            report.add(ValidationIssue::warning(
                IssueCode::NoArchiveForDataset,
                format!("no archive entry matches local path '{}'", record.local),
                IssueContext::Dataset {
                    identifier: identifier.to_string(),
                },
            ));
        }
    }
}
