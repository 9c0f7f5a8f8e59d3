//! Best-effort loading of the user-local archive table override.

use std::io::ErrorKind;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::tables::io::archive_table_from_json_str;
use crate::tables::ArchiveTable;

/// Reads the override file at `path`.
///
/// Returns `None` when the file is missing, unreadable or not a valid
/// archive table; those cases are logged and otherwise ignored.
pub fn load_override_table(path: &Path) -> Option<ArchiveTable> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "no archive override file");
            return None;
        }
        Err(err) => {
            warn!(
                path = %path.display(),
                error = %err,
                "ignoring unreadable archive override file"
            );
            return None;
        }
    };

    match archive_table_from_json_str(&contents) {
        Ok(table) => {
            info!(path = %path.display(), entries = table.len(), "loaded archive override file");
            Some(table)
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "ignoring invalid archive override file");
            None
        }
    }
}
