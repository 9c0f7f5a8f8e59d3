//! Static lookup tables consumed by the locator.
//!
//! Two tables drive resolution, both maintained outside this crate:
//!
//! - the **dataset registry**, mapping a logical dataset identifier to its
//!   per-source ids and its relative path under the cache root;
//! - the **archive table**, mapping a relative dataset path to the URL and
//!   MD5 checksum of the archive that materializes it.
//!
//! Both are loaded once and handed to [`crate::locator::DatasetLocator`] as
//! immutable data.
//!
//! # Example
//!
//! ```
//! use compass_data::tables::{ArchiveRecord, ArchiveTable, DatasetRecord, DatasetRegistry};
//!
//! let mut registry = DatasetRegistry::new();
//! registry.insert("opencompass/gsm8k", DatasetRecord::local("./data/gsm8k/"));
//!
//! let mut archives = ArchiveTable::new();
//! archives.insert(
//!     "/gsm8k/",
//!     ArchiveRecord::new(
//!         "http://example.com/gsm8k.zip",
//!         "d41d8cd98f00b204e9800998ecf8427e",
//!     ),
//! );
//!
//! let (key, _) = archives.find("./data/gsm8k/").expect("archive entry");
//! assert_eq!(key, "/gsm8k/");
//! ```

pub mod io;
mod keys;
mod model;

pub use keys::{candidate_keys, containment_match};
pub use model::{ArchiveRecord, ArchiveTable, DatasetRecord, DatasetRegistry};
