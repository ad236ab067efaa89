#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `jigdo_cache` is the persistent, leafname-keyed store of per-candidate
//! summaries described in spec §4.3. It knows nothing about rolling
//! checksums or block digests; it stores and retrieves opaque payload bytes
//! under a fixed `(lastAccess, mtime, size)` header, and leaves the payload's
//! internal shape to `jigdo-summary`.
//!
//! # Design
//!
//! - [`CacheEntry`] is the fixed on-disk layout: a 14-byte header followed
//!   by the opaque payload.
//! - [`CacheStore`] wraps an embedded B-tree ([`sled`]) keyed by leafname and
//!   implements lookup-with-validation, insert-or-replace, and
//!   wraparound-tolerant time-based expiry.
//!
//! # Errors
//!
//! [`CacheError`] covers I/O and corruption from the underlying store plus
//! malformed records. None of these are fatal: [`CacheStore::open`] recovers
//! by recreating an empty cache, and [`CacheStore::find`] treats a malformed
//! record as a miss.
//!
//! # Examples
//!
//! ```
//! use jigdo_cache::CacheStore;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let store = CacheStore::open(dir.path().join("cache.db")).unwrap();
//!
//! store.insert("image.iso", vec![1, 2, 3], 4096, 1_700_000_000, 1_700_000_100).unwrap();
//! assert_eq!(
//!     store.find("image.iso", 4096, 1_700_000_000, 1_700_000_200).unwrap(),
//!     Some(vec![1, 2, 3]),
//! );
//! ```
//!
//! # See also
//!
//! - `jigdo-summary` for the payload format stored under each key.

mod entry;
mod error;
mod store;

pub use entry::{CacheEntry, ACCESS_OFFSET, MTIME_OFFSET, SIZE_OFFSET, USER_DATA_OFFSET};
pub use error::{CacheError, MalformedRecordReason};
pub use store::{CacheStore, FORMAT_ID};
