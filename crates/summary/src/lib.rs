#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `jigdo_summary` turns a candidate file into the checksum record the
//! matcher consumes: a rolling checksum of the leading window, a strong
//! digest per fixed-size block, and a whole-file strong digest. All three
//! are computed lazily and cached across runs.
//!
//! # Design
//!
//! - [`FileSummary`] owns one candidate file's lazy state and knows how to
//!   read/write its cache payload through `jigdo-cache`.
//! - [`SummaryPayload`] is the wire format of that payload, independent of
//!   `jigdo-cache`'s outer `(lastAccess, mtime, size)` header.
//! - [`CandidateIndex`] is the rolling-checksum-value multimap the matcher
//!   probes on every byte once the window is full.
//!
//! # Errors
//!
//! [`SummaryError::Io`] marks a candidate file *excluded* for the remainder
//! of the run: the caller should remove it from the [`CandidateIndex`] via
//! [`CandidateIndex::exclude`] and reject any `PartialMatch` depending on it.
//!
//! # See also
//!
//! - `jigdo-matching` for how `PartialMatch` holds a non-owning reference to
//!   a `FileSummary`.

mod candidate_index;
mod error;
mod file_summary;
mod payload;

pub use candidate_index::{CandidateIndex, SharedSummary};
pub use error::SummaryError;
pub use file_summary::{block_count_for, FileSummary};
pub use payload::SummaryPayload;
