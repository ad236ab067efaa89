#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `jigdo_matching` is the streaming engine that walks an image byte by
//! byte, probes a [`jigdo_summary::CandidateIndex`] with the rolling
//! checksum of the current window, and emits a lazy sequence of
//! [`MatchEvent`]s: literal runs and confirmed matches against candidate
//! files.
//!
//! # Design
//!
//! Three pieces cooperate:
//!
//! - [`PartialMatch`] tracks one tentative alignment between the image and
//!   a candidate file: a block digest in progress and a whole-file digest
//!   in progress, plus the offset at which its next block boundary falls.
//! - [`PartialMatchQueue`] holds every live `PartialMatch`, capped at
//!   `maxMatches`, ordered so the next one due for a block check is found
//!   in `O(log n)`.
//! - [`Matcher`] drives the main loop: slide the window, probe the index,
//!   extend live matches, check due completions, arbitrate overlapping
//!   confirmations, commit safe literal bytes, and apply backpressure.
//!
//! Overlap arbitration is deferred rather than immediate: a match that
//! completes all its blocks is held in a pending-confirmed list until no
//! other still-live or still-pending match overlapping its range could
//! still outrank it (smaller start offset, then larger candidate size,
//! then leafname order). This is what lets a longer candidate win over a
//! shorter one that happens to be a byte-for-byte prefix of it, even
//! though the shorter one's last block completes first.
//!
//! # See also
//!
//! - `jigdo-template` consumes the emitted [`MatchEvent`]s to build a
//!   template's literal and match records.

mod error;
mod event;
mod matcher;
mod partial_match;
mod queue;

pub use error::MatchingError;
pub use event::MatchEvent;
pub use matcher::{MatchParams, Matcher};
pub use partial_match::{MatchRank, MatchStatus, PartialMatch};
pub use queue::PartialMatchQueue;
