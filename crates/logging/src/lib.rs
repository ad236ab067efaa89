#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `jigdo_logging` gates the ambient structured logging emitted by the
//! matcher and cache: a small [`Verbosity`] facade over `tracing`'s level
//! filter, plus named event helpers for each decision point so call sites
//! read as domain events instead of ad hoc format strings.
//!
//! # Design
//!
//! This crate depends on nothing from the rest of the workspace: it is the
//! leaf every other crate logs through. [`init`] installs one process-global
//! `tracing` subscriber; [`events`] holds the named wrappers.
//!
//! # See also
//!
//! - `jigdo-matching` for the candidate-lifecycle events this crate names.
//! - `jigdo-cache`/`jigdo-summary` for the cache hit/miss events.

mod events;
mod init;
mod verbosity;

pub use events::{
    backpressure_eviction, block_confirmed, cache_hit, cache_miss, candidate_excluded, candidate_promoted,
    match_confirmed, match_outranked, match_rejected,
};
pub use init::init;
pub use verbosity::Verbosity;
