#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `jigdo_core` is the orchestration facade other crates in this workspace
//! exist to serve: it validates build parameters, summarizes candidate
//! files, and streams an image through the matcher into a finished
//! template.
//!
//! # Design
//!
//! - [`BuildConfig`]/[`CacheConfig`] validate parameters once, up front, so
//!   [`build_template`] never has to second-guess them mid-run.
//! - [`prescan::build_candidate_index`] summarizes every candidate in
//!   parallel and assembles the rolling-checksum index the matcher probes.
//! - [`build_template`] wires a digesting reader, [`jigdo_matching::Matcher`]
//!   and [`jigdo_template::TemplateWriter`] together into one streaming pass.
//! - [`BuildReporter`] carries progress/diagnostics callbacks out of the
//!   pipeline without threading a trait object through every call site.
//!
//! # Errors
//!
//! [`JigdoError`] is the taxonomy every public entry point in this crate
//! returns; see its variants for what is fatal versus what merely excludes
//! one candidate.
//!
//! # See also
//!
//! - `jigdo-matching` for the streaming matcher this crate drives.
//! - `jigdo-template` for the container format this crate writes.

mod build;
mod config;
mod error;
mod prescan;
mod reporter;

pub use build::build_template;
pub use config::{BuildConfig, CacheConfig, CompressionChoice, ConfigError, DEFAULT_B, DEFAULT_MAX_MATCHES, DEFAULT_W};
pub use error::JigdoError;
pub use prescan::{build_candidate_index, CandidateFile};
pub use reporter::BuildReporter;
