#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `jigdo_template` assembles the `.template` container: an ASCII header
//! line, a sequence of compressed literal parts and implicit matched
//! regions, and a trailing compressed descriptor table plus fixed trailer.
//!
//! # Design
//!
//! - [`writer::TemplateWriter`] consumes a [`jigdo_matching::MatchEvent`]
//!   stream and writes the container incrementally, never buffering more
//!   than one literal run or the final descriptor table in memory.
//! - [`codec::Codec`] unifies `jigdo-compress`'s `Deflate` and `BlockSort`
//!   behind one interface so the writer doesn't care which is configured.
//! - [`framing::PartHeader`] and [`container::Trailer`] are the container's
//!   fixed-size byte layouts; [`descriptor::DescriptorTable`] is the
//!   variable-length record sequence carried in the final part.
//! - [`digesting::DigestingReader`] lets a caller fold the whole image into
//!   a strong digest in the same pass that feeds the matcher, so the
//!   trailer's digest costs no second read of the image.
//!
//! # Errors
//!
//! [`error::TemplateError`] covers I/O failures writing the output sink,
//! codec failures, and malformed container data encountered while parsing.
//!
//! # See also
//!
//! - `jigdo-matching` for the event stream this crate consumes.
//! - `jigdo-compress` for the codecs this crate wraps.

mod codec;
mod container;
mod descriptor;
mod digesting;
mod error;
mod framing;
mod writer;

pub use codec::Codec;
pub use container::{header_line, parse_header_line, Trailer, TEMPLATE_VERSION};
pub use descriptor::{DescriptorEntry, DescriptorTable};
pub use digesting::DigestingReader;
pub use error::TemplateError;
pub use framing::{PartHeader, PART_HEADER_LEN};
pub use writer::TemplateWriter;
