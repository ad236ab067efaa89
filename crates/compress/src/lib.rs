#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! Compression back-ends for the template container's `DATA`/`BZIP` parts.
//! Every part a codec produces is self-contained: the underlying stream is
//! freshly instantiated per chunk, so a reader can decompress any single
//! part without having seen the ones before it.
//!
//! # Design
//!
//! [`deflate::Deflate`] wraps [`flate2`](https://docs.rs/flate2) and treats
//! its chunk limit as a soft cap: callers flush once the buffered run
//! exceeds it. [`blocksort::BlockSort`] wraps
//! [`bzip2`](https://docs.rs/bzip2) and treats its limit as a hard cap
//! derived from the codec's own block size; every chunk but the last must
//! hit that limit exactly.
//!
//! # Errors
//!
//! Both codecs report failures through [`error::CompressError`].
//!
//! # Examples
//!
//! ```
//! use jigdo_compress::deflate::Deflate;
//!
//! # fn main() -> Result<(), jigdo_compress::error::CompressError> {
//! let codec = Deflate::with_default_level();
//! let part = codec.compress_chunk(b"streaming example payload")?;
//! assert!(part.uncompressed_len() > 0);
//! # Ok(())
//! # }
//! ```
//!
//! # See also
//!
//! - [`deflate`] for the zlib-backed codec.
//! - [`blocksort`] for the bzip2-backed codec.

pub mod blocksort;
mod common;
pub mod deflate;
pub mod error;
pub mod part;

pub use part::{CompressedPart, PartKind};
