#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `jigdo_checksums` provides the two checksum primitives the matcher builds
//! on: a cheap rolling checksum for recognizing candidate starts, and a
//! strong cryptographic digest for confirming them.
//!
//! # Design
//!
//! - [`rolling`] implements jigdo's additive/rotational weak checksum
//!   (`rsum0`), distinct from rsync's Adler-32 variant, used to key the
//!   candidate index.
//! - [`strong`] exposes the MD5 digest behind the [`strong::StrongDigest`]
//!   trait, which higher layers use to abstract over the digest
//!   implementation.
//!
//! # Invariants
//!
//! - `RollingSum` never panics; pushing or sliding a byte is pure arithmetic.
//! - Strong digests stream data incrementally and never panic; they surface
//!   failures through the standard digest traits.
//!
//! # Errors
//!
//! [`RollingError`] reports invalid rolling operations: sliding an empty
//! window, or a window whose length overflows `u32`.
//!
//! # Examples
//!
//! Compute a rolling checksum for a window and then slide it forward.
//!
//! ```
//! use jigdo_checksums::RollingSum;
//!
//! let mut rolling = RollingSum::init(b"abcd").unwrap();
//! assert_eq!(rolling.len(), 4);
//!
//! rolling.slide(b'a', b'e').unwrap();
//! assert_eq!(rolling.len(), 4);
//! ```
//!
//! Calculate a strong digest using the MD5 wrapper.
//!
//! ```
//! use jigdo_checksums::strong::Md5;
//!
//! let mut md5 = Md5::new();
//! md5.update(b"hello");
//! let digest = md5.finalize();
//! assert_eq!(
//!     digest,
//!     [
//!         0x5d, 0x41, 0x40, 0x2a, 0xbc, 0x4b, 0x2a, 0x76,
//!         0xb9, 0x71, 0x9d, 0x91, 0x10, 0x17, 0xc5, 0x92,
//!     ]
//! );
//! ```
//!
//! # See also
//!
//! - `jigdo-summary` for how both checksums compose into a per-file summary.
//! - `jigdo-matching` for the streaming consumer of [`RollingSum`].

mod rolling;
pub mod strong;

pub use rolling::{RollingError, RollingSum};
