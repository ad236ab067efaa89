//! Rolling checksum used to cheaply recognize candidate file starts while
//! scanning an image byte-by-byte.
//!
//! # Algorithm
//!
//! Two running sums, `s1` and `s2`, are maintained over the bytes currently
//! in the window; `s2` weights each byte by its distance from the end of the
//! window. Both sums admit an O(1) update when the window slides forward by
//! one byte, without rescanning the window.
//!
//! # Example
//!
//! ```rust
//! use jigdo_checksums::RollingSum;
//!
//! let mut rolling = RollingSum::init(b"hello").unwrap();
//!
//! // Slide window: remove 'h', add '!'
//! rolling.slide(b'h', b'!').unwrap();
//! ```

mod checksum;
mod error;

pub use checksum::RollingSum;
pub use error::RollingError;
