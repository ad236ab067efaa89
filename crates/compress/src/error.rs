//! Error types returned by the compressor back-ends.

use thiserror::Error;

/// Errors raised while compressing or decompressing a template part.
#[derive(Debug, Error)]
pub enum CompressError {
    /// The requested compression level is outside the codec's accepted range.
    #[error("compression level {level} is out of range {min}..={max}")]
    LevelOutOfRange {
        /// The rejected level.
        level: u32,
        /// Minimum accepted level, inclusive.
        min: u32,
        /// Maximum accepted level, inclusive.
        max: u32,
    },
    /// The underlying codec reported an I/O failure while compressing.
    #[error("compression failed: {0}")]
    Codec(#[from] std::io::Error),
    /// A chunk exceeded the codec's hard uncompressed-size limit.
    #[error("chunk of {len} bytes exceeds the hard {limit}-byte block limit for {kind}")]
    ChunkTooLarge {
        /// Size of the offending chunk, in bytes.
        len: usize,
        /// The codec's hard limit, in bytes.
        limit: usize,
        /// Name of the codec that rejected the chunk.
        kind: &'static str,
    },
}
