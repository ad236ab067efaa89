//! Deflate-backed compressor producing independently-decodable parts.
//!
//! Each part is a complete, self-delimiting zlib stream: the encoder is
//! instantiated fresh for every chunk and finished before the chunk's bytes
//! are handed back, so a reader holding only one part never needs state from
//! its neighbours to decompress it.

use std::io::Write as _;
use std::num::NonZeroU8;

use flate2::Compression;
use flate2::write::{ZlibDecoder, ZlibEncoder};

use crate::common::CountingWriter;
use crate::error::CompressError;
use crate::part::{CompressedPart, PartKind};

/// Default soft chunk boundary: flush once the buffered literal run exceeds
/// 256 KiB of uncompressed bytes.
pub const DEFAULT_CHUNK_LIMIT: usize = 256 * 1024;

/// Compression effort, mirroring zlib's 0..=9 level scale.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CompressionLevel {
    /// No compression, store only.
    None,
    /// Fastest, least thorough compression (zlib level 1).
    Fast,
    /// zlib's default trade-off (level 6).
    Default,
    /// Slowest, most thorough compression (level 9).
    Best,
    /// An exact level in 1..=9, for callers that need precise control.
    Precise(NonZeroU8),
}

impl CompressionLevel {
    /// Builds a level from a raw zlib value in `0..=9`.
    ///
    /// # Errors
    ///
    /// Returns [`CompressError::LevelOutOfRange`] if `level` is greater than 9.
    pub fn from_numeric(level: u32) -> Result<Self, CompressError> {
        match level {
            0 => Ok(Self::None),
            1 => Ok(Self::Fast),
            6 => Ok(Self::Default),
            9 => Ok(Self::Best),
            1..=9 => Ok(Self::Precise(
                NonZeroU8::new(level as u8).expect("non-zero checked by match arm"),
            )),
            _ => Err(CompressError::LevelOutOfRange {
                level,
                min: 0,
                max: 9,
            }),
        }
    }

    const fn as_u32(self) -> u32 {
        match self {
            Self::None => 0,
            Self::Fast => 1,
            Self::Default => 6,
            Self::Best => 9,
            Self::Precise(level) => level.get() as u32,
        }
    }
}

impl From<CompressionLevel> for Compression {
    fn from(level: CompressionLevel) -> Self {
        Compression::new(level.as_u32())
    }
}

/// Deflate codec configuration. Cheap to construct; holds no stream state.
#[derive(Clone, Copy, Debug)]
pub struct Deflate {
    level: CompressionLevel,
    chunk_limit: usize,
}

impl Deflate {
    /// Creates a deflate codec at the given level, flushing literal runs
    /// once they cross `chunk_limit` bytes.
    #[must_use]
    pub const fn new(level: CompressionLevel, chunk_limit: usize) -> Self {
        Self { level, chunk_limit }
    }

    /// Creates a deflate codec at [`CompressionLevel::Default`] with
    /// [`DEFAULT_CHUNK_LIMIT`].
    #[must_use]
    pub const fn with_default_level() -> Self {
        Self::new(CompressionLevel::Default, DEFAULT_CHUNK_LIMIT)
    }

    /// The codec kind tag this compressor frames its parts with.
    #[must_use]
    pub const fn kind(&self) -> PartKind {
        PartKind::Data
    }

    /// Soft chunk-size boundary: callers flush whenever the accumulated
    /// buffer *exceeds* this many bytes, not at an exact cut point.
    #[must_use]
    pub const fn chunk_limit(&self) -> usize {
        self.chunk_limit
    }

    /// Deflate imposes no hard boundary; the caller decides when to flush.
    #[must_use]
    pub const fn hard_limit(&self) -> bool {
        false
    }

    /// Compresses one complete chunk into a self-contained part.
    ///
    /// # Errors
    ///
    /// Returns [`CompressError::Codec`] if the underlying zlib stream fails.
    pub fn compress_chunk(&self, data: &[u8]) -> Result<CompressedPart, CompressError> {
        let sink = CountingWriter::new(Vec::with_capacity(data.len() / 2));
        let mut encoder = ZlibEncoder::new(sink, self.level.into());
        encoder.write_all(data)?;
        let sink = encoder.finish()?;
        let (compressed, _) = sink.into_parts();
        Ok(CompressedPart::new(self.kind(), data.len() as u64, compressed))
    }
}

/// Decompresses a single part produced by [`Deflate::compress_chunk`].
///
/// # Errors
///
/// Returns [`CompressError::Codec`] if `compressed` is not a well-formed
/// zlib stream.
pub fn decompress_chunk(compressed: &[u8]) -> Result<Vec<u8>, CompressError> {
    let mut decoder = ZlibDecoder::new(Vec::new());
    decoder.write_all(compressed)?;
    Ok(decoder.finish()?)
}
