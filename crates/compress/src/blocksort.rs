//! Block-sorting (bzip2-style) compressor with a hard uncompressed chunk
//! limit that must be hit exactly to keep each part within the codec's
//! block size.

use std::io::Write as _;

use bzip2::Compression;
use bzip2::write::{BzDecoder, BzEncoder};

use crate::common::CountingWriter;
use crate::error::CompressError;
use crate::part::{CompressedPart, PartKind};

const KIND_NAME: &str = "bzip2";

/// Computes the hard uncompressed-byte limit for a given bzip2 block-size
/// level (`1..=9`, corresponding to 100 KiB .. 900 KiB blocks).
///
/// The `- 50` fudge matches the reference encoder's own block-size
/// accounting, which reserves a small margin so the final compressed block
/// never straddles the nominal size exactly.
#[must_use]
pub const fn chunk_limit_for_level(level: u32) -> usize {
    100_000 * level as usize - 50
}

/// Block-sort codec configuration. Cheap to construct; holds no stream state.
#[derive(Clone, Copy, Debug)]
pub struct BlockSort {
    level: u32,
    chunk_limit: usize,
}

impl BlockSort {
    /// Creates a block-sort codec at the given level (`1..=9`).
    ///
    /// # Errors
    ///
    /// Returns [`CompressError::LevelOutOfRange`] if `level` is not in `1..=9`.
    pub fn new(level: u32) -> Result<Self, CompressError> {
        if !(1..=9).contains(&level) {
            return Err(CompressError::LevelOutOfRange {
                level,
                min: 1,
                max: 9,
            });
        }
        Ok(Self {
            level,
            chunk_limit: chunk_limit_for_level(level),
        })
    }

    /// The codec kind tag this compressor frames its parts with.
    #[must_use]
    pub const fn kind(&self) -> PartKind {
        PartKind::Bzip
    }

    /// Hard uncompressed chunk limit for this codec's level.
    #[must_use]
    pub const fn chunk_limit(&self) -> usize {
        self.chunk_limit
    }

    /// Block-sort imposes a hard boundary: every chunk but the last must be
    /// exactly [`Self::chunk_limit`] bytes.
    #[must_use]
    pub const fn hard_limit(&self) -> bool {
        true
    }

    /// Compresses one complete chunk into a self-contained part.
    ///
    /// # Errors
    ///
    /// Returns [`CompressError::ChunkTooLarge`] if `data` exceeds the hard
    /// block limit, or [`CompressError::Codec`] if the underlying bzip2
    /// stream fails.
    pub fn compress_chunk(&self, data: &[u8]) -> Result<CompressedPart, CompressError> {
        if data.len() > self.chunk_limit {
            return Err(CompressError::ChunkTooLarge {
                len: data.len(),
                limit: self.chunk_limit,
                kind: KIND_NAME,
            });
        }
        let sink = CountingWriter::new(Vec::with_capacity(data.len() / 2));
        let mut encoder = BzEncoder::new(sink, Compression::new(self.level));
        encoder.write_all(data)?;
        let sink = encoder.finish()?;
        let (compressed, _) = sink.into_parts();
        Ok(CompressedPart::new(self.kind(), data.len() as u64, compressed))
    }
}

/// Decompresses a single part produced by [`BlockSort::compress_chunk`].
///
/// # Errors
///
/// Returns [`CompressError::Codec`] if `compressed` is not a well-formed
/// bzip2 stream.
pub fn decompress_chunk(compressed: &[u8]) -> Result<Vec<u8>, CompressError> {
    let mut decoder = BzDecoder::new(Vec::new());
    decoder.write_all(compressed)?;
    Ok(decoder.finish()?)
}
