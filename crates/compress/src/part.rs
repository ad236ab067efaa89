//! Types shared by every compressor back-end: the part framing unit that the
//! template container writes to disk.

use std::fmt;

/// Identifies which codec produced a [`CompressedPart`].
///
/// Mirrors the two part kinds the container format distinguishes in its
/// 4-byte part header: `DATA` for deflate-compressed parts and `BZIP` for
/// block-sorted parts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PartKind {
    /// Deflate-compressed part (raw zlib stream, no container-level framing).
    Data,
    /// Block-sorted (bzip2-style) compressed part.
    Bzip,
}

impl PartKind {
    /// The 4-byte tag this kind is framed with in the container.
    #[must_use]
    pub const fn tag(self) -> &'static [u8; 4] {
        match self {
            PartKind::Data => b"DATA",
            PartKind::Bzip => b"BZIP",
        }
    }
}

impl fmt::Display for PartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = self.tag();
        f.write_str(std::str::from_utf8(tag).unwrap_or("????"))
    }
}

/// One self-contained, independently-decodable compressed chunk.
///
/// Every part was produced by a codec that was reset (or freshly
/// instantiated) before compressing `uncompressed_len` bytes, so a reader
/// holding only this part's `compressed` bytes can recover the original
/// bytes without any state carried over from neighbouring parts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompressedPart {
    kind: PartKind,
    uncompressed_len: u64,
    compressed: Vec<u8>,
}

impl CompressedPart {
    pub(crate) const fn new(kind: PartKind, uncompressed_len: u64, compressed: Vec<u8>) -> Self {
        Self {
            kind,
            uncompressed_len,
            compressed,
        }
    }

    /// The codec that produced this part.
    #[must_use]
    pub const fn kind(&self) -> PartKind {
        self.kind
    }

    /// Length of the original, uncompressed chunk this part decodes to.
    #[must_use]
    pub const fn uncompressed_len(&self) -> u64 {
        self.uncompressed_len
    }

    /// The compressed bytes, ready to be framed and written to the container.
    #[must_use]
    pub fn compressed(&self) -> &[u8] {
        &self.compressed
    }

    /// Consumes the part, returning the compressed bytes.
    #[must_use]
    pub fn into_compressed(self) -> Vec<u8> {
        self.compressed
    }
}
