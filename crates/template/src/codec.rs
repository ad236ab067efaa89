use jigdo_compress::blocksort::BlockSort;
use jigdo_compress::deflate::Deflate;
use jigdo_compress::error::CompressError;
use jigdo_compress::part::{CompressedPart, PartKind};

/// Which compression back-end a [`crate::writer::TemplateWriter`] uses for
/// its literal-run parts. Both back-ends produce self-contained parts; the
/// writer only needs their shared chunking contract.
#[derive(Clone, Copy, Debug)]
pub enum Codec {
    /// Zlib-backed, soft chunk boundary.
    Deflate(Deflate),
    /// Bzip2-backed, hard chunk boundary.
    BlockSort(BlockSort),
}

impl Codec {
    /// The part kind this codec tags its output with.
    #[must_use]
    pub const fn kind(&self) -> PartKind {
        match self {
            Self::Deflate(codec) => codec.kind(),
            Self::BlockSort(codec) => codec.kind(),
        }
    }

    /// The codec's chunk boundary, soft or hard depending on [`Self::hard_limit`].
    #[must_use]
    pub const fn chunk_limit(&self) -> usize {
        match self {
            Self::Deflate(codec) => codec.chunk_limit(),
            Self::BlockSort(codec) => codec.chunk_limit(),
        }
    }

    /// Whether chunks up to the last one must hit [`Self::chunk_limit`]
    /// exactly.
    #[must_use]
    pub const fn hard_limit(&self) -> bool {
        match self {
            Self::Deflate(codec) => codec.hard_limit(),
            Self::BlockSort(codec) => codec.hard_limit(),
        }
    }

    /// Compresses one chunk into a self-contained part.
    ///
    /// # Errors
    ///
    /// Propagates the underlying codec's [`CompressError`].
    pub fn compress_chunk(&self, data: &[u8]) -> Result<CompressedPart, CompressError> {
        match self {
            Self::Deflate(codec) => codec.compress_chunk(data),
            Self::BlockSort(codec) => codec.compress_chunk(data),
        }
    }
}
