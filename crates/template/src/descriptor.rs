//! The descriptor table: a sequence of fixed-shape entries recording how
//! the image was reconstructed, written as the final `DESC` part.
//!
//! Each entry starts with a 1-byte tag followed by its fields, little-endian
//! and byte-packed. There is no entry count prefix; the table is decoded by
//! reading entries until the bytes are exhausted.

use crate::error::TemplateError;

const TAG_IMAGE_INFO: u8 = 1;
const TAG_MATCHED_FILE: u8 = 2;
const TAG_WRITTEN_UNMATCHED: u8 = 3;

/// One record of the descriptor table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptorEntry {
    /// Declares the reconstructed image's total size, whole-file digest,
    /// and the block length used while matching it.
    ImageInfo {
        /// Total image size in bytes.
        size: u64,
        /// Whole-image strong digest.
        digest: [u8; 16],
        /// `B`, the strong-block length candidates were matched at.
        block_len: u32,
    },
    /// Records one confirmed match against a candidate file.
    MatchedFile {
        /// Offset in the image where the match begins.
        offset: u64,
        /// Size of the matched region (and of the candidate file).
        size: u64,
        /// Whole-file digest of the candidate.
        digest: [u8; 16],
        /// Rolling checksum of the candidate's leading window, for readers
        /// that want to re-locate the file without rehashing it.
        rsum0: u32,
    },
    /// Records a literal run written because no candidate covered it.
    WrittenUnmatched {
        /// Length of the literal run.
        size: u64,
        /// Strong digest of the literal run's bytes.
        digest: [u8; 16],
    },
}

impl DescriptorEntry {
    /// Serializes this entry, appending to `out`.
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        match self {
            Self::ImageInfo { size, digest, block_len } => {
                out.push(TAG_IMAGE_INFO);
                out.extend_from_slice(&size.to_le_bytes());
                out.extend_from_slice(digest);
                out.extend_from_slice(&block_len.to_le_bytes());
            }
            Self::MatchedFile { offset, size, digest, rsum0 } => {
                out.push(TAG_MATCHED_FILE);
                out.extend_from_slice(&offset.to_le_bytes());
                out.extend_from_slice(&size.to_le_bytes());
                out.extend_from_slice(digest);
                out.extend_from_slice(&rsum0.to_le_bytes());
            }
            Self::WrittenUnmatched { size, digest } => {
                out.push(TAG_WRITTEN_UNMATCHED);
                out.extend_from_slice(&size.to_le_bytes());
                out.extend_from_slice(digest);
            }
        }
    }

    /// Decodes one entry from the front of `bytes`, returning it along with
    /// the number of bytes consumed.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Malformed`] if the tag is unrecognized or
    /// `bytes` is too short for the tag's fixed fields.
    pub fn decode_one(bytes: &[u8]) -> Result<(Self, usize), TemplateError> {
        let &[tag, ref rest @ ..] = bytes else {
            return Err(TemplateError::Malformed("empty descriptor entry"));
        };
        match tag {
            TAG_IMAGE_INFO => {
                const LEN: usize = 8 + 16 + 4;
                if rest.len() < LEN {
                    return Err(TemplateError::Malformed("truncated IMAGE_INFO entry"));
                }
                let size = u64::from_le_bytes(rest[0..8].try_into().unwrap());
                let mut digest = [0u8; 16];
                digest.copy_from_slice(&rest[8..24]);
                let block_len = u32::from_le_bytes(rest[24..28].try_into().unwrap());
                Ok((Self::ImageInfo { size, digest, block_len }, 1 + LEN))
            }
            TAG_MATCHED_FILE => {
                const LEN: usize = 8 + 8 + 16 + 4;
                if rest.len() < LEN {
                    return Err(TemplateError::Malformed("truncated MATCHED_FILE entry"));
                }
                let offset = u64::from_le_bytes(rest[0..8].try_into().unwrap());
                let size = u64::from_le_bytes(rest[8..16].try_into().unwrap());
                let mut digest = [0u8; 16];
                digest.copy_from_slice(&rest[16..32]);
                let rsum0 = u32::from_le_bytes(rest[32..36].try_into().unwrap());
                Ok((
                    Self::MatchedFile { offset, size, digest, rsum0 },
                    1 + LEN,
                ))
            }
            TAG_WRITTEN_UNMATCHED => {
                const LEN: usize = 8 + 16;
                if rest.len() < LEN {
                    return Err(TemplateError::Malformed("truncated WRITTEN_UNMATCHED entry"));
                }
                let size = u64::from_le_bytes(rest[0..8].try_into().unwrap());
                let mut digest = [0u8; 16];
                digest.copy_from_slice(&rest[8..24]);
                Ok((Self::WrittenUnmatched { size, digest }, 1 + LEN))
            }
            _ => Err(TemplateError::Malformed("unrecognized descriptor tag")),
        }
    }
}

/// An ordered sequence of [`DescriptorEntry`] records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescriptorTable {
    entries: Vec<DescriptorEntry>,
}

impl DescriptorTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry.
    pub fn push(&mut self, entry: DescriptorEntry) {
        self.entries.push(entry);
    }

    /// The entries in order.
    #[must_use]
    pub fn entries(&self) -> &[DescriptorEntry] {
        &self.entries
    }

    /// Serializes every entry back to back.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for entry in &self.entries {
            entry.encode_into(&mut out);
        }
        out
    }

    /// Decodes a full table from `bytes`, reading entries until exhausted.
    ///
    /// # Errors
    ///
    /// Propagates any [`TemplateError::Malformed`] from a malformed entry.
    pub fn decode(mut bytes: &[u8]) -> Result<Self, TemplateError> {
        let mut entries = Vec::new();
        while !bytes.is_empty() {
            let (entry, consumed) = DescriptorEntry::decode_one(bytes)?;
            entries.push(entry);
            bytes = &bytes[consumed..];
        }
        Ok(Self { entries })
    }
}
