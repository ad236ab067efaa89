//! Byte-level encoding of the part header framing each compressed chunk.
//!
//! Layout: 4-byte kind tag (`DATA`/`BZIP`), 6-byte total part length
//! (header + compressed payload, i.e. `compressed.len() + 16`), 6-byte
//! uncompressed length, followed by the compressed payload itself. All
//! integers are little-endian and byte-packed.

use jigdo_compress::part::PartKind;

use crate::error::TemplateError;

/// Size of the fixed part header in bytes.
pub const PART_HEADER_LEN: usize = 4 + 6 + 6;

fn write_u48_le(out: &mut Vec<u8>, value: u64) {
    out.extend_from_slice(&value.to_le_bytes()[..6]);
}

fn read_u48_le(bytes: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    buf[..6].copy_from_slice(bytes);
    u64::from_le_bytes(buf)
}

/// Decoded part header, as read from a template container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartHeader {
    /// Which codec produced the part.
    pub kind: PartKind,
    /// `header.len() + compressed.len()`.
    pub total_part_len: u64,
    /// Length of the chunk once decompressed.
    pub uncompressed_len: u64,
}

impl PartHeader {
    /// Builds the header for a part carrying `compressed_len` bytes of
    /// payload.
    #[must_use]
    pub fn for_part(kind: PartKind, compressed_len: u64, uncompressed_len: u64) -> Self {
        Self {
            kind,
            total_part_len: compressed_len + PART_HEADER_LEN as u64,
            uncompressed_len,
        }
    }

    /// Serializes the fixed 16-byte header.
    #[must_use]
    pub fn encode(&self) -> [u8; PART_HEADER_LEN] {
        let mut out = Vec::with_capacity(PART_HEADER_LEN);
        out.extend_from_slice(self.kind.tag());
        write_u48_le(&mut out, self.total_part_len);
        write_u48_le(&mut out, self.uncompressed_len);
        out.try_into().expect("fixed-size header buffer")
    }

    /// Parses a fixed 16-byte header previously written by [`Self::encode`].
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Malformed`] if the tag is neither `DATA` nor
    /// `BZIP`, or `bytes` is shorter than [`PART_HEADER_LEN`].
    pub fn decode(bytes: &[u8]) -> Result<Self, TemplateError> {
        if bytes.len() < PART_HEADER_LEN {
            return Err(TemplateError::Malformed("part header shorter than 16 bytes"));
        }
        let kind = match &bytes[0..4] {
            b"DATA" => PartKind::Data,
            b"BZIP" => PartKind::Bzip,
            _ => return Err(TemplateError::Malformed("unrecognized part kind tag")),
        };
        let total_part_len = read_u48_le(&bytes[4..10]);
        let uncompressed_len = read_u48_le(&bytes[10..16]);
        Ok(Self {
            kind,
            total_part_len,
            uncompressed_len,
        })
    }

    /// Length of the compressed payload following this header.
    #[must_use]
    pub fn compressed_len(&self) -> u64 {
        self.total_part_len - PART_HEADER_LEN as u64
    }
}
