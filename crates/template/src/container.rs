//! The container's outer framing: the ASCII header line written first, and
//! the fixed trailer written last.

use crate::error::TemplateError;

const MAGIC: &[u8; 4] = b"DESC";
const TRAILER_LEN: usize = 4 + 6 + 16;

/// Template format version this writer produces.
pub const TEMPLATE_VERSION: &str = "3";

/// Builds the ASCII header line: `JigsawDownload template <ver>
/// <uncompressed-total-size>\n`.
#[must_use]
pub fn header_line(uncompressed_total_size: u64) -> String {
    format!("JigsawDownload template {TEMPLATE_VERSION} {uncompressed_total_size}\n")
}

/// Parses a header line previously written by [`header_line`].
///
/// # Errors
///
/// Returns [`TemplateError::Malformed`] if the line doesn't match the
/// expected shape.
pub fn parse_header_line(line: &str) -> Result<u64, TemplateError> {
    let rest = line
        .trim_end_matches('\n')
        .strip_prefix("JigsawDownload template ")
        .ok_or(TemplateError::Malformed("missing template header prefix"))?;
    let (version, size) = rest
        .split_once(' ')
        .ok_or(TemplateError::Malformed("malformed template header"))?;
    if version != TEMPLATE_VERSION {
        return Err(TemplateError::Malformed("unsupported template version"));
    }
    size.parse()
        .map_err(|_| TemplateError::Malformed("template header size is not a number"))
}

/// The fixed trailer following the final `DESC` part: a magic tag, the
/// length of that part, and the whole-image digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trailer {
    /// Length of the preceding `DESC` part, header included.
    pub desc_part_len: u64,
    /// Whole-image strong digest.
    pub image_digest: [u8; 16],
}

impl Trailer {
    /// Serializes the fixed trailer.
    #[must_use]
    pub fn encode(&self) -> [u8; TRAILER_LEN] {
        let mut out = Vec::with_capacity(TRAILER_LEN);
        out.extend_from_slice(MAGIC);
        out.extend_from_slice(&self.desc_part_len.to_le_bytes()[..6]);
        out.extend_from_slice(&self.image_digest);
        out.try_into().expect("fixed-size trailer buffer")
    }

    /// Parses a trailer previously written by [`Self::encode`].
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Malformed`] if the magic doesn't match or
    /// `bytes` is shorter than the trailer length.
    pub fn decode(bytes: &[u8]) -> Result<Self, TemplateError> {
        if bytes.len() < TRAILER_LEN {
            return Err(TemplateError::Malformed("trailer shorter than expected"));
        }
        if &bytes[0..4] != MAGIC {
            return Err(TemplateError::Malformed("trailer magic mismatch"));
        }
        let mut len_buf = [0u8; 8];
        len_buf[..6].copy_from_slice(&bytes[4..10]);
        let desc_part_len = u64::from_le_bytes(len_buf);
        let mut image_digest = [0u8; 16];
        image_digest.copy_from_slice(&bytes[10..26]);
        Ok(Self {
            desc_part_len,
            image_digest,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_line_round_trips() {
        let line = header_line(123_456_789);
        assert_eq!(parse_header_line(&line).unwrap(), 123_456_789);
    }

    #[test]
    fn header_line_rejects_wrong_version() {
        let bad = "JigsawDownload template 99 1000\n";
        assert!(parse_header_line(bad).is_err());
    }

    #[test]
    fn header_line_rejects_garbage() {
        assert!(parse_header_line("not a template header\n").is_err());
    }

    #[test]
    fn trailer_round_trips() {
        let trailer = Trailer {
            desc_part_len: 4096,
            image_digest: [7; 16],
        };
        assert_eq!(Trailer::decode(&trailer.encode()).unwrap(), trailer);
    }

    #[test]
    fn trailer_rejects_bad_magic() {
        let mut bytes = Trailer {
            desc_part_len: 10,
            image_digest: [0; 16],
        }
        .encode();
        bytes[0] = b'X';
        assert!(Trailer::decode(&bytes).is_err());
    }
}
