use crate::error::SummaryError;

/// Decoded form of the opaque bytes `jigdo-cache` stores per leafname.
///
/// Layout: 4-byte `W`, 4-byte `B`, 4-byte `blockCount`, 8-byte `rsum0`
/// (`s1` then `s2`, each little-endian u32), 16-byte `digest` (meaningful
/// only when `blockCount` equals the live file's full block count), then
/// `blockCount * 16` bytes of per-block digests. All integers are
/// little-endian and byte-packed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryPayload {
    /// Rolling-window size in effect when this payload was written.
    pub w: u32,
    /// Strong-block size in effect when this payload was written.
    pub b: u32,
    /// `s1` half of the rolling checksum over the file's leading window.
    pub rsum0_s1: u32,
    /// `s2` half of the rolling checksum over the file's leading window.
    pub rsum0_s2: u32,
    /// Whole-file digest; only meaningful when every block has been
    /// digested (`blocks.len()` equals the file's full block count).
    pub digest: [u8; 16],
    /// Per-block digests computed so far, in block order.
    pub blocks: Vec<[u8; 16]>,
}

const HEADER_LEN: usize = 4 + 4 + 4 + 4 + 4 + 16;

impl SummaryPayload {
    /// Serializes the payload to its fixed-layout byte representation.
    pub fn encode(&self) -> Vec<u8> {
        let block_count = u32::try_from(self.blocks.len()).unwrap_or(u32::MAX);
        let mut out = Vec::with_capacity(HEADER_LEN + self.blocks.len() * 16);
        out.extend_from_slice(&self.w.to_le_bytes());
        out.extend_from_slice(&self.b.to_le_bytes());
        out.extend_from_slice(&block_count.to_le_bytes());
        out.extend_from_slice(&self.rsum0_s1.to_le_bytes());
        out.extend_from_slice(&self.rsum0_s2.to_le_bytes());
        out.extend_from_slice(&self.digest);
        for block in &self.blocks {
            out.extend_from_slice(block);
        }
        out
    }

    /// Parses a payload previously produced by [`Self::encode`].
    pub fn decode(bytes: &[u8]) -> Result<Self, SummaryError> {
        if bytes.len() < HEADER_LEN {
            return Err(SummaryError::MalformedPayload(
                "payload shorter than fixed header",
            ));
        }
        let w = u32::from_le_bytes(bytes[0..4].try_into().unwrap());
        let b = u32::from_le_bytes(bytes[4..8].try_into().unwrap());
        let block_count = u32::from_le_bytes(bytes[8..12].try_into().unwrap()) as usize;
        let rsum0_s1 = u32::from_le_bytes(bytes[12..16].try_into().unwrap());
        let rsum0_s2 = u32::from_le_bytes(bytes[16..20].try_into().unwrap());
        let mut digest = [0u8; 16];
        digest.copy_from_slice(&bytes[20..36]);

        let expected_len = HEADER_LEN + block_count * 16;
        if bytes.len() != expected_len {
            return Err(SummaryError::MalformedPayload(
                "payload length does not match declared block count",
            ));
        }
        let mut blocks = Vec::with_capacity(block_count);
        for i in 0..block_count {
            let start = HEADER_LEN + i * 16;
            let mut block = [0u8; 16];
            block.copy_from_slice(&bytes[start..start + 16]);
            blocks.push(block);
        }
        Ok(Self {
            w,
            b,
            rsum0_s1,
            rsum0_s2,
            digest,
            blocks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_with_no_blocks() {
        let payload = SummaryPayload {
            w: 1024,
            b: 65536,
            rsum0_s1: 11,
            rsum0_s2: 22,
            digest: [0; 16],
            blocks: vec![],
        };
        assert_eq!(SummaryPayload::decode(&payload.encode()).unwrap(), payload);
    }

    #[test]
    fn round_trips_with_blocks_and_digest() {
        let payload = SummaryPayload {
            w: 1024,
            b: 65536,
            rsum0_s1: 1,
            rsum0_s2: 2,
            digest: [9; 16],
            blocks: vec![[1; 16], [2; 16], [3; 16]],
        };
        assert_eq!(SummaryPayload::decode(&payload.encode()).unwrap(), payload);
    }

    #[test]
    fn decode_rejects_truncated_header() {
        assert!(SummaryPayload::decode(&[0u8; 10]).is_err());
    }

    #[test]
    fn decode_rejects_length_mismatch_against_block_count() {
        let payload = SummaryPayload {
            w: 1,
            b: 1,
            rsum0_s1: 0,
            rsum0_s2: 0,
            digest: [0; 16],
            blocks: vec![[0; 16]],
        };
        let mut bytes = payload.encode();
        bytes.pop();
        assert!(SummaryPayload::decode(&bytes).is_err());
    }
}
