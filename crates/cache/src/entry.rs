use crate::error::{CacheError, MalformedRecordReason};

/// Byte offset of the 4-byte `lastAccess` field within a stored record.
pub const ACCESS_OFFSET: usize = 0;
/// Byte offset of the 4-byte `mtime` field within a stored record.
pub const MTIME_OFFSET: usize = 4;
/// Byte offset of the 6-byte `size` field within a stored record.
pub const SIZE_OFFSET: usize = 8;
/// Byte offset at which the opaque, caller-defined payload begins.
pub const USER_DATA_OFFSET: usize = 14;

/// One on-disk cache record: the fixed header `(lastAccess, mtime, size)`
/// plus an opaque payload that `jigdo-summary` fills in with block digests.
///
/// All multi-byte fields are little-endian and byte-packed; there is no
/// struct padding, because the bytes are the portable on-disk format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    last_access: u32,
    mtime: u32,
    size: u64,
    payload: Vec<u8>,
}

impl CacheEntry {
    /// Builds a new entry, stamping `lastAccess` to `now`.
    pub fn new(now: u32, mtime: u32, size: u64, payload: Vec<u8>) -> Self {
        Self {
            last_access: now,
            mtime,
            size,
            payload,
        }
    }

    /// Unix time of the last hit or write.
    pub fn last_access(&self) -> u32 {
        self.last_access
    }

    /// `mtime` of the candidate file when it was summarized.
    pub fn mtime(&self) -> u32 {
        self.mtime
    }

    /// `size` of the candidate file when it was summarized.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// The opaque payload (`jigdo-summary`'s serialized `FileSummary`).
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Consumes the entry, returning just the payload bytes.
    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }

    /// Serializes the entry to its fixed-layout on-disk representation.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(USER_DATA_OFFSET + self.payload.len());
        out.extend_from_slice(&self.last_access.to_le_bytes());
        out.extend_from_slice(&self.mtime.to_le_bytes());
        out.extend_from_slice(&encode_u48_le(self.size));
        out.extend_from_slice(&self.payload);
        out
    }

    /// Parses a record previously produced by [`Self::encode`].
    pub fn decode(bytes: &[u8]) -> Result<Self, CacheError> {
        if bytes.len() < USER_DATA_OFFSET {
            return Err(CacheError::MalformedRecord(
                MalformedRecordReason::TooShortForHeader,
            ));
        }
        let last_access = u32::from_le_bytes(bytes[ACCESS_OFFSET..ACCESS_OFFSET + 4].try_into().unwrap());
        let mtime = u32::from_le_bytes(bytes[MTIME_OFFSET..MTIME_OFFSET + 4].try_into().unwrap());
        let size = decode_u48_le(&bytes[SIZE_OFFSET..SIZE_OFFSET + 6]);
        let payload = bytes[USER_DATA_OFFSET..].to_vec();
        Ok(Self {
            last_access,
            mtime,
            size,
            payload,
        })
    }

    /// Returns a copy of `self` with `lastAccess` replaced; used to bump the
    /// access time on a cache hit without touching `mtime`, `size` or the
    /// payload.
    pub fn with_last_access(&self, now: u32) -> Self {
        Self {
            last_access: now,
            ..self.clone()
        }
    }
}

fn encode_u48_le(value: u64) -> [u8; 6] {
    let bytes = value.to_le_bytes();
    [bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5]]
}

fn decode_u48_le(bytes: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    buf[..6].copy_from_slice(bytes);
    u64::from_le_bytes(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_encode_decode() {
        let entry = CacheEntry::new(1_700_000_000, 1_699_999_000, 123_456_789, vec![1, 2, 3, 4]);
        let bytes = entry.encode();
        let decoded = CacheEntry::decode(&bytes).unwrap();
        assert_eq!(entry, decoded);
    }

    #[test]
    fn size_field_is_six_bytes_wide() {
        let max_u48 = (1u64 << 48) - 1;
        let entry = CacheEntry::new(0, 0, max_u48, vec![]);
        let bytes = entry.encode();
        assert_eq!(&bytes[SIZE_OFFSET..SIZE_OFFSET + 6], &[0xFF; 6]);
        assert_eq!(CacheEntry::decode(&bytes).unwrap().size(), max_u48);
    }

    #[test]
    fn empty_payload_round_trips() {
        let entry = CacheEntry::new(5, 6, 7, Vec::new());
        let decoded = CacheEntry::decode(&entry.encode()).unwrap();
        assert!(decoded.payload().is_empty());
    }

    #[test]
    fn decode_rejects_truncated_header() {
        let short = vec![0u8; USER_DATA_OFFSET - 1];
        assert!(CacheEntry::decode(&short).is_err());
    }

    #[test]
    fn with_last_access_preserves_other_fields() {
        let entry = CacheEntry::new(1, 2, 3, vec![9, 9]);
        let bumped = entry.with_last_access(42);
        assert_eq!(bumped.last_access(), 42);
        assert_eq!(bumped.mtime(), entry.mtime());
        assert_eq!(bumped.size(), entry.size());
        assert_eq!(bumped.payload(), entry.payload());
    }
}
