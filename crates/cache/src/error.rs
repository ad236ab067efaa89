use std::fmt;

/// Errors raised while opening, reading or writing the cache.
///
/// None of these are fatal to a build: callers map [`CacheError`] to the
/// `CacheCorrupt`/`CacheIO` taxonomy and continue without caching the
/// affected entry.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The underlying embedded store reported an I/O or corruption error.
    #[error("cache store error: {0}")]
    Store(#[from] sled::Error),

    /// A stored record was shorter than the fixed header, or its declared
    /// payload length did not match the bytes actually stored.
    #[error("cache record is truncated or malformed: {0}")]
    MalformedRecord(MalformedRecordReason),
}

/// Why a stored record failed to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedRecordReason {
    /// Record is shorter than the 14-byte fixed header.
    TooShortForHeader,
}

impl fmt::Display for MalformedRecordReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShortForHeader => write!(f, "record shorter than the 14-byte fixed header"),
        }
    }
}
