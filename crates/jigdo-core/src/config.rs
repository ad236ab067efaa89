use std::path::PathBuf;

use jigdo_compress::blocksort::BlockSort;
use jigdo_compress::deflate::{CompressionLevel, Deflate, DEFAULT_CHUNK_LIMIT};
use jigdo_compress::error::CompressError;
use jigdo_template::Codec;

/// Default rolling-window length (spec default).
pub const DEFAULT_W: u32 = 1024;
/// Default strong-block length (spec default).
pub const DEFAULT_B: u32 = 65536;
/// Default cap on live partial matches (spec default).
pub const DEFAULT_MAX_MATCHES: usize = 1000;

/// Which codec to compress literal runs with, and at what level.
#[derive(Debug, Clone, Copy)]
pub enum CompressionChoice {
    /// Zlib-backed, soft chunk boundary. `level` is `0..=9`.
    Deflate {
        /// Zlib compression level, `0..=9`.
        level: u32,
    },
    /// Bzip2-backed, hard chunk boundary. `level` is `1..=9`.
    BlockSort {
        /// Bzip2 block-size level, `1..=9`.
        level: u32,
    },
}

/// Invalid build parameters, rejected before any I/O happens (spec §7,
/// `ConfigError`).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The rolling window must not exceed the strong-block length, or a
    /// block boundary could fall before a candidate's window is seeded.
    #[error("rolling window W={w} must not exceed block length B={b}")]
    WindowExceedsBlock {
        /// Configured rolling-window length.
        w: u32,
        /// Configured strong-block length.
        b: u32,
    },
    /// The live partial-match queue must hold at least one entry.
    #[error("MAX_MATCHES must be at least 1")]
    ZeroMaxMatches,
    /// `BUFFER_LIMIT` must be at least as large as `W`, or even a
    /// single-candidate window can never be safely buffered.
    #[error("BUFFER_LIMIT={buffer_limit} is smaller than the rolling window W={w}")]
    BufferSmallerThanWindow {
        /// Configured pending-literal buffer bound.
        buffer_limit: usize,
        /// Configured rolling-window length.
        w: u32,
    },
    /// The chosen compression level was rejected by the codec.
    #[error("invalid compression level: {0}")]
    CompressionLevel(#[from] CompressError),
    /// A candidate file is larger than `BUFFER_LIMIT` and can never be
    /// matched; rejected before any scanning begins rather than silently
    /// excluded later.
    #[error("candidate {leafname:?} is {size} bytes, larger than BUFFER_LIMIT={buffer_limit}")]
    CandidateExceedsBufferLimit {
        /// Identity of the oversize candidate.
        leafname: String,
        /// Its size in bytes.
        size: u64,
        /// The configured `BUFFER_LIMIT`.
        buffer_limit: usize,
    },
}

/// Build-wide parameters, validated once at construction (spec §6/§9).
///
/// `BUFFER_LIMIT` is deliberately an explicit, required field rather than an
/// inferred constant: the caller must size it to at least the largest
/// candidate file's size, or that candidate can never be matched. A
/// candidate that exceeds it is rejected at startup (see
/// `prescan::build_candidate_index`) rather than silently missed.
#[derive(Debug, Clone, Copy)]
pub struct BuildConfig {
    w: u32,
    b: u32,
    max_matches: usize,
    buffer_limit: usize,
    codec: Codec,
}

impl BuildConfig {
    /// Validates and builds a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `w > b`, `max_matches == 0`,
    /// `buffer_limit < w`, or `compression`'s level is out of range for its
    /// codec.
    pub fn new(
        w: u32,
        b: u32,
        max_matches: usize,
        buffer_limit: usize,
        compression: CompressionChoice,
    ) -> Result<Self, ConfigError> {
        if w > b {
            return Err(ConfigError::WindowExceedsBlock { w, b });
        }
        if max_matches == 0 {
            return Err(ConfigError::ZeroMaxMatches);
        }
        if (buffer_limit as u64) < u64::from(w) {
            return Err(ConfigError::BufferSmallerThanWindow { buffer_limit, w });
        }
        let codec = match compression {
            CompressionChoice::Deflate { level } => {
                Codec::Deflate(Deflate::new(CompressionLevel::from_numeric(level)?, DEFAULT_CHUNK_LIMIT))
            }
            CompressionChoice::BlockSort { level } => Codec::BlockSort(BlockSort::new(level)?),
        };
        Ok(Self {
            w,
            b,
            max_matches,
            buffer_limit,
            codec,
        })
    }

    /// Rolling-window length.
    #[must_use]
    pub const fn w(&self) -> u32 {
        self.w
    }

    /// Strong-block length.
    #[must_use]
    pub const fn b(&self) -> u32 {
        self.b
    }

    /// Cap on live partial matches.
    #[must_use]
    pub const fn max_matches(&self) -> usize {
        self.max_matches
    }

    /// Bound on undecided image bytes held in memory.
    #[must_use]
    pub const fn buffer_limit(&self) -> usize {
        self.buffer_limit
    }

    /// The resolved codec literal runs are compressed with.
    #[must_use]
    pub const fn codec(&self) -> Codec {
        self.codec
    }
}

/// On-disk cache location and expiry policy. `path` of `None` disables
/// caching entirely: every `FileSummary` is recomputed from scratch.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    path: Option<PathBuf>,
    expiry_secs: u32,
}

impl CacheConfig {
    /// Caches at `path`, expiring entries untouched for `expiry_secs`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, expiry_secs: u32) -> Self {
        Self {
            path: Some(path.into()),
            expiry_secs,
        }
    }

    /// Disables caching.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            path: None,
            expiry_secs: 0,
        }
    }

    /// Cache file path, if caching is enabled.
    #[must_use]
    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }

    /// Seconds an untouched entry survives before [`jigdo_cache::CacheStore::expire`].
    #[must_use]
    pub const fn expiry_secs(&self) -> u32 {
        self.expiry_secs
    }

    /// Opens the cache store, if one is configured.
    ///
    /// [`jigdo_cache::CacheStore::open`] already recreates an empty store on
    /// internal corruption, so the only way this returns `None` for an
    /// enabled path is a lower-level failure (permissions, disk full); that
    /// is reported through `on_warning` and treated as "run uncached" rather
    /// than aborting the build.
    pub fn open(&self, mut on_warning: impl FnMut(&jigdo_cache::CacheError)) -> Option<jigdo_cache::CacheStore> {
        let path = self.path.as_ref()?;
        match jigdo_cache::CacheStore::open(path) {
            Ok(store) => Some(store),
            Err(err) => {
                on_warning(&err);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Result<BuildConfig, ConfigError> {
        BuildConfig::new(1024, 65536, 1000, 1 << 20, CompressionChoice::Deflate { level: 6 })
    }

    #[test]
    fn accepts_spec_defaults() {
        assert!(valid().is_ok());
    }

    #[test]
    fn rejects_window_larger_than_block() {
        let err = BuildConfig::new(70000, 65536, 1000, 1 << 20, CompressionChoice::Deflate { level: 6 });
        assert!(matches!(err, Err(ConfigError::WindowExceedsBlock { .. })));
    }

    #[test]
    fn rejects_zero_max_matches() {
        let err = BuildConfig::new(1024, 65536, 0, 1 << 20, CompressionChoice::Deflate { level: 6 });
        assert!(matches!(err, Err(ConfigError::ZeroMaxMatches)));
    }

    #[test]
    fn rejects_buffer_smaller_than_window() {
        let err = BuildConfig::new(1024, 65536, 1000, 100, CompressionChoice::Deflate { level: 6 });
        assert!(matches!(err, Err(ConfigError::BufferSmallerThanWindow { .. })));
    }

    #[test]
    fn rejects_out_of_range_deflate_level() {
        let err = BuildConfig::new(1024, 65536, 1000, 1 << 20, CompressionChoice::Deflate { level: 99 });
        assert!(matches!(err, Err(ConfigError::CompressionLevel(_))));
    }

    #[test]
    fn rejects_out_of_range_blocksort_level() {
        let err = BuildConfig::new(1024, 65536, 1000, 1 << 20, CompressionChoice::BlockSort { level: 0 });
        assert!(matches!(err, Err(ConfigError::CompressionLevel(_))));
    }

    #[test]
    fn cache_config_disabled_has_no_path() {
        assert!(CacheConfig::disabled().path().is_none());
    }

    #[test]
    fn cache_config_disabled_open_returns_none_without_warning() {
        let mut warned = false;
        let store = CacheConfig::disabled().open(|_| warned = true);
        assert!(store.is_none());
        assert!(!warned);
    }

    #[test]
    fn cache_config_enabled_open_succeeds_for_a_fresh_path() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = CacheConfig::new(dir.path().join("cache.db"), 3600);
        let mut warned = false;
        let store = cfg.open(|_| warned = true);
        assert!(store.is_some());
        assert!(!warned);
    }
}
