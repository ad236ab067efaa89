use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use jigdo_cache::CacheStore;
use jigdo_checksums::RollingSum;
use jigdo_checksums::strong::{Md5, StrongDigest};

use crate::error::SummaryError;
use crate::payload::SummaryPayload;

/// `ceil(size / block_len)`, the number of blocks a fully-digested file has.
#[must_use]
pub fn block_count_for(size: u64, block_len: u32) -> u64 {
    if block_len == 0 {
        return 0;
    }
    size.div_ceil(u64::from(block_len))
}

/// Per-candidate-file checksum record (spec §4.4).
///
/// Computation is lazy and cache-backed: [`Self::rsum0`] reads only the
/// leading window, [`Self::block_digest`] reads only the blocks it hasn't
/// seen yet, and [`Self::full_digest`] forces a single full-file pass. Each
/// method consults the cache first and writes back whatever new state it
/// computes.
pub struct FileSummary {
    path: PathBuf,
    leafname: String,
    size: u64,
    mtime: u32,
    w: u32,
    b: u32,
    rsum0: Option<RollingSum>,
    blocks: Vec<[u8; 16]>,
    full_digest: Option<[u8; 16]>,
    excluded: bool,
}

impl FileSummary {
    /// Creates a summary for `path`, identified by `leafname`/`size`/`mtime`.
    /// No I/O happens until one of the `*_digest`/`rsum0` accessors is
    /// called.
    pub fn new(path: impl Into<PathBuf>, leafname: String, size: u64, mtime: u32, w: u32, b: u32) -> Self {
        Self {
            path: path.into(),
            leafname,
            size,
            mtime,
            w,
            b,
            rsum0: None,
            blocks: Vec::new(),
            full_digest: None,
            excluded: false,
        }
    }

    /// Absolute path of the candidate file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stable identity key used to index the cache.
    pub fn leafname(&self) -> &str {
        &self.leafname
    }

    /// Size of the candidate file in bytes, as recorded at summary creation.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// `mtime` of the candidate file, as recorded at summary creation.
    pub fn mtime(&self) -> u32 {
        self.mtime
    }

    /// Whether an I/O error has excluded this file for the rest of the run.
    pub fn is_excluded(&self) -> bool {
        self.excluded
    }

    /// Marks this file excluded; any live `PartialMatch` depending on it
    /// must be rejected by the caller.
    pub fn mark_excluded(&mut self) {
        self.excluded = true;
    }

    fn window_len(&self) -> usize {
        self.w.min(u32::try_from(self.size).unwrap_or(u32::MAX) as u32) as usize
    }

    fn hydrate_from_cache(&mut self, cache: &CacheStore, now: u32) {
        let Ok(Some(raw)) = cache.find(&self.leafname, self.size, self.mtime, now) else {
            return;
        };
        let payload = match SummaryPayload::decode(&raw) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::warn!(leafname = %self.leafname, error = %err, "dropping malformed summary payload");
                return;
            }
        };
        if payload.w != self.w || payload.b != self.b {
            // Parameters changed since this entry was written; it cannot be
            // reused, start fresh.
            return;
        }
        self.rsum0 = Some(RollingSum::from_raw(
            payload.rsum0_s1,
            payload.rsum0_s2,
            self.window_len() as u32,
        ));
        self.blocks = payload.blocks;
        if self.blocks.len() as u64 == block_count_for(self.size, self.b) {
            self.full_digest = Some(payload.digest);
        }
    }

    fn write_back(&self, cache: &CacheStore, now: u32) {
        let Some(rsum0) = self.rsum0 else { return };
        let digest = if self.blocks.len() as u64 == block_count_for(self.size, self.b) {
            self.full_digest.unwrap_or([0; 16])
        } else {
            [0; 16]
        };
        let payload = SummaryPayload {
            w: self.w,
            b: self.b,
            rsum0_s1: rsum0.s1(),
            rsum0_s2: rsum0.s2(),
            digest,
            blocks: self.blocks.clone(),
        };
        if let Err(err) = cache.insert(&self.leafname, payload.encode(), self.size, self.mtime, now) {
            tracing::warn!(leafname = %self.leafname, error = %err, "failed to write summary cache entry");
        }
    }

    /// Returns the rolling checksum of the leading `min(W, size)` bytes,
    /// computing and caching it if necessary.
    pub fn rsum0(&mut self, cache: Option<&CacheStore>, now: u32) -> Result<RollingSum, SummaryError> {
        if let Some(rsum0) = self.rsum0 {
            return Ok(rsum0);
        }
        if let Some(cache) = cache {
            self.hydrate_from_cache(cache, now);
            if let Some(rsum0) = self.rsum0 {
                return Ok(rsum0);
            }
        }

        let window_len = self.window_len();
        let mut buf = vec![0u8; window_len];
        let mut file = File::open(&self.path)?;
        file.read_exact(&mut buf)?;
        let rsum0 = RollingSum::init(&buf).map_err(|_| {
            SummaryError::MalformedPayload("window length does not fit a rolling checksum")
        })?;
        self.rsum0 = Some(rsum0);

        if let Some(cache) = cache {
            self.write_back(cache, now);
        }
        Ok(rsum0)
    }

    /// Returns the strong digest of block `index`, extending cached state by
    /// reading only the blocks not already digested.
    pub fn block_digest(
        &mut self,
        index: usize,
        cache: Option<&CacheStore>,
        now: u32,
    ) -> Result<[u8; 16], SummaryError> {
        if self.rsum0.is_none() {
            self.rsum0(cache, now)?;
        }
        if let Some(digest) = self.blocks.get(index) {
            return Ok(*digest);
        }

        let mut file = File::open(&self.path)?;
        for block_index in self.blocks.len()..=index {
            let start = block_index as u64 * u64::from(self.b);
            let end = (start + u64::from(self.b)).min(self.size);
            let len = usize::try_from(end - start).unwrap_or(0);
            let mut buf = vec![0u8; len];
            file.seek(SeekFrom::Start(start))?;
            file.read_exact(&mut buf)?;
            self.blocks.push(Md5::digest(&buf));
        }

        if let Some(cache) = cache {
            self.write_back(cache, now);
        }
        Ok(self.blocks[index])
    }

    /// Forces digestion of the entire file and returns its whole-file
    /// digest, independent of how many block digests have been computed.
    pub fn full_digest(&mut self, cache: Option<&CacheStore>, now: u32) -> Result<[u8; 16], SummaryError> {
        if let Some(digest) = self.full_digest {
            return Ok(digest);
        }
        if self.rsum0.is_none() {
            if let Some(cache) = cache {
                self.hydrate_from_cache(cache, now);
            }
        }
        if let Some(digest) = self.full_digest {
            return Ok(digest);
        }

        let mut file = File::open(&self.path)?;
        let mut hasher = Md5::new();
        let mut buf = [0u8; 64 * 1024];
        loop {
            let n = file.read(&mut buf)?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
        }
        let digest = hasher.finalize();
        self.full_digest = Some(digest);

        if let Some(cache) = cache {
            self.write_back(cache, now);
        }
        Ok(digest)
    }

    /// Number of blocks already digested, without forcing any I/O.
    pub fn digested_block_count(&self) -> usize {
        self.blocks.len()
    }

    /// The full block count this file will have once completely digested.
    pub fn total_block_count(&self) -> u64 {
        block_count_for(self.size, self.b)
    }
}
