use std::path::Path;

use crate::entry::CacheEntry;
use crate::error::CacheError;

/// Identifier stamped into a fresh cache file so a foreign or
/// incompatible-version file is detected rather than silently misread.
pub const FORMAT_ID: &str = "jigdo filecache v0";

const FORMAT_KEY: &[u8] = b"__jigdo_filecache_format__";
const ENTRIES_TREE: &str = "entries";

/// Persistent, leafname-keyed cache of per-file summaries.
///
/// Backed by an embedded B-tree ([`sled`]). A single process writes; readers
/// observe either the pre- or post-state of a given key, never a torn
/// record, which `sled` guarantees for us.
pub struct CacheStore {
    db: sled::Db,
    entries: sled::Tree,
}

impl CacheStore {
    /// Opens the cache at `path`, creating it if absent. A file from an
    /// incompatible prior version, or one that fails to open at all, is
    /// warned about and replaced with a fresh empty cache rather than
    /// failing the build.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CacheError> {
        let path = path.as_ref();
        match Self::open_existing(path) {
            Ok(store) => Ok(store),
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "cache file unreadable or from an incompatible version, recreating empty"
                );
                let _ = std::fs::remove_dir_all(path);
                Self::create_fresh(path)
            }
        }
    }

    fn open_existing(path: &Path) -> Result<Self, CacheError> {
        let db = sled::open(path)?;
        let entries = db.open_tree(ENTRIES_TREE)?;
        match db.get(FORMAT_KEY)? {
            Some(stamped) if stamped.as_ref() == FORMAT_ID.as_bytes() => Ok(Self { db, entries }),
            Some(_) => Err(CacheError::Store(sled::Error::Unsupported(
                "cache format identifier does not match this version".to_string(),
            ))),
            None if db.is_empty() && entries.is_empty() => {
                db.insert(FORMAT_KEY, FORMAT_ID.as_bytes())?;
                Ok(Self { db, entries })
            }
            None => Err(CacheError::Store(sled::Error::Unsupported(
                "cache file is missing its format identifier".to_string(),
            ))),
        }
    }

    fn create_fresh(path: &Path) -> Result<Self, CacheError> {
        let db = sled::open(path)?;
        let entries = db.open_tree(ENTRIES_TREE)?;
        db.insert(FORMAT_KEY, FORMAT_ID.as_bytes())?;
        Ok(Self { db, entries })
    }

    /// Looks up `leafname`, returning its payload iff an entry exists and
    /// its stored `(mtime, size)` equal the supplied values. On a hit,
    /// `lastAccess` is bumped to `now` in place.
    pub fn find(
        &self,
        leafname: &str,
        size: u64,
        mtime: u32,
        now: u32,
    ) -> Result<Option<Vec<u8>>, CacheError> {
        let Some(raw) = self.entries.get(leafname.as_bytes())? else {
            jigdo_logging::cache_miss(leafname);
            return Ok(None);
        };
        let entry = match CacheEntry::decode(&raw) {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(leafname, error = %err, "dropping malformed cache record");
                jigdo_logging::cache_miss(leafname);
                return Ok(None);
            }
        };
        if entry.mtime() != mtime || entry.size() != size {
            jigdo_logging::cache_miss(leafname);
            return Ok(None);
        }
        let bumped = entry.with_last_access(now);
        self.entries.insert(leafname.as_bytes(), bumped.encode())?;
        jigdo_logging::cache_hit(leafname);
        Ok(Some(bumped.into_payload()))
    }

    /// Overwrites any existing entry for `leafname`, stamping
    /// `lastAccess = now`.
    pub fn insert(
        &self,
        leafname: &str,
        payload: Vec<u8>,
        size: u64,
        mtime: u32,
        now: u32,
    ) -> Result<(), CacheError> {
        let entry = CacheEntry::new(now, mtime, size, payload);
        self.entries.insert(leafname.as_bytes(), entry.encode())?;
        Ok(())
    }

    /// Deletes every entry whose `lastAccess` is older than `max_age`
    /// seconds relative to `now`. The comparison is tolerant of 32-bit
    /// wraparound: `signedDiff = i32(now) - i32(lastAccess)`, expire iff
    /// `signedDiff > max_age`.
    pub fn expire(&self, now: u32, max_age: u32) -> Result<usize, CacheError> {
        let mut expired = 0usize;
        for item in self.entries.iter() {
            let (key, raw) = item?;
            let Ok(entry) = CacheEntry::decode(&raw) else {
                self.entries.remove(&key)?;
                expired += 1;
                continue;
            };
            let signed_diff = (now as i32).wrapping_sub(entry.last_access() as i32);
            if signed_diff > max_age as i32 {
                self.entries.remove(&key)?;
                expired += 1;
            }
        }
        Ok(expired)
    }

    /// Number of entries currently stored, mostly useful for tests.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache currently holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flushes pending writes to disk.
    pub fn flush(&self) -> Result<(), CacheError> {
        self.db.flush()?;
        Ok(())
    }
}
