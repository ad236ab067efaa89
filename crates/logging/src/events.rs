//! Structured `tracing` events for the matcher's and cache's decision
//! points. Each function is a thin, named wrapper around a `tracing` macro
//! call so call sites read as domain events rather than ad hoc format
//! strings, and so the field names stay consistent across call sites.

/// A rolling-checksum hit promoted a candidate file to a live partial match.
pub fn candidate_promoted(leafname: &str, start_off: u64) {
    tracing::debug!(leafname, start_off, "candidate promoted to partial match");
}

/// A partial match's strong digest check passed at a block boundary.
pub fn block_confirmed(leafname: &str, start_off: u64, block_index: u64) {
    tracing::trace!(leafname, start_off, block_index, "block digest confirmed");
}

/// A partial match was confirmed end to end and queued for emission.
pub fn match_confirmed(leafname: &str, start_off: u64, size: u64) {
    tracing::info!(leafname, start_off, size, "match confirmed");
}

/// A partial match's digest check failed and the candidate was dropped.
pub fn match_rejected(leafname: &str, start_off: u64, reason: &str) {
    tracing::debug!(leafname, start_off, reason, "match rejected");
}

/// A confirmed match was displaced by a better-ranked overlapping match.
pub fn match_outranked(leafname: &str, start_off: u64, winner_leafname: &str) {
    tracing::debug!(leafname, start_off, winner_leafname, "match outranked by overlapping candidate");
}

/// The live partial-match queue was full and evicted its worst entry to
/// admit a new candidate.
pub fn backpressure_eviction(evicted_leafname: &str, evicted_start_off: u64) {
    tracing::warn!(
        evicted_leafname,
        evicted_start_off,
        "partial match queue full, evicted oldest candidate"
    );
}

/// A candidate file became unreadable mid-scan and was excluded.
pub fn candidate_excluded(leafname: &str, error: &str) {
    tracing::warn!(leafname, error, "candidate excluded after I/O error");
}

/// A candidate's checksum state was served from the on-disk cache.
pub fn cache_hit(leafname: &str) {
    tracing::trace!(leafname, "cache hit");
}

/// A candidate's checksum state was not in the cache and was recomputed.
pub fn cache_miss(leafname: &str) {
    tracing::trace!(leafname, "cache miss");
}
