use jigdo_checksums::strong::Md5;
use jigdo_summary::SharedSummary;

/// Lifecycle state of a [`PartialMatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
    /// Just created from a rolling-checksum hit; no block has been verified
    /// yet.
    Candidate,
    /// At least the first block verified; still accumulating bytes toward
    /// its next block boundary.
    Confirming,
    /// Every block verified, including the whole-file digest at the last
    /// block. Awaiting arbitration against overlapping candidates.
    Confirmed,
    /// A block digest mismatched; dead, kept only until drained.
    Rejected,
}

/// A candidate file tentatively aligned with the image at `start_off`.
///
/// Two independent digests are tracked: `block_digest` covers only the
/// block currently in progress (reset at each verified block boundary, so
/// it can be compared against [`jigdo_summary::FileSummary::block_digest`]),
/// and `whole_digest` covers every byte since `start_off` (compared against
/// [`jigdo_summary::FileSummary::full_digest`] once the last block is
/// reached). Both start seeded with the same bytes, since the first block
/// and the whole file share a start offset.
pub struct PartialMatch {
    pub(crate) summary: SharedSummary,
    pub(crate) start_off: u64,
    pub(crate) size: u64,
    pub(crate) leafname: String,
    pub(crate) next_block: u64,
    pub(crate) next_check_off: u64,
    pub(crate) status: MatchStatus,
    block_digest: Md5,
    whole_digest: Md5,
}

impl PartialMatch {
    /// Creates a new partial match at `start_off`, seeded with the `W` bytes
    /// of the image already read (the rolling window that triggered this
    /// candidate's lookup). `next_check_off` is the offset at which the
    /// first block completes: `start_off + min(B, size)`.
    pub(crate) fn new(
        summary: SharedSummary,
        start_off: u64,
        size: u64,
        leafname: String,
        next_check_off: u64,
        seed_bytes: &[u8],
    ) -> Self {
        let mut block_digest = Md5::new();
        block_digest.update(seed_bytes);
        let mut whole_digest = Md5::new();
        whole_digest.update(seed_bytes);
        Self {
            summary,
            start_off,
            size,
            leafname,
            next_block: 1,
            next_check_off,
            status: MatchStatus::Candidate,
            block_digest,
            whole_digest,
        }
    }

    /// Feeds one more image byte into both digests in progress. Must not be
    /// called for the bytes already folded into the seed at construction,
    /// nor twice for the same byte.
    pub(crate) fn feed(&mut self, byte: u8) {
        self.block_digest.update(std::slice::from_ref(&byte));
        self.whole_digest.update(std::slice::from_ref(&byte));
    }

    /// Resets the in-progress block digest to empty, for the block that
    /// starts immediately after a verified boundary.
    pub(crate) fn start_next_block(&mut self) {
        self.block_digest = Md5::new();
    }

    pub(crate) fn block_digest_snapshot(&self) -> [u8; 16] {
        self.block_digest.clone().finalize()
    }

    pub(crate) fn whole_digest_snapshot(&self) -> [u8; 16] {
        self.whole_digest.clone().finalize()
    }

    /// Offset in the image one past the last byte this match would cover.
    pub fn end_off(&self) -> u64 {
        self.start_off + self.size
    }

    /// Whether this match's byte range overlaps `other`'s.
    pub fn overlaps(&self, other_start: u64, other_end: u64) -> bool {
        self.start_off < other_end && other_start < self.end_off()
    }

    /// Offset where this match begins.
    pub fn start_off(&self) -> u64 {
        self.start_off
    }

    /// Size of the candidate file backing this match.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Leafname of the candidate file, used as the final tie-break key.
    pub fn leafname(&self) -> &str {
        &self.leafname
    }

    /// The candidate file this match is tracking.
    pub fn summary(&self) -> &SharedSummary {
        &self.summary
    }

    /// Current lifecycle state.
    pub fn status(&self) -> MatchStatus {
        self.status
    }
}

/// Total-order key used to arbitrate between overlapping matches: smaller
/// `start_off` wins, then larger `size`, then lexicographically smaller
/// `leafname`. All three components are known at creation time and never
/// change, so arbitration can compare matches that haven't confirmed yet.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MatchRank {
    start_off: u64,
    size_desc: std::cmp::Reverse<u64>,
    leafname: String,
}

impl MatchRank {
    pub fn of(pm: &PartialMatch) -> Self {
        Self {
            start_off: pm.start_off,
            size_desc: std::cmp::Reverse(pm.size),
            leafname: pm.leafname.clone(),
        }
    }
}
