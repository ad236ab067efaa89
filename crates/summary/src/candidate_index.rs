use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::file_summary::FileSummary;

/// Shared handle to a [`FileSummary`], as stored in a [`CandidateIndex`]
/// bucket and held (non-owning, by clone of the `Rc`) by live `PartialMatch`
/// records.
pub type SharedSummary = Rc<RefCell<FileSummary>>;

/// In-memory multimap from `rsum0` value to the candidate files whose
/// leading window produces that value (spec §4.5).
///
/// Built once before matching begins; the only mutation allowed during
/// matching is [`Self::exclude`], which drops a summary from every bucket
/// after an I/O error.
#[derive(Default)]
pub struct CandidateIndex {
    buckets: FxHashMap<u32, Vec<SharedSummary>>,
}

impl CandidateIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `summary` under `rsum0_value`.
    pub fn insert(&mut self, rsum0_value: u32, summary: SharedSummary) {
        self.buckets.entry(rsum0_value).or_default().push(summary);
    }

    /// Returns every candidate whose `rsum0` equals `rsum0_value`.
    pub fn get(&self, rsum0_value: u32) -> &[SharedSummary] {
        self.buckets
            .get(&rsum0_value)
            .map_or(&[] as &[SharedSummary], Vec::as_slice)
    }

    /// Removes `summary` from every bucket it appears in, identity-compared.
    /// Used once a candidate's file becomes unreadable mid-scan.
    pub fn exclude(&mut self, summary: &SharedSummary) {
        for bucket in self.buckets.values_mut() {
            bucket.retain(|candidate| !Rc::ptr_eq(candidate, summary));
        }
    }

    /// Total number of candidate files indexed, across all buckets.
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Whether the index holds no candidates.
    pub fn is_empty(&self) -> bool {
        self.buckets.values().all(Vec::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(leafname: &str) -> SharedSummary {
        Rc::new(RefCell::new(FileSummary::new(
            format!("/tmp/{leafname}"),
            leafname.to_string(),
            2048,
            0,
            1024,
            65536,
        )))
    }

    #[test]
    fn insert_and_get_round_trip() {
        let mut index = CandidateIndex::new();
        let a = summary("a");
        index.insert(42, a.clone());
        assert_eq!(index.get(42).len(), 1);
        assert!(Rc::ptr_eq(&index.get(42)[0], &a));
    }

    #[test]
    fn multiple_candidates_share_a_bucket() {
        let mut index = CandidateIndex::new();
        index.insert(7, summary("a"));
        index.insert(7, summary("b"));
        assert_eq!(index.get(7).len(), 2);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn exclude_removes_only_the_matching_summary() {
        let mut index = CandidateIndex::new();
        let a = summary("a");
        let b = summary("b");
        index.insert(7, a.clone());
        index.insert(7, b.clone());

        index.exclude(&a);

        assert_eq!(index.get(7).len(), 1);
        assert!(Rc::ptr_eq(&index.get(7)[0], &b));
    }

    #[test]
    fn empty_index_reports_empty() {
        let index = CandidateIndex::new();
        assert!(index.is_empty());
        assert_eq!(index.get(0).len(), 0);
    }
}
