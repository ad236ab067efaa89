use std::collections::BTreeSet;

use rustc_hash::FxHashMap;

use crate::partial_match::PartialMatch;

/// Bounded set of live [`PartialMatch`] records, ordered by `(nextCheckOff,
/// startOff)` so the next one due for a block check is always cheap to find.
///
/// Capped at `max_matches`: once full, a new match is only admitted if it
/// ranks ahead of the current worst entry (largest `nextCheckOff`), which is
/// evicted to make room.
pub struct PartialMatchQueue {
    max_matches: usize,
    live: FxHashMap<u64, PartialMatch>,
    order: BTreeSet<(u64, u64, u64)>,
    next_id: u64,
}

impl PartialMatchQueue {
    /// Creates an empty queue capped at `max_matches` live entries.
    pub fn new(max_matches: usize) -> Self {
        Self {
            max_matches,
            live: FxHashMap::default(),
            order: BTreeSet::new(),
            next_id: 0,
        }
    }

    /// Number of live matches.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// Whether the queue holds no live matches.
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    fn insert_tracked(&mut self, pm: PartialMatch) {
        let id = self.next_id;
        self.next_id += 1;
        self.order.insert((pm.next_check_off, pm.start_off, id));
        self.live.insert(id, pm);
    }

    fn remove_tracked(&mut self, id: u64) -> Option<PartialMatch> {
        let pm = self.live.remove(&id)?;
        self.order.remove(&(pm.next_check_off, pm.start_off, id));
        Some(pm)
    }

    /// Attempts to admit `pm`. Returns `Some(pm)` unchanged if the queue was
    /// full and `pm` did not rank ahead of the current worst entry (in which
    /// case it was never admitted); returns `None` on success.
    pub fn try_insert(&mut self, pm: PartialMatch) -> Option<PartialMatch> {
        if self.live.len() >= self.max_matches {
            let worst = *self.order.iter().next_back().expect("queue full implies non-empty");
            if (pm.next_check_off, pm.start_off) >= (worst.0, worst.1) {
                return Some(pm);
            }
            self.remove_tracked(worst.2);
        }
        self.insert_tracked(pm);
        None
    }

    /// Removes and returns the live match with the smallest `startOff` whose
    /// `nextCheckOff` equals `target`, or `None` if no such match exists.
    /// Call repeatedly to drain every match due at `target`.
    pub fn pop_ready(&mut self, target: u64) -> Option<PartialMatch> {
        let key = *self
            .order
            .range((target, 0, 0)..=(target, u64::MAX, u64::MAX))
            .next()?;
        self.remove_tracked(key.2)
    }

    /// Removes and returns every live match satisfying `pred`.
    pub fn drain_where<F: Fn(&PartialMatch) -> bool>(&mut self, pred: F) -> Vec<PartialMatch> {
        let ids: Vec<u64> = self
            .live
            .iter()
            .filter(|(_, pm)| pred(pm))
            .map(|(id, _)| *id)
            .collect();
        ids.into_iter()
            .filter_map(|id| self.remove_tracked(id))
            .collect()
    }

    /// Removes and returns the live match with the smallest `startOff`
    /// (ties broken by smallest `nextCheckOff`), for backpressure eviction.
    pub fn evict_oldest(&mut self) -> Option<PartialMatch> {
        let id = *self
            .live
            .iter()
            .min_by_key(|(_, pm)| (pm.start_off, pm.next_check_off))
            .map(|(id, _)| id)?;
        self.remove_tracked(id)
    }

    /// Smallest `startOff` among live matches.
    pub fn min_start_off(&self) -> Option<u64> {
        self.live.values().map(|pm| pm.start_off).min()
    }

    /// Iterates every live match.
    pub fn iter(&self) -> impl Iterator<Item = &PartialMatch> {
        self.live.values()
    }

    /// Iterates every live match, mutably (for feeding bytes).
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut PartialMatch> {
        self.live.values_mut()
    }
}
