use std::collections::VecDeque;
use std::io::Read;
use std::rc::Rc;

use jigdo_cache::CacheStore;
use jigdo_checksums::RollingSum;
use jigdo_summary::CandidateIndex;

use crate::error::MatchingError;
use crate::event::MatchEvent;
use crate::partial_match::{MatchRank, MatchStatus, PartialMatch};
use crate::queue::PartialMatchQueue;

fn ranges_overlap(a_start: u64, a_end: u64, b_start: u64, b_end: u64) -> bool {
    a_start < b_end && b_start < a_end
}

/// Parameters a [`Matcher`] runs with. `w` must be at most `b`; enforcing
/// that, and rejecting candidates too large for `buffer_limit`, is the
/// caller's responsibility (`jigdo-core`'s build configuration).
#[derive(Debug, Clone, Copy)]
pub struct MatchParams {
    /// Rolling-window length.
    pub w: u32,
    /// Strong-block length.
    pub b: u32,
    /// Maximum number of live `PartialMatch` records kept at once.
    pub max_matches: usize,
    /// Maximum number of undecided image bytes held in memory at once.
    pub buffer_limit: usize,
}

/// Streams an image against a candidate pool, producing [`MatchEvent`]s.
///
/// Call [`Self::next_event`] (or use the `Iterator` impl) until it returns
/// `None`. A single image byte may resolve zero or more pending matches and
/// zero or one literal flush; events are queued internally and drained one
/// at a time.
pub struct Matcher<'a, R> {
    image: R,
    candidates: &'a CandidateIndex,
    cache: Option<&'a CacheStore>,
    now: u32,
    params: MatchParams,

    window: VecDeque<u8>,
    rolling: RollingSum,
    consumed: u64,

    queue: PartialMatchQueue,
    deferred: Vec<PartialMatch>,

    committed: u64,
    pending: VecDeque<u8>,
    pending_events: VecDeque<MatchEvent>,

    eof: bool,
    finalized: bool,
}

impl<'a, R: Read> Matcher<'a, R> {
    /// Creates a matcher over `image`, probing `candidates` as bytes stream
    /// by. `now` is the current time used for cache bookkeeping.
    pub fn new(
        image: R,
        candidates: &'a CandidateIndex,
        cache: Option<&'a CacheStore>,
        now: u32,
        params: MatchParams,
    ) -> Self {
        Self {
            image,
            candidates,
            cache,
            now,
            params,
            window: VecDeque::with_capacity(params.w as usize),
            rolling: RollingSum::new(),
            consumed: 0,
            queue: PartialMatchQueue::new(params.max_matches),
            deferred: Vec::new(),
            committed: 0,
            pending: VecDeque::new(),
            pending_events: VecDeque::new(),
            eof: false,
            finalized: false,
        }
    }

    /// Returns the next event, or `None` once the image is exhausted and
    /// every in-flight match has been resolved.
    pub fn next_event(&mut self) -> Result<Option<MatchEvent>, MatchingError> {
        loop {
            if let Some(event) = self.pending_events.pop_front() {
                return Ok(Some(event));
            }
            if self.eof {
                if self.finalized {
                    return Ok(None);
                }
                self.finalize();
                self.finalized = true;
                continue;
            }
            self.step()?;
        }
    }

    fn step(&mut self) -> Result<(), MatchingError> {
        let mut byte = [0u8; 1];
        if self.image.read(&mut byte)? == 0 {
            self.eof = true;
            return Ok(());
        }
        let b = byte[0];
        self.pending.push_back(b);

        for pm in self.queue.iter_mut() {
            pm.feed(b);
        }

        let w = self.params.w as usize;
        if self.window.len() < w {
            self.window.push_back(b);
            self.rolling.push(b).expect("window bounded by u32");
        } else {
            let old = self.window.pop_front().expect("window non-empty once w > 0");
            self.window.push_back(b);
            self.rolling.slide(old, b).expect("window never empty once w > 0");
        }
        self.consumed += 1;

        if self.window.len() == w && w > 0 {
            self.probe_candidates();
        }

        self.check_completions();
        self.resettle_deferred();

        let safe_off = self.safe_off();
        self.flush_literal_up_to(safe_off);

        while self.pending.len() > self.params.buffer_limit {
            let Some(evicted) = self.queue.evict_oldest() else { break };
            jigdo_logging::backpressure_eviction(evicted.leafname(), evicted.start_off());
            self.resettle_deferred();
            let safe_off = self.safe_off();
            self.flush_literal_up_to(safe_off);
        }

        Ok(())
    }

    fn probe_candidates(&mut self) {
        let w = self.params.w as u64;
        let start_off = self.consumed - w;
        let rsum_value = self.rolling.value();
        let hits = self.candidates.get(rsum_value).to_vec();
        for summary in hits {
            if summary.borrow().is_excluded() {
                continue;
            }
            let already_tracked = self
                .queue
                .iter()
                .chain(self.deferred.iter())
                .any(|pm| pm.start_off() == start_off && Rc::ptr_eq(pm.summary(), &summary));
            if already_tracked {
                continue;
            }
            let size = summary.borrow().size();
            if size < w {
                continue;
            }
            let next_check_off = start_off + size.min(u64::from(self.params.b));
            let leafname = summary.borrow().leafname().to_string();
            let seed: Vec<u8> = self.window.iter().copied().collect();
            let pm = PartialMatch::new(summary, start_off, size, leafname.clone(), next_check_off, &seed);
            if self.queue.try_insert(pm).is_none() {
                jigdo_logging::candidate_promoted(&leafname, start_off);
            }
        }
    }

    fn check_completions(&mut self) {
        while let Some(mut pm) = self.queue.pop_ready(self.consumed) {
            let total_blocks = pm.summary().borrow().total_block_count();
            let block_index = pm.next_block - 1;
            let is_last_block = block_index + 1 == total_blocks;

            if is_last_block {
                let snapshot = pm.whole_digest_snapshot();
                let result = pm.summary().borrow_mut().full_digest(self.cache, self.now);
                match result {
                    Ok(expected) if expected == snapshot => {
                        pm.status = MatchStatus::Confirmed;
                        jigdo_logging::match_confirmed(pm.leafname(), pm.start_off(), pm.size());
                        self.deferred.push(pm);
                    }
                    Ok(_) => {
                        jigdo_logging::match_rejected(pm.leafname(), pm.start_off(), "whole-file digest mismatch");
                    }
                    Err(_) => pm.summary().borrow_mut().mark_excluded(),
                }
            } else {
                let snapshot = pm.block_digest_snapshot();
                let index = usize::try_from(block_index).unwrap_or(usize::MAX);
                let result = pm.summary().borrow_mut().block_digest(index, self.cache, self.now);
                match result {
                    Ok(expected) if expected == snapshot => {
                        jigdo_logging::block_confirmed(pm.leafname(), pm.start_off(), block_index);
                        pm.next_block += 1;
                        let b = u64::from(self.params.b);
                        pm.next_check_off = pm.start_off() + (b * pm.next_block).min(pm.size());
                        pm.start_next_block();
                        pm.status = MatchStatus::Confirming;
                        self.queue.try_insert(pm);
                    }
                    Ok(_) => {
                        jigdo_logging::match_rejected(pm.leafname(), pm.start_off(), "block digest mismatch");
                    }
                    Err(_) => pm.summary().borrow_mut().mark_excluded(),
                }
            }
        }
    }

    /// Emits the best-ranked deferred match whenever nothing still live or
    /// deferred outranks it, repeating until no more progress can be made.
    /// A deferred match's `(startOff, size, leafname)` are fixed at creation,
    /// so this comparison never needs to wait on a competitor's own block
    /// checks to complete.
    fn resettle_deferred(&mut self) {
        loop {
            let ranked: Vec<(usize, MatchRank, u64, u64)> = self
                .deferred
                .iter()
                .enumerate()
                .map(|(i, pm)| (i, MatchRank::of(pm), pm.start_off(), pm.end_off()))
                .collect();

            let winner = ranked.iter().find(|(i, rank, start, end)| {
                let beaten_by_live = self
                    .queue
                    .iter()
                    .any(|other| other.overlaps(*start, *end) && MatchRank::of(other) < *rank);
                if beaten_by_live {
                    return false;
                }
                ranked
                    .iter()
                    .filter(|(j, ..)| j != i)
                    .all(|(_, other_rank, ostart, oend)| {
                        !ranges_overlap(*start, *end, *ostart, *oend) || *other_rank >= *rank
                    })
            });

            let Some(&(idx, ..)) = winner else { break };
            let pm = self.deferred.remove(idx);
            self.emit_match(pm);
        }
    }

    fn emit_match(&mut self, pm: PartialMatch) {
        self.flush_literal_up_to(pm.start_off());
        debug_assert_eq!(self.committed, pm.start_off());

        let size = usize::try_from(pm.size()).unwrap_or(usize::MAX);
        self.pending.drain(0..size.min(self.pending.len()));
        self.committed += pm.size();

        let (start, end) = (pm.start_off(), pm.end_off());
        let winner_leafname = pm.leafname().to_string();

        let outranked_live = self.queue.drain_where(|other| other.overlaps(start, end));
        let (kept, outranked_deferred): (Vec<_>, Vec<_>) = std::mem::take(&mut self.deferred)
            .into_iter()
            .partition(|other| !ranges_overlap(other.start_off(), other.end_off(), start, end));
        self.deferred = kept;
        for other in outranked_live.iter().chain(outranked_deferred.iter()) {
            jigdo_logging::match_outranked(other.leafname(), other.start_off(), &winner_leafname);
        }

        self.pending_events.push_back(MatchEvent::Match {
            summary: pm.summary().clone(),
            start_off: pm.start_off(),
        });
    }

    fn flush_literal_up_to(&mut self, target: u64) {
        if target <= self.committed {
            return;
        }
        let n = usize::try_from(target - self.committed).unwrap_or(usize::MAX);
        let bytes: Vec<u8> = self.pending.drain(0..n.min(self.pending.len())).collect();
        self.committed = target;
        if !bytes.is_empty() {
            self.pending_events.push_back(MatchEvent::Literal(bytes));
        }
    }

    fn safe_off(&self) -> u64 {
        let mut safe = self.consumed;
        if let Some(v) = self.queue.min_start_off() {
            safe = safe.min(v);
        }
        if let Some(v) = self.deferred.iter().map(PartialMatch::start_off).min() {
            safe = safe.min(v);
        }
        safe
    }

    /// Consumes the matcher, returning the underlying reader.
    ///
    /// Only meaningful once [`Self::next_event`] has returned `None`; calling
    /// it earlier discards whatever of the image was not yet read.
    pub fn into_inner(self) -> R {
        self.image
    }

    fn finalize(&mut self) {
        self.queue.drain_where(|_| true);
        self.resettle_deferred();
        let end = self.committed + self.pending.len() as u64;
        self.flush_literal_up_to(end);
    }
}

impl<R: Read> Iterator for Matcher<'_, R> {
    type Item = Result<MatchEvent, MatchingError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_event() {
            Ok(Some(event)) => Some(Ok(event)),
            Ok(None) => None,
            Err(err) => Some(Err(err)),
        }
    }
}
