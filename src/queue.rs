// Copyright (c) 2025-present, rule-list
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::cache::{Entry, EntryId, PrefixCache};
use crate::config::Policy;
use interval_heap::IntervalHeap as Heap;

/// Priority key, insertion sequence, cache entry
#[derive(Debug)]
struct QueueItem(f64, i64, EntryId);

impl PartialEq for QueueItem {
    fn eq(&self, other: &Self) -> bool {
        self.1 == other.1
    }
}

impl Eq for QueueItem {}

impl Ord for QueueItem {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0).then(self.1.cmp(&other.1))
    }
}

impl PartialOrd for QueueItem {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Best-first scheduling queue over cache entries
///
/// The priority key is fixed at push time by the active policy; the
/// insertion sequence is the tie-break, making pop order fully
/// deterministic. Entries tombstoned after being pushed are skipped
/// lazily on pop.
pub(crate) struct SearchQueue {
    policy: Policy,
    heap: Heap<QueueItem>,
    seq: i64,
    sample_count: usize,
}

impl SearchQueue {
    pub(crate) fn new(policy: Policy, sample_count: usize) -> Self {
        Self {
            policy,
            heap: Heap::with_capacity(64),
            seq: 0,
            sample_count,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn priority(&self, entry: &Entry) -> f64 {
        let len = entry.len() as f64;

        match self.policy {
            Policy::Bfs => len,
            Policy::Dfs => -len,
            Policy::LowerBound => entry.lower_bound,
            Policy::Objective => entry.objective,
            Policy::Curious => {
                // Weight the bound by the inverse uncaptured fraction:
                // nodes with lots of unexplained mass look promising
                let not_captured = entry.not_captured().count();

                if not_captured == 0 {
                    f64::INFINITY
                } else {
                    entry.lower_bound * (self.sample_count as f64) / (not_captured as f64)
                }
            }
        }
    }

    /// Enqueues a live cache entry.
    pub(crate) fn push(&mut self, id: EntryId, entry: &Entry) {
        let key = self.priority(entry);

        self.seq += 1;
        let seq = match self.policy {
            // Newest first within a depth level
            Policy::Dfs => -self.seq,
            _ => self.seq,
        };

        self.heap.push(QueueItem(key, seq, id));
    }

    /// Pops the highest-priority live entry, skipping tombstones.
    pub(crate) fn pop(&mut self, cache: &PrefixCache) -> Option<EntryId> {
        loop {
            let QueueItem(_, _, id) = self.heap.pop_min()?;

            if !cache.entry(id).deleted {
                return Some(id);
            }
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitset::Bitset;
    use crate::config::MapType;
    use test_log::test;

    fn push_entry(
        cache: &mut PrefixCache,
        queue: &mut SearchQueue,
        prefix: &[usize],
        lower_bound: f64,
        objective: f64,
        nc_bits: usize,
    ) -> EntryId {
        let mut nc = Bitset::zeroes(8);
        for idx in 0..nc_bits {
            nc.set(idx, true);
        }

        let entry = Entry {
            prefix: prefix.into(),
            predictions: prefix.iter().map(|_| false).collect(),
            default_prediction: true,
            lower_bound,
            objective,
            not_captured: Some(nc),
            parent: None,
            deleted: false,
        };

        let id = match cache.insert(entry).expect("insert should succeed") {
            crate::cache::InsertOutcome::Inserted(id) => id,
            _ => panic!("expected insertion"),
        };

        queue.push(id, cache.entry(id));
        id
    }

    #[test]
    fn lower_bound_policy_orders_by_bound() {
        let mut cache = PrefixCache::new(MapType::None);
        let mut queue = SearchQueue::new(Policy::LowerBound, 8);

        let a = push_entry(&mut cache, &mut queue, &[0], 0.3, 0.5, 4);
        let b = push_entry(&mut cache, &mut queue, &[1], 0.1, 0.9, 4);
        let c = push_entry(&mut cache, &mut queue, &[2], 0.2, 0.2, 4);

        assert_eq!(Some(b), queue.pop(&cache));
        assert_eq!(Some(c), queue.pop(&cache));
        assert_eq!(Some(a), queue.pop(&cache));
        assert_eq!(None, queue.pop(&cache));
    }

    #[test]
    fn bfs_ties_break_by_insertion_order() {
        let mut cache = PrefixCache::new(MapType::None);
        let mut queue = SearchQueue::new(Policy::Bfs, 8);

        let a = push_entry(&mut cache, &mut queue, &[0], 0.3, 0.5, 4);
        let b = push_entry(&mut cache, &mut queue, &[1], 0.1, 0.9, 4);

        assert_eq!(Some(a), queue.pop(&cache));
        assert_eq!(Some(b), queue.pop(&cache));
    }

    #[test]
    fn dfs_pops_newest_deepest_first() {
        let mut cache = PrefixCache::new(MapType::None);
        let mut queue = SearchQueue::new(Policy::Dfs, 8);

        let a = push_entry(&mut cache, &mut queue, &[0], 0.3, 0.5, 4);
        let b = push_entry(&mut cache, &mut queue, &[1, 2], 0.1, 0.9, 4);
        let c = push_entry(&mut cache, &mut queue, &[3, 4], 0.2, 0.2, 4);

        assert_eq!(Some(c), queue.pop(&cache));
        assert_eq!(Some(b), queue.pop(&cache));
        assert_eq!(Some(a), queue.pop(&cache));
    }

    #[test]
    fn pop_skips_tombstones() {
        let mut cache = PrefixCache::new(MapType::None);
        let mut queue = SearchQueue::new(Policy::Objective, 8);

        let a = push_entry(&mut cache, &mut queue, &[0], 0.1, 0.1, 4);
        let b = push_entry(&mut cache, &mut queue, &[1], 0.2, 0.2, 4);

        let _ = cache.tombstone(a);

        assert_eq!(Some(b), queue.pop(&cache));
        assert!(queue.is_empty());
    }

    #[test]
    fn curious_prefers_uncaptured_mass() {
        let mut cache = PrefixCache::new(MapType::None);
        let mut queue = SearchQueue::new(Policy::Curious, 8);

        // Same bound; the one with more uncaptured samples wins
        let a = push_entry(&mut cache, &mut queue, &[0], 0.2, 0.5, 2);
        let b = push_entry(&mut cache, &mut queue, &[1], 0.2, 0.5, 8);

        assert_eq!(Some(b), queue.pop(&cache));
        assert_eq!(Some(a), queue.pop(&cache));
    }
}
