// Copyright (c) 2025-present, rule-list
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::bitset::{pool::BitsetPool, Bitset};
use crate::bounds::{incremental_miss, majority_label, Bounds};
use crate::cache::{Entry, EntryId, InsertOutcome, PrefixCache};
use crate::config::{Config, MapType};
use crate::incumbent::Incumbent;
use crate::minority::MinorityOracle;
use crate::queue::SearchQueue;
use crate::rules::RuleSet;

/// Branch-and-bound search driver
///
/// Owns the cache, the queue and the incumbent for the lifetime of one
/// search. `step` is the only suspension point; everything in between is
/// run to completion, so the sequence of cache insertions and incumbent
/// updates is fully determined by the inputs and the policy.
pub(crate) struct Scheduler {
    rules: RuleSet,
    cache: PrefixCache,
    queue: SearchQueue,
    pool: BitsetPool,
    incumbent: Incumbent,
    minority: Option<MinorityOracle>,
    bounds: Bounds,
    map_type: MapType,
    n_iter: u64,
    expansions: u64,
}

impl Scheduler {
    /// Seeds the search with the empty prefix.
    pub(crate) fn new(rules: RuleSet, config: &Config) -> crate::Result<Self> {
        let sample_count = rules.total_samples();

        let bounds = Bounds::new(config.c, sample_count, config.min_support, config.ablation);
        let minority = config.minority_bound.then(|| MinorityOracle::new(&rules));

        let mut cache = PrefixCache::new(config.map_type);
        let mut queue = SearchQueue::new(config.policy, sample_count);

        let not_captured = Bitset::ones(sample_count);
        let (n0, n1) = rules.label_counts(&not_captured);
        let default_prediction = majority_label(n0, n1);
        let objective = bounds.objective(0.0, incremental_miss(n0, n1));

        let incumbent = Incumbent::root(default_prediction, objective);

        let root = Entry {
            prefix: Box::new([]),
            predictions: Box::new([]),
            default_prediction,
            lower_bound: 0.0,
            objective,
            not_captured: Some(not_captured),
            parent: None,
            deleted: false,
        };

        match cache.insert(root)? {
            InsertOutcome::Inserted(id) => queue.push(id, cache.entry(id)),
            _ => unreachable!("empty cache cannot reject the root"),
        }

        Ok(Self {
            pool: BitsetPool::new(sample_count),
            rules,
            cache,
            queue,
            incumbent,
            minority,
            bounds,
            map_type: config.map_type,
            n_iter: config.n_iter,
            expansions: 0,
        })
    }

    /// Runs up to `budget` node expansions.
    ///
    /// Returns `true` while the queue is non-empty and the global
    /// expansion limit has not been reached.
    pub(crate) fn step(&mut self, budget: u64) -> crate::Result<bool> {
        let mut expanded = 0;

        while expanded < budget && self.expansions < self.n_iter {
            let Some(id) = self.queue.pop(&self.cache) else {
                log::debug!(
                    "Queue exhausted after {} expansions ({} cache entries)",
                    self.expansions,
                    self.cache.len(),
                );
                return Ok(false);
            };

            // Length bound: no child of this node can beat the incumbent
            let lower_bound = self.cache.entry(id).lower_bound;
            if self.bounds.exhausted(lower_bound, self.incumbent.objective) {
                continue;
            }

            self.expand(id)?;

            self.expansions += 1;
            expanded += 1;
        }

        Ok(!self.queue.is_empty() && self.expansions < self.n_iter)
    }

    /// Generates and bounds all children of one node.
    #[allow(clippy::cast_precision_loss)]
    fn expand(&mut self, parent_id: EntryId) -> crate::Result<()> {
        let (parent_prefix, parent_predictions, parent_bound) = {
            let parent = self.cache.entry(parent_id);
            (
                parent.prefix.clone(),
                parent.predictions.clone(),
                parent.lower_bound,
            )
        };

        let mut parent_nc = self.pool.acquire();
        parent_nc.copy_from(self.cache.entry(parent_id).not_captured());

        let last = parent_prefix.last().copied();
        let mut cap = self.pool.acquire();

        for id in 0..self.rules.len() {
            // Canonical-order prefilter: the prefix map materializes each
            // antecedent set exactly once, in ascending id order
            match self.map_type {
                MapType::Prefix => {
                    if last.is_some_and(|last| id <= last) {
                        continue;
                    }
                }
                MapType::None | MapType::Captured => {
                    if parent_prefix.contains(&id) {
                        continue;
                    }
                }
            }

            self.rules.capture_last(&parent_nc, id, &mut cap);

            if !cap.any() {
                continue;
            }

            let captured = cap.count();

            if self.bounds.below_min_support(captured)
                || self.bounds.insufficient_support(captured)
            {
                continue;
            }

            let (n0, n1) = self.rules.label_counts(&cap);
            let miss = incremental_miss(n0, n1);

            if self
                .bounds
                .cannot_improve(miss, parent_bound, self.incumbent.objective)
            {
                continue;
            }

            let lower_bound = self.bounds.child_lower_bound(parent_bound, miss);

            let mut not_captured = self.pool.acquire();
            parent_nc.and_not_into(&cap, &mut not_captured);

            let (nc0, nc1) = self.rules.label_counts(&not_captured);
            let objective = self.bounds.objective(lower_bound, incremental_miss(nc0, nc1));

            if let Some(oracle) = &self.minority {
                let minority = oracle.bound(&not_captured);

                if self
                    .bounds
                    .fails_minority(lower_bound, minority, self.incumbent.objective)
                {
                    self.pool.release(not_captured);
                    continue;
                }
            }

            let mut prefix = Vec::with_capacity(parent_prefix.len() + 1);
            prefix.extend_from_slice(&parent_prefix);
            prefix.push(id);

            let mut predictions = Vec::with_capacity(parent_predictions.len() + 1);
            predictions.extend_from_slice(&parent_predictions);
            predictions.push(majority_label(n0, n1));

            let default_prediction = majority_label(nc0, nc1);

            if objective < self.incumbent.objective {
                let error = objective - self.bounds.regularization() * prefix.len() as f64;

                self.incumbent
                    .update(&prefix, &predictions, default_prediction, objective, error);
            }

            // Lookahead gates only the queue: the incumbent already saw
            // this child as a complete list
            if self
                .bounds
                .fails_lookahead(lower_bound, self.incumbent.objective)
            {
                self.pool.release(not_captured);
                continue;
            }

            let child = Entry {
                prefix: prefix.into_boxed_slice(),
                predictions: predictions.into_boxed_slice(),
                default_prediction,
                lower_bound,
                objective,
                not_captured: Some(not_captured),
                parent: Some(parent_id),
                deleted: false,
            };

            match self.cache.insert(child)? {
                InsertOutcome::Inserted(id) => self.queue.push(id, self.cache.entry(id)),
                InsertOutcome::Replaced(id, recycled) => {
                    self.pool.release(recycled);
                    self.queue.push(id, self.cache.entry(id));
                }
                InsertOutcome::Rejected(rejected) => {
                    if let Some(bitset) = rejected.not_captured {
                        self.pool.release(bitset);
                    }
                }
            }
        }

        self.pool.release(cap);
        self.pool.release(parent_nc);

        Ok(())
    }

    pub(crate) fn incumbent(&self) -> &Incumbent {
        &self.incumbent
    }

    pub(crate) fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub(crate) fn expansions(&self) -> u64 {
        self.expansions
    }

    /// Checks the structural invariants of the search state.
    ///
    /// Walks every cache entry, recomputing its summary from scratch.
    /// Panics on the first violation; meant for tests and debugging.
    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn verify(&self) {
        let sample_count = self.rules.total_samples();
        let n = sample_count as f64;
        let c = self.bounds.regularization();

        let mut keys = std::collections::HashSet::new();

        for entry in self.cache.iter() {
            assert!(entry.lower_bound >= 0.0, "lower bound must be nonnegative");
            assert!(
                entry.objective >= entry.lower_bound - 1e-9,
                "objective must dominate the lower bound"
            );

            if entry.deleted {
                assert!(entry.not_captured.is_none(), "tombstones recycle bitsets");
                continue;
            }

            // Recompute the capture partition top-down
            let mut nc = Bitset::ones(sample_count);
            let mut scratch = Bitset::zeroes(sample_count);
            let mut captured_total = 0;
            let mut miss_total = 0;

            for &id in entry.prefix.iter() {
                self.rules.capture_last(&nc, id, &mut scratch);
                captured_total += scratch.count();

                let (n0, n1) = self.rules.label_counts(&scratch);
                miss_total += incremental_miss(n0, n1);

                let mut next = Bitset::zeroes(sample_count);
                nc.and_not_into(&scratch, &mut next);
                nc = next;
            }

            assert_eq!(
                sample_count,
                nc.count() + captured_total,
                "capture partition must cover all samples"
            );
            assert_eq!(&nc, entry.not_captured(), "stored NC must match evaluation");

            let expected_bound = miss_total as f64 / n + c * entry.len() as f64;
            assert!(
                (entry.lower_bound - expected_bound).abs() < 1e-9,
                "stored lower bound must match evaluation"
            );

            if let Some(parent) = entry.parent {
                assert!(
                    self.cache.entry(parent).lower_bound <= entry.lower_bound + 1e-9,
                    "bounds must be hierarchical"
                );
            }

            // Canonical keys of live entries are unique
            let mut key = entry.prefix.to_vec();
            if self.map_type == MapType::Prefix {
                key.sort_unstable();
            }
            if self.map_type != MapType::None {
                assert!(keys.insert(key), "canonical key must be unique");
            }
        }

        assert!(
            self.incumbent.objective <= self.cache.entry(0).objective + 1e-9,
            "incumbent must be at least as good as the empty prefix"
        );
    }
}
