// Copyright (c) 2025-present, rule-list
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::config::Ablation;

/// Majority label over a capture set, ties broken toward label 1.
pub(crate) fn majority_label(n0: usize, n1: usize) -> bool {
    n1 >= n0
}

/// Misclassification count of the majority prediction.
pub(crate) fn incremental_miss(n0: usize, n1: usize) -> usize {
    n0.min(n1)
}

/// Pruning predicates and objective arithmetic for one search run
///
/// All bounds are admissible: a rejected child cannot lead to a rule
/// list better than the current incumbent.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Bounds {
    c: f64,
    n: f64,
    min_support: f64,
    ablation: Ablation,
}

impl Bounds {
    pub(crate) fn new(c: f64, sample_count: usize, min_support: f64, ablation: Ablation) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let n = sample_count as f64;

        Self {
            c,
            n,
            min_support,
            ablation,
        }
    }

    pub(crate) fn regularization(&self) -> f64 {
        self.c
    }

    fn fraction(&self, count: usize) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let count = count as f64;
        count / self.n
    }

    /// Lower bound of a child prefix: parent bound plus the captured
    /// misclassification plus one regularization increment.
    pub(crate) fn child_lower_bound(&self, parent_bound: f64, miss: usize) -> f64 {
        parent_bound + self.fraction(miss) + self.c
    }

    /// Objective: lower bound plus default rule error.
    pub(crate) fn objective(&self, lower_bound: f64, default_miss: usize) -> f64 {
        lower_bound + self.fraction(default_miss)
    }

    /// Re-check of the mining-time support filter.
    pub(crate) fn below_min_support(&self, captured: usize) -> bool {
        self.fraction(captured) < self.min_support
    }

    /// Antecedent support bound: a rule capturing fewer than `c * N`
    /// samples cannot pay for itself. Disabled by `Ablation::NoSupportBound`.
    pub(crate) fn insufficient_support(&self, captured: usize) -> bool {
        self.ablation != Ablation::NoSupportBound && self.fraction(captured) < self.c
    }

    /// Accurate antecedent support bound: the incremental misclassification
    /// plus regularization already exceeds the headroom the incumbent
    /// leaves above the parent bound.
    pub(crate) fn cannot_improve(&self, miss: usize, parent_bound: f64, best_objective: f64) -> bool {
        self.fraction(miss) + self.c >= best_objective - parent_bound
    }

    /// Lookahead bound: even one more zero-error rule cannot beat the
    /// incumbent. Disabled by `Ablation::NoLookahead`.
    pub(crate) fn fails_lookahead(&self, lower_bound: f64, best_objective: f64) -> bool {
        self.ablation != Ablation::NoLookahead && lower_bound >= best_objective - self.c
    }

    /// Length bound applied when a node is popped: no child can improve
    /// on the incumbent, so the node is not expanded.
    pub(crate) fn exhausted(&self, lower_bound: f64, best_objective: f64) -> bool {
        lower_bound + self.c >= best_objective
    }

    /// Identical-points bound: the minority count over the uncaptured
    /// samples is unavoidable error for every descendant.
    pub(crate) fn fails_minority(
        &self,
        lower_bound: f64,
        minority: usize,
        best_objective: f64,
    ) -> bool {
        lower_bound + self.fraction(minority) >= best_objective
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn majority_ties_toward_label_one() {
        assert!(majority_label(0, 1));
        assert!(majority_label(3, 3));
        assert!(!majority_label(4, 3));
        assert_eq!(3, incremental_miss(4, 3));
    }

    #[test]
    fn child_bound_is_monotone() {
        let bounds = Bounds::new(0.01, 100, 0.0, Ablation::None);

        let parent = 0.05;
        let child = bounds.child_lower_bound(parent, 3);
        assert!(child > parent);
        assert!((child - (0.05 + 0.03 + 0.01)).abs() < 1e-12);

        // Objective dominates the bound
        assert!(bounds.objective(child, 10) >= child);
    }

    #[test]
    fn support_bounds() {
        let bounds = Bounds::new(0.05, 100, 0.02, Ablation::None);

        assert!(bounds.below_min_support(1));
        assert!(!bounds.below_min_support(2));

        assert!(bounds.insufficient_support(4));
        assert!(!bounds.insufficient_support(5));

        let ablated = Bounds::new(0.05, 100, 0.02, Ablation::NoSupportBound);
        assert!(!ablated.insufficient_support(4));
        // The mining-time recheck is unaffected by ablation
        assert!(ablated.below_min_support(1));
    }

    #[test]
    fn accurate_support_bound() {
        let bounds = Bounds::new(0.01, 100, 0.0, Ablation::None);

        // Incumbent at 0.10, parent bound 0.05: headroom is 0.05; a child
        // misclassifying 4 samples costs 0.04 + 0.01 and cannot win
        assert!(bounds.cannot_improve(4, 0.05, 0.10));
        assert!(!bounds.cannot_improve(3, 0.05, 0.10));
    }

    #[test]
    fn lookahead_bound() {
        let bounds = Bounds::new(0.01, 100, 0.0, Ablation::None);

        assert!(bounds.fails_lookahead(0.095, 0.10));
        assert!(!bounds.fails_lookahead(0.089, 0.10));

        let ablated = Bounds::new(0.01, 100, 0.0, Ablation::NoLookahead);
        assert!(!ablated.fails_lookahead(0.095, 0.10));
    }

    #[test]
    fn length_and_minority_bounds() {
        let bounds = Bounds::new(0.01, 100, 0.0, Ablation::None);

        assert!(bounds.exhausted(0.09, 0.10));
        assert!(!bounds.exhausted(0.089, 0.10));

        assert!(bounds.fails_minority(0.05, 5, 0.10));
        assert!(!bounds.fails_minority(0.05, 4, 0.10));
    }
}
