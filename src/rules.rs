// Copyright (c) 2025-present, rule-list
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::bitset::Bitset;

/// Index of a mined antecedent
pub(crate) type AntecedentId = usize;

/// A single binary feature test
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Clause {
    /// Index of the tested feature
    pub feature: usize,

    /// Whether the test is for the feature being 0 instead of 1
    pub negated: bool,
}

impl Clause {
    /// Whether the clause holds on a raw sample row.
    #[must_use]
    pub fn holds(&self, row: &[u8]) -> bool {
        row.get(self.feature)
            .is_some_and(|&value| (value != 0) != self.negated)
    }
}

/// A mined conjunction of feature tests, plus the samples it matches
#[derive(Clone, Debug)]
pub(crate) struct Antecedent {
    /// Feature tests, in mined order (positive tests before negated ones)
    pub clauses: Box<[Clause]>,

    /// Bit i is set iff sample i satisfies every clause
    pub captures: Bitset,
}

/// Owns the capture bitvector of every mined antecedent plus the two
/// label bitvectors
///
/// Immutable once constructed; the scheduler queries it for incremental
/// capture sets and masked label counts.
pub(crate) struct RuleSet {
    antecedents: Vec<Antecedent>,
    label0: Bitset,
    label1: Bitset,
    sample_count: usize,
}

impl RuleSet {
    pub(crate) fn new(antecedents: Vec<Antecedent>, label0: Bitset, label1: Bitset) -> Self {
        debug_assert_eq!(label0.len(), label1.len());
        debug_assert!(antecedents
            .iter()
            .all(|a| a.captures.len() == label0.len()));

        let sample_count = label0.len();

        Self {
            antecedents,
            label0,
            label1,
            sample_count,
        }
    }

    /// Number of mined antecedents
    pub(crate) fn len(&self) -> usize {
        self.antecedents.len()
    }

    pub(crate) fn antecedent(&self, id: AntecedentId) -> &Antecedent {
        self.antecedents.get(id).expect("antecedent id should exist")
    }

    /// Number of training samples N
    pub(crate) fn total_samples(&self) -> usize {
        self.sample_count
    }

    /// Incremental capture of appending antecedent `id` below a prefix:
    /// the samples the antecedent matches among those still uncaptured.
    pub(crate) fn capture_last(&self, parent_nc: &Bitset, id: AntecedentId, cap: &mut Bitset) {
        self.antecedent(id).captures.and_into(parent_nc, cap);
    }

    /// Label counts `(n0, n1)` over a sample mask.
    pub(crate) fn label_counts(&self, mask: &Bitset) -> (usize, usize) {
        (mask.and_count(&self.label0), mask.and_count(&self.label1))
    }

    pub(crate) fn label1(&self) -> &Bitset {
        &self.label1
    }
}
