// Copyright (c) 2025-present, rule-list
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::bitset::Bitset;
use crate::rules::RuleSet;
use rustc_hash::FxHashMap;

const WORD_BITS: usize = u64::BITS as usize;

/// Identical-points lower bound oracle
///
/// Samples that agree on every antecedent are indistinguishable to any
/// rule list built from those antecedents, so within each such group the
/// minority-label samples are misclassified no matter what. The oracle
/// flags them once up front; the bound for a mask is then a single
/// masked popcount.
///
/// Masks produced by the search never split a group (they are boolean
/// combinations of antecedent captures), which keeps the bound
/// admissible and monotone under prefix extension.
pub(crate) struct MinorityOracle {
    minority_mask: Bitset,
}

impl MinorityOracle {
    #[allow(clippy::indexing_slicing)]
    pub(crate) fn new(rules: &RuleSet) -> Self {
        let sample_count = rules.total_samples();
        let signature_words = rules.len().div_ceil(WORD_BITS).max(1);

        // Per-sample membership signature across all antecedents
        let mut signatures = vec![vec![0u64; signature_words]; sample_count];

        for id in 0..rules.len() {
            for sample in rules.antecedent(id).captures.iter_ones() {
                signatures[sample][id / WORD_BITS] |= 1u64 << (id % WORD_BITS);
            }
        }

        let mut groups: FxHashMap<Vec<u64>, Vec<usize>> = FxHashMap::default();

        for (sample, signature) in signatures.into_iter().enumerate() {
            groups.entry(signature).or_default().push(sample);
        }

        let mut minority_mask = Bitset::zeroes(sample_count);

        for samples in groups.values() {
            let ones = samples
                .iter()
                .filter(|&&sample| rules.label1().get(sample))
                .count();
            let zeroes = samples.len() - ones;

            // Majority prediction ties toward label 1, so on a tie the
            // label-0 side is the unavoidable loss
            let minority_is_one = ones < zeroes;

            for &sample in samples {
                if rules.label1().get(sample) == minority_is_one {
                    minority_mask.set(sample, true);
                }
            }
        }

        log::debug!(
            "Minority oracle: {} of {sample_count} samples are unavoidable error",
            minority_mask.count(),
        );

        Self { minority_mask }
    }

    /// Unavoidable misclassification count among the samples of `mask`.
    pub(crate) fn bound(&self, mask: &Bitset) -> usize {
        self.minority_mask.and_count(mask)
    }
}
