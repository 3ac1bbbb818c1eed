// Copyright (c) 2025-present, rule-list
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::bitset::Bitset;
use crate::rules::{Antecedent, Clause};

/// Visits all k-combinations of `0..m` in lexicographic order.
#[allow(clippy::indexing_slicing)]
fn for_each_combination(m: usize, k: usize, mut visit: impl FnMut(&[usize])) {
    if k == 0 || k > m {
        return;
    }

    let mut idxs: Vec<usize> = (0..k).collect();

    loop {
        visit(&idxs);

        // Find the rightmost index that can still advance
        let mut i = k;
        loop {
            if i == 0 {
                return;
            }
            i -= 1;
            if idxs[i] != i + m - k {
                break;
            }
            if i == 0 {
                return;
            }
        }

        idxs[i] += 1;
        for j in (i + 1)..k {
            idxs[j] = idxs[j - 1] + 1;
        }
    }
}

/// Mines antecedents from a binary sample matrix.
///
/// Candidate clauses are every feature and its negation. A candidate
/// antecedent survives when its support is strictly inside
/// `(min_support * N, (1 - min_support) * N)`. Conjunctions up to
/// `max_card` clauses are formed over all candidate clauses, never
/// combining two tests of the same underlying feature.
///
/// Antecedent ids are assigned in generation order: single positive
/// clauses by feature, single negated clauses by feature, then
/// conjunctions by cardinality in lexicographic clause order.
pub(crate) fn mine_antecedents(
    x: &[Vec<u8>],
    sample_count: usize,
    feature_count: usize,
    max_card: usize,
    min_support: f64,
) -> Vec<Antecedent> {
    #[allow(clippy::cast_precision_loss)]
    let n = sample_count as f64;
    let min_threshold = n * min_support;
    let max_threshold = n * (1.0 - min_support);

    let in_window = |support: usize| {
        #[allow(clippy::cast_precision_loss)]
        let support = support as f64;
        support > min_threshold && support < max_threshold
    };

    // One capture column per candidate clause: positives, then negations
    let mut columns = vec![Bitset::zeroes(sample_count); feature_count];
    for (sample_idx, row) in x.iter().enumerate() {
        for (feature, &value) in row.iter().enumerate() {
            if value != 0 {
                if let Some(column) = columns.get_mut(feature) {
                    column.set(sample_idx, true);
                }
            }
        }
    }

    let ones = Bitset::ones(sample_count);
    let negated: Vec<Bitset> = columns
        .iter()
        .map(|column| {
            let mut out = Bitset::zeroes(sample_count);
            ones.and_not_into(column, &mut out);
            out
        })
        .collect();

    let clause_of = |idx: usize| Clause {
        feature: idx % feature_count,
        negated: idx >= feature_count,
    };
    let column_of = |idx: usize| {
        if idx < feature_count {
            columns.get(idx)
        } else {
            negated.get(idx - feature_count)
        }
        .expect("clause index should be in range")
    };

    let clause_count = feature_count * 2;
    let mut antecedents = Vec::new();

    for idx in 0..clause_count {
        let captures = column_of(idx);

        if in_window(captures.count()) {
            antecedents.push(Antecedent {
                clauses: Box::new([clause_of(idx)]),
                captures: captures.clone(),
            });
        }
    }

    let mut scratch = Bitset::zeroes(sample_count);

    for cardinality in 2..=max_card {
        for_each_combination(clause_count, cardinality, |combo| {
            // Never combine a feature with itself (or its negation)
            let distinct = combo.iter().enumerate().all(|(pos, &idx)| {
                combo
                    .iter()
                    .skip(pos + 1)
                    .all(|&other| other % feature_count != idx % feature_count)
            });

            if !distinct {
                return;
            }

            let mut captures = ones.clone();
            for &idx in combo {
                column_of(idx).and_into(&captures, &mut scratch);
                captures.copy_from(&scratch);
            }

            if in_window(captures.count()) {
                antecedents.push(Antecedent {
                    clauses: combo.iter().map(|&idx| clause_of(idx)).collect(),
                    captures,
                });
            }
        });
    }

    log::debug!(
        "Mined {} antecedents from {feature_count} features (max_card={max_card}, min_support={min_support})",
        antecedents.len(),
    );

    antecedents
}
