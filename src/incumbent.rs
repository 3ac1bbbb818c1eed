// Copyright (c) 2025-present, rule-list
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::rules::AntecedentId;

/// Best complete rule list observed so far
///
/// Objective is monotone non-increasing over the lifetime of a search.
pub(crate) struct Incumbent {
    /// Antecedent ids in evaluation order
    pub prefix: Box<[AntecedentId]>,

    /// Per-rule majority predictions
    pub predictions: Box<[bool]>,

    /// Prediction of the terminal else-branch
    pub default_prediction: bool,

    /// Training misclassification rate plus regularization
    pub objective: f64,

    /// Training misclassification rate alone
    pub error: f64,
}

impl Incumbent {
    /// Starts from the empty prefix: everything falls to the default rule.
    pub(crate) fn root(default_prediction: bool, default_error: f64) -> Self {
        Self {
            prefix: Box::new([]),
            predictions: Box::new([]),
            default_prediction,
            objective: default_error,
            error: default_error,
        }
    }

    pub(crate) fn update(
        &mut self,
        prefix: &[AntecedentId],
        predictions: &[bool],
        default_prediction: bool,
        objective: f64,
        error: f64,
    ) {
        debug_assert!(objective < self.objective);

        self.prefix = prefix.into();
        self.predictions = predictions.into();
        self.default_prediction = default_prediction;
        self.objective = objective;
        self.error = error;

        log::debug!(
            "Incumbent improved: objective={objective:.6}, length={}",
            prefix.len(),
        );
    }
}
