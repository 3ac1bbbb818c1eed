// Copyright (c) 2025-present, rule-list
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::bitset::Bitset;
use crate::config::Config;
use crate::mine::mine_antecedents;
use crate::rulelist::{Rule, RuleList};
use crate::rules::RuleSet;
use crate::scheduler::Scheduler;
use crate::{Error, Result};

/// How many expansions `fit` runs between suspension points
const FIT_STEP_BUDGET: u64 = 4_096;

/// Non-fatal diagnostics returned by [`Learner::begin`]
#[derive(Clone, Debug, PartialEq)]
pub enum Warning {
    /// The regularization constant is below `1 / N`, i.e. finer than a
    /// single sample; longer lists are essentially free
    RegularizationBelowSampleResolution {
        /// Configured constant
        c: f64,

        /// `1 / N`
        threshold: f64,
    },

    /// The regularization constant exceeds the minority class fraction;
    /// the empty list may be unbeatable
    RegularizationAboveClassBalance {
        /// Configured constant
        c: f64,

        /// `min(|L0|, |L1|) / N`
        threshold: f64,
    },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RegularizationBelowSampleResolution { c, threshold } => write!(
                f,
                "regularization ({c}) should not be less than 1/n_samples ({threshold})"
            ),
            Self::RegularizationAboveClassBalance { c, threshold } => write!(
                f,
                "regularization ({c}) should not be greater than the minority class fraction ({threshold})"
            ),
        }
    }
}

/// Certifiably optimal rule list learner
///
/// Drives one branch-and-bound search at a time: [`Learner::begin`]
/// validates the training data and seeds the search, [`Learner::step`]
/// runs a bounded number of node expansions, and [`Learner::finish`]
/// retrieves the incumbent as a [`RuleList`]. [`Learner::fit`] chains
/// the three for callers that do not need to observe progress.
pub struct Learner {
    config: Config,
    features: Vec<String>,
    search: Option<Scheduler>,
    fitted: Option<RuleList>,
}

impl Learner {
    /// Creates an idle learner from a configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            features: Vec::new(),
            search: None,
            fitted: None,
        }
    }

    /// The active configuration
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn validate(
        &self,
        x: &[Vec<u8>],
        y: &[u8],
        features: &[&str],
    ) -> Result<(usize, usize)> {
        let sample_count = x.len();
        if sample_count == 0 {
            return Err(Error::OutOfRange("sample matrix must not be empty"));
        }

        let feature_count = x.first().map_or(0, Vec::len);
        if feature_count == 0 {
            return Err(Error::OutOfRange("samples must have at least one feature"));
        }

        for row in x {
            if row.len() != feature_count {
                return Err(Error::ShapeMismatch {
                    what: "feature count",
                    expected: feature_count,
                    got: row.len(),
                });
            }

            if row.iter().any(|&value| value > 1) {
                return Err(Error::OutOfRange("sample values must be 0 or 1"));
            }
        }

        if y.len() != sample_count {
            return Err(Error::ShapeMismatch {
                what: "label count",
                expected: sample_count,
                got: y.len(),
            });
        }

        if y.iter().any(|&label| label > 1) {
            return Err(Error::OutOfRange("labels must be 0 or 1"));
        }

        if !(0.0..=1.0).contains(&self.config.c) {
            return Err(Error::OutOfRange(
                "regularization must be between 0.0 and 1.0",
            ));
        }

        if !(0.0..=0.5).contains(&self.config.min_support) {
            return Err(Error::OutOfRange(
                "min support must be between 0.0 and 0.5",
            ));
        }

        if self.config.max_card == 0 {
            return Err(Error::OutOfRange(
                "max cardinality must be at least 1",
            ));
        }

        if self.config.max_card > feature_count {
            return Err(Error::ShapeMismatch {
                what: "max cardinality",
                expected: feature_count,
                got: self.config.max_card,
            });
        }

        if !features.is_empty() && features.len() != feature_count {
            return Err(Error::ShapeMismatch {
                what: "feature name count",
                expected: feature_count,
                got: features.len(),
            });
        }

        Ok((sample_count, feature_count))
    }

    #[allow(clippy::cast_precision_loss)]
    fn diagnostics(&self, y: &[u8]) -> Vec<Warning> {
        let n = y.len() as f64;
        let positives = y.iter().filter(|&&label| label == 1).count() as f64;
        let minority_fraction = positives.min(n - positives) / n;

        let mut warnings = Vec::new();

        if self.config.c < 1.0 / n {
            warnings.push(Warning::RegularizationBelowSampleResolution {
                c: self.config.c,
                threshold: 1.0 / n,
            });
        }

        if self.config.c > minority_fraction {
            warnings.push(Warning::RegularizationAboveClassBalance {
                c: self.config.c,
                threshold: minority_fraction,
            });
        }

        for warning in &warnings {
            log::warn!("{warning}");
        }

        warnings
    }

    /// Validates the training data, mines antecedents and seeds the
    /// search with the empty prefix.
    ///
    /// `x` is one row per sample, all values 0 or 1; `y` holds one 0/1
    /// label per sample. An empty `features` slice generates
    /// `feature1..featureF` names. Validation failures leave the learner
    /// untouched. Returns non-fatal numerical diagnostics.
    pub fn begin(&mut self, x: &[Vec<u8>], y: &[u8], features: &[&str]) -> Result<Vec<Warning>> {
        let (sample_count, feature_count) = self.validate(x, y, features)?;

        let warnings = self.diagnostics(y);

        let antecedents = mine_antecedents(
            x,
            sample_count,
            feature_count,
            self.config.max_card,
            self.config.min_support,
        );

        let mut label1 = Bitset::zeroes(sample_count);
        for (idx, &label) in y.iter().enumerate() {
            if label == 1 {
                label1.set(idx, true);
            }
        }

        let mut label0 = Bitset::zeroes(sample_count);
        Bitset::ones(sample_count).and_not_into(&label1, &mut label0);

        let rules = RuleSet::new(antecedents, label0, label1);

        let scheduler = Scheduler::new(rules, &self.config)?;

        self.features = if features.is_empty() {
            (1..=feature_count).map(|idx| format!("feature{idx}")).collect()
        } else {
            features.iter().map(ToString::to_string).collect()
        };
        self.search = Some(scheduler);

        Ok(warnings)
    }

    /// Runs up to `budget` node expansions of the active search.
    ///
    /// Returns `true` while more work remains. Fails with
    /// [`Error::NotFitted`] when no search is active, or with
    /// [`Error::Resource`] when the cache cannot grow (the incumbent
    /// stays valid and `finish` still works).
    pub fn step(&mut self, budget: u64) -> Result<bool> {
        self.search
            .as_mut()
            .ok_or(Error::NotFitted)?
            .step(budget)
    }

    /// Ends the active search and returns the incumbent rule list.
    ///
    /// Pass `early = true` when stopping before the queue is exhausted;
    /// the returned list is then the best found so far rather than the
    /// certified optimum. Must be called exactly once per `begin`.
    pub fn finish(&mut self, early: bool) -> Result<RuleList> {
        let scheduler = self.search.take().ok_or(Error::NotFitted)?;

        let incumbent = scheduler.incumbent();

        if early {
            log::debug!(
                "Finishing early after {} expansions (objective={:.6})",
                scheduler.expansions(),
                incumbent.objective,
            );
        }

        let rules = incumbent
            .prefix
            .iter()
            .zip(incumbent.predictions.iter())
            .map(|(&id, &prediction)| Rule {
                clauses: scheduler.rules().antecedent(id).clauses.to_vec(),
                prediction,
            })
            .collect();

        let list = RuleList::new(
            rules,
            incumbent.default_prediction,
            self.features.clone(),
            self.config.prediction_name.clone(),
        );

        self.fitted = Some(list.clone());

        Ok(list)
    }

    /// Runs a complete search: `begin`, `step` until exhaustion or the
    /// expansion limit, then `finish`.
    pub fn fit(&mut self, x: &[Vec<u8>], y: &[u8], features: &[&str]) -> Result<Vec<Warning>> {
        let warnings = self.begin(x, y, features)?;

        while self.step(FIT_STEP_BUDGET)? {}

        self.finish(false)?;

        Ok(warnings)
    }

    /// The learned rule list of the last finished search.
    pub fn rule_list(&self) -> Result<&RuleList> {
        self.fitted.as_ref().ok_or(Error::NotFitted)
    }

    /// Evaluates the learned rule list on a sample matrix.
    ///
    /// The feature width must match the training data.
    pub fn predict(&self, x: &[Vec<u8>]) -> Result<Vec<bool>> {
        self.rule_list()?.predict(x)
    }

    /// Accuracy of the learned rule list against the given labels.
    pub fn score(&self, x: &[Vec<u8>], y: &[u8]) -> Result<f64> {
        self.rule_list()?.score(x, y)
    }

    /// Recomputes and asserts the structural invariants of the active
    /// search state. Test and debugging aid; panics on violation.
    #[doc(hidden)]
    pub fn verify_search_state(&self) {
        if let Some(scheduler) = &self.search {
            scheduler.verify();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn begin_rejects_bad_shapes() {
        let mut learner = Config::new().learner();

        assert!(matches!(
            learner.begin(&[], &[], &[]),
            Err(Error::OutOfRange(_))
        ));

        assert!(matches!(
            learner.begin(&[vec![1, 0], vec![1]], &[1, 0], &[]),
            Err(Error::ShapeMismatch { .. })
        ));

        assert!(matches!(
            learner.begin(&[vec![1, 0]], &[1, 0], &[]),
            Err(Error::ShapeMismatch { .. })
        ));

        assert!(matches!(
            learner.begin(&[vec![2, 0]], &[1], &[]),
            Err(Error::OutOfRange(_))
        ));

        assert!(matches!(
            learner.begin(&[vec![1, 0]], &[2], &[]),
            Err(Error::OutOfRange(_))
        ));

        assert!(matches!(
            learner.begin(&[vec![1, 0]], &[1], &["only_one"]),
            Err(Error::ShapeMismatch { .. })
        ));

        // Nothing was mutated: stepping is still invalid
        assert!(matches!(learner.step(1), Err(Error::NotFitted)));
    }

    #[test]
    fn begin_rejects_bad_parameters() {
        let x = vec![vec![1, 0], vec![0, 1]];
        let y = [1, 0];

        let mut learner = Config::new().regularization(1.5).learner();
        assert!(matches!(
            learner.begin(&x, &y, &[]),
            Err(Error::OutOfRange(_))
        ));

        let mut learner = Config::new().min_support(0.6).learner();
        assert!(matches!(
            learner.begin(&x, &y, &[]),
            Err(Error::OutOfRange(_))
        ));

        let mut learner = Config::new().max_cardinality(0).learner();
        assert!(matches!(
            learner.begin(&x, &y, &[]),
            Err(Error::OutOfRange(_))
        ));

        let mut learner = Config::new().max_cardinality(10).learner();
        assert!(matches!(
            learner.begin(&x, &y, &[]),
            Err(Error::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn predict_before_fit_is_not_fitted() {
        let learner = Config::new().learner();

        assert!(matches!(learner.predict(&[vec![1, 0]]), Err(Error::NotFitted)));
        assert!(matches!(learner.rule_list(), Err(Error::NotFitted)));
    }

    #[test]
    fn finish_is_once_per_begin() -> crate::Result<()> {
        let mut learner = Config::new().learner();

        learner.begin(&[vec![1, 0], vec![0, 1]], &[1, 0], &[])?;
        while learner.step(16)? {}

        learner.finish(false)?;
        assert!(matches!(learner.finish(false), Err(Error::NotFitted)));

        // The fitted list survives
        assert!(learner.rule_list().is_ok());

        Ok(())
    }

    #[test]
    fn warnings_are_returned_and_non_fatal() -> crate::Result<()> {
        let x = vec![vec![1, 0], vec![0, 1], vec![1, 1]];
        let y = [1, 0, 0];

        // c below 1/3
        let mut learner = Config::new().regularization(0.1).learner();
        let warnings = learner.begin(&x, &y, &[])?;
        assert!(warnings.iter().any(|w| matches!(
            w,
            Warning::RegularizationBelowSampleResolution { .. }
        )));

        // c above the minority fraction (1/3)
        let mut learner = Config::new().regularization(0.49).learner();
        let warnings = learner.begin(&x, &y, &[])?;
        assert!(warnings.iter().any(|w| matches!(
            w,
            Warning::RegularizationAboveClassBalance { .. }
        )));

        Ok(())
    }

    #[test]
    fn generated_feature_names() -> crate::Result<()> {
        let mut learner = Config::new().learner();
        learner.fit(&[vec![1, 0], vec![0, 1]], &[1, 0], &[])?;

        assert_eq!(
            &["feature1".to_string(), "feature2".to_string()],
            learner.rule_list()?.features(),
        );

        let mut learner = Config::new().learner();
        learner.fit(&[vec![1, 0], vec![0, 1]], &[1, 0], &["a", "b"])?;
        assert_eq!(&["a".to_string(), "b".to_string()], learner.rule_list()?.features());

        Ok(())
    }
}
