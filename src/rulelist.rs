// Copyright (c) 2025-present, rule-list
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::rules::Clause;
use crate::{Error, Result};

/// One if-then rule of a learned list
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rule {
    /// The conjunction of feature tests that must all hold
    pub clauses: Vec<Clause>,

    /// The label emitted when the antecedent matches
    pub prediction: bool,
}

/// A learned rule list: ordered rules plus the default rule
///
/// This is a plain value type; it owns everything needed to predict and
/// to render itself, and (with the `serde` feature) to be persisted by
/// the caller.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RuleList {
    rules: Vec<Rule>,
    default_prediction: bool,
    features: Vec<String>,
    prediction_name: String,
}

impl RuleList {
    pub(crate) fn new(
        rules: Vec<Rule>,
        default_prediction: bool,
        features: Vec<String>,
        prediction_name: String,
    ) -> Self {
        Self {
            rules,
            default_prediction,
            features,
            prediction_name,
        }
    }

    /// The rules in evaluation order, default rule excluded
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Prediction of the terminal else-branch
    #[must_use]
    pub fn default_prediction(&self) -> bool {
        self.default_prediction
    }

    /// Names of the training features
    #[must_use]
    pub fn features(&self) -> &[String] {
        &self.features
    }

    /// Name of the predicted feature
    #[must_use]
    pub fn prediction_name(&self) -> &str {
        &self.prediction_name
    }

    /// Number of rules, default rule excluded
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether only the default rule remains
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn validate_row(&self, row: &[u8]) -> Result<()> {
        if row.len() != self.features.len() {
            return Err(Error::ShapeMismatch {
                what: "feature count",
                expected: self.features.len(),
                got: row.len(),
            });
        }

        if row.iter().any(|&value| value > 1) {
            return Err(Error::OutOfRange("sample values must be 0 or 1"));
        }

        Ok(())
    }

    /// Evaluates the list top-down on a single sample row.
    pub fn predict_row(&self, row: &[u8]) -> Result<bool> {
        self.validate_row(row)?;

        Ok(self
            .rules
            .iter()
            .find(|rule| rule.clauses.iter().all(|clause| clause.holds(row)))
            .map_or(self.default_prediction, |rule| rule.prediction))
    }

    /// Evaluates the list on a sample matrix.
    ///
    /// The feature width must match the training data.
    pub fn predict(&self, x: &[Vec<u8>]) -> Result<Vec<bool>> {
        x.iter().map(|row| self.predict_row(row)).collect()
    }

    /// Accuracy of the list's predictions against the given labels.
    pub fn score(&self, x: &[Vec<u8>], y: &[u8]) -> Result<f64> {
        if x.len() != y.len() {
            return Err(Error::ShapeMismatch {
                what: "label count",
                expected: x.len(),
                got: y.len(),
            });
        }

        if y.iter().any(|&label| label > 1) {
            return Err(Error::OutOfRange("labels must be 0 or 1"));
        }

        let predictions = self.predict(x)?;

        let hits = predictions
            .iter()
            .zip(y.iter())
            .filter(|(&prediction, &label)| prediction == (label == 1))
            .count();

        #[allow(clippy::cast_precision_loss)]
        Ok(hits as f64 / y.len().max(1) as f64)
    }

    fn render_clause(&self, clause: &Clause) -> String {
        let name = self
            .features
            .get(clause.feature)
            .map_or("?", String::as_str);

        if clause.negated {
            format!("not {name}")
        } else {
            name.to_string()
        }
    }

    fn render_antecedent(&self, rule: &Rule) -> String {
        rule.clauses
            .iter()
            .map(|clause| self.render_clause(clause))
            .collect::<Vec<_>>()
            .join(" && ")
    }
}

fn label(prediction: bool) -> &'static str {
    if prediction {
        "True"
    } else {
        "False"
    }
}

impl std::fmt::Display for RuleList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = &self.prediction_name;

        for (idx, rule) in self.rules.iter().enumerate() {
            let keyword = if idx == 0 { "if" } else { "else if" };

            writeln!(
                f,
                "{keyword} [{}]: {name} = {}",
                self.render_antecedent(rule),
                label(rule.prediction),
            )?;
        }

        if self.rules.is_empty() {
            write!(f, "{name} = {}", label(self.default_prediction))
        } else {
            write!(f, "else {name} = {}", label(self.default_prediction))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn sample_list() -> RuleList {
        RuleList::new(
            vec![
                Rule {
                    clauses: vec![
                        Clause {
                            feature: 0,
                            negated: false,
                        },
                        Clause {
                            feature: 2,
                            negated: true,
                        },
                    ],
                    prediction: false,
                },
                Rule {
                    clauses: vec![Clause {
                        feature: 1,
                        negated: false,
                    }],
                    prediction: true,
                },
            ],
            false,
            vec!["age>40".into(), "priors=0".into(), "employed".into()],
            "recidivate".into(),
        )
    }

    #[test]
    fn render_rules() {
        let expected = "\
if [age>40 && not employed]: recidivate = False
else if [priors=0]: recidivate = True
else recidivate = False";

        assert_eq!(expected, sample_list().to_string());
    }

    #[test]
    fn render_default_only() {
        let list = RuleList::new(vec![], true, vec!["f1".into()], "prediction".into());
        assert_eq!("prediction = True", list.to_string());
    }

    #[test]
    fn predict_top_down() -> crate::Result<()> {
        let list = sample_list();

        // First rule fires
        assert!(!list.predict_row(&[1, 1, 0])?);
        // First misses (employed), second fires
        assert!(list.predict_row(&[1, 1, 1])?);
        // Nothing fires: default
        assert!(!list.predict_row(&[0, 0, 1])?);

        Ok(())
    }

    #[test]
    fn predict_checks_width_and_values() {
        let list = sample_list();

        assert!(matches!(
            list.predict_row(&[1, 0]),
            Err(Error::ShapeMismatch { .. })
        ));
        assert!(matches!(
            list.predict_row(&[1, 0, 2]),
            Err(Error::OutOfRange(_))
        ));
    }

    #[test]
    fn score_counts_matches() -> crate::Result<()> {
        let list = sample_list();

        let x = vec![vec![1, 1, 0], vec![1, 1, 1], vec![0, 0, 1]];

        let perfect = list.score(&x, &[0, 1, 0])?;
        assert!((perfect - 1.0).abs() < f64::EPSILON);

        let two_thirds = list.score(&x, &[0, 1, 1])?;
        assert!((two_thirds - 2.0 / 3.0).abs() < 1e-12);

        assert!(list.score(&x, &[0, 1]).is_err());

        Ok(())
    }
}
