// Copyright (c) 2025-present, rule-list
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use std::collections::TryReserveError;

/// Represents errors that can occur in the rule list learner
#[derive(Debug)]
pub enum Error {
    /// Sample matrix, label vector or feature name dimensions are inconsistent
    ShapeMismatch {
        /// What was being validated (e.g. "label count")
        what: &'static str,

        /// Expected dimension
        expected: usize,

        /// Actual dimension
        got: usize,
    },

    /// A numeric parameter or data value is outside its valid range
    OutOfRange(&'static str),

    /// Unknown search policy or prefix map name
    BadEnum(&'static str),

    /// Prediction was requested before a successful fit
    NotFitted,

    /// Allocation failed while growing the search state
    ///
    /// The current incumbent is still valid and can be retrieved
    /// with `finish`.
    Resource(TryReserveError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RuleListError: {self:?}")
    }
}

impl std::error::Error for Error {}

impl From<TryReserveError> for Error {
    fn from(value: TryReserveError) -> Self {
        Self::Resource(value)
    }
}

/// Learner result
pub type Result<T> = std::result::Result<T, Error>;
