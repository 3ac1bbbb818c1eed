// Copyright (c) 2025-present, rule-list
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::{Error, Learner};
use std::str::FromStr;

/// Search policy, i.e. the criterion ordering nodes in the queue
///
/// Smaller keys are popped first; ties are always broken by
/// insertion order.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Policy {
    /// Breadth-first search (by prefix length)
    Bfs,

    /// Favors nodes with a low bound relative to their uncaptured mass
    Curious,

    /// Orders by objective lower bound
    #[default]
    LowerBound,

    /// Orders by objective value
    Objective,

    /// Depth-first search (by prefix length, newest first)
    Dfs,
}

impl From<Policy> for u8 {
    fn from(val: Policy) -> Self {
        match val {
            Policy::Bfs => 0,
            Policy::Curious => 1,
            Policy::LowerBound => 2,
            Policy::Objective => 3,
            Policy::Dfs => 4,
        }
    }
}

impl TryFrom<u8> for Policy {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Bfs),
            1 => Ok(Self::Curious),
            2 => Ok(Self::LowerBound),
            3 => Ok(Self::Objective),
            4 => Ok(Self::Dfs),
            _ => Err(Error::BadEnum("policy")),
        }
    }
}

impl FromStr for Policy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bfs" => Ok(Self::Bfs),
            "curious" => Ok(Self::Curious),
            "lower_bound" => Ok(Self::LowerBound),
            "objective" => Ok(Self::Objective),
            "dfs" => Ok(Self::Dfs),
            _ => Err(Error::BadEnum("policy")),
        }
    }
}

/// Canonicalization variant of the prefix cache
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum MapType {
    /// No canonicalization; every antecedent order is a separate entry
    ///
    /// Only useful for ablation studies and testing.
    None,

    /// Keyed by the sorted antecedent id tuple
    #[default]
    Prefix,

    /// Keyed by the uncaptured bitvector
    ///
    /// Distinct orderings that capture the same samples collapse.
    Captured,
}

impl From<MapType> for u8 {
    fn from(val: MapType) -> Self {
        match val {
            MapType::None => 0,
            MapType::Prefix => 1,
            MapType::Captured => 2,
        }
    }
}

impl TryFrom<u8> for MapType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::Prefix),
            2 => Ok(Self::Captured),
            _ => Err(Error::BadEnum("map type")),
        }
    }
}

impl FromStr for MapType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "prefix" => Ok(Self::Prefix),
            "captured" => Ok(Self::Captured),
            _ => Err(Error::BadEnum("map type")),
        }
    }
}

/// Which pruning bounds to disable
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Ablation {
    /// All bounds active
    #[default]
    None,

    /// Disables the antecedent support bound
    NoSupportBound,

    /// Disables the lookahead bound
    NoLookahead,
}

impl From<Ablation> for u8 {
    fn from(val: Ablation) -> Self {
        match val {
            Ablation::None => 0,
            Ablation::NoSupportBound => 1,
            Ablation::NoLookahead => 2,
        }
    }
}

impl TryFrom<u8> for Ablation {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::NoSupportBound),
            2 => Ok(Self::NoLookahead),
            _ => Err(Error::BadEnum("ablation")),
        }
    }
}

/// Learner configuration builder
#[derive(Clone, Debug)]
pub struct Config {
    /// Regularization constant penalizing each rule in the list
    pub c: f64,

    /// Maximum number of node expansions before the search stops
    pub n_iter: u64,

    /// Search policy
    pub policy: Policy,

    /// Prefix cache canonicalization variant
    pub map_type: MapType,

    /// Bound ablation
    pub ablation: Ablation,

    /// Maximum number of feature tests per mined antecedent
    pub max_card: usize,

    /// Fraction of samples an antecedent must capture to be mined,
    /// and one minus the fraction it may capture at most
    pub min_support: f64,

    /// Whether to build the identical-points oracle and apply the
    /// minority bound
    pub minority_bound: bool,

    /// Name of the predicted feature, used by the rendered string form
    pub prediction_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            c: 0.01,
            n_iter: 10_000,
            policy: Policy::default(),
            map_type: MapType::default(),
            ablation: Ablation::default(),
            max_card: 2,
            min_support: 0.01,
            minority_bound: false,
            prediction_name: "prediction".into(),
        }
    }
}

impl Config {
    /// Initializes a new config with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the regularization constant.
    ///
    /// Higher values penalize longer rule lists.
    ///
    /// Valid range: [0.0, 1.0]. Defaults to 0.01.
    #[must_use]
    pub fn regularization(mut self, c: f64) -> Self {
        self.c = c;
        self
    }

    /// Sets the maximum number of node expansions.
    ///
    /// Defaults to 10000.
    #[must_use]
    pub fn max_nodes(mut self, n_iter: u64) -> Self {
        self.n_iter = n_iter;
        self
    }

    /// Sets the search policy.
    #[must_use]
    pub fn policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the prefix cache variant.
    #[must_use]
    pub fn map_type(mut self, map_type: MapType) -> Self {
        self.map_type = map_type;
        self
    }

    /// Disables some pruning bounds.
    #[must_use]
    pub fn ablation(mut self, ablation: Ablation) -> Self {
        self.ablation = ablation;
        self
    }

    /// Sets the maximum antecedent cardinality used when mining rules.
    ///
    /// Valid range: [1, feature count]. Defaults to 2.
    #[must_use]
    pub fn max_cardinality(mut self, max_card: usize) -> Self {
        self.max_card = max_card;
        self
    }

    /// Sets the minimum support fraction for mined antecedents.
    ///
    /// Valid range: [0.0, 0.5]. Defaults to 0.01.
    #[must_use]
    pub fn min_support(mut self, min_support: f64) -> Self {
        self.min_support = min_support;
        self
    }

    /// Enables or disables the identical-points (minority) bound.
    ///
    /// Defaults to disabled.
    #[must_use]
    pub fn minority_bound(mut self, enabled: bool) -> Self {
        self.minority_bound = enabled;
        self
    }

    /// Sets the name of the predicted feature.
    ///
    /// Only affects the rendered string form of the learned list.
    #[must_use]
    pub fn prediction_name(mut self, name: impl Into<String>) -> Self {
        self.prediction_name = name.into();
        self
    }

    /// Creates a learner from this configuration.
    #[must_use]
    pub fn learner(self) -> Learner {
        Learner::new(self)
    }
}
