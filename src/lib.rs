// Copyright (c) 2025-present, rule-list
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! A K.I.S.S. implementation of certifiably optimal rule lists.
//!
//! ##### About
//!
//! This crate learns ordered if-then-else rule lists for binary
//! classification over binary features, and certifies that the returned
//! list minimizes the regularized training error:
//!
//! `objective = misclassification rate + c * length`
//!
//! The search is branch-and-bound over rule-list prefixes. Bit-packed
//! capture vectors make evaluating a candidate rule O(N/64); a
//! symmetry-aware prefix cache collapses prefixes that are permutations
//! of each other; and a family of provable bounds (support, lookahead,
//! identical-points) prunes the overwhelming majority of the search
//! space before it is materialized. The result is optimal with respect
//! to the mined antecedents, not approximately so.
//!
//! The engine is single-threaded and cooperative: `step` runs a bounded
//! number of node expansions and returns, so callers can observe
//! progress, checkpoint, or stop early and keep the best list found.
//!
//! # Example usage
//!
//! ```
//! use rule_list::Config;
//!
//! let x = vec![
//!     vec![1, 0, 1],
//!     vec![0, 1, 1],
//!     vec![1, 1, 1],
//! ];
//! let y = [1, 0, 1];
//!
//! let mut learner = Config::new().learner();
//!
//! // fit = begin + step to exhaustion + finish
//! learner.fit(&x, &y, &["stripes", "spots", "tail"])?;
//!
//! let list = learner.rule_list()?;
//! println!("{list}");
//!
//! assert_eq!(vec![true, false, true], learner.predict(&x)?);
//! #
//! # Ok::<(), rule_list::Error>(())
//! ```
//!
//! Driving the search cooperatively instead:
//!
//! ```
//! # use rule_list::Config;
//! # let x = vec![vec![1, 0], vec![0, 1]];
//! # let y = [1, 0];
//! let mut learner = Config::new().learner();
//! let _warnings = learner.begin(&x, &y, &[])?;
//!
//! while learner.step(1_000)? {
//!     // inspect progress, decide to keep going...
//! }
//!
//! let list = learner.finish(false)?;
//! #
//! # Ok::<(), rule_list::Error>(())
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::all, missing_docs, clippy::cargo)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::indexing_slicing)]
#![warn(clippy::pedantic, clippy::nursery)]
#![warn(clippy::expect_used)]
#![allow(clippy::missing_const_for_fn)]
#![warn(clippy::multiple_crate_versions)]
#![allow(clippy::option_if_let_else)]

mod bitset;
mod bounds;
mod cache;
mod config;
mod error;
mod incumbent;
mod learner;
mod mine;
mod minority;
mod queue;
mod rulelist;
mod rules;
mod scheduler;

pub use {
    config::{Ablation, Config, MapType, Policy},
    error::{Error, Result},
    learner::{Learner, Warning},
    rulelist::{Rule, RuleList},
    rules::Clause,
};
