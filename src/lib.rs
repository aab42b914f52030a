//! Probabilistic inference over discrete random variables: exact and approximate inference in
//! Bayesian networks, and smoothing in hidden Markov models.
//!
//! Models are built once and queried many times. Every query is a plain function over an
//! immutable model, the evidence, and for the sampling algorithms, a caller supplied random number
//! generator.

pub mod distribution;
pub mod factor;
pub mod inference;
pub mod init;
pub mod model;
pub mod samplers;
pub mod temporal;
pub mod util;
pub mod variable;

#[cfg(test)]
mod fixtures;

pub use crate::distribution::{enumerate_joint_ask, JointProbDist, ProbDist};
pub use crate::inference::{elimination_ask, enumeration_ask, gibbs_ask, likelihood_weighting, rejection_sampling};
pub use crate::init::Initialization;
pub use crate::model::{BayesNet, BayesNetBuilder, BayesNode, HiddenMarkovModel};
pub use crate::temporal::{fixed_lag_smoothing, forward_backward, FixedLagSmoother};
pub use crate::util::{PosteriorError, Result};
pub use crate::variable::{consistent_with, Assignment, Event, Value};
