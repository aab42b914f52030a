//! Defines the `Error` type for the posterior library, along with a few numeric helpers shared by
//! the inference routines.

use crate::variable::Value;

use std::result;
use thiserror::Error;

pub type Result<T> = result::Result<T, PosteriorError>;

/// Tolerance used when checking that a set of probabilities sums to one.
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

#[derive(Clone, Debug, PartialEq, Error)]
pub enum PosteriorError {

    /// The graph described by a set of nodes is not a DAG, refers to a parent that does not
    /// exist, or defines a variable twice.
    #[error("Invalid network structure: {0}")]
    Structural(String),

    /// A query or evidence referenced a variable that is not part of the model.
    #[error("Unknown variable: {0}")]
    UnknownVariable(String),

    /// A value outside of a variable's domain was provided.
    #[error("Value {value} is not in the domain of {variable}")]
    UnknownValue { variable: String, value: Value },

    /// Represents an incomplete assignment where a complete assignment was required.
    /// The value in the tuple is the names of the variables that were missing from the assignment.
    #[error("Missing assignments to the required variables: {0:?}")]
    IncompleteAssignment(Vec<String>),

    /// Normalization was attempted on a distribution with zero total weight.
    #[error("Cannot normalize the distribution of {0}: all weights are zero")]
    DegenerateDistribution(String),

    /// Represents a situation in which a negative or non-finite probability was provided
    #[error("Invalid probability: {0}")]
    InvalidProbability(f64),

    /// Represents an attempt to initialize a variable with an incompatible Initialization
    #[error("Invalid initialization: {0}")]
    InvalidInitialization(String),

    /// A conditional probability table is missing rows or does not hold distributions
    #[error("Invalid conditional probability table: {0}")]
    InvalidTable(String),

    /// An event could not be matched against the declared variables
    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    /// The query variable was also part of the evidence
    #[error("Query variable {0} is part of the evidence")]
    QueryInEvidence(String),

    /// A hidden Markov model was given inconsistent parameters
    #[error("Invalid model: {0}")]
    InvalidModel(String),

    /// An observation with no emission model
    #[error("No emission model for observation {0}")]
    UnknownObservation(Value),

    /// A state index outside of the model's state space
    #[error("State {0} is out of range")]
    InvalidState(usize),

    /// A time step that is not covered by the available evidence
    #[error("Time step {t} is not covered by {available} observations")]
    InvalidTimeStep { t: usize, available: usize },
}


/// Normalize a vector of non-negative weights in place.
///
/// # Errors
/// * `PosteriorError::DegenerateDistribution` if the weights sum to zero. `name` is used to
///   identify the distribution in the error.
pub fn normalize_weights(weights: &mut [f64], name: &str) -> Result<()> {
    if let Some(&w) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
        return Err(PosteriorError::InvalidProbability(w));
    }

    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return Err(PosteriorError::DegenerateDistribution(String::from(name)));
    }

    for w in weights.iter_mut() {
        *w /= total;
    }

    Ok(())
}

/// Check that `p` is a valid probability
pub fn check_probability(p: f64) -> Result<f64> {
    if p.is_finite() && (0.0..=1.0).contains(&p) {
        Ok(p)
    } else {
        Err(PosteriorError::InvalidProbability(p))
    }
}
