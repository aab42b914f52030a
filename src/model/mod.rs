//! Defines the models inference runs over: the `BayesNet`, a directed graphical model
//! representing the factorization of a probability distribution P, and the
//! `HiddenMarkovModel` for temporal reasoning.

pub mod directed;
pub mod hmm;

pub use self::directed::{BayesNet, BayesNetBuilder, BayesNode};
pub use self::hmm::HiddenMarkovModel;
