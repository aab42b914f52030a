//! Defines the `Sampler` trait - an object that can randomly sample from a `BayesNet`.

use crate::util::Result;
use crate::variable::Assignment;

use rand::Rng;

pub mod forward;
pub mod gibbs;
pub mod likelihood;

pub use self::forward::{prior_sample, ForwardSampler};
pub use self::gibbs::GibbsSampler;
pub use self::likelihood::LikelihoodWeightedSampler;

pub trait Sampler {

    /// Draw the next full assignment, using `rng` as the source of randomness.
    fn sample<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Assignment>;

}


/// A sample (a full assignment) and the associated weight.
/// Used for likelihood weighting.
#[derive(Clone, Debug, PartialEq)]
pub struct WeightedSample(pub Assignment, pub f64);

pub trait WeightedSampler {

    fn weighted_sample<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<WeightedSample>;

}
