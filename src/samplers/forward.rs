//! Defines a simple forward sampler for `BayesNet`s
//!
//! Implementation of Koller & Friedman Algorithm 12.1 (pp 489)

use crate::model::directed::BayesNet;
use crate::util::Result;
use crate::variable::Assignment;
use super::Sampler;

use rand::Rng;

/// A simple, stateless `Sampler` for Bayesian networks
pub struct ForwardSampler<'a> {

    /// The `BayesNet` to sample
    model: &'a BayesNet
}


impl<'a> ForwardSampler<'a> {

    pub fn new(model: &'a BayesNet) -> Self {
        ForwardSampler { model }
    }
}

impl<'a> Sampler for ForwardSampler<'a> {

    fn sample<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Assignment> {
        prior_sample(self.model, rng)
    }

}


/// Draw one full assignment from the joint distribution of the network, sampling every variable
/// in topological order given the values already drawn for its parents.
pub fn prior_sample<R: Rng + ?Sized>(model: &BayesNet, rng: &mut R) -> Result<Assignment> {
    let mut a = Assignment::new();

    // every parent precedes its children in the topological order, so the parents of each
    // node are assigned by the time it is sampled
    for node in model.nodes() {
        let val = node.sample(&a, rng)?;
        a.set(node.variable(), val);
    }

    Ok(a)
}
