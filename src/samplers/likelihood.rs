//! Defines a `Sampler` for likelihood weighted particle generation for `BayesNet`s.
//!
//! Koller & Friedman Algorithm 12.2 (pp 493)

use super::{WeightedSample, WeightedSampler};
use crate::model::directed::BayesNet;
use crate::util::Result;
use crate::variable::Assignment;

use log::trace;
use rand::Rng;


/// A simple `Sampler` for Bayesian Models that uses likelihood weighted sampling to draw full
/// assignments from the `BayesNet` given evidence.
pub struct LikelihoodWeightedSampler<'a> {

    /// The model from which to sample
    model: &'a BayesNet,

    /// The evidence on which to condition
    evidence: &'a Assignment

}


impl<'a> LikelihoodWeightedSampler<'a> {

    pub fn new(model: &'a BayesNet, evidence: &'a Assignment) -> Self {
        LikelihoodWeightedSampler { model, evidence }
    }

}


impl<'a> WeightedSampler for LikelihoodWeightedSampler<'a> {

    fn weighted_sample<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<WeightedSample> {
        let mut a = Assignment::new();
        let mut w = 1.0;

        for node in self.model.nodes() {
            let var = node.variable();

            if let Some(val) = self.evidence.get(var) {
                // update the weight by P(var | Pa(var))
                w *= node.p(val, &a)?;
                a.set(var, val.clone());
            } else {
                let val = node.sample(&a, rng)?;
                a.set(var, val);
            }
        }

        trace!("weighted sample with weight {}", w);
        Ok(WeightedSample(a, w))
    }

}
