//! Defines a Gibbs `Sampler`.
//!
//! Implementation of Koller & Friedman Algorithm 12.4, restricted to Bayesian networks: each
//! variable is resampled from its distribution given its Markov blanket.

use super::{LikelihoodWeightedSampler, Sampler, WeightedSample, WeightedSampler};
use crate::model::directed::BayesNet;
use crate::util::{PosteriorError, Result};
use crate::variable::Assignment;

use log::trace;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

/// The number of likelihood weighted draws tried when looking for a starting state
pub const MAX_INIT_ATTEMPTS: usize = 1000;

pub struct GibbsSampler<'a> {

    model: &'a BayesNet,

    /// The variables that are resampled, in topological order
    variables: Vec<String>,

    /// The current state of the chain
    sample: Assignment

}


impl<'a> GibbsSampler<'a> {

    /// Construct a new `GibbsSampler` for the `BayesNet`
    ///
    /// The evidence is fixed. The chain starts from the first likelihood weighted sample with
    /// non-zero weight, so every later Markov blanket has some mass.
    ///
    /// # Errors
    /// * `PosteriorError::DegenerateDistribution` naming the evidence variables if none of
    ///   `MAX_INIT_ATTEMPTS` draws is consistent with the evidence
    pub fn new<R: Rng + ?Sized>(model: &'a BayesNet, evidence: &Assignment, rng: &mut R) -> Result<Self> {
        model.check_evidence(evidence)?;

        let mut init = LikelihoodWeightedSampler::new(model, evidence);
        let mut sample = None;
        for attempt in 0..MAX_INIT_ATTEMPTS {
            let WeightedSample(a, w) = init.weighted_sample(rng)?;
            if w > 0.0 {
                trace!("gibbs chain initialized after {} draws", attempt + 1);
                sample = Some(a);
                break;
            }
        }

        let sample = sample.ok_or_else(|| {
            let names: Vec<&str> = evidence.variables().map(|v| v.as_str()).collect();
            PosteriorError::DegenerateDistribution(names.join(", "))
        })?;

        let variables = model.nodes()
                             .map(|n| n.variable())
                             .filter(|v| !evidence.contains(v))
                             .map(String::from)
                             .collect();

        Ok(GibbsSampler { model, variables, sample })
    }


    /// The current state of the chain
    pub fn state(&self) -> &Assignment {
        &self.sample
    }
}


/// The unnormalized distribution of `var` given its Markov blanket in `state`:
///     ```P(var | Pa(var)) * prod_{c in children(var)} P(c | Pa(c))```
///
/// `state` must be a full assignment; on return `var` holds the last value of its domain.
fn markov_blanket_weights(model: &BayesNet, var: &str, state: &mut Assignment) -> Result<Vec<f64>> {
    let node = model.node(var)?;
    let children = model.children(var)?;

    let mut weights = Vec::with_capacity(node.domain().len());
    for val in node.domain() {
        state.set(var, val.clone());

        let mut w = node.p(val, state)?;
        for c in children {
            let child = model.node(c)?;
            let cv = state.get(c).ok_or_else(|| PosteriorError::IncompleteAssignment(vec![c.clone()]))?;
            w *= child.p(cv, state)?;
        }

        weights.push(w);
    }

    Ok(weights)
}


impl<'a> Sampler for GibbsSampler<'a> {

    fn sample<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Assignment> {
        for var in self.variables.iter() {
            let node = self.model.node(var)?;

            // compute P(var | markov_blanket(var)) and draw from it
            let weights = markov_blanket_weights(self.model, var, &mut self.sample)?;
            trace!("resampling {} from {:?}", var, weights);

            let dist = WeightedIndex::new(&weights)
                .map_err(|_| PosteriorError::DegenerateDistribution(var.clone()))?;
            self.sample.set(var, node.domain()[dist.sample(rng)].clone());
        }

        Ok(self.sample.clone())
    }

}
