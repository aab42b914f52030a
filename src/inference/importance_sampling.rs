//! Approximate inference using particle-based approximations.
//!
//! Implementation of Importance Sampling via Normalized Likelihood Weighting, described in Koller &
//! Friedman 12.2.3.3

use crate::distribution::ProbDist;
use crate::model::directed::BayesNet;
use crate::samplers::{LikelihoodWeightedSampler, WeightedSample, WeightedSampler};
use crate::util::Result;
use crate::variable::Assignment;

use log::debug;
use rand::Rng;


/// Estimate ```P(x | evidence)``` from `n` likelihood weighted samples.
///
/// # Errors
/// * `PosteriorError::DegenerateDistribution` if every sample has weight zero
pub fn likelihood_weighting<R: Rng + ?Sized>(
    x: &str,
    evidence: &Assignment,
    bn: &BayesNet,
    n: usize,
    rng: &mut R,
) -> Result<ProbDist> {
    let node = bn.check_query(x, evidence)?;

    let mut weights = ProbDist::new(x);
    for v in node.domain() {
        weights.set(v.clone(), 0.0);
    }

    // sample away...
    let mut sampler = LikelihoodWeightedSampler::new(bn, evidence);
    let mut total = 0.0;
    for _ in 0..n {
        let WeightedSample(a, w) = sampler.weighted_sample(rng)?;
        if let Some(v) = a.get(x) {
            weights.add(v, w);
            total += w;
        }
    }

    debug!("likelihood weighting drew {} samples with total weight {}", n, total);
    weights.normalize()
}
