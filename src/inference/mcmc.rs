//! Approximate inference with Markov Chain Monte Carlo: the Gibbs chain visits each value of the
//! query variable in proportion to its posterior probability.

use crate::distribution::ProbDist;
use crate::model::directed::BayesNet;
use crate::samplers::{GibbsSampler, Sampler};
use crate::util::{PosteriorError, Result};
use crate::variable::Assignment;

use log::debug;
use rand::Rng;


/// Estimate ```P(x | evidence)``` from `n` steps of a Gibbs chain.
///
/// # Errors
/// * `PosteriorError::DegenerateDistribution` naming `x` if no starting state consistent with the
///   evidence is found, which happens when the evidence is impossible
pub fn gibbs_ask<R: Rng + ?Sized>(
    x: &str,
    evidence: &Assignment,
    bn: &BayesNet,
    n: usize,
    rng: &mut R,
) -> Result<ProbDist> {
    let node = bn.check_query(x, evidence)?;

    let mut counts = ProbDist::new(x);
    for v in node.domain() {
        counts.set(v.clone(), 0.0);
    }

    let mut sampler = GibbsSampler::new(bn, evidence, rng).map_err(|e| match e {
        PosteriorError::DegenerateDistribution(_) => PosteriorError::DegenerateDistribution(String::from(x)),
        e => e
    })?;
    for _ in 0..n {
        let state = sampler.sample(rng)?;
        if let Some(v) = state.get(x) {
            counts.add(v, 1.0);
        }
    }

    debug!("gibbs chain ran for {} steps", n);
    counts.normalize()
}
