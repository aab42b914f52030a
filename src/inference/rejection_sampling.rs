//! Approximate inference by rejection sampling: draw from the prior and keep the samples that
//! agree with the evidence.

use crate::distribution::ProbDist;
use crate::model::directed::BayesNet;
use crate::samplers::{ForwardSampler, Sampler};
use crate::util::Result;
use crate::variable::{consistent_with, Assignment};

use log::debug;
use rand::Rng;


/// Estimate ```P(x | evidence)``` from `n` samples of the prior distribution.
///
/// # Errors
/// * `PosteriorError::DegenerateDistribution` if no sample is consistent with the evidence
pub fn rejection_sampling<R: Rng + ?Sized>(
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

    let mut sampler = ForwardSampler::new(bn);
    let mut accepted = 0;
    for _ in 0..n {
        let sample = sampler.sample(rng)?;
        if !consistent_with(&sample, evidence) {
            continue;
        }

        if let Some(v) = sample.get(x) {
            counts.add(v, 1.0);
            accepted += 1;
        }
    }

    debug!("rejection sampling accepted {} of {} samples", accepted, n);
    counts.normalize()
}


#[cfg(test)]
mod tests {

    use super::*;
    use crate::fixtures::{sprinkler, T};
    use crate::util::PosteriorError;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn keeps_every_value() {
        let bn = sprinkler();
        let mut rng = StdRng::seed_from_u64(4);
        let e = Assignment::new().with("Sprinkler", true);

        let dist = rejection_sampling("Rain", &e, &bn, 200, &mut rng).unwrap();
        assert_eq!(2, dist.len());
    }

    #[test]
    fn no_samples() {
        let bn = sprinkler();
        let mut rng = StdRng::seed_from_u64(4);
        let e = Assignment::new().with("Sprinkler", T);

        assert_eq!(Err(PosteriorError::DegenerateDistribution(String::from("Rain"))),
                   rejection_sampling("Rain", &e, &bn, 0, &mut rng));
    }
}
