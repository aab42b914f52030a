//! Exact inference by enumeration: the posterior is read off the joint distribution, summing out
//! every hidden variable by recursing over the topological order.

use crate::distribution::ProbDist;
use crate::model::directed::BayesNet;
use crate::util::Result;
use crate::variable::Assignment;


/// Compute ```P(x | evidence)``` by enumerating every assignment to the hidden variables.
///
/// # Errors
/// * `PosteriorError::UnknownVariable` if `x` or an evidence variable is not in the network
/// * `PosteriorError::QueryInEvidence` if `x` is observed
/// * `PosteriorError::DegenerateDistribution` if the evidence has probability zero
pub fn enumeration_ask(x: &str, evidence: &Assignment, bn: &BayesNet) -> Result<ProbDist> {
    let node = bn.check_query(x, evidence)?;

    let mut q = ProbDist::new(x);
    let mut e = evidence.clone();
    for xi in node.domain() {
        e.set(x, xi.clone());
        q.set(xi.clone(), enumerate_all(bn.topological_order(), &mut e, bn)?);
    }

    q.normalize()
}


/// The probability of the partial assignment `e`, marginalized over the variables in `vars` that
/// it does not assign. Every parent of a variable in `vars` is either in `e` or precedes it.
fn enumerate_all(vars: &[String], e: &mut Assignment, bn: &BayesNet) -> Result<f64> {
    let (y, rest) = match vars.split_first() {
        Some(split) => split,
        None => return Ok(1.0)
    };

    let node = bn.node(y)?;
    if let Some(v) = e.get(y).cloned() {
        return Ok(node.p(&v, e)? * enumerate_all(rest, e, bn)?);
    }

    let mut total = 0.0;
    for v in node.domain() {
        e.set(y, v.clone());
        total += node.p(v, e)? * enumerate_all(rest, e, bn)?;
    }
    e.unset(y);

    Ok(total)
}
