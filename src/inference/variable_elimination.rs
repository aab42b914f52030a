//! Exact inference by variable elimination.
//!
//! Implementation of Koller & Friedman Algorithm 9.1 - Sum-Product-VE, eliminating variables in
//! reverse topological order.

use crate::distribution::ProbDist;
use crate::factor::Factor;
use crate::model::directed::BayesNet;
use crate::util::Result;
use crate::variable::Assignment;

use log::debug;


/// Compute ```P(x | evidence)``` by variable elimination.
///
/// # Errors
/// * `PosteriorError::UnknownVariable` if `x` or an evidence variable is not in the network
/// * `PosteriorError::QueryInEvidence` if `x` is observed
/// * `PosteriorError::DegenerateDistribution` if the evidence has probability zero
pub fn elimination_ask(x: &str, evidence: &Assignment, bn: &BayesNet) -> Result<ProbDist> {
    bn.check_query(x, evidence)?;

    let mut phis: Vec<Factor> = Vec::new();
    for node in bn.nodes().rev() {
        phis.push(Factor::for_node(node, evidence)?);

        let var = node.variable();
        if var != x && !evidence.contains(var) {
            phis = sum_out(var, phis)?;
            debug!("eliminated {}, {} factors remain", var, phis.len());
        }
    }

    // multiply together remaining phis; only x is left in their scope
    pointwise_product(phis)?.normalize(x)
}


/// Eliminate `var`: the factors that mention it are replaced by their product, summed over
/// `var`.
fn sum_out(var: &str, phis: Vec<Factor>) -> Result<Vec<Factor>> {
    let (with_var, mut rest): (Vec<Factor>, Vec<Factor>) = phis.into_iter().partition(|f| f.mentions(var));

    // product step - multiply factors with var
    let psi = pointwise_product(with_var)?;

    // sum step - marginalize psi over var
    rest.push(psi.marginalize(var));
    Ok(rest)
}


fn pointwise_product(phis: Vec<Factor>) -> Result<Factor> {
    phis.iter().fold(Ok(Factor::unit()), |acc, phi| acc.and_then(|psi| psi.product(phi)))
}
