//! Networks and models shared by the unit tests.

use crate::distribution::ProbDist;
use crate::init::Initialization;
use crate::model::directed::{BayesNet, BayesNetBuilder};
use crate::model::hmm::HiddenMarkovModel;
use crate::variable::Value;

pub const T: Value = Value::Bool(true);
pub const F: Value = Value::Bool(false);


/// The burglary alarm network of Russell & Norvig, Figure 14.2
pub fn burglary() -> BayesNet {
    BayesNetBuilder::new()
        .with_bernoulli("Burglary", 0.001)
        .with_bernoulli("Earthquake", 0.002)
        .with_boolean("Alarm", &["Burglary", "Earthquake"], vec![
            (vec![T, T], 0.95),
            (vec![T, F], 0.94),
            (vec![F, T], 0.29),
            (vec![F, F], 0.001),
        ])
        .with_boolean("JohnCalls", &["Alarm"], vec![(vec![T], 0.90), (vec![F], 0.05)])
        .with_boolean("MaryCalls", &["Alarm"], vec![(vec![T], 0.70), (vec![F], 0.01)])
        .build()
        .unwrap()
}


/// The sprinkler network of Russell & Norvig, Figure 14.12
pub fn sprinkler() -> BayesNet {
    BayesNetBuilder::new()
        .with_bernoulli("Cloudy", 0.5)
        .with_boolean("Sprinkler", &["Cloudy"], vec![(vec![T], 0.10), (vec![F], 0.50)])
        .with_boolean("Rain", &["Cloudy"], vec![(vec![T], 0.80), (vec![F], 0.20)])
        .with_boolean("WetGrass", &["Sprinkler", "Rain"], vec![
            (vec![T, T], 0.99),
            (vec![T, F], 0.90),
            (vec![F, T], 0.90),
            (vec![F, F], 0.00),
        ])
        .build()
        .unwrap()
}


fn dist(var: &str, probs: &[f64]) -> ProbDist {
    ProbDist::from_frequencies(var, probs.iter().enumerate().map(|(i, &p)| (i as i64, p))).unwrap()
}


/// The student network of Koller & Friedman, with integer-valued variables.
///
/// P(I = 1 | D = 0, L = 1, S = 0) = 0.02919708
pub fn student() -> BayesNet {
    let i = |v: i64| Value::Int(v);

    BayesNetBuilder::new()
        .with_variable("D", &[], Initialization::Table(vec![(vec![], dist("D", &[0.6, 0.4]))]))
        .with_variable("I", &[], Initialization::Table(vec![(vec![], dist("I", &[0.7, 0.3]))]))
        .with_variable("G", &["I", "D"], Initialization::Table(vec![
            (vec![i(0), i(0)], dist("G", &[0.3, 0.7])),
            (vec![i(0), i(1)], dist("G", &[0.05, 0.95])),
            (vec![i(1), i(0)], dist("G", &[0.9, 0.1])),
            (vec![i(1), i(1)], dist("G", &[0.5, 0.5])),
        ]))
        .with_variable("S", &["I"], Initialization::Table(vec![
            (vec![i(0)], dist("S", &[0.95, 0.05])),
            (vec![i(1)], dist("S", &[0.2, 0.8])),
        ]))
        .with_variable("L", &["G"], Initialization::Table(vec![
            (vec![i(0)], dist("L", &[0.9, 0.1])),
            (vec![i(1)], dist("L", &[0.4, 0.6])),
        ]))
        .build()
        .unwrap()
}


/// The umbrella world of Russell & Norvig, Chapter 15
pub fn umbrella() -> HiddenMarkovModel {
    HiddenMarkovModel::boolean(
        vec![vec![0.7, 0.3], vec![0.3, 0.7]],
        vec![vec![0.9, 0.2], vec![0.1, 0.8]],
    ).unwrap()
}
