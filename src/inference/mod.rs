//! Defines the inference algorithms for `BayesNet`s. Every algorithm answers conditional
//! probability queries of the form:
//!     ```P(X | E = e)```
//! and returns the posterior as a normalized `ProbDist` over the values of `X`.
//!
//! `enumeration_ask` and `elimination_ask` are exact; `rejection_sampling`,
//! `likelihood_weighting` and `gibbs_ask` approximate the posterior from `n` samples drawn with
//! the caller's random number generator.

mod enumeration;
mod importance_sampling;
mod mcmc;
mod rejection_sampling;
mod variable_elimination;

pub use self::enumeration::enumeration_ask;
pub use self::importance_sampling::likelihood_weighting;
pub use self::mcmc::gibbs_ask;
pub use self::rejection_sampling::rejection_sampling;
pub use self::variable_elimination::elimination_ask;


#[cfg(test)]
/// Tests for the inference algorithms in this module. Tests are hoisted here to avoid duplication.
/// Any tests specific to an algorithm are held within that submodule's tests module.
///
/// The student network is Koller & Friedman's student example with a binary grade. Example 6d
/// of [1] provides the result of exact inference of P(I | D=0, L=1, S=0) on it.
///
/// [1] https://www.uni-oldenburg.de/en/lcs/probabilistic-programming/webchurch-and-openbugs/
mod tests {
    use super::*;
    use crate::distribution::{enumerate_joint_ask, JointProbDist, ProbDist};
    use crate::fixtures::{burglary, sprinkler, student, F, T};
    use crate::model::directed::{BayesNet, BayesNetBuilder};
    use crate::util::{PosteriorError, Result};
    use crate::variable::{all_combinations, Assignment, Value};

    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    type Sampling = fn(&str, &Assignment, &BayesNet, usize, &mut StdRng) -> Result<ProbDist>;

    fn samplers() -> Vec<(&'static str, Sampling)> {
        vec![
            ("rejection sampling", rejection_sampling as Sampling),
            ("likelihood weighting", likelihood_weighting as Sampling),
            ("gibbs", gibbs_ask as Sampling),
        ]
    }

    fn student_evidence() -> Assignment {
        Assignment::new().with("D", 0).with("L", 1).with("S", 0)
    }

    /// Utility method to test the actual inference task
    fn check_student(dist: &ProbDist, precision: f64) {
        let expected = 0.02919708;
        assert_eq!(2, dist.len());
        assert_abs_diff_eq!(expected, dist.get(1), epsilon = precision);
        assert_abs_diff_eq!(1.0 - expected, dist.get(0), epsilon = precision);
    }

    #[test]
    fn enumeration() {
        let (bn, e) = (student(), student_evidence());

        // the result should be the same on subsequent queries
        for _ in 0..10 {
            check_student(&enumeration_ask("I", &e, &bn).unwrap(), 1e-8);
        }
    }

    #[test]
    fn variable_elimination() {
        let (bn, e) = (student(), student_evidence());

        for _ in 0..10 {
            check_student(&elimination_ask("I", &e, &bn).unwrap(), 1e-8);
        }
    }

    #[test]
    fn sampling() {
        let (bn, e) = (student(), student_evidence());

        for (name, ask) in samplers() {
            let mut rng = StdRng::seed_from_u64(1234);
            let dist = ask("I", &e, &bn, 50000, &mut rng).unwrap();
            println!("{}: {}", name, dist.show_approx(4));
            check_student(&dist, 0.01);
        }
    }

    #[test]
    fn exact_algorithms_agree() {
        let bn = sprinkler();
        let queries = vec![
            ("Rain", Assignment::new().with("Sprinkler", true), 0.3),
            ("Cloudy", Assignment::new().with("Rain", true), 0.8),
            ("Rain", Assignment::new().with("WetGrass", true), 0.7079),
            ("Cloudy", Assignment::new().with("WetGrass", true), 0.5758),
            ("Sprinkler", Assignment::new().with("WetGrass", true), 0.4298),
        ];

        for (x, e, expected) in queries {
            let by_enumeration = enumeration_ask(x, &e, &bn).unwrap();
            let by_elimination = elimination_ask(x, &e, &bn).unwrap();

            assert_abs_diff_eq!(expected, by_enumeration.get(T), epsilon = 1e-4);
            for v in &[T, F] {
                assert_abs_diff_eq!(by_enumeration.prob(v), by_elimination.prob(v), epsilon = 1e-12);
            }
        }
    }

    /// The full joint distribution of a network, one entry per complete assignment
    fn joint_of(bn: &BayesNet) -> JointProbDist {
        let vars: Vec<&str> = bn.topological_order().iter().map(|v| v.as_str()).collect();
        let domains: Vec<&[Value]> = vars.iter().map(|v| bn.variable_values(v).unwrap()).collect();

        let mut joint = JointProbDist::new(&vars);
        for values in all_combinations(&domains) {
            let a: Assignment = vars.iter().cloned().zip(values.iter().cloned()).collect();
            joint.set(values, bn.probability(&a).unwrap()).unwrap();
        }

        joint
    }

    #[test]
    fn joint_agrees_with_network() {
        let cases = vec![
            (sprinkler(), vec![
                ("Rain", Assignment::new().with("Sprinkler", true)),
                ("Cloudy", Assignment::new().with("WetGrass", true)),
                ("Sprinkler", Assignment::new().with("WetGrass", true).with("Cloudy", false)),
                ("WetGrass", Assignment::new()),
                ("Cloudy", Assignment::new().with("Rain", true).with("Sprinkler", false)),
            ]),
            (burglary(), vec![
                ("Burglary", Assignment::new().with("JohnCalls", true).with("MaryCalls", true)),
                ("Alarm", Assignment::new().with("Earthquake", true)),
                ("MaryCalls", Assignment::new().with("Burglary", false)),
            ]),
        ];

        for (bn, queries) in cases {
            let joint = joint_of(&bn);
            for (x, e) in queries {
                let by_joint = enumerate_joint_ask(x, &e, &joint).unwrap();
                let by_enumeration = enumeration_ask(x, &e, &bn).unwrap();
                let by_elimination = elimination_ask(x, &e, &bn).unwrap();

                assert_eq!(2, by_joint.len());
                for v in &[T, F] {
                    assert_abs_diff_eq!(by_joint.prob(v), by_enumeration.prob(v), epsilon = 1e-12);
                    assert_abs_diff_eq!(by_joint.prob(v), by_elimination.prob(v), epsilon = 1e-12);
                }
            }
        }
    }

    #[test]
    fn burglary_without_evidence() {
        let bn = burglary();
        let e = Assignment::new();

        let dist = enumeration_ask("Earthquake", &e, &bn).unwrap();
        assert_abs_diff_eq!(0.002, dist.get(T), epsilon = 1e-12);
        assert_abs_diff_eq!(dist.get(T), elimination_ask("Earthquake", &e, &bn).unwrap().get(T), epsilon = 1e-12);

        let mut rng = StdRng::seed_from_u64(8);
        let approx = likelihood_weighting("Earthquake", &e, &bn, 20000, &mut rng).unwrap();
        assert_abs_diff_eq!(0.002, approx.get(T), epsilon = 0.002);
    }

    #[test]
    fn sampling_sprinkler() {
        let bn = sprinkler();
        let e = Assignment::new().with("WetGrass", true);

        for (name, ask) in samplers() {
            let mut rng = StdRng::seed_from_u64(99);
            let dist = ask("Rain", &e, &bn, 20000, &mut rng).unwrap();
            println!("{}: {}", name, dist);
            assert_abs_diff_eq!(0.7079, dist.get(true), epsilon = 0.03);
        }
    }

    #[test]
    fn seeded_sampling_is_reproducible() {
        let bn = sprinkler();
        let e = Assignment::new().with("WetGrass", true);

        for (_, ask) in samplers() {
            let mut first = StdRng::seed_from_u64(7);
            let mut second = StdRng::seed_from_u64(7);
            assert_eq!(ask("Cloudy", &e, &bn, 500, &mut first).unwrap(),
                       ask("Cloudy", &e, &bn, 500, &mut second).unwrap());
        }
    }

    #[test]
    fn impossible_evidence() {
        // Y is never true
        let bn = BayesNetBuilder::new()
            .with_bernoulli("X", 0.5)
            .with_boolean("Y", &["X"], vec![(vec![T], 0.0), (vec![F], 0.0)])
            .build()
            .unwrap();
        let e = Assignment::new().with("Y", true);
        let degenerate = Err(PosteriorError::DegenerateDistribution(String::from("X")));

        assert_eq!(degenerate, enumeration_ask("X", &e, &bn));
        assert_eq!(degenerate, elimination_ask("X", &e, &bn));

        for (_, ask) in samplers() {
            let mut rng = StdRng::seed_from_u64(0);
            assert_eq!(degenerate, ask("X", &e, &bn, 100, &mut rng));
        }
    }

    #[test]
    fn invalid_queries() {
        let bn = sprinkler();
        let e = Assignment::new().with("Rain", true);
        let mut rng = StdRng::seed_from_u64(0);

        let in_evidence = Err(PosteriorError::QueryInEvidence(String::from("Rain")));
        assert_eq!(in_evidence, enumeration_ask("Rain", &e, &bn));
        assert_eq!(in_evidence, elimination_ask("Rain", &e, &bn));
        for (_, ask) in samplers() {
            assert_eq!(in_evidence, ask("Rain", &e, &bn, 10, &mut rng));
        }

        let unknown = Err(PosteriorError::UnknownVariable(String::from("Hail")));
        assert_eq!(unknown, elimination_ask("Hail", &e, &bn));

        let e = Assignment::new().with("Rain", "drizzle");
        match elimination_ask("Cloudy", &e, &bn) {
            Err(PosteriorError::UnknownValue { variable, value }) => {
                assert_eq!("Rain", variable);
                assert_eq!(Value::from("drizzle"), value);
            },
            other => panic!("unexpected result {:?}", other)
        }
    }
}
