//! Provides an example of how to use posterior to perform inference on a Bayesian Network.
//!
//! The network is the burglary alarm of Russell & Norvig, Figure 14.2

use posterior as p;
use p::Value;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> p::Result<()> {
    let t = Value::from(true);
    let f = Value::from(false);

    /////////////////////////////////////////////////////
    // Step 1: Build Model
    let model = p::BayesNetBuilder::new()
        .with_bernoulli("Burglary", 0.001)
        .with_bernoulli("Earthquake", 0.002)
        .with_boolean("Alarm", &["Burglary", "Earthquake"], vec![
            (vec![t.clone(), t.clone()], 0.95),
            (vec![t.clone(), f.clone()], 0.94),
            (vec![f.clone(), t.clone()], 0.29),
            (vec![f.clone(), f.clone()], 0.001),
        ])
        .with_boolean("JohnCalls", &["Alarm"], vec![(vec![t.clone()], 0.90), (vec![f.clone()], 0.05)])
        .with_boolean("MaryCalls", &["Alarm"], vec![(vec![t], 0.70), (vec![f], 0.01)])
        .build()?;

    /////////////////////////////////////////////////////
    // Step 2: Compile some evidence
    let evidence = p::Assignment::new().with("JohnCalls", true).with("MaryCalls", true);

    /////////////////////////////////////////////////////
    // Step 3: Run a Conditional Query with each algorithm
    let mut rng = StdRng::seed_from_u64(42);
    let samples = 100_000;

    println!("P(Burglary | JohnCalls, MaryCalls)");
    println!("  enumeration:          {}", p::enumeration_ask("Burglary", &evidence, &model)?);
    println!("  variable elimination: {}", p::elimination_ask("Burglary", &evidence, &model)?);
    println!("  likelihood weighting: {}", p::likelihood_weighting("Burglary", &evidence, &model, samples, &mut rng)?);
    println!("  gibbs sampling:       {}", p::gibbs_ask("Burglary", &evidence, &model, samples, &mut rng)?);

    // the evidence is rare, so most prior samples are rejected
    match p::rejection_sampling("Burglary", &evidence, &model, samples, &mut rng) {
        Ok(dist) => println!("  rejection sampling:   {}", dist),
        Err(e) => println!("  rejection sampling:   {}", e)
    }

    Ok(())
}
