//! Provides an example of smoothing in a hidden Markov model: the umbrella world of
//! Russell & Norvig, Chapter 15.

use posterior as p;
use p::Value;

fn main() -> p::Result<()> {
    /////////////////////////////////////////////////////
    // Step 1: Build Model
    let hmm = p::HiddenMarkovModel::boolean(
        vec![vec![0.7, 0.3], vec![0.3, 0.7]],
        vec![vec![0.9, 0.2], vec![0.1, 0.8]],
    )?;

    let umbrella: Vec<Value> = vec![true, true, false, true, true].into_iter().map(Value::from).collect();

    /////////////////////////////////////////////////////
    // Step 2: Smooth the whole sequence
    println!("P(Rain_t | umbrella_1..5)");
    for (t, s) in p::forward_backward(&hmm, &umbrella, &[0.5, 0.5])?.iter().enumerate() {
        println!("  t = {}: {:.4}", t, s[0]);
    }

    /////////////////////////////////////////////////////
    // Step 3: Smooth online, two steps behind
    println!("P(Rain_t-2 | umbrella_1..t)");
    let mut smoother = p::FixedLagSmoother::new(&hmm, 2);
    for e in umbrella.iter() {
        if let Some(s) = smoother.observe(e)? {
            println!("  t = {}: {:.4}", smoother.time(), s[0]);
        }
    }

    Ok(())
}
