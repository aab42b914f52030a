//! Discrete probability distributions over one (`ProbDist`) or several (`JointProbDist`)
//! variables.

use crate::util::{normalize_weights, PosteriorError, Result};
use crate::variable::{consistent_with, event_values, Assignment, Event, Value};

use indexmap::IndexMap;

use std::fmt;


/// The most decimal places `ProbDist::show_approx` will render
pub const MAX_DECIMALS: usize = 15;


/// A discrete probability distribution over the values of a single variable.
///
/// The weights held by a `ProbDist` are not required to be normalized; raw frequencies may be
/// accumulated and normalized afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct ProbDist {

    /// The variable the distribution is over
    var_name: String,

    /// The weight of each outcome, in insertion order
    prob: IndexMap<Value, f64>
}

impl ProbDist {

    /// Construct an empty `ProbDist` for the variable `var_name`
    pub fn new(var_name: &str) -> Self {
        ProbDist { var_name: String::from(var_name), prob: IndexMap::new() }
    }

    /// Construct a `ProbDist` from a set of frequencies. The result is normalized.
    ///
    /// # Errors
    /// * `PosteriorError::DegenerateDistribution` if every frequency is zero
    /// * `PosteriorError::InvalidProbability` if a frequency is negative or not finite
    pub fn from_frequencies<I, V>(var_name: &str, freqs: I) -> Result<Self>
        where I: IntoIterator<Item = (V, f64)>,
              V: Into<Value>
    {
        let mut dist = ProbDist::new(var_name);
        for (v, p) in freqs {
            dist.set(v, p);
        }

        dist.normalize()
    }

    /// The name of the variable this distribution is over
    pub fn name(&self) -> &str {
        &self.var_name
    }

    /// Assign the weight `p` to the outcome `val`
    pub fn set<V: Into<Value>>(&mut self, val: V, p: f64) {
        self.prob.insert(val.into(), p);
    }

    /// Add `w` to the weight of the outcome `val`
    pub fn add(&mut self, val: &Value, w: f64) {
        *self.prob.entry(val.clone()).or_insert(0.0) += w;
    }

    /// Get the weight of the outcome `val`. Unknown outcomes have weight zero.
    pub fn get<V: Into<Value>>(&self, val: V) -> f64 {
        self.prob(&val.into())
    }

    /// Get the weight of the outcome `val` by reference
    pub fn prob(&self, val: &Value) -> f64 {
        self.prob.get(val).cloned().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.prob.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prob.is_empty()
    }

    /// The outcomes of the distribution, in insertion order
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.prob.keys()
    }

    /// The (outcome, weight) pairs of the distribution, in insertion order
    pub fn top(&self) -> impl Iterator<Item = (&Value, f64)> {
        self.prob.iter().map(|(v, &p)| (v, p))
    }

    /// The outcome with the largest weight. Ties go to the earliest outcome.
    pub fn most_likely(&self) -> Option<&Value> {
        let mut best: Option<(&Value, f64)> = None;
        for (v, p) in self.top() {
            match best {
                Some((_, max)) if max >= p => (),
                _ => best = Some((v, p))
            }
        }

        best.map(|(v, _)| v)
    }

    /// Normalize the weights of the distribution so that they sum to one.
    ///
    /// # Returns
    /// a new, normalized `ProbDist`
    ///
    /// # Errors
    /// * `PosteriorError::DegenerateDistribution` if the total weight is zero
    /// * `PosteriorError::InvalidProbability` if a weight is negative or not finite
    pub fn normalize(&self) -> Result<ProbDist> {
        let mut weights: Vec<f64> = self.prob.values().cloned().collect();
        normalize_weights(&mut weights, &self.var_name)?;

        let prob = self.prob.keys().cloned().zip(weights).collect();
        Ok(ProbDist { var_name: self.var_name.clone(), prob })
    }

    /// Render the distribution with outcomes sorted and weights rounded to `decimals` places,
    /// e.g. `"False: 0.716, True: 0.284"`. Precision is capped at `MAX_DECIMALS`.
    pub fn show_approx(&self, decimals: usize) -> String {
        let scale = 10f64.powi(decimals.min(MAX_DECIMALS) as i32);
        let mut entries: Vec<(&Value, f64)> = self.top().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));

        entries.iter()
               .map(|&(v, p)| format!("{}: {}", v, (p * scale).round() / scale))
               .collect::<Vec<String>>()
               .join(", ")
    }
}

impl fmt::Display for ProbDist {

    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.show_approx(3))
    }
}


/// A discrete probability distribution over a fixed, ordered list of variables, indexed by
/// tuples of values.
#[derive(Clone, Debug)]
pub struct JointProbDist {

    /// The variables of the distribution, in key order
    variables: Vec<String>,

    /// The probability of each tuple of values
    prob: IndexMap<Vec<Value>, f64>,

    /// The values seen so far for each variable
    values: IndexMap<String, Vec<Value>>
}

impl JointProbDist {

    pub fn new(variables: &[&str]) -> Self {
        JointProbDist {
            variables: variables.iter().map(|&v| String::from(v)).collect(),
            prob: IndexMap::new(),
            values: variables.iter().map(|&v| (String::from(v), Vec::new())).collect()
        }
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Set the probability of an event, given as a tuple of values or as an `Assignment`
    pub fn set<E: Into<Event>>(&mut self, event: E, p: f64) -> Result<()> {
        let key = self.key(&event.into())?;

        for (var, val) in self.variables.iter().zip(key.iter()) {
            if let Some(seen) = self.values.get_mut(var) {
                if !seen.contains(val) {
                    seen.push(val.clone());
                }
            }
        }

        self.prob.insert(key, p);
        Ok(())
    }

    /// Get the probability of an event, given as a tuple of values or as an `Assignment`.
    /// Events that were never set have probability zero.
    pub fn get<E: Into<Event>>(&self, event: E) -> Result<f64> {
        let key = self.key(&event.into())?;
        Ok(self.prob.get(&key).cloned().unwrap_or(0.0))
    }

    /// The values seen for `var`, in insertion order
    pub fn values(&self, var: &str) -> Result<&[Value]> {
        self.values
            .get(var)
            .map(|v| v.as_slice())
            .ok_or_else(|| PosteriorError::UnknownVariable(String::from(var)))
    }

    /// Iterate over every (tuple, probability) pair that has been set
    pub fn iter(&self) -> impl Iterator<Item = (&[Value], f64)> {
        self.prob.iter().map(|(k, &p)| (k.as_slice(), p))
    }

    fn key(&self, event: &Event) -> Result<Vec<Value>> {
        let key = event_values(event, &self.variables)?;
        if key.len() != self.variables.len() {
            return Err(PosteriorError::InvalidEvent(
                format!("expected {} values, got {}", self.variables.len(), key.len())
            ));
        }

        Ok(key)
    }
}


/// Answer the query `P(X | evidence)` by summing over the entries of an explicit joint
/// distribution.
///
/// # Errors
/// * `PosteriorError::UnknownVariable` if `x` or an evidence variable is not in `joint`
/// * `PosteriorError::DegenerateDistribution` if no entry of `joint` with non-zero mass is
///   consistent with the evidence
pub fn enumerate_joint_ask(x: &str, evidence: &Assignment, joint: &JointProbDist) -> Result<ProbDist> {
    let idx = joint.variables()
                   .iter()
                   .position(|v| v == x)
                   .ok_or_else(|| PosteriorError::UnknownVariable(String::from(x)))?;

    if let Some(unknown) = evidence.variables().find(|v| !joint.variables().contains(v)) {
        return Err(PosteriorError::UnknownVariable(unknown.clone()));
    }

    let mut q = ProbDist::new(x);
    for val in joint.values(x)? {
        q.set(val.clone(), 0.0);
    }

    for (key, p) in joint.iter() {
        let event: Assignment = joint.variables().iter().cloned().zip(key.iter().cloned()).collect();
        if consistent_with(&event, evidence) {
            q.add(&key[idx], p);
        }
    }

    q.normalize()
}
