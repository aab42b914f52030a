//! Inference over time in a `HiddenMarkovModel`: smoothing a whole sequence of observations with
//! the forward-backward algorithm, and online fixed-lag smoothing.
//!
//! Messages are row vectors over the hidden states. Propagating a message through the transition
//! model is ```f * T```; observations enter as the diagonal sensor matrix ```O_e```.

use crate::model::hmm::HiddenMarkovModel;
use crate::util::{normalize_weights, PosteriorError, Result};
use crate::variable::Value;

use log::trace;
use ndarray::prelude as nd;

use std::collections::VecDeque;


fn normalize(v: nd::Array1<f64>) -> Result<nd::Array1<f64>> {
    let mut weights = v.to_vec();
    normalize_weights(&mut weights, "state")?;
    Ok(nd::Array1::from(weights))
}


/// One step of filtering: ```normalize(O_e (f T))```
pub fn forward(hmm: &HiddenMarkovModel, f: &nd::Array1<f64>, e: &Value) -> Result<nd::Array1<f64>> {
    let predicted = f.dot(hmm.transition());
    normalize(&hmm.sensor_dist(e)? * &predicted)
}


/// One step of the backward message: ```T (O_e b)```
pub fn backward(hmm: &HiddenMarkovModel, b: &nd::Array1<f64>, e: &Value) -> Result<nd::Array1<f64>> {
    let weighted = &hmm.sensor_dist(e)? * b;
    Ok(hmm.transition().dot(&weighted))
}


/// Smooth the state estimates of a whole sequence of observations.
///
/// # Returns
/// `evidence.len() + 1` distributions over the hidden states: index `i` is
/// ```P(X_i | e_1..e_n)```, index 0 being the state before the first observation.
///
/// # Errors
/// * `PosteriorError::InvalidModel` if `prior` does not have one entry per state
/// * `PosteriorError::UnknownObservation` if the model has no emission for an observation
pub fn forward_backward(hmm: &HiddenMarkovModel, evidence: &[Value], prior: &[f64]) -> Result<Vec<nd::Array1<f64>>> {
    if prior.len() != hmm.num_states() {
        return Err(PosteriorError::InvalidModel(
            format!("prior has {} entries, expected {}", prior.len(), hmm.num_states())
        ));
    }

    ///////////////////////////////////////////////////////////////////////////////
    // forward pass, fv[i] = P(X_i | e_1..e_i)
    let mut fv = Vec::with_capacity(evidence.len() + 1);
    fv.push(nd::Array1::from(prior.to_vec()));
    for (i, e) in evidence.iter().enumerate() {
        let f = forward(hmm, &fv[i], e)?;
        fv.push(f);
    }

    ///////////////////////////////////////////////////////////////////////////////
    // backward pass; sv[i] = normalize(fv[i] * b_{i+1..n})
    let mut sv = vec![nd::Array1::<f64>::zeros(hmm.num_states()); evidence.len() + 1];
    let mut b = nd::Array1::<f64>::ones(hmm.num_states());
    for i in (0..=evidence.len()).rev() {
        sv[i] = normalize(&fv[i] * &b)?;
        if i > 0 {
            b = backward(hmm, &b, &evidence[i - 1])?;
        }
    }

    trace!("smoothed {} observations", evidence.len());
    Ok(sv)
}


/// Online smoothing with a fixed lag `d`: after observing ```e_t``` the smoother reports
/// ```P(X_{t-d} | e_1..e_t)```.
///
/// The smoother keeps the forward message for time `t - d` and the matrix
/// ```B = prod_{i=t-d+1..t} T O_i```, which turns the backward message over the lag window into
/// ```B 1```. While the window fills, `B` is extended by one factor per observation. Once it is
/// full, the oldest observation moves into the forward message and `B` is rebuilt from the `d`
/// observations left in the window, so each step costs `d` matrix products regardless of `t`.
pub struct FixedLagSmoother<'a> {

    hmm: &'a HiddenMarkovModel,

    lag: usize,

    /// The number of observations seen
    t: usize,

    /// ```P(X_{t-d} | e_1..e_{t-d})```
    f: nd::Array1<f64>,

    /// The window product ```B```
    b: nd::Array2<f64>,

    /// The observations ```e_{t-d+1}..e_t```
    window: VecDeque<Value>
}


impl<'a> FixedLagSmoother<'a> {

    /// A smoother starting from the prior of `hmm`.
    pub fn new(hmm: &'a HiddenMarkovModel, lag: usize) -> Self {
        FixedLagSmoother {
            hmm,
            lag,
            t: 0,
            f: hmm.prior().clone(),
            b: nd::Array2::eye(hmm.num_states()),
            window: VecDeque::with_capacity(lag + 1)
        }
    }


    /// Start from a different distribution of the initial state.
    pub fn with_prior(mut self, prior: &[f64]) -> Result<Self> {
        if prior.len() != self.hmm.num_states() {
            return Err(PosteriorError::InvalidModel(
                format!("prior has {} entries, expected {}", prior.len(), self.hmm.num_states())
            ));
        }

        self.f = normalize(nd::Array1::from(prior.to_vec()))?;
        Ok(self)
    }


    /// The number of observations seen so far
    pub fn time(&self) -> usize {
        self.t
    }

    pub fn lag(&self) -> usize {
        self.lag
    }


    /// Take in the observation ```e_t``` for the next time step.
    ///
    /// # Returns
    /// `None` while fewer than `d` observations have been seen, and
    /// ```P(X_{t-d} | e_1..e_t)``` afterwards
    ///
    /// # Errors
    /// * `PosteriorError::UnknownObservation` if the model has no emission for `e`. The smoother
    ///   is left unchanged.
    pub fn observe(&mut self, e: &Value) -> Result<Option<nd::Array1<f64>>> {
        let o_t = nd::Array2::from_diag(&self.hmm.sensor_dist(e)?);
        let t = self.t + 1;
        let mut window = self.window.clone();
        window.push_back(e.clone());

        let oldest = if window.len() > self.lag { window.pop_front() } else { None };
        let (f, b) = match oldest {
            // e_{t-d} leaves the window and enters the forward message
            Some(oldest) => {
                trace!("t = {}, moving {} into the forward message", t, oldest);
                (forward(self.hmm, &self.f, &oldest)?, window_product(self.hmm, &window)?)
            },
            None => (self.f.clone(), self.b.dot(self.hmm.transition()).dot(&o_t))
        };

        self.t = t;
        self.f = f;
        self.b = b;
        self.window = window;

        if t < self.lag {
            return Ok(None);
        }

        let ones = nd::Array1::<f64>::ones(self.hmm.num_states());
        normalize(&self.f * &self.b.dot(&ones)).map(Some)
    }
}


/// ```prod_i T O_{e_i}``` over the given observations
fn window_product<'w, I>(hmm: &HiddenMarkovModel, window: I) -> Result<nd::Array2<f64>>
    where I: IntoIterator<Item = &'w Value>
{
    let mut b = nd::Array2::<f64>::eye(hmm.num_states());
    for e in window {
        let o = nd::Array2::from_diag(&hmm.sensor_dist(e)?);
        b = b.dot(hmm.transition()).dot(&o);
    }

    Ok(b)
}


/// Fixed-lag smoothing in one call: replays ```evidence[..t-1]``` and then `e_t` through a new
/// `FixedLagSmoother`.
///
/// # Args
/// * `e_t`: the observation at time `t`
/// * `d`: the lag
/// * `evidence`: the observations so far. Only the first `t - 1` are used.
/// * `t`: the current time, starting from 1
///
/// # Returns
/// `None` if `t < d`, otherwise ```P(X_{t-d} | e_1..e_t)```
///
/// # Errors
/// * `PosteriorError::InvalidTimeStep` if `t` is 0 or the evidence does not reach time `t - 1`
pub fn fixed_lag_smoothing(
    e_t: &Value,
    hmm: &HiddenMarkovModel,
    d: usize,
    evidence: &[Value],
    t: usize,
) -> Result<Option<nd::Array1<f64>>> {
    if t < d {
        return Ok(None);
    }

    if t == 0 || evidence.len() < t - 1 {
        return Err(PosteriorError::InvalidTimeStep { t, available: evidence.len() });
    }

    let mut smoother = FixedLagSmoother::new(hmm, d);
    for e in &evidence[..t - 1] {
        smoother.observe(e)?;
    }

    smoother.observe(e_t)
}
