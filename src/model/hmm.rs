//! Defines a discrete-state `HiddenMarkovModel`: a transition model over `k` hidden states and a
//! sensor model giving the likelihood of each observation in every state.

use crate::util::{normalize_weights, PosteriorError, Result, PROBABILITY_TOLERANCE};
use crate::variable::Value;

use bidir_map::BidirMap;
use ndarray::prelude as nd;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;


#[derive(Clone)]
pub struct HiddenMarkovModel {

    /// ```transition[[i, j]] = P(X_t = j | X_{t-1} = i)```
    transition: nd::Array2<f64>,

    /// One row per observation: ```sensor[[o, i]] = P(e = o | X = i)```
    sensor: nd::Array2<f64>,

    /// The observations the sensor model knows about and their rows in `sensor`
    observations: BidirMap<Value, usize>,

    /// Distribution of the state before any observation
    prior: nd::Array1<f64>
}


impl HiddenMarkovModel {

    /// Create a new `HiddenMarkovModel` with a uniform prior.
    ///
    /// # Args
    /// * `transition`: a square matrix, ```transition[i][j] = P(X_t = j | X_{t-1} = i)```
    /// * `emissions`: for each observation, its likelihood in every state
    ///
    /// # Errors
    /// * `PosteriorError::InvalidModel` if the transition matrix is not square or a row is not a
    ///   distribution, if an emission vector has the wrong length or holds values outside
    ///   [0, 1], or if an observation is listed twice
    pub fn new(transition: Vec<Vec<f64>>, emissions: Vec<(Value, Vec<f64>)>) -> Result<Self> {
        let k = transition.len();
        if k == 0 {
            return Err(PosteriorError::InvalidModel(String::from("a model needs at least one state")));
        }

        ///////////////////////////////////////////////////////////////////////////////
        // transition model
        let mut t = nd::Array2::<f64>::zeros((k, k));
        for (i, row) in transition.iter().enumerate() {
            if row.len() != k {
                return Err(PosteriorError::InvalidModel(
                    format!("transition row {} has {} entries, expected {}", i, row.len(), k)
                ));
            }
            check_distribution(row, &format!("transition row {}", i))?;
            for (j, &p) in row.iter().enumerate() {
                t[[i, j]] = p;
            }
        }

        ///////////////////////////////////////////////////////////////////////////////
        // sensor model
        if emissions.is_empty() {
            return Err(PosteriorError::InvalidModel(String::from("a model needs at least one observation")));
        }

        let mut sensor = nd::Array2::<f64>::zeros((emissions.len(), k));
        let mut observations = BidirMap::new();
        for (o, (obs, likelihood)) in emissions.into_iter().enumerate() {
            if likelihood.len() != k {
                return Err(PosteriorError::InvalidModel(
                    format!("emission of {} has {} entries, expected {}", obs, likelihood.len(), k)
                ));
            }
            if let Some(&p) = likelihood.iter().find(|&&p| !(0.0..=1.0).contains(&p)) {
                return Err(PosteriorError::InvalidModel(format!("emission of {} has likelihood {}", obs, p)));
            }
            if observations.get_by_first(&obs).is_some() {
                return Err(PosteriorError::InvalidModel(format!("{} has two emission models", obs)));
            }

            for (i, &p) in likelihood.iter().enumerate() {
                sensor[[o, i]] = p;
            }
            observations.insert(obs, o);
        }

        let prior = nd::Array1::from_elem(k, 1.0 / k as f64);

        Ok(HiddenMarkovModel { transition: t, sensor, observations, prior })
    }


    /// A model with boolean observations, the sensor given as
    /// ```[P(True | X), P(False | X)]```.
    pub fn boolean(transition: Vec<Vec<f64>>, sensor: Vec<Vec<f64>>) -> Result<Self> {
        if sensor.len() != 2 {
            return Err(PosteriorError::InvalidModel(
                format!("a boolean sensor has two rows, got {}", sensor.len())
            ));
        }

        let emissions = vec![Value::Bool(true), Value::Bool(false)].into_iter().zip(sensor).collect();
        HiddenMarkovModel::new(transition, emissions)
    }


    /// Replace the prior distribution over the initial state
    pub fn with_prior(mut self, prior: Vec<f64>) -> Result<Self> {
        if prior.len() != self.num_states() {
            return Err(PosteriorError::InvalidModel(
                format!("prior has {} entries, expected {}", prior.len(), self.num_states())
            ));
        }

        check_distribution(&prior, "prior")?;
        self.prior = nd::Array1::from(prior);
        Ok(self)
    }


    /// A model with randomly drawn parameters and a uniform prior. In every state the sensor model
    /// is a distribution over `observations`.
    pub fn random<R: Rng + ?Sized>(states: usize, observations: Vec<Value>, rng: &mut R) -> Result<Self> {
        if states == 0 || observations.is_empty() {
            return Err(PosteriorError::InvalidModel(
                String::from("a model needs at least one state and one observation")
            ));
        }

        let mut transition = nd::Array2::random_using((states, states), Uniform::new(1.0, 100.0), rng);
        for mut row in transition.rows_mut() {
            let z = row.sum();
            row.mapv_inplace(|p| p / z);
        }

        let mut sensor = nd::Array2::random_using((observations.len(), states), Uniform::new(1.0, 100.0), rng);
        for mut column in sensor.columns_mut() {
            let z = column.sum();
            column.mapv_inplace(|p| p / z);
        }

        let transition = transition.outer_iter().map(|r| r.to_vec()).collect();
        let emissions = observations.into_iter().zip(sensor.outer_iter().map(|r| r.to_vec())).collect();
        HiddenMarkovModel::new(transition, emissions)
    }


    /// Get the number of hidden states
    pub fn num_states(&self) -> usize {
        self.prior.len()
    }

    pub fn transition(&self) -> &nd::Array2<f64> {
        &self.transition
    }

    pub fn prior(&self) -> &nd::Array1<f64> {
        &self.prior
    }


    /// The likelihood of `obs` in every state, ```P(e = obs | X)```
    ///
    /// # Errors
    /// * `PosteriorError::UnknownObservation` if the model has no emission for `obs`
    pub fn sensor_dist(&self, obs: &Value) -> Result<nd::ArrayView1<f64>> {
        match self.observations.get_by_first(obs) {
            Some(&o) => Ok(self.sensor.row(o)),
            None => Err(PosteriorError::UnknownObservation(obs.clone()))
        }
    }


    /// The distribution of the next state given the current one
    pub fn transition_row(&self, state: usize) -> Result<nd::ArrayView1<f64>> {
        if state >= self.num_states() {
            return Err(PosteriorError::InvalidState(state));
        }

        Ok(self.transition.row(state))
    }


    /// Draw a trajectory of `n` steps: the hidden states ```x_1..x_n``` and the observation
    /// emitted at each.
    pub fn sample<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Result<(Vec<usize>, Vec<Value>)> {
        let mut states = Vec::with_capacity(n);
        let mut evidence = Vec::with_capacity(n);

        let mut x = draw(self.prior.iter(), "prior", rng)?;
        for _ in 0..n {
            x = draw(self.transition_row(x)?.iter(), "transition", rng)?;

            // the sensor column of a state need not sum to one over the observations
            let mut weights = self.sensor.column(x).to_vec();
            normalize_weights(&mut weights, "sensor")?;
            let o = draw(weights.iter(), "sensor", rng)?;

            let obs = self.observations
                          .get_by_second(&o)
                          .ok_or_else(|| PosteriorError::InvalidModel(format!("observation {} has no name", o)))?;

            states.push(x);
            evidence.push(obs.clone());
        }

        Ok((states, evidence))
    }
}


fn draw<'a, I, R>(weights: I, name: &str, rng: &mut R) -> Result<usize>
    where I: IntoIterator<Item = &'a f64>,
          R: Rng + ?Sized
{
    WeightedIndex::<f64>::new(weights)
        .map(|d| d.sample(rng))
        .map_err(|_| PosteriorError::DegenerateDistribution(String::from(name)))
}


fn check_distribution(p: &[f64], name: &str) -> Result<()> {
    if p.iter().any(|&v| !(0.0..=1.0).contains(&v)) {
        return Err(PosteriorError::InvalidModel(format!("{} holds a value outside [0, 1]", name)));
    }

    let total: f64 = p.iter().sum();
    if (total - 1.0).abs() > PROBABILITY_TOLERANCE {
        return Err(PosteriorError::InvalidModel(format!("{} sums to {}", name, total)));
    }

    Ok(())
}
