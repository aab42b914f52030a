//! Module containing initialization routines for the conditional probability tables of a model.

use crate::distribution::ProbDist;
use crate::util::{check_probability, PosteriorError, Result, PROBABILITY_TOLERANCE};
use crate::variable::{all_combinations, Value};

use ndarray::prelude as nd;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::rngs::StdRng;
use rand::SeedableRng;

use std::collections::HashMap;

/// Alias f64 ndarray::ArrayD as Table
///
/// The table of a variable `X` with parents `P1..Pk` has shape `[|P1|, ..., |Pk|, |X|]`.
pub type Table = nd::ArrayD<f64>;


/// Defines possible ways to initialize a variable's CPD.
#[derive(Clone, Debug)]
pub enum Initialization {
    /// A uniform distribution over all possibilities
    Uniform,

    /// Randomly initialize the weights of the CPD from the given seed.
    Random(u64),

    /// Initialize a boolean variable with no parents so that ```P(True) = p```.
    Bernoulli(f64),

    /// A boolean variable given by ```P(True | parents)``` for every combination of parent
    /// values.
    Boolean(Vec<(Vec<Value>, f64)>),

    /// User defined CPD: a distribution over the variable for every combination of parent
    /// values.
    Table(Vec<(Vec<Value>, ProbDist)>)
}


/// The domain of a boolean variable
pub fn boolean_domain() -> Vec<Value> {
    vec![Value::Bool(true), Value::Bool(false)]
}


impl Initialization {

    /// The domain implied by the initialization, if there is one.
    ///
    /// Boolean initializations imply ```[True, False]```; a `Table` implies the outcomes of its
    /// distributions in order of first appearance.
    pub fn implied_domain(&self) -> Option<Vec<Value>> {
        match *self {
            Initialization::Bernoulli(_) | Initialization::Boolean(_) => Some(boolean_domain()),
            Initialization::Table(ref rows) if !rows.is_empty() => {
                let mut domain: Vec<Value> = Vec::new();
                for v in rows.iter().flat_map(|(_, dist)| dist.values()) {
                    if !domain.contains(v) {
                        domain.push(v.clone());
                    }
                }
                Some(domain)
            },
            _ => None
        }
    }


    /// Construct a CPD, initialized based on ```self```
    ///
    /// # Args
    /// * `var`: the name of the variable the CPD is for
    /// * `domain`: the values of `var`
    /// * `parent_domains`: the values of each parent of `var`, in parent order
    ///
    /// # Returns
    /// a `Table` of shape ```[|P1|, ..., |Pk|, |var|]```
    pub fn build_cpd(self, var: &str, domain: &[Value], parent_domains: &[&[Value]]) -> Result<Table> {
        ///////////////////////////////////////////////////////////////////////////////
        // Check for errors
        if domain.is_empty() {
            return Err(PosteriorError::InvalidInitialization(format!("{} has an empty domain", var)));
        }

        match self {
            Initialization::Bernoulli(_) if !parent_domains.is_empty() => {
                return Err(PosteriorError::InvalidInitialization(
                    format!("{} has parents and cannot be initialized from a single probability", var)
                ));
            },
            Initialization::Bernoulli(_) | Initialization::Boolean(_) if domain != boolean_domain().as_slice() => {
                return Err(PosteriorError::InvalidInitialization(format!("{} is not boolean", var)));
            },
            _ => ()
        }

        ///////////////////////////////////////////////////////////////////////////////
        // now, build CPD
        let mut shape: Vec<usize> = parent_domains.iter().map(|d| d.len()).collect();
        shape.push(domain.len());

        let tbl = match self {
            Initialization::Uniform => {
                // normalizing constant is just the number of values
                let val = 1. / (domain.len() as f64);
                Table::from_elem(shape, val)
            },
            Initialization::Random(seed) => {
                let mut rng = StdRng::seed_from_u64(seed);
                let mut tbl = Table::random_using(shape, Uniform::new(1.0, 100.0), &mut rng);
                let last = nd::Axis(tbl.ndim() - 1);
                for mut lane in tbl.lanes_mut(last) {
                    let z = lane.sum();
                    lane.mapv_inplace(|p| p / z);
                }
                tbl
            },
            Initialization::Bernoulli(p) => {
                let p = check_probability(p)?;
                Table::from_shape_vec(shape, vec![p, 1.0 - p])
                    .map_err(|e| PosteriorError::InvalidInitialization(e.to_string()))?
            },
            Initialization::Boolean(rows) => {
                let mut lookup = HashMap::new();
                for (key, p) in rows {
                    let p = check_probability(p)?;
                    lookup.insert(key, vec![p, 1.0 - p]);
                }
                fill_table(var, shape, parent_domains, lookup)?
            },
            Initialization::Table(rows) => {
                let mut lookup = HashMap::new();
                for (key, dist) in rows {
                    if let Some(v) = dist.values().find(|v| !domain.contains(v)) {
                        return Err(PosteriorError::UnknownValue { variable: String::from(var), value: v.clone() });
                    }
                    let row: Vec<f64> = domain.iter().map(|v| dist.prob(v)).collect();
                    let total: f64 = row.iter().sum();
                    if (total - 1.0).abs() > PROBABILITY_TOLERANCE {
                        return Err(PosteriorError::InvalidTable(
                            format!("the distribution of {} given {:?} sums to {}", var, key, total)
                        ));
                    }
                    for &p in row.iter() {
                        check_probability(p)?;
                    }
                    lookup.insert(key, row);
                }
                fill_table(var, shape, parent_domains, lookup)?
            }
        };

        Ok(tbl)
    }
}


/// Lay out one row per combination of parent values into a dense table, failing if a
/// combination is missing or a row refers to values outside the parents' domains.
fn fill_table(
    var: &str,
    shape: Vec<usize>,
    parent_domains: &[&[Value]],
    mut rows: HashMap<Vec<Value>, Vec<f64>>,
) -> Result<Table> {
    let mut tbl = Table::zeros(shape);

    for combo in all_combinations(parent_domains) {
        let row = rows.remove(&combo).ok_or_else(|| {
            PosteriorError::InvalidTable(format!("{} has no entry for parent values {:?}", var, combo))
        })?;

        let mut idx: Vec<usize> = combo.iter()
                                       .zip(parent_domains.iter())
                                       .filter_map(|(v, d)| d.iter().position(|x| x == v))
                                       .collect();

        for (j, p) in row.into_iter().enumerate() {
            idx.push(j);
            tbl[nd::IxDyn(&idx)] = p;
            idx.pop();
        }
    }

    // anything left over named parent values that do not exist
    if let Some(key) = rows.keys().next() {
        return Err(PosteriorError::InvalidTable(
            format!("{} has an entry for unknown parent values {:?}", var, key)
        ));
    }

    Ok(tbl)
}


#[cfg(test)]
mod tests {

    use super::*;
    use approx::assert_abs_diff_eq;

    fn bools() -> Vec<Value> {
        boolean_domain()
    }

    #[test]
    fn uniform() {
        let domain = vec![Value::from(0), Value::from(1), Value::from(2)];
        let parents = bools();
        let tbl = Initialization::Uniform.build_cpd("X", &domain, &[&parents]).unwrap();
        assert_eq!(&[2, 3], tbl.shape());
        assert!(tbl.iter().all(|&p| (p - 1.0 / 3.0).abs() < 1e-12));
    }

    #[test]
    fn random_rows_are_distributions() {
        let domain = vec![Value::from("a"), Value::from("b"), Value::from("c")];
        let parents = bools();
        let tbl = Initialization::Random(7).build_cpd("X", &domain, &[&parents, &parents]).unwrap();
        assert_eq!(&[2, 2, 3], tbl.shape());
        for lane in tbl.lanes(nd::Axis(2)) {
            assert_abs_diff_eq!(1.0, lane.sum(), epsilon = 1e-9);
        }

        // the same seed gives the same table
        let again = Initialization::Random(7).build_cpd("X", &domain, &[&parents, &parents]).unwrap();
        assert_eq!(tbl, again);
    }

    #[test]
    fn bernoulli() {
        let tbl = Initialization::Bernoulli(0.001).build_cpd("B", &bools(), &[]).unwrap();
        assert_eq!(&[2], tbl.shape());
        assert_abs_diff_eq!(0.001, tbl[nd::IxDyn(&[0])]);
        assert_abs_diff_eq!(0.999, tbl[nd::IxDyn(&[1])]);

        let parents = bools();
        assert!(Initialization::Bernoulli(0.5).build_cpd("B", &bools(), &[&parents]).is_err());
        assert!(Initialization::Bernoulli(1.5).build_cpd("B", &bools(), &[]).is_err());
        assert!(Initialization::Bernoulli(0.5).build_cpd("B", &[Value::from(1)], &[]).is_err());
    }

    #[test]
    fn boolean_table() {
        let parents = bools();
        let init = Initialization::Boolean(vec![(vec![Value::from(true)], 0.2), (vec![Value::from(false)], 0.625)]);
        let tbl = init.build_cpd("X", &bools(), &[&parents]).unwrap();
        assert_abs_diff_eq!(0.2, tbl[nd::IxDyn(&[0, 0])]);
        assert_abs_diff_eq!(0.375, tbl[nd::IxDyn(&[1, 1])]);
    }

    #[test]
    fn boolean_table_missing_row() {
        let parents = bools();
        let init = Initialization::Boolean(vec![(vec![Value::from(true)], 0.2)]);
        match init.build_cpd("X", &bools(), &[&parents]) {
            Err(PosteriorError::InvalidTable(_)) => (),
            other => panic!("unexpected result {:?}", other)
        }

        let init = Initialization::Boolean(vec![
            (vec![Value::from(true)], 0.2),
            (vec![Value::from(false)], 0.2),
            (vec![Value::from("maybe")], 0.2),
        ]);
        match init.build_cpd("X", &bools(), &[&parents]) {
            Err(PosteriorError::InvalidTable(_)) => (),
            other => panic!("unexpected result {:?}", other)
        }
    }

    #[test]
    fn distribution_table() {
        let lo_hi = |lo: f64| ProbDist::from_frequencies("G", vec![("lo", lo), ("hi", 1.0 - lo)]).unwrap();
        let init = Initialization::Table(vec![
            (vec![Value::from(true)], lo_hi(0.3)),
            (vec![Value::from(false)], lo_hi(0.9)),
        ]);
        let domain = init.implied_domain().unwrap();
        assert_eq!(vec![Value::from("lo"), Value::from("hi")], domain);

        let parents = bools();
        let tbl = init.build_cpd("G", &domain, &[&parents]).unwrap();
        assert_abs_diff_eq!(0.7, tbl[nd::IxDyn(&[0, 1])], epsilon = 1e-12);
        assert_abs_diff_eq!(0.9, tbl[nd::IxDyn(&[1, 0])], epsilon = 1e-12);
    }

    #[test]
    fn distribution_table_not_normalized() {
        let mut dist = ProbDist::new("G");
        dist.set("lo", 0.5);
        dist.set("hi", 0.25);
        let init = Initialization::Table(vec![(vec![], dist)]);
        let domain = init.implied_domain().unwrap();
        match init.build_cpd("G", &domain, &[]) {
            Err(PosteriorError::InvalidTable(_)) => (),
            other => panic!("unexpected result {:?}", other)
        }
    }
}
