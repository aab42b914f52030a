//! Definition of the factor module
//!
//! A `Factor` represents a relationship between some set of variables: a table over every
//! combination of their values. Factors are the intermediate objects of variable elimination.

use crate::distribution::ProbDist;
use crate::init::Table;
use crate::model::directed::BayesNode;
use crate::util::{PosteriorError, Result};
use crate::variable::{all_indices, Assignment, Value};

use ndarray::prelude as nd;


#[derive(Clone, Debug)]
pub struct Factor {

    /// The scope of the `Factor`
    scope: Vec<String>,

    /// The values of each variable in the scope
    domains: Vec<Vec<Value>>,

    /// The values of the `Factor` table, with one axis per variable of the scope. A `Factor`
    /// with an empty scope holds a single scalar.
    table: Table
}


impl Factor {

    /// The multiplicative identity: a `Factor` with empty scope and value 1
    pub fn unit() -> Self {
        Factor { scope: vec![], domains: vec![], table: Table::from_elem(nd::IxDyn(&[]), 1.0) }
    }


    /// Create a new `Factor`
    ///
    /// # Errors
    /// * `PosteriorError::InvalidTable` if the shape of the table does not match the domains
    /// * `PosteriorError::InvalidProbability` if the table holds a negative value
    pub fn new(scope: Vec<String>, domains: Vec<Vec<Value>>, table: Table) -> Result<Self> {
        if scope.len() != domains.len() || scope.len() != table.ndim() {
            return Err(PosteriorError::InvalidTable(
                String::from("cardinality of scope must match number of table dimensions")
            ));
        }

        for (d, &n) in domains.iter().zip(table.shape().iter()) {
            if d.len() != n {
                return Err(PosteriorError::InvalidTable(String::from("dimensions do not match")));
            }
        }

        // factors may not have negative values
        if let Some(&v) = table.iter().find(|&&v| v < 0.0) {
            return Err(PosteriorError::InvalidProbability(v));
        }

        Ok(Factor { scope, domains, table })
    }


    /// The `Factor` for the CPD of `node`, reduced by the evidence
    pub fn for_node(node: &BayesNode, evidence: &Assignment) -> Result<Self> {
        let mut scope: Vec<String> = node.parents().to_vec();
        scope.push(String::from(node.variable()));

        let mut domains: Vec<Vec<Value>> = node.parent_domains().to_vec();
        domains.push(node.domain().to_vec());

        Factor::new(scope, domains, node.cpt().clone())?.reduce(evidence)
    }


    /// Retrieve the scope of the `Factor`.
    pub fn scope(&self) -> &[String] {
        &self.scope
    }


    /// Check if the `Factor` is over a given variable
    pub fn mentions(&self, var: &str) -> bool {
        self.scope.iter().any(|v| v == var)
    }


    /// Translate the values `assignment` gives the scope into table indices
    fn indices(&self, assignment: &Assignment) -> Result<Vec<usize>> {
        let values = assignment.values_of(&self.scope)?;

        values.iter()
              .zip(self.scope.iter().zip(self.domains.iter()))
              .map(|(val, (var, domain))| {
                  domain.iter().position(|v| v == val).ok_or_else(|| {
                      PosteriorError::UnknownValue { variable: var.clone(), value: val.clone() }
                  })
              })
              .collect()
    }


    /// Retrieve the value for a complete assignment over the scope of this `Factor`
    ///
    /// # Args
    /// * `assignment`: a full assignment to the scope of a `Factor`. The assignment's scope may
    ///   be a superset of the `Factor`s scope.
    ///
    /// # Errors
    /// * `PosteriorError::IncompleteAssignment`, if assignment is not a complete assignment to the
    ///   scope of the `Factor`
    pub fn value(&self, assignment: &Assignment) -> Result<f64> {
        let idx = self.indices(assignment)?;
        Ok(self.table[nd::IxDyn(&idx)])
    }


    /// Pointwise product of this `Factor` and another `Factor`.
    ///
    /// Defined in Koller & Friedman Section 4.2.1
    ///
    /// # Returns
    /// A new `Factor` of scope union(self.scope(), other.scope())
    ///
    /// # Errors
    /// * `PosteriorError::InvalidTable`, if a shared variable has different domains in each
    pub fn product(&self, other: &Self) -> Result<Self> {
        // We are computing a new factor Psi(X, Y, Z) = phi1(X, Y) * phi2(Y, Z).
        let mut scope = self.scope.clone();
        let mut domains = self.domains.clone();

        for (var, domain) in other.scope.iter().zip(other.domains.iter()) {
            match scope.iter().position(|v| v == var) {
                Some(i) if domains[i] != *domain => {
                    return Err(PosteriorError::InvalidTable(format!("domains of {} disagree", var)));
                },
                Some(_) => (),
                None => {
                    scope.push(var.clone());
                    domains.push(domain.clone());
                }
            }
        }

        // where each variable of the operands lives in the new scope
        let mine: Vec<usize> = (0..self.scope.len()).collect();
        let theirs: Vec<usize> = other.scope
                                      .iter()
                                      .filter_map(|var| scope.iter().position(|v| v == var))
                                      .collect();

        let shape: Vec<usize> = domains.iter().map(|d| d.len()).collect();
        let mut tbl = Table::zeros(shape.clone());

        for idx in all_indices(&shape) {
            let i1: Vec<usize> = mine.iter().map(|&i| idx[i]).collect();
            let i2: Vec<usize> = theirs.iter().map(|&i| idx[i]).collect();

            tbl[nd::IxDyn(&idx)] = self.table[nd::IxDyn(&i1)] * other.table[nd::IxDyn(&i2)];
        }

        Ok(Factor { scope, domains, table: tbl })
    }


    /// Reduce the `Factor` to the given partial assignment. Variables of the assignment that are
    /// not in the scope are ignored.
    ///
    /// Defined in Koller & Friedman 4.2.3
    pub fn reduce(&self, assignment: &Assignment) -> Result<Self> {
        let mut table = self.table.clone();
        let mut scope = Vec::new();
        let mut domains = Vec::new();

        // walk the axes backwards so removing one does not shift the ones still to visit
        for i in (0..self.scope.len()).rev() {
            let var = &self.scope[i];
            if let Some(val) = assignment.get(var) {
                let j = self.domains[i].iter().position(|v| v == val).ok_or_else(|| {
                    PosteriorError::UnknownValue { variable: var.clone(), value: val.clone() }
                })?;
                table = table.index_axis_move(nd::Axis(i), j);
            } else {
                scope.push(var.clone());
                domains.push(self.domains[i].clone());
            }
        }

        scope.reverse();
        domains.reverse();

        Ok(Factor { scope, domains, table })
    }


    /// Sum the given variable out of the `Factor`
    ///
    /// Defined in Koller & Friedman 9.3.1
    pub fn marginalize(&self, var: &str) -> Self {
        match self.scope.iter().position(|v| v == var) {
            Some(idx) => {
                let mut scope = self.scope.clone();
                let mut domains = self.domains.clone();
                scope.remove(idx);
                domains.remove(idx);

                Factor { scope, domains, table: self.table.sum_axis(nd::Axis(idx)) }
            },
            // variable not in the scope of this factor, so the factor is already
            // marginalized over it
            None => self.clone()
        }
    }


    /// Turn a `Factor` over the single variable `var` into a normalized `ProbDist`
    ///
    /// # Errors
    /// * `PosteriorError::InvalidTable` if the scope is not exactly ```[var]```
    /// * `PosteriorError::DegenerateDistribution` if every entry is zero
    pub fn normalize(&self, var: &str) -> Result<ProbDist> {
        if self.scope.len() != 1 || self.scope[0] != var {
            return Err(PosteriorError::InvalidTable(
                format!("cannot read a distribution over {} from a factor over {:?}", var, self.scope)
            ));
        }

        let mut dist = ProbDist::new(var);
        for (val, &p) in self.domains[0].iter().zip(self.table.iter()) {
            dist.set(val.clone(), p);
        }

        dist.normalize()
    }
}
