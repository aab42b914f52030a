//! Defines a `BayesNet`, a Bayesian model that represents the factorization of a probability
//! distribution P, and the `BayesNode`s it is made of.

use crate::init::{Initialization, Table};
use crate::util::{PosteriorError, Result};
use crate::variable::{Assignment, Value};

use indexmap::IndexMap;
use log::debug;
use ndarray::prelude as nd;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;


/// A single node of a Bayesian network: a variable, its parents, and the conditional probability
/// table ```P(variable | parents)```.
#[derive(Clone, Debug)]
pub struct BayesNode {

    /// The variable defined by this node
    variable: String,

    /// The parents of the variable, in table order
    parents: Vec<String>,

    /// The values the variable may take
    domain: Vec<Value>,

    /// The values each parent may take
    parent_domains: Vec<Vec<Value>>,

    /// The CPD, with one axis per parent followed by an axis for the variable
    cpt: Table
}

impl BayesNode {

    pub fn variable(&self) -> &str {
        &self.variable
    }

    pub fn parents(&self) -> &[String] {
        &self.parents
    }

    pub fn domain(&self) -> &[Value] {
        &self.domain
    }

    pub fn parent_domains(&self) -> &[Vec<Value>] {
        &self.parent_domains
    }

    /// The dense conditional probability table
    pub fn cpt(&self) -> &Table {
        &self.cpt
    }

    /// The index of `val` in the domain of this node's variable
    pub fn value_index(&self, val: &Value) -> Result<usize> {
        index_of(&self.variable, &self.domain, val)
    }

    /// Translate a tuple of parent values to indices into the table
    fn parent_indices(&self, parent_values: &[Value]) -> Result<Vec<usize>> {
        if parent_values.len() != self.parents.len() {
            return Err(PosteriorError::InvalidEvent(
                format!("{} has {} parents, got {} values", self.variable, self.parents.len(), parent_values.len())
            ));
        }

        self.parents.iter()
                    .zip(self.parent_domains.iter())
                    .zip(parent_values.iter())
                    .map(|((p, d), v)| index_of(p, d, v))
                    .collect()
    }

    /// The distribution of the variable for one combination of parent values, in domain order.
    pub fn row(&self, parent_values: &[Value]) -> Result<Vec<f64>> {
        let mut view = self.cpt.view();
        for i in self.parent_indices(parent_values)? {
            view = view.index_axis_move(nd::Axis(0), i);
        }

        Ok(view.iter().cloned().collect())
    }

    /// The conditional probability ```P(variable = value | parents)```, where the values of the
    /// parents are taken from `event`.
    ///
    /// # Errors
    /// * `PosteriorError::IncompleteAssignment` if `event` does not assign every parent
    /// * `PosteriorError::UnknownValue` if `value` or a parent value is outside its domain
    pub fn p(&self, value: &Value, event: &Assignment) -> Result<f64> {
        let parent_values = event.values_of(&self.parents)?;
        let mut idx = self.parent_indices(&parent_values)?;
        idx.push(self.value_index(value)?);

        Ok(self.cpt[nd::IxDyn(&idx)])
    }

    /// Randomly draw a value of the variable given the parent values in `event`.
    pub fn sample<R: Rng + ?Sized>(&self, event: &Assignment, rng: &mut R) -> Result<Value> {
        let parent_values = event.values_of(&self.parents)?;
        let row = self.row(&parent_values)?;
        let dist = WeightedIndex::new(&row)
            .map_err(|_| PosteriorError::DegenerateDistribution(self.variable.clone()))?;

        Ok(self.domain[dist.sample(rng)].clone())
    }
}


fn index_of(var: &str, domain: &[Value], val: &Value) -> Result<usize> {
    domain.iter()
          .position(|v| v == val)
          .ok_or_else(|| PosteriorError::UnknownValue { variable: String::from(var), value: val.clone() })
}


/// Represents a Bayesian Network - a Directed Probabilistic Graphical Model.
///
/// # Representation
/// The network is represented as a Directed Acyclic Graph (DAG). A traditional graph data
/// structure is not used; instead, the parents of each `BayesNode` implicitly define the edges
/// of the graph. The nodes are held in their topological order to faciliate efficient
/// computations over the graph.
#[derive(Clone, Debug)]
pub struct BayesNet {

    /// The nodes of the network, in topological order
    nodes: IndexMap<String, BayesNode>,

    /// The variables of the network, in topological order
    order: Vec<String>,

    /// The children of each variable
    children: IndexMap<String, Vec<String>>
}

impl BayesNet {

    /// Get a topological order of the `BayesNet`: every variable follows its parents
    pub fn topological_order(&self) -> &[String] {
        &self.order
    }

    /// Iterate over the nodes in topological order
    pub fn nodes(&self) -> impl DoubleEndedIterator<Item = &BayesNode> {
        self.nodes.values()
    }

    /// Get the `BayesNode` for the given variable
    pub fn node(&self, var: &str) -> Result<&BayesNode> {
        self.nodes.get(var).ok_or_else(|| PosteriorError::UnknownVariable(String::from(var)))
    }

    /// The values the given variable may take
    pub fn variable_values(&self, var: &str) -> Result<&[Value]> {
        self.node(var).map(|n| n.domain())
    }

    /// The variables with `var` as a parent
    pub fn children(&self, var: &str) -> Result<&[String]> {
        self.children
            .get(var)
            .map(|c| c.as_slice())
            .ok_or_else(|| PosteriorError::UnknownVariable(String::from(var)))
    }

    /// Get the number of variables in the the `BayesNet`
    pub fn num_variables(&self) -> usize {
        self.nodes.len()
    }

    /// Every variable other than `x`, in topological order
    pub fn variables_except(&self, x: &str) -> Vec<&str> {
        self.order.iter().map(|v| v.as_str()).filter(|&v| v != x).collect()
    }

    /// The variables that are neither `x` nor part of the evidence, in topological order
    pub fn hidden_variables(&self, x: &str, evidence: &Assignment) -> Vec<&str> {
        self.variables_except(x).into_iter().filter(|v| !evidence.contains(v)).collect()
    }

    /// Verify that every variable and value of `evidence` belongs to the network
    pub fn check_evidence(&self, evidence: &Assignment) -> Result<()> {
        for (var, val) in evidence.iter() {
            self.node(var)?.value_index(val)?;
        }

        Ok(())
    }

    /// Verify that ```P(x | evidence)``` is a valid query for this network
    ///
    /// # Returns
    /// the node of the query variable
    pub fn check_query(&self, x: &str, evidence: &Assignment) -> Result<&BayesNode> {
        let node = self.node(x)?;
        if evidence.contains(x) {
            return Err(PosteriorError::QueryInEvidence(String::from(x)));
        }

        self.check_evidence(evidence)?;
        Ok(node)
    }

    /// Determine the probability of a full `Assignment` to the variables in the `BayesNet` by the
    /// chain rule.
    pub fn probability(&self, assignment: &Assignment) -> Result<f64> {
        let missing: Vec<String> = self.order.iter().filter(|v| !assignment.contains(v)).cloned().collect();
        if !missing.is_empty() {
            return Err(PosteriorError::IncompleteAssignment(missing));
        }

        // for every variable in the graph, get the probability of the assignment and
        // multiply those probabilities, stopping at the first error
        self.nodes
            .iter()
            .map(|(var, node)| assignment.get(var).map_or(Ok(0.0), |val| node.p(val, assignment)))
            .fold(Ok(1.0), |acc, val| acc.and_then(|p| val.map(|v| p * v)))
    }
}


/// A variable that has been added to a `BayesNetBuilder` but not yet placed in the network
struct NodeSpec {
    parents: Vec<String>,
    domain: Option<Vec<Value>>,
    init: Initialization
}


/// An implementation of the [builder pattern] for creating a `BayesNet`.
///
/// Variables may be added in any order; the topological order is computed by `build`.
///
/// [builder pattern]: https://en.wikipedia.org/wiki/Builder_pattern
pub struct BayesNetBuilder {

    /// The variables and the description of their CPDs, in insertion order
    specs: IndexMap<String, NodeSpec>,

    /// The error state of the builder
    err: Option<PosteriorError>
}

impl Default for BayesNetBuilder {
    fn default() -> Self {
        BayesNetBuilder::new()
    }
}

impl BayesNetBuilder {

    /// Construct a new `BayesNetBuilder` representing an empty `BayesNet`
    pub fn new() -> Self {
        BayesNetBuilder {
            specs: IndexMap::new(),
            err: None
        }
    }


    /// Add a boolean variable with no parents and ```P(var = True) = p```.
    pub fn with_bernoulli(self, var: &str, p: f64) -> Self {
        self.add_variable(var, None, &[], Initialization::Bernoulli(p))
    }


    /// Add a boolean variable given by ```P(var = True | parents)``` for every combination of
    /// parent values.
    pub fn with_boolean(self, var: &str, parents: &[&str], rows: Vec<(Vec<Value>, f64)>) -> Self {
        self.add_variable(var, None, parents, Initialization::Boolean(rows))
    }


    /// Add a variable whose domain is implied by its initialization.
    ///
    /// # Args
    /// * `var`: the variable to add to the model
    /// * `parents`: the parent variables
    /// * `init`: the initialization mechanism for the CPD of `var` in the model.
    pub fn with_variable(self, var: &str, parents: &[&str], init: Initialization) -> Self {
        self.add_variable(var, None, parents, init)
    }


    /// Add a variable with an explicit domain.
    ///
    /// # Args
    /// * `var`: the variable to add to the model
    /// * `domain`: the values of `var`
    /// * `parents`: the parent variables
    /// * `init`: the initialization mechanism for the CPD of `var` in the model.
    pub fn with_domain_variable(self, var: &str, domain: Vec<Value>, parents: &[&str], init: Initialization) -> Self {
        self.add_variable(var, Some(domain), parents, init)
    }


    /// Complete building the model.
    ///
    /// # Returns
    /// the `BayesNet`, or an error if one was generated during the building process
    ///
    /// # Errors
    /// * `PosteriorError::Structural` if a parent is missing or the graph has a cycle
    /// * any error raised while building the CPD of a variable
    pub fn build(self) -> Result<BayesNet> {
        if let Some(e) = self.err {
            return Err(e);
        }

        let mut specs = self.specs;

        ///////////////////////////////////////////////////////////////////////
        // 1) every parent must be a variable of the network
        for (var, spec) in specs.iter() {
            if let Some(p) = spec.parents.iter().find(|p| !specs.contains_key(p.as_str())) {
                return Err(PosteriorError::Structural(format!("{} refers to unknown parent {}", var, p)));
            }
        }

        ///////////////////////////////////////////////////////////////////////
        // 2) topological sort, preferring insertion order among ready variables
        let mut nodes: IndexMap<String, BayesNode> = IndexMap::new();

        while !specs.is_empty() {
            let ready = specs.iter()
                             .position(|(_, s)| s.parents.iter().all(|p| nodes.contains_key(p.as_str())));

            let (var, spec) = match ready.and_then(|i| specs.shift_remove_index(i)) {
                Some(entry) => entry,
                None => {
                    let rest: Vec<&String> = specs.keys().collect();
                    return Err(PosteriorError::Structural(format!("cycle among {:?}", rest)));
                }
            };

            ///////////////////////////////////////////////////////////////////
            // 3) Build the CPD based on the initialization
            let NodeSpec { parents, domain, init } = spec;
            let domain = domain
                             .or_else(|| init.implied_domain())
                             .ok_or_else(|| PosteriorError::InvalidInitialization(
                                 format!("{} needs an explicit domain", var)
                             ))?;

            if domain.iter().enumerate().any(|(i, v)| domain[..i].contains(v)) {
                return Err(PosteriorError::InvalidInitialization(format!("{} has repeated values", var)));
            }

            let parent_domains: Vec<Vec<Value>> = parents
                                                      .iter()
                                                      .filter_map(|p| nodes.get(p.as_str()))
                                                      .map(|n| n.domain.clone())
                                                      .collect();

            let cpt = {
                let views: Vec<&[Value]> = parent_domains.iter().map(|d| d.as_slice()).collect();
                init.build_cpd(&var, &domain, &views)?
            };

            let node = BayesNode { variable: var.clone(), parents, domain, parent_domains, cpt };
            nodes.insert(var, node);
        }

        let order: Vec<String> = nodes.keys().cloned().collect();
        debug!("built network with topological order {:?}", order);

        let mut children: IndexMap<String, Vec<String>> = order.iter().map(|v| (v.clone(), Vec::new())).collect();
        for node in nodes.values() {
            for p in node.parents.iter() {
                if let Some(c) = children.get_mut(p.as_str()) {
                    c.push(node.variable.clone());
                }
            }
        }

        Ok(BayesNet { nodes, order, children })
    }


    /// Internal function that acutally does the variable addition to the model
    fn add_variable(mut self, var: &str, domain: Option<Vec<Value>>, parents: &[&str], init: Initialization) -> Self {
        ///////////////////////////////////////////////////////////////////////
        // 1) if we are in an error state, do nothing
        if self.err.is_some() {
            return self;
        }

        ///////////////////////////////////////////////////////////////////////
        // 2) Check for error conditions
        if self.specs.contains_key(var) {
            self.err = Some(PosteriorError::Structural(format!("{} is defined twice", var)));
            return self;
        }

        if parents.contains(&var) {
            self.err = Some(PosteriorError::Structural(format!("{} is its own parent", var)));
            return self;
        }

        if parents.iter().enumerate().any(|(i, p)| parents[..i].contains(p)) {
            self.err = Some(PosteriorError::Structural(format!("{} lists a parent twice", var)));
            return self;
        }

        ///////////////////////////////////////////////////////////////////////
        // 3) Record the variable; its CPD is built once the parents are known
        let spec = NodeSpec {
            parents: parents.iter().map(|&p| String::from(p)).collect(),
            domain,
            init
        };
        self.specs.insert(String::from(var), spec);

        self
    }
}


#[cfg(test)]
mod tests {

    use super::*;
    use crate::distribution::ProbDist;
    use crate::fixtures::{burglary, student, T, F};
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn build_empty() {
        let model = BayesNetBuilder::new().build().unwrap();
        assert_eq!(model.num_variables(), 0);
        assert!(model.topological_order().is_empty());
    }

    #[test]
    fn burglary_cpt_lookup() {
        let bn = burglary();
        let alarm = bn.node("Alarm").unwrap();

        let event = Assignment::new().with("Burglary", true).with("Earthquake", true);
        assert_eq!(0.95, alarm.p(&T, &event).unwrap());

        let event = Assignment::new().with("Burglary", false).with("Earthquake", true);
        assert_abs_diff_eq!(0.71, alarm.p(&F, &event).unwrap(), epsilon = 1e-12);
    }

    #[test]
    fn node_p() {
        let bn = BayesNetBuilder::new()
            .with_bernoulli("Burglary", 0.1)
            .with_boolean("X", &["Burglary"], vec![(vec![T], 0.2), (vec![F], 0.625)])
            .build()
            .unwrap();

        let event = Assignment::new().with("Burglary", false).with("Earthquake", true);
        assert_eq!(0.375, bn.node("X").unwrap().p(&F, &event).unwrap());
    }

    #[test]
    fn node_p_errors() {
        let bn = burglary();
        let alarm = bn.node("Alarm").unwrap();

        let event = Assignment::new().with("Burglary", true);
        assert_eq!(
            Err(PosteriorError::IncompleteAssignment(vec![String::from("Earthquake")])),
            alarm.p(&T, &event)
        );

        let event = Assignment::new().with("Burglary", true).with("Earthquake", true);
        match alarm.p(&Value::from("maybe"), &event) {
            Err(PosteriorError::UnknownValue { variable, .. }) => assert_eq!("Alarm", variable),
            other => panic!("unexpected result {:?}", other)
        }
    }

    #[test]
    fn boolean_rows_sum_to_one() {
        let bn = burglary();
        for node in bn.nodes() {
            let doms: Vec<&[Value]> = node.parent_domains().iter().map(|d| d.as_slice()).collect();
            for combo in crate::variable::all_combinations(&doms) {
                let event: Assignment = node.parents().iter().cloned().zip(combo).collect();
                let total = node.p(&T, &event).unwrap() + node.p(&F, &event).unwrap();
                assert_abs_diff_eq!(1.0, total, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn topological_sort() {
        // added out of order on purpose
        let bn = BayesNetBuilder::new()
            .with_boolean("C", &["B"], vec![(vec![T], 0.5), (vec![F], 0.5)])
            .with_boolean("B", &["A"], vec![(vec![T], 0.5), (vec![F], 0.5)])
            .with_bernoulli("A", 0.5)
            .with_bernoulli("D", 0.5)
            .build()
            .unwrap();

        assert_eq!(vec!["A", "B", "C", "D"], bn.topological_order());
        assert_eq!(vec!["B"], bn.children("A").unwrap());
        assert!(bn.children("C").unwrap().is_empty());
    }

    #[test]
    fn structural_errors() {
        let cycle = BayesNetBuilder::new()
            .with_boolean("A", &["B"], vec![(vec![T], 0.5), (vec![F], 0.5)])
            .with_boolean("B", &["A"], vec![(vec![T], 0.5), (vec![F], 0.5)])
            .build();
        match cycle {
            Err(PosteriorError::Structural(_)) => (),
            other => panic!("unexpected result {:?}", other)
        }

        let missing = BayesNetBuilder::new()
            .with_boolean("A", &["B"], vec![(vec![T], 0.5), (vec![F], 0.5)])
            .build();
        match missing {
            Err(PosteriorError::Structural(_)) => (),
            other => panic!("unexpected result {:?}", other)
        }

        let duplicate = BayesNetBuilder::new()
            .with_bernoulli("A", 0.5)
            .with_bernoulli("A", 0.5)
            .build();
        match duplicate {
            Err(PosteriorError::Structural(_)) => (),
            other => panic!("unexpected result {:?}", other)
        }
    }

    #[test]
    fn explicit_domains() {
        let no_domain = BayesNetBuilder::new().with_variable("A", &[], Initialization::Uniform).build();
        match no_domain {
            Err(PosteriorError::InvalidInitialization(_)) => (),
            other => panic!("unexpected result {:?}", other)
        }

        let bn = BayesNetBuilder::new()
            .with_domain_variable("A", vec![Value::from(0), Value::from(1), Value::from(2)], &[], Initialization::Uniform)
            .with_domain_variable("B", vec![Value::from("x"), Value::from("y")], &["A"], Initialization::Random(3))
            .build()
            .unwrap();

        assert_eq!(3, bn.variable_values("A").unwrap().len());
        let row = bn.node("B").unwrap().row(&[Value::from(2)]).unwrap();
        assert_abs_diff_eq!(1.0, row.iter().sum::<f64>(), epsilon = 1e-9);
    }

    #[test]
    fn probability_by_chain_rule() {
        let bn = student();
        let a: Assignment = vec![("D", 0), ("I", 0), ("G", 0), ("S", 0), ("L", 0)].into_iter().collect();
        assert_abs_diff_eq!(0.6 * 0.7 * 0.3 * 0.95 * 0.9, bn.probability(&a).unwrap(), epsilon = 1e-12);

        let partial = Assignment::new().with("D", 0);
        assert!(bn.probability(&partial).is_err());
    }

    #[test]
    fn hidden_variables() {
        let bn = burglary();
        let e = Assignment::new().with("JohnCalls", true);
        assert_eq!(vec!["Earthquake", "Alarm", "MaryCalls"], bn.hidden_variables("Burglary", &e));
        assert_eq!(4, bn.variables_except("Alarm").len());
    }

    #[test]
    fn query_checks() {
        let bn = burglary();
        assert!(bn.check_query("Burglary", &Assignment::new()).is_ok());
        assert_eq!(
            Err(PosteriorError::UnknownVariable(String::from("Nope"))),
            bn.check_query("Nope", &Assignment::new()).map(|_| ())
        );
        assert_eq!(
            Err(PosteriorError::QueryInEvidence(String::from("Alarm"))),
            bn.check_query("Alarm", &Assignment::new().with("Alarm", true)).map(|_| ())
        );
        assert!(bn.check_query("Alarm", &Assignment::new().with("Nope", true)).is_err());
    }

    #[test]
    fn sample_respects_table() {
        let bn = BayesNetBuilder::new()
            .with_bernoulli("A", 1.0)
            .with_variable("B", &["A"], Initialization::Table(vec![
                (vec![T], ProbDist::from_frequencies("B", vec![("x", 0.0), ("y", 1.0)]).unwrap()),
                (vec![F], ProbDist::from_frequencies("B", vec![("x", 1.0), ("y", 0.0)]).unwrap()),
            ]))
            .build()
            .unwrap();

        let mut rng = StdRng::seed_from_u64(5);
        let a = bn.node("A").unwrap();
        let b = bn.node("B").unwrap();
        for _ in 0..20 {
            assert_eq!(T, a.sample(&Assignment::new(), &mut rng).unwrap());
            let event = Assignment::new().with("A", true);
            assert_eq!(Value::from("y"), b.sample(&event, &mut rng).unwrap());
        }
    }
}
