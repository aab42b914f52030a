//! Definition of the variable module
//!
//! A random variable is identified by its name. The values a variable can take are `Value`s, and
//! a (possibly partial) assignment of values to variables is an `Assignment`.

use crate::util::{PosteriorError, Result};

use indexmap::IndexMap;
use itertools::Itertools;

use std::fmt;
use std::iter::FromIterator;


/// A single outcome of a discrete random variable.
///
/// Most networks use boolean variables, but any hashable, ordered tag may be used.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Value {
    /// `True` or `False`
    Bool(bool),

    /// An integer tag
    Int(i64),

    /// A named tag
    Str(String)
}

impl fmt::Display for Value {

    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Int(i) => write!(f, "{}", i),
            Value::Str(ref s) => write!(f, "{}", s)
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl<'a> From<&'a str> for Value {
    fn from(s: &'a str) -> Self {
        Value::Str(String::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}


/// A (partial) assignment of `Value`s to variables.
///
/// The order in which variables are assigned is preserved.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Assignment {
    values: IndexMap<String, Value>
}

impl Assignment {

    /// Construct an empty `Assignment`
    pub fn new() -> Self {
        Assignment { values: IndexMap::new() }
    }

    /// Assign `val` to the variable `var`, replacing any previous assignment
    pub fn set<V: Into<Value>>(&mut self, var: &str, val: V) {
        self.values.insert(String::from(var), val.into());
    }

    /// Builder-style variant of `set`
    pub fn with<V: Into<Value>>(mut self, var: &str, val: V) -> Self {
        self.set(var, val);
        self
    }

    /// Remove the assignment to `var`, if any
    pub fn unset(&mut self, var: &str) -> Option<Value> {
        self.values.shift_remove(var)
    }

    /// Get the value assigned to `var`
    pub fn get(&self, var: &str) -> Option<&Value> {
        self.values.get(var)
    }

    pub fn contains(&self, var: &str) -> bool {
        self.values.contains_key(var)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over the (variable, value) pairs in assignment order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    /// The assigned variables, in assignment order
    pub fn variables(&self) -> impl Iterator<Item = &String> {
        self.values.keys()
    }

    /// Project the assignment onto `vars`.
    ///
    /// # Errors
    /// * `PosteriorError::IncompleteAssignment` naming every variable of `vars` that is not
    ///   assigned.
    pub fn values_of(&self, vars: &[String]) -> Result<Vec<Value>> {
        let missing: Vec<String> = vars.iter().filter(|v| !self.contains(v)).cloned().collect();
        if !missing.is_empty() {
            return Err(PosteriorError::IncompleteAssignment(missing));
        }

        Ok(vars.iter().filter_map(|v| self.get(v)).cloned().collect())
    }
}

impl<S: Into<String>, V: Into<Value>> FromIterator<(S, V)> for Assignment {

    fn from_iter<I: IntoIterator<Item = (S, V)>>(iter: I) -> Self {
        Assignment {
            values: iter.into_iter().map(|(s, v)| (s.into(), v.into())).collect()
        }
    }
}


/// An event: either a tuple of values whose variable order is known by the caller, or an
/// `Assignment`.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Values(Vec<Value>),
    Assignment(Assignment)
}

impl From<Vec<Value>> for Event {
    fn from(values: Vec<Value>) -> Self {
        Event::Values(values)
    }
}

impl From<Assignment> for Event {
    fn from(a: Assignment) -> Self {
        Event::Assignment(a)
    }
}

impl<'a> From<&'a Assignment> for Event {
    fn from(a: &'a Assignment) -> Self {
        Event::Assignment(a.clone())
    }
}


/// Get the values of an event in the order of `variables`.
///
/// A tuple event is returned unchanged; the caller is trusted to have supplied the values in the
/// right order. An `Assignment` is projected onto `variables`.
///
/// # Errors
/// * `PosteriorError::IncompleteAssignment` if a variable is absent from an `Assignment` event
pub fn event_values(event: &Event, variables: &[String]) -> Result<Vec<Value>> {
    match *event {
        Event::Values(ref values) => Ok(values.clone()),
        Event::Assignment(ref a) => a.values_of(variables)
    }
}


/// Check if `event` agrees with every variable assigned in `evidence`.
pub fn consistent_with(event: &Assignment, evidence: &Assignment) -> bool {
    evidence.iter().all(|(var, val)| event.get(var) == Some(val))
}


/// Every combination of one value from each of `domains`, in row-major order.
///
/// An empty list of domains has exactly one (empty) combination.
pub fn all_combinations<T: Clone>(domains: &[&[T]]) -> Vec<Vec<T>> {
    if domains.is_empty() {
        return vec![vec![]];
    }

    domains.iter()
           .map(|d| d.iter().cloned())
           .multi_cartesian_product()
           .collect()
}


/// Every index into a table of the given shape, in row-major order.
pub fn all_indices(shape: &[usize]) -> Vec<Vec<usize>> {
    let ranges: Vec<Vec<usize>> = shape.iter().map(|&n| (0..n).collect()).collect();
    let slices: Vec<&[usize]> = ranges.iter().map(|r| r.as_slice()).collect();
    all_combinations(&slices)
}
