//! The seam to the optimization library.

use super::context::ParetoFront;
use crate::catalog::Scalar;
use crate::category::Category;
use std::fmt;

/// One resolved constructor argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Kwarg<O> {
    /// A primitive value.
    Scalar(Scalar),
    /// A Pareto front taken from the chosen problem.
    Front(ParetoFront),
    /// An already constructed operator.
    Component(O),
}

/// Resolved constructor arguments, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Kwargs<O> {
    entries: Vec<(String, Kwarg<O>)>,
}

impl<O> Default for Kwargs<O> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<O> Kwargs<O> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: Kwarg<O>) {
        self.entries.push((name.into(), value));
    }

    /// Looks up an argument by name.
    pub fn get(&self, name: &str) -> Option<&Kwarg<O>> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// The scalar value of an argument, if it is one.
    pub fn scalar(&self, name: &str) -> Option<&Scalar> {
        match self.get(name) {
            Some(Kwarg::Scalar(s)) => Some(s),
            _ => None,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterates arguments in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Kwarg<O>)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<O> IntoIterator for Kwargs<O> {
    type Item = (String, Kwarg<O>);
    type IntoIter = std::vec::IntoIter<(String, Kwarg<O>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// A construction failure reported by a [`ComponentFactory`].
#[derive(Debug, Clone, PartialEq)]
pub struct FactoryError {
    /// The argument the failure is attributed to, when known.
    pub argument: Option<String>,
    pub reason: String,
}

impl FactoryError {
    /// A failure not tied to one argument.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            argument: None,
            reason: reason.into(),
        }
    }

    /// A failure caused by `argument`.
    pub fn at(argument: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            argument: Some(argument.into()),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FactoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.argument {
            Some(argument) => write!(f, "{argument}: {}", self.reason),
            None => f.write_str(&self.reason),
        }
    }
}

impl std::error::Error for FactoryError {}

impl From<String> for FactoryError {
    fn from(reason: String) -> Self {
        Self::new(reason)
    }
}

impl From<&str> for FactoryError {
    fn from(reason: &str) -> Self {
        Self::new(reason)
    }
}

/// Constructs library objects from resolved arguments.
///
/// Implementations wrap the optimization library; the resolution core only
/// hands over fully resolved [`Kwargs`] and never inspects the objects
/// beyond the two problem queries.
pub trait ComponentFactory: Send + Sync {
    /// Any constructed object: operator, problem, algorithm, termination or
    /// indicator.
    type Object;

    /// Equivalent to instantiating `class_name` with `kwargs`.
    fn construct(
        &self,
        category: Category,
        class_name: &str,
        kwargs: Kwargs<Self::Object>,
    ) -> Result<Self::Object, FactoryError>;

    /// Objective count of a constructed problem.
    fn n_obj(&self, problem: &Self::Object) -> Option<usize>;

    /// Pareto front of a constructed problem, optionally sampled along
    /// reference directions.
    fn pareto_front(
        &self,
        problem: &Self::Object,
        ref_dirs: Option<&Self::Object>,
    ) -> Option<ParetoFront>;
}
