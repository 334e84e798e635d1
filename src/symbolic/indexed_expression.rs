//! # Indexed expressions
//!
//! Data model of the expansion engine:
//! - [`IndexBinding`] - an index name is either `Fixed` to one value or ranges over a `Domain`
//! - [`IndexBindings`] - ordered table of unique index names and their bindings
//! - [`Expression`] - immutable pair of an expression string and the bindings it is expanded with
//!
//! ```
//! use RustedSums::symbolic::indexed_expression::{Expression, IndexBindings};
//! let bindings = IndexBindings::new()
//!     .fixed("i", 0).unwrap()
//!     .fixed("j", 1).unwrap()
//!     .domain("a", 0..3).unwrap();
//! let expression = Expression::new("p[i,j] + 5*q[i] + 10*sum(r[j,a],a)", bindings);
//! assert_eq!(
//!     expression.expand().unwrap(),
//!     "p[0,1] + 5*q[0] + 10*(r[1,0]+r[1,1]+r[1,2])"
//! );
//! ```
use crate::symbolic::expander::expand;
use crate::symbolic::expansion_error::ExpansionError;
use crate::symbolic::sum_locator::{SumOccurrence, find_sums};
use crate::symbolic::utils::is_identifier;
use regex::Regex;
use std::fmt;

/// What an index name stands for while an expression is expanded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexBinding {
    /// the index is a free variable with a known current value
    Fixed(i64),
    /// the index may be bound by `sum(..., name)`; values are used in this order
    Domain(Vec<i64>),
}

impl IndexBinding {
    /// value used when the index is substituted as a free index.
    /// For a domain it is the first element (None for an empty domain).
    pub fn free_value(&self) -> Option<i64> {
        match self {
            IndexBinding::Fixed(value) => Some(*value),
            IndexBinding::Domain(values) => values.first().copied(),
        }
    }

    pub fn domain_values(&self) -> Option<&[i64]> {
        match self {
            IndexBinding::Fixed(_) => None,
            IndexBinding::Domain(values) => Some(values),
        }
    }
}

impl fmt::Display for IndexBinding {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            IndexBinding::Fixed(value) => write!(f, "{}", value),
            IndexBinding::Domain(values) => {
                let values: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", values.join(", "))
            }
        }
    }
}

/// Ordered table of index bindings. Every name appears at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexBindings {
    entries: Vec<(String, IndexBinding)>,
}

impl IndexBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// adds a binding, rejecting invalid or repeated names
    pub fn insert(&mut self, name: &str, binding: IndexBinding) -> Result<(), ExpansionError> {
        if !is_identifier(name) {
            return Err(ExpansionError::InvalidIndexName {
                index: name.to_string(),
            });
        }
        if self.get(name).is_some() {
            return Err(ExpansionError::DuplicateBinding {
                index: name.to_string(),
            });
        }
        self.entries.push((name.to_string(), binding));
        Ok(())
    }

    pub fn fixed(mut self, name: &str, value: i64) -> Result<Self, ExpansionError> {
        self.insert(name, IndexBinding::Fixed(value))?;
        Ok(self)
    }

    pub fn domain<I>(mut self, name: &str, values: I) -> Result<Self, ExpansionError>
    where
        I: IntoIterator<Item = i64>,
    {
        self.insert(name, IndexBinding::Domain(values.into_iter().collect()))?;
        Ok(self)
    }

    /// table built from parallel name and value lists: every name gets a domain,
    /// so a free index takes the first value of its list
    pub fn from_lists(names: &[&str], values: Vec<Vec<i64>>) -> Result<Self, ExpansionError> {
        if names.len() != values.len() {
            return Err(ExpansionError::Config(format!(
                "{} index names but {} value lists",
                names.len(),
                values.len()
            )));
        }
        let mut bindings = Self::new();
        for (name, values) in names.iter().zip(values) {
            bindings.insert(name, IndexBinding::Domain(values))?;
        }
        Ok(bindings)
    }

    pub fn get(&self, name: &str) -> Option<&IndexBinding> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, binding)| binding)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &IndexBinding)> {
        self.entries.iter().map(|(n, b)| (n.as_str(), b))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// bindings ordered by decreasing name length, declaration order among equal lengths
    pub fn longest_first(&self) -> Vec<(&str, &IndexBinding)> {
        let mut sorted: Vec<(&str, &IndexBinding)> = self.iter().collect();
        sorted.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        sorted
    }

    /// only the bindings whose name occurs as a whole word in `text`
    pub fn relevant_to(&self, text: &str) -> Result<IndexBindings, ExpansionError> {
        let mut relevant = IndexBindings::new();
        for (name, binding) in self.iter() {
            if word_regex(name)?.is_match(text) {
                relevant.entries.push((name.to_string(), binding.clone()));
            }
        }
        Ok(relevant)
    }
}

fn word_regex(name: &str) -> Result<Regex, ExpansionError> {
    Ok(Regex::new(&format!(r"\b{}\b", regex::escape(name)))?)
}

/// names of bound indices still present as whole words in an expanded text.
/// An empty result means every declared index was resolved.
pub fn residual_indices(text: &str, bindings: &IndexBindings) -> Result<Vec<String>, ExpansionError> {
    let mut residual = Vec::new();
    for (name, _) in bindings.iter() {
        if word_regex(name)?.is_match(text) {
            residual.push(name.to_string());
        }
    }
    Ok(residual)
}

/// An expression string with the index bindings it is expanded with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    text: String,
    bindings: IndexBindings,
}

impl Expression {
    pub fn new(text: &str, bindings: IndexBindings) -> Self {
        Expression {
            text: text.to_string(),
            bindings,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn bindings(&self) -> &IndexBindings {
        &self.bindings
    }

    /// the outermost sums of the expression, in source order
    pub fn find_sums(&self) -> Result<Vec<SumOccurrence>, ExpansionError> {
        find_sums(&self.text)
    }

    /// body of every outermost sum as a new expression, carrying only the bindings
    /// whose names occur in that body
    pub fn sum_bodies(&self) -> Result<Vec<Expression>, ExpansionError> {
        let mut bodies = Vec::new();
        for sum in self.find_sums()? {
            let bindings = self.bindings.relevant_to(&sum.body_text)?;
            bodies.push(Expression::new(&sum.body_text, bindings));
        }
        Ok(bodies)
    }

    /// fully expanded text, see [`crate::symbolic::expander`]
    pub fn expand(&self) -> Result<String, ExpansionError> {
        expand(&self.text, &self.bindings)
    }

    /// the expanded text wrapped into a new expression
    pub fn expanded(&self) -> Result<Expression, ExpansionError> {
        Ok(Expression::new(&self.expand()?, self.bindings.clone()))
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}
