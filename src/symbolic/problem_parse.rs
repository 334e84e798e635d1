//! Helpers for the strings of an optimization problem definition:
//! - `x [i , j ]` - indexed names
//! - `lhs <= rhs` - relations
//! - `x[i,j] = 0 for i in range(2) for j in range(3)` - array creation with `for` loops
//!
//! ```
//! use RustedSums::symbolic::indexed_expression::IndexBindings;
//! use RustedSums::symbolic::problem_parse::{RelationKind, expand_constraint};
//! let rows = expand_constraint("T[j+1] - T[j] <= dT for j in range(2)", &IndexBindings::new()).unwrap();
//! assert_eq!(rows[0].residual, "T[1] - T[0]-(dT)");
//! assert_eq!(rows[1].kind, RelationKind::LessEqual);
//! ```
use crate::symbolic::expander::expand_for_each;
use crate::symbolic::expansion_error::ExpansionError;
use crate::symbolic::indexed_expression::IndexBindings;
use crate::symbolic::utils::matching_pairs;
use itertools::Itertools;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{alpha1, alphanumeric1, char, i64 as parse_i64, multispace0},
    combinator::{all_consuming, map, opt, recognize},
    multi::{many0, separated_list0, separated_list1},
    sequence::{delimited, pair, preceded},
};
use regex::Regex;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

/// Parses a variable name like `x`, `Qslack_min` or `_tmp1`
fn parse_variable_name(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))
    .parse(input)
}

/// Parses `[i , j ]` into trimmed index strings
fn parse_index_list(input: &str) -> IResult<&str, Vec<&str>> {
    let index = map(take_while1(|c: char| c != ',' && c != ']'), str::trim);
    delimited(char('['), separated_list1(char(','), index), char(']')).parse(input)
}

/// splits `x [i , j ]` into the name and its index list; `x` gives an empty list
pub fn parse_indexed_name(input: &str) -> Result<(String, Vec<String>), ExpansionError> {
    let mut parser = all_consuming(delimited(
        multispace0,
        pair(
            parse_variable_name,
            opt(preceded(multispace0, parse_index_list)),
        ),
        multispace0,
    ));
    let (_, (name, indices)) = parser
        .parse(input)
        .map_err(|e| ExpansionError::Parse(format!("'{}' is not an indexed name: {:?}", input, e)))?;
    let indices = indices
        .unwrap_or_default()
        .into_iter()
        .map(String::from)
        .collect();
    Ok((name.to_string(), indices))
}

/// Kind of a relation. Declaration order is the order operators are searched in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum RelationKind {
    #[strum(to_string = ">=")]
    GreaterEqual,
    #[strum(to_string = "<=")]
    LessEqual,
    #[strum(to_string = "=")]
    Equal,
}

/// `lhs (>=|<=|=) rhs`; kind is None when the text has no relation operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    pub lhs: String,
    pub rhs: String,
    pub kind: Option<RelationKind>,
}

impl Relation {
    /// `lhs-(rhs)`, the form a constraint function takes
    pub fn residual(&self) -> String {
        match self.kind {
            Some(_) => format!("{}-({})", self.lhs, self.rhs),
            None => self.lhs.clone(),
        }
    }
}

/// splits a relation at its operator; an operator at position 0 does not count
pub fn parse_relation(input: &str) -> Relation {
    for kind in RelationKind::iter() {
        let operator = kind.to_string();
        if let Some(pos) = input.find(&operator) {
            if pos > 0 {
                return Relation {
                    lhs: input[..pos].trim().to_string(),
                    rhs: input[pos + operator.len()..].trim().to_string(),
                    kind: Some(kind),
                };
            }
        }
    }
    Relation {
        lhs: input.trim().to_string(),
        rhs: String::new(),
        kind: None,
    }
}

/// `for index in domain`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForLoop {
    /// the trimmed clause text, e.g. `for j in range(24)`
    pub text: String,
    pub index: String,
    pub domain: Vec<i64>,
}

/// content repeated by trailing `for` loops
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayCreation {
    pub content: String,
    pub loops: Vec<ForLoop>,
    /// every combination of loop values, first loop varies slowest
    pub index_tuples: Vec<Vec<i64>>,
}

impl ArrayCreation {
    pub fn index_names(&self) -> Vec<&str> {
        self.loops.iter().map(|l| l.index.as_str()).collect()
    }

    /// loop names with their values, the shape `expand_for_each` takes
    pub fn loop_domains(&self) -> Vec<(String, Vec<i64>)> {
        self.loops
            .iter()
            .map(|l| (l.index.clone(), l.domain.clone()))
            .collect()
    }

    /// the content expanded once per index tuple
    pub fn expand(&self, bindings: &IndexBindings) -> Result<Vec<String>, ExpansionError> {
        expand_for_each(&self.content, &self.loop_domains(), bindings)
    }
}

fn parse_int_list(input: &str) -> IResult<&str, Vec<i64>> {
    separated_list0(
        char(','),
        delimited(multispace0, parse_i64, multispace0),
    )
    .parse(input)
}

enum DomainSpec {
    Range(Vec<i64>),
    List(Vec<i64>),
}

fn parse_domain_spec(input: &str) -> IResult<&str, DomainSpec> {
    let range = map(
        delimited(
            pair(tag("range"), preceded(multispace0, char('('))),
            parse_int_list,
            char(')'),
        ),
        DomainSpec::Range,
    );
    let list = map(delimited(char('['), parse_int_list, char(']')), DomainSpec::List);
    all_consuming(delimited(multispace0, alt((range, list)), multispace0)).parse(input)
}

// stop is excluded, negative steps count down
fn range_values(start: i64, stop: i64, step: i64) -> Vec<i64> {
    let mut values = Vec::new();
    let mut value = start;
    while (step > 0 && value < stop) || (step < 0 && value > stop) {
        values.push(value);
        match value.checked_add(step) {
            Some(next) => value = next,
            None => break,
        }
    }
    values
}

/// values of `range(n)`, `range(a, b)`, `range(a, b, step)` or `[v0, v1, ...]`
pub fn parse_domain(input: &str) -> Result<Vec<i64>, ExpansionError> {
    let (_, spec) = parse_domain_spec(input)
        .map_err(|e| ExpansionError::Parse(format!("'{}' is not a domain: {:?}", input, e)))?;
    match spec {
        DomainSpec::List(values) => Ok(values),
        DomainSpec::Range(args) => match args.as_slice() {
            [stop] => Ok(range_values(0, *stop, 1)),
            [start, stop] => Ok(range_values(*start, *stop, 1)),
            [_, _, 0] => Err(ExpansionError::Parse(format!(
                "range step must not be zero: '{}'",
                input
            ))),
            [start, stop, step] => Ok(range_values(*start, *stop, *step)),
            _ => Err(ExpansionError::Parse(format!(
                "range takes 1 to 3 arguments: '{}'",
                input
            ))),
        },
    }
}

/// splits off the trailing `for index in domain` clauses. Clauses inside parentheses
/// (e.g. generator style sums) belong to the content.
pub fn parse_for_array_creation(input: &str) -> Result<ArrayCreation, ExpansionError> {
    let braces = matching_pairs(input, '(', ')');
    let clause = Regex::new(r"\bfor\s+(\w+)\s+in\s")?;
    let starts: Vec<usize> = clause
        .find_iter(input)
        .map(|m| m.start())
        .filter(|&p| !braces.iter().any(|&(open, close)| open <= p && p <= close))
        .collect();
    let Some(&first) = starts.first() else {
        return Ok(ArrayCreation {
            content: input.trim().to_string(),
            loops: Vec::new(),
            index_tuples: Vec::new(),
        });
    };
    let mut loops = Vec::with_capacity(starts.len());
    for (k, &start) in starts.iter().enumerate() {
        let end = starts.get(k + 1).copied().unwrap_or(input.len());
        let text = input[start..end].trim();
        let captures = clause
            .captures(text)
            .ok_or_else(|| ExpansionError::Parse(format!("malformed loop '{}'", text)))?;
        let header = captures.get(0).map_or(0, |m| m.end());
        let index = captures
            .get(1)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        let domain = parse_domain(&text[header..])?;
        loops.push(ForLoop {
            text: text.to_string(),
            index,
            domain,
        });
    }
    let index_tuples = loops
        .iter()
        .map(|l| l.domain.iter().copied())
        .multi_cartesian_product()
        .collect();
    Ok(ArrayCreation {
        content: input[..first].trim().to_string(),
        loops,
        index_tuples,
    })
}

/// One expanded row of a constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandedRelation {
    /// `lhs-(rhs)` with every sum and index expanded
    pub residual: String,
    pub kind: RelationKind,
}

/// `lhs op rhs [for ...]` expanded into one residual per loop index tuple
pub fn expand_constraint(
    input: &str,
    bindings: &IndexBindings,
) -> Result<Vec<ExpandedRelation>, ExpansionError> {
    let creation = parse_for_array_creation(input)?;
    let relation = parse_relation(&creation.content);
    let kind = relation.kind.ok_or_else(|| {
        ExpansionError::Parse(format!(
            "a constraint must contain an '=', '<=' or '>=' operator: '{}'",
            input
        ))
    })?;
    let rows = expand_for_each(&relation.residual(), &creation.loop_domains(), bindings)?;
    Ok(rows
        .into_iter()
        .map(|residual| ExpandedRelation { residual, kind })
        .collect())
}
