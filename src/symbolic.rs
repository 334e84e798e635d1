#![allow(non_snake_case)]
///______________________________________________________________________________________________________________________________________________
/// the collection of utility functions mainly for bracket parsing and proceeding
/// _____________________________________________________________________________________________________________________________________________
pub mod utils;
/// error type shared by all expansion modules
pub mod expansion_error;
///____________________________________________________________________________________________________________________________
/// # Indexed expressions
/// index bindings (`Fixed` value or `Domain` of values) and the expression type built on them
///# Example
/// ```
/// use RustedSums::symbolic::indexed_expression::{Expression, IndexBindings};
/// let bindings = IndexBindings::new().domain("i", vec![0, 1, 2]).unwrap();
/// let expression = Expression::new("sum(Qslack_min[i], i)", bindings);
/// assert_eq!(expression.expand().unwrap(), "(Qslack_min[0]+Qslack_min[1]+Qslack_min[2])");
/// ```
pub mod indexed_expression;
/// finds the outermost `sum(body, index)` constructs of a string
pub mod sum_locator;
/// replaces index names (and `name+k`, `name-k` forms) inside `[...]` index lists by integers
pub mod index_substitution;
///____________________________________________________________________________________________________________________________
/// # Expander
/// a module
/// 1) expands every `sum(...)` construct pass by pass, nested sums included
/// 2) substitutes the remaining free indices
/// 3) expands a template once for every combination of loop index values
///# Example
/// ```
/// use RustedSums::symbolic::expander::expand;
/// use RustedSums::symbolic::indexed_expression::IndexBindings;
/// let bindings = IndexBindings::new()
///     .domain("i", vec![0, 1]).unwrap()
///     .domain("j", vec![0, 1, 2]).unwrap();
/// let expanded = expand("A + sum(p[i,0],i) + sum(p[0,j],j)", &bindings).unwrap();
/// assert_eq!(expanded, "A + (p[0,0]+p[1,0]) + (p[0,0]+p[0,1]+p[0,2])");
/// ```
/// ________________________________________________________________________________________________________________________________
pub mod expander;
/// helpers for problem definition strings: indexed names, relations, `for ... in range(...)` array creation
pub mod problem_parse;
mod indexed_expression_tests;
