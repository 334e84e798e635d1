//! examples of usage of RustedSums
/// expansion of sums, free indices, constraints and task documents
pub mod expansion_examples;
