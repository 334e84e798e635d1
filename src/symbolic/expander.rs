//! # Expander
//!
//! Turns an expression with `sum(body, index)` constructs and index names into a fully
//! enumerated scalar expression.
//!
//! Every pass asks the sum locator for the outermost sums of the current text. Each sum
//! becomes `(term_0+term_1+...)` where `term_k` is the body with the bound index replaced
//! by the k-th value of its domain. The result is spliced back into the text and the next
//! pass starts on the whole rewritten text, so sums that were nested inside a body are
//! expanded as soon as they surface. When no sum is left the free indices are substituted:
//! `Fixed` bindings with their value, `Domain` bindings with the first domain value.
//!
//! ```
//! use RustedSums::symbolic::expander::expand;
//! use RustedSums::symbolic::indexed_expression::IndexBindings;
//! let bindings = IndexBindings::new()
//!     .domain("i", 0..2).unwrap()
//!     .domain("j", 0..3).unwrap();
//! let expanded = expand("sum(sum(p[i,j], i), j)", &bindings).unwrap();
//! assert_eq!(expanded, "((p[0,0]+p[1,0])+(p[0,1]+p[1,1])+(p[0,2]+p[1,2]))");
//! ```
use crate::symbolic::expansion_error::ExpansionError;
use crate::symbolic::index_substitution::substitute;
use crate::symbolic::indexed_expression::{IndexBinding, IndexBindings};
use crate::symbolic::sum_locator::{SumOccurrence, find_sums};
use crate::symbolic::utils::check_balanced;
use itertools::Itertools;
use log::{debug, warn};

/// Settings of the expansion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionSettings {
    /// debug, info, warn, error or off; None means info
    pub loglevel: Option<String>,
    /// when set, the log is also written into this file
    pub log_file: Option<String>,
    /// upper bound on the number of expansion passes, None for no limit
    pub max_passes: Option<usize>,
}

/// Stateless expander configured with [`ExpansionSettings`]
#[derive(Debug, Clone, Default)]
pub struct Expander {
    pub settings: ExpansionSettings,
}

impl Expander {
    pub fn new(settings: ExpansionSettings) -> Self {
        Expander { settings }
    }

    /// fully expands `text`; all or nothing, no partial result on error
    pub fn expand(&self, text: &str, bindings: &IndexBindings) -> Result<String, ExpansionError> {
        check_balanced(text, '[', ']')?;
        check_balanced(text, '(', ')')?;
        let mut current = text.to_string();
        let mut pass = 0usize;
        loop {
            let sums = find_sums(&current)?;
            if sums.is_empty() {
                break;
            }
            pass += 1;
            if let Some(limit) = self.settings.max_passes {
                if pass > limit {
                    return Err(ExpansionError::PassLimitExceeded { limit });
                }
            }
            debug!("expansion pass {}: {} outermost sums", pass, sums.len());
            let mut expansions = Vec::with_capacity(sums.len());
            for sum in &sums {
                expansions.push(expand_sum(sum, bindings)?);
            }
            // right to left, so the byte ranges of the earlier sums stay valid
            for (sum, expansion) in sums.iter().zip(expansions).rev() {
                current.replace_range(sum.start..sum.end, &expansion);
            }
        }
        Ok(substitute_free_indices(&current, bindings))
    }

    /// expands `text` once for every combination of the loop index values.
    /// Loop indices are bound as `Fixed`, the first loop varies slowest.
    pub fn expand_for_each(
        &self,
        text: &str,
        loops: &[(String, Vec<i64>)],
        bindings: &IndexBindings,
    ) -> Result<Vec<String>, ExpansionError> {
        if loops.is_empty() {
            return Ok(vec![self.expand(text, bindings)?]);
        }
        let tuples = loops
            .iter()
            .map(|(_, values)| values.iter().copied())
            .multi_cartesian_product();
        let mut expanded = Vec::new();
        for tuple in tuples {
            let mut local = bindings.clone();
            for ((name, _), value) in loops.iter().zip(tuple) {
                local.insert(name, IndexBinding::Fixed(value))?;
            }
            expanded.push(self.expand(text, &local)?);
        }
        Ok(expanded)
    }
}

/// expands `text` with default settings
pub fn expand(text: &str, bindings: &IndexBindings) -> Result<String, ExpansionError> {
    Expander::default().expand(text, bindings)
}

/// one output string per combination of loop index values, see [`Expander::expand_for_each`]
pub fn expand_for_each(
    text: &str,
    loops: &[(String, Vec<i64>)],
    bindings: &IndexBindings,
) -> Result<Vec<String>, ExpansionError> {
    Expander::default().expand_for_each(text, loops, bindings)
}

// "(term_0+term_1+...)" for a single sum
fn expand_sum(sum: &SumOccurrence, bindings: &IndexBindings) -> Result<String, ExpansionError> {
    let values = bindings
        .get(&sum.bound_index)
        .and_then(IndexBinding::domain_values)
        .ok_or_else(|| ExpansionError::UndeclaredIndexDomain {
            index: sum.bound_index.clone(),
            sum: sum.full_text.clone(),
        })?;
    if values.is_empty() {
        return Ok("(0)".to_string());
    }
    let terms = values
        .iter()
        .map(|&value| substitute(&sum.body_text, &sum.bound_index, value))
        .join("+");
    Ok(format!("({})", terms))
}

/// substitutes every binding as a free index, longest names first
pub fn substitute_free_indices(text: &str, bindings: &IndexBindings) -> String {
    let mut result = text.to_string();
    for (name, binding) in bindings.longest_first() {
        let Some(value) = binding.free_value() else {
            continue;
        };
        let substituted = substitute(&result, name, value);
        if substituted != result {
            if let IndexBinding::Domain(values) = binding {
                if values.len() > 1 {
                    warn!(
                        "index '{}' has domain {} but is not bound by a sum, using its first value {}",
                        name, binding, value
                    );
                }
            }
            debug!("free index {} = {}", name, value);
            result = substituted;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ij_domains() -> IndexBindings {
        IndexBindings::new()
            .domain("i", vec![0, 1])
            .unwrap()
            .domain("j", vec![0, 1, 2])
            .unwrap()
    }

    #[test]
    fn test_single_sum_order() {
        let bindings = IndexBindings::new().domain("i", vec![0, 1, 2]).unwrap();
        assert_eq!(expand("sum(x[i], i)", &bindings).unwrap(), "(x[0]+x[1]+x[2])");
    }

    #[test]
    fn test_domain_order_is_kept() {
        let bindings = IndexBindings::new().domain("i", vec![2, 0, 1]).unwrap();
        assert_eq!(expand("sum(x[i], i)", &bindings).unwrap(), "(x[2]+x[0]+x[1])");
    }

    #[test]
    fn test_sibling_sums() {
        let expanded = expand("A + sum(p[i,0],i) + sum(p[0,j],j)", &ij_domains()).unwrap();
        assert_eq!(expanded, "A + (p[0,0]+p[1,0]) + (p[0,0]+p[0,1]+p[0,2])");
    }

    #[test]
    fn test_inner_sum_first_in_text() {
        let expanded = expand("sum(sum(p[i,j],j),i)", &ij_domains()).unwrap();
        assert_eq!(
            expanded,
            "((p[0,0]+p[0,1]+p[0,2])+(p[1,0]+p[1,1]+p[1,2]))"
        );
    }

    #[test]
    fn test_triple_nested_sum() {
        let bindings = IndexBindings::new()
            .fixed("i", 0)
            .unwrap()
            .fixed("j", 1)
            .unwrap()
            .domain("a", 0..2)
            .unwrap()
            .domain("b", 0..2)
            .unwrap()
            .domain("c", 0..2)
            .unwrap();
        let expanded = expand(
            "p[i,j] + 5*q[i] + 10*sum(sum(sum(s[c]*r[a,b],a),b),c)",
            &bindings,
        )
        .unwrap();
        assert_eq!(
            expanded,
            "p[0,1] + 5*q[0] + 10*(((s[0]*r[0,0]+s[0]*r[1,0])+(s[0]*r[0,1]+s[0]*r[1,1]))+((s[1]*r[0,0]+s[1]*r[1,0])+(s[1]*r[0,1]+s[1]*r[1,1])))"
        );
    }

    #[test]
    fn test_body_spacing_is_kept() {
        let bindings = IndexBindings::new().domain("k", 0..2).unwrap();
        assert_eq!(
            expand("sum( w[k] * x[k] , k )", &bindings).unwrap(),
            "( w[0] * x[0] + w[1] * x[1] )"
        );
    }

    #[test]
    fn test_empty_domain() {
        let bindings = IndexBindings::new().domain("k", Vec::new()).unwrap();
        assert_eq!(expand("1 + sum(x[k], k)", &bindings).unwrap(), "1 + (0)");
    }

    #[test]
    fn test_undeclared_domain() {
        let err = expand("sum(x[k], k)", &ij_domains()).unwrap_err();
        assert_eq!(
            err,
            ExpansionError::UndeclaredIndexDomain {
                index: "k".to_string(),
                sum: "sum(x[k], k)".to_string()
            }
        );
        let fixed = IndexBindings::new().fixed("k", 1).unwrap();
        assert!(matches!(
            expand("sum(x[k], k)", &fixed),
            Err(ExpansionError::UndeclaredIndexDomain { .. })
        ));
    }

    #[test]
    fn test_unbalanced_sum() {
        let err = expand("sum(p[i,j], i", &ij_domains()).unwrap_err();
        assert_eq!(
            err,
            ExpansionError::UnbalancedDelimiters {
                fragment: "(p[i,j], i".to_string(),
                position: 3
            }
        );
    }

    #[test]
    fn test_unbalanced_round_brackets_outside_sum() {
        let bindings = IndexBindings::new()
            .fixed("i", 1)
            .unwrap()
            .domain("j", 0..2)
            .unwrap();
        assert_eq!(
            expand("exp(x[i] + sum(y[j],j)", &bindings),
            Err(ExpansionError::UnbalancedDelimiters {
                fragment: "(x[i] + sum(y[j],j)".to_string(),
                position: 3
            })
        );
        assert_eq!(
            expand("sum(y[j],j))", &bindings),
            Err(ExpansionError::UnbalancedDelimiters {
                fragment: ")".to_string(),
                position: 11
            })
        );
    }

    #[test]
    fn test_compound_index_slots() {
        let bindings = IndexBindings::new().fixed("i", 1).unwrap().fixed("j", 4).unwrap();
        assert_eq!(
            expand("x[i*2] + x[2*i] + p[i+j] + z[i-1-1]", &bindings).unwrap(),
            "x[1*2] + x[2*1] + p[1+4] + z[1-1-1]"
        );
        let domain = IndexBindings::new().domain("k", 0..2).unwrap();
        assert_eq!(expand("sum(y[2*k+1], k)", &domain).unwrap(), "(y[2*0+1]+y[2*1+1])");
    }

    #[test]
    fn test_unbalanced_index_list() {
        let err = expand("x[i + sum(y[j],j)", &ij_domains()).unwrap_err();
        assert_eq!(
            err,
            ExpansionError::UnbalancedDelimiters {
                fragment: "[i + sum(y[j],j)".to_string(),
                position: 1
            }
        );
    }

    #[test]
    fn test_error_in_nested_sum() {
        // the inner sum only shows up after the outer one is expanded
        let err = expand("sum(sum(p[i,j]), j)", &ij_domains()).unwrap_err();
        assert_eq!(
            err,
            ExpansionError::MissingSumIndex {
                sum: "sum(p[i,0])".to_string()
            }
        );
    }

    #[test]
    fn test_free_domain_uses_first_value() {
        let bindings = IndexBindings::new().domain("t", vec![5, 6, 7]).unwrap();
        assert_eq!(expand("x[t]-x[t-1]", &bindings).unwrap(), "x[5]-x[4]");
    }

    #[test]
    fn test_prefix_collision() {
        let bindings = IndexBindings::new()
            .fixed("i", 1)
            .unwrap()
            .fixed("i2", 2)
            .unwrap();
        assert_eq!(expand("x[i]+y[i2]+z[i2-1,i+1]", &bindings).unwrap(), "x[1]+y[2]+z[1,2]");
    }

    #[test]
    fn test_pass_limit() {
        let expander = Expander::new(ExpansionSettings {
            max_passes: Some(1),
            ..ExpansionSettings::default()
        });
        let bindings = ij_domains();
        assert_eq!(expander.expand("sum(x[i], i)", &bindings).unwrap(), "(x[0]+x[1])");
        assert_eq!(
            expander.expand("sum(sum(p[i,j],i),j)", &bindings),
            Err(ExpansionError::PassLimitExceeded { limit: 1 })
        );
    }

    #[test]
    fn test_expand_for_each() {
        let bindings = IndexBindings::new().domain("k", 0..2).unwrap();
        let loops = vec![("j".to_string(), vec![0, 1])];
        let expanded = expand_for_each("T[j+1]-T[j] = sum(Q[j,k],k)", &loops, &bindings).unwrap();
        assert_eq!(
            expanded,
            vec!["T[1]-T[0] = (Q[0,0]+Q[0,1])", "T[2]-T[1] = (Q[1,0]+Q[1,1])"]
        );
    }

    #[test]
    fn test_expand_for_each_two_loops() {
        let loops = vec![
            ("i".to_string(), vec![0, 1]),
            ("j".to_string(), vec![0, 1, 2]),
        ];
        let expanded = expand_for_each("x[i,j]", &loops, &IndexBindings::new()).unwrap();
        assert_eq!(
            expanded,
            vec!["x[0,0]", "x[0,1]", "x[0,2]", "x[1,0]", "x[1,1]", "x[1,2]"]
        );
    }

    #[test]
    fn test_expand_for_each_rejects_rebound_loop_index() {
        let loops = vec![("i".to_string(), vec![0])];
        assert_eq!(
            expand_for_each("x[i]", &loops, &ij_domains()),
            Err(ExpansionError::DuplicateBinding {
                index: "i".to_string()
            })
        );
    }

    #[test]
    fn test_expand_for_each_without_loops() {
        let bindings = IndexBindings::new().fixed("i", 3).unwrap();
        assert_eq!(expand_for_each("x[i]", &[], &bindings).unwrap(), vec!["x[3]"]);
    }
}
