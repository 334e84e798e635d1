#[cfg(test)]
mod tests {
    use crate::symbolic::expander::{Expander, ExpansionSettings, expand};
    use crate::symbolic::expansion_error::ExpansionError;
    use crate::symbolic::index_substitution::substitute;
    use crate::symbolic::indexed_expression::{Expression, IndexBindings, residual_indices};
    use crate::symbolic::sum_locator::find_sums;

    fn ij_domains() -> IndexBindings {
        IndexBindings::new()
            .domain("i", vec![0, 1])
            .unwrap()
            .domain("j", vec![0, 1, 2])
            .unwrap()
    }

    #[test]
    fn test_expanding_twice_changes_nothing() {
        let bindings = ij_domains().fixed("k", 4).unwrap();
        for text in [
            "sum(x[i], i)",
            "A + sum(p[i,0],i) + sum(p[0,j],j)",
            "sum(sum(p[i,j], i), j) - y[k+1]",
            "exp(-2*z[k])",
        ] {
            let once = expand(text, &bindings).unwrap();
            let twice = expand(&once, &bindings).unwrap();
            assert_eq!(once, twice, "expanding {} again changed it", text);
        }
    }

    #[test]
    fn test_plain_text_passes_through() {
        let text = "a+b*c - log(x[0])**2 + cumsum(y[1], 2)";
        assert_eq!(expand(text, &ij_domains()).unwrap(), text);
    }

    #[test]
    fn test_no_sum_left_after_expansion() {
        let bindings = ij_domains();
        let expression = Expression::new(
            "sum(sum(p[i,j], i), j) + sum(q[j]*sum(r[i], i), j) + sum(s[i], i)",
            bindings,
        );
        let expanded = expression.expanded().unwrap();
        assert!(expanded.find_sums().unwrap().is_empty());
        assert!(!expanded.text().contains("sum("));
        assert!(residual_indices(expanded.text(), expanded.bindings()).unwrap().is_empty());
    }

    #[test]
    fn test_terms_in_domain_order() {
        let bindings = IndexBindings::new().domain("i", vec![0, 1, 2]).unwrap();
        let expression = Expression::new("sum(x[i], i)", bindings);
        assert_eq!(expression.expand().unwrap(), "(x[0]+x[1]+x[2])");
    }

    #[test]
    fn test_nested_sum_grouping() {
        let expression = Expression::new("sum(sum(p[i,j], i), j)", ij_domains());
        assert_eq!(
            expression.expand().unwrap(),
            "((p[0,0]+p[1,0])+(p[0,1]+p[1,1])+(p[0,2]+p[1,2]))"
        );
    }

    #[test]
    fn test_offset_substitution_without_sum() {
        let bindings = IndexBindings::new().fixed("i", 3).unwrap().fixed("j", 1).unwrap();
        let text = "move[i]-(1-exp(-200*(p[i,j]-p[i-1,j])**2))";
        assert_eq!(
            expand(text, &bindings).unwrap(),
            "move[3]-(1-exp(-200*(p[3,1]-p[2,1])**2))"
        );
        // the same result by calling the substitutor name by name
        let by_hand = substitute(&substitute(text, "i", 3), "j", 1);
        assert_eq!(by_hand, "move[3]-(1-exp(-200*(p[3,1]-p[2,1])**2))");
    }

    #[test]
    fn test_sibling_sums_expand_independently() {
        let text = "A + sum(p[i,0],i) + sum(p[0,j],j)";
        assert_eq!(find_sums(text).unwrap().len(), 2);
        assert_eq!(
            expand(text, &ij_domains()).unwrap(),
            "A + (p[0,0]+p[1,0]) + (p[0,0]+p[0,1]+p[0,2])"
        );
    }

    #[test]
    fn test_unbalanced_input_is_rejected() {
        let expression = Expression::new("sum(p[i,j], i", ij_domains());
        assert!(matches!(
            expression.expand(),
            Err(ExpansionError::UnbalancedDelimiters { .. })
        ));
        assert!(expression.expanded().is_err());
    }

    #[test]
    fn test_bindings_from_parallel_lists() {
        let bindings =
            IndexBindings::from_lists(&["i", "j", "a"], vec![vec![0], vec![1], vec![0, 1, 2]]).unwrap();
        // single value domains act as the current value of i and j
        let expression = Expression::new("p[i,j] + 5*q[i] + 10*sum(r[j,a],a)", bindings);
        assert_eq!(
            expression.expand().unwrap(),
            "p[0,1] + 5*q[0] + 10*(r[1,0]+r[1,1]+r[1,2])"
        );
    }

    #[test]
    fn test_model_constraint() {
        // heat balance of one storage over a day, t runs over the hours
        let bindings = IndexBindings::new()
            .domain("h", 0..3)
            .unwrap()
            .fixed("t", 7)
            .unwrap();
        let text = "T[t+1]-T[t] = 0.5*sum(Q[h,t], h) - loss[t]";
        assert_eq!(
            expand(text, &bindings).unwrap(),
            "T[8]-T[7] = 0.5*(Q[0,7]+Q[1,7]+Q[2,7]) - loss[7]"
        );
    }

    #[test]
    fn test_large_domain_with_limit() {
        let bindings = IndexBindings::new().domain("n", 0..24).unwrap();
        let expander = Expander::new(ExpansionSettings {
            max_passes: Some(2),
            ..ExpansionSettings::default()
        });
        let expanded = expander.expand("sum(Qslack_min[n], n)", &bindings).unwrap();
        assert!(expanded.starts_with("(Qslack_min[0]+Qslack_min[1]+"));
        assert!(expanded.ends_with("+Qslack_min[23])"));
        assert_eq!(expanded.matches('+').count(), 23);
    }
}
