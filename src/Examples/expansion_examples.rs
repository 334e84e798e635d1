#![allow(non_snake_case)]

use crate::Utils::logger::init_logger_from_settings;
use crate::Utils::task_parser::parse_expansion_task;
use crate::symbolic::expander::{Expander, expand};
use crate::symbolic::indexed_expression::{Expression, IndexBindings};
use crate::symbolic::problem_parse::{expand_constraint, parse_for_array_creation};
#[allow(dead_code)]
pub fn expansion_examples(example: usize) {
    match example {
        0 => {
            // FINDING SUMS
            // index names with parallel value lists, every name gets a domain
            let bindings = IndexBindings::from_lists(&["i", "j"], vec![vec![0, 1], vec![0, 1, 2]]).unwrap();
            let expression = Expression::new("A + sum(p[i,0],i) + sum(p[0,j],j)", bindings);
            // outermost sums in source order with their body and bound index
            for sum in expression.find_sums().unwrap() {
                println!(
                    "sum {} body {} index {} at {}..{}",
                    sum.full_text, sum.body_text, sum.bound_index, sum.start, sum.end
                );
            }
            println!("expanded: {}", expression.expand().unwrap());
        }
        1 => {
            // NESTED SUMS
            let bindings = IndexBindings::new()
                .domain("i", vec![0, 1])
                .unwrap()
                .domain("j", vec![0, 1, 2])
                .unwrap();
            let expression = Expression::new("sum(sum(p[i,j],i),j)", bindings);
            // the inner sum is a part of the body of the outer one
            let bodies = expression.sum_bodies().unwrap();
            println!("outer body {}", bodies[0]);
            println!("inner body {}", bodies[0].sum_bodies().unwrap()[0]);
            println!("expanded: {}", expression.expand().unwrap());

            let bindings = IndexBindings::new()
                .fixed("i", 0)
                .unwrap()
                .fixed("j", 1)
                .unwrap()
                .domain("a", 0..4)
                .unwrap()
                .domain("b", 0..3)
                .unwrap()
                .domain("c", 0..2)
                .unwrap();
            let input = "p[i,j] + 5*q[i] + 10*sum(sum(sum(s[c]*r[a,b],a),b),c)";
            println!("{} \n = {}", input, expand(input, &bindings).unwrap());
        }
        2 => {
            // FREE INDICES AND OFFSETS
            let bindings = IndexBindings::new().fixed("i", 3).unwrap().fixed("j", 1).unwrap();
            let input = "move[i]-(1-exp(-200*(p[i,j]-p[i-1,j])**2))";
            println!("{} \n = {}", input, expand(input, &bindings).unwrap());
        }
        3 => {
            // OBJECTIVE OF A SCHEDULING PROBLEM
            let (N, M) = (24, 3);
            let bindings = IndexBindings::new()
                .domain("i", 0..N)
                .unwrap()
                .domain("j", 0..M)
                .unwrap();
            let objective = "sum(Qslack_min[i],i) + sum(Qslack_max[i],i) + c_move*sum(move[i],i) + sum(sum(c_view*p[i,j],i),j)";
            let expanded = expand(objective, &bindings).unwrap();
            println!("objective: {}", expanded);
            println!("length of the expanded objective {}", expanded.len());
        }
        4 => {
            // CONSTRAINTS WITH FOR LOOPS
            let bindings = IndexBindings::new().domain("j", 0..3).unwrap();
            let constraint = "Q[i]-sum((1-p[i,j])*Qopen[i,j]+p[i,j]*Qclosed[i,j],j) = 0 for i in range(4)";
            let creation = parse_for_array_creation(constraint).unwrap();
            println!(
                "content {} loops {:?} tuples {:?}",
                creation.content,
                creation.index_names(),
                creation.index_tuples
            );
            for row in expand_constraint(constraint, &bindings).unwrap() {
                println!("{} {} 0", row.residual, row.kind);
            }
        }
        5 => {
            // TASK DOCUMENT WITH SETTINGS
            let document = r#"
            // hourly heat balance
            domains
             h: 0..3
            fixed
             t: 7
            settings
             loglevel: debug
             max_passes: 10
            "#;
            let (bindings, settings) = parse_expansion_task(document).unwrap();
            let _ = init_logger_from_settings(&settings);
            let expander = Expander::new(settings);
            let input = "T[t+1]-T[t] - 0.5*sum(Q[h,t], h) + loss[t]";
            println!("{} \n = {}", input, expander.expand(input, &bindings).unwrap());
        }
        _ => {
            println!("example {} is not defined", example);
        }
    }
}
