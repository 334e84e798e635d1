#![allow(non_snake_case)]
use RustedSums::symbolic::expander::expand;
use RustedSums::symbolic::indexed_expression::IndexBindings;
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn scheduling_bindings(N: i64, M: i64) -> IndexBindings {
    IndexBindings::new()
        .domain("i", 0..N)
        .unwrap()
        .domain("j", 0..M)
        .unwrap()
}

fn bench_objective(c: &mut Criterion) {
    let bindings = scheduling_bindings(24, 3);
    let objective = "sum(Qslack_min[i],i) + sum(Qslack_max[i],i) + c_move*sum(move[i],i) + sum(sum(c_view*p[i,j],i),j)";
    c.bench_function("objective 24x3", |b| {
        b.iter(|| expand(black_box(objective), &bindings))
    });
}

fn bench_nested_domains(c: &mut Criterion) {
    let mut group = c.benchmark_group("nested sums");
    for N in [10, 50, 200] {
        let bindings = scheduling_bindings(N, 10);
        group.bench_function(format!("{} x 10", N), |b| {
            b.iter(|| expand(black_box("sum(sum(p[i,j]*x[i+1,j-1],i),j)"), &bindings))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_objective, bench_nested_domains);
criterion_main!(benches);
