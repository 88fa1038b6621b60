//! Benchmarks for expression handles.
//!
//! Includes:
//! - Handle cloning and copy-on-write
//! - Canonical construction of sums and products
//! - Expansion and differentiation

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use tertius_expr::{pow, sin, Ex, ExpandOptions};

fn polynomial(x: &Ex, degree: i64) -> Ex {
    Ex::add((0..=degree).map(|k| Ex::from(k + 1) * pow(x, k)))
}

/// Benchmark cloning a handle versus unsharing it for a write.
fn bench_sharing(c: &mut Criterion) {
    let mut group = c.benchmark_group("sharing");
    let x = Ex::symbol("x");

    for len in [4, 64, 512] {
        let list = Ex::lst((0..len).map(|k| &x + k));

        group.bench_with_input(BenchmarkId::new("clone", len), &list, |b, list| {
            b.iter(|| black_box(list.clone()));
        });

        group.bench_with_input(BenchmarkId::new("let_op", len), &list, |b, list| {
            b.iter(|| {
                let mut copy = list.clone();
                if let Ok(slot) = copy.let_op(0) {
                    *slot = Ex::from(0);
                }
                black_box(copy)
            });
        });
    }

    group.finish();
}

/// Benchmark building canonical sums and products.
fn bench_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("construction");
    let x = Ex::symbol("x");
    let y = Ex::symbol("y");

    for terms in [8, 32, 128] {
        group.bench_with_input(BenchmarkId::new("sum", terms), &terms, |b, &terms| {
            b.iter(|| black_box(polynomial(&x, terms)));
        });

        group.bench_with_input(BenchmarkId::new("product", terms), &terms, |b, &terms| {
            b.iter(|| {
                let mut acc = Ex::from(1);
                for k in 0..terms {
                    acc *= pow(x.clone() + Ex::from(k), 2) * &y;
                }
                black_box(acc)
            });
        });
    }

    group.finish();
}

/// Benchmark expansion and differentiation.
fn bench_algebra(c: &mut Criterion) {
    let mut group = c.benchmark_group("algebra");
    let x = Ex::symbol("x");
    let y = Ex::symbol("y");

    for n in [2, 4, 8] {
        let e = pow(&x + &y + 1, n);
        group.bench_with_input(BenchmarkId::new("expand", n), &e, |b, e| {
            b.iter(|| black_box(e.expand(ExpandOptions::empty())));
        });
    }

    let e = sin(pow(&x, 2)) * polynomial(&x, 6);
    group.bench_function("diff_3", |b| {
        b.iter(|| black_box(e.diff(&x, 3)));
    });

    group.finish();
}

criterion_group!(benches, bench_sharing, bench_construction, bench_algebra);
criterion_main!(benches);
