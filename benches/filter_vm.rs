// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! SQL content filter bytecode VM benchmarks (spec.md §4.5).
//!
//! Measures `ContentFilter::matches` for a simple comparison, a
//! `BETWEEN` range check, and a boolean `AND`/`OR` tree, the shapes a
//! content-filtered topic or query condition evaluates once per
//! candidate sample during `read`/`take`.

use criterion::{criterion_group, criterion_main, Criterion};
use hdds::filter::{ContentFilter, FieldValue};
use std::collections::HashMap;
use std::hint::black_box as bb;

fn fields_with_x(x: i64) -> HashMap<String, FieldValue> {
    let mut fields = HashMap::new();
    fields.insert("x".to_string(), FieldValue::Integer(x));
    fields.insert("y".to_string(), FieldValue::Integer(x * 2));
    fields
}

fn bench_simple_comparison(c: &mut Criterion) {
    let filter = ContentFilter::new("x > 10").unwrap();
    let fields = fields_with_x(15);
    c.bench_function("filter_vm/simple_comparison", |b| {
        b.iter(|| bb(filter.matches(bb(&fields)).unwrap()));
    });
}

fn bench_between(c: &mut Criterion) {
    let filter =
        ContentFilter::with_parameters("x BETWEEN %0 AND %1", vec!["10".into(), "20".into()])
            .unwrap();
    let fields = fields_with_x(15);
    c.bench_function("filter_vm/between", |b| {
        b.iter(|| bb(filter.matches(bb(&fields)).unwrap()));
    });
}

fn bench_and_or_tree(c: &mut Criterion) {
    let filter = ContentFilter::new("(x > 0 AND y < 100) OR (x = -1)").unwrap();
    let fields = fields_with_x(15);
    c.bench_function("filter_vm/and_or_tree", |b| {
        b.iter(|| bb(filter.matches(bb(&fields)).unwrap()));
    });
}

criterion_group!(
    filter_benches,
    bench_simple_comparison,
    bench_between,
    bench_and_or_tree
);
criterion_main!(filter_benches);
