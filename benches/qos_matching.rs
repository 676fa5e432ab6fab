// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! QoS matching and intern-pool benchmarks (spec.md §4.3).
//!
//! Measures the cost of `match_qos` (the offered/requested compatibility
//! walk) and of `QosInternPool::intern` (hash-cons lookup/insert), the
//! two hot paths exercised once per writer<->reader discovery pairing.

use criterion::{criterion_group, criterion_main, Criterion};
use hdds::qos::{match_qos, Durability, QosInternPool, Reliability, UniQos};
use std::hint::black_box as bb;

fn compatible_pair() -> (UniQos, UniQos) {
    let mut offered = UniQos::default();
    offered.reliability = Reliability::Reliable;
    offered.durability = Durability::TransientLocal;

    let mut requested = UniQos::default();
    requested.reliability = Reliability::Reliable;
    requested.durability = Durability::Volatile;

    (offered, requested)
}

fn incompatible_pair() -> (UniQos, UniQos) {
    let mut offered = UniQos::default();
    offered.durability = Durability::Volatile;

    let mut requested = UniQos::default();
    requested.durability = Durability::TransientLocal;

    (offered, requested)
}

fn bench_match_qos(c: &mut Criterion) {
    let mut group = c.benchmark_group("match_qos");

    let (offered_ok, requested_ok) = compatible_pair();
    group.bench_function("compatible", |b| {
        b.iter(|| bb(match_qos(bb(&offered_ok), bb(&requested_ok))));
    });

    let (offered_bad, requested_bad) = incompatible_pair();
    group.bench_function("incompatible_durability", |b| {
        b.iter(|| bb(match_qos(bb(&offered_bad), bb(&requested_bad))));
    });

    group.finish();
}

fn bench_intern_pool(c: &mut Criterion) {
    let mut group = c.benchmark_group("qos_intern");

    group.bench_function("insert_unique", |b| {
        b.iter(|| {
            let pool = QosInternPool::new();
            for n in 0..64u32 {
                let mut qos = UniQos::default();
                qos.history = hdds::qos::History::KeepLast(n + 1);
                bb(pool.intern(qos));
            }
        });
    });

    group.bench_function("repeat_hit", |b| {
        let pool = QosInternPool::new();
        let qos = UniQos::default();
        let (_, shared) = pool.intern(qos.clone());
        bb(&shared);
        b.iter(|| bb(pool.intern(qos.clone())));
    });

    group.finish();
}

criterion_group!(qos_benches, bench_match_qos, bench_intern_pool);
criterion_main!(qos_benches);
