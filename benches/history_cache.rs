// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! History cache admit-path benchmarks (spec.md §4.6).
//!
//! Measures `HistoryCache::register` + `add_inst`, the per-sample write
//! path every `DataWriter::write`/`register_instance` call drives, under
//! `KEEP_LAST` and `KEEP_ALL` history with a single hot instance versus
//! many distinct instances.

use criterion::{criterion_group, criterion_main, Criterion};
use hdds::cache::{Change, ChangeKind, HistoryCache, SampleState};
use hdds::qos::{History, ResourceLimits};
use std::hint::black_box as bb;
use std::time::Duration;

fn sample(seq: u64) -> Change {
    Change {
        kind: ChangeKind::Alive,
        writer_handle: 1,
        source_time: Duration::from_nanos(seq),
        sequence_number: seq,
        sample_state: SampleState::NotRead,
        absolute_generation: 0,
        payload: vec![0xAB; 64],
    }
}

fn bench_single_instance_keep_last(c: &mut Criterion) {
    let cache = HistoryCache::new(History::KeepLast(8), ResourceLimits::default());
    let handle = cache.register(b"instance-0");
    let mut seq = 0u64;

    c.bench_function("history_cache/single_instance_keep_last", |b| {
        b.iter(|| {
            seq += 1;
            bb(cache.add_inst(handle, sample(seq)).unwrap());
        });
    });
}

fn bench_many_instances_keep_all(c: &mut Criterion) {
    let cache = HistoryCache::new(
        History::KeepAll,
        ResourceLimits {
            max_samples: usize::MAX,
            max_instances: usize::MAX,
            max_samples_per_instance: usize::MAX,
            max_quota_bytes: usize::MAX,
        },
    );
    let mut seq = 0u64;

    c.bench_function("history_cache/many_instances_keep_all", |b| {
        b.iter(|| {
            seq += 1;
            let key = (seq % 1024).to_le_bytes();
            let handle = cache.register(&key);
            bb(cache.add_inst(handle, sample(seq)).unwrap());
        });
    });
}

criterion_group!(
    history_cache_benches,
    bench_single_instance_keep_last,
    bench_many_instances_keep_all
);
criterion_main!(history_cache_benches);
