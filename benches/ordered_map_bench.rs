//! Benchmark for OrderedMap vs standard BTreeMap.
//!
//! Compares persistent insertion, lookup and ordered comparison against
//! Rust's standard BTreeMap.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use lambda_rt::persistent::OrderedMap;
use std::collections::BTreeMap;
use std::hint::black_box;

// =============================================================================
// insert Benchmark
// =============================================================================

fn benchmark_insert(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("insert");

    for size in [100, 1000, 10000] {
        group.bench_with_input(
            BenchmarkId::new("OrderedMap", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut map = OrderedMap::new();
                    for index in 0..size {
                        map = map.insert(black_box(index), black_box(index * 2));
                    }
                    black_box(map)
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("BTreeMap", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut map = BTreeMap::new();
                    for index in 0..size {
                        map.insert(black_box(index), black_box(index * 2));
                    }
                    black_box(map)
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// find Benchmark
// =============================================================================

fn benchmark_find(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("find");

    for size in [100, 1000, 10000] {
        let ordered_map: OrderedMap<i32, i32> = (0..size).map(|index| (index, index)).collect();
        let btree_map: BTreeMap<i32, i32> = (0..size).map(|index| (index, index)).collect();

        group.bench_with_input(
            BenchmarkId::new("OrderedMap", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    for index in 0..size {
                        black_box(ordered_map.find(black_box(&index)).ok());
                    }
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("BTreeMap", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    for index in 0..size {
                        black_box(btree_map.get(black_box(&index)));
                    }
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// no-op insert Benchmark
// =============================================================================

fn benchmark_reinsert_identical(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("reinsert_identical");

    for size in [100, 1000, 10000] {
        let map: OrderedMap<i32, i32> = (0..size).map(|index| (index, index)).collect();

        group.bench_with_input(BenchmarkId::new("OrderedMap", size), &size, |bencher, &size| {
            bencher.iter(|| {
                for index in 0..size {
                    black_box(map.insert(black_box(index), index));
                }
            });
        });
    }

    group.finish();
}

// =============================================================================
// compare Benchmark
// =============================================================================

fn benchmark_compare(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("compare");

    for size in [100, 1000, 10000] {
        let left: OrderedMap<i32, i32> = (0..size).map(|index| (index, index)).collect();
        let right: OrderedMap<i32, i32> = (0..size).rev().map(|index| (index, index)).collect();

        group.bench_with_input(BenchmarkId::new("OrderedMap", size), &size, |bencher, _| {
            bencher.iter(|| black_box(black_box(&left).cmp(black_box(&right))));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_insert,
    benchmark_find,
    benchmark_reinsert_identical,
    benchmark_compare
);
criterion_main!(benches);
