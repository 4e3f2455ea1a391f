//! Insert/search/remove benchmarks for [`art_index::ArtTree`], with a
//! `BTreeMap` baseline for scale. Ported from `memkv/benches/art_ops.rs`,
//! trimmed to this crate's own tree: the original also benchmarked several
//! experimental tree variants and an FST layer against each other, none of
//! which survive here (out of scope per spec.md §1).

use art_index::ArtTree;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::collections::BTreeMap;

fn generate_sequential_keys(n: usize) -> Vec<Vec<u8>> {
    (0..n).map(|i| format!("key:{:08}", i).into_bytes()).collect()
}

fn generate_url_like_keys(n: usize) -> Vec<Vec<u8>> {
    let domains = ["example.com", "test.org", "demo.net", "sample.io"];
    let paths = ["users", "posts", "comments", "api/v1", "api/v2"];

    // `id` is zero-padded to a fixed width so no generated key can ever be a
    // proper byte-prefix of another (this tree, unlike the teacher's
    // `FastArt`, requires distinct non-prefix keys — see
    // `src/tree.rs`'s insert assertions).
    (0..n)
        .map(|i| {
            let domain = domains[i % domains.len()];
            let path = paths[(i / domains.len()) % paths.len()];
            let id = i / (domains.len() * paths.len());
            format!("{}/{}/{:06}", domain, path, id).into_bytes()
        })
        .collect()
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");

    for size in [1_000, 10_000, 100_000] {
        let keys = generate_sequential_keys(size);

        group.bench_with_input(BenchmarkId::new("ArtTree", size), &keys, |b, keys| {
            b.iter(|| {
                let mut tree = ArtTree::new();
                for key in keys.iter() {
                    tree.insert(key, key);
                }
                black_box(tree)
            });
        });

        group.bench_with_input(BenchmarkId::new("BTreeMap", size), &keys, |b, keys| {
            b.iter(|| {
                let mut map: BTreeMap<Vec<u8>, Vec<u8>> = BTreeMap::new();
                for key in keys.iter() {
                    map.insert(key.clone(), key.clone());
                }
                black_box(map)
            });
        });
    }

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");

    for size in [1_000, 10_000, 100_000] {
        let keys = generate_sequential_keys(size);

        let mut tree = ArtTree::new();
        for key in keys.iter() {
            tree.insert(key, key);
        }

        let mut btree: BTreeMap<Vec<u8>, Vec<u8>> = BTreeMap::new();
        for key in keys.iter() {
            btree.insert(key.clone(), key.clone());
        }

        group.bench_with_input(BenchmarkId::new("ArtTree", size), &keys, |b, keys| {
            b.iter(|| {
                let mut hits = 0usize;
                for key in keys.iter() {
                    if tree.search(key).is_some() {
                        hits += 1;
                    }
                }
                black_box(hits)
            });
        });

        group.bench_with_input(BenchmarkId::new("BTreeMap", size), &keys, |b, keys| {
            b.iter(|| {
                let mut hits = 0usize;
                for key in keys.iter() {
                    if btree.get(key).is_some() {
                        hits += 1;
                    }
                }
                black_box(hits)
            });
        });
    }

    group.finish();
}

fn bench_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("remove");

    for size in [1_000, 10_000, 100_000] {
        let keys = generate_sequential_keys(size);

        group.bench_with_input(BenchmarkId::new("ArtTree", size), &keys, |b, keys| {
            b.iter_batched(
                || {
                    let mut tree = ArtTree::new();
                    for key in keys.iter() {
                        tree.insert(key, key);
                    }
                    tree
                },
                |mut tree| {
                    for key in keys.iter() {
                        tree.remove(key);
                    }
                    black_box(tree)
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

fn bench_url_patterns(c: &mut Criterion) {
    let mut group = c.benchmark_group("url_patterns");

    let keys = generate_url_like_keys(10_000);

    group.bench_function("ArtTree/insert", |b| {
        b.iter(|| {
            let mut tree = ArtTree::new();
            for key in keys.iter() {
                tree.insert(key, key);
            }
            black_box(tree)
        });
    });

    let mut tree = ArtTree::new();
    for key in keys.iter() {
        tree.insert(key, key);
    }

    group.bench_function("ArtTree/search", |b| {
        b.iter(|| {
            let mut hits = 0usize;
            for key in keys.iter() {
                if tree.search(key).is_some() {
                    hits += 1;
                }
            }
            black_box(hits)
        });
    });

    group.finish();
}

criterion_group!(benches, bench_insert, bench_search, bench_remove, bench_url_patterns);
criterion_main!(benches);
