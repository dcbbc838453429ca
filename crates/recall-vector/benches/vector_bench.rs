use criterion::{criterion_group, criterion_main, Criterion};

use recall_core::config::VectorStoreConfig;
use recall_core::models::Metadata;
use recall_vector::{SearchOptions, VectorStore};

/// Deterministic pseudo-random rows so runs are comparable.
fn rows(n: usize, dim: usize) -> Vec<Vec<f32>> {
    let mut state: u32 = 0x9e37_79b9;
    (0..n)
        .map(|_| {
            (0..dim)
                .map(|_| {
                    state ^= state << 13;
                    state ^= state >> 17;
                    state ^= state << 5;
                    (state as f32 / u32::MAX as f32) - 0.5
                })
                .collect()
        })
        .collect()
}

fn bench_exact_search_10k_384(c: &mut Criterion) {
    let dim = 384;
    let data = rows(10_000, dim);
    let ids: Vec<String> = (0..data.len()).map(|i| format!("doc-{i}")).collect();
    let store = VectorStore::new(VectorStoreConfig {
        dimension: dim,
        ..Default::default()
    });
    store
        .build(&data, &ids, &vec![Metadata::new(); data.len()])
        .unwrap();
    let query = data[42].clone();

    c.bench_function("exact_search_10k_x_384_top10", |b| {
        b.iter(|| store.search(&query, 10, &SearchOptions::default()).unwrap());
    });
}

fn bench_build_1k_384(c: &mut Criterion) {
    let dim = 384;
    let data = rows(1_000, dim);
    let ids: Vec<String> = (0..data.len()).map(|i| format!("doc-{i}")).collect();
    let metadata = vec![Metadata::new(); data.len()];
    let store = VectorStore::new(VectorStoreConfig {
        dimension: dim,
        ..Default::default()
    });

    c.bench_function("build_1k_x_384", |b| {
        b.iter(|| store.build(&data, &ids, &metadata).unwrap());
    });
}

criterion_group!(benches, bench_exact_search_10k_384, bench_build_1k_384);
criterion_main!(benches);
