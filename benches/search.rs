use criterion::{Criterion, criterion_group, criterion_main};
use faq_search::index::memory::cosine_similarity;
use faq_search::index::{Distance, FaqPayload, IndexedPoint, MemoryIndex, PointId, VectorIndex};
use std::hint::black_box;

const DIMENSION: usize = 384;

fn vector(seed: u64) -> Vec<f32> {
    (0..DIMENSION as u64)
        .map(|i| ((seed.wrapping_mul(31).wrapping_add(i * 7)) % 97) as f32 / 97.0)
        .collect()
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let index = MemoryIndex::new();
    index
        .create_collection("bench", DIMENSION, Distance::Cosine)
        .expect("collection can be created");

    let points = (0..1000)
        .map(|id| IndexedPoint {
            id: PointId::Num(id),
            vector: vector(id),
            payload: FaqPayload {
                question: format!("question {}", id),
                answer: format!("answer {}", id),
            },
        })
        .collect();
    index.upsert("bench", points).expect("points can be upserted");

    let query = vector(4242);
    c.bench_function("memory_search_top1", |b| {
        b.iter(|| index.search("bench", black_box(&query), black_box(1)));
    });

    let other = vector(7);
    c.bench_function("cosine_similarity", |b| {
        b.iter(|| cosine_similarity(black_box(&query), black_box(&other)));
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
