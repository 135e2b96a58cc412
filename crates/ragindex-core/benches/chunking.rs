//! Chunking performance benchmarks
//!
//! Measures performance of:
//! - Content hashing
//! - Text chunking with the tiktoken and whitespace counters
//! - Code chunking through the structural cascade
//! - Batch planning

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ragindex_core::index::plan_batches;
use ragindex_core::{
    hash_content, BatchConfig, ChunkingConfig, ContentType, DocumentChunker, HeuristicCounter,
    TiktokenCounter, TokenCounter,
};
use std::sync::Arc;

fn generate_text(paragraphs: usize) -> String {
    (0..paragraphs)
        .map(|i| {
            format!(
                "Section {} covers configuration. Each option is described in turn. \
                 Defaults are chosen for small projects! Larger ones may tune them?\n\n",
                i
            )
            .repeat(3)
        })
        .collect()
}

fn generate_code(functions: usize) -> String {
    (0..functions)
        .map(|i| {
            format!(
                "def handler_{i}(request):\n    data = request.json()\n    \
                 if not data:\n        return None\n    return process(data, {i})\n\n"
            )
        })
        .collect()
}

fn bench_content_hashing(c: &mut Criterion) {
    let mut group = c.benchmark_group("content_hashing");
    for (name, content) in [("small", generate_text(2)), ("large", generate_text(200))] {
        group.throughput(Throughput::Bytes(content.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &content, |b, content| {
            b.iter(|| hash_content(black_box(content)))
        });
    }
    group.finish();
}

fn bench_text_chunking(c: &mut Criterion) {
    let content = generate_text(100);
    let counters: Vec<(&str, Arc<dyn TokenCounter>)> = vec![
        ("whitespace", Arc::new(HeuristicCounter)),
        ("cl100k_base", Arc::new(TiktokenCounter::new().unwrap())),
    ];

    let mut group = c.benchmark_group("text_chunking");
    group.throughput(Throughput::Bytes(content.len() as u64));
    for (name, counter) in counters {
        let chunker = DocumentChunker::new(counter, ChunkingConfig::default()).unwrap();
        group.bench_function(name, |b| {
            b.iter(|| chunker.chunk_as(black_box(&content), ContentType::Text))
        });
    }
    group.finish();
}

fn bench_code_chunking(c: &mut Criterion) {
    let content = generate_code(300);
    let chunker =
        DocumentChunker::new(Arc::new(HeuristicCounter), ChunkingConfig::new(50, 100, 200))
            .unwrap();

    let mut group = c.benchmark_group("code_chunking");
    group.throughput(Throughput::Bytes(content.len() as u64));
    group.bench_function("python", |b| {
        b.iter(|| chunker.chunk_as(black_box(&content), ContentType::Code))
    });
    group.finish();
}

fn bench_batch_planning(c: &mut Criterion) {
    let counts: Vec<usize> = (0..10_000).map(|i| 100 + (i * 37) % 900).collect();
    let config = BatchConfig::default();
    c.bench_function("plan_batches_10k", |b| {
        b.iter(|| plan_batches(black_box(&counts), &config))
    });
}

criterion_group!(
    benches,
    bench_content_hashing,
    bench_text_chunking,
    bench_code_chunking,
    bench_batch_planning
);
criterion_main!(benches);
