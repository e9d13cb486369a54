//! Criterion benchmarks for end-to-end XML reads.

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use osmx_bench::{read_to_end, reference_extract, stress_extract};
use osmx_xml::{OverflowPolicy, ReaderConfig};

fn bench_parse_reference(c: &mut Criterion) {
    let doc = reference_extract();
    let mut group = c.benchmark_group("parse_reference");
    group.throughput(Throughput::Bytes(doc.len() as u64));

    group.bench_function("default_config", |b| {
        b.iter(|| {
            let (summary, _) = read_to_end(doc.clone(), ReaderConfig::default()).unwrap();
            std::hint::black_box(summary);
        });
    });

    group.bench_function("small_buffers", |b| {
        let config = ReaderConfig {
            buffer_capacity: 64 * 1024,
            max_queue_size: 4,
            ..ReaderConfig::default()
        };
        b.iter(|| {
            let (summary, _) = read_to_end(doc.clone(), config.clone()).unwrap();
            std::hint::black_box(summary);
        });
    });

    group.bench_function("growing_buffers", |b| {
        let config = ReaderConfig {
            buffer_capacity: 4 * 1024,
            flush_threshold: Some(1),
            overflow: OverflowPolicy::Grow,
            ..ReaderConfig::default()
        };
        b.iter(|| {
            let (summary, _) = read_to_end(doc.clone(), config.clone()).unwrap();
            std::hint::black_box(summary);
        });
    });

    group.finish();
}

fn bench_parse_stress(c: &mut Criterion) {
    let doc = stress_extract();
    let mut group = c.benchmark_group("parse_stress");
    group.sample_size(10);
    group.throughput(Throughput::Bytes(doc.len() as u64));
    group.bench_function("default_config", |b| {
        b.iter(|| {
            let (summary, _) = read_to_end(doc.clone(), ReaderConfig::default()).unwrap();
            std::hint::black_box(summary);
        });
    });
    group.finish();
}

criterion_group!(benches, bench_parse_reference, bench_parse_stress);
criterion_main!(benches);
