//! 工具函数与编码性能基准测试

use chrono::Utc;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use linkvault::storage::backend::codec::{decode_time, decode_views, encode_time, encode_views};
use linkvault::utils::generate_random_code;

// ============== generate_random_code 基准测试 ==============

fn bench_generate_random_code(c: &mut Criterion) {
    let mut group = c.benchmark_group("utils/generate_random_code");

    for length in [6, 8, 12, 22] {
        group.bench_with_input(BenchmarkId::new("length", length), &length, |b, &length| {
            b.iter(|| {
                let code = generate_random_code(length);
                assert_eq!(code.len(), length);
            });
        });
    }

    group.finish();
}

// ============== codec 基准测试 ==============

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("storage/codec");

    group.bench_function("views_round_trip", |b| {
        b.iter(|| {
            let encoded = encode_views(std::hint::black_box(123_456_789)).unwrap();
            decode_views(&encoded).unwrap()
        });
    });

    let now = Utc::now();
    group.bench_function("time_round_trip", |b| {
        b.iter(|| {
            let encoded = encode_time(std::hint::black_box(&now));
            decode_time(&encoded).unwrap()
        });
    });

    group.finish();
}

criterion_group!(benches, bench_generate_random_code, bench_codec);
criterion_main!(benches);
