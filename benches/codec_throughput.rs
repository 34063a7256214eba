//! Benchmarks for the 72-byte packet codec
//!
//! Encode and decode run once per frame on each end of the link, so both
//! should stay far below a microsecond.

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use motionlink::codec::{self, PACKET_SIZE};
use motionlink::test_utils::distinct_sample;
use std::hint::black_box;

fn bench_encode(c: &mut Criterion) {
    let sample = distinct_sample(1234);

    let mut group = c.benchmark_group("codec_encode");
    group.throughput(Throughput::Bytes(PACKET_SIZE as u64));

    group.bench_function("encode_fresh_buffer", |b| b.iter(|| black_box(codec::encode(black_box(&sample)))));

    group.bench_function("encode_into_reused_buffer", |b| {
        let mut buf = [0u8; PACKET_SIZE];
        b.iter(|| {
            codec::encode_into(black_box(&sample), &mut buf);
            black_box(&buf);
        })
    });

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let bytes = codec::encode(&distinct_sample(1234));
    let short = &bytes[..PACKET_SIZE - 1];

    let mut group = c.benchmark_group("codec_decode");
    group.throughput(Throughput::Bytes(PACKET_SIZE as u64));

    group.bench_function("decode_valid", |b| b.iter(|| black_box(codec::decode(black_box(&bytes)))));
    group.bench_function("decode_size_mismatch", |b| b.iter(|| black_box(codec::decode(black_box(short)))));

    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
