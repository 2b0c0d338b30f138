//! BER encode/decode benchmarks.
//!
//! Run with: cargo bench

use std::hint::black_box;

use asn1_ber::{Value, decode, decode_from};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

fn flat_set(len: usize) -> Value {
    Value::set((0..len).map(|i| Value::integer(i as i64)))
}

fn nested(depth: usize) -> Value {
    let mut value = Value::sequence([Value::octet_string("leaf"), Value::boolean(true)]);
    for i in 0..depth {
        let children = [Value::integer(i as i64), value, Value::null()];
        value = if i % 2 == 0 {
            Value::set(children)
        } else {
            Value::sequence(children).indefinite()
        };
    }
    value
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");

    for len in [10, 1000] {
        let value = flat_set(len);
        group.throughput(Throughput::Bytes(value.encoded_len().unwrap() as u64));

        group.bench_with_input(BenchmarkId::new("buffer", len), &value, |b, value| {
            b.iter(|| black_box(value).encode().unwrap());
        });
        group.bench_with_input(BenchmarkId::new("stream", len), &value, |b, value| {
            let mut out = Vec::with_capacity(value.encoded_len().unwrap());
            b.iter(|| {
                out.clear();
                black_box(value).encode_to(&mut out).unwrap();
            });
        });
    }

    let value = nested(32);
    group.bench_function("nested/32", |b| {
        b.iter(|| black_box(&value).encode().unwrap());
    });

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    for len in [10, 1000] {
        let der = flat_set(len).encode().unwrap();
        group.throughput(Throughput::Bytes(der.len() as u64));

        group.bench_with_input(BenchmarkId::new("slice", len), &der, |b, der| {
            b.iter(|| decode(black_box(der.clone())).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("reader", len), &der, |b, der| {
            b.iter(|| decode_from(black_box(&der[..])).unwrap());
        });
    }

    let ber = nested(32).encode().unwrap();
    group.bench_function("nested/32", |b| {
        b.iter(|| decode(black_box(ber.clone())).unwrap());
    });

    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
