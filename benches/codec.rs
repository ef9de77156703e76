#![allow(clippy::all)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dollar_list::{decode, encode, Config, Value};
use rand::distributions::{Alphanumeric, DistString};

fn criterion_benchmark(c: &mut Criterion) {
    let config = Config::default();

    let value = Value::int(rand::random::<i64>());
    c.bench_function("encode i64", |b| {
        b.iter(|| encode(black_box(&[value.clone()]), &config).unwrap())
    });

    let value = Value::float(rand::random::<f64>());
    c.bench_function("encode f64", |b| {
        b.iter(|| encode(black_box(&[value.clone()]), &config).unwrap())
    });

    let text = Alphanumeric.sample_string(&mut rand::thread_rng(), 16);
    let value = Value::text(text);
    c.bench_function("encode String 16B", |b| {
        b.iter(|| encode(black_box(&[value.clone()]), &config).unwrap())
    });

    let text = Alphanumeric.sample_string(&mut rand::thread_rng(), 1024);
    let value = Value::text(text);
    c.bench_function("encode String 1kB", |b| {
        b.iter(|| encode(black_box(&[value.clone()]), &config).unwrap())
    });

    let text = Alphanumeric.sample_string(&mut rand::thread_rng(), 1024 * 1024);
    let value = Value::text(text);
    c.bench_function("encode String 1MB", |b| {
        b.iter(|| encode(black_box(&[value.clone()]), &config).unwrap())
    });

    let items = (0..100)
        .map(|i| Value::int(i as i64))
        .collect::<Vec<_>>();
    c.bench_function("encode List<i64> 100", |b| {
        b.iter(|| encode(black_box(&items), &config).unwrap())
    });

    let nested = vec![Value::list((0..10).map(|i| Value::int(i as i64)).collect::<Vec<_>>()); 10];
    c.bench_function("encode nested List 10x10", |b| {
        b.iter(|| encode(black_box(&nested), &config).unwrap())
    });

    let bytes = encode(&items, &config).unwrap();
    c.bench_function("decode List<i64> 100", |b| {
        b.iter(|| decode(black_box(&bytes), &config).unwrap())
    });

    let text = Alphanumeric.sample_string(&mut rand::thread_rng(), 1024 * 1024);
    let bytes = encode(&[Value::text(text)], &config).unwrap();
    c.bench_function("decode String 1MB", |b| {
        b.iter(|| decode(black_box(&bytes), &config).unwrap())
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
