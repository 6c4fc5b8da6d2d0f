use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use spindle::*;

fn hash_benchmarks(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut group = c.benchmark_group("spooky");
    for len in [15usize, 64, 191, 4096, 1 << 20] {
        let data: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
        group.throughput(Throughput::Bytes(len as u64));
        group.bench_with_input(BenchmarkId::new("hash128", len), &data, |b, data| {
            b.iter(|| hash128(black_box(data), Sh128::default()))
        });
        group.bench_with_input(BenchmarkId::new("streaming", len), &data, |b, data| {
            b.iter(|| {
                let mut hasher = SpookyHasher::default();
                for piece in data.chunks(100) {
                    hasher.update(piece);
                }
                hasher.finish128()
            })
        });
    }
    group.finish();
}

fn array_benchmarks(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let values: Vec<f64> = (0..100_000).map(|_| rng.gen()).collect();
    let bytes = to_vec(&values).unwrap();

    let mut group = c.benchmark_group("f64 array");
    group.throughput(Throughput::Bytes(bytes.len() as u64));
    group.bench_function("encode", |b| {
        let mut buf = Vec::with_capacity(bytes.len());
        b.iter(|| {
            buf.clear();
            black_box(&values).encode(&mut buf).unwrap();
        })
    });
    group.bench_function("decode", |b| {
        b.iter(|| from_slice::<Vec<f64>>(black_box(&bytes)).unwrap())
    });
    group.bench_function("decode in place", |b| {
        let mut out: Vec<f64> = Vec::with_capacity(values.len());
        b.iter(|| {
            let mut r = black_box(&bytes[..]);
            let count = stream::read_len(&mut r).unwrap();
            primitive::deserialize_array_into(&mut r, count, &mut out).unwrap();
        })
    });
    group.finish();

    let strings: Vec<Option<String>> = (0..10_000)
        .map(|i| if i % 7 == 0 { None } else { Some(format!("value number {}", i)) })
        .collect();
    let bytes = to_vec(&strings).unwrap();
    c.bench_function("nullable strings", |b| {
        b.iter(|| from_slice::<Vec<Option<String>>>(black_box(&bytes)).unwrap())
    });
}

criterion_group!(benches, hash_benchmarks, array_benchmarks);
criterion_main!(benches);
