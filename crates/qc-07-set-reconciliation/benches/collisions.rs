//! # Filter Collision and Decode Benchmarks
//!
//! - Keys added to a fresh filter before the first reported collision
//! - Decode time for a subtracted IBF at increasing set differences

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use qc_07_set_reconciliation::{BloomFilter, BloomSize, IbfConfig, InvertibleBloomFilter, SetFilter};
use rand::Rng;

fn random_key() -> [u8; 32] {
    rand::thread_rng().gen()
}

/// Number of keys accepted before the first collision
fn add_until_collision<F: SetFilter>(filter: &mut F) -> usize {
    let mut accepted = 0;
    while filter.add(&random_key()) {
        accepted += 1;
    }
    accepted
}

fn bench_first_collision(c: &mut Criterion) {
    let mut group = c.benchmark_group("first-collision");

    for size in [BloomSize::Bytes256, BloomSize::Bytes512, BloomSize::Bytes1024] {
        let template = BloomFilter::with_preset(size, vec![0, 1, 2, 3, 4]).unwrap();
        group.bench_with_input(
            BenchmarkId::new("bloom", size.bytes()),
            &template,
            |b, template| b.iter(|| add_until_collision(&mut template.clone_empty())),
        );
    }

    let template =
        InvertibleBloomFilter::new(&IbfConfig::new(256, vec![0, 1, 2, 3], 33, 32).unwrap())
            .unwrap();
    group.bench_with_input(BenchmarkId::new("ibf", 256), &template, |b, template| {
        b.iter(|| add_until_collision(&mut template.clone_empty()))
    });

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("ibf-decode");
    let config = IbfConfig::new(1024, vec![0, 1, 2, 3], 33, 32).unwrap();

    for difference in [10usize, 100, 300] {
        let mut a = InvertibleBloomFilter::new(&config).unwrap();
        let mut b = InvertibleBloomFilter::new(&config).unwrap();
        for _ in 0..difference / 2 {
            a.add(&random_key());
            b.add(&random_key());
        }
        a.subtract(&b).unwrap();

        group.throughput(Throughput::Elements(difference as u64));
        group.bench_with_input(BenchmarkId::from_parameter(difference), &a, |bench, diff| {
            bench.iter(|| black_box(diff.clone().decode()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_first_collision, bench_decode);
criterion_main!(benches);
