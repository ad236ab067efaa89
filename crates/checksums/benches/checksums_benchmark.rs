//! crates/checksums/benches/checksums_benchmark.rs
//!
//! Benchmarks for checksum computation performance.
//!
//! Run with: `cargo bench -p jigdo-checksums`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use jigdo_checksums::RollingSum;
use jigdo_checksums::strong::Md5;

/// Deterministic PRNG byte stream, standing in for scanned image data.
fn generate_data(size: usize, seed: u64) -> Vec<u8> {
    let mut state = seed;
    (0..size)
        .map(|_| {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
            let rot = (state >> 59) as u32;
            ((xorshifted >> rot) | (xorshifted << ((32u32.wrapping_sub(rot)) & 31))) as u8
        })
        .collect()
}

/// Benchmark rolling checksum initialization for different window sizes.
fn bench_rolling_checksum(c: &mut Criterion) {
    let mut group = c.benchmark_group("rolling_checksum");

    for size in [512, 1024, 4096, 8192, 32768, 131072] {
        let data = generate_data(size, size as u64);

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("init", size), &data, |b, data| {
            b.iter(|| black_box(RollingSum::init(black_box(data)).unwrap().value()));
        });
    }

    group.finish();
}

/// Benchmark the rolling checksum sliding-window update.
fn bench_rolling_checksum_slide(c: &mut Criterion) {
    let mut group = c.benchmark_group("rolling_checksum_slide");

    let window_size = 8192;
    let data = generate_data(window_size * 2, 99);

    let base = RollingSum::init(&data[..window_size]).unwrap();

    group.bench_function("single_slide", |b| {
        b.iter(|| {
            let mut rolling = base;
            rolling
                .slide(black_box(data[0]), black_box(data[window_size]))
                .unwrap();
            black_box(rolling.value())
        });
    });

    group.bench_function("128_slides", |b| {
        b.iter(|| {
            let mut rolling = base;
            for i in 0..128 {
                rolling
                    .slide(black_box(data[i]), black_box(data[window_size + i]))
                    .unwrap();
            }
            black_box(rolling.value())
        });
    });

    group.finish();
}

/// Benchmark MD5 digest computation.
fn bench_md5_digest(c: &mut Criterion) {
    let mut group = c.benchmark_group("md5_digest");

    for size in [512, 1024, 4096, 32768, 131072] {
        let data = generate_data(size, size as u64 ^ 0xABCD);

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("digest", size), &data, |b, data| {
            b.iter(|| black_box(Md5::digest(black_box(data))));
        });
    }

    group.finish();
}

/// Compare the rolling checksum against the strong digest at a typical block size.
fn bench_algorithm_comparison(c: &mut Criterion) {
    let mut group = c.benchmark_group("algorithm_comparison");

    let size = 8192;
    let data = generate_data(size, 0xC0FFEE);

    group.throughput(Throughput::Bytes(size as u64));

    group.bench_function("rolling_checksum", |b| {
        b.iter(|| black_box(RollingSum::init(black_box(&data)).unwrap().value()));
    });

    group.bench_function("md5", |b| {
        b.iter(|| black_box(Md5::digest(black_box(&data))));
    });

    group.finish();
}

/// Benchmark computing both checksums for a sequence of blocks, as the
/// pre-scan stage does for every candidate file.
fn bench_block_signatures_sequential(c: &mut Criterion) {
    let mut group = c.benchmark_group("block_signatures_sequential");

    let block_size = 8192;

    for num_blocks in [10, 100, 1000] {
        let blocks: Vec<Vec<u8>> = (0..num_blocks)
            .map(|i| generate_data(block_size, i as u64))
            .collect();

        let total_bytes = num_blocks * block_size;
        group.throughput(Throughput::Bytes(total_bytes as u64));

        group.bench_with_input(
            BenchmarkId::new("rsum0_and_md5", num_blocks),
            &blocks,
            |b, blocks| {
                b.iter(|| {
                    let signatures: Vec<_> = blocks
                        .iter()
                        .map(|block| {
                            let rolling = RollingSum::init(block).unwrap();
                            (rolling.value(), Md5::digest(block))
                        })
                        .collect();
                    black_box(signatures)
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_rolling_checksum,
    bench_rolling_checksum_slide,
    bench_md5_digest,
    bench_algorithm_comparison,
    bench_block_signatures_sequential,
);

criterion_main!(benches);
