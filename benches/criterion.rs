// Copyright 2024 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use std::mem::size_of;
use sumbench::executor::{CpuPinningPolicy, ExecutorBuilder, ExecutorKind, ThreadCount};
use sumbench::sample::SampleBuffer;
use sumbench::sum::{parallel_sum, sequential_sum};

const NUM_THREADS: &[usize] = &[1, 2, 4, 8];
const LENGTHS: &[usize] = &[10_000, 100_000, 1_000_000, 5_000_000];

fn samples(len: usize) -> SampleBuffer {
    let mut buffer = SampleBuffer::allocate(len).unwrap();
    buffer.initialize(&mut ChaCha12Rng::seed_from_u64(42));
    buffer
}

fn sum(c: &mut Criterion) {
    let mut group = c.benchmark_group("sum");
    for &len in LENGTHS {
        let buffer = samples(len);
        let input = buffer.as_slice();
        group.throughput(Throughput::Bytes((len * size_of::<i32>()) as u64));
        group.bench_with_input(BenchmarkId::new("sequential", len), input, |bencher, input| {
            bencher.iter(|| sequential_sum(black_box(input)))
        });
        for &num_threads in NUM_THREADS {
            for (kind, name) in [
                (ExecutorKind::Scoped, "scoped"),
                (ExecutorKind::Rayon, "rayon"),
            ] {
                let mut executor = ExecutorBuilder {
                    num_threads: ThreadCount::try_from(num_threads).unwrap(),
                    cpu_pinning: CpuPinningPolicy::IfSupported,
                }
                .build(kind)
                .unwrap();
                group.bench_with_input(
                    BenchmarkId::new(format!("{name}@{num_threads}"), len),
                    input,
                    |bencher, input| bencher.iter(|| parallel_sum(&mut executor, black_box(input))),
                );
            }
        }
    }
    group.finish();
}

criterion_group!(benches, sum);
criterion_main!(benches);
