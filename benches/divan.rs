// Copyright 2024 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use sumbench::sample::SampleBuffer;

fn main() {
    divan::main();
}

const NUM_THREADS: &[usize] = &[1, 2, 4, 8];
const LENGTHS: &[usize] = &[10_000, 100_000, 1_000_000];

fn samples(len: usize) -> SampleBuffer {
    let mut buffer = SampleBuffer::allocate(len).unwrap();
    buffer.initialize(&mut ChaCha12Rng::seed_from_u64(42));
    buffer
}

/// Baseline: the sequential loop.
mod sequential {
    use super::{samples, LENGTHS};
    use divan::counter::BytesCount;
    use divan::{black_box, Bencher};
    use sumbench::sum::sequential_sum;

    #[divan::bench(args = LENGTHS)]
    fn sum(bencher: Bencher, len: usize) {
        let buffer = samples(len);
        let input = buffer.as_slice();
        bencher
            .counter(BytesCount::of_many::<i32>(len))
            .bench_local(|| sequential_sum(black_box(input)))
    }
}

/// Parallel sum on each executor.
mod parallel {
    use super::{samples, LENGTHS, NUM_THREADS};
    use divan::counter::BytesCount;
    use divan::{black_box, Bencher};
    use sumbench::executor::{
        CpuPinningPolicy, ExecutorBuilder, ExecutorKind, ThreadCount,
    };
    use sumbench::sum::parallel_sum;

    fn bench(bencher: Bencher, kind: ExecutorKind, num_threads: usize, len: usize) {
        let buffer = samples(len);
        let input = buffer.as_slice();
        let mut executor = ExecutorBuilder {
            num_threads: ThreadCount::try_from(num_threads).unwrap(),
            cpu_pinning: CpuPinningPolicy::IfSupported,
        }
        .build(kind)
        .unwrap();
        bencher
            .counter(BytesCount::of_many::<i32>(len))
            .bench_local(|| parallel_sum(&mut executor, black_box(input)));
    }

    #[divan::bench(consts = NUM_THREADS, args = LENGTHS)]
    fn sum_scoped<const NUM_THREADS: usize>(bencher: Bencher, len: usize) {
        bench(bencher, ExecutorKind::Scoped, NUM_THREADS, len)
    }

    #[divan::bench(consts = NUM_THREADS, args = LENGTHS)]
    fn sum_rayon<const NUM_THREADS: usize>(bencher: Bencher, len: usize) {
        bench(bencher, ExecutorKind::Rayon, NUM_THREADS, len)
    }
}
