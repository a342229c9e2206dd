// Copyright 2024 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A micro-benchmark comparing a sequential sum of integers with a
//! data-parallel reduction.
//!
//! For each array size, a [`SampleBuffer`](sample::SampleBuffer) of random
//! values in `1..=100` is summed by [`sequential_sum()`](sum::sequential_sum)
//! and by [`parallel_sum()`](sum::parallel_sum), both timed. The report shows
//! the sums, the times, whether they agree, and the speedup, then closes with
//! an explanation of why parallel speedup degrades on large arrays.
//!
//! Parallelism goes through the [`Executor`](executor::Executor) trait, so the
//! same benchmark can run on scoped threads, on a Rayon pool, or on the
//! deterministic [`SerialExecutor`](executor::SerialExecutor).
//!
//! ```
//! # use sumbench::executor::{CpuPinningPolicy, ExecutorBuilder, ExecutorKind, ThreadCount};
//! # use sumbench::sum::{parallel_sum, sequential_sum};
//! let mut executor = ExecutorBuilder {
//!     num_threads: ThreadCount::AvailableParallelism,
//!     cpu_pinning: CpuPinningPolicy::No,
//! }
//! .build(ExecutorKind::Rayon)
//! .unwrap();
//!
//! let input = (1..=1000).collect::<Vec<i32>>();
//! assert_eq!(sequential_sum(&input), 500_500);
//! assert_eq!(parallel_sum(&mut executor, &input), 500_500);
//! ```

#![forbid(missing_docs, unsafe_code)]

pub mod driver;
mod error;
pub mod executor;
mod macros;
pub mod report;
pub mod sample;
pub mod sum;
pub mod trial;

pub use error::Error;

#[cfg(test)]
mod test {
    use super::executor::{
        CpuPinningPolicy, Executor, RayonExecutor, ScopedExecutor, SerialExecutor,
    };
    use super::sample::{fill_uniform, SampleBuffer};
    use super::sum::{parallel_sum, sequential_sum};
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha12Rng;
    use std::num::NonZeroUsize;

    fn scoped(num_threads: usize) -> ScopedExecutor {
        ScopedExecutor::new(
            NonZeroUsize::try_from(num_threads).unwrap(),
            CpuPinningPolicy::No,
        )
    }

    fn rayon(num_threads: usize) -> RayonExecutor {
        RayonExecutor::new(NonZeroUsize::try_from(num_threads).unwrap()).unwrap()
    }

    macro_rules! expand_tests {
        ( $executor:expr, ) => {};
        ( $executor:expr, $case:ident, $( $others:tt )* ) => {
            #[test]
            fn $case() {
                $crate::test::$case(&mut $executor);
            }

            expand_tests!($executor, $($others)*);
        };
    }

    macro_rules! executor_tests {
        ( $mod:ident, $executor:expr ) => {
            mod $mod {
                use super::*;

                expand_tests!(
                    $executor,
                    test_small_example,
                    test_empty,
                    test_single_element,
                    test_fewer_elements_than_workers,
                    test_matches_sequential_random,
                    test_matches_sequential_many_lengths,
                    test_sum_within_bounds,
                    test_extreme_values,
                    test_reuse_executor,
                );
            }
        };
    }

    executor_tests!(serial, SerialExecutor);
    executor_tests!(scoped_1, scoped(1));
    executor_tests!(scoped_2, scoped(2));
    executor_tests!(scoped_4, scoped(4));
    executor_tests!(scoped_7, scoped(7));
    executor_tests!(rayon_1, rayon(1));
    executor_tests!(rayon_4, rayon(4));

    fn test_small_example(executor: &mut impl Executor) {
        let input = [1, 2, 3, 4, 5];
        assert_eq!(sequential_sum(&input), 15);
        assert_eq!(parallel_sum(executor, &input), 15);
    }

    fn test_empty(executor: &mut impl Executor) {
        assert_eq!(sequential_sum(&[]), 0);
        assert_eq!(parallel_sum(executor, &[]), 0);
    }

    fn test_single_element(executor: &mut impl Executor) {
        assert_eq!(parallel_sum(executor, &[42]), 42);
    }

    fn test_fewer_elements_than_workers(executor: &mut impl Executor) {
        assert_eq!(parallel_sum(executor, &[1, 2, 3]), 6);
    }

    fn test_matches_sequential_random(executor: &mut impl Executor) {
        let mut rng = ChaCha12Rng::seed_from_u64(42);
        let mut buffer = SampleBuffer::allocate(100_003).unwrap();
        buffer.initialize(&mut rng);
        assert_eq!(
            parallel_sum(executor, buffer.as_slice()),
            sequential_sum(buffer.as_slice())
        );
    }

    fn test_matches_sequential_many_lengths(executor: &mut impl Executor) {
        let mut rng = ChaCha12Rng::seed_from_u64(7);
        for len in [0, 1, 2, 3, 7, 8, 9, 63, 64, 65, 1000, 4097] {
            let input = (0..len)
                .map(|_| rng.random_range(-1_000_000..=1_000_000))
                .collect::<Vec<i32>>();
            assert_eq!(
                parallel_sum(executor, &input),
                sequential_sum(&input),
                "length {len}"
            );
        }
    }

    fn test_sum_within_bounds(executor: &mut impl Executor) {
        let mut rng = ChaCha12Rng::seed_from_u64(1);
        for len in [1, 10, 1000, 50_000] {
            let mut input = vec![0; len];
            fill_uniform(&mut input, &mut rng);
            let sum = parallel_sum(executor, &input);
            let len = len as i64;
            assert!((len..=100 * len).contains(&sum), "{sum} out of bounds");
        }
    }

    fn test_extreme_values(executor: &mut impl Executor) {
        let input = vec![i32::MAX; 10_000];
        assert_eq!(parallel_sum(executor, &input), 10_000 * i64::from(i32::MAX));
        let input = vec![i32::MIN; 10_000];
        assert_eq!(parallel_sum(executor, &input), 10_000 * i64::from(i32::MIN));
    }

    fn test_reuse_executor(executor: &mut impl Executor) {
        let input = (1..=10_000).collect::<Vec<i32>>();
        let first = parallel_sum(executor, &input);
        let second = parallel_sum(executor, &input);
        assert_eq!(first, 5_000 * 10_001);
        assert_eq!(second, 5_000 * 10_001);
    }
}
