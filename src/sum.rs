// Copyright 2024 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The two summation routines under comparison.

use crate::executor::Executor;

/// Sums the samples on the calling thread, in index order.
pub fn sequential_sum(samples: &[i32]) -> i64 {
    let mut total = 0i64;
    for &x in samples {
        total += i64::from(x);
    }
    total
}

/// Sums the samples on the given executor.
///
/// Each worker sums its own partition into a private accumulator, and the
/// partial sums are added together once all workers are done. Integer
/// addition being associative and commutative, the result equals
/// [`sequential_sum()`] for every input.
pub fn parallel_sum(executor: &mut impl Executor, samples: &[i32]) -> i64 {
    executor.map_reduce(samples, sequential_sum, |a, b| a + b)
}
