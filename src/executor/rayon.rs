// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use super::Executor;
use crate::macros::log_debug;
use ::rayon::iter::ParallelIterator;
use ::rayon::slice::ParallelSlice;
use ::rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use std::num::NonZeroUsize;

/// Executor backed by a dedicated [Rayon](https://docs.rs/rayon) thread pool.
///
/// The pool is created once and stays idle between calls. Each call splits
/// the input into one chunk per worker and lets Rayon's work-stealing
/// scheduler distribute the chunks, so there is no guarantee that chunk `i`
/// runs on thread `i`.
pub struct RayonExecutor {
    /// Underlying Rayon pool.
    thread_pool: ThreadPool,
    /// Number of threads in the pool, also the number of chunks per call.
    num_threads: NonZeroUsize,
}

impl RayonExecutor {
    /// Builds a Rayon pool with `num_threads` threads.
    pub fn new(num_threads: NonZeroUsize) -> Result<Self, ThreadPoolBuildError> {
        let thread_pool = ThreadPoolBuilder::new()
            .num_threads(num_threads.get())
            .thread_name(|i| format!("sumbench-rayon-{i}"))
            .build()?;
        log_debug!("[main thread] Built a Rayon pool of {num_threads} threads");
        Ok(Self {
            thread_pool,
            num_threads,
        })
    }
}

impl Executor for RayonExecutor {
    fn name(&self) -> &'static str {
        "rayon pool"
    }

    fn num_workers(&self) -> NonZeroUsize {
        self.num_threads
    }

    fn map_reduce<T: Sync, Output: Send>(
        &mut self,
        input: &[T],
        accumulate: impl Fn(&[T]) -> Output + Sync,
        reduce: impl Fn(Output, Output) -> Output + Sync,
    ) -> Output {
        // `par_chunks()` panics on a zero chunk size, which an empty input would
        // otherwise produce.
        let chunk_size = input.len().div_ceil(self.num_threads.get()).max(1);
        self.thread_pool
            .install(|| {
                input
                    .par_chunks(chunk_size)
                    .map(&accumulate)
                    .reduce_with(&reduce)
            })
            .unwrap_or_else(|| accumulate(input))
    }
}
