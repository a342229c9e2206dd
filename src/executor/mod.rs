// Copyright 2024-2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Executors: fork-join worker pools that reduce a slice in parallel.

mod range;
mod rayon;
mod scoped;

use crate::macros::log_warn;
pub use range::{fixed_ranges, FixedRange};
pub use self::rayon::RayonExecutor;
pub use scoped::ScopedExecutor;
use std::convert::TryFrom;
use std::num::NonZeroUsize;

/// A pool of workers that can split a slice into partitions, reduce each
/// partition into a partial output, and combine the partial outputs.
///
/// Implementations must guarantee that:
/// - every index of `input` belongs to exactly one partition passed to
///   `accumulate`,
/// - the returned value is the `reduce` of all the partial outputs,
/// - an empty input yields `accumulate(&[])` (possibly reduced with further
///   empty partials).
///
/// Each worker accumulates into a private output, so `accumulate` needs no
/// synchronization; combining partials is the only point where workers meet.
pub trait Executor {
    /// Human-readable name of this executor, for reports.
    fn name(&self) -> &'static str;

    /// Number of workers that process partitions.
    fn num_workers(&self) -> NonZeroUsize;

    /// Processes the input in parallel and returns the combined output.
    fn map_reduce<T: Sync, Output: Send>(
        &mut self,
        input: &[T],
        accumulate: impl Fn(&[T]) -> Output + Sync,
        reduce: impl Fn(Output, Output) -> Output + Sync,
    ) -> Output;
}

/// An executor with a single worker that runs on the calling thread.
///
/// Its output is fully deterministic, which makes it a convenient stand-in
/// for a real pool in tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct SerialExecutor;

impl Executor for SerialExecutor {
    fn name(&self) -> &'static str {
        "serial"
    }

    fn num_workers(&self) -> NonZeroUsize {
        NonZeroUsize::MIN
    }

    fn map_reduce<T: Sync, Output: Send>(
        &mut self,
        input: &[T],
        accumulate: impl Fn(&[T]) -> Output + Sync,
        _reduce: impl Fn(Output, Output) -> Output + Sync,
    ) -> Output {
        accumulate(input)
    }
}

/// Number of worker threads to spawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThreadCount {
    /// Spawn the number of threads returned by
    /// [`std::thread::available_parallelism()`].
    AvailableParallelism,
    /// Spawn the given number of threads.
    Count(NonZeroUsize),
}

impl ThreadCount {
    /// Resolves this count into a concrete number of threads.
    ///
    /// Falls back to a single thread if the available parallelism can't be
    /// queried.
    pub fn resolve(self) -> NonZeroUsize {
        match self {
            ThreadCount::AvailableParallelism => {
                std::thread::available_parallelism().unwrap_or_else(|_e| {
                    log_warn!("Getting the available parallelism failed, using 1 thread: {_e}");
                    NonZeroUsize::MIN
                })
            }
            ThreadCount::Count(count) => count,
        }
    }
}

impl TryFrom<usize> for ThreadCount {
    type Error = <NonZeroUsize as TryFrom<usize>>::Error;

    fn try_from(thread_count: usize) -> Result<Self, Self::Error> {
        let count = NonZeroUsize::try_from(thread_count)?;
        Ok(ThreadCount::Count(count))
    }
}

/// Policy to pin worker threads to CPUs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CpuPinningPolicy {
    /// Don't pin worker threads to CPUs.
    No,
    /// Pin each worker thread to a CPU, if CPU pinning is supported and
    /// implemented on this platform.
    IfSupported,
    /// Pin each worker thread to a CPU. If CPU pinning isn't supported on this
    /// platform (or not implemented), running the executor will panic.
    Always,
}

/// Kind of executor to build.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecutorKind {
    /// Threads spawned in a scope for each call, see [`ScopedExecutor`].
    Scoped,
    /// A persistent Rayon thread pool, see [`RayonExecutor`].
    Rayon,
}

/// A builder for executors.
#[derive(Clone, Copy, Debug)]
pub struct ExecutorBuilder {
    /// Number of worker threads.
    pub num_threads: ThreadCount,
    /// Policy to pin worker threads to CPUs. Only the scoped executor pins
    /// its threads.
    pub cpu_pinning: CpuPinningPolicy,
}

impl ExecutorBuilder {
    /// Builds an executor of the given kind.
    ///
    /// ```
    /// # use sumbench::executor::{CpuPinningPolicy, ExecutorBuilder, ExecutorKind, ThreadCount};
    /// # use sumbench::sum::parallel_sum;
    /// let mut executor = ExecutorBuilder {
    ///     num_threads: ThreadCount::try_from(4).unwrap(),
    ///     cpu_pinning: CpuPinningPolicy::No,
    /// }
    /// .build(ExecutorKind::Scoped)
    /// .unwrap();
    ///
    /// let input = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
    /// assert_eq!(parallel_sum(&mut executor, &input), 55);
    /// ```
    pub fn build(
        &self,
        kind: ExecutorKind,
    ) -> Result<BenchExecutor, ::rayon::ThreadPoolBuildError> {
        let num_threads = self.num_threads.resolve();
        Ok(match kind {
            ExecutorKind::Scoped => {
                BenchExecutor::Scoped(ScopedExecutor::new(num_threads, self.cpu_pinning))
            }
            ExecutorKind::Rayon => BenchExecutor::Rayon(RayonExecutor::new(num_threads)?),
        })
    }
}

/// An executor chosen at runtime, dispatching over the [`ExecutorKind`].
pub enum BenchExecutor {
    /// See [`ScopedExecutor`].
    Scoped(ScopedExecutor),
    /// See [`RayonExecutor`].
    Rayon(RayonExecutor),
}

impl BenchExecutor {
    /// Kind of the underlying executor.
    pub fn kind(&self) -> ExecutorKind {
        match self {
            BenchExecutor::Scoped(_) => ExecutorKind::Scoped,
            BenchExecutor::Rayon(_) => ExecutorKind::Rayon,
        }
    }
}

impl Executor for BenchExecutor {
    fn name(&self) -> &'static str {
        match self {
            BenchExecutor::Scoped(inner) => inner.name(),
            BenchExecutor::Rayon(inner) => inner.name(),
        }
    }

    fn num_workers(&self) -> NonZeroUsize {
        match self {
            BenchExecutor::Scoped(inner) => inner.num_workers(),
            BenchExecutor::Rayon(inner) => inner.num_workers(),
        }
    }

    fn map_reduce<T: Sync, Output: Send>(
        &mut self,
        input: &[T],
        accumulate: impl Fn(&[T]) -> Output + Sync,
        reduce: impl Fn(Output, Output) -> Output + Sync,
    ) -> Output {
        match self {
            BenchExecutor::Scoped(inner) => inner.map_reduce(input, accumulate, reduce),
            BenchExecutor::Rayon(inner) => inner.map_reduce(input, accumulate, reduce),
        }
    }
}
