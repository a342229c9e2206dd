// Copyright 2024-2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! An executor that forks scoped threads for each call and joins them before
//! returning.

use super::range::fixed_ranges;
use super::{CpuPinningPolicy, Executor};
#[cfg(feature = "log_parallelism")]
use crate::macros::log_info;
use crate::macros::{log_debug, log_error, log_warn};
use crossbeam_utils::CachePadded;
// Platforms that support `libc::sched_setaffinity()`.
#[cfg(all(
    not(miri),
    any(
        target_os = "android",
        target_os = "dragonfly",
        target_os = "freebsd",
        target_os = "linux"
    )
))]
use nix::{
    sched::{sched_setaffinity, CpuSet},
    unistd::Pid,
};
use std::num::NonZeroUsize;

/// Fork-join executor backed by [`std::thread::scope`].
///
/// Each call to [`map_reduce()`](Executor::map_reduce) spawns one thread per
/// worker, hands each of them a fixed contiguous partition of the input (see
/// [`FixedRange`](super::FixedRange)), and joins them all before combining
/// their outputs. No thread outlives the call.
///
/// Partial outputs are written into per-worker slots padded to a cache line,
/// so that workers finishing at the same time don't contend on a shared line.
/// With a single worker, the input is processed inline on the calling thread.
pub struct ScopedExecutor {
    /// Number of threads spawned per call.
    num_threads: NonZeroUsize,
    /// Policy to pin worker threads to CPUs.
    cpu_pinning: CpuPinningPolicy,
}

impl ScopedExecutor {
    /// Creates an executor spawning `num_threads` threads per call.
    ///
    /// Panics if `cpu_pinning` is [`CpuPinningPolicy::Always`] on a platform
    /// where pinning isn't implemented.
    pub fn new(num_threads: NonZeroUsize, cpu_pinning: CpuPinningPolicy) -> Self {
        #[cfg(any(
            miri,
            not(any(
                target_os = "android",
                target_os = "dragonfly",
                target_os = "freebsd",
                target_os = "linux"
            ))
        ))]
        match cpu_pinning {
            CpuPinningPolicy::No => (),
            CpuPinningPolicy::IfSupported => {
                log_warn!("Pinning threads to CPUs is not implemented on this platform.")
            }
            CpuPinningPolicy::Always => {
                panic!("Pinning threads to CPUs is not implemented on this platform.")
            }
        }

        Self {
            num_threads,
            cpu_pinning,
        }
    }
}

impl Executor for ScopedExecutor {
    fn name(&self) -> &'static str {
        "scoped threads"
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
        let num_threads = self.num_threads.get();
        if num_threads == 1 {
            log_debug!("[main thread] Single worker, processing {} items inline", input.len());
            return accumulate(input);
        }

        let cpu_pinning = self.cpu_pinning;
        let accumulate = &accumulate;
        let mut outputs = (0..num_threads)
            .map(|_| CachePadded::new(None))
            .collect::<Vec<CachePadded<Option<Output>>>>();

        let num_panicking_threads = std::thread::scope(|scope| {
            let handles = outputs
                .iter_mut()
                .zip(fixed_ranges(num_threads))
                .enumerate()
                .map(|(id, (output, range))| {
                    let partition = range.slice(input);
                    scope.spawn(move || {
                        pin_current_thread(id, cpu_pinning);
                        #[cfg(feature = "log_parallelism")]
                        log_info!(
                            "[thread {id}] Processing items {:?}",
                            range.bounds(input.len())
                        );
                        **output = Some(accumulate(partition));
                    })
                })
                .collect::<Vec<_>>();
            log_debug!("[main thread] Spawned {num_threads} threads");

            let mut num_panicking_threads = 0;
            for (_i, handle) in handles.into_iter().enumerate() {
                match handle.join() {
                    Ok(()) => log_debug!("[main thread] Thread {_i} joined"),
                    Err(_) => {
                        log_error!("[main thread] Thread {_i} panicked");
                        num_panicking_threads += 1;
                    }
                }
            }
            num_panicking_threads
        });

        if num_panicking_threads != 0 {
            log_error!("[main thread] {num_panicking_threads} worker thread(s) panicked!");
            panic!("{num_panicking_threads} worker thread(s) panicked!");
        }
        log_debug!("[main thread] Joined threads, combining outputs");

        outputs
            .into_iter()
            .filter_map(CachePadded::into_inner)
            .reduce(&reduce)
            .unwrap_or_else(|| accumulate(&input[..0]))
    }
}

/// Pins the current thread to the CPU with the given index.
#[cfg(all(
    not(miri),
    any(
        target_os = "android",
        target_os = "dragonfly",
        target_os = "freebsd",
        target_os = "linux"
    )
))]
fn pin_to_cpu(id: usize) -> nix::Result<()> {
    let mut cpu_set = CpuSet::new();
    cpu_set.set(id)?;
    sched_setaffinity(Pid::from_raw(0), &cpu_set)
}

#[cfg(all(
    not(miri),
    any(
        target_os = "android",
        target_os = "dragonfly",
        target_os = "freebsd",
        target_os = "linux"
    )
))]
fn pin_current_thread(id: usize, cpu_pinning: CpuPinningPolicy) {
    match cpu_pinning {
        CpuPinningPolicy::No => (),
        CpuPinningPolicy::IfSupported => match pin_to_cpu(id) {
            Ok(()) => log_debug!("Pinned thread #{id} to CPU #{id}"),
            Err(_e) => log_warn!("Failed to set CPU affinity for thread #{id}: {_e}"),
        },
        CpuPinningPolicy::Always => match pin_to_cpu(id) {
            Ok(()) => log_debug!("Pinned thread #{id} to CPU #{id}"),
            Err(e) => panic!("Failed to set CPU affinity for thread #{id}: {e}"),
        },
    }
}

#[cfg(any(
    miri,
    not(any(
        target_os = "android",
        target_os = "dragonfly",
        target_os = "freebsd",
        target_os = "linux"
    ))
))]
fn pin_current_thread(_id: usize, _cpu_pinning: CpuPinningPolicy) {}
