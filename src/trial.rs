// Copyright 2024 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A single trial: allocate, initialize, time both sums, report.

use crate::error::Error;
use crate::executor::Executor;
use crate::macros::{log_debug, log_warn};
use crate::report;
use crate::sample::SampleBuffer;
use crate::sum::{parallel_sum, sequential_sum};
use rand::Rng;
use std::fmt;
use std::hint::black_box;
use std::io::Write;
use std::time::{Duration, Instant};

/// Whether both summations agreed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Both sums are equal.
    Correct,
    /// The sums differ.
    Error,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Correct => f.write_str("CORRECT"),
            Verdict::Error => f.write_str("ERROR"),
        }
    }
}

/// Measurements of a completed trial.
#[derive(Clone, Debug, PartialEq)]
pub struct TrialResult {
    /// Number of samples that were summed.
    pub elements: usize,
    /// Output of [`sequential_sum()`].
    pub sequential_sum: i64,
    /// Output of [`parallel_sum()`].
    pub parallel_sum: i64,
    /// Wall-clock time of the sequential summation.
    pub sequential_time: Duration,
    /// Wall-clock time of the parallel summation.
    pub parallel_time: Duration,
}

impl TrialResult {
    /// Compares the two sums.
    pub fn verdict(&self) -> Verdict {
        if self.sequential_sum == self.parallel_sum {
            Verdict::Correct
        } else {
            Verdict::Error
        }
    }

    /// Sequential time divided by parallel time, or [`None`] if the
    /// sequential time is zero.
    pub fn speedup(&self) -> Option<f64> {
        if self.sequential_time.is_zero() {
            None
        } else {
            Some(self.sequential_time.as_secs_f64() / self.parallel_time.as_secs_f64())
        }
    }

    /// Whether the parallel summation was slower than the sequential one.
    pub fn is_slowdown(&self) -> bool {
        self.speedup().is_some_and(|speedup| speedup < 1.0)
    }
}

/// How a trial ended.
#[derive(Clone, Debug, PartialEq)]
pub enum TrialOutcome {
    /// Both summations ran.
    Completed(TrialResult),
    /// The buffer couldn't be allocated, so nothing was summed.
    AllocationFailed {
        /// Number of samples that were requested.
        elements: usize,
    },
}

/// Runs one trial of `elements` samples and writes its report.
///
/// An allocation failure is reported and yields
/// [`TrialOutcome::AllocationFailed`]; only I/O errors on `out` are returned
/// as errors. The sample buffer is released before this returns.
pub fn run_trial(
    elements: usize,
    executor: &mut impl Executor,
    rng: &mut impl Rng,
    out: &mut impl Write,
) -> Result<TrialOutcome, Error> {
    report::write_trial_header(out, elements)?;

    let mut buffer = match SampleBuffer::allocate(elements) {
        Ok(buffer) => buffer,
        Err(Error::Allocation {
            elements,
            source: _source,
        }) => {
            log_warn!("Skipping the trial with {elements} elements: {_source}");
            report::write_allocation_failure(out, elements)?;
            return Ok(TrialOutcome::AllocationFailed { elements });
        }
        Err(e) => return Err(e),
    };
    report::write_allocated(out, elements)?;

    writeln!(out, "Initializing array...")?;
    buffer.initialize(rng);

    writeln!(out, "Running sequential sum...")?;
    let start = Instant::now();
    let sequential = sequential_sum(black_box(buffer.as_slice()));
    let sequential_time = start.elapsed();

    writeln!(out, "Running parallel sum...")?;
    let start = Instant::now();
    let parallel = parallel_sum(executor, black_box(buffer.as_slice()));
    let parallel_time = start.elapsed();

    drop(buffer);
    log_debug!(
        "Trial with {elements} elements: sequential {sequential_time:?}, parallel {parallel_time:?}"
    );

    let result = TrialResult {
        elements,
        sequential_sum: sequential,
        parallel_sum: parallel,
        sequential_time,
        parallel_time,
    };
    report::write_results(out, &result)?;
    Ok(TrialOutcome::Completed(result))
}
