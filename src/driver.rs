// Copyright 2024 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Top-level driver: header, one trial per size, closing summary.

use crate::error::Error;
use crate::executor::Executor;
use crate::macros::{log_debug, log_info};
use crate::report;
use crate::trial::{run_trial, TrialOutcome};
use rand::Rng;
use std::io::{BufRead, Write};

/// Array sizes benchmarked by default, in increasing order.
pub const TRIAL_SIZES: [usize; 7] = [
    1_000, 10_000, 50_000, 100_000, 500_000, 1_000_000, 5_000_000,
];

/// Trials of at least this many elements are followed by a pause when pacing
/// is interactive.
pub const PAUSE_THRESHOLD: usize = 100_000;

/// Whether to wait for the user between large trials.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pacing {
    /// Wait for one line of input after each trial of at least
    /// [`PAUSE_THRESHOLD`] elements.
    Interactive,
    /// Run all the trials back to back.
    Disabled,
}

/// A benchmark run over a list of sizes.
#[derive(Clone, Debug)]
pub struct Benchmark {
    /// Sizes of the trials, run in order.
    pub sizes: Vec<usize>,
    /// Pacing between trials.
    pub pacing: Pacing,
}

impl Default for Benchmark {
    fn default() -> Self {
        Self {
            sizes: TRIAL_SIZES.to_vec(),
            pacing: Pacing::Interactive,
        }
    }
}

impl Benchmark {
    /// Runs every trial on the given executor, writing the report to `out` and
    /// reading pacing lines from `input`.
    ///
    /// A trial whose buffer can't be allocated doesn't stop the run. Returns
    /// the outcome of each trial, in order.
    ///
    /// ```
    /// # use rand::SeedableRng;
    /// # use rand_chacha::ChaCha12Rng;
    /// # use sumbench::driver::{Benchmark, Pacing};
    /// # use sumbench::executor::SerialExecutor;
    /// let benchmark = Benchmark {
    ///     sizes: vec![10, 100],
    ///     pacing: Pacing::Disabled,
    /// };
    /// let mut out = Vec::new();
    /// let outcomes = benchmark
    ///     .run(
    ///         &mut SerialExecutor,
    ///         &mut ChaCha12Rng::seed_from_u64(42),
    ///         &mut out,
    ///         &mut std::io::empty(),
    ///     )
    ///     .unwrap();
    /// assert_eq!(outcomes.len(), 2);
    /// ```
    pub fn run(
        &self,
        executor: &mut impl Executor,
        rng: &mut impl Rng,
        out: &mut impl Write,
        input: &mut impl BufRead,
    ) -> Result<Vec<TrialOutcome>, Error> {
        report::write_header(out, executor.num_workers(), executor.name())?;
        log_info!(
            "Running {} trials on {} worker(s)",
            self.sizes.len(),
            executor.num_workers()
        );

        let mut outcomes = Vec::with_capacity(self.sizes.len());
        for &elements in &self.sizes {
            outcomes.push(run_trial(elements, executor, rng, out)?);
            if self.pacing == Pacing::Interactive && elements >= PAUSE_THRESHOLD {
                wait_for_user(out, input)?;
            }
        }

        report::write_summary(out)?;
        out.flush()?;
        Ok(outcomes)
    }
}

/// Prompts the user and blocks until a line (or the end of input) is read.
fn wait_for_user(out: &mut impl Write, input: &mut impl BufRead) -> Result<(), Error> {
    report::write_pause_prompt(out)?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        log_debug!("Reached the end of input while pausing");
    }
    Ok(())
}
