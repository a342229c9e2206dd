// Copyright 2024 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Human-readable rendering of the benchmark report.

use crate::sample::mebibytes;
use crate::trial::TrialResult;
use std::io::{self, Write};
use std::mem::size_of;
use std::num::NonZeroUsize;

/// Causes of poor parallel speedup, each with its explanatory bullet points.
/// Printed verbatim after all the trials.
pub const OVERHEAD_CAUSES: [(&str, &[&str]); 5] = [
    (
        "INSUFFICIENT MEMORY",
        &[
            "Large arrays require a lot of RAM",
            "Allocating the buffer can fail when not enough memory is available",
            "100,000 integers = ~400 KB",
            "1,000,000 integers = ~4 MB",
            "100,000,000 integers = ~400 MB",
        ],
    ),
    (
        "PARALLELIZATION OVERHEAD",
        &[
            "Creating and synchronizing threads has a cost",
            "For small problems, the overhead outweighs the benefit",
            "The reduction requires additional synchronization",
        ],
    ),
    (
        "CACHE AND DATA LOCALITY",
        &[
            "Large arrays don't fit in the L1/L2/L3 caches",
            "Multiple threads compete for memory bandwidth",
            "False sharing on shared variables",
        ],
    ),
    (
        "LOAD BALANCING",
        &[
            "Uneven distribution of work among threads",
            "Some threads finish before others",
        ],
    ),
    (
        "HARDWARE LIMITATIONS",
        &[
            "Limited memory bandwidth",
            "Limited number of physical cores",
            "Contention on the memory bus",
        ],
    ),
];

/// Writes the title and the system information.
pub fn write_header(
    out: &mut impl Write,
    num_workers: NonZeroUsize,
    executor_name: &str,
) -> io::Result<()> {
    writeln!(out, "ANALYSIS: why does parallel summation degrade on large arrays?")?;
    writeln!(out, "==============================================================")?;
    writeln!(out, "System information:")?;
    writeln!(out, "  Available worker threads: {num_workers} ({executor_name})")?;
    writeln!(out, "  Size of an element: {} bytes", size_of::<i32>())
}

/// Writes the banner that opens a trial.
pub fn write_trial_header(out: &mut impl Write, elements: usize) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "=== TRIAL WITH N = {elements} ===")
}

/// Writes the diagnostic for a trial whose buffer couldn't be allocated.
pub fn write_allocation_failure(out: &mut impl Write, elements: usize) -> io::Result<()> {
    writeln!(out, "ERROR: could not allocate memory for {elements} elements")?;
    writeln!(out, "Required memory: {:.2} MiB", mebibytes(elements))
}

/// Writes the confirmation that a trial's buffer was allocated.
pub fn write_allocated(out: &mut impl Write, elements: usize) -> io::Result<()> {
    writeln!(out, "Memory allocated successfully: {:.2} MiB", mebibytes(elements))
}

/// Writes the measurements, the verdict and the speedup of a completed trial.
///
/// The speedup line is skipped when the sequential time is zero, and the
/// slowdown warning is only written when the parallel run was slower.
pub fn write_results(out: &mut impl Write, result: &TrialResult) -> io::Result<()> {
    writeln!(out, "Results:")?;
    writeln!(
        out,
        "  Sequential sum: {} (time: {:.6} s)",
        result.sequential_sum,
        result.sequential_time.as_secs_f64()
    )?;
    writeln!(
        out,
        "  Parallel sum:   {} (time: {:.6} s)",
        result.parallel_sum,
        result.parallel_time.as_secs_f64()
    )?;
    writeln!(out, "  Verification: {}", result.verdict())?;
    if let Some(speedup) = result.speedup() {
        writeln!(out, "  Speedup: {speedup:.2}x")?;
        if result.is_slowdown() {
            writeln!(out, "  WARNING: the parallel version is SLOWER")?;
        }
    }
    Ok(())
}

/// Writes the prompt shown before waiting for the user.
pub fn write_pause_prompt(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Press Enter to continue...")
}

/// Writes the closing analysis of overhead causes.
pub fn write_summary(out: &mut impl Write) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "=== ANALYSIS OF POTENTIAL PROBLEMS ===")?;
    for (i, (title, bullets)) in OVERHEAD_CAUSES.iter().enumerate() {
        if i != 0 {
            writeln!(out)?;
        }
        writeln!(out, "{}. {title}:", i + 1)?;
        for bullet in bullets.iter() {
            writeln!(out, "   - {bullet}")?;
        }
    }
    Ok(())
}
