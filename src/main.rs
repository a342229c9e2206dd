// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Compares sequential and parallel summation over increasing array sizes and
//! explains the results.

use clap::{Parser, ValueEnum};
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use std::io;
use std::num::NonZeroUsize;
use std::process::ExitCode;
use sumbench::driver::{Benchmark, Pacing};
use sumbench::executor::{CpuPinningPolicy, ExecutorBuilder, ExecutorKind, ThreadCount};

fn main() -> ExitCode {
    #[cfg(feature = "log")]
    env_logger::init();

    let cli = Cli::parse();

    let builder = ExecutorBuilder {
        num_threads: match cli.num_threads {
            Some(num_threads) => ThreadCount::Count(num_threads),
            None => ThreadCount::AvailableParallelism,
        },
        cpu_pinning: match cli.cpu_pinning {
            CpuPinningCli::No => CpuPinningPolicy::No,
            CpuPinningCli::IfSupported => CpuPinningPolicy::IfSupported,
            CpuPinningCli::Always => CpuPinningPolicy::Always,
        },
    };
    let kind = match cli.executor {
        ExecutorCli::Scoped => ExecutorKind::Scoped,
        ExecutorCli::Rayon => ExecutorKind::Rayon,
    };
    let mut executor = match builder.build(kind) {
        Ok(executor) => executor,
        Err(e) => {
            eprintln!("Failed to build the {kind:?} executor: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut rng = match cli.seed {
        Some(seed) => ChaCha12Rng::seed_from_u64(seed),
        None => ChaCha12Rng::from_os_rng(),
    };

    let benchmark = Benchmark {
        pacing: if cli.no_pause {
            Pacing::Disabled
        } else {
            Pacing::Interactive
        },
        ..Benchmark::default()
    };

    let stdout = io::stdout();
    let stdin = io::stdin();
    match benchmark.run(&mut executor, &mut rng, &mut stdout.lock(), &mut stdin.lock()) {
        Ok(_outcomes) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Number of worker threads. Default to the available parallelism.
    #[arg(long, env = "SUMBENCH_NUM_THREADS")]
    num_threads: Option<NonZeroUsize>,

    /// Executor running the parallel sum.
    #[arg(long, value_enum, default_value_t = ExecutorCli::Scoped)]
    executor: ExecutorCli,

    /// Policy to pin worker threads to CPUs.
    #[arg(long, value_enum, default_value_t = CpuPinningCli::No)]
    cpu_pinning: CpuPinningCli,

    /// Don't wait for Enter after large trials.
    #[arg(long, default_value_t = false)]
    no_pause: bool,

    /// Seed for the random sample values. Default to a seed from the OS.
    #[arg(long)]
    seed: Option<u64>,
}

/// Executor running the parallel sum.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ExecutorCli {
    /// Threads spawned and joined for each sum.
    Scoped,
    /// A persistent Rayon thread pool.
    Rayon,
}

/// Policy to pin worker threads to CPUs.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum CpuPinningCli {
    /// Don't pin threads.
    No,
    /// Pin threads where supported.
    IfSupported,
    /// Pin threads, failing where unsupported.
    Always,
}
