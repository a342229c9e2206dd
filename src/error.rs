// Copyright 2024 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::collections::TryReserveError;
use std::io;
use thiserror::Error;

/// Errors raised while running the benchmark.
#[derive(Debug, Error)]
pub enum Error {
    /// The sample buffer for a trial couldn't be reserved.
    ///
    /// This is recovered at the trial boundary: the trial reports it and the
    /// driver moves on to the next size.
    #[error("could not allocate memory for {elements} elements")]
    Allocation {
        /// Number of elements that were requested.
        elements: usize,
        /// Underlying reservation failure.
        #[source]
        source: TryReserveError,
    },
    /// Writing the report or reading pacing input failed.
    #[error("report I/O failed: {0}")]
    Io(#[from] io::Error),
}
