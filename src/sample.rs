// Copyright 2024 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Sample buffers: fallible allocation and random initialization.

use crate::error::Error;
use crate::macros::log_debug;
use rand::Rng;
use std::mem::size_of;
use std::ops::RangeInclusive;

/// Range of the values written into a sample buffer.
pub const VALUE_RANGE: RangeInclusive<i32> = 1..=100;

const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

/// Returns the memory footprint of `elements` samples, in MiB.
pub fn mebibytes(elements: usize) -> f64 {
    elements as f64 * size_of::<i32>() as f64 / BYTES_PER_MIB
}

/// Fills the given slice with values drawn uniformly from [`VALUE_RANGE`].
pub fn fill_uniform(samples: &mut [i32], rng: &mut impl Rng) {
    for x in samples.iter_mut() {
        *x = rng.random_range(VALUE_RANGE);
    }
}

/// An owned buffer of samples, alive for the duration of one trial.
#[derive(Debug)]
pub struct SampleBuffer {
    samples: Vec<i32>,
}

impl SampleBuffer {
    /// Reserves a zero-filled buffer of exactly `elements` samples.
    ///
    /// Fails with [`Error::Allocation`] instead of aborting the process when
    /// the memory can't be obtained.
    pub fn allocate(elements: usize) -> Result<Self, Error> {
        let mut samples = Vec::new();
        samples
            .try_reserve_exact(elements)
            .map_err(|source| Error::Allocation { elements, source })?;
        samples.resize(elements, 0);
        log_debug!("Allocated {elements} samples ({:.2} MiB)", mebibytes(elements));
        Ok(Self { samples })
    }

    /// Overwrites every sample with a fresh random value.
    pub fn initialize(&mut self, rng: &mut impl Rng) {
        fill_uniform(&mut self.samples, rng);
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the buffer holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Read-only view of the samples.
    pub fn as_slice(&self) -> &[i32] {
        &self.samples
    }
}
