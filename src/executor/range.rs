// Copyright 2024-2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

/// A fixed partition of `0..num_elements` across `num_workers` workers,
/// without any stealing.
///
/// Worker `id` owns `[id * n / k, (id + 1) * n / k)`. Consecutive workers
/// share a boundary, the first range starts at 0 and the last one ends at `n`,
/// so every index is covered exactly once. Range lengths differ by at most
/// one.
#[derive(Clone, Copy, Debug)]
pub struct FixedRange {
    /// Index of the worker that owns this range.
    id: usize,
    /// Total number of workers.
    num_workers: usize,
}

impl FixedRange {
    /// Returns the range of worker `id` out of `num_workers`.
    pub fn new(id: usize, num_workers: usize) -> Self {
        debug_assert!(id < num_workers);
        Self { id, num_workers }
    }

    /// Bounds of this range for an input of `num_elements` items.
    pub fn bounds(&self, num_elements: usize) -> std::ops::Range<usize> {
        // Widening to u128 keeps `id * num_elements` from overflowing.
        let n = num_elements as u128;
        let k = self.num_workers as u128;
        let start = (self.id as u128 * n / k) as usize;
        let end = ((self.id as u128 + 1) * n / k) as usize;
        start..end
    }

    /// Slices the given input down to this range.
    pub fn slice<'a, T>(&self, input: &'a [T]) -> &'a [T] {
        &input[self.bounds(input.len())]
    }
}

/// Returns the ranges of all `num_workers` workers, in order.
pub fn fixed_ranges(num_workers: usize) -> impl Iterator<Item = FixedRange> {
    (0..num_workers).map(move |id| FixedRange::new(id, num_workers))
}
