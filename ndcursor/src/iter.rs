/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Flat-order iteration over an [`Interval`]: row by row, plane by
//! plane, cube by cube, ...
//!
//! Two flavors are provided:
//!
//! - [`IntervalIterator`] only maintains the flat index. Positions are
//!   computed from the index on request, which suits sparse
//!   localization (e.g. localizing only under an external
//!   condition).
//! - [`LocalizingIntervalIterator`] keeps the position up to date on
//!   every step with odometer-style carry propagation, which suits
//!   dense sampling where every position is read.
//!
//! Flat indices are interval-local: the first position of the
//! interval has index 0, regardless of `min`.

use itertools::izip;

use crate::cursor::Coordinate;
use crate::cursor::Cursor;
use crate::cursor::Localizable;
use crate::cursor::check_buffer;
use crate::index::IndexError;
use crate::index::dense_strides;
use crate::index::index_to_position_with_offset;
use crate::interval::Interval;

/// A cursor over the flat indices of an [`Interval`].
#[derive(Clone, Debug)]
pub struct IntervalIterator {
    interval: Interval,
    /// `steps[d]` is the flat distance between neighbors along axis `d`.
    steps: Vec<usize>,
    last_index: i64,
    /// One before the current position's index after a reset, hence signed.
    index: i64,
}

impl IntervalIterator {
    pub fn new(interval: Interval) -> Self {
        tracing::debug!(%interval, "creating interval iterator");
        let steps = dense_strides(interval.dimensions());
        let last_index = interval.size() as i64 - 1;
        Self {
            interval,
            steps,
            last_index,
            index: -1,
        }
    }

    /// Iterates `0..dimensions[d]` on every axis.
    pub fn from_dimensions(dimensions: &[usize]) -> Result<Self, IndexError> {
        Ok(Self::new(Interval::from_dimensions(dimensions)?))
    }

    /// Iterates the inclusive bounds `min[d]..=max[d]`.
    pub fn from_bounds(min: Vec<i64>, max: Vec<i64>) -> Result<Self, IndexError> {
        Ok(Self::new(Interval::new(min, max)?))
    }

    pub fn interval(&self) -> &Interval {
        &self.interval
    }

    /// The number of positions visited by a full traversal.
    pub fn size(&self) -> usize {
        self.interval.size()
    }

    fn check_jump(&self, steps: usize) -> Result<(), IndexError> {
        // Saturate so that absurd jumps are reported, not wrapped.
        let target = i64::try_from(steps).map_or(i64::MAX, |k| self.index.saturating_add(k));
        if target > self.last_index {
            return Err(IndexError::PastEnd {
                last: self.last_index(),
            });
        }
        Ok(())
    }
}

impl Cursor for IntervalIterator {
    #[inline]
    fn reset(&mut self) {
        self.index = -1;
    }

    #[inline]
    fn fwd(&mut self) {
        self.index += 1;
    }

    #[inline]
    fn jump_fwd(&mut self, steps: usize) {
        self.index += steps as i64;
    }

    #[inline]
    fn has_next(&self) -> bool {
        self.index < self.last_index
    }

    #[inline]
    fn index(&self) -> usize {
        debug_assert!(self.index >= 0, "cursor has not been advanced");
        self.index as usize
    }

    fn last_index(&self) -> usize {
        self.last_index as usize
    }

    fn try_jump_fwd(&mut self, steps: usize) -> Result<(), IndexError> {
        self.check_jump(steps)?;
        self.jump_fwd(steps);
        Ok(())
    }
}

impl Localizable for IntervalIterator {
    fn num_dimensions(&self) -> usize {
        self.steps.len()
    }

    fn long_position(&self, dim: usize) -> i64 {
        let rest = self.index() / self.steps[dim];
        let coord = if dim + 1 == self.steps.len() {
            rest
        } else {
            rest % self.interval.dimensions()[dim]
        };
        coord as i64 + self.interval.min()[dim]
    }

    fn localize<T: Coordinate>(&self, position: &mut [T]) {
        let n = self.num_dimensions();
        check_buffer(n, position.len());
        let mut rest = self.index();
        for (d, (p, &size, &min)) in izip!(
            position[..n].iter_mut(),
            self.interval.dimensions(),
            self.interval.min()
        )
        .enumerate()
        {
            let coord = if d + 1 == n { rest } else { rest % size };
            *p = T::from_i64(coord as i64 + min);
            rest /= size;
        }
    }
}

/// A cursor over an [`Interval`] that tracks the full position at
/// every step.
///
/// ```
/// use ndcursor::Cursor;
/// use ndcursor::LocalizingIntervalIterator;
///
/// let mut it = LocalizingIntervalIterator::from_dimensions(&[3, 2]).unwrap();
/// let mut positions = Vec::new();
/// while it.has_next() {
///     it.fwd();
///     positions.push(it.position().to_vec());
/// }
/// assert_eq!(
///     positions,
///     vec![[0, 0], [1, 0], [2, 0], [0, 1], [1, 1], [2, 1]],
/// );
/// ```
#[derive(Clone, Debug)]
pub struct LocalizingIntervalIterator {
    iter: IntervalIterator,
    position: Vec<i64>,
}

impl LocalizingIntervalIterator {
    pub fn new(interval: Interval) -> Self {
        let position = vec![0; interval.num_dimensions()];
        let mut it = Self {
            iter: IntervalIterator::new(interval),
            position,
        };
        it.reset();
        it
    }

    /// Iterates `0..dimensions[d]` on every axis.
    pub fn from_dimensions(dimensions: &[usize]) -> Result<Self, IndexError> {
        Ok(Self::new(Interval::from_dimensions(dimensions)?))
    }

    /// Iterates the inclusive bounds `min[d]..=max[d]`.
    pub fn from_bounds(min: Vec<i64>, max: Vec<i64>) -> Result<Self, IndexError> {
        Ok(Self::new(Interval::new(min, max)?))
    }

    pub fn interval(&self) -> &Interval {
        self.iter.interval()
    }

    /// The number of positions visited by a full traversal.
    pub fn size(&self) -> usize {
        self.iter.size()
    }

    /// The current position. Borrowed, so it cannot be held across
    /// the next step; copy it out with `to_vec()` or
    /// [`Localizable::localize`] to keep it.
    pub fn position(&self) -> &[i64] {
        &self.position
    }
}

impl Cursor for LocalizingIntervalIterator {
    /// Axis 0 is left one before `min[0]`, saturating at `i64::MIN`.
    fn reset(&mut self) {
        self.iter.reset();
        self.position.copy_from_slice(self.iter.interval.min());
        self.position[0] = self.position[0].saturating_sub(1);
    }

    #[inline]
    fn fwd(&mut self) {
        self.iter.fwd();
        let interval = &self.iter.interval;
        if self.iter.index == 0 {
            self.position.copy_from_slice(interval.min());
            return;
        }
        let Some((last, leading)) = self.position.split_last_mut() else {
            return;
        };
        for (p, &min, &max) in izip!(leading.iter_mut(), interval.min(), interval.max()) {
            if *p < max {
                *p += 1;
                return;
            }
            *p = min;
        }
        // The slowest axis never wraps.
        *last = last.saturating_add(1);
    }

    fn jump_fwd(&mut self, steps: usize) {
        if steps == 0 {
            return;
        }
        self.iter.jump_fwd(steps);
        let interval = &self.iter.interval;
        index_to_position_with_offset(
            self.iter.index(),
            interval.dimensions(),
            interval.min(),
            &mut self.position,
        );
    }

    #[inline]
    fn has_next(&self) -> bool {
        self.iter.has_next()
    }

    #[inline]
    fn index(&self) -> usize {
        self.iter.index()
    }

    fn last_index(&self) -> usize {
        self.iter.last_index()
    }

    fn try_jump_fwd(&mut self, steps: usize) -> Result<(), IndexError> {
        self.iter.check_jump(steps)?;
        self.jump_fwd(steps);
        Ok(())
    }
}

impl Localizable for LocalizingIntervalIterator {
    fn num_dimensions(&self) -> usize {
        self.position.len()
    }

    #[inline]
    fn long_position(&self, dim: usize) -> i64 {
        self.position[dim]
    }

    fn localize<T: Coordinate>(&self, position: &mut [T]) {
        check_buffer(self.position.len(), position.len());
        for (p, &coord) in position.iter_mut().zip(&self.position) {
            *p = T::from_i64(coord);
        }
    }
}
