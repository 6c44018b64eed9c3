/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::fmt;
use std::ops::RangeInclusive;

use itertools::izip;
use serde::Deserialize;
use serde::Serialize;

use crate::index::IndexError;
use crate::index::check_dims;
use crate::index::checked_size;

/// A hyperrectangular region of N-dimensional integer space, given
/// by inclusive per-axis bounds `min[d]..=max[d]`.
///
/// Intervals are validated on construction: `min` and `max` have the
/// same, nonzero length and `min[d] <= max[d]` on every axis. The
/// number of positions must fit in an `i64` so every position has a
/// flat index.
///
/// ```
/// # use ndcursor::interval::Interval;
/// let i = Interval::new(vec![1, -2], vec![3, 2]).unwrap();
/// assert_eq!(i.dimensions(), &[3, 5]);
/// assert_eq!(i.size(), 15);
/// assert_eq!(i.to_string(), "[1..=3, -2..=2]");
/// ```
#[derive(Serialize, Deserialize, Clone, Eq, PartialEq, Hash, Debug)]
#[serde(try_from = "Bounds", into = "Bounds")]
pub struct Interval {
    min: Vec<i64>,
    max: Vec<i64>,
    /// Cached `max[d] - min[d] + 1`.
    dimensions: Vec<usize>,
}

impl Interval {
    /// Creates an interval from its inclusive bounds.
    pub fn new(min: Vec<i64>, max: Vec<i64>) -> Result<Self, IndexError> {
        check_dims(min.len(), max.len())?;
        if min.is_empty() {
            return Err(IndexError::NoDimensions);
        }
        for (dim, (&lo, &hi)) in min.iter().zip(&max).enumerate() {
            if lo > hi {
                return Err(IndexError::InvalidBounds {
                    dim,
                    min: lo,
                    max: hi,
                });
            }
        }
        let dimensions = min
            .iter()
            .zip(&max)
            .map(|(&lo, &hi)| {
                usize::try_from(hi.abs_diff(lo))
                    .ok()
                    .and_then(|extent| extent.checked_add(1))
                    .ok_or(IndexError::SizeOverflow)
            })
            .collect::<Result<Vec<_>, _>>()?;
        checked_size(&dimensions)?;
        Ok(Self {
            min,
            max,
            dimensions,
        })
    }

    /// Creates the interval `0..dimensions[d]` on every axis.
    pub fn from_dimensions(dimensions: &[usize]) -> Result<Self, IndexError> {
        if dimensions.is_empty() {
            return Err(IndexError::NoDimensions);
        }
        if let Some(dim) = dimensions.iter().position(|&n| n == 0) {
            return Err(IndexError::EmptyDimension { dim });
        }
        checked_size(dimensions)?;
        Ok(Self {
            min: vec![0; dimensions.len()],
            max: dimensions.iter().map(|&n| n as i64 - 1).collect(),
            dimensions: dimensions.to_vec(),
        })
    }

    /// Creates an interval from one inclusive range per axis.
    ///
    /// ```
    /// # use ndcursor::interval::Interval;
    /// let i = Interval::from_ranges([0..=2, 5..=5]).unwrap();
    /// assert_eq!(i.dimensions(), &[3, 1]);
    /// ```
    pub fn from_ranges<I>(ranges: I) -> Result<Self, IndexError>
    where
        I: IntoIterator<Item = RangeInclusive<i64>>,
    {
        let (min, max) = ranges
            .into_iter()
            .map(|r| (*r.start(), *r.end()))
            .unzip();
        Self::new(min, max)
    }

    pub fn num_dimensions(&self) -> usize {
        self.min.len()
    }

    /// The lower bound of each axis.
    pub fn min(&self) -> &[i64] {
        &self.min
    }

    /// The (inclusive) upper bound of each axis.
    pub fn max(&self) -> &[i64] {
        &self.max
    }

    /// The extent of each axis.
    pub fn dimensions(&self) -> &[usize] {
        &self.dimensions
    }

    /// The number of positions in the interval.
    pub fn size(&self) -> usize {
        self.dimensions.iter().product()
    }

    /// Whether `position` lies inside the interval. Positions of the
    /// wrong dimensionality are never contained.
    pub fn contains(&self, position: &[i64]) -> bool {
        position.len() == self.num_dimensions()
            && izip!(position, &self.min, &self.max).all(|(p, lo, hi)| lo <= p && p <= hi)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (d, (lo, hi)) in self.min.iter().zip(&self.max).enumerate() {
            if d > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}..={}", lo, hi)?;
        }
        write!(f, "]")
    }
}

/// Wire form of an [`Interval`]; deserialization goes through
/// [`Interval::new`] so the bounds invariant always holds.
#[derive(Serialize, Deserialize)]
struct Bounds {
    min: Vec<i64>,
    max: Vec<i64>,
}

impl TryFrom<Bounds> for Interval {
    type Error = IndexError;

    fn try_from(bounds: Bounds) -> Result<Self, Self::Error> {
        Interval::new(bounds.min, bounds.max)
    }
}

impl From<Interval> for Bounds {
    fn from(interval: Interval) -> Self {
        Bounds {
            min: interval.min,
            max: interval.max,
        }
    }
}
