/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Conversion between N-dimensional positions and flat indices.
//!
//! Positions are laid out with axis 0 varying fastest ("row by row,
//! plane by plane"). For a dimension vector `[n₀, n₁, ..., nₖ₋₁]` the
//! flat index of a position `p` relative to an origin `min` is
//!
//! ```text
//! index := Σ (p[d] - min[d]) × stride[d]
//! stride[0] := 1
//! stride[d] := stride[d - 1] × n[d - 1]
//! ```
//!
//! and the inverse peels coordinates off the index by successive
//! division and remainder.
//!
//! The plain functions in this module are used inside traversal
//! loops and perform no bounds checking: a position outside the
//! dimension vector, or an index past `∏ n[d]`, produces an
//! unspecified (but memory-safe) result. Use the `try_*` variants
//! when the inputs are not already known to be valid.
//!
//! ```
//! use ndcursor::index::index_to_position;
//! use ndcursor::index::position_to_index;
//!
//! let dims = [3, 2];
//! assert_eq!(position_to_index(&[2, 1], &dims), 5);
//!
//! let mut pos = [0; 2];
//! index_to_position(5, &dims, &mut pos);
//! assert_eq!(pos, [2, 1]);
//! ```

use itertools::izip;

/// The type of error for index conversion and traversal setup.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum IndexError {
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("at least one dimension is required")]
    NoDimensions,

    #[error("dimension {dim} has zero extent")]
    EmptyDimension { dim: usize },

    #[error("invalid bounds in dimension {dim}: min {min} exceeds max {max}")]
    InvalidBounds { dim: usize, min: i64, max: i64 },

    #[error("number of positions overflows the flat index range")]
    SizeOverflow,

    #[error("index {index} out of range {total}")]
    IndexOutOfRange { index: usize, total: usize },

    #[error("cannot advance past last index {last}")]
    PastEnd { last: usize },

    #[error("coordinate {coord} out of range {min}..={max} in dimension {dim}")]
    PositionOutOfRange {
        dim: usize,
        coord: i64,
        min: i64,
        max: i64,
    },

    #[error("dimension {dim} out of range for {ndims}-dimensional space")]
    AxisOutOfRange { dim: usize, ndims: usize },

    #[error("plane axes must differ, got {dim} twice")]
    DuplicateAxis { dim: usize },

    #[error("stride {stride} must be larger than size of previous space {space}")]
    StrideTooSmall { stride: usize, space: usize },
}

/// Returns the dense strides for `dimensions`, axis 0 fastest. The
/// product of `dimensions` must fit in a `usize`; see [`checked_size`].
///
/// ```
/// assert_eq!(ndcursor::index::dense_strides(&[4, 3, 2]), vec![1, 4, 12]);
/// ```
pub fn dense_strides(dimensions: &[usize]) -> Vec<usize> {
    let mut strides = dimensions.to_vec();
    let _ = strides.iter_mut().fold(1, |acc, n| {
        let next = *n * acc;
        *n = acc;
        next
    });
    strides
}

/// Flat index of `position` in a space of size `dimensions` whose
/// origin is zero.
#[inline]
pub fn position_to_index(position: &[i64], dimensions: &[usize]) -> usize {
    debug_assert_eq!(position.len(), dimensions.len());
    // Horner's scheme from the slowest axis down; no stride vector.
    position
        .iter()
        .zip(dimensions)
        .rev()
        .fold(0, |acc, (&p, &n)| acc * n + p as usize)
}

/// Flat index of `position` in a space of size `dimensions` whose
/// origin is `min`.
#[inline]
pub fn position_to_index_with_offset(position: &[i64], dimensions: &[usize], min: &[i64]) -> usize {
    debug_assert_eq!(position.len(), dimensions.len());
    debug_assert_eq!(min.len(), dimensions.len());
    izip!(position, dimensions, min)
        .rev()
        .fold(0, |acc, (&p, &n, &m)| acc * n + (p - m) as usize)
}

/// Writes the position of `index` in a space of size `dimensions`
/// (origin zero) into `position`.
///
/// The slowest axis receives whatever is left of the index after the
/// faster axes have been peeled off, so an index past the end shows
/// up as an out-of-range last coordinate rather than wrapping.
#[inline]
pub fn index_to_position(index: usize, dimensions: &[usize], position: &mut [i64]) {
    debug_assert_eq!(position.len(), dimensions.len());
    let Some((last, leading)) = position.split_last_mut() else {
        return;
    };
    let mut rest = index;
    for (p, &n) in leading.iter_mut().zip(dimensions) {
        *p = (rest % n) as i64;
        rest /= n;
    }
    *last = rest as i64;
}

/// Writes the position of `index` in a space of size `dimensions`
/// whose origin is `min` into `position`.
#[inline]
pub fn index_to_position_with_offset(
    index: usize,
    dimensions: &[usize],
    min: &[i64],
    position: &mut [i64],
) {
    debug_assert_eq!(position.len(), dimensions.len());
    debug_assert_eq!(min.len(), dimensions.len());
    let Some((last, leading)) = position.split_last_mut() else {
        return;
    };
    let mut rest = index;
    for (p, &n, &m) in izip!(leading.iter_mut(), dimensions, min) {
        *p = (rest % n) as i64 + m;
        rest /= n;
    }
    *last = rest as i64 + min[min.len() - 1];
}

/// The coordinate along axis `dim` of `index` in a space of size
/// `dimensions` (origin zero).
#[inline]
pub fn index_to_position_at(index: usize, dimensions: &[usize], dim: usize) -> i64 {
    let step: usize = dimensions[..dim].iter().product();
    let rest = index / step;
    if dim + 1 == dimensions.len() {
        rest as i64
    } else {
        (rest % dimensions[dim]) as i64
    }
}

/// Checked [`position_to_index_with_offset`]: fails if the vectors
/// disagree in length or if any coordinate lies outside
/// `min[d]..min[d] + dimensions[d]`.
pub fn try_position_to_index(
    position: &[i64],
    dimensions: &[usize],
    min: &[i64],
) -> Result<usize, IndexError> {
    check_dims(dimensions.len(), position.len())?;
    check_dims(dimensions.len(), min.len())?;
    for (dim, (&coord, &n, &m)) in izip!(position, dimensions, min).enumerate() {
        let max = m.saturating_add((n as i64).saturating_sub(1));
        if coord < m || coord > max {
            return Err(IndexError::PositionOutOfRange {
                dim,
                coord,
                min: m,
                max,
            });
        }
    }
    Ok(position_to_index_with_offset(position, dimensions, min))
}

/// Checked [`index_to_position_with_offset`]: fails if the vectors
/// disagree in length or if `index >= ∏ dimensions`.
pub fn try_index_to_position(
    index: usize,
    dimensions: &[usize],
    min: &[i64],
    position: &mut [i64],
) -> Result<(), IndexError> {
    check_dims(dimensions.len(), position.len())?;
    check_dims(dimensions.len(), min.len())?;
    let total = dimensions.iter().product();
    if index >= total {
        return Err(IndexError::IndexOutOfRange { index, total });
    }
    index_to_position_with_offset(index, dimensions, min, position);
    Ok(())
}

/// The number of positions in a space of size `dimensions`, provided
/// every flat index of the space fits in an `i64`.
///
/// ```
/// use ndcursor::index::IndexError;
/// use ndcursor::index::checked_size;
///
/// assert_eq!(checked_size(&[4, 3, 2]).unwrap(), 24);
/// assert!(matches!(
///     checked_size(&[1 << 32, 1 << 32]),
///     Err(IndexError::SizeOverflow)
/// ));
/// ```
pub fn checked_size(dimensions: &[usize]) -> Result<usize, IndexError> {
    dimensions
        .iter()
        .try_fold(1usize, |acc, &n| acc.checked_mul(n))
        .filter(|&total| total <= i64::MAX as usize)
        .ok_or(IndexError::SizeOverflow)
}

pub(crate) fn check_dims(expected: usize, got: usize) -> Result<(), IndexError> {
    if expected != got {
        return Err(IndexError::DimensionMismatch { expected, got });
    }
    Ok(())
}
