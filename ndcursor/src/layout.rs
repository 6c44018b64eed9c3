/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::index::IndexError;
use crate::index::check_dims;
use crate::index::checked_size;
use crate::index::dense_strides;

/// A container that can describe its own memory layout as a strided
/// affine map from positions (in `ℕⁿ`) to flat offsets (`ℕ¹`):
///
/// ```text
/// offset_of(x) = Σ strides[d] × x[d]
/// ```
///
/// Storage backends implement this so that a
/// [`PlaneCursor`](crate::PlaneCursor) can walk them without
/// knowing how they are laid out.
pub trait StrideProvider {
    /// The extent of each axis.
    fn dimensions(&self) -> &[usize];

    /// The flat-offset step for a unit increment along each axis.
    fn strides(&self) -> &[usize];
}

/// Per-axis strides for an N-dimensional array, computed once and
/// cached for the lifetime of whatever traverses the array.
///
/// A dense table (axis 0 fastest) over `[4, 3, 2]`:
/// ```
/// # use ndcursor::layout::StrideTable;
/// let t = StrideTable::dense(vec![4, 3, 2]).unwrap();
/// assert_eq!(t.strides(), &[1, 4, 12]);
/// assert_eq!(t.offset_of(&[3, 2, 1]), 3 + 2 * 4 + 12);
/// ```
#[derive(Serialize, Deserialize, Clone, Eq, PartialEq, Hash, Debug)]
#[serde(try_from = "Layout", into = "Layout")]
pub struct StrideTable {
    dimensions: Vec<usize>,
    strides: Vec<usize>,
}

impl StrideTable {
    /// Create a table from explicit strides. The table is validated:
    ///   - `dimensions` and `strides` must have the same, nonzero length
    ///   - every dimension must have a nonzero extent
    ///   - strides must be nonoverlapping (each stride has to be at
    ///     least the size of the space spanned by the smaller ones)
    ///   - every offset must fit in an `i64`
    pub fn new(dimensions: Vec<usize>, strides: Vec<usize>) -> Result<Self, IndexError> {
        check_dims(dimensions.len(), strides.len())?;
        check_extents(&dimensions)?;

        let mut combined: Vec<(usize, usize)> =
            strides.iter().cloned().zip(dimensions.iter().cloned()).collect();
        combined.sort();

        let mut total: usize = 1;
        for (stride, size) in combined {
            // Single element axes never move the offset, so their
            // strides are unconstrained.
            if size == 1 {
                continue;
            }
            if total > stride {
                return Err(IndexError::StrideTooSmall {
                    stride,
                    space: total,
                });
            }
            total = stride
                .checked_mul(size)
                .filter(|&span| span <= i64::MAX as usize)
                .ok_or(IndexError::SizeOverflow)?;
        }

        Ok(Self {
            dimensions,
            strides,
        })
    }

    /// Create a dense table with axis 0 varying fastest.
    pub fn dense(dimensions: impl Into<Vec<usize>>) -> Result<Self, IndexError> {
        let dimensions = dimensions.into();
        check_extents(&dimensions)?;
        checked_size(&dimensions)?;
        let strides = dense_strides(&dimensions);
        Ok(Self {
            dimensions,
            strides,
        })
    }

    /// Snapshot the layout of an external container.
    pub fn from_provider<P: StrideProvider + ?Sized>(provider: &P) -> Result<Self, IndexError> {
        Self::new(provider.dimensions().to_vec(), provider.strides().to_vec())
    }

    pub fn num_dimensions(&self) -> usize {
        self.dimensions.len()
    }

    /// The extent of each axis.
    pub fn dimensions(&self) -> &[usize] {
        &self.dimensions
    }

    /// The stride of each axis.
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// The number of addressable positions.
    pub fn len(&self) -> usize {
        self.dimensions.iter().product()
    }

    /// Always false: every axis has a nonzero extent.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether the strides are exactly the dense strides of the
    /// dimensions, i.e. every offset in `0..len()` is used.
    pub fn is_dense(&self) -> bool {
        let mut expected_stride = 1;
        for (stride, size) in self.strides.iter().zip(self.dimensions.iter()) {
            if *stride != expected_stride {
                return false;
            }
            expected_stride *= *size
        }
        true
    }

    /// Flat offset of `position`. Unchecked: `position` must have
    /// one nonnegative in-range coordinate per axis.
    #[inline]
    pub fn offset_of(&self, position: &[i64]) -> usize {
        debug_assert_eq!(position.len(), self.strides.len());
        self.strides
            .iter()
            .zip(position)
            .map(|(s, &p)| s * p as usize)
            .sum()
    }

    /// Checked [`StrideTable::offset_of`].
    pub fn try_offset_of(&self, position: &[i64]) -> Result<usize, IndexError> {
        check_dims(self.num_dimensions(), position.len())?;
        for (dim, (&coord, &size)) in position.iter().zip(&self.dimensions).enumerate() {
            if coord < 0 || coord >= size as i64 {
                return Err(IndexError::PositionOutOfRange {
                    dim,
                    coord,
                    min: 0,
                    max: size as i64 - 1,
                });
            }
        }
        Ok(self.offset_of(position))
    }

    /// Inverse of [`StrideTable::offset_of`]: the position stored at
    /// `offset`, or `None` if no position maps there.
    pub fn position_of(&self, offset: usize) -> Option<Vec<i64>> {
        let mut pos = offset;
        let mut result = vec![0; self.num_dimensions()];

        let mut dims: Vec<_> = self
            .strides
            .iter()
            .zip(self.dimensions.iter().enumerate())
            .collect();
        dims.sort_by_key(|&(stride, _)| *stride);

        // Peel off the largest strides first:
        //   coord[d] = ⌊pos / stride[d]⌋
        //   pos     -= coord[d] × stride[d]
        for &(stride, (d, &size)) in dims.iter().rev() {
            let coord = if size > 1 { pos / stride } else { 0 };
            if coord >= size {
                return None;
            }
            result[d] = coord as i64;
            pos -= coord * stride;
        }

        (pos == 0).then_some(result)
    }
}

impl StrideProvider for StrideTable {
    fn dimensions(&self) -> &[usize] {
        &self.dimensions
    }

    fn strides(&self) -> &[usize] {
        &self.strides
    }
}

impl fmt::Display for StrideTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (d, (size, stride)) in self.dimensions.iter().zip(&self.strides).enumerate() {
            if d > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}:{}", size, stride)?;
        }
        write!(f, "}}")
    }
}

/// Wire form of a [`StrideTable`]; deserialization goes through
/// [`StrideTable::new`].
#[derive(Serialize, Deserialize)]
struct Layout {
    dimensions: Vec<usize>,
    strides: Vec<usize>,
}

impl TryFrom<Layout> for StrideTable {
    type Error = IndexError;

    fn try_from(layout: Layout) -> Result<Self, Self::Error> {
        StrideTable::new(layout.dimensions, layout.strides)
    }
}

impl From<StrideTable> for Layout {
    fn from(table: StrideTable) -> Self {
        Layout {
            dimensions: table.dimensions,
            strides: table.strides,
        }
    }
}

fn check_extents(dimensions: &[usize]) -> Result<(), IndexError> {
    if dimensions.is_empty() {
        return Err(IndexError::NoDimensions);
    }
    if let Some(dim) = dimensions.iter().position(|&n| n == 0) {
        return Err(IndexError::EmptyDimension { dim });
    }
    Ok(())
}
