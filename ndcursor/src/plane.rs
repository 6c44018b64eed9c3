/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Traversal of a single 2-D plane of an N-dimensional array.
//!
//! A [`PlaneCursor`] visits the cells of the plane spanned by two
//! axes `A` and `B`, with every other coordinate held fixed. Axis `A`
//! varies fastest. The flat offset is maintained incrementally from
//! the cached strides of the two axes:
//!
//! ```text
//! step along A:       offset += stride_a
//! wrap A, step B:     offset += stride_b - (size_a - 1) × stride_a
//! ```
//!
//! Without a second axis the plane degenerates to a line along `A`.

use crate::cursor::Cursor;
use crate::cursor::Localizable;
use crate::index::IndexError;
use crate::index::check_dims;
use crate::layout::StrideProvider;
use crate::layout::StrideTable;

/// A cursor over one plane of a strided array.
///
/// ```
/// use ndcursor::Cursor;
/// use ndcursor::PlaneCursor;
///
/// // The plane x = 1 of a 2 x 3 x 2 volume, walking y fastest.
/// let mut cursor = PlaneCursor::dense(vec![2, 3, 2]).unwrap();
/// cursor.reset_plane(1, Some(2), &[1, 0, 0]).unwrap();
/// let offsets: Vec<_> = cursor.indices().collect();
/// assert_eq!(offsets, vec![1, 3, 5, 7, 9, 11]);
/// ```
#[derive(Clone, Debug)]
pub struct PlaneCursor {
    table: StrideTable,
    dim_a: usize,
    /// `None` when traversing a line.
    dim_b: Option<usize>,
    size_a: i64,
    size_b: i64,
    stride_a: i64,
    stride_b: i64,
    /// Position of the first cell; `reset` returns here.
    origin: Vec<i64>,
    position: Vec<i64>,
    start_index: i64,
    index: i64,
    max_index: i64,
}

impl PlaneCursor {
    /// Creates a cursor over `table`, set to the plane spanned by axes
    /// 0 and 1 through the origin (the line along axis 0 for 1-D
    /// tables).
    pub fn new(table: StrideTable) -> Self {
        let n = table.num_dimensions();
        let mut cursor = Self {
            table,
            dim_a: 0,
            dim_b: None,
            size_a: 1,
            size_b: 1,
            stride_a: 0,
            stride_b: 0,
            origin: vec![0; n],
            position: vec![0; n],
            start_index: 0,
            index: 0,
            max_index: 0,
        };
        cursor.configure(0, (n > 1).then_some(1));
        cursor
    }

    /// A cursor over a dense array, axis 0 fastest.
    pub fn dense(dimensions: impl Into<Vec<usize>>) -> Result<Self, IndexError> {
        Ok(Self::new(StrideTable::dense(dimensions)?))
    }

    /// A cursor over the layout reported by `provider`.
    pub fn from_provider<P: StrideProvider + ?Sized>(provider: &P) -> Result<Self, IndexError> {
        Ok(Self::new(StrideTable::from_provider(provider)?))
    }

    pub fn table(&self) -> &StrideTable {
        &self.table
    }

    /// The axes of the current plane.
    pub fn plane_axes(&self) -> (usize, Option<usize>) {
        (self.dim_a, self.dim_b)
    }

    /// The live position. Coordinates along the plane axes change with
    /// every step; all others are fixed.
    pub fn position(&self) -> &[i64] {
        &self.position
    }

    /// Restarts the cursor on the plane spanned by `dim_a` and `dim_b`
    /// through `fixed`. The entries of `fixed` along the plane axes are
    /// ignored. A `dim_b` of `None`, or one past the last axis, selects
    /// the line along `dim_a`.
    pub fn reset_plane(
        &mut self,
        dim_a: usize,
        dim_b: Option<usize>,
        fixed: &[i64],
    ) -> Result<(), IndexError> {
        let ndims = self.table.num_dimensions();
        check_dims(ndims, fixed.len())?;
        if dim_a >= ndims {
            return Err(IndexError::AxisOutOfRange { dim: dim_a, ndims });
        }
        let dim_b = dim_b.filter(|&b| b < ndims);
        if dim_b == Some(dim_a) {
            return Err(IndexError::DuplicateAxis { dim: dim_a });
        }
        for (dim, (&coord, &size)) in fixed.iter().zip(self.table.dimensions()).enumerate() {
            if dim == dim_a || Some(dim) == dim_b {
                continue;
            }
            if coord < 0 || coord >= size as i64 {
                return Err(IndexError::PositionOutOfRange {
                    dim,
                    coord,
                    min: 0,
                    max: size as i64 - 1,
                });
            }
        }

        self.origin.copy_from_slice(fixed);
        self.configure(dim_a, dim_b);
        Ok(())
    }

    /// Restarts the cursor on the plane spanned by `dim_a` and `dim_b`
    /// through the origin.
    pub fn reset_axes(&mut self, dim_a: usize, dim_b: Option<usize>) -> Result<(), IndexError> {
        let fixed = vec![0; self.table.num_dimensions()];
        self.reset_plane(dim_a, dim_b, &fixed)
    }

    /// Sets up the plane geometry. Axes must already be validated and
    /// `origin` must hold in-range fixed coordinates.
    fn configure(&mut self, dim_a: usize, dim_b: Option<usize>) {
        let dims = self.table.dimensions();
        let strides = self.table.strides();
        // An axis of extent 1 never moves, whatever its stride.
        let stride = |d: usize| if dims[d] > 1 { strides[d] as i64 } else { 0 };

        self.dim_a = dim_a;
        self.dim_b = dim_b;
        self.size_a = dims[dim_a] as i64;
        self.stride_a = stride(dim_a);
        self.origin[dim_a] = 0;
        match dim_b {
            Some(b) => {
                self.size_b = dims[b] as i64;
                self.stride_b = stride(b);
                self.origin[b] = 0;
            }
            None => {
                self.size_b = 1;
                self.stride_b = 0;
            }
        }

        let first = self.table.offset_of(&self.origin) as i64;
        self.start_index = first - self.stride_a;
        self.max_index =
            first + (self.size_a - 1) * self.stride_a + (self.size_b - 1) * self.stride_b;

        tracing::debug!(
            table = %self.table,
            dim_a,
            ?dim_b,
            origin = ?self.origin,
            "reset plane cursor"
        );
        self.reset();
    }
}

impl Cursor for PlaneCursor {
    fn reset(&mut self) {
        self.position.copy_from_slice(&self.origin);
        self.position[self.dim_a] = -1;
        self.index = self.start_index;
    }

    #[inline]
    fn fwd(&mut self) {
        let a = self.dim_a;
        if self.position[a] < self.size_a - 1 {
            self.position[a] += 1;
            self.index += self.stride_a;
        } else if let Some(b) = self.dim_b {
            if self.position[b] < self.size_b - 1 {
                self.position[a] = 0;
                self.position[b] += 1;
                self.index += self.stride_b - (self.size_a - 1) * self.stride_a;
            }
        }
    }

    /// Decided from the position rather than the offset, since
    /// distinct cells may share an offset under zero strides.
    #[inline]
    fn has_next(&self) -> bool {
        self.position[self.dim_a] < self.size_a - 1
            || self
                .dim_b
                .is_some_and(|b| self.position[b] < self.size_b - 1)
    }

    #[inline]
    fn index(&self) -> usize {
        debug_assert!(self.index >= 0, "cursor has not been advanced");
        self.index as usize
    }

    fn last_index(&self) -> usize {
        self.max_index as usize
    }
}

impl Localizable for PlaneCursor {
    fn num_dimensions(&self) -> usize {
        self.position.len()
    }

    #[inline]
    fn long_position(&self, dim: usize) -> i64 {
        self.position[dim]
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::index::position_to_index;

    fn walk(cursor: &mut PlaneCursor) -> Vec<(usize, Vec<i64>)> {
        let mut seen = Vec::new();
        while cursor.has_next() {
            cursor.fwd();
            seen.push((cursor.index(), cursor.position().to_vec()));
        }
        seen
    }

    #[test]
    fn test_default_plane() {
        let mut cursor = PlaneCursor::dense(vec![3, 2]).unwrap();
        assert_eq!(cursor.plane_axes(), (0, Some(1)));
        let seen = walk(&mut cursor);
        assert_eq!(
            seen,
            vec![
                (0, vec![0, 0]),
                (1, vec![1, 0]),
                (2, vec![2, 0]),
                (3, vec![0, 1]),
                (4, vec![1, 1]),
                (5, vec![2, 1]),
            ]
        );
    }

    #[test]
    fn test_plane_in_volume() {
        let dims = [4, 3, 2];
        let mut cursor = PlaneCursor::dense(dims.to_vec()).unwrap();
        cursor.reset_plane(0, Some(2), &[3, 1, 0]).unwrap();
        let seen = walk(&mut cursor);
        assert_eq!(seen.len(), 4 * 2);
        for (index, position) in &seen {
            assert_eq!(position[1], 1);
            assert_eq!(*index, position_to_index(position, &dims));
        }
        assert_eq!(seen[0].1, vec![0, 1, 0]);
        assert_eq!(seen[4].1, vec![0, 1, 1]);
        assert_eq!(cursor.last_index(), 3 + 4 + 12);
    }

    #[test]
    fn test_transposed_plane() {
        let dims = [3, 3];
        let mut cursor = PlaneCursor::dense(dims.to_vec()).unwrap();
        cursor.reset_axes(1, Some(0)).unwrap();
        let indices: Vec<_> = cursor.indices().collect();
        assert_eq!(indices, vec![0, 3, 6, 1, 4, 7, 2, 5, 8]);
    }

    #[test]
    fn test_line() {
        let mut cursor = PlaneCursor::dense(vec![3, 4]).unwrap();
        cursor.reset_plane(1, None, &[2, 0]).unwrap();
        assert_eq!(cursor.plane_axes(), (1, None));
        let seen = walk(&mut cursor);
        assert_eq!(
            seen,
            vec![
                (2, vec![2, 0]),
                (5, vec![2, 1]),
                (8, vec![2, 2]),
                (11, vec![2, 3]),
            ]
        );

        // An axis past the end also selects a line.
        cursor.reset_plane(0, Some(7), &[0, 3]).unwrap();
        assert_eq!(cursor.plane_axes(), (0, None));
        let indices: Vec<_> = cursor.indices().collect();
        assert_eq!(indices, vec![9, 10, 11]);
    }

    #[test]
    fn test_one_dimensional() {
        let mut cursor = PlaneCursor::dense(vec![5]).unwrap();
        assert_eq!(cursor.plane_axes(), (0, None));
        assert_eq!(walk(&mut cursor).len(), 5);
    }

    #[test]
    fn test_single_cell_plane() {
        let mut cursor = PlaneCursor::dense(vec![1, 1, 3]).unwrap();
        cursor.reset_plane(0, Some(1), &[0, 0, 2]).unwrap();
        assert!(cursor.has_next());
        cursor.fwd();
        assert_eq!(cursor.index(), 2);
        assert!(!cursor.has_next());
    }

    #[test]
    fn test_reset_restarts_plane() {
        let mut cursor = PlaneCursor::dense(vec![2, 2, 2]).unwrap();
        cursor.reset_plane(0, Some(1), &[0, 0, 1]).unwrap();
        let first = walk(&mut cursor);
        cursor.reset();
        let second = walk(&mut cursor);
        assert_eq!(first, second);
        assert_eq!(first[0].0, 4);
    }

    #[test]
    fn test_strided_layout() {
        // 3 x 2 cells in a buffer whose rows are padded to 5.
        let table = StrideTable::new(vec![3, 2], vec![1, 5]).unwrap();
        let mut cursor = PlaneCursor::new(table);
        let indices: Vec<_> = cursor.clone().indices().collect();
        assert_eq!(indices, vec![0, 1, 2, 5, 6, 7]);

        cursor.reset_axes(1, Some(0)).unwrap();
        let indices: Vec<_> = cursor.indices().collect();
        assert_eq!(indices, vec![0, 5, 1, 6, 2, 7]);
    }

    #[test]
    fn test_zero_stride_plane() {
        let table = StrideTable::new(vec![1, 1], vec![0, 0]).unwrap();
        let mut cursor = PlaneCursor::new(table);
        assert_eq!(walk(&mut cursor), vec![(0, vec![0, 0])]);
        assert!(!cursor.has_next());

        cursor.reset();
        assert_eq!(cursor.indices().count(), 1);
    }

    #[test]
    fn test_zero_stride_line() {
        let table = StrideTable::new(vec![3, 1], vec![1, 0]).unwrap();
        let mut cursor = PlaneCursor::new(table);
        cursor.reset_plane(1, None, &[2, 0]).unwrap();
        assert_eq!(walk(&mut cursor), vec![(2, vec![2, 0])]);

        // The zero-stride axis adds nothing to the offsets of the plane.
        cursor.reset_axes(0, Some(1)).unwrap();
        let indices: Vec<_> = cursor.indices().collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_coverage() {
        let dims = [3, 4, 2, 2];
        let mut cursor = PlaneCursor::dense(dims.to_vec()).unwrap();
        for a in 0..4 {
            for b in 0..4 {
                if a == b {
                    continue;
                }
                cursor.reset_plane(a, Some(b), &[1, 2, 1, 0]).unwrap();
                let seen = walk(&mut cursor);
                let distinct: HashSet<_> = seen.iter().map(|(i, _)| *i).collect();
                assert_eq!(seen.len(), dims[a] * dims[b]);
                assert_eq!(distinct.len(), seen.len());
                for (index, position) in &seen {
                    assert_eq!(*index, position_to_index(position, &dims));
                }
            }
        }
    }

    #[test]
    fn test_reset_plane_validation() {
        let mut cursor = PlaneCursor::dense(vec![3, 2, 2]).unwrap();
        assert!(matches!(
            cursor.reset_plane(0, Some(1), &[0, 0]),
            Err(IndexError::DimensionMismatch {
                expected: 3,
                got: 2
            })
        ));
        assert!(matches!(
            cursor.reset_plane(3, Some(1), &[0, 0, 0]),
            Err(IndexError::AxisOutOfRange { dim: 3, ndims: 3 })
        ));
        assert!(matches!(
            cursor.reset_plane(1, Some(1), &[0, 0, 0]),
            Err(IndexError::DuplicateAxis { dim: 1 })
        ));
        assert!(matches!(
            cursor.reset_plane(0, Some(1), &[0, 0, 2]),
            Err(IndexError::PositionOutOfRange { dim: 2, coord: 2, .. })
        ));
        // Coordinates along the plane axes are ignored.
        assert!(cursor.reset_plane(0, Some(1), &[9, -9, 1]).is_ok());
        assert_eq!(cursor.position(), &[-1, 0, 1]);
    }

    #[test]
    fn test_localizable() {
        let mut cursor = PlaneCursor::dense(vec![2, 2, 3]).unwrap();
        cursor.reset_plane(2, Some(0), &[0, 1, 0]).unwrap();
        cursor.jump_fwd(4);
        let mut pos = [0f64; 3];
        cursor.localize(&mut pos);
        assert_eq!(pos, [1.0, 1.0, 0.0]);
        assert_eq!(cursor.long_position(2), 0);
    }
}
