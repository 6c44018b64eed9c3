/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! The stepping and localization interfaces shared by all cursors.
//!
//! A [`Cursor`] walks flat indices in a fixed order using an explicit
//! `fwd()` / `has_next()` protocol:
//!
//! ```
//! use ndcursor::Cursor;
//! use ndcursor::IntervalIterator;
//!
//! let mut it = IntervalIterator::from_dimensions(&[3, 2]).unwrap();
//! let mut seen = Vec::new();
//! while it.has_next() {
//!     it.fwd();
//!     seen.push(it.index());
//! }
//! assert_eq!(seen, vec![0, 1, 2, 3, 4, 5]);
//! ```
//!
//! After construction or [`Cursor::reset`] a cursor sits one step
//! before its first position, so the first `fwd()` lands on it.
//! Stepping past the last position is a precondition violation: the
//! unchecked methods leave the cursor somewhere outside its bounds
//! (never wrapping back to the start), and the `try_*` methods report
//! [`IndexError::PastEnd`] instead.

use crate::access::Storage;
use crate::index::IndexError;

/// A forward-only cursor over flat indices.
pub trait Cursor {
    /// Moves the cursor back to one step before its first position.
    fn reset(&mut self);

    /// Advances by one position.
    fn fwd(&mut self);

    /// Advances by `steps` positions; equivalent to calling
    /// [`Cursor::fwd`] `steps` times.
    fn jump_fwd(&mut self, steps: usize) {
        for _ in 0..steps {
            self.fwd();
        }
    }

    /// Whether another `fwd()` stays within bounds.
    fn has_next(&self) -> bool;

    /// The flat index of the current position. Only meaningful once
    /// the cursor has been advanced at least once since the last
    /// reset.
    fn index(&self) -> usize;

    /// The flat index of the final position.
    fn last_index(&self) -> usize;

    /// Checked [`Cursor::fwd`].
    fn try_fwd(&mut self) -> Result<(), IndexError> {
        if !self.has_next() {
            return Err(IndexError::PastEnd {
                last: self.last_index(),
            });
        }
        self.fwd();
        Ok(())
    }

    /// Checked [`Cursor::jump_fwd`]. The provided implementation
    /// steps one position at a time and stops at the last position
    /// when it fails; cursors that can jump in constant time check
    /// up front and leave the cursor untouched on failure.
    fn try_jump_fwd(&mut self, steps: usize) -> Result<(), IndexError> {
        for _ in 0..steps {
            self.try_fwd()?;
        }
        Ok(())
    }

    /// The remaining flat indices as a std [`Iterator`].
    fn indices(self) -> Indices<Self>
    where
        Self: Sized,
    {
        Indices { cursor: self }
    }

    /// The values of `storage` at the remaining positions.
    fn values<S>(self, storage: &S) -> Values<'_, Self, S>
    where
        Self: Sized,
        S: Storage + ?Sized,
    {
        Values {
            cursor: self,
            storage,
        }
    }
}

impl<C: Cursor + ?Sized> Cursor for &mut C {
    fn reset(&mut self) {
        (**self).reset()
    }

    fn fwd(&mut self) {
        (**self).fwd()
    }

    fn jump_fwd(&mut self, steps: usize) {
        (**self).jump_fwd(steps)
    }

    fn has_next(&self) -> bool {
        (**self).has_next()
    }

    fn index(&self) -> usize {
        (**self).index()
    }

    fn last_index(&self) -> usize {
        (**self).last_index()
    }

    fn try_jump_fwd(&mut self, steps: usize) -> Result<(), IndexError> {
        (**self).try_jump_fwd(steps)
    }
}

/// Iterator over the flat indices a cursor visits. See
/// [`Cursor::indices`].
pub struct Indices<C> {
    cursor: C,
}

impl<C> Indices<C> {
    /// The underlying cursor.
    pub fn into_inner(self) -> C {
        self.cursor
    }
}

impl<C: Cursor> Iterator for Indices<C> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.cursor.has_next() {
            return None;
        }
        self.cursor.fwd();
        Some(self.cursor.index())
    }
}

/// Iterator over stored values in cursor order. See
/// [`Cursor::values`].
pub struct Values<'a, C, S: ?Sized> {
    cursor: C,
    storage: &'a S,
}

impl<C: Cursor, S: Storage + ?Sized> Iterator for Values<'_, C, S> {
    type Item = S::Value;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.cursor.has_next() {
            return None;
        }
        self.cursor.fwd();
        Some(self.storage.get(self.cursor.index()))
    }
}

/// A numeric representation a position can be read out in.
pub trait Coordinate: Copy {
    fn from_i64(value: i64) -> Self;
}

macro_rules! impl_coordinate {
    ($($t:ty),*) => {
        $(
            impl Coordinate for $t {
                #[inline]
                fn from_i64(value: i64) -> Self {
                    value as $t
                }
            }
        )*
    };
}

impl_coordinate!(i32, i64, f32, f64);

/// Something with an N-dimensional integer position.
///
/// All read-outs report the same coordinate; they only differ in
/// representation.
pub trait Localizable {
    fn num_dimensions(&self) -> usize;

    /// The coordinate along axis `dim`.
    fn long_position(&self, dim: usize) -> i64;

    fn int_position(&self, dim: usize) -> i32 {
        self.long_position(dim) as i32
    }

    fn float_position(&self, dim: usize) -> f32 {
        self.long_position(dim) as f32
    }

    fn double_position(&self, dim: usize) -> f64 {
        self.long_position(dim) as f64
    }

    /// Copies the position into the first `num_dimensions()` entries
    /// of `position`.
    ///
    /// # Panics
    ///
    /// Panics if `position` has fewer than `num_dimensions()` entries.
    fn localize<T: Coordinate>(&self, position: &mut [T]) {
        let n = self.num_dimensions();
        check_buffer(n, position.len());
        for (d, p) in position[..n].iter_mut().enumerate() {
            *p = T::from_i64(self.long_position(d));
        }
    }

    /// Checked [`Localizable::localize`].
    fn try_localize<T: Coordinate>(&self, position: &mut [T]) -> Result<(), IndexError> {
        let n = self.num_dimensions();
        if position.len() < n {
            return Err(IndexError::DimensionMismatch {
                expected: n,
                got: position.len(),
            });
        }
        self.localize(position);
        Ok(())
    }
}

#[track_caller]
pub(crate) fn check_buffer(expected: usize, got: usize) {
    assert!(
        got >= expected,
        "dimension mismatch: expected at least {} coordinates, got {}",
        expected,
        got
    );
}
