/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Property-based generators for dimension vectors, intervals and
//! planes.
//!
//! These strategies drive the `proptest`-based tests of the traversal
//! laws: index round trips, monotone iteration, jump/step agreement,
//! plane coverage and histogram conservation.
//!
//! Example usage:
//!
//! ```
//! use proptest::prelude::*;
//!
//! use crate::strategy::gen_interval;
//!
//! proptest! {
//!     #[test]
//!     fn test_interval(interval in gen_interval(4, 6)) {
//!         prop_assert!(interval.size() > 0);
//!     }
//! }
//! ```
//!
//! This module is only included in test builds (`#[cfg(test)]`).

use proptest::prelude::*;

use crate::index::dense_strides;
use crate::interval::Interval;

/// Generates a dimension vector of 1 to `max_dims` axes, each of
/// extent 1 to `max_len` (inclusive).
pub fn gen_dims(max_dims: usize, max_len: usize) -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(1..=max_len, 1..=max_dims)
}

/// Generates an [`Interval`] of 1 to `max_dims` axes whose lower
/// bounds lie in `-8..8` and whose extents are 1 to `max_len`.
pub fn gen_interval(max_dims: usize, max_len: usize) -> impl Strategy<Value = Interval> {
    prop::collection::vec((-8i64..8, 1..=max_len as i64), 1..=max_dims).prop_map(|axes| {
        let (min, max) = axes.into_iter().map(|(lo, len)| (lo, lo + len - 1)).unzip();
        Interval::new(min, max).expect("generated bounds are ordered")
    })
}

/// Generates a pair `(dims, index)` with `index` a valid flat index
/// of `dims`.
pub fn gen_dims_and_index(
    max_dims: usize,
    max_len: usize,
) -> impl Strategy<Value = (Vec<usize>, usize)> {
    gen_dims(max_dims, max_len).prop_flat_map(|dims| {
        let total: usize = dims.iter().product();
        (Just(dims), 0..total)
    })
}

/// A plane of an array: its layout, the two plane axes (the second
/// absent for a line) and in-range fixed coordinates. Axes of extent
/// 1 may carry a zero stride.
#[derive(Clone, Debug)]
pub struct PlaneSpec {
    pub dims: Vec<usize>,
    pub strides: Vec<usize>,
    pub dim_a: usize,
    pub dim_b: Option<usize>,
    pub fixed: Vec<i64>,
}

/// Generates a [`PlaneSpec`] over an array of 1 to `max_dims` axes.
pub fn gen_plane(max_dims: usize, max_len: usize) -> impl Strategy<Value = PlaneSpec> {
    gen_dims(max_dims, max_len).prop_flat_map(|dims| {
        let n = dims.len();
        let fixed: Vec<_> = dims.iter().map(|&len| 0..len as i64).collect();
        (Just(dims), any::<bool>(), 0..n, prop::option::of(0..n), fixed).prop_map(
            |(dims, broadcast, dim_a, dim_b, fixed)| {
                let strides = dense_strides(&dims)
                    .into_iter()
                    .zip(&dims)
                    .map(|(s, &len)| if broadcast && len == 1 { 0 } else { s })
                    .collect();
                PlaneSpec {
                    dims,
                    strides,
                    dim_a,
                    dim_b: dim_b.filter(|&b| b != dim_a),
                    fixed,
                }
            },
        )
    })
}

/// Generates up to `max_len` samples in `[min, max)`.
pub fn gen_samples(min: f64, max: f64, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(min..max, 0..=max_len)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::Cursor;
    use crate::Histogram;
    use crate::IntervalIterator;
    use crate::Localizable;
    use crate::LocalizingIntervalIterator;
    use crate::MakeHistogram;
    use crate::PlaneCursor;
    use crate::StrideTable;
    use crate::index::index_to_position;
    use crate::index::position_to_index;
    use crate::index::position_to_index_with_offset;

    proptest! {
        #[test]
        fn test_index_round_trip((dims, index) in gen_dims_and_index(5, 6)) {
            let mut pos = vec![0; dims.len()];
            index_to_position(index, &dims, &mut pos);
            for (&p, &n) in pos.iter().zip(&dims) {
                prop_assert!(p >= 0 && (p as usize) < n);
            }
            prop_assert_eq!(position_to_index(&pos, &dims), index);
        }

        #[test]
        fn test_iteration_is_monotone(interval in gen_interval(4, 5)) {
            let size = interval.size();
            let indices: Vec<_> = IntervalIterator::new(interval).indices().collect();
            prop_assert_eq!(indices.len(), size);
            for (expected, &index) in indices.iter().enumerate() {
                prop_assert_eq!(index, expected);
            }
        }

        #[test]
        fn test_jump_equals_steps(
            (interval, k) in gen_interval(4, 5).prop_flat_map(|i| {
                let size = i.size();
                (Just(i), 0..size)
            })
        ) {
            let mut jumped = LocalizingIntervalIterator::new(interval);
            let mut stepped = jumped.clone();
            jumped.fwd();
            stepped.fwd();
            let remaining = jumped.last_index() - jumped.index();
            let k = k.min(remaining);
            jumped.jump_fwd(k);
            for _ in 0..k {
                stepped.fwd();
            }
            prop_assert_eq!(jumped.index(), stepped.index());
            prop_assert_eq!(jumped.position(), stepped.position());
            prop_assert_eq!(jumped.has_next(), stepped.has_next());
        }

        #[test]
        fn test_coordinate_consistency(interval in gen_interval(4, 4)) {
            let mut dense = LocalizingIntervalIterator::new(interval.clone());
            let mut lazy = IntervalIterator::new(interval.clone());
            let mut pos = vec![0i64; interval.num_dimensions()];
            while dense.has_next() {
                dense.fwd();
                lazy.fwd();
                prop_assert!(interval.contains(dense.position()));
                prop_assert_eq!(
                    position_to_index_with_offset(
                        dense.position(),
                        interval.dimensions(),
                        interval.min(),
                    ),
                    dense.index()
                );
                lazy.localize(&mut pos);
                prop_assert_eq!(&pos[..], dense.position());
            }
        }

        #[test]
        fn test_plane_coverage(spec in gen_plane(4, 5)) {
            let table = StrideTable::new(spec.dims.clone(), spec.strides.clone()).unwrap();
            let mut cursor = PlaneCursor::new(table.clone());
            cursor.reset_plane(spec.dim_a, spec.dim_b, &spec.fixed).unwrap();
            let expected = spec.dims[spec.dim_a] * spec.dim_b.map_or(1, |b| spec.dims[b]);

            let mut seen = HashSet::new();
            while cursor.has_next() {
                cursor.fwd();
                let position = cursor.position();
                prop_assert_eq!(cursor.index(), table.offset_of(position));
                for (d, (&p, &f)) in position.iter().zip(&spec.fixed).enumerate() {
                    if d != spec.dim_a && Some(d) != spec.dim_b {
                        prop_assert_eq!(p, f);
                    }
                }
                prop_assert!(seen.insert(cursor.index()));
            }
            prop_assert_eq!(seen.len(), expected);
        }

        #[test]
        fn test_histogram_conservation(
            samples in gen_samples(-3.0, 5.0, 64),
            num_bins in 1usize..16,
        ) {
            let op = MakeHistogram::<f64>::new();
            let mut h = Histogram::new(num_bins, -3.0, 5.0).unwrap();
            op.compute(samples.iter().copied(), &mut h);
            prop_assert_eq!(h.total(), samples.len() as u64);
            for &v in &samples {
                let (lo, hi) = h.bin_bounds(h.bin_index(v)).unwrap();
                // Allow for rounding at the bin edges.
                prop_assert!(v >= lo - 1e-9 && v < hi + 1e-9);
            }
        }
    }
}
