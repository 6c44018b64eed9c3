/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Indexing and traversal for N-dimensional arrays.
//!
//! This crate converts between N-dimensional integer positions and
//! flat storage offsets, walks hyperrectangular regions and 2-D planes
//! of arrays of any dimensionality in a fixed order, and folds the
//! visited values into histograms. Positions are laid out with axis 0
//! varying fastest.
//!
//! Traversal is driven through the [`Cursor`] trait, which has three
//! implementations:
//!
//! - [`IntervalIterator`]: flat indices over an [`Interval`], with
//!   positions computed on request;
//! - [`LocalizingIntervalIterator`]: the same walk, keeping the full
//!   position up to date at every step;
//! - [`PlaneCursor`]: one plane (or line) of a strided array described
//!   by a [`StrideTable`].
//!
//! Values are read and written through the [`Storage`] trait, which is
//! implemented for slices, vectors and the packed [`BitArray`].
//!
//! The crate does not own any array data or install a `tracing`
//! subscriber.

/// Reading and writing values at visited offsets.
pub mod access;
/// Defaults for automatically sized histograms.
pub mod config;
mod cursor;
pub mod histogram;
pub mod index;
/// Validated hyperrectangles of integer space.
pub mod interval;
mod iter;
/// Per-axis stride tables.
pub mod layout;
mod plane;

pub use access::BitArray;
pub use access::Storage;
pub use config::HistogramConfig;
pub use cursor::Coordinate;
pub use cursor::Cursor;
pub use cursor::Indices;
pub use cursor::Localizable;
pub use cursor::Values;
pub use histogram::Histogram;
pub use histogram::HistogramError;
pub use histogram::MakeHistogram;
pub use histogram::RealSample;
pub use index::IndexError;
pub use interval::Interval;
pub use iter::IntervalIterator;
pub use iter::LocalizingIntervalIterator;
pub use layout::StrideProvider;
pub use layout::StrideTable;
pub use plane::PlaneCursor;

/// Property-based generators for randomized test input.
#[cfg(test)]
pub mod strategy;
