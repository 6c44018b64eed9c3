/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Histograms of scalar samples over regularly spaced bins.
//!
//! A [`Histogram`] covers the half-open range `[min, max)` with
//! `num_bins` bins of equal width. Values outside the range are
//! clamped into the first or last bin, so every value added is
//! counted.
//!
//! [`MakeHistogram`] builds histograms for a sample type and fills
//! them from any stream of samples, typically the values visited by a
//! cursor:
//!
//! ```
//! use ndcursor::Cursor;
//! use ndcursor::IntervalIterator;
//! use ndcursor::MakeHistogram;
//!
//! let data: Vec<u8> = vec![0, 0, 1, 255, 128, 3];
//! let it = IntervalIterator::from_dimensions(&[3, 2]).unwrap();
//!
//! let op = MakeHistogram::<u8>::with_bins(256);
//! let mut histogram = op.instantiate(data.iter().copied()).unwrap();
//! op.compute(it.values(&data), &mut histogram);
//! assert_eq!(histogram.num_bins(), 256);
//! assert_eq!(histogram.counts()[0], 2);
//! assert_eq!(histogram.total(), 6);
//! ```

use std::marker::PhantomData;

use serde::Deserialize;
use serde::Serialize;

use crate::config::HistogramConfig;

/// The type of error for histogram construction.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum HistogramError {
    #[error("cannot derive bins from empty input")]
    EmptyInput,

    #[error("invalid number of bins {num_bins}: must be greater than zero")]
    InvalidBins { num_bins: usize },

    #[error("invalid range [{min}, {max}): bounds must be finite and max must exceed min")]
    InvalidRange { min: f64, max: f64 },
}

/// Bin counts over `[min, max)`.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(try_from = "Bins", into = "Bins")]
pub struct Histogram {
    counts: Vec<u64>,
    min: f64,
    max: f64,
    bin_width: f64,
}

impl Histogram {
    /// Creates an empty histogram of `num_bins` bins over `[min, max)`.
    pub fn new(num_bins: usize, min: f64, max: f64) -> Result<Self, HistogramError> {
        if num_bins == 0 {
            return Err(HistogramError::InvalidBins { num_bins });
        }
        if !min.is_finite() || !max.is_finite() || max <= min {
            return Err(HistogramError::InvalidRange { min, max });
        }
        Ok(Self {
            counts: vec![0; num_bins],
            min,
            max,
            bin_width: (max - min) / num_bins as f64,
        })
    }

    /// Zeroes every count, keeping the geometry.
    pub fn clear(&mut self) {
        self.counts.fill(0);
    }

    /// The bin `value` falls into: `⌊(value - min) / bin_width⌋`,
    /// clamped into `0..num_bins`. NaN lands in bin 0.
    #[inline]
    pub fn bin_index(&self, value: f64) -> usize {
        // Float to int `as` casts saturate, and map NaN to 0.
        let bin = ((value - self.min) / self.bin_width).floor() as usize;
        bin.min(self.counts.len() - 1)
    }

    #[inline]
    pub fn inc_by_value(&mut self, value: f64) {
        let bin = self.bin_index(value);
        self.counts[bin] += 1;
    }

    /// The half-open range `[lo, hi)` covered by bin `bin`, or `None`
    /// if there is no such bin.
    pub fn bin_bounds(&self, bin: usize) -> Option<(f64, f64)> {
        (bin < self.counts.len()).then(|| {
            let lo = self.min + bin as f64 * self.bin_width;
            let hi = if bin + 1 == self.counts.len() {
                self.max
            } else {
                self.min + (bin + 1) as f64 * self.bin_width
            };
            (lo, hi)
        })
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn num_bins(&self) -> usize {
        self.counts.len()
    }

    /// The number of values counted since the last clear.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn bin_width(&self) -> f64 {
        self.bin_width
    }
}

/// Wire form of a [`Histogram`]; the bin width is derived again on
/// deserialization.
#[derive(Serialize, Deserialize)]
struct Bins {
    min: f64,
    max: f64,
    counts: Vec<u64>,
}

impl TryFrom<Bins> for Histogram {
    type Error = HistogramError;

    fn try_from(bins: Bins) -> Result<Self, Self::Error> {
        let mut histogram = Histogram::new(bins.counts.len(), bins.min, bins.max)?;
        histogram.counts = bins.counts;
        Ok(histogram)
    }
}

impl From<Histogram> for Bins {
    fn from(histogram: Histogram) -> Self {
        Bins {
            min: histogram.min,
            max: histogram.max,
            counts: histogram.counts,
        }
    }
}

/// A scalar sample that can be binned.
pub trait RealSample: Copy {
    /// The sample as a real number.
    fn real_f64(self) -> f64;

    /// The half-open range `[lo, hi)` spanned by every value of the
    /// type, or `None` if the type has no useful finite range.
    fn type_range() -> Option<(f64, f64)>;
}

macro_rules! impl_integer_sample {
    ($($t:ty),*) => {
        $(
            impl RealSample for $t {
                #[inline]
                fn real_f64(self) -> f64 {
                    self as f64
                }

                fn type_range() -> Option<(f64, f64)> {
                    Some((<$t>::MIN as f64, <$t>::MAX as f64 + 1.0))
                }
            }
        )*
    };
}

macro_rules! impl_float_sample {
    ($($t:ty),*) => {
        $(
            impl RealSample for $t {
                #[inline]
                fn real_f64(self) -> f64 {
                    self as f64
                }

                fn type_range() -> Option<(f64, f64)> {
                    None
                }
            }
        )*
    };
}

impl_integer_sample!(i8, u8, i16, u16, i32, u32, i64, u64);
impl_float_sample!(f32, f64);

/// Builds and fills histograms of samples of type `T`.
///
/// With an explicit bin count, bins cover the value range of `T`.
/// Otherwise ("automatic" sizing) the bin count is the width of the
/// type's range, capped at [`HistogramConfig::max_auto_bins`]; floating
/// point types, having no useful range, use `max_auto_bins` bins over
/// `[float_min, float_max)`.
///
/// The configuration defaults to [`HistogramConfig::from_env`], so the
/// `NDCURSOR_*` variables apply unless [`MakeHistogram::with_config`]
/// replaces it.
#[derive(Clone, Debug)]
pub struct MakeHistogram<T> {
    /// Zero selects automatic sizing.
    num_bins: usize,
    config: HistogramConfig,
    _sample: PhantomData<fn() -> T>,
}

impl<T: RealSample> Default for MakeHistogram<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: RealSample> MakeHistogram<T> {
    /// Automatic sizing with the environment's configuration.
    pub fn new() -> Self {
        Self::with_bins(0)
    }

    /// `num_bins` bins over the range of `T`; zero selects automatic
    /// sizing.
    pub fn with_bins(num_bins: usize) -> Self {
        Self {
            num_bins,
            config: HistogramConfig::from_env(),
            _sample: PhantomData,
        }
    }

    pub fn with_config(mut self, config: HistogramConfig) -> Self {
        self.config = config;
        self
    }

    /// The requested bin count; zero means automatic.
    pub fn num_bins(&self) -> usize {
        self.num_bins
    }

    pub fn config(&self) -> &HistogramConfig {
        &self.config
    }

    /// Creates an empty histogram suitable for `input`. Only the
    /// presence of a first sample is inspected; the geometry follows
    /// from its type.
    pub fn instantiate<I>(&self, input: I) -> Result<Histogram, HistogramError>
    where
        I: IntoIterator<Item = T>,
    {
        if input.into_iter().next().is_none() {
            return Err(HistogramError::EmptyInput);
        }
        let config = &self.config;
        let (min, max) = T::type_range().unwrap_or((config.float_min, config.float_max));
        let num_bins = match (self.num_bins, T::type_range()) {
            (0, Some(_)) => config.max_auto_bins.min((max - min) as usize),
            (0, None) => config.max_auto_bins,
            (n, _) => n,
        };
        Histogram::new(num_bins, min, max)
    }

    /// Clears `histogram` and counts every sample of `input`.
    /// Recomputing over the same input yields the same counts.
    pub fn compute<I>(&self, input: I, histogram: &mut Histogram)
    where
        I: IntoIterator<Item = T>,
    {
        self.compute_with(input, T::real_f64, histogram)
    }

    /// Like [`MakeHistogram::compute`], reading each element's scalar
    /// through `extract`.
    pub fn compute_with<I, F>(&self, input: I, mut extract: F, histogram: &mut Histogram)
    where
        I: IntoIterator,
        F: FnMut(I::Item) -> f64,
    {
        histogram.clear();
        for element in input {
            histogram.inc_by_value(extract(element));
        }
        tracing::trace!(
            num_bins = histogram.num_bins(),
            total = histogram.total(),
            "computed histogram"
        );
    }
}
