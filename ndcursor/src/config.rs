/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Defaults for automatically sized histograms.
//!
//! Each setting may be overridden from the environment:
//!
//! | variable                 | setting         | default |
//! |--------------------------|-----------------|---------|
//! | `NDCURSOR_MAX_AUTO_BINS` | `max_auto_bins` | 256     |
//! | `NDCURSOR_FLOAT_MIN`     | `float_min`     | 0.0     |
//! | `NDCURSOR_FLOAT_MAX`     | `float_max`     | 1.0     |

use std::env;
use std::fmt::Display;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

/// Environment variable overriding [`HistogramConfig::max_auto_bins`].
pub const MAX_AUTO_BINS_ENV: &str = "NDCURSOR_MAX_AUTO_BINS";
/// Environment variable overriding [`HistogramConfig::float_min`].
pub const FLOAT_MIN_ENV: &str = "NDCURSOR_FLOAT_MIN";
/// Environment variable overriding [`HistogramConfig::float_max`].
pub const FLOAT_MAX_ENV: &str = "NDCURSOR_FLOAT_MAX";

/// Geometry used when a histogram is sized from its sample type
/// rather than from an explicit bin count.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(default)]
pub struct HistogramConfig {
    /// Upper bound on the number of automatically chosen bins.
    pub max_auto_bins: usize,
    /// Lower bound of the binned range for floating-point samples,
    /// which have no natural finite range.
    pub float_min: f64,
    /// Upper (exclusive) bound of the binned range for floating-point
    /// samples.
    pub float_max: f64,
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self {
            max_auto_bins: 256,
            float_min: 0.0,
            float_max: 1.0,
        }
    }
}

impl HistogramConfig {
    /// The default configuration with overrides read from the
    /// environment. Values that fail to parse are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        override_from(&lookup, MAX_AUTO_BINS_ENV, &mut config.max_auto_bins);
        override_from(&lookup, FLOAT_MIN_ENV, &mut config.float_min);
        override_from(&lookup, FLOAT_MAX_ENV, &mut config.float_max);
        config
    }
}

fn override_from<T>(lookup: &impl Fn(&str) -> Option<String>, env_var: &str, slot: &mut T)
where
    T: FromStr,
    T::Err: Display,
{
    let Some(value) = lookup(env_var) else {
        return;
    };
    match value.trim().parse() {
        Ok(parsed) => *slot = parsed,
        Err(e) => tracing::warn!(
            "ignoring invalid value \"{}\" in ${}: {}",
            value,
            env_var,
            e
        ),
    }
}
