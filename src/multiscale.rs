// Plexus - Multiscale entropy and channel similarity networks
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Multiscale sample entropy (MSE).
//!
//! For each scale factor `s = 1..=max_scale` the signal is coarse-grained
//! and scored with sample entropy. The tolerance is recomputed from each
//! coarse-grained series, not carried over from the original signal.

use crate::coarse::{coarse_grain, coarse_len};
use crate::config::EntropyConfig;
use crate::error::ConfigError;
use crate::sampen::sample_entropy;
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Entropy at one scale factor; `None` means undefined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleEntropy {
    pub scale: usize,
    pub value: Option<f64>,
}

/// Entropy per scale, ordered by increasing scale factor starting at 1.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EntropyCurve {
    entries: Vec<ScaleEntropy>,
}

impl EntropyCurve {
    fn from_values(values: Vec<Option<f64>>) -> Self {
        let entries = values
            .into_iter()
            .enumerate()
            .map(|(i, value)| ScaleEntropy {
                scale: i + 1,
                value,
            })
            .collect();
        Self { entries }
    }

    /// All entries in scale order.
    pub fn entries(&self) -> &[ScaleEntropy] {
        &self.entries
    }

    /// Values in scale order.
    pub fn values(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        self.entries.iter().map(|e| e.value)
    }

    /// Number of scales (defined or not).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Value at a 1-based scale factor. Outer `None` for a scale outside
    /// the curve, inner `None` for an undefined value.
    pub fn value_at(&self, scale: usize) -> Option<Option<f64>> {
        scale
            .checked_sub(1)
            .and_then(|i| self.entries.get(i))
            .map(|e| e.value)
    }

    /// Number of scales with a defined value.
    pub fn defined_count(&self) -> usize {
        self.entries.iter().filter(|e| e.value.is_some()).count()
    }

    /// Mean over defined values only.
    pub fn mean(&self) -> Option<f64> {
        let n = self.defined_count();
        if n == 0 {
            return None;
        }
        self.complexity_index().map(|sum| sum / n as f64)
    }

    /// Sum of defined values (area under the MSE curve).
    pub fn complexity_index(&self) -> Option<f64> {
        let mut defined = self.entries.iter().filter_map(|e| e.value).peekable();
        defined.peek()?;
        Some(defined.sum())
    }
}

/// Entropy at a single scale, or `None` when the coarse series is too
/// short for the embedding dimension.
fn scale_entropy(signal: &[f64], scale: usize, m: usize, tolerance_ratio: f64) -> Option<f64> {
    let min_len = m.checked_mul(2)?;
    if coarse_len(signal.len(), scale) < min_len {
        return None;
    }
    let coarse = coarse_grain(signal, scale);
    sample_entropy(&coarse, m, tolerance_ratio)
}

/// Multiscale sample entropy of one channel.
///
/// Always returns exactly `max_scale` entries; scales whose coarse-grained
/// series has fewer than `2 * m` samples are undefined without being
/// estimated.
pub fn multiscale_entropy(
    signal: &[f64],
    max_scale: usize,
    m: usize,
    tolerance_ratio: f64,
) -> EntropyCurve {
    let values = (1..=max_scale)
        .map(|scale| scale_entropy(signal, scale, m, tolerance_ratio))
        .collect();
    EntropyCurve::from_values(values)
}

/// Multiscale entropy engine bound to a validated configuration.
#[derive(Debug, Clone)]
pub struct MultiscaleEngine {
    config: EntropyConfig,
    parallel: bool,
}

impl MultiscaleEngine {
    /// Create an engine; rejects invalid parameters.
    pub fn new(config: EntropyConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            parallel: cfg!(feature = "parallel"),
        })
    }

    /// Evaluate scales on the calling thread only.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    pub fn config(&self) -> &EntropyConfig {
        &self.config
    }

    /// Entropy curve for one channel.
    pub fn compute(&self, signal: &[f64]) -> EntropyCurve {
        let EntropyConfig {
            embedding_dimension: m,
            tolerance_ratio,
            max_scale,
        } = self.config;

        log::debug!(
            "multiscale entropy: {} samples, scales 1..={}, m={}, r_ratio={}",
            signal.len(),
            max_scale,
            m,
            tolerance_ratio
        );

        let scales = 1..=max_scale;

        #[cfg(feature = "parallel")]
        let values: Vec<Option<f64>> = if self.parallel {
            scales
                .into_par_iter()
                .map(|scale| scale_entropy(signal, scale, m, tolerance_ratio))
                .collect()
        } else {
            scales
                .map(|scale| scale_entropy(signal, scale, m, tolerance_ratio))
                .collect()
        };

        #[cfg(not(feature = "parallel"))]
        let values: Vec<Option<f64>> = scales
            .map(|scale| scale_entropy(signal, scale, m, tolerance_ratio))
            .collect();

        EntropyCurve::from_values(values)
    }

    /// Entropy curves for several channels, in channel order.
    pub fn compute_all<S>(&self, signals: &[S]) -> Vec<EntropyCurve>
    where
        S: AsRef<[f64]> + Sync,
    {
        #[cfg(feature = "parallel")]
        let curves = if self.parallel {
            signals
                .par_iter()
                .map(|s| self.compute(s.as_ref()))
                .collect()
        } else {
            signals.iter().map(|s| self.compute(s.as_ref())).collect()
        };

        #[cfg(not(feature = "parallel"))]
        let curves = signals.iter().map(|s| self.compute(s.as_ref())).collect();

        curves
    }
}
