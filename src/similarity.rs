// Plexus - Multiscale entropy and channel similarity networks
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Pairwise channel similarity measures.
//!
//! A measure maps two channels to a symmetric weight in a bounded range, or
//! `None` when the weight is undefined. The graph builder only sees the
//! [`SimilarityMeasure`] trait, so new measures plug in without touching it.

use crate::error::ConfigError;
use crate::stats;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Capability interface for a pairwise similarity.
pub trait SimilarityMeasure: Send + Sync {
    /// Name the measure is selected by.
    fn name(&self) -> &str;

    /// Similarity of two channels, symmetric in its arguments.
    /// `None` means undefined and produces no edge.
    fn similarity(&self, a: &[f64], b: &[f64]) -> Option<f64>;
}

/// Absolute Pearson correlation, in [0, 1].
///
/// Undefined when either channel has zero variance, fewer than two
/// samples, or the channel lengths differ.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Correlation;

impl SimilarityMeasure for Correlation {
    fn name(&self) -> &str {
        SimilarityKind::Correlation.name()
    }

    fn similarity(&self, a: &[f64], b: &[f64]) -> Option<f64> {
        stats::pearson(a, b).map(f64::abs)
    }
}

/// Measures selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityKind {
    /// Absolute Pearson correlation.
    Correlation,
}

impl SimilarityKind {
    /// All supported measures.
    pub const ALL: [SimilarityKind; 1] = [SimilarityKind::Correlation];

    pub fn name(&self) -> &'static str {
        match self {
            SimilarityKind::Correlation => "correlation",
        }
    }

    /// Instantiate the measure.
    pub fn measure(&self) -> Box<dyn SimilarityMeasure> {
        match self {
            SimilarityKind::Correlation => Box::new(Correlation),
        }
    }
}

impl fmt::Display for SimilarityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SimilarityKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        SimilarityKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ConfigError::UnsupportedMeasure(s.to_string()))
    }
}

/// Resolve a measure by name.
pub fn measure_by_name(name: &str) -> Result<Box<dyn SimilarityMeasure>, ConfigError> {
    Ok(name.parse::<SimilarityKind>()?.measure())
}
