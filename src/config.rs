// Plexus - Multiscale entropy and channel similarity networks
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Analysis configuration.
//!
//! Every section has a `validate()` that runs before any computation, so a
//! bad parameter fails the whole analysis up front instead of turning into
//! a curve full of undefined values.

use crate::error::ConfigError;
use crate::similarity::SimilarityKind;
use serde::{Deserialize, Serialize};

/// Default embedding dimension `m`.
pub const DEFAULT_EMBEDDING_DIMENSION: usize = 2;
/// Default tolerance ratio (r = ratio * std).
pub const DEFAULT_TOLERANCE_RATIO: f64 = 0.2;
/// Default maximum scale factor.
pub const DEFAULT_MAX_SCALE: usize = 20;
/// Default similarity threshold.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.5;

/// Master configuration for one recording analysis.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Multiscale entropy parameters.
    pub entropy: EntropyConfig,

    /// Similarity network parameters.
    pub network: NetworkConfig,

    /// Channel and sample selection applied before analysis.
    pub selection: SelectionConfig,
}

impl AnalysisConfig {
    /// Check every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.entropy.validate()?;
        self.network.validate()?;
        self.selection.validate()
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Sample entropy and multiscale parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EntropyConfig {
    /// Template length `m`.
    pub embedding_dimension: usize,

    /// Tolerance as a fraction of each series' standard deviation.
    pub tolerance_ratio: f64,

    /// Largest coarse-graining factor; the curve covers 1..=max_scale.
    pub max_scale: usize,
}

impl Default for EntropyConfig {
    fn default() -> Self {
        Self {
            embedding_dimension: DEFAULT_EMBEDDING_DIMENSION,
            tolerance_ratio: DEFAULT_TOLERANCE_RATIO,
            max_scale: DEFAULT_MAX_SCALE,
        }
    }
}

impl EntropyConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.embedding_dimension == 0 {
            return Err(ConfigError::InvalidEmbeddingDimension(
                self.embedding_dimension,
            ));
        }
        if !self.tolerance_ratio.is_finite() || self.tolerance_ratio <= 0.0 {
            return Err(ConfigError::InvalidToleranceRatio(self.tolerance_ratio));
        }
        if self.max_scale == 0 {
            return Err(ConfigError::InvalidMaxScale(self.max_scale));
        }
        Ok(())
    }
}

/// Similarity graph parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NetworkConfig {
    /// Similarity measure name, resolved through [`SimilarityKind`].
    pub similarity_measure: String,

    /// Edges need a similarity strictly above this value.
    pub threshold: f64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            similarity_measure: SimilarityKind::Correlation.name().to_string(),
            threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

impl NetworkConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.similarity_kind()?;
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ConfigError::InvalidThreshold(self.threshold));
        }
        Ok(())
    }

    /// Resolve the configured measure name.
    pub fn similarity_kind(&self) -> Result<SimilarityKind, ConfigError> {
        self.similarity_measure.parse()
    }
}

/// Which part of a recording gets analyzed.
///
/// The batch defaults keep the first 6 channels and the first 5000 samples
/// of each; `None` lifts the limit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SelectionConfig {
    /// Keep at most this many channels (from the first).
    pub max_channels: Option<usize>,

    /// Keep at most this many samples per channel (from the start).
    pub max_samples: Option<usize>,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            max_channels: Some(6),
            max_samples: Some(5000),
        }
    }
}

impl SelectionConfig {
    /// No channel or sample limits.
    pub fn unlimited() -> Self {
        Self {
            max_channels: None,
            max_samples: None,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_channels == Some(0) {
            return Err(ConfigError::InvalidSelection {
                field: "max_channels",
            });
        }
        if self.max_samples == Some(0) {
            return Err(ConfigError::InvalidSelection {
                field: "max_samples",
            });
        }
        Ok(())
    }
}
