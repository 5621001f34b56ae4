// Plexus - Multiscale entropy and channel similarity networks
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Error types for Plexus
//!
//! Data insufficiency (short or constant series, zero-variance channels) is
//! never an error: it shows up as `None` in the computed results. Only
//! invalid configurations and genuine numeric failures are reported here.

use thiserror::Error;

/// Result type alias for Plexus operations
pub type Result<T> = std::result::Result<T, PlexusError>;

/// Main error type for Plexus operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlexusError {
    /// Configuration rejected before any computation
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Unexpected numeric failure during computation
    #[error("Computation error: {0}")]
    Computation(#[from] ComputationError),
}

/// Invalid analysis parameters
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Embedding dimension must be at least 1
    #[error("Invalid embedding dimension: {0} (must be >= 1)")]
    InvalidEmbeddingDimension(usize),

    /// Tolerance ratio must be finite and strictly positive
    #[error("Invalid tolerance ratio: {0} (must be finite and > 0)")]
    InvalidToleranceRatio(f64),

    /// Maximum scale factor must be at least 1
    #[error("Invalid maximum scale: {0} (must be >= 1)")]
    InvalidMaxScale(usize),

    /// Similarity threshold must lie in [0, 1]
    #[error("Invalid similarity threshold: {0} (must be in [0, 1])")]
    InvalidThreshold(f64),

    /// Similarity measure name not recognized
    #[error("Unsupported similarity measure: {0:?}")]
    UnsupportedMeasure(String),

    /// Channel or sample selection limit of zero
    #[error("Invalid selection limit for {field}: must be >= 1")]
    InvalidSelection { field: &'static str },
}

/// Numeric failures that indicate bad input or a logic defect
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComputationError {
    /// A channel contains NaN or infinite samples
    #[error("Non-finite sample in channel {channel} at index {index}")]
    NonFiniteSample { channel: usize, index: usize },

    /// A computed quantity came out NaN or infinite
    #[error("Non-finite result for {quantity}: {value}")]
    NonFiniteResult { quantity: String, value: f64 },
}

/// Malformed edge list rejected by [`SimilarityGraph::try_from_edges`]
///
/// [`SimilarityGraph::try_from_edges`]: crate::graph::SimilarityGraph::try_from_edges
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    /// Edge from a node to itself
    #[error("Self-loop on node {0}")]
    SelfLoop(usize),

    /// Endpoint outside `0..node_count`
    #[error("Node {node} out of range for a graph of {node_count} nodes")]
    NodeOutOfRange { node: usize, node_count: usize },

    /// Second edge for the same unordered pair
    #[error("Duplicate edge between {node_a} and {node_b}")]
    DuplicateEdge { node_a: usize, node_b: usize },

    /// NaN or infinite edge weight
    #[error("Non-finite weight {weight} on edge {node_a}-{node_b}")]
    NonFiniteWeight {
        node_a: usize,
        node_b: usize,
        weight: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PlexusError::Config(ConfigError::UnsupportedMeasure("phase_sync".to_string()));
        let msg = format!("{}", err);
        assert!(msg.contains("Configuration"));
        assert!(msg.contains("phase_sync"));
    }

    #[test]
    fn test_error_conversion() {
        let comp = ComputationError::NonFiniteSample {
            channel: 2,
            index: 17,
        };
        let err: PlexusError = comp.into();
        assert!(matches!(err, PlexusError::Computation(_)));
        assert!(format!("{}", err).contains("channel 2"));
    }

    #[test]
    fn test_config_error_conversion() {
        let err: PlexusError = ConfigError::InvalidMaxScale(0).into();
        assert_eq!(err, PlexusError::Config(ConfigError::InvalidMaxScale(0)));
    }

    #[test]
    fn test_graph_error_display() {
        let err = GraphError::NodeOutOfRange {
            node: 5,
            node_count: 2,
        };
        assert_eq!(
            err.to_string(),
            "Node 5 out of range for a graph of 2 nodes"
        );
    }
}
