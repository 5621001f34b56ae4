// Plexus - Multiscale entropy and channel similarity networks
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! # Plexus - Multiscale entropy and channel similarity networks
//!
//! Signal-complexity analysis for multichannel physiological recordings.
//!
//! ## Key Features
//!
//! - **Sample entropy**: Template-matching regularity estimate with a
//!   tolerance scaled to each series' standard deviation
//! - **Multiscale entropy**: Sample entropy over coarse-grained versions of
//!   a channel, one value per scale factor
//! - **Similarity networks**: Channels as nodes, thresholded pairwise
//!   similarity as weighted edges
//! - **Network metrics**: Density, average degree centrality and weighted
//!   degree assortativity
//!
//! Undefined quantities are `None`, never NaN or a sentinel.
//!
//! ## Quick Start
//!
//! ```rust
//! use plexus::{AnalysisConfig, Analyzer, Recording};
//!
//! let wave = |phase: f64| -> Vec<f64> {
//!     (0..400).map(|i| (i as f64 * 0.15 + phase).sin()).collect()
//! };
//!
//! let recording = Recording::new("session-1")
//!     .with_channel("Fp1", wave(0.0))
//!     .with_channel("Fp2", wave(0.2))
//!     .with_channel("O1", wave(1.4));
//!
//! let analyzer = Analyzer::new(AnalysisConfig::default()).unwrap();
//! let analysis = analyzer.analyze(&recording).unwrap();
//!
//! assert_eq!(analysis.channels.len(), 3);
//! assert_eq!(analysis.channels[0].entropy.len(), 20);
//! assert!(analysis.graph.has_edge(0, 1));
//! ```
//!
//! ## Modules
//!
//! - [`sampen`]: Sample entropy
//! - [`coarse`]: Coarse-graining
//! - [`multiscale`]: Multiscale entropy curves
//! - [`similarity`]: Pairwise similarity measures
//! - [`graph`]: Similarity graph construction
//! - [`network`]: Graph metrics and connectivity
//! - [`analysis`]: Per-recording orchestration

// Modules
pub mod analysis;
pub mod coarse;
pub mod config;
pub mod error;
pub mod graph;
pub mod multiscale;
pub mod network;
pub mod sampen;
pub mod similarity;

mod stats;

// Re-exports for convenient access
pub use analysis::{
    metrics_by_recording, Analyzer, Channel, ChannelAnalysis, Recording, RecordingAnalysis,
};
pub use coarse::coarse_grain;
pub use config::{AnalysisConfig, EntropyConfig, NetworkConfig, SelectionConfig};
pub use error::{ComputationError, ConfigError, GraphError, PlexusError, Result};
pub use graph::{build_graph, Edge, GraphBuilder, SimilarityGraph};
pub use multiscale::{multiscale_entropy, EntropyCurve, MultiscaleEngine, ScaleEntropy};
pub use network::{analyze_network, extract_metrics, Connectivity, NetworkMetrics, NetworkReport};
pub use sampen::{sample_entropy, MatchCounts};
pub use similarity::{measure_by_name, Correlation, SimilarityKind, SimilarityMeasure};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
