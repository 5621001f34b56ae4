// Plexus - Multiscale entropy and channel similarity networks
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Analyzer - per-recording orchestration.
//!
//! Runs the two independent branches over one recording: multiscale
//! entropy for every channel, and the similarity graph with its metrics.

use crate::config::{AnalysisConfig, SelectionConfig};
use crate::error::{ComputationError, ConfigError, Result};
use crate::graph::{GraphBuilder, SimilarityGraph};
use crate::multiscale::{EntropyCurve, MultiscaleEngine};
use crate::network::{analyze_network, Connectivity, NetworkMetrics, NetworkReport};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Version of the analysis output format.
pub const ANALYSIS_VERSION: &str = "0.1.0";

/// One preprocessed channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub label: String,
    pub samples: Vec<f64>,
}

/// A multichannel recording, already filtered and normalized.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Recording {
    pub name: String,
    #[serde(default)]
    pub channels: Vec<Channel>,
}

impl Recording {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            channels: Vec::new(),
        }
    }

    /// Add a labelled channel.
    pub fn with_channel(mut self, label: impl Into<String>, samples: Vec<f64>) -> Self {
        self.channels.push(Channel {
            label: label.into(),
            samples,
        });
        self
    }

    /// Build from rows of samples, labelling them "Channel 1", "Channel 2", ...
    pub fn from_rows(name: impl Into<String>, rows: Vec<Vec<f64>>) -> Self {
        let channels = rows
            .into_iter()
            .enumerate()
            .map(|(i, samples)| Channel {
                label: format!("Channel {}", i + 1),
                samples,
            })
            .collect();
        Self {
            name: name.into(),
            channels,
        }
    }

    /// Parse from JSON string.
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }
}

/// Entropy result for one analyzed channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelAnalysis {
    /// Node id of this channel in the similarity graph.
    pub index: usize,
    pub label: String,
    /// Samples actually analyzed after selection.
    pub samples_used: usize,
    pub entropy: EntropyCurve,
}

/// Complete analysis of one recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingAnalysis {
    /// Format version.
    pub version: String,
    pub name: String,
    /// Configuration the results were computed with.
    pub config: AnalysisConfig,
    pub channels: Vec<ChannelAnalysis>,
    pub graph: SimilarityGraph,
    pub metrics: NetworkMetrics,
    pub connectivity: Connectivity,
}

impl RecordingAnalysis {
    /// Serialize to JSON. Undefined values become `null`.
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty JSON.
    pub fn to_json_pretty(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Entropy curve of a channel by label.
    pub fn curve(&self, label: &str) -> Option<&EntropyCurve> {
        self.channels
            .iter()
            .find(|c| c.label == label)
            .map(|c| &c.entropy)
    }

    /// Channel labels in node order.
    pub fn labels(&self) -> Vec<&str> {
        self.channels.iter().map(|c| c.label.as_str()).collect()
    }
}

/// Network metrics keyed by recording name, for cross-recording comparison.
pub fn metrics_by_recording(analyses: &[RecordingAnalysis]) -> BTreeMap<String, NetworkMetrics> {
    analyses
        .iter()
        .map(|a| (a.name.clone(), a.metrics))
        .collect()
}

/// Main analyzer orchestrating the entropy and network branches.
pub struct Analyzer {
    config: AnalysisConfig,
    entropy: MultiscaleEngine,
    graph_builder: GraphBuilder,
}

impl Analyzer {
    /// Create an analyzer; the whole configuration is validated here.
    pub fn new(config: AnalysisConfig) -> std::result::Result<Self, ConfigError> {
        if let Err(err) = config.validate() {
            log::warn!("rejecting analysis configuration: {}", err);
            return Err(err);
        }
        Ok(Self {
            entropy: MultiscaleEngine::new(config.entropy.clone())?,
            graph_builder: GraphBuilder::new(&config.network)?,
            config,
        })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze one recording.
    ///
    /// Fails only on non-finite samples or non-finite results; short or
    /// constant channels yield undefined values instead.
    pub fn analyze(&self, recording: &Recording) -> Result<RecordingAnalysis> {
        let selected = select(recording, &self.config.selection);
        log::debug!(
            "analyzing {}: {}/{} channels",
            recording.name,
            selected.len(),
            recording.channel_count()
        );

        for (channel, (_, samples)) in selected.iter().enumerate() {
            if let Some(index) = samples.iter().position(|x| !x.is_finite()) {
                return Err(ComputationError::NonFiniteSample { channel, index }.into());
            }
        }

        let signals: Vec<&[f64]> = selected.iter().map(|(_, s)| *s).collect();
        let (curves, (graph, report)) = self.run_branches(&signals);

        for (curve, (label, _)) in curves.iter().zip(&selected) {
            check_finite(curve.values(), || format!("entropy of {}", label))?;
        }
        check_finite(
            report.metrics.to_map().into_values(),
            || "network metrics".to_string(),
        )?;

        let channels = selected
            .iter()
            .zip(curves)
            .enumerate()
            .map(|(index, ((label, samples), entropy))| ChannelAnalysis {
                index,
                label: label.to_string(),
                samples_used: samples.len(),
                entropy,
            })
            .collect();

        Ok(RecordingAnalysis {
            version: ANALYSIS_VERSION.to_string(),
            name: recording.name.clone(),
            config: self.config.clone(),
            channels,
            graph,
            metrics: report.metrics,
            connectivity: report.connectivity,
        })
    }

    /// Analyze several recordings; a failing recording does not stop the
    /// others.
    pub fn analyze_all(&self, recordings: &[Recording]) -> Vec<Result<RecordingAnalysis>> {
        recordings
            .iter()
            .map(|recording| {
                let result = self.analyze(recording);
                if let Err(err) = &result {
                    log::warn!("skipping recording {}: {}", recording.name, err);
                }
                result
            })
            .collect()
    }

    fn run_branches(
        &self,
        signals: &[&[f64]],
    ) -> (Vec<EntropyCurve>, (SimilarityGraph, NetworkReport)) {
        let network = || {
            let graph = self.graph_builder.build(signals);
            let report = analyze_network(&graph);
            (graph, report)
        };

        #[cfg(feature = "parallel")]
        let result = rayon::join(|| self.entropy.compute_all(signals), network);

        #[cfg(not(feature = "parallel"))]
        let result = (self.entropy.compute_all(signals), network());

        result
    }
}

/// Channels and sample windows kept by the selection limits.
fn select<'a>(recording: &'a Recording, selection: &SelectionConfig) -> Vec<(&'a str, &'a [f64])> {
    let max_channels = selection.max_channels.unwrap_or(usize::MAX);
    recording
        .channels
        .iter()
        .take(max_channels)
        .map(|c| {
            let len = selection
                .max_samples
                .map_or(c.samples.len(), |max| max.min(c.samples.len()));
            (c.label.as_str(), &c.samples[..len])
        })
        .collect()
}

fn check_finite<I, F>(values: I, quantity: F) -> Result<()>
where
    I: IntoIterator<Item = Option<f64>>,
    F: Fn() -> String,
{
    for value in values.into_iter().flatten() {
        if !value.is_finite() {
            return Err(ComputationError::NonFiniteResult {
                quantity: quantity(),
                value,
            }
            .into());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EntropyConfig, NetworkConfig};
    use crate::error::PlexusError;

    fn small_config() -> AnalysisConfig {
        AnalysisConfig {
            entropy: EntropyConfig {
                max_scale: 4,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn wave(n: usize, freq: f64, phase: f64) -> Vec<f64> {
        (0..n)
            .map(|i| (i as f64 * freq + phase).sin() + 0.3 * (i as f64 * 2.3 * freq).cos())
            .collect()
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = AnalysisConfig {
            network: NetworkConfig {
                similarity_measure: "mutual_info".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            Analyzer::new(config),
            Err(ConfigError::UnsupportedMeasure(_))
        ));
    }

    #[test]
    fn test_analyze_basic() {
        let analyzer = Analyzer::new(small_config()).unwrap();
        let recording = Recording::new("r1")
            .with_channel("Fp1", wave(300, 0.2, 0.0))
            .with_channel("Fp2", wave(300, 0.2, 0.1))
            .with_channel("flat", vec![0.0; 300]);

        let analysis = analyzer.analyze(&recording).unwrap();
        assert_eq!(analysis.version, ANALYSIS_VERSION);
        assert_eq!(analysis.labels(), vec!["Fp1", "Fp2", "flat"]);
        assert_eq!(analysis.graph.node_count(), 3);
        assert!(analysis.graph.has_edge(0, 1));
        assert!(!analysis.graph.has_edge(0, 2));
        assert!(analysis.channels.iter().all(|c| c.entropy.len() == 4));
        assert_eq!(analysis.curve("flat").unwrap().defined_count(), 0);
        assert!(analysis.metrics.density.is_some());
    }

    #[test]
    fn test_selection_limits() {
        let config = AnalysisConfig {
            selection: SelectionConfig {
                max_channels: Some(2),
                max_samples: Some(100),
            },
            ..small_config()
        };
        let analyzer = Analyzer::new(config).unwrap();
        let rows = (0..4).map(|c| wave(250, 0.1 * (c + 1) as f64, 0.0)).collect();
        let recording = Recording::from_rows("rows", rows);

        let analysis = analyzer.analyze(&recording).unwrap();
        assert_eq!(analysis.channels.len(), 2);
        assert_eq!(analysis.labels(), vec!["Channel 1", "Channel 2"]);
        assert!(analysis.channels.iter().all(|c| c.samples_used == 100));
    }

    #[test]
    fn test_non_finite_sample_is_error() {
        let analyzer = Analyzer::new(small_config()).unwrap();
        let mut bad = wave(50, 0.3, 0.0);
        bad[7] = f64::INFINITY;
        let recording = Recording::new("bad")
            .with_channel("ok", wave(50, 0.3, 0.0))
            .with_channel("bad", bad);

        let err = analyzer.analyze(&recording).unwrap_err();
        assert_eq!(
            err,
            PlexusError::Computation(ComputationError::NonFiniteSample {
                channel: 1,
                index: 7
            })
        );
    }

    #[test]
    fn test_empty_recording() {
        let analyzer = Analyzer::new(AnalysisConfig::default()).unwrap();
        let analysis = analyzer.analyze(&Recording::new("empty")).unwrap();
        assert!(analysis.channels.is_empty());
        assert_eq!(analysis.graph.node_count(), 0);
        assert!(analysis.metrics.is_undefined());
    }

    #[test]
    fn test_analyze_all_continues_after_failure() {
        let analyzer = Analyzer::new(small_config()).unwrap();
        let good = Recording::new("good").with_channel("a", wave(80, 0.2, 0.0));
        let bad = Recording::new("bad").with_channel("a", vec![f64::NAN; 80]);
        let results = analyzer.analyze_all(&[bad, good]);
        assert!(results[0].is_err());
        assert!(results[1].is_ok());
    }

    #[test]
    fn test_json_roundtrip() {
        let analyzer = Analyzer::new(small_config()).unwrap();
        let recording = Recording::new("json")
            .with_channel("a", wave(120, 0.2, 0.0))
            .with_channel("b", vec![1.0; 120]);
        let analysis = analyzer.analyze(&recording).unwrap();

        let json = analysis.to_json().unwrap();
        assert!(json.contains("\"version\""));
        assert!(json.contains("null"));
        let restored = RecordingAnalysis::from_json(&json).unwrap();
        assert_eq!(restored.name, "json");
        assert_eq!(restored.channels, analysis.channels);
    }

    #[test]
    fn test_from_json_rejects_malformed_graph() {
        let analyzer = Analyzer::new(small_config()).unwrap();
        let recording = Recording::new("g")
            .with_channel("a", wave(100, 0.2, 0.0))
            .with_channel("b", wave(100, 0.2, 0.1));
        let analysis = analyzer.analyze(&recording).unwrap();

        let mut value = serde_json::to_value(&analysis).unwrap();
        value["graph"]["edges"][0]["target"] = serde_json::json!(5);
        let json = serde_json::to_string(&value).unwrap();

        let err = RecordingAnalysis::from_json(&json).unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn test_recording_from_json() {
        let json = r#"{"name": "rec", "channels": [{"label": "c1", "samples": [1.0, 2.0]}]}"#;
        let recording = Recording::from_json(json).unwrap();
        assert_eq!(recording.channel_count(), 1);
        assert_eq!(recording.channels[0].samples, vec![1.0, 2.0]);
    }

    #[test]
    fn test_metrics_by_recording() {
        let analyzer = Analyzer::new(small_config()).unwrap();
        let a = analyzer
            .analyze(&Recording::new("a").with_channel("x", wave(60, 0.2, 0.0)))
            .unwrap();
        let b = analyzer
            .analyze(
                &Recording::new("b")
                    .with_channel("x", wave(60, 0.2, 0.0))
                    .with_channel("y", wave(60, 0.2, 0.05)),
            )
            .unwrap();
        let table = metrics_by_recording(&[a, b]);
        assert_eq!(table.len(), 2);
        assert!(table["a"].is_undefined());
        assert_eq!(table["b"].density, Some(1.0));
    }
}
