// Plexus Testdata - Multichannel recordings
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Multichannel recording generator.
//!
//! Each channel mixes a shared latent source with its own pattern:
//! `x = coupling * shared + (1 - coupling) * own`. Channels with a high
//! coupling are strongly correlated with each other; coupling 0 gives an
//! independent channel.

use crate::error::TestdataError;
use crate::patterns::SignalPattern;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

/// One generated channel definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelSpec {
    pub label: String,
    pub pattern: SignalPattern,
    /// Weight of the shared source, in [0, 1].
    pub coupling: f64,
}

/// Generated recording: labels and per-channel samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedRecording {
    pub labels: Vec<String>,
    pub channels: Vec<Vec<f64>>,
}

impl GeneratedRecording {
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Labelled channels, in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.channels.iter().map(Vec::as_slice))
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Builder for multichannel recordings.
#[derive(Debug, Clone)]
pub struct MultichannelGenerator {
    num_samples: usize,
    seed: Option<u64>,
    shared: SignalPattern,
    channels: Vec<ChannelSpec>,
}

impl MultichannelGenerator {
    /// Generator for `num_samples` samples per channel, with unit white
    /// noise as the shared source.
    pub fn new(num_samples: usize) -> Self {
        Self {
            num_samples,
            seed: None,
            shared: SignalPattern::noise(1.0),
            channels: Vec::new(),
        }
    }

    /// Set random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Replace the shared latent source.
    pub fn with_shared_source(mut self, pattern: SignalPattern) -> Self {
        self.shared = pattern;
        self
    }

    /// Add a channel.
    pub fn add_channel(mut self, label: &str, pattern: SignalPattern, coupling: f64) -> Self {
        self.channels.push(ChannelSpec {
            label: label.to_string(),
            pattern,
            coupling,
        });
        self
    }

    /// Add `count` channels labelled "Channel 1".. with the same pattern
    /// and coupling.
    pub fn add_channels(mut self, count: usize, pattern: SignalPattern, coupling: f64) -> Self {
        let offset = self.channels.len();
        for i in 0..count {
            self.channels.push(ChannelSpec {
                label: format!("Channel {}", offset + i + 1),
                pattern: pattern.clone(),
                coupling,
            });
        }
        self
    }

    pub fn channels(&self) -> &[ChannelSpec] {
        &self.channels
    }

    /// Generate the recording.
    pub fn generate(&self) -> Result<GeneratedRecording, TestdataError> {
        let mut rng = match self.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };

        for spec in &self.channels {
            if !(0.0..=1.0).contains(&spec.coupling) {
                return Err(TestdataError::InvalidCoupling {
                    label: spec.label.clone(),
                    coupling: spec.coupling,
                });
            }
        }

        let shared = self.shared.generate(self.num_samples, &mut rng)?;
        let mut channels = Vec::with_capacity(self.channels.len());
        for spec in &self.channels {
            let own = spec.pattern.generate(self.num_samples, &mut rng)?;
            let mixed = shared
                .iter()
                .zip(own)
                .map(|(s, o)| spec.coupling * s + (1.0 - spec.coupling) * o)
                .collect();
            channels.push(mixed);
        }

        Ok(GeneratedRecording {
            labels: self.channels.iter().map(|c| c.label.clone()).collect(),
            channels,
        })
    }
}

/// Preset: `count` noisy channels all driven by one shared source.
pub fn coupled_channels(
    count: usize,
    num_samples: usize,
    coupling: f64,
    seed: u64,
) -> Result<GeneratedRecording, TestdataError> {
    MultichannelGenerator::new(num_samples)
        .with_seed(seed)
        .add_channels(count, SignalPattern::noise(1.0), coupling)
        .generate()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn correlation(a: &[f64], b: &[f64]) -> f64 {
        let n = a.len() as f64;
        let ma = a.iter().sum::<f64>() / n;
        let mb = b.iter().sum::<f64>() / n;
        let cov: f64 = a.iter().zip(b).map(|(x, y)| (x - ma) * (y - mb)).sum();
        let va: f64 = a.iter().map(|x| (x - ma).powi(2)).sum();
        let vb: f64 = b.iter().map(|y| (y - mb).powi(2)).sum();
        cov / (va * vb).sqrt()
    }

    #[test]
    fn test_shape() {
        let recording = coupled_channels(4, 300, 0.5, 1).unwrap();
        assert_eq!(recording.channel_count(), 4);
        assert!(recording.channels.iter().all(|c| c.len() == 300));
        assert_eq!(recording.labels[3], "Channel 4");
    }

    #[test]
    fn test_full_coupling_identical() {
        let recording = coupled_channels(3, 100, 1.0, 9).unwrap();
        assert_eq!(recording.channels[0], recording.channels[1]);
        assert_eq!(recording.channels[1], recording.channels[2]);
    }

    #[test]
    fn test_coupling_controls_correlation() {
        let strong = coupled_channels(2, 2000, 0.9, 5).unwrap();
        let weak = coupled_channels(2, 2000, 0.0, 5).unwrap();
        let r_strong = correlation(&strong.channels[0], &strong.channels[1]);
        let r_weak = correlation(&weak.channels[0], &weak.channels[1]);
        assert!(r_strong > 0.9);
        assert!(r_weak.abs() < 0.15);
    }

    #[test]
    fn test_invalid_coupling() {
        let err = MultichannelGenerator::new(10)
            .add_channel("bad", SignalPattern::noise(1.0), 1.5)
            .generate()
            .unwrap_err();
        assert!(matches!(err, TestdataError::InvalidCoupling { .. }));
    }

    #[test]
    fn test_seeded_reproducible() {
        let a = coupled_channels(2, 64, 0.3, 11).unwrap();
        let b = coupled_channels(2, 64, 0.3, 11).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_iter_pairs_labels() {
        let recording = MultichannelGenerator::new(8)
            .with_seed(2)
            .add_channel("Fz", SignalPattern::sine(4.0), 0.0)
            .generate()
            .unwrap();
        let (label, samples) = recording.iter().next().unwrap();
        assert_eq!(label, "Fz");
        assert_eq!(samples.len(), 8);
    }
}
