//! End-to-end recording analysis.

use plexus::*;
use plexus_testdata::{MultichannelGenerator, SignalPattern};

fn synthetic_recording(name: &str, seed: u64) -> Recording {
    let generated = MultichannelGenerator::new(1200)
        .with_seed(seed)
        .add_channel("Fp1", SignalPattern::noise(1.0), 0.85)
        .add_channel("Fp2", SignalPattern::noise(1.0), 0.85)
        .add_channel("F3", SignalPattern::noise(1.0), 0.85)
        .add_channel("O1", SignalPattern::sine(40.0), 0.0)
        .add_channel(
            "O2",
            SignalPattern::Autoregressive {
                coefficient: 0.8,
                noise_std: 1.0,
            },
            0.0,
        )
        .generate()
        .unwrap();

    generated
        .iter()
        .fold(Recording::new(name), |rec, (label, samples)| {
            rec.with_channel(label, samples.to_vec())
        })
}

fn config(max_scale: usize) -> AnalysisConfig {
    AnalysisConfig {
        entropy: EntropyConfig {
            max_scale,
            ..Default::default()
        },
        ..Default::default()
    }
}

#[test]
fn analyze_synthetic_recording() {
    let analyzer = Analyzer::new(config(8)).unwrap();
    let analysis = analyzer.analyze(&synthetic_recording("s1", 1)).unwrap();

    assert_eq!(analysis.labels(), vec!["Fp1", "Fp2", "F3", "O1", "O2"]);
    for channel in &analysis.channels {
        assert_eq!(channel.entropy.len(), 8);
        assert_eq!(channel.samples_used, 1200);
    }

    // The three coupled frontal channels form a triangle.
    let graph = &analysis.graph;
    assert!(graph.has_edge(0, 1) && graph.has_edge(0, 2) && graph.has_edge(1, 2));
    assert_eq!(graph.degree(3), 0);

    assert!(!analysis.connectivity.is_connected);
    assert_eq!(analysis.connectivity.largest_component, vec![0, 1, 2]);
    assert!(analysis.metrics.density.is_some());

    // Sine is the most regular channel at scale 1.
    let sine = analysis.curve("O1").unwrap().value_at(1).flatten().unwrap();
    let noisy = analysis.curve("Fp1").unwrap().value_at(1).flatten().unwrap();
    assert!(sine < noisy);
}

#[test]
fn default_selection_limits_channels_and_samples() {
    let generated = MultichannelGenerator::new(6000)
        .with_seed(3)
        .add_channels(8, SignalPattern::noise(1.0), 0.5)
        .generate()
        .unwrap();
    let recording = Recording::from_rows("wide", generated.channels);

    let analyzer = Analyzer::new(config(2)).unwrap();
    let analysis = analyzer.analyze(&recording).unwrap();
    assert_eq!(analysis.channels.len(), 6);
    assert_eq!(analysis.graph.node_count(), 6);
    assert!(analysis.channels.iter().all(|c| c.samples_used == 5000));
}

#[test]
fn analysis_exports_undefined_as_null() {
    let recording = Recording::new("flat")
        .with_channel("a", vec![1.0; 64])
        .with_channel("b", vec![2.0; 64]);
    let analyzer = Analyzer::new(config(3)).unwrap();
    let analysis = analyzer.analyze(&recording).unwrap();

    assert!(analysis.metrics.is_undefined());
    assert!(analysis.channels.iter().all(|c| c.entropy.defined_count() == 0));

    let json = analysis.to_json_pretty().unwrap();
    assert!(json.contains("\"assortativity\": null"));
    assert!(!json.contains("NaN"));

    let restored = RecordingAnalysis::from_json(&json).unwrap();
    assert_eq!(restored.metrics, analysis.metrics);
    assert_eq!(restored.graph, analysis.graph);
}

#[test]
fn config_from_json_drives_analysis() {
    let json = r#"{
        "entropy": {"embedding_dimension": 1, "max_scale": 3},
        "network": {"threshold": 0.9},
        "selection": {"max_channels": null, "max_samples": null}
    }"#;
    let config = AnalysisConfig::from_json(json).unwrap();
    assert_eq!(config.entropy.tolerance_ratio, 0.2);
    assert_eq!(config.network.similarity_measure, "correlation");

    let analyzer = Analyzer::new(config).unwrap();
    let analysis = analyzer.analyze(&synthetic_recording("s2", 2)).unwrap();
    assert_eq!(analysis.config.entropy.embedding_dimension, 1);
    assert!(analysis.channels.iter().all(|c| c.entropy.len() == 3));
    assert!(analysis.graph.edges().iter().all(|e| e.weight > 0.9));
}

#[test]
fn invalid_config_is_rejected() {
    let config = AnalysisConfig::from_json(r#"{"network": {"similarity_measure": "granger"}}"#)
        .unwrap();
    assert_eq!(
        Analyzer::new(config).err(),
        Some(ConfigError::UnsupportedMeasure("granger".to_string()))
    );

    let config = AnalysisConfig::from_json(r#"{"network": {"threshold": 1.5}}"#).unwrap();
    assert_eq!(
        Analyzer::new(config).err(),
        Some(ConfigError::InvalidThreshold(1.5))
    );
}

#[test]
fn batch_comparison_by_recording() {
    let analyzer = Analyzer::new(config(4)).unwrap();
    let recordings = vec![
        synthetic_recording("baseline", 10),
        Recording::new("broken").with_channel("x", vec![f64::NAN; 100]),
        synthetic_recording("followup", 11),
    ];

    let results = analyzer.analyze_all(&recordings);
    assert!(matches!(
        results[1],
        Err(PlexusError::Computation(ComputationError::NonFiniteSample { channel: 0, index: 0 }))
    ));

    let analyses: Vec<RecordingAnalysis> = results.into_iter().filter_map(|r| r.ok()).collect();
    let table = metrics_by_recording(&analyses);
    assert_eq!(table.keys().collect::<Vec<_>>(), vec!["baseline", "followup"]);
}

#[test]
fn huge_amplitudes_are_analyzed_not_dropped() {
    let base = SignalPattern::noise(1.0).generate_seeded(300, 13).unwrap();
    let big: Vec<f64> = base.iter().map(|x| x * 1e200).collect();
    let negated: Vec<f64> = big.iter().map(|x| -x).collect();
    let recording = Recording::new("huge")
        .with_channel("big", big)
        .with_channel("negated", negated);

    let analyzer = Analyzer::new(config(3)).unwrap();
    let analysis = analyzer.analyze(&recording).unwrap();

    assert!((analysis.graph.weight(0, 1).unwrap() - 1.0).abs() < 1e-12);
    assert_eq!(analysis.metrics.density, Some(1.0));

    let unit = sample_entropy(&base, 2, 0.2).unwrap();
    for channel in &analysis.channels {
        let value = channel.entropy.value_at(1).flatten().unwrap();
        assert!((value - unit).abs() < 1e-9, "{} vs {}", value, unit);
    }
}
