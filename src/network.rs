// Plexus - Multiscale entropy and channel similarity networks
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Topological summaries of a similarity graph.
//!
//! All three metrics are computed over the full graph. When the graph is
//! disconnected the largest component is identified and reported through
//! the log and [`Connectivity`], but it does not restrict the metrics.
//!
//! Assortativity correlates plain endpoint degrees (edge counts) and uses
//! each edge weight as the weight of its observation. It is not the
//! strength-based coefficient of networkx's
//! `degree_assortativity_coefficient(G, weight="weight")`, which correlates
//! summed edge weights without weighting the edges, so values from the two
//! differ on weighted graphs.

use crate::graph::SimilarityGraph;
use crate::stats;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metric key for graph density.
pub const DENSITY: &str = "density";
/// Metric key for mean normalized degree.
pub const AVG_DEGREE_CENTRALITY: &str = "avg_degree_centrality";
/// Metric key for weighted degree assortativity.
pub const ASSORTATIVITY: &str = "assortativity";

/// Scalar graph metrics; `None` means not computable.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NetworkMetrics {
    pub density: Option<f64>,
    pub avg_degree_centrality: Option<f64>,
    pub assortativity: Option<f64>,
}

impl NetworkMetrics {
    /// Metric names, in report order.
    pub const NAMES: [&'static str; 3] = [DENSITY, AVG_DEGREE_CENTRALITY, ASSORTATIVITY];

    /// All metrics undefined.
    pub fn undefined() -> Self {
        Self::default()
    }

    /// Look a metric up by name. Outer `None` for an unknown name.
    pub fn get(&self, name: &str) -> Option<Option<f64>> {
        match name {
            DENSITY => Some(self.density),
            AVG_DEGREE_CENTRALITY => Some(self.avg_degree_centrality),
            ASSORTATIVITY => Some(self.assortativity),
            _ => None,
        }
    }

    /// Name to value mapping.
    pub fn to_map(&self) -> BTreeMap<&'static str, Option<f64>> {
        Self::NAMES
            .into_iter()
            .map(|name| (name, self.get(name).flatten()))
            .collect()
    }

    /// True when every metric is undefined.
    pub fn is_undefined(&self) -> bool {
        self.density.is_none()
            && self.avg_degree_centrality.is_none()
            && self.assortativity.is_none()
    }
}

/// Connectivity diagnostics collected alongside the metrics.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Connectivity {
    pub node_count: usize,
    pub edge_count: usize,
    pub component_count: usize,
    pub largest_component: Vec<usize>,
    pub is_connected: bool,
}

impl Connectivity {
    /// Inspect a graph.
    pub fn of(graph: &SimilarityGraph) -> Self {
        let components = graph.connected_components();
        let component_count = components.len();
        Self {
            node_count: graph.node_count(),
            edge_count: graph.edge_count(),
            is_connected: graph.node_count() > 0 && component_count == 1,
            largest_component: components.into_iter().next().unwrap_or_default(),
            component_count,
        }
    }

    pub fn largest_component_size(&self) -> usize {
        self.largest_component.len()
    }
}

/// Metrics plus the connectivity diagnostics they were computed with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkReport {
    pub metrics: NetworkMetrics,
    pub connectivity: Connectivity,
}

/// Compute density, average degree centrality and assortativity.
///
/// A graph with at most one node or no edges yields all three undefined.
pub fn extract_metrics(graph: &SimilarityGraph) -> NetworkMetrics {
    analyze_network(graph).metrics
}

/// Like [`extract_metrics`], also returning connectivity diagnostics.
pub fn analyze_network(graph: &SimilarityGraph) -> NetworkReport {
    let connectivity = Connectivity::of(graph);
    let n = graph.node_count();

    if n <= 1 || graph.edge_count() == 0 {
        log::debug!(
            "network metrics undefined: {} nodes, {} edges",
            n,
            graph.edge_count()
        );
        return NetworkReport {
            metrics: NetworkMetrics::undefined(),
            connectivity,
        };
    }

    if !connectivity.is_connected {
        log::warn!(
            "graph is disconnected: largest component has {}/{} nodes; metrics use the full graph",
            connectivity.largest_component_size(),
            n
        );
    }

    let degrees = graph.degrees();
    let max_degree = (n - 1) as f64;

    let density = graph.density();
    let avg_degree_centrality = Some(
        degrees.iter().map(|&d| d as f64 / max_degree).sum::<f64>() / n as f64,
    );
    let assortativity = degree_assortativity(graph, &degrees);

    NetworkReport {
        metrics: NetworkMetrics {
            density,
            avg_degree_centrality,
            assortativity,
        },
        connectivity,
    }
}

/// Weighted Pearson correlation between endpoint degrees.
///
/// Each undirected edge contributes both orientations, weighted by the
/// edge weight. `None` when the degree variance over edge endpoints is zero.
fn degree_assortativity(graph: &SimilarityGraph, degrees: &[usize]) -> Option<f64> {
    let samples: Vec<(f64, f64, f64)> = graph
        .edges()
        .iter()
        .flat_map(|e| {
            let ds = degrees[e.source] as f64;
            let dt = degrees[e.target] as f64;
            [(ds, dt, e.weight), (dt, ds, e.weight)]
        })
        .collect();
    stats::weighted_pearson(&samples)
}
