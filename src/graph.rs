// Plexus - Multiscale entropy and channel similarity networks
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Weighted channel similarity graph.

use crate::config::NetworkConfig;
use crate::error::{ConfigError, GraphError};
use crate::similarity::SimilarityMeasure;
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Undirected weighted edge, stored with `source < target`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: usize,
    pub target: usize,
    pub weight: f64,
}

impl Edge {
    /// True if `node` is one of the endpoints.
    pub fn touches(&self, node: usize) -> bool {
        self.source == node || self.target == node
    }
}

/// Undirected similarity graph over channels `0..node_count`.
///
/// No self-loops, at most one edge per channel pair, every weight finite.
/// Edges are kept in lexicographic `(source, target)` order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGraph")]
pub struct SimilarityGraph {
    node_count: usize,
    edges: Vec<Edge>,
}

/// Wire form of [`SimilarityGraph`], checked before use.
#[derive(Deserialize)]
struct RawGraph {
    node_count: usize,
    edges: Vec<Edge>,
}

impl TryFrom<RawGraph> for SimilarityGraph {
    type Error = GraphError;

    fn try_from(raw: RawGraph) -> Result<Self, Self::Error> {
        let edges = raw.edges.into_iter().map(|e| (e.source, e.target, e.weight));
        SimilarityGraph::try_from_edges(raw.node_count, edges)
    }
}

impl SimilarityGraph {
    /// Graph with `node_count` isolated nodes.
    pub fn empty(node_count: usize) -> Self {
        Self {
            node_count,
            edges: Vec::new(),
        }
    }

    /// Build from explicit edges. Self-loops, out-of-range endpoints,
    /// non-finite weights and repeated pairs (after the first) are dropped.
    pub fn from_edges<I>(node_count: usize, edges: I) -> Self
    where
        I: IntoIterator<Item = (usize, usize, f64)>,
    {
        let mut kept: Vec<Edge> = Vec::new();
        for (a, b, weight) in edges {
            if a == b || a >= node_count || b >= node_count || !weight.is_finite() {
                continue;
            }
            let (source, target) = if a < b { (a, b) } else { (b, a) };
            if kept
                .iter()
                .any(|e| e.source == source && e.target == target)
            {
                continue;
            }
            kept.push(Edge {
                source,
                target,
                weight,
            });
        }
        kept.sort_by_key(|e| (e.source, e.target));
        Self {
            node_count,
            edges: kept,
        }
    }

    /// Build from explicit edges, rejecting self-loops, out-of-range
    /// endpoints, non-finite weights and repeated pairs. Edge orientation
    /// and order in the input do not matter.
    pub fn try_from_edges<I>(node_count: usize, edges: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = (usize, usize, f64)>,
    {
        let mut checked = Vec::new();
        for (a, b, weight) in edges {
            if let Some(&node) = [a, b].iter().find(|&&node| node >= node_count) {
                return Err(GraphError::NodeOutOfRange { node, node_count });
            }
            if a == b {
                return Err(GraphError::SelfLoop(a));
            }
            let (source, target) = if a < b { (a, b) } else { (b, a) };
            if !weight.is_finite() {
                return Err(GraphError::NonFiniteWeight {
                    node_a: source,
                    node_b: target,
                    weight,
                });
            }
            checked.push(Edge {
                source,
                target,
                weight,
            });
        }

        checked.sort_by_key(|e| (e.source, e.target));
        if let Some(pair) = checked
            .windows(2)
            .find(|w| (w[0].source, w[0].target) == (w[1].source, w[1].target))
        {
            return Err(GraphError::DuplicateEdge {
                node_a: pair[0].source,
                node_b: pair[0].target,
            });
        }

        Ok(Self {
            node_count,
            edges: checked,
        })
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Node identifiers, `0..node_count`.
    pub fn nodes(&self) -> std::ops::Range<usize> {
        0..self.node_count
    }

    /// Weight of the edge between `a` and `b`, in either order.
    pub fn weight(&self, a: usize, b: usize) -> Option<f64> {
        if a == b {
            return None;
        }
        let key = if a < b { (a, b) } else { (b, a) };
        self.edges
            .binary_search_by_key(&key, |e| (e.source, e.target))
            .ok()
            .map(|i| self.edges[i].weight)
    }

    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        self.weight(a, b).is_some()
    }

    /// Number of edges incident to `node`.
    pub fn degree(&self, node: usize) -> usize {
        self.edges.iter().filter(|e| e.touches(node)).count()
    }

    /// Degree of every node, indexed by node id.
    pub fn degrees(&self) -> Vec<usize> {
        let mut degrees = vec![0; self.node_count];
        for edge in &self.edges {
            degrees[edge.source] += 1;
            degrees[edge.target] += 1;
        }
        degrees
    }

    /// Neighbors of `node` in ascending order.
    pub fn neighbors(&self, node: usize) -> Vec<usize> {
        let mut out: Vec<usize> = self
            .edges
            .iter()
            .filter_map(|e| {
                if e.source == node {
                    Some(e.target)
                } else if e.target == node {
                    Some(e.source)
                } else {
                    None
                }
            })
            .collect();
        out.sort_unstable();
        out
    }

    /// Connected components, each sorted, ordered by size (largest first)
    /// then by smallest member.
    pub fn connected_components(&self) -> Vec<Vec<usize>> {
        let mut parent: Vec<usize> = (0..self.node_count).collect();

        fn find(parent: &mut [usize], mut x: usize) -> usize {
            while parent[x] != x {
                parent[x] = parent[parent[x]];
                x = parent[x];
            }
            x
        }

        for edge in &self.edges {
            let ra = find(&mut parent, edge.source);
            let rb = find(&mut parent, edge.target);
            if ra != rb {
                parent[ra.max(rb)] = ra.min(rb);
            }
        }

        let mut groups: std::collections::BTreeMap<usize, Vec<usize>> =
            std::collections::BTreeMap::new();
        for node in 0..self.node_count {
            let root = find(&mut parent, node);
            groups.entry(root).or_default().push(node);
        }

        let mut components: Vec<Vec<usize>> = groups.into_values().collect();
        components.sort_by(|a, b| b.len().cmp(&a.len()).then(a[0].cmp(&b[0])));
        components
    }

    /// Largest connected component (ties go to the one holding the lowest
    /// node id). Empty for a graph without nodes.
    pub fn largest_component(&self) -> Vec<usize> {
        self.connected_components()
            .into_iter()
            .next()
            .unwrap_or_default()
    }

    /// True when every node is reachable from every other. A graph with
    /// no nodes counts as disconnected.
    pub fn is_connected(&self) -> bool {
        self.node_count > 0 && self.connected_components().len() == 1
    }

    /// `2|E| / (|V| (|V| - 1))`, `None` for fewer than two nodes.
    pub fn density(&self) -> Option<f64> {
        if self.node_count < 2 {
            return None;
        }
        let n = self.node_count as f64;
        Some(2.0 * self.edges.len() as f64 / (n * (n - 1.0)))
    }
}

/// Build a similarity graph from channel signals.
///
/// One node per channel, always. For every pair `i < j` an edge with the
/// measure's value as weight is added when that value is defined and
/// strictly greater than `threshold`.
pub fn build_graph<S>(
    signals: &[S],
    measure: &dyn SimilarityMeasure,
    threshold: f64,
) -> SimilarityGraph
where
    S: AsRef<[f64]>,
{
    let n = signals.len();
    let mut edges = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            if let Some(weight) = pair_weight(signals, measure, threshold, i, j) {
                edges.push(Edge {
                    source: i,
                    target: j,
                    weight,
                });
            }
        }
    }
    SimilarityGraph {
        node_count: n,
        edges,
    }
}

#[inline]
fn pair_weight<S: AsRef<[f64]>>(
    signals: &[S],
    measure: &dyn SimilarityMeasure,
    threshold: f64,
    i: usize,
    j: usize,
) -> Option<f64> {
    measure
        .similarity(signals[i].as_ref(), signals[j].as_ref())
        .filter(|w| w.is_finite() && *w > threshold)
}

/// Graph builder bound to a resolved measure and a validated threshold.
pub struct GraphBuilder {
    measure: Box<dyn SimilarityMeasure>,
    threshold: f64,
    parallel: bool,
}

impl GraphBuilder {
    /// Resolve the configured measure and check the threshold.
    pub fn new(config: &NetworkConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let measure = config.similarity_kind()?.measure();
        Ok(Self::with_measure(measure, config.threshold))
    }

    /// Builder around a caller-provided measure.
    pub fn with_measure(measure: Box<dyn SimilarityMeasure>, threshold: f64) -> Self {
        Self {
            measure,
            threshold,
            parallel: cfg!(feature = "parallel"),
        }
    }

    /// Evaluate channel pairs on the calling thread only.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn measure_name(&self) -> &str {
        self.measure.name()
    }

    /// Build the graph for one recording.
    pub fn build<S>(&self, signals: &[S]) -> SimilarityGraph
    where
        S: AsRef<[f64]> + Sync,
    {
        log::debug!(
            "building {} graph over {} channels (threshold {})",
            self.measure.name(),
            signals.len(),
            self.threshold
        );

        #[cfg(feature = "parallel")]
        let graph = if self.parallel {
            self.build_parallel(signals)
        } else {
            build_graph(signals, self.measure.as_ref(), self.threshold)
        };

        #[cfg(not(feature = "parallel"))]
        let graph = build_graph(signals, self.measure.as_ref(), self.threshold);

        log::debug!(
            "graph built: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );
        graph
    }

    #[cfg(feature = "parallel")]
    fn build_parallel<S>(&self, signals: &[S]) -> SimilarityGraph
    where
        S: AsRef<[f64]> + Sync,
    {
        let n = signals.len();
        let pairs: Vec<(usize, usize)> = (0..n)
            .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
            .collect();

        // Rayon collect keeps the lexicographic pair order.
        let edges: Vec<Edge> = pairs
            .par_iter()
            .filter_map(|&(i, j)| {
                pair_weight(signals, self.measure.as_ref(), self.threshold, i, j).map(
                    |weight| Edge {
                        source: i,
                        target: j,
                        weight,
                    },
                )
            })
            .collect();

        SimilarityGraph {
            node_count: n,
            edges,
        }
    }
}
