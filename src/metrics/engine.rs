//! Weighted clustering coefficient and strength computation.
//!
//! Brute force: every ordered pair of a node's neighbors is tested for a
//! closing edge, so a pass costs O(N·d²) for maximum degree d.

use crate::config::{AnalysisConfig, AverageDivisor, GraphMode};
use crate::error::{AnalyzerError, Result};
use crate::graph::WeightedGraph;
use crate::metrics::{CancelToken, Distributions, MetricsReport, NodeMetrics, PassStatus};

/// Mode-specific rules plugged into the shared pair-enumeration loop
trait TriangleRule {
    /// Numerator of the normalization factor
    const SCALE: f64;

    fn strength(graph: &WeightedGraph, node: usize) -> f64;

    /// Accumulator contribution of the ordered neighbor pair (n1, n2)
    fn pair_weight(graph: &WeightedGraph, node: usize, n1: u32, n2: u32) -> f64;
}

struct Undirected;

impl TriangleRule for Undirected {
    const SCALE: f64 = 2.0;

    fn strength(graph: &WeightedGraph, node: usize) -> f64 {
        graph.out_weight(node)
    }

    fn pair_weight(graph: &WeightedGraph, node: usize, n1: u32, n2: u32) -> f64 {
        if !graph.has_edge(n1 as usize, n2) {
            return 0.0;
        }
        let w1 = graph.edge_weight(node, n1).unwrap_or(0.0);
        let w2 = graph.edge_weight(node, n2).unwrap_or(0.0);
        (w1 + w2) / 2.0
    }
}

struct Directed;

impl Directed {
    /// Weight between node and a neighbor, preferring node -> neighbor
    fn spoke_weight(graph: &WeightedGraph, node: usize, neighbor: u32) -> f64 {
        graph
            .edge_weight(node, neighbor)
            .or_else(|| graph.edge_weight(neighbor as usize, node as u32))
            .unwrap_or(0.0)
    }
}

impl TriangleRule for Directed {
    const SCALE: f64 = 1.0;

    fn strength(graph: &WeightedGraph, node: usize) -> f64 {
        graph.in_weight(node) + graph.out_weight(node)
    }

    fn pair_weight(graph: &WeightedGraph, node: usize, n1: u32, n2: u32) -> f64 {
        let closing = graph.has_edge(n1 as usize, n2) as u8 + graph.has_edge(n2 as usize, n1) as u8;
        if closing == 0 {
            return 0.0;
        }
        let w1 = Self::spoke_weight(graph, node, n1);
        let w2 = Self::spoke_weight(graph, node, n2);
        closing as f64 * (w1 + w2) / 2.0
    }
}

/// `scale / (s·(k−1)) · acc`, defined as 0 when strength is zero or the result is not finite
pub fn weighted_coefficient(scale: f64, strength: f64, degree: usize, accumulator: f64) -> f64 {
    if degree < 2 || strength <= 0.0 {
        return 0.0;
    }
    let cc = scale / (strength * (degree - 1) as f64) * accumulator;
    if cc.is_finite() {
        cc
    } else {
        0.0
    }
}

fn node_metrics<R: TriangleRule>(graph: &WeightedGraph, node: usize) -> NodeMetrics {
    let strength = R::strength(graph, node);
    let neighbors = graph.neighbors(node);
    let degree = neighbors.len();

    // A node needs two neighbors to close a triangle
    if degree < 2 {
        return NodeMetrics {
            strength,
            degree,
            clustering: 0.0,
        };
    }

    let mut accumulator = 0.0;
    for &n1 in &neighbors {
        for &n2 in &neighbors {
            if n1 == n2 {
                continue;
            }
            accumulator += R::pair_weight(graph, node, n1, n2);
        }
    }
    // Each triangle was seen from both orderings of the pair
    accumulator /= 2.0;

    NodeMetrics {
        strength,
        degree,
        clustering: weighted_coefficient(R::SCALE, strength, degree, accumulator),
    }
}

fn run_pass<R: TriangleRule, F: FnMut(usize)>(
    graph: &WeightedGraph,
    config: &AnalysisConfig,
    cancel: &CancelToken,
    mut on_progress: F,
) -> MetricsReport {
    let total = graph.node_count;
    let mut nodes: Vec<Option<NodeMetrics>> = vec![None; total];
    let mut distributions = Distributions::new(config.key_policy);
    let mut total_strength = 0.0;
    let mut total_clustering = 0.0;
    let mut processed = 0;
    let mut clamped = 0;

    for node in 0..total {
        // Stop before the next node once cancelled
        if cancel.is_cancelled() {
            break;
        }

        let metrics = node_metrics::<R>(graph, node);
        if metrics.degree >= 2 && metrics.strength <= 0.0 {
            clamped += 1;
        }

        // Stream into the frequency tables and running sums
        distributions.record(metrics.strength, metrics.clustering);
        total_strength += metrics.strength;
        total_clustering += metrics.clustering;
        nodes[node] = Some(metrics);
        processed += 1;

        on_progress(processed);
        if config.progress_interval > 0 && processed % config.progress_interval == 0 {
            log::debug!("Processed {}/{} nodes", processed, total);
        }
    }

    if clamped > 0 {
        log::warn!(
            "{} nodes with degree >= 2 have zero strength; their coefficient is 0",
            clamped
        );
    }

    let status = if processed == total {
        PassStatus::Complete
    } else {
        log::warn!("Pass cancelled after {} of {} nodes", processed, total);
        PassStatus::Partial { processed, total }
    };

    // Averages over the configured node count
    let divisor = match config.average_divisor {
        AverageDivisor::Processed => processed,
        AverageDivisor::Total => total,
    };
    let (average_strength, average_clustering) = if divisor == 0 {
        (0.0, 0.0)
    } else {
        (
            total_strength / divisor as f64,
            total_clustering / divisor as f64,
        )
    };

    MetricsReport {
        mode: config.mode,
        nodes,
        node_ids: graph.node_ids.clone(),
        processed,
        total,
        status,
        average_strength,
        average_clustering,
        distributions,
        normalization: config.normalization,
    }
}

/// Run one metrics pass, checking `cancel` before each node and reporting
/// the processed-node count to `on_progress` after each.
pub fn compute<F: FnMut(usize)>(
    graph: &WeightedGraph,
    config: &AnalysisConfig,
    cancel: &CancelToken,
    on_progress: F,
) -> Result<MetricsReport> {
    if graph.mode != config.mode {
        return Err(AnalyzerError::ModeMismatch {
            graph: graph.mode,
            requested: config.mode,
        });
    }

    log::info!(
        "Computing weighted clustering coefficient for {} nodes ({:?})",
        graph.node_count,
        config.mode
    );

    let report = match config.mode {
        GraphMode::Undirected => run_pass::<Undirected, F>(graph, config, cancel, on_progress),
        GraphMode::Directed => run_pass::<Directed, F>(graph, config, cancel, on_progress),
    };

    log::info!(
        "Average clustering coefficient {:.3}, average strength {:.3}",
        report.average_clustering,
        report.average_strength
    );

    Ok(report)
}

/// Run a full pass without cancellation
pub fn compute_weighted_clustering(
    graph: &WeightedGraph,
    config: &AnalysisConfig,
) -> Result<MetricsReport> {
    compute(graph, config, &CancelToken::new(), |_| {})
}
