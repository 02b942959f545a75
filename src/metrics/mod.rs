//! Weighted clustering metrics

pub mod distribution;
pub mod engine;

pub use distribution::{CumulativeDistribution, Distributions, FrequencyTable};
pub use engine::{compute, compute_weighted_clustering};

use crate::config::{GraphMode, Normalization};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Values computed for one node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeMetrics {
    /// Sum of incident edge weights (in + out when directed)
    pub strength: f64,

    /// Number of distinct neighbors
    pub degree: usize,

    /// Weighted clustering coefficient
    pub clustering: f64,
}

/// Whether a pass visited every node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum PassStatus {
    Complete,
    Partial { processed: usize, total: usize },
}

/// Cooperative cancellation flag shared with the running pass
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Everything one metrics pass produces
#[derive(Debug, Clone)]
pub struct MetricsReport {
    pub mode: GraphMode,

    /// Per-node results by node index; `None` marks a node the pass never reached
    pub nodes: Vec<Option<NodeMetrics>>,

    /// Original node ids, parallel to `nodes`
    pub node_ids: Option<Vec<String>>,

    pub processed: usize,
    pub total: usize,
    pub status: PassStatus,

    pub average_strength: f64,
    pub average_clustering: f64,

    /// Strength and clustering frequency tables
    pub distributions: Distributions,

    /// Divisor used by [`MetricsReport::cumulative_strength`]
    pub normalization: Normalization,
}

impl MetricsReport {
    pub fn is_partial(&self) -> bool {
        matches!(self.status, PassStatus::Partial { .. })
    }

    pub fn node_metrics(&self, node: usize) -> Option<NodeMetrics> {
        self.nodes.get(node).copied().flatten()
    }

    /// Label of a node: its original id when known, else its index
    pub fn label(&self, node: usize) -> String {
        self.node_ids
            .as_ref()
            .and_then(|ids| ids.get(node).cloned())
            .unwrap_or_else(|| node.to_string())
    }

    /// Computed nodes keyed by label, for attaching to an external attribute table
    pub fn by_node_id(&self) -> HashMap<String, NodeMetrics> {
        self.computed().map(|(node, m)| (self.label(node), m)).collect()
    }

    /// `(node index, metrics)` for every computed node
    pub fn computed(&self) -> impl Iterator<Item = (usize, NodeMetrics)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(node, metrics)| metrics.map(|m| (node, m)))
    }

    /// Cumulative strength distribution under the pass's normalization
    pub fn cumulative_strength(&self) -> CumulativeDistribution {
        self.distributions.cumulative_strength(self.normalization)
    }
}
