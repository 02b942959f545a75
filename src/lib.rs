//! Weighted clustering coefficient and node strength analysis for weighted graphs

pub mod config;
pub mod data;
pub mod error;
pub mod graph;
pub mod metrics;
pub mod storage;

#[cfg(test)]
mod tests;

pub use config::{AnalysisConfig, GraphMode};
pub use error::{AnalyzerError, Result};
pub use graph::{GraphBuilder, WeightedGraph};
pub use metrics::{compute, compute_weighted_clustering, CancelToken, MetricsReport, NodeMetrics, PassStatus};
