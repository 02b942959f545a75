//! Configuration management for the weighted clustering analyzer

use serde::{Deserialize, Serialize};

/// How the graph's edges are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphMode {
    Directed,
    Undirected,
}

impl GraphMode {
    pub fn is_directed(self) -> bool {
        matches!(self, GraphMode::Directed)
    }
}

/// Largest number of decimals a quantized key keeps; finer scales overflow `f64`
pub const MAX_KEY_DECIMALS: u32 = f64::DIGITS;

/// How floating-point values are turned into distribution keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyPolicy {
    /// Bit-exact equality; `-0.0` is folded into `0.0`
    Exact,

    /// Round to a fixed number of decimal places before bucketing,
    /// capped at [`MAX_KEY_DECIMALS`]
    Quantized { decimals: u32 },
}

/// Divisor used when deriving the cumulative strength distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Normalization {
    /// Total number of occurrences: a true survival fraction
    TotalCount,

    /// Occurrence count of the largest strength bucket
    MaxKeyCount,

    /// The largest strength value itself
    MaxKey,
}

/// Node count the averages are divided by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AverageDivisor {
    /// Nodes actually processed before the pass finished or was cancelled
    Processed,

    /// Every node in the graph, even on a cancelled pass
    Total,
}

/// Settings for one metrics pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Directed or undirected interpretation
    pub mode: GraphMode,

    /// Keying of the frequency tables
    pub key_policy: KeyPolicy,

    /// Divisor for the cumulative strength distribution
    pub normalization: Normalization,

    /// Divisor for the average strength and coefficient
    pub average_divisor: AverageDivisor,

    /// Log progress every this many nodes (0 disables)
    pub progress_interval: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            mode: GraphMode::Undirected,
            key_policy: KeyPolicy::Exact,
            normalization: Normalization::TotalCount,
            average_divisor: AverageDivisor::Processed,
            progress_interval: 10_000,
        }
    }
}

impl AnalysisConfig {
    /// Default settings for the given mode
    pub fn new(mode: GraphMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn with_normalization(mut self, normalization: Normalization) -> Self {
        self.normalization = normalization;
        self
    }

    pub fn with_average_divisor(mut self, average_divisor: AverageDivisor) -> Self {
        self.average_divisor = average_divisor;
        self
    }

    pub fn with_key_policy(mut self, key_policy: KeyPolicy) -> Self {
        self.key_policy = key_policy;
        self
    }
}

/// Column names of an edge-list frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeColumns {
    pub source: String,
    pub target: String,

    /// `None` loads every edge with weight 1.0
    pub weight: Option<String>,
}

impl Default for EdgeColumns {
    fn default() -> Self {
        Self {
            source: "Source".to_string(),
            target: "Target".to_string(),
            weight: Some("Weight".to_string()),
        }
    }
}
