//! Error types for the weighted clustering analyzer

use thiserror::Error;

/// Errors surfaced by graph construction, loading and export
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// Edge weight is negative, NaN or infinite
    #[error("invalid weight {weight} on edge {source_id} -> {target_id}")]
    InvalidWeight {
        source_id: String,
        target_id: String,
        weight: f64,
    },

    /// Pass configured for a different mode than the graph was built with
    #[error("graph is {graph:?} but the pass was configured as {requested:?}")]
    ModeMismatch {
        graph: crate::config::GraphMode,
        requested: crate::config::GraphMode,
    },

    /// Two nodes share the same id
    #[error("duplicate node id: {0}")]
    DuplicateNode(String),

    /// Required column missing from the input frame
    #[error("missing column: {0}")]
    MissingColumn(String),

    /// Failure inside polars while reading or converting a frame
    #[error("frame error: {0}")]
    Frame(#[from] polars::prelude::PolarsError),

    /// Malformed line in a two-column distribution file
    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;
