//! Weighted graph representation and construction

pub mod builder;
pub mod weighted;

pub use builder::{from_petgraph, GraphBuilder};
pub use weighted::WeightedGraph;
