//! Input loading

pub mod parquet;

pub use parquet::{graph_from_frame, load_edge_list};
