//! Shared test fixtures

use crate::config::GraphMode;
use crate::graph::{GraphBuilder, WeightedGraph};
use std::sync::Once;

static INIT: Once = Once::new();

pub fn init() {
    INIT.call_once(|| {
        let env = env_logger::Env::default().default_filter_or("debug");

        let _ = env_logger::Builder::from_env(env).is_test(true).try_init();
    });
}

/// Build a graph from `(source, target, weight)` triples
pub fn build(mode: GraphMode, edges: &[(&str, &str, f64)]) -> WeightedGraph {
    let mut builder = GraphBuilder::new(mode);
    for &(source, target, weight) in edges {
        builder.add_edge(source, target, weight).unwrap();
    }
    builder.build()
}
