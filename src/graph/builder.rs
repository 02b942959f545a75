//! Graph construction module

use crate::config::GraphMode;
use crate::error::{AnalyzerError, Result};
use crate::graph::weighted::{Adjacency, WeightedGraph};
use petgraph::visit::EdgeRef;
use petgraph::EdgeType;
use rayon::prelude::*;
use std::collections::HashMap;

/// Builder for incrementally constructing a WeightedGraph
pub struct GraphBuilder {
    /// Directed or undirected interpretation
    mode: GraphMode,

    /// Mapping from string IDs to node indices
    id_to_index: HashMap<String, u32>,

    /// Node string IDs
    node_ids: Vec<String>,

    /// Weighted adjacency lists for each node, unsorted and possibly with repeats
    adjacency_lists: Vec<Vec<(u32, f64)>>,
}

impl GraphBuilder {
    pub fn new(mode: GraphMode) -> Self {
        Self::with_capacity(mode, 0)
    }

    /// Create a new graph builder with the given capacity
    pub fn with_capacity(mode: GraphMode, capacity: usize) -> Self {
        Self {
            mode,
            id_to_index: HashMap::with_capacity(capacity),
            node_ids: Vec::with_capacity(capacity),
            adjacency_lists: Vec::with_capacity(capacity),
        }
    }

    /// Get or create a node ID for the given string ID
    pub fn get_or_create_node(&mut self, id: &str) -> u32 {
        if let Some(&idx) = self.id_to_index.get(id) {
            return idx;
        }

        let idx = self.node_ids.len() as u32;
        self.id_to_index.insert(id.to_string(), idx);
        self.node_ids.push(id.to_string());
        self.adjacency_lists.push(Vec::new());

        idx
    }

    /// Add a weighted edge. Repeated edges between the same pair are summed at build time.
    pub fn add_edge(&mut self, src_id: &str, dst_id: &str, weight: f64) -> Result<()> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(AnalyzerError::InvalidWeight {
                source_id: src_id.to_string(),
                target_id: dst_id.to_string(),
                weight,
            });
        }

        let src_idx = self.get_or_create_node(src_id);
        let dst_idx = self.get_or_create_node(dst_id);

        // Undirected edges are stored on both endpoints, self-loops once
        self.adjacency_lists[src_idx as usize].push((dst_idx, weight));
        if !self.mode.is_directed() && src_idx != dst_idx {
            self.adjacency_lists[dst_idx as usize].push((src_idx, weight));
        }

        Ok(())
    }

    /// Build the weighted graph
    pub fn build(mut self) -> WeightedGraph {
        let node_count = self.node_ids.len();

        // Sort each list and merge repeated edges
        self.adjacency_lists
            .par_iter_mut()
            .for_each(|list| coalesce(list));

        // Pack into CSR
        let outgoing = Adjacency::from_lists(&self.adjacency_lists);

        let (edge_count, incoming) = match self.mode {
            // Directed graphs also index incoming edges
            GraphMode::Directed => (
                outgoing.targets.len(),
                Some(outgoing.transpose(node_count)),
            ),
            // Every edge appears twice except self-loops
            GraphMode::Undirected => {
                let self_loops = self
                    .adjacency_lists
                    .iter()
                    .enumerate()
                    .filter(|(node, list)| list.iter().any(|&(t, _)| t as usize == *node))
                    .count();
                ((outgoing.targets.len() + self_loops) / 2, None)
            }
        };

        log::debug!(
            "Built {:?} graph with {} nodes and {} edges",
            self.mode,
            node_count,
            edge_count
        );

        WeightedGraph {
            node_count,
            edge_count,
            mode: self.mode,
            outgoing,
            incoming,
            node_ids: Some(self.node_ids),
        }
    }
}

/// Sort by target and merge repeated targets by summing their weights
fn coalesce(list: &mut Vec<(u32, f64)>) {
    list.sort_unstable_by_key(|&(target, _)| target);
    list.dedup_by(|next, kept| {
        if next.0 == kept.0 {
            kept.1 += next.1;
            true
        } else {
            false
        }
    });
}

/// Convert a petgraph graph with `f64` edge weights, keeping node order.
/// The mode follows the petgraph edge type.
pub fn from_petgraph<N, Ty>(graph: &petgraph::Graph<N, f64, Ty>) -> Result<WeightedGraph>
where
    N: ToString,
    Ty: EdgeType,
{
    let mode = if graph.is_directed() {
        GraphMode::Directed
    } else {
        GraphMode::Undirected
    };

    let mut builder = GraphBuilder::with_capacity(mode, graph.node_count());
    let mut ids = Vec::with_capacity(graph.node_count());
    for idx in graph.node_indices() {
        let id = graph[idx].to_string();
        if builder.id_to_index.contains_key(&id) {
            return Err(AnalyzerError::DuplicateNode(id));
        }
        builder.get_or_create_node(&id);
        ids.push(id);
    }

    for edge in graph.edge_references() {
        builder.add_edge(
            &ids[edge.source().index()],
            &ids[edge.target().index()],
            *edge.weight(),
        )?;
    }

    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rejects_negative_and_non_finite_weights() {
        let mut builder = GraphBuilder::new(GraphMode::Undirected);
        assert!(matches!(
            builder.add_edge("a", "b", -1.0),
            Err(AnalyzerError::InvalidWeight { .. })
        ));
        assert!(builder.add_edge("a", "b", f64::NAN).is_err());
        assert!(builder.add_edge("a", "b", f64::INFINITY).is_err());
        assert!(builder.add_edge("a", "b", 0.0).is_ok());
    }

    #[test]
    fn undirected_parallel_edges_are_summed_on_both_sides() {
        let mut builder = GraphBuilder::new(GraphMode::Undirected);
        builder.add_edge("a", "b", 1.5).unwrap();
        builder.add_edge("b", "a", 2.0).unwrap();
        builder.add_edge("a", "c", 1.0).unwrap();
        let graph = builder.build();

        assert_eq!(graph.node_count, 3);
        assert_eq!(graph.edge_count, 2);
        assert_relative_eq!(graph.edge_weight(0, 1).unwrap(), 3.5);
        assert_relative_eq!(graph.edge_weight(1, 0).unwrap(), 3.5);
        assert_eq!(graph.neighbors(0), vec![1, 2]);
        assert_eq!(graph.degree(1), 1);
    }

    #[test]
    fn directed_graph_keeps_orientation() {
        let mut builder = GraphBuilder::new(GraphMode::Directed);
        builder.add_edge("a", "b", 2.0).unwrap();
        builder.add_edge("c", "a", 3.0).unwrap();
        builder.add_edge("a", "b", 1.0).unwrap();
        let graph = builder.build();

        assert_eq!(graph.edge_count, 2);
        assert_relative_eq!(graph.edge_weight(0, 1).unwrap(), 3.0);
        assert!(graph.edge_weight(1, 0).is_none());
        assert!(graph.is_adjacent(1, 0));
        assert_eq!(graph.neighbors(0), vec![1, 2]);
        assert_relative_eq!(graph.out_weight(0), 3.0);
        assert_relative_eq!(graph.in_weight(0), 3.0);
    }

    #[test]
    fn self_loops_are_not_neighbors() {
        let mut builder = GraphBuilder::new(GraphMode::Undirected);
        builder.add_edge("a", "a", 4.0).unwrap();
        builder.add_edge("a", "b", 1.0).unwrap();
        let graph = builder.build();

        assert_eq!(graph.edge_count, 2);
        assert_eq!(graph.neighbors(0), vec![1]);
        assert_relative_eq!(graph.out_weight(0), 5.0);
    }

    #[test]
    fn converts_petgraph_in_node_order() {
        let mut pg = petgraph::Graph::<&str, f64, petgraph::Directed>::new();
        let x = pg.add_node("x");
        let y = pg.add_node("y");
        let z = pg.add_node("z");
        pg.add_edge(x, y, 1.0);
        pg.add_edge(y, z, 2.0);

        let graph = from_petgraph(&pg).unwrap();
        assert!(graph.is_directed());
        assert_eq!(graph.node_ids.as_deref().unwrap(), ["x", "y", "z"]);
        assert_relative_eq!(graph.edge_weight(1, 2).unwrap(), 2.0);
        assert_eq!(graph.index_of("z"), Some(2));
    }

    #[test]
    fn petgraph_duplicate_labels_fail_fast() {
        let mut pg = petgraph::Graph::<&str, f64, petgraph::Undirected>::new_undirected();
        pg.add_node("dup");
        pg.add_node("dup");
        assert!(from_petgraph(&pg).is_err());
    }
}
