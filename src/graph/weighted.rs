//! Immutable weighted graph in compressed sparse row form

use crate::config::GraphMode;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// One CSR adjacency: `offsets[i]..offsets[i+1]` is the edge range of node i.
/// Targets within a range are sorted and unique.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Adjacency {
    pub offsets: Vec<u32>,
    pub targets: Vec<u32>,
    pub weights: Vec<f64>,
}

impl Adjacency {
    /// Pack per-node `(target, weight)` lists, which must already be sorted and coalesced
    pub fn from_lists(lists: &[Vec<(u32, f64)>]) -> Self {
        let edge_count = lists.iter().map(Vec::len).sum();
        let mut adjacency = Self {
            offsets: Vec::with_capacity(lists.len() + 1),
            targets: Vec::with_capacity(edge_count),
            weights: Vec::with_capacity(edge_count),
        };

        adjacency.offsets.push(0);
        let mut offset = 0;
        for list in lists {
            for &(target, weight) in list {
                adjacency.targets.push(target);
                adjacency.weights.push(weight);
            }
            offset += list.len() as u32;
            adjacency.offsets.push(offset);
        }

        adjacency
    }

    fn range(&self, node: usize) -> std::ops::Range<usize> {
        self.offsets[node] as usize..self.offsets[node + 1] as usize
    }

    pub fn targets(&self, node: usize) -> &[u32] {
        &self.targets[self.range(node)]
    }

    pub fn weights(&self, node: usize) -> &[f64] {
        &self.weights[self.range(node)]
    }

    /// Weight of the edge node -> target, if present
    pub fn weight(&self, node: usize, target: u32) -> Option<f64> {
        let range = self.range(node);
        self.targets[range.clone()]
            .binary_search(&target)
            .ok()
            .map(|pos| self.weights[range.start + pos])
    }

    /// Transpose into an incoming-edge adjacency
    pub fn transpose(&self, node_count: usize) -> Self {
        let mut lists: Vec<Vec<(u32, f64)>> = vec![Vec::new(); node_count];
        for src in 0..node_count {
            for (&dst, &weight) in self.targets(src).iter().zip(self.weights(src)) {
                lists[dst as usize].push((src as u32, weight));
            }
        }
        // Sources are visited in ascending order, so each list is already sorted
        Self::from_lists(&lists)
    }
}

/// Weighted graph, read-only for the duration of a metrics pass.
///
/// Undirected graphs hold every edge in both endpoint lists (a self-loop
/// once). Directed graphs keep the outgoing adjacency plus its transpose.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightedGraph {
    /// Number of nodes in the graph
    pub node_count: usize,

    /// Number of distinct edges after parallel-edge merging
    pub edge_count: usize,

    /// Directed or undirected interpretation
    pub mode: GraphMode,

    /// Outgoing edges (all incident edges in undirected mode)
    pub outgoing: Adjacency,

    /// Incoming edges, directed mode only
    pub incoming: Option<Adjacency>,

    /// Optional mapping from internal node indices to original string ids
    pub node_ids: Option<Vec<String>>,
}

impl WeightedGraph {
    pub fn is_directed(&self) -> bool {
        self.mode.is_directed()
    }

    /// Weight of the edge src -> dst (either orientation when undirected)
    pub fn edge_weight(&self, src: usize, dst: u32) -> Option<f64> {
        self.outgoing.weight(src, dst)
    }

    /// Check if there's an edge from src to dst
    pub fn has_edge(&self, src: usize, dst: u32) -> bool {
        self.edge_weight(src, dst).is_some()
    }

    /// Whether two nodes share an edge in either direction
    pub fn is_adjacent(&self, a: usize, b: u32) -> bool {
        self.has_edge(a, b) || (self.is_directed() && self.has_edge(b as usize, a as u32))
    }

    /// Distinct neighbors of a node, sorted, excluding the node itself
    pub fn neighbors(&self, node: usize) -> Vec<u32> {
        let this = node as u32;
        match &self.incoming {
            Some(incoming) => self
                .outgoing
                .targets(node)
                .iter()
                .merge(incoming.targets(node))
                .dedup()
                .filter(|&&n| n != this)
                .copied()
                .collect(),
            None => self
                .outgoing
                .targets(node)
                .iter()
                .filter(|&&n| n != this)
                .copied()
                .collect(),
        }
    }

    /// Number of distinct neighbors
    pub fn degree(&self, node: usize) -> usize {
        self.neighbors(node).len()
    }

    /// Sum of outgoing weights (all incident weights when undirected)
    pub fn out_weight(&self, node: usize) -> f64 {
        self.outgoing.weights(node).iter().sum()
    }

    /// Sum of incoming weights; zero when undirected
    pub fn in_weight(&self, node: usize) -> f64 {
        self.incoming
            .as_ref()
            .map_or(0.0, |incoming| incoming.weights(node).iter().sum())
    }

    /// Index of a node by its original id
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.node_ids.as_ref()?.iter().position(|n| n == id)
    }
}
