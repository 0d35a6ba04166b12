//! Graph module for directed graph modeling.
//!
//! This module provides the [`DirectedGraph`] struct, an adjacency mapping
//! from node labels to ordered successor lists, backed by petgraph.
//!
//! # Example
//!
//! ```rust
//! use sccscope::graph::DirectedGraph;
//!
//! let mut graph = DirectedGraph::new();
//! graph.add_node("a");
//! graph.add_node("b");
//! graph.add_edge("a", "b");
//!
//! assert_eq!(graph.node_count(), 2);
//! assert_eq!(graph.edge_count(), 1);
//! ```

mod digraph;

pub use digraph::{DirectedGraph, GraphError, GraphNode, GraphResult, GraphStats};
