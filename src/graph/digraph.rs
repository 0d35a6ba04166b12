//! Directed graph implementation using petgraph.
//!
//! Provides an adjacency-mapping style graph keyed by string labels. Node
//! insertion order and per-node successor order are both preserved, since
//! depth-first numbering depends on them.

use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Errors raised by strict graph validation.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GraphError {
    /// Some edge targets were never declared as nodes.
    #[error("{} edge target(s) were never declared as nodes: {}", .0.len(), .0.join(", "))]
    UndeclaredNodes(Vec<String>),
}

/// Result type alias for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// A node of the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    /// Unique node label
    pub name: String,
    /// False when the node only ever appeared as an edge target
    pub declared: bool,
}

impl GraphNode {
    /// Creates a declared node.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared: true,
        }
    }

    /// Creates a node that was referenced by an edge but never declared.
    pub fn undeclared(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared: false,
        }
    }
}

/// Basic size statistics of a graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphStats {
    /// Number of nodes
    pub nodes: usize,
    /// Number of edges (parallel edges counted separately)
    pub edges: usize,
    /// Average out-degree, 0 for the empty graph
    pub avg_degree: f64,
}

/// A directed graph given as an adjacency mapping.
///
/// Wraps petgraph's `DiGraph`, with nodes identified by string labels.
/// Edges point from a node to one of its successors.
///
/// # Example
///
/// ```rust
/// use sccscope::graph::DirectedGraph;
///
/// let graph = DirectedGraph::from_adjacency([
///     ("a", vec!["b"]),
///     ("b", vec!["a", "c"]),
///     ("c", vec![]),
/// ]);
///
/// assert_eq!(graph.node_count(), 3);
/// assert_eq!(graph.edge_count(), 3);
/// assert_eq!(graph.successors("b"), vec!["a", "c"]);
/// ```
#[derive(Debug, Clone)]
pub struct DirectedGraph {
    /// The underlying directed graph
    graph: DiGraph<GraphNode, ()>,
    /// Maps node labels to their indices for O(1) lookup
    node_indices: HashMap<String, NodeIndex>,
}

impl Default for DirectedGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectedGraph {
    /// Creates a new empty graph.
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_indices: HashMap::new(),
        }
    }

    /// Creates a new graph with pre-allocated capacity.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            graph: DiGraph::with_capacity(nodes, edges),
            node_indices: HashMap::with_capacity(nodes),
        }
    }

    /// Builds a graph from `(node, successors)` pairs.
    ///
    /// All keys are declared first, in the given order, so that node order
    /// matches key order. Successors that are not keys are added afterwards
    /// as undeclared nodes with no outgoing edges.
    pub fn from_adjacency<I, K, S, T>(adjacency: I) -> Self
    where
        I: IntoIterator<Item = (K, S)>,
        K: AsRef<str>,
        S: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let entries: Vec<(String, Vec<String>)> = adjacency
            .into_iter()
            .map(|(node, succs)| {
                (
                    node.as_ref().to_string(),
                    succs.into_iter().map(|s| s.as_ref().to_string()).collect(),
                )
            })
            .collect();

        let edge_count = entries.iter().map(|(_, succs)| succs.len()).sum();
        let mut graph = Self::with_capacity(entries.len(), edge_count);

        for (node, _) in &entries {
            graph.add_node(node);
        }
        for (node, succs) in &entries {
            for succ in succs {
                graph.connect(node, succ);
            }
        }

        graph
    }

    /// Declares a node, returning its index.
    ///
    /// Declaring an existing node returns its index; a previously undeclared
    /// node becomes declared.
    pub fn add_node(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.node_indices.get(name) {
            self.graph[idx].declared = true;
            return idx;
        }

        let idx = self.graph.add_node(GraphNode::new(name));
        self.node_indices.insert(name.to_string(), idx);
        idx
    }

    fn ensure_node(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.node_indices.get(name) {
            return idx;
        }

        let idx = self.graph.add_node(GraphNode::undeclared(name));
        self.node_indices.insert(name.to_string(), idx);
        idx
    }

    /// Adds an edge between two existing nodes.
    ///
    /// # Returns
    ///
    /// `true` if the edge was added, `false` if either node doesn't exist.
    pub fn add_edge(&mut self, from: &str, to: &str) -> bool {
        let (Some(&from_idx), Some(&to_idx)) =
            (self.node_indices.get(from), self.node_indices.get(to))
        else {
            return false;
        };

        self.graph.add_edge(from_idx, to_idx, ());
        true
    }

    /// Adds an edge, creating missing endpoints.
    ///
    /// A missing source is declared; a missing target is added as an
    /// undeclared node with no successors.
    pub fn connect(&mut self, from: &str, to: &str) {
        let from_idx = match self.node_indices.get(from) {
            Some(&idx) => idx,
            None => self.add_node(from),
        };
        let to_idx = self.ensure_node(to);
        self.graph.add_edge(from_idx, to_idx, ());
    }

    /// Returns the successors of `name` in insertion order.
    ///
    /// An absent node has no successors.
    pub fn successors(&self, name: &str) -> Vec<&str> {
        let Some(&idx) = self.node_indices.get(name) else {
            return Vec::new();
        };

        self.successor_indices(idx)
            .into_iter()
            .map(|succ| self.graph[succ].name.as_str())
            .collect()
    }

    /// Successor indices of `idx` in insertion order.
    pub(crate) fn successor_indices(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        // petgraph links new edges at the head of the adjacency list
        let mut succs: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .collect();
        succs.reverse();
        succs
    }

    /// Node indices in insertion order.
    pub(crate) fn indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    /// Looks up the index of a node.
    pub(crate) fn index_of(&self, name: &str) -> Option<NodeIndex> {
        self.node_indices.get(name).copied()
    }

    /// Returns the label of the node at `idx`.
    pub(crate) fn name_of(&self, idx: NodeIndex) -> &str {
        &self.graph[idx].name
    }

    /// Returns all node labels in insertion order.
    pub fn node_names(&self) -> Vec<&str> {
        self.graph
            .node_weights()
            .map(|node| node.name.as_str())
            .collect()
    }

    /// Returns every edge, grouped by source in node order and then in
    /// successor order.
    pub fn edges(&self) -> Vec<(&str, &str)> {
        let mut edges = Vec::with_capacity(self.edge_count());
        for idx in self.indices() {
            let from = self.name_of(idx);
            for succ in self.successor_indices(idx) {
                edges.push((from, self.name_of(succ)));
            }
        }
        edges
    }

    /// Returns a graph with every edge reversed.
    ///
    /// Nodes keep their order (and therefore their indices). The reversed
    /// successor lists are built by scanning sources in node order, so a
    /// node's new successors appear in the order their sources were declared.
    pub fn transpose(&self) -> Self {
        let mut transposed = Self::with_capacity(self.node_count(), self.edge_count());

        for node in self.graph.node_weights() {
            let idx = transposed.graph.add_node(node.clone());
            transposed.node_indices.insert(node.name.clone(), idx);
        }
        for idx in self.indices() {
            for succ in self.successor_indices(idx) {
                transposed.graph.add_edge(succ, idx, ());
            }
        }

        transposed
    }

    /// Returns the labels of nodes that were only referenced as targets.
    pub fn undeclared_nodes(&self) -> Vec<&str> {
        self.graph
            .node_weights()
            .filter(|node| !node.declared)
            .map(|node| node.name.as_str())
            .collect()
    }

    /// Strict validation: every edge target must have been declared.
    pub fn validate(&self) -> GraphResult<()> {
        let undeclared = self.undeclared_nodes();
        if undeclared.is_empty() {
            Ok(())
        } else {
            Err(GraphError::UndeclaredNodes(
                undeclared.into_iter().map(String::from).collect(),
            ))
        }
    }

    /// Checks if the graph contains at least one directed cycle.
    pub fn has_cycles(&self) -> bool {
        is_cyclic_directed(&self.graph)
    }

    /// Returns the number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Checks if the graph is empty.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Checks if a node exists in the graph.
    pub fn contains(&self, name: &str) -> bool {
        self.node_indices.contains_key(name)
    }

    /// Computes node/edge counts and the average out-degree.
    pub fn stats(&self) -> GraphStats {
        let nodes = self.node_count();
        let edges = self.edge_count();
        GraphStats {
            nodes,
            edges,
            avg_degree: if nodes == 0 {
                0.0
            } else {
                edges as f64 / nodes as f64
            },
        }
    }

    /// Converts the graph to an ordered JSON adjacency object.
    pub fn to_adjacency(&self) -> Map<String, Value> {
        self.indices()
            .map(|idx| {
                let succs = self
                    .successor_indices(idx)
                    .into_iter()
                    .map(|succ| Value::String(self.name_of(succ).to_string()))
                    .collect();
                (self.name_of(idx).to_string(), Value::Array(succs))
            })
            .collect()
    }

    /// Borrow of the underlying petgraph graph.
    pub fn inner(&self) -> &DiGraph<GraphNode, ()> {
        &self.graph
    }
}
