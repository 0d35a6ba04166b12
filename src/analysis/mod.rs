//! Graph analysis module for SCCScope.
//!
//! This module holds the three analyses the rest of the crate is built
//! around:
//!
//! - [`traverse`]: depth-first forest with pre/post numbers
//! - [`find_sccs`]: strongly connected components, sink to source
//! - [`classify_edges`]: tree/forward, back and cross edges
//!
//! # Example
//!
//! ```rust
//! use sccscope::analysis::{classify_edges, find_sccs, traverse, RootOrder};
//! use sccscope::graph::DirectedGraph;
//!
//! let graph = DirectedGraph::from_adjacency([
//!     ("a", vec!["b"]),
//!     ("b", vec!["c", "a"]),
//!     ("c", vec![]),
//! ]);
//!
//! let forest = traverse(&graph, &RootOrder::Insertion);
//! let sccs = find_sccs(&graph);
//! let edges = classify_edges(&graph, &forest)?;
//!
//! assert_eq!(forest.node_count(), 3);
//! assert_eq!(sccs.len(), 2);
//! assert_eq!(edges.total(), 3);
//! # Ok::<(), sccscope::analysis::AnalysisError>(())
//! ```

pub mod edges;
pub mod scc;
pub mod traversal;

// Re-export main types for convenience
pub use edges::{classify_edges, Edge, EdgeClassification, EdgeKind};
pub use scc::{component_index, find_sccs, largest_components, Component, SccSummary};
pub use traversal::{traverse, Forest, Interval, RootOrder, Tree};

/// Errors that can occur while analyzing a graph.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AnalysisError {
    /// An edge endpoint has no pre/post numbers in the supplied forest,
    /// meaning the forest was computed for a different graph.
    #[error("edge {from} -> {to}: node '{node}' has no pre/post numbers in the forest")]
    MissingInterval {
        from: String,
        to: String,
        node: String,
    },
}

/// Result type alias for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;
