//! Parser module for SCCScope.
//!
//! This module turns external data into [`DirectedGraph`](crate::graph::DirectedGraph)s.
//!
//! # Supported Formats
//!
//! - **Vote CSV** (edge list with a signed vote column) - see [`vote_csv`]
//! - **Adjacency JSON** (`{"node": ["successor", ...]}`) - see [`adjacency`]
//!
//! The [`sample`] module cuts a small breadth-first sample out of a large
//! graph for detailed inspection.
//!
//! # Example
//!
//! ```
//! use sccscope::parser::adjacency;
//!
//! let graph = adjacency::parse_str(r#"{"a": ["b"], "b": []}"#).unwrap();
//! assert_eq!(graph.node_count(), 2);
//! ```

pub mod adjacency;
pub mod sample;
pub mod vote_csv;

pub use sample::sample_subgraph;
pub use vote_csv::VoteFilter;

/// Errors that can occur while loading a graph.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Failed to read the file from disk.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse JSON content.
    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The CSV input has no header row.
    #[error("CSV input is empty: no header row")]
    MissingHeader,

    /// A required CSV column is absent from the header.
    #[error("CSV header has no '{0}' column")]
    MissingColumn(&'static str),

    /// A vote value is not an integer.
    #[error("Invalid vote '{value}' on line {line}")]
    InvalidVote { line: usize, value: String },

    /// The adjacency JSON does not map nodes to lists of node labels.
    #[error("Invalid adjacency: {0}")]
    InvalidAdjacency(String),
}

/// Result type alias for parser operations.
pub type ParseResult<T> = Result<T, ParseError>;
