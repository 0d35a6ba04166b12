//! Adjacency mapping in JSON format.
//!
//! A graph is a JSON object whose keys are node labels and whose values are
//! arrays of successor labels. Key order is preserved and becomes the
//! graph's node order.

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use super::{ParseError, ParseResult};
use crate::graph::DirectedGraph;

/// Parses an adjacency mapping from a JSON string.
///
/// # Example
///
/// ```
/// use sccscope::parser::adjacency::parse_str;
///
/// let graph = parse_str(r#"{"b": ["a"], "a": ["b", "c"]}"#).unwrap();
/// assert_eq!(graph.node_names(), vec!["b", "a", "c"]);
/// assert_eq!(graph.undeclared_nodes(), vec!["c"]);
/// ```
pub fn parse_str(content: &str) -> ParseResult<DirectedGraph> {
    let object: Map<String, Value> = serde_json::from_str(content)?;

    let mut adjacency = Vec::with_capacity(object.len());
    for (node, successors) in object {
        let Value::Array(successors) = successors else {
            return Err(ParseError::InvalidAdjacency(format!(
                "successors of '{}' must be an array",
                node
            )));
        };

        let successors = successors
            .into_iter()
            .map(|succ| match succ {
                Value::String(label) => Ok(label),
                other => Err(ParseError::InvalidAdjacency(format!(
                    "successor {} of '{}' is not a string",
                    other, node
                ))),
            })
            .collect::<ParseResult<Vec<String>>>()?;

        adjacency.push((node, successors));
    }

    Ok(DirectedGraph::from_adjacency(adjacency))
}

/// Parses an adjacency mapping from a JSON file.
pub fn parse_file(path: &Path) -> ParseResult<DirectedGraph> {
    let content = fs::read_to_string(path)?;
    parse_str(&content)
}

/// Serializes a graph as a pretty-printed adjacency mapping.
pub fn to_string(graph: &DirectedGraph) -> ParseResult<String> {
    Ok(serde_json::to_string_pretty(&graph.to_adjacency())?)
}
