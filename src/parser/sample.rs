//! Breadth-first sampling of large graphs.

use std::collections::{HashSet, VecDeque};

use crate::graph::DirectedGraph;

/// Number of nodes the breadth-first search starts from.
const SEED_NODES: usize = 3;

/// Cuts a sample of at most `max_size` declared nodes out of `graph`.
///
/// The sample is grown breadth first from the first few nodes of `graph`.
/// Every sampled node keeps its complete successor list, so successors that
/// were not sampled themselves show up as undeclared nodes. Graphs that
/// already fit are returned unchanged.
///
/// # Example
///
/// ```
/// use sccscope::graph::DirectedGraph;
/// use sccscope::parser::sample_subgraph;
///
/// let graph = DirectedGraph::from_adjacency([
///     ("a", vec!["b"]),
///     ("b", vec!["c"]),
///     ("c", vec!["d"]),
///     ("d", vec![]),
///     ("e", vec![]),
/// ]);
///
/// let sample = sample_subgraph(&graph, 2);
/// assert_eq!(sample.node_names(), vec!["a", "b", "c"]);
/// assert_eq!(sample.undeclared_nodes(), vec!["c"]);
/// ```
pub fn sample_subgraph(graph: &DirectedGraph, max_size: usize) -> DirectedGraph {
    if graph.node_count() <= max_size {
        return graph.clone();
    }

    let mut entries: Vec<(&str, Vec<&str>)> = Vec::with_capacity(max_size);
    let mut visited: HashSet<&str> = HashSet::new();
    let mut queue: VecDeque<&str> = graph.node_names().into_iter().take(SEED_NODES).collect();

    while entries.len() < max_size {
        let Some(node) = queue.pop_front() else {
            break;
        };
        if !visited.insert(node) {
            continue;
        }

        let successors = graph.successors(node);
        entries.push((node, successors.clone()));

        for succ in successors {
            if !visited.contains(succ) && entries.len() < max_size {
                queue.push_back(succ);
            }
        }
    }

    log::debug!(
        "Sampled {} of {} node(s) breadth first",
        entries.len(),
        graph.node_count()
    );
    DirectedGraph::from_adjacency(entries)
}
