//! Strongly connected components by two depth-first passes.
//!
//! The first pass runs on the transposed graph and only contributes
//! finishing times. Visiting the original graph in decreasing order of those
//! times makes every tree of the second pass exactly one component, and the
//! trees come out sink first.

use std::cmp::Reverse;
use std::collections::{BTreeSet, HashMap};

use petgraph::graph::NodeIndex;

use super::traversal::depth_first;
use crate::graph::DirectedGraph;

/// A strongly connected component: the labels of its nodes.
pub type Component = BTreeSet<String>;

/// Returns the strongly connected components of `graph`, sink to source.
///
/// A component with no edges to other components is listed before any
/// component that has edges into it.
///
/// # Example
///
/// ```rust
/// use sccscope::analysis::find_sccs;
/// use sccscope::graph::DirectedGraph;
///
/// let graph = DirectedGraph::from_adjacency([
///     ("a", vec!["b"]),
///     ("b", vec!["a", "c"]),
///     ("c", vec![]),
/// ]);
///
/// let sccs = find_sccs(&graph);
/// assert_eq!(sccs.len(), 2);
/// assert!(sccs[0].contains("c"));
/// assert_eq!(sccs[1].len(), 2);
/// ```
pub fn find_sccs(graph: &DirectedGraph) -> Vec<Component> {
    let transposed = graph.transpose();

    // transposition keeps node indices, so finishing times carry over
    let mut finished: Vec<(NodeIndex, usize)> = depth_first(&transposed, transposed.indices())
        .into_iter()
        .flatten()
        .map(|(idx, interval)| (idx, interval.post))
        .collect();
    finished.sort_unstable_by_key(|&(_, post)| Reverse(post));

    let components: Vec<Component> =
        depth_first(graph, finished.into_iter().map(|(idx, _)| idx))
            .into_iter()
            .map(|tree| {
                tree.into_iter()
                    .map(|(idx, _)| graph.name_of(idx).to_string())
                    .collect()
            })
            .collect();

    log::debug!(
        "Found {} strongly connected component(s) in {} node(s)",
        components.len(),
        graph.node_count()
    );
    components
}

/// Maps every node label to the position of its component in `components`.
pub fn component_index(components: &[Component]) -> HashMap<&str, usize> {
    components
        .iter()
        .enumerate()
        .flat_map(|(i, component)| component.iter().map(move |name| (name.as_str(), i)))
        .collect()
}

/// Returns up to `limit` components ordered by decreasing size.
///
/// Components of equal size keep their sink-to-source order.
pub fn largest_components(components: &[Component], limit: usize) -> Vec<&Component> {
    let mut by_size: Vec<&Component> = components.iter().collect();
    by_size.sort_by_key(|component| Reverse(component.len()));
    by_size.truncate(limit);
    by_size
}

/// Aggregate figures about a component decomposition.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SccSummary {
    /// Number of components
    pub count: usize,
    /// Components made of a single node
    pub trivial: usize,
    /// Components with more than one node
    pub non_trivial: usize,
    /// Size of the largest component, 0 when there are none
    pub largest: usize,
}

impl SccSummary {
    /// Summarizes a list of components.
    pub fn from_components(components: &[Component]) -> Self {
        let trivial = components.iter().filter(|c| c.len() == 1).count();
        Self {
            count: components.len(),
            trivial,
            non_trivial: components.len() - trivial,
            largest: components.iter().map(BTreeSet::len).max().unwrap_or(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(names: &[&str]) -> Component {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn lecture_graph() -> DirectedGraph {
        DirectedGraph::from_adjacency([
            ("a", vec!["e", "f"]),
            ("b", vec!["a"]),
            ("c", vec!["d", "e"]),
            ("d", vec!["h", "i"]),
            ("e", vec!["d"]),
            ("f", vec!["b", "c"]),
            ("g", vec!["d"]),
            ("h", vec!["i"]),
            ("i", vec!["l"]),
            ("j", vec!["f", "h", "k"]),
            ("k", vec!["i", "j"]),
            ("l", vec!["g"]),
        ])
    }

    #[test]
    fn test_find_sccs_lecture_graph() {
        let sccs = find_sccs(&lecture_graph());

        assert_eq!(
            sccs,
            vec![
                set(&["d", "g", "l", "i", "h"]),
                set(&["e"]),
                set(&["c"]),
                set(&["a", "b", "f"]),
                set(&["j", "k"]),
            ]
        );
    }

    #[test]
    fn test_find_sccs_numbered_graph() {
        let graph = DirectedGraph::from_adjacency([
            ("n01", vec!["n02"]),
            ("n02", vec!["n05"]),
            ("n03", vec!["n02"]),
            ("n04", vec!["n03", "n05"]),
            ("n05", vec!["n04", "n06"]),
            ("n06", vec!["n05", "n07", "n08"]),
            ("n07", vec!["n05", "n06", "n08"]),
            ("n08", vec!["n05", "n06"]),
            ("n09", vec!["n07"]),
            ("n10", vec!["n08"]),
        ]);

        assert_eq!(
            find_sccs(&graph),
            vec![
                set(&["n02", "n03", "n04", "n05", "n06", "n07", "n08"]),
                set(&["n10"]),
                set(&["n09"]),
                set(&["n01"]),
            ]
        );
    }

    #[test]
    fn test_find_sccs_empty_graph() {
        assert!(find_sccs(&DirectedGraph::new()).is_empty());
    }

    #[test]
    fn test_find_sccs_isolated_nodes() {
        let graph = DirectedGraph::from_adjacency([
            ("x", Vec::<&str>::new()),
            ("y", vec![]),
            ("z", vec![]),
        ]);
        let sccs = find_sccs(&graph);

        assert_eq!(sccs.len(), 3);
        assert!(sccs.iter().all(|c| c.len() == 1));
    }

    #[test]
    fn test_find_sccs_single_cycle() {
        let graph = DirectedGraph::from_adjacency([
            ("a", vec!["b"]),
            ("b", vec!["c"]),
            ("c", vec!["d"]),
            ("d", vec!["a"]),
        ]);
        assert_eq!(find_sccs(&graph), vec![set(&["a", "b", "c", "d"])]);
    }

    #[test]
    fn test_find_sccs_self_loop() {
        let graph = DirectedGraph::from_adjacency([("x", vec!["x"])]);
        assert_eq!(find_sccs(&graph), vec![set(&["x"])]);
    }

    #[test]
    fn test_find_sccs_chain_is_sink_first() {
        let graph = DirectedGraph::from_adjacency([
            ("a", vec!["b"]),
            ("b", vec!["c"]),
            ("c", vec![]),
        ]);
        assert_eq!(
            find_sccs(&graph),
            vec![set(&["c"]), set(&["b"]), set(&["a"])]
        );
    }

    #[test]
    fn test_component_index() {
        let sccs = find_sccs(&lecture_graph());
        let index = component_index(&sccs);

        assert_eq!(index.len(), 12);
        assert_eq!(index["g"], 0);
        assert_eq!(index["a"], index["f"]);
        assert_eq!(index["k"], 4);
    }

    #[test]
    fn test_largest_components() {
        let sccs = find_sccs(&lecture_graph());
        let largest = largest_components(&sccs, 2);

        assert_eq!(largest.len(), 2);
        assert_eq!(largest[0].len(), 5);
        assert_eq!(*largest[1], set(&["a", "b", "f"]));
    }

    #[test]
    fn test_scc_summary() {
        let summary = SccSummary::from_components(&find_sccs(&lecture_graph()));
        assert_eq!(
            summary,
            SccSummary {
                count: 5,
                trivial: 2,
                non_trivial: 3,
                largest: 5,
            }
        );

        assert_eq!(SccSummary::from_components(&[]), SccSummary::default());
    }
}
