//! Edge classification from depth-first intervals.
//!
//! Tree edges and forward edges both point from an ancestor to a
//! descendant, and intervals alone cannot tell them apart, so they share
//! the [`EdgeKind::TreeOrForward`] bucket.

use std::collections::BTreeSet;

use super::traversal::{Forest, Interval};
use super::{AnalysisError, AnalysisResult};
use crate::graph::DirectedGraph;

/// The category of a directed edge with respect to a depth-first forest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EdgeKind {
    /// Target is a descendant of the source
    TreeOrForward,
    /// Target is an ancestor of the source (self-loops included)
    Back,
    /// Neither endpoint is an ancestor of the other
    Cross,
}

impl EdgeKind {
    /// All kinds, in reporting order.
    pub const ALL: [EdgeKind; 3] = [Self::TreeOrForward, Self::Back, Self::Cross];

    /// Classifies an edge `u -> v` from the intervals of its endpoints.
    pub fn of(u: Interval, v: Interval) -> Self {
        if u.pre < v.pre && u.post > v.post {
            Self::TreeOrForward
        } else if v.pre < u.pre && v.post > u.post {
            Self::Back
        } else if u == v {
            // a self-loop's interval trivially nests in itself
            Self::Back
        } else {
            Self::Cross
        }
    }

    /// Stable key used in machine-readable output.
    pub fn key(&self) -> &'static str {
        match self {
            Self::TreeOrForward => "tree_or_forward",
            Self::Back => "back",
            Self::Cross => "cross",
        }
    }
}

impl std::fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TreeOrForward => write!(f, "tree/forward"),
            Self::Back => write!(f, "back"),
            Self::Cross => write!(f, "cross"),
        }
    }
}

/// An edge as a `(source, target)` pair of labels.
pub type Edge = (String, String);

/// Edges of a graph partitioned into the three [`EdgeKind`] buckets.
///
/// All three buckets are always present, even when empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EdgeClassification {
    /// Edges from an ancestor to a descendant
    pub tree_or_forward: BTreeSet<Edge>,
    /// Edges from a descendant to an ancestor
    pub back: BTreeSet<Edge>,
    /// All remaining edges
    pub cross: BTreeSet<Edge>,
}

impl EdgeClassification {
    /// Returns the bucket for `kind`.
    pub fn get(&self, kind: EdgeKind) -> &BTreeSet<Edge> {
        match kind {
            EdgeKind::TreeOrForward => &self.tree_or_forward,
            EdgeKind::Back => &self.back,
            EdgeKind::Cross => &self.cross,
        }
    }

    fn get_mut(&mut self, kind: EdgeKind) -> &mut BTreeSet<Edge> {
        match kind {
            EdgeKind::TreeOrForward => &mut self.tree_or_forward,
            EdgeKind::Back => &mut self.back,
            EdgeKind::Cross => &mut self.cross,
        }
    }

    /// Returns the kind assigned to `from -> to`, if that edge was classified.
    pub fn kind_of(&self, from: &str, to: &str) -> Option<EdgeKind> {
        let edge = (from.to_string(), to.to_string());
        EdgeKind::ALL
            .into_iter()
            .find(|&kind| self.get(kind).contains(&edge))
    }

    /// Number of distinct edges in each bucket, in [`EdgeKind::ALL`] order.
    pub fn counts(&self) -> [(EdgeKind, usize); 3] {
        EdgeKind::ALL.map(|kind| (kind, self.get(kind).len()))
    }

    /// Total number of distinct classified edges.
    pub fn total(&self) -> usize {
        self.tree_or_forward.len() + self.back.len() + self.cross.len()
    }

    /// Share of `kind` among all classified edges, in percent.
    pub fn percentage(&self, kind: EdgeKind) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.get(kind).len() as f64 * 100.0 / total as f64,
        }
    }
}

/// Classifies every edge of `graph` against the intervals in `forest`.
///
/// The forest must have been computed for this same graph. A node with no
/// interval is reported as [`AnalysisError::MissingInterval`] rather than
/// guessed at.
///
/// # Example
///
/// ```rust
/// use sccscope::analysis::{classify_edges, traverse, EdgeKind, RootOrder};
/// use sccscope::graph::DirectedGraph;
///
/// let graph = DirectedGraph::from_adjacency([("a", vec!["b"]), ("b", vec!["a"])]);
/// let forest = traverse(&graph, &RootOrder::Insertion);
/// let edges = classify_edges(&graph, &forest).unwrap();
///
/// assert_eq!(edges.kind_of("a", "b"), Some(EdgeKind::TreeOrForward));
/// assert_eq!(edges.kind_of("b", "a"), Some(EdgeKind::Back));
/// ```
pub fn classify_edges(
    graph: &DirectedGraph,
    forest: &Forest,
) -> AnalysisResult<EdgeClassification> {
    let intervals = forest.intervals();
    let mut classification = EdgeClassification::default();

    for (from, to) in graph.edges() {
        let lookup = |node: &str| {
            intervals
                .get(node)
                .copied()
                .ok_or_else(|| AnalysisError::MissingInterval {
                    from: from.to_string(),
                    to: to.to_string(),
                    node: node.to_string(),
                })
        };
        let kind = EdgeKind::of(lookup(from)?, lookup(to)?);
        classification
            .get_mut(kind)
            .insert((from.to_string(), to.to_string()));
    }

    Ok(classification)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::traversal::{traverse, RootOrder, Tree};

    fn edges(pairs: &[(&str, &str)]) -> BTreeSet<Edge> {
        pairs
            .iter()
            .map(|&(a, b)| (a.to_string(), b.to_string()))
            .collect()
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
    fn test_classify_lecture_graph() {
        let graph = lecture_graph();
        let forest = traverse(&graph, &RootOrder::Insertion);
        let classification = classify_edges(&graph, &forest).unwrap();

        assert_eq!(
            classification.tree_or_forward,
            edges(&[
                ("a", "e"),
                ("a", "f"),
                ("d", "h"),
                ("d", "i"),
                ("e", "d"),
                ("f", "b"),
                ("f", "c"),
                ("h", "i"),
                ("i", "l"),
                ("j", "k"),
                ("l", "g"),
            ])
        );
        assert_eq!(
            classification.back,
            edges(&[("b", "a"), ("g", "d"), ("k", "j")])
        );
        assert_eq!(
            classification.cross,
            edges(&[("c", "d"), ("c", "e"), ("j", "f"), ("j", "h"), ("k", "i")])
        );
        assert_eq!(classification.total(), graph.edge_count());
    }

    #[test]
    fn test_classify_numbered_graph() {
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
        let forest = traverse(&graph, &RootOrder::Insertion);
        let classification = classify_edges(&graph, &forest).unwrap();

        assert_eq!(
            classification.tree_or_forward,
            edges(&[
                ("n01", "n02"),
                ("n02", "n05"),
                ("n04", "n03"),
                ("n05", "n04"),
                ("n05", "n06"),
                ("n06", "n07"),
                ("n06", "n08"),
                ("n07", "n08"),
            ])
        );
        assert_eq!(
            classification.back,
            edges(&[
                ("n03", "n02"),
                ("n04", "n05"),
                ("n06", "n05"),
                ("n07", "n05"),
                ("n07", "n06"),
                ("n08", "n05"),
                ("n08", "n06"),
            ])
        );
        assert_eq!(
            classification.cross,
            edges(&[("n09", "n07"), ("n10", "n08")])
        );
    }

    #[test]
    fn test_classify_empty_graph() {
        let graph = DirectedGraph::new();
        let forest = traverse(&graph, &RootOrder::Insertion);
        let classification = classify_edges(&graph, &forest).unwrap();

        assert_eq!(classification.total(), 0);
        assert!(classification.tree_or_forward.is_empty());
        assert!(classification.back.is_empty());
        assert!(classification.cross.is_empty());
        assert_eq!(classification.percentage(EdgeKind::Back), 0.0);
    }

    #[test]
    fn test_self_loop_is_back_edge() {
        let graph = DirectedGraph::from_adjacency([("x", vec!["x"])]);
        let forest = traverse(&graph, &RootOrder::Insertion);
        let classification = classify_edges(&graph, &forest).unwrap();

        assert_eq!(classification.kind_of("x", "x"), Some(EdgeKind::Back));
        assert_eq!(classification.back.len(), 1);
    }

    #[test]
    fn test_mismatched_forest_is_an_error() {
        let graph = DirectedGraph::from_adjacency([("a", vec!["b"]), ("b", vec![])]);
        let forest = Forest::new(vec![Tree::from_iter([("a", (1, 2))])]);

        let err = classify_edges(&graph, &forest).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::MissingInterval {
                from: "a".into(),
                to: "b".into(),
                node: "b".into(),
            }
        );
    }

    #[test]
    fn test_edge_kind_of() {
        let outer = Interval::new(1, 10);
        let inner = Interval::new(2, 3);
        let other = Interval::new(11, 12);

        assert_eq!(EdgeKind::of(outer, inner), EdgeKind::TreeOrForward);
        assert_eq!(EdgeKind::of(inner, outer), EdgeKind::Back);
        assert_eq!(EdgeKind::of(other, inner), EdgeKind::Cross);
        assert_eq!(EdgeKind::of(outer, outer), EdgeKind::Back);
    }

    #[test]
    fn test_counts_and_percentage() {
        let graph = lecture_graph();
        let forest = traverse(&graph, &RootOrder::Insertion);
        let classification = classify_edges(&graph, &forest).unwrap();

        assert_eq!(
            classification.counts(),
            [
                (EdgeKind::TreeOrForward, 11),
                (EdgeKind::Back, 3),
                (EdgeKind::Cross, 5),
            ]
        );
        assert!((classification.percentage(EdgeKind::Back) - 300.0 / 19.0).abs() < 1e-9);
    }

    #[test]
    fn test_edge_kind_display() {
        assert_eq!(EdgeKind::TreeOrForward.to_string(), "tree/forward");
        assert_eq!(EdgeKind::Back.to_string(), "back");
        assert_eq!(EdgeKind::Cross.to_string(), "cross");
        assert_eq!(EdgeKind::TreeOrForward.key(), "tree_or_forward");
    }
}
