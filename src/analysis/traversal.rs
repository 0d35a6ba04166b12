//! Depth-first traversal with pre/post numbering.
//!
//! The traversal is iterative: each stack frame holds a node's slot in the
//! current tree and the iterator over its remaining successors, so the
//! numbering is identical to the recursive formulation without any depth
//! limit.

use std::collections::HashMap;

use petgraph::graph::NodeIndex;

use crate::graph::DirectedGraph;

/// The order in which root candidates are tried.
///
/// The choice changes the resulting pre/post numbers, and through them the
/// edge classification, so it is always explicit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RootOrder {
    /// Nodes in the order they were added to the graph
    #[default]
    Insertion,
    /// Nodes sorted by label
    Sorted,
    /// The listed nodes first, then any remaining nodes in insertion order
    Given(Vec<String>),
}

impl RootOrder {
    /// Resolves the root candidates for `graph`.
    ///
    /// For [`RootOrder::Given`] the full node list is appended after the
    /// requested nodes; nodes already visited are skipped by the traversal,
    /// so every node still ends up in exactly one tree.
    fn roots(&self, graph: &DirectedGraph) -> Vec<NodeIndex> {
        match self {
            Self::Insertion => graph.indices().collect(),
            Self::Sorted => {
                let mut roots: Vec<NodeIndex> = graph.indices().collect();
                roots.sort_by(|&a, &b| graph.name_of(a).cmp(graph.name_of(b)));
                roots
            }
            Self::Given(names) => {
                let mut roots = Vec::with_capacity(names.len() + graph.node_count());
                for name in names {
                    match graph.index_of(name) {
                        Some(idx) => roots.push(idx),
                        None => log::debug!("Ignoring unknown root '{}'", name),
                    }
                }
                roots.extend(graph.indices());
                roots
            }
        }
    }
}

/// Discovery and finishing times of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    /// Clock value when the node was first discovered
    pub pre: usize,
    /// Clock value when the node's exploration finished
    pub post: usize,
}

impl Interval {
    /// Creates a new interval.
    pub fn new(pre: usize, post: usize) -> Self {
        Self { pre, post }
    }

    /// True if `other` lies strictly inside this interval.
    pub fn contains(&self, other: &Interval) -> bool {
        self.pre < other.pre && other.post < self.post
    }

    /// True if the two intervals do not overlap at all.
    pub fn is_disjoint(&self, other: &Interval) -> bool {
        self.post < other.pre || other.post < self.pre
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.pre, self.post)
    }
}

impl From<(usize, usize)> for Interval {
    fn from((pre, post): (usize, usize)) -> Self {
        Self::new(pre, post)
    }
}

/// One tree of a depth-first forest.
///
/// Entries are kept in discovery order, so the first entry is the root.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tree {
    entries: Vec<(String, Interval)>,
}

impl Tree {
    /// Returns the root label, if the tree is not empty.
    pub fn root(&self) -> Option<&str> {
        self.entries.first().map(|(name, _)| name.as_str())
    }

    /// Looks up the interval of a node in this tree.
    pub fn get(&self, name: &str) -> Option<Interval> {
        self.entries
            .iter()
            .find(|(node, _)| node == name)
            .map(|&(_, interval)| interval)
    }

    /// Iterates over `(label, interval)` pairs in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Interval)> {
        self.entries
            .iter()
            .map(|(name, interval)| (name.as_str(), *interval))
    }

    /// Returns the node labels in discovery order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Returns the number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks if the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, (usize, usize))> for Tree {
    fn from_iter<T: IntoIterator<Item = (S, (usize, usize))>>(iter: T) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(name, interval)| (name.into(), interval.into()))
                .collect(),
        }
    }
}

/// A depth-first forest: trees in the order their roots were visited.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Forest {
    trees: Vec<Tree>,
}

impl Forest {
    /// Creates a forest from already computed trees.
    pub fn new(trees: Vec<Tree>) -> Self {
        Self { trees }
    }

    /// Returns the trees of the forest.
    pub fn trees(&self) -> &[Tree] {
        &self.trees
    }

    /// Iterates over the trees.
    pub fn iter(&self) -> std::slice::Iter<'_, Tree> {
        self.trees.iter()
    }

    /// Returns the number of trees.
    pub fn len(&self) -> usize {
        self.trees.len()
    }

    /// Checks if the forest has no trees.
    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    /// Returns the total number of nodes across all trees.
    pub fn node_count(&self) -> usize {
        self.trees.iter().map(Tree::len).sum()
    }

    /// Looks up the interval of a node in any tree.
    pub fn interval(&self, name: &str) -> Option<Interval> {
        self.trees.iter().find_map(|tree| tree.get(name))
    }

    /// Builds a label → interval lookup table over the whole forest.
    pub fn intervals(&self) -> HashMap<&str, Interval> {
        self.trees.iter().flat_map(Tree::iter).collect()
    }
}

impl<'a> IntoIterator for &'a Forest {
    type Item = &'a Tree;
    type IntoIter = std::slice::Iter<'a, Tree>;

    fn into_iter(self) -> Self::IntoIter {
        self.trees.iter()
    }
}

/// A tree expressed over node indices, in discovery order.
pub(crate) type IndexTree = Vec<(NodeIndex, Interval)>;

/// A stack frame: the node's slot in the current tree and the successors
/// still to be examined.
struct Frame {
    slot: usize,
    successors: std::vec::IntoIter<NodeIndex>,
}

/// Traversal state owned by a single call: visited flags, the shared
/// clock and the explicit stack.
struct DepthFirst<'a> {
    graph: &'a DirectedGraph,
    visited: Vec<bool>,
    clock: usize,
    stack: Vec<Frame>,
}

impl<'a> DepthFirst<'a> {
    fn new(graph: &'a DirectedGraph) -> Self {
        Self {
            graph,
            visited: vec![false; graph.node_count()],
            clock: 1,
            stack: Vec::with_capacity(16),
        }
    }

    fn previsit(&mut self, node: NodeIndex, tree: &mut IndexTree) {
        self.visited[node.index()] = true;
        tree.push((node, Interval::new(self.clock, 0)));
        self.clock += 1;
        self.stack.push(Frame {
            slot: tree.len() - 1,
            successors: self.graph.successor_indices(node).into_iter(),
        });
    }

    fn explore(&mut self, root: NodeIndex) -> IndexTree {
        let mut tree = IndexTree::new();
        self.previsit(root, &mut tree);

        while let Some(frame) = self.stack.last_mut() {
            let next = frame
                .successors
                .find(|succ| !self.visited[succ.index()]);

            match next {
                Some(succ) => self.previsit(succ, &mut tree),
                None => {
                    let slot = frame.slot;
                    self.stack.pop();
                    tree[slot].1.post = self.clock;
                    self.clock += 1;
                }
            }
        }

        tree
    }
}

/// Runs a depth-first search trying roots in the given order.
pub(crate) fn depth_first<R>(graph: &DirectedGraph, roots: R) -> Vec<IndexTree>
where
    R: IntoIterator<Item = NodeIndex>,
{
    let mut visit = DepthFirst::new(graph);
    let mut forest = Vec::new();

    for root in roots {
        if visit.visited[root.index()] {
            continue;
        }
        forest.push(visit.explore(root));
    }

    log::debug!(
        "Depth-first search produced {} tree(s), clock ended at {}",
        forest.len(),
        visit.clock
    );
    forest
}

/// Computes the depth-first forest of `graph`.
///
/// Roots are tried in `order`; successors are explored in adjacency order.
/// A single clock, starting at 1, is shared by all trees and advanced once
/// for every discovery and once for every finish.
///
/// # Example
///
/// ```rust
/// use sccscope::analysis::{traverse, Interval, RootOrder};
/// use sccscope::graph::DirectedGraph;
///
/// let graph = DirectedGraph::from_adjacency([("a", vec!["b"]), ("b", vec![]), ("c", vec![])]);
/// let forest = traverse(&graph, &RootOrder::Insertion);
///
/// assert_eq!(forest.len(), 2);
/// assert_eq!(forest.interval("a"), Some(Interval::new(1, 4)));
/// assert_eq!(forest.interval("c"), Some(Interval::new(5, 6)));
/// ```
pub fn traverse(graph: &DirectedGraph, order: &RootOrder) -> Forest {
    let trees = depth_first(graph, order.roots(graph))
        .into_iter()
        .map(|tree| Tree {
            entries: tree
                .into_iter()
                .map(|(idx, interval)| (graph.name_of(idx).to_string(), interval))
                .collect(),
        })
        .collect();

    Forest::new(trees)
}

#[cfg(test)]
mod tests {
    use super::*;

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

    fn numbered_graph() -> DirectedGraph {
        DirectedGraph::from_adjacency([
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
        ])
    }

    #[test]
    fn test_traverse_insertion_order() {
        let forest = traverse(&lecture_graph(), &RootOrder::Insertion);

        let expected = Forest::new(vec![
            Tree::from_iter([
                ("a", (1, 20)),
                ("e", (2, 13)),
                ("d", (3, 12)),
                ("h", (4, 11)),
                ("i", (5, 10)),
                ("l", (6, 9)),
                ("g", (7, 8)),
                ("f", (14, 19)),
                ("b", (15, 16)),
                ("c", (17, 18)),
            ]),
            Tree::from_iter([("j", (21, 24)), ("k", (22, 23))]),
        ]);

        assert_eq!(forest, expected);
    }

    #[test]
    fn test_traverse_numbered_graph() {
        let forest = traverse(&numbered_graph(), &RootOrder::Insertion);

        let expected = Forest::new(vec![
            Tree::from_iter([
                ("n01", (1, 16)),
                ("n02", (2, 15)),
                ("n05", (3, 14)),
                ("n04", (4, 7)),
                ("n03", (5, 6)),
                ("n06", (8, 13)),
                ("n07", (9, 12)),
                ("n08", (10, 11)),
            ]),
            Tree::from_iter([("n09", (17, 18))]),
            Tree::from_iter([("n10", (19, 20))]),
        ]);

        assert_eq!(forest, expected);
    }

    #[test]
    fn test_traverse_sorted_order() {
        let graph = DirectedGraph::from_adjacency([
            ("c", vec!["a"]),
            ("b", vec![]),
            ("a", vec![]),
        ]);

        let insertion = traverse(&graph, &RootOrder::Insertion);
        assert_eq!(insertion.trees()[0].names(), vec!["c", "a"]);

        let sorted = traverse(&graph, &RootOrder::Sorted);
        let roots: Vec<_> = sorted.iter().filter_map(Tree::root).collect();
        assert_eq!(roots, vec!["a", "b", "c"]);
        assert_eq!(sorted.interval("c"), Some(Interval::new(5, 6)));
    }

    #[test]
    fn test_traverse_given_order() {
        let graph = lecture_graph();
        let order = RootOrder::Given(vec!["j".into(), "unknown".into(), "g".into()]);
        let forest = traverse(&graph, &order);

        assert_eq!(forest.trees()[0].root(), Some("j"));
        assert_eq!(forest.node_count(), graph.node_count());
        // every node is reachable from j
        assert_eq!(forest.len(), 1);
    }

    #[test]
    fn test_traverse_empty_graph() {
        let forest = traverse(&DirectedGraph::new(), &RootOrder::Insertion);
        assert!(forest.is_empty());
        assert_eq!(forest.node_count(), 0);
    }

    #[test]
    fn test_isolated_node_gets_interval() {
        let graph = DirectedGraph::from_adjacency([("x", Vec::<&str>::new())]);
        let forest = traverse(&graph, &RootOrder::Insertion);
        assert_eq!(forest.interval("x"), Some(Interval::new(1, 2)));
    }

    #[test]
    fn test_self_loop() {
        let graph = DirectedGraph::from_adjacency([("x", vec!["x"])]);
        let forest = traverse(&graph, &RootOrder::Insertion);
        assert_eq!(forest.interval("x"), Some(Interval::new(1, 2)));
    }

    #[test]
    fn test_undeclared_target_has_no_successors() {
        let graph = DirectedGraph::from_adjacency([("a", vec!["ghost"])]);
        let forest = traverse(&graph, &RootOrder::Insertion);

        assert_eq!(forest.len(), 1);
        assert_eq!(forest.interval("a"), Some(Interval::new(1, 4)));
        assert_eq!(forest.interval("ghost"), Some(Interval::new(2, 3)));
    }

    #[test]
    fn test_deep_path_does_not_overflow() {
        let n = 200_000;
        let adjacency = (0..n).map(|i| {
            let succs = if i + 1 < n { vec![format!("v{}", i + 1)] } else { vec![] };
            (format!("v{}", i), succs)
        });
        let graph = DirectedGraph::from_adjacency(adjacency);

        let forest = traverse(&graph, &RootOrder::Insertion);
        assert_eq!(forest.len(), 1);
        assert_eq!(forest.interval("v0"), Some(Interval::new(1, 2 * n)));
    }

    #[test]
    fn test_traverse_is_idempotent() {
        let graph = lecture_graph();
        assert_eq!(
            traverse(&graph, &RootOrder::Sorted),
            traverse(&graph, &RootOrder::Sorted)
        );
    }

    #[test]
    fn test_interval_relations() {
        let outer = Interval::new(1, 10);
        let inner = Interval::new(2, 5);
        let after = Interval::new(11, 12);

        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));
        assert!(!outer.contains(&outer));
        assert!(outer.is_disjoint(&after));
        assert!(!outer.is_disjoint(&inner));
    }

    #[test]
    fn test_forest_intervals_lookup() {
        let forest = traverse(&lecture_graph(), &RootOrder::Insertion);
        let intervals = forest.intervals();

        assert_eq!(intervals.len(), 12);
        assert_eq!(intervals["k"], Interval::new(22, 23));
        assert_eq!(forest.interval("missing"), None);
    }
}
