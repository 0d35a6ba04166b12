//! Depth-first forest laid out for the terminal explorer
//!
//! The explorer tree is a flat arena in preorder: a node's descendants are
//! the `descendants` entries right after it. Flattening, toggling and
//! dropping are loops over that vector, so arbitrarily deep forests never
//! touch the call stack.

use std::collections::HashMap;

use crate::analysis::{component_index, Component, Forest, Interval, Tree};

/// A node of the explorer tree
#[derive(Debug, Clone)]
pub struct TreeNode {
    /// Node label
    pub name: String,
    /// Discovery and finishing times, `None` for the synthetic forest root
    pub interval: Option<Interval>,
    /// Index of the node's strongly connected component
    pub component: Option<usize>,
    /// Number of nodes in that component
    pub component_size: usize,
    /// Depth in the tree (0 = root)
    pub depth: usize,
    /// Whether this node is expanded in the UI
    pub expanded: bool,
    /// Whether this is the last child of its parent
    pub is_last_child: bool,
    /// Size of the subtree below this node
    pub descendants: usize,
}

impl TreeNode {
    fn new(name: impl Into<String>, depth: usize) -> Self {
        Self {
            name: name.into(),
            interval: None,
            component: None,
            component_size: 0,
            depth,
            expanded: false,
            is_last_child: true,
            descendants: 0,
        }
    }

    /// Check if this node has children
    pub fn has_children(&self) -> bool {
        self.descendants > 0
    }

    /// Whether the node belongs to a component with more than one node
    pub fn in_cycle(&self) -> bool {
        self.component_size > 1
    }
}

/// Preorder arena of explorer nodes
#[derive(Debug, Clone, Default)]
pub struct ExplorerTree {
    nodes: Vec<TreeNode>,
}

impl ExplorerTree {
    /// Builds the explorer tree of one depth-first tree.
    ///
    /// Parent links are recovered from interval nesting: entries come in
    /// discovery order, and a node's parent is the closest earlier entry
    /// whose interval still contains it.
    pub fn from_tree(tree: &Tree, components: &[Component]) -> Self {
        let index = component_index(components);
        let mut explorer = Self::default();
        explorer.push_tree(tree, 0, &index, components);
        explorer.finish();
        explorer
    }

    /// Builds a synthetic root labelled `label` with one child per tree of
    /// `forest`. The root starts expanded.
    pub fn from_forest(label: impl Into<String>, forest: &Forest, components: &[Component]) -> Self {
        let index = component_index(components);
        let mut root = TreeNode::new(label, 0);
        root.expanded = true;

        let mut explorer = Self { nodes: vec![root] };
        for tree in forest {
            explorer.push_tree(tree, 1, &index, components);
        }
        explorer.nodes[0].descendants = explorer.nodes.len() - 1;
        explorer.finish();
        explorer
    }

    fn push_tree(
        &mut self,
        tree: &Tree,
        base_depth: usize,
        index: &HashMap<&str, usize>,
        components: &[Component],
    ) {
        let mut open: Vec<usize> = Vec::new();

        for (name, interval) in tree.iter() {
            while let Some(&top) = open.last() {
                if self.nodes[top].interval.is_some_and(|iv| iv.contains(&interval)) {
                    break;
                }
                self.close(top);
                open.pop();
            }

            let component = index.get(name).copied();
            let mut node = TreeNode::new(name, base_depth + open.len());
            node.interval = Some(interval);
            node.component = component;
            node.component_size = component.map_or(0, |c| components[c].len());

            open.push(self.nodes.len());
            self.nodes.push(node);
        }

        for top in open.into_iter().rev() {
            self.close(top);
        }
    }

    fn close(&mut self, at: usize) {
        self.nodes[at].descendants = self.nodes.len() - at - 1;
    }

    // the entry right after a subtree is either a sibling or shallower
    fn finish(&mut self) {
        for i in 0..self.nodes.len() {
            let next = self.subtree_end(i);
            self.nodes[i].is_last_child =
                next >= self.nodes.len() || self.nodes[next].depth != self.nodes[i].depth;
        }
    }

    fn subtree_end(&self, at: usize) -> usize {
        at + 1 + self.nodes[at].descendants
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node at arena position `index`
    pub fn get(&self, index: usize) -> Option<&TreeNode> {
        self.nodes.get(index)
    }

    /// Toggle the expanded state of the node at arena position `index`
    ///
    /// Leaves are left alone. Returns whether anything changed.
    pub fn toggle(&mut self, index: usize) -> bool {
        match self.nodes.get_mut(index) {
            Some(node) if node.has_children() => {
                node.expanded = !node.expanded;
                true
            }
            _ => false,
        }
    }

    /// Expand every node with children
    pub fn expand_all(&mut self) {
        for node in &mut self.nodes {
            node.expanded = node.has_children();
        }
    }

    /// Collapse everything below the top level
    pub fn collapse_all(&mut self) {
        for node in &mut self.nodes {
            node.expanded = node.depth == 0 && node.has_children();
        }
    }

    /// Flatten the tree into a list for rendering
    ///
    /// Only includes nodes whose ancestors are all expanded.
    pub fn flatten(&self) -> Vec<FlattenedNode> {
        let mut rows = Vec::new();
        let mut at = 0;
        while let Some(node) = self.nodes.get(at) {
            rows.push(FlattenedNode {
                index: at,
                name: node.name.clone(),
                interval: node.interval,
                component: node.component,
                component_size: node.component_size,
                depth: node.depth,
                is_expanded: node.expanded,
                has_children: node.has_children(),
                is_last_child: node.is_last_child,
            });
            at = if node.expanded { at + 1 } else { self.subtree_end(at) };
        }
        rows
    }
}

/// A flattened representation of a tree node for rendering
#[derive(Debug, Clone)]
pub struct FlattenedNode {
    /// Position of the node in the arena
    pub index: usize,
    pub name: String,
    pub interval: Option<Interval>,
    pub component: Option<usize>,
    pub component_size: usize,
    /// Depth in the tree
    pub depth: usize,
    /// Whether this node is currently expanded
    pub is_expanded: bool,
    /// Whether this node has children
    pub has_children: bool,
    /// Whether this is the last child of its parent
    pub is_last_child: bool,
}

impl FlattenedNode {
    /// Get the expansion indicator character
    pub fn expansion_indicator(&self) -> &'static str {
        if !self.has_children {
            "  "
        } else if self.is_expanded {
            "▼ "
        } else {
            "▶ "
        }
    }

    /// Whether the node belongs to a component with more than one node
    pub fn in_cycle(&self) -> bool {
        self.component_size > 1
    }

    /// Text shown after the node name: its interval and component
    pub fn detail(&self) -> String {
        match (self.interval, self.component) {
            (Some(interval), Some(component)) => {
                format!(" {} scc#{} ({})", interval, component, self.component_size)
            }
            (Some(interval), None) => format!(" {}", interval),
            _ => String::new(),
        }
    }
}
