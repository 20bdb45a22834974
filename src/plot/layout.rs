//! Node-and-edge layout of a decision tree in unit coordinates.
//!
//! Leaves are spaced `1 / leaf_count` apart along x and levels `1 / depth`
//! apart along y, with the root at `(0.5, 1.0)` and every decision node
//! centred above the leaves of its subtree.
use crate::data::dataset::Category;
use crate::trees::node::DecisionTree;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Decision,
    Leaf,
}

/// A node placed in the unit square; `y` grows upwards.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedNode {
    pub text: String,
    pub kind: NodeKind,
    pub x: f64,
    pub y: f64,
}

/// An edge between two placed nodes, labelled with the branch value.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedEdge {
    pub parent: usize,
    pub child: usize,
    pub label: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TreeLayout {
    pub nodes: Vec<PlacedNode>,
    pub edges: Vec<PlacedEdge>,
    pub leaf_count: usize,
    pub depth: usize,
}

/// Traversal state: where the next leaf and the current level go.
struct Cursor {
    x_off: f64,
    y_off: f64,
    total_w: f64,
    total_d: f64,
}

impl TreeLayout {
    pub fn new<V: Category, L: Category>(tree: &DecisionTree<V, L>) -> Self {
        let leaf_count = tree.leaf_count();
        let depth = tree.depth();
        let mut layout = Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            leaf_count,
            depth,
        };

        match tree {
            DecisionTree::Leaf(label) => {
                layout.push_node(label.to_string(), NodeKind::Leaf, (0.5, 0.5), None);
            }
            DecisionTree::Node { feature, children } => {
                let total_w = leaf_count as f64;
                let mut cursor = Cursor {
                    x_off: -0.5 / total_w,
                    y_off: 1.0,
                    total_w,
                    total_d: depth as f64,
                };
                layout.place(feature, children, leaf_count, None, &mut cursor);
            }
        }
        layout
    }

    /// Midpoint of an edge, where its branch label is drawn.
    pub fn edge_midpoint(&self, edge: &PlacedEdge) -> (f64, f64) {
        let parent = &self.nodes[edge.parent];
        let child = &self.nodes[edge.child];
        ((parent.x + child.x) / 2.0, (parent.y + child.y) / 2.0)
    }

    fn push_node(
        &mut self,
        text: String,
        kind: NodeKind,
        (x, y): (f64, f64),
        parent: Option<(usize, String)>,
    ) -> usize {
        let index = self.nodes.len();
        self.nodes.push(PlacedNode { text, kind, x, y });
        if let Some((parent, label)) = parent {
            self.edges.push(PlacedEdge {
                parent,
                child: index,
                label,
            });
        }
        index
    }

    fn place<V: Category, L: Category>(
        &mut self,
        feature: &str,
        children: &[(V, DecisionTree<V, L>)],
        leaves: usize,
        parent: Option<(usize, String)>,
        cursor: &mut Cursor,
    ) {
        let centre = (
            cursor.x_off + (1.0 + leaves as f64) / 2.0 / cursor.total_w,
            cursor.y_off,
        );
        let index = self.push_node(feature.to_string(), NodeKind::Decision, centre, parent);

        cursor.y_off -= 1.0 / cursor.total_d;
        for (value, child) in children {
            let edge = Some((index, value.to_string()));
            match child {
                DecisionTree::Node { feature, children } => {
                    self.place(feature, children, child.leaf_count(), edge, cursor);
                }
                DecisionTree::Leaf(label) => {
                    cursor.x_off += 1.0 / cursor.total_w;
                    let at = (cursor.x_off, cursor.y_off);
                    self.push_node(label.to_string(), NodeKind::Leaf, at, edge);
                }
            }
        }
        cursor.y_off += 1.0 / cursor.total_d;
    }
}
