use crate::data::dataset::Category;
use crate::error::TreeError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// An ID3 decision tree.
///
/// A `Node` splits on a named feature and keeps one child per feature value
/// observed among the training records that reached it, in first-seen order.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum DecisionTree<V: Category, L: Category> {
    Leaf(L),
    Node {
        feature: String,
        children: Vec<(V, DecisionTree<V, L>)>,
    },
}

impl<V: Category, L: Category> DecisionTree<V, L> {
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    /// The feature this node splits on, or `None` for a leaf.
    pub fn feature(&self) -> Option<&str> {
        match self {
            Self::Leaf(_) => None,
            Self::Node { feature, .. } => Some(feature),
        }
    }

    /// The subtree reached when the split feature takes `value`.
    pub fn child(&self, value: &V) -> Option<&Self> {
        match self {
            Self::Leaf(_) => None,
            Self::Node { children, .. } => children
                .iter()
                .find(|(branch, _)| branch == value)
                .map(|(_, subtree)| subtree),
        }
    }

    /// Number of leaves reachable from this node.
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Leaf(_) => 1,
            Self::Node { children, .. } => children.iter().map(|(_, c)| c.leaf_count()).sum(),
        }
    }

    /// Number of internal nodes on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        match self {
            Self::Leaf(_) => 0,
            Self::Node { children, .. } => {
                1 + children.iter().map(|(_, c)| c.depth()).max().unwrap_or(0)
            }
        }
    }

    /// Walks the tree with a query vector and returns the predicted label.
    ///
    /// `feature_names` is the full feature list the tree was trained with and
    /// `query` holds one value per name, in the same order.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`TreeError::QueryLengthMismatch`] | `query` is not parallel to `feature_names` |
    /// | [`TreeError::UnknownFeature`] | a node splits on a name missing from `feature_names` |
    /// | [`TreeError::UnseenValue`] | no branch exists for the query's value |
    pub fn classify<S: AsRef<str>>(&self, feature_names: &[S], query: &[V]) -> Result<&L, TreeError> {
        if query.len() != feature_names.len() {
            return Err(TreeError::QueryLengthMismatch {
                expected: feature_names.len(),
                got: query.len(),
            });
        }

        let mut node = self;
        loop {
            match node {
                Self::Leaf(label) => return Ok(label),
                Self::Node { feature, .. } => {
                    let position = feature_names
                        .iter()
                        .position(|name| name.as_ref() == feature)
                        .ok_or_else(|| TreeError::UnknownFeature {
                            feature: feature.clone(),
                        })?;
                    let value = &query[position];
                    node = node.child(value).ok_or_else(|| TreeError::UnseenValue {
                        feature: feature.clone(),
                        value: value.to_string(),
                    })?;
                }
            }
        }
    }
}

/// Children compare as a mapping: branch order is irrelevant.
impl<V: Category, L: Category> PartialEq for DecisionTree<V, L> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Leaf(a), Self::Leaf(b)) => a == b,
            (
                Self::Node { feature: fa, children: ca },
                Self::Node { feature: fb, children: cb },
            ) => {
                fa == fb
                    && ca.len() == cb.len()
                    && ca.iter().all(|(value, subtree)| other.child(value) == Some(subtree))
            }
            _ => false,
        }
    }
}

impl<V: Category, L: Category> Eq for DecisionTree<V, L> {}

impl<V: Category, L: Category> Display for DecisionTree<V, L> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf(label) => write!(f, "{label}"),
            Self::Node { feature, children } => {
                write!(f, "{{{feature}: {{")?;
                for (i, (value, subtree)) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{value}: {subtree}")?;
                }
                write!(f, "}}}}")
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    fn node<V: Category, L: Category>(
        feature: &str,
        children: Vec<(V, DecisionTree<V, L>)>,
    ) -> DecisionTree<V, L> {
        DecisionTree::Node {
            feature: feature.to_string(),
            children,
        }
    }

    /// `{no surfacing: {0: no, 1: {flippers: {0: no, 1: yes}}}}`
    pub(crate) fn fish_tree() -> DecisionTree<i32, &'static str> {
        node(
            "no surfacing",
            vec![
                (0, DecisionTree::Leaf("no")),
                (
                    1,
                    node(
                        "flippers",
                        vec![(0, DecisionTree::Leaf("no")), (1, DecisionTree::Leaf("yes"))],
                    ),
                ),
            ],
        )
    }

    /// `{no surfacing: {0: no, 1: {flippers: {0: {head: {0: no, 1: yes}}, 1: no}}}}`
    pub(crate) fn head_tree() -> DecisionTree<i32, &'static str> {
        node(
            "no surfacing",
            vec![
                (0, DecisionTree::Leaf("no")),
                (
                    1,
                    node(
                        "flippers",
                        vec![
                            (
                                0,
                                node(
                                    "head",
                                    vec![(0, DecisionTree::Leaf("no")), (1, DecisionTree::Leaf("yes"))],
                                ),
                            ),
                            (1, DecisionTree::Leaf("no")),
                        ],
                    ),
                ),
            ],
        )
    }

    #[test]
    fn test_leaf_count_and_depth() {
        assert_eq!(fish_tree().leaf_count(), 3);
        assert_eq!(fish_tree().depth(), 2);
        assert_eq!(head_tree().leaf_count(), 4);
        assert_eq!(head_tree().depth(), 3);

        let leaf: DecisionTree<i32, &str> = DecisionTree::Leaf("no");
        assert_eq!(leaf.leaf_count(), 1);
        assert_eq!(leaf.depth(), 0);
    }

    #[test]
    fn test_classify() {
        let tree = fish_tree();
        let names = ["no surfacing", "flippers"];
        assert_eq!(*tree.classify(&names, &[1, 0]).unwrap(), "no");
        assert_eq!(*tree.classify(&names, &[1, 1]).unwrap(), "yes");
        assert_eq!(*tree.classify(&names, &[0, 1]).unwrap(), "no");
    }

    #[test]
    fn test_classify_follows_names_not_positions() {
        let tree = fish_tree();
        let names = ["flippers", "no surfacing"];
        assert_eq!(*tree.classify(&names, &[1, 1]).unwrap(), "yes");
        assert_eq!(*tree.classify(&names, &[0, 1]).unwrap(), "no");
    }

    #[test]
    fn test_classify_unseen_value() {
        let err = fish_tree()
            .classify(&["no surfacing", "flippers"], &[1, 2])
            .unwrap_err();
        match err {
            TreeError::UnseenValue { feature, value } => {
                assert_eq!(feature, "flippers");
                assert_eq!(value, "2");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_classify_unknown_feature() {
        let err = fish_tree()
            .classify(&["no surfacing", "fins"], &[1, 1])
            .unwrap_err();
        assert!(matches!(err, TreeError::UnknownFeature { feature } if feature == "flippers"));
    }

    #[test]
    fn test_classify_query_length() {
        let err = fish_tree()
            .classify(&["no surfacing", "flippers"], &[1])
            .unwrap_err();
        assert!(matches!(
            err,
            TreeError::QueryLengthMismatch {
                expected: 2,
                got: 1
            }
        ));
    }

    #[test]
    fn test_classify_leaf_root() {
        let tree: DecisionTree<i32, &str> = DecisionTree::Leaf("yes");
        let names: [&str; 0] = [];
        assert_eq!(*tree.classify(&names, &[]).unwrap(), "yes");
    }

    #[test]
    fn test_equality_ignores_branch_order() {
        let reordered = node(
            "no surfacing",
            vec![
                (
                    1,
                    node(
                        "flippers",
                        vec![(1, DecisionTree::Leaf("yes")), (0, DecisionTree::Leaf("no"))],
                    ),
                ),
                (0, DecisionTree::Leaf("no")),
            ],
        );
        assert_eq!(fish_tree(), reordered);
        assert_ne!(fish_tree(), head_tree());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            fish_tree().to_string(),
            "{no surfacing: {0: no, 1: {flippers: {0: no, 1: yes}}}}"
        );
    }

    #[test]
    fn test_child_and_feature() {
        let tree = fish_tree();
        assert_eq!(tree.feature(), Some("no surfacing"));
        assert!(tree.child(&0).unwrap().is_leaf());
        assert_eq!(tree.child(&1).unwrap().feature(), Some("flippers"));
        assert!(tree.child(&5).is_none());
    }
}
