//! ID3 Decision Tree Classifier
use super::builder::build_tree;
use super::node::DecisionTree;
use crate::data::dataset::{Category, Dataset};
use crate::error::TreeError;
use nalgebra::{DMatrix, DVector};
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tracing::{info, instrument};

/// ID3 decision tree classifier over categorical features.
///
/// Keeps the trained tree together with the full list of feature names, so
/// queries can be given as plain value vectors in training column order.
#[derive(Clone, Debug)]
pub struct DecisionTreeClassifier<V: Category, L: Category> {
    root: Option<DecisionTree<V, L>>,
    feature_names: Vec<String>,
}

impl<V: Category, L: Category> Default for DecisionTreeClassifier<V, L> {
    /// Creates an untrained classifier.
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Category, L: Category> DecisionTreeClassifier<V, L> {
    /// Creates an untrained classifier.
    pub fn new() -> Self {
        Self {
            root: None,
            feature_names: Vec::new(),
        }
    }

    /// Wraps an already built tree and the feature names it was trained with.
    pub fn from_tree(tree: DecisionTree<V, L>, feature_names: Vec<String>) -> Self {
        Self {
            root: Some(tree),
            feature_names,
        }
    }

    /// The trained tree, if `fit` has been called.
    pub fn tree(&self) -> Option<&DecisionTree<V, L>> {
        self.root.as_ref()
    }

    /// Takes the trained tree out of the classifier.
    pub fn into_tree(self) -> Option<DecisionTree<V, L>> {
        self.root
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Builds the decision tree from a dataset.
    ///
    /// # Arguments
    ///
    /// * `dataset` - The training records.
    /// * `feature_names` - One name per feature column, in column order.
    ///
    /// # Errors
    ///
    /// Propagates the errors of [`build_tree`]. On error the classifier keeps
    /// its previous state.
    #[instrument(skip_all, fields(n_records = dataset.nrows()))]
    pub fn fit<S: AsRef<str>>(
        &mut self,
        dataset: &Dataset<V, L>,
        feature_names: &[S],
    ) -> Result<(), TreeError> {
        let tree = build_tree(dataset, feature_names)?;
        info!(
            leaves = tree.leaf_count(),
            depth = tree.depth(),
            "finished building the tree"
        );
        self.feature_names = feature_names.iter().map(|n| n.as_ref().to_string()).collect();
        self.root = Some(tree);
        Ok(())
    }

    /// Predicts the label of a single query.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::NotFitted`] before `fit`, otherwise the errors of
    /// [`DecisionTree::classify`].
    pub fn classify(&self, query: &[V]) -> Result<&L, TreeError> {
        self.root
            .as_ref()
            .ok_or(TreeError::NotFitted)?
            .classify(&self.feature_names, query)
    }

    /// Predicts the labels for new data, one query per row.
    ///
    /// Rows are classified in parallel; the result keeps row order.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::NotFitted`] before `fit`, or the first error met
    /// while classifying a row.
    #[instrument(skip_all, fields(n_queries = queries.nrows()))]
    pub fn predict(&self, queries: &DMatrix<V>) -> Result<DVector<L>, TreeError> {
        let tree = self.root.as_ref().ok_or(TreeError::NotFitted)?;
        let predictions = (0..queries.nrows())
            .into_par_iter()
            .map(|row| {
                let query: Vec<V> = queries.row(row).iter().cloned().collect();
                tree.classify(&self.feature_names, &query).cloned()
            })
            .collect::<Result<Vec<_>, TreeError>>()?;

        Ok(DVector::from_vec(predictions))
    }
}
