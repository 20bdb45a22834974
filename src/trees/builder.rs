//! Recursive ID3 tree induction.
use super::node::DecisionTree;
use super::split::best_feature;
use crate::data::dataset::{Category, Dataset};
use crate::error::TreeError;
use tracing::{debug, instrument};

/// Builds an ID3 tree from `dataset`, whose feature columns are named by `feature_names`.
///
/// The caller's name list is not modified; every branch works on its own
/// copy of the names still unused along its path, so tree depth is bounded
/// by the number of features.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`TreeError::EmptyDataset`] | `dataset` has no records |
/// | [`TreeError::FeatureCountMismatch`] | `feature_names` is not parallel to the feature columns |
#[instrument(skip_all, fields(n_records = dataset.nrows(), n_features = dataset.nfeatures()))]
pub fn build_tree<V, L, S>(dataset: &Dataset<V, L>, feature_names: &[S]) -> Result<DecisionTree<V, L>, TreeError>
where
    V: Category,
    L: Category,
    S: AsRef<str>,
{
    if !dataset.is_not_empty() {
        return Err(TreeError::EmptyDataset);
    }
    if feature_names.len() != dataset.nfeatures() {
        return Err(TreeError::FeatureCountMismatch {
            expected: dataset.nfeatures(),
            got: feature_names.len(),
        });
    }

    let names = feature_names.iter().map(|n| n.as_ref().to_string()).collect();
    grow(dataset, names)
}

fn grow<V: Category, L: Category>(
    dataset: &Dataset<V, L>,
    feature_names: Vec<String>,
) -> Result<DecisionTree<V, L>, TreeError> {
    if dataset.is_pure() {
        return Ok(DecisionTree::Leaf(dataset.y[0].clone()));
    }
    if dataset.nfeatures() == 0 {
        return Ok(DecisionTree::Leaf(dataset.majority_label()?));
    }

    let best_index = best_feature(dataset)?;
    let mut remaining = feature_names;
    let feature = remaining.remove(best_index);
    let values = dataset.unique_values(best_index);
    debug!(feature = %feature, branches = values.len(), "splitting");

    let children = values
        .into_iter()
        .map(|value| {
            let subset = dataset.partition(best_index, &value);
            let subtree = grow(&subset, remaining.clone())?;
            Ok((value, subtree))
        })
        .collect::<Result<Vec<_>, TreeError>>()?;

    Ok(DecisionTree::Node { feature, children })
}
