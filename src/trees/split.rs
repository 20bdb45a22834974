//! Entropy and information-gain evaluation of candidate splits.
use crate::data::dataset::{value_counts, Category, Dataset};
use crate::error::TreeError;
use tracing::{debug, trace};

/// Shannon entropy (base 2) of a label distribution.
///
/// Only observed labels are enumerated, so no `log2(0)` term ever arises.
/// The result is exactly `0.0` when all labels are equal.
///
/// # Errors
///
/// Returns [`TreeError::EmptyDataset`] when `labels` is empty.
pub fn shannon_entropy<'a, L, I>(labels: I) -> Result<f64, TreeError>
where
    L: Category,
    I: IntoIterator<Item = &'a L>,
{
    let counts = value_counts(labels);
    let total: usize = counts.iter().map(|(_, count)| count).sum();
    if total == 0 {
        return Err(TreeError::EmptyDataset);
    }

    let total = total as f64;
    Ok(counts.iter().fold(0.0, |entropy, (_, count)| {
        let p = *count as f64 / total;
        entropy - p * p.log2()
    }))
}

/// Entropy of the dataset after partitioning on `feature_index`, each
/// partition weighted by its share of the records.
fn weighted_entropy<V: Category, L: Category>(
    dataset: &Dataset<V, L>,
    feature_index: usize,
) -> Result<f64, TreeError> {
    let (x, y) = dataset.into_parts();
    let column = x.column(feature_index);
    let total = dataset.nrows() as f64;

    let mut weighted = 0.0;
    for value in dataset.unique_values(feature_index) {
        let labels: Vec<&L> = column
            .iter()
            .zip(y.iter())
            .filter(|(cell, _)| **cell == value)
            .map(|(_, label)| label)
            .collect();
        let weight = labels.len() as f64 / total;
        weighted += weight * shannon_entropy(labels)?;
    }
    Ok(weighted)
}

/// Reduction in label entropy achieved by splitting on `feature_index`.
///
/// # Errors
///
/// Returns [`TreeError::EmptyDataset`] when the dataset has no records.
///
/// # Panics
///
/// Panics if `feature_index` is not a column of the dataset.
pub fn information_gain<V: Category, L: Category>(
    dataset: &Dataset<V, L>,
    feature_index: usize,
) -> Result<f64, TreeError> {
    Ok(dataset.entropy()? - weighted_entropy(dataset, feature_index)?)
}

/// Index of the feature with the highest information gain.
///
/// A later feature replaces the current best only when its gain is strictly
/// greater, so ties go to the lowest index. When no feature has positive
/// gain the first feature is returned.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`TreeError::EmptyDataset`] | no records |
/// | [`TreeError::NoFeatures`] | only the label column is left |
pub fn best_feature<V: Category, L: Category>(dataset: &Dataset<V, L>) -> Result<usize, TreeError> {
    if !dataset.is_not_empty() {
        return Err(TreeError::EmptyDataset);
    }
    if dataset.nfeatures() == 0 {
        return Err(TreeError::NoFeatures);
    }

    let base_entropy = dataset.entropy()?;
    let mut best_gain = 0.0;
    let mut best_index = 0;

    for feature_index in 0..dataset.nfeatures() {
        let gain = base_entropy - weighted_entropy(dataset, feature_index)?;
        trace!(feature_index, gain, "candidate split");
        if gain > best_gain {
            best_gain = gain;
            best_index = feature_index;
        }
    }

    debug!(best_index, best_gain, base_entropy, "selected split");
    Ok(best_index)
}
