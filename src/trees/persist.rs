//! Tree persistence via bincode.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use super::classifier::DecisionTreeClassifier;
use super::node::DecisionTree;
use crate::data::dataset::Category;
use crate::error::TreeError;

/// Current binary format version.
const FORMAT_VERSION: u32 = 1;

/// Versioned envelope for a saved classifier.
#[derive(Serialize, Deserialize)]
struct ModelEnvelope<T> {
    /// Format version for compatibility checking.
    format_version: u32,
    /// Feature names in training column order.
    feature_names: Vec<String>,
    /// The serialized tree.
    tree: T,
}

impl<V, L> DecisionTree<V, L>
where
    V: Category + Serialize + DeserializeOwned,
    L: Category + Serialize + DeserializeOwned,
{
    /// Encodes the tree as bytes.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::SerializeTree`] if bincode encoding fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>, TreeError> {
        bincode::serialize(self).map_err(|e| TreeError::SerializeTree { source: e })
    }

    /// Decodes a tree produced by [`DecisionTree::to_bytes`].
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::DeserializeTree`] if the bytes are not a valid tree.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TreeError> {
        bincode::deserialize(bytes).map_err(|e| TreeError::DeserializeTree { source: e })
    }
}

impl<V, L> DecisionTreeClassifier<V, L>
where
    V: Category + Serialize + DeserializeOwned,
    L: Category + Serialize + DeserializeOwned,
{
    /// Save the trained tree and its feature names to a binary file.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`TreeError::NotFitted`] | `fit` was never called |
    /// | [`TreeError::SerializeTree`] | bincode encoding failed |
    /// | [`TreeError::WriteFile`] | file write failed |
    #[instrument(skip(self), fields(path = %path.as_ref().display()))]
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), TreeError> {
        let path = path.as_ref();
        let tree = self.tree().ok_or(TreeError::NotFitted)?;

        let envelope = ModelEnvelope {
            format_version: FORMAT_VERSION,
            feature_names: self.feature_names().to_vec(),
            tree,
        };

        let bytes =
            bincode::serialize(&envelope).map_err(|e| TreeError::SerializeTree { source: e })?;

        std::fs::write(path, &bytes).map_err(|e| TreeError::WriteFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        info!(
            size_bytes = bytes.len(),
            leaves = tree.leaf_count(),
            "model saved"
        );

        Ok(())
    }

    /// Load a classifier written by [`DecisionTreeClassifier::save`].
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`TreeError::ReadFile`] | file read failed |
    /// | [`TreeError::DeserializeTree`] | bincode decoding failed |
    /// | [`TreeError::IncompatibleVersion`] | format version mismatch |
    #[instrument(fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TreeError> {
        let path = path.as_ref();

        let bytes = std::fs::read(path).map_err(|e| TreeError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        let envelope: ModelEnvelope<DecisionTree<V, L>> = bincode::deserialize(&bytes)
            .map_err(|e| TreeError::DeserializeTree { source: e })?;

        if envelope.format_version != FORMAT_VERSION {
            return Err(TreeError::IncompatibleVersion {
                expected: FORMAT_VERSION,
                found: envelope.format_version,
            });
        }

        debug!(
            n_features = envelope.feature_names.len(),
            leaves = envelope.tree.leaf_count(),
            "model loaded"
        );

        Ok(Self::from_tree(envelope.tree, envelope.feature_names))
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::trees::node::tests::{fish_tree, head_tree};

    #[test]
    fn bytes_round_trip() {
        let tree: DecisionTree<String, String> = DecisionTree::Node {
            feature: "tearRate".to_string(),
            children: vec![
                ("reduced".to_string(), DecisionTree::Leaf("no lenses".to_string())),
                ("normal".to_string(), DecisionTree::Leaf("soft".to_string())),
            ],
        };
        let bytes = tree.to_bytes().unwrap();
        assert_eq!(DecisionTree::<String, String>::from_bytes(&bytes).unwrap(), tree);
    }

    #[test]
    fn bytes_round_trip_integer_values() {
        let tree: DecisionTree<i32, String> = DecisionTree::Node {
            feature: "flippers".to_string(),
            children: vec![
                (0, DecisionTree::Leaf("no".to_string())),
                (1, DecisionTree::Leaf("yes".to_string())),
            ],
        };
        let restored = DecisionTree::<i32, String>::from_bytes(&tree.to_bytes().unwrap()).unwrap();
        assert_eq!(restored, tree);
    }

    #[test]
    fn corrupt_bytes_error() {
        let err = DecisionTree::<String, String>::from_bytes(b"\x07").unwrap_err();
        assert!(matches!(err, TreeError::DeserializeTree { .. }));
    }

    #[test]
    fn file_round_trip_identical_predictions() {
        let dir = TempDir::new().unwrap();
        let model_path = dir.path().join("tree.bin");

        let to_owned = |tree: DecisionTree<i32, &'static str>| -> DecisionTree<i32, String> {
            let bytes = bincode::serialize(&tree).unwrap();
            bincode::deserialize(&bytes).unwrap()
        };
        let names = vec!["no surfacing".to_string(), "flippers".to_string(), "head".to_string()];
        let model = DecisionTreeClassifier::from_tree(to_owned(head_tree()), names.clone());

        model.save(&model_path).unwrap();
        let loaded = DecisionTreeClassifier::<i32, String>::load(&model_path).unwrap();

        assert_eq!(loaded.feature_names(), names.as_slice());
        assert_eq!(loaded.tree(), model.tree());
        assert_ne!(loaded.tree(), Some(&to_owned(fish_tree())));
        for query in [[1, 0, 1], [1, 0, 0], [1, 1, 1], [0, 1, 0]] {
            assert_eq!(model.classify(&query).unwrap(), loaded.classify(&query).unwrap());
        }
    }

    #[test]
    fn save_unfitted_error() {
        let dir = TempDir::new().unwrap();
        let model = DecisionTreeClassifier::<String, String>::new();
        let err = model.save(dir.path().join("tree.bin")).unwrap_err();
        assert!(matches!(err, TreeError::NotFitted));
    }

    #[test]
    fn load_nonexistent_file_error() {
        let dir = TempDir::new().unwrap();
        let err = DecisionTreeClassifier::<String, String>::load(dir.path().join("missing.bin"))
            .unwrap_err();
        assert!(matches!(err, TreeError::ReadFile { .. }));
    }

    #[test]
    fn load_wrong_version_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("future.bin");
        let envelope = ModelEnvelope {
            format_version: FORMAT_VERSION + 1,
            feature_names: vec!["a".to_string()],
            tree: DecisionTree::<String, String>::Leaf("x".to_string()),
        };
        std::fs::write(&path, bincode::serialize(&envelope).unwrap()).unwrap();

        let err = DecisionTreeClassifier::<String, String>::load(&path).unwrap_err();
        assert!(matches!(
            err,
            TreeError::IncompatibleVersion { found, .. } if found == FORMAT_VERSION + 1
        ));
    }
}
