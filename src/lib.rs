//! # id3-tree
//!
//! `id3-tree` builds ID3 decision trees from categorical training data and
//! uses them to classify new examples. Features and labels are opaque
//! tokens compared only for equality; splits are chosen by information gain.
//!
//! ## Example Usage
//!
//! Training on the classic "is it a fish?" dataset:
//!
//! ```rust
//! use id3_tree::data::dataset::Dataset;
//! use id3_tree::trees::classifier::DecisionTreeClassifier;
//! use nalgebra::{DMatrix, DVector};
//!
//! let x = DMatrix::from_row_slice(5, 2, &[1, 1, 1, 1, 1, 0, 0, 1, 0, 1]);
//! let y = DVector::from_vec(vec!["yes", "yes", "no", "no", "no"]);
//! let dataset = Dataset::new(x, y).unwrap();
//!
//! let mut model = DecisionTreeClassifier::new();
//! model.fit(&dataset, &["no surfacing", "flippers"]).unwrap();
//!
//! assert_eq!(
//!     model.tree().unwrap().to_string(),
//!     "{no surfacing: {1: {flippers: {1: yes, 0: no}}, 0: no}}"
//! );
//! assert_eq!(*model.classify(&[1, 0]).unwrap(), "no");
//! assert_eq!(*model.classify(&[1, 1]).unwrap(), "yes");
//! ```

/// Dataset representation and training-file reading
pub mod data;
/// Error type shared by every module
pub mod error;
/// Tree layout and SVG drawing
pub mod plot;
/// ID3 tree induction, classification and persistence
pub mod trees;

pub use data::dataset::{Category, Dataset};
pub use error::TreeError;
pub use trees::builder::build_tree;
pub use trees::classifier::DecisionTreeClassifier;
pub use trees::node::DecisionTree;
