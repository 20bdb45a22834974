use std::path::PathBuf;

/// Errors from tree induction, classification, persistence and rendering.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// Returned when entropy, split selection or training sees zero records.
    #[error("dataset has zero records")]
    EmptyDataset,

    /// Returned when a split is requested on a dataset with only the label column.
    #[error("dataset has no feature columns left to split on")]
    NoFeatures,

    /// Returned when a record's width differs from the first record's width.
    #[error("record {record_index} has {got} fields, expected {expected}")]
    MalformedRecord {
        /// The zero-based index of the offending record.
        record_index: usize,
        /// The width of the first record.
        expected: usize,
        /// The width of the offending record.
        got: usize,
    },

    /// Returned when the feature matrix and the label vector differ in length.
    #[error("feature matrix has {rows} rows but there are {labels} labels")]
    LabelCountMismatch {
        /// Rows in the feature matrix.
        rows: usize,
        /// Entries in the label vector.
        labels: usize,
    },

    /// Returned when a classifier is queried or saved before `fit`.
    #[error("tree wasn't built yet")]
    NotFitted,

    /// Returned when the feature-name list does not match the column count.
    #[error("got {got} feature names for {expected} feature columns")]
    FeatureCountMismatch {
        /// The number of feature columns in the dataset.
        expected: usize,
        /// The number of feature names supplied.
        got: usize,
    },

    /// Returned when a tree splits on a feature missing from the query's feature list.
    #[error("feature '{feature}' is not in the feature list")]
    UnknownFeature {
        /// The feature named by the tree node.
        feature: String,
    },

    /// Returned when a query vector is not parallel to the feature list.
    #[error("query has {got} values, expected {expected}")]
    QueryLengthMismatch {
        /// The number of feature names.
        expected: usize,
        /// The number of values in the query.
        got: usize,
    },

    /// Returned when a query carries a value never seen for that feature at that node.
    #[error("value '{value}' of feature '{feature}' was not seen during training")]
    UnseenValue {
        /// The feature the node splits on.
        feature: String,
        /// The query's value for that feature.
        value: String,
    },

    /// Returned when the training file can't be read or parsed.
    #[error("failed to read training data from {path}")]
    ReadData {
        /// Path to the training file.
        path: PathBuf,
        /// The underlying csv error.
        source: csv::Error,
    },

    /// Returned when tree serialization fails.
    #[error("failed to serialize tree")]
    SerializeTree {
        /// The underlying bincode error.
        source: Box<bincode::ErrorKind>,
    },

    /// Returned when tree deserialization fails.
    #[error("failed to deserialize tree")]
    DeserializeTree {
        /// The underlying bincode error.
        source: Box<bincode::ErrorKind>,
    },

    /// Returned when writing a model or drawing fails.
    #[error("failed to write {path}")]
    WriteFile {
        /// Path to the file that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when reading a model file fails.
    #[error("failed to read {path}")]
    ReadFile {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when a serialized tree carries an unknown format version.
    #[error("incompatible model version: expected {expected}, found {found}")]
    IncompatibleVersion {
        /// The format version this build writes.
        expected: u32,
        /// The format version found in the stream.
        found: u32,
    },

    /// Returned when the plotting backend fails.
    #[error("failed to render tree: {reason}")]
    Render {
        /// Backend error message.
        reason: String,
    },

    /// Returned when a reader or plot parameter is out of range.
    #[error("invalid value for {name}: {reason}")]
    InvalidParam {
        /// Parameter name.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}
