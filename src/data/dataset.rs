use crate::error::TreeError;
use crate::trees::split::shannon_entropy;
use nalgebra::{DMatrix, DVector};
use std::collections::HashMap;
use std::fmt::{self, Debug, Display, Formatter};
use std::hash::Hash;

/// A discrete token usable as a feature value or a class label.
///
/// Values are only ever compared for equality; no ordering is assumed.
pub trait Category: Debug + Display + Clone + Eq + Hash + Send + Sync + 'static {}

impl<T> Category for T where T: Debug + Display + Clone + Eq + Hash + Send + Sync + 'static {}

/// Counts occurrences of each distinct item, in first-seen order.
pub(crate) fn value_counts<'a, T, I>(items: I) -> Vec<(&'a T, usize)>
where
    T: Eq + Hash + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut positions: HashMap<&T, usize> = HashMap::new();
    let mut counts: Vec<(&T, usize)> = Vec::new();
    for item in items {
        match positions.get(item) {
            Some(&position) => counts[position].1 += 1,
            None => {
                positions.insert(item, counts.len());
                counts.push((item, 1));
            }
        }
    }
    counts
}

/// Training records split into a feature matrix and a label vector.
///
/// Row `r` of `x` together with `y[r]` is one record; the label plays the
/// role of the trailing column.
#[derive(Clone, PartialEq)]
pub struct Dataset<V: Category, L: Category> {
    pub x: DMatrix<V>,
    pub y: DVector<L>,
}

impl<V: Category, L: Category> Debug for Dataset<V, L> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Dataset {{\n    x: [\n")?;

        for i in 0..self.x.nrows() {
            write!(f, "        [")?;
            for j in 0..self.x.ncols() {
                write!(f, "{:?}, ", self.x[(i, j)])?;
            }
            writeln!(f, "],")?;
        }

        write!(f, "    ],\n    y: [")?;
        for i in 0..self.y.len() {
            write!(f, "{:?}, ", self.y[i])?;
        }
        write!(f, "]\n}}")
    }
}

impl<T: Category> Dataset<T, T> {
    /// Builds a dataset from records whose last element is the class label.
    ///
    /// Features and label share one type here. When they differ, such as
    /// integer features with string labels, build the matrix and label
    /// vector directly and pair them with [`Dataset::new`].
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::EmptyDataset`] for zero records and
    /// [`TreeError::MalformedRecord`] when a record is empty or its width
    /// differs from the first record's.
    pub fn from_records<R: AsRef<[T]>>(records: &[R]) -> Result<Self, TreeError> {
        let first = records.first().ok_or(TreeError::EmptyDataset)?;
        let width = first.as_ref().len();

        for (record_index, record) in records.iter().enumerate() {
            let got = record.as_ref().len();
            if got == 0 || got != width {
                return Err(TreeError::MalformedRecord {
                    record_index,
                    expected: width.max(1),
                    got,
                });
            }
        }

        let x = DMatrix::from_fn(records.len(), width - 1, |r, c| {
            records[r].as_ref()[c].clone()
        });
        let y = DVector::from_fn(records.len(), |r, _| records[r].as_ref()[width - 1].clone());

        Ok(Self { x, y })
    }
}

impl<V: Category, L: Category> Dataset<V, L> {
    /// Pairs a feature matrix with its labels. The two may hold different
    /// types.
    ///
    /// ```
    /// use id3_tree::Dataset;
    /// use nalgebra::{DMatrix, DVector};
    ///
    /// let x = DMatrix::from_row_slice(3, 2, &[1, 1, 1, 0, 0, 1]);
    /// let y = DVector::from_vec(vec!["yes", "no", "no"]);
    /// let dataset = Dataset::new(x, y).unwrap();
    /// assert_eq!(dataset.nfeatures(), 2);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::LabelCountMismatch`] if `x` and `y` disagree on
    /// the number of records.
    pub fn new(x: DMatrix<V>, y: DVector<L>) -> Result<Self, TreeError> {
        if x.nrows() != y.len() {
            return Err(TreeError::LabelCountMismatch {
                rows: x.nrows(),
                labels: y.len(),
            });
        }
        Ok(Self { x, y })
    }

    pub fn into_parts(&self) -> (&DMatrix<V>, &DVector<L>) {
        (&self.x, &self.y)
    }

    /// Whether the dataset holds at least one record.
    pub fn is_not_empty(&self) -> bool {
        !self.y.is_empty()
    }

    pub fn nrows(&self) -> usize {
        self.x.nrows()
    }

    /// Number of feature columns (the record width minus the label).
    pub fn nfeatures(&self) -> usize {
        self.x.ncols()
    }

    /// Feature values of record `index`, without its label.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn features_of(&self, index: usize) -> Vec<V> {
        self.x.row(index).iter().cloned().collect()
    }

    /// Shannon entropy of the label distribution.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::EmptyDataset`] when there are no records.
    pub fn entropy(&self) -> Result<f64, TreeError> {
        shannon_entropy(self.y.iter())
    }

    /// Returns `true` when every record carries the same label.
    pub fn is_pure(&self) -> bool {
        match self.y.iter().next() {
            Some(first) => self.y.iter().all(|label| label == first),
            None => true,
        }
    }

    /// Distinct values of a feature column, in the order they first occur.
    ///
    /// # Panics
    ///
    /// Panics if `feature_index` is not a column of the dataset.
    pub fn unique_values(&self, feature_index: usize) -> Vec<V> {
        value_counts(self.x.column(feature_index).iter())
            .into_iter()
            .map(|(value, _)| value.clone())
            .collect()
    }

    /// Records whose `feature_index` column equals `value`, with that column removed.
    ///
    /// The remaining columns keep their relative order and record order is
    /// preserved. `self` is left untouched.
    ///
    /// # Panics
    ///
    /// Panics if `feature_index` is not a column of the dataset.
    pub fn partition(&self, feature_index: usize, value: &V) -> Self {
        assert!(
            feature_index < self.nfeatures(),
            "feature index {feature_index} out of range for {} columns",
            self.nfeatures()
        );
        let rows: Vec<usize> = self
            .x
            .column(feature_index)
            .iter()
            .enumerate()
            .filter(|(_, cell)| *cell == value)
            .map(|(row, _)| row)
            .collect();

        let x = DMatrix::from_fn(rows.len(), self.nfeatures() - 1, |r, c| {
            let source = if c < feature_index { c } else { c + 1 };
            self.x[(rows[r], source)].clone()
        });
        let y = DVector::from_fn(rows.len(), |r, _| self.y[rows[r]].clone());

        Self { x, y }
    }

    /// The most frequent label; among equally frequent labels the first seen wins.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::EmptyDataset`] when there are no records.
    pub fn majority_label(&self) -> Result<L, TreeError> {
        let mut best: Option<(&L, usize)> = None;
        for (label, count) in value_counts(self.y.iter()) {
            if best.map_or(true, |(_, best_count)| count > best_count) {
                best = Some((label, count));
            }
        }
        best.map(|(label, _)| label.clone())
            .ok_or(TreeError::EmptyDataset)
    }
}
