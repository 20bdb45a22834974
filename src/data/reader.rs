//! Reading delimited training files.
use super::dataset::Dataset;
use crate::error::TreeError;
use csv::ReaderBuilder;
use std::path::Path;
use tracing::{debug, instrument};

/// Options for reading a training file.
///
/// Defaults to tab-separated fields with no header row.
#[derive(Clone, Debug)]
pub struct ReaderParams {
    delimiter: u8,
    has_headers: bool,
}

impl Default for ReaderParams {
    fn default() -> Self {
        Self::new()
    }
}

impl ReaderParams {
    pub fn new() -> Self {
        Self {
            delimiter: b'\t',
            has_headers: false,
        }
    }

    /// Sets the field delimiter.
    ///
    /// # Errors
    ///
    /// Line terminators can't separate fields and are rejected, as is any
    /// byte outside ASCII.
    pub fn set_delimiter(&mut self, delimiter: u8) -> Result<(), TreeError> {
        if delimiter == b'\n' || delimiter == b'\r' {
            return Err(TreeError::InvalidParam {
                name: "delimiter",
                reason: "a line terminator can't be used as a field delimiter".into(),
            });
        }
        if !delimiter.is_ascii() {
            return Err(TreeError::InvalidParam {
                name: "delimiter",
                reason: format!("byte {delimiter:#04x} is not ASCII"),
            });
        }
        self.delimiter = delimiter;
        Ok(())
    }

    /// Whether the first line holds column names instead of a record.
    pub fn set_has_headers(&mut self, has_headers: bool) {
        self.has_headers = has_headers;
    }

    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    pub fn has_headers(&self) -> bool {
        self.has_headers
    }
}

/// Reads every record of a delimited file as string fields.
///
/// Whitespace is stripped from the two ends of each line, so leading or
/// trailing empty fields made of whitespace delimiters disappear, while
/// spaces inside a line are kept as part of their field. Blank lines are
/// skipped. Records may differ in width here; width is
/// checked when the records become a [`Dataset`].
///
/// # Errors
///
/// Returns [`TreeError::ReadData`] if the file can't be opened or parsed.
#[instrument(skip(params), fields(path = %path.as_ref().display()))]
pub fn read_records(
    path: impl AsRef<Path>,
    params: &ReaderParams,
) -> Result<Vec<Vec<String>>, TreeError> {
    let path = path.as_ref();
    let read_error = |source: csv::Error| TreeError::ReadData {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = ReaderBuilder::new()
        .delimiter(params.delimiter)
        .has_headers(params.has_headers)
        .flexible(true)
        .quoting(false)
        .from_path(path)
        .map_err(read_error)?;

    let delimiter = char::from(params.delimiter);
    let separator = delimiter.to_string();
    let mut records = Vec::new();
    for result in reader.records() {
        let record = result.map_err(read_error)?;
        // fields never hold the delimiter with quoting off, so this rebuilds the line
        let line = record.iter().collect::<Vec<_>>().join(separator.as_str());
        records.push(line.trim().split(delimiter).map(str::to_string).collect());
    }

    debug!(n_records = records.len(), "read training records");
    Ok(records)
}

/// Reads a delimited file into a dataset whose last column is the label.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`TreeError::ReadData`] | file can't be opened or parsed |
/// | [`TreeError::EmptyDataset`] | file holds no records |
/// | [`TreeError::MalformedRecord`] | records differ in width |
pub fn read_dataset(
    path: impl AsRef<Path>,
    params: &ReaderParams,
) -> Result<Dataset<String, String>, TreeError> {
    let records = read_records(path, params)?;
    Dataset::from_records(&records)
}

/// Reads a tab-separated file with no header row.
pub fn read_tsv(path: impl AsRef<Path>) -> Result<Dataset<String, String>, TreeError> {
    read_dataset(path, &ReaderParams::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_read_tsv() {
        let file = write_file("young\tmyope\tno lenses  \npre\thyper\tsoft\n\n");
        let dataset = read_tsv(file.path()).unwrap();
        assert_eq!(dataset.nrows(), 2);
        assert_eq!(dataset.nfeatures(), 2);
        assert_eq!(dataset.features_of(1), vec!["pre", "hyper"]);
        assert_eq!(dataset.y[0], "no lenses");
        assert_eq!(dataset.y[1], "soft");
    }

    #[test]
    fn test_only_line_ends_are_stripped() {
        let file = write_file("  a \t b\tyes\t\n\tc\td\tno  \n");
        let dataset = read_tsv(file.path()).unwrap();
        assert_eq!(dataset.nfeatures(), 2);
        assert_eq!(dataset.features_of(0), vec!["a ", " b"]);
        assert_eq!(dataset.features_of(1), vec!["c", "d"]);
        assert_eq!(dataset.y[0], "yes");
        assert_eq!(dataset.y[1], "no");
    }

    #[test]
    fn test_read_with_headers_and_delimiter() {
        let file = write_file("outlook,windy,play\nsunny,no,yes\nrain,yes,no\n");
        let mut params = ReaderParams::new();
        params.set_delimiter(b',').unwrap();
        params.set_has_headers(true);
        let dataset = read_dataset(file.path(), &params).unwrap();
        assert_eq!(dataset.nrows(), 2);
        assert_eq!(dataset.features_of(0), vec!["sunny", "no"]);
    }

    #[test]
    fn test_ragged_file() {
        let file = write_file("a\tb\tyes\na\tno\n");
        let err = read_tsv(file.path()).unwrap_err();
        assert!(matches!(
            err,
            TreeError::MalformedRecord {
                record_index: 1,
                expected: 3,
                got: 2
            }
        ));
    }

    #[test]
    fn test_empty_file() {
        let file = write_file("");
        assert!(matches!(read_tsv(file.path()), Err(TreeError::EmptyDataset)));
    }

    #[test]
    fn test_missing_file() {
        let err = read_tsv("/nonexistent/lenses.txt").unwrap_err();
        assert!(matches!(err, TreeError::ReadData { .. }));
    }

    #[test]
    fn test_invalid_delimiter() {
        let mut params = ReaderParams::new();
        assert!(params.set_delimiter(b'\n').is_err());
        assert!(params.set_delimiter(0xe9).is_err());
        assert_eq!(params.delimiter(), b'\t');
    }
}
