//! The publication record table and its CSV loader.
//!
//! The dataset is one UTF-8 delimited file with a header row. Every row is
//! one published work. The only column the loader interprets is
//! [`AUTHOR_IDS_COLUMN`]: a `;`-separated list of author identifiers, split
//! into an ordered vector at load time (an empty or missing cell yields an
//! empty vector, never a sentinel). All other cells are stored verbatim and
//! interpreted by the caller that selects them.

use std::{fs::File, io, path::Path};

/// Name of the required author-identifier column.
pub const AUTHOR_IDS_COLUMN: &str = "authorids";

/// Default location of the publication dataset.
pub const DEFAULT_DATA_PATH: &str = "data/data.csv";

/// Error produced while loading the publication dataset.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum LoadError {
    /// The file could not be opened.
    #[display("failed to open dataset: {source}")]
    Io {
        /// Underlying I/O error.
        source: io::Error,
    },
    /// The file could not be parsed as delimited data.
    #[display("failed to parse dataset: {source}")]
    Csv {
        /// Underlying CSV error.
        source: csv::Error,
    },
    /// A required column is absent from the header row.
    #[display("required column '{name}' is missing from the dataset")]
    MissingColumn {
        /// Name of the missing column.
        name: String,
    },
}

/// One published work: its raw column values and parsed author identifiers.
///
/// Records are immutable once loaded.
#[derive(Debug, Clone)]
pub struct Record {
    cells: Vec<String>,
    authors: Vec<String>,
}

impl Record {
    /// Returns the raw cell value at `column`, if the row has that column.
    #[must_use]
    pub fn cell(&self, column: usize) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }

    /// Returns the author identifiers listed on this work, in original
    /// order, duplicates preserved. Empty if the work has no identified
    /// authors.
    #[must_use]
    pub fn authors(&self) -> &[String] {
        &self.authors
    }
}

/// The loaded publication dataset.
#[derive(Debug, Clone, Default)]
pub struct RecordTable {
    headers: Vec<String>,
    records: Vec<Record>,
}

impl RecordTable {
    /// Loads the dataset from a CSV file.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if the file cannot be opened or parsed, or if
    /// the [`AUTHOR_IDS_COLUMN`] column is missing.
    pub fn load<P>(path: P) -> Result<Self, LoadError>
    where
        P: AsRef<Path>,
    {
        let file = File::open(path.as_ref()).map_err(|source| LoadError::Io { source })?;
        Self::from_reader(file)
    }

    /// Loads the dataset from any CSV reader.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if the data cannot be parsed or the
    /// [`AUTHOR_IDS_COLUMN`] column is missing.
    ///
    /// # Examples
    ///
    /// ```
    /// use pubcohort_data::record::RecordTable;
    ///
    /// let data = "pubyear,kind,authorids\n2001,book,1;2\n2002,article,\n";
    /// let table = RecordTable::from_reader(data.as_bytes()).unwrap();
    /// assert_eq!(table.len(), 2);
    /// assert_eq!(table.records()[0].authors(), ["1", "2"]);
    /// assert!(table.records()[1].authors().is_empty());
    /// ```
    pub fn from_reader<R>(reader: R) -> Result<Self, LoadError>
    where
        R: io::Read,
    {
        let mut reader = csv::ReaderBuilder::new().from_reader(reader);
        let headers: Vec<String> = reader
            .headers()
            .map_err(|source| LoadError::Csv { source })?
            .iter()
            .map(str::to_owned)
            .collect();
        let author_column = headers
            .iter()
            .position(|header| header == AUTHOR_IDS_COLUMN)
            .ok_or_else(|| LoadError::MissingColumn {
                name: AUTHOR_IDS_COLUMN.to_owned(),
            })?;

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row.map_err(|source| LoadError::Csv { source })?;
            let cells: Vec<String> = row.iter().map(str::to_owned).collect();
            let authors = split_author_ids(cells.get(author_column).map_or("", String::as_str));
            records.push(Record { cells, authors });
        }

        Ok(Self { headers, records })
    }

    /// Returns the position of a named column, if present.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    /// Returns the header row.
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Returns the loaded records.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the table holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Builds a table with the same headers from a subset of records.
    pub(crate) fn with_records(&self, records: Vec<Record>) -> Self {
        Self {
            headers: self.headers.clone(),
            records,
        }
    }
}

fn split_author_ids(cell: &str) -> Vec<String> {
    if cell.trim().is_empty() {
        return Vec::new();
    }
    cell.split(';').map(|id| id.trim().to_owned()).collect()
}
