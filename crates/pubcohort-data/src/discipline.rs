//! Discipline name tables and flag-based record filtering.
//!
//! The dataset carries one numeric flag column per discipline (`1` when the
//! work belongs to the discipline, `0` otherwise). The two tables below are
//! read-only lookup lists used by the full overview chart to split the
//! dataset into social-science and humanities subsets.

use crate::record::RecordTable;

/// Social-science discipline flag columns.
pub const SOCIAL_SCIENCES: &[&str] = &[
    "Psychology",
    "Educational sciences",
    "Criminology",
    "Economics & business",
    "Political sciences",
    "Sociology",
    "Social sciences general",
    "Social health sciences",
];

/// Humanities discipline flag columns.
pub const HUMANITIES: &[&str] = &[
    "Communication studies",
    "Law",
    "Philosophy",
    "Theology",
    "Linguistics",
    "Literature",
    "History of arts",
    "Archaeology",
    "History",
    "Humanities general",
];

impl RecordTable {
    /// Keeps only works flagged with at least one of the named disciplines.
    ///
    /// A record survives if any of the named flag columns parses to a
    /// positive number. Columns absent from the dataset and non-numeric
    /// cells contribute nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use pubcohort_data::{discipline::HUMANITIES, record::RecordTable};
    ///
    /// let data = "pubyear,History,Law,authorids\n2001,1,0,1\n2002,0,0,2\n";
    /// let table = RecordTable::from_reader(data.as_bytes()).unwrap();
    /// assert_eq!(table.only_disciplines(&["History", "Law"]).len(), 1);
    /// ```
    #[must_use]
    pub fn only_disciplines(&self, disciplines: &[&str]) -> RecordTable {
        let columns: Vec<usize> = disciplines
            .iter()
            .filter_map(|name| self.column_index(name))
            .collect();

        let records = self
            .records()
            .iter()
            .filter(|record| {
                columns.iter().any(|&column| {
                    record
                        .cell(column)
                        .and_then(|cell| cell.trim().parse::<f64>().ok())
                        .is_some_and(|flag| flag > 0.0)
                })
            })
            .cloned()
            .collect();

        self.with_records(records)
    }
}
