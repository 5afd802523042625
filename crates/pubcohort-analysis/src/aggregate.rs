//! Author-year feature aggregation.
//!
//! Expands every record into one observation per listed co-author, counts
//! observations per (author, year, feature value), and zero-fills the
//! cross-product so that every observed (author, year) pair carries a row
//! for every feature value observed anywhere in the dataset. The explicit
//! zero rows keep relative shares, survivor computation, and chart series
//! consistent: an author who published only articles in 2003 still has a
//! `book = 0` observation for 2003.
//!
//! In relative mode each (author, year) group is normalized to sum to 1.
//! The author's cohort is attached from the minimum year the author appears
//! with **in this aggregated table**. When the input was filtered upstream
//! (e.g. to one discipline), that minimum is relative to the filtered data,
//! not the author's true first publication year. This scoping is
//! deliberate: a discipline view asks when the author entered *that*
//! discipline's record.
//!
//! # Examples
//!
//! ```
//! use pubcohort_analysis::aggregate::{Kind, author_yearly_feature_counts};
//! use pubcohort_data::record::RecordTable;
//!
//! let data = "pubyear,kind,authorids\n2000,article,1;2\n2000,book,1\n";
//! let records = RecordTable::from_reader(data.as_bytes()).unwrap();
//!
//! let tidy =
//!     author_yearly_feature_counts(&records, "kind", "pubyear", Kind::Rel, None).unwrap();
//!
//! // Author 1 split the year between an article and a book...
//! let shares: Vec<f64> = tidy
//!     .rows
//!     .iter()
//!     .filter(|row| row.author == "1")
//!     .map(|row| row.value)
//!     .collect();
//! assert_eq!(shares, [0.5, 0.5]);
//!
//! // ...while author 2 gets an explicit zero row for "book".
//! let book = tidy
//!     .rows
//!     .iter()
//!     .find(|row| row.author == "2" && row.feature == "book")
//!     .unwrap();
//! assert_eq!(book.value, 0.0);
//! ```

use std::{
    collections::{BTreeMap, BTreeSet},
    str::FromStr,
};

use pubcohort_data::record::RecordTable;
use pubcohort_stats::cohort::CohortLabel;

use crate::table::{TidyRow, TidyTable};

/// Default name of the publication-year column.
pub const DEFAULT_YEAR_COLUMN: &str = "pubyear";

/// Aggregation mode: relative shares or absolute counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, derive_more::Display)]
pub enum Kind {
    /// Per-author-year shares summing to 1.
    #[default]
    #[display("rel")]
    Rel,
    /// Raw observation counts.
    #[display("abs")]
    Abs,
}

/// Error returned when an aggregation mode string is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("kind should be either \"rel\" or \"abs\", got \"{value}\"")]
pub struct ParseKindError {
    /// The rejected input.
    pub value: String,
}

impl FromStr for Kind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rel" => Ok(Kind::Rel),
            "abs" => Ok(Kind::Abs),
            _ => Err(ParseKindError {
                value: s.to_owned(),
            }),
        }
    }
}

/// Error produced while aggregating records.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum AggregateError {
    /// The feature or year column is absent from the dataset.
    #[display("column '{name}' is missing from the dataset")]
    MissingColumn {
        /// Name of the missing column.
        name: String,
    },
    /// A year cell of an authored record could not be parsed.
    #[display("cannot parse year value '{value}'")]
    InvalidYear {
        /// The offending cell content.
        value: String,
    },
    /// An author's first observed year has no entry in the cohort mapping.
    #[display("year {year} is not covered by the cohort mapping")]
    UncoveredYear {
        /// The uncovered year.
        year: i32,
    },
}

/// Builds the tidy table of yearly feature counts per author.
///
/// Each record contributes one observation per listed author; records
/// without author identifiers contribute nothing (not even their feature
/// value to the zero-fill column set). Counts are grouped by (author, year,
/// feature value), zero-filled over all observed feature values, and
/// normalized per (author, year) in [`Kind::Rel`] mode.
///
/// The author's cohort is looked up in `cohorts` by the author's minimum
/// observed year; with `None`, the minimum year itself becomes the cohort
/// label, so every first-publication year forms its own cohort.
///
/// Rows are ordered by (author, year, feature value), making the output
/// reproducible for a given input.
///
/// # Errors
///
/// Returns [`AggregateError`] if `feature_column` or `year_column` is
/// missing, a year cell of an authored record cannot be parsed, or an
/// author's first year falls outside the supplied cohort mapping.
pub fn author_yearly_feature_counts(
    records: &RecordTable,
    feature_column: &str,
    year_column: &str,
    kind: Kind,
    cohorts: Option<&BTreeMap<i32, CohortLabel>>,
) -> Result<TidyTable, AggregateError> {
    let feature_col =
        records
            .column_index(feature_column)
            .ok_or_else(|| AggregateError::MissingColumn {
                name: feature_column.to_owned(),
            })?;
    let year_col = records
        .column_index(year_column)
        .ok_or_else(|| AggregateError::MissingColumn {
            name: year_column.to_owned(),
        })?;

    // Count observations per (author, year, feature value). The BTreeMap
    // keys double as the deterministic output order.
    let mut counts: BTreeMap<(String, i32), BTreeMap<String, u64>> = BTreeMap::new();
    let mut all_features: BTreeSet<String> = BTreeSet::new();
    for record in records.records() {
        if record.authors().is_empty() {
            continue;
        }
        let year_cell = record.cell(year_col).unwrap_or_default();
        let year: i32 =
            year_cell
                .trim()
                .parse()
                .map_err(|_| AggregateError::InvalidYear {
                    value: year_cell.to_owned(),
                })?;
        let feature = record.cell(feature_col).unwrap_or_default();
        all_features.insert(feature.to_owned());
        for author in record.authors() {
            *counts
                .entry((author.clone(), year))
                .or_default()
                .entry(feature.to_owned())
                .or_insert(0) += 1;
        }
    }

    // First observed year per author, for cohort assignment. Iteration is
    // (author, year)-ordered, so the first year seen per author is the
    // minimum.
    let mut cohort_of: BTreeMap<&str, CohortLabel> = BTreeMap::new();
    for (author, year) in counts.keys() {
        if cohort_of.contains_key(author.as_str()) {
            continue;
        }
        let label = match cohorts {
            None => CohortLabel::Year(*year),
            Some(mapping) => *mapping
                .get(year)
                .ok_or(AggregateError::UncoveredYear { year: *year })?,
        };
        cohort_of.insert(author, label);
    }

    // Zero-fill pass over the (author, year) x feature cross-product.
    let mut rows = Vec::new();
    for ((author, year), observed) in &counts {
        let cohort = cohort_of[author.as_str()];
        let total: u64 = observed.values().sum();
        for feature in &all_features {
            let count = observed.get(feature).copied().unwrap_or(0);
            #[expect(clippy::cast_precision_loss)]
            let value = match kind {
                Kind::Abs => count as f64,
                Kind::Rel => count as f64 / total as f64,
            };
            rows.push(TidyRow {
                author: author.clone(),
                year: *year,
                feature: feature.clone(),
                value,
                cohort,
                group: None,
            });
        }
    }

    Ok(TidyTable { rows })
}

#[cfg(test)]
mod tests {
    use pubcohort_stats::cohort::{CohortNaming, make_cohorts};

    use super::*;

    fn records(csv: &str) -> RecordTable {
        RecordTable::from_reader(csv.as_bytes()).unwrap()
    }

    const SMALL: &str = "\
pubyear,kind,authorids
2000,article,1;2
2000,article,1
2000,book,1
2001,book,2
";

    #[test]
    fn test_kind_parsing() {
        assert_eq!("rel".parse::<Kind>().unwrap(), Kind::Rel);
        assert_eq!("abs".parse::<Kind>().unwrap(), Kind::Abs);
        let err = "bogus".parse::<Kind>().unwrap_err();
        assert_eq!(err.value, "bogus");
    }

    #[test]
    fn test_absolute_counts() {
        let tidy =
            author_yearly_feature_counts(&records(SMALL), "kind", "pubyear", Kind::Abs, None)
                .unwrap();
        let value = |author: &str, year: i32, feature: &str| {
            tidy.rows
                .iter()
                .find(|row| row.author == author && row.year == year && row.feature == feature)
                .map(|row| row.value)
        };
        assert_eq!(value("1", 2000, "article"), Some(2.0));
        assert_eq!(value("1", 2000, "book"), Some(1.0));
        assert_eq!(value("2", 2000, "article"), Some(1.0));
        // Zero-filled: author 2 published no book in 2000.
        assert_eq!(value("2", 2000, "book"), Some(0.0));
        // No row at all for an author-year with no observations.
        assert_eq!(value("1", 2001, "book"), None);
    }

    #[test]
    fn test_relative_shares_sum_to_one_per_author_year() {
        let tidy =
            author_yearly_feature_counts(&records(SMALL), "kind", "pubyear", Kind::Rel, None)
                .unwrap();
        let mut sums: BTreeMap<(&str, i32), f64> = BTreeMap::new();
        for row in &tidy.rows {
            *sums.entry((row.author.as_str(), row.year)).or_default() += row.value;
        }
        assert!(!sums.is_empty());
        for sum in sums.values() {
            assert!((sum - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_every_author_year_covers_all_features() {
        let tidy =
            author_yearly_feature_counts(&records(SMALL), "kind", "pubyear", Kind::Rel, None)
                .unwrap();
        let features = tidy.features().len();
        let mut per_pair: BTreeMap<(&str, i32), usize> = BTreeMap::new();
        for row in &tidy.rows {
            *per_pair.entry((row.author.as_str(), row.year)).or_default() += 1;
        }
        for count in per_pair.values() {
            assert_eq!(*count, features);
        }
    }

    #[test]
    fn test_duplicate_author_on_one_record_counts_twice() {
        let tidy = author_yearly_feature_counts(
            &records("pubyear,kind,authorids\n2000,article,1;1\n"),
            "kind",
            "pubyear",
            Kind::Abs,
            None,
        )
        .unwrap();
        assert_eq!(tidy.rows.len(), 1);
        assert_eq!(tidy.rows[0].value, 2.0);
    }

    #[test]
    fn test_authorless_records_contribute_nothing() {
        let tidy = author_yearly_feature_counts(
            &records("pubyear,kind,authorids\n2000,article,1\n2000,editorial,\n"),
            "kind",
            "pubyear",
            Kind::Abs,
            None,
        )
        .unwrap();
        // The authorless record adds neither rows nor a zero-fill column.
        assert_eq!(tidy.rows.len(), 1);
        assert_eq!(tidy.rows[0].feature, "article");
    }

    #[test]
    fn test_cohort_from_minimum_observed_year() {
        let cohorts = make_cohorts(2000, 2003, 2, CohortNaming::Index).unwrap();
        let data = "\
pubyear,kind,authorids
2003,article,1
2000,article,1
2002,article,2
";
        let tidy =
            author_yearly_feature_counts(&records(data), "kind", "pubyear", Kind::Rel, Some(&cohorts))
                .unwrap();
        for row in &tidy.rows {
            let expected = match row.author.as_str() {
                "1" => CohortLabel::Index(1),
                _ => CohortLabel::Index(2),
            };
            assert_eq!(row.cohort, expected);
        }
    }

    #[test]
    fn test_cohort_reanchors_on_filtered_input() {
        // Filtering out the early record moves the author's first observed
        // year, and with it the cohort.
        let cohorts = make_cohorts(2000, 2003, 2, CohortNaming::Index).unwrap();
        let late_only = "pubyear,kind,authorids\n2003,article,1\n";
        let tidy = author_yearly_feature_counts(
            &records(late_only),
            "kind",
            "pubyear",
            Kind::Rel,
            Some(&cohorts),
        )
        .unwrap();
        assert_eq!(tidy.rows[0].cohort, CohortLabel::Index(2));
    }

    #[test]
    fn test_without_mapping_first_year_is_the_cohort() {
        let tidy =
            author_yearly_feature_counts(&records(SMALL), "kind", "pubyear", Kind::Rel, None)
                .unwrap();
        let author_two: BTreeSet<CohortLabel> = tidy
            .rows
            .iter()
            .filter(|row| row.author == "2")
            .map(|row| row.cohort)
            .collect();
        assert_eq!(
            author_two.into_iter().collect::<Vec<_>>(),
            [CohortLabel::Year(2000)]
        );
    }

    #[test]
    fn test_missing_columns_fail() {
        let err = author_yearly_feature_counts(&records(SMALL), "nope", "pubyear", Kind::Rel, None)
            .unwrap_err();
        assert!(matches!(err, AggregateError::MissingColumn { name } if name == "nope"));
        let err = author_yearly_feature_counts(&records(SMALL), "kind", "nope", Kind::Rel, None)
            .unwrap_err();
        assert!(matches!(err, AggregateError::MissingColumn { name } if name == "nope"));
    }

    #[test]
    fn test_unparsable_year_fails() {
        let err = author_yearly_feature_counts(
            &records("pubyear,kind,authorids\nMMIV,article,1\n"),
            "kind",
            "pubyear",
            Kind::Rel,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, AggregateError::InvalidYear { value } if value == "MMIV"));
    }

    #[test]
    fn test_year_outside_mapping_fails() {
        let cohorts = make_cohorts(2000, 2001, 1, CohortNaming::Index).unwrap();
        let err = author_yearly_feature_counts(
            &records("pubyear,kind,authorids\n1999,article,1\n"),
            "kind",
            "pubyear",
            Kind::Rel,
            Some(&cohorts),
        )
        .unwrap_err();
        assert!(matches!(err, AggregateError::UncoveredYear { year: 1999 }));
    }

    #[test]
    fn test_rows_are_sorted_by_author_year_feature() {
        let tidy =
            author_yearly_feature_counts(&records(SMALL), "kind", "pubyear", Kind::Rel, None)
                .unwrap();
        let keys: Vec<(&str, i32, &str)> = tidy
            .rows
            .iter()
            .map(|row| (row.author.as_str(), row.year, row.feature.as_str()))
            .collect();
        let mut sorted = keys.clone();
        sorted.sort_unstable();
        assert_eq!(keys, sorted);
    }
}
