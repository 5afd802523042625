//! The tidy author-year-feature table.
//!
//! One row per (author, year, feature value) observation, the shape every
//! downstream consumer (survivor filter, chart builder, JSON export) works
//! on. Tables are plain values; derived tables are fresh copies.

use std::collections::BTreeSet;

use pubcohort_stats::cohort::CohortLabel;

/// One observation: how often (or which share of) a feature value an author
/// produced in a year.
#[derive(Debug, Clone, PartialEq)]
pub struct TidyRow {
    /// Author identifier.
    pub author: String,
    /// Publication year.
    pub year: i32,
    /// Observed feature value.
    pub feature: String,
    /// Count (absolute mode) or share in `0.0..=1.0` (relative mode).
    pub value: f64,
    /// Cohort of the author, from the author's first observed year.
    pub cohort: CohortLabel,
    /// Optional row-facet tag, set when several aggregations are charted
    /// as separate panel rows (e.g. discipline subsets).
    pub group: Option<String>,
}

/// Tidy table of author-year-feature observations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TidyTable {
    /// The observations, in deterministic (author, year, feature) order as
    /// produced by aggregation.
    pub rows: Vec<TidyRow>,
}

impl TidyTable {
    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the table holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct cohorts present, in ascending order.
    #[must_use]
    pub fn cohorts(&self) -> BTreeSet<CohortLabel> {
        self.rows.iter().map(|row| row.cohort).collect()
    }

    /// Distinct years present, in ascending order.
    #[must_use]
    pub fn years(&self) -> BTreeSet<i32> {
        self.rows.iter().map(|row| row.year).collect()
    }

    /// Distinct feature values present, in ascending order.
    #[must_use]
    pub fn features(&self) -> BTreeSet<&str> {
        self.rows.iter().map(|row| row.feature.as_str()).collect()
    }

    /// Distinct author identifiers present, in ascending order.
    #[must_use]
    pub fn authors(&self) -> BTreeSet<&str> {
        self.rows.iter().map(|row| row.author.as_str()).collect()
    }

    /// Tags every row with a row-facet group label.
    #[must_use]
    pub fn with_group(mut self, group: &str) -> Self {
        for row in &mut self.rows {
            row.group = Some(group.to_owned());
        }
        self
    }

    /// Appends all rows of `other`.
    pub fn extend(&mut self, other: TidyTable) {
        self.rows.extend(other.rows);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(author: &str, year: i32, feature: &str) -> TidyRow {
        TidyRow {
            author: author.to_owned(),
            year,
            feature: feature.to_owned(),
            value: 1.0,
            cohort: CohortLabel::Year(year),
            group: None,
        }
    }

    #[test]
    fn test_distinct_accessors() {
        let table = TidyTable {
            rows: vec![row("b", 2001, "book"), row("a", 2000, "article"), row("a", 2001, "book")],
        };
        assert_eq!(table.authors().into_iter().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(table.years().into_iter().collect::<Vec<_>>(), [2000, 2001]);
        assert_eq!(
            table.features().into_iter().collect::<Vec<_>>(),
            ["article", "book"]
        );
        assert_eq!(table.cohorts().len(), 2);
    }

    #[test]
    fn test_with_group_tags_every_row() {
        let table = TidyTable {
            rows: vec![row("a", 2000, "article"), row("b", 2001, "book")],
        }
        .with_group("Humanities");
        assert!(
            table
                .rows
                .iter()
                .all(|row| row.group.as_deref() == Some("Humanities"))
        );
    }
}
