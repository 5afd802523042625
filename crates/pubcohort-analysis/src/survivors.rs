//! Survivor filtering.
//!
//! A survivor is an author present in every distinct year observed for
//! their cohort. Each cohort is processed independently: the set of years
//! is the cohort's own observed years, and the author sets of those years
//! are intersected. The per-cohort survivor sets are unioned and the table
//! is restricted to surviving authors.
//!
//! A cohort observed in a single year trivially keeps all of its authors,
//! and filtering is idempotent: survivors of a survivor table are the
//! table itself.

use std::collections::{BTreeMap, BTreeSet};

use pubcohort_stats::cohort::CohortLabel;

use crate::table::TidyTable;

/// Restricts the table to authors present in every year observed for their
/// cohort.
///
/// # Examples
///
/// ```
/// use pubcohort_analysis::{survivors::survivors, table::{TidyRow, TidyTable}};
/// use pubcohort_stats::cohort::CohortLabel;
///
/// let row = |author: &str, year: i32| TidyRow {
///     author: author.to_owned(),
///     year,
///     feature: "article".to_owned(),
///     value: 1.0,
///     cohort: CohortLabel::Index(1),
///     group: None,
/// };
/// // Author "b" misses 2001, one of the cohort's observed years.
/// let table = TidyTable {
///     rows: vec![row("a", 2000), row("a", 2001), row("a", 2002),
///                row("b", 2000), row("b", 2002)],
/// };
///
/// let filtered = survivors(&table);
/// assert!(filtered.rows.iter().all(|row| row.author == "a"));
/// ```
#[must_use]
pub fn survivors(table: &TidyTable) -> TidyTable {
    // Authors present per (cohort, year).
    let mut present: BTreeMap<CohortLabel, BTreeMap<i32, BTreeSet<&str>>> = BTreeMap::new();
    for row in &table.rows {
        present
            .entry(row.cohort)
            .or_default()
            .entry(row.year)
            .or_default()
            .insert(row.author.as_str());
    }

    // Per cohort, intersect the author sets of all observed years; union
    // the survivor sets across cohorts.
    let mut surviving: BTreeSet<&str> = BTreeSet::new();
    for years in present.values() {
        let mut alive: Option<BTreeSet<&str>> = None;
        for authors in years.values() {
            alive = Some(match alive {
                None => authors.clone(),
                Some(alive) => alive.intersection(authors).copied().collect(),
            });
        }
        surviving.extend(alive.unwrap_or_default());
    }

    TidyTable {
        rows: table
            .rows
            .iter()
            .filter(|row| surviving.contains(row.author.as_str()))
            .cloned()
            .collect(),
    }
}
