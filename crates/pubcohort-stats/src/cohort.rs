//! Cohort assignment over publication years
//!
//! This module partitions a contiguous range of years into consecutive
//! cohorts of a fixed length. Authors are later bucketed by the cohort of
//! their first observed publication year, so the mapping must be total over
//! the range and deterministic.
//!
//! # Algorithm
//!
//! Years are enumerated from `first` to `last` inclusive. The cohort index
//! starts at 1 and is incremented after every `cohort_length`-th year, so
//! every cohort spans exactly `cohort_length` consecutive years except the
//! final one, which holds the remainder (between 1 and `cohort_length`
//! years).
//!
//! Note that `cohort_length == last - first` is a valid configuration: it
//! produces exactly two cohorts, the second containing only `last`.
//!
//! # Examples
//!
//! ```
//! use pubcohort_stats::cohort::{CohortLabel, CohortNaming, make_cohorts};
//!
//! let cohorts = make_cohorts(2000, 2009, 3, CohortNaming::Index).unwrap();
//!
//! // Three full cohorts of three years each...
//! assert_eq!(cohorts[&2000], CohortLabel::Index(1));
//! assert_eq!(cohorts[&2002], CohortLabel::Index(1));
//! assert_eq!(cohorts[&2005], CohortLabel::Index(2));
//! assert_eq!(cohorts[&2008], CohortLabel::Index(3));
//!
//! // ...and a truncated final cohort holding the single remaining year.
//! assert_eq!(cohorts[&2009], CohortLabel::Index(4));
//! ```
//!
//! With [`CohortNaming::YearRange`], every year maps to a label derived from
//! the first and last year of its cohort:
//!
//! ```
//! use pubcohort_stats::cohort::{CohortNaming, make_cohorts};
//!
//! let cohorts = make_cohorts(2000, 2005, 3, CohortNaming::YearRange).unwrap();
//! assert_eq!(cohorts[&2000].to_string(), "2000-02");
//! assert_eq!(cohorts[&2004].to_string(), "2003-05");
//! ```

use std::{collections::BTreeMap, fmt};

/// Error returned when the cohort range parameters are invalid.
///
/// The cohort length must be at least 1 and no greater than `last - first`.
/// Equality is allowed; it yields two cohorts with the second containing a
/// single year.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid cohort range: length {cohort_length} for years {first}..={last}")]
pub struct InvalidRangeError {
    /// First year of the range.
    pub first: i32,
    /// Last year of the range.
    pub last: i32,
    /// Requested cohort length in years.
    pub cohort_length: u32,
}

/// Label identifying one cohort.
///
/// Labels are ordered: for any valid cohort map, the label is monotonically
/// non-decreasing in year. [`CohortLabel::Year`] identifies a degenerate
/// cohort by its first year alone, used when no cohort map is supplied and
/// every first-publication year forms its own cohort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CohortLabel {
    /// Plain 1-based cohort index.
    Index(u32),
    /// Single first-observed year.
    Year(i32),
    /// Inclusive year span of the cohort.
    Years {
        /// First year of the cohort.
        start: i32,
        /// Last year of the cohort.
        end: i32,
    },
}

impl fmt::Display for CohortLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CohortLabel::Index(index) => write!(f, "{index}"),
            CohortLabel::Year(year) => write!(f, "{year}"),
            CohortLabel::Years { start, end } => f.write_str(&format_year_range(*start, *end)),
        }
    }
}

/// How cohorts are labeled in the produced mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CohortNaming {
    /// Plain 1-based indices: `1`, `2`, `3`, ...
    Index,
    /// Year-range labels: `2000-04`, `2005-09`, ...
    #[default]
    YearRange,
}

/// Builds the year-to-cohort mapping for `first..=last`.
///
/// Every year in the range maps to exactly one cohort. Cohorts are
/// contiguous blocks of `cohort_length` consecutive years, except the final
/// cohort which may be truncated.
///
/// # Errors
///
/// Returns [`InvalidRangeError`] if `cohort_length < 1` or
/// `cohort_length > last - first` (a reversed year range therefore always
/// fails).
///
/// # Examples
///
/// ```
/// use pubcohort_stats::cohort::{CohortNaming, make_cohorts};
///
/// // Length 6 exceeds the 5-year span 2000..=2005.
/// assert!(make_cohorts(2000, 2005, 6, CohortNaming::Index).is_err());
///
/// // Length 5 equals the span: two cohorts, the second is 2005 alone.
/// let cohorts = make_cohorts(2000, 2005, 5, CohortNaming::YearRange).unwrap();
/// assert_eq!(cohorts[&2004].to_string(), "2000-04");
/// assert_eq!(cohorts[&2005].to_string(), "2005-05");
/// ```
pub fn make_cohorts(
    first: i32,
    last: i32,
    cohort_length: u32,
    naming: CohortNaming,
) -> Result<BTreeMap<i32, CohortLabel>, InvalidRangeError> {
    let span = i64::from(last) - i64::from(first);
    if cohort_length == 0 || i64::from(cohort_length) > span {
        return Err(InvalidRangeError {
            first,
            last,
            cohort_length,
        });
    }

    let mut indices = BTreeMap::new();
    let mut cohort = 1_u32;
    let mut filled = 0_u32;
    for year in first..=last {
        indices.insert(year, cohort);
        filled += 1;
        if filled == cohort_length {
            cohort += 1;
            filled = 0;
        }
    }

    let labels = match naming {
        CohortNaming::Index => indices
            .into_iter()
            .map(|(year, index)| (year, CohortLabel::Index(index)))
            .collect(),
        CohortNaming::YearRange => {
            let mut spans: BTreeMap<u32, (i32, i32)> = BTreeMap::new();
            for (&year, &index) in &indices {
                let span = spans.entry(index).or_insert((year, year));
                span.0 = span.0.min(year);
                span.1 = span.1.max(year);
            }
            indices
                .into_iter()
                .map(|(year, index)| {
                    let (start, end) = spans[&index];
                    (year, CohortLabel::Years { start, end })
                })
                .collect()
        }
    };

    Ok(labels)
}

/// Formats an inclusive year range as a compact label.
///
/// When both years share the same first two digits the second year is
/// abbreviated to its last digits, e.g. `"2000-05"`; otherwise both years
/// are written in full, e.g. `"1998-2002"`. A single-year range keeps the
/// abbreviated form: `format_year_range(2010, 2010)` is `"2010-10"`.
///
/// # Examples
///
/// ```
/// use pubcohort_stats::cohort::format_year_range;
///
/// assert_eq!(format_year_range(2000, 2005), "2000-05");
/// assert_eq!(format_year_range(1998, 2002), "1998-2002");
/// assert_eq!(format_year_range(2010, 2010), "2010-10");
/// ```
#[must_use]
pub fn format_year_range(start: i32, end: i32) -> String {
    let (start, end) = (start.to_string(), end.to_string());
    if start.len() >= 2 && end.len() >= 2 && start[..2] == end[..2] {
        format!("{start}-{}", &end[2..])
    } else {
        format!("{start}-{end}")
    }
}
