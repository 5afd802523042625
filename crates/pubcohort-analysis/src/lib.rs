//! Cohort-based publication analysis for academic authors.
//!
//! This crate turns the loaded publication dataset into the tidy
//! author-year-feature table behind every cohort chart, and derives the
//! chart model itself.
//!
//! # Pipeline
//!
//! 1. **Load records** ([`pubcohort_data::record::RecordTable`]): one row
//!    per published work
//! 2. **Assign cohorts** ([`pubcohort_stats::cohort::make_cohorts`]): map
//!    each year to its cohort label
//! 3. **Aggregate** ([`aggregate::author_yearly_feature_counts`]): one row
//!    per (author, year, feature value) with relative or absolute counts
//!    and the author's cohort
//! 4. **Filter survivors** ([`survivors::survivors`], optional): keep only
//!    authors present in every year observed for their cohort
//! 5. **Build the chart model** ([`chart::chart_from_tidy`]): faceted line
//!    chart panels, one line per cohort
//!
//! Aggregation is recomputed from the record set for every chart request;
//! nothing is cached, and the tidy table handed to the chart builder is
//! never mutated by it.
//!
//! # Examples
//!
//! ```
//! use pubcohort_analysis::{aggregate::{self, Kind}, chart, survivors};
//! use pubcohort_data::record::RecordTable;
//! use pubcohort_stats::cohort::{CohortNaming, make_cohorts};
//!
//! let data = "\
//! pubyear,kind,authorids
//! 2000,article,1;2
//! 2001,book,1
//! 2002,article,1;2
//! ";
//! let records = RecordTable::from_reader(data.as_bytes())?;
//! let cohorts = make_cohorts(2000, 2002, 2, CohortNaming::YearRange)?;
//!
//! let tidy = aggregate::author_yearly_feature_counts(
//!     &records, "kind", "pubyear", Kind::Rel, Some(&cohorts),
//! )?;
//! let only_survivors = survivors::survivors(&tidy);
//!
//! // Author 2 skipped 2001, so only author 1 survives.
//! assert!(only_survivors.rows.iter().all(|row| row.author == "1"));
//!
//! let chart = chart::chart_from_tidy(&tidy, Kind::Rel, false, false);
//! assert_eq!(chart.y_label, "Mean percentage");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod aggregate;
pub mod chart;
pub mod survivors;
pub mod table;
