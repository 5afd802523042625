//! Statistical utilities for the pubcohort project.
//!
//! This crate provides the pure, dataset-independent pieces of the cohort
//! analysis pipeline:
//!
//! - **Cohort assignment**: Partition a contiguous range of publication years
//!   into consecutive cohorts of fixed length
//! - **Descriptive statistics**: Summarize per-author observation values
//!   (mean, median, standard deviation) for reports and chart series
//!
//! # Modules
//!
//! - [`cohort`]: Year-to-cohort mapping and cohort label formatting
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//!
//! # Examples
//!
//! ## Assigning cohorts to years
//!
//! ```
//! use pubcohort_stats::cohort::{CohortLabel, CohortNaming, make_cohorts};
//!
//! let cohorts = make_cohorts(2000, 2005, 3, CohortNaming::YearRange).unwrap();
//! assert_eq!(cohorts[&2001].to_string(), "2000-02");
//! assert_eq!(cohorts[&2005].to_string(), "2003-05");
//! ```
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use pubcohort_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! ```

pub mod cohort;
pub mod descriptive;
