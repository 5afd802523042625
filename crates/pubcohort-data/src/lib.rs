//! Publication record loading for the pubcohort project.
//!
//! This crate reads the delimited publication dataset into an immutable
//! in-memory table. One [`record::Record`] is one published work: its raw
//! column values plus the parsed list of author identifiers. All further
//! interpretation (year parsing, feature selection) happens downstream in
//! the aggregation crate, so malformed cells in columns an analysis never
//! touches pass through untouched.
//!
//! # Modules
//!
//! - [`record`]: The record table and its CSV loader
//! - [`discipline`]: Discipline name tables and flag-based filtering
//!
//! # Examples
//!
//! ```no_run
//! use pubcohort_data::record::RecordTable;
//!
//! let table = RecordTable::load("data/data.csv")?;
//! println!("loaded {} records", table.len());
//! # Ok::<(), pubcohort_data::record::LoadError>(())
//! ```

pub mod discipline;
pub mod record;
