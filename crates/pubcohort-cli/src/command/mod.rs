use std::{collections::BTreeMap, path::PathBuf};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use pubcohort_analysis::aggregate::{DEFAULT_YEAR_COLUMN, Kind};
use pubcohort_data::record::{DEFAULT_DATA_PATH, RecordTable};
use pubcohort_stats::cohort::{CohortLabel, CohortNaming, make_cohorts};

use self::{overview::OverviewArg, report::ReportArg};

pub(crate) mod overview;
mod report;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Cohort chart of one feature over time
    Overview(#[clap(flatten)] OverviewArg),
    /// Cohort chart split into all / humanities / social-science panel rows
    OverviewFull(#[clap(flatten)] OverviewArg),
    /// Textual cohort and survivorship report
    Report(#[clap(flatten)] ReportArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Overview(arg) => overview::run_single(&arg)?,
        Mode::OverviewFull(arg) => overview::run_full(&arg)?,
        Mode::Report(arg) => report::run(&arg)?,
    }
    Ok(())
}

/// Dataset and cohort options shared by every subcommand.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PipelineArg {
    /// Path to the publication dataset CSV
    #[arg(default_value = DEFAULT_DATA_PATH)]
    pub data: PathBuf,

    /// Feature column to track over time
    #[arg(long)]
    pub feature: String,

    /// Publication-year column
    #[arg(long, default_value = DEFAULT_YEAR_COLUMN)]
    pub year_column: String,

    /// Aggregation mode: "rel" (per-author shares) or "abs" (counts)
    #[arg(long, default_value_t = Kind::Rel)]
    pub kind: Kind,

    /// Cohort length in years
    #[arg(long, default_value_t = 5)]
    pub cohort_length: u32,

    /// First cohort year (default: earliest authored year in the data)
    #[arg(long)]
    pub first: Option<i32>,

    /// Last cohort year (default: latest authored year in the data)
    #[arg(long)]
    pub last: Option<i32>,

    /// Label cohorts with plain indices instead of year ranges
    #[arg(long)]
    pub plain_cohorts: bool,
}

impl PipelineArg {
    pub(crate) fn load_records(&self) -> anyhow::Result<RecordTable> {
        eprintln!("Loading records from {}...", self.data.display());
        let records = RecordTable::load(&self.data)
            .with_context(|| format!("failed to load dataset {}", self.data.display()))?;
        eprintln!("Loaded {} records", records.len());
        Ok(records)
    }

    /// Builds the year-to-cohort mapping, defaulting the range to the
    /// years observed on authored records.
    pub(crate) fn cohort_map(
        &self,
        records: &RecordTable,
    ) -> anyhow::Result<BTreeMap<i32, CohortLabel>> {
        let (observed_first, observed_last) = self
            .observed_year_range(records)?
            .context("dataset has no authored records with a parsable year")?;
        let first = self.first.unwrap_or(observed_first);
        let last = self.last.unwrap_or(observed_last);
        let naming = if self.plain_cohorts {
            CohortNaming::Index
        } else {
            CohortNaming::YearRange
        };
        let cohorts = make_cohorts(first, last, self.cohort_length, naming)?;
        eprintln!(
            "Assigned years {first}..={last} to {} cohorts",
            cohorts.values().collect::<std::collections::BTreeSet<_>>().len()
        );
        Ok(cohorts)
    }

    /// Minimum and maximum parsable year over records that list authors.
    /// Unparsable years are left for aggregation to report.
    fn observed_year_range(&self, records: &RecordTable) -> anyhow::Result<Option<(i32, i32)>> {
        let Some(column) = records.column_index(&self.year_column) else {
            bail!("column '{}' is missing from the dataset", self.year_column);
        };
        let mut range: Option<(i32, i32)> = None;
        for record in records.records() {
            if record.authors().is_empty() {
                continue;
            }
            let Ok(year) = record.cell(column).unwrap_or_default().trim().parse::<i32>() else {
                continue;
            };
            range = Some(match range {
                None => (year, year),
                Some((first, last)) => (first.min(year), last.max(year)),
            });
        }
        Ok(range)
    }
}
