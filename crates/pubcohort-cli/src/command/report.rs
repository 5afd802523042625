//! Textual cohort and survivorship report.
//!
//! Prints per-cohort author counts, observed years, survivor retention,
//! and descriptive statistics of the per-author feature values. Useful for
//! sanity-checking a dataset before rendering charts.

use std::collections::BTreeMap;

use pubcohort_analysis::{
    aggregate::{Kind, author_yearly_feature_counts},
    survivors::survivors,
    table::TidyTable,
};
use pubcohort_stats::{cohort::CohortLabel, descriptive::DescriptiveStats};

use super::PipelineArg;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ReportArg {
    #[clap(flatten)]
    pub pipeline: PipelineArg,
}

pub(crate) fn run(arg: &ReportArg) -> anyhow::Result<()> {
    let records = arg.pipeline.load_records()?;
    let cohorts = arg.pipeline.cohort_map(&records)?;

    let tidy = author_yearly_feature_counts(
        &records,
        &arg.pipeline.feature,
        &arg.pipeline.year_column,
        arg.pipeline.kind,
        Some(&cohorts),
    )?;
    let surviving = survivors(&tidy);

    println!(
        "Cohort Report ({}, kind={})",
        arg.pipeline.feature, arg.pipeline.kind
    );
    println!("=========================================\n");

    print_cohort_sizes(&tidy, &surviving);
    println!();
    print_feature_stats(&tidy, arg.pipeline.kind);

    Ok(())
}

#[expect(clippy::cast_precision_loss)]
fn print_cohort_sizes(tidy: &TidyTable, surviving: &TidyTable) {
    println!("{:<12} {:>8} {:>8} {:>10} {:>8}", "Cohort", "Authors", "Years", "Survivors", "Kept%");

    let authors_per_cohort = |table: &TidyTable| -> BTreeMap<CohortLabel, usize> {
        let mut sets: BTreeMap<CohortLabel, std::collections::BTreeSet<&str>> = BTreeMap::new();
        for row in &table.rows {
            sets.entry(row.cohort).or_default().insert(row.author.as_str());
        }
        sets.into_iter().map(|(c, set)| (c, set.len())).collect()
    };

    let totals = authors_per_cohort(tidy);
    let kept = authors_per_cohort(surviving);

    for (cohort, total) in &totals {
        let mut years: std::collections::BTreeSet<i32> = std::collections::BTreeSet::new();
        for row in &tidy.rows {
            if row.cohort == *cohort {
                years.insert(row.year);
            }
        }
        let kept_count = kept.get(cohort).copied().unwrap_or(0);
        println!(
            "{:<12} {:>8} {:>8} {:>10} {:>7.1}%",
            cohort.to_string(),
            total,
            years.len(),
            kept_count,
            kept_count as f64 / *total as f64 * 100.0,
        );
    }
}

fn print_feature_stats(tidy: &TidyTable, kind: Kind) {
    let unit = match kind {
        Kind::Rel => "share",
        Kind::Abs => "count",
    };
    println!("Per-author {unit} by feature value");
    println!("{:<20} {:>8} {:>8} {:>8} {:>8}", "Feature", "Mean", "Median", "StdDev", "Max");

    let mut values: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for row in &tidy.rows {
        values.entry(row.feature.as_str()).or_default().push(row.value);
    }
    for (feature, values) in values {
        let Some(stats) = DescriptiveStats::new(values) else {
            continue;
        };
        println!(
            "{feature:<20} {:>8.3} {:>8.3} {:>8.3} {:>8.3}",
            stats.mean, stats.median, stats.std_dev, stats.max,
        );
    }
}
