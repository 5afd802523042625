//! Overview chart commands.
//!
//! Both variants run the full pipeline: load records, build the cohort
//! map, aggregate, optionally filter survivors, then either open the TUI
//! chart viewer or export the tidy table as JSON.

use std::path::PathBuf;

use pubcohort_analysis::{
    aggregate::author_yearly_feature_counts,
    chart::{chart_from_tidy, discipline_split_counts},
    survivors::survivors,
    table::TidyTable,
};

use crate::{schema::TidyExport, ui, util::Output};

use super::PipelineArg;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct OverviewArg {
    #[clap(flatten)]
    pub pipeline: PipelineArg,

    /// Keep only authors present in every year observed for their cohort
    #[arg(long)]
    pub survivors_only: bool,

    /// Write the tidy table as JSON to this path ("-" for stdout) instead
    /// of opening the chart viewer
    #[arg(long)]
    pub export: Option<PathBuf>,
}

pub(crate) fn run_single(arg: &OverviewArg) -> anyhow::Result<()> {
    let records = arg.pipeline.load_records()?;
    let cohorts = arg.pipeline.cohort_map(&records)?;

    eprintln!("Aggregating '{}' per author and year...", arg.pipeline.feature);
    let tidy = author_yearly_feature_counts(
        &records,
        &arg.pipeline.feature,
        &arg.pipeline.year_column,
        arg.pipeline.kind,
        Some(&cohorts),
    )?;
    eprintln!("Aggregated {} observations", tidy.len());

    finish(arg, tidy, false)
}

pub(crate) fn run_full(arg: &OverviewArg) -> anyhow::Result<()> {
    let records = arg.pipeline.load_records()?;
    let cohorts = arg.pipeline.cohort_map(&records)?;

    eprintln!(
        "Aggregating '{}' per author and year over discipline subsets...",
        arg.pipeline.feature
    );
    let tidy = discipline_split_counts(
        &records,
        &arg.pipeline.feature,
        &arg.pipeline.year_column,
        arg.pipeline.kind,
        Some(&cohorts),
    )?;
    eprintln!("Aggregated {} observations", tidy.len());

    finish(arg, tidy, true)
}

fn finish(arg: &OverviewArg, tidy: TidyTable, facet_by_group: bool) -> anyhow::Result<()> {
    match &arg.export {
        Some(path) => {
            let tidy = if arg.survivors_only {
                survivors(&tidy)
            } else {
                tidy
            };
            let payload = TidyExport::new(arg, &tidy);
            let output_path = (path.as_os_str() != "-").then(|| path.clone());
            Output::save_json(&payload, output_path)?;
        }
        None => {
            let chart = chart_from_tidy(&tidy, arg.pipeline.kind, arg.survivors_only, facet_by_group);
            eprintln!("Rendering {} chart panels", chart.panels.len());
            ui::run_tui(chart)?;
        }
    }
    Ok(())
}
