//! Serializable export payloads.
//!
//! The JSON surface of the tool: a tidy table together with the options
//! that produced it and a generation timestamp, so an exported file is
//! self-describing.

use chrono::{DateTime, Utc};
use pubcohort_analysis::table::TidyTable;
use serde::Serialize;

use crate::command::overview::OverviewArg;

#[derive(Debug, Clone, Serialize)]
pub(crate) struct TidyExport {
    pub generated_at: DateTime<Utc>,
    pub feature_column: String,
    pub year_column: String,
    pub kind: String,
    pub survivors_only: bool,
    pub rows: Vec<TidyExportRow>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct TidyExportRow {
    pub author: String,
    pub year: i32,
    pub feature: String,
    pub value: f64,
    pub cohort: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl TidyExport {
    pub(crate) fn new(arg: &OverviewArg, tidy: &TidyTable) -> Self {
        Self {
            generated_at: Utc::now(),
            feature_column: arg.pipeline.feature.clone(),
            year_column: arg.pipeline.year_column.clone(),
            kind: arg.pipeline.kind.to_string(),
            survivors_only: arg.survivors_only,
            rows: tidy
                .rows
                .iter()
                .map(|row| TidyExportRow {
                    author: row.author.clone(),
                    year: row.year,
                    feature: row.feature.clone(),
                    value: row.value,
                    cohort: row.cohort.to_string(),
                    group: row.group.clone(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pubcohort_stats::cohort::CohortLabel;

    use super::*;

    #[test]
    fn test_rows_serialize_with_display_cohorts() {
        let row = TidyExportRow {
            author: "1".to_owned(),
            year: 2001,
            feature: "article".to_owned(),
            value: 0.5,
            cohort: CohortLabel::Years {
                start: 2000,
                end: 2004,
            }
            .to_string(),
            group: None,
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["cohort"], "2000-04");
        // Absent group facets are omitted entirely.
        assert!(json.get("group").is_none());
    }
}
