//! Cohort chart model.
//!
//! Builds the renderer-independent description of a faceted cohort line
//! chart: one panel per feature value (and per row-facet group when one is
//! supplied), one series per cohort, one point per observed year holding
//! the mean value across the authors present in that slice.
//!
//! Everything here is presentation: cohort labels are renamed to
//! `"A (2000-04)"` legend form and panels/series are ordered
//! deterministically, all on a working copy. The tidy table passed in is
//! never modified, so aggregation output stays referentially stable.

use std::collections::BTreeMap;

use pubcohort_data::{
    discipline::{HUMANITIES, SOCIAL_SCIENCES},
    record::RecordTable,
};
use pubcohort_stats::{cohort::CohortLabel, descriptive};

use crate::{
    aggregate::{AggregateError, Kind, author_yearly_feature_counts},
    survivors::survivors,
    table::TidyTable,
};

/// Letters prefixed to cohort legend labels, oldest cohort first. Cohorts
/// beyond the sixth keep their plain label.
const COHORT_LETTERS: [char; 6] = ['A', 'B', 'C', 'D', 'E', 'F'];

/// Row-facet label for the unfiltered dataset in the full overview chart.
pub const GROUP_ALL: &str = "SSH";
/// Row-facet label for the humanities subset.
pub const GROUP_HUMANITIES: &str = "Humanities";
/// Row-facet label for the social-science subset.
pub const GROUP_SOCIAL_SCIENCES: &str = "Soc. sciences";

/// One line of a panel: a cohort's mean value per year.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    /// Legend label, e.g. `"A (2000-04)"`.
    pub cohort: String,
    /// (year, mean value) points in ascending year order.
    pub points: Vec<(f64, f64)>,
}

/// One chart panel: a single feature value, optionally within a row facet.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPanel {
    /// Feature value this panel tracks.
    pub feature: String,
    /// Row-facet value, when the chart is split into panel rows.
    pub group: Option<String>,
    /// One series per cohort, oldest cohort first.
    pub series: Vec<ChartSeries>,
}

/// Renderer-independent cohort chart.
///
/// Panels are ordered row-facet first (in order of appearance in the
/// table), then feature value ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct CohortChart {
    /// Y-axis label, derived from the aggregation mode.
    pub y_label: &'static str,
    /// Y-axis bounds; clipped to `[0, 1]` in relative mode.
    pub y_bounds: [f64; 2],
    /// X-axis bounds: first and last observed year.
    pub x_bounds: [f64; 2],
    /// The panels, in render order.
    pub panels: Vec<ChartPanel>,
}

/// Builds the chart model from a tidy table.
///
/// With `only_survivors`, the table is first restricted to survivor
/// authors. With `facet_by_group`, one row of panels is emitted per
/// distinct [`crate::table::TidyRow::group`] value, in order of first
/// appearance; otherwise all rows chart together in a single panel row.
#[must_use]
pub fn chart_from_tidy(
    table: &TidyTable,
    kind: Kind,
    only_survivors: bool,
    facet_by_group: bool,
) -> CohortChart {
    let filtered;
    let table = if only_survivors {
        filtered = survivors(table);
        &filtered
    } else {
        table
    };

    let legend = legend_labels(table);

    // Row facets in order of first appearance.
    let mut groups: Vec<Option<String>> = Vec::new();
    if facet_by_group {
        for row in &table.rows {
            if !groups.contains(&row.group) {
                groups.push(row.group.clone());
            }
        }
    }
    if groups.is_empty() {
        groups.push(None);
    }

    // Bucket values per (group, feature, cohort, year).
    let mut buckets: BTreeMap<(usize, &str, CohortLabel, i32), Vec<f64>> = BTreeMap::new();
    for row in &table.rows {
        let group_index = if facet_by_group {
            groups
                .iter()
                .position(|group| *group == row.group)
                .unwrap_or_default()
        } else {
            0
        };
        buckets
            .entry((group_index, row.feature.as_str(), row.cohort, row.year))
            .or_default()
            .push(row.value);
    }

    let features = table.features();
    let cohorts = table.cohorts();
    let mut panels = Vec::new();
    for (group_index, group) in groups.iter().enumerate() {
        for feature in &features {
            let mut series = Vec::new();
            for cohort in &cohorts {
                let points: Vec<(f64, f64)> = buckets
                    .range(
                        (group_index, *feature, *cohort, i32::MIN)
                            ..=(group_index, *feature, *cohort, i32::MAX),
                    )
                    .filter_map(|((_, _, _, year), values)| {
                        descriptive::mean(values.iter().copied())
                            .map(|mean| (f64::from(*year), mean))
                    })
                    .collect();
                if points.is_empty() {
                    continue;
                }
                series.push(ChartSeries {
                    cohort: legend[cohort].clone(),
                    points,
                });
            }
            panels.push(ChartPanel {
                feature: (*feature).to_owned(),
                group: group.clone(),
                series,
            });
        }
    }

    let years = table.years();
    let x_bounds = match (years.first(), years.last()) {
        (Some(&first), Some(&last)) => [f64::from(first), f64::from(last)],
        _ => [0.0, 0.0],
    };
    let (y_label, y_bounds) = match kind {
        Kind::Rel => ("Mean percentage", [0.0, 1.0]),
        Kind::Abs => {
            let max = panels
                .iter()
                .flat_map(|panel| &panel.series)
                .flat_map(|series| &series.points)
                .map(|(_, value)| *value)
                .fold(0.0, f64::max);
            ("Mean of n", [0.0, max])
        }
    };

    CohortChart {
        y_label,
        y_bounds,
        x_bounds,
        panels,
    }
}

/// Aggregates and charts in one step: the single-row overview.
///
/// # Errors
///
/// Propagates [`AggregateError`] from the aggregation step.
pub fn overview_chart(
    records: &RecordTable,
    feature_column: &str,
    year_column: &str,
    kind: Kind,
    cohorts: Option<&BTreeMap<i32, CohortLabel>>,
    only_survivors: bool,
) -> Result<CohortChart, AggregateError> {
    let tidy = author_yearly_feature_counts(records, feature_column, year_column, kind, cohorts)?;
    Ok(chart_from_tidy(&tidy, kind, only_survivors, false))
}

/// Aggregates and charts the three-row discipline overview.
///
/// The dataset is aggregated three times (unfiltered, humanities-only,
/// social-sciences-only) and charted with one panel row per subset. Note
/// that an author's cohort is re-anchored within each subset (first year
/// observed in that subset), matching the single-subset semantics.
///
/// # Errors
///
/// Propagates [`AggregateError`] from any of the three aggregations.
pub fn overview_chart_full(
    records: &RecordTable,
    feature_column: &str,
    year_column: &str,
    kind: Kind,
    cohorts: Option<&BTreeMap<i32, CohortLabel>>,
    only_survivors: bool,
) -> Result<CohortChart, AggregateError> {
    let combined = discipline_split_counts(records, feature_column, year_column, kind, cohorts)?;
    Ok(chart_from_tidy(&combined, kind, only_survivors, true))
}

/// Aggregates the dataset three times (unfiltered, humanities-only,
/// social-sciences-only) and concatenates the tidy tables, each tagged
/// with its row-facet group label.
///
/// # Errors
///
/// Propagates [`AggregateError`] from any of the three aggregations.
pub fn discipline_split_counts(
    records: &RecordTable,
    feature_column: &str,
    year_column: &str,
    kind: Kind,
    cohorts: Option<&BTreeMap<i32, CohortLabel>>,
) -> Result<TidyTable, AggregateError> {
    let mut combined =
        author_yearly_feature_counts(records, feature_column, year_column, kind, cohorts)?
            .with_group(GROUP_ALL);
    for (subset, label) in [
        (records.only_disciplines(HUMANITIES), GROUP_HUMANITIES),
        (
            records.only_disciplines(SOCIAL_SCIENCES),
            GROUP_SOCIAL_SCIENCES,
        ),
    ] {
        let tidy = author_yearly_feature_counts(&subset, feature_column, year_column, kind, cohorts)?
            .with_group(label);
        combined.extend(tidy);
    }
    Ok(combined)
}

/// Maps each cohort to its legend label: sorted cohorts get letter
/// prefixes, `"A (2000-04)"`, any cohort past the sixth keeps its plain
/// label.
fn legend_labels(table: &TidyTable) -> BTreeMap<CohortLabel, String> {
    table
        .cohorts()
        .into_iter()
        .enumerate()
        .map(|(index, cohort)| {
            let label = match COHORT_LETTERS.get(index) {
                Some(letter) => format!("{letter} ({cohort})"),
                None => cohort.to_string(),
            };
            (cohort, label)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::table::TidyRow;

    use super::*;

    fn row(author: &str, year: i32, feature: &str, value: f64, cohort: CohortLabel) -> TidyRow {
        TidyRow {
            author: author.to_owned(),
            year,
            feature: feature.to_owned(),
            value,
            cohort,
            group: None,
        }
    }

    fn two_cohort_table() -> TidyTable {
        let early = CohortLabel::Years {
            start: 2000,
            end: 2001,
        };
        let late = CohortLabel::Years {
            start: 2002,
            end: 2003,
        };
        TidyTable {
            rows: vec![
                row("a", 2000, "article", 0.25, early),
                row("b", 2000, "article", 0.75, early),
                row("a", 2000, "book", 0.75, early),
                row("b", 2000, "book", 0.25, early),
                row("c", 2002, "article", 1.0, late),
                row("c", 2002, "book", 0.0, late),
            ],
        }
    }

    #[test]
    fn test_series_points_are_means_across_authors() {
        let chart = chart_from_tidy(&two_cohort_table(), Kind::Rel, false, false);
        let article = &chart.panels[0];
        assert_eq!(article.feature, "article");
        let early = &article.series[0];
        assert_eq!(early.points, [(2000.0, 0.5)]);
    }

    #[test]
    fn test_cohort_legend_letters() {
        let chart = chart_from_tidy(&two_cohort_table(), Kind::Rel, false, false);
        let legends: Vec<&str> = chart.panels[0]
            .series
            .iter()
            .map(|series| series.cohort.as_str())
            .collect();
        assert_eq!(legends, ["A (2000-01)", "B (2002-03)"]);
    }

    #[test]
    fn test_cohorts_past_the_sixth_keep_plain_labels() {
        let rows = (0..8)
            .map(|i| {
                row(
                    &format!("author-{i}"),
                    2000 + i,
                    "article",
                    1.0,
                    CohortLabel::Index(u32::try_from(i).unwrap() + 1),
                )
            })
            .collect();
        let chart = chart_from_tidy(&TidyTable { rows }, Kind::Rel, false, false);
        let legends: Vec<&str> = chart.panels[0]
            .series
            .iter()
            .map(|series| series.cohort.as_str())
            .collect();
        assert_eq!(
            legends,
            ["A (1)", "B (2)", "C (3)", "D (4)", "E (5)", "F (6)", "7", "8"]
        );
    }

    #[test]
    fn test_panels_ordered_by_feature() {
        let chart = chart_from_tidy(&two_cohort_table(), Kind::Rel, false, false);
        let features: Vec<&str> = chart
            .panels
            .iter()
            .map(|panel| panel.feature.as_str())
            .collect();
        assert_eq!(features, ["article", "book"]);
    }

    #[test]
    fn test_relative_bounds_are_clipped() {
        let chart = chart_from_tidy(&two_cohort_table(), Kind::Rel, false, false);
        assert_eq!(chart.y_bounds, [0.0, 1.0]);
        assert_eq!(chart.y_label, "Mean percentage");
        assert_eq!(chart.x_bounds, [2000.0, 2002.0]);
    }

    #[test]
    fn test_absolute_bounds_follow_the_data() {
        let cohort = CohortLabel::Index(1);
        let table = TidyTable {
            rows: vec![
                row("a", 2000, "article", 3.0, cohort),
                row("a", 2001, "article", 7.0, cohort),
            ],
        };
        let chart = chart_from_tidy(&table, Kind::Abs, false, false);
        assert_eq!(chart.y_label, "Mean of n");
        assert_eq!(chart.y_bounds, [0.0, 7.0]);
    }

    #[test]
    fn test_survivor_filter_is_applied_before_charting() {
        let cohort = CohortLabel::Index(1);
        let table = TidyTable {
            rows: vec![
                row("a", 2000, "article", 0.5, cohort),
                row("a", 2001, "article", 0.5, cohort),
                row("b", 2000, "article", 1.0, cohort),
            ],
        };
        let chart = chart_from_tidy(&table, Kind::Rel, true, false);
        // Only "a" survives, so the 2000 point is a's value, not a mean.
        assert_eq!(
            chart.panels[0].series[0].points,
            [(2000.0, 0.5), (2001.0, 0.5)]
        );
    }

    #[test]
    fn test_input_table_is_not_mutated() {
        let table = two_cohort_table();
        let before = table.clone();
        let _ = chart_from_tidy(&table, Kind::Rel, true, true);
        assert_eq!(table, before);
    }

    #[test]
    fn test_group_facets_in_order_of_appearance() {
        let cohort = CohortLabel::Index(1);
        let mut table = TidyTable {
            rows: vec![row("a", 2000, "article", 1.0, cohort)],
        }
        .with_group("SSH");
        table.extend(
            TidyTable {
                rows: vec![row("a", 2000, "article", 1.0, cohort)],
            }
            .with_group("Humanities"),
        );
        let chart = chart_from_tidy(&table, Kind::Rel, false, true);
        let groups: Vec<Option<&str>> = chart
            .panels
            .iter()
            .map(|panel| panel.group.as_deref())
            .collect();
        assert_eq!(groups, [Some("SSH"), Some("Humanities")]);
    }

    #[test]
    fn test_overview_chart_end_to_end() {
        let records = RecordTable::from_reader(
            "pubyear,kind,authorids\n2000,article,1;2\n2001,book,1\n".as_bytes(),
        )
        .unwrap();
        let chart =
            overview_chart(&records, "kind", "pubyear", Kind::Rel, None, false).unwrap();
        assert_eq!(chart.panels.len(), 2);
        assert_eq!(chart.x_bounds, [2000.0, 2001.0]);
    }

    #[test]
    fn test_overview_chart_full_has_three_panel_rows() {
        let records = RecordTable::from_reader(
            "pubyear,kind,History,Sociology,authorids\n\
             2000,article,1,0,1\n\
             2001,book,0,1,2\n\
             2001,article,1,1,1;2\n"
                .as_bytes(),
        )
        .unwrap();
        let chart =
            overview_chart_full(&records, "kind", "pubyear", Kind::Rel, None, false).unwrap();
        let mut groups: Vec<Option<&str>> = chart
            .panels
            .iter()
            .map(|panel| panel.group.as_deref())
            .collect();
        groups.dedup();
        assert_eq!(
            groups,
            [
                Some(GROUP_ALL),
                Some(GROUP_HUMANITIES),
                Some(GROUP_SOCIAL_SCIENCES)
            ]
        );
    }
}
