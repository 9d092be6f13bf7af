use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::survey::binning::PrestigeBins;
use crate::survey::types::{
    Aggregates, BreadwinnerCount, OverviewRow, PrestigeIncomePoint, PrestigeLevelIncome,
    SexValue, SurveyRecord, SurveyTable,
};
use crate::survey::utility::rounded_mean;

/// Distinct `sex` values in order of first appearance.
pub fn sex_levels(table: &SurveyTable) -> Vec<&str> {
    let mut levels: Vec<&str> = Vec::new();
    for sex in table.iter().filter_map(|r| r.sex.as_deref()) {
        if !levels.contains(&sex) {
            levels.push(sex);
        }
    }
    levels
}

/// Per-sex rounded means of income, prestige, SEI and education.
///
/// Every sex level present in the table gets a row, even when a field has
/// no valid observations for it; that mean is `None`.
pub fn overview(table: &SurveyTable) -> Vec<OverviewRow> {
    sex_levels(table)
        .into_iter()
        .map(|sex| {
            let group: Vec<&SurveyRecord> = table
                .iter()
                .filter(|r| r.sex.as_deref() == Some(sex))
                .collect();

            let field_mean = |get: fn(&SurveyRecord) -> Option<f64>| {
                let values: Vec<f64> = group.iter().filter_map(|r| get(r)).collect();
                rounded_mean(&values)
            };

            OverviewRow {
                sex: sex.to_string(),
                income: field_mean(|r| r.income),
                job_prestige: field_mean(|r| r.job_prestige),
                socioeconomic_index: field_mean(|r| r.socioeconomic_index),
                education: field_mean(|r| r.education),
            }
        })
        .collect()
}

/// Row counts per observed (sex, male_breadwinner) pair, sorted by key.
pub fn breadwinner_counts(table: &SurveyTable) -> Vec<BreadwinnerCount> {
    let mut counts: BTreeMap<(&str, &str), usize> = BTreeMap::new();

    for r in table.iter() {
        if let (Some(sex), Some(answer)) = (r.sex.as_deref(), r.male_breadwinner.as_deref()) {
            *counts.entry((sex, answer)).or_default() += 1;
        }
    }

    counts
        .into_iter()
        .map(|((sex, answer), counts)| BreadwinnerCount {
            sex: sex.to_string(),
            male_breadwinner: answer.to_string(),
            counts,
        })
        .collect()
}

/// Rows with sex, job prestige and income all present.
pub fn prestige_income_points(table: &SurveyTable) -> Vec<PrestigeIncomePoint> {
    table
        .iter()
        .filter_map(|r| {
            Some(PrestigeIncomePoint {
                sex: r.sex.clone()?,
                job_prestige: r.job_prestige?,
                income: r.income?,
                education: r.education,
                socioeconomic_index: r.socioeconomic_index,
            })
        })
        .collect()
}

/// (sex, value) pairs where both are present.
pub fn values_by_sex(
    table: &SurveyTable,
    get: impl Fn(&SurveyRecord) -> Option<f64>,
) -> Vec<SexValue> {
    table
        .iter()
        .filter_map(|r| {
            Some(SexValue {
                sex: r.sex.clone()?,
                value: get(r)?,
            })
        })
        .collect()
}

/// Income per sex and prestige level. Rows without a defined level are dropped.
pub fn income_by_prestige_level(
    table: &SurveyTable,
    bins: Option<&PrestigeBins>,
) -> Vec<PrestigeLevelIncome> {
    let Some(bins) = bins else {
        return Vec::new();
    };

    table
        .iter()
        .filter_map(|r| {
            Some(PrestigeLevelIncome {
                sex: r.sex.clone()?,
                prestige_level: bins.level(r.job_prestige?)?,
                income: r.income?,
            })
        })
        .collect()
}

/// Computes every summary the dashboard shows from one cleaned table.
///
/// Prestige bin edges come from the whole table's `job_prestige` column,
/// before any row filtering.
#[tracing::instrument(skip_all, fields(records = table.len()))]
pub fn aggregate(table: &SurveyTable) -> Aggregates {
    let bins = PrestigeBins::from_table(table);
    if let Some(b) = &bins {
        debug!(edges = ?b.edges(), "Prestige bins computed");
    }

    let aggregates = Aggregates {
        overview: overview(table),
        breadwinner: breadwinner_counts(table),
        scatter: prestige_income_points(table),
        income_by_sex: values_by_sex(table, |r| r.income),
        prestige_by_sex: values_by_sex(table, |r| r.job_prestige),
        income_by_prestige_level: income_by_prestige_level(table, bins.as_ref()),
        prestige_edges: bins.map(|b| b.edges()),
    };

    info!(
        groups = aggregates.overview.len(),
        breadwinner_pairs = aggregates.breadwinner.len(),
        scatter_points = aggregates.scatter.len(),
        leveled_incomes = aggregates.income_by_prestige_level.len(),
        "Aggregates computed"
    );

    aggregates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survey::types::PrestigeLevel;

    fn person(sex: Option<&str>, income: Option<f64>, prestige: Option<f64>) -> SurveyRecord {
        SurveyRecord {
            sex: sex.map(str::to_string),
            income,
            job_prestige: prestige,
            ..Default::default()
        }
    }

    fn scenario() -> SurveyTable {
        SurveyTable::from_records(vec![
            person(Some("male"), Some(50000.0), Some(40.0)),
            person(Some("male"), Some(70000.0), Some(60.0)),
            person(Some("female"), Some(40000.0), Some(45.0)),
            person(Some("female"), Some(45000.0), None),
        ])
    }

    #[test]
    fn test_overview_scenario() {
        let rows = overview(&scenario());

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].sex, "male");
        assert_eq!(rows[0].income, Some(60000.00));
        assert_eq!(rows[0].job_prestige, Some(50.0));
        assert_eq!(rows[1].sex, "female");
        assert_eq!(rows[1].income, Some(42500.00));
        assert_eq!(rows[1].job_prestige, Some(45.0));
    }

    #[test]
    fn test_overview_keeps_encounter_order() {
        let table = SurveyTable::from_records(vec![
            person(Some("male"), Some(1.0), None),
            person(None, Some(5.0), None),
            person(Some("female"), Some(2.0), None),
            person(Some("male"), Some(3.0), None),
        ]);
        let sexes: Vec<String> = overview(&table).into_iter().map(|r| r.sex).collect();
        assert_eq!(sexes, vec!["male", "female"]);
    }

    #[test]
    fn test_overview_reports_no_data_as_none() {
        let table = SurveyTable::from_records(vec![
            person(Some("male"), Some(10.0), Some(30.0)),
            person(Some("female"), None, Some(40.0)),
        ]);
        let rows = overview(&table);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].sex, "female");
        assert_eq!(rows[1].income, None);
        assert_eq!(rows[1].job_prestige, Some(40.0));
        assert_eq!(rows[1].education, None);
    }

    #[test]
    fn test_overview_is_idempotent() {
        let table = SurveyTable::from_records(vec![
            person(Some("male"), Some(10.0 / 3.0), Some(1.0 / 7.0)),
            person(Some("male"), Some(0.1), Some(0.2)),
            person(Some("female"), Some(2.0 / 3.0), Some(0.3)),
        ]);
        let a = overview(&table);
        let b = overview(&table);

        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.income.map(f64::to_bits), y.income.map(f64::to_bits));
            assert_eq!(
                x.job_prestige.map(f64::to_bits),
                y.job_prestige.map(f64::to_bits)
            );
        }
    }

    #[test]
    fn test_breadwinner_counts_sum() {
        let answers = [
            (Some("male"), Some("agree")),
            (Some("male"), Some("agree")),
            (Some("male"), Some("disagree")),
            (Some("female"), Some("strongly disagree")),
            (Some("female"), None),
            (None, Some("agree")),
        ];
        let table = SurveyTable::from_records(
            answers
                .iter()
                .map(|(sex, answer)| SurveyRecord {
                    sex: sex.map(str::to_string),
                    male_breadwinner: answer.map(str::to_string),
                    ..Default::default()
                })
                .collect(),
        );

        let counts = breadwinner_counts(&table);
        let total: usize = counts.iter().map(|c| c.counts).sum();

        assert_eq!(total, 4);
        assert_eq!(counts.len(), 3);
        assert_eq!(
            counts[0],
            BreadwinnerCount {
                sex: "female".into(),
                male_breadwinner: "strongly disagree".into(),
                counts: 1,
            }
        );
        assert_eq!(counts[1].male_breadwinner, "agree");
        assert_eq!(counts[1].counts, 2);
    }

    #[test]
    fn test_scatter_excludes_missing_prestige() {
        let points = prestige_income_points(&scenario());

        assert_eq!(points.len(), 3);
        assert!(points.iter().all(|p| p.income != 45000.0));
    }

    #[test]
    fn test_values_by_sex_drops_missing() {
        let table = scenario();
        assert_eq!(values_by_sex(&table, |r| r.income).len(), 4);
        assert_eq!(values_by_sex(&table, |r| r.job_prestige).len(), 3);
    }

    #[test]
    fn test_income_by_prestige_level_drops_undefined() {
        let table = scenario();
        let agg = aggregate(&table);

        // edges from 40..60: level 1 holds 40, level 2 holds 45, level 6 holds 60
        let levels: Vec<u8> = agg
            .income_by_prestige_level
            .iter()
            .map(|r| r.prestige_level.number())
            .collect();
        assert_eq!(levels, vec![1, 6, 2]);
        assert!(
            agg.income_by_prestige_level
                .iter()
                .all(|r| r.prestige_level <= PrestigeLevel::new(6).unwrap())
        );
    }

    #[test]
    fn test_aggregate_empty_table() {
        let agg = aggregate(&SurveyTable::default());
        assert!(agg.overview.is_empty());
        assert!(agg.breadwinner.is_empty());
        assert!(agg.income_by_prestige_level.is_empty());
        assert_eq!(agg.prestige_edges, None);
    }
}
