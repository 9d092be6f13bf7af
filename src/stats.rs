//! Cleaning report: how much of each field survived the missing-value policy.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::survey::types::SurveyTable;

#[derive(Debug, Default, Clone, Serialize)]
pub struct CleaningStats {
    pub timestamp: DateTime<Utc>,
    pub source: Option<String>,
    pub rows_read: usize,

    // schema
    pub absent_columns: String,

    // normalization
    pub age_top_coded: usize,
    pub unparseable_numeric: usize,

    // missing values per cleaned field
    pub missing_id: usize,
    pub missing_weight: usize,
    pub missing_sex: usize,
    pub missing_education: usize,
    pub missing_region: usize,
    pub missing_age: usize,
    pub missing_income: usize,
    pub missing_job_prestige: usize,
    pub missing_mother_job_prestige: usize,
    pub missing_father_job_prestige: usize,
    pub missing_socioeconomic_index: usize,
    pub missing_relationship: usize,
    pub missing_male_breadwinner: usize,
    pub missing_men_bettersuited: usize,
    pub missing_child_suffer: usize,
    pub missing_men_overwork: usize,
}

impl CleaningStats {
    /// Counts missing values per field across the cleaned table.
    pub fn from_table(table: &SurveyTable) -> Self {
        let mut s = CleaningStats {
            timestamp: Utc::now(),
            rows_read: table.len(),
            ..Default::default()
        };

        macro_rules! count_missing {
            ($rec:expr, $($field:ident => $counter:ident),+ $(,)?) => {
                $(
                    if $rec.$field.is_none() {
                        s.$counter += 1;
                    }
                )+
            };
        }

        for r in table.iter() {
            count_missing!(r,
                id => missing_id,
                weight => missing_weight,
                sex => missing_sex,
                education => missing_education,
                region => missing_region,
                age => missing_age,
                income => missing_income,
                job_prestige => missing_job_prestige,
                mother_job_prestige => missing_mother_job_prestige,
                father_job_prestige => missing_father_job_prestige,
                socioeconomic_index => missing_socioeconomic_index,
                relationship => missing_relationship,
                male_breadwinner => missing_male_breadwinner,
                men_bettersuited => missing_men_bettersuited,
                child_suffer => missing_child_suffer,
                men_overwork => missing_men_overwork,
            );
        }

        s
    }

    pub fn pct(part: usize, total: usize) -> f64 {
        if total == 0 {
            0.0
        } else {
            (part as f64 / total as f64) * 100.0
        }
    }

    pub fn income_missing_pct(&self) -> f64 {
        Self::pct(self.missing_income, self.rows_read)
    }

    pub fn job_prestige_missing_pct(&self) -> f64 {
        Self::pct(self.missing_job_prestige, self.rows_read)
    }

    /// Set the source location the table was read from.
    pub fn with_source(mut self, source: &str) -> Self {
        self.source = Some(source.to_string());
        self
    }
}
