//! Raw survey rows → typed [`SurveyTable`].

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::config::MissingValues;
use crate::error::{PipelineError, Result};
use crate::parser::RawTable;
use crate::stats::CleaningStats;
use crate::survey::types::{COLUMN_MAP, SurveyRecord, SurveyTable};

/// Top-coded age category in the GSS extract.
pub const AGE_TOP_CODE: &str = "89 or older";
pub const AGE_TOP_VALUE: f64 = 89.0;

/// Parses a numeric cell; non-finite or non-numeric text is `None`.
pub fn parse_number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses an age cell, mapping the top-code category to 89.
pub fn parse_age(value: &str) -> Option<f64> {
    if value.trim() == AGE_TOP_CODE {
        return Some(AGE_TOP_VALUE);
    }
    parse_number(value)
}

/// Parses an identifier, accepting integral floats such as `"12.0"`.
pub fn parse_id(value: &str) -> Option<i64> {
    let value = value.trim();
    value.parse::<i64>().ok().or_else(|| {
        parse_number(value)
            .filter(|v| v.fract() == 0.0 && v.abs() < i64::MAX as f64)
            .map(|v| v as i64)
    })
}

/// Per-row field reader that applies the missing-value policy.
struct RowReader<'a> {
    raw: &'a RawTable,
    missing: &'a MissingValues,
    columns: HashMap<&'static str, usize>,
    age_top_coded: usize,
    unparseable: usize,
}

impl<'a> RowReader<'a> {
    /// Cell for `field`, unless absent or a missing-value token.
    fn present(&self, row: usize, field: &str) -> Option<&'a str> {
        let col = *self.columns.get(field)?;
        let value = self.raw.cell(row, col)?;
        if self.missing.is_missing(value) {
            None
        } else {
            Some(value.trim())
        }
    }

    fn text(&self, row: usize, field: &str) -> Option<String> {
        self.present(row, field).map(str::to_string)
    }

    fn numeric<T>(&mut self, row: usize, field: &str, parse: fn(&str) -> Option<T>) -> Option<T> {
        let value = self.present(row, field)?;
        let parsed = parse(value);
        if parsed.is_none() {
            self.unparseable += 1;
            debug!(row, field, value, "Unparseable numeric value treated as missing");
        }
        parsed
    }

    fn number(&mut self, row: usize, field: &str) -> Option<f64> {
        self.numeric(row, field, parse_number)
    }

    fn age(&mut self, row: usize) -> Option<f64> {
        if self.present(row, "age") == Some(AGE_TOP_CODE) {
            self.age_top_coded += 1;
        }
        self.numeric(row, "age", parse_age)
    }

    fn record(&mut self, row: usize) -> SurveyRecord {
        SurveyRecord {
            id: self.numeric(row, "id", parse_id),
            weight: self.number(row, "weight"),
            sex: self.text(row, "sex"),
            education: self.number(row, "education"),
            region: self.text(row, "region"),
            age: self.age(row),
            income: self.number(row, "income"),
            job_prestige: self.number(row, "job_prestige"),
            mother_job_prestige: self.number(row, "mother_job_prestige"),
            father_job_prestige: self.number(row, "father_job_prestige"),
            socioeconomic_index: self.number(row, "socioeconomic_index"),
            relationship: self.text(row, "relationship"),
            male_breadwinner: self.text(row, "male_breadwinner"),
            men_bettersuited: self.text(row, "men_bettersuited"),
            child_suffer: self.text(row, "child_suffer"),
            men_overwork: self.text(row, "men_overwork"),
        }
    }
}

/// Selects, renames and types the survey columns.
///
/// Source columns absent from the header leave their field `None` on every
/// record. The raw table is only borrowed.
///
/// # Errors
///
/// Returns [`PipelineError::Schema`] if none of the expected source columns
/// is present.
#[tracing::instrument(skip_all, fields(rows = raw.len()))]
pub fn clean(raw: &RawTable, missing: &MissingValues) -> Result<(SurveyTable, CleaningStats)> {
    let mut columns = HashMap::new();
    let mut absent = Vec::new();

    for (source, field) in COLUMN_MAP {
        match raw.column_index(source) {
            Some(idx) => {
                columns.insert(field, idx);
            }
            None => absent.push(source),
        }
    }

    if columns.is_empty() {
        let expected: Vec<&str> = COLUMN_MAP.iter().map(|(source, _)| *source).collect();
        return Err(PipelineError::Schema(format!(
            "none of the expected columns are present (expected {})",
            expected.join(", ")
        )));
    }

    if !absent.is_empty() {
        warn!(absent = ?absent, "Source columns missing, fields will be empty");
    }

    let mut reader = RowReader {
        raw,
        missing,
        columns,
        age_top_coded: 0,
        unparseable: 0,
    };

    let records: Vec<SurveyRecord> = (0..raw.len()).map(|row| reader.record(row)).collect();
    let table = SurveyTable::from_records(records);

    let mut stats = CleaningStats::from_table(&table);
    stats.absent_columns = absent.join(";");
    stats.age_top_coded = reader.age_top_coded;
    stats.unparseable_numeric = reader.unparseable;

    if reader.unparseable > 0 {
        warn!(count = reader.unparseable, "Non-numeric values treated as missing");
    }

    info!(
        records = table.len(),
        missing_income = stats.missing_income,
        missing_job_prestige = stats.missing_job_prestige,
        age_top_coded = stats.age_top_coded,
        "Survey table cleaned"
    );

    Ok((table, stats))
}
