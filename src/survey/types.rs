//! Data types used by the survey pipeline.

use serde::Serialize;

/// Source column → cleaned field, in output order.
pub const COLUMN_MAP: [(&str, &str); 16] = [
    ("id", "id"),
    ("wtss", "weight"),
    ("sex", "sex"),
    ("educ", "education"),
    ("region", "region"),
    ("age", "age"),
    ("coninc", "income"),
    ("prestg10", "job_prestige"),
    ("mapres10", "mother_job_prestige"),
    ("papres10", "father_job_prestige"),
    ("sei10", "socioeconomic_index"),
    ("fechld", "relationship"),
    ("fefam", "male_breadwinner"),
    ("fepol", "men_bettersuited"),
    ("fepresch", "child_suffer"),
    ("meovrwrk", "men_overwork"),
];

/// One cleaned survey respondent. `None` means missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SurveyRecord {
    pub id: Option<i64>,
    pub weight: Option<f64>,
    pub sex: Option<String>,
    pub education: Option<f64>,
    pub region: Option<String>,
    pub age: Option<f64>,
    pub income: Option<f64>,
    pub job_prestige: Option<f64>,
    pub mother_job_prestige: Option<f64>,
    pub father_job_prestige: Option<f64>,
    pub socioeconomic_index: Option<f64>,
    pub relationship: Option<String>,
    pub male_breadwinner: Option<String>,
    pub men_bettersuited: Option<String>,
    pub child_suffer: Option<String>,
    pub men_overwork: Option<String>,
}

impl SurveyRecord {
    /// Cleaned field names, in the order they are serialized.
    pub fn field_names() -> [&'static str; 16] {
        COLUMN_MAP.map(|(_, clean)| clean)
    }
}

/// The cleaned dataset. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurveyTable {
    records: Vec<SurveyRecord>,
}

impl SurveyTable {
    pub fn from_records(records: Vec<SurveyRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[SurveyRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SurveyRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Ordered prestige bin, 1 through 6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PrestigeLevel(u8);

impl PrestigeLevel {
    pub const COUNT: usize = 6;

    /// `n` must be in `1..=6`.
    pub fn new(n: u8) -> Option<Self> {
        (1..=Self::COUNT as u8).contains(&n).then_some(Self(n))
    }

    pub fn number(self) -> u8 {
        self.0
    }

    pub fn label(self) -> String {
        format!("level {}", self.0)
    }

    /// All labels in display order.
    pub fn labels() -> Vec<String> {
        (1..=Self::COUNT as u8).map(|n| Self(n).label()).collect()
    }
}

impl Serialize for PrestigeLevel {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label())
    }
}

/// Per-sex rounded means. `None` marks a group with no valid observations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewRow {
    pub sex: String,
    pub income: Option<f64>,
    pub job_prestige: Option<f64>,
    pub socioeconomic_index: Option<f64>,
    pub education: Option<f64>,
}

/// Respondents per (sex, male_breadwinner answer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreadwinnerCount {
    pub sex: String,
    pub male_breadwinner: String,
    pub counts: usize,
}

/// Row-level point for the prestige/income scatter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrestigeIncomePoint {
    pub sex: String,
    pub job_prestige: f64,
    pub income: f64,
    pub education: Option<f64>,
    pub socioeconomic_index: Option<f64>,
}

/// One observation of a numeric field for a sex group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SexValue {
    pub sex: String,
    pub value: f64,
}

/// Income observation tagged with its prestige level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrestigeLevelIncome {
    pub sex: String,
    pub prestige_level: PrestigeLevel,
    pub income: f64,
}

/// Everything the view assembler needs, derived from one [`SurveyTable`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregates {
    pub overview: Vec<OverviewRow>,
    pub breadwinner: Vec<BreadwinnerCount>,
    pub scatter: Vec<PrestigeIncomePoint>,
    pub income_by_sex: Vec<SexValue>,
    pub prestige_by_sex: Vec<SexValue>,
    pub income_by_prestige_level: Vec<PrestigeLevelIncome>,
    pub prestige_edges: Option<[f64; PrestigeLevel::COUNT + 1]>,
}
