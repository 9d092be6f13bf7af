//! Renderer-facing packaging of the aggregates.
//!
//! A [`RenderableView`] is a title, a plain [`DataTable`] and a label map.
//! Any charting backend can consume it; nothing here draws anything.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::survey::types::{Aggregates, PrestigeLevel, SexValue};

pub const PAGE_HEADING: &str = "Understanding the Gender Wage Gap";

pub const OVERVIEW_TITLE: &str = "Wage Gap Overview";

/// Intro text shown above the charts, as markdown.
pub const OVERVIEW_MARKDOWN: &str = "\
The gender wage gap is the average difference between the income for working men and women. \
Due to legal, social, and economic factors, women are considered to be paid less than men. \
According to [Wikipedia](https://en.wikipedia.org/wiki/Gender_pay_gap), \"in the United States, \
for example, the non-adjusted average female's annual salary is 79% of the average male salary, \
compared to 95% for the adjusted average salary.\" An article from the \
[Economic Policy Institute](https://www.epi.org/publication/what-is-the-gender-pay-gap-and-is-it-real/) \
points out that the gender wage gap is often made a political issue, despite the fact that data \
supports the claim that a gender wage gap exists. This source also points out that in recent years \
the gap has been closing, and that data about the gender wage gap should be used carefully with \
clear goals in mind

The GSS is the \"General Social Survey\" which collects data on current American society in order \
to monitor trends in attitudes and behaviors. The General Social Survey is often conducted through \
face-to-face interviews, and the GSS's goal is to make high-quality data easily accessible to anyone \
who wishes to use it.
";

/// Sex → colour used wherever a chart colours by sex explicitly.
const SEX_COLORS: [(&str, &str); 2] = [("male", "blue"), ("female", "red")];

/// One table cell. `Missing` serializes as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Integer(u64),
    Text(String),
    Missing,
}

impl Cell {
    /// Text form used for CSV export; missing cells are empty.
    pub fn to_field(&self) -> String {
        match self {
            Cell::Number(v) => v.to_string(),
            Cell::Integer(v) => v.to_string(),
            Cell::Text(s) => s.clone(),
            Cell::Missing => String::new(),
        }
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Cell::Number(v)
    }
}

impl From<Option<f64>> for Cell {
    fn from(v: Option<f64>) -> Self {
        v.map_or(Cell::Missing, Cell::Number)
    }
}

impl From<usize> for Cell {
    fn from(v: usize) -> Self {
        Cell::Integer(v as u64)
    }
}

impl From<&str> for Cell {
    fn from(v: &str) -> Self {
        Cell::Text(v.to_string())
    }
}

impl From<String> for Cell {
    fn from(v: String) -> Self {
        Cell::Text(v)
    }
}

/// Column names plus rows of cells.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DataTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl DataTable {
    pub fn new(columns: &[&str]) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a row; its width must match the header.
    pub fn push(&mut self, row: Vec<Cell>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

/// Rendering hint; the backend decides what each means visually.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    Table,
    Bar,
    Scatter,
    Box,
    FacetedBox,
}

/// Which columns drive which visual channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Encoding {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facet: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hover: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub category_orders: BTreeMap<String, Vec<String>>,
    /// Fit drawn per colour group, e.g. `"ols"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trendline: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub color_map: BTreeMap<String, String>,
    /// Facet panels per row.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facet_wrap: Option<usize>,
    /// Facet panel titles show the bare value ("level 3"), not "column=value".
    pub facet_value_titles: bool,
    pub show_legend: bool,
}

impl Encoding {
    fn xy(x: &str, y: &str, color: &str) -> Self {
        Self {
            x: Some(x.into()),
            y: Some(y.into()),
            color: Some(color.into()),
            show_legend: true,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderableView {
    pub title: String,
    pub kind: ViewKind,
    pub table: DataTable,
    pub labels: BTreeMap<String, String>,
    pub encoding: Encoding,
}

fn labels(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn overview_view(agg: &Aggregates) -> RenderableView {
    let mut table = DataTable::new(&[
        "sex",
        "Income",
        "Job Prestige",
        "Socioeconomic Index",
        "Years of Education",
    ]);
    for row in &agg.overview {
        table.push(vec![
            row.sex.as_str().into(),
            row.income.into(),
            row.job_prestige.into(),
            row.socioeconomic_index.into(),
            row.education.into(),
        ]);
    }

    RenderableView {
        title: "Comparing Mean Income, Occupational Prestige, and Socioeconomic Index".into(),
        kind: ViewKind::Table,
        table,
        labels: BTreeMap::new(),
        encoding: Encoding::default(),
    }
}

fn breadwinner_view(agg: &Aggregates) -> RenderableView {
    let mut table = DataTable::new(&["sex", "male_breadwinner", "counts"]);
    for c in &agg.breadwinner {
        table.push(vec![
            c.sex.as_str().into(),
            c.male_breadwinner.as_str().into(),
            c.counts.into(),
        ]);
    }

    RenderableView {
        title: "Agreement Level About Male Breadwinner Question".into(),
        kind: ViewKind::Bar,
        table,
        labels: labels(&[("male_breadwinner", "Response Level"), ("counts", "Count")]),
        encoding: Encoding::xy("male_breadwinner", "counts", "sex"),
    }
}

fn scatter_view(agg: &Aggregates) -> RenderableView {
    let mut table = DataTable::new(&[
        "sex",
        "job_prestige",
        "income",
        "education",
        "socioeconomic_index",
    ]);
    for p in &agg.scatter {
        table.push(vec![
            p.sex.as_str().into(),
            p.job_prestige.into(),
            p.income.into(),
            p.education.into(),
            p.socioeconomic_index.into(),
        ]);
    }

    RenderableView {
        title: "Income by Occupational Prestige".into(),
        kind: ViewKind::Scatter,
        table,
        labels: labels(&[
            ("job_prestige", "Occupational Prestige"),
            ("income", "Income"),
        ]),
        encoding: Encoding {
            hover: vec!["education".into(), "socioeconomic_index".into()],
            trendline: Some("ols".into()),
            ..Encoding::xy("job_prestige", "income", "sex")
        },
    }
}

fn distribution_view(title: &str, field: &str, label: &str, values: &[SexValue]) -> RenderableView {
    let mut table = DataTable::new(&["sex", field]);
    for v in values {
        table.push(vec![v.sex.as_str().into(), v.value.into()]);
    }

    RenderableView {
        title: title.into(),
        kind: ViewKind::Box,
        table,
        labels: labels(&[(field, label), ("sex", "")]),
        encoding: Encoding {
            show_legend: false,
            ..Encoding::xy("sex", field, "sex")
        },
    }
}

fn prestige_level_view(agg: &Aggregates) -> RenderableView {
    let mut table = DataTable::new(&["sex", "prestige_level", "income"]);
    for r in &agg.income_by_prestige_level {
        table.push(vec![
            r.sex.as_str().into(),
            r.prestige_level.label().into(),
            r.income.into(),
        ]);
    }

    let mut category_orders = BTreeMap::new();
    category_orders.insert("prestige_level".to_string(), PrestigeLevel::labels());

    RenderableView {
        title: "Income Distribution by Prestige Level".into(),
        kind: ViewKind::FacetedBox,
        table,
        labels: labels(&[("job_prestige", "Job Prestige"), ("sex", "")]),
        encoding: Encoding {
            facet: Some("prestige_level".into()),
            facet_wrap: Some(2),
            facet_value_titles: true,
            color_map: labels(&SEX_COLORS),
            category_orders,
            ..Encoding::xy("sex", "income", "sex")
        },
    }
}

/// Packages the aggregates into the six dashboard views, in display order.
pub fn assemble(agg: &Aggregates) -> Vec<RenderableView> {
    vec![
        overview_view(agg),
        breadwinner_view(agg),
        scatter_view(agg),
        distribution_view("Income Distribution", "income", "Income", &agg.income_by_sex),
        distribution_view(
            "Job Prestige Distribution",
            "job_prestige",
            "Job Prestige",
            &agg.prestige_by_sex,
        ),
        prestige_level_view(agg),
    ]
}

/// Titled markdown block shown before the views.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextSection {
    pub title: String,
    pub markdown: String,
}

/// The full page payload handed to the rendering/serving layer.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardBundle {
    pub heading: String,
    pub overview: TextSection,
    pub source: String,
    pub generated_at: DateTime<Utc>,
    pub prestige_edges: Option<Vec<f64>>,
    pub views: Vec<RenderableView>,
}

pub fn build_bundle(source: &str, agg: &Aggregates, views: Vec<RenderableView>) -> DashboardBundle {
    DashboardBundle {
        heading: PAGE_HEADING.to_string(),
        overview: TextSection {
            title: OVERVIEW_TITLE.to_string(),
            markdown: OVERVIEW_MARKDOWN.to_string(),
        },
        source: source.to_string(),
        generated_at: Utc::now(),
        prestige_edges: agg.prestige_edges.map(|e| e.to_vec()),
        views,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survey::aggregate::aggregate;
    use crate::survey::types::{SurveyRecord, SurveyTable};

    fn sample_aggregates() -> Aggregates {
        let rows = [
            ("male", Some(50000.0), Some(40.0), Some("agree")),
            ("male", Some(70000.0), Some(60.0), Some("disagree")),
            ("female", Some(40000.0), Some(45.0), Some("agree")),
            ("female", None, Some(50.0), None),
        ];
        aggregate(&SurveyTable::from_records(
            rows.iter()
                .map(|(sex, income, prestige, answer)| SurveyRecord {
                    sex: Some(sex.to_string()),
                    income: *income,
                    job_prestige: *prestige,
                    male_breadwinner: answer.map(str::to_string),
                    ..Default::default()
                })
                .collect(),
        ))
    }

    #[test]
    fn test_views_in_display_order() {
        let views = assemble(&sample_aggregates());
        let titles: Vec<&str> = views.iter().map(|v| v.title.as_str()).collect();

        assert_eq!(
            titles,
            vec![
                "Comparing Mean Income, Occupational Prestige, and Socioeconomic Index",
                "Agreement Level About Male Breadwinner Question",
                "Income by Occupational Prestige",
                "Income Distribution",
                "Job Prestige Distribution",
                "Income Distribution by Prestige Level",
            ]
        );
        assert_eq!(views[0].kind, ViewKind::Table);
        assert_eq!(views[5].kind, ViewKind::FacetedBox);
    }

    #[test]
    fn test_overview_missing_mean_is_missing_cell() {
        let agg = Aggregates {
            overview: vec![crate::survey::types::OverviewRow {
                sex: "female".into(),
                income: None,
                job_prestige: Some(45.0),
                socioeconomic_index: None,
                education: Some(13.5),
            }],
            ..sample_aggregates()
        };
        let view = &assemble(&agg)[0];

        assert_eq!(view.table.rows[0][1], Cell::Missing);
        assert_eq!(view.table.rows[0][2], Cell::Number(45.0));
        assert_eq!(view.table.column("Years of Education"), Some(4));
    }

    #[test]
    fn test_labels_and_encoding() {
        let views = assemble(&sample_aggregates());

        assert_eq!(views[1].labels["male_breadwinner"], "Response Level");
        assert_eq!(views[1].labels["counts"], "Count");
        assert_eq!(views[2].labels["job_prestige"], "Occupational Prestige");
        assert_eq!(views[3].labels["sex"], "");
        assert_eq!(views[2].encoding.hover, vec!["education", "socioeconomic_index"]);
        assert_eq!(
            views[5].encoding.category_orders["prestige_level"],
            PrestigeLevel::labels()
        );
    }

    #[test]
    fn test_chart_settings() {
        let views = assemble(&sample_aggregates());

        assert_eq!(views[2].encoding.trendline.as_deref(), Some("ols"));
        assert!(views[2].encoding.show_legend);
        assert!(!views[3].encoding.show_legend);
        assert!(!views[4].encoding.show_legend);

        let facet = &views[5];
        assert_eq!(facet.encoding.facet_wrap, Some(2));
        assert!(facet.encoding.facet_value_titles);
        assert_eq!(facet.encoding.color_map["male"], "blue");
        assert_eq!(facet.encoding.color_map["female"], "red");
        assert_eq!(facet.labels, labels(&[("job_prestige", "Job Prestige"), ("sex", "")]));
        assert!(!facet.labels.contains_key("prestige_level"));
    }

    #[test]
    fn test_row_level_tables_filtered() {
        let views = assemble(&sample_aggregates());

        assert_eq!(views[2].table.len(), 3);
        assert_eq!(views[3].table.len(), 3);
        assert_eq!(views[4].table.len(), 4);
        assert_eq!(views[5].table.len(), 3);
    }

    #[test]
    fn test_missing_cell_serializes_as_null() {
        let json = serde_json::to_string(&vec![Cell::Missing, Cell::Integer(3), Cell::from("x")])
            .unwrap();
        assert_eq!(json, r#"[null,3,"x"]"#);
    }

    #[test]
    fn test_bundle_carries_heading() {
        let agg = sample_aggregates();
        let bundle = build_bundle("fixture.csv", &agg, assemble(&agg));

        assert_eq!(bundle.heading, PAGE_HEADING);
        assert_eq!(bundle.overview.title, "Wage Gap Overview");
        assert!(bundle.overview.markdown.starts_with("The gender wage gap"));
        assert!(bundle.overview.markdown.contains("\n\nThe GSS is"));

        let json = serde_json::to_value(&bundle).unwrap();
        assert_eq!(json["overview"]["title"], OVERVIEW_TITLE);
        assert_eq!(bundle.views.len(), 6);
        assert_eq!(bundle.prestige_edges.as_ref().map(Vec::len), Some(7));
    }
}
