//! End-to-end pipeline: source bytes → cleaned table → aggregates → views.
//!
//! A [`Dashboard`] is built once per process and only read afterwards.

use tracing::info;

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::fetch::read_source;
use crate::parser::parse_table;
use crate::stats::CleaningStats;
use crate::survey::aggregate::aggregate;
use crate::survey::clean::clean;
use crate::survey::types::{Aggregates, SurveyTable};
use crate::views::{DashboardBundle, RenderableView, assemble, build_bundle};

#[derive(Debug, Clone)]
pub struct Dashboard {
    source: String,
    table: SurveyTable,
    stats: CleaningStats,
    aggregates: Aggregates,
    views: Vec<RenderableView>,
}

impl Dashboard {
    /// Runs the pipeline over already-loaded source bytes.
    pub fn from_bytes(source: &str, bytes: &[u8], config: &PipelineConfig) -> Result<Self> {
        let raw = parse_table(bytes)?;
        let (table, stats) = clean(&raw, &config.missing_values())?;
        let aggregates = aggregate(&table);
        let views = assemble(&aggregates);

        info!(source, views = views.len(), "Dashboard assembled");

        Ok(Self {
            source: source.to_string(),
            table,
            stats: stats.with_source(source),
            aggregates,
            views,
        })
    }

    /// Reads `source` (path or URL) and runs the pipeline.
    pub async fn load(source: &str, config: &PipelineConfig) -> Result<Self> {
        let bytes = read_source(source).await?;
        Self::from_bytes(source, &bytes, config)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn table(&self) -> &SurveyTable {
        &self.table
    }

    pub fn stats(&self) -> &CleaningStats {
        &self.stats
    }

    pub fn aggregates(&self) -> &Aggregates {
        &self.aggregates
    }

    pub fn views(&self) -> &[RenderableView] {
        &self.views
    }

    /// View by 1-based display position.
    pub fn view(&self, index: usize) -> Result<&RenderableView> {
        index
            .checked_sub(1)
            .and_then(|i| self.views.get(i))
            .ok_or(PipelineError::ViewIndex {
                index,
                count: self.views.len(),
            })
    }

    pub fn bundle(&self) -> DashboardBundle {
        build_bundle(&self.source, &self.aggregates, self.views.clone())
    }
}
