//! Output formatting and persistence for the dashboard payload.
//!
//! Supports pretty-printing, JSON bundles, per-view CSV export, and CSV
//! append of cleaning reports.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use csv::WriterBuilder;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::Result;
use crate::stats::CleaningStats;
use crate::views::{DashboardBundle, RenderableView};

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty<T: std::fmt::Debug>(value: &T) {
    debug!("{:#?}", value);
}

/// Logs a value as pretty-printed JSON.
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Writes the dashboard bundle as pretty JSON, replacing any existing file.
pub fn write_bundle_json(path: &str, bundle: &DashboardBundle) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, bundle).map_err(std::io::Error::from)?;
    writer.flush()?;
    info!(path, views = bundle.views.len(), "Dashboard bundle written");
    Ok(())
}

/// Writes one view's table as CSV; missing cells are left empty.
pub fn write_view_csv(path: &str, view: &RenderableView) -> Result<()> {
    let mut writer = WriterBuilder::new().from_path(path)?;

    writer.write_record(&view.table.columns)?;
    for row in &view.table.rows {
        writer.write_record(row.iter().map(|c| c.to_field()))?;
    }
    writer.flush()?;

    info!(path, rows = view.table.len(), title = %view.title, "View exported");
    Ok(())
}

/// Appends a [`CleaningStats`] record as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_stats(path: &str, stats: &CleaningStats) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending cleaning report");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    writer.serialize(stats)?;
    writer.flush()?;

    Ok(())
}
