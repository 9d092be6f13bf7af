//! CLI entry point for the GSS wage-gap dashboard pipeline.
//!
//! Provides subcommands for building the full dashboard payload, logging a
//! summary of the survey, and exporting a single view as CSV.

use std::ffi::OsStr;
use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gss_dashboard::Dashboard;
use gss_dashboard::config::PipelineConfig;
use gss_dashboard::output::{append_stats, print_json, print_pretty, write_bundle_json, write_view_csv};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "gss_dashboard")]
#[command(about = "Builds the gender wage gap dashboard from GSS survey data", long_about = None)]
struct Cli {
    /// JSON config file (sentinels, default source)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pipeline and write all views as one JSON document
    Build {
        /// Path or URL of the survey CSV
        #[arg(short, long)]
        source: Option<String>,

        /// JSON file to write the dashboard to
        #[arg(short, long, default_value = "dashboard.json")]
        output: String,

        /// Optional CSV file to append the cleaning report to
        #[arg(long)]
        stats_file: Option<String>,
    },
    /// Log the overview table and the cleaning report
    Summary {
        /// Path or URL of the survey CSV
        #[arg(short, long)]
        source: Option<String>,
    },
    /// Export one view's table as CSV
    Export {
        /// View number in display order (1-6)
        #[arg(short, long)]
        view: usize,

        /// Path or URL of the survey CSV
        #[arg(short, long)]
        source: Option<String>,

        /// CSV file to write
        #[arg(short, long, default_value = "view.csv")]
        output: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/gss_dashboard.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("gss_dashboard.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => PipelineConfig::load(path)
            .with_context(|| format!("loading config from {path}"))?,
        None => PipelineConfig::default(),
    };

    match cli.command {
        Commands::Build {
            source,
            output,
            stats_file,
        } => {
            let dashboard = load_dashboard(&config, source.as_deref()).await?;

            write_bundle_json(&output, &dashboard.bundle())
                .with_context(|| format!("writing dashboard to {output}"))?;

            if let Some(path) = stats_file {
                append_stats(&path, dashboard.stats())
                    .with_context(|| format!("appending cleaning report to {path}"))?;
            }
        }
        Commands::Summary { source } => {
            let dashboard = load_dashboard(&config, source.as_deref()).await?;
            let stats = dashboard.stats();

            for row in &dashboard.aggregates().overview {
                info!(
                    sex = %row.sex,
                    income = ?row.income,
                    job_prestige = ?row.job_prestige,
                    socioeconomic_index = ?row.socioeconomic_index,
                    education = ?row.education,
                    "Group means"
                );
            }

            info!(
                records = stats.rows_read,
                income_missing_pct = stats.income_missing_pct(),
                job_prestige_missing_pct = stats.job_prestige_missing_pct(),
                age_top_coded = stats.age_top_coded,
                unparseable = stats.unparseable_numeric,
                "Cleaning summary"
            );

            print_pretty(stats);
            print_json(&dashboard.aggregates().prestige_edges)?;
        }
        Commands::Export {
            view,
            source,
            output,
        } => {
            let dashboard = load_dashboard(&config, source.as_deref()).await?;
            let selected = dashboard.view(view)?;

            write_view_csv(&output, selected)
                .with_context(|| format!("exporting view {view} to {output}"))?;
        }
    }

    Ok(())
}

/// Resolves the source location and runs the full pipeline once.
#[tracing::instrument(skip(config))]
async fn load_dashboard(config: &PipelineConfig, source: Option<&str>) -> Result<Dashboard> {
    let location = config.resolve_source(source);
    info!(source = %location, "Loading survey data");

    Dashboard::load(&location, config)
        .await
        .with_context(|| format!("building dashboard from {location}"))
}
