//! Export and preview command handlers.
//!
//! Both run one export against the live analytics API. `export` writes the
//! artifact to disk; `preview` keeps it in memory and prints what it got.

use std::path::Path;

use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use sdash_api::{AggregateRequest, AnalyticsClient};
use sdash_charts::CaptureOptions;
use sdash_core::{AppConfig, Locale, Platform};
use sdash_report::{
    run_export, write_artifact, Artifact, BusyFlag, ChartMode, ExportFormat, ExportRequest,
    LogProgress, Orientation, PdfOptions,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Pdf,
    Xlsx,
}

impl From<FormatArg> for ExportFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Pdf => ExportFormat::Pdf,
            FormatArg::Xlsx => ExportFormat::Xlsx,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChartsArg {
    /// Draw charts as vector graphics
    Vector,
    /// Rasterize charts offscreen and embed them as images
    Raster,
    /// Leave charts out
    None,
}

impl From<ChartsArg> for ChartMode {
    fn from(value: ChartsArg) -> Self {
        match value {
            ChartsArg::Vector => ChartMode::Vector,
            ChartsArg::Raster => ChartMode::Raster,
            ChartsArg::None => ChartMode::None,
        }
    }
}

/// Filters and output options shared by `export` and `preview`.
#[derive(Debug, Clone, Args)]
pub struct ExportArgs {
    /// Output format
    #[arg(long, value_enum, default_value = "pdf")]
    pub format: FormatArg,
    /// Profile to include; repeat for several (defaults to every profile)
    #[arg(long = "profile")]
    pub profiles: Vec<String>,
    /// Restrict to one platform (facebook, instagram, tiktok)
    #[arg(long)]
    pub platform: Option<Platform>,
    /// First day of the period (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,
    /// Last day of the period (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,
    /// How charts are placed in the PDF
    #[arg(long, value_enum, default_value = "vector")]
    pub charts: ChartsArg,
    /// Lay the PDF out on landscape pages
    #[arg(long)]
    pub landscape: bool,
    /// Compare KPIs against the preceding period of equal length
    #[arg(long)]
    pub compare_previous: bool,
    /// Fetch comments for keyword and topic charts
    #[arg(long)]
    pub comments: bool,
    /// Report title
    #[arg(long)]
    pub title: Option<String>,
    /// Data source shown under the title
    #[arg(long)]
    pub source: Option<String>,
    /// Report language (es, en); defaults to `SDASH_LOCALE`
    #[arg(long)]
    pub locale: Option<Locale>,
}

/// Builds the export request for `args` on top of `config` defaults.
///
/// # Errors
///
/// Returns an error if `--from` is after `--to`.
pub(crate) fn build_request(
    config: &AppConfig,
    args: &ExportArgs,
) -> anyhow::Result<ExportRequest> {
    if let (Some(from), Some(to)) = (args.from, args.to) {
        anyhow::ensure!(from <= to, "--from ({from}) must not be after --to ({to})");
    }

    let filters = AggregateRequest {
        profile_ids: args.profiles.clone(),
        platform: args.platform,
        date_from: args.from,
        date_to: args.to,
        posts_limit: config.posts_limit,
        include_comments: args.comments,
        compare_previous: args.compare_previous,
    };

    let mut request = ExportRequest::new(
        args.format.into(),
        filters,
        args.locale.unwrap_or(config.locale),
    );
    request.title.clone_from(&args.title);
    request.source_label.clone_from(&args.source);
    request.pdf = PdfOptions {
        orientation: if args.landscape {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        },
        chart_mode: args.charts.into(),
    };
    request.capture = CaptureOptions::from_config(config);
    Ok(request)
}

async fn produce(config: &AppConfig, args: &ExportArgs) -> anyhow::Result<Artifact> {
    let request = build_request(config, args)?;
    let client = AnalyticsClient::from_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build analytics client: {e}"))?;

    tracing::debug!(
        format = %request.format,
        profiles = request.filters.profile_ids.len(),
        "starting export"
    );
    let busy = BusyFlag::new();
    let artifact = run_export(&client, &request, &busy, &LogProgress)
        .await
        .map_err(|e| anyhow::anyhow!("{}: {e}", e.short_reason()))?;

    for warning in &artifact.warnings {
        eprintln!("warning: {warning}");
    }
    Ok(artifact)
}

/// Runs an export and writes the artifact into `out`, or the configured
/// output directory.
///
/// # Errors
///
/// Returns an error if the export fails or the file cannot be written. No
/// file is left behind in either case.
pub(crate) async fn run_export_command(
    config: &AppConfig,
    args: &ExportArgs,
    out: Option<&Path>,
) -> anyhow::Result<()> {
    let artifact = produce(config, args).await?;
    let dir = out.unwrap_or(config.output_dir.as_path());
    let path = write_artifact(&artifact, dir)
        .await
        .map_err(|e| anyhow::anyhow!("{}: {e}", e.short_reason()))?;
    println!("wrote {}", path.display());
    Ok(())
}

/// Runs an export without saving it and prints a summary.
///
/// # Errors
///
/// Returns an error if the export fails.
pub(crate) async fn run_preview_command(
    config: &AppConfig,
    args: &ExportArgs,
) -> anyhow::Result<()> {
    let artifact = produce(config, args).await?;
    println!("{}", preview_line(&artifact));
    Ok(())
}

pub(crate) fn preview_line(artifact: &Artifact) -> String {
    let warnings = match artifact.warnings.len() {
        0 => String::new(),
        1 => ", 1 warning".to_string(),
        n => format!(", {n} warnings"),
    };
    format!(
        "{} ({}, {} bytes{warnings})",
        artifact.file_name,
        artifact.format,
        artifact.bytes.len()
    )
}
