//! One export run: fetch, shape, optionally capture, render.
//!
//! A run is guarded by a [`BusyFlag`] and reports each step to a
//! [`ProgressSink`]. A failed run yields no artifact.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{NaiveDate, Utc};
use sdash_api::{aggregate, AggregateRequest, AnalyticsSource};
use sdash_charts::{capture_charts, CaptureHost, CaptureOptions, CapturedChart, OffscreenHost};
use sdash_core::{ExportData, Locale, ReachEstimate};

use crate::build::{build_export_data, date_range_label, ReportMeta};
use crate::error::ReportError;
use crate::pdf::{render_pdf, ChartMode, PdfOptions};
use crate::xlsx::render_workbook;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Pdf,
    Xlsx,
}

impl ExportFormat {
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Xlsx => "xlsx",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// `dashboard-reporte-2025-02-01.pdf`.
#[must_use]
pub fn artifact_file_name(format: ExportFormat, date: NaiveDate) -> String {
    format!(
        "dashboard-reporte-{}.{}",
        date.format("%Y-%m-%d"),
        format.extension()
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    Fetching,
    CapturingCharts,
    Generating,
    Succeeded { file_name: String },
    Failed { reason: String },
}

/// Receives progress notifications.
pub trait ProgressSink: Sync {
    fn notify(&self, progress: &Progress);
}

impl<F: Fn(&Progress) + Sync> ProgressSink for F {
    fn notify(&self, progress: &Progress) {
        self(progress);
    }
}

/// Reports progress through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn notify(&self, progress: &Progress) {
        match progress {
            Progress::Fetching => tracing::info!("fetching dashboard data"),
            Progress::CapturingCharts => tracing::info!("capturing charts"),
            Progress::Generating => tracing::info!("generating report"),
            Progress::Succeeded { file_name } => {
                tracing::info!(file_name = %file_name, "report ready");
            }
            Progress::Failed { reason } => tracing::error!(reason = %reason, "export failed"),
        }
    }
}

/// Allows one export at a time.
#[derive(Debug, Default)]
pub struct BusyFlag {
    busy: AtomicBool,
}

impl BusyFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Marks the flag busy until the returned guard is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Busy`] if another guard is alive.
    pub fn try_acquire(&self) -> Result<BusyGuard<'_>, ReportError> {
        self.busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map(|_| BusyGuard { flag: self })
            .map_err(|_| ReportError::Busy)
    }
}

#[must_use = "the flag is cleared as soon as the guard is dropped"]
pub struct BusyGuard<'a> {
    flag: &'a BusyFlag,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.busy.store(false, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub format: ExportFormat,
    pub filters: AggregateRequest,
    pub title: Option<String>,
    pub source_label: Option<String>,
    pub pdf: PdfOptions,
    pub capture: CaptureOptions,
    pub estimate: ReachEstimate,
    pub locale: Locale,
}

impl ExportRequest {
    #[must_use]
    pub fn new(format: ExportFormat, filters: AggregateRequest, locale: Locale) -> Self {
        Self {
            format,
            filters,
            title: None,
            source_label: None,
            pdf: PdfOptions::default(),
            capture: CaptureOptions::default(),
            estimate: ReachEstimate::DEFAULT,
            locale,
        }
    }
}

/// A finished report.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub file_name: String,
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
    /// Non-fatal problems worth showing the user.
    pub warnings: Vec<String>,
}

/// Runs an export, rasterizing charts offscreen when the request asks for
/// raster charts.
///
/// # Errors
///
/// See [`run_export_with_host`].
pub async fn run_export<S: AnalyticsSource>(
    source: &S,
    request: &ExportRequest,
    busy: &BusyFlag,
    progress: &dyn ProgressSink,
) -> Result<Artifact, ReportError> {
    run_export_with_host(source, request, busy, progress, |data: &ExportData| {
        OffscreenHost::new(data.charts.clone(), data.locale)
    })
    .await
}

/// Runs an export, capturing raster charts from the host `make_host` builds.
///
/// # Errors
///
/// Returns [`ReportError::Busy`] if another export holds `busy`,
/// [`ReportError::Api`] if every profile failed to fetch, and a rendering
/// error if the artifact could not be produced.
pub async fn run_export_with_host<S, H, F>(
    source: &S,
    request: &ExportRequest,
    busy: &BusyFlag,
    progress: &dyn ProgressSink,
    make_host: F,
) -> Result<Artifact, ReportError>
where
    S: AnalyticsSource,
    H: CaptureHost,
    F: FnOnce(&ExportData) -> H,
{
    let result = match busy.try_acquire() {
        Ok(_guard) => export(source, request, progress, make_host).await,
        Err(e) => Err(e),
    };

    match &result {
        Ok(artifact) => progress.notify(&Progress::Succeeded {
            file_name: artifact.file_name.clone(),
        }),
        Err(e) => {
            tracing::error!(error = %e, "export failed");
            progress.notify(&Progress::Failed {
                reason: e.short_reason().to_string(),
            });
        }
    }
    result
}

async fn export<S, H, F>(
    source: &S,
    request: &ExportRequest,
    progress: &dyn ProgressSink,
    make_host: F,
) -> Result<Artifact, ReportError>
where
    S: AnalyticsSource,
    H: CaptureHost,
    F: FnOnce(&ExportData) -> H,
{
    let mut warnings = Vec::new();

    progress.notify(&Progress::Fetching);
    let aggregate = aggregate(source, &request.filters, &request.estimate).await?;

    let generated_at = Utc::now();
    let meta = ReportMeta {
        title: request.title.clone(),
        date_range: date_range_label(
            request.filters.date_from,
            request.filters.date_to,
            request.locale,
        ),
        source: request.source_label.clone(),
        generated_at,
        locale: request.locale,
    };
    let data = build_export_data(&aggregate, meta);

    let captured = if request.format == ExportFormat::Pdf
        && request.pdf.chart_mode == ChartMode::Raster
        && !data.charts.is_empty()
    {
        progress.notify(&Progress::CapturingCharts);
        capture(make_host(&data), &request.capture, &mut warnings).await
    } else {
        Vec::new()
    };

    progress.notify(&Progress::Generating);
    let bytes = match request.format {
        ExportFormat::Pdf => render_pdf(&data, &request.pdf, &captured)?,
        ExportFormat::Xlsx => render_workbook(&data)?,
    };

    Ok(Artifact {
        file_name: artifact_file_name(request.format, generated_at.date_naive()),
        format: request.format,
        bytes,
        warnings,
    })
}

async fn capture<H: CaptureHost>(
    host: H,
    options: &CaptureOptions,
    warnings: &mut Vec<String>,
) -> Vec<CapturedChart> {
    let report = capture_charts(&host, options).await;
    if report.is_empty() {
        warnings.push("charts could not be captured; the report has tables only".to_string());
    } else if !report.failed.is_empty() {
        warnings.push(format!(
            "some charts could not be captured: {}",
            report.failed.join(", ")
        ));
    }
    report.charts
}

/// Writes `artifact` into `dir` and returns its path.
///
/// The bytes go to a temporary sibling first and are renamed into place, so
/// a failed write never leaves a truncated report behind.
///
/// # Errors
///
/// Returns [`ReportError::Io`] if the directory or file cannot be written.
pub async fn write_artifact(artifact: &Artifact, dir: &Path) -> Result<PathBuf, ReportError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| io_error(dir, e))?;
    let path = dir.join(&artifact.file_name);
    let partial = dir.join(format!(".{}.part", artifact.file_name));

    let written = match tokio::fs::write(&partial, &artifact.bytes).await {
        Ok(()) => tokio::fs::rename(&partial, &path).await,
        Err(e) => Err(e),
    };
    if let Err(e) = written {
        if let Err(cleanup) = tokio::fs::remove_file(&partial).await {
            tracing::debug!(path = %partial.display(), error = %cleanup, "no partial file to remove");
        }
        return Err(io_error(&path, e));
    }

    tracing::info!(path = %path.display(), bytes = artifact.bytes.len(), "report written");
    Ok(path)
}

fn io_error(path: &Path, source: std::io::Error) -> ReportError {
    ReportError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
#[path = "export_test.rs"]
mod tests;
