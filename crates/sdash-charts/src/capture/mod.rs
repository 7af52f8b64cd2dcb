//! Raster chart capture, the fallback when charts are not drawn as vectors.
//!
//! A [`CaptureHost`] knows where charts live and how to rasterize them.
//! [`capture_charts`] walks the visible ones under a colour-override session,
//! giving each a settle delay before rasterizing. Individual failures are
//! logged and skipped.

pub mod offscreen;
pub mod session;

use std::future::Future;
use std::time::Duration;

use sdash_core::AppConfig;

use crate::error::ChartError;

pub use offscreen::OffscreenHost;
pub use session::{CaptureSession, OverrideRegistry, OverrideTarget};

pub const DEFAULT_MAX_CHARTS: usize = 8;
pub const DEFAULT_SETTLE: Duration = Duration::from_millis(400);
/// Key identifying the plain-colour override installed during capture.
pub const OVERRIDE_KEY: &str = "sdash-capture-plain-colors";

/// A chart container as the host sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartHandle {
    pub id: String,
    pub title: String,
    pub visible: bool,
}

/// An encoded PNG and its pixel size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub png: Vec<u8>,
    pub width_px: u32,
    pub height_px: u32,
}

impl RasterImage {
    /// Height that keeps the aspect ratio at `width`.
    #[must_use]
    pub fn height_for_width(&self, width: f64) -> f64 {
        if self.width_px == 0 {
            return 0.0;
        }
        width * f64::from(self.height_px) / f64::from(self.width_px)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedChart {
    pub id: String,
    pub title: String,
    pub image: RasterImage,
}

/// Where charts are rendered live.
pub trait CaptureHost: OverrideTarget {
    fn overrides(&self) -> &OverrideRegistry;

    /// Chart containers in display order.
    fn locate_charts(&self) -> Vec<ChartHandle>;

    fn scroll_into_view(
        &self,
        chart: &ChartHandle,
    ) -> impl Future<Output = Result<(), ChartError>> + Send;

    fn rasterize(
        &self,
        chart: &ChartHandle,
    ) -> impl Future<Output = Result<RasterImage, ChartError>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureOptions {
    pub max_charts: usize,
    /// Wait between scrolling a chart into view and rasterizing it.
    pub settle: Duration,
    pub override_key: String,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            max_charts: DEFAULT_MAX_CHARTS,
            settle: DEFAULT_SETTLE,
            override_key: OVERRIDE_KEY.to_string(),
        }
    }
}

impl CaptureOptions {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            max_charts: config.max_captured_charts,
            settle: Duration::from_millis(config.capture_settle_ms),
            override_key: OVERRIDE_KEY.to_string(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CaptureReport {
    pub charts: Vec<CapturedChart>,
    /// Ids of charts whose capture failed.
    pub failed: Vec<String>,
}

impl CaptureReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }
}

/// Captures up to `options.max_charts` visible charts.
///
/// The colour override is held for the whole walk and released on return,
/// including when a capture panics.
pub async fn capture_charts<H: CaptureHost>(host: &H, options: &CaptureOptions) -> CaptureReport {
    let _session = host.overrides().acquire(host, &options.override_key);
    let mut report = CaptureReport::default();

    for chart in host.locate_charts().into_iter().filter(|c| c.visible) {
        if report.charts.len() >= options.max_charts {
            break;
        }
        match capture_one(host, &chart, options.settle).await {
            Ok(image) => report.charts.push(CapturedChart {
                id: chart.id,
                title: chart.title,
                image,
            }),
            Err(e) => {
                tracing::warn!(chart = %chart.id, error = %e, "chart capture failed, skipping");
                report.failed.push(chart.id);
            }
        }
    }

    if report.is_empty() {
        tracing::warn!(
            failed = report.failed.len(),
            "no charts captured; report will contain tables only"
        );
    } else {
        tracing::info!(
            captured = report.charts.len(),
            failed = report.failed.len(),
            "chart capture finished"
        );
    }
    report
}

async fn capture_one<H: CaptureHost>(
    host: &H,
    chart: &ChartHandle,
    settle: Duration,
) -> Result<RasterImage, ChartError> {
    host.scroll_into_view(chart).await?;
    tokio::time::sleep(settle).await;
    let image = host.rasterize(chart).await?;
    if image.width_px == 0 || image.height_px == 0 || image.png.is_empty() {
        return Err(ChartError::EmptyImage {
            chart_id: chart.id.clone(),
            width: image.width_px,
            height: image.height_px,
        });
    }
    Ok(image)
}

#[cfg(test)]
#[path = "capture_test.rs"]
mod tests;
