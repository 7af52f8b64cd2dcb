use std::path::PathBuf;

use sdash_api::ApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("fetch failed: {0}")]
    Api(#[from] ApiError),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("workbook error: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    #[error("image error: {0}")]
    Image(String),

    #[error("sheet {sheet} has too many rows: {rows}")]
    TooManyRows { sheet: String, rows: usize },

    #[error("no charts to draw with the {strategy} strategy")]
    NoCharts { strategy: &'static str },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("an export is already in progress")]
    Busy,
}

impl ReportError {
    /// Short, user-facing reason for a failed export.
    #[must_use]
    pub fn short_reason(&self) -> &'static str {
        match self {
            ReportError::Api(_) => "could not fetch dashboard data",
            ReportError::Busy => "an export is already in progress",
            ReportError::Io { .. } => "could not save report file",
            ReportError::Pdf(_)
            | ReportError::Workbook(_)
            | ReportError::Image(_)
            | ReportError::TooManyRows { .. }
            | ReportError::NoCharts { .. } => "could not generate report",
        }
    }
}
