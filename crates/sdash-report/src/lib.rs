//! Dashboard report generation.
//!
//! [`build_export_data`] shapes an aggregate into a format-neutral
//! [`sdash_core::ExportData`]; [`render_pdf`] and [`render_workbook`] turn that
//! into document bytes. [`run_export`] drives one whole export behind a
//! [`BusyFlag`] and reports progress as it goes.

pub mod build;
pub mod error;
pub mod export;
pub mod labels;
pub mod pdf;
pub mod surface;
pub mod xlsx;

pub use build::{build_export_data, date_range_label, platform_metrics, ReportMeta};
pub use error::ReportError;
pub use export::{
    artifact_file_name, run_export, run_export_with_host, write_artifact, Artifact, BusyFlag,
    BusyGuard, ExportFormat, ExportRequest, LogProgress, Progress, ProgressSink,
};
pub use pdf::{render_pdf, ChartMode, Orientation, PdfOptions};
pub use surface::{RecordingSurface, ReportSurface};
pub use xlsx::render_workbook;
