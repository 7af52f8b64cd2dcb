//! Chart shaping and drawing for dashboard reports.
//!
//! - [`shape`] and [`keywords`] turn posts and comments into chart rows.
//! - [`render`] draws line, bar and donut charts onto any [`Canvas`].
//! - [`capture`] is the raster fallback: it collects chart images from a
//!   [`capture::CaptureHost`] under a scoped colour override.

pub mod canvas;
pub mod capture;
pub mod color;
pub mod error;
pub mod hints;
pub mod keywords;
pub mod render;
pub mod shape;

pub use canvas::{Canvas, DrawOp, Point, Rect, RecordingCanvas, TextAlign, TextStyle};
pub use capture::{
    capture_charts, CaptureHost, CaptureOptions, CaptureReport, CapturedChart, OffscreenHost,
    RasterImage,
};
pub use color::{ColorSpec, Rgb};
pub use error::ChartError;
pub use keywords::{extract_keywords, match_topics, KeywordCount, TopicCount};
pub use render::{render_chart, ChartStyle};
pub use shape::{
    distribution, performance_tiers, recent, time_series, top_days, top_posts, RankMetric,
    TierCounts,
};
