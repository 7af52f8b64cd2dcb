//! Core domain types for the social dashboard report pipeline.
//!
//! Everything here is ephemeral: rebuilt on each export from freshly fetched
//! API data and never persisted.

pub mod app_config;
pub mod config;
pub mod estimate;
pub mod export;
pub mod format;
pub mod metrics;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use estimate::ReachEstimate;
pub use export::{ChartDatum, ChartKind, ChartSpec, ExportData};
pub use format::{
    format_compact, format_kpi_value, format_number, format_percent, truncate_with_ellipsis, Locale,
};
pub use metrics::{
    engagement_rate, ChangeType, Comment, KpiData, KpiFormat, MetricPoint, Platform,
    PlatformMetrics, Post, SentimentCounts, SentimentDistribution,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown platform: {0}")]
    UnknownPlatform(String),

    #[error("unknown locale: {0}")]
    UnknownLocale(String),
}
