use std::path::PathBuf;

use crate::format::Locale;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub log_level: String,
    pub locale: Locale,
    /// `None` leaves the transport default (no overall timeout).
    pub api_timeout_secs: Option<u64>,
    pub api_user_agent: String,
    pub api_max_retries: u32,
    pub api_retry_backoff_base_ms: u64,
    pub posts_limit: u32,
    pub output_dir: PathBuf,
    pub capture_settle_ms: u64,
    pub max_captured_charts: usize,
}
