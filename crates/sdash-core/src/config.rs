use crate::app_config::AppConfig;
use crate::format::Locale;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can feed a `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let api_base_url = require("SDASH_API_BASE_URL")?;
    if !(api_base_url.starts_with("http://") || api_base_url.starts_with("https://")) {
        return Err(ConfigError::InvalidEnvVar {
            var: "SDASH_API_BASE_URL".to_string(),
            reason: format!("expected an http(s) URL, got '{api_base_url}'"),
        });
    }

    let log_level = or_default("SDASH_LOG_LEVEL", "info");
    let locale = or_default("SDASH_LOCALE", "es")
        .parse::<Locale>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: "SDASH_LOCALE".to_string(),
            reason: e.to_string(),
        })?;

    let api_timeout_secs = match parse_u64("SDASH_API_TIMEOUT_SECS", "0")? {
        0 => None,
        secs => Some(secs),
    };
    let api_user_agent = or_default("SDASH_API_USER_AGENT", "sdash/0.1 (report-export)");
    let api_max_retries = parse_u32("SDASH_API_MAX_RETRIES", "2")?;
    let api_retry_backoff_base_ms = parse_u64("SDASH_API_RETRY_BACKOFF_BASE_MS", "500")?;
    let posts_limit = parse_u32("SDASH_POSTS_LIMIT", "500")?;
    let output_dir = PathBuf::from(or_default("SDASH_OUTPUT_DIR", "."));
    let capture_settle_ms = parse_u64("SDASH_CAPTURE_SETTLE_MS", "400")?;
    let max_captured_charts = parse_usize("SDASH_MAX_CAPTURED_CHARTS", "8")?;

    Ok(AppConfig {
        api_base_url,
        log_level,
        locale,
        api_timeout_secs,
        api_user_agent,
        api_max_retries,
        api_retry_backoff_base_ms,
        posts_limit,
        output_dir,
        capture_settle_ms,
        max_captured_charts,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
