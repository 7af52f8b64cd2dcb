//! Retry with exponential back-off and jitter for the analytics client.
//!
//! Only transport failures and 5xx/429 statuses are retried. Everything else
//! is returned on the first attempt.

use std::future::Future;
use std::time::Duration;

use crate::error::ApiError;

const MAX_DELAY_MS: u64 = 30_000;

/// Whether `err` is transient: a timeout, a refused connection, a rate limit
/// or a server-side failure.
pub(crate) fn is_retriable(err: &ApiError) -> bool {
    match err {
        ApiError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        ApiError::UnexpectedStatus { status, .. } => *status == 429 || *status >= 500,
        ApiError::Deserialize { .. }
        | ApiError::InvalidBaseUrl { .. }
        | ApiError::Normalization { .. }
        | ApiError::AllScopesFailed { .. } => false,
    }
}

/// Delay before retry number `retry` (1-based), before jitter:
/// `base_ms × 2^(retry-1)`, capped at 30 s.
pub(crate) fn backoff_ms(retry: u32, base_ms: u64) -> u64 {
    let exponent = retry.saturating_sub(1).min(10);
    base_ms.saturating_mul(1u64 << exponent).min(MAX_DELAY_MS)
}

/// Scales `delay_ms` by a random factor in `[0.75, 1.25)`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn jittered(delay_ms: u64) -> u64 {
    (delay_ms as f64 * (0.75 + rand::random::<f64>() * 0.5)) as u64
}

/// Runs `operation`, retrying transient failures up to `max_retries` times.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let mut retry = 0u32;
    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if retry >= max_retries || !is_retriable(&err) {
            return Err(err);
        }

        retry += 1;
        let delay_ms = jittered(backoff_ms(retry, backoff_base_ms));
        tracing::warn!(
            retry,
            max_retries,
            delay_ms,
            error = %err,
            "transient analytics API error, backing off"
        );
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }
}
