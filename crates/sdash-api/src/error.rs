use thiserror::Error;

/// Errors returned by the analytics API client and the aggregator.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{base_url}': {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error("normalization error for post {post_id}: {reason}")]
    Normalization { post_id: String, reason: String },

    /// Every requested scope failed; there is nothing to report on.
    #[error("all {scopes} data sources failed; last error: {last_error}")]
    AllScopesFailed { scopes: usize, last_error: String },
}
