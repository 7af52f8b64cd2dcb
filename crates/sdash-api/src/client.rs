//! HTTP client for the analytics REST API.
//!
//! Wraps `reqwest` with typed response deserialization, status handling and
//! retry on transient failures. Endpoints are resolved relative to a base URL
//! so tests can point the client at a mock server.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::retry::retry_with_backoff;
use crate::source::{AnalyticsSource, ScopeQuery};
use crate::types::{CommentsPage, OverviewStats, PostsPage, SentimentStats};

const OVERVIEW_PATH: &str = "stats/overview";
const POSTS_PATH: &str = "posts";
const SENTIMENT_PATH: &str = "sentiment/stats";
const COMMENTS_PATH: &str = "comments";

/// Client for the analytics REST API.
pub struct AnalyticsClient {
    client: Client,
    base_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl AnalyticsClient {
    /// Creates a client from application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the `reqwest::Client` cannot be built, or
    /// [`ApiError::InvalidBaseUrl`] if the configured base URL does not parse.
    pub fn from_config(config: &sdash_core::AppConfig) -> Result<Self, ApiError> {
        Self::with_base_url(
            &config.api_base_url,
            config.api_timeout_secs,
            &config.api_user_agent,
            config.api_max_retries,
            config.api_retry_backoff_base_ms,
        )
    }

    /// Creates a client with an explicit base URL (production or wiremock).
    ///
    /// `timeout_secs = None` keeps the transport default: no overall request
    /// timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the underlying client cannot be
    /// constructed, or [`ApiError::InvalidBaseUrl`] if `base_url` is not a
    /// valid URL.
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: Option<u64>,
        user_agent: &str,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, ApiError> {
        let mut builder = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent);
        if let Some(secs) = timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        // A trailing slash makes `Url::join` append to the path instead of
        // replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| ApiError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url: parsed,
            max_retries,
            backoff_base_ms,
        })
    }

    /// Fetches headline totals for a scope.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Http`] on network failure after retries.
    /// - [`ApiError::UnexpectedStatus`] on a non-2xx status.
    /// - [`ApiError::Deserialize`] if the body does not match [`OverviewStats`].
    pub async fn get_overview_stats(&self, query: &ScopeQuery) -> Result<OverviewStats, ApiError> {
        let url = self.build_url(OVERVIEW_PATH, &Self::filter_pairs(query, true, false))?;
        self.request_json(url, &format!("getOverviewStats({})", query.label()))
            .await
    }

    /// Fetches one page of posts (up to `query.limit`).
    ///
    /// # Errors
    ///
    /// Same as [`AnalyticsClient::get_overview_stats`].
    pub async fn get_posts(&self, query: &ScopeQuery) -> Result<PostsPage, ApiError> {
        let url = self.build_url(POSTS_PATH, &Self::filter_pairs(query, true, true))?;
        self.request_json(url, &format!("getPosts({})", query.label()))
            .await
    }

    /// Fetches sentiment class counts. Date filters are not sent.
    ///
    /// # Errors
    ///
    /// Same as [`AnalyticsClient::get_overview_stats`].
    pub async fn get_sentiment_stats(
        &self,
        query: &ScopeQuery,
    ) -> Result<SentimentStats, ApiError> {
        let url = self.build_url(SENTIMENT_PATH, &Self::filter_pairs(query, false, false))?;
        self.request_json(url, &format!("getSentimentStats({})", query.label()))
            .await
    }

    /// Fetches one page of comments (up to `query.limit`).
    ///
    /// # Errors
    ///
    /// Same as [`AnalyticsClient::get_overview_stats`].
    pub async fn get_comments(&self, query: &ScopeQuery) -> Result<CommentsPage, ApiError> {
        let url = self.build_url(COMMENTS_PATH, &Self::filter_pairs(query, true, true))?;
        self.request_json(url, &format!("getComments({})", query.label()))
            .await
    }

    fn filter_pairs(query: &ScopeQuery, with_dates: bool, with_limit: bool) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(platform) = query.platform {
            pairs.push(("platform", platform.as_str().to_string()));
        }
        if let Some(profile_id) = &query.profile_id {
            pairs.push(("profile_id", profile_id.clone()));
        }
        if with_dates {
            if let Some(from) = query.date_from {
                pairs.push(("date_from", from.format("%Y-%m-%d").to_string()));
            }
            if let Some(to) = query.date_to {
                pairs.push(("date_to", to.format("%Y-%m-%d").to_string()));
            }
        }
        if with_limit {
            pairs.push(("limit", query.limit.to_string()));
        }
        pairs
    }

    /// Resolves `path` against the base URL and appends percent-encoded
    /// query parameters.
    fn build_url(&self, path: &str, params: &[(&str, String)]) -> Result<Url, ApiError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| ApiError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: format!("cannot join '{path}': {e}"),
            })?;
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    /// Sends a GET request with retry, asserts a 2xx status and parses the
    /// body as `T`.
    async fn request_json<T: DeserializeOwned>(&self, url: Url, context: &str) -> Result<T, ApiError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.clone();
            async move {
                let response = self.client.get(url.clone()).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(ApiError::UnexpectedStatus {
                        status: status.as_u16(),
                        url: url.to_string(),
                    });
                }
                let body = response.text().await?;
                serde_json::from_str(&body).map_err(|e| ApiError::Deserialize {
                    context: context.to_owned(),
                    source: e,
                })
            }
        })
        .await
    }
}

impl AnalyticsSource for AnalyticsClient {
    async fn overview_stats(&self, query: &ScopeQuery) -> Result<OverviewStats, ApiError> {
        self.get_overview_stats(query).await
    }

    async fn posts(&self, query: &ScopeQuery) -> Result<PostsPage, ApiError> {
        self.get_posts(query).await
    }

    async fn sentiment_stats(&self, query: &ScopeQuery) -> Result<SentimentStats, ApiError> {
        self.get_sentiment_stats(query).await
    }

    async fn comments(&self, query: &ScopeQuery) -> Result<CommentsPage, ApiError> {
        self.get_comments(query).await
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
