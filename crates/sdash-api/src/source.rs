//! The seam between the aggregator and wherever analytics data comes from.

use std::future::Future;

use chrono::NaiveDate;
use sdash_core::Platform;

use crate::error::ApiError;
use crate::types::{CommentsPage, OverviewStats, PostsPage, SentimentStats};

/// Filter parameters for one fetch scope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeQuery {
    pub platform: Option<Platform>,
    /// `None` means every profile the backend knows about.
    pub profile_id: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub limit: u32,
}

impl ScopeQuery {
    /// Short label for logs and failure lists.
    #[must_use]
    pub fn label(&self) -> String {
        match &self.profile_id {
            Some(id) => format!("profile:{id}"),
            None => "all-profiles".to_string(),
        }
    }

    /// Same scope with a different date window.
    #[must_use]
    pub fn with_dates(&self, date_from: NaiveDate, date_to: NaiveDate) -> Self {
        Self {
            date_from: Some(date_from),
            date_to: Some(date_to),
            ..self.clone()
        }
    }
}

/// Read-only analytics backend.
///
/// Implemented by [`crate::AnalyticsClient`] over HTTP; tests use in-memory
/// fakes.
pub trait AnalyticsSource: Sync {
    fn overview_stats(
        &self,
        query: &ScopeQuery,
    ) -> impl Future<Output = Result<OverviewStats, ApiError>> + Send;

    fn posts(&self, query: &ScopeQuery) -> impl Future<Output = Result<PostsPage, ApiError>> + Send;

    /// Sentiment is filtered by platform and profile only; date filters are
    /// not part of this call.
    fn sentiment_stats(
        &self,
        query: &ScopeQuery,
    ) -> impl Future<Output = Result<SentimentStats, ApiError>> + Send;

    fn comments(
        &self,
        query: &ScopeQuery,
    ) -> impl Future<Output = Result<CommentsPage, ApiError>> + Send;
}
