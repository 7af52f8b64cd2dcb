//! Analytics API access and multi-profile aggregation.
//!
//! [`AnalyticsClient`] talks to the read-only analytics backend;
//! [`aggregate`] fans requests out per profile and folds the results into
//! one report-ready [`Aggregate`].

pub mod aggregate;
pub mod client;
pub mod error;
pub mod normalize;
pub mod source;
pub mod types;

mod retry;

pub use aggregate::{aggregate, previous_period, Aggregate, AggregateRequest};
pub use client::AnalyticsClient;
pub use error::ApiError;
pub use normalize::{normalize_comment, normalize_post};
pub use source::{AnalyticsSource, ScopeQuery};
pub use types::{
    CommentsPage, OverviewStats, PlatformStats, PostsPage, RawComment, RawPost, SentimentStats,
};
