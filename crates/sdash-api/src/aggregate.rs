//! Multi-profile fetch and fold.
//!
//! Every selected profile is a scope. All scopes are fetched concurrently and
//! each data kind is isolated: a failed request contributes nothing and is
//! logged, and only a run where every scope failed is an error.

use std::collections::{HashMap, HashSet};

use chrono::{Days, NaiveDate};
use futures::future::join_all;
use sdash_core::{Comment, Platform, Post, ReachEstimate, SentimentCounts};

use crate::error::ApiError;
use crate::normalize::{normalize_comment, normalize_post};
use crate::source::{AnalyticsSource, ScopeQuery};
use crate::types::{CommentsPage, OverviewStats, PostsPage, SentimentStats};

/// What to fetch.
#[derive(Debug, Clone, Default)]
pub struct AggregateRequest {
    /// Empty means every profile.
    pub profile_ids: Vec<String>,
    pub platform: Option<Platform>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub posts_limit: u32,
    pub include_comments: bool,
    /// Also fetch overview stats for the preceding period of equal length.
    /// Ignored unless both dates are set.
    pub compare_previous: bool,
}

impl AggregateRequest {
    /// One query per distinct profile id, or a single query when zero or one
    /// profile is selected.
    #[must_use]
    pub fn scopes(&self) -> Vec<ScopeQuery> {
        let mut seen = HashSet::new();
        let ids: Vec<&str> = self
            .profile_ids
            .iter()
            .map(|id| id.trim())
            .filter(|id| !id.is_empty() && seen.insert(*id))
            .collect();

        let base = ScopeQuery {
            platform: self.platform,
            profile_id: None,
            date_from: self.date_from,
            date_to: self.date_to,
            limit: self.posts_limit,
        };

        if ids.is_empty() {
            return vec![base];
        }
        ids.into_iter()
            .map(|id| ScopeQuery {
                profile_id: Some(id.to_string()),
                ..base.clone()
            })
            .collect()
    }

    fn previous_window(&self) -> Option<(NaiveDate, NaiveDate)> {
        if !self.compare_previous {
            return None;
        }
        previous_period(self.date_from?, self.date_to?)
    }
}

/// The folded result of all scopes.
#[derive(Debug, Clone, Default)]
pub struct Aggregate {
    pub stats: OverviewStats,
    pub previous_stats: Option<OverviewStats>,
    /// Normalized, de-duplicated by id (last write wins, first position kept).
    pub posts: Vec<Post>,
    /// Summed counts; `None` when no scope returned sentiment.
    pub sentiment: Option<SentimentCounts>,
    pub comments: Vec<Comment>,
    pub scope_count: usize,
    pub failed_scopes: Vec<String>,
}

/// Fetches every scope of `request` concurrently and folds the results.
///
/// # Errors
///
/// Returns [`ApiError::AllScopesFailed`] when every request of every scope
/// failed. Partial failures are logged and skipped.
pub async fn aggregate<S: AnalyticsSource>(
    source: &S,
    request: &AggregateRequest,
    estimate: &ReachEstimate,
) -> Result<Aggregate, ApiError> {
    let scopes = request.scopes();
    let previous_window = request.previous_window();
    let scope_count = scopes.len();

    tracing::info!(
        scopes = scope_count,
        compare_previous = previous_window.is_some(),
        "fetching analytics scopes"
    );

    let fetches = join_all(
        scopes
            .into_iter()
            .map(|query| fetch_scope(source, query, request.include_comments, previous_window)),
    )
    .await;

    let mut fold = Fold::default();
    let mut failed_scopes = Vec::new();
    let mut last_error: Option<String> = None;

    for fetch in fetches {
        let label = fetch.label;
        let mut succeeded = false;

        if let Some(stats) = take(&label, "stats", fetch.stats, &mut last_error) {
            merge_stats(&mut fold.stats, &stats);
            succeeded = true;
        }
        if let Some(page) = take(&label, "posts", fetch.posts, &mut last_error) {
            fold.add_posts(&label, page, estimate);
            succeeded = true;
        }
        if let Some(sentiment) = take(&label, "sentiment", fetch.sentiment, &mut last_error) {
            let counts = sentiment_counts(&sentiment);
            fold.sentiment = Some(fold.sentiment.unwrap_or_default().merge(counts));
            succeeded = true;
        }
        if let Some(result) = fetch.comments {
            if let Some(page) = take(&label, "comments", result, &mut last_error) {
                fold.add_comments(page);
            }
        }
        if let Some(result) = fetch.previous {
            if let Some(previous) = take(&label, "previous_stats", result, &mut last_error) {
                merge_stats(fold.previous.get_or_insert_with(OverviewStats::default), &previous);
            }
        }

        if !succeeded {
            failed_scopes.push(label);
        }
    }

    if failed_scopes.len() == scope_count {
        return Err(ApiError::AllScopesFailed {
            scopes: scope_count,
            last_error: last_error.unwrap_or_else(|| "no response".to_string()),
        });
    }

    tracing::info!(
        scopes = scope_count,
        failed = failed_scopes.len(),
        posts = fold.posts.len(),
        comments = fold.comments.len(),
        "aggregated analytics scopes"
    );

    Ok(Aggregate {
        stats: fold.stats,
        previous_stats: fold.previous,
        posts: fold.posts,
        sentiment: fold.sentiment,
        comments: fold.comments,
        scope_count,
        failed_scopes,
    })
}

/// The period of equal length immediately before `from..=to`.
#[must_use]
pub fn previous_period(from: NaiveDate, to: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    let (from, to) = if to < from { (to, from) } else { (from, to) };
    let days = u64::try_from((to - from).num_days()).ok()?;
    let prev_to = from.checked_sub_days(Days::new(1))?;
    let prev_from = prev_to.checked_sub_days(Days::new(days))?;
    Some((prev_from, prev_to))
}

/// Folds `item` into `acc`.
///
/// Counts add up. The interaction average is re-weighted by post count and
/// is 0 while the combined weight is 0. Platforms merge by key; new ones are
/// appended.
pub(crate) fn merge_stats(acc: &mut OverviewStats, item: &OverviewStats) {
    let old_weight = acc.total_posts;
    let item_weight = item.total_posts;
    let new_weight = old_weight.saturating_add(item_weight);

    let old_avg = finite_or_zero(acc.avg_interactions);
    let item_avg = finite_or_zero(item.avg_interactions);
    #[allow(clippy::cast_precision_loss)]
    let avg = if new_weight == 0 {
        0.0
    } else {
        (old_avg * old_weight as f64 + item_avg * item_weight as f64) / new_weight as f64
    };

    acc.total_posts = new_weight;
    acc.total_interactions = acc
        .total_interactions
        .saturating_add(item.total_interactions);
    acc.total_comments = acc.total_comments.saturating_add(item.total_comments);
    acc.avg_interactions = avg;

    for platform in &item.platforms {
        match acc
            .platforms
            .iter_mut()
            .find(|p| p.platform.eq_ignore_ascii_case(&platform.platform))
        {
            Some(existing) => {
                existing.posts = existing.posts.saturating_add(platform.posts);
                existing.interactions = existing.interactions.saturating_add(platform.interactions);
                existing.comments = existing.comments.saturating_add(platform.comments);
            }
            None => acc.platforms.push(platform.clone()),
        }
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

fn sentiment_counts(stats: &SentimentStats) -> SentimentCounts {
    let classified = stats
        .positive
        .saturating_add(stats.neutral)
        .saturating_add(stats.negative);
    SentimentCounts {
        total: stats.total.max(classified),
        positive: stats.positive,
        neutral: stats.neutral,
        negative: stats.negative,
    }
}

fn take<T>(
    scope: &str,
    kind: &'static str,
    result: Result<T, ApiError>,
    last_error: &mut Option<String>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(
                scope,
                kind,
                error = %e,
                "analytics fetch failed, scope contributes no data"
            );
            *last_error = Some(e.to_string());
            None
        }
    }
}

struct ScopeFetch {
    label: String,
    stats: Result<OverviewStats, ApiError>,
    posts: Result<PostsPage, ApiError>,
    sentiment: Result<SentimentStats, ApiError>,
    comments: Option<Result<CommentsPage, ApiError>>,
    previous: Option<Result<OverviewStats, ApiError>>,
}

async fn fetch_scope<S: AnalyticsSource>(
    source: &S,
    query: ScopeQuery,
    include_comments: bool,
    previous_window: Option<(NaiveDate, NaiveDate)>,
) -> ScopeFetch {
    let previous_query = previous_window.map(|(from, to)| query.with_dates(from, to));

    let comments = async {
        if include_comments {
            Some(source.comments(&query).await)
        } else {
            None
        }
    };
    let previous = async {
        match &previous_query {
            Some(q) => Some(source.overview_stats(q).await),
            None => None,
        }
    };

    let (stats, posts, sentiment, comments, previous) = futures::join!(
        source.overview_stats(&query),
        source.posts(&query),
        source.sentiment_stats(&query),
        comments,
        previous,
    );

    ScopeFetch {
        label: query.label(),
        stats,
        posts,
        sentiment,
        comments,
        previous,
    }
}

#[derive(Default)]
struct Fold {
    stats: OverviewStats,
    previous: Option<OverviewStats>,
    posts: Vec<Post>,
    post_index: HashMap<String, usize>,
    sentiment: Option<SentimentCounts>,
    comments: Vec<Comment>,
    comment_index: HashMap<String, usize>,
}

impl Fold {
    fn add_posts(&mut self, scope: &str, page: PostsPage, estimate: &ReachEstimate) {
        for raw in page.data {
            match normalize_post(raw, estimate) {
                Ok(post) => upsert(&mut self.posts, &mut self.post_index, post.id.clone(), post),
                Err(e) => {
                    tracing::debug!(scope, error = %e, "skipping post that failed normalization");
                }
            }
        }
    }

    fn add_comments(&mut self, page: CommentsPage) {
        for raw in page.data {
            let comment = normalize_comment(raw);
            upsert(
                &mut self.comments,
                &mut self.comment_index,
                comment.id.clone(),
                comment,
            );
        }
    }
}

/// Inserts `item` or replaces the earlier item with the same id in place.
fn upsert<T>(items: &mut Vec<T>, index: &mut HashMap<String, usize>, id: String, item: T) {
    match index.get(&id) {
        Some(&pos) => items[pos] = item,
        None => {
            index.insert(id, items.len());
            items.push(item);
        }
    }
}

#[cfg(test)]
#[path = "aggregate_test.rs"]
mod tests;
