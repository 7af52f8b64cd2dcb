//! Normalization from raw API shapes to [`sdash_core::Post`] and
//! [`sdash_core::Comment`].

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use sdash_core::{engagement_rate, Comment, Platform, Post, ReachEstimate};

use crate::error::ApiError;
use crate::types::{RawComment, RawPost};

const NEUTRAL_SENTIMENT: f64 = 0.5;

/// Normalizes a raw API post.
///
/// Interactions fall back to `likes + comments + shares` when the API does
/// not report them; reach and impressions fall back to `estimate`.
///
/// # Errors
///
/// Returns [`ApiError::Normalization`] if the platform is unknown or the
/// publish date cannot be parsed.
pub fn normalize_post(raw: RawPost, estimate: &ReachEstimate) -> Result<Post, ApiError> {
    let platform = raw
        .platform
        .parse::<Platform>()
        .map_err(|e| ApiError::Normalization {
            post_id: raw.id.clone(),
            reason: e.to_string(),
        })?;

    let date = parse_day(&raw.published_at).ok_or_else(|| ApiError::Normalization {
        post_id: raw.id.clone(),
        reason: format!("unparseable publish date '{}'", raw.published_at),
    })?;

    let likes = raw.likes.unwrap_or(0);
    let comments = raw.comments.unwrap_or(0);
    let interactions = raw
        .interactions
        .unwrap_or_else(|| {
            likes
                .saturating_add(comments)
                .saturating_add(raw.shares.unwrap_or(0))
        });

    let reach = estimate.reach(raw.reach, interactions);
    let impressions = estimate.impressions(raw.impressions, reach);

    Ok(Post {
        id: raw.id,
        platform,
        date,
        caption: raw.caption.unwrap_or_default().trim().to_string(),
        reach,
        impressions,
        interactions,
        likes,
        comments,
        shares: raw.shares,
        saves: raw.saves,
        sentiment_score: normalize_sentiment(raw.sentiment_score),
        engagement_rate: engagement_rate(interactions, reach),
    })
}

#[must_use]
pub fn normalize_comment(raw: RawComment) -> Comment {
    Comment {
        id: raw.id,
        post_id: raw.post_id,
        text: raw.text,
        created_at: raw.created_at.as_deref().and_then(parse_day),
    }
}

/// Extracts the calendar day from a publish timestamp.
///
/// Timestamps with an offset keep the day in that offset, so a post
/// published at 23:30 local time stays on its local day.
pub(crate) fn parse_day(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z") {
        return Some(dt.date_naive());
    }
    None
}

/// Maps an API sentiment score onto `[0, 1]`.
///
/// Negative scores are read as the `[-1, 1]` scale, scores above 1 as
/// percentages. Missing or non-finite scores are neutral.
fn normalize_sentiment(score: Option<f64>) -> f64 {
    match score {
        Some(s) if s.is_finite() => {
            let mapped = if s < 0.0 {
                (s + 1.0) / 2.0
            } else if s > 1.0 {
                s / 100.0
            } else {
                s
            };
            mapped.clamp(0.0, 1.0)
        }
        _ => NEUTRAL_SENTIMENT,
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
