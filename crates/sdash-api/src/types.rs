//! Analytics API response types.
//!
//! These model the JSON the backend returns. Fields are lenient: counts
//! default to zero, and post ids may arrive as strings or numbers.

use serde::{de::Error as _, Deserialize, Deserializer};

// ---------------------------------------------------------------------------
// getOverviewStats
// ---------------------------------------------------------------------------

/// Headline totals for one scope (all profiles, or a single profile).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OverviewStats {
    #[serde(default)]
    pub total_posts: u64,
    #[serde(default)]
    pub total_interactions: u64,
    #[serde(default)]
    pub total_comments: u64,
    /// Mean interactions per post within the scope.
    #[serde(default)]
    pub avg_interactions: f64,
    #[serde(default)]
    pub platforms: Vec<PlatformStats>,
}

/// Per-platform slice of [`OverviewStats`]. The platform stays a string so
/// that values unknown to this crate still merge by key.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PlatformStats {
    pub platform: String,
    #[serde(default)]
    pub posts: u64,
    #[serde(default)]
    pub interactions: u64,
    #[serde(default)]
    pub comments: u64,
}

// ---------------------------------------------------------------------------
// getPosts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostsPage {
    #[serde(default)]
    pub data: Vec<RawPost>,
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPost {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub platform: String,
    /// Publish timestamp: a plain date, an RFC 3339 timestamp, or
    /// `YYYY-MM-DD HH:MM:SS`.
    #[serde(alias = "date", alias = "created_time", alias = "created_at")]
    pub published_at: String,
    #[serde(default, alias = "message", alias = "text")]
    pub caption: Option<String>,
    #[serde(default)]
    pub likes: Option<u64>,
    #[serde(default)]
    pub comments: Option<u64>,
    #[serde(default)]
    pub shares: Option<u64>,
    #[serde(default)]
    pub saves: Option<u64>,
    #[serde(default)]
    pub interactions: Option<u64>,
    #[serde(default)]
    pub reach: Option<u64>,
    #[serde(default)]
    pub impressions: Option<u64>,
    #[serde(default)]
    pub sentiment_score: Option<f64>,
}

// ---------------------------------------------------------------------------
// getSentimentStats
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SentimentStats {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub positive: u64,
    #[serde(default)]
    pub negative: u64,
    #[serde(default)]
    pub neutral: u64,
    /// Server-side percentages. Never merged; recomputed from counts.
    #[serde(default)]
    pub percentages: Option<SentimentPercentages>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SentimentPercentages {
    #[serde(default)]
    pub positive: f64,
    #[serde(default)]
    pub negative: f64,
    #[serde(default)]
    pub neutral: f64,
}

// ---------------------------------------------------------------------------
// getComments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentsPage {
    #[serde(default)]
    pub data: Vec<RawComment>,
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawComment {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub post_id: Option<String>,
    #[serde(default, alias = "message", alias = "content")]
    pub text: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!(
            "expected a string or numeric id, got {other}"
        ))),
    }
}

fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::String(s) => Ok(Some(s)),
        serde_json::Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(D::Error::custom(format!(
            "expected a string or numeric id, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_post_accepts_numeric_id_and_aliases() {
        let post: RawPost = serde_json::from_value(serde_json::json!({
            "id": 42,
            "platform": "instagram",
            "date": "2025-01-02T10:00:00Z",
            "message": "hola",
            "likes": 3
        }))
        .unwrap();
        assert_eq!(post.id, "42");
        assert_eq!(post.published_at, "2025-01-02T10:00:00Z");
        assert_eq!(post.caption.as_deref(), Some("hola"));
        assert_eq!(post.likes, Some(3));
        assert!(post.reach.is_none());
    }

    #[test]
    fn raw_post_rejects_object_id() {
        let result = serde_json::from_value::<RawPost>(serde_json::json!({
            "id": {"nested": true},
            "platform": "facebook",
            "published_at": "2025-01-02"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn overview_stats_defaults_missing_fields() {
        let stats: OverviewStats = serde_json::from_value(serde_json::json!({
            "total_posts": 4
        }))
        .unwrap();
        assert_eq!(stats.total_posts, 4);
        assert_eq!(stats.total_interactions, 0);
        assert!(stats.platforms.is_empty());
    }

    #[test]
    fn raw_comment_accepts_null_post_id() {
        let comment: RawComment = serde_json::from_value(serde_json::json!({
            "id": "c1",
            "post_id": null,
            "text": "great"
        }))
        .unwrap();
        assert!(comment.post_id.is_none());
    }
}
