//! Report-ready metric types shared by the aggregator, the chart shaper and
//! both report builders.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Social platforms the analytics API reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Facebook,
    Instagram,
    Tiktok,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Facebook, Platform::Instagram, Platform::Tiktok];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Facebook => "facebook",
            Platform::Instagram => "instagram",
            Platform::Tiktok => "tiktok",
        }
    }

    /// Display label used in report tables and chart legends.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Platform::Facebook => "Facebook",
            Platform::Instagram => "Instagram",
            Platform::Tiktok => "TikTok",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "facebook" | "fb" => Ok(Platform::Facebook),
            "instagram" | "ig" => Ok(Platform::Instagram),
            "tiktok" => Ok(Platform::Tiktok),
            other => Err(CoreError::UnknownPlatform(other.to_string())),
        }
    }
}

/// One calendar-day bucket of post metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricPoint {
    pub date: NaiveDate,
    pub reach: u64,
    pub impressions: u64,
    pub interactions: u64,
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
}

impl MetricPoint {
    #[must_use]
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            reach: 0,
            impressions: 0,
            interactions: 0,
            likes: 0,
            comments: 0,
            shares: 0,
        }
    }

    pub fn add_post(&mut self, post: &Post) {
        self.reach = self.reach.saturating_add(post.reach);
        self.impressions = self.impressions.saturating_add(post.impressions);
        self.interactions = self.interactions.saturating_add(post.interactions);
        self.likes = self.likes.saturating_add(post.likes);
        self.comments = self.comments.saturating_add(post.comments);
        self.shares = self.shares.saturating_add(post.shares.unwrap_or(0));
    }
}

/// Per-platform totals plus the daily trend behind them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformMetrics {
    pub platform: Platform,
    pub reach: u64,
    pub impressions: u64,
    pub interactions: u64,
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
    /// Always derived from the summed totals, never summed itself.
    pub engagement_rate: f64,
    pub trend: Vec<MetricPoint>,
}

/// A post after normalization from the raw API shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub platform: Platform,
    pub date: NaiveDate,
    pub caption: String,
    pub reach: u64,
    pub impressions: u64,
    pub interactions: u64,
    pub likes: u64,
    pub comments: u64,
    pub shares: Option<u64>,
    pub saves: Option<u64>,
    /// Normalized to `[0, 1]`; 0.5 is neutral.
    pub sentiment_score: f64,
    pub engagement_rate: f64,
}

/// A comment used for keyword and topic extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub post_id: Option<String>,
    pub text: String,
    pub created_at: Option<NaiveDate>,
}

/// Raw sentiment class counts as returned by the API.
///
/// Counts are what gets merged across profiles; percentages are always
/// recomputed from the merged counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentCounts {
    pub total: u64,
    pub positive: u64,
    pub neutral: u64,
    pub negative: u64,
}

impl SentimentCounts {
    #[must_use]
    pub fn merge(self, other: SentimentCounts) -> SentimentCounts {
        SentimentCounts {
            total: self.total.saturating_add(other.total),
            positive: self.positive.saturating_add(other.positive),
            neutral: self.neutral.saturating_add(other.neutral),
            negative: self.negative.saturating_add(other.negative),
        }
    }

    #[must_use]
    pub fn distribution(self) -> SentimentDistribution {
        SentimentDistribution::from_counts(self)
    }
}

/// Sentiment class shares in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentDistribution {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
    pub total: u64,
}

impl SentimentDistribution {
    /// Converts counts to percentages. A zero total yields an all-zero
    /// distribution.
    #[must_use]
    pub fn from_counts(counts: SentimentCounts) -> Self {
        if counts.total == 0 {
            return Self {
                positive: 0.0,
                neutral: 0.0,
                negative: 0.0,
                total: 0,
            };
        }
        #[allow(clippy::cast_precision_loss)]
        let pct = |n: u64| n as f64 / counts.total as f64 * 100.0;
        Self {
            positive: pct(counts.positive),
            neutral: pct(counts.neutral),
            negative: pct(counts.negative),
            total: counts.total,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KpiFormat {
    Number,
    Percentage,
    Currency,
}

/// A headline number with its period-over-period change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiData {
    pub label: String,
    pub value: f64,
    pub previous_value: f64,
    pub change: f64,
    pub change_type: ChangeType,
    pub format: KpiFormat,
}

impl KpiData {
    /// Builds a KPI and derives `change` and `change_type` from the two values.
    ///
    /// With no previous value the change is 100 when the current value is
    /// positive and 0 otherwise.
    #[must_use]
    pub fn new(label: impl Into<String>, value: f64, previous_value: f64, format: KpiFormat) -> Self {
        let change = if previous_value > 0.0 {
            (value - previous_value) / previous_value * 100.0
        } else if value > 0.0 {
            100.0
        } else {
            0.0
        };
        let change_type = if change > 0.0 {
            ChangeType::Positive
        } else if change < 0.0 {
            ChangeType::Negative
        } else {
            ChangeType::Neutral
        };
        Self {
            label: label.into(),
            value,
            previous_value,
            change,
            change_type,
            format,
        }
    }
}

/// `interactions / reach * 100`, or 0 when reach is 0.
#[must_use]
pub fn engagement_rate(interactions: u64, reach: u64) -> f64 {
    if reach == 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let rate = interactions as f64 / reach as f64 * 100.0;
    rate
}
