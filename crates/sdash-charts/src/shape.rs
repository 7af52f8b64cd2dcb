//! Turns normalized posts into the series each chart type draws.

use std::collections::BTreeMap;

use sdash_core::{ChartDatum, Locale, MetricPoint, Post};

/// Buckets kept by "recent trend" views.
pub const RECENT_BUCKETS: usize = 30;

/// Engagement rate (percent) above which a post is high-performing.
pub const HIGH_TIER_THRESHOLD: f64 = 5.0;
/// Engagement rate (percent) above which a post is medium-performing.
pub const MEDIUM_TIER_THRESHOLD: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankMetric {
    Reach,
    Interactions,
}

impl RankMetric {
    #[must_use]
    pub fn of_post(self, post: &Post) -> u64 {
        match self {
            RankMetric::Reach => post.reach,
            RankMetric::Interactions => post.interactions,
        }
    }

    #[must_use]
    pub fn of_point(self, point: &MetricPoint) -> u64 {
        match self {
            RankMetric::Reach => point.reach,
            RankMetric::Interactions => point.interactions,
        }
    }
}

/// One bucket per calendar day of publication, ascending.
#[must_use]
pub fn time_series<'a>(posts: impl IntoIterator<Item = &'a Post>) -> Vec<MetricPoint> {
    let mut buckets: BTreeMap<_, MetricPoint> = BTreeMap::new();
    for post in posts {
        buckets
            .entry(post.date)
            .or_insert_with(|| MetricPoint::empty(post.date))
            .add_post(post);
    }
    buckets.into_values().collect()
}

/// The newest `n` buckets. Older buckets are dropped, not folded in.
#[must_use]
pub fn recent(series: &[MetricPoint], n: usize) -> Vec<MetricPoint> {
    series[series.len().saturating_sub(n)..].to_vec()
}

/// First `n` items by descending `key`; equal keys keep their input order.
#[must_use]
pub fn top_n<T: Clone>(items: &[T], n: usize, key: impl Fn(&T) -> u64) -> Vec<T> {
    let mut ranked: Vec<&T> = items.iter().collect();
    ranked.sort_by(|a, b| key(b).cmp(&key(a)));
    ranked.into_iter().take(n).cloned().collect()
}

#[must_use]
pub fn top_posts(posts: &[Post], metric: RankMetric, n: usize) -> Vec<Post> {
    top_n(posts, n, |p| metric.of_post(p))
}

#[must_use]
pub fn top_days(series: &[MetricPoint], metric: RankMetric, n: usize) -> Vec<MetricPoint> {
    top_n(series, n, |p| metric.of_point(p))
}

/// Rescales raw slice values to percent of their grand total, largest first.
///
/// A zero (or negative) grand total yields all-zero slices.
#[must_use]
pub fn distribution(slices: Vec<ChartDatum>) -> Vec<ChartDatum> {
    let total: f64 = slices.iter().map(|s| s.value.max(0.0)).sum();
    let mut out: Vec<ChartDatum> = slices
        .into_iter()
        .map(|mut s| {
            s.value = if total > 0.0 {
                s.value.max(0.0) / total * 100.0
            } else {
                0.0
            };
            s
        })
        .collect();
    out.sort_by(|a, b| b.value.total_cmp(&a.value));
    out
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TierCounts {
    pub high: u64,
    pub medium: u64,
    pub low: u64,
}

impl TierCounts {
    /// Three bars in fixed order high, medium, low.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_chart_data(self, locale: Locale) -> Vec<ChartDatum> {
        let (high, medium, low) = match locale {
            Locale::Es => ("Alto", "Medio", "Bajo"),
            Locale::En => ("High", "Medium", "Low"),
        };
        vec![
            ChartDatum::new(high, self.high as f64).with_category("high"),
            ChartDatum::new(medium, self.medium as f64).with_category("medium"),
            ChartDatum::new(low, self.low as f64).with_category("low"),
        ]
    }
}

/// Classifies posts by engagement rate: high above 5 %, medium above 2 %,
/// low otherwise.
#[must_use]
pub fn performance_tiers<'a>(posts: impl IntoIterator<Item = &'a Post>) -> TierCounts {
    let mut counts = TierCounts::default();
    for post in posts {
        let rate = post.engagement_rate;
        if rate > HIGH_TIER_THRESHOLD {
            counts.high += 1;
        } else if rate > MEDIUM_TIER_THRESHOLD {
            counts.medium += 1;
        } else {
            counts.low += 1;
        }
    }
    counts
}

/// Short axis label for a bucket date.
#[must_use]
pub fn day_label(point: &MetricPoint, locale: Locale) -> String {
    match locale {
        Locale::Es => point.date.format("%d/%m").to_string(),
        Locale::En => point.date.format("%m/%d").to_string(),
    }
}

#[cfg(test)]
#[path = "shape_test.rs"]
mod tests;
