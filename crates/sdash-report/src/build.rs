//! Turns an [`Aggregate`] into the [`ExportData`] both builders consume.

use chrono::{DateTime, NaiveDate, Utc};
use sdash_api::Aggregate;
use sdash_charts::keywords::{extract_keywords, match_topics};
use sdash_charts::shape::{
    day_label, distribution, performance_tiers, recent, time_series, top_days, top_posts,
    RankMetric, RECENT_BUCKETS,
};
use sdash_core::{
    engagement_rate, truncate_with_ellipsis, ChartDatum, ChartKind, ChartSpec, ExportData,
    KpiData, KpiFormat, Locale, Platform, PlatformMetrics, Post, SentimentDistribution,
};

use crate::labels::{labels, Labels};

pub const TOP_DAYS: usize = 7;
pub const TOP_POSTS_CHART: usize = 5;
const POST_LABEL_CHARS: usize = 18;

/// Report metadata that does not come from the API.
#[derive(Debug, Clone)]
pub struct ReportMeta {
    pub title: Option<String>,
    pub date_range: Option<String>,
    pub source: Option<String>,
    pub generated_at: DateTime<Utc>,
    pub locale: Locale,
}

impl ReportMeta {
    #[must_use]
    pub fn new(generated_at: DateTime<Utc>, locale: Locale) -> Self {
        Self {
            title: None,
            date_range: None,
            source: None,
            generated_at,
            locale,
        }
    }
}

/// Caption for the selected dates, or `None` when no bound is set.
#[must_use]
pub fn date_range_label(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    locale: Locale,
) -> Option<String> {
    let fmt = match locale {
        Locale::Es => "%d/%m/%Y",
        Locale::En => "%m/%d/%Y",
    };
    let l = labels(locale);
    match (from, to) {
        (Some(from), Some(to)) => Some(format!("{} - {}", from.format(fmt), to.format(fmt))),
        (Some(from), None) => Some(format!("{} {}", l.from, from.format(fmt))),
        (None, Some(to)) => Some(format!("{} {}", l.until, to.format(fmt))),
        (None, None) => None,
    }
}

/// Builds the report input.
///
/// Posts are ordered by interactions, highest first. Sections with nothing
/// to show are left empty so both builders omit them.
#[must_use]
pub fn build_export_data(aggregate: &Aggregate, meta: ReportMeta) -> ExportData {
    let l = labels(meta.locale);
    let title = meta.title.unwrap_or_else(|| l.default_title.to_string());
    let mut data = ExportData::empty(title, meta.generated_at, meta.locale);
    data.date_range = meta.date_range;
    data.source = meta.source;

    data.posts = top_posts(
        &aggregate.posts,
        RankMetric::Interactions,
        aggregate.posts.len(),
    );
    data.kpis = kpis(aggregate, l);
    data.platforms = platform_metrics(&aggregate.posts);
    data.sentiment = aggregate
        .sentiment
        .filter(|counts| counts.total > 0)
        .map(SentimentDistribution::from_counts);
    data.charts = chart_set(aggregate, &data, l);

    tracing::debug!(
        posts = data.posts.len(),
        platforms = data.platforms.len(),
        charts = data.charts.len(),
        "export data built"
    );
    data
}

#[allow(clippy::cast_precision_loss)]
fn kpis(aggregate: &Aggregate, l: &Labels) -> Vec<KpiData> {
    let stats = &aggregate.stats;
    if stats.total_posts == 0 && aggregate.posts.is_empty() {
        return Vec::new();
    }
    let previous = aggregate.previous_stats.clone().unwrap_or_default();

    let (interactions, reach) = aggregate
        .posts
        .iter()
        .fold((0_u64, 0_u64), |(i, r), p| (i + p.interactions, r + p.reach));

    vec![
        KpiData::new(
            l.kpi_posts,
            stats.total_posts as f64,
            previous.total_posts as f64,
            KpiFormat::Number,
        ),
        KpiData::new(
            l.kpi_interactions,
            stats.total_interactions as f64,
            previous.total_interactions as f64,
            KpiFormat::Number,
        ),
        KpiData::new(
            l.kpi_comments,
            stats.total_comments as f64,
            previous.total_comments as f64,
            KpiFormat::Number,
        ),
        KpiData::new(
            l.kpi_avg_interactions,
            round2(stats.avg_interactions),
            round2(previous.avg_interactions),
            KpiFormat::Number,
        ),
        KpiData::new(
            l.kpi_engagement,
            engagement_rate(interactions, reach),
            0.0,
            KpiFormat::Percentage,
        ),
    ]
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Per-platform sums over the normalized posts, in fixed platform order.
/// Engagement is recomputed from the sums.
#[must_use]
pub fn platform_metrics(posts: &[Post]) -> Vec<PlatformMetrics> {
    Platform::ALL
        .into_iter()
        .filter_map(|platform| {
            let own: Vec<&Post> = posts.iter().filter(|p| p.platform == platform).collect();
            if own.is_empty() {
                return None;
            }
            let mut metrics = PlatformMetrics {
                platform,
                reach: 0,
                impressions: 0,
                interactions: 0,
                likes: 0,
                comments: 0,
                shares: 0,
                engagement_rate: 0.0,
                trend: time_series(own.iter().copied()),
            };
            for post in &own {
                metrics.reach = metrics.reach.saturating_add(post.reach);
                metrics.impressions = metrics.impressions.saturating_add(post.impressions);
                metrics.interactions = metrics.interactions.saturating_add(post.interactions);
                metrics.likes = metrics.likes.saturating_add(post.likes);
                metrics.comments = metrics.comments.saturating_add(post.comments);
                metrics.shares = metrics.shares.saturating_add(post.shares.unwrap_or(0));
            }
            metrics.engagement_rate = engagement_rate(metrics.interactions, metrics.reach);
            Some(metrics)
        })
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn chart_set(aggregate: &Aggregate, data: &ExportData, l: &Labels) -> Vec<ChartSpec> {
    let locale = data.locale;
    let series = time_series(&aggregate.posts);
    let mut charts = Vec::new();

    charts.push(ChartSpec {
        id: "recent-interactions".into(),
        title: l.chart_recent.into(),
        kind: ChartKind::Line,
        x_label: l.axis_date.into(),
        data: recent(&series, RECENT_BUCKETS)
            .iter()
            .map(|p| ChartDatum::new(day_label(p, locale), p.interactions as f64))
            .collect(),
    });

    charts.push(ChartSpec {
        id: "top-days".into(),
        title: l.chart_top_days.into(),
        kind: ChartKind::Bar,
        x_label: l.axis_day.into(),
        data: top_days(&series, RankMetric::Interactions, TOP_DAYS)
            .iter()
            .map(|p| ChartDatum::new(day_label(p, locale), p.interactions as f64))
            .collect(),
    });

    charts.push(ChartSpec {
        id: "platform-share".into(),
        title: l.chart_platform_share.into(),
        kind: ChartKind::Donut,
        x_label: String::new(),
        data: distribution(
            data.platforms
                .iter()
                .map(|m| {
                    ChartDatum::new(m.platform.label(), m.interactions as f64)
                        .with_category(m.platform.as_str())
                })
                .collect(),
        ),
    });

    if let Some(sentiment) = &data.sentiment {
        charts.push(ChartSpec {
            id: "sentiment".into(),
            title: l.chart_sentiment.into(),
            kind: ChartKind::Donut,
            x_label: String::new(),
            data: distribution(vec![
                ChartDatum::new(l.positive, sentiment.positive).with_category("positive"),
                ChartDatum::new(l.neutral, sentiment.neutral).with_category("neutral"),
                ChartDatum::new(l.negative, sentiment.negative).with_category("negative"),
            ]),
        });
    }

    charts.push(ChartSpec {
        id: "performance-tiers".into(),
        title: l.chart_tiers.into(),
        kind: ChartKind::Bar,
        x_label: l.axis_tier.into(),
        data: performance_tiers(&aggregate.posts).to_chart_data(locale),
    });

    charts.push(ChartSpec {
        id: "top-posts".into(),
        title: l.chart_top_posts.into(),
        kind: ChartKind::Bar,
        x_label: l.axis_post.into(),
        data: top_posts(&aggregate.posts, RankMetric::Reach, TOP_POSTS_CHART)
            .iter()
            .map(|p| {
                let label = if p.caption.trim().is_empty() {
                    p.id.clone()
                } else {
                    truncate_with_ellipsis(p.caption.trim(), POST_LABEL_CHARS)
                };
                ChartDatum::new(label, p.reach as f64).with_category(p.platform.as_str())
            })
            .collect(),
    });

    if !aggregate.comments.is_empty() {
        let texts = || aggregate.comments.iter().map(|c| c.text.as_str());
        charts.push(ChartSpec {
            id: "keywords".into(),
            title: l.chart_keywords.into(),
            kind: ChartKind::Bar,
            x_label: l.axis_word.into(),
            data: extract_keywords(texts())
                .into_iter()
                .map(|k| ChartDatum::new(k.word, k.count as f64))
                .collect(),
        });
        charts.push(ChartSpec {
            id: "topics".into(),
            title: l.chart_topics.into(),
            kind: ChartKind::Bar,
            x_label: l.axis_topic.into(),
            data: match_topics(texts())
                .into_iter()
                .map(|t| ChartDatum::new(t.topic, t.count as f64))
                .collect(),
        });
    }

    charts.retain(|c| c.data.iter().any(|d| d.value > 0.0));
    charts
}

#[cfg(test)]
#[path = "build_test.rs"]
mod tests;
