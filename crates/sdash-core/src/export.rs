//! The report input contract shared by the PDF and workbook builders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::format::Locale;
use crate::metrics::{KpiData, PlatformMetrics, Post, SentimentDistribution};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
    Donut,
}

/// One row of chart data.
///
/// Carries numbers and an optional semantic `category` key (a platform name,
/// a sentiment class, a tier). Colours and tooltips are derived from the
/// category at render time, never stored here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDatum {
    pub label: String,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl ChartDatum {
    #[must_use]
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
            category: None,
        }
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// A pre-shaped chart: what to draw, not how.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    /// Stable identifier, also used to locate the live chart in the UI.
    pub id: String,
    pub title: String,
    pub kind: ChartKind,
    pub x_label: String,
    pub data: Vec<ChartDatum>,
}

impl ChartSpec {
    #[must_use]
    pub fn has_data(&self) -> bool {
        !self.data.is_empty()
    }
}

/// Everything a report shows. Both builders take exactly this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportData {
    pub title: String,
    pub kpis: Vec<KpiData>,
    pub platforms: Vec<PlatformMetrics>,
    pub posts: Vec<Post>,
    pub sentiment: Option<SentimentDistribution>,
    pub date_range: Option<String>,
    pub source: Option<String>,
    pub charts: Vec<ChartSpec>,
    pub generated_at: DateTime<Utc>,
    pub locale: Locale,
}

impl ExportData {
    /// An export with no content, only a title.
    #[must_use]
    pub fn empty(title: impl Into<String>, generated_at: DateTime<Utc>, locale: Locale) -> Self {
        Self {
            title: title.into(),
            kpis: Vec::new(),
            platforms: Vec::new(),
            posts: Vec::new(),
            sentiment: None,
            date_range: None,
            source: None,
            charts: Vec::new(),
            generated_at,
            locale,
        }
    }
}
