//! PDF report layout.
//!
//! Sections flow top to bottom: title, caption, charts, KPI table, platform
//! table, sentiment table and top posts. Empty sections are left out. The
//! page footer is stamped on every page once all content is placed.

pub mod charts;
pub mod layout;
pub mod sink;
pub mod table;

use sdash_charts::{CapturedChart, Point, Rgb, TextAlign, TextStyle};
use sdash_core::{
    format_compact, format_kpi_value, format_number, format_percent, truncate_with_ellipsis,
    ExportData, Locale,
};

pub use charts::{ChartMode, ChartSources, ChartStrategy};
pub use sink::PdfSurface;

use self::layout::{PageCursor, FOOTER_HEIGHT, MARGIN, SECTION_GAP};
use self::table::{draw_table, Column, Table};
use crate::error::ReportError;
use crate::labels::{labels, Labels};
use crate::surface::ReportSurface;

pub const A4_WIDTH_MM: f64 = 210.0;
pub const A4_HEIGHT_MM: f64 = 297.0;
/// Rows of the top-posts table.
pub const MAX_POST_ROWS: usize = 20;
pub const CAPTION_CHARS: usize = 40;

const TITLE_PT: f64 = 18.0;
const CAPTION_PT: f64 = 9.0;
const FOOTER_PT: f64 = 7.5;
const INK: Rgb = Rgb::new(17, 24, 39);
const MUTED: Rgb = Rgb::new(107, 114, 128);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Orientation {
    #[default]
    Portrait,
    /// Used for whole-dashboard snapshots.
    Landscape,
}

impl Orientation {
    /// Page width and height in millimetres.
    #[must_use]
    pub fn page_size(self) -> (f64, f64) {
        match self {
            Orientation::Portrait => (A4_WIDTH_MM, A4_HEIGHT_MM),
            Orientation::Landscape => (A4_HEIGHT_MM, A4_WIDTH_MM),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PdfOptions {
    pub orientation: Orientation,
    pub chart_mode: ChartMode,
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            orientation: Orientation::Portrait,
            chart_mode: ChartMode::Vector,
        }
    }
}

/// What the layout did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutOutcome {
    pub pages: usize,
    /// The strategy that drew the chart section, if there was one.
    pub charts: Option<ChartStrategy>,
}

/// Renders `data` to PDF bytes.
///
/// # Errors
///
/// Returns [`ReportError::Pdf`] if the document cannot be built or
/// serialized. Nothing is returned for a document that failed midway.
pub fn render_pdf(
    data: &ExportData,
    options: &PdfOptions,
    captured: &[CapturedChart],
) -> Result<Vec<u8>, ReportError> {
    let (width, height) = options.orientation.page_size();
    let mut surface = PdfSurface::new(&data.title, width, height)?;
    let outcome = layout_report(&mut surface, data, options.chart_mode, captured);
    tracing::debug!(
        pages = outcome.pages,
        charts = outcome.charts.map(ChartStrategy::name),
        "PDF laid out"
    );
    surface.finish()
}

/// Lays out the whole report on `surface`.
pub fn layout_report<S: ReportSurface>(
    surface: &mut S,
    data: &ExportData,
    chart_mode: ChartMode,
    captured: &[CapturedChart],
) -> LayoutOutcome {
    let l = labels(data.locale);
    let mut cursor = PageCursor::new(surface);

    draw_title(&mut cursor, data, l);

    let sources = ChartSources {
        specs: &data.charts,
        captured,
        locale: data.locale,
    };
    let charts = charts::place_charts(&mut cursor, &ChartStrategy::chain(chart_mode), &sources);

    for table in tables(data, l) {
        draw_table(&mut cursor, &table);
    }
    drop(cursor);

    stamp_footers(surface, data, l);
    LayoutOutcome {
        pages: surface.page_count(),
        charts,
    }
}

fn draw_title<S: ReportSurface>(cursor: &mut PageCursor<'_, S>, data: &ExportData, l: &Labels) {
    let x = cursor.left();
    let y = cursor.y();
    cursor.surface().text(
        &data.title,
        Point::new(x, y + 7.0),
        &TextStyle::new(TITLE_PT, INK).bold(),
    );
    cursor.advance(11.0);

    let mut parts = Vec::new();
    if let Some(range) = &data.date_range {
        parts.push(format!("{}: {range}", l.period));
    }
    if let Some(source) = &data.source {
        parts.push(format!("{}: {source}", l.source));
    }
    if !parts.is_empty() {
        let y = cursor.y();
        cursor.surface().text(
            &parts.join("  |  "),
            Point::new(x, y + 3.5),
            &TextStyle::new(CAPTION_PT, MUTED),
        );
        cursor.advance(6.0);
    }
    cursor.advance(SECTION_GAP);
}

/// The non-empty tables in report order.
fn tables(data: &ExportData, l: &Labels) -> Vec<Table> {
    let locale = data.locale;
    let mut tables = Vec::new();

    if !data.kpis.is_empty() {
        tables.push(Table {
            heading: l.kpi_heading.into(),
            columns: vec![
                Column::left(l.indicator, 3.0),
                Column::right(l.value, 2.0),
                Column::right(l.previous, 2.0),
                Column::right(l.change, 1.5),
            ],
            rows: data
                .kpis
                .iter()
                .map(|k| {
                    vec![
                        k.label.clone(),
                        format_kpi_value(k.value, k.format, locale),
                        format_kpi_value(k.previous_value, k.format, locale),
                        signed_percent(k.change, locale),
                    ]
                })
                .collect(),
        });
    }

    if !data.platforms.is_empty() {
        tables.push(Table {
            heading: l.platforms_heading.into(),
            columns: vec![
                Column::left(l.platform, 2.0),
                Column::right(l.reach, 1.5),
                Column::right(l.impressions, 1.5),
                Column::right(l.interactions, 1.5),
                Column::right(l.engagement, 1.5),
            ],
            rows: data
                .platforms
                .iter()
                .map(|m| {
                    vec![
                        m.platform.label().to_string(),
                        compact(m.reach, locale),
                        compact(m.impressions, locale),
                        compact(m.interactions, locale),
                        format_percent(m.engagement_rate, locale),
                    ]
                })
                .collect(),
        });
    }

    if let Some(sentiment) = &data.sentiment {
        #[allow(clippy::cast_precision_loss)]
        let total = format_number(sentiment.total as f64, 0, locale);
        tables.push(Table {
            heading: l.sentiment_heading.into(),
            columns: vec![
                Column::left(l.sentiment, 2.0),
                Column::right(l.percentage, 1.0),
            ],
            rows: vec![
                vec![l.positive.into(), format_percent(sentiment.positive, locale)],
                vec![l.neutral.into(), format_percent(sentiment.neutral, locale)],
                vec![l.negative.into(), format_percent(sentiment.negative, locale)],
                vec![l.total.into(), total],
            ],
        });
    }

    if !data.posts.is_empty() {
        tables.push(Table {
            heading: l.posts_heading.into(),
            columns: vec![
                Column::left(l.date, 1.2),
                Column::left(l.platform, 1.4),
                Column::left(l.text, 4.4),
                Column::right(l.reach, 1.2),
                Column::right(l.interactions, 1.4),
                Column::right(l.engagement, 1.3),
            ],
            rows: data
                .posts
                .iter()
                .take(MAX_POST_ROWS)
                .map(|p| {
                    vec![
                        p.date.format("%Y-%m-%d").to_string(),
                        p.platform.label().to_string(),
                        truncate_with_ellipsis(p.caption.trim(), CAPTION_CHARS),
                        compact(p.reach, locale),
                        compact(p.interactions, locale),
                        format_percent(p.engagement_rate, locale),
                    ]
                })
                .collect(),
        });
    }

    tables
}

#[allow(clippy::cast_precision_loss)]
fn compact(value: u64, locale: Locale) -> String {
    format_compact(value as f64, locale)
}

fn signed_percent(change: f64, locale: Locale) -> String {
    if change > 0.0 {
        format!("+{}", format_percent(change, locale))
    } else {
        format_percent(change, locale)
    }
}

/// `Página 1 de 3 · 2025-02-01 09:00 UTC`, centred at the foot of each page.
fn stamp_footers<S: ReportSurface>(surface: &mut S, data: &ExportData, l: &Labels) {
    let (width, height) = surface.page_size();
    let pages = surface.page_count();
    let stamp = data.generated_at.format("%Y-%m-%d %H:%M UTC");
    let style = TextStyle::new(FOOTER_PT, MUTED).aligned(TextAlign::Center);
    let at = Point::new(width / 2.0, height - MARGIN - FOOTER_HEIGHT / 2.0 + 2.0);

    for index in 0..pages {
        surface.select_page(index);
        surface.text(&format!("{} · {stamp}", l.page_of(index + 1, pages)), at, &style);
    }
}

#[cfg(test)]
#[path = "pdf_test.rs"]
mod tests;
