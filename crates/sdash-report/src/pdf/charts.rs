//! The chart section and its fallback chain.
//!
//! Strategies run in order until one succeeds. Vector draws the chart specs
//! directly, Raster embeds captured images, and Disclaimer writes a short
//! note and cannot fail.

use sdash_charts::{render_chart, CapturedChart, ChartStyle, Point, Rect, Rgb, TextStyle};
use sdash_core::{ChartSpec, Locale};

use super::layout::{chart_cell_width, PageCursor, COLUMN_GAP, SECTION_GAP};
use crate::error::ReportError;
use crate::labels::labels;
use crate::surface::ReportSurface;

/// Chart height relative to its cell width.
const CHART_ASPECT: f64 = 0.62;
const TITLE_HEIGHT: f64 = 6.0;
const HEADING_HEIGHT: f64 = 8.0;
const ROW_GAP: f64 = 4.0;
const INK: Rgb = Rgb::new(17, 24, 39);
const MUTED: Rgb = Rgb::new(107, 114, 128);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartMode {
    Vector,
    Raster,
    /// No chart section at all.
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartStrategy {
    Vector,
    Raster,
    Disclaimer,
}

impl ChartStrategy {
    /// Strategies to try for `mode`, in order.
    #[must_use]
    pub fn chain(mode: ChartMode) -> Vec<ChartStrategy> {
        match mode {
            ChartMode::Vector => vec![
                ChartStrategy::Vector,
                ChartStrategy::Raster,
                ChartStrategy::Disclaimer,
            ],
            ChartMode::Raster => vec![
                ChartStrategy::Raster,
                ChartStrategy::Vector,
                ChartStrategy::Disclaimer,
            ],
            ChartMode::None => Vec::new(),
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ChartStrategy::Vector => "vector",
            ChartStrategy::Raster => "raster",
            ChartStrategy::Disclaimer => "disclaimer",
        }
    }

    /// Draws the chart section; the count of charts placed on success.
    fn apply<S: ReportSurface>(
        self,
        cursor: &mut PageCursor<'_, S>,
        sources: &ChartSources<'_>,
    ) -> Result<usize, ReportError> {
        match self {
            ChartStrategy::Vector => draw_vector(cursor, sources.specs, sources.locale),
            ChartStrategy::Raster => draw_raster(cursor, sources.captured, sources.locale),
            ChartStrategy::Disclaimer => {
                draw_disclaimer(cursor, sources.locale);
                Ok(0)
            }
        }
    }
}

/// What the chart strategies can draw from.
#[derive(Debug, Clone, Copy)]
pub struct ChartSources<'a> {
    pub specs: &'a [ChartSpec],
    pub captured: &'a [CapturedChart],
    pub locale: Locale,
}

impl ChartSources<'_> {
    fn is_empty(&self) -> bool {
        !self.specs.iter().any(ChartSpec::has_data) && self.captured.is_empty()
    }
}

/// Runs `chain` and returns the strategy that drew the section, or `None`
/// when there was nothing to chart and the section was left out.
pub fn place_charts<S: ReportSurface>(
    cursor: &mut PageCursor<'_, S>,
    chain: &[ChartStrategy],
    sources: &ChartSources<'_>,
) -> Option<ChartStrategy> {
    if chain.is_empty() || sources.is_empty() {
        return None;
    }
    for &strategy in chain {
        match strategy.apply(cursor, sources) {
            Ok(placed) => {
                tracing::debug!(strategy = strategy.name(), placed, "chart section drawn");
                return Some(strategy);
            }
            Err(e) => {
                tracing::warn!(
                    strategy = strategy.name(),
                    error = %e,
                    "chart strategy failed, falling through"
                );
            }
        }
    }
    None
}

fn draw_heading<S: ReportSurface>(cursor: &mut PageCursor<'_, S>, text: &str) {
    let (x, y) = (cursor.left(), cursor.y());
    cursor
        .surface()
        .text(text, Point::new(x, y + 5.5), &TextStyle::new(12.0, INK).bold());
    cursor.advance(HEADING_HEIGHT);
}

fn draw_cell_title<S: ReportSurface>(surface: &mut S, title: &str, x: f64, y: f64) {
    surface.text(title, Point::new(x, y + 4.0), &TextStyle::new(9.0, INK).bold());
}

fn draw_vector<S: ReportSurface>(
    cursor: &mut PageCursor<'_, S>,
    specs: &[ChartSpec],
    locale: Locale,
) -> Result<usize, ReportError> {
    let charts: Vec<&ChartSpec> = specs.iter().filter(|s| s.has_data()).collect();
    if charts.is_empty() {
        return Err(ReportError::NoCharts { strategy: "vector" });
    }

    let cell = chart_cell_width(cursor.surface().page_size().0);
    let chart_height = cell * CHART_ASPECT;
    let row_height = TITLE_HEIGHT + chart_height;
    let style = ChartStyle::default();

    cursor.ensure(HEADING_HEIGHT + row_height);
    draw_heading(cursor, labels(locale).charts_heading);

    for row in charts.chunks(2) {
        cursor.ensure(row_height);
        let y = cursor.y();
        let left = cursor.left();
        for (column, spec) in row.iter().enumerate() {
            let x = column_x(left, cell, column);
            let surface = cursor.surface();
            draw_cell_title(surface, &spec.title, x, y);
            let bounds = Rect::new(x, y + TITLE_HEIGHT, cell, chart_height);
            render_chart(surface, spec, bounds, locale, &style);
        }
        cursor.advance(row_height + ROW_GAP);
    }
    cursor.advance(SECTION_GAP);
    Ok(charts.len())
}

fn draw_raster<S: ReportSurface>(
    cursor: &mut PageCursor<'_, S>,
    captured: &[CapturedChart],
    locale: Locale,
) -> Result<usize, ReportError> {
    let mut last_error = None;
    let usable: Vec<&CapturedChart> = captured
        .iter()
        .filter(|chart| match cursor.surface().check_image(&chart.image.png) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(chart = %chart.id, error = %e, "chart image cannot be embedded");
                last_error = Some(e);
                false
            }
        })
        .collect();
    if usable.is_empty() {
        return Err(last_error.unwrap_or(ReportError::NoCharts { strategy: "raster" }));
    }

    let cell = chart_cell_width(cursor.surface().page_size().0);
    let row_height = |row: &[&CapturedChart]| {
        TITLE_HEIGHT
            + row
                .iter()
                .map(|c| c.image.height_for_width(cell))
                .fold(0.0, f64::max)
    };

    cursor.ensure(HEADING_HEIGHT + row_height(&usable[..usable.len().min(2)]));
    draw_heading(cursor, labels(locale).charts_heading);

    let mut placed = 0;
    for row in usable.chunks(2) {
        let height = row_height(row);
        cursor.ensure(height);
        let y = cursor.y();
        let left = cursor.left();
        for (column, chart) in row.iter().enumerate() {
            let x = column_x(left, cell, column);
            let rect = Rect::new(x, y + TITLE_HEIGHT, cell, chart.image.height_for_width(cell));
            let surface = cursor.surface();
            match surface.draw_image(&chart.image.png, rect) {
                Ok(()) => {
                    draw_cell_title(surface, &chart.title, x, y);
                    placed += 1;
                }
                Err(e) => {
                    tracing::warn!(chart = %chart.id, error = %e, "could not embed chart image");
                    last_error = Some(e);
                }
            }
        }
        cursor.advance(height + ROW_GAP);
    }
    if placed == 0 {
        return Err(last_error.unwrap_or(ReportError::NoCharts { strategy: "raster" }));
    }
    cursor.advance(SECTION_GAP);
    Ok(placed)
}

fn draw_disclaimer<S: ReportSurface>(cursor: &mut PageCursor<'_, S>, locale: Locale) {
    let l = labels(locale);
    cursor.ensure(HEADING_HEIGHT + 8.0);
    draw_heading(cursor, l.charts_heading);
    let (x, y) = (cursor.left(), cursor.y());
    cursor
        .surface()
        .text(l.charts_unavailable, Point::new(x, y + 4.0), &TextStyle::new(9.0, MUTED));
    cursor.advance(8.0 + SECTION_GAP);
}

#[allow(clippy::cast_precision_loss)]
fn column_x(left: f64, cell: f64, column: usize) -> f64 {
    left + column as f64 * (cell + COLUMN_GAP)
}

#[cfg(test)]
mod tests {
    use sdash_charts::RasterImage;
    use sdash_core::{ChartDatum, ChartKind};

    use super::*;
    use crate::surface::RecordingSurface;

    fn spec(id: &str, values: &[f64]) -> ChartSpec {
        ChartSpec {
            id: id.into(),
            title: format!("Chart {id}"),
            kind: ChartKind::Bar,
            x_label: String::new(),
            data: values
                .iter()
                .enumerate()
                .map(|(i, v)| ChartDatum::new(format!("d{i}"), *v))
                .collect(),
        }
    }

    fn captured(id: &str) -> CapturedChart {
        CapturedChart {
            id: id.into(),
            title: format!("Captured {id}"),
            image: RasterImage {
                png: vec![0x89, b'P', b'N', b'G'],
                width_px: 800,
                height_px: 400,
            },
        }
    }

    fn run(
        surface: &mut RecordingSurface,
        mode: ChartMode,
        specs: &[ChartSpec],
        captures: &[CapturedChart],
    ) -> Option<ChartStrategy> {
        let mut cursor = PageCursor::new(surface);
        let sources = ChartSources {
            specs,
            captured: captures,
            locale: Locale::En,
        };
        place_charts(&mut cursor, &ChartStrategy::chain(mode), &sources)
    }

    #[test]
    fn chain_order_per_mode() {
        assert_eq!(
            ChartStrategy::chain(ChartMode::Vector),
            vec![
                ChartStrategy::Vector,
                ChartStrategy::Raster,
                ChartStrategy::Disclaimer
            ]
        );
        assert_eq!(ChartStrategy::chain(ChartMode::Raster)[0], ChartStrategy::Raster);
        assert!(ChartStrategy::chain(ChartMode::None).is_empty());
    }

    #[test]
    fn vector_draws_two_per_row() {
        let mut surface = RecordingSurface::new(210.0, 297.0);
        let specs = vec![spec("a", &[1.0]), spec("b", &[2.0]), spec("c", &[3.0])];
        let used = run(&mut surface, ChartMode::Vector, &specs, &[]);
        assert_eq!(used, Some(ChartStrategy::Vector));

        let texts = surface.texts();
        assert_eq!(texts[0], "Charts");
        assert!(texts.contains(&"Chart a"));
        assert!(texts.contains(&"Chart c"));
        assert_eq!(surface.images(), 0);
    }

    #[test]
    fn empty_specs_fall_through_to_raster() {
        let mut surface = RecordingSurface::new(210.0, 297.0);
        let specs = vec![spec("empty", &[])];
        let used = run(
            &mut surface,
            ChartMode::Vector,
            &specs,
            &[captured("x"), captured("y")],
        );
        assert_eq!(used, Some(ChartStrategy::Raster));
        assert_eq!(surface.images(), 2);
        assert!(surface.texts().contains(&"Captured y"));
    }

    #[test]
    fn unembeddable_images_fall_through_to_disclaimer() {
        let mut surface = RecordingSurface::new(210.0, 297.0);
        surface.reject_images = true;
        let used = run(&mut surface, ChartMode::Raster, &[], &[captured("x")]);
        assert_eq!(used, Some(ChartStrategy::Disclaimer));
        assert!(surface
            .texts()
            .contains(&"Charts are not available in this report."));
    }

    #[test]
    fn images_that_fail_to_place_fall_through_to_disclaimer() {
        let mut surface = RecordingSurface::new(210.0, 297.0);
        surface.fail_image_draws = true;
        let used = run(
            &mut surface,
            ChartMode::Raster,
            &[],
            &[captured("x"), captured("y")],
        );
        assert_eq!(used, Some(ChartStrategy::Disclaimer));
        assert_eq!(surface.images(), 0);
        assert!(surface
            .texts()
            .contains(&"Charts are not available in this report."));
    }

    #[test]
    fn nothing_to_chart_omits_the_section() {
        let mut surface = RecordingSurface::new(210.0, 297.0);
        assert_eq!(run(&mut surface, ChartMode::Vector, &[], &[]), None);
        assert!(surface.texts().is_empty());
    }

    #[test]
    fn no_chart_mode_omits_the_section() {
        let mut surface = RecordingSurface::new(210.0, 297.0);
        let specs = vec![spec("a", &[1.0])];
        assert_eq!(run(&mut surface, ChartMode::None, &specs, &[]), None);
        assert!(surface.texts().is_empty());
    }
}
