use sdash_core::{format_compact, truncate_with_ellipsis, ChartDatum, Locale};

use super::{draw_axes, draw_gridlines, draw_x_caption, draw_y_label, finite, plot_area, ChartStyle};
use crate::canvas::{Canvas, Point, Rect, TextAlign};
use crate::hints::resolve_color;

/// Gap between neighbouring bars, in millimetres.
pub const BAR_SPACING: f64 = 2.0;
/// Category labels longer than this are truncated with an ellipsis.
pub const MAX_LABEL_CHARS: usize = 10;

const MIN_BAR_WIDTH: f64 = 0.5;
/// Bars shorter than this get no value label.
const VALUE_LABEL_MIN_HEIGHT: f64 = 4.0;

/// Bar chart with heights proportional to `value / max`.
///
/// Rows with a category take its colour; other rows use the series colour.
#[allow(clippy::cast_precision_loss)]
pub fn bar_chart<C: Canvas + ?Sized>(
    canvas: &mut C,
    data: &[ChartDatum],
    bounds: Rect,
    x_label: &str,
    locale: Locale,
    style: &ChartStyle,
) {
    let plot = plot_area(bounds);
    canvas.fill_rect(bounds, style.background);
    draw_axes(canvas, plot, style);

    let max = data
        .iter()
        .map(|d| finite(d.value))
        .fold(0.0_f64, f64::max);
    if data.is_empty() || max <= 0.0 {
        return;
    }
    draw_gridlines(canvas, plot, style);

    let slot = plot.width / data.len() as f64;
    let bar_width = (slot - BAR_SPACING).max(MIN_BAR_WIDTH);
    let label = style.label().aligned(TextAlign::Center);

    for (i, datum) in data.iter().enumerate() {
        let value = finite(datum.value).max(0.0);
        let height = value / max * plot.height;
        let x = plot.x + slot * i as f64 + (slot - bar_width) / 2.0;
        let center = x + bar_width / 2.0;

        let color = if datum.category.is_some() || style.plain {
            resolve_color(datum, i, style.plain)
        } else {
            style.series
        };
        canvas.fill_rect(Rect::new(x, plot.bottom() - height, bar_width, height), color);

        if height >= VALUE_LABEL_MIN_HEIGHT {
            canvas.text(
                &format_compact(value, locale),
                Point::new(center, plot.bottom() - height - 1.0),
                &label,
            );
        }
        canvas.text(
            &truncate_with_ellipsis(&datum.label, MAX_LABEL_CHARS),
            Point::new(center, plot.bottom() + 3.5),
            &label,
        );
    }

    draw_y_label(canvas, plot, plot.bottom(), 0.0, locale, style);
    draw_y_label(canvas, plot, plot.y, max, locale, style);
    draw_x_caption(canvas, plot, x_label, style);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::RecordingCanvas;

    fn bounds() -> Rect {
        Rect::new(10.0, 10.0, 90.0, 60.0)
    }

    /// Bars are every rect after the background.
    fn bars(canvas: &RecordingCanvas) -> Vec<Rect> {
        canvas.rects().into_iter().skip(1).collect()
    }

    #[test]
    fn empty_and_all_zero_draw_axes_only() {
        for data in [vec![], vec![ChartDatum::new("a", 0.0), ChartDatum::new("b", 0.0)]] {
            let mut canvas = RecordingCanvas::new();
            bar_chart(&mut canvas, &data, bounds(), "", Locale::Es, &ChartStyle::default());
            assert!(bars(&canvas).is_empty());
            assert_eq!(canvas.lines(), 2);
        }
    }

    #[test]
    fn bar_width_is_slot_minus_spacing() {
        let data = vec![
            ChartDatum::new("a", 10.0),
            ChartDatum::new("b", 5.0),
            ChartDatum::new("c", 0.0),
        ];
        let mut canvas = RecordingCanvas::new();
        bar_chart(&mut canvas, &data, bounds(), "", Locale::Es, &ChartStyle::default());

        let plot = plot_area(bounds());
        let rects = bars(&canvas);
        assert_eq!(rects.len(), 3);
        let expected = plot.width / 3.0 - BAR_SPACING;
        assert!(rects.iter().all(|r| (r.width - expected).abs() < 1e-9));
        assert!((rects[0].height - plot.height).abs() < 1e-9);
        assert!((rects[1].height - plot.height / 2.0).abs() < 1e-9);
        assert_eq!(rects[2].height, 0.0);
    }

    #[test]
    fn long_labels_are_truncated_and_short_bars_unlabelled() {
        let data = vec![
            ChartDatum::new("Lunes 13 de enero", 100.0),
            ChartDatum::new("tiny", 1.0),
        ];
        let mut canvas = RecordingCanvas::new();
        bar_chart(&mut canvas, &data, bounds(), "", Locale::Es, &ChartStyle::default());
        let texts = canvas.texts();
        assert!(texts.contains(&"Lunes 13 d..."));
        assert!(texts.contains(&"tiny"));
        // "100" appears once as a value label and once as the axis maximum
        assert_eq!(texts.iter().filter(|t| **t == "100").count(), 2);
        assert!(!texts.contains(&"1"));
    }
}
