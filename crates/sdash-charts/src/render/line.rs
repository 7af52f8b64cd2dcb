use sdash_core::{ChartDatum, Locale};

use super::{
    draw_axes, draw_gridlines, draw_x_caption, draw_y_label, finite, plot_area, ChartStyle,
};
use crate::canvas::{Canvas, Point, Rect, TextAlign};

/// Value labels on the y axis, min and max included.
pub const Y_LABELS: usize = 5;

const MARKER_RADIUS: f64 = 0.7;
const LINE_WIDTH: f64 = 0.5;

/// Line chart scaled so the smallest value sits on the x axis and the
/// largest on the top edge. A flat series is drawn at mid-height.
#[allow(clippy::cast_precision_loss)]
pub fn line_chart<C: Canvas + ?Sized>(
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
    if data.is_empty() {
        return;
    }
    draw_gridlines(canvas, plot, style);

    let values: Vec<f64> = data.iter().map(|d| finite(d.value)).collect();
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    let n = values.len();
    let x_of = |i: usize| {
        if n == 1 {
            plot.x + plot.width / 2.0
        } else {
            plot.x + plot.width * i as f64 / (n - 1) as f64
        }
    };
    let y_of = |v: f64| {
        if range > 0.0 {
            plot.bottom() - (v - min) / range * plot.height
        } else {
            plot.y + plot.height / 2.0
        }
    };

    let points: Vec<Point> = values
        .iter()
        .enumerate()
        .map(|(i, v)| Point::new(x_of(i), y_of(*v)))
        .collect();

    canvas.stroke_polyline(&points, style.series, LINE_WIDTH);
    for p in &points {
        canvas.fill_circle(*p, MARKER_RADIUS, style.series);
    }

    for i in 0..Y_LABELS {
        let frac = i as f64 / (Y_LABELS - 1) as f64;
        let y = plot.bottom() - plot.height * frac;
        draw_y_label(canvas, plot, y, min + range * frac, locale, style);
    }

    // First and last buckets anchor the time axis.
    let tick = style.label().aligned(TextAlign::Center);
    let tick_y = plot.bottom() + 3.5;
    canvas.text(&data[0].label, Point::new(x_of(0), tick_y), &tick);
    if n > 1 {
        canvas.text(&data[n - 1].label, Point::new(x_of(n - 1), tick_y), &tick);
    }

    draw_x_caption(canvas, plot, x_label, style);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{DrawOp, RecordingCanvas};

    fn bounds() -> Rect {
        Rect::new(0.0, 0.0, 100.0, 60.0)
    }

    fn markers(canvas: &RecordingCanvas) -> Vec<Point> {
        canvas
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Circle { center, .. } => Some(*center),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn empty_series_draws_only_background_and_axes() {
        let mut canvas = RecordingCanvas::new();
        line_chart(&mut canvas, &[], bounds(), "Fecha", Locale::Es, &ChartStyle::default());
        assert_eq!(canvas.rects().len(), 1);
        assert_eq!(canvas.lines(), 2);
        assert_eq!(canvas.circles(), 0);
        assert!(canvas.texts().is_empty());
    }

    #[test]
    fn min_maps_to_bottom_and_max_to_top() {
        let data = vec![
            ChartDatum::new("01/01", 100.0),
            ChartDatum::new("02/01", 400.0),
            ChartDatum::new("03/01", 250.0),
        ];
        let mut canvas = RecordingCanvas::new();
        line_chart(&mut canvas, &data, bounds(), "Fecha", Locale::Es, &ChartStyle::default());

        let plot = plot_area(bounds());
        let pts = markers(&canvas);
        assert_eq!(pts.len(), 3);
        assert!((pts[0].y - plot.bottom()).abs() < 1e-9);
        assert!((pts[1].y - plot.y).abs() < 1e-9);
        assert!((pts[0].x - plot.x).abs() < 1e-9);
        assert!((pts[2].x - plot.right()).abs() < 1e-9);
    }

    #[test]
    fn draws_gridlines_segments_and_five_labels() {
        let data = vec![ChartDatum::new("a", 0.0), ChartDatum::new("b", 1200.0)];
        let mut canvas = RecordingCanvas::new();
        line_chart(&mut canvas, &data, bounds(), "Fecha", Locale::Es, &ChartStyle::default());

        // 2 axes + 4 gridlines + 1 segment
        assert_eq!(canvas.lines(), 7);
        let texts = canvas.texts();
        for label in ["0", "300", "600", "900", "1,2K", "Fecha"] {
            assert!(texts.contains(&label), "missing {label} in {texts:?}");
        }
    }

    #[test]
    fn flat_series_sits_at_mid_height() {
        let data = vec![ChartDatum::new("a", 5.0), ChartDatum::new("b", 5.0)];
        let mut canvas = RecordingCanvas::new();
        line_chart(&mut canvas, &data, bounds(), "", Locale::En, &ChartStyle::default());
        let plot = plot_area(bounds());
        for p in markers(&canvas) {
            assert!((p.y - (plot.y + plot.height / 2.0)).abs() < 1e-9);
        }
    }
}
