use std::f64::consts::{FRAC_PI_2, TAU};

use sdash_core::{ChartDatum, Locale};

use super::{finite, ChartStyle};
use crate::canvas::{Canvas, Point, Rect, TextStyle};
use crate::hints::{hint_for, resolve_color};

/// Inner hole radius as a fraction of the outer radius.
pub const HOLE_RATIO: f64 = 0.6;

/// Arc resolution for wedge polygons, in radians.
const MAX_ARC_STEP: f64 = TAU / 120.0;
const LEGEND_ROW: f64 = 4.5;
const LEGEND_SWATCH: f64 = 2.5;

/// Start and end angle of each wedge, in radians, beginning at 12 o'clock
/// (−π/2) and moving clockwise on a y-down surface. Rows with no share get
/// an empty span.
#[must_use]
pub fn wedge_angles(data: &[ChartDatum]) -> Vec<(f64, f64)> {
    let total: f64 = data.iter().map(|d| finite(d.value).max(0.0)).sum();
    let mut angle = -FRAC_PI_2;
    data.iter()
        .map(|d| {
            let sweep = if total > 0.0 {
                finite(d.value).max(0.0) / total * TAU
            } else {
                0.0
            };
            let span = (angle, angle + sweep);
            angle += sweep;
            span
        })
        .collect()
}

fn wedge_points(center: Point, radius: f64, start: f64, end: f64) -> Vec<Point> {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let steps = ((end - start) / MAX_ARC_STEP).ceil().max(1.0) as usize;
    let mut points = Vec::with_capacity(steps + 2);
    points.push(center);
    for i in 0..=steps {
        #[allow(clippy::cast_precision_loss)]
        let a = start + (end - start) * i as f64 / steps as f64;
        points.push(Point::new(
            center.x + radius * a.cos(),
            center.y + radius * a.sin(),
        ));
    }
    points
}

/// Donut wedges around `center` plus the background-coloured hole.
///
/// Values are shares of their sum. Nothing is drawn when the sum is zero.
pub fn donut_chart<C: Canvas + ?Sized>(
    canvas: &mut C,
    data: &[ChartDatum],
    center: Point,
    radius: f64,
    style: &ChartStyle,
) {
    let total: f64 = data.iter().map(|d| finite(d.value).max(0.0)).sum();
    if data.is_empty() || total <= 0.0 {
        return;
    }

    for (i, (datum, (start, end))) in data.iter().zip(wedge_angles(data)).enumerate() {
        if end - start <= 0.0 {
            continue;
        }
        canvas.fill_polygon(
            &wedge_points(center, radius, start, end),
            resolve_color(datum, i, style.plain),
        );
    }
    canvas.fill_circle(center, radius * HOLE_RATIO, style.background);
}

/// Donut on the left of `bounds` with its legend to the right.
pub fn donut_chart_in<C: Canvas + ?Sized>(
    canvas: &mut C,
    data: &[ChartDatum],
    bounds: Rect,
    locale: Locale,
    style: &ChartStyle,
) {
    canvas.fill_rect(bounds, style.background);

    let radius = (bounds.height / 2.0 - 2.0).min(bounds.width * 0.3).max(0.0);
    let center = Point::new(bounds.x + radius + 3.0, bounds.y + bounds.height / 2.0);
    donut_chart(canvas, data, center, radius, style);

    let total: f64 = data.iter().map(|d| finite(d.value).max(0.0)).sum();
    if data.is_empty() || total <= 0.0 {
        return;
    }

    let legend_x = center.x + radius + 5.0;
    #[allow(clippy::cast_precision_loss)]
    let mut y = center.y - (data.len() - 1) as f64 * LEGEND_ROW / 2.0;
    let text = TextStyle::new(style.label_pt, style.text);
    for (i, datum) in data.iter().enumerate() {
        let hint = hint_for(datum, i, Some(total), locale);
        canvas.fill_rect(
            Rect::new(legend_x, y - LEGEND_SWATCH, LEGEND_SWATCH, LEGEND_SWATCH),
            resolve_color(datum, i, style.plain),
        );
        canvas.text(
            &hint.legend,
            Point::new(legend_x + LEGEND_SWATCH + 1.5, y),
            &text,
        );
        y += LEGEND_ROW;
    }
}
