//! Vector chart rendering onto a [`Canvas`].
//!
//! Every renderer accepts empty data and then draws only the background and
//! axes.

pub mod bar;
pub mod donut;
pub mod line;

use sdash_core::{format_compact, ChartKind, ChartSpec, Locale};

use crate::canvas::{Canvas, Point, Rect, TextAlign, TextStyle};
use crate::color::{Rgb, DEFAULT_BLUE, WHITE};

pub use bar::bar_chart;
pub use donut::{donut_chart, donut_chart_in};
pub use line::line_chart;

/// Horizontal gridlines drawn behind line and bar plots.
pub const GRIDLINES: usize = 4;

const AXIS_WIDTH: f64 = 0.3;
const GRID_WIDTH: f64 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartStyle {
    pub background: Rgb,
    pub axis: Rgb,
    pub grid: Rgb,
    pub text: Rgb,
    pub series: Rgb,
    pub label_pt: f64,
    /// Use the capture-safe palette instead of category colours.
    pub plain: bool,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            background: WHITE,
            axis: Rgb::new(75, 85, 99),
            grid: Rgb::new(229, 231, 235),
            text: Rgb::new(55, 65, 81),
            series: DEFAULT_BLUE,
            label_pt: 6.5,
            plain: false,
        }
    }
}

impl ChartStyle {
    fn label(&self) -> TextStyle {
        TextStyle::new(self.label_pt, self.text)
    }
}

/// Draws `spec` into `bounds`.
pub fn render_chart<C: Canvas + ?Sized>(
    canvas: &mut C,
    spec: &ChartSpec,
    bounds: Rect,
    locale: Locale,
    style: &ChartStyle,
) {
    match spec.kind {
        ChartKind::Line => line_chart(canvas, &spec.data, bounds, &spec.x_label, locale, style),
        ChartKind::Bar => bar_chart(canvas, &spec.data, bounds, &spec.x_label, locale, style),
        ChartKind::Donut => donut_chart_in(canvas, &spec.data, bounds, locale, style),
    }
}

/// The plot region of a line or bar chart: room on the left for value
/// labels and below for category labels and the axis caption.
pub(crate) fn plot_area(bounds: Rect) -> Rect {
    bounds.inset(3.0, 3.0, 10.0, 13.0)
}

pub(crate) fn draw_axes<C: Canvas + ?Sized>(canvas: &mut C, plot: Rect, style: &ChartStyle) {
    let origin = Point::new(plot.x, plot.bottom());
    canvas.stroke_line(origin, Point::new(plot.x, plot.y), style.axis, AXIS_WIDTH);
    canvas.stroke_line(origin, Point::new(plot.right(), plot.bottom()), style.axis, AXIS_WIDTH);
}

#[allow(clippy::cast_precision_loss)]
pub(crate) fn draw_gridlines<C: Canvas + ?Sized>(canvas: &mut C, plot: Rect, style: &ChartStyle) {
    for i in 1..=GRIDLINES {
        let y = plot.bottom() - plot.height * i as f64 / GRIDLINES as f64;
        canvas.stroke_line(
            Point::new(plot.x, y),
            Point::new(plot.right(), y),
            style.grid,
            GRID_WIDTH,
        );
    }
}

/// Caption centred under the plot.
pub(crate) fn draw_x_caption<C: Canvas + ?Sized>(
    canvas: &mut C,
    plot: Rect,
    caption: &str,
    style: &ChartStyle,
) {
    if caption.is_empty() {
        return;
    }
    canvas.text(
        caption,
        Point::new(plot.x + plot.width / 2.0, plot.bottom() + 8.0),
        &style.label().aligned(TextAlign::Center),
    );
}

/// Value label right-aligned against the y axis.
pub(crate) fn draw_y_label<C: Canvas + ?Sized>(
    canvas: &mut C,
    plot: Rect,
    y: f64,
    value: f64,
    locale: Locale,
    style: &ChartStyle,
) {
    canvas.text(
        &format_compact(value, locale),
        Point::new(plot.x - 1.0, y + style.label_pt * 0.35 / 2.0),
        &style.label().aligned(TextAlign::Right),
    );
}

pub(crate) fn finite(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
