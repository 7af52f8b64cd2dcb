//! The drawing surface charts are rendered onto.
//!
//! Coordinates are millimetres with the origin at the top-left corner and
//! `y` growing downwards. Text positions are baselines.

use std::f64::consts::TAU;

use crate::color::Rgb;

/// Millimetres per typographic point.
pub const MM_PER_PT: f64 = 0.352_778;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Shrinks the rect by the given margins, never below zero size.
    #[must_use]
    pub fn inset(&self, top: f64, right: f64, bottom: f64, left: f64) -> Rect {
        Rect {
            x: self.x + left,
            y: self.y + top,
            width: (self.width - left - right).max(0.0),
            height: (self.height - top - bottom).max(0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size_pt: f64,
    pub color: Rgb,
    pub align: TextAlign,
    pub bold: bool,
}

impl TextStyle {
    #[must_use]
    pub const fn new(size_pt: f64, color: Rgb) -> Self {
        Self {
            size_pt,
            color,
            align: TextAlign::Left,
            bold: false,
        }
    }

    #[must_use]
    pub const fn aligned(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    #[must_use]
    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

/// Estimated rendered width of `text` in millimetres.
///
/// Builtin document fonts carry no metrics we can query, so this uses an
/// average glyph width of half an em.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn approx_text_width(text: &str, size_pt: f64) -> f64 {
    text.chars().count() as f64 * size_pt * 0.5 * MM_PER_PT
}

/// Left edge for `text` so that it lands at `x` under `align`.
#[must_use]
pub fn aligned_x(text: &str, x: f64, style: &TextStyle) -> f64 {
    match style.align {
        TextAlign::Left => x,
        TextAlign::Center => x - approx_text_width(text, style.size_pt) / 2.0,
        TextAlign::Right => x - approx_text_width(text, style.size_pt),
    }
}

/// Vertices of a 48-gon approximating a circle.
#[must_use]
pub fn circle_points(center: Point, radius: f64) -> Vec<Point> {
    const SEGMENTS: usize = 48;
    (0..SEGMENTS)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let angle = TAU * i as f64 / SEGMENTS as f64;
            Point::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            )
        })
        .collect()
}

/// A vector drawing surface.
pub trait Canvas {
    fn fill_rect(&mut self, rect: Rect, color: Rgb);

    fn stroke_line(&mut self, from: Point, to: Point, color: Rgb, width_mm: f64);

    fn fill_polygon(&mut self, points: &[Point], color: Rgb);

    fn text(&mut self, text: &str, at: Point, style: &TextStyle);

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgb) {
        self.fill_polygon(&circle_points(center, radius), color);
    }

    fn stroke_polyline(&mut self, points: &[Point], color: Rgb, width_mm: f64) {
        for pair in points.windows(2) {
            self.stroke_line(pair[0], pair[1], color, width_mm);
        }
    }
}

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Rect {
        rect: Rect,
        color: Rgb,
    },
    Line {
        from: Point,
        to: Point,
        color: Rgb,
        width: f64,
    },
    Polygon {
        points: Vec<Point>,
        color: Rgb,
    },
    Circle {
        center: Point,
        radius: f64,
        color: Rgb,
    },
    Text {
        text: String,
        at: Point,
        style: TextStyle,
    },
}

/// A canvas that only remembers what was drawn on it.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub ops: Vec<DrawOp>,
}

impl RecordingCanvas {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn lines(&self) -> usize {
        self.count(|op| matches!(op, DrawOp::Line { .. }))
    }

    #[must_use]
    pub fn polygons(&self) -> usize {
        self.count(|op| matches!(op, DrawOp::Polygon { .. }))
    }

    #[must_use]
    pub fn circles(&self) -> usize {
        self.count(|op| matches!(op, DrawOp::Circle { .. }))
    }

    #[must_use]
    pub fn rects(&self) -> Vec<Rect> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Rect { rect, .. } => Some(*rect),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn count(&self, pred: impl Fn(&DrawOp) -> bool) -> usize {
        self.ops.iter().filter(|op| pred(op)).count()
    }
}

impl Canvas for RecordingCanvas {
    fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        self.ops.push(DrawOp::Rect { rect, color });
    }

    fn stroke_line(&mut self, from: Point, to: Point, color: Rgb, width_mm: f64) {
        self.ops.push(DrawOp::Line {
            from,
            to,
            color,
            width: width_mm,
        });
    }

    fn fill_polygon(&mut self, points: &[Point], color: Rgb) {
        self.ops.push(DrawOp::Polygon {
            points: points.to_vec(),
            color,
        });
    }

    fn text(&mut self, text: &str, at: Point, style: &TextStyle) {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            at,
            style: *style,
        });
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgb) {
        self.ops.push(DrawOp::Circle {
            center,
            radius,
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::BLACK;

    #[test]
    fn inset_never_goes_negative() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0).inset(6.0, 6.0, 6.0, 6.0);
        assert_eq!(r.width, 0.0);
        assert_eq!(r.height, 0.0);
    }

    #[test]
    fn centered_text_is_shifted_by_half_its_width() {
        let style = TextStyle::new(10.0, BLACK).aligned(TextAlign::Center);
        let width = approx_text_width("abcd", 10.0);
        assert!((aligned_x("abcd", 50.0, &style) - (50.0 - width / 2.0)).abs() < 1e-9);
    }

    #[test]
    fn polyline_draws_one_segment_per_pair() {
        let mut canvas = RecordingCanvas::new();
        let points = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(2.0, 0.0),
        ];
        canvas.stroke_polyline(&points, BLACK, 0.3);
        assert_eq!(canvas.lines(), 2);
    }
}
