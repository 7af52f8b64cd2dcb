//! Paged drawing surfaces.
//!
//! The document layout draws onto a [`ReportSurface`]: a [`Canvas`] that
//! also knows about pages and embedded images. [`crate::pdf::PdfSurface`] is
//! the real sink; [`RecordingSurface`] keeps every call for inspection.

use sdash_charts::{Canvas, DrawOp, Point, Rect, Rgb, TextStyle};

use crate::error::ReportError;

/// A canvas split into fixed-size pages. A surface starts with one page.
pub trait ReportSurface: Canvas {
    /// Page width and height in millimetres.
    fn page_size(&self) -> (f64, f64);

    /// Appends a page and makes it current.
    fn add_page(&mut self);

    fn page_count(&self) -> usize;

    /// Makes the 0-based page `index` current.
    fn select_page(&mut self, index: usize);

    /// Checks that a PNG can be embedded, without placing it.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Image`] if the image cannot be decoded.
    fn check_image(&self, png: &[u8]) -> Result<(), ReportError>;

    /// Places a PNG stretched to `rect`.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Image`] if the image cannot be decoded.
    fn draw_image(&mut self, png: &[u8], rect: Rect) -> Result<(), ReportError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    Draw(DrawOp),
    Image { rect: Rect, bytes: usize },
}

/// A surface that records operations per page.
#[derive(Debug)]
pub struct RecordingSurface {
    width: f64,
    height: f64,
    pages: Vec<Vec<SurfaceOp>>,
    current: usize,
    /// Reject every image, as a sink that cannot decode them would.
    pub reject_images: bool,
    /// Accept images on check but fail when one is placed.
    pub fail_image_draws: bool,
}

impl RecordingSurface {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            pages: vec![Vec::new()],
            current: 0,
            reject_images: false,
            fail_image_draws: false,
        }
    }

    #[must_use]
    pub fn page(&self, index: usize) -> &[SurfaceOp] {
        &self.pages[index]
    }

    /// Text drawn on page `index`, in drawing order.
    #[must_use]
    pub fn texts_on(&self, index: usize) -> Vec<&str> {
        self.pages[index]
            .iter()
            .filter_map(|op| match op {
                SurfaceOp::Draw(DrawOp::Text { text, .. }) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Text drawn on every page, page by page.
    #[must_use]
    pub fn texts(&self) -> Vec<&str> {
        (0..self.pages.len()).flat_map(|i| self.texts_on(i)).collect()
    }

    #[must_use]
    pub fn images(&self) -> usize {
        self.pages
            .iter()
            .flatten()
            .filter(|op| matches!(op, SurfaceOp::Image { .. }))
            .count()
    }

    fn push(&mut self, op: DrawOp) {
        self.pages[self.current].push(SurfaceOp::Draw(op));
    }
}

impl Canvas for RecordingSurface {
    fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        self.push(DrawOp::Rect { rect, color });
    }

    fn stroke_line(&mut self, from: Point, to: Point, color: Rgb, width: f64) {
        self.push(DrawOp::Line {
            from,
            to,
            color,
            width,
        });
    }

    fn fill_polygon(&mut self, points: &[Point], color: Rgb) {
        self.push(DrawOp::Polygon {
            points: points.to_vec(),
            color,
        });
    }

    fn text(&mut self, text: &str, at: Point, style: &TextStyle) {
        self.push(DrawOp::Text {
            text: text.to_string(),
            at,
            style: *style,
        });
    }
}

impl ReportSurface for RecordingSurface {
    fn page_size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn add_page(&mut self) {
        self.pages.push(Vec::new());
        self.current = self.pages.len() - 1;
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn select_page(&mut self, index: usize) {
        self.current = index.min(self.pages.len() - 1);
    }

    fn check_image(&self, _png: &[u8]) -> Result<(), ReportError> {
        if self.reject_images {
            return Err(ReportError::Image("image rejected by surface".into()));
        }
        Ok(())
    }

    fn draw_image(&mut self, png: &[u8], rect: Rect) -> Result<(), ReportError> {
        self.check_image(png)?;
        if self.fail_image_draws {
            return Err(ReportError::Image("image could not be placed".into()));
        }
        self.pages[self.current].push(SurfaceOp::Image {
            rect,
            bytes: png.len(),
        });
        Ok(())
    }
}
