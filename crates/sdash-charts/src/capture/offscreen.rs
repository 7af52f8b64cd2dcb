//! A capture host with no UI: rasterizes chart specs with `plotters`.
//!
//! Charts go through the same vector renderers as the document path, drawn
//! onto a bitmap instead of a page. Labels use the first system sans-serif
//! font found in [`FONT_CANDIDATES`]; without one, charts carry shapes only.
//! Titles are laid out by the document in either case.

use std::fmt::Display;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder};
use plotters::coord::Shift;
use plotters::prelude::{
    BitMapBackend, Circle, Color, DrawingArea, DrawingBackend, IntoDrawingArea, PathElement,
    Polygon, RGBColor, Rectangle,
};
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{register_font, FontDesc, FontFamily, FontStyle};
use sdash_core::{ChartSpec, Locale};

use super::session::{OverrideRegistry, OverrideTarget};
use super::{CaptureHost, ChartHandle, RasterImage};
use crate::canvas::{Canvas, Point, Rect, TextAlign, TextStyle, MM_PER_PT};
use crate::color::Rgb;
use crate::error::ChartError;
use crate::render::{render_chart, ChartStyle};

pub const DEFAULT_WIDTH_PX: u32 = 800;
pub const DEFAULT_HEIGHT_PX: u32 = 450;

/// Width of the virtual page charts are laid out on before scaling to
/// pixels, in millimetres.
const VIRTUAL_WIDTH_MM: f64 = 160.0;

/// Regular sans-serif faces on common Linux, macOS and Windows installs.
const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Registers the first readable candidate as the sans-serif family, once
/// per process. Returns whether a font is available.
fn ensure_font() -> bool {
    static READY: OnceLock<bool> = OnceLock::new();
    *READY.get_or_init(|| {
        for path in FONT_CANDIDATES {
            let Ok(bytes) = std::fs::read(path) else {
                continue;
            };
            // plotters keeps registered fonts for the life of the process.
            let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
            let regular = register_font("sans-serif", FontStyle::Normal, bytes);
            let bold = register_font("sans-serif", FontStyle::Bold, bytes);
            if regular.is_ok() && bold.is_ok() {
                tracing::debug!(font = *path, "chart label font registered");
                return true;
            }
        }
        tracing::debug!("no chart label font found, raster charts carry no text");
        false
    })
}

pub struct OffscreenHost {
    charts: Vec<ChartSpec>,
    locale: Locale,
    width_px: u32,
    height_px: u32,
    registry: OverrideRegistry,
    plain: AtomicBool,
}

impl OffscreenHost {
    #[must_use]
    pub fn new(charts: Vec<ChartSpec>, locale: Locale) -> Self {
        Self {
            charts,
            locale,
            width_px: DEFAULT_WIDTH_PX,
            height_px: DEFAULT_HEIGHT_PX,
            registry: OverrideRegistry::new(),
            plain: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn with_size(mut self, width_px: u32, height_px: u32) -> Self {
        self.width_px = width_px;
        self.height_px = height_px;
        self
    }

    /// Whether the plain-colour override is currently applied.
    #[must_use]
    pub fn plain_colors(&self) -> bool {
        self.plain.load(Ordering::SeqCst)
    }
}

impl OverrideTarget for OffscreenHost {
    fn install_override(&self, _key: &str) {
        self.plain.store(true, Ordering::SeqCst);
    }

    fn remove_override(&self, _key: &str) {
        self.plain.store(false, Ordering::SeqCst);
    }
}

impl CaptureHost for OffscreenHost {
    fn overrides(&self) -> &OverrideRegistry {
        &self.registry
    }

    fn locate_charts(&self) -> Vec<ChartHandle> {
        self.charts
            .iter()
            .map(|c| ChartHandle {
                id: c.id.clone(),
                title: c.title.clone(),
                visible: true,
            })
            .collect()
    }

    async fn scroll_into_view(&self, _chart: &ChartHandle) -> Result<(), ChartError> {
        Ok(())
    }

    async fn rasterize(&self, chart: &ChartHandle) -> Result<RasterImage, ChartError> {
        let spec = self
            .charts
            .iter()
            .find(|c| c.id == chart.id)
            .ok_or_else(|| ChartError::Capture {
                chart_id: chart.id.clone(),
                reason: "no such chart".to_string(),
            })?;
        render_png(
            spec,
            self.width_px,
            self.height_px,
            self.locale,
            self.plain_colors(),
        )
    }
}

/// Renders `spec` to a PNG of exactly `width_px` × `height_px`.
///
/// # Errors
///
/// Returns [`ChartError::Raster`] if drawing fails and
/// [`ChartError::Encode`] if the bitmap cannot be encoded.
pub fn render_png(
    spec: &ChartSpec,
    width_px: u32,
    height_px: u32,
    locale: Locale,
    plain: bool,
) -> Result<RasterImage, ChartError> {
    if width_px == 0 || height_px == 0 {
        return Err(ChartError::EmptyImage {
            chart_id: spec.id.clone(),
            width: width_px,
            height: height_px,
        });
    }

    let mut raw = vec![0_u8; width_px as usize * height_px as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut raw, (width_px, height_px)).into_drawing_area();
        let scale = f64::from(width_px) / VIRTUAL_WIDTH_MM;
        let bounds = Rect::new(0.0, 0.0, VIRTUAL_WIDTH_MM, f64::from(height_px) / scale);
        let style = ChartStyle {
            plain,
            ..ChartStyle::default()
        };

        ensure_font();
        let mut canvas = PixelCanvas::new(&root, scale);
        render_chart(&mut canvas, spec, bounds, locale, &style);
        if let Some(reason) = canvas.error {
            return Err(ChartError::Raster(reason));
        }
        root.present()
            .map_err(|e| ChartError::Raster(e.to_string()))?;
    }

    let mut png = Vec::new();
    PngEncoder::new(&mut png)
        .write_image(&raw, width_px, height_px, ColorType::Rgb8)
        .map_err(|e| ChartError::Encode(e.to_string()))?;

    Ok(RasterImage {
        png,
        width_px,
        height_px,
    })
}

/// Maps millimetre canvas calls onto a pixel drawing area. The first
/// backend error from a shape is kept and reported after rendering; text
/// that cannot be drawn is skipped.
struct PixelCanvas<'a, DB: DrawingBackend> {
    area: &'a DrawingArea<DB, Shift>,
    scale: f64,
    error: Option<String>,
    text_failed: bool,
}

impl<'a, DB: DrawingBackend> PixelCanvas<'a, DB> {
    fn new(area: &'a DrawingArea<DB, Shift>, scale: f64) -> Self {
        Self {
            area,
            scale,
            error: None,
            text_failed: false,
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn px(&self, p: Point) -> (i32, i32) {
        (
            (p.x * self.scale).round() as i32,
            (p.y * self.scale).round() as i32,
        )
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn len_px(&self, mm: f64) -> u32 {
        (mm * self.scale).round().max(1.0) as u32
    }

    fn record<E: Display>(&mut self, result: Result<(), E>) {
        if let Err(e) = result {
            self.error.get_or_insert_with(|| e.to_string());
        }
    }
}

fn rgb(color: Rgb) -> RGBColor {
    RGBColor(color.r, color.g, color.b)
}

impl<DB: DrawingBackend> Canvas for PixelCanvas<'_, DB> {
    fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        let corners = [
            self.px(Point::new(rect.x, rect.y)),
            self.px(Point::new(rect.right(), rect.bottom())),
        ];
        let result = self.area.draw(&Rectangle::new(corners, rgb(color).filled()));
        self.record(result);
    }

    fn stroke_line(&mut self, from: Point, to: Point, color: Rgb, width_mm: f64) {
        let path = vec![self.px(from), self.px(to)];
        let style = rgb(color).stroke_width(self.len_px(width_mm));
        let result = self.area.draw(&PathElement::new(path, style));
        self.record(result);
    }

    fn fill_polygon(&mut self, points: &[Point], color: Rgb) {
        let pts: Vec<(i32, i32)> = points.iter().map(|p| self.px(*p)).collect();
        let result = self.area.draw(&Polygon::new(pts, rgb(color).filled()));
        self.record(result);
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgb) {
        #[allow(clippy::cast_possible_wrap)]
        let radius_px = self.len_px(radius) as i32;
        let result = self
            .area
            .draw(&Circle::new(self.px(center), radius_px, rgb(color).filled()));
        self.record(result);
    }

    fn text(&mut self, text: &str, at: Point, style: &TextStyle) {
        if text.is_empty() {
            return;
        }
        let font_style = if style.bold {
            FontStyle::Bold
        } else {
            FontStyle::Normal
        };
        let size_px = (style.size_pt * MM_PER_PT * self.scale).max(1.0);
        let h_pos = match style.align {
            TextAlign::Left => HPos::Left,
            TextAlign::Center => HPos::Center,
            TextAlign::Right => HPos::Right,
        };
        let plot_style = FontDesc::new(FontFamily::SansSerif, size_px, font_style)
            .color(&rgb(style.color))
            .pos(Pos::new(h_pos, VPos::Bottom));

        if let Err(e) = self.area.draw_text(text, &plot_style, self.px(at)) {
            if !self.text_failed {
                tracing::debug!(error = %e, "chart label skipped");
                self.text_failed = true;
            }
        }
    }
}
