//! The `printpdf` page surface.

use std::io::Cursor;

use printpdf::image_crate::codecs::png::PngDecoder;
use printpdf::image_crate::ImageDecoder;
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerIndex, PdfLayerReference, PdfPageIndex, Polygon,
};
use printpdf::path::{PaintMode, WindingOrder};
use sdash_charts::canvas::{aligned_x, MM_PER_PT};
use sdash_charts::{Canvas, Point, Rect, Rgb, TextStyle};

use crate::error::ReportError;
use crate::surface::ReportSurface;

const LAYER: &str = "content";
/// Resolution images are embedded at before scaling to their cell.
const IMAGE_DPI: f32 = 300.0;

pub struct PdfSurface {
    doc: PdfDocumentReference,
    pages: Vec<(PdfPageIndex, PdfLayerIndex)>,
    current: usize,
    width: f64,
    height: f64,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl PdfSurface {
    /// A document with one empty page of `width` × `height` millimetres.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Pdf`] if the builtin fonts cannot be added.
    pub fn new(title: &str, width: f64, height: f64) -> Result<Self, ReportError> {
        let (doc, page, layer) = PdfDocument::new(pdf_text(title), mm(width), mm(height), LAYER);
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ReportError::Pdf(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ReportError::Pdf(e.to_string()))?;
        Ok(Self {
            doc,
            pages: vec![(page, layer)],
            current: 0,
            width,
            height,
            regular,
            bold,
        })
    }

    /// Serializes the document.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Pdf`] if the document cannot be written.
    pub fn finish(self) -> Result<Vec<u8>, ReportError> {
        self.doc
            .save_to_bytes()
            .map_err(|e| ReportError::Pdf(e.to_string()))
    }

    fn layer(&self) -> PdfLayerReference {
        let (page, layer) = self.pages[self.current];
        self.doc.get_page(page).get_layer(layer)
    }

    /// Top-left millimetres to the document's bottom-left origin.
    fn point(&self, p: Point) -> printpdf::Point {
        printpdf::Point::new(mm(p.x), mm(self.height - p.y))
    }
}

#[allow(clippy::cast_possible_truncation)]
fn mm(value: f64) -> Mm {
    Mm(value as f32)
}

fn color(rgb: Rgb) -> Color {
    let (r, g, b) = rgb.to_unit();
    Color::Rgb(printpdf::Rgb::new(r, g, b, None))
}

/// Builtin fonts only cover ASCII reliably; accented letters are folded
/// and anything else becomes `?`.
#[must_use]
pub fn pdf_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            c if c.is_ascii() => out.push(c),
            'á' | 'à' | 'ä' | 'â' | 'ã' => out.push('a'),
            'Á' | 'À' | 'Ä' | 'Â' | 'Ã' => out.push('A'),
            'é' | 'è' | 'ë' | 'ê' => out.push('e'),
            'É' | 'È' | 'Ë' | 'Ê' => out.push('E'),
            'í' | 'ì' | 'ï' | 'î' => out.push('i'),
            'Í' | 'Ì' | 'Ï' | 'Î' => out.push('I'),
            'ó' | 'ò' | 'ö' | 'ô' | 'õ' => out.push('o'),
            'Ó' | 'Ò' | 'Ö' | 'Ô' | 'Õ' => out.push('O'),
            'ú' | 'ù' | 'ü' | 'û' => out.push('u'),
            'Ú' | 'Ù' | 'Ü' | 'Û' => out.push('U'),
            'ñ' => out.push('n'),
            'Ñ' => out.push('N'),
            'ç' => out.push('c'),
            'Ç' => out.push('C'),
            '¿' | '¡' => {}
            '·' | '–' | '—' => out.push('-'),
            '€' => out.push_str("EUR"),
            '\u{2018}' | '\u{2019}' => out.push('\''),
            '\u{201C}' | '\u{201D}' => out.push('"'),
            '\u{2026}' => out.push_str("..."),
            _ => out.push('?'),
        }
    }
    out
}

impl Canvas for PdfSurface {
    fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        let corners = [
            Point::new(rect.x, rect.y),
            Point::new(rect.right(), rect.y),
            Point::new(rect.right(), rect.bottom()),
            Point::new(rect.x, rect.bottom()),
        ];
        self.fill_polygon(&corners, color);
    }

    #[allow(clippy::cast_possible_truncation)]
    fn stroke_line(&mut self, from: Point, to: Point, rgb: Rgb, width_mm: f64) {
        let layer = self.layer();
        layer.set_outline_color(color(rgb));
        layer.set_outline_thickness((width_mm / MM_PER_PT) as f32);
        layer.add_line(Line {
            points: vec![(self.point(from), false), (self.point(to), false)],
            is_closed: false,
        });
    }

    fn fill_polygon(&mut self, points: &[Point], rgb: Rgb) {
        if points.len() < 3 {
            return;
        }
        let layer = self.layer();
        layer.set_fill_color(color(rgb));
        layer.add_polygon(Polygon {
            rings: vec![points.iter().map(|p| (self.point(*p), false)).collect()],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        });
    }

    #[allow(clippy::cast_possible_truncation)]
    fn text(&mut self, text: &str, at: Point, style: &TextStyle) {
        let text = pdf_text(text);
        let x = aligned_x(&text, at.x, style);
        let font = if style.bold { &self.bold } else { &self.regular };
        let layer = self.layer();
        layer.set_fill_color(color(style.color));
        layer.use_text(text, style.size_pt as f32, mm(x), mm(self.height - at.y), font);
    }
}

impl ReportSurface for PdfSurface {
    fn page_size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn add_page(&mut self) {
        let (page, layer) = self.doc.add_page(mm(self.width), mm(self.height), LAYER);
        self.pages.push((page, layer));
        self.current = self.pages.len() - 1;
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn select_page(&mut self, index: usize) {
        self.current = index.min(self.pages.len() - 1);
    }

    fn check_image(&self, png: &[u8]) -> Result<(), ReportError> {
        PngDecoder::new(Cursor::new(png))
            .map(|_| ())
            .map_err(|e| ReportError::Image(e.to_string()))
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn draw_image(&mut self, png: &[u8], rect: Rect) -> Result<(), ReportError> {
        let decoder =
            PngDecoder::new(Cursor::new(png)).map_err(|e| ReportError::Image(e.to_string()))?;
        let (width_px, height_px) = decoder.dimensions();
        if width_px == 0 || height_px == 0 {
            return Err(ReportError::Image("image has no pixels".into()));
        }
        let image = Image::try_from(decoder).map_err(|e| ReportError::Image(e.to_string()))?;

        // natural size at IMAGE_DPI, in millimetres
        let natural_w = width_px as f32 / IMAGE_DPI * 25.4;
        let natural_h = height_px as f32 / IMAGE_DPI * 25.4;
        image.add_to_layer(
            self.layer(),
            ImageTransform {
                translate_x: Some(mm(rect.x)),
                translate_y: Some(mm(self.height - rect.bottom())),
                scale_x: Some(rect.width as f32 / natural_w),
                scale_y: Some(rect.height as f32 / natural_h),
                dpi: Some(IMAGE_DPI),
                ..ImageTransform::default()
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_text_folds_accents() {
        assert_eq!(pdf_text("Página 1 de 2 · Días"), "Pagina 1 de 2 - Dias");
        assert_eq!(pdf_text("¿Año? 10 €"), "Ano? 10 EUR");
        assert_eq!(pdf_text("日本"), "??");
    }

    #[test]
    fn writes_a_pdf_with_every_page() {
        let mut surface = PdfSurface::new("Reporte", 210.0, 297.0).unwrap();
        surface.fill_rect(Rect::new(10.0, 10.0, 50.0, 20.0), Rgb::new(59, 130, 246));
        surface.stroke_line(
            Point::new(10.0, 40.0),
            Point::new(100.0, 40.0),
            Rgb::new(0, 0, 0),
            0.3,
        );
        surface.text("Título", Point::new(15.0, 20.0), &TextStyle::new(12.0, Rgb::new(0, 0, 0)));
        surface.add_page();
        assert_eq!(surface.page_count(), 2);

        let bytes = surface.finish().unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn rejects_non_png_images() {
        let surface = PdfSurface::new("Reporte", 210.0, 297.0).unwrap();
        assert!(matches!(
            surface.check_image(b"not a png"),
            Err(ReportError::Image(_))
        ));
    }

    #[test]
    fn embeds_png_images() {
        let spec = sdash_core::ChartSpec {
            id: "tiers".into(),
            title: "Tiers".into(),
            kind: sdash_core::ChartKind::Bar,
            x_label: String::new(),
            data: vec![sdash_core::ChartDatum::new("High", 2.0)],
        };
        let raster = sdash_charts::capture::offscreen::render_png(
            &spec,
            200,
            100,
            sdash_core::Locale::En,
            false,
        )
        .unwrap();

        let mut surface = PdfSurface::new("Reporte", 210.0, 297.0).unwrap();
        surface
            .draw_image(&raster.png, Rect::new(15.0, 15.0, 86.0, 43.0))
            .unwrap();
        assert!(surface.finish().unwrap().starts_with(b"%PDF"));
    }
}
