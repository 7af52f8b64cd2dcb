//! Vertical flow over a paged surface.

use crate::surface::ReportSurface;

pub const MARGIN: f64 = 15.0;
pub const COLUMN_GAP: f64 = 8.0;
/// Reserved at the bottom of every page for the footer.
pub const FOOTER_HEIGHT: f64 = 10.0;
pub const SECTION_GAP: f64 = 6.0;

/// Width of one chart cell in a two-column grid.
#[must_use]
pub fn chart_cell_width(page_width: f64) -> f64 {
    ((page_width - 2.0 * MARGIN - COLUMN_GAP) / 2.0).max(0.0)
}

/// Tracks the write position and breaks pages when a block does not fit.
pub struct PageCursor<'a, S: ReportSurface> {
    surface: &'a mut S,
    y: f64,
}

impl<'a, S: ReportSurface> PageCursor<'a, S> {
    pub fn new(surface: &'a mut S) -> Self {
        Self {
            surface,
            y: MARGIN,
        }
    }

    pub fn surface(&mut self) -> &mut S {
        &mut *self.surface
    }

    #[must_use]
    pub fn y(&self) -> f64 {
        self.y
    }

    #[must_use]
    pub fn left(&self) -> f64 {
        MARGIN
    }

    #[must_use]
    pub fn content_width(&self) -> f64 {
        self.surface.page_size().0 - 2.0 * MARGIN
    }

    /// Vertical space usable on an empty page.
    #[must_use]
    pub fn page_body(&self) -> f64 {
        self.surface.page_size().1 - 2.0 * MARGIN - FOOTER_HEIGHT
    }

    #[must_use]
    pub fn remaining(&self) -> f64 {
        self.surface.page_size().1 - MARGIN - FOOTER_HEIGHT - self.y
    }

    fn at_page_top(&self) -> bool {
        self.y <= MARGIN
    }

    /// Starts a new page unless `height` fits in what is left. A block
    /// taller than a whole page is placed at the top of a fresh one.
    pub fn ensure(&mut self, height: f64) {
        if self.remaining() < height && !self.at_page_top() {
            self.new_page();
        }
    }

    pub fn new_page(&mut self) {
        self.surface.add_page();
        self.y = MARGIN;
    }

    pub fn advance(&mut self, dy: f64) {
        self.y += dy;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;

    #[test]
    fn a4_portrait_cell_width() {
        assert!((chart_cell_width(210.0) - 86.0).abs() < 1e-9);
        assert!((chart_cell_width(297.0) - 129.5).abs() < 1e-9);
    }

    #[test]
    fn ensure_breaks_only_when_block_does_not_fit() {
        let mut surface = RecordingSurface::new(210.0, 297.0);
        let mut cursor = PageCursor::new(&mut surface);
        cursor.advance(200.0);
        cursor.ensure(50.0);
        assert_eq!(cursor.surface().page_count(), 1);

        cursor.ensure(80.0);
        assert_eq!(cursor.surface().page_count(), 2);
        assert!((cursor.y() - MARGIN).abs() < 1e-9);
    }

    #[test]
    fn oversized_block_does_not_loop_on_empty_page() {
        let mut surface = RecordingSurface::new(210.0, 297.0);
        let mut cursor = PageCursor::new(&mut surface);
        cursor.ensure(1_000.0);
        assert_eq!(cursor.surface().page_count(), 1);
    }
}
