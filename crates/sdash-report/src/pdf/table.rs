//! Simple ruled tables with a heading and a shaded header row.

use sdash_charts::{Point, Rect, Rgb, TextAlign, TextStyle};

use super::layout::PageCursor;
use crate::surface::ReportSurface;

pub const ROW_HEIGHT: f64 = 6.0;
pub const HEADING_HEIGHT: f64 = 8.0;
const CELL_PADDING: f64 = 1.5;
const BASELINE: f64 = 4.2;
const BODY_PT: f64 = 8.0;
const HEADING_PT: f64 = 12.0;

const HEADER_FILL: Rgb = Rgb::new(243, 244, 246);
const STRIPE_FILL: Rgb = Rgb::new(249, 250, 251);
const RULE: Rgb = Rgb::new(209, 213, 219);
const INK: Rgb = Rgb::new(17, 24, 39);

#[derive(Debug, Clone)]
pub struct Column {
    pub header: String,
    /// Share of the table width, relative to the other columns.
    pub weight: f64,
    pub align: TextAlign,
}

impl Column {
    pub fn left(header: impl Into<String>, weight: f64) -> Self {
        Self {
            header: header.into(),
            weight,
            align: TextAlign::Left,
        }
    }

    pub fn right(header: impl Into<String>, weight: f64) -> Self {
        Self {
            header: header.into(),
            weight,
            align: TextAlign::Right,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Table {
    pub heading: String,
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Heading, header row and every data row.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn required_height(&self) -> f64 {
        HEADING_HEIGHT + ROW_HEIGHT * (self.rows.len() + 1) as f64
    }

    /// Left edge and width of each column across `width`.
    fn column_spans(&self, left: f64, width: f64) -> Vec<(f64, f64)> {
        let total: f64 = self.columns.iter().map(|c| c.weight).sum();
        let mut x = left;
        self.columns
            .iter()
            .map(|c| {
                let w = if total > 0.0 {
                    width * c.weight / total
                } else {
                    0.0
                };
                let span = (x, w);
                x += w;
                span
            })
            .collect()
    }
}

/// Draws `table` at the cursor.
///
/// The whole table moves to a new page when it does not fit. A table longer
/// than a page continues on the next one with its header row repeated.
pub fn draw_table<S: ReportSurface>(cursor: &mut PageCursor<'_, S>, table: &Table) {
    cursor.ensure(table.required_height().min(cursor.page_body()));

    let heading = TextStyle::new(HEADING_PT, INK).bold();
    let (x, y) = (cursor.left(), cursor.y());
    cursor.surface().text(&table.heading, Point::new(x, y + 5.5), &heading);
    cursor.advance(HEADING_HEIGHT);

    let spans = table.column_spans(cursor.left(), cursor.content_width());
    draw_header(cursor, table, &spans);

    for (index, row) in table.rows.iter().enumerate() {
        if cursor.remaining() < ROW_HEIGHT {
            cursor.new_page();
            draw_header(cursor, table, &spans);
        }
        let y = cursor.y();
        let width = cursor.content_width();
        let surface = cursor.surface();
        if index % 2 == 1 {
            surface.fill_rect(Rect::new(spans[0].0, y, width, ROW_HEIGHT), STRIPE_FILL);
        }
        let body = TextStyle::new(BODY_PT, INK);
        draw_cells(surface, table, &spans, row, y, body);
        surface.stroke_line(
            Point::new(spans[0].0, y + ROW_HEIGHT),
            Point::new(spans[0].0 + width, y + ROW_HEIGHT),
            RULE,
            0.1,
        );
        cursor.advance(ROW_HEIGHT);
    }
    cursor.advance(super::layout::SECTION_GAP);
}

fn draw_header<S: ReportSurface>(
    cursor: &mut PageCursor<'_, S>,
    table: &Table,
    spans: &[(f64, f64)],
) {
    let y = cursor.y();
    let width = cursor.content_width();
    let headers: Vec<String> = table.columns.iter().map(|c| c.header.clone()).collect();
    let surface = cursor.surface();
    surface.fill_rect(Rect::new(spans[0].0, y, width, ROW_HEIGHT), HEADER_FILL);
    draw_cells(
        surface,
        table,
        spans,
        &headers,
        y,
        TextStyle::new(BODY_PT, INK).bold(),
    );
    cursor.advance(ROW_HEIGHT);
}

fn draw_cells<S: ReportSurface>(
    surface: &mut S,
    table: &Table,
    spans: &[(f64, f64)],
    cells: &[String],
    y: f64,
    style: TextStyle,
) {
    for ((column, &(x, w)), cell) in table.columns.iter().zip(spans).zip(cells) {
        let at = match column.align {
            TextAlign::Left => x + CELL_PADDING,
            TextAlign::Center => x + w / 2.0,
            TextAlign::Right => x + w - CELL_PADDING,
        };
        surface.text(
            cell,
            Point::new(at, y + BASELINE),
            &style.aligned(column.align),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;

    fn table(rows: usize) -> Table {
        Table {
            heading: "Posts".into(),
            columns: vec![Column::left("Id", 1.0), Column::right("Reach", 1.0)],
            rows: (0..rows)
                .map(|i| vec![format!("post-{i}"), i.to_string()])
                .collect(),
        }
    }

    #[test]
    fn required_height_counts_heading_header_and_rows() {
        assert!((table(3).required_height() - (HEADING_HEIGHT + 4.0 * ROW_HEIGHT)).abs() < 1e-9);
    }

    #[test]
    fn columns_split_width_by_weight() {
        let t = Table {
            columns: vec![Column::left("a", 3.0), Column::left("b", 1.0)],
            ..table(0)
        };
        let spans = t.column_spans(10.0, 100.0);
        assert_eq!(spans, vec![(10.0, 75.0), (85.0, 25.0)]);
    }

    #[test]
    fn table_moves_to_next_page_when_it_does_not_fit() {
        let mut surface = RecordingSurface::new(210.0, 297.0);
        let mut cursor = PageCursor::new(&mut surface);
        cursor.advance(230.0);
        draw_table(&mut cursor, &table(5));
        drop(cursor);

        assert_eq!(surface.page_count(), 2);
        assert!(surface.texts_on(0).is_empty());
        assert_eq!(surface.texts_on(1)[0], "Posts");
    }

    #[test]
    fn long_table_repeats_header_on_next_page() {
        let mut surface = RecordingSurface::new(210.0, 297.0);
        let mut cursor = PageCursor::new(&mut surface);
        draw_table(&mut cursor, &table(60));
        drop(cursor);

        assert_eq!(surface.page_count(), 2);
        assert!(surface.texts_on(1).starts_with(&["Id", "Reach"]));
        let rows = surface
            .texts()
            .iter()
            .filter(|t| t.starts_with("post-"))
            .count();
        assert_eq!(rows, 60);
    }
}
