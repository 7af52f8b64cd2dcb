//! Multi-sheet workbook output.
//!
//! One sheet per section, each a header row followed by data rows. Numbers
//! are written raw so the workbook stays analyzable; no charts.

use rust_xlsxwriter::{ColNum, Format, RowNum, Workbook, Worksheet};
use sdash_core::ExportData;

use crate::error::ReportError;
use crate::labels::labels;

const MIN_COLUMN_WIDTH: f64 = 10.0;
const MAX_COLUMN_WIDTH: f64 = 60.0;

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<u64> for Cell {
    #[allow(clippy::cast_precision_loss)]
    fn from(value: u64) -> Self {
        Cell::Number(value as f64)
    }
}

impl From<Option<u64>> for Cell {
    fn from(value: Option<u64>) -> Self {
        value.map_or(Cell::Empty, Cell::from)
    }
}

/// One sheet before it is written.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetPlan {
    pub name: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

/// The sheets `data` produces, in workbook order. Sections without rows are
/// left out; the summary sheet is always present.
#[must_use]
pub fn plan_workbook(data: &ExportData) -> Vec<SheetPlan> {
    let l = labels(data.locale);
    let mut sheets = Vec::new();

    if !data.kpis.is_empty() {
        sheets.push(SheetPlan {
            name: l.sheet_kpis.into(),
            header: headers(&[l.indicator, l.value, l.previous, l.change, l.trend]),
            rows: data
                .kpis
                .iter()
                .map(|k| {
                    vec![
                        k.label.as_str().into(),
                        k.value.into(),
                        k.previous_value.into(),
                        round2(k.change).into(),
                        l.change_type(k.change_type).into(),
                    ]
                })
                .collect(),
        });
    }

    if !data.platforms.is_empty() {
        sheets.push(SheetPlan {
            name: l.sheet_platforms.into(),
            header: headers(&[
                l.platform,
                l.reach,
                l.impressions,
                l.interactions,
                l.likes,
                l.comments,
                l.shares,
                l.engagement,
            ]),
            rows: data
                .platforms
                .iter()
                .map(|m| {
                    vec![
                        m.platform.label().into(),
                        m.reach.into(),
                        m.impressions.into(),
                        m.interactions.into(),
                        m.likes.into(),
                        m.comments.into(),
                        m.shares.into(),
                        round2(m.engagement_rate).into(),
                    ]
                })
                .collect(),
        });
    }

    if !data.posts.is_empty() {
        sheets.push(SheetPlan {
            name: l.sheet_posts.into(),
            header: headers(&[
                l.id,
                l.platform,
                l.date,
                l.text,
                l.reach,
                l.impressions,
                l.interactions,
                l.likes,
                l.comments,
                l.shares,
                l.saves,
                l.sentiment,
                l.engagement,
            ]),
            rows: data
                .posts
                .iter()
                .map(|p| {
                    vec![
                        p.id.as_str().into(),
                        p.platform.label().into(),
                        p.date.format("%Y-%m-%d").to_string().into(),
                        p.caption.as_str().into(),
                        p.reach.into(),
                        p.impressions.into(),
                        p.interactions.into(),
                        p.likes.into(),
                        p.comments.into(),
                        p.shares.into(),
                        p.saves.into(),
                        round2(p.sentiment_score).into(),
                        round2(p.engagement_rate).into(),
                    ]
                })
                .collect(),
        });
    }

    if let Some(sentiment) = &data.sentiment {
        sheets.push(SheetPlan {
            name: l.sheet_sentiment.into(),
            header: headers(&[l.sentiment, l.percentage]),
            rows: vec![
                vec![l.positive.into(), round2(sentiment.positive).into()],
                vec![l.neutral.into(), round2(sentiment.neutral).into()],
                vec![l.negative.into(), round2(sentiment.negative).into()],
                vec![l.total.into(), sentiment.total.into()],
            ],
        });
    }

    let mut summary: Vec<Vec<Cell>> = vec![
        vec![l.title.into(), data.title.as_str().into()],
        vec![
            l.generated.into(),
            data.generated_at
                .format("%Y-%m-%d %H:%M:%S UTC")
                .to_string()
                .into(),
        ],
    ];
    if let Some(range) = &data.date_range {
        summary.push(vec![l.period.into(), range.as_str().into()]);
    }
    if let Some(source) = &data.source {
        summary.push(vec![l.source.into(), source.as_str().into()]);
    }
    summary.push(vec![l.posts.into(), (data.posts.len() as u64).into()]);
    summary.push(vec![
        l.platforms.into(),
        data.platforms
            .iter()
            .map(|m| m.platform.label())
            .collect::<Vec<_>>()
            .join(", ")
            .into(),
    ]);
    sheets.push(SheetPlan {
        name: l.sheet_summary.into(),
        header: headers(&[l.field, l.value]),
        rows: summary,
    });

    sheets
}

fn headers(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| (*n).to_string()).collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Writes `data` as an `.xlsx` workbook.
///
/// # Errors
///
/// Returns [`ReportError::Workbook`] if a sheet cannot be written and
/// [`ReportError::TooManyRows`] if a section exceeds the sheet limits.
pub fn render_workbook(data: &ExportData) -> Result<Vec<u8>, ReportError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    for plan in plan_workbook(data) {
        let sheet = write_sheet(&plan, &bold)?;
        workbook.push_worksheet(sheet);
    }
    Ok(workbook.save_to_buffer()?)
}

fn write_sheet(plan: &SheetPlan, bold: &Format) -> Result<Worksheet, ReportError> {
    let too_many = || ReportError::TooManyRows {
        sheet: plan.name.clone(),
        rows: plan.rows.len(),
    };

    let mut sheet = Worksheet::new();
    sheet.set_name(&plan.name)?;

    let mut widths: Vec<usize> = plan.header.iter().map(|h| h.chars().count()).collect();
    for (col, header) in plan.header.iter().enumerate() {
        let col = ColNum::try_from(col).map_err(|_| too_many())?;
        sheet.write_string_with_format(0, col, header, bold)?;
    }

    for (index, row) in plan.rows.iter().enumerate() {
        let r = RowNum::try_from(index + 1).map_err(|_| too_many())?;
        for (col, cell) in row.iter().enumerate() {
            let c = ColNum::try_from(col).map_err(|_| too_many())?;
            match cell {
                Cell::Text(text) => {
                    sheet.write_string(r, c, text)?;
                    if let Some(w) = widths.get_mut(col) {
                        *w = (*w).max(text.chars().count());
                    }
                }
                Cell::Number(n) => {
                    sheet.write_number(r, c, *n)?;
                }
                Cell::Empty => {}
            }
        }
    }

    for (col, width) in widths.into_iter().enumerate() {
        let col = ColNum::try_from(col).map_err(|_| too_many())?;
        #[allow(clippy::cast_precision_loss)]
        let width = (width as f64 + 2.0).clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH);
        sheet.set_column_width(col, width)?;
    }
    Ok(sheet)
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};
    use sdash_core::{
        KpiData, KpiFormat, Locale, Platform, Post, SentimentCounts, SentimentDistribution,
    };

    use super::*;

    fn empty() -> ExportData {
        ExportData::empty(
            "Reporte",
            Utc.with_ymd_and_hms(2025, 2, 1, 9, 0, 0).unwrap(),
            Locale::Es,
        )
    }

    fn post() -> Post {
        Post {
            id: "p1".into(),
            platform: Platform::Tiktok,
            date: NaiveDate::from_ymd_opt(2025, 1, 3).unwrap(),
            caption: "Nuevo producto".into(),
            reach: 250,
            impressions: 300,
            interactions: 100,
            likes: 80,
            comments: 20,
            shares: None,
            saves: Some(4),
            sentiment_score: 0.75,
            engagement_rate: 40.0,
        }
    }

    fn names(plans: &[SheetPlan]) -> Vec<&str> {
        plans.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn empty_export_has_only_the_summary() {
        let plans = plan_workbook(&empty());
        assert_eq!(names(&plans), vec!["Resumen"]);
        assert_eq!(plans[0].header, vec!["Campo", "Valor"]);
        assert_eq!(plans[0].rows[0], vec![Cell::from("Título"), Cell::from("Reporte")]);
    }

    #[test]
    fn sections_map_to_sheets_in_order() {
        let mut data = empty();
        data.kpis = vec![KpiData::new("Publicaciones", 10.0, 5.0, KpiFormat::Number)];
        data.posts = vec![post()];
        data.platforms = crate::build::platform_metrics(&data.posts);
        data.sentiment = Some(SentimentDistribution::from_counts(SentimentCounts {
            total: 4,
            positive: 2,
            neutral: 1,
            negative: 1,
        }));

        let plans = plan_workbook(&data);
        assert_eq!(
            names(&plans),
            vec!["KPIs", "Plataformas", "Publicaciones", "Sentimiento", "Resumen"]
        );

        let kpis = &plans[0];
        assert_eq!(kpis.rows[0][3], Cell::Number(100.0));
        assert_eq!(kpis.rows[0][4], Cell::from("Positivo"));

        let posts = &plans[2];
        assert_eq!(posts.header.len(), posts.rows[0].len());
        assert_eq!(posts.rows[0][2], Cell::from("2025-01-03"));
        assert_eq!(posts.rows[0][9], Cell::Empty);
        assert_eq!(posts.rows[0][10], Cell::Number(4.0));

        let sentiment = &plans[3];
        assert_eq!(sentiment.rows[0][1], Cell::Number(50.0));
        assert_eq!(sentiment.rows[3][1], Cell::Number(4.0));
    }

    #[test]
    fn summary_lists_optional_metadata() {
        let mut data = empty();
        data.source = Some("API".into());
        let summary = plan_workbook(&data).pop().unwrap();
        let fields: Vec<&Cell> = summary.rows.iter().map(|r| &r[0]).collect();
        assert!(fields.contains(&&Cell::from("Fuente")));
        assert!(!fields.contains(&&Cell::from("Periodo")));
    }

    #[test]
    fn writes_a_zip_container() {
        let mut data = empty();
        data.posts = vec![post()];
        let bytes = render_workbook(&data).unwrap();
        assert!(bytes.starts_with(b"PK"));

        let bytes = render_workbook(&empty()).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }
}
