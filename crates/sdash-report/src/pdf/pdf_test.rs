use chrono::{NaiveDate, TimeZone, Utc};
use sdash_core::{
    engagement_rate, ChartDatum, ChartKind, ChartSpec, KpiData, KpiFormat, Platform,
    PlatformMetrics, Post, SentimentCounts, SentimentDistribution,
};

use super::*;
use crate::surface::RecordingSurface;

fn post(i: usize) -> Post {
    let interactions = 100 - i as u64;
    Post {
        id: format!("p{i}"),
        platform: Platform::Instagram,
        date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        caption: format!("Post {i} with a caption that runs well past forty characters"),
        reach: interactions * 3,
        impressions: interactions * 4,
        interactions,
        likes: interactions,
        comments: 0,
        shares: None,
        saves: None,
        sentiment_score: 0.5,
        engagement_rate: engagement_rate(interactions, interactions * 3),
    }
}

fn chart(id: &str, kind: ChartKind) -> ChartSpec {
    ChartSpec {
        id: id.into(),
        title: format!("Chart {id}"),
        kind,
        x_label: "Fecha".into(),
        data: vec![ChartDatum::new("a", 3.0), ChartDatum::new("b", 5.0)],
    }
}

fn full() -> ExportData {
    let mut data = ExportData::empty(
        "Reporte enero",
        Utc.with_ymd_and_hms(2025, 2, 1, 9, 30, 0).unwrap(),
        Locale::Es,
    );
    data.date_range = Some("01/01/2025 - 31/01/2025".into());
    data.source = Some("Analytics API".into());
    data.kpis = vec![
        KpiData::new("Publicaciones", 25.0, 20.0, KpiFormat::Number),
        KpiData::new("Tasa de engagement", 4.5, 0.0, KpiFormat::Percentage),
    ];
    data.platforms = vec![PlatformMetrics {
        platform: Platform::Instagram,
        reach: 3000,
        impressions: 4000,
        interactions: 1000,
        likes: 900,
        comments: 50,
        shares: 50,
        engagement_rate: 33.3,
        trend: Vec::new(),
    }];
    data.sentiment = Some(SentimentDistribution::from_counts(SentimentCounts {
        total: 15,
        positive: 8,
        neutral: 3,
        negative: 4,
    }));
    data.posts = (0..25).map(post).collect();
    data.charts = vec![
        chart("line", ChartKind::Line),
        chart("bar", ChartKind::Bar),
        chart("donut", ChartKind::Donut),
        chart("bar-2", ChartKind::Bar),
        chart("bar-3", ChartKind::Bar),
    ];
    data
}

fn position(texts: &[&str], needle: &str) -> usize {
    texts
        .iter()
        .position(|t| *t == needle)
        .unwrap_or_else(|| panic!("{needle:?} not drawn"))
}

#[test]
fn sections_follow_report_order() {
    let data = full();
    let mut surface = RecordingSurface::new(A4_WIDTH_MM, A4_HEIGHT_MM);
    let outcome = layout_report(&mut surface, &data, ChartMode::Vector, &[]);
    assert_eq!(outcome.charts, Some(ChartStrategy::Vector));

    let texts = surface.texts();
    let order = [
        "Reporte enero",
        "Periodo: 01/01/2025 - 31/01/2025  |  Fuente: Analytics API",
        "Gráficos",
        "Indicadores clave",
        "Métricas por plataforma",
        "Sentimiento",
        "Publicaciones destacadas",
    ];
    let positions: Vec<usize> = order.iter().map(|t| position(&texts, t)).collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");
}

#[test]
fn top_posts_table_is_capped_and_truncated() {
    let data = full();
    let mut surface = RecordingSurface::new(A4_WIDTH_MM, A4_HEIGHT_MM);
    layout_report(&mut surface, &data, ChartMode::None, &[]);

    let texts = surface.texts();
    let captions: Vec<&&str> = texts.iter().filter(|t| t.starts_with("Post ")).collect();
    assert_eq!(captions.len(), MAX_POST_ROWS);
    assert_eq!(
        *captions[0],
        "Post 0 with a caption that runs well pas..."
    );
    assert!(!texts.iter().any(|t| t.starts_with("Post 20 ")));
}

#[test]
fn kpi_rows_are_formatted() {
    let data = full();
    let mut surface = RecordingSurface::new(A4_WIDTH_MM, A4_HEIGHT_MM);
    layout_report(&mut surface, &data, ChartMode::None, &[]);

    let texts = surface.texts();
    let row = position(&texts, "Publicaciones");
    assert_eq!(&texts[row..row + 4], &["Publicaciones", "25", "20", "+25,0%"]);
    assert!(texts.contains(&"4,50%"));
}

#[test]
fn every_page_gets_a_numbered_footer() {
    let data = full();
    let mut surface = RecordingSurface::new(A4_WIDTH_MM, A4_HEIGHT_MM);
    let outcome = layout_report(&mut surface, &data, ChartMode::Vector, &[]);
    assert!(outcome.pages >= 2);
    assert_eq!(outcome.pages, surface.page_count());

    for page in 0..outcome.pages {
        let footer = *surface.texts_on(page).last().unwrap();
        let expected = format!(
            "Página {} de {} · 2025-02-01 09:30 UTC",
            page + 1,
            outcome.pages
        );
        assert_eq!(footer, expected);
    }
}

#[test]
fn absent_sentiment_is_omitted() {
    let mut data = full();
    data.sentiment = None;
    let mut surface = RecordingSurface::new(A4_WIDTH_MM, A4_HEIGHT_MM);
    layout_report(&mut surface, &data, ChartMode::None, &[]);

    let texts = surface.texts();
    assert!(!texts.contains(&"Sentimiento"));
    assert!(!texts.contains(&"Gráficos"));
}

#[test]
fn empty_export_is_a_title_and_footer() {
    let data = ExportData::empty("Vacío", Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap(), Locale::En);
    let mut surface = RecordingSurface::new(A4_WIDTH_MM, A4_HEIGHT_MM);
    let outcome = layout_report(&mut surface, &data, ChartMode::Vector, &[]);

    assert_eq!(outcome, LayoutOutcome { pages: 1, charts: None });
    assert_eq!(
        surface.texts(),
        vec!["Vacío", "Page 1 of 1 · 2025-02-01 00:00 UTC"]
    );
}

#[test]
fn empty_export_renders_a_pdf() {
    let data = ExportData::empty("Vacío", Utc::now(), Locale::Es);
    let bytes = render_pdf(&data, &PdfOptions::default(), &[]).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn full_export_renders_a_landscape_pdf() {
    let options = PdfOptions {
        orientation: Orientation::Landscape,
        chart_mode: ChartMode::Vector,
    };
    let bytes = render_pdf(&full(), &options, &[]).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
    assert_eq!(Orientation::Landscape.page_size(), (297.0, 210.0));
}
