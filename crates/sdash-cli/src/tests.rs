use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use clap::Parser;
use sdash_core::{AppConfig, Locale, Platform};
use sdash_report::{Artifact, ChartMode, ExportFormat, Orientation};

use super::*;
use crate::export::{build_request, preview_line, ChartsArg, FormatArg};

fn config() -> AppConfig {
    AppConfig {
        api_base_url: "http://localhost:9000".into(),
        log_level: "info".into(),
        locale: Locale::Es,
        api_timeout_secs: None,
        api_user_agent: "sdash-test".into(),
        api_max_retries: 0,
        api_retry_backoff_base_ms: 1,
        posts_limit: 250,
        output_dir: PathBuf::from("reports"),
        capture_settle_ms: 50,
        max_captured_charts: 4,
    }
}

fn export_args(argv: &[&str]) -> ExportArgs {
    let mut full = vec!["sdash", "export"];
    full.extend_from_slice(argv);
    match Cli::try_parse_from(full).unwrap().command {
        Some(Commands::Export { args, .. }) => args,
        other => panic!("expected export command, got {other:?}"),
    }
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["sdash"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn export_defaults_to_pdf_with_vector_charts() {
    let args = export_args(&[]);
    assert_eq!(args.format, FormatArg::Pdf);
    assert_eq!(args.charts, ChartsArg::Vector);
    assert!(args.profiles.is_empty());
    assert!(!args.landscape);
    assert!(args.locale.is_none());
}

#[test]
fn export_parses_filters() {
    let args = export_args(&[
        "--format",
        "xlsx",
        "--profile",
        "a",
        "--profile",
        "b",
        "--platform",
        "instagram",
        "--from",
        "2025-01-01",
        "--to",
        "2025-01-31",
        "--comments",
        "--compare-previous",
    ]);
    assert_eq!(args.format, FormatArg::Xlsx);
    assert_eq!(args.profiles, vec!["a", "b"]);
    assert_eq!(args.platform, Some(Platform::Instagram));
    assert_eq!(args.from, Some(day(1)));
    assert_eq!(args.to, Some(day(31)));
    assert!(args.comments);
    assert!(args.compare_previous);
}

#[test]
fn export_accepts_an_output_directory() {
    let cli = Cli::try_parse_from(["sdash", "export", "--out", "/tmp/reports"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Export { out: Some(ref dir), .. }) if dir == &PathBuf::from("/tmp/reports")
    ));
}

#[test]
fn preview_takes_the_same_arguments() {
    let cli = Cli::try_parse_from(["sdash", "preview", "--charts", "raster", "--landscape"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Preview { ref args }) if args.charts == ChartsArg::Raster && args.landscape
    ));
}

#[test]
fn unknown_values_are_rejected() {
    assert!(Cli::try_parse_from(["sdash", "export", "--format", "docx"]).is_err());
    assert!(Cli::try_parse_from(["sdash", "export", "--platform", "myspace"]).is_err());
    assert!(Cli::try_parse_from(["sdash", "export", "--from", "01/02/2025"]).is_err());
    assert!(Cli::try_parse_from(["sdash", "preview", "--out", "x"]).is_err());
}

#[test]
fn request_combines_arguments_and_config() {
    let args = export_args(&[
        "--profile",
        "a",
        "--from",
        "2025-01-01",
        "--to",
        "2025-01-31",
        "--charts",
        "none",
        "--landscape",
        "--title",
        "Enero",
        "--locale",
        "en",
    ]);
    let request = build_request(&config(), &args).unwrap();

    assert_eq!(request.format, ExportFormat::Pdf);
    assert_eq!(request.filters.profile_ids, vec!["a"]);
    assert_eq!(request.filters.posts_limit, 250);
    assert_eq!(request.filters.date_from, Some(day(1)));
    assert_eq!(request.pdf.orientation, Orientation::Landscape);
    assert_eq!(request.pdf.chart_mode, ChartMode::None);
    assert_eq!(request.title.as_deref(), Some("Enero"));
    assert_eq!(request.locale, Locale::En);
    assert_eq!(request.capture.max_charts, 4);
    assert_eq!(request.capture.settle, Duration::from_millis(50));
}

#[test]
fn request_falls_back_to_configured_locale() {
    let request = build_request(&config(), &export_args(&[])).unwrap();
    assert_eq!(request.locale, Locale::Es);
    assert!(request.source_label.is_none());
}

#[test]
fn reversed_period_is_refused() {
    let args = export_args(&["--from", "2025-01-31", "--to", "2025-01-01"]);
    let err = build_request(&config(), &args).unwrap_err();
    assert!(err.to_string().contains("must not be after"));
}

#[test]
fn preview_line_summarizes_the_artifact() {
    let mut artifact = Artifact {
        file_name: "dashboard-reporte-2025-02-01.xlsx".into(),
        format: ExportFormat::Xlsx,
        bytes: vec![0; 2048],
        warnings: Vec::new(),
    };
    assert_eq!(
        preview_line(&artifact),
        "dashboard-reporte-2025-02-01.xlsx (xlsx, 2048 bytes)"
    );

    artifact.warnings = vec!["a".into(), "b".into()];
    assert!(preview_line(&artifact).ends_with("2048 bytes, 2 warnings)"));
}
