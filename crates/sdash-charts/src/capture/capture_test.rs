use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Instant;

use super::*;

#[derive(Default)]
struct FakeHost {
    charts: Vec<ChartHandle>,
    failing: Vec<String>,
    registry: OverrideRegistry,
    override_on: AtomicBool,
    /// Override state observed by each rasterize call.
    seen_override: Mutex<Vec<bool>>,
    scrolled: Mutex<Vec<String>>,
}

impl FakeHost {
    fn with_charts(ids: &[&str]) -> Self {
        Self {
            charts: ids
                .iter()
                .map(|id| ChartHandle {
                    id: (*id).to_string(),
                    title: format!("Chart {id}"),
                    visible: true,
                })
                .collect(),
            ..Self::default()
        }
    }
}

impl OverrideTarget for FakeHost {
    fn install_override(&self, _key: &str) {
        self.override_on.store(true, Ordering::SeqCst);
    }

    fn remove_override(&self, _key: &str) {
        self.override_on.store(false, Ordering::SeqCst);
    }
}

impl CaptureHost for FakeHost {
    fn overrides(&self) -> &OverrideRegistry {
        &self.registry
    }

    fn locate_charts(&self) -> Vec<ChartHandle> {
        self.charts.clone()
    }

    async fn scroll_into_view(&self, chart: &ChartHandle) -> Result<(), ChartError> {
        self.scrolled.lock().unwrap().push(chart.id.clone());
        Ok(())
    }

    async fn rasterize(&self, chart: &ChartHandle) -> Result<RasterImage, ChartError> {
        self.seen_override
            .lock()
            .unwrap()
            .push(self.override_on.load(Ordering::SeqCst));
        if self.failing.contains(&chart.id) {
            return Err(ChartError::Capture {
                chart_id: chart.id.clone(),
                reason: "unsupported colour function".into(),
            });
        }
        Ok(RasterImage {
            png: vec![1, 2, 3],
            width_px: 400,
            height_px: 200,
        })
    }
}

fn fast() -> CaptureOptions {
    CaptureOptions {
        settle: Duration::ZERO,
        ..CaptureOptions::default()
    }
}

#[tokio::test]
async fn captures_visible_charts_in_order() {
    let mut host = FakeHost::with_charts(&["a", "b", "c"]);
    host.charts[1].visible = false;

    let report = capture_charts(&host, &fast()).await;
    let ids: Vec<_> = report.charts.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "c"]);
    assert_eq!(*host.scrolled.lock().unwrap(), vec!["a", "c"]);
    assert_eq!(report.charts[0].title, "Chart a");
}

#[tokio::test]
async fn stops_at_max_charts() {
    let ids: Vec<String> = (0..12).map(|i| format!("chart-{i}")).collect();
    let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
    let host = FakeHost::with_charts(&refs);

    let report = capture_charts(&host, &fast()).await;
    assert_eq!(report.charts.len(), DEFAULT_MAX_CHARTS);
    assert_eq!(host.scrolled.lock().unwrap().len(), DEFAULT_MAX_CHARTS);
}

#[tokio::test]
async fn failed_chart_is_skipped() {
    let mut host = FakeHost::with_charts(&["a", "b", "c"]);
    host.failing = vec!["b".into()];

    let report = capture_charts(&host, &fast()).await;
    assert_eq!(report.charts.len(), 2);
    assert_eq!(report.failed, vec!["b".to_string()]);
}

#[tokio::test]
async fn all_failures_yield_empty_report() {
    let mut host = FakeHost::with_charts(&["a", "b"]);
    host.failing = vec!["a".into(), "b".into()];

    let report = capture_charts(&host, &fast()).await;
    assert!(report.is_empty());
    assert_eq!(report.failed.len(), 2);
}

#[tokio::test]
async fn override_is_active_during_capture_and_lifted_after() {
    let mut host = FakeHost::with_charts(&["a", "b"]);
    host.failing = vec!["b".into()];

    capture_charts(&host, &fast()).await;
    assert_eq!(*host.seen_override.lock().unwrap(), vec![true, true]);
    assert!(!host.override_on.load(Ordering::SeqCst));
    assert!(!host.registry.is_active(OVERRIDE_KEY));
}

#[tokio::test]
async fn each_chart_waits_for_the_settle_delay() {
    let host = FakeHost::with_charts(&["a", "b"]);
    let options = CaptureOptions {
        settle: Duration::from_millis(20),
        ..CaptureOptions::default()
    };

    let started = Instant::now();
    capture_charts(&host, &options).await;
    assert!(started.elapsed() >= Duration::from_millis(40));
}

#[tokio::test]
async fn empty_images_count_as_failures() {
    struct BlankHost(OverrideRegistry);

    impl OverrideTarget for BlankHost {
        fn install_override(&self, _key: &str) {}
        fn remove_override(&self, _key: &str) {}
    }

    impl CaptureHost for BlankHost {
        fn overrides(&self) -> &OverrideRegistry {
            &self.0
        }

        fn locate_charts(&self) -> Vec<ChartHandle> {
            vec![ChartHandle {
                id: "blank".into(),
                title: String::new(),
                visible: true,
            }]
        }

        async fn scroll_into_view(&self, _chart: &ChartHandle) -> Result<(), ChartError> {
            Ok(())
        }

        async fn rasterize(&self, _chart: &ChartHandle) -> Result<RasterImage, ChartError> {
            Ok(RasterImage {
                png: Vec::new(),
                width_px: 0,
                height_px: 0,
            })
        }
    }

    let report = capture_charts(&BlankHost(OverrideRegistry::new()), &fast()).await;
    assert!(report.is_empty());
    assert_eq!(report.failed, vec!["blank".to_string()]);
}

#[tokio::test]
async fn offscreen_host_rasterizes_specs_with_plain_colours() {
    use sdash_core::{ChartDatum, ChartKind, ChartSpec, Locale};

    let spec = ChartSpec {
        id: "tiers".into(),
        title: "Rendimiento".into(),
        kind: ChartKind::Bar,
        x_label: String::new(),
        data: vec![ChartDatum::new("Alto", 3.0), ChartDatum::new("Bajo", 1.0)],
    };
    let host = OffscreenHost::new(vec![spec], Locale::Es).with_size(300, 150);

    let report = capture_charts(&host, &fast()).await;
    assert_eq!(report.charts.len(), 1);
    assert_eq!(report.charts[0].image.width_px, 300);
    assert!((report.charts[0].image.height_for_width(100.0) - 50.0).abs() < 1e-9);
    assert!(!host.plain_colors());
}
