//! Render-time display hints for chart rows.
//!
//! Chart data only carries a semantic category. Colours and legend text are
//! derived here, at the moment something is drawn.

use sdash_core::{format_percent, ChartDatum, Locale};

use crate::color::{ColorSpec, Rgb};

/// Fallback palette for rows without a recognised category.
const PALETTE: &[&str] = &[
    "#3B82F6", "#F59E0B", "#10B981", "#8B5CF6", "#EC4899", "#14B8A6", "#F97316", "#6366F1",
];

/// Capture-safe palette used while a colour override is active.
const PLAIN_PALETTE: &[Rgb] = &[
    Rgb::new(0, 0, 255),
    Rgb::new(255, 165, 0),
    Rgb::new(0, 128, 0),
    Rgb::new(128, 0, 128),
    Rgb::new(255, 0, 0),
    Rgb::new(0, 128, 128),
    Rgb::new(128, 128, 128),
    Rgb::new(0, 0, 0),
];

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayHint {
    pub color: ColorSpec,
    /// `label` alone, or `label  53,3%` when the row has a share of a total.
    pub legend: String,
}

/// Colour spec for a row's category, or the `index`-th palette entry.
#[must_use]
pub fn color_for(category: Option<&str>, index: usize) -> ColorSpec {
    let semantic = category.map(str::to_ascii_lowercase);
    match semantic.as_deref() {
        Some("facebook") => ColorSpec::Hex("#1877F2".into()),
        Some("instagram") => ColorSpec::Hex("#E4405F".into()),
        Some("tiktok") => ColorSpec::Hex("#25F4EE".into()),
        Some("positive" | "high") => ColorSpec::Named("green".into()),
        Some("negative" | "low") => ColorSpec::Named("red".into()),
        Some("neutral") => ColorSpec::Named("gray".into()),
        Some("medium") => ColorSpec::Hex("#F59E0B".into()),
        _ => ColorSpec::Hex(PALETTE[index % PALETTE.len()].into()),
    }
}

/// The hint for the `index`-th row of a chart whose rows sum to `total`.
#[must_use]
pub fn hint_for(datum: &ChartDatum, index: usize, total: Option<f64>, locale: Locale) -> DisplayHint {
    let legend = match total {
        Some(t) if t > 0.0 => format!(
            "{}  {}",
            datum.label,
            format_percent(datum.value / t * 100.0, locale)
        ),
        Some(_) => format!("{}  {}", datum.label, format_percent(0.0, locale)),
        None => datum.label.clone(),
    };
    DisplayHint {
        color: color_for(datum.category.as_deref(), index),
        legend,
    }
}

/// Resolved colour for a row, honouring the plain palette when asked.
#[must_use]
pub fn resolve_color(datum: &ChartDatum, index: usize, plain: bool) -> Rgb {
    if plain {
        PLAIN_PALETTE[index % PLAIN_PALETTE.len()]
    } else {
        color_for(datum.category.as_deref(), index).resolve()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{DEFAULT_BLUE, NEGATIVE_RED, POSITIVE_GREEN};

    #[test]
    fn semantic_categories_map_to_semantic_colours() {
        assert_eq!(color_for(Some("positive"), 0).resolve(), POSITIVE_GREEN);
        assert_eq!(color_for(Some("LOW"), 0).resolve(), NEGATIVE_RED);
    }

    #[test]
    fn uncategorised_rows_cycle_the_palette() {
        assert_eq!(color_for(None, 0).resolve(), DEFAULT_BLUE);
        assert_eq!(color_for(None, PALETTE.len()), color_for(None, 0));
    }

    #[test]
    fn legend_carries_share_of_total() {
        let datum = ChartDatum::new("Instagram", 25.0).with_category("instagram");
        let hint = hint_for(&datum, 0, Some(50.0), Locale::Es);
        assert_eq!(hint.legend, "Instagram  50,0%");
        assert_eq!(hint_for(&datum, 0, None, Locale::Es).legend, "Instagram");
    }

    #[test]
    fn plain_palette_ignores_category() {
        let datum = ChartDatum::new("x", 1.0).with_category("positive");
        assert_eq!(resolve_color(&datum, 0, true), Rgb::new(0, 0, 255));
    }
}
