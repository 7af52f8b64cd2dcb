//! Locale-aware number and label formatting for reports.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::metrics::KpiFormat;
use crate::CoreError;

/// Number formatting conventions. Spanish is the dashboard's default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Es,
    En,
}

impl Locale {
    #[must_use]
    pub fn decimal_separator(self) -> char {
        match self {
            Locale::Es => ',',
            Locale::En => '.',
        }
    }

    #[must_use]
    pub fn group_separator(self) -> char {
        match self {
            Locale::Es => '.',
            Locale::En => ',',
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::Es => write!(f, "es"),
            Locale::En => write!(f, "en"),
        }
    }
}

impl FromStr for Locale {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "es" | "es-es" | "es_es" => Ok(Locale::Es),
            "en" | "en-us" | "en_us" | "en-gb" => Ok(Locale::En),
            other => Err(CoreError::UnknownLocale(other.to_string())),
        }
    }
}

/// Compact notation for axis labels: `950`, `1,2K`, `3,4M`, `1B`.
#[must_use]
pub fn format_compact(value: f64, locale: Locale) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    const UNITS: [(f64, &str); 4] = [(1.0, ""), (1e3, "K"), (1e6, "M"), (1e9, "B")];

    let abs = value.abs();
    let sign = if value < 0.0 { "-" } else { "" };

    // Move up a unit whenever the rounded value reaches 1000 (999.96 is "1K").
    let mut unit = 0;
    let mut scaled = round_to(abs, 1);
    while scaled >= 1000.0 && unit + 1 < UNITS.len() {
        unit += 1;
        scaled = round_to(abs / UNITS[unit].0, 1);
    }
    let suffix = UNITS[unit].1;

    format!("{sign}{}{suffix}", trim_decimal(scaled, 1, locale))
}

/// Groups thousands and fixes the number of decimals: `12.345,60` (es).
#[must_use]
pub fn format_number(value: f64, decimals: usize, locale: Locale) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (formatted.clone(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(locale.group_separator());
        }
        grouped.push(ch);
    }

    let negative = value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0');
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(frac) = frac_part {
        out.push(locale.decimal_separator());
        out.push_str(&frac);
    }
    out
}

/// One-decimal percentage: `53,3%`.
#[must_use]
pub fn format_percent(value: f64, locale: Locale) -> String {
    format!("{}%", format_number(value, 1, locale))
}

/// Formats a KPI value according to its declared format.
#[must_use]
pub fn format_kpi_value(value: f64, format: KpiFormat, locale: Locale) -> String {
    match format {
        KpiFormat::Number => {
            let decimals = if value.fract() == 0.0 { 0 } else { 2 };
            format_number(value, decimals, locale)
        }
        KpiFormat::Percentage => format!("{}%", format_number(value, 2, locale)),
        KpiFormat::Currency => match locale {
            Locale::Es => format!("{} EUR", format_number(value, 2, locale)),
            Locale::En => format!("${}", format_number(value, 2, locale)),
        },
    }
}

/// Keeps the first `max_chars` characters and appends `...` when longer.
#[must_use]
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars).collect();
    format!("{}...", kept.trim_end())
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

fn trim_decimal(value: f64, decimals: usize, locale: Locale) -> String {
    if value.fract() == 0.0 {
        return format_number(value, 0, locale);
    }
    format_number(value, decimals, locale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_thousands_uses_locale_separator() {
        assert_eq!(format_compact(1234.0, Locale::Es), "1,2K");
        assert_eq!(format_compact(1234.0, Locale::En), "1.2K");
    }

    #[test]
    fn compact_small_values_are_plain() {
        assert_eq!(format_compact(950.0, Locale::Es), "950");
        assert_eq!(format_compact(12.5, Locale::Es), "12,5");
        assert_eq!(format_compact(0.0, Locale::Es), "0");
    }

    #[test]
    fn compact_whole_units_drop_decimals() {
        assert_eq!(format_compact(1000.0, Locale::Es), "1K");
        assert_eq!(format_compact(3_400_000.0, Locale::Es), "3,4M");
        assert_eq!(format_compact(2_000_000_000.0, Locale::En), "2B");
    }

    #[test]
    fn compact_promotes_rounding_overflow() {
        assert_eq!(format_compact(999_960.0, Locale::En), "1M");
        assert_eq!(format_compact(999.96, Locale::En), "1K");
        assert_eq!(format_compact(999.96, Locale::Es), "1K");
        assert_eq!(format_compact(999.94, Locale::Es), "999,9");
        assert_eq!(format_compact(-999.99, Locale::En), "-1K");
    }

    #[test]
    fn compact_negative_and_non_finite() {
        assert_eq!(format_compact(-1500.0, Locale::En), "-1.5K");
        assert_eq!(format_compact(f64::NAN, Locale::En), "0");
    }

    #[test]
    fn number_groups_thousands() {
        assert_eq!(format_number(12345.6, 2, Locale::Es), "12.345,60");
        assert_eq!(format_number(1_234_567.0, 0, Locale::En), "1,234,567");
        assert_eq!(format_number(999.0, 0, Locale::En), "999");
    }

    #[test]
    fn kpi_values_follow_format() {
        assert_eq!(format_kpi_value(1500.0, KpiFormat::Number, Locale::Es), "1.500");
        assert_eq!(format_kpi_value(4.5, KpiFormat::Percentage, Locale::Es), "4,50%");
        assert_eq!(format_kpi_value(10.0, KpiFormat::Currency, Locale::En), "$10.00");
    }

    #[test]
    fn truncation_appends_ellipsis_only_when_longer() {
        assert_eq!(truncate_with_ellipsis("short", 10), "short");
        assert_eq!(truncate_with_ellipsis("abcdefghijkl", 10), "abcdefghij...");
        assert_eq!(truncate_with_ellipsis("añoñoñoñoñoñ", 3), "año...");
    }

    #[test]
    fn locale_parses() {
        assert_eq!("ES".parse::<Locale>().unwrap(), Locale::Es);
        assert_eq!("en-US".parse::<Locale>().unwrap(), Locale::En);
        assert!("fr".parse::<Locale>().is_err());
    }
}
