//! Colour specs and their resolution to concrete RGB.
//!
//! Anything that cannot be understood resolves to [`DEFAULT_BLUE`] instead of
//! failing the render.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channels scaled to `[0, 1]`, as PDF colour operators expect.
    #[must_use]
    pub fn to_unit(self) -> (f32, f32, f32) {
        (
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
        )
    }
}

pub const DEFAULT_BLUE: Rgb = Rgb::new(59, 130, 246);
pub const POSITIVE_GREEN: Rgb = Rgb::new(34, 197, 94);
pub const NEGATIVE_RED: Rgb = Rgb::new(239, 68, 68);
pub const NEUTRAL_GRAY: Rgb = Rgb::new(156, 163, 175);
pub const WHITE: Rgb = Rgb::new(255, 255, 255);
pub const BLACK: Rgb = Rgb::new(0, 0, 0);

/// A colour as a caller supplied it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorSpec {
    Rgb(u8, u8, u8),
    Hex(String),
    Named(String),
}

impl ColorSpec {
    /// Classifies a CSS-like colour string. Never fails; unknown syntax
    /// becomes a [`ColorSpec::Named`] that resolves to the default.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.starts_with('#') {
            return ColorSpec::Hex(raw.to_string());
        }
        if let Some(inner) = raw
            .strip_prefix("rgb(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let channels: Vec<u8> = inner
                .split(',')
                .filter_map(|c| c.trim().parse().ok())
                .collect();
            if let [r, g, b] = channels[..] {
                return ColorSpec::Rgb(r, g, b);
            }
        }
        ColorSpec::Named(raw.to_ascii_lowercase())
    }

    #[must_use]
    pub fn resolve(&self) -> Rgb {
        match self {
            ColorSpec::Rgb(r, g, b) => Rgb::new(*r, *g, *b),
            ColorSpec::Hex(hex) => parse_hex(hex).unwrap_or_else(|| {
                tracing::debug!(color = %hex, "unparseable hex colour, using default");
                DEFAULT_BLUE
            }),
            ColorSpec::Named(name) => named(name),
        }
    }
}

fn named(name: &str) -> Rgb {
    match name.trim().to_ascii_lowercase().as_str() {
        "green" | "positive" | "positivo" => POSITIVE_GREEN,
        "red" | "negative" | "negativo" => NEGATIVE_RED,
        "gray" | "grey" | "neutral" | "neutro" => NEUTRAL_GRAY,
        "blue" => DEFAULT_BLUE,
        other => {
            tracing::debug!(color = other, "unsupported colour, using default");
            DEFAULT_BLUE
        }
    }
}

/// `#rgb` or `#rrggbb`.
fn parse_hex(raw: &str) -> Option<Rgb> {
    let hex = raw.trim().strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        3 => {
            let mut channels = hex
                .chars()
                .map(|c| c.to_digit(16).and_then(|d| u8::try_from(d * 17).ok()));
            Some(Rgb::new(
                channels.next()??,
                channels.next()??,
                channels.next()??,
            ))
        }
        6 => Some(Rgb::new(
            u8::from_str_radix(&hex[0..2], 16).ok()?,
            u8::from_str_radix(&hex[2..4], 16).ok()?,
            u8::from_str_radix(&hex[4..6], 16).ok()?,
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_triplet_resolves_verbatim() {
        assert_eq!(ColorSpec::Rgb(1, 2, 3).resolve(), Rgb::new(1, 2, 3));
    }

    #[test]
    fn hex_long_and_short_forms() {
        assert_eq!(ColorSpec::Hex("#1877F2".into()).resolve(), Rgb::new(24, 119, 242));
        assert_eq!(ColorSpec::Hex("#fff".into()).resolve(), WHITE);
    }

    #[test]
    fn bad_hex_falls_back_to_default() {
        assert_eq!(ColorSpec::Hex("#12345".into()).resolve(), DEFAULT_BLUE);
        assert_eq!(ColorSpec::Hex("#zzzzzz".into()).resolve(), DEFAULT_BLUE);
    }

    #[test]
    fn semantic_names_resolve() {
        assert_eq!(ColorSpec::Named("green".into()).resolve(), POSITIVE_GREEN);
        assert_eq!(ColorSpec::Named("Red".into()).resolve(), NEGATIVE_RED);
        assert_eq!(ColorSpec::Named("grey".into()).resolve(), NEUTRAL_GRAY);
        assert_eq!(ColorSpec::Named("purple".into()).resolve(), DEFAULT_BLUE);
    }

    #[test]
    fn parse_classifies_strings() {
        assert_eq!(ColorSpec::parse("#abc"), ColorSpec::Hex("#abc".into()));
        assert_eq!(ColorSpec::parse("rgb(10, 20, 30)"), ColorSpec::Rgb(10, 20, 30));
        assert_eq!(
            ColorSpec::parse("oklch(0.7 0.1 200)").resolve(),
            DEFAULT_BLUE,
            "modern colour syntax is unsupported and must fall back"
        );
    }
}
