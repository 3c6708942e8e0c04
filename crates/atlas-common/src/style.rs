//! Zone styling for the map surface.
//!
//! Two modes exist. In navigation mode each level has a fixed fill colour.
//! With a sector overlay active, zones are shaded with the sector colour and
//! an opacity proportional to their production value.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::sector::DEFAULT_SECTOR_COLOR;
use crate::{DivisionLevel, Feature};

/// Colour theme of the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme: {}", other)),
        }
    }
}

/// An RGBA colour, parsed from `#RRGGBB` or `#RRGGBBAA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse a hex colour; malformed input yields opaque black.
    pub fn from_hex(s: &str) -> Self {
        let s = s.trim().trim_start_matches('#');
        let byte = |i: usize| u8::from_str_radix(&s[i..i + 2], 16).unwrap_or(0);
        match s.len() {
            6 if s.is_ascii() => Color::rgb(byte(0), byte(2), byte(4)),
            8 if s.is_ascii() => Color {
                r: byte(0),
                g: byte(2),
                b: byte(4),
                a: byte(6),
            },
            _ => Color::rgb(0, 0, 0),
        }
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Computed style for one zone polygon.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneStyle {
    pub fill_color: Color,
    pub fill_opacity: f64,
    pub border_color: Color,
    pub border_weight: f64,
}

/// Overlay parameters that affect styling.
#[derive(Debug, Clone, Copy)]
pub struct OverlayStyle<'a> {
    /// Sector colour, `None` to use the default overlay colour.
    pub sector_color: Option<&'a str>,
    /// Largest value in the displayed collection.
    pub max_value: f64,
}

/// Style a zone feature.
///
/// `overlay` is `Some` while a sector filter is active.
pub fn zone_style(feature: &Feature, overlay: Option<OverlayStyle<'_>>, theme: Theme) -> ZoneStyle {
    let dark = theme.is_dark();
    match overlay {
        Some(overlay) => {
            let value = feature.properties.value.unwrap_or(0.0);
            let (fill_color, fill_opacity) = if value > 0.0 {
                let max = if overlay.max_value > 0.0 { overlay.max_value } else { 1.0 };
                let base = overlay.sector_color.unwrap_or(DEFAULT_SECTOR_COLOR);
                (Color::from_hex(base), 0.4 + (value / max) * 0.6)
            } else if dark {
                (Color::from_hex("#374151"), 0.2)
            } else {
                (Color::from_hex("#e5e7eb"), 0.2)
            };
            ZoneStyle {
                fill_color,
                fill_opacity,
                border_color: Color::from_hex(if dark { "#9ca3af" } else { "#64748b" }),
                border_weight: 1.5,
            }
        }
        None => {
            let fill = match (feature.properties.level, dark) {
                (DivisionLevel::Departement, false) => "#bfdbfe",
                (DivisionLevel::Departement, true) => "#3b82f6",
                (DivisionLevel::Arrondissement, _) => "#ea580c",
                (_, false) => "#4CAF50",
                (_, true) => "#1d4ed8",
            };
            ZoneStyle {
                fill_color: Color::from_hex(fill),
                fill_opacity: 0.7,
                border_color: Color::from_hex(if dark { "#ffffff" } else { "#1e3a8a" }),
                border_weight: 2.0,
            }
        }
    }
}

/// Tooltip text: the zone name, with its value while an overlay is active.
pub fn tooltip(feature: &Feature, overlay_active: bool) -> String {
    let props = &feature.properties;
    match props.value {
        Some(value) if overlay_active && value > 0.0 => {
            let unit = props.unit.as_deref().unwrap_or("");
            format!("{} : {} {}", props.name, format_volume(value), unit)
                .trim_end()
                .to_string()
        }
        _ => props.name.clone(),
    }
}

/// Format a volume with thin grouping of thousands, as shown in panels.
pub fn format_volume(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    let int_part = rounded.trunc().abs() as u64;
    let digits = int_part.to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }
    let frac = rounded.fract().abs();
    let sign = if rounded < 0.0 { "-" } else { "" };
    if frac > 0.0 {
        let decimals = format!("{:.2}", frac);
        format!("{}{},{}", sign, grouped, decimals.trim_start_matches("0.").trim_end_matches('0'))
    } else {
        format!("{}{}", sign, grouped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ZoneProperties;

    fn feature(level: DivisionLevel, value: Option<f64>) -> Feature {
        let mut props = ZoneProperties::new(1, "Mfoundi", level);
        props.value = value;
        props.unit = Some("t".to_string());
        Feature::new(props)
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(Color::from_hex("#ea580c"), Color::rgb(0xea, 0x58, 0x0c));
        assert_eq!(Color::from_hex("#ff000080").a, 0x80);
        assert_eq!(Color::from_hex("nope"), Color::rgb(0, 0, 0));
    }

    #[test]
    fn test_navigation_fill_by_level() {
        let style = zone_style(&feature(DivisionLevel::Departement, None), None, Theme::Light);
        assert_eq!(style.fill_color.to_hex(), "#bfdbfe");
        assert_eq!(style.border_weight, 2.0);
        let style = zone_style(&feature(DivisionLevel::Arrondissement, None), None, Theme::Dark);
        assert_eq!(style.fill_color.to_hex(), "#ea580c");
    }

    #[test]
    fn test_overlay_intensity_scales_with_value() {
        let overlay = OverlayStyle {
            sector_color: Some("#7c2d12"),
            max_value: 200.0,
        };
        let style = zone_style(
            &feature(DivisionLevel::Region, Some(100.0)),
            Some(overlay),
            Theme::Light,
        );
        assert_eq!(style.fill_color.to_hex(), "#7c2d12");
        assert!((style.fill_opacity - 0.7).abs() < 1e-9);

        let empty = zone_style(&feature(DivisionLevel::Region, Some(0.0)), Some(overlay), Theme::Light);
        assert_eq!(empty.fill_color.to_hex(), "#e5e7eb");
        assert!((empty.fill_opacity - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_tooltip() {
        let f = feature(DivisionLevel::Region, Some(12500.0));
        assert_eq!(tooltip(&f, true), "Mfoundi : 12 500 t");
        assert_eq!(tooltip(&f, false), "Mfoundi");
    }

    #[test]
    fn test_format_volume() {
        assert_eq!(format_volume(1234567.0), "1 234 567");
        assert_eq!(format_volume(12.5), "12,5");
        assert_eq!(format_volume(0.0), "0");
    }
}
