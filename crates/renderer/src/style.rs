//! Chart layout and panel styling.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Look of one chart panel.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PanelStyle {
    pub title: String,
    pub units: String,
    /// Line and marker colour as `#rrggbb`.
    pub color: String,
}

impl PanelStyle {
    pub fn new(title: &str, units: &str, color: &str) -> Self {
        Self {
            title: title.to_string(),
            units: units.to_string(),
            color: color.to_string(),
        }
    }

    /// Parsed line colour; black when the hex string is malformed.
    pub fn rgba(&self) -> [u8; 4] {
        match hex_to_rgb(&self.color) {
            Some((r, g, b)) => [r, g, b, 255],
            None => [0, 0, 0, 255],
        }
    }
}

/// Size, spacing and styling of the three-panel chart.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
    pub margin_left: u32,
    pub margin_right: u32,
    pub margin_top: u32,
    pub margin_bottom: u32,
    /// Vertical space between panels.
    pub panel_gap: u32,
    pub marker_radius: i32,
    /// TrueType font for titles and labels; without one the chart has no text.
    pub font_path: Option<PathBuf>,
    pub font_size: f32,
    pub precipitation: PanelStyle,
    pub cloud_fraction: PanelStyle,
    pub cloud_top_pressure: PanelStyle,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
            margin_left: 90,
            margin_right: 30,
            margin_top: 36,
            margin_bottom: 36,
            panel_gap: 56,
            marker_radius: 3,
            font_path: None,
            font_size: 16.0,
            precipitation: PanelStyle::new("Mean Precipitation per Day", "mm", "#1f3fff"),
            cloud_fraction: PanelStyle::new("Mean Cloud Fraction per Day", "fraction", "#1a9641"),
            cloud_top_pressure: PanelStyle::new("Cloud-Top Pressure per Day", "hPa", "#d7191c"),
        }
    }
}

impl ChartConfig {
    pub fn panels(&self) -> [&PanelStyle; 3] {
        [&self.precipitation, &self.cloud_fraction, &self.cloud_top_pressure]
    }
}

/// Parse hex color string to RGB
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some((r, g, b))
}
