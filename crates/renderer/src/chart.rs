//! Three-panel daily time-series chart.
//!
//! Panels are stacked top to bottom: precipitation, cloud fraction and
//! cloud-top pressure, all sharing one date axis. Points are placed by
//! calendar day, so gaps in the record show as gaps on the axis. NaN
//! samples get no marker and break the connecting line.

use std::path::Path;

use chrono::NaiveDate;
use image::{Rgba, RgbaImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_hollow_rect_mut, draw_line_segment_mut, draw_text_mut,
};
use imageproc::rect::Rect;
use rusttype::{Font, Scale};
use tracing::{debug, warn};

use crate::error::RenderError;
use crate::png::encode_image;
use crate::style::{ChartConfig, PanelStyle};

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
const FRAME: Rgba<u8> = Rgba([40, 40, 40, 255]);
const GRID: Rgba<u8> = Rgba([225, 225, 225, 255]);
const PLACEHOLDER: Rgba<u8> = Rgba([170, 170, 170, 255]);
const TEXT: Rgba<u8> = Rgba([20, 20, 20, 255]);

/// Horizontal grid lines per panel, frame edges excluded.
const GRID_LINES: u32 = 3;

/// Fraction of the value span added above and below the data.
const VALUE_PADDING: f64 = 0.05;

/// Aligned daily series to plot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartData {
    pub dates: Vec<NaiveDate>,
    pub precipitation: Vec<f64>,
    pub cloud_fraction: Vec<f64>,
    pub cloud_top_pressure: Vec<f64>,
}

impl ChartData {
    pub fn new(
        dates: Vec<NaiveDate>,
        precipitation: Vec<f64>,
        cloud_fraction: Vec<f64>,
        cloud_top_pressure: Vec<f64>,
    ) -> Self {
        Self {
            dates,
            precipitation,
            cloud_fraction,
            cloud_top_pressure,
        }
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// True when no series holds a single finite value.
    pub fn is_all_missing(&self) -> bool {
        self.series().iter().all(|s| s.iter().all(|v| !v.is_finite()))
    }

    fn series(&self) -> [&[f64]; 3] {
        [&self.precipitation, &self.cloud_fraction, &self.cloud_top_pressure]
    }

    fn validate(&self) -> Result<(), RenderError> {
        for (name, series) in ["precipitation", "cloud_fraction", "cloud_top_pressure"]
            .iter()
            .zip(self.series())
        {
            if series.len() != self.dates.len() {
                return Err(RenderError::InvalidInput(format!(
                    "{} has {} values for {} dates",
                    name,
                    series.len(),
                    self.dates.len()
                )));
            }
        }
        if self.dates.windows(2).any(|w| w[0] > w[1]) {
            return Err(RenderError::InvalidInput("dates are not in ascending order".to_string()));
        }
        Ok(())
    }
}

/// Pixel rectangle of one panel's plotting area.
#[derive(Debug, Clone, Copy)]
struct PanelArea {
    left: f32,
    top: f32,
    right: f32,
    bottom: f32,
}

impl PanelArea {
    fn width(&self) -> f32 {
        self.right - self.left
    }

    fn height(&self) -> f32 {
        self.bottom - self.top
    }

    fn rect(&self) -> Rect {
        Rect::at(self.left as i32, self.top as i32)
            .of_size(self.width().max(1.0) as u32, self.height().max(1.0) as u32)
    }
}

/// Value range of a panel's y axis.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ValueRange {
    min: f64,
    max: f64,
}

impl ValueRange {
    /// Padded range of the finite values; `None` when there are none.
    fn of(values: &[f64]) -> Option<Self> {
        let (min, max) = values
            .iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        if !min.is_finite() {
            return None;
        }
        if max - min < f64::EPSILON {
            return Some(Self { min: min - 1.0, max: max + 1.0 });
        }
        let pad = (max - min) * VALUE_PADDING;
        Some(Self { min: min - pad, max: max + pad })
    }

    /// Fraction of the way from `min` to `max`.
    fn position(&self, value: f64) -> f64 {
        (value - self.min) / (self.max - self.min)
    }
}

/// Render the three-panel chart as PNG bytes.
///
/// Empty or entirely missing data still produces an image: each panel is
/// drawn crossed out instead of plotted.
pub fn render_timeseries_chart(data: &ChartData, config: &ChartConfig) -> Result<Vec<u8>, RenderError> {
    let img = draw_chart(data, config)?;
    encode_image(&img)
}

/// Draw the chart into an image buffer without encoding it.
pub fn draw_chart(data: &ChartData, config: &ChartConfig) -> Result<RgbaImage, RenderError> {
    data.validate()?;
    let areas = panel_areas(config)?;
    let font = config.font_path.as_deref().and_then(load_font);

    let mut img = RgbaImage::from_pixel(config.width, config.height, BACKGROUND);

    if data.is_empty() || data.is_all_missing() {
        debug!(points = data.len(), "Rendering placeholder chart");
    }

    for ((area, style), values) in areas.iter().zip(config.panels()).zip(data.series()) {
        draw_panel(&mut img, *area, style, &data.dates, values, config, font.as_ref());
    }

    if let (Some(font), Some(first), Some(last)) = (font.as_ref(), data.dates.first(), data.dates.last()) {
        let bottom = areas[2];
        let scale = Scale::uniform(config.font_size);
        let y = bottom.bottom as i32 + 6;
        draw_text_mut(&mut img, TEXT, bottom.left as i32, y, scale, font, &first.to_string());
        if last != first {
            let label = last.to_string();
            let x = bottom.right as i32 - text_width(&label, config.font_size);
            draw_text_mut(&mut img, TEXT, x, y, scale, font, &label);
        }
    }

    Ok(img)
}

fn panel_areas(config: &ChartConfig) -> Result<[PanelArea; 3], RenderError> {
    let horizontal = config.margin_left + config.margin_right;
    let vertical = config.margin_top + config.margin_bottom + 2 * config.panel_gap;
    if config.width <= horizontal + 10 || config.height <= vertical + 30 {
        return Err(RenderError::InvalidInput(format!(
            "chart {}x{} too small for its margins",
            config.width, config.height
        )));
    }

    let panel_height = (config.height - vertical) as f32 / 3.0;
    let left = config.margin_left as f32;
    let right = (config.width - config.margin_right - 1) as f32;

    Ok(std::array::from_fn(|i| {
        let top = config.margin_top as f32 + i as f32 * (panel_height + config.panel_gap as f32);
        PanelArea {
            left,
            top,
            right,
            bottom: top + panel_height,
        }
    }))
}

fn draw_panel(
    img: &mut RgbaImage,
    area: PanelArea,
    style: &PanelStyle,
    dates: &[NaiveDate],
    values: &[f64],
    config: &ChartConfig,
    font: Option<&Font<'static>>,
) {
    for i in 1..=GRID_LINES {
        let y = area.top + area.height() * i as f32 / (GRID_LINES + 1) as f32;
        draw_line_segment_mut(img, (area.left, y), (area.right, y), GRID);
    }

    let range = ValueRange::of(values);

    if let Some(font) = font {
        let scale = Scale::uniform(config.font_size);
        let title = format!("{} ({})", style.title, style.units);
        let title_y = area.top as i32 - config.font_size as i32 - 4;
        draw_text_mut(img, TEXT, area.left as i32, title_y, scale, font, &title);

        if let Some(range) = range {
            let label_x = |label: &str| area.left as i32 - 6 - text_width(label, config.font_size);
            let max_label = format_value(range.max);
            let min_label = format_value(range.min);
            draw_text_mut(img, TEXT, label_x(&max_label), area.top as i32, scale, font, &max_label);
            let min_y = area.bottom as i32 - config.font_size as i32;
            draw_text_mut(img, TEXT, label_x(&min_label), min_y, scale, font, &min_label);
        }
    }

    match range {
        Some(range) => plot_series(img, area, style.rgba(), dates, values, range, config.marker_radius),
        None => {
            draw_line_segment_mut(img, (area.left, area.top), (area.right, area.bottom), PLACEHOLDER);
            draw_line_segment_mut(img, (area.left, area.bottom), (area.right, area.top), PLACEHOLDER);
        }
    }

    draw_hollow_rect_mut(img, area.rect(), FRAME);
}

fn plot_series(
    img: &mut RgbaImage,
    area: PanelArea,
    color: [u8; 4],
    dates: &[NaiveDate],
    values: &[f64],
    range: ValueRange,
    marker_radius: i32,
) {
    let color = Rgba(color);
    let (Some(first), Some(last)) = (dates.first(), dates.last()) else {
        return;
    };
    let span_days = (*last - *first).num_days();

    let x_of = |date: &NaiveDate| -> f32 {
        if span_days == 0 {
            return area.left + area.width() / 2.0;
        }
        let t = (*date - *first).num_days() as f32 / span_days as f32;
        area.left + t * area.width()
    };
    let y_of = |value: f64| -> f32 { area.bottom - range.position(value) as f32 * area.height() };

    let mut previous: Option<(f32, f32)> = None;
    for (date, &value) in dates.iter().zip(values) {
        if !value.is_finite() {
            previous = None;
            continue;
        }
        let point = (x_of(date), y_of(value));
        if let Some(prev) = previous {
            draw_line_segment_mut(img, prev, point, color);
        }
        draw_filled_circle_mut(img, (point.0.round() as i32, point.1.round() as i32), marker_radius, color);
        previous = Some(point);
    }
}

/// Load a TrueType font, logging and returning `None` on failure.
fn load_font(path: &Path) -> Option<Font<'static>> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Chart font unreadable, rendering without text");
            return None;
        }
    };
    let font = Font::try_from_vec(bytes);
    if font.is_none() {
        warn!(path = %path.display(), "Chart font could not be parsed, rendering without text");
    }
    font
}

/// Rough label width for right alignment.
fn text_width(text: &str, font_size: f32) -> i32 {
    (text.chars().count() as f32 * font_size * 0.55) as i32
}

fn format_value(value: f64) -> String {
    if value.abs() >= 100.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_range_pads_span() {
        let range = ValueRange::of(&[0.0, f64::NAN, 10.0]).unwrap();
        assert!((range.min + 0.5).abs() < 1e-9);
        assert!((range.max - 10.5).abs() < 1e-9);
    }

    #[test]
    fn test_value_range_flat_series() {
        let range = ValueRange::of(&[0.5, 0.5]).unwrap();
        assert_eq!(range, ValueRange { min: -0.5, max: 1.5 });
        assert!((range.position(0.5) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_value_range_without_finite_values() {
        assert!(ValueRange::of(&[]).is_none());
        assert!(ValueRange::of(&[f64::NAN, f64::INFINITY]).is_none());
    }

    #[test]
    fn test_panel_areas_stack_without_overlap() {
        let config = ChartConfig::default();
        let areas = panel_areas(&config).unwrap();
        assert!(areas[0].bottom < areas[1].top);
        assert!(areas[1].bottom < areas[2].top);
        assert!(areas[2].bottom <= config.height as f32);
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(912.4), "912");
        assert_eq!(format_value(0.4567), "0.46");
    }
}
