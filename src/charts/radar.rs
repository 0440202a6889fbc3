use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::charts::axis::AxisOption;
use crate::charts::chrome::{ChromeOptions, render_chrome, series_colors};
use crate::charts::legend::LegendOption;
use crate::charts::series::{Series, ensure_series};
use crate::charts::themed;
use crate::charts::title::TitleOption;
use crate::core::{Bounds, Color, Point, parse_flexible_value};
use crate::error::{ChartError, ChartResult};
use crate::render::{FontStyle, Painter, Style};
use crate::theme::ColorPalette;

const DEFAULT_RADIUS: &str = "40%";
const SPLIT_COUNT: usize = 5;
const AREA_ALPHA: u8 = 51;
const DOT_RADIUS: f64 = 2.0;
const LABEL_GAP: i32 = 5;
const MIN_INDICATORS: usize = 3;

/// One spoke of a radar chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RadarIndicator {
    pub name: String,
    pub min: f64,
    pub max: f64,
}

impl RadarIndicator {
    #[must_use]
    pub fn new(name: &str, max: f64) -> Self {
        Self {
            name: name.to_owned(),
            min: 0.0,
            max,
        }
    }

    #[must_use]
    pub fn with_min(mut self, min: f64) -> Self {
        self.min = min;
        self
    }
}

/// Indicators named `names` sharing their maxima positionally.
#[must_use]
pub fn new_radar_indicators(names: &[&str], maxima: &[f64]) -> Vec<RadarIndicator> {
    names
        .iter()
        .zip(maxima)
        .map(|(name, max)| RadarIndicator::new(name, *max))
        .collect()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RadarChartOption {
    #[serde(skip)]
    pub theme: Option<Arc<ColorPalette>>,
    pub padding: Bounds,
    pub background_color: Color,
    pub title: TitleOption,
    pub legend: LegendOption,
    pub series: Vec<Series>,
    pub indicators: Vec<RadarIndicator>,
    pub radius: String,
    pub label_font_style: FontStyle,
}

impl RadarChartOption {
    #[must_use]
    pub fn new(series: Vec<Series>, indicators: Vec<RadarIndicator>) -> Self {
        Self {
            series,
            indicators,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_radius(mut self, radius: &str) -> Self {
        self.radius = radius.to_owned();
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: TitleOption) -> Self {
        self.title = title;
        self
    }

    #[must_use]
    pub fn with_legend(mut self, legend: LegendOption) -> Self {
        self.legend = legend;
        self
    }
}

/// Distance of `value` from the center along a spoke of length `radius`.
#[must_use]
pub fn radar_distance(value: f64, indicator: &RadarIndicator, radius: f64) -> f64 {
    let span = indicator.max - indicator.min;
    if !(span > 0.0) || !value.is_finite() {
        return 0.0;
    }
    (radius * (value - indicator.min) / span).clamp(0.0, radius)
}

/// Tip of spoke `index` out of `sides` at `distance` from `center`.
fn spoke_point(center: Point, distance: f64, index: usize, sides: usize) -> Point {
    let angle = std::f64::consts::TAU * index as f64 / sides as f64;
    Point::new(
        center.x + (distance * angle.sin()) as i32,
        center.y - (distance * angle.cos()) as i32,
    )
}

pub fn render_radar_chart(painter: &Painter, option: &RadarChartOption) -> ChartResult<Bounds> {
    ensure_series(&option.series)?;
    let sides = option.indicators.len();
    if sides < MIN_INDICATORS {
        return Err(ChartError::validation(format!(
            "radar chart requires at least {MIN_INDICATORS} indicators, got {sides}"
        )));
    }
    if let Some(indicator) = option.indicators.iter().find(|item| !(item.max > item.min)) {
        return Err(ChartError::validation(format!(
            "radar indicator '{}' has max {} not above min {}",
            indicator.name, indicator.max, indicator.min
        )));
    }
    let painter = themed(painter, option.theme.as_ref());
    let no_axis = AxisOption::default();
    let chrome = render_chrome(
        &painter,
        &ChromeOptions {
            padding: option.padding,
            background: option.background_color,
            title: &option.title,
            legend: &option.legend,
            series: &option.series,
            x_axis: &no_axis,
            y_axes: &[],
            layout: None,
            include_zero: false,
            default_boundary_gap: false,
        },
    )?;
    let plot = &chrome.plot;
    let theme = plot.theme();
    let center = Point::new(plot.width() / 2, plot.height() / 2);
    let diameter = f64::from(plot.width().min(plot.height()));
    let radius = if option.radius.is_empty() {
        parse_flexible_value(DEFAULT_RADIUS, diameter)?
    } else {
        parse_flexible_value(&option.radius, diameter)?
    };

    let grid = plot.with_drawing_style(&Style::stroke(1.0, theme.axis_split_line_color()));
    for step in 1..=SPLIT_COUNT {
        grid.polygon(center, radius * step as f64 / SPLIT_COUNT as f64, sides);
    }
    for tip in Painter::polygon_points(center, radius, sides) {
        grid.line_stroke(&[center, tip]);
    }

    let font_style = plot.resolve_font_style(&option.label_font_style);
    for (index, indicator) in option.indicators.iter().enumerate() {
        let tip = spoke_point(center, radius, index, sides);
        let size = plot.measure_text(&indicator.name, 0.0, &font_style);
        let x = if tip.x == center.x {
            tip.x - size.width() / 2
        } else if tip.x < center.x {
            tip.x - size.width() - LABEL_GAP
        } else {
            tip.x + LABEL_GAP
        };
        let y = if tip.y < center.y {
            tip.y - LABEL_GAP
        } else if tip.y > center.y {
            tip.y + size.height()
        } else {
            tip.y + size.height() / 2
        };
        plot.text(&indicator.name, x, y, 0.0, &font_style);
    }

    let colors = series_colors(theme, &option.series);
    for (series, color) in option.series.iter().zip(colors) {
        let mut points: Vec<Point> = option
            .indicators
            .iter()
            .enumerate()
            .map(|(index, indicator)| {
                let value = series.data.get(index).map_or(0.0, |datum| datum.value);
                spoke_point(center, radar_distance(value, indicator, radius), index, sides)
            })
            .collect();
        let vertices = points.clone();
        points.push(points[0]);
        plot.with_drawing_style(&Style::stroke(1.0, color).with_fill_color(color.with_alpha(AREA_ALPHA)))
            .fill_area(&points);
        plot.with_drawing_style(&Style::stroke(2.0, color)).line_stroke(&points);
        plot.with_drawing_style(&Style::stroke(1.0, color).with_fill_color(theme.background_color()))
            .dots(&vertices, DOT_RADIUS);
    }
    debug!(indicators = sides, series = option.series.len(), radius, "radar chart rendered");
    Ok(painter.bounds())
}

#[cfg(test)]
mod tests {
    use super::{RadarIndicator, radar_distance, spoke_point};
    use crate::core::Point;

    #[test]
    fn values_are_clamped_to_the_spoke() {
        let indicator = RadarIndicator::new("cpu", 100.0);
        assert_eq!(radar_distance(50.0, &indicator, 80.0), 40.0);
        assert_eq!(radar_distance(150.0, &indicator, 80.0), 80.0);
        assert_eq!(radar_distance(-5.0, &indicator, 80.0), 0.0);
    }

    #[test]
    fn first_spoke_points_up() {
        assert_eq!(spoke_point(Point::new(100, 100), 50.0, 0, 4), Point::new(100, 50));
        assert_eq!(spoke_point(Point::new(100, 100), 50.0, 1, 4), Point::new(150, 100));
    }
}
