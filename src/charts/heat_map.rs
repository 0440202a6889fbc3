use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::charts::axis::AxisOption;
use crate::charts::chrome::{AxisLayout, ChromeOptions, render_chrome};
use crate::charts::legend::LegendOption;
use crate::charts::series::{Series, ensure_series};
use crate::charts::title::TitleOption;
use crate::charts::{themed, value_label_style};
use crate::core::{Bounds, Color, ValueFormatter};
use crate::error::{ChartError, ChartResult};
use crate::render::Painter;
use crate::theme::ColorPalette;

const LOW_MIX: f64 = 0.12;
const CELL_GAP: i32 = 1;

/// Grid of colored cells: one row per series, one column per datum.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeatMapOption {
    #[serde(skip)]
    pub theme: Option<Arc<ColorPalette>>,
    pub padding: Bounds,
    pub background_color: Color,
    pub title: TitleOption,
    pub legend: LegendOption,
    pub x_axis: AxisOption,
    pub y_axis: AxisOption,
    pub series: Vec<Series>,
    /// Ramp ends; zero colors derive them from the theme.
    pub min_color: Color,
    pub max_color: Color,
    pub show_values: bool,
    #[serde(skip)]
    pub value_formatter: Option<ValueFormatter>,
}

impl HeatMapOption {
    #[must_use]
    pub fn new(series: Vec<Series>) -> Self {
        Self {
            series,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_x_axis(mut self, x_axis: AxisOption) -> Self {
        self.x_axis = x_axis;
        self
    }

    #[must_use]
    pub fn with_y_axis(mut self, y_axis: AxisOption) -> Self {
        self.y_axis = y_axis;
        self
    }

    #[must_use]
    pub fn with_colors(mut self, min_color: Color, max_color: Color) -> Self {
        self.min_color = min_color;
        self.max_color = max_color;
        self
    }

    #[must_use]
    pub fn with_show_values(mut self, show: bool) -> Self {
        self.show_values = show;
        self
    }
}

/// Low and high colors of the ramp.
pub(crate) fn ramp_colors(theme: &ColorPalette, min_color: Color, max_color: Color) -> (Color, Color) {
    let high = if max_color.is_zero() {
        theme.series_color(0)
    } else {
        max_color
    };
    let low = if min_color.is_zero() {
        theme.background_color().mix(high, LOW_MIX)
    } else {
        min_color
    };
    (low, high)
}

/// Position of `value` along the ramp, `0.0` for a flat range.
#[must_use]
pub fn ramp_ratio(value: f64, min: f64, max: f64) -> f64 {
    if max > min {
        ((value - min) / (max - min)).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

pub fn render_heat_map(painter: &Painter, option: &HeatMapOption) -> ChartResult<Bounds> {
    ensure_series(&option.series)?;
    let painter = themed(painter, option.theme.as_ref());
    let y_axes = [option.y_axis.clone()];
    let legend = LegendOption {
        show: Some(option.legend.show.unwrap_or(false)),
        ..option.legend.clone()
    };
    let result = render_chrome(
        &painter,
        &ChromeOptions {
            padding: option.padding,
            background: option.background_color,
            title: &option.title,
            legend: &legend,
            series: &option.series,
            x_axis: &option.x_axis,
            y_axes: &y_axes,
            layout: Some(AxisLayout::CategoryXY),
            include_zero: false,
            default_boundary_gap: true,
        },
    )?;
    let plot = &result.plot;
    let (Some(x_category), Some(y_category)) = (result.category, result.secondary_category) else {
        return Err(ChartError::geometry("heat map requires category axes"));
    };
    let (min, max) = option
        .series
        .iter()
        .flat_map(|series| series.data.iter().map(|datum| datum.value))
        .filter(|value| value.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), value| {
            (min.min(value), max.max(value))
        });
    let (low, high) = ramp_colors(plot.theme(), option.min_color, option.max_color);
    let formatter = option.value_formatter.clone().unwrap_or_default();
    let cell_width = x_category.band_width(f64::from(plot.width()));
    let cell_height = y_category.band_width(f64::from(plot.height()));
    let label = crate::charts::series::SeriesLabel::shown();
    let font_style = value_label_style(plot, &label);

    for (row, series) in option.series.iter().enumerate() {
        // Row 0 sits at the bottom.
        let bottom = f64::from(plot.height()) - row as f64 * cell_height;
        let top = (bottom - cell_height).round() as i32;
        let bottom = bottom.round() as i32;
        for (column, datum) in series.data.iter().enumerate() {
            if !datum.value.is_finite() {
                continue;
            }
            let left = (column as f64 * cell_width).round() as i32;
            let right = ((column + 1) as f64 * cell_width).round() as i32;
            let color = low.mix(high, ramp_ratio(datum.value, min, max));
            plot.filled_rect(
                left + CELL_GAP,
                top + CELL_GAP,
                right - CELL_GAP,
                bottom - CELL_GAP,
                color,
                Color::TRANSPARENT,
                0.0,
            );
            if option.show_values {
                let text = formatter.format(datum.value);
                let size = plot.measure_text(&text, 0.0, &font_style);
                let ascent = plot.text_metrics(&text, &font_style).ascent.round() as i32;
                let text_style = if color.is_dark() {
                    font_style.clone().with_color(Color::WHITE)
                } else {
                    font_style.clone().with_color(Color::BLACK)
                };
                plot.text(
                    &text,
                    (left + right - size.width()) / 2,
                    (top + bottom - size.height()) / 2 + ascent,
                    0.0,
                    &text_style,
                );
            }
        }
    }
    debug!(rows = option.series.len(), min, max, "heat map rendered");
    Ok(painter.bounds())
}
