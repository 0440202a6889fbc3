use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::charts::axis::AxisOption;
use crate::charts::chrome::{AxisLayout, ChromeOptions, render_chrome, series_colors};
use crate::charts::legend::LegendOption;
use crate::charts::line::series_points;
use crate::charts::series::{Series, ensure_series};
use crate::charts::title::TitleOption;
use crate::charts::{themed, value_label_style};
use crate::core::{Bounds, Color, ValueFormatter};
use crate::error::{ChartError, ChartResult};
use crate::render::{Painter, Style};
use crate::theme::ColorPalette;

const DEFAULT_SYMBOL_SIZE: f64 = 10.0;
const LABEL_OFFSET: i32 = 3;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScatterChartOption {
    #[serde(skip)]
    pub theme: Option<Arc<ColorPalette>>,
    pub padding: Bounds,
    pub background_color: Color,
    pub title: TitleOption,
    pub legend: LegendOption,
    pub x_axis: AxisOption,
    pub y_axes: Vec<AxisOption>,
    pub series: Vec<Series>,
    /// Dot diameter in pixels; zero uses the default.
    pub symbol_size: f64,
    #[serde(skip)]
    pub value_formatter: Option<ValueFormatter>,
}

impl ScatterChartOption {
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
    pub fn with_symbol_size(mut self, size: f64) -> Self {
        self.symbol_size = size;
        self
    }
}

pub fn render_scatter_chart(painter: &Painter, option: &ScatterChartOption) -> ChartResult<Bounds> {
    ensure_series(&option.series)?;
    let painter = themed(painter, option.theme.as_ref());
    let result = render_chrome(
        &painter,
        &ChromeOptions {
            padding: option.padding,
            background: option.background_color,
            title: &option.title,
            legend: &option.legend,
            series: &option.series,
            x_axis: &option.x_axis,
            y_axes: &option.y_axes,
            layout: Some(AxisLayout::CategoryX),
            include_zero: false,
            default_boundary_gap: false,
        },
    )?;
    let plot = &result.plot;
    let category = result
        .category
        .ok_or_else(|| ChartError::geometry("scatter chart requires a category axis"))?;
    let colors = series_colors(plot.theme(), &option.series);
    let formatter = option.value_formatter.clone().unwrap_or_default();
    let radius = if option.symbol_size > 0.0 {
        option.symbol_size / 2.0
    } else {
        DEFAULT_SYMBOL_SIZE / 2.0
    };
    let height = f64::from(plot.height());

    for (index, series) in option.series.iter().enumerate() {
        let scale = result.value_scales.get(series.y_axis_index).ok_or_else(|| {
            ChartError::validation(format!(
                "series `{}` references missing y axis {}",
                series.name, series.y_axis_index
            ))
        })?;
        let color = colors[index];
        let points = series_points(
            series,
            &category,
            |value| scale.value_to_vertical_pixel(value, 0.0, height),
            plot.width(),
        );
        let dot = plot.with_drawing_style(&Style::stroke(1.0, color).with_fill_color(color.with_alpha(204)));
        for point in points.iter().flatten() {
            dot.circle(radius, point.x, point.y);
        }
        if series.label.show == Some(true) {
            let font_style = value_label_style(plot, &series.label);
            for (datum, point) in series.data.iter().zip(&points) {
                let Some(point) = point else {
                    continue;
                };
                let text = formatter.format(datum.value);
                let size = plot.measure_text(&text, 0.0, &font_style);
                plot.text(
                    &text,
                    point.x - size.width() / 2,
                    point.y - radius as i32 - LABEL_OFFSET - series.label.distance,
                    0.0,
                    &font_style,
                );
            }
        }
    }
    debug!(series = option.series.len(), "scatter chart rendered");
    Ok(painter.bounds())
}
