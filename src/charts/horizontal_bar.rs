use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::charts::axis::AxisOption;
use crate::charts::bar::{bar_margins, bar_width};
use crate::charts::chrome::{AxisLayout, ChromeOptions, render_chrome, series_colors};
use crate::charts::legend::LegendOption;
use crate::charts::series::{Series, ensure_series};
use crate::charts::title::TitleOption;
use crate::charts::{themed, value_label_style};
use crate::core::{Bounds, Color, ValueFormatter};
use crate::error::{ChartError, ChartResult};
use crate::render::Painter;
use crate::theme::ColorPalette;

const LABEL_OFFSET: i32 = 5;

/// Bars grown from the left edge; the category axis is vertical.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HorizontalBarChartOption {
    #[serde(skip)]
    pub theme: Option<Arc<ColorPalette>>,
    pub padding: Bounds,
    pub background_color: Color,
    pub title: TitleOption,
    pub legend: LegendOption,
    /// Value axis.
    pub x_axis: AxisOption,
    /// Category axis.
    pub y_axis: AxisOption,
    pub series: Vec<Series>,
    pub bar_height: i32,
    #[serde(skip)]
    pub value_formatter: Option<ValueFormatter>,
}

impl HorizontalBarChartOption {
    #[must_use]
    pub fn new(series: Vec<Series>) -> Self {
        Self {
            series,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_y_axis(mut self, y_axis: AxisOption) -> Self {
        self.y_axis = y_axis;
        self
    }

    #[must_use]
    pub fn with_x_axis(mut self, x_axis: AxisOption) -> Self {
        self.x_axis = x_axis;
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

pub fn render_horizontal_bar_chart(
    painter: &Painter,
    option: &HorizontalBarChartOption,
) -> ChartResult<Bounds> {
    ensure_series(&option.series)?;
    let painter = themed(painter, option.theme.as_ref());
    let y_axes = [option.y_axis.clone()];
    let result = render_chrome(
        &painter,
        &ChromeOptions {
            padding: option.padding,
            background: option.background_color,
            title: &option.title,
            legend: &option.legend,
            series: &option.series,
            x_axis: &option.x_axis,
            y_axes: &y_axes,
            layout: Some(AxisLayout::CategoryY),
            include_zero: true,
            default_boundary_gap: true,
        },
    )?;
    let plot = &result.plot;
    let category = result
        .category
        .ok_or_else(|| ChartError::geometry("horizontal bar chart requires a category axis"))?;
    let scale = result
        .value_scales
        .first()
        .ok_or_else(|| ChartError::geometry("horizontal bar chart requires a value axis"))?;
    let colors = series_colors(plot.theme(), &option.series);
    let formatter = option.value_formatter.clone().unwrap_or_default();
    let width = f64::from(plot.width());
    let band = category.band_width(f64::from(plot.height())) as i32;
    let (margin, bar_margin) = bar_margins(band);
    let count = option.series.len();
    let height = bar_width(band, count, option.bar_height);
    let baseline = scale
        .value_to_pixel(0.0_f64.clamp(scale.min(), scale.max()), 0.0, width)
        .round() as i32;

    for (index, series) in option.series.iter().enumerate() {
        let color = colors[index];
        for (datum_index, datum) in series.data.iter().enumerate() {
            if !datum.value.is_finite() {
                continue;
            }
            let y = datum_index as i32 * band + margin + index as i32 * (height + bar_margin);
            let x = scale.value_to_pixel(datum.value, 0.0, width).round() as i32;
            let (left, right) = if x >= baseline { (baseline, x) } else { (x, baseline) };
            plot.filled_rect(left, y, right, y + height, color, Color::TRANSPARENT, 0.0);

            if series.label.show == Some(true) {
                let font_style = value_label_style(plot, &series.label);
                let text = formatter.format(datum.value);
                let size = plot.measure_text(&text, 0.0, &font_style);
                let ascent = plot.text_metrics(&text, &font_style).ascent.round() as i32;
                let text_x = if x >= baseline {
                    right + LABEL_OFFSET + series.label.distance
                } else {
                    left - LABEL_OFFSET - series.label.distance - size.width()
                };
                plot.text(
                    &text,
                    text_x,
                    y + (height - size.height()) / 2 + ascent,
                    0.0,
                    &font_style,
                );
            }
        }
    }
    debug!(series = count, band, "horizontal bar chart rendered");
    Ok(painter.bounds())
}
