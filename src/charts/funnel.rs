use std::cmp::Reverse;
use std::sync::Arc;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::charts::axis::AxisOption;
use crate::charts::chrome::{ChromeOptions, render_chrome, series_colors};
use crate::charts::legend::LegendOption;
use crate::charts::series::{Series, SeriesLabel, ensure_series};
use crate::charts::themed;
use crate::charts::title::TitleOption;
use crate::core::{Bounds, Color, Point, ValueFormatter, format_label_template};
use crate::error::{ChartError, ChartResult};
use crate::render::{Painter, Style};
use crate::theme::ColorPalette;

const GAP: i32 = 2;
const DEFAULT_TEMPLATE: &str = "{b}({d})";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FunnelChartOption {
    #[serde(skip)]
    pub theme: Option<Arc<ColorPalette>>,
    pub padding: Bounds,
    pub background_color: Color,
    pub title: TitleOption,
    pub legend: LegendOption,
    /// One layer per series; each series contributes its first value.
    pub series: Vec<Series>,
    pub label: SeriesLabel,
    #[serde(skip)]
    pub value_formatter: Option<ValueFormatter>,
}

impl FunnelChartOption {
    #[must_use]
    pub fn new(series: Vec<Series>) -> Self {
        Self {
            series,
            ..Self::default()
        }
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

/// One funnel layer: the top edge spans `width`, the bottom edge spans
/// `next_width`.
#[derive(Debug, Clone, PartialEq)]
pub struct FunnelLayer {
    pub series: usize,
    pub value: f64,
    pub percent: f64,
    pub top: i32,
    pub height: i32,
    pub width: i32,
    pub next_width: i32,
}

/// Layers sorted by descending value, widths proportional to the maximum.
pub fn funnel_layers(series: &[Series], width: i32, height: i32) -> ChartResult<Vec<FunnelLayer>> {
    ensure_series(series)?;
    let mut values: Vec<(usize, f64)> = series
        .iter()
        .enumerate()
        .map(|(index, item)| (index, item.data.first().map_or(0.0, |datum| datum.value)))
        .collect();
    if let Some((index, _)) = values.iter().find(|(_, value)| *value < 0.0 || !value.is_finite()) {
        return Err(ChartError::validation(format!(
            "funnel: unsupported value at series index {index}"
        )));
    }
    values.sort_by_key(|(_, value)| Reverse(OrderedFloat(*value)));
    let max = values.first().map_or(0.0, |(_, value)| *value);
    let count = values.len() as i32;
    let layer_height = (height - GAP * (count - 1)) / count;
    if layer_height <= 0 {
        return Err(ChartError::geometry(format!(
            "funnel: {count} layers do not fit in {height}px"
        )));
    }
    let scaled = |value: f64| {
        if max > 0.0 {
            (f64::from(width) * value / max).round() as i32
        } else {
            0
        }
    };
    Ok(values
        .iter()
        .enumerate()
        .map(|(position, (index, value))| {
            let next = values.get(position + 1).map_or(*value, |(_, next)| *next);
            FunnelLayer {
                series: *index,
                value: *value,
                percent: if max > 0.0 { value / max } else { 0.0 },
                top: position as i32 * (layer_height + GAP),
                height: layer_height,
                width: scaled(*value),
                next_width: scaled(next),
            }
        })
        .collect())
}

pub fn render_funnel_chart(painter: &Painter, option: &FunnelChartOption) -> ChartResult<Bounds> {
    ensure_series(&option.series)?;
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
    let colors = series_colors(plot.theme(), &option.series);
    let formatter = option.value_formatter.clone().unwrap_or_default();
    let layers = funnel_layers(&option.series, plot.width(), plot.height())?;
    let center_x = plot.width() / 2;
    let template = if option.label.template.is_empty() {
        DEFAULT_TEMPLATE
    } else {
        option.label.template.as_str()
    };
    let font_style = plot.resolve_font_style(&option.label.font_style);

    for layer in &layers {
        let series = &option.series[layer.series];
        let color = colors[layer.series];
        let bottom = layer.top + layer.height;
        let outline = [
            Point::new(center_x - layer.width / 2, layer.top),
            Point::new(center_x + layer.width / 2, layer.top),
            Point::new(center_x + layer.next_width / 2, bottom),
            Point::new(center_x - layer.next_width / 2, bottom),
            Point::new(center_x - layer.width / 2, layer.top),
        ];
        plot.with_drawing_style(&Style::fill(color)).fill_area(&outline);

        if option.label.show == Some(false) || series.label.show == Some(false) {
            continue;
        }
        let text = format_label_template(template, &series.name, layer.value, Some(layer.percent), &formatter);
        let size = plot.measure_text(&text, 0.0, &font_style);
        let ascent = plot.text_metrics(&text, &font_style).ascent.round() as i32;
        plot.text(
            &text,
            center_x - size.width() / 2,
            layer.top + (layer.height - size.height()) / 2 + ascent,
            0.0,
            &font_style,
        );
    }
    debug!(layers = layers.len(), "funnel chart rendered");
    Ok(painter.bounds())
}

#[cfg(test)]
mod tests {
    use super::funnel_layers;
    use crate::charts::series::new_pie_series_list;

    #[test]
    fn layers_are_sorted_and_scaled() {
        let layers = funnel_layers(&new_pie_series_list(&[20.0, 100.0, 60.0]), 200, 302).unwrap();
        let order: Vec<usize> = layers.iter().map(|layer| layer.series).collect();
        assert_eq!(order, vec![1, 2, 0]);
        assert_eq!(layers[0].width, 200);
        assert_eq!(layers[0].next_width, 120);
        assert_eq!(layers[2].width, 40);
        assert_eq!(layers[2].next_width, 40);
        assert_eq!(layers[1].top, 101);
        assert_eq!(layers[0].height, 99);
    }
}
