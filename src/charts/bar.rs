use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::charts::axis::AxisOption;
use crate::charts::chrome::{AxisLayout, ChromeOptions, render_chrome, series_colors};
use crate::charts::legend::LegendOption;
use crate::charts::mark::{render_mark_lines, render_mark_points};
use crate::charts::series::{Series, ensure_series};
use crate::charts::title::TitleOption;
use crate::charts::{themed, value_label_style};
use crate::core::{Bounds, Color, Point, ValueFormatter};
use crate::error::{ChartError, ChartResult};
use crate::render::{Painter, Style};
use crate::theme::ColorPalette;

const LABEL_OFFSET: i32 = 5;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BarChartOption {
    #[serde(skip)]
    pub theme: Option<Arc<ColorPalette>>,
    pub padding: Bounds,
    pub background_color: Color,
    pub title: TitleOption,
    pub legend: LegendOption,
    pub x_axis: AxisOption,
    pub y_axes: Vec<AxisOption>,
    pub series: Vec<Series>,
    /// Fixed bar width in pixels; zero derives it from the band.
    pub bar_width: i32,
    /// Corner radius of the bar end away from the baseline.
    pub round_radius: i32,
    #[serde(skip)]
    pub value_formatter: Option<ValueFormatter>,
}

impl BarChartOption {
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
        self.y_axes.push(y_axis);
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

    #[must_use]
    pub fn with_theme(mut self, theme: Arc<ColorPalette>) -> Self {
        self.theme = Some(theme);
        self
    }

    #[must_use]
    pub fn with_round_radius(mut self, radius: i32) -> Self {
        self.round_radius = radius;
        self
    }
}

/// Outer margin and inter-bar gap for a category band.
pub(crate) fn bar_margins(band: i32) -> (i32, i32) {
    if band < 20 {
        (2, 2)
    } else if band < 50 {
        (5, 3)
    } else {
        (10, 5)
    }
}

/// Width of each of `count` bars sharing one band.
pub(crate) fn bar_width(band: i32, count: usize, fixed: i32) -> i32 {
    let (margin, bar_margin) = bar_margins(band);
    let count = count.max(1) as i32;
    let derived = (band - 2 * margin - bar_margin * (count - 1)) / count;
    let width = if fixed > 0 { fixed.min(derived.max(1)) } else { derived };
    width.max(1)
}

pub fn render_bar_chart(painter: &Painter, option: &BarChartOption) -> ChartResult<Bounds> {
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
            include_zero: true,
            default_boundary_gap: true,
        },
    )?;
    let plot = &result.plot;
    let category = result
        .category
        .ok_or_else(|| ChartError::geometry("bar chart requires a category axis"))?;
    let colors = series_colors(plot.theme(), &option.series);
    let formatter = option.value_formatter.clone().unwrap_or_default();
    let height = f64::from(plot.height());
    let band = category.band_width(f64::from(plot.width())) as i32;
    let (margin, bar_margin) = bar_margins(band);
    let count = option.series.len();
    let width = bar_width(band, count, option.bar_width);
    let group_width = width * count as i32 + bar_margin * (count as i32 - 1);
    let group_offset = if option.bar_width > 0 {
        (band - group_width) / 2
    } else {
        margin
    };

    for (index, series) in option.series.iter().enumerate() {
        let scale = result.value_scales.get(series.y_axis_index).ok_or_else(|| {
            ChartError::validation(format!(
                "series `{}` references missing y axis {}",
                series.name, series.y_axis_index
            ))
        })?;
        let color = colors[index];
        let baseline = scale
            .value_to_vertical_pixel(0.0_f64.clamp(scale.min(), scale.max()), 0.0, height)
            .round() as i32;
        let mut tops = Vec::with_capacity(series.data.len());
        for (datum_index, datum) in series.data.iter().enumerate() {
            if !datum.value.is_finite() {
                tops.push(None);
                continue;
            }
            let x = datum_index as i32 * band + group_offset + index as i32 * (width + bar_margin);
            let y = scale
                .value_to_vertical_pixel(datum.value, 0.0, height)
                .round() as i32;
            let (top, bottom) = if y <= baseline { (y, baseline) } else { (baseline, y) };
            let mut fill = Style::fill(color);
            if let Some(style) = &datum.style {
                fill.merge_drawing(style);
            }
            let bar = plot.with_drawing_style(&fill);
            let rect = Bounds::new(x, top, x + width, bottom);
            if option.round_radius > 0 {
                let upward = y <= baseline;
                bar.rounded_rect(rect, option.round_radius, upward, !upward);
            } else {
                plot.filled_rect(x, top, x + width, bottom, fill.fill_color, Color::TRANSPARENT, 0.0);
            }
            tops.push(Some(Point::new(x + width / 2, y)));

            if series.label.show == Some(true) {
                let font_style = value_label_style(plot, &series.label);
                let text = formatter.format(datum.value);
                let size = plot.measure_text(&text, 0.0, &font_style);
                let text_y = if y <= baseline {
                    top - LABEL_OFFSET - series.label.distance
                } else {
                    bottom + LABEL_OFFSET + series.label.distance + size.height()
                };
                plot.text(&text, x + (width - size.width()) / 2, text_y, 0.0, &font_style);
            }
        }
        render_mark_points(plot, series, color, &tops, &formatter);
        render_mark_lines(plot, series, color, scale, &formatter);
    }
    debug!(series = count, band, bar_width = width, "bar chart rendered");
    Ok(painter.bounds())
}

#[cfg(test)]
mod tests {
    use super::{bar_margins, bar_width};

    #[test]
    fn margins_shrink_with_narrow_bands() {
        assert_eq!(bar_margins(15), (2, 2));
        assert_eq!(bar_margins(30), (5, 3));
        assert_eq!(bar_margins(80), (10, 5));
    }

    #[test]
    fn bars_share_the_band() {
        assert_eq!(bar_width(100, 2, 0), 37);
        assert_eq!(bar_width(100, 2, 20), 20);
        assert_eq!(bar_width(10, 4, 0), 1);
    }
}
