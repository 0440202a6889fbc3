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
use crate::core::{Bounds, CategoryScale, Color, Point, ValueFormatter};
use crate::error::{ChartError, ChartResult};
use crate::render::{Painter, Style};
use crate::theme::ColorPalette;

const DEFAULT_LINE_WIDTH: f64 = 2.0;
const SYMBOL_RADIUS: f64 = 2.0;
const AREA_ALPHA: u8 = 51;
const LABEL_OFFSET: i32 = 5;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineChartOption {
    #[serde(skip)]
    pub theme: Option<Arc<ColorPalette>>,
    pub padding: Bounds,
    pub background_color: Color,
    pub title: TitleOption,
    pub legend: LegendOption,
    pub x_axis: AxisOption,
    pub y_axes: Vec<AxisOption>,
    pub series: Vec<Series>,
    pub smooth: bool,
    pub fill_area: bool,
    pub symbol_show: Option<bool>,
    /// Line width in pixels; zero uses the default.
    pub stroke_width: f64,
    #[serde(skip)]
    pub value_formatter: Option<ValueFormatter>,
}

impl LineChartOption {
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
    pub fn with_padding(mut self, padding: Bounds) -> Self {
        self.padding = padding;
        self
    }

    #[must_use]
    pub fn with_theme(mut self, theme: Arc<ColorPalette>) -> Self {
        self.theme = Some(theme);
        self
    }

    #[must_use]
    pub fn with_smooth(mut self, smooth: bool) -> Self {
        self.smooth = smooth;
        self
    }

    #[must_use]
    pub fn with_fill_area(mut self, fill_area: bool) -> Self {
        self.fill_area = fill_area;
        self
    }
}

/// Plotted position of every datum; non-finite values have none.
pub(crate) fn series_points(
    series: &Series,
    category: &CategoryScale,
    value_to_y: impl Fn(f64) -> f64,
    width: i32,
) -> Vec<Option<Point>> {
    series
        .data
        .iter()
        .enumerate()
        .map(|(index, datum)| {
            if !datum.value.is_finite() {
                return None;
            }
            let x = category.position(index, f64::from(width)).round() as i32;
            Some(Point::new(x, value_to_y(datum.value).round() as i32))
        })
        .collect()
}

/// Consecutive runs of plotted points, split at gaps.
fn segments(points: &[Option<Point>]) -> Vec<Vec<Point>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for point in points {
        match point {
            Some(point) => current.push(*point),
            None if !current.is_empty() => runs.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

pub fn render_line_chart(painter: &Painter, option: &LineChartOption) -> ChartResult<Bounds> {
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
            default_boundary_gap: true,
        },
    )?;
    let plot = &result.plot;
    let category = result
        .category
        .ok_or_else(|| ChartError::geometry("line chart requires a category axis"))?;
    let theme = plot.theme();
    let colors = series_colors(theme, &option.series);
    let formatter = option.value_formatter.clone().unwrap_or_default();
    let stroke_width = if option.stroke_width > 0.0 {
        option.stroke_width
    } else {
        DEFAULT_LINE_WIDTH
    };
    let height = f64::from(plot.height());

    for (index, series) in option.series.iter().enumerate() {
        let scale = result
            .value_scales
            .get(series.y_axis_index)
            .ok_or_else(|| {
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
        let runs = segments(&points);

        if option.fill_area {
            let area = plot.with_drawing_style(&Style::fill(color.with_alpha(AREA_ALPHA)));
            for run in &runs {
                if let (Some(first), Some(last)) = (run.first(), run.last()) {
                    let mut polygon = run.clone();
                    polygon.push(Point::new(last.x, plot.height()));
                    polygon.push(Point::new(first.x, plot.height()));
                    area.fill_area(&polygon);
                }
            }
        }

        let line = plot.with_drawing_style(&Style::stroke(stroke_width, color));
        for run in &runs {
            if option.smooth {
                line.smooth_line_stroke(run);
            } else {
                line.line_stroke(run);
            }
        }

        if option.symbol_show != Some(false) {
            let dot = plot.with_drawing_style(
                &Style::stroke(1.0, color).with_fill_color(theme.background_color()),
            );
            for run in &runs {
                dot.dots(run, SYMBOL_RADIUS);
            }
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
                    point.y - LABEL_OFFSET - series.label.distance,
                    0.0,
                    &font_style,
                );
            }
        }

        render_mark_points(plot, series, color, &points, &formatter);
        render_mark_lines(plot, series, color, scale, &formatter);
    }
    debug!(series = option.series.len(), "line chart rendered");
    Ok(painter.bounds())
}
