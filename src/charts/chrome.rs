//! Shared chart frame: background, title, legend and axes around a plot.

use tracing::debug;

use crate::charts::axis::{
    AxisOption, AxisPosition, AxisTick, axis_thickness, category_ticks, draw_axis,
    draw_split_lines, resolve_value_scale, value_ticks,
};
use crate::charts::legend::{LegendOption, render_legend};
use crate::charts::series::{Series, axis_value_range, max_data_len};
use crate::charts::title::{TitleOption, render_title};
use crate::core::{Bounds, CategoryScale, Color, NiceScale};
use crate::error::{ChartError, ChartResult};
use crate::render::Painter;
use crate::theme::ColorPalette;

/// Default inset between the canvas edge and the chart.
pub const DEFAULT_CHART_PADDING: i32 = 20;
const LEGEND_MARGIN: i32 = 10;
const MAX_Y_AXES: usize = 2;

/// How the axes of a chart are arranged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AxisLayout {
    /// Category X at the bottom, one or two value Y axes.
    CategoryX,
    /// Category Y on the left, value X at the bottom.
    CategoryY,
    /// Category axes on both X and Y.
    CategoryXY,
}

pub(crate) struct ChromeOptions<'a> {
    pub padding: Bounds,
    pub background: Color,
    pub title: &'a TitleOption,
    pub legend: &'a LegendOption,
    pub series: &'a [Series],
    pub x_axis: &'a AxisOption,
    pub y_axes: &'a [AxisOption],
    pub layout: Option<AxisLayout>,
    /// Value axes always include zero (bars grow from it).
    pub include_zero: bool,
    pub default_boundary_gap: bool,
}

/// Output of the shared chart frame.
#[derive(Debug, Clone)]
pub struct RenderResult {
    /// Plotting region left after title, legend and axes.
    pub plot: Painter,
    pub title_box: Bounds,
    pub legend_box: Bounds,
    /// Category axis: X for column charts, Y for horizontal bars.
    pub category: Option<CategoryScale>,
    /// Y categories of a heat map.
    pub secondary_category: Option<CategoryScale>,
    /// Value axes: one per Y axis, or the X axis of horizontal bars.
    pub value_scales: Vec<NiceScale>,
}

/// Colors for `series`, honoring per-series overrides.
pub(crate) fn series_colors(theme: &ColorPalette, series: &[Series]) -> Vec<Color> {
    series
        .iter()
        .enumerate()
        .map(|(index, item)| {
            if item.color.is_zero() {
                theme.series_color(index)
            } else {
                item.color
            }
        })
        .collect()
}

/// Padding value, `Bounds::ZERO` meaning the default.
pub(crate) fn resolve_padding(padding: Bounds) -> Bounds {
    if padding.is_zero() {
        Bounds::uniform(DEFAULT_CHART_PADDING)
    } else {
        padding
    }
}

pub(crate) fn render_chrome(painter: &Painter, options: &ChromeOptions<'_>) -> ChartResult<RenderResult> {
    let theme = painter.theme();
    let background = if options.background.is_zero() {
        theme.background_color()
    } else {
        options.background
    };
    painter.set_background(painter.width(), painter.height(), background, false);

    let padded = painter.child_with_padding(resolve_padding(options.padding));
    let title_box = render_title(&padded, options.title)?;

    let names: Vec<String> = options.series.iter().map(|item| item.name.clone()).collect();
    let colors = series_colors(theme, options.series);
    let legend_box = render_legend(&padded, options.legend, &names, &colors)?;

    let mut top = 0;
    let mut bottom = padded.height();
    if !title_box.is_zero() {
        if options.title.is_bottom() {
            bottom = bottom.min(title_box.top);
        } else {
            top = top.max(title_box.bottom);
        }
    }
    if !legend_box.is_zero() && options.legend.overlay_chart != Some(true) {
        if options.legend.is_bottom() {
            bottom = bottom.min(legend_box.top - LEGEND_MARGIN);
        } else {
            top = top.max(legend_box.bottom + LEGEND_MARGIN);
        }
    }
    if bottom <= top {
        return Err(ChartError::geometry(format!(
            "no room left for the plot: top={top}, bottom={bottom}"
        )));
    }
    let area = padded.child_at(Bounds::new(0, top, padded.width(), bottom));

    let result = match options.layout {
        None => RenderResult {
            plot: area,
            title_box,
            legend_box,
            category: None,
            secondary_category: None,
            value_scales: Vec::new(),
        },
        Some(AxisLayout::CategoryX) => render_category_x(&area, options, title_box, legend_box)?,
        Some(AxisLayout::CategoryY) => render_category_y(&area, options, title_box, legend_box)?,
        Some(AxisLayout::CategoryXY) => render_category_xy(&area, options, title_box, legend_box)?,
    };
    debug!(
        plot_width = result.plot.width(),
        plot_height = result.plot.height(),
        value_axes = result.value_scales.len(),
        "chart chrome rendered"
    );
    Ok(result)
}

fn default_y_axis() -> AxisOption {
    AxisOption::default()
}

fn y_axis_options(options: &ChromeOptions<'_>) -> ChartResult<Vec<AxisOption>> {
    if options.y_axes.len() > MAX_Y_AXES {
        return Err(ChartError::validation(format!(
            "at most {MAX_Y_AXES} y axes are supported, got {}",
            options.y_axes.len()
        )));
    }
    let needed = options
        .series
        .iter()
        .map(|item| item.y_axis_index + 1)
        .max()
        .unwrap_or(1);
    if needed > MAX_Y_AXES {
        return Err(ChartError::validation(format!(
            "series y_axis_index must be 0 or 1, got {}",
            needed - 1
        )));
    }
    let mut axes: Vec<AxisOption> = options.y_axes.to_vec();
    while axes.len() < needed {
        axes.push(default_y_axis());
    }
    if axes.is_empty() {
        axes.push(default_y_axis());
    }
    Ok(axes)
}

fn labels_of(ticks: &[AxisTick]) -> Vec<String> {
    ticks.iter().filter_map(|tick| tick.label.clone()).collect()
}

fn render_category_x(
    area: &Painter,
    options: &ChromeOptions<'_>,
    title_box: Bounds,
    legend_box: Bounds,
) -> ChartResult<RenderResult> {
    let y_axes = y_axis_options(options)?;
    let x_axis = options.x_axis;
    let count = x_axis.data.len().max(max_data_len(options.series));
    let boundary_gap = x_axis.boundary_gap.unwrap_or(options.default_boundary_gap);
    let category = CategoryScale::new(count, boundary_gap);

    let x_height = axis_thickness(area, x_axis, &x_axis.data, AxisPosition::Bottom);
    let plot_height = area.height() - x_height;
    if plot_height <= 0 {
        return Err(ChartError::geometry(format!(
            "x axis needs {x_height}px but only {}px are available",
            area.height()
        )));
    }

    let mut scales = Vec::with_capacity(y_axes.len());
    let mut y_ticks = Vec::with_capacity(y_axes.len());
    let mut widths = Vec::with_capacity(y_axes.len());
    for (index, axis) in y_axes.iter().enumerate() {
        let range = axis_value_range(options.series, index);
        let scale = resolve_value_scale(axis, range, plot_height, options.include_zero)?;
        let ticks = value_ticks(&scale, axis, plot_height, true);
        let position = if index == 0 {
            AxisPosition::Left
        } else {
            AxisPosition::Right
        };
        widths.push(axis_thickness(area, axis, &labels_of(&ticks), position));
        scales.push(scale);
        y_ticks.push(ticks);
    }
    let left_width = widths.first().copied().unwrap_or(0);
    let right_width = widths.get(1).copied().unwrap_or(0);
    let plot_width = area.width() - left_width - right_width;
    if plot_width <= 0 {
        return Err(ChartError::geometry(format!(
            "y axes need {}px but only {}px are available",
            left_width + right_width,
            area.width()
        )));
    }

    let plot = area.child_at(Bounds::from_size(left_width, 0, plot_width, plot_height));
    for (index, (axis, ticks)) in y_axes.iter().zip(&y_ticks).enumerate() {
        if index == 0 && axis.split_line_show != Some(false) {
            draw_split_lines(&plot, ticks, true, true);
        }
        let (position, axis_box) = if index == 0 {
            (AxisPosition::Left, Bounds::from_size(0, 0, left_width, plot_height))
        } else {
            (
                AxisPosition::Right,
                Bounds::from_size(left_width + plot_width, 0, right_width, plot_height),
            )
        };
        draw_axis(
            &area.child_at(axis_box),
            axis,
            ticks,
            position,
            axis.tick_show.unwrap_or(false),
            axis.spine_show.unwrap_or(false),
        );
    }

    let x_ticks = category_ticks(&category, x_axis, plot_width);
    if x_axis.split_line_show == Some(true) {
        draw_split_lines(&plot, &x_ticks, false, false);
    }
    draw_axis(
        &area.child_at(Bounds::from_size(left_width, plot_height, plot_width, x_height)),
        x_axis,
        &x_ticks,
        AxisPosition::Bottom,
        x_axis.tick_show.unwrap_or(true),
        x_axis.spine_show.unwrap_or(true),
    );

    Ok(RenderResult {
        plot,
        title_box,
        legend_box,
        category: Some(category),
        secondary_category: None,
        value_scales: scales,
    })
}

fn render_category_y(
    area: &Painter,
    options: &ChromeOptions<'_>,
    title_box: Bounds,
    legend_box: Bounds,
) -> ChartResult<RenderResult> {
    let default_axis = default_y_axis();
    let y_axis = options.y_axes.first().unwrap_or(&default_axis);
    let x_axis = options.x_axis;
    let count = y_axis.data.len().max(max_data_len(options.series));
    let category = CategoryScale::new(count, y_axis.boundary_gap.unwrap_or(true));

    let left_width = axis_thickness(area, y_axis, &y_axis.data, AxisPosition::Left);
    let plot_width = area.width() - left_width;
    if plot_width <= 0 {
        return Err(ChartError::geometry(format!(
            "y axis needs {left_width}px but only {}px are available",
            area.width()
        )));
    }
    let range = options
        .series
        .iter()
        .filter_map(Series::min_max)
        .fold(None, |acc: Option<(f64, f64)>, (min, max)| match acc {
            None => Some((min, max)),
            Some((low, high)) => Some((low.min(min), high.max(max))),
        });
    let scale = resolve_value_scale(x_axis, range, plot_width, options.include_zero)?;
    let x_ticks = value_ticks(&scale, x_axis, plot_width, false);
    let x_height = axis_thickness(area, x_axis, &labels_of(&x_ticks), AxisPosition::Bottom);
    let plot_height = area.height() - x_height;
    if plot_height <= 0 {
        return Err(ChartError::geometry(format!(
            "x axis needs {x_height}px but only {}px are available",
            area.height()
        )));
    }

    let plot = area.child_at(Bounds::from_size(left_width, 0, plot_width, plot_height));
    if x_axis.split_line_show != Some(false) {
        draw_split_lines(&plot, &x_ticks, false, true);
    }
    draw_axis(
        &area.child_at(Bounds::from_size(left_width, plot_height, plot_width, x_height)),
        x_axis,
        &x_ticks,
        AxisPosition::Bottom,
        x_axis.tick_show.unwrap_or(false),
        x_axis.spine_show.unwrap_or(false),
    );
    let y_ticks = category_ticks(&category, y_axis, plot_height);
    draw_axis(
        &area.child_at(Bounds::from_size(0, 0, left_width, plot_height)),
        y_axis,
        &y_ticks,
        AxisPosition::Left,
        y_axis.tick_show.unwrap_or(true),
        y_axis.spine_show.unwrap_or(true),
    );

    Ok(RenderResult {
        plot,
        title_box,
        legend_box,
        category: Some(category),
        secondary_category: None,
        value_scales: vec![scale],
    })
}

fn render_category_xy(
    area: &Painter,
    options: &ChromeOptions<'_>,
    title_box: Bounds,
    legend_box: Bounds,
) -> ChartResult<RenderResult> {
    let default_axis = default_y_axis();
    let y_axis = options.y_axes.first().unwrap_or(&default_axis);
    let x_axis = options.x_axis;
    let x_category = CategoryScale::new(
        x_axis.data.len().max(max_data_len(options.series)),
        true,
    );
    let y_category = CategoryScale::new(y_axis.data.len().max(options.series.len()), true);

    let left_width = axis_thickness(area, y_axis, &y_axis.data, AxisPosition::Left);
    let x_height = axis_thickness(area, x_axis, &x_axis.data, AxisPosition::Bottom);
    let plot_width = area.width() - left_width;
    let plot_height = area.height() - x_height;
    if plot_width <= 0 || plot_height <= 0 {
        return Err(ChartError::geometry(format!(
            "axes leave no plot area: {plot_width}x{plot_height}"
        )));
    }
    let plot = area.child_at(Bounds::from_size(left_width, 0, plot_width, plot_height));

    let x_ticks = category_ticks(&x_category, x_axis, plot_width);
    draw_axis(
        &area.child_at(Bounds::from_size(left_width, plot_height, plot_width, x_height)),
        x_axis,
        &x_ticks,
        AxisPosition::Bottom,
        x_axis.tick_show.unwrap_or(false),
        x_axis.spine_show.unwrap_or(false),
    );
    // Row 0 is drawn at the bottom.
    let y_ticks: Vec<AxisTick> = category_ticks(&y_category, y_axis, plot_height)
        .into_iter()
        .map(|tick| AxisTick {
            offset: plot_height - tick.offset,
            label: tick.label,
        })
        .collect();
    draw_axis(
        &area.child_at(Bounds::from_size(0, 0, left_width, plot_height)),
        y_axis,
        &y_ticks,
        AxisPosition::Left,
        y_axis.tick_show.unwrap_or(false),
        y_axis.spine_show.unwrap_or(false),
    );

    Ok(RenderResult {
        plot,
        title_box,
        legend_box,
        category: Some(x_category),
        secondary_category: Some(y_category),
        value_scales: Vec::new(),
    })
}
