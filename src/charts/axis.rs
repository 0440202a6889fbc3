//! Axis options, tick computation and axis painting.

use std::f64::consts::{FRAC_PI_2, PI};

use serde::{Deserialize, Serialize};

use crate::core::scale::{
    VALUE_AXIS_MAX_TICKS, VALUE_AXIS_MIN_TICKS, VALUE_AXIS_TARGET_SPACING_PX,
    axis_tick_target_count,
};
use crate::core::{CategoryScale, NiceScale, Point, ValueFormatter};
use crate::error::ChartResult;
use crate::render::{FontStyle, Painter, Style};

pub(crate) const TICK_LENGTH: i32 = 5;
pub(crate) const LABEL_GAP: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisPosition {
    #[default]
    Bottom,
    Top,
    Left,
    Right,
}

impl AxisPosition {
    #[must_use]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Bottom | Self::Top)
    }
}

/// Per-axis configuration. Category axes read `data`; value axes read
/// `min`/`max`, `label_count` and `formatter`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AxisOption {
    pub show: Option<bool>,
    pub data: Vec<String>,
    pub position: Option<AxisPosition>,
    /// Desired value label count; zero derives it from the axis length.
    pub label_count: usize,
    pub label_skip: usize,
    pub boundary_gap: Option<bool>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    #[serde(skip)]
    pub formatter: Option<ValueFormatter>,
    /// Label rotation in radians.
    pub label_rotation: f64,
    pub font_style: FontStyle,
    pub title: String,
    pub title_font_style: FontStyle,
    pub split_line_show: Option<bool>,
    pub spine_show: Option<bool>,
    pub tick_show: Option<bool>,
}

impl AxisOption {
    #[must_use]
    pub fn categories(data: &[&str]) -> Self {
        Self {
            data: data.iter().map(|item| (*item).to_owned()).collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_label_count(mut self, count: usize) -> Self {
        self.label_count = count;
        self
    }

    #[must_use]
    pub fn with_label_skip(mut self, skip: usize) -> Self {
        self.label_skip = skip;
        self
    }

    #[must_use]
    pub fn with_boundary_gap(mut self, boundary_gap: bool) -> Self {
        self.boundary_gap = Some(boundary_gap);
        self
    }

    #[must_use]
    pub fn with_min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    #[must_use]
    pub fn with_max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    #[must_use]
    pub fn with_formatter(mut self, formatter: ValueFormatter) -> Self {
        self.formatter = Some(formatter);
        self
    }

    #[must_use]
    pub fn with_position(mut self, position: AxisPosition) -> Self {
        self.position = Some(position);
        self
    }

    #[must_use]
    pub fn with_label_rotation(mut self, rotation: f64) -> Self {
        self.label_rotation = rotation;
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_owned();
        self
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.show != Some(false)
    }

    pub(crate) fn formatter_or_default(&self) -> ValueFormatter {
        self.formatter.clone().unwrap_or_default()
    }
}

/// One tick of a resolved axis: pixel offset along the axis and its label.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AxisTick {
    pub offset: i32,
    pub label: Option<String>,
}

/// Value scale for a value axis `span_px` long.
pub(crate) fn resolve_value_scale(
    option: &AxisOption,
    data_range: Option<(f64, f64)>,
    span_px: i32,
    include_zero: bool,
) -> ChartResult<NiceScale> {
    let (mut low, mut high) = data_range.unwrap_or((0.0, 0.0));
    if include_zero {
        low = low.min(0.0);
        high = high.max(0.0);
    }
    let label_count = if option.label_count > 0 {
        option.label_count
    } else {
        axis_tick_target_count(
            f64::from(span_px),
            VALUE_AXIS_TARGET_SPACING_PX,
            VALUE_AXIS_MIN_TICKS,
            VALUE_AXIS_MAX_TICKS,
        )
    };
    NiceScale::with_bounds(low, high, label_count, option.min, option.max)
}

/// Ticks of a value axis; vertical axes grow upward from `span_px`.
pub(crate) fn value_ticks(
    scale: &NiceScale,
    option: &AxisOption,
    span_px: i32,
    vertical: bool,
) -> Vec<AxisTick> {
    let labels = scale.labels(&option.formatter_or_default(), option.label_skip);
    scale
        .ticks()
        .into_iter()
        .zip(labels)
        .map(|(value, label)| {
            let offset = if vertical {
                scale.value_to_vertical_pixel(value, 0.0, f64::from(span_px))
            } else {
                scale.value_to_pixel(value, 0.0, f64::from(span_px))
            };
            AxisTick {
                offset: offset.round() as i32,
                label,
            }
        })
        .collect()
}

/// Ticks of a category axis; skipped labels keep their tick.
pub(crate) fn category_ticks(
    scale: &CategoryScale,
    option: &AxisOption,
    span_px: i32,
) -> Vec<AxisTick> {
    (0..scale.count())
        .map(|index| AxisTick {
            offset: scale.position(index, f64::from(span_px)).round() as i32,
            label: if index % (option.label_skip + 1) == 0 {
                option.data.get(index).cloned()
            } else {
                None
            },
        })
        .collect()
}

pub(crate) fn axis_font_style(painter: &Painter, option: &AxisOption, horizontal: bool) -> FontStyle {
    let theme = painter.theme();
    let color = if horizontal {
        theme.x_axis_text_color()
    } else {
        theme.y_axis_text_color()
    };
    option.font_style.clone().or(&FontStyle::new(0.0, color))
}

/// Space the axis needs across its spine: height for horizontal axes,
/// width for vertical ones.
pub(crate) fn axis_thickness(
    painter: &Painter,
    option: &AxisOption,
    labels: &[String],
    position: AxisPosition,
) -> i32 {
    if !option.is_visible() {
        return 0;
    }
    let horizontal = position.is_horizontal();
    let font_style = axis_font_style(painter, option, horizontal);
    let label_extent = labels
        .iter()
        .map(|label| painter.measure_text(label, option.label_rotation, &font_style))
        .map(|size| if horizontal { size.height() } else { size.width() })
        .max()
        .unwrap_or(0);
    // Labels keep a gap on both sides.
    let mut thickness = TICK_LENGTH + LABEL_GAP + label_extent + LABEL_GAP;
    if !option.title.is_empty() {
        let title_style = axis_title_style(painter, option, horizontal);
        let title = painter.measure_text(&option.title, 0.0, &title_style);
        thickness += title.height();
    }
    thickness
}

fn axis_title_style(painter: &Painter, option: &AxisOption, horizontal: bool) -> FontStyle {
    option
        .title_font_style
        .clone()
        .or(&axis_font_style(painter, option, horizontal))
}

/// Paints spine, ticks, labels and title inside the axis painter.
///
/// The axis painter spans the axis thickness; horizontal axes share their
/// width with the plot, vertical axes their height.
pub(crate) fn draw_axis(
    painter: &Painter,
    option: &AxisOption,
    ticks: &[AxisTick],
    position: AxisPosition,
    show_ticks: bool,
    show_spine: bool,
) {
    if !option.is_visible() {
        return;
    }
    let theme = painter.theme();
    let horizontal = position.is_horizontal();
    let stroke_color = if horizontal {
        theme.x_axis_stroke_color()
    } else {
        theme.y_axis_stroke_color()
    };
    let line = painter.with_drawing_style(&Style::stroke(1.0, stroke_color));
    let (width, height) = (painter.width(), painter.height());

    if show_spine {
        match position {
            AxisPosition::Bottom => line.line_stroke(&[Point::new(0, 0), Point::new(width, 0)]),
            AxisPosition::Top => {
                line.line_stroke(&[Point::new(0, height), Point::new(width, height)])
            }
            AxisPosition::Left => {
                line.line_stroke(&[Point::new(width, 0), Point::new(width, height)])
            }
            AxisPosition::Right => line.line_stroke(&[Point::new(0, 0), Point::new(0, height)]),
        };
    }

    if show_ticks {
        for tick in ticks {
            let segment = match position {
                AxisPosition::Bottom => [Point::new(tick.offset, 0), Point::new(tick.offset, TICK_LENGTH)],
                AxisPosition::Top => [
                    Point::new(tick.offset, height - TICK_LENGTH),
                    Point::new(tick.offset, height),
                ],
                AxisPosition::Left => [
                    Point::new(width - TICK_LENGTH, tick.offset),
                    Point::new(width, tick.offset),
                ],
                AxisPosition::Right => [Point::new(0, tick.offset), Point::new(TICK_LENGTH, tick.offset)],
            };
            line.line_stroke(&segment);
        }
    }

    let font_style = axis_font_style(painter, option, horizontal);
    let rotation = option.label_rotation;
    let mut label_extent = 0;
    for tick in ticks {
        let Some(label) = tick.label.as_deref() else {
            continue;
        };
        let size = painter.measure_text(label, 0.0, &font_style);
        let rotated = painter.measure_text(label, rotation, &font_style);
        let ascent = painter.text_metrics(label, &font_style).ascent.round() as i32;
        label_extent = label_extent.max(if horizontal {
            rotated.height()
        } else {
            rotated.width()
        });
        let (x, y) = match position {
            AxisPosition::Bottom => (
                tick.offset - size.width() / 2,
                TICK_LENGTH + LABEL_GAP + ascent,
            ),
            AxisPosition::Top => (
                tick.offset - size.width() / 2,
                height - TICK_LENGTH - LABEL_GAP - size.height() + ascent,
            ),
            AxisPosition::Left => (
                width - TICK_LENGTH - LABEL_GAP - size.width(),
                tick.offset - size.height() / 2 + ascent,
            ),
            AxisPosition::Right => (
                TICK_LENGTH + LABEL_GAP,
                tick.offset - size.height() / 2 + ascent,
            ),
        };
        painter.text(label, x, y, rotation, &font_style);
    }

    if option.title.is_empty() {
        return;
    }
    let title_style = axis_title_style(painter, option, horizontal);
    let title = painter.measure_text(&option.title, 0.0, &title_style);
    let ascent = painter.text_metrics(&option.title, &title_style).ascent.round() as i32;
    let labels_end = TICK_LENGTH + LABEL_GAP + label_extent + LABEL_GAP;
    match position {
        AxisPosition::Bottom => {
            painter.text(
                &option.title,
                (width - title.width()) / 2,
                labels_end + ascent,
                0.0,
                &title_style,
            );
        }
        AxisPosition::Top => {
            painter.text(
                &option.title,
                (width - title.width()) / 2,
                height - labels_end - title.height() + ascent,
                0.0,
                &title_style,
            );
        }
        AxisPosition::Left => {
            painter.text(
                &option.title,
                width - labels_end - title.height() + ascent,
                (height + title.width()) / 2,
                PI + FRAC_PI_2,
                &title_style,
            );
        }
        AxisPosition::Right => {
            painter.text(
                &option.title,
                labels_end + title.height() - ascent,
                (height - title.width()) / 2,
                FRAC_PI_2,
                &title_style,
            );
        }
    }
}

/// Split lines across the plot for every tick except the baseline one.
pub(crate) fn draw_split_lines(plot: &Painter, ticks: &[AxisTick], horizontal_lines: bool, skip_first: bool) {
    let color = plot.theme().axis_split_line_color();
    let line = plot.with_drawing_style(&Style::stroke(1.0, color));
    for (index, tick) in ticks.iter().enumerate() {
        if skip_first && index == 0 {
            continue;
        }
        if horizontal_lines {
            line.line_stroke(&[Point::new(0, tick.offset), Point::new(plot.width(), tick.offset)]);
        } else {
            line.line_stroke(&[Point::new(tick.offset, 0), Point::new(tick.offset, plot.height())]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AxisOption, category_ticks, resolve_value_scale, value_ticks};
    use crate::core::CategoryScale;

    #[test]
    fn skipped_value_labels_keep_the_bottom_one() {
        let option = AxisOption::default().with_label_count(8).with_label_skip(2);
        let scale = resolve_value_scale(&option, Some((120.0, 1330.0)), 300, false).expect("scale");
        let ticks = value_ticks(&scale, &option, 300, true);
        assert_eq!(ticks.len(), 8);
        let labels: Vec<&str> = ticks.iter().filter_map(|tick| tick.label.as_deref()).collect();
        assert_eq!(labels, vec!["0", "200", "800", "1.4k"]);
        assert_eq!(ticks.last().map(|tick| tick.offset), Some(0));
        assert_eq!(ticks.first().map(|tick| tick.offset), Some(300));
    }

    #[test]
    fn category_ticks_sit_at_band_centers() {
        let option = AxisOption::categories(&["a", "b", "c"]);
        let ticks = category_ticks(&CategoryScale::new(3, true), &option, 300);
        let offsets: Vec<i32> = ticks.iter().map(|tick| tick.offset).collect();
        assert_eq!(offsets, vec![50, 150, 250]);
    }
}
