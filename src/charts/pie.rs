use std::f64::consts::{FRAC_PI_2, TAU};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::charts::chrome::{ChromeOptions, RenderResult, render_chrome, series_colors};
use crate::charts::legend::LegendOption;
use crate::charts::series::{Series, SeriesLabel, ensure_series};
use crate::charts::themed;
use crate::charts::title::TitleOption;
use crate::core::{Bounds, Color, Point, ValueFormatter, format_label_template, parse_flexible_value};
use crate::error::{ChartError, ChartResult};
use crate::render::{FontStyle, Painter, Style};
use crate::theme::{ColorPalette, ring_color};

/// Ring radius used when neither the chart nor a series sets one.
pub const DEFAULT_RADIUS: &str = "40%";
const LABEL_LINE_LENGTH: f64 = 15.0;
const SMALL_LABEL_LINE_LENGTH: f64 = 10.0;
const SMALL_RADIUS: f64 = 50.0;
const LABEL_SEPARATION: f64 = 5.0;
const LABEL_TEXT_GAP: i32 = 3;
/// Vertical room kept above and below the ring for leader lines.
const SIDE_LABEL_ROOM: i32 = 20;
/// Extra room between a top legend and the uppermost side label.
const LEGEND_LABEL_CLEARANCE: i32 = 27;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PieChartOption {
    #[serde(skip)]
    pub theme: Option<Arc<ColorPalette>>,
    pub padding: Bounds,
    pub background_color: Color,
    pub title: TitleOption,
    pub legend: LegendOption,
    /// One sector per series; each series contributes the sum of its data.
    pub series: Vec<Series>,
    /// Ring radius token; empty means the default or the series radii.
    pub radius: String,
    /// Label settings applied to every sector unless a series overrides them.
    pub label: SeriesLabel,
    #[serde(skip)]
    pub value_formatter: Option<ValueFormatter>,
}

impl PieChartOption {
    #[must_use]
    pub fn new(series: Vec<Series>) -> Self {
        Self {
            series,
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

    #[must_use]
    pub fn with_label(mut self, label: SeriesLabel) -> Self {
        self.label = label;
        self
    }

    #[must_use]
    pub fn with_theme(mut self, theme: Arc<ColorPalette>) -> Self {
        self.theme = Some(theme);
        self
    }
}

/// One slice of a pie or doughnut.
#[derive(Debug, Clone, PartialEq)]
pub struct Sector {
    pub index: usize,
    pub value: f64,
    pub percent: f64,
    pub cx: i32,
    pub cy: i32,
    pub radius: f64,
    /// Screen angle in radians; 0 points right and angles grow clockwise.
    pub start: f64,
    pub delta: f64,
    pub mid_angle: f64,
    /// 1 top-right, 4 bottom-right, 3 bottom-left, 2 top-left.
    pub quadrant: u8,
    pub label: String,
    pub color: Color,
    pub show_label: bool,
}

impl Sector {
    /// Point on the ring at the middle of the slice.
    #[must_use]
    pub fn mid_point(&self, radius: f64) -> Point {
        let (sin, cos) = self.mid_angle.sin_cos();
        Point::new(
            self.cx + (radius * cos) as i32,
            self.cy + (radius * sin) as i32,
        )
    }

    fn on_right(&self) -> bool {
        matches!(self.quadrant, 1 | 4)
    }
}

/// Quadrant of a slice whose middle sits at `ratio` of the full turn.
#[must_use]
pub fn quadrant_of(ratio: f64) -> u8 {
    if ratio < 0.25 {
        1
    } else if ratio < 0.5 {
        4
    } else if ratio < 0.75 {
        3
    } else {
        2
    }
}

/// Inputs common to the sector computation of every pie-family chart.
#[derive(Debug, Clone)]
pub struct SectorOptions<'a> {
    pub center: Point,
    pub ring_radius: f64,
    pub diameter: f64,
    pub colors: &'a [Color],
    pub label: &'a SeriesLabel,
    pub formatter: &'a ValueFormatter,
}

fn series_value(series: &Series) -> f64 {
    series.data.iter().map(|datum| datum.value).sum()
}

/// Validates the values and splits the full turn between the series.
pub fn compute_sectors(series: &[Series], options: &SectorOptions<'_>) -> ChartResult<Vec<Sector>> {
    ensure_series(series)?;
    let values: Vec<f64> = series.iter().map(series_value).collect();
    if let Some(index) = values.iter().position(|value| *value < 0.0 || value.is_nan()) {
        return Err(ChartError::validation(format!(
            "pie: unsupported negative value at series index {index}"
        )));
    }
    let total: f64 = values.iter().sum();
    if !(total > 0.0) || !total.is_finite() {
        return Err(ChartError::validation(format!(
            "pie: sum value {total} should be greater than 0"
        )));
    }

    let mut current = 0.0;
    let mut sectors = Vec::with_capacity(series.len());
    for (index, (item, value)) in series.iter().zip(&values).enumerate() {
        let radius = if item.radius.is_empty() {
            options.ring_radius
        } else {
            parse_flexible_value(&item.radius, options.diameter)?
        };
        let start = TAU * current / total - FRAC_PI_2;
        let delta = TAU * value / total;
        let percent = value / total;
        let quadrant = quadrant_of((current + value / 2.0) / total);
        let color = ring_color(options.colors, index, series.len());
        let show_label = item.label.show.or(options.label.show).unwrap_or(true);
        let template = if item.label.template.is_empty() {
            &options.label.template
        } else {
            &item.label.template
        };
        let label = format_label_template(template, &item.name, *value, Some(percent), options.formatter);
        sectors.push(Sector {
            index,
            value: *value,
            percent,
            cx: options.center.x,
            cy: options.center.y,
            radius,
            start,
            delta,
            mid_angle: start + delta / 2.0,
            quadrant,
            label,
            color,
            show_label,
        });
        current += value;
    }
    Ok(sectors)
}

/// Ring radius from the chart token, or the largest series radius.
pub(crate) fn resolve_ring_radius(radius: &str, series: &[Series], diameter: f64) -> ChartResult<f64> {
    if !radius.is_empty() {
        return parse_flexible_value(radius, diameter);
    }
    let default = parse_flexible_value(DEFAULT_RADIUS, diameter)?;
    series
        .iter()
        .filter(|item| !item.radius.is_empty())
        .map(|item| parse_flexible_value(&item.radius, diameter))
        .try_fold(default, |largest, radius| radius.map(|radius| largest.max(radius)))
}

/// Plot frame shared by pie and doughnut charts.
pub(crate) struct PieFrame {
    pub chrome: RenderResult,
    pub center: Point,
    pub diameter: f64,
    pub ring_radius: f64,
    pub sectors: Vec<Sector>,
}

pub(crate) struct PieFrameOptions<'a> {
    pub padding: Bounds,
    pub background: Color,
    pub title: &'a TitleOption,
    pub legend: &'a LegendOption,
    pub series: &'a [Series],
    pub radius: &'a str,
    pub label: &'a SeriesLabel,
    pub formatter: &'a ValueFormatter,
    /// Whether labels are drawn outside the ring.
    pub side_labels: bool,
}

fn shows_side_labels(options: &PieFrameOptions<'_>) -> bool {
    options.side_labels
        && options
            .series
            .iter()
            .any(|item| item.label.show.or(options.label.show).unwrap_or(true))
}

/// Shrinks the plot so leader lines and side labels clear the legend and
/// the canvas edge. Left untouched when the box is too short to give room.
fn reserve_side_label_room(chrome: &RenderResult, legend: &LegendOption) -> Painter {
    let legend_on_top = !chrome.legend_box.is_zero()
        && !legend.is_bottom()
        && legend.overlay_chart != Some(true);
    let top = if legend_on_top {
        SIDE_LABEL_ROOM + LEGEND_LABEL_CLEARANCE
    } else {
        SIDE_LABEL_ROOM
    };
    if chrome.plot.height() - top - SIDE_LABEL_ROOM <= 0 {
        return chrome.plot.clone();
    }
    chrome
        .plot
        .child_with_padding(Bounds::new(0, top, 0, SIDE_LABEL_ROOM))
}

pub(crate) fn prepare_pie(painter: &Painter, options: &PieFrameOptions<'_>) -> ChartResult<PieFrame> {
    ensure_series(options.series)?;
    let no_axis = crate::charts::axis::AxisOption::default();
    let mut chrome = render_chrome(
        painter,
        &ChromeOptions {
            padding: options.padding,
            background: options.background,
            title: options.title,
            legend: options.legend,
            series: options.series,
            x_axis: &no_axis,
            y_axes: &[],
            layout: None,
            include_zero: false,
            default_boundary_gap: false,
        },
    )?;
    if shows_side_labels(options) {
        chrome.plot = reserve_side_label_room(&chrome, options.legend);
    }
    let plot = &chrome.plot;
    let center = Point::new(plot.width() / 2, plot.height() / 2);
    let diameter = f64::from(plot.width().min(plot.height()));
    let ring_radius = resolve_ring_radius(options.radius, options.series, diameter)?;
    let colors = series_colors(plot.theme(), options.series);
    let sectors = compute_sectors(
        options.series,
        &SectorOptions {
            center,
            ring_radius,
            diameter,
            colors: &colors,
            label: options.label,
            formatter: options.formatter,
        },
    )?;
    Ok(PieFrame {
        chrome,
        center,
        diameter,
        ring_radius,
        sectors,
    })
}

/// Fills every sector as a wedge from the center.
pub(crate) fn draw_sectors(plot: &Painter, sectors: &[Sector]) {
    if let [sector] = sectors {
        let wedge = plot.with_drawing_style(&Style::stroke(1.0, sector.color).with_fill_color(sector.color));
        wedge.circle(sector.radius, sector.cx, sector.cy);
        return;
    }
    for sector in sectors {
        let wedge = plot.with_drawing_style(&Style::stroke(1.0, sector.color).with_fill_color(sector.color));
        wedge.move_to(sector.cx, sector.cy);
        wedge.arc_to(
            sector.cx,
            sector.cy,
            sector.radius,
            sector.radius,
            sector.start,
            sector.delta,
        );
        wedge.line_to(sector.cx, sector.cy);
        wedge.close();
        wedge.fill_stroke();
    }
}

/// Vertical position of one side label after de-collision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SideLabel {
    pub sector: usize,
    pub y: f64,
}

fn line_length(radius: f64) -> f64 {
    if radius < SMALL_RADIUS {
        SMALL_LABEL_LINE_LENGTH
    } else {
        LABEL_LINE_LENGTH
    }
}

fn branch_y(sector: &Sector) -> f64 {
    let label_radius = sector.radius + line_length(sector.radius);
    f64::from(sector.cy) + label_radius * sector.mid_angle.sin()
}

/// Nudges side labels within each half so neighbors stay `separation` apart.
///
/// The right half walks the first quadrant upward then the fourth
/// downward; the left half walks the third downward then the second upward.
pub(crate) fn resolve_side_labels(sectors: &[Sector], separation: f64) -> Vec<SideLabel> {
    let visible = |quadrant: u8| {
        sectors
            .iter()
            .filter(move |sector| sector.show_label && sector.quadrant == quadrant)
            .map(|sector| sector.index)
            .collect::<Vec<_>>()
    };
    let mut labels = Vec::new();
    let mut place = |order: Vec<usize>, upward: bool, mut previous: Option<f64>| -> Option<f64> {
        let mut extreme = None;
        for index in order {
            let mut y = branch_y(&sectors[index]);
            if let Some(previous) = previous {
                y = if upward {
                    y.min(previous - separation)
                } else {
                    y.max(previous + separation)
                };
            }
            extreme.get_or_insert(y);
            previous = Some(y);
            labels.push(SideLabel { sector: index, y });
        }
        extreme
    };

    let mut first = visible(1);
    first.reverse();
    let lowest_right = place(first, true, None);
    place(visible(4), false, lowest_right);

    let mut third = visible(3);
    third.reverse();
    let highest_left = place(third, false, None);
    place(visible(2), true, highest_left);
    labels
}

fn side_label_font(plot: &Painter, label: &SeriesLabel, series: &Series) -> FontStyle {
    let mut font_style = label.font_style.clone();
    font_style.merge(&series.label.font_style);
    plot.resolve_font_style(&font_style)
}

/// Draws leader lines and labels outside the ring.
pub(crate) fn draw_side_labels(
    plot: &Painter,
    sectors: &[Sector],
    series: &[Series],
    label: &SeriesLabel,
) {
    let Some(reference) = sectors.first() else {
        return;
    };
    let font_style = side_label_font(plot, label, &series[reference.index]);
    let separation = font_style.size + LABEL_SEPARATION;
    for side in resolve_side_labels(sectors, separation) {
        let sector = &sectors[side.sector];
        let font_style = side_label_font(plot, label, &series[sector.index]);
        let length = line_length(sector.radius);
        let start = sector.mid_point(sector.radius);
        let branch = sector.mid_point(sector.radius + length);
        let branch = Point::new(branch.x, side.y as i32);
        let tail_x = if sector.on_right() {
            branch.x + length as i32
        } else {
            branch.x - length as i32
        };
        let line = plot.with_drawing_style(&Style::stroke(1.0, sector.color));
        line.move_to(start.x, start.y);
        line.line_to(branch.x, branch.y);
        line.line_to(tail_x, branch.y);
        line.stroke();

        let size = plot.measure_text(&sector.label, 0.0, &font_style);
        let text_x = if sector.on_right() {
            tail_x + LABEL_TEXT_GAP
        } else {
            tail_x - LABEL_TEXT_GAP - size.width()
        };
        plot.text(&sector.label, text_x, branch.y + size.height() / 2 - 1, 0.0, &font_style);
    }
}

pub fn render_pie_chart(painter: &Painter, option: &PieChartOption) -> ChartResult<Bounds> {
    let painter = themed(painter, option.theme.as_ref());
    let formatter = option.value_formatter.clone().unwrap_or_default();
    let frame = prepare_pie(
        &painter,
        &PieFrameOptions {
            padding: option.padding,
            background: option.background_color,
            title: &option.title,
            legend: &option.legend,
            series: &option.series,
            radius: &option.radius,
            label: &option.label,
            formatter: &formatter,
            side_labels: true,
        },
    )?;
    let plot = &frame.chrome.plot;
    draw_sectors(plot, &frame.sectors);
    draw_side_labels(plot, &frame.sectors, &option.series, &option.label);
    debug!(
        sectors = frame.sectors.len(),
        radius = frame.ring_radius,
        diameter = frame.diameter,
        cx = frame.center.x,
        cy = frame.center.y,
        "pie chart rendered"
    );
    Ok(painter.bounds())
}

#[cfg(test)]
mod tests {
    use std::f64::consts::TAU;

    use super::{SectorOptions, compute_sectors, quadrant_of, resolve_side_labels};
    use crate::charts::series::{SeriesLabel, new_pie_series_list};
    use crate::core::{Color, Point, ValueFormatter};

    fn sectors(values: &[f64]) -> Vec<super::Sector> {
        let colors = [Color::rgb(1, 2, 3), Color::rgb(4, 5, 6), Color::rgb(1, 2, 3)];
        let label = SeriesLabel::default();
        let formatter = ValueFormatter::default();
        compute_sectors(
            &new_pie_series_list(values),
            &SectorOptions {
                center: Point::new(100, 100),
                ring_radius: 80.0,
                diameter: 200.0,
                colors: &colors,
                label: &label,
                formatter: &formatter,
            },
        )
        .unwrap()
    }

    #[test]
    fn sectors_cover_the_full_turn() {
        let sectors = sectors(&[1.0, 2.0, 3.0]);
        let total: f64 = sectors.iter().map(|sector| sector.delta).sum();
        assert!((total - TAU).abs() < 1e-9);
        assert_eq!(sectors[0].label, "Series-A: 16.67%");
    }

    #[test]
    fn quadrants_follow_the_clock() {
        assert_eq!(quadrant_of(0.1), 1);
        assert_eq!(quadrant_of(0.3), 4);
        assert_eq!(quadrant_of(0.6), 3);
        assert_eq!(quadrant_of(0.9), 2);
    }

    #[test]
    fn repeated_wrap_color_is_replaced() {
        let sectors = sectors(&[1.0, 1.0, 1.0]);
        assert_eq!(sectors[2].color, Color::rgb(4, 5, 6));
    }

    #[test]
    fn side_labels_keep_their_distance() {
        let sectors = sectors(&[10.0, 1.0, 1.0, 1.0, 10.0]);
        let labels = resolve_side_labels(&sectors, 15.0);
        let mut right: Vec<f64> = labels
            .iter()
            .filter(|label| matches!(sectors[label.sector].quadrant, 1 | 4))
            .map(|label| label.y)
            .collect();
        right.sort_by(f64::total_cmp);
        assert!(right.windows(2).all(|pair| pair[1] - pair[0] >= 15.0 - 1e-9));
    }
}
