use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::charts::label_placement::{leader_line, place_center_labels};
use crate::charts::legend::LegendOption;
use crate::charts::pie::{PieFrameOptions, Sector, draw_sectors, draw_side_labels, prepare_pie};
use crate::charts::series::{Series, SeriesLabel};
use crate::charts::themed;
use crate::charts::title::TitleOption;
use crate::core::{Bounds, Color, ValueFormatter, parse_flexible_value};
use crate::error::{ChartError, ChartResult};
use crate::render::{FontStyle, Painter, Style};
use crate::theme::ColorPalette;

const CENTER_RATIO: f64 = 0.6;
const RING_MIN_WIDTH: f64 = 10.0;
const CENTER_FONT_SIZE: f64 = 16.0;

/// What the hole of a doughnut shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CenterValues {
    #[default]
    None,
    /// Formatted sum of every series.
    Sum,
    /// Sector labels placed inside the hole instead of around the ring.
    Labels,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DoughnutChartOption {
    #[serde(skip)]
    pub theme: Option<Arc<ColorPalette>>,
    pub padding: Bounds,
    pub background_color: Color,
    pub title: TitleOption,
    pub legend: LegendOption,
    pub series: Vec<Series>,
    /// Outer radius token.
    pub radius: String,
    /// Hole radius token; empty derives it from the smallest sector radius.
    pub center_radius: String,
    pub center_values: CenterValues,
    pub center_font_style: FontStyle,
    pub label: SeriesLabel,
    #[serde(skip)]
    pub value_formatter: Option<ValueFormatter>,
}

impl DoughnutChartOption {
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
    pub fn with_center_radius(mut self, radius: &str) -> Self {
        self.center_radius = radius.to_owned();
        self
    }

    #[must_use]
    pub fn with_center_values(mut self, values: CenterValues) -> Self {
        self.center_values = values;
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
}

fn rename_pie_error(error: ChartError) -> ChartError {
    match error {
        ChartError::Validation(message) => ChartError::Validation(message.replace("pie", "doughnut")),
        ChartError::Geometry(message) => ChartError::Geometry(message.replace("pie", "doughnut")),
        other => other,
    }
}

/// Hole radius: explicit token capped at `ring - 10`, otherwise 60% of the
/// smallest sector radius. Fails only when the hole would swallow the ring.
pub(crate) fn resolve_center_radius(
    token: &str,
    sectors: &[Sector],
    ring_radius: f64,
    diameter: f64,
) -> ChartResult<f64> {
    let radius = if token.is_empty() {
        let smallest = sectors
            .iter()
            .map(|sector| sector.radius)
            .fold(ring_radius, f64::min);
        smallest * CENTER_RATIO
    } else {
        let radius = parse_flexible_value(token, diameter)?;
        if radius <= 0.0 {
            return Err(ChartError::validation(format!(
                "doughnut center radius {token} must be positive"
            )));
        }
        radius.min(ring_radius - RING_MIN_WIDTH)
    };
    if !(radius > 0.0) || radius >= ring_radius {
        return Err(ChartError::geometry(format!(
            "doughnut ring radius {ring_radius} leaves no room for the center"
        )));
    }
    Ok(radius)
}

fn draw_center_sum(plot: &Painter, option: &DoughnutChartOption, formatter: &ValueFormatter, sectors: &[Sector]) {
    let Some(first) = sectors.first() else {
        return;
    };
    let total: f64 = sectors.iter().map(|sector| sector.value).sum();
    let text = formatter.format(total);
    let font_style = plot.resolve_font_style(
        &option
            .center_font_style
            .clone()
            .or(&FontStyle::default().with_size(CENTER_FONT_SIZE)),
    );
    let metrics = plot.text_metrics(&text, &font_style);
    let x = first.cx - (metrics.width / 2.0).round() as i32;
    let y = first.cy + ((metrics.ascent - metrics.height() / 2.0).round() as i32);
    plot.text(&text, x, y, 0.0, &font_style);
}

fn draw_center_labels(plot: &Painter, option: &DoughnutChartOption, sectors: &[Sector], inner_radius: f64) {
    let Some(first) = sectors.first() else {
        return;
    };
    let (cx, cy) = (first.cx, first.cy);
    let fonts: Vec<FontStyle> = sectors
        .iter()
        .map(|sector| {
            let mut font_style = option.label.font_style.clone();
            font_style.merge(&option.series[sector.index].label.font_style);
            plot.resolve_font_style(&font_style)
        })
        .collect();
    let sizes: Vec<(i32, i32)> = sectors
        .iter()
        .zip(&fonts)
        .map(|(sector, font_style)| {
            let size = plot.measure_text(&sector.label, 0.0, font_style);
            (size.width(), size.height())
        })
        .collect();
    for placement in place_center_labels(sectors, &sizes, cx, cy, inner_radius) {
        let sector = &sectors[placement.sector];
        let font_style = &fonts[placement.sector];
        let (edge, ring) = leader_line(sector, placement.bounds, cx, cy, inner_radius);
        let line = plot.with_drawing_style(&Style::stroke(1.0, sector.color));
        line.move_to(edge.x, edge.y);
        line.line_to(ring.x, ring.y);
        line.stroke();
        let ascent = plot.text_metrics(&sector.label, font_style).ascent.round() as i32;
        plot.text(
            &sector.label,
            placement.bounds.left,
            placement.bounds.top + ascent,
            0.0,
            font_style,
        );
    }
}

pub fn render_doughnut_chart(painter: &Painter, option: &DoughnutChartOption) -> ChartResult<Bounds> {
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
            side_labels: option.center_values != CenterValues::Labels,
        },
    )
    .map_err(rename_pie_error)?;
    let center_radius = resolve_center_radius(
        &option.center_radius,
        &frame.sectors,
        frame.ring_radius,
        frame.diameter,
    )?;
    let plot = &frame.chrome.plot;
    draw_sectors(plot, &frame.sectors);

    let background = if option.background_color.is_zero() {
        plot.theme().background_color()
    } else {
        option.background_color
    };
    plot.with_drawing_style(&Style::fill(background))
        .circle(center_radius, frame.center.x, frame.center.y);

    match option.center_values {
        CenterValues::Labels => draw_center_labels(plot, option, &frame.sectors, center_radius),
        CenterValues::Sum => {
            draw_side_labels(plot, &frame.sectors, &option.series, &option.label);
            draw_center_sum(plot, option, &formatter, &frame.sectors);
        }
        CenterValues::None => draw_side_labels(plot, &frame.sectors, &option.series, &option.label),
    }
    debug!(
        sectors = frame.sectors.len(),
        ring = frame.ring_radius,
        center = center_radius,
        mode = ?option.center_values,
        "doughnut chart rendered"
    );
    Ok(painter.bounds())
}

#[cfg(test)]
mod tests {
    use super::{rename_pie_error, resolve_center_radius};
    use crate::error::ChartError;

    #[test]
    fn pie_errors_are_renamed() {
        let error = rename_pie_error(ChartError::Validation("pie: sum value 0 should be greater than 0".into()));
        assert_eq!(
            error.to_string(),
            "invalid option: doughnut: sum value 0 should be greater than 0"
        );
    }

    #[test]
    fn center_radius_is_capped_below_the_ring() {
        assert_eq!(resolve_center_radius("500", &[], 100.0, 300.0).unwrap(), 90.0);
        assert_eq!(resolve_center_radius("", &[], 100.0, 300.0).unwrap(), 60.0);
    }

    #[test]
    fn thin_ring_keeps_its_default_hole() {
        assert_eq!(resolve_center_radius("", &[], 5.0, 300.0).unwrap(), 3.0);
        assert!(resolve_center_radius("20", &[], 8.0, 300.0).is_err());
        assert!(resolve_center_radius("", &[], 0.0, 300.0).is_err());
    }
}
