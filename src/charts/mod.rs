//! Chart renderers and the components they share.

pub mod axis;
pub mod bar;
pub mod chrome;
pub mod doughnut;
pub mod funnel;
pub mod heat_map;
pub mod horizontal_bar;
pub mod label_placement;
pub mod legend;
pub mod line;
mod mark;
pub mod pie;
pub mod radar;
pub mod scatter;
pub mod series;
pub mod table;
pub mod title;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use axis::{AxisOption, AxisPosition};
pub use bar::{BarChartOption, render_bar_chart};
pub use chrome::{DEFAULT_CHART_PADDING, RenderResult};
pub use doughnut::{CenterValues, DoughnutChartOption, render_doughnut_chart};
pub use funnel::{FunnelChartOption, FunnelLayer, funnel_layers, render_funnel_chart};
pub use heat_map::{HeatMapOption, render_heat_map};
pub use horizontal_bar::{HorizontalBarChartOption, render_horizontal_bar_chart};
pub use label_placement::{
    LabelPlacement, clamp_angle_to_sector, clamp_inside_circle, is_inside_circle,
    place_center_labels,
};
pub use legend::{LegendIcon, LegendOption, LegendOrient, render_legend};
pub use line::{LineChartOption, render_line_chart};
pub use pie::{PieChartOption, Sector, SectorOptions, compute_sectors, render_pie_chart};
pub use radar::{RadarChartOption, RadarIndicator, new_radar_indicators, render_radar_chart};
pub use scatter::{ScatterChartOption, render_scatter_chart};
pub use series::{
    MarkKind, MarkLine, MarkPoint, Series, SeriesDatum, SeriesLabel, default_series_name,
    new_named_pie_series_list, new_pie_series_list, new_series_list,
};
pub use table::{CellModifier, TableCell, TableOption, render_table, table_column_widths};
pub use title::{TitleOption, render_title};

use crate::core::Bounds;
use crate::error::{ChartError, ChartResult};
use crate::render::{ChildOptions, FontStyle, Painter};
use crate::theme::ColorPalette;

/// Painter carrying the chart's own theme, if it sets one.
pub(crate) fn themed(painter: &Painter, theme: Option<&Arc<ColorPalette>>) -> Painter {
    match theme {
        Some(theme) => painter.child(ChildOptions::new().with_theme(Arc::clone(theme))),
        None => painter.clone(),
    }
}

/// Value label text style with theme fallbacks.
pub(crate) fn value_label_style(plot: &Painter, label: &SeriesLabel) -> FontStyle {
    plot.resolve_font_style(&label.font_style)
}

/// Every chart type the crate renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Line,
    Bar,
    HorizontalBar,
    Scatter,
    Pie,
    Doughnut,
    Radar,
    Funnel,
    HeatMap,
    Table,
}

impl ChartKind {
    pub const ALL: [Self; 10] = [
        Self::Line,
        Self::Bar,
        Self::HorizontalBar,
        Self::Scatter,
        Self::Pie,
        Self::Doughnut,
        Self::Radar,
        Self::Funnel,
        Self::HeatMap,
        Self::Table,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::Bar => "bar",
            Self::HorizontalBar => "horizontal_bar",
            Self::Scatter => "scatter",
            Self::Pie => "pie",
            Self::Doughnut => "doughnut",
            Self::Radar => "radar",
            Self::Funnel => "funnel",
            Self::HeatMap => "heat_map",
            Self::Table => "table",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartKind {
    type Err = ChartError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let normalized = text.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        let normalized = match normalized.as_str() {
            "hbar" | "horizontalbar" => "horizontal_bar",
            "heatmap" => "heat_map",
            other => other,
        };
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| ChartError::validation(format!("unknown chart type '{text}'")))
    }
}

/// Options of any chart, tagged by its kind.
#[derive(Debug, Clone)]
pub enum ChartOption {
    Line(LineChartOption),
    Bar(BarChartOption),
    HorizontalBar(HorizontalBarChartOption),
    Scatter(ScatterChartOption),
    Pie(PieChartOption),
    Doughnut(DoughnutChartOption),
    Radar(RadarChartOption),
    Funnel(FunnelChartOption),
    HeatMap(HeatMapOption),
    Table(TableOption),
}

impl ChartOption {
    #[must_use]
    pub fn kind(&self) -> ChartKind {
        match self {
            Self::Line(_) => ChartKind::Line,
            Self::Bar(_) => ChartKind::Bar,
            Self::HorizontalBar(_) => ChartKind::HorizontalBar,
            Self::Scatter(_) => ChartKind::Scatter,
            Self::Pie(_) => ChartKind::Pie,
            Self::Doughnut(_) => ChartKind::Doughnut,
            Self::Radar(_) => ChartKind::Radar,
            Self::Funnel(_) => ChartKind::Funnel,
            Self::HeatMap(_) => ChartKind::HeatMap,
            Self::Table(_) => ChartKind::Table,
        }
    }
}

/// Renders `option` with the renderer of its kind.
pub fn render_chart(painter: &Painter, option: &ChartOption) -> ChartResult<Bounds> {
    let kind = option.kind();
    debug!(%kind, "rendering chart");
    match option {
        ChartOption::Line(option) => render_line_chart(painter, option),
        ChartOption::Bar(option) => render_bar_chart(painter, option),
        ChartOption::HorizontalBar(option) => render_horizontal_bar_chart(painter, option),
        ChartOption::Scatter(option) => render_scatter_chart(painter, option),
        ChartOption::Pie(option) => render_pie_chart(painter, option),
        ChartOption::Doughnut(option) => render_doughnut_chart(painter, option),
        ChartOption::Radar(option) => render_radar_chart(painter, option),
        ChartOption::Funnel(option) => render_funnel_chart(painter, option),
        ChartOption::HeatMap(option) => render_heat_map(painter, option),
        ChartOption::Table(option) => render_table(painter, option),
    }
}

impl Painter {
    /// Renders `option` into this painter; see [`render_chart`].
    pub fn render(&self, option: &ChartOption) -> ChartResult<Bounds> {
        render_chart(self, option)
    }
}
