//! Named color palettes and the process-wide theme registry.
//!
//! Palettes are immutable values; every `with_*` derivation returns a new
//! palette. The registry is seeded with the built-in palettes on first use
//! and is expected to be mutated only before rendering starts.

use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::Color;
use crate::error::{ChartError, ChartResult};

pub const THEME_LIGHT: &str = "light";
pub const THEME_DARK: &str = "dark";
pub const THEME_VIVID_LIGHT: &str = "vivid-light";
pub const THEME_VIVID_DARK: &str = "vivid-dark";
pub const THEME_ANT: &str = "ant";
pub const THEME_GRAFANA: &str = "grafana";

/// Lightness shift applied per completed pass over the series colors.
const SERIES_CYCLE_STEP: f64 = 0.15;
const SERIES_CYCLE_MAX_SHIFT: f64 = 0.6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorPalette {
    name: String,
    is_dark: bool,
    #[serde(deserialize_with = "non_empty_colors")]
    series_colors: Vec<Color>,
    x_axis_stroke_color: Color,
    y_axis_stroke_color: Color,
    axis_split_line_color: Color,
    background_color: Color,
    title_text_color: Color,
    label_text_color: Color,
    legend_text_color: Color,
    legend_border_color: Color,
    mark_text_color: Color,
    x_axis_text_color: Color,
    y_axis_text_color: Color,
}

fn non_empty_colors<'de, D>(deserializer: D) -> Result<Vec<Color>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let colors = Vec::<Color>::deserialize(deserializer)?;
    if colors.is_empty() {
        return Err(serde::de::Error::custom(ChartError::validation(
            "theme needs at least one series color",
        )));
    }
    Ok(colors)
}

impl ColorPalette {
    /// Builds a palette from its base colors; text roles share `text_color`
    /// and darkness follows the background luminance.
    pub fn new(
        name: impl Into<String>,
        background_color: Color,
        text_color: Color,
        axis_stroke_color: Color,
        axis_split_line_color: Color,
        series_colors: Vec<Color>,
    ) -> ChartResult<Self> {
        let name = name.into();
        if series_colors.is_empty() {
            return Err(ChartError::validation(format!(
                "theme `{name}` needs at least one series color"
            )));
        }
        Ok(Self {
            is_dark: background_color.is_dark(),
            series_colors,
            x_axis_stroke_color: axis_stroke_color,
            y_axis_stroke_color: axis_stroke_color,
            axis_split_line_color,
            background_color,
            title_text_color: text_color,
            label_text_color: text_color,
            legend_text_color: text_color,
            legend_border_color: axis_split_line_color,
            mark_text_color: if background_color.is_dark() {
                Color::rgb(238, 238, 238)
            } else {
                Color::WHITE
            },
            x_axis_text_color: text_color,
            y_axis_text_color: text_color,
            name,
        })
    }

    /// Parses a palette persisted with `serde_json`.
    pub fn from_json(json: &str) -> ChartResult<Self> {
        serde_json::from_str(json)
            .map_err(|err| ChartError::validation(format!("invalid theme json: {err}")))
    }

    pub fn to_json(&self) -> ChartResult<String> {
        serde_json::to_string(self)
            .map_err(|err| ChartError::validation(format!("theme serialization failed: {err}")))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn is_dark(&self) -> bool {
        self.is_dark
    }

    #[must_use]
    pub fn series_colors(&self) -> &[Color] {
        &self.series_colors
    }

    /// Color for series `index`; indexes past the palette repeat it with a
    /// lightness shift per completed cycle (lighter on dark themes).
    #[must_use]
    pub fn series_color(&self, index: usize) -> Color {
        let len = self.series_colors.len();
        let base = self.series_colors[index % len];
        let cycle = index / len;
        if cycle == 0 {
            return base;
        }
        let shift = (SERIES_CYCLE_STEP * cycle as f64).min(SERIES_CYCLE_MAX_SHIFT);
        if self.is_dark {
            base.lighten(shift)
        } else {
            base.darken(shift)
        }
    }

    #[must_use]
    pub fn background_color(&self) -> Color {
        self.background_color
    }

    #[must_use]
    pub fn x_axis_stroke_color(&self) -> Color {
        self.x_axis_stroke_color
    }

    #[must_use]
    pub fn y_axis_stroke_color(&self) -> Color {
        self.y_axis_stroke_color
    }

    #[must_use]
    pub fn axis_split_line_color(&self) -> Color {
        self.axis_split_line_color
    }

    #[must_use]
    pub fn title_text_color(&self) -> Color {
        self.title_text_color
    }

    #[must_use]
    pub fn label_text_color(&self) -> Color {
        self.label_text_color
    }

    #[must_use]
    pub fn legend_text_color(&self) -> Color {
        self.legend_text_color
    }

    #[must_use]
    pub fn legend_border_color(&self) -> Color {
        self.legend_border_color
    }

    #[must_use]
    pub fn mark_text_color(&self) -> Color {
        self.mark_text_color
    }

    #[must_use]
    pub fn x_axis_text_color(&self) -> Color {
        self.x_axis_text_color
    }

    #[must_use]
    pub fn y_axis_text_color(&self) -> Color {
        self.y_axis_text_color
    }

    /// Header band fill used by tables.
    #[must_use]
    pub fn table_header_color(&self) -> Color {
        if self.is_dark {
            self.background_color.lighten(0.12)
        } else {
            Color::rgb(250, 250, 250)
        }
    }

    /// Alternating row fills used by tables, even rows first.
    #[must_use]
    pub fn table_row_colors(&self) -> [Color; 2] {
        if self.is_dark {
            [
                self.background_color.lighten(0.04),
                self.background_color.lighten(0.09),
            ]
        } else {
            [Color::WHITE, Color::rgb(242, 242, 242)]
        }
    }

    /// Replaces the background and recomputes darkness from its luminance.
    #[must_use]
    pub fn with_background_color(&self, color: Color) -> Self {
        Self {
            background_color: color,
            is_dark: color.is_dark(),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_title_text_color(&self, color: Color) -> Self {
        Self {
            title_text_color: color,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_label_text_color(&self, color: Color) -> Self {
        Self {
            label_text_color: color,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_legend_text_color(&self, color: Color) -> Self {
        Self {
            legend_text_color: color,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_legend_border_color(&self, color: Color) -> Self {
        Self {
            legend_border_color: color,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_mark_text_color(&self, color: Color) -> Self {
        Self {
            mark_text_color: color,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_x_axis_text_color(&self, color: Color) -> Self {
        Self {
            x_axis_text_color: color,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_y_axis_text_color(&self, color: Color) -> Self {
        Self {
            y_axis_text_color: color,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_x_axis_stroke_color(&self, color: Color) -> Self {
        Self {
            x_axis_stroke_color: color,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_y_axis_stroke_color(&self, color: Color) -> Self {
        Self {
            y_axis_stroke_color: color,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_axis_split_line_color(&self, color: Color) -> Self {
        Self {
            axis_split_line_color: color,
            ..self.clone()
        }
    }

    /// Replaces the series colors; an empty list keeps the current ones.
    #[must_use]
    pub fn with_series_colors(&self, colors: Vec<Color>) -> Self {
        if colors.is_empty() {
            return self.clone();
        }
        Self {
            series_colors: colors,
            ..self.clone()
        }
    }

    #[must_use]
    fn renamed(mut self, name: &str) -> Self {
        self.name = name.to_owned();
        self
    }
}

const ECHARTS_SERIES: [Color; 9] = [
    Color::rgb(84, 112, 198),
    Color::rgb(145, 204, 117),
    Color::rgb(250, 200, 88),
    Color::rgb(238, 102, 102),
    Color::rgb(115, 192, 222),
    Color::rgb(59, 162, 114),
    Color::rgb(252, 132, 82),
    Color::rgb(154, 96, 180),
    Color::rgb(234, 124, 204),
];

const VIVID_SERIES: [Color; 8] = [
    Color::rgb(255, 107, 107),
    Color::rgb(254, 202, 87),
    Color::rgb(72, 219, 251),
    Color::rgb(29, 209, 161),
    Color::rgb(95, 39, 205),
    Color::rgb(255, 159, 243),
    Color::rgb(84, 160, 255),
    Color::rgb(0, 210, 211),
];

const ANT_SERIES: [Color; 8] = [
    Color::rgb(91, 143, 249),
    Color::rgb(90, 216, 166),
    Color::rgb(93, 112, 146),
    Color::rgb(246, 189, 22),
    Color::rgb(111, 94, 249),
    Color::rgb(109, 200, 236),
    Color::rgb(148, 95, 185),
    Color::rgb(255, 152, 69),
];

const GRAFANA_SERIES: [Color; 8] = [
    Color::rgb(126, 178, 109),
    Color::rgb(234, 184, 57),
    Color::rgb(110, 208, 224),
    Color::rgb(239, 132, 60),
    Color::rgb(226, 77, 66),
    Color::rgb(31, 120, 193),
    Color::rgb(112, 93, 160),
    Color::rgb(80, 134, 66),
];

fn built_in_palettes() -> Vec<ColorPalette> {
    let light = ColorPalette {
        name: THEME_LIGHT.to_owned(),
        is_dark: false,
        series_colors: ECHARTS_SERIES.to_vec(),
        x_axis_stroke_color: Color::rgb(110, 112, 121),
        y_axis_stroke_color: Color::rgb(110, 112, 121),
        axis_split_line_color: Color::rgb(224, 230, 242),
        background_color: Color::WHITE,
        title_text_color: Color::rgb(70, 70, 70),
        label_text_color: Color::rgb(70, 70, 70),
        legend_text_color: Color::rgb(70, 70, 70),
        legend_border_color: Color::rgb(224, 230, 242),
        mark_text_color: Color::WHITE,
        x_axis_text_color: Color::rgb(70, 70, 70),
        y_axis_text_color: Color::rgb(70, 70, 70),
    };
    let dark = ColorPalette {
        name: THEME_DARK.to_owned(),
        is_dark: true,
        series_colors: ECHARTS_SERIES.to_vec(),
        x_axis_stroke_color: Color::rgb(185, 184, 206),
        y_axis_stroke_color: Color::rgb(185, 184, 206),
        axis_split_line_color: Color::rgb(72, 71, 83),
        background_color: Color::rgb(16, 12, 42),
        title_text_color: Color::rgb(238, 238, 238),
        label_text_color: Color::rgb(238, 238, 238),
        legend_text_color: Color::rgb(238, 238, 238),
        legend_border_color: Color::rgb(72, 71, 83),
        mark_text_color: Color::rgb(238, 238, 238),
        x_axis_text_color: Color::rgb(238, 238, 238),
        y_axis_text_color: Color::rgb(238, 238, 238),
    };
    let vivid_light = light
        .with_series_colors(VIVID_SERIES.to_vec())
        .renamed(THEME_VIVID_LIGHT);
    let vivid_dark = dark
        .with_series_colors(VIVID_SERIES.to_vec())
        .renamed(THEME_VIVID_DARK);
    let ant = light
        .with_series_colors(ANT_SERIES.to_vec())
        .renamed(THEME_ANT);
    let grafana = ColorPalette {
        name: THEME_GRAFANA.to_owned(),
        is_dark: true,
        series_colors: GRAFANA_SERIES.to_vec(),
        x_axis_stroke_color: Color::rgb(185, 184, 206),
        y_axis_stroke_color: Color::rgb(185, 184, 206),
        axis_split_line_color: Color::rgb(68, 71, 77),
        background_color: Color::rgb(31, 29, 29),
        title_text_color: Color::rgb(216, 217, 218),
        label_text_color: Color::rgb(216, 217, 218),
        legend_text_color: Color::rgb(216, 217, 218),
        legend_border_color: Color::rgb(68, 71, 77),
        mark_text_color: Color::rgb(216, 217, 218),
        x_axis_text_color: Color::rgb(216, 217, 218),
        y_axis_text_color: Color::rgb(216, 217, 218),
    };
    vec![light, dark, vivid_light, vivid_dark, ant, grafana]
}

#[derive(Debug)]
struct ThemeRegistry {
    palettes: IndexMap<String, Arc<ColorPalette>>,
    default_name: String,
}

fn registry() -> &'static RwLock<ThemeRegistry> {
    static REGISTRY: OnceLock<RwLock<ThemeRegistry>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let palettes = built_in_palettes()
            .into_iter()
            .map(|palette| (palette.name.clone(), Arc::new(palette)))
            .collect();
        RwLock::new(ThemeRegistry {
            palettes,
            default_name: THEME_LIGHT.to_owned(),
        })
    })
}

/// Color of slot `index` out of `count` slots arranged in a closed ring.
///
/// The last slot never repeats the first slot's color: it takes the second
/// color instead so the two neighbors stay distinguishable.
#[must_use]
pub fn ring_color(colors: &[Color], index: usize, count: usize) -> Color {
    let color = colors.get(index).copied().unwrap_or_default();
    if index > 0 && index + 1 == count && colors.first() == Some(&color) {
        return colors.get(1).copied().unwrap_or(color);
    }
    color
}

/// Looks up a palette; unknown names fall back to the default palette.
#[must_use]
pub fn get_theme(name: &str) -> Arc<ColorPalette> {
    let registry = registry().read().unwrap_or_else(PoisonError::into_inner);
    if let Some(palette) = registry.palettes.get(name) {
        return Arc::clone(palette);
    }
    default_from(&registry)
}

#[must_use]
pub fn get_default_theme() -> Arc<ColorPalette> {
    let registry = registry().read().unwrap_or_else(PoisonError::into_inner);
    default_from(&registry)
}

fn default_from(registry: &ThemeRegistry) -> Arc<ColorPalette> {
    match registry.palettes.get(&registry.default_name) {
        Some(palette) => Arc::clone(palette),
        None => Arc::new(built_in_palettes().swap_remove(0)),
    }
}

/// Registers `palette` under `name`, replacing any previous entry.
pub fn install_theme(name: &str, palette: ColorPalette) -> Arc<ColorPalette> {
    let palette = Arc::new(palette.renamed(name));
    let mut registry = registry().write().unwrap_or_else(PoisonError::into_inner);
    registry
        .palettes
        .insert(name.to_owned(), Arc::clone(&palette));
    debug!(theme = name, "installed theme");
    palette
}

pub fn set_default_theme(name: &str) -> ChartResult<()> {
    let mut registry = registry().write().unwrap_or_else(PoisonError::into_inner);
    if !registry.palettes.contains_key(name) {
        return Err(ChartError::UnknownTheme(name.to_owned()));
    }
    registry.default_name = name.to_owned();
    debug!(theme = name, "default theme changed");
    Ok(())
}

/// Registered palette names in registration order.
#[must_use]
pub fn theme_names() -> Vec<String> {
    let registry = registry().read().unwrap_or_else(PoisonError::into_inner);
    registry.palettes.keys().cloned().collect()
}
