use serde::{Deserialize, Serialize};

use crate::core::Color;
use crate::error::{ChartError, ChartResult};
use crate::render::{FontStyle, Style};

/// One value of a series with an optional per-point style.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesDatum {
    pub value: f64,
    #[serde(default)]
    pub style: Option<Style>,
}

impl SeriesDatum {
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self { value, style: None }
    }
}

impl From<f64> for SeriesDatum {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

/// Value label configuration; `show: None` lets the chart decide.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesLabel {
    pub show: Option<bool>,
    /// Template with `{b}` name, `{c}` value and `{d}` percent.
    pub template: String,
    pub font_style: FontStyle,
    /// Extra gap between the datum and its label.
    pub distance: i32,
}

impl SeriesLabel {
    #[must_use]
    pub fn shown() -> Self {
        Self {
            show: Some(true),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_template(mut self, template: &str) -> Self {
        self.template = template.to_owned();
        self
    }

    #[must_use]
    pub fn with_font_style(mut self, font_style: FontStyle) -> Self {
        self.font_style = font_style;
        self
    }
}

/// Reference value derived from a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkKind {
    Max,
    Min,
    Average,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarkPoint {
    pub data: Vec<MarkKind>,
    /// Pin width in pixels; zero uses the default.
    pub symbol_size: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarkLine {
    pub data: Vec<MarkKind>,
}

/// One named group of values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub data: Vec<SeriesDatum>,
    #[serde(default)]
    pub label: SeriesLabel,
    /// Pie-family radius token; empty means the chart default.
    #[serde(default)]
    pub radius: String,
    #[serde(default)]
    pub y_axis_index: usize,
    #[serde(default)]
    pub mark_point: MarkPoint,
    #[serde(default)]
    pub mark_line: MarkLine,
    /// Overrides the theme color for this series.
    #[serde(default)]
    pub color: Color,
}

impl Series {
    #[must_use]
    pub fn new(name: &str, values: &[f64]) -> Self {
        Self {
            name: name.to_owned(),
            data: values.iter().copied().map(SeriesDatum::new).collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: SeriesLabel) -> Self {
        self.label = label;
        self
    }

    #[must_use]
    pub fn with_radius(mut self, radius: &str) -> Self {
        self.radius = radius.to_owned();
        self
    }

    #[must_use]
    pub fn with_y_axis_index(mut self, index: usize) -> Self {
        self.y_axis_index = index;
        self
    }

    #[must_use]
    pub fn with_mark_point(mut self, data: &[MarkKind]) -> Self {
        self.mark_point.data = data.to_vec();
        self
    }

    #[must_use]
    pub fn with_mark_line(mut self, data: &[MarkKind]) -> Self {
        self.mark_line.data = data.to_vec();
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn values(&self) -> Vec<f64> {
        self.data.iter().map(|datum| datum.value).collect()
    }

    /// Sum of the finite values.
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.data
            .iter()
            .map(|datum| datum.value)
            .filter(|value| value.is_finite())
            .sum()
    }

    /// Smallest and largest finite value, `None` when there is none.
    #[must_use]
    pub fn min_max(&self) -> Option<(f64, f64)> {
        self.data
            .iter()
            .map(|datum| datum.value)
            .filter(|value| value.is_finite())
            .fold(None, |acc, value| match acc {
                None => Some((value, value)),
                Some((min, max)) => Some((min.min(value), max.max(value))),
            })
    }

    /// Index and value of the reference point for `kind`.
    #[must_use]
    pub fn mark_value(&self, kind: MarkKind) -> Option<(usize, f64)> {
        let finite = self
            .data
            .iter()
            .enumerate()
            .filter(|(_, datum)| datum.value.is_finite());
        match kind {
            MarkKind::Max => finite
                .map(|(index, datum)| (index, datum.value))
                .fold(None, |best: Option<(usize, f64)>, item| match best {
                    Some(best) if best.1 >= item.1 => Some(best),
                    _ => Some(item),
                }),
            MarkKind::Min => finite
                .map(|(index, datum)| (index, datum.value))
                .fold(None, |best: Option<(usize, f64)>, item| match best {
                    Some(best) if best.1 <= item.1 => Some(best),
                    _ => Some(item),
                }),
            MarkKind::Average => {
                let values: Vec<f64> = finite.map(|(_, datum)| datum.value).collect();
                if values.is_empty() {
                    None
                } else {
                    Some((0, values.iter().sum::<f64>() / values.len() as f64))
                }
            }
        }
    }
}

const DEFAULT_NAMES: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Default series name for position `index`: `Series-A`, `Series-B`, ...
#[must_use]
pub fn default_series_name(index: usize) -> String {
    let letters = DEFAULT_NAMES.as_bytes();
    let letter = letters[index % letters.len()] as char;
    let round = index / letters.len();
    if round == 0 {
        format!("Series-{letter}")
    } else {
        format!("Series-{letter}{round}")
    }
}

/// One series per row of `values`, named by position.
#[must_use]
pub fn new_series_list(values: &[Vec<f64>]) -> Vec<Series> {
    values
        .iter()
        .enumerate()
        .map(|(index, row)| Series::new(&default_series_name(index), row))
        .collect()
}

/// Pie-family input: one single-value series per entry.
#[must_use]
pub fn new_pie_series_list(values: &[f64]) -> Vec<Series> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| Series::new(&default_series_name(index), &[*value]))
        .collect()
}

/// Pie-family input with explicit names; missing names fall back to defaults.
#[must_use]
pub fn new_named_pie_series_list(values: &[f64], names: &[&str]) -> Vec<Series> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            let name = names
                .get(index)
                .map_or_else(|| default_series_name(index), |name| (*name).to_owned());
            Series::new(&name, &[*value])
        })
        .collect()
}

pub(crate) fn ensure_series(series: &[Series]) -> ChartResult<()> {
    if series.is_empty() {
        return Err(ChartError::validation("empty series list"));
    }
    Ok(())
}

/// Data range of the series drawn against y axis `axis_index`.
pub(crate) fn axis_value_range(series: &[Series], axis_index: usize) -> Option<(f64, f64)> {
    series
        .iter()
        .filter(|item| item.y_axis_index == axis_index)
        .filter_map(Series::min_max)
        .fold(None, |acc, (min, max)| match acc {
            None => Some((min, max)),
            Some((low, high)) => Some((low.min(min), high.max(max))),
        })
}

pub(crate) fn max_data_len(series: &[Series]) -> usize {
    series.iter().map(|item| item.data.len()).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::{MarkKind, Series, default_series_name};

    #[test]
    fn default_names_cycle_letters() {
        assert_eq!(default_series_name(0), "Series-A");
        assert_eq!(default_series_name(4), "Series-E");
        assert_eq!(default_series_name(26), "Series-A1");
    }

    #[test]
    fn mark_values_pick_first_extreme() {
        let series = Series::new("s", &[3.0, 9.0, 1.0, 9.0]);
        assert_eq!(series.mark_value(MarkKind::Max), Some((1, 9.0)));
        assert_eq!(series.mark_value(MarkKind::Min), Some((2, 1.0)));
        assert_eq!(series.mark_value(MarkKind::Average), Some((0, 5.5)));
    }
}
