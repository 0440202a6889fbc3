use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{Bounds, Color};
use crate::error::{ChartError, ChartResult};
use crate::render::{FontStyle, NullBackend, Painter, TextAlign};
use crate::theme::ColorPalette;

const DEFAULT_CELL_PADDING: i32 = 10;
const HEADER_FONT_SIZE: f64 = 12.0;
/// Height of the throwaway canvas used to measure cells.
const MEASURE_HEIGHT: i32 = 100;

/// One cell as seen by a [`CellModifier`]; row 0 is the header.
#[derive(Debug, Clone, PartialEq)]
pub struct TableCell {
    pub text: String,
    pub row: usize,
    pub column: usize,
    pub font_style: FontStyle,
    pub fill_color: Color,
}

/// Caller hook that restyles individual cells.
#[derive(Clone)]
pub struct CellModifier(Arc<dyn Fn(TableCell) -> TableCell + Send + Sync>);

impl CellModifier {
    pub fn new(modifier: impl Fn(TableCell) -> TableCell + Send + Sync + 'static) -> Self {
        Self(Arc::new(modifier))
    }

    fn apply(&self, cell: TableCell) -> TableCell {
        (self.0)(cell)
    }
}

impl fmt::Debug for CellModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CellModifier(..)")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableOption {
    #[serde(skip)]
    pub theme: Option<Arc<ColorPalette>>,
    pub header: Vec<String>,
    /// Row-major cell text.
    pub data: Vec<Vec<String>>,
    /// Relative column widths; empty shares the width equally.
    pub spans: Vec<u32>,
    /// Per-column alignment; missing columns align left.
    pub text_aligns: Vec<TextAlign>,
    /// Cell padding; zero uses 10 px on every side.
    pub padding: Bounds,
    pub header_font_style: FontStyle,
    pub font_style: FontStyle,
    pub header_background_color: Color,
    /// Alternating row colors; empty uses the theme's zebra pair.
    pub row_background_colors: Vec<Color>,
    #[serde(skip)]
    pub cell_modifier: Option<CellModifier>,
}

impl TableOption {
    #[must_use]
    pub fn new(header: &[&str], data: Vec<Vec<String>>) -> Self {
        Self {
            header: header.iter().map(|name| (*name).to_owned()).collect(),
            data,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_spans(mut self, spans: &[u32]) -> Self {
        self.spans = spans.to_vec();
        self
    }

    #[must_use]
    pub fn with_text_aligns(mut self, aligns: &[TextAlign]) -> Self {
        self.text_aligns = aligns.to_vec();
        self
    }

    #[must_use]
    pub fn with_padding(mut self, padding: Bounds) -> Self {
        self.padding = padding;
        self
    }

    #[must_use]
    pub fn with_cell_modifier(mut self, modifier: CellModifier) -> Self {
        self.cell_modifier = Some(modifier);
        self
    }

    #[must_use]
    pub fn with_theme(mut self, theme: Arc<ColorPalette>) -> Self {
        self.theme = Some(theme);
        self
    }
}

/// Column widths from `spans`, each at least `min_width`. The last column
/// absorbs the rounding remainder.
pub fn table_column_widths(width: i32, columns: usize, spans: &[u32], min_width: i32) -> ChartResult<Vec<i32>> {
    if columns == 0 {
        return Err(ChartError::validation("table header is empty"));
    }
    let weights: Vec<u32> = if spans.is_empty() {
        vec![1; columns]
    } else if spans.len() != columns {
        return Err(ChartError::validation(format!(
            "table has {columns} columns but {} spans",
            spans.len()
        )));
    } else {
        spans.to_vec()
    };
    let total: u32 = weights.iter().sum();
    if total == 0 {
        return Err(ChartError::validation("table spans must not all be zero"));
    }
    let mut widths: Vec<i32> = weights
        .iter()
        .map(|weight| (i64::from(width) * i64::from(*weight) / i64::from(total)) as i32)
        .collect();
    let used: i32 = widths.iter().sum();
    if let Some(last) = widths.last_mut() {
        *last += width - used;
    }
    Ok(widths.into_iter().map(|width| width.max(min_width)).collect())
}

/// Cell contents after defaults and the modifier are applied.
fn resolve_cells(option: &TableOption, theme: &ColorPalette) -> Vec<Vec<TableCell>> {
    let row_colors = if option.row_background_colors.is_empty() {
        theme.table_row_colors().to_vec()
    } else {
        option.row_background_colors.clone()
    };
    let header_fill = if option.header_background_color.is_zero() {
        theme.table_header_color()
    } else {
        option.header_background_color
    };
    let header_font = option
        .header_font_style
        .clone()
        .or(&FontStyle::new(HEADER_FONT_SIZE, theme.title_text_color()));
    let body_font = option.font_style.clone().or(&FontStyle::new(0.0, theme.label_text_color()));
    let columns = option.header.len();

    std::iter::once(&option.header)
        .chain(&option.data)
        .enumerate()
        .map(|(row, texts)| {
            (0..columns)
                .map(|column| {
                    let cell = TableCell {
                        text: texts.get(column).cloned().unwrap_or_default(),
                        row,
                        column,
                        font_style: if row == 0 {
                            header_font.clone()
                        } else {
                            body_font.clone()
                        },
                        fill_color: if row == 0 {
                            header_fill
                        } else {
                            row_colors[(row - 1) % row_colors.len()]
                        },
                    };
                    match &option.cell_modifier {
                        Some(modifier) => modifier.apply(cell),
                        None => cell,
                    }
                })
                .collect()
        })
        .collect()
}

/// Row heights measured on a painter whose output is discarded.
fn measure_rows(
    measure: &Painter,
    cells: &[Vec<TableCell>],
    widths: &[i32],
    padding: Bounds,
) -> Vec<i32> {
    cells
        .iter()
        .map(|row| {
            row.iter()
                .zip(widths)
                .map(|(cell, width)| {
                    let inner = (width - padding.left - padding.right).max(1);
                    let area = measure.text_fit(&cell.text, 0, 0, inner, TextAlign::Left, &cell.font_style);
                    area.height() + padding.top + padding.bottom
                })
                .max()
                .unwrap_or(padding.top + padding.bottom)
        })
        .collect()
}

pub fn render_table(painter: &Painter, option: &TableOption) -> ChartResult<Bounds> {
    let theme = option
        .theme
        .clone()
        .unwrap_or_else(|| Arc::clone(painter.theme()));
    let padding = if option.padding.is_zero() {
        Bounds::uniform(DEFAULT_CELL_PADDING)
    } else {
        option.padding
    };
    let widths = table_column_widths(
        painter.width(),
        option.header.len(),
        &option.spans,
        padding.left + padding.right,
    )?;
    let cells = resolve_cells(option, &theme);

    let measure = Painter::from_backend(
        Box::new(NullBackend::new(painter.width(), MEASURE_HEIGHT)),
        painter.format(),
        Arc::clone(&theme),
        painter.font().clone(),
    )?;
    let heights = measure_rows(&measure, &cells, &widths, padding);

    let mut top = 0;
    let mut table_width = 0;
    for (row, height) in cells.iter().zip(&heights) {
        let mut left = 0;
        for (cell, width) in row.iter().zip(&widths) {
            painter.filled_rect(
                left,
                top,
                left + width,
                top + height,
                cell.fill_color,
                Color::TRANSPARENT,
                0.0,
            );
            let align = option.text_aligns.get(cell.column).copied().unwrap_or_default();
            let inner = (width - padding.left - padding.right).max(1);
            painter.text_fit(
                &cell.text,
                left + padding.left,
                top + padding.top,
                inner,
                align,
                &cell.font_style,
            );
            left += width;
        }
        table_width = table_width.max(left);
        top += height;
    }
    debug!(rows = cells.len(), columns = widths.len(), height = top, "table rendered");
    let origin = painter.bounds();
    Ok(Bounds::from_size(origin.left, origin.top, table_width, top))
}

#[cfg(test)]
mod tests {
    use super::table_column_widths;

    #[test]
    fn spans_split_the_width() {
        assert_eq!(table_column_widths(600, 3, &[1, 2, 3], 20).unwrap(), vec![100, 200, 300]);
        assert_eq!(table_column_widths(100, 3, &[], 0).unwrap(), vec![33, 33, 34]);
    }

    #[test]
    fn padding_bounds_the_narrowest_column() {
        assert_eq!(table_column_widths(100, 2, &[1, 9], 20).unwrap(), vec![20, 90]);
    }

    #[test]
    fn span_count_must_match_columns() {
        assert!(table_column_widths(100, 2, &[1], 0).is_err());
        assert!(table_column_widths(100, 0, &[], 0).is_err());
    }
}
