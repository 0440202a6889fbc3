use indexmap::IndexMap;
use tracing::debug;

use crate::core::{Bounds, parse_flexible_value};
use crate::error::{ChartError, ChartResult};
use crate::render::Painter;

#[derive(Debug, Clone)]
struct GridCell {
    name: String,
    col: i32,
    row: i32,
    col_span: i32,
    row_span: i32,
    offset_x: String,
    offset_y: String,
}

/// Fixed `cols x rows` grid with named, spanning cells.
///
/// `span` and `offset` apply to the cell most recently declared with
/// `cell_at`; without one they do nothing.
#[derive(Debug, Clone)]
pub struct GridLayout<'a> {
    painter: &'a Painter,
    cols: i32,
    rows: i32,
    cells: Vec<GridCell>,
}

impl<'a> GridLayout<'a> {
    #[must_use]
    pub fn new(painter: &'a Painter, cols: i32, rows: i32) -> Self {
        Self {
            painter,
            cols,
            rows,
            cells: Vec::new(),
        }
    }

    pub fn cell_at(&mut self, name: &str, col: i32, row: i32) -> &mut Self {
        self.cells.push(GridCell {
            name: name.to_owned(),
            col,
            row,
            col_span: 1,
            row_span: 1,
            offset_x: String::new(),
            offset_y: String::new(),
        });
        self
    }

    pub fn span(&mut self, col_span: i32, row_span: i32) -> &mut Self {
        if let Some(cell) = self.cells.last_mut() {
            cell.col_span = col_span;
            cell.row_span = row_span;
        }
        self
    }

    /// Offset tokens in pixels or percent of the spanned cell size.
    pub fn offset(&mut self, dx: &str, dy: &str) -> &mut Self {
        if let Some(cell) = self.cells.last_mut() {
            cell.offset_x = dx.to_owned();
            cell.offset_y = dy.to_owned();
        }
        self
    }

    pub fn build(&self) -> ChartResult<IndexMap<String, Painter>> {
        let (cols, rows) = (self.cols, self.rows);
        if cols <= 0 || rows <= 0 {
            return Err(ChartError::validation(format!(
                "invalid grid dimensions: {cols}x{rows}"
            )));
        }
        let width = self.painter.width();
        let height = self.painter.height();
        let cell_width = width / cols;
        let cell_height = height / rows;

        let mut painters = IndexMap::new();
        for cell in &self.cells {
            let name = &cell.name;
            if painters.contains_key(name) {
                return Err(ChartError::validation(format!("duplicate cell name '{name}'")));
            }
            if cell.col < 0 || cell.row < 0 || cell.col >= cols || cell.row >= rows {
                return Err(ChartError::validation(format!(
                    "cell '{name}' at ({}, {}) is outside the {cols}x{rows} grid",
                    cell.col, cell.row
                )));
            }
            if cell.col_span <= 0 || cell.row_span <= 0 {
                return Err(ChartError::validation(format!(
                    "cell '{name}' has invalid span ({}, {}): spans must be positive",
                    cell.col_span, cell.row_span
                )));
            }
            let end_col = cell.col + cell.col_span;
            let end_row = cell.row + cell.row_span;
            if end_col > cols || end_row > rows {
                return Err(ChartError::validation(format!(
                    "cell '{name}' spanning to ({end_col}, {end_row}) exceeds the {cols}x{rows} grid"
                )));
            }

            let left = cell.col * cell_width;
            let top = cell.row * cell_height;
            let span_width = if end_col == cols {
                width - left
            } else {
                cell.col_span * cell_width
            };
            let span_height = if end_row == rows {
                height - top
            } else {
                cell.row_span * cell_height
            };
            let dx = resolve_offset(&cell.offset_x, span_width)?;
            let dy = resolve_offset(&cell.offset_y, span_height)?;
            let relative = Bounds::from_size(left + dx, top + dy, span_width, span_height);
            painters.insert(name.clone(), self.painter.child_at(relative));
        }
        debug!(cols, rows, cells = painters.len(), "grid layout built");
        Ok(painters)
    }
}

fn resolve_offset(token: &str, total: i32) -> ChartResult<i32> {
    if token.trim().is_empty() {
        return Ok(0);
    }
    Ok(parse_flexible_value(token, f64::from(total))? as i32)
}
