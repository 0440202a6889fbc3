//! Builders partitioning a painter into named child painters.

mod grid;
mod rows;

pub use grid::GridLayout;
pub use rows::RowLayout;

use crate::render::Painter;

impl Painter {
    /// Starts a row/column flow layout over this painter.
    #[must_use]
    pub fn layout_by_rows(&self) -> RowLayout<'_> {
        RowLayout::new(self)
    }

    /// Starts a `cols x rows` grid layout over this painter.
    #[must_use]
    pub fn layout_by_grid(&self, cols: i32, rows: i32) -> GridLayout<'_> {
        GridLayout::new(self, cols, rows)
    }
}
