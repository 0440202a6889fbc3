use indexmap::IndexMap;
use tracing::debug;

use crate::core::{Bounds, SizeToken};
use crate::error::{ChartError, ChartResult};
use crate::render::Painter;

#[derive(Debug, Clone)]
enum RowItem {
    Cell { name: String, width: String },
    Gap(String),
}

#[derive(Debug, Clone, Default)]
struct RowSpec {
    height: String,
    offset_x: String,
    offset_y: String,
    row_offset: i32,
    items: Vec<RowItem>,
    is_gap: bool,
}

/// Flow layout: a vertical sequence of rows, each a horizontal sequence of
/// named cells and gaps.
///
/// Builder calls never fail; every problem is reported by [`RowLayout::build`].
#[derive(Debug, Clone)]
pub struct RowLayout<'a> {
    painter: &'a Painter,
    rows: Vec<RowSpec>,
}

impl<'a> RowLayout<'a> {
    #[must_use]
    pub fn new(painter: &'a Painter) -> Self {
        Self {
            painter,
            rows: Vec::new(),
        }
    }

    fn current_row(&mut self) -> &mut RowSpec {
        if self.rows.last().is_none_or(|row| row.is_gap) {
            self.rows.push(RowSpec::default());
        }
        let index = self.rows.len() - 1;
        &mut self.rows[index]
    }

    /// Starts a new row with auto height.
    pub fn row(&mut self) -> &mut Self {
        self.rows.push(RowSpec::default());
        self
    }

    /// Height token for the current row: `"40"`, `"20%"` or `""` for auto.
    pub fn height(&mut self, token: &str) -> &mut Self {
        self.current_row().height = token.to_owned();
        self
    }

    /// Appends a named cell; an empty width token makes it auto.
    pub fn col(&mut self, name: &str, width: &str) -> &mut Self {
        self.current_row().items.push(RowItem::Cell {
            name: name.to_owned(),
            width: width.to_owned(),
        });
        self
    }

    /// Horizontal filler inside the current row.
    pub fn col_gap(&mut self, width: &str) -> &mut Self {
        self.current_row().items.push(RowItem::Gap(width.to_owned()));
        self
    }

    /// Vertical filler between rows.
    pub fn row_gap(&mut self, height: &str) -> &mut Self {
        self.rows.push(RowSpec {
            height: height.to_owned(),
            is_gap: true,
            ..RowSpec::default()
        });
        self
    }

    /// Shifts every cell of the current row; tokens resolve against the
    /// parent width and height.
    pub fn offset(&mut self, dx: &str, dy: &str) -> &mut Self {
        let row = self.current_row();
        row.offset_x = dx.to_owned();
        row.offset_y = dy.to_owned();
        self
    }

    /// Vertical-only shift of the current row; may be negative.
    pub fn row_offset(&mut self, dy: i32) -> &mut Self {
        self.current_row().row_offset = dy;
        self
    }

    /// Resolves every row and cell into child painters keyed by cell name.
    ///
    /// Building does not consume the layout; calling it twice yields
    /// painters with identical boxes.
    pub fn build(&self) -> ChartResult<IndexMap<String, Painter>> {
        let parent_width = self.painter.width();
        let parent_height = self.painter.height();
        if parent_width < 0 || parent_height < 0 {
            return Err(ChartError::validation(format!(
                "layout parent has negative size {parent_width}x{parent_height}"
            )));
        }

        let heights = resolve_tracks(
            self.rows.iter().map(|row| row.height.as_str()),
            parent_height,
            "row",
        )?;

        let mut cells = IndexMap::new();
        let mut top = 0;
        for (row_index, (row, height)) in self.rows.iter().zip(&heights).enumerate() {
            let dx = resolve_offset(&row.offset_x, parent_width)?;
            let dy = resolve_offset(&row.offset_y, parent_height)? + row.row_offset;

            let widths = resolve_cols(&row.items, parent_width, row_index)?;
            let mut left = 0;
            for (item, width) in row.items.iter().zip(widths) {
                if let RowItem::Cell { name, .. } = item {
                    if name.is_empty() {
                        return Err(ChartError::validation(format!(
                            "row {row_index} has a cell without a name"
                        )));
                    }
                    if cells.contains_key(name) {
                        return Err(ChartError::validation(format!(
                            "duplicate cell name '{name}'"
                        )));
                    }
                    let relative = Bounds::from_size(left + dx, top + dy, width, *height);
                    cells.insert(name.clone(), self.painter.child_at(relative));
                }
                left += width;
            }
            top += height;
        }
        debug!(rows = self.rows.len(), cells = cells.len(), "row layout built");
        Ok(cells)
    }
}

fn resolve_offset(token: &str, total: i32) -> ChartResult<i32> {
    match SizeToken::parse(token)? {
        SizeToken::Auto => Ok(0),
        SizeToken::Keyword(anchor) => Err(ChartError::validation(format!(
            "offset does not accept the `{anchor:?}` keyword"
        ))),
        parsed => Ok(parsed.resolve(total).unwrap_or_default()),
    }
}

/// Splits `total` among tracks; autos share the remainder, the last auto
/// absorbing rounding.
fn resolve_tracks<'t>(
    tokens: impl Iterator<Item = &'t str>,
    total: i32,
    kind: &str,
) -> ChartResult<Vec<i32>> {
    let mut sizes: Vec<Option<i32>> = Vec::new();
    let mut fixed = 0_i64;
    for (index, token) in tokens.enumerate() {
        let parsed = SizeToken::parse(token)?;
        let size = match parsed {
            SizeToken::Auto => None,
            SizeToken::Keyword(anchor) => {
                return Err(ChartError::validation(format!(
                    "{kind} {index} size does not accept the `{anchor:?}` keyword"
                )));
            }
            parsed => parsed.resolve(total),
        };
        if let Some(size) = size {
            if size < 0 {
                return Err(ChartError::validation(format!(
                    "{kind} {index} has negative size {size}"
                )));
            }
            fixed += i64::from(size);
        }
        sizes.push(size);
    }
    if fixed > i64::from(total) {
        return Err(ChartError::validation(format!(
            "{kind} sizes exceed available space ({fixed} > {total})"
        )));
    }

    let autos = sizes.iter().filter(|size| size.is_none()).count();
    let remaining = total - fixed as i32;
    let auto_size = if autos > 0 { remaining / autos as i32 } else { 0 };
    if autos > 0 && auto_size <= 0 {
        return Err(ChartError::validation(format!(
            "auto {kind}s would have zero size ({remaining}px left for {autos})"
        )));
    }
    let last_auto = sizes.iter().rposition(Option::is_none);
    Ok(sizes
        .iter()
        .enumerate()
        .map(|(index, size)| match size {
            Some(size) => *size,
            None if Some(index) == last_auto => remaining - auto_size * (autos as i32 - 1),
            None => auto_size,
        })
        .collect())
}

fn resolve_cols(items: &[RowItem], row_width: i32, row_index: usize) -> ChartResult<Vec<i32>> {
    let mut percent_sum = 0.0;
    for item in items {
        let token = match item {
            RowItem::Cell { width, .. } | RowItem::Gap(width) => width,
        };
        if let SizeToken::Percent(percent) = SizeToken::parse(token)? {
            percent_sum += percent;
        }
    }
    if percent_sum > 100.0 + 1e-9 {
        return Err(ChartError::validation(format!(
            "column percentages exceed 100% in row {row_index} ({percent_sum}%)"
        )));
    }
    resolve_tracks(
        items.iter().map(|item| match item {
            RowItem::Cell { width, .. } | RowItem::Gap(width) => width.as_str(),
        }),
        row_width,
        "column",
    )
    .map_err(|err| match err {
        ChartError::Validation(message) if message.contains("exceed available space") => {
            ChartError::validation(format!(
                "explicit column widths exceed row width in row {row_index}: {message}"
            ))
        }
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::resolve_tracks;

    #[test]
    fn autos_share_the_remainder() {
        let sizes = resolve_tracks(["20", "", "", "20"].into_iter(), 400, "row").expect("tracks");
        assert_eq!(sizes, vec![20, 180, 180, 20]);
        let sizes = resolve_tracks(["", "", ""].into_iter(), 100, "row").expect("tracks");
        assert_eq!(sizes.iter().sum::<i32>(), 100);
    }

    #[test]
    fn fixed_overflow_is_rejected() {
        assert!(resolve_tracks(["300", "200"].into_iter(), 400, "row").is_err());
        assert!(resolve_tracks(["400", ""].into_iter(), 400, "row").is_err());
    }
}
