use serde::{Deserialize, Serialize};

use crate::core::flexible::{resolve_horizontal_position, resolve_vertical_position};
use crate::core::{Anchor, Bounds, Color, Point, SizeToken};
use crate::error::ChartResult;
use crate::render::{FontStyle, Painter, Style};

const SYMBOL_WIDTH: i32 = 25;
const SYMBOL_HEIGHT: i32 = 10;
const SYMBOL_TEXT_GAP: i32 = 5;
const ITEM_GAP: i32 = 20;
const ROW_GAP: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendOrient {
    #[default]
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LegendIcon {
    #[default]
    LineDot,
    Rect,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegendOption {
    pub show: Option<bool>,
    /// Item names; empty uses the series names.
    pub data: Vec<String>,
    pub left: String,
    pub top: String,
    pub orient: LegendOrient,
    pub icon: LegendIcon,
    pub font_style: FontStyle,
    /// Draw over the plot instead of reserving space above it.
    pub overlay_chart: Option<bool>,
}

impl LegendOption {
    #[must_use]
    pub fn new(data: &[&str]) -> Self {
        Self {
            data: data.iter().map(|name| (*name).to_owned()).collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_left(mut self, left: &str) -> Self {
        self.left = left.to_owned();
        self
    }

    #[must_use]
    pub fn with_top(mut self, top: &str) -> Self {
        self.top = top.to_owned();
        self
    }

    #[must_use]
    pub fn with_orient(mut self, orient: LegendOrient) -> Self {
        self.orient = orient;
        self
    }

    #[must_use]
    pub fn with_icon(mut self, icon: LegendIcon) -> Self {
        self.icon = icon;
        self
    }

    #[must_use]
    pub fn with_overlay_chart(mut self, overlay: bool) -> Self {
        self.overlay_chart = Some(overlay);
        self
    }

    #[must_use]
    pub fn is_bottom(&self) -> bool {
        matches!(SizeToken::parse(&self.top), Ok(SizeToken::Keyword(Anchor::Bottom)))
    }
}

struct LegendItem<'a> {
    name: &'a str,
    color: Color,
    text: Bounds,
}

/// Draws legend items for `names` in `colors` and returns the legend box
/// relative to `painter`.
pub fn render_legend(
    painter: &Painter,
    option: &LegendOption,
    names: &[String],
    colors: &[Color],
) -> ChartResult<Bounds> {
    let names = if option.data.is_empty() {
        names
    } else {
        &option.data[..]
    };
    if option.show == Some(false) || names.is_empty() {
        return Ok(Bounds::ZERO);
    }
    let theme = painter.theme();
    let font_style = option
        .font_style
        .clone()
        .or(&FontStyle::new(0.0, theme.legend_text_color()));

    let items: Vec<LegendItem<'_>> = names
        .iter()
        .enumerate()
        .map(|(index, name)| LegendItem {
            name,
            color: colors
                .get(index)
                .copied()
                .unwrap_or_else(|| theme.series_color(index)),
            text: painter.measure_text(name, 0.0, &font_style),
        })
        .collect();
    let item_height = items
        .iter()
        .map(|item| item.text.height())
        .max()
        .unwrap_or(0)
        .max(SYMBOL_HEIGHT);
    let item_width = |item: &LegendItem<'_>| SYMBOL_WIDTH + SYMBOL_TEXT_GAP + item.text.width();

    // Rows of item indexes with their widths.
    let mut rows: Vec<(Vec<usize>, i32)> = Vec::new();
    match option.orient {
        LegendOrient::Horizontal => {
            let mut current: Vec<usize> = Vec::new();
            let mut width = 0;
            for (index, item) in items.iter().enumerate() {
                let next = if current.is_empty() {
                    item_width(item)
                } else {
                    width + ITEM_GAP + item_width(item)
                };
                if next > painter.width() && !current.is_empty() {
                    rows.push((std::mem::take(&mut current), width));
                    width = item_width(item);
                } else {
                    width = next;
                }
                current.push(index);
            }
            if !current.is_empty() {
                rows.push((current, width));
            }
        }
        LegendOrient::Vertical => {
            for (index, item) in items.iter().enumerate() {
                rows.push((vec![index], item_width(item)));
            }
        }
    }

    let block_width = rows.iter().map(|(_, width)| *width).max().unwrap_or(0);
    let block_height = rows.len() as i32 * item_height + (rows.len() as i32 - 1).max(0) * ROW_GAP;
    let x = resolve_horizontal_position(&option.left, painter.width(), block_width)?;
    let x = if option.left.trim().is_empty() {
        (painter.width() - block_width) / 2
    } else {
        x
    };
    let y = resolve_vertical_position(&option.top, painter.height(), block_height)?;

    for (row_index, (row, _)) in rows.iter().enumerate() {
        let top = y + row_index as i32 * (item_height + ROW_GAP);
        let center_y = top + item_height / 2;
        let mut left = x;
        for &index in row {
            let item = &items[index];
            draw_symbol(painter, option.icon, left, center_y, item.color);
            let text_left = left + SYMBOL_WIDTH + SYMBOL_TEXT_GAP;
            let ascent = painter.text_metrics(item.name, &font_style).ascent;
            let baseline = center_y - item.text.height() / 2 + ascent.round() as i32;
            painter.text(item.name, text_left, baseline, 0.0, &font_style);
            left = text_left + item.text.width() + ITEM_GAP;
        }
    }
    Ok(Bounds::from_size(x, y, block_width, block_height))
}

fn draw_symbol(painter: &Painter, icon: LegendIcon, left: i32, center_y: i32, color: Color) {
    match icon {
        LegendIcon::LineDot => {
            let line = painter.with_drawing_style(&Style::stroke(3.0, color));
            line.line_stroke(&[
                Point::new(left, center_y),
                Point::new(left + SYMBOL_WIDTH, center_y),
            ]);
            let dot = painter.with_drawing_style(&Style::stroke(1.0, color).with_fill_color(color));
            dot.circle(5.0, left + SYMBOL_WIDTH / 2, center_y);
        }
        LegendIcon::Rect => {
            painter.filled_rect(
                left,
                center_y - SYMBOL_HEIGHT / 2,
                left + SYMBOL_WIDTH,
                center_y + SYMBOL_HEIGHT / 2,
                color,
                color,
                1.0,
            );
        }
    }
}
