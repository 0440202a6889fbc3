use serde::{Deserialize, Serialize};

use crate::core::flexible::{resolve_horizontal_position, resolve_vertical_position};
use crate::core::{Anchor, Bounds, SizeToken};
use crate::error::ChartResult;
use crate::render::{FontStyle, Painter};

pub const TITLE_FONT_SIZE: f64 = 14.0;
pub const SUBTEXT_FONT_SIZE: f64 = 10.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TitleOption {
    pub show: Option<bool>,
    /// Title text; `\n` separates lines.
    pub text: String,
    pub subtext: String,
    /// `left|center|right`, pixels or percent of the width.
    pub left: String,
    /// `top|bottom`, pixels or percent of the height.
    pub top: String,
    pub font_style: FontStyle,
    pub subtext_font_style: FontStyle,
}

impl TitleOption {
    #[must_use]
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_owned(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_subtext(mut self, subtext: &str) -> Self {
        self.subtext = subtext.to_owned();
        self
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
    pub fn is_visible(&self) -> bool {
        self.show != Some(false) && !(self.text.is_empty() && self.subtext.is_empty())
    }

    /// Whether the title is anchored to the bottom edge.
    #[must_use]
    pub fn is_bottom(&self) -> bool {
        matches!(SizeToken::parse(&self.top), Ok(SizeToken::Keyword(Anchor::Bottom)))
    }
}

/// Draws the title block and returns its box relative to `painter`.
pub fn render_title(painter: &Painter, option: &TitleOption) -> ChartResult<Bounds> {
    if !option.is_visible() {
        return Ok(Bounds::ZERO);
    }
    let theme = painter.theme();
    let title_style = option
        .font_style
        .clone()
        .or(&FontStyle::new(TITLE_FONT_SIZE, theme.title_text_color()));
    let subtext_style = option
        .subtext_font_style
        .clone()
        .or(&FontStyle::new(SUBTEXT_FONT_SIZE, theme.title_text_color()));

    let mut lines: Vec<(&str, &FontStyle, Bounds)> = Vec::new();
    for (text, style) in [(&option.text, &title_style), (&option.subtext, &subtext_style)] {
        if text.is_empty() {
            continue;
        }
        for line in text.split('\n') {
            lines.push((line, style, painter.measure_text(line, 0.0, style)));
        }
    }
    let block_width = lines.iter().map(|(_, _, size)| size.width()).max().unwrap_or(0);
    let block_height: i32 = lines.iter().map(|(_, _, size)| size.height()).sum();

    let x = resolve_horizontal_position(&option.left, painter.width(), block_width)?;
    let y = resolve_vertical_position(&option.top, painter.height(), block_height)?;
    let anchor = SizeToken::parse(&option.left)?;

    let mut top = y;
    for (line, style, size) in &lines {
        let offset = match anchor {
            SizeToken::Keyword(Anchor::Center) => (block_width - size.width()) / 2,
            SizeToken::Keyword(Anchor::Right) => block_width - size.width(),
            _ => 0,
        };
        let ascent = painter.text_metrics(line, style).ascent.round() as i32;
        painter.text(line, x + offset, top + ascent, 0.0, style);
        top += size.height();
    }
    Ok(Bounds::from_size(x, y, block_width, block_height))
}
