use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::Color;
use crate::render::Font;

/// Text style; zero fields mean "inherit" when merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FontStyle {
    #[serde(skip)]
    pub font: Option<Font>,
    /// Size in points.
    pub size: f64,
    pub color: Color,
}

impl FontStyle {
    #[must_use]
    pub fn new(size: f64, color: Color) -> Self {
        Self {
            font: None,
            size,
            color,
        }
    }

    #[must_use]
    pub fn with_font(mut self, font: Font) -> Self {
        self.font = Some(font);
        self
    }

    #[must_use]
    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Overwrites every field of `self` that is set in `other`.
    pub fn merge(&mut self, other: &Self) {
        if other.font.is_some() {
            self.font.clone_from(&other.font);
        }
        if other.size > 0.0 {
            self.size = other.size;
        }
        if !other.color.is_zero() {
            self.color = other.color;
        }
    }

    /// Fills fields unset in `self` from `fallback`.
    #[must_use]
    pub fn or(mut self, fallback: &Self) -> Self {
        if self.font.is_none() {
            self.font.clone_from(&fallback.font);
        }
        if self.size <= 0.0 {
            self.size = fallback.size;
        }
        if self.color.is_zero() {
            self.color = fallback.color;
        }
        self
    }
}

/// Drawing state held by a painter and handed to the backend per operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub stroke_width: f64,
    pub stroke_color: Color,
    pub stroke_dash: SmallVec<[f64; 4]>,
    pub fill_color: Color,
    pub font_style: FontStyle,
}

impl Style {
    #[must_use]
    pub fn stroke(width: f64, color: Color) -> Self {
        Self {
            stroke_width: width,
            stroke_color: color,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn fill(color: Color) -> Self {
        Self {
            fill_color: color,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_fill_color(mut self, color: Color) -> Self {
        self.fill_color = color;
        self
    }

    #[must_use]
    pub fn with_dash(mut self, dash: &[f64]) -> Self {
        self.stroke_dash = SmallVec::from_slice(dash);
        self
    }

    #[must_use]
    pub fn has_stroke(&self) -> bool {
        self.stroke_width > 0.0 && !self.stroke_color.is_transparent()
    }

    #[must_use]
    pub fn has_fill(&self) -> bool {
        !self.fill_color.is_transparent()
    }

    /// Merges the non-zero drawing fields of `other`; the font style is kept.
    pub fn merge_drawing(&mut self, other: &Self) {
        if other.stroke_width > 0.0 {
            self.stroke_width = other.stroke_width;
        }
        if !other.stroke_color.is_zero() {
            self.stroke_color = other.stroke_color;
        }
        if !other.stroke_dash.is_empty() {
            self.stroke_dash.clone_from(&other.stroke_dash);
        }
        if !other.fill_color.is_zero() {
            self.fill_color = other.fill_color;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FontStyle, Style};
    use crate::core::Color;

    #[test]
    fn drawing_merge_ignores_zero_fields() {
        let mut style = Style::stroke(2.0, Color::BLACK).with_fill_color(Color::WHITE);
        style.merge_drawing(&Style::fill(Color::rgb(1, 2, 3)));
        assert_eq!(style.stroke_width, 2.0);
        assert_eq!(style.stroke_color, Color::BLACK);
        assert_eq!(style.fill_color, Color::rgb(1, 2, 3));
    }

    #[test]
    fn font_fallback_fills_unset_fields() {
        let style = FontStyle::new(0.0, Color::rgb(9, 9, 9)).or(&FontStyle::new(12.0, Color::BLACK));
        assert_eq!(style.size, 12.0);
        assert_eq!(style.color, Color::rgb(9, 9, 9));
    }
}
