use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// 8-bit RGBA color.
///
/// The all-zero value doubles as "unset" when styles are merged, see
/// [`Color::is_zero`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "[u8; 4]", into = "[u8; 4]")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl From<[u8; 4]> for Color {
    fn from(value: [u8; 4]) -> Self {
        Self::rgba(value[0], value[1], value[2], value[3])
    }
}

impl From<Color> for [u8; 4] {
    fn from(value: Color) -> Self {
        [value.r, value.g, value.b, value.a]
    }
}

impl Color {
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Returns `true` for the fully transparent black value used as "unset".
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.a == 0 && self.r == 0 && self.g == 0 && self.b == 0
    }

    #[must_use]
    pub fn is_transparent(self) -> bool {
        self.a == 0
    }

    #[must_use]
    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Perceived-brightness test: light when
    /// `sqrt(0.299 R² + 0.587 G² + 0.114 B²) > 127.5`.
    #[must_use]
    pub fn is_light(self) -> bool {
        let r = f64::from(self.r);
        let g = f64::from(self.g);
        let b = f64::from(self.b);
        (0.299 * r * r + 0.587 * g * g + 0.114 * b * b).sqrt() > 127.5
    }

    #[must_use]
    pub fn is_dark(self) -> bool {
        !self.is_light()
    }

    /// Moves every channel toward white by `factor` (0..=1).
    #[must_use]
    pub fn lighten(self, factor: f64) -> Self {
        let factor = factor.clamp(0.0, 1.0);
        let channel = |value: u8| {
            let value = f64::from(value);
            (value + (255.0 - value) * factor).round() as u8
        };
        Self::rgba(channel(self.r), channel(self.g), channel(self.b), self.a)
    }

    /// Moves every channel toward black by `factor` (0..=1).
    #[must_use]
    pub fn darken(self, factor: f64) -> Self {
        let factor = factor.clamp(0.0, 1.0);
        let channel = |value: u8| (f64::from(value) * (1.0 - factor)).round() as u8;
        Self::rgba(channel(self.r), channel(self.g), channel(self.b), self.a)
    }

    /// Linear interpolation in RGBA space, `t` clamped to 0..=1.
    #[must_use]
    pub fn mix(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let channel = |from: u8, to: u8| {
            let from = f64::from(from);
            (from + (f64::from(to) - from) * t).round() as u8
        };
        Self::rgba(
            channel(self.r, other.r),
            channel(self.g, other.g),
            channel(self.b, other.b),
            channel(self.a, other.a),
        )
    }

    /// Parses `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(..)`, `rgba(..)` and the
    /// names `white`, `black` and `transparent`.
    pub fn parse(text: &str) -> ChartResult<Self> {
        let value = text.trim().to_ascii_lowercase();
        match value.as_str() {
            "white" => return Ok(Self::WHITE),
            "black" => return Ok(Self::BLACK),
            "transparent" | "none" => return Ok(Self::TRANSPARENT),
            _ => {}
        }

        if let Some(hex) = value.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| invalid_color(text));
        }

        let (body, has_alpha) = if let Some(body) = value.strip_prefix("rgba(") {
            (body, true)
        } else if let Some(body) = value.strip_prefix("rgb(") {
            (body, false)
        } else {
            return Err(invalid_color(text));
        };
        let body = body.strip_suffix(')').ok_or_else(|| invalid_color(text))?;
        let parts: Vec<&str> = body.split(',').map(str::trim).collect();
        let expected = if has_alpha { 4 } else { 3 };
        if parts.len() != expected {
            return Err(invalid_color(text));
        }

        let mut channels = [0u8; 3];
        for (slot, part) in channels.iter_mut().zip(&parts) {
            *slot = part.parse::<u8>().map_err(|_| invalid_color(text))?;
        }
        let alpha = if has_alpha {
            let alpha: f64 = parts[3].parse().map_err(|_| invalid_color(text))?;
            if !(0.0..=1.0).contains(&alpha) {
                return Err(invalid_color(text));
            }
            (alpha * 255.0).round() as u8
        } else {
            255
        };
        Ok(Self::rgba(channels[0], channels[1], channels[2], alpha))
    }
}

impl fmt::Display for Color {
    /// CSS form used by the SVG backend.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "rgb({},{},{})", self.r, self.g, self.b)
        } else {
            write!(
                f,
                "rgba({},{},{},{:.2})",
                self.r,
                self.g,
                self.b,
                f64::from(self.a) / 255.0
            )
        }
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    fn pair(bytes: &[u8]) -> Option<u8> {
        let hi = (*bytes.first()? as char).to_digit(16)? as u8;
        let lo = (*bytes.get(1)? as char).to_digit(16)? as u8;
        Some((hi << 4) | lo)
    }
    fn single(byte: u8) -> Option<u8> {
        let value = (byte as char).to_digit(16)? as u8;
        Some((value << 4) | value)
    }

    let bytes = hex.as_bytes();
    match bytes.len() {
        3 => Some(Color::rgb(
            single(bytes[0])?,
            single(bytes[1])?,
            single(bytes[2])?,
        )),
        6 => Some(Color::rgb(
            pair(&bytes[0..2])?,
            pair(&bytes[2..4])?,
            pair(&bytes[4..6])?,
        )),
        8 => Some(Color::rgba(
            pair(&bytes[0..2])?,
            pair(&bytes[2..4])?,
            pair(&bytes[4..6])?,
            pair(&bytes[6..8])?,
        )),
        _ => None,
    }
}

fn invalid_color(text: &str) -> ChartError {
    ChartError::validation(format!("invalid color `{text}`"))
}

#[cfg(test)]
mod tests {
    use super::Color;

    #[test]
    fn zero_color_means_unset() {
        assert!(Color::default().is_zero());
        assert!(!Color::BLACK.is_zero());
        assert!(!Color::rgba(1, 0, 0, 0).is_zero());
    }

    #[test]
    fn luminance_threshold_splits_light_and_dark() {
        assert!(Color::WHITE.is_light());
        assert!(Color::rgb(16, 12, 42).is_dark());
        assert!(Color::rgb(128, 128, 128).is_light());
        assert!(Color::rgb(127, 127, 127).is_dark());
    }

    #[test]
    fn parses_css_forms() {
        assert_eq!(Color::parse("#5470c6").expect("hex"), Color::rgb(84, 112, 198));
        assert_eq!(Color::parse("#fff").expect("short hex"), Color::WHITE);
        assert_eq!(
            Color::parse("rgba(10, 20, 30, 0.2)").expect("rgba"),
            Color::rgba(10, 20, 30, 51)
        );
        assert!(Color::parse("rgb(300,0,0)").is_err());
        assert!(Color::parse("teal").is_err());
    }

    #[test]
    fn css_string_drops_alpha_when_opaque() {
        assert_eq!(Color::rgb(1, 2, 3).to_string(), "rgb(1,2,3)");
        assert_eq!(Color::rgba(1, 2, 3, 51).to_string(), "rgba(1,2,3,0.20)");
    }
}
