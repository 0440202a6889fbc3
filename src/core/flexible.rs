//! String-encoded dimensions: pixels (`"20"`), percent of a total (`"20%"`)
//! and the named anchors `left|right|center|top|bottom`.

use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Named anchor accepted wherever a position token is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Anchor {
    Left,
    Right,
    Center,
    Top,
    Bottom,
}

/// Parsed form of a size or position token.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SizeToken {
    /// Empty string: the builder decides (auto sizing or its own default).
    Auto,
    Pixels(i32),
    /// Fraction of a caller-provided total; `"20%"` is stored as `20.0`.
    Percent(f64),
    Keyword(Anchor),
}

impl SizeToken {
    pub fn parse(text: &str) -> ChartResult<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Self::Auto);
        }

        match text {
            "left" => return Ok(Self::Keyword(Anchor::Left)),
            "right" => return Ok(Self::Keyword(Anchor::Right)),
            "center" => return Ok(Self::Keyword(Anchor::Center)),
            "top" => return Ok(Self::Keyword(Anchor::Top)),
            "bottom" => return Ok(Self::Keyword(Anchor::Bottom)),
            _ => {}
        }

        if let Some(number) = text.strip_suffix('%') {
            let value: f64 = number
                .trim()
                .parse()
                .map_err(|_| invalid_token(text))?;
            if !value.is_finite() {
                return Err(invalid_token(text));
            }
            return Ok(Self::Percent(value));
        }

        text.parse::<i32>()
            .map(Self::Pixels)
            .map_err(|_| invalid_token(text))
    }

    /// Resolves pixels and percent against `total`; keywords and `Auto`
    /// resolve to `None` because their meaning depends on the caller.
    #[must_use]
    pub fn resolve(self, total: i32) -> Option<i32> {
        match self {
            Self::Pixels(value) => Some(value),
            Self::Percent(percent) => Some((f64::from(total) * percent / 100.0) as i32),
            Self::Auto | Self::Keyword(_) => None,
        }
    }

    #[must_use]
    pub fn is_auto(self) -> bool {
        matches!(self, Self::Auto)
    }
}

/// Parses `"20"`, `"20%"` or `"-5%"` relative to `total`.
pub fn parse_flexible_value(text: &str, total: f64) -> ChartResult<f64> {
    let text = text.trim();
    if let Some(number) = text.strip_suffix('%') {
        let percent: f64 = number.trim().parse().map_err(|_| invalid_token(text))?;
        if !percent.is_finite() {
            return Err(invalid_token(text));
        }
        return Ok(total * percent / 100.0);
    }
    let value: f64 = text.parse().map_err(|_| invalid_token(text))?;
    if !value.is_finite() {
        return Err(invalid_token(text));
    }
    Ok(value)
}

/// Resolves a horizontal anchor token for an item of `item_width` inside `total_width`.
pub(crate) fn resolve_horizontal_position(
    token: &str,
    total_width: i32,
    item_width: i32,
) -> ChartResult<i32> {
    Ok(match SizeToken::parse(token)? {
        SizeToken::Auto | SizeToken::Keyword(Anchor::Left) => 0,
        SizeToken::Keyword(Anchor::Right) => total_width - item_width,
        SizeToken::Keyword(Anchor::Center) => (total_width - item_width) / 2,
        SizeToken::Keyword(anchor) => {
            return Err(ChartError::validation(format!(
                "`{anchor:?}` is not a horizontal position"
            )));
        }
        token => token.resolve(total_width).unwrap_or_default(),
    })
}

/// Vertical counterpart of [`resolve_horizontal_position`].
pub(crate) fn resolve_vertical_position(
    token: &str,
    total_height: i32,
    item_height: i32,
) -> ChartResult<i32> {
    Ok(match SizeToken::parse(token)? {
        SizeToken::Auto | SizeToken::Keyword(Anchor::Top) => 0,
        SizeToken::Keyword(Anchor::Bottom) => total_height - item_height,
        SizeToken::Keyword(Anchor::Center) => (total_height - item_height) / 2,
        SizeToken::Keyword(anchor) => {
            return Err(ChartError::validation(format!(
                "`{anchor:?}` is not a vertical position"
            )));
        }
        token => token.resolve(total_height).unwrap_or_default(),
    })
}

fn invalid_token(text: &str) -> ChartError {
    ChartError::validation(format!("malformed size token `{text}`"))
}

#[cfg(test)]
mod tests {
    use super::{Anchor, SizeToken, parse_flexible_value, resolve_horizontal_position};

    #[test]
    fn flexible_values_resolve_against_total() {
        assert_eq!(parse_flexible_value("50%", 200.0).expect("percent"), 100.0);
        assert_eq!(parse_flexible_value("-10", 999.0).expect("pixels"), -10.0);
        assert_eq!(parse_flexible_value("-5%", 200.0).expect("neg percent"), -10.0);
        assert!(parse_flexible_value("abc", 10.0).is_err());
    }

    #[test]
    fn token_grammar() {
        assert_eq!(SizeToken::parse("").expect("auto"), SizeToken::Auto);
        assert_eq!(SizeToken::parse("-3").expect("px"), SizeToken::Pixels(-3));
        assert_eq!(SizeToken::parse("20%").expect("pct"), SizeToken::Percent(20.0));
        assert_eq!(
            SizeToken::parse("center").expect("kw"),
            SizeToken::Keyword(Anchor::Center)
        );
        assert_eq!(SizeToken::parse("20%").expect("pct").resolve(600), Some(120));
        assert!(SizeToken::parse("12px").is_err());
    }

    #[test]
    fn horizontal_anchor_positions() {
        assert_eq!(resolve_horizontal_position("right", 100, 30).expect("right"), 70);
        assert_eq!(resolve_horizontal_position("center", 100, 30).expect("center"), 35);
        assert_eq!(resolve_horizontal_position("10%", 100, 30).expect("pct"), 10);
        assert!(resolve_horizontal_position("top", 100, 30).is_err());
    }
}
