//! Font handles, text metrics and the process-wide font registry.

use std::fmt;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use indexmap::IndexMap;
use tracing::debug;
use ttf_parser::{Face, GlyphId};

use crate::error::{ChartError, ChartResult};

/// Chart font sizes are points; rendered text is `points * 92.16 / 72` pixels.
pub const TEXT_DPI: f64 = 92.16;
pub const BUILTIN_FONT_NAME: &str = "sans-serif";

const BUILTIN_ASCENDER: f64 = 0.93;
const BUILTIN_DESCENDER: f64 = -0.24;

#[must_use]
pub fn points_to_pixels(points: f64) -> f64 {
    points * TEXT_DPI / 72.0
}

/// Measured single-line text extent in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    pub width: f64,
    pub ascent: f64,
    pub descent: f64,
}

impl TextMetrics {
    #[must_use]
    pub fn height(&self) -> f64 {
        self.ascent + self.descent
    }
}

enum FontData {
    Builtin,
    TrueType {
        bytes: Vec<u8>,
        units_per_em: f64,
        ascender: f64,
        descender: f64,
    },
}

struct FontInner {
    name: String,
    family: String,
    data: FontData,
}

/// Shared font handle.
#[derive(Clone)]
pub struct Font {
    inner: Arc<FontInner>,
}

impl Font {
    /// Deterministic estimated metrics, used until a TrueType font is installed.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            inner: Arc::new(FontInner {
                name: BUILTIN_FONT_NAME.to_owned(),
                family: BUILTIN_FONT_NAME.to_owned(),
                data: FontData::Builtin,
            }),
        }
    }

    /// Parses a TrueType/OpenType face.
    pub fn from_ttf(name: &str, bytes: Vec<u8>) -> ChartResult<Self> {
        let face = Face::parse(&bytes, 0)
            .map_err(|err| ChartError::backend(format!("font `{name}` cannot be parsed: {err}")))?;
        let units_per_em = f64::from(face.units_per_em());
        if units_per_em <= 0.0 {
            return Err(ChartError::backend(format!(
                "font `{name}` reports zero units per em"
            )));
        }
        let family = face
            .names()
            .into_iter()
            .filter(|entry| entry.name_id == ttf_parser::name_id::FAMILY)
            .find_map(|entry| entry.to_string())
            .unwrap_or_else(|| name.to_owned());
        let ascender = f64::from(face.ascender());
        let descender = f64::from(face.descender());
        drop(face);
        Ok(Self {
            inner: Arc::new(FontInner {
                name: name.to_owned(),
                family,
                data: FontData::TrueType {
                    bytes,
                    units_per_em,
                    ascender,
                    descender,
                },
            }),
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Family name written into SVG `font-family`.
    #[must_use]
    pub fn family(&self) -> &str {
        &self.inner.family
    }

    #[must_use]
    pub fn is_builtin(&self) -> bool {
        matches!(self.inner.data, FontData::Builtin)
    }

    /// Raw face bytes for rasterizer font databases.
    #[must_use]
    pub fn ttf_bytes(&self) -> Option<&[u8]> {
        match &self.inner.data {
            FontData::Builtin => None,
            FontData::TrueType { bytes, .. } => Some(bytes),
        }
    }

    /// Measures `text` at `size_px` pixels.
    #[must_use]
    pub fn measure(&self, text: &str, size_px: f64) -> TextMetrics {
        match &self.inner.data {
            FontData::Builtin => TextMetrics {
                width: estimate_width_units(text) * size_px,
                ascent: BUILTIN_ASCENDER * size_px,
                descent: -BUILTIN_DESCENDER * size_px,
            },
            FontData::TrueType {
                bytes,
                units_per_em,
                ascender,
                descender,
            } => {
                let scale = size_px / units_per_em;
                let advance = Face::parse(bytes, 0)
                    .map(|face| {
                        text.chars()
                            .map(|ch| {
                                let glyph = face.glyph_index(ch).unwrap_or(GlyphId(0));
                                face.glyph_hor_advance(glyph)
                                    .map_or(*units_per_em / 2.0, f64::from)
                            })
                            .sum::<f64>()
                    })
                    .unwrap_or_else(|_| estimate_width_units(text) * units_per_em);
                TextMetrics {
                    width: advance * scale,
                    ascent: ascender * scale,
                    descent: -descender * scale,
                }
            }
        }
    }
}

impl fmt::Debug for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Font")
            .field("name", &self.inner.name)
            .field("family", &self.inner.family)
            .field("builtin", &self.is_builtin())
            .finish()
    }
}

impl PartialEq for Font {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner) || self.inner.name == other.inner.name
    }
}

impl Default for Font {
    fn default() -> Self {
        get_default_font()
    }
}

/// Em-relative advance estimate; backend-independent.
fn estimate_width_units(text: &str) -> f64 {
    text.chars().fold(0.0, |acc, ch| {
        acc + match ch {
            '0'..='9' => 0.56,
            '.' | ',' | ':' | ';' | '!' | '|' | '\'' => 0.28,
            'i' | 'j' | 'l' => 0.22,
            'f' | 't' | 'r' | 'I' => 0.33,
            'm' | 'w' => 0.83,
            'M' | 'W' => 0.89,
            '-' | '(' | ')' | '[' | ']' => 0.33,
            '+' | '=' | '<' | '>' => 0.58,
            '%' => 0.89,
            ' ' => 0.28,
            'A'..='Z' => 0.67,
            'a'..='z' => 0.53,
            _ if ch.is_ascii() => 0.56,
            _ => 1.0,
        }
    })
}

struct FontRegistry {
    fonts: IndexMap<String, Font>,
    default_name: String,
}

fn registry() -> &'static RwLock<FontRegistry> {
    static REGISTRY: OnceLock<RwLock<FontRegistry>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let mut fonts = IndexMap::new();
        fonts.insert(BUILTIN_FONT_NAME.to_owned(), Font::builtin());
        RwLock::new(FontRegistry {
            fonts,
            default_name: BUILTIN_FONT_NAME.to_owned(),
        })
    })
}

/// Parses and registers a TrueType font under `name`.
pub fn install_font(name: &str, bytes: Vec<u8>) -> ChartResult<Font> {
    let font = Font::from_ttf(name, bytes)?;
    let mut registry = registry().write().unwrap_or_else(PoisonError::into_inner);
    registry.fonts.insert(name.to_owned(), font.clone());
    debug!(font = name, family = font.family(), "installed font");
    Ok(font)
}

#[must_use]
pub fn get_font(name: &str) -> Option<Font> {
    let registry = registry().read().unwrap_or_else(PoisonError::into_inner);
    registry.fonts.get(name).cloned()
}

pub fn set_default_font(name: &str) -> ChartResult<()> {
    let mut registry = registry().write().unwrap_or_else(PoisonError::into_inner);
    if !registry.fonts.contains_key(name) {
        return Err(ChartError::validation(format!("font `{name}` is not installed")));
    }
    registry.default_name = name.to_owned();
    Ok(())
}

#[must_use]
pub fn get_default_font() -> Font {
    let registry = registry().read().unwrap_or_else(PoisonError::into_inner);
    registry
        .fonts
        .get(&registry.default_name)
        .cloned()
        .unwrap_or_else(Font::builtin)
}

/// Fonts installed from TrueType data, in installation order.
#[must_use]
pub fn installed_fonts() -> Vec<Font> {
    let registry = registry().read().unwrap_or_else(PoisonError::into_inner);
    registry
        .fonts
        .values()
        .filter(|font| !font.is_builtin())
        .cloned()
        .collect()
}
