mod font;
mod null_backend;
mod painter;
#[cfg(feature = "png")]
mod png_backend;
mod style;
mod svg_backend;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use font::{
    BUILTIN_FONT_NAME, Font, TEXT_DPI, TextMetrics, get_default_font, get_font, install_font,
    installed_fonts, points_to_pixels, set_default_font,
};
pub use null_backend::NullBackend;
pub use painter::{ChildOptions, DEFAULT_FONT_SIZE, Painter, PainterOptions, TextAlign};
#[cfg(feature = "png")]
pub use png_backend::PngBackend;
pub use style::{FontStyle, Style};
pub use svg_backend::SvgBackend;

use crate::error::{ChartError, ChartResult};

/// Image encoding produced by [`Painter::bytes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Svg,
    #[default]
    Png,
}

impl FromStr for OutputFormat {
    type Err = ChartError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            other => Err(ChartError::validation(format!(
                "unsupported output format `{other}`"
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Svg => "svg",
            Self::Png => "png",
        })
    }
}

/// Contract implemented by any drawing backend.
///
/// Backends receive absolute canvas coordinates and an ordered stream of
/// path and text commands; later commands paint over earlier ones. Path
/// commands accumulate until one of `stroke`, `fill` or `fill_stroke`
/// consumes them.
pub trait Backend {
    fn width(&self) -> i32;
    fn height(&self) -> i32;
    fn move_to(&mut self, x: i32, y: i32);
    fn line_to(&mut self, x: i32, y: i32);
    fn quad_curve_to(&mut self, cx: i32, cy: i32, x: i32, y: i32);
    /// Elliptical arc around `(cx, cy)`; angles in radians, zero pointing
    /// right, positive `delta` clockwise on screen.
    fn arc_to(&mut self, cx: i32, cy: i32, rx: f64, ry: f64, start: f64, delta: f64);
    fn close(&mut self);
    fn stroke(&mut self, style: &Style);
    fn fill(&mut self, style: &Style);
    fn fill_stroke(&mut self, style: &Style);
    fn circle(&mut self, radius: f64, cx: i32, cy: i32, style: &Style);
    /// Single text line with its baseline at `y`; `rotation` in radians.
    fn text(&mut self, body: &str, x: i32, y: i32, rotation: f64, font: &Font, style: &FontStyle);
    /// Serializes everything drawn so far.
    fn finish(&mut self) -> ChartResult<Vec<u8>>;
}

/// Creates the backend for `format` at the given canvas size.
pub(crate) fn new_backend(
    format: OutputFormat,
    width: i32,
    height: i32,
) -> ChartResult<Box<dyn Backend>> {
    match format {
        OutputFormat::Svg => Ok(Box::new(SvgBackend::new(width, height))),
        #[cfg(feature = "png")]
        OutputFormat::Png => Ok(Box::new(PngBackend::new(width, height))),
        #[cfg(not(feature = "png"))]
        OutputFormat::Png => Err(ChartError::backend(
            "png output requires the `png` feature",
        )),
    }
}
