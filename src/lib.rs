//! chartpaint: declarative 2D statistical charts rendered to SVG or PNG.
//!
//! A [`Painter`] owns a drawing surface; chart renderers paint option structs
//! into it and [`Painter::bytes`] returns the encoded image. Layout builders
//! split a painter into named child painters for dashboards.

pub mod charts;
pub mod core;
pub mod error;
pub mod layout;
pub mod render;
pub mod telemetry;
pub mod theme;

pub use charts::{ChartKind, ChartOption, render_chart};
pub use error::{ChartError, ChartResult};
pub use render::{OutputFormat, Painter, PainterOptions};
pub use theme::{ColorPalette, get_default_theme, get_theme, install_theme, set_default_theme};
