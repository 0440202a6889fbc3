pub mod color;
pub mod flexible;
pub mod format;
pub mod geometry;
pub mod scale;

pub use color::Color;
pub use flexible::{Anchor, SizeToken, parse_flexible_value};
pub use format::{
    ValueFormatter, format_decimal, format_label_template, format_percent, format_short,
};
pub use geometry::{Bounds, Point, normalize_angle};
pub use scale::{CategoryScale, NiceScale};
