use std::cell::RefCell;
use std::f64::consts::{FRAC_PI_2, TAU};
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::{Bounds, Color, Point};
use crate::error::{ChartError, ChartResult};
use crate::render::{
    Backend, Font, FontStyle, OutputFormat, Style, TextMetrics, new_backend, points_to_pixels,
};
use crate::theme::{ColorPalette, get_default_theme};

/// Font size in points used when neither the call nor the painter sets one.
pub const DEFAULT_FONT_SIZE: f64 = 10.0;

/// Horizontal alignment for [`Painter::text_fit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Root painter configuration.
#[derive(Debug, Clone)]
pub struct PainterOptions {
    pub format: OutputFormat,
    pub width: i32,
    pub height: i32,
    pub padding: Bounds,
    /// Absolute drawing box; unset means the whole canvas.
    pub bounds: Bounds,
    pub theme: Option<Arc<ColorPalette>>,
    pub font: Option<Font>,
}

impl PainterOptions {
    #[must_use]
    pub fn new(format: OutputFormat, width: i32, height: i32) -> Self {
        Self {
            format,
            width,
            height,
            padding: Bounds::ZERO,
            bounds: Bounds::ZERO,
            theme: None,
            font: None,
        }
    }

    #[must_use]
    pub fn with_padding(mut self, padding: Bounds) -> Self {
        self.padding = padding;
        self
    }

    #[must_use]
    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }

    #[must_use]
    pub fn with_theme(mut self, theme: Arc<ColorPalette>) -> Self {
        self.theme = Some(theme);
        self
    }

    #[must_use]
    pub fn with_font(mut self, font: Font) -> Self {
        self.font = Some(font);
        self
    }
}

/// Overrides applied by [`Painter::child`]; unset fields inherit.
#[derive(Debug, Clone, Default)]
pub struct ChildOptions {
    pub padding: Bounds,
    /// Absolute box, intersected with the parent box.
    pub bounds: Bounds,
    pub style: Option<Style>,
    pub theme: Option<Arc<ColorPalette>>,
    pub font: Option<Font>,
}

impl ChildOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_padding(mut self, padding: Bounds) -> Self {
        self.padding = padding;
        self
    }

    #[must_use]
    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = Some(style);
        self
    }

    #[must_use]
    pub fn with_theme(mut self, theme: Arc<ColorPalette>) -> Self {
        self.theme = Some(theme);
        self
    }

    #[must_use]
    pub fn with_font(mut self, font: Font) -> Self {
        self.font = Some(font);
        self
    }
}

/// Drawing surface over one box of a shared backend.
///
/// All coordinates passed to drawing methods are relative to the painter's
/// own box; children share the backend and see their own origin as `(0, 0)`.
#[derive(Clone)]
pub struct Painter {
    backend: Rc<RefCell<Box<dyn Backend>>>,
    format: OutputFormat,
    bounds: Bounds,
    style: Style,
    theme: Arc<ColorPalette>,
    font: Font,
}

impl fmt::Debug for Painter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Painter")
            .field("format", &self.format)
            .field("bounds", &self.bounds)
            .field("theme", &self.theme.name())
            .field("font", &self.font.name())
            .finish_non_exhaustive()
    }
}

impl Painter {
    pub fn new(options: PainterOptions) -> ChartResult<Self> {
        if options.width <= 0 || options.height <= 0 {
            return Err(ChartError::InvalidCanvas {
                width: options.width,
                height: options.height,
            });
        }
        let backend = new_backend(options.format, options.width, options.height)?;
        let canvas = Bounds::from_size(0, 0, options.width, options.height);
        let base = if options.bounds.is_zero() {
            canvas
        } else {
            options.bounds.intersect(canvas)
        };
        let bounds = if options.padding.is_zero() {
            base
        } else {
            base.inset(options.padding)
        };
        debug!(
            format = %options.format,
            width = options.width,
            height = options.height,
            "painter created"
        );
        Ok(Self {
            backend: Rc::new(RefCell::new(backend)),
            format: options.format,
            bounds,
            style: Style::default(),
            theme: options.theme.unwrap_or_else(get_default_theme),
            font: options.font.unwrap_or_default(),
        })
    }

    /// Painter over a caller-provided backend, covering its whole canvas.
    pub(crate) fn from_backend(
        backend: Box<dyn Backend>,
        format: OutputFormat,
        theme: Arc<ColorPalette>,
        font: Font,
    ) -> ChartResult<Self> {
        let (width, height) = (backend.width(), backend.height());
        if width <= 0 || height <= 0 {
            return Err(ChartError::InvalidCanvas { width, height });
        }
        Ok(Self {
            backend: Rc::new(RefCell::new(backend)),
            format,
            bounds: Bounds::from_size(0, 0, width, height),
            style: Style::default(),
            theme,
            font,
        })
    }

    #[must_use]
    pub fn child(&self, options: ChildOptions) -> Self {
        let mut bounds = self.bounds;
        if !options.bounds.is_zero() {
            bounds = options.bounds.intersect(self.bounds);
        }
        if !options.padding.is_zero() {
            // Negative padding never grows a child past its parent.
            bounds = bounds.inset(options.padding).intersect(self.bounds);
        }
        let mut style = self.style.clone();
        if let Some(override_style) = options.style {
            style = override_style;
        }
        trace!(?bounds, "child painter");
        Self {
            backend: Rc::clone(&self.backend),
            format: self.format,
            bounds,
            style,
            theme: options.theme.unwrap_or_else(|| Arc::clone(&self.theme)),
            font: options.font.unwrap_or_else(|| self.font.clone()),
        }
    }

    /// Child over a box given relative to this painter's origin.
    #[must_use]
    pub fn child_at(&self, relative: Bounds) -> Self {
        self.child(ChildOptions::new().with_bounds(relative.shift(self.bounds.left, self.bounds.top)))
    }

    #[must_use]
    pub fn child_with_padding(&self, padding: Bounds) -> Self {
        self.child(ChildOptions::new().with_padding(padding))
    }

    /// Absolute canvas box.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    #[must_use]
    pub fn width(&self) -> i32 {
        self.bounds.width()
    }

    #[must_use]
    pub fn height(&self) -> i32 {
        self.bounds.height()
    }

    #[must_use]
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    #[must_use]
    pub fn theme(&self) -> &Arc<ColorPalette> {
        &self.theme
    }

    #[must_use]
    pub fn font(&self) -> &Font {
        &self.font
    }

    #[must_use]
    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn set_style(&mut self, style: Style) -> &mut Self {
        self.style = style;
        self
    }

    pub fn override_drawing_style(&mut self, style: &Style) -> &mut Self {
        self.style.merge_drawing(style);
        self
    }

    pub fn override_font_style(&mut self, font_style: &FontStyle) -> &mut Self {
        self.style.font_style.merge(font_style);
        self
    }

    /// Copy of this painter with `style` merged into the drawing state.
    #[must_use]
    pub fn with_drawing_style(&self, style: &Style) -> Self {
        let mut painter = self.clone();
        painter.style.merge_drawing(style);
        painter
    }

    fn abs_x(&self, x: i32) -> i32 {
        x + self.bounds.left
    }

    fn abs_y(&self, y: i32) -> i32 {
        y + self.bounds.top
    }

    pub fn move_to(&self, x: i32, y: i32) -> &Self {
        self.backend
            .borrow_mut()
            .move_to(self.abs_x(x), self.abs_y(y));
        self
    }

    pub fn line_to(&self, x: i32, y: i32) -> &Self {
        self.backend
            .borrow_mut()
            .line_to(self.abs_x(x), self.abs_y(y));
        self
    }

    pub fn quad_curve_to(&self, cx: i32, cy: i32, x: i32, y: i32) -> &Self {
        self.backend.borrow_mut().quad_curve_to(
            self.abs_x(cx),
            self.abs_y(cy),
            self.abs_x(x),
            self.abs_y(y),
        );
        self
    }

    pub fn arc_to(&self, cx: i32, cy: i32, rx: f64, ry: f64, start: f64, delta: f64) -> &Self {
        self.backend
            .borrow_mut()
            .arc_to(self.abs_x(cx), self.abs_y(cy), rx, ry, start, delta);
        self
    }

    pub fn close(&self) -> &Self {
        self.backend.borrow_mut().close();
        self
    }

    pub fn stroke(&self) -> &Self {
        self.backend.borrow_mut().stroke(&self.style);
        self
    }

    pub fn fill(&self) -> &Self {
        self.backend.borrow_mut().fill(&self.style);
        self
    }

    pub fn fill_stroke(&self) -> &Self {
        self.backend.borrow_mut().fill_stroke(&self.style);
        self
    }

    pub fn circle(&self, radius: f64, cx: i32, cy: i32) -> &Self {
        self.backend
            .borrow_mut()
            .circle(radius, self.abs_x(cx), self.abs_y(cy), &self.style);
        self
    }

    /// Dots of `radius` at each point.
    pub fn dots(&self, points: &[Point], radius: f64) -> &Self {
        for point in points {
            self.circle(radius, point.x, point.y);
        }
        self
    }

    /// Strokes a straight polyline.
    pub fn line_stroke(&self, points: &[Point]) -> &Self {
        if points.len() < 2 {
            return self;
        }
        for (index, point) in points.iter().enumerate() {
            if index == 0 {
                self.move_to(point.x, point.y);
            } else {
                self.line_to(point.x, point.y);
            }
        }
        self.stroke()
    }

    /// Strokes a polyline smoothed with quadratic curves through segment midpoints.
    pub fn smooth_line_stroke(&self, points: &[Point]) -> &Self {
        if points.len() < 3 {
            return self.line_stroke(points);
        }
        self.smooth_path(points);
        self.stroke()
    }

    fn smooth_path(&self, points: &[Point]) {
        let first = points[0];
        self.move_to(first.x, first.y);
        for pair in points.windows(2).skip(1) {
            let (control, next) = (pair[0], pair[1]);
            let mid_x = (control.x + next.x) / 2;
            let mid_y = (control.y + next.y) / 2;
            self.quad_curve_to(control.x, control.y, mid_x, mid_y);
        }
        if let Some(last) = points.last() {
            self.line_to(last.x, last.y);
        }
    }

    /// Fills the polygon through `points` with the current fill color.
    pub fn fill_area(&self, points: &[Point]) -> &Self {
        if points.len() < 3 {
            return self;
        }
        for (index, point) in points.iter().enumerate() {
            if index == 0 {
                self.move_to(point.x, point.y);
            } else {
                self.line_to(point.x, point.y);
            }
        }
        self.close();
        self.fill()
    }

    /// Vertices of a regular polygon whose first vertex points up.
    #[must_use]
    pub fn polygon_points(center: Point, radius: f64, sides: usize) -> Vec<Point> {
        (0..sides)
            .map(|index| {
                let angle = TAU * index as f64 / sides as f64;
                Point::new(
                    center.x + (radius * angle.sin()) as i32,
                    center.y - (radius * angle.cos()) as i32,
                )
            })
            .collect()
    }

    pub fn polygon(&self, center: Point, radius: f64, sides: usize) -> &Self {
        if sides < 3 {
            return self;
        }
        let mut points = Self::polygon_points(center, radius, sides);
        points.push(points[0]);
        self.line_stroke(&points)
    }

    /// Rectangle filled and outlined with explicit colors; painter style is untouched.
    #[allow(clippy::too_many_arguments)]
    pub fn filled_rect(
        &self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        fill: Color,
        stroke: Color,
        stroke_width: f64,
    ) -> &Self {
        let style = Style {
            stroke_width,
            stroke_color: stroke,
            fill_color: fill,
            ..Style::default()
        };
        self.move_to(x0, y0);
        self.line_to(x1, y0);
        self.line_to(x1, y1);
        self.line_to(x0, y1);
        self.line_to(x0, y0);
        self.backend.borrow_mut().fill_stroke(&style);
        self
    }

    /// Rectangle with optionally rounded top and bottom corners.
    pub fn rounded_rect(&self, rect: Bounds, radius: i32, round_top: bool, round_bottom: bool) -> &Self {
        let radius = radius.min(rect.width() / 2).min(rect.height() / 2).max(0);
        let top_radius = if round_top { radius } else { 0 };
        let bottom_radius = if round_bottom { radius } else { 0 };
        let Bounds {
            left,
            top,
            right,
            bottom,
            ..
        } = rect;

        self.move_to(left + top_radius, top);
        self.line_to(right - top_radius, top);
        if top_radius > 0 {
            self.quad_curve_to(right, top, right, top + top_radius);
        }
        self.line_to(right, bottom - bottom_radius);
        if bottom_radius > 0 {
            self.quad_curve_to(right, bottom, right - bottom_radius, bottom);
        }
        self.line_to(left + bottom_radius, bottom);
        if bottom_radius > 0 {
            self.quad_curve_to(left, bottom, left, bottom - bottom_radius);
        }
        self.line_to(left, top + top_radius);
        if top_radius > 0 {
            self.quad_curve_to(left, top, left + top_radius, top);
        }
        self.close();
        self.fill_stroke()
    }

    /// Map-pin marker whose tip sits near `(x, y)`.
    pub fn pin(&self, x: i32, y: i32, width: i32) -> &Self {
        let radius = f64::from(width) / 2.0;
        let y = y - width / 4;
        let angle = 15_f64.to_radians();
        let start = FRAC_PI_2 + angle;
        let delta = TAU - 2.0 * angle;
        self.arc_to(x, y, radius, radius, start, delta);
        self.line_to(x, y);
        self.close();
        self.fill_stroke();

        let start_x = x - radius as i32;
        let end_x = x + radius as i32;
        self.move_to(start_x, y);
        self.quad_curve_to(x, y + (radius * 2.5) as i32, end_x, y);
        self.close();
        self.fill()
    }

    fn arrow_vertical(&self, x: i32, y: i32, width: i32, height: i32, pointing_up: bool) -> &Self {
        let half_width = width / 2;
        let x0 = x - half_width;
        let x1 = x0 + width;
        let (y0, y1, dy) = if pointing_up {
            (y, y - height, -height / 3)
        } else {
            (y - height, y, -2 * height / 3)
        };
        self.move_to(x0, y0);
        self.line_to(x0 + half_width, y1);
        self.line_to(x1, y0);
        self.line_to(x0 + half_width, y + dy);
        self.line_to(x0, y0);
        self.fill_stroke()
    }

    fn arrow_horizontal(&self, x: i32, y: i32, width: i32, height: i32, pointing_right: bool) -> &Self {
        let half_height = height / 2;
        let y0 = y - half_height;
        let (x0, x1, dx) = if pointing_right {
            (x - width, x, width / 3)
        } else {
            (x + width, x, -width / 3)
        };
        self.move_to(x0, y0);
        self.line_to(x1, y0 + half_height);
        self.line_to(x0, y0 + height);
        self.line_to(x0 + dx, y0 + half_height);
        self.line_to(x0, y0);
        self.fill_stroke()
    }

    /// Arrow head whose tip is at `(x, y)`, pointing left.
    pub fn arrow_left(&self, x: i32, y: i32, width: i32, height: i32) -> &Self {
        self.arrow_horizontal(x, y, width, height, false)
    }

    pub fn arrow_right(&self, x: i32, y: i32, width: i32, height: i32) -> &Self {
        self.arrow_horizontal(x, y, width, height, true)
    }

    pub fn arrow_top(&self, x: i32, y: i32, width: i32, height: i32) -> &Self {
        self.arrow_vertical(x, y, width, height, true)
    }

    pub fn arrow_bottom(&self, x: i32, y: i32, width: i32, height: i32) -> &Self {
        self.arrow_vertical(x, y, width, height, false)
    }

    /// Horizontal reference line: start dot, dashed body, arrow at the end.
    pub fn mark_line(&self, x: i32, y: i32, width: i32) -> &Self {
        const ARROW_WIDTH: i32 = 16;
        const ARROW_HEIGHT: i32 = 10;
        const DOT_RADIUS: i32 = 3;
        let end_x = x + width;
        let solid = Style {
            stroke_dash: Default::default(),
            ..self.style.clone()
        };
        self.backend.borrow_mut().circle(
            f64::from(DOT_RADIUS),
            self.abs_x(x + DOT_RADIUS),
            self.abs_y(y),
            &solid,
        );
        self.move_to(x + DOT_RADIUS * 3, y);
        self.line_to(end_x - ARROW_WIDTH, y);
        self.stroke();

        let mut arrow = self.clone();
        arrow.style = solid;
        arrow.arrow_right(end_x, y, ARROW_WIDTH, ARROW_HEIGHT);
        self
    }

    /// Paints a `width x height` rectangle at the painter origin.
    ///
    /// A hollow background only outlines the rectangle.
    pub fn set_background(&self, width: i32, height: i32, color: Color, hollow: bool) -> &Self {
        let style = if hollow {
            Style::stroke(1.0, color)
        } else {
            Style::fill(color)
        };
        self.move_to(0, 0);
        self.line_to(width, 0);
        self.line_to(width, height);
        self.line_to(0, height);
        self.line_to(0, 0);
        let mut backend = self.backend.borrow_mut();
        if hollow {
            backend.stroke(&style);
        } else {
            backend.fill(&style);
        }
        drop(backend);
        self
    }

    /// Text style with every unset field resolved from the painter and theme.
    #[must_use]
    pub fn resolve_font_style(&self, font_style: &FontStyle) -> FontStyle {
        let fallback = FontStyle {
            font: Some(self.font.clone()),
            size: DEFAULT_FONT_SIZE,
            color: self.theme.label_text_color(),
        };
        font_style
            .clone()
            .or(&self.style.font_style)
            .or(&fallback)
    }

    /// Draws one line of text with its baseline at `y`; `rotation` in radians.
    pub fn text(&self, body: &str, x: i32, y: i32, rotation: f64, font_style: &FontStyle) -> &Self {
        let resolved = self.resolve_font_style(font_style);
        let font = resolved.font.clone().unwrap_or_else(|| self.font.clone());
        self.backend.borrow_mut().text(
            body,
            self.abs_x(x),
            self.abs_y(y),
            rotation,
            &font,
            &resolved,
        );
        self
    }

    /// Box of `body` at the origin, including ascender and descender; rotated
    /// text reports the extent of its rotated rectangle.
    #[must_use]
    pub fn measure_text(&self, body: &str, rotation: f64, font_style: &FontStyle) -> Bounds {
        let (width, height, _) = self.measure_unrotated(body, font_style);
        if rotation == 0.0 {
            return Bounds::from_size(0, 0, width, height);
        }
        let (sin, cos) = rotation.sin_cos();
        let (w, h) = (f64::from(width), f64::from(height));
        let rotated_width = (w * cos).abs() + (h * sin).abs();
        let rotated_height = (w * sin).abs() + (h * cos).abs();
        Bounds::from_size(0, 0, rotated_width.ceil() as i32, rotated_height.ceil() as i32)
    }

    /// Unrounded pixel metrics of one line of `body`.
    #[must_use]
    pub fn text_metrics(&self, body: &str, font_style: &FontStyle) -> TextMetrics {
        let resolved = self.resolve_font_style(font_style);
        let font = resolved.font.unwrap_or_else(|| self.font.clone());
        font.measure(body, points_to_pixels(resolved.size))
    }

    /// Rounded-up width, height and ascent in pixels.
    fn measure_unrotated(&self, body: &str, font_style: &FontStyle) -> (i32, i32, i32) {
        let metrics = self.text_metrics(body, font_style);
        (
            metrics.width.ceil() as i32,
            metrics.height().ceil() as i32,
            metrics.ascent.round() as i32,
        )
    }

    /// Wraps `body` on whitespace to `max_width` and draws the lines with the
    /// block's top edge at `y`. Returns the occupied box.
    pub fn text_fit(
        &self,
        body: &str,
        x: i32,
        y: i32,
        max_width: i32,
        align: TextAlign,
        font_style: &FontStyle,
    ) -> Bounds {
        let lines = self.wrap_text(body, max_width, font_style);
        let mut area = Bounds::ZERO;
        for (index, line) in lines.iter().enumerate() {
            let (width, height, ascent) = self.measure_unrotated(line, font_style);
            let offset = match align {
                TextAlign::Left => 0,
                TextAlign::Center => (max_width - width) / 2,
                TextAlign::Right => max_width - width,
            };
            let top = y + index as i32 * height;
            self.text(line, x + offset, top + ascent, 0.0, font_style);
            area = area.union(Bounds::from_size(x + offset, top, width, height));
        }
        area
    }

    /// Greedy whitespace word wrap; words wider than `max_width` stay whole.
    #[must_use]
    pub fn wrap_text(&self, body: &str, max_width: i32, font_style: &FontStyle) -> Vec<String> {
        let mut lines = Vec::new();
        for paragraph in body.split('\n') {
            let mut current = String::new();
            for word in paragraph.split_whitespace() {
                let candidate = if current.is_empty() {
                    word.to_owned()
                } else {
                    format!("{current} {word}")
                };
                let (width, _, _) = self.measure_unrotated(&candidate, font_style);
                if width > max_width && !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                    current = word.to_owned();
                } else {
                    current = candidate;
                }
            }
            lines.push(current);
        }
        lines
    }

    /// Flushes the backend and returns the encoded image.
    pub fn bytes(&self) -> ChartResult<Vec<u8>> {
        let bytes = self.backend.borrow_mut().finish()?;
        debug!(format = %self.format, bytes = bytes.len(), "painter flushed");
        Ok(bytes)
    }
}
