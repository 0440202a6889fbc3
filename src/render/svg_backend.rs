use std::f64::consts::{FRAC_PI_2, PI, TAU};
use std::fmt::Write as _;

use tracing::trace;

use crate::core::{Color, format_decimal};
use crate::error::{ChartError, ChartResult};
use crate::render::{Backend, Font, FontStyle, Style, points_to_pixels};

/// Vector backend writing one SVG element per primitive, without indentation.
#[derive(Debug)]
pub struct SvgBackend {
    width: i32,
    height: i32,
    path: Vec<String>,
    body: String,
    families: Vec<String>,
    error: Option<String>,
}

impl SvgBackend {
    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            path: Vec::new(),
            body: String::new(),
            families: Vec::new(),
            error: None,
        }
    }

    /// Font families referenced by text elements so far.
    #[must_use]
    pub fn font_families(&self) -> &[String] {
        &self.families
    }

    /// Document text without consuming the backend state.
    pub fn document(&self) -> ChartResult<String> {
        if let Some(message) = &self.error {
            return Err(ChartError::backend(message.clone()));
        }
        Ok(format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">{body}</svg>"#,
            w = self.width,
            h = self.height,
            body = self.body
        ))
    }

    fn fail(&mut self, message: String) {
        if self.error.is_none() {
            self.error = Some(message);
        }
    }

    fn flush_path(&mut self, style: String) {
        if self.path.is_empty() {
            return;
        }
        let d = self.path.join(" ");
        self.path.clear();
        let _ = write!(self.body, r#"<path d="{d}" style="{style}"/>"#);
    }
}

fn stroke_part(style: &Style) -> String {
    if !style.has_stroke() {
        return "stroke-width:0;stroke:none".to_owned();
    }
    let mut part = format!(
        "stroke-width:{};stroke:{}",
        format_decimal(style.stroke_width, 2),
        style.stroke_color
    );
    if !style.stroke_dash.is_empty() {
        let dash: Vec<String> = style
            .stroke_dash
            .iter()
            .map(|value| format_decimal(*value, 2))
            .collect();
        let _ = write!(part, ";stroke-dasharray:{}", dash.join(","));
    }
    part
}

fn fill_part(color: Color) -> String {
    if color.is_transparent() {
        "fill:none".to_owned()
    } else {
        format!("fill:{color}")
    }
}

fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

impl Backend for SvgBackend {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn move_to(&mut self, x: i32, y: i32) {
        self.path.push(format!("M {x} {y}"));
    }

    fn line_to(&mut self, x: i32, y: i32) {
        self.path.push(format!("L {x} {y}"));
    }

    fn quad_curve_to(&mut self, cx: i32, cy: i32, x: i32, y: i32) {
        self.path.push(format!("Q{cx},{cy} {x},{y}"));
    }

    fn arc_to(&mut self, cx: i32, cy: i32, rx: f64, ry: f64, start: f64, delta: f64) {
        if ![rx, ry, start, delta].iter().all(|value| value.is_finite()) || rx < 0.0 || ry < 0.0 {
            self.fail(format!(
                "invalid arc: rx={rx}, ry={ry}, start={start}, delta={delta}"
            ));
            return;
        }
        let delta = delta.clamp(-TAU, TAU);
        let start = start + FRAC_PI_2;
        let start_x = cx + (rx * start.sin()).round() as i32;
        let start_y = cy - (ry * start.cos()).round() as i32;
        if self.path.is_empty() {
            self.path.push(format!("M {start_x} {start_y}"));
        } else {
            self.path.push(format!("L {start_x} {start_y}"));
        }
        let end_x = cx + (rx * (start + delta).sin()).round() as i32;
        let end_y = cy - (ry * (start + delta).cos()).round() as i32;
        let large_arc = i32::from(delta.abs() > PI);
        self.path.push(format!(
            "A {} {} {:.2} {large_arc} 1 {end_x} {end_y}",
            rx as i32,
            ry as i32,
            delta.to_degrees()
        ));
    }

    fn close(&mut self) {
        self.path.push("Z".to_owned());
    }

    fn stroke(&mut self, style: &Style) {
        let css = format!("{};fill:none", stroke_part(style));
        self.flush_path(css);
    }

    fn fill(&mut self, style: &Style) {
        let css = format!("stroke-width:0;stroke:none;{}", fill_part(style.fill_color));
        self.flush_path(css);
    }

    fn fill_stroke(&mut self, style: &Style) {
        let css = format!("{};{}", stroke_part(style), fill_part(style.fill_color));
        self.flush_path(css);
    }

    fn circle(&mut self, radius: f64, cx: i32, cy: i32, style: &Style) {
        if !radius.is_finite() || radius < 0.0 {
            self.fail(format!("invalid circle radius {radius}"));
            return;
        }
        let _ = write!(
            self.body,
            r#"<circle cx="{cx}" cy="{cy}" r="{}" style="{};{}"/>"#,
            radius as i32,
            stroke_part(style),
            fill_part(style.fill_color)
        );
    }

    fn text(&mut self, body: &str, x: i32, y: i32, rotation: f64, font: &Font, style: &FontStyle) {
        if body.is_empty() {
            return;
        }
        if !rotation.is_finite() || !style.size.is_finite() {
            self.fail(format!("invalid text parameters for `{body}`"));
            return;
        }
        let family = font.family().to_owned();
        if !self.families.contains(&family) {
            self.families.push(family.clone());
        }
        let transform = if rotation == 0.0 {
            String::new()
        } else {
            format!(
                r#" transform="rotate({:.2},{x},{y})""#,
                rotation.to_degrees()
            )
        };
        let font_family = if font.is_builtin() {
            family
        } else {
            format!("'{}',sans-serif", escape_text(&family))
        };
        let _ = write!(
            self.body,
            r#"<text x="{x}" y="{y}" style="stroke-width:0;stroke:none;{};font-size:{}px;font-family:{font_family}"{transform}>{}</text>"#,
            fill_part(style.color),
            format_decimal(points_to_pixels(style.size), 1),
            escape_text(body)
        );
    }

    fn finish(&mut self) -> ChartResult<Vec<u8>> {
        let document = self.document()?;
        trace!(bytes = document.len(), "svg document finished");
        Ok(document.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::SvgBackend;
    use crate::core::Color;
    use crate::render::{Backend, Font, FontStyle, Style};

    #[test]
    fn arc_endpoints_round_to_nearest_pixel() {
        let mut backend = SvgBackend::new(600, 400);
        backend.move_to(300, 226);
        let delta = std::f64::consts::TAU * 1048.0 / 3147.0;
        backend.arc_to(300, 226, 107.2, 107.2, -std::f64::consts::FRAC_PI_2, delta);
        backend.close();
        backend.fill(&Style::fill(Color::rgb(84, 112, 198)));
        let svg = backend.document().expect("svg");
        assert!(svg.contains("M 300 226 L 300 119 A 107 107 119.89 0 1 393 279 Z"));
    }

    #[test]
    fn text_is_escaped_and_rotated() {
        let mut backend = SvgBackend::new(10, 10);
        backend.text(
            "a<b",
            1,
            2,
            std::f64::consts::FRAC_PI_2,
            &Font::builtin(),
            &FontStyle::new(10.0, Color::BLACK),
        );
        let svg = backend.document().expect("svg");
        assert!(svg.contains("a&lt;b</text>"));
        assert!(svg.contains(r#"transform="rotate(90.00,1,2)""#));
        assert!(svg.contains("font-size:12.8px"));
    }

    #[test]
    fn non_finite_arc_poisons_flush() {
        let mut backend = SvgBackend::new(10, 10);
        backend.arc_to(0, 0, f64::NAN, 1.0, 0.0, 1.0);
        assert!(backend.finish().is_err());
    }
}
