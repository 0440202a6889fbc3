use crate::error::ChartResult;
use crate::render::{Backend, Font, FontStyle, Style};

/// Backend that draws nothing but counts what it was asked to draw.
///
/// Used for measurement passes and headless tests.
#[derive(Debug, Default)]
pub struct NullBackend {
    width: i32,
    height: i32,
    pending_segments: usize,
    pub path_count: usize,
    pub circle_count: usize,
    pub text_count: usize,
}

impl NullBackend {
    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    fn flush_path(&mut self) {
        if self.pending_segments > 0 {
            self.path_count += 1;
            self.pending_segments = 0;
        }
    }
}

impl Backend for NullBackend {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn move_to(&mut self, _x: i32, _y: i32) {
        self.pending_segments += 1;
    }

    fn line_to(&mut self, _x: i32, _y: i32) {
        self.pending_segments += 1;
    }

    fn quad_curve_to(&mut self, _cx: i32, _cy: i32, _x: i32, _y: i32) {
        self.pending_segments += 1;
    }

    fn arc_to(&mut self, _cx: i32, _cy: i32, _rx: f64, _ry: f64, _start: f64, _delta: f64) {
        self.pending_segments += 1;
    }

    fn close(&mut self) {}

    fn stroke(&mut self, _style: &Style) {
        self.flush_path();
    }

    fn fill(&mut self, _style: &Style) {
        self.flush_path();
    }

    fn fill_stroke(&mut self, _style: &Style) {
        self.flush_path();
    }

    fn circle(&mut self, _radius: f64, _cx: i32, _cy: i32, _style: &Style) {
        self.circle_count += 1;
    }

    fn text(&mut self, body: &str, _x: i32, _y: i32, _rotation: f64, _font: &Font, _style: &FontStyle) {
        if !body.is_empty() {
            self.text_count += 1;
        }
    }

    fn finish(&mut self) -> ChartResult<Vec<u8>> {
        Ok(Vec::new())
    }
}
