use tracing::debug;

use crate::error::{ChartError, ChartResult};
use crate::render::{
    Backend, BUILTIN_FONT_NAME, Font, FontStyle, Style, SvgBackend, get_default_font,
    installed_fonts,
};

/// Raster backend: records the SVG stream and rasterizes it at flush time,
/// so both formats share the exact same geometry.
#[derive(Debug)]
pub struct PngBackend {
    svg: SvgBackend,
}

impl PngBackend {
    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            svg: SvgBackend::new(width, height),
        }
    }

    fn rasterize(&self, document: &str) -> ChartResult<Vec<u8>> {
        let width = u32::try_from(self.svg.width())
            .map_err(|_| ChartError::backend("png width must be positive"))?;
        let height = u32::try_from(self.svg.height())
            .map_err(|_| ChartError::backend("png height must be positive"))?;

        let mut opt = usvg::Options::default();
        let fonts = installed_fonts();
        let mut missing_family = false;
        for family in self.svg.font_families() {
            let installed = fonts
                .iter()
                .filter(|font| font.family() == family.as_str())
                .find_map(Font::ttf_bytes);
            match installed {
                Some(bytes) => opt.fontdb_mut().load_font_data(bytes.to_vec()),
                None => missing_family = true,
            }
        }
        if missing_family {
            opt.fontdb_mut().load_system_fonts();
        }
        let default_font = get_default_font();
        if default_font.name() != BUILTIN_FONT_NAME {
            opt.font_family = default_font.family().to_owned();
        }

        let tree = usvg::Tree::from_str(document, &opt)
            .map_err(|err| ChartError::backend(format!("svg parse failed: {err}")))?;
        let mut pixmap = tiny_skia::Pixmap::new(width, height)
            .ok_or_else(|| ChartError::backend(format!("cannot allocate {width}x{height} pixmap")))?;
        resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());
        let png = pixmap
            .encode_png()
            .map_err(|err| ChartError::backend(format!("png encoding failed: {err}")))?;
        debug!(width, height, bytes = png.len(), "png rasterized");
        Ok(png)
    }
}

impl Backend for PngBackend {
    fn width(&self) -> i32 {
        self.svg.width()
    }

    fn height(&self) -> i32 {
        self.svg.height()
    }

    fn move_to(&mut self, x: i32, y: i32) {
        self.svg.move_to(x, y);
    }

    fn line_to(&mut self, x: i32, y: i32) {
        self.svg.line_to(x, y);
    }

    fn quad_curve_to(&mut self, cx: i32, cy: i32, x: i32, y: i32) {
        self.svg.quad_curve_to(cx, cy, x, y);
    }

    fn arc_to(&mut self, cx: i32, cy: i32, rx: f64, ry: f64, start: f64, delta: f64) {
        self.svg.arc_to(cx, cy, rx, ry, start, delta);
    }

    fn close(&mut self) {
        self.svg.close();
    }

    fn stroke(&mut self, style: &Style) {
        self.svg.stroke(style);
    }

    fn fill(&mut self, style: &Style) {
        self.svg.fill(style);
    }

    fn fill_stroke(&mut self, style: &Style) {
        self.svg.fill_stroke(style);
    }

    fn circle(&mut self, radius: f64, cx: i32, cy: i32, style: &Style) {
        self.svg.circle(radius, cx, cy, style);
    }

    fn text(&mut self, body: &str, x: i32, y: i32, rotation: f64, font: &Font, style: &FontStyle) {
        self.svg.text(body, x, y, rotation, font, style);
    }

    fn finish(&mut self) -> ChartResult<Vec<u8>> {
        let document = self.svg.document()?;
        self.rasterize(&document)
    }
}
