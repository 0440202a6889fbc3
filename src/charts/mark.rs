use crate::charts::series::{MarkKind, Series};
use crate::core::{Color, NiceScale, Point, ValueFormatter};
use crate::render::{FontStyle, Painter, Style};

const DEFAULT_PIN_SIZE: i32 = 28;
const MARK_LINE_DASH: [f64; 2] = [4.0, 2.0];
const MARK_LABEL_GAP: i32 = 4;

/// Pins above the max/min datum of `series`; `points` holds the plotted
/// position of every datum.
pub(crate) fn render_mark_points(
    plot: &Painter,
    series: &Series,
    color: Color,
    points: &[Option<Point>],
    formatter: &ValueFormatter,
) {
    let size = if series.mark_point.symbol_size > 0 {
        series.mark_point.symbol_size
    } else {
        DEFAULT_PIN_SIZE
    };
    let pin = plot.with_drawing_style(&Style::stroke(1.0, color).with_fill_color(color));
    let font_style = FontStyle::new(0.0, plot.theme().mark_text_color());
    for kind in &series.mark_point.data {
        if *kind == MarkKind::Average {
            continue;
        }
        let Some((index, value)) = series.mark_value(*kind) else {
            continue;
        };
        let Some(Some(point)) = points.get(index) else {
            continue;
        };
        let center_y = point.y - size / 2;
        pin.pin(point.x, center_y, size);

        let text = formatter.format(value);
        let text_box = plot.measure_text(&text, 0.0, &font_style);
        let ascent = plot.text_metrics(&text, &font_style).ascent.round() as i32;
        let bubble_center = center_y - size / 4;
        plot.text(
            &text,
            point.x - text_box.width() / 2,
            bubble_center - text_box.height() / 2 + ascent,
            0.0,
            &font_style,
        );
    }
}

/// Dashed horizontal reference lines with the value at the arrow end.
pub(crate) fn render_mark_lines(
    plot: &Painter,
    series: &Series,
    color: Color,
    scale: &NiceScale,
    formatter: &ValueFormatter,
) {
    let line = plot.with_drawing_style(
        &Style::stroke(1.0, color)
            .with_fill_color(color)
            .with_dash(&MARK_LINE_DASH),
    );
    let font_style = FontStyle::new(0.0, plot.theme().label_text_color());
    for kind in &series.mark_line.data {
        let Some((_, value)) = series.mark_value(*kind) else {
            continue;
        };
        let y = scale
            .value_to_vertical_pixel(value, 0.0, f64::from(plot.height()))
            .round() as i32;
        let text = formatter.format(value);
        let text_box = plot.measure_text(&text, 0.0, &font_style);
        let width = plot.width() - text_box.width() - MARK_LABEL_GAP;
        line.mark_line(0, y, width);
        let ascent = plot.text_metrics(&text, &font_style).ascent.round() as i32;
        plot.text(
            &text,
            width + MARK_LABEL_GAP,
            y - text_box.height() / 2 + ascent,
            0.0,
            &font_style,
        );
    }
}
