use chartpaint::charts::{
    DoughnutChartOption, SectorOptions, SeriesLabel, compute_sectors, new_pie_series_list,
    place_center_labels,
};
use chartpaint::core::{Color, NiceScale, Point, ValueFormatter};
use chartpaint::{ChartOption, OutputFormat, Painter, PainterOptions};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn bench_nice_scale(c: &mut Criterion) {
    c.bench_function("nice_scale_8_labels", |b| {
        b.iter(|| {
            let _ = NiceScale::new(black_box(120.0), black_box(1_330.0), black_box(8))
                .expect("valid scale");
        })
    });
}

fn bench_grid_layout(c: &mut Criterion) {
    let painter =
        Painter::new(PainterOptions::new(OutputFormat::Svg, 1_920, 1_080)).expect("painter");

    c.bench_function("grid_layout_12x8", |b| {
        b.iter(|| {
            let mut layout = painter.layout_by_grid(12, 8);
            for row in 0..8 {
                for col in 0..12 {
                    layout.cell_at(&format!("cell-{row}-{col}"), col, row);
                }
            }
            let _ = layout.build().expect("grid layout");
        })
    });
}

fn bench_center_labels_24(c: &mut Criterion) {
    let values: Vec<f64> = (1..=24).map(|i| f64::from(i * 37 % 101 + 5)).collect();
    let colors: Vec<Color> = (0..24u8).map(|i| Color::rgb(i * 10, 80, 160)).collect();
    let label = SeriesLabel::default();
    let formatter = ValueFormatter::default();
    let sectors = compute_sectors(
        &new_pie_series_list(&values),
        &SectorOptions {
            center: Point::new(500, 500),
            ring_radius: 400.0,
            diameter: 1_000.0,
            colors: &colors,
            label: &label,
            formatter: &formatter,
        },
    )
    .expect("valid sectors");
    let sizes: Vec<(i32, i32)> = sectors
        .iter()
        .map(|sector| (sector.label.len() as i32 * 7, 16))
        .collect();

    c.bench_function("center_labels_24", |b| {
        b.iter(|| {
            let _ = place_center_labels(
                black_box(&sectors),
                black_box(&sizes),
                500,
                500,
                black_box(320.0),
            );
        })
    });
}

fn bench_doughnut_svg(c: &mut Criterion) {
    let series = new_pie_series_list(&[1_048.0, 735.0, 580.0, 484.0, 300.0]);

    c.bench_function("doughnut_svg_600x400", |b| {
        b.iter(|| {
            let painter =
                Painter::new(PainterOptions::new(OutputFormat::Svg, 600, 400)).expect("painter");
            painter
                .render(&ChartOption::Doughnut(DoughnutChartOption::new(series.clone())))
                .expect("doughnut renders");
            let _ = painter.bytes().expect("svg bytes");
        })
    });
}

criterion_group!(
    benches,
    bench_nice_scale,
    bench_grid_layout,
    bench_center_labels_24,
    bench_doughnut_svg
);
criterion_main!(benches);
