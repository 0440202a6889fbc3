use std::f64::consts::TAU;

use chartpaint::charts::{
    SectorOptions, SeriesLabel, clamp_angle_to_sector, clamp_inside_circle, compute_sectors,
    is_inside_circle, new_pie_series_list, table_column_widths,
};
use chartpaint::core::{Bounds, Color, NiceScale, Point, ValueFormatter};
use chartpaint::{OutputFormat, Painter, PainterOptions};
use proptest::prelude::*;

fn angular_distance(a: f64, b: f64) -> f64 {
    let diff = (a - b).abs() % TAU;
    diff.min(TAU - diff)
}

proptest! {
    #[test]
    fn circle_clamp_is_idempotent(
        left in -300i32..300,
        top in -300i32..300,
        width in 1i32..160,
        height in 1i32..60,
        radius in 10.0f64..150.0
    ) {
        let bounds = Bounds::from_size(left, top, width, height);
        let once = clamp_inside_circle(bounds, 0, 0, radius);
        let twice = clamp_inside_circle(once, 0, 0, radius);
        prop_assert_eq!(once, twice);
        prop_assert_eq!(once.width(), width);
        prop_assert_eq!(once.height(), height);
    }

    #[test]
    fn fitting_boxes_end_inside_the_circle(
        left in -300i32..300,
        top in -300i32..300,
        width in 1i32..40,
        height in 1i32..20,
        radius in 40.0f64..150.0
    ) {
        let clamped = clamp_inside_circle(Bounds::from_size(left, top, width, height), 0, 0, radius);
        prop_assert!(is_inside_circle(clamped, 0, 0, radius));
        for corner in clamped.corners() {
            let distance = f64::from(corner.x).hypot(f64::from(corner.y));
            prop_assert!(distance <= radius + 1e-9);
        }
    }

    #[test]
    fn clamped_angle_lies_in_the_sector(
        angle in -10.0f64..10.0,
        start in -10.0f64..10.0,
        sweep in 0.01f64..6.0
    ) {
        let end = start + sweep;
        let clamped = clamp_angle_to_sector(angle, start, end);
        prop_assert!((0.0..TAU).contains(&clamped));
        let offset = (clamped - start).rem_euclid(TAU);
        prop_assert!(offset <= sweep + 1e-9 || angular_distance(clamped, start) < 1e-9);
        let again = clamp_angle_to_sector(clamped, start, end);
        prop_assert!(angular_distance(again, clamped) < 1e-9);
    }

    #[test]
    fn sectors_sum_to_the_full_turn(values in proptest::collection::vec(0.0f64..1_000.0, 1..24)) {
        prop_assume!(values.iter().sum::<f64>() > 0.0);
        let colors = [Color::rgb(1, 2, 3), Color::rgb(4, 5, 6)];
        let label = SeriesLabel::default();
        let formatter = ValueFormatter::default();
        let sectors = compute_sectors(
            &new_pie_series_list(&values),
            &SectorOptions {
                center: Point::new(0, 0),
                ring_radius: 100.0,
                diameter: 250.0,
                colors: &colors,
                label: &label,
                formatter: &formatter,
            },
        )
        .expect("sectors");
        let sweep: f64 = sectors.iter().map(|sector| sector.delta).sum();
        prop_assert!((sweep - TAU).abs() < 1e-9);
        for sector in &sectors {
            prop_assert!((1..=4).contains(&sector.quadrant));
        }
    }

    #[test]
    fn grid_columns_cover_the_width(width in 10i32..2_000, cols in 1i32..12) {
        prop_assume!(width >= cols);
        let painter = Painter::new(PainterOptions::new(OutputFormat::Svg, width, 100))
            .expect("painter");
        let mut layout = painter.layout_by_grid(cols, 1);
        for col in 0..cols {
            layout.cell_at(&format!("c{col}"), col, 0);
        }
        let cells = layout.build().expect("grid");
        let total: i32 = cells.values().map(Painter::width).sum();
        prop_assert_eq!(total, width);
    }

    #[test]
    fn table_widths_cover_the_table(
        width in 100i32..2_000,
        spans in proptest::collection::vec(1u32..5, 1..8)
    ) {
        let widths = table_column_widths(width, spans.len(), &spans, 0).expect("widths");
        prop_assert_eq!(widths.len(), spans.len());
        prop_assert_eq!(widths.iter().sum::<i32>(), width);
    }

    #[test]
    fn nice_scale_contains_the_data(
        low in -1.0e6f64..1.0e6,
        span in 1.0f64..1.0e6,
        labels in 2usize..12
    ) {
        let scale = NiceScale::new(low, low + span, labels).expect("scale");
        prop_assert!(scale.min() <= low + 1e-6);
        prop_assert!(scale.max() >= low + span - 1e-6);
        let ticks = scale.ticks();
        prop_assert_eq!(ticks.len(), scale.tick_count());
        prop_assert!(ticks.windows(2).all(|pair| pair[0] < pair[1]));
    }
}
