use std::f64::consts::{FRAC_PI_2, PI, TAU};

use approx::assert_abs_diff_eq;
use chartpaint::charts::{
    Sector, SectorOptions, SeriesLabel, clamp_angle_to_sector, clamp_inside_circle,
    compute_sectors, is_inside_circle, new_named_pie_series_list, place_center_labels,
};
use chartpaint::core::{Bounds, Color, Point, ValueFormatter};
use chartpaint::render::FontStyle;
use chartpaint::{OutputFormat, Painter, PainterOptions};

const POPULATION: [f64; 10] = [
    9_104_772.0,
    11_754_004.0,
    10_827_529.0,
    10_394_055.0,
    9_597_085.0,
    17_947_406.0,
    36_753_736.0,
    10_467_366.0,
    19_051_562.0,
    10_521_556.0,
];

const COUNTRIES: [&str; 10] = [
    "Belgium", "Czechia", "Portugal", "Hungary", "Austria", "Netherlands", "Greece", "Sweden",
    "Romania", "Switzerland",
];

#[test]
fn wrapped_sector_snaps_to_the_closer_edge() {
    assert_abs_diff_eq!(clamp_angle_to_sector(PI, 3.0 * FRAC_PI_2, FRAC_PI_2), 3.0 * FRAC_PI_2);
    assert_abs_diff_eq!(clamp_angle_to_sector(0.1, 3.0 * FRAC_PI_2, FRAC_PI_2), 0.1);
    assert_abs_diff_eq!(clamp_angle_to_sector(1.7, 0.0, 1.5), 1.5, epsilon = 1e-12);
    assert_abs_diff_eq!(clamp_angle_to_sector(5.0, 0.0, TAU), 5.0, epsilon = 1e-12);
}

#[test]
fn clamped_box_fits_the_circle() {
    let outside = Bounds::from_size(180, 90, 40, 12);
    let clamped = clamp_inside_circle(outside, 100, 100, 60.0);
    assert!(is_inside_circle(clamped, 100, 100, 60.0));
    assert_eq!(clamped.width(), 40);
    assert_eq!(clamped.height(), 12);
    assert_eq!(clamp_inside_circle(clamped, 100, 100, 60.0), clamped);
}

fn population_sectors(center: Point) -> Vec<Sector> {
    let colors: Vec<Color> = (0..10u8).map(|index| Color::rgb(index * 20, 50, 90)).collect();
    let label = SeriesLabel::default();
    let formatter = ValueFormatter::default();
    compute_sectors(
        &new_named_pie_series_list(&POPULATION, &COUNTRIES),
        &SectorOptions {
            center,
            ring_radius: 160.0,
            diameter: 400.0,
            colors: &colors,
            label: &label,
            formatter: &formatter,
        },
    )
    .expect("sectors")
}

fn measured_sizes(sectors: &[Sector]) -> Vec<(i32, i32)> {
    let painter = Painter::new(PainterOptions::new(OutputFormat::Svg, 600, 400)).expect("valid painter");
    sectors
        .iter()
        .map(|sector| {
            let size = painter.measure_text(&sector.label, 0.0, &FontStyle::default());
            (size.width(), size.height())
        })
        .collect()
}

#[test]
fn ten_center_labels_stay_inside_the_hole() {
    let center = Point::new(300, 200);
    let sectors = population_sectors(center);
    assert_eq!(sectors[6].label, "Greece: 25.1%");
    let sizes = measured_sizes(&sectors);

    for inner_radius in [96.0, 120.0] {
        let placements = place_center_labels(&sectors, &sizes, center.x, center.y, inner_radius);
        assert_eq!(placements.len(), sectors.len());
        for placement in &placements {
            assert!(
                is_inside_circle(placement.bounds, center.x, center.y, inner_radius),
                "{} escapes at {:?}",
                sectors[placement.sector].label,
                placement.bounds
            );
            let (width, height) = sizes[placement.sector];
            assert_eq!(placement.bounds.width(), width);
            assert_eq!(placement.bounds.height(), height);
        }
        for (i, first) in placements.iter().enumerate() {
            for second in &placements[i + 1..] {
                assert!(
                    !first.bounds.overlaps(second.bounds),
                    "r={inner_radius}: {} overlaps {}",
                    sectors[first.sector].label,
                    sectors[second.sector].label
                );
            }
        }
        let mut seen: Vec<usize> = placements.iter().map(|placement| placement.sector).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..10).collect::<Vec<_>>());
    }
}

#[test]
fn largest_center_label_keeps_its_anchor() {
    let center = Point::new(300, 200);
    let sectors = population_sectors(center);
    let sizes = measured_sizes(&sectors);
    let greece = &sectors[6];
    let (width, height) = sizes[6];

    for inner_radius in [96.0, 120.0] {
        // Left half: the box hangs off the anchor point to the left.
        let anchor = 0.8 * inner_radius;
        let (sin, cos) = greece.mid_angle.sin_cos();
        assert!(cos < 0.0);
        let ax = f64::from(center.x) + anchor * cos;
        let ay = f64::from(center.y) + anchor * sin;
        let at_anchor = Bounds::from_size(
            (ax - f64::from(width)).round() as i32,
            (ay - f64::from(height) / 2.0).round() as i32,
            width,
            height,
        );
        let expected = clamp_inside_circle(at_anchor, center.x, center.y, inner_radius);

        let placements = place_center_labels(&sectors, &sizes, center.x, center.y, inner_radius);
        let placed = placements
            .iter()
            .find(|placement| placement.sector == 6)
            .expect("greece placed");
        assert_eq!(placed.bounds, expected, "r={inner_radius}");
    }
}

#[test]
fn hidden_labels_are_not_placed() {
    let colors = [Color::rgb(1, 1, 1), Color::rgb(2, 2, 2)];
    let label = SeriesLabel {
        show: Some(false),
        ..SeriesLabel::default()
    };
    let formatter = ValueFormatter::default();
    let sectors = compute_sectors(
        &new_named_pie_series_list(&[1.0, 2.0], &["a", "b"]),
        &SectorOptions {
            center: Point::new(0, 0),
            ring_radius: 100.0,
            diameter: 200.0,
            colors: &colors,
            label: &label,
            formatter: &formatter,
        },
    )
    .expect("sectors");
    assert!(place_center_labels(&sectors, &[(10, 10), (10, 10)], 0, 0, 60.0).is_empty());
}
