use std::f64::consts::TAU;

use approx::assert_abs_diff_eq;
use chartpaint::charts::{
    CenterValues, DoughnutChartOption, LegendOption, PieChartOption, SectorOptions, Series,
    SeriesLabel, compute_sectors, new_named_pie_series_list, new_pie_series_list,
    render_doughnut_chart, render_pie_chart,
};
use chartpaint::core::{Color, Point, ValueFormatter};
use chartpaint::{OutputFormat, Painter, PainterOptions};

const VISITS: [f64; 5] = [1048.0, 735.0, 580.0, 484.0, 300.0];

fn painter() -> Painter {
    Painter::new(PainterOptions::new(OutputFormat::Svg, 600, 400)).expect("valid painter")
}

fn hidden_legend() -> LegendOption {
    LegendOption {
        show: Some(false),
        ..LegendOption::default()
    }
}

fn svg_text(painter: &Painter) -> String {
    String::from_utf8(painter.bytes().expect("svg bytes")).expect("utf-8 svg")
}

#[test]
fn pie_wedges_start_at_twelve_o_clock() {
    let painter = painter();
    let option = PieChartOption::new(new_named_pie_series_list(
        &VISITS,
        &["Search", "Direct", "Email", "Union Ads", "Video Ads"],
    ))
    .with_legend(hidden_legend());
    render_pie_chart(&painter, &option).expect("pie renders");

    let svg = svg_text(&painter);
    assert!(
        svg.contains("M 300 200 L 300 72 A 128 128 119.89 0 1 411 264 L 300 200 Z"),
        "{svg}"
    );
    assert_eq!(svg.matches("A 128 128").count(), VISITS.len());
    assert!(svg.contains("Search: 33.3%"), "{svg}");
}

#[test]
fn single_value_pie_is_a_full_circle() {
    let painter = painter();
    let option = PieChartOption::new(new_pie_series_list(&[42.0])).with_legend(hidden_legend());
    render_pie_chart(&painter, &option).expect("pie renders");
    let svg = svg_text(&painter);
    assert!(svg.contains(r#"<circle cx="300" cy="200" r="128""#), "{svg}");
    assert!(!svg.contains("A 128 128"));
}

#[test]
fn explicit_radius_overrides_the_default() {
    let painter = painter();
    let option = PieChartOption::new(new_pie_series_list(&[1.0, 1.0]))
        .with_legend(hidden_legend())
        .with_radius("100");
    render_pie_chart(&painter, &option).expect("pie renders");
    assert!(svg_text(&painter).contains("A 100 100 180.00 0 1"));
}

#[test]
fn pie_rejects_bad_values() {
    let painter = painter();
    let error = render_pie_chart(&painter, &PieChartOption::new(Vec::new())).expect_err("empty");
    assert!(error.to_string().contains("empty series list"));

    let error = render_pie_chart(&painter, &PieChartOption::new(new_pie_series_list(&[0.0, 0.0])))
        .expect_err("zero sum");
    assert!(error.to_string().contains("should be greater than 0"));

    let error = render_pie_chart(
        &painter,
        &PieChartOption::new(new_pie_series_list(&[3.0, -1.0, 2.0])),
    )
    .expect_err("negative");
    assert!(
        error
            .to_string()
            .contains("pie: unsupported negative value at series index 1")
    );
}

#[test]
fn sector_angles_cover_the_turn() {
    let colors = [Color::rgb(10, 20, 30), Color::rgb(40, 50, 60)];
    let label = SeriesLabel::default();
    let formatter = ValueFormatter::default();
    let sectors = compute_sectors(
        &new_pie_series_list(&VISITS),
        &SectorOptions {
            center: Point::new(280, 180),
            ring_radius: 144.0,
            diameter: 360.0,
            colors: &colors,
            label: &label,
            formatter: &formatter,
        },
    )
    .expect("sectors");

    let total: f64 = sectors.iter().map(|sector| sector.delta).sum();
    assert_abs_diff_eq!(total, TAU, epsilon = 1e-9);
    assert_abs_diff_eq!(sectors[0].start, -std::f64::consts::FRAC_PI_2, epsilon = 1e-12);
    for pair in sectors.windows(2) {
        assert_abs_diff_eq!(pair[0].start + pair[0].delta, pair[1].start, epsilon = 1e-9);
    }
    assert_eq!(sectors[0].quadrant, 1);
    let percent: f64 = sectors.iter().map(|sector| sector.percent).sum();
    assert_abs_diff_eq!(percent, 1.0, epsilon = 1e-12);
}

#[test]
fn series_label_template_wins_over_the_chart_label() {
    let painter = painter();
    let mut series = new_pie_series_list(&[1.0, 3.0]);
    series[1] = Series::new("Custom", &[3.0]).with_label(SeriesLabel::shown().with_template("{b} -> {c}"));
    let option = PieChartOption::new(series)
        .with_legend(hidden_legend())
        .with_label(SeriesLabel::shown().with_template("{d}"));
    render_pie_chart(&painter, &option).expect("pie renders");
    let svg = svg_text(&painter);
    assert!(svg.contains(">25%</text>"), "{svg}");
    assert!(svg.contains("Custom -&gt; 3"), "{svg}");
}

#[test]
fn doughnut_draws_the_hole_over_the_wedges() {
    let painter = painter();
    let option = DoughnutChartOption::new(new_pie_series_list(&VISITS)).with_legend(hidden_legend());
    render_doughnut_chart(&painter, &option).expect("doughnut renders");
    let svg = svg_text(&painter);
    let hole = svg
        .find(r#"<circle cx="300" cy="200" r="76""#)
        .unwrap_or_else(|| panic!("missing hole: {svg}"));
    let last_wedge = svg.rfind("A 128 128").expect("wedges");
    assert!(last_wedge < hole);
    assert!(svg[hole..].contains("fill:rgb(255,255,255)"));
}

#[test]
fn doughnut_center_sum_prints_the_total() {
    let painter = painter();
    let option = DoughnutChartOption::new(new_pie_series_list(&VISITS))
        .with_legend(hidden_legend())
        .with_center_values(CenterValues::Sum);
    render_doughnut_chart(&painter, &option).expect("doughnut renders");
    assert!(svg_text(&painter).contains(">3.15k</text>"));
}

#[test]
fn doughnut_center_labels_stay_inside_the_hole() {
    let painter = painter();
    let option = DoughnutChartOption::new(new_pie_series_list(&VISITS))
        .with_legend(hidden_legend())
        .with_center_radius("120")
        .with_center_values(CenterValues::Labels);
    render_doughnut_chart(&painter, &option).expect("doughnut renders");
    let svg = svg_text(&painter);
    assert!(svg.contains(r#"r="120""#), "{svg}");
    assert_eq!(svg.matches("</text>").count(), VISITS.len());
}

#[test]
fn doughnut_errors_name_the_doughnut() {
    let painter = painter();
    let error = render_doughnut_chart(
        &painter,
        &DoughnutChartOption::new(new_pie_series_list(&[0.0])),
    )
    .expect_err("zero sum");
    assert_eq!(
        error.to_string(),
        "invalid option: doughnut: sum value 0 should be greater than 0"
    );

    let error = render_doughnut_chart(
        &painter,
        &DoughnutChartOption::new(new_pie_series_list(&[1.0, 2.0]))
            .with_radius("8")
            .with_center_radius("20"),
    )
    .expect_err("ring too thin");
    assert!(error.to_string().contains("invalid geometry"));
}

#[test]
fn thin_ring_renders_with_the_default_hole() {
    let painter = painter();
    let option = DoughnutChartOption::new(new_pie_series_list(&[1.0, 2.0]))
        .with_legend(hidden_legend())
        .with_radius("9");
    render_doughnut_chart(&painter, &option).expect("default hole fits a thin ring");
    let svg = svg_text(&painter);
    assert!(svg.contains("A 9 9"), "{svg}");
    assert!(svg.contains(r#"<circle cx="300" cy="200" r="5""#), "{svg}");
}

#[test]
fn default_doughnut_leaves_room_for_legend_and_labels() {
    let painter = painter();
    let option = DoughnutChartOption::new(new_pie_series_list(&VISITS));
    render_doughnut_chart(&painter, &option).expect("doughnut renders");
    let svg = svg_text(&painter);

    assert!(
        svg.contains("M 300 226 L 300 119 A 107 107 119.89 0 1 393 279 L 300 226 Z"),
        "{svg}"
    );
    for (start, sweep, end) in [
        ("393 279", "84.08", "256 324"),
        ("256 324", "66.35", "193 225"),
        ("193 225", "55.37", "240 137"),
        ("240 137", "34.32", "300 119"),
    ] {
        let wedge = format!("M 300 226 L {start} A 107 107 {sweep} 0 1 {end} L 300 226 Z");
        assert!(svg.contains(&wedge), "missing {wedge}: {svg}");
    }
    assert!(svg.contains(r#"<circle cx="300" cy="226" r="64""#), "{svg}");

    let anchor = svg
        .find(r#"<text x="423" y="170""#)
        .unwrap_or_else(|| panic!("first label moved: {svg}"));
    let close = anchor + svg[anchor..].find("</text>").expect("closed text");
    assert!(svg[anchor..close].ends_with(">Series-A: 33.3%"), "{}", &svg[anchor..close]);
}

#[test]
fn closing_sector_avoids_the_opening_color() {
    let opening = Color::rgb(10, 20, 30);
    let second = Color::rgb(40, 50, 60);
    let colors = [opening, second, opening];
    let label = SeriesLabel::default();
    let formatter = ValueFormatter::default();
    let sectors = compute_sectors(
        &new_pie_series_list(&[1.0, 2.0, 3.0]),
        &SectorOptions {
            center: Point::new(280, 180),
            ring_radius: 100.0,
            diameter: 360.0,
            colors: &colors,
            label: &label,
            formatter: &formatter,
        },
    )
    .expect("sectors");
    let used: Vec<Color> = sectors.iter().map(|sector| sector.color).collect();
    assert_eq!(used, [opening, second, second]);
}
