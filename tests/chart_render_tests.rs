use chartpaint::charts::{
    AxisOption, BarChartOption, FunnelChartOption, HeatMapOption, HorizontalBarChartOption,
    LegendOption, LineChartOption, RadarChartOption, RadarIndicator, ScatterChartOption,
    SeriesLabel, TableOption, TitleOption, funnel_layers, new_named_pie_series_list,
    new_radar_indicators, new_series_list,
};
use chartpaint::core::{Bounds, Color};
use chartpaint::render::TextAlign;
use chartpaint::{ChartKind, ChartOption, OutputFormat, Painter, PainterOptions, render_chart};

const WEEK: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

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

fn count_elements(svg: &str, tag: &str) -> usize {
    let document = roxmltree::Document::parse(svg).expect("well-formed svg");
    document
        .descendants()
        .filter(|node| node.tag_name().name() == tag)
        .count()
}

fn texts(svg: &str) -> Vec<String> {
    let document = roxmltree::Document::parse(svg).expect("well-formed svg");
    document
        .descendants()
        .filter(|node| node.tag_name().name() == "text")
        .filter_map(|node| node.text().map(str::to_owned))
        .collect()
}

fn weekly_series() -> Vec<Vec<f64>> {
    vec![
        vec![120.0, 132.0, 101.0, 134.0, 90.0, 230.0, 210.0],
        vec![220.0, 182.0, 191.0, 234.0, 290.0, 330.0, 310.0],
    ]
}

#[test]
fn line_chart_draws_a_dot_per_value() {
    let painter = painter();
    let option = LineChartOption::new(new_series_list(&weekly_series()))
        .with_x_axis(AxisOption::categories(&WEEK))
        .with_legend(hidden_legend())
        .with_title(TitleOption::new("Weekly"));
    render_chart(&painter, &ChartOption::Line(option)).expect("line renders");

    let svg = svg_text(&painter);
    assert_eq!(count_elements(&svg, "circle"), 14);
    let labels = texts(&svg);
    for day in WEEK {
        assert!(labels.iter().any(|text| text == day), "missing {day}");
    }
    assert!(labels.iter().any(|text| text == "Weekly"));
    assert!(svg.contains("stroke:rgb(84,112,198)"), "{svg}");
}

#[test]
fn line_chart_rejects_a_third_y_axis() {
    let painter = painter();
    let mut series = new_series_list(&weekly_series());
    series[1] = series[1].clone().with_y_axis_index(3);
    let option = LineChartOption::new(series).with_x_axis(AxisOption::categories(&WEEK));
    let error = render_chart(&painter, &ChartOption::Line(option)).expect_err("missing axis");
    assert!(error.to_string().contains("y_axis_index must be 0 or 1, got 3"), "{error}");
}

#[test]
fn bar_chart_labels_every_bar() {
    let painter = painter();
    let mut series = new_series_list(&weekly_series()[..1]);
    series[0].label = SeriesLabel::shown();
    let option = BarChartOption::new(series)
        .with_x_axis(AxisOption::categories(&WEEK))
        .with_legend(hidden_legend());
    painter
        .render(&ChartOption::Bar(option))
        .expect("bar renders");

    let labels = texts(&svg_text(&painter));
    for value in ["120", "132", "101", "134", "90", "230", "210"] {
        assert!(labels.iter().any(|text| text == value), "missing {value}");
    }
}

#[test]
fn horizontal_bars_use_the_vertical_categories() {
    let painter = painter();
    let option = HorizontalBarChartOption::new(new_series_list(&[vec![18203.0, 23489.0, 29034.0]]))
        .with_y_axis(AxisOption::categories(&["Brazil", "Indonesia", "USA"]))
        .with_legend(hidden_legend());
    painter
        .render(&ChartOption::HorizontalBar(option))
        .expect("horizontal bar renders");
    let labels = texts(&svg_text(&painter));
    for country in ["Brazil", "Indonesia", "USA"] {
        assert!(labels.iter().any(|text| text == country), "missing {country}");
    }
}

#[test]
fn scatter_marks_finite_values_only() {
    let painter = painter();
    let option = ScatterChartOption::new(new_series_list(&[vec![10.0, f64::NAN, 30.0, 25.0]]))
        .with_x_axis(AxisOption::categories(&["a", "b", "c", "d"]))
        .with_symbol_size(8.0);
    let option = ScatterChartOption {
        legend: hidden_legend(),
        ..option
    };
    painter
        .render(&ChartOption::Scatter(option))
        .expect("scatter renders");
    assert_eq!(count_elements(&svg_text(&painter), "circle"), 3);
}

#[test]
fn radar_needs_three_valid_indicators() {
    let painter = painter();
    let series = new_series_list(&[vec![4200.0, 3000.0]]);
    let option = RadarChartOption::new(
        series.clone(),
        new_radar_indicators(&["Sales", "Admin"], &[6500.0, 16000.0]),
    );
    let error = painter
        .render(&ChartOption::Radar(option))
        .expect_err("two indicators");
    assert!(error.to_string().contains("at least 3 indicators"));

    let option = RadarChartOption::new(
        series,
        vec![
            RadarIndicator::new("Sales", 6500.0),
            RadarIndicator::new("Admin", 16000.0),
            RadarIndicator::new("Tech", 10.0).with_min(10.0),
        ],
    );
    let error = painter
        .render(&ChartOption::Radar(option))
        .expect_err("flat indicator");
    assert!(error.to_string().contains("'Tech'"));
}

#[test]
fn radar_draws_the_web_and_the_names() {
    let painter = painter();
    let option = RadarChartOption::new(
        new_series_list(&[vec![4200.0, 3000.0, 20000.0, 35000.0, 50000.0]]),
        new_radar_indicators(
            &["Sales", "Admin", "Tech", "Support", "Dev"],
            &[6500.0, 16000.0, 30000.0, 38000.0, 52000.0],
        ),
    )
    .with_legend(hidden_legend());
    painter
        .render(&ChartOption::Radar(option))
        .expect("radar renders");
    let svg = svg_text(&painter);
    let labels = texts(&svg);
    for name in ["Sales", "Admin", "Tech", "Support", "Dev"] {
        assert!(labels.iter().any(|text| text == name), "missing {name}");
    }
    assert_eq!(count_elements(&svg, "circle"), 5);
}

#[test]
fn funnel_layers_shrink_from_the_largest() {
    let series = new_named_pie_series_list(&[60.0, 100.0, 80.0], &["View", "Show", "Click"]);
    let layers = funnel_layers(&series, 400, 302).expect("layers");
    assert_eq!(layers.len(), 3);
    assert_eq!(layers[0].series, 1);
    assert!((layers[0].percent - 1.0).abs() < 1e-12);
    assert!(layers.windows(2).all(|pair| pair[0].width >= pair[1].width));

    let painter = painter();
    let option = FunnelChartOption::new(series).with_legend(hidden_legend());
    painter
        .render(&ChartOption::Funnel(option))
        .expect("funnel renders");
    let labels = texts(&svg_text(&painter));
    assert!(labels.iter().any(|text| text == "Show(100%)"), "{labels:?}");
    assert!(labels.iter().any(|text| text == "View(60%)"), "{labels:?}");
}

#[test]
fn heat_map_spans_the_ramp() {
    let painter = painter();
    let option = HeatMapOption::new(new_series_list(&[vec![0.0, 5.0], vec![10.0, 2.5]]))
        .with_x_axis(AxisOption::categories(&["x0", "x1"]))
        .with_y_axis(AxisOption::categories(&["y0", "y1"]))
        .with_colors(Color::rgb(255, 255, 255), Color::rgb(200, 0, 0))
        .with_show_values(true);
    painter
        .render(&ChartOption::HeatMap(option))
        .expect("heat map renders");
    let svg = svg_text(&painter);
    assert!(svg.contains("fill:rgb(200,0,0)"), "{svg}");
    assert!(svg.contains("fill:rgb(228,128,128)"), "{svg}");
    let labels = texts(&svg);
    assert!(labels.iter().any(|text| text == "10"));
    assert!(labels.iter().any(|text| text == "2.5"));
}

#[test]
fn table_fills_the_painter_width() {
    let painter = painter();
    let option = TableOption::new(
        &["Name", "Age", "Address"],
        vec![
            vec!["John Brown".into(), "32".into(), "New York No. 1 Lake Park".into()],
            vec!["Jim Green".into(), "42".into(), "London No. 1 Lake Park".into()],
        ],
    )
    .with_spans(&[1, 1, 2])
    .with_text_aligns(&[TextAlign::Left, TextAlign::Right, TextAlign::Center]);
    let area = painter
        .render(&ChartOption::Table(option))
        .expect("table renders");
    assert_eq!(area.width(), 600);
    assert!(area.height() > 0);

    let svg = svg_text(&painter);
    assert_eq!(count_elements(&svg, "path"), 9);
    assert!(texts(&svg).iter().any(|text| text == "Jim Green"));
}

#[test]
fn every_kind_reports_itself() {
    let option = ChartOption::Table(TableOption::new(&["a"], Vec::new()));
    assert_eq!(option.kind(), ChartKind::Table);
    assert_eq!(ChartKind::HeatMap.to_string(), "heat_map");
    assert_eq!("hbar".parse::<ChartKind>().expect("alias"), ChartKind::HorizontalBar);
}

fn split_line_rows(svg: &str, color: &str) -> Vec<i32> {
    let document = roxmltree::Document::parse(svg).expect("well-formed svg");
    let stroke = format!("stroke:{color}");
    document
        .descendants()
        .filter(|node| node.tag_name().name() == "path")
        .filter(|node| node.attribute("style").is_some_and(|style| style.contains(&stroke)))
        .filter_map(|node| node.attribute("d"))
        .filter_map(|d| d.split_whitespace().nth(2)?.parse().ok())
        .collect()
}

#[test]
fn skipped_y_labels_keep_every_split_line() {
    let painter = painter();
    let option = LineChartOption::new(new_series_list(&[vec![
        120.0, 332.0, 601.0, 934.0, 1290.0, 1330.0, 1320.0,
    ]]))
    .with_padding(Bounds::uniform(10))
    .with_legend(hidden_legend())
    .with_x_axis(AxisOption::categories(&WEEK))
    .with_y_axis(AxisOption::default().with_label_count(8).with_label_skip(2));
    render_chart(&painter, &ChartOption::Line(option)).expect("line renders");
    let svg = svg_text(&painter);

    let rows = split_line_rows(&svg, "rgb(224,230,242)");
    assert_eq!(rows.len(), 7, "{svg}");
    assert_eq!(rows.iter().min(), Some(&10));
    assert_eq!(rows.iter().max(), Some(&310));

    let labels = texts(&svg);
    for shown in ["0", "200", "800", "1.4k"] {
        assert!(labels.iter().any(|text| text == shown), "missing {shown}: {labels:?}");
    }
    for skipped in ["400", "600", "1k", "1.2k"] {
        assert!(!labels.iter().any(|text| text == skipped), "{skipped} should be skipped");
    }
}
