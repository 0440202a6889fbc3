use approx::assert_relative_eq;
use chartpaint::core::{
    CategoryScale, Color, NiceScale, SizeToken, ValueFormatter, format_label_template,
    format_percent, format_short, parse_flexible_value,
};

#[test]
fn flexible_values_resolve_against_the_total() {
    assert_relative_eq!(parse_flexible_value("50%", 200.0).expect("percent"), 100.0);
    assert_relative_eq!(parse_flexible_value("-10", 999.0).expect("pixels"), -10.0);
    assert_relative_eq!(parse_flexible_value(" 40% ", 269.0).expect("percent"), 107.6);
    assert!(parse_flexible_value("abc", 100.0).is_err());
    assert!(parse_flexible_value("NaN%", 100.0).is_err());
}

#[test]
fn size_tokens_cover_the_grammar() {
    assert!(SizeToken::parse("").expect("auto").is_auto());
    assert_eq!(SizeToken::parse("20").expect("pixels").resolve(400), Some(20));
    assert_eq!(SizeToken::parse("25%").expect("percent").resolve(400), Some(100));
    assert!(SizeToken::parse("center").is_ok());
    assert!(SizeToken::parse("middle-ish").is_err());
}

#[test]
fn nice_scale_rounds_outward() {
    let scale = NiceScale::new(120.0, 1330.0, 8).expect("scale");
    assert_relative_eq!(scale.min(), 0.0);
    assert_relative_eq!(scale.max(), 1400.0);
    assert_eq!(scale.tick_count(), 8);
    assert_relative_eq!(scale.step(), 200.0);
}

#[test]
fn nice_scale_honors_explicit_bounds() {
    let scale = NiceScale::with_bounds(3.0, 7.0, 5, Some(0.0), Some(10.0)).expect("scale");
    assert_eq!(scale.ticks(), vec![0.0, 2.5, 5.0, 7.5, 10.0]);
    assert!(NiceScale::with_bounds(0.0, 1.0, 5, Some(2.0), Some(1.0)).is_err());
    assert!(NiceScale::new(f64::NAN, 1.0, 5).is_err());
}

#[test]
fn vertical_mapping_puts_min_at_the_bottom() {
    let scale = NiceScale::new(0.0, 100.0, 5).expect("scale");
    assert_relative_eq!(scale.value_to_vertical_pixel(scale.min(), 10.0, 310.0), 310.0);
    assert_relative_eq!(scale.value_to_vertical_pixel(scale.max(), 10.0, 310.0), 10.0);
}

#[test]
fn category_positions_depend_on_boundary_gap() {
    let gap = CategoryScale::new(4, true);
    assert_relative_eq!(gap.position(0, 400.0), 50.0);
    let edge = CategoryScale::new(5, false);
    assert_relative_eq!(edge.position(0, 400.0), 0.0);
    assert_relative_eq!(edge.position(4, 400.0), 400.0);
}

#[test]
fn short_format_uses_thousand_suffixes() {
    assert_eq!(format_short(1400.0, 2), "1.4k");
    assert_eq!(format_short(2_500_000.0, 2), "2.5M");
    assert_eq!(format_short(800.0, 2), "800");
    assert_eq!(format_percent(1048.0 / 3147.0), "33.3%");
}

#[test]
fn label_templates_expand_placeholders() {
    let formatter = ValueFormatter::new(|value| format!("{value:.0} units"));
    let text = format_label_template("{b} = {c} ({d})", "cpu", 42.0, Some(0.5), &formatter);
    assert_eq!(text, "cpu = 42 units (50%)");
    let default = format_label_template("", "Series-A", 1.0, Some(0.25), &ValueFormatter::default());
    assert_eq!(default, "Series-A: 25%");
}

#[test]
fn colors_parse_css_forms() {
    assert_eq!(Color::parse("#fff").expect("short hex"), Color::WHITE);
    assert_eq!(Color::parse("#ff000080").expect("hex alpha"), Color::rgba(255, 0, 0, 128));
    assert_eq!(Color::parse("rgb(1, 2, 3)").expect("rgb"), Color::rgb(1, 2, 3));
    assert!(Color::parse("#12").is_err());
    assert!(Color::default().is_zero());
    assert_eq!(Color::BLACK.mix(Color::WHITE, 0.5), Color::rgb(128, 128, 128));
}
