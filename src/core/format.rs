use std::fmt;
use std::sync::Arc;

/// Caller-supplied number formatter shared by axes, labels and center text.
#[derive(Clone)]
pub struct ValueFormatter(Arc<dyn Fn(f64) -> String + Send + Sync>);

impl ValueFormatter {
    pub fn new(formatter: impl Fn(f64) -> String + Send + Sync + 'static) -> Self {
        Self(Arc::new(formatter))
    }

    #[must_use]
    pub fn format(&self, value: f64) -> String {
        (self.0)(value)
    }
}

impl Default for ValueFormatter {
    fn default() -> Self {
        Self::new(|value| format_short(value, 2))
    }
}

impl fmt::Debug for ValueFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ValueFormatter(..)")
    }
}

const SHORT_SUFFIXES: [(f64, &str); 4] = [
    (1e12, "T"),
    (1e9, "G"),
    (1e6, "M"),
    (1e3, "k"),
];

/// Humanized number: `1400 -> "1.4k"`, `2_500_000 -> "2.5M"`, `0.126 -> "0.13"`.
#[must_use]
pub fn format_short(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return "NaN".to_owned();
    }
    let magnitude = value.abs();
    for (scale, suffix) in SHORT_SUFFIXES {
        if magnitude >= scale {
            return format!("{}{suffix}", format_decimal(value / scale, decimals));
        }
    }
    format_decimal(value, decimals)
}

/// Fixed decimals with trailing zeros (and a dangling point) removed.
#[must_use]
pub fn format_decimal(value: f64, decimals: usize) -> String {
    let text = format!("{value:.decimals$}");
    let text = if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_owned()
    } else {
        text
    };
    if text == "-0" { "0".to_owned() } else { text }
}

/// `0.333 -> "33.3%"`, two decimals at most.
#[must_use]
pub fn format_percent(ratio: f64) -> String {
    format!("{}%", format_decimal(ratio * 100.0, 2))
}

/// Expands a label template: `{b}` name, `{c}` value, `{d}` percent.
///
/// An empty template yields the default `"{b}: {d}"` form.
#[must_use]
pub fn format_label_template(
    template: &str,
    name: &str,
    value: f64,
    percent: Option<f64>,
    formatter: &ValueFormatter,
) -> String {
    let template = if template.is_empty() { "{b}: {d}" } else { template };
    let percent_text = percent.map(format_percent).unwrap_or_default();
    template
        .replace("{b}", name)
        .replace("{c}", &formatter.format(value))
        .replace("{d}", &percent_text)
}

#[cfg(test)]
mod tests {
    use super::{ValueFormatter, format_decimal, format_label_template, format_percent, format_short};

    #[test]
    fn short_format_uses_thousand_suffixes() {
        assert_eq!(format_short(1400.0, 2), "1.4k");
        assert_eq!(format_short(800.0, 2), "800");
        assert_eq!(format_short(0.0, 2), "0");
        assert_eq!(format_short(2_500_000.0, 2), "2.5M");
        assert_eq!(format_short(-1_200.0, 2), "-1.2k");
        assert_eq!(format_short(3.0e12, 2), "3T");
        assert_eq!(format_short(0.126, 2), "0.13");
    }

    #[test]
    fn decimals_are_trimmed() {
        assert_eq!(format_decimal(12.50, 2), "12.5");
        assert_eq!(format_decimal(12.0, 2), "12");
        assert_eq!(format_decimal(-0.001, 2), "0");
    }

    #[test]
    fn percent_and_template() {
        assert_eq!(format_percent(1048.0 / 3147.0), "33.3%");
        let formatter = ValueFormatter::default();
        assert_eq!(
            format_label_template("", "Search", 1048.0, Some(0.5), &formatter),
            "Search: 50%"
        );
        assert_eq!(
            format_label_template("{b} ({c})", "Search", 1048.0, None, &formatter),
            "Search (1.05k)"
        );
    }
}
