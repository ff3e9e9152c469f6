/// Format a value with its unit, switching to a "k" prefix above 999
///
/// `format_value(2000.0, "Hz")` gives `"2kHz"`, `format_value(-6.5, "dB")`
/// gives `"-6.5dB"`. Values are rounded to two decimals.
pub fn format_value(value: f32, unit: &str) -> String {
    let (scaled, prefix) = if value.abs() > 999.0 {
        (value / 1000.0, "k")
    } else {
        (value, "")
    };
    let rounded = (scaled * 100.0).round() / 100.0;
    // Avoid "-0"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{}{}{}", rounded, prefix, unit)
}
