/// Parse display text as a number.
///
/// Never fails: text that is not a decimal numeral reads as `0.0`. The state
/// machine is the only writer of display text, so this fallback is only hit for
/// transient values like a lone `"-"`.
pub fn parse_number(text: &str) -> f64 {
    text.trim().parse::<f64>().unwrap_or(0.0)
}

/// Format a number for the display.
///
/// Uses the shortest representation that round-trips (`10`, not `10.0`;
/// `0.30000000000000004` for `0.1 + 0.2`). Negative zero is shown as `0`.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value.is_sign_positive() {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        };
    }
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{value}")
}
