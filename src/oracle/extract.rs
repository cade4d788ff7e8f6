//! Numeric extraction from free-form oracle answers.
//!
//! Answers come back as short text like `"42"`, `"x = 5"` or `"1 500,25 Kč"`.
//! The first number in the text is pulled out so the calculator can show it.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Optional minus, a digit, then digits or whitespace (digit grouping),
    /// then an optional `.`/`,` fraction.
    static ref NUMBER_SPAN: Regex = Regex::new(r"-?[0-9][0-9\s]*(?:[.,][0-9]+)?").unwrap();
}

/// Find the first number in `answer`.
///
/// Whitespace inside the match is dropped and a decimal comma becomes a
/// point. Returns `None` when there is no number.
pub fn extract_number(answer: &str) -> Option<f64> {
    let span = NUMBER_SPAN.find(answer)?;
    let normalized: String = span
        .as_str()
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    normalized.parse::<f64>().ok()
}
