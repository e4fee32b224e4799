//! Lenient numeric input parsing
//!
//! Text fields are read the way a browser reads a number out of an input:
//! leading whitespace is skipped, the longest numeric prefix is taken and
//! anything after it is ignored. `"12.5 m"` reads as `12.5`, `"abc"` does not parse.

use once_cell::sync::Lazy;
use regex::Regex;

static NUMERIC_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([+-]?(?:Infinity|(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?))")
        .expect("numeric prefix pattern is valid")
});

/// Return the numeric prefix of `input`, if any.
pub fn numeric_prefix(input: &str) -> Option<&str> {
    NUMERIC_PREFIX
        .captures(input)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Parse the numeric prefix of `input` as a float.
pub fn parse_float(input: &str) -> Option<f64> {
    let prefix = numeric_prefix(input)?;
    let value = prefix.parse::<f64>().ok()?;
    if value.is_nan() {
        return None;
    }
    Some(value)
}

/// Round half-up to `places` decimal places.
///
/// Ties go toward positive infinity for negative values too, so `-2.5` at
/// zero places becomes `-2`.
pub fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale + 0.5).floor() / scale
}
