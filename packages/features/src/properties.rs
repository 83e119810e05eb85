//! Lenient accessors for `GeoJSON` feature properties.
//!
//! Files in this pipeline come from several writers, so a numeric field
//! may arrive as a JSON number, a numeric string, an empty string, or
//! `null`. Missing and unparseable values are treated as absent.

use geojson::Feature;
use serde_json::Value;

/// Reads a property as `f64`.
#[must_use]
pub fn number(feature: &Feature, key: &str) -> Option<f64> {
    feature.property(key).and_then(value_as_f64)
}

/// Reads a property as `f64`, treating absent values as zero.
#[must_use]
pub fn number_or_zero(feature: &Feature, key: &str) -> f64 {
    number(feature, key).unwrap_or(0.0)
}

/// Reads a property as a trimmed, non-empty string.
#[must_use]
pub fn text<'a>(feature: &'a Feature, key: &str) -> Option<&'a str> {
    feature
        .property(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Interprets a JSON value as `f64`.
#[must_use]
pub fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .filter(|v: &f64| v.is_finite())
}

/// Removes ASCII control characters (other than tab, newline and
/// carriage return) from every string nested in `value`.
pub fn strip_control_chars(value: &mut Value) {
    match value {
        Value::String(s) => {
            if s.chars().any(is_stripped_control) {
                s.retain(|c| !is_stripped_control(c));
            }
        }
        Value::Array(items) => items.iter_mut().for_each(strip_control_chars),
        Value::Object(map) => map.values_mut().for_each(strip_control_chars),
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
}

const fn is_stripped_control(c: char) -> bool {
    matches!(c, '\u{0}'..='\u{8}' | '\u{b}' | '\u{c}' | '\u{e}'..='\u{1f}')
}
