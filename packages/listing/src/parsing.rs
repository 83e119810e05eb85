//! Parsers for the loosely formatted columns of listing exports.

use chrono::NaiveDate;

/// Parses a numeric cell, accepting currency symbols and thousands
/// separators (`"$1,200.00"`).
#[must_use]
pub fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | '€' | '£' | ',' | ' '))
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses a decimal-degree coordinate, rejecting values outside
/// `-limit..=limit`.
///
/// Unlike [`parse_number`] nothing is stripped, so `"45,4408"` and
/// `"$45.44"` are rejected rather than read as other numbers.
#[must_use]
pub fn parse_coordinate(raw: &str, limit: f64) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && v.abs() <= limit)
}

/// Parses the bathroom count from free text such as `"1.5 baths"`,
/// `"2 shared baths"` or `"Half-bath"`.
#[must_use]
pub fn parse_bathrooms(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let leading: String = trimmed
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if let Ok(value) = leading.parse::<f64>() {
        return Some(value);
    }

    if trimmed.to_lowercase().contains("half-bath") {
        return Some(0.5);
    }

    None
}

/// Parses an ISO `YYYY-MM-DD` date.
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers() {
        assert_eq!(parse_number("120"), Some(120.0));
        assert_eq!(parse_number(" 85.5 "), Some(85.5));
        assert_eq!(parse_number("$1,200.00"), Some(1200.0));
        assert_eq!(parse_number("€95"), Some(95.0));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("n/a"), None);
        assert_eq!(parse_number("NaN"), None);
    }

    #[test]
    fn coordinates() {
        assert_eq!(parse_coordinate(" 45.4408 ", 90.0), Some(45.4408));
        assert_eq!(parse_coordinate("-12.5", 180.0), Some(-12.5));
        assert_eq!(parse_coordinate("45,4408", 90.0), None);
        assert_eq!(parse_coordinate("$45.44", 90.0), None);
        assert_eq!(parse_coordinate("91", 90.0), None);
        assert_eq!(parse_coordinate("inf", 180.0), None);
        assert_eq!(parse_coordinate("", 90.0), None);
    }

    #[test]
    fn bathrooms() {
        assert_eq!(parse_bathrooms("1 bath"), Some(1.0));
        assert_eq!(parse_bathrooms("1.5 baths"), Some(1.5));
        assert_eq!(parse_bathrooms("2 shared baths"), Some(2.0));
        assert_eq!(parse_bathrooms("Half-bath"), Some(0.5));
        assert_eq!(parse_bathrooms("Shared half-bath"), Some(0.5));
        assert_eq!(parse_bathrooms("3"), Some(3.0));
        assert_eq!(parse_bathrooms(""), None);
        assert_eq!(parse_bathrooms("unknown"), None);
    }

    #[test]
    fn dates() {
        assert_eq!(parse_date("2015-06-30"), NaiveDate::from_ymd_opt(2015, 6, 30));
        assert_eq!(parse_date("30/06/2015"), None);
        assert_eq!(parse_date(" "), None);
    }
}
