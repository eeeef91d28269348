//! Parsing of raw form fields into calculator inputs.
//!
//! Front ends hold whatever the user has typed so far. These helpers turn
//! that text into a value or `None`, never an error.

use chrono::NaiveDate;

/// A finite number, or `None` for blank or non-numeric text
pub fn number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// A finite number greater than zero
pub fn positive(raw: &str) -> Option<f64> {
    number(raw).filter(|&v| is_positive(v))
}

/// Whether a numeric field is usable as a required input
pub fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// A calendar date in `YYYY-MM-DD` form
pub fn date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_accepts_trimmed_numbers() {
        assert_eq!(positive(" 500 "), Some(500.0));
        assert_eq!(positive("0.5"), Some(0.5));
    }

    #[test]
    fn test_positive_rejects_invalid_text() {
        assert_eq!(positive(""), None);
        assert_eq!(positive("abc"), None);
        assert_eq!(positive("12abc"), None);
        assert_eq!(positive("0"), None);
        assert_eq!(positive("-4"), None);
        assert_eq!(positive("NaN"), None);
        assert_eq!(positive("inf"), None);
    }

    #[test]
    fn test_number_allows_zero_and_negatives() {
        assert_eq!(number("0"), Some(0.0));
        assert_eq!(number("-2.5"), Some(-2.5));
    }

    #[test]
    fn test_date_parsing() {
        assert_eq!(date("2026-03-01"), NaiveDate::from_ymd_opt(2026, 3, 1));
        assert_eq!(date("01/03/2026"), None);
        assert_eq!(date("2026-02-30"), None);
    }
}
