// Utility functions
use crate::model::{NumberFormat, ParserError};
use chrono::{Datelike, NaiveDate, Weekday};

/// Parses a date with `primary` when the string contains `marker`, else with
/// `fallback`. If the chosen format fails, the other one is tried before giving up.
pub fn parse_date_either(
    date_str: &str,
    marker: char,
    primary: &str,
    fallback: &str,
) -> Result<NaiveDate, ParserError> {
    let trimmed = date_str.trim();
    let (first, second) = if trimmed.contains(marker) {
        (primary, fallback)
    } else {
        (fallback, primary)
    };
    NaiveDate::parse_from_str(trimmed, first)
        .or_else(|_| NaiveDate::parse_from_str(trimmed, second))
        .map_err(|_| ParserError::InvalidDate(trimmed.to_string()))
}

/// Parses a locale-formatted number. Blank input is an error; callers decide
/// whether that means "drop" or "missing".
pub fn parse_number(raw: &str, format: NumberFormat) -> Result<f64, ParserError> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{a0}')
        .collect();
    let normalized = match format {
        NumberFormat::Plain => cleaned.replace(',', ""),
        NumberFormat::DecimalComma => cleaned.replace('.', "").replace(',', "."),
    };
    normalized
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ParserError::InvalidNumber(raw.trim().to_string()))
}

/// Monday through Friday.
pub fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// `(iso_year, iso_week)` grouping key.
pub fn week_key(date: NaiveDate) -> (i32, u32) {
    let week = date.iso_week();
    (week.year(), week.week())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn decimal_comma_price() {
        assert_eq!(parse_number("1.234,56", NumberFormat::DecimalComma), Ok(1234.56));
    }

    #[test]
    fn plain_price_with_thousands() {
        assert_eq!(parse_number(" 1,234.5 ", NumberFormat::Plain), Ok(1234.5));
        assert_eq!(parse_number("83.12", NumberFormat::Plain), Ok(83.12));
    }

    #[test]
    fn rejects_garbage_and_blank() {
        assert!(parse_number("", NumberFormat::Plain).is_err());
        assert!(parse_number(".", NumberFormat::Plain).is_err());
        assert!(parse_number("n/a", NumberFormat::Plain).is_err());
        assert!(parse_number("inf", NumberFormat::Plain).is_err());
    }

    #[test]
    fn two_date_formats() {
        assert_eq!(parse_date_either("03/15/2024", '/', "%m/%d/%Y", "%d-%m-%Y"), Ok(d(2024, 3, 15)));
        assert_eq!(parse_date_either("15-03-2024", '/', "%m/%d/%Y", "%d-%m-%Y"), Ok(d(2024, 3, 15)));
        assert!(parse_date_either("2024.03.15", '/', "%m/%d/%Y", "%d-%m-%Y").is_err());
    }

    #[test]
    fn weekday_and_week_key() {
        assert!(is_weekday(d(2024, 1, 5)));
        assert!(!is_weekday(d(2024, 1, 6)));
        assert!(!is_weekday(d(2024, 1, 7)));
        // 2024-12-30 belongs to ISO week 1 of 2025
        assert_eq!(week_key(d(2024, 12, 30)), (2025, 1));
        assert_eq!(week_key(d(2024, 1, 1)), week_key(d(2024, 1, 5)));
    }
}
