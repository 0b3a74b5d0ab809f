//! Input validation shared by the ledger and the catalog services.
//!
//! Everything here runs before a database transaction is opened, so a rejected input never
//! leaves partial state behind.

use crate::{
    core::money::Money,
    errors::{Error, Result},
};
use chrono::NaiveDate;

/// Trims `value` and rejects it if nothing is left.
pub fn require_text(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

/// Parses an ISO-8601 calendar date in the zero-padded `YYYY-MM-DD` form.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    let trimmed = value.trim();
    if !is_padded_iso_date(trimmed) {
        return Err(Error::validation(format!(
            "'{trimmed}' is not a calendar date in YYYY-MM-DD form"
        )));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|e| Error::validation(format!("'{trimmed}' is not a valid calendar date: {e}")))
}

// chrono's %m and %d also accept a single digit
fn is_padded_iso_date(value: &str) -> bool {
    value.len() == 10
        && value.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Base rates are a price floor and may not be negative.
pub fn require_non_negative(field: &str, amount: Money) -> Result<Money> {
    if amount.is_negative() {
        return Err(Error::validation(format!(
            "{field} must not be negative, got {amount}"
        )));
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_require_text() {
        assert_eq!(require_text("reason", "  Peak season ").unwrap(), "Peak season");
        assert!(require_text("reason", "").unwrap_err().is_validation());
        assert!(require_text("reason", " \t\n").unwrap_err().is_validation());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-06-01").unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
        );
        assert!(parse_date("2024-02-30").unwrap_err().is_validation());
        assert!(parse_date("06/01/2024").unwrap_err().is_validation());
        assert!(parse_date("").unwrap_err().is_validation());
        assert!(parse_date("2024-6-1").unwrap_err().is_validation());
        assert!(parse_date("2024-06-1").unwrap_err().is_validation());
        assert!(parse_date("+2024-06-01").unwrap_err().is_validation());
        assert_eq!(
            parse_date(" 2024-12-31 ").unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()
        );
    }

    #[test]
    fn test_require_non_negative() {
        assert!(require_non_negative("base rate", Money::ZERO).is_ok());
        assert!(
            require_non_negative("base rate", Money::from_cents(-1))
                .unwrap_err()
                .is_validation()
        );
    }
}
