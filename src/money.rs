// Money and month-stamp utilities.
//
// Monetary amounts are plain f64 values; the only shared rule is that a
// transactable amount must be strictly positive. Dates attached to cards,
// deposits and capitalization are month-granular and stored on the wire in
// the compact `MMYY` form.

use chrono::{Datelike, Local, NaiveDate};

use crate::error::{BankError, Result};

/// An amount is transactable (deposit, withdrawal, payment) iff it is
/// strictly greater than zero.
pub fn is_valid_amount(amount: f64) -> bool {
    amount > 0.0
}

/// Current local date, used by the convenience wrappers that do not take an
/// explicit `today`.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

// ============================================================================
// MONTH STAMP
// ============================================================================

/// A month-granular date as stored on the wire (`MMYY`, 2000-based year).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthStamp {
    pub month: u32,
    pub year: i32,
}

impl MonthStamp {
    /// Parse the stored 4-character `MMYY` form.
    ///
    /// Returns `None` for anything malformed; callers that gate behavior on
    /// a stored stamp (card validity, capitalization due-ness) fail closed
    /// on `None` rather than erroring.
    pub fn parse(stored: &str) -> Option<MonthStamp> {
        if stored.len() != 4 || !stored.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let month: u32 = stored[..2].parse().ok()?;
        let year: i32 = stored[2..].parse::<i32>().ok()? + 2000;
        if !(1..=12).contains(&month) {
            return None;
        }
        Some(MonthStamp { month, year })
    }

    /// Normalize user input into a stamp. Accepts the stored `MMYY` form or
    /// the display-style `MM/YYYY`; any other shape is a format error.
    pub fn normalize(input: &str) -> Result<MonthStamp> {
        let bad = || BankError::BadDateFormat(input.to_string());
        if !input.is_ascii() {
            return Err(bad());
        }
        match input.len() {
            4 => MonthStamp::parse(input).ok_or_else(bad),
            7 => {
                if input.as_bytes()[2] != b'/' {
                    return Err(bad());
                }
                let month: u32 = input[..2].parse().map_err(|_| bad())?;
                let year: i32 = input[3..].parse().map_err(|_| bad())?;
                // Only 20xx years survive the round trip back to MMYY.
                if !(1..=12).contains(&month) || !(2000..=2099).contains(&year) {
                    return Err(bad());
                }
                Ok(MonthStamp { month, year })
            }
            _ => Err(bad()),
        }
    }

    /// Stamp of the given calendar date.
    pub fn of(date: NaiveDate) -> MonthStamp {
        MonthStamp {
            month: date.month(),
            year: date.year(),
        }
    }

    /// Wire form, always `MMYY`.
    pub fn encode(&self) -> String {
        format!("{:02}{:02}", self.month, self.year - 2000)
    }

    /// True iff this month is the month of `today` or later.
    pub fn is_current_or_future_at(&self, today: NaiveDate) -> bool {
        self.year > today.year() || (self.year == today.year() && self.month >= today.month())
    }

    /// True iff this month is strictly earlier than the month of `today`.
    pub fn is_before(&self, today: NaiveDate) -> bool {
        !self.is_current_or_future_at(today)
    }
}

impl std::fmt::Display for MonthStamp {
    /// Display form expands the stored year: `MM/20YY`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}/{}", self.month, self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 15).unwrap()
    }

    #[test]
    fn test_amount_validation() {
        assert!(is_valid_amount(0.01));
        assert!(is_valid_amount(100.0));
        assert!(!is_valid_amount(0.0));
        assert!(!is_valid_amount(-5.0));
    }

    #[test]
    fn test_parse_stored_form() {
        let stamp = MonthStamp::parse("0127").unwrap();
        assert_eq!(stamp.month, 1);
        assert_eq!(stamp.year, 2027);
        assert_eq!(stamp.encode(), "0127");
    }

    #[test]
    fn test_parse_fails_closed() {
        assert!(MonthStamp::parse("").is_none());
        assert!(MonthStamp::parse("127").is_none());
        assert!(MonthStamp::parse("01/27").is_none());
        assert!(MonthStamp::parse("1327").is_none());
        assert!(MonthStamp::parse("ab27").is_none());
    }

    #[test]
    fn test_normalize_both_encodings() {
        let short = MonthStamp::normalize("0525").unwrap();
        let long = MonthStamp::normalize("05/2025").unwrap();
        assert_eq!(short, long);
        assert_eq!(short.encode(), "0525");
    }

    #[test]
    fn test_normalize_rejects_other_shapes() {
        for input in ["", "5/25", "05-2025", "052025", "13/2025", "05/1999", "ąb/2025"] {
            assert!(
                matches!(MonthStamp::normalize(input), Err(BankError::BadDateFormat(_))),
                "accepted {input:?}"
            );
        }
    }

    #[test]
    fn test_display_expansion() {
        assert_eq!(MonthStamp::parse("0127").unwrap().to_string(), "01/2027");
        assert_eq!(MonthStamp::parse("1209").unwrap().to_string(), "12/2009");
    }

    #[test]
    fn test_current_or_future() {
        let now = date(2024, 6);
        assert!(MonthStamp::parse("0127").unwrap().is_current_or_future_at(now));
        assert!(MonthStamp::parse("0624").unwrap().is_current_or_future_at(now));
        assert!(!MonthStamp::parse("0120").unwrap().is_current_or_future_at(now));
        assert!(!MonthStamp::parse("0524").unwrap().is_current_or_future_at(now));
    }

    #[test]
    fn test_is_before() {
        let now = date(2024, 6);
        assert!(MonthStamp::parse("0524").unwrap().is_before(now));
        assert!(!MonthStamp::parse("0624").unwrap().is_before(now));
    }
}
