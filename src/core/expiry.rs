//! Expiry classification
//!
//! Maps a free-text expiry string to a status tier. Unparseable or empty
//! input yields [`ExpiryStatus::None`] rather than an error: an unreadable
//! date on a label is not a reason to refuse the product.
//!
//! Tier boundaries, with `days_left = date - today`:
//!
//! - `days_left <= 0`            -> `Expired`
//! - `1 ..= red_days`            -> `Red`
//! - `red_days+1 ..= yellow_days`-> `Yellow`
//! - beyond                      -> `Green`
//!
//! Boundary days fall in the nearer (more urgent) tier: the expiry day
//! itself is already `Expired`, day `red_days` is still `Red`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Date formats recognized in expiry text, tried in order.
///
/// The two-digit-year form must come before the four-digit one: `%Y`
/// happily parses "25" as year 0025, while `%y` rejects "2025" as trailing
/// input, so only this order disambiguates both.
pub const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%d/%m/%y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
];

/// Number of days remaining below which a product is `Red` / `Yellow`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpiryThresholds {
    pub red_days: i64,
    pub yellow_days: i64,
}

impl Default for ExpiryThresholds {
    fn default() -> Self {
        Self {
            red_days: 7,
            yellow_days: 30,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpiryStatus {
    /// No recognizable date; no visual marker
    None,
    Expired,
    Red,
    Yellow,
    Green,
}

impl fmt::Display for ExpiryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpiryStatus::None => write!(f, "none"),
            ExpiryStatus::Expired => write!(f, "expired"),
            ExpiryStatus::Red => write!(f, "red"),
            ExpiryStatus::Yellow => write!(f, "yellow"),
            ExpiryStatus::Green => write!(f, "green"),
        }
    }
}

/// Result of classifying an expiry string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub status: ExpiryStatus,
    /// The parsed date, when one was recognized
    pub date: Option<NaiveDate>,
}

/// Try to parse a date out of free-form expiry text
pub fn parse_expiry(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}

/// Classify expiry text against `today`
pub fn classify(text: &str, today: NaiveDate, thresholds: ExpiryThresholds) -> Classification {
    let Some(date) = parse_expiry(text) else {
        return Classification {
            status: ExpiryStatus::None,
            date: None,
        };
    };

    let days_left = (date - today).num_days();
    let status = if days_left <= 0 {
        ExpiryStatus::Expired
    } else if days_left <= thresholds.red_days {
        ExpiryStatus::Red
    } else if days_left <= thresholds.yellow_days {
        ExpiryStatus::Yellow
    } else {
        ExpiryStatus::Green
    };

    Classification {
        status,
        date: Some(date),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn status(text: &str, today: NaiveDate) -> ExpiryStatus {
        classify(text, today, ExpiryThresholds::default()).status
    }

    #[test]
    fn test_empty_and_garbage_are_none() {
        let today = day(2025, 6, 1);
        assert_eq!(status("", today), ExpiryStatus::None);
        assert_eq!(status("   ", today), ExpiryStatus::None);
        assert_eq!(status("soon-ish", today), ExpiryStatus::None);
        assert_eq!(status("13/13/2025", today), ExpiryStatus::None);
    }

    #[test]
    fn test_accepted_formats() {
        assert_eq!(parse_expiry("2025-03-01"), Some(day(2025, 3, 1)));
        assert_eq!(parse_expiry("01/03/2025"), Some(day(2025, 3, 1)));
        assert_eq!(parse_expiry("01-03-2025"), Some(day(2025, 3, 1)));
        assert_eq!(parse_expiry("01.03.2025"), Some(day(2025, 3, 1)));
        assert_eq!(parse_expiry("01/03/25"), Some(day(2025, 3, 1)));
        assert_eq!(parse_expiry(" 2025-03-01 "), Some(day(2025, 3, 1)));
    }

    #[test]
    fn test_expiry_day_is_expired() {
        let today = day(2025, 6, 1);
        assert_eq!(status("2025-06-01", today), ExpiryStatus::Expired);
        assert_eq!(status("2025-05-31", today), ExpiryStatus::Expired);
    }

    #[test]
    fn test_red_boundaries() {
        let today = day(2025, 6, 1);
        // day 1 and day 7 are both red, day 8 is not
        assert_eq!(status("2025-06-02", today), ExpiryStatus::Red);
        assert_eq!(status("2025-06-08", today), ExpiryStatus::Red);
        assert_eq!(status("2025-06-09", today), ExpiryStatus::Yellow);
    }

    #[test]
    fn test_yellow_boundaries() {
        let today = day(2025, 6, 1);
        // day 30 is yellow, day 31 is green
        assert_eq!(status("2025-07-01", today), ExpiryStatus::Yellow);
        assert_eq!(status("2025-07-02", today), ExpiryStatus::Green);
    }

    #[test]
    fn test_custom_thresholds() {
        let today = day(2025, 6, 1);
        let tight = ExpiryThresholds {
            red_days: 2,
            yellow_days: 5,
        };
        assert_eq!(classify("2025-06-03", today, tight).status, ExpiryStatus::Red);
        assert_eq!(classify("2025-06-04", today, tight).status, ExpiryStatus::Yellow);
        assert_eq!(classify("2025-06-07", today, tight).status, ExpiryStatus::Green);
    }

    #[test]
    fn test_classification_carries_parsed_date() {
        let today = day(2025, 6, 1);
        let c = classify("01/03/2026", today, ExpiryThresholds::default());
        assert_eq!(c.date, Some(day(2026, 3, 1)));
        assert_eq!(c.status, ExpiryStatus::Green);
    }
}
