use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::BTreeSet;

// Indonesian public holidays 2025, as (year, month, day).
const INDONESIA_2025: [(i32, u32, u32); 18] = [
    (2025, 1, 1),   // New Year's Day
    (2025, 1, 29),  // Chinese New Year
    (2025, 3, 14),  // Nyepi (Balinese New Year)
    (2025, 3, 29),  // Maulid Nabi Muhammad
    (2025, 3, 31),  // Easter Monday
    (2025, 4, 9),   // Isra Miraj
    (2025, 5, 1),   // Labour Day
    (2025, 5, 12),  // Vesak Day
    (2025, 5, 29),  // Ascension Day
    (2025, 6, 1),   // Pancasila Day
    (2025, 6, 6),   // Eid al-Fitr 1
    (2025, 6, 7),   // Eid al-Fitr 2
    (2025, 6, 17),  // Independence Day
    (2025, 8, 12),  // Eid al-Adha
    (2025, 8, 17),  // Independence Day
    (2025, 9, 1),   // Islamic New Year
    (2025, 11, 10), // Prophet Muhammad's Birthday
    (2025, 12, 25), // Christmas Day
];

/// A set of non-business dates combined with the Sat/Sun weekend rule.
#[derive(Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HolidayCalendar {
    holidays: BTreeSet<NaiveDate>,
}

impl HolidayCalendar {
    pub fn new<I>(holidays: I) -> Self
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        Self {
            holidays: holidays.into_iter().collect(),
        }
    }

    /// The Indonesian public-holiday calendar for 2025.
    pub fn indonesia_2025() -> Self {
        Self {
            holidays: INDONESIA_2025
                .iter()
                .filter_map(|&(y, m, d)| NaiveDate::from_ymd_opt(y, m, d))
                .collect(),
        }
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains(&date)
    }

    pub fn is_business_day(&self, date: NaiveDate) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) && !self.is_holiday(date)
    }

    // Nearest business day on or before `date`. Walks past year boundaries
    // unchecked; a calendar dense enough to exhaust chrono's date range is
    // rejected earlier by the segment builder.
    pub fn previous_business_day(&self, date: NaiveDate) -> NaiveDate {
        let mut result = date;
        while !self.is_business_day(result) {
            result = result.pred_opt().unwrap_or(result);
            if result == NaiveDate::MIN {
                break;
            }
        }
        result
    }

    /// Nearest business day on or after `date`.
    pub fn next_business_day(&self, date: NaiveDate) -> NaiveDate {
        let mut result = date;
        while !self.is_business_day(result) {
            result = result.succ_opt().unwrap_or(result);
            if result == NaiveDate::MAX {
                break;
            }
        }
        result
    }
}
