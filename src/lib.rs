mod consts;
mod convert;
mod era;
mod era_date;
mod prelude;
mod types;

pub use consts::*;
pub use convert::CalendarConverter;
pub use era::{EraError, EraInterval, EraTable};
pub use era_date::EraDate;
pub use types::{Day, EraYear, Month, Year};

use crate::prelude::*;
use std::str::FromStr;
use types::days_in_month;

/// A full-precision Gregorian calendar date.
/// Components are validated at construction (leap-year aware), so every
/// value of this type denotes a real calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{:04}-{:02}-{:02}", "year.get()", "month.get()", "day.get()")]
pub struct CalendarDate {
    year: types::Year,
    month: types::Month,
    day: types::Day,
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ParseError {
    #[display(fmt = "Invalid date format: {_0}")]
    InvalidFormat(String),
    #[display(fmt = "Invalid year: {} (must be 1-{})", "_0", MAX_YEAR)]
    InvalidYear(u16),
    #[display(fmt = "Invalid month: {} (must be 1-{})", "_0", MAX_MONTH)]
    InvalidMonth(u8),
    #[display(fmt = "Invalid day {day} for month {year}-{month:02}")]
    InvalidDay { month: u8, day: u8, year: u16 },
    #[display(fmt = "Invalid era year: {} (must be 1-{})", "_0", MAX_ERA_YEAR)]
    InvalidEraYear(u16),
    #[display(fmt = "Empty date string")]
    EmptyInput,
}

impl std::error::Error for ParseError {}

impl CalendarDate {
    /// Creates a date from raw components, validating each of them
    ///
    /// # Errors
    /// Returns `ParseError` if the year, month, or day is out of range
    /// (the day bound is leap-year aware).
    pub fn new(year: u16, month: u8, day: u8) -> Result<Self, ParseError> {
        let year_nz = types::Year::new(year)?;
        let month_nz = types::Month::new(month)?;
        let day_nz = types::Day::new(day, year, month)?;
        Ok(Self {
            year: year_nz,
            month: month_nz,
            day: day_nz,
        })
    }

    /// Creates a date from already-validated component types
    pub const fn from_parts(year: types::Year, month: types::Month, day: types::Day) -> Self {
        Self { year, month, day }
    }

    /// Alias of [`CalendarDate::new`] for column-style call sites
    ///
    /// # Errors
    /// Returns `ParseError` if any component is out of range.
    pub fn from_ymd(year: u16, month: u8, day: u8) -> Result<Self, ParseError> {
        Self::new(year, month, day)
    }

    /// Returns the date as raw `(year, month, day)` components
    pub const fn to_ymd(&self) -> (u16, u8, u8) {
        (self.year.get(), self.month.get(), self.day.get())
    }

    /// Returns the year component (as u16 for convenience)
    pub const fn year(&self) -> u16 {
        self.year.get()
    }

    /// Returns the month component (as u8 for convenience)
    pub const fn month(&self) -> u8 {
        self.month.get()
    }

    /// Returns the day component (as u8 for convenience)
    pub const fn day(&self) -> u8 {
        self.day.get()
    }

    /// Returns the Year type
    pub const fn year_typed(&self) -> types::Year {
        self.year
    }

    /// Returns the Month type
    pub const fn month_typed(&self) -> types::Month {
        self.month
    }

    /// Returns the Day type
    pub const fn day_typed(&self) -> types::Day {
        self.day
    }

    /// The next calendar day, rolling over month and year boundaries.
    /// Returns `None` past the `MAX_YEAR` limit.
    pub fn succ(&self) -> Option<Self> {
        let (y, m, d) = next_day(self.year.get(), self.month.get(), self.day.get())?;
        // rollover only ever produces in-range components
        Self::new(y, m, d).ok()
    }
}

// --- helpers for day rollover ---
fn next_month(year: u16, month: u8) -> Option<(u16, u8)> {
    debug_assert!(month != 0 && month <= MAX_MONTH);
    if month == DECEMBER {
        // Check both overflow and our MAX_YEAR limit
        if year >= MAX_YEAR {
            None
        } else {
            Some((year + 1, JANUARY))
        }
    } else {
        Some((year, month + 1))
    }
}

fn next_day(year: u16, month: u8, day: u8) -> Option<(u16, u8, u8)> {
    let max = days_in_month(year, month);
    if day < max {
        Some((year, month, day + 1))
    } else {
        // roll to first of next month (respects MAX_YEAR limit)
        next_month(year, month).map(|(ny, nm)| (ny, nm, MIN_DAY))
    }
}

impl FromStr for CalendarDate {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        // Strict ISO format: YYYY-MM-DD, nothing else
        let parts: Vec<&str> = trimmed.split(DATE_SEPARATOR).map(|p| p.trim()).collect();
        if parts.len() != 3 {
            return Err(ParseError::InvalidFormat(format!(
                "Expected YYYY{DATE_SEPARATOR}MM{DATE_SEPARATOR}DD, got: {trimmed}"
            )));
        }

        let year = Self::parse_u16(parts[0])?;
        let month = Self::parse_u8(parts[1])?;
        let day = Self::parse_u8(parts[2])?;

        Self::new(year, month, day)
    }
}

impl CalendarDate {
    /// Helper to parse u16 with better error messages
    fn parse_u16(s: &str) -> Result<u16, ParseError> {
        s.parse::<u16>()
            .map_err(|_| ParseError::InvalidFormat(s.to_owned()))
    }

    /// Helper to parse u8 with better error messages
    fn parse_u8(s: &str) -> Result<u8, ParseError> {
        s.parse::<u8>()
            .map_err(|_| ParseError::InvalidFormat(s.to_owned()))
    }
}

impl TryFrom<(u16, u8, u8)> for CalendarDate {
    type Error = ParseError;

    fn try_from(value: (u16, u8, u8)) -> Result<Self, Self::Error> {
        Self::new(value.0, value.1, value.2)
    }
}

impl From<CalendarDate> for (u16, u8, u8) {
    fn from(date: CalendarDate) -> Self {
        date.to_ymd()
    }
}

impl serde::Serialize for CalendarDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for CalendarDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
pub(crate) mod test_utils {
    use super::*;
    use std::sync::Arc;

    pub(crate) fn date(year: u16, month: u8, day: u8) -> CalendarDate {
        CalendarDate::new(year, month, day).unwrap()
    }

    pub(crate) fn era(name: &str, start: CalendarDate, end: Option<CalendarDate>) -> EraInterval {
        EraInterval::new(name, start, end).unwrap()
    }

    pub(crate) fn arc_era(
        name: &str,
        start: CalendarDate,
        end: Option<CalendarDate>,
    ) -> Arc<EraInterval> {
        Arc::new(era(name, start, end))
    }
}
