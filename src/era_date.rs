use std::cmp::Ordering;
use std::sync::Arc;

use crate::era::{EraError, EraInterval};
use crate::types::{Day, EraYear, Month, Year};
use crate::{CalendarDate, MAX_DAY, ParseError, prelude::*};

/// A date expressed relative to an era: the era, the era-relative year
/// (1 is the era's first, possibly partial, calendar year), month, and day.
///
/// The equivalent Gregorian date is derived once at construction as
/// `era.start.year + year - 1` with the month and day carried over, and the
/// day bound is validated against that composed year (leap-year aware).
///
/// Construction is "calendar-arithmetic-valid" only: the composed date is
/// NOT checked against the era's own `[start, end]` span, so year 1 of an
/// era that begins mid-year admits dates the era did not yet cover. The
/// converter's date-to-era direction never produces such values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
#[display(
    fmt = "{} {}-{:02}-{:02}",
    "era.name()",
    "year.get()",
    "month.get()",
    "day.get()"
)]
pub struct EraDate {
    era: Arc<EraInterval>,
    year: EraYear,
    month: Month,
    day: Day,
    gregorian: CalendarDate,
}

impl EraDate {
    /// Creates an era-relative date, validating each component.
    ///
    /// The day is bounded generically (1..=31) before the precise
    /// days-in-month check, so `day > 31` fails even when the composed
    /// Gregorian year cannot be formed.
    ///
    /// # Errors
    /// Returns `EraError::Date` wrapping the out-of-range component: era
    /// year outside 1..=200, month outside 1..=12, or a day invalid for the
    /// composed Gregorian year and month.
    pub fn new(era: Arc<EraInterval>, year: u8, month: u8, day: u8) -> Result<Self, EraError> {
        let year_nz = EraYear::new(year)?;
        let month_nz = Month::new(month)?;

        if day == 0 || day > MAX_DAY {
            return Err(ParseError::InvalidDay {
                month,
                day,
                year: 0,
            }
            .into());
        }

        // era.start.year <= 9999 and year <= 200, so this cannot overflow;
        // Year::new rejects a composed year past the calendar limit
        let gregorian_year = era.start().year() + u16::from(year) - 1;
        let gregorian_year_nz = Year::new(gregorian_year)?;
        let day_nz = Day::new(day, gregorian_year, month)?;

        let gregorian = CalendarDate::from_parts(gregorian_year_nz, month_nz, day_nz);
        Ok(Self {
            era,
            year: year_nz,
            month: month_nz,
            day: day_nz,
            gregorian,
        })
    }

    /// Returns the era this date is relative to
    pub fn era(&self) -> &EraInterval {
        &self.era
    }

    /// Returns a shared handle to the era
    pub fn era_arc(&self) -> Arc<EraInterval> {
        Arc::clone(&self.era)
    }

    /// Returns the era-relative year (as u8 for convenience)
    pub const fn year(&self) -> u8 {
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

    /// True iff this is the era's first year
    pub const fn is_first_year(&self) -> bool {
        self.year.get() == 1
    }

    /// The equivalent Gregorian date. Construction is the sole validation
    /// gate and every field is immutable, so no failure path exists here.
    pub const fn to_gregorian(&self) -> CalendarDate {
        self.gregorian
    }
}

impl PartialOrd for EraDate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EraDate {
    fn cmp(&self, other: &Self) -> Ordering {
        // Compare the concrete Gregorian date first, then break ties between
        // distinct eras denoting the same day (possible via loose
        // construction near an era boundary)
        self.gregorian
            .cmp(&other.gregorian)
            .then_with(|| self.era.start().cmp(&other.era.start()))
            .then_with(|| self.era.name().cmp(other.era.name()))
            .then_with(|| self.era.end().cmp(&other.era.end()))
    }
}
