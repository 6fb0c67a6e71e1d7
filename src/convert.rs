use std::sync::Arc;

use crate::era::{EraError, EraInterval, EraTable};
use crate::era_date::EraDate;
use crate::{CalendarDate, JANUARY, MAX_ERA_YEAR, MIN_DAY, ParseError};

/// Stateless conversion service over an injected era table.
///
/// Composes table lookups with [`EraDate`] construction to convert in both
/// directions and answer the year-arithmetic queries. Every operation is a
/// pure, deterministic function; failures are structural and never
/// transient. The table is immutable, so a converter can be shared freely
/// across threads.
#[derive(Debug, Clone)]
pub struct CalendarConverter {
    table: EraTable,
}

impl CalendarConverter {
    /// Creates a converter over the given era table
    pub const fn new(table: EraTable) -> Self {
        Self { table }
    }

    /// A converter seeded with the fixed five-era Japanese table
    pub fn japanese() -> Self {
        Self::new(EraTable::japanese())
    }

    /// Returns the underlying era table
    pub const fn table(&self) -> &EraTable {
        &self.table
    }

    /// Converts a Gregorian date to its era-relative form.
    ///
    /// # Errors
    /// Returns `EraError::NoEraForDate` if the date precedes the first era,
    /// or `EraError::Date` if the era-relative year falls outside 1..=200.
    pub fn to_era(&self, date: CalendarDate) -> Result<EraDate, EraError> {
        let era = self
            .table
            .lookup_by_date(date)
            .ok_or(EraError::NoEraForDate(date))?;

        // date >= era.start, so this never underflows
        let year = date.year() - era.start().year() + 1;
        let year = u8::try_from(year).map_err(|_| ParseError::InvalidEraYear(year))?;

        // month and day come from an already-valid date
        EraDate::new(era, year, date.month(), date.day())
    }

    /// Converts an era-relative date back to its Gregorian form. The value
    /// carries its derived date, so this direction cannot fail.
    pub const fn to_gregorian(&self, date: &EraDate) -> CalendarDate {
        date.to_gregorian()
    }

    /// Returns the era containing `date`, if any
    pub fn find_era_by_date(&self, date: CalendarDate) -> Option<Arc<EraInterval>> {
        self.table.lookup_by_date(date)
    }

    /// Returns the era with the given name (exact, case-sensitive), if any
    pub fn find_era_by_name(&self, name: &str) -> Option<Arc<EraInterval>> {
        self.table.lookup_by_name(name)
    }

    /// The Gregorian year corresponding to `era_year` of the named era:
    /// `era.start.year + era_year - 1`.
    ///
    /// # Errors
    /// Returns `EraError::UnknownEra` for an unknown name and
    /// `EraError::Date` if `era_year` falls outside 1..=200.
    pub fn calculate_gregorian_year(
        &self,
        era_name: &str,
        era_year: u16,
    ) -> Result<u16, EraError> {
        let era = self
            .table
            .lookup_by_name(era_name)
            .ok_or_else(|| EraError::UnknownEra(era_name.to_owned()))?;
        if era_year == 0 || era_year > u16::from(MAX_ERA_YEAR) {
            return Err(ParseError::InvalidEraYear(era_year).into());
        }
        Ok(era.start().year() + era_year - 1)
    }

    /// The era-relative year of `gregorian_year` within the named era:
    /// `gregorian_year - era.start.year + 1`.
    ///
    /// Membership is tested against January 1st of the target year, so for
    /// an era that starts mid-year the era's own first calendar year is
    /// rejected even though its later months genuinely belong to the era.
    ///
    /// # Errors
    /// Returns `EraError::UnknownEra` for an unknown name and
    /// `EraError::YearOutsideEra` if January 1st of the year is not inside
    /// the era's interval.
    pub fn calculate_japanese_year(
        &self,
        gregorian_year: u16,
        era_name: &str,
    ) -> Result<u16, EraError> {
        let era = self
            .table
            .lookup_by_name(era_name)
            .ok_or_else(|| EraError::UnknownEra(era_name.to_owned()))?;

        let january_first = CalendarDate::new(gregorian_year, JANUARY, MIN_DAY)?;
        if !era.contains(january_first) {
            return Err(EraError::YearOutsideEra {
                year: gregorian_year,
                era: era.name().to_owned(),
            });
        }
        Ok(gregorian_year - era.start().year() + 1)
    }

    /// The era-relative form of an externally supplied current date. This
    /// component never samples a wall clock itself.
    ///
    /// # Errors
    /// Same failure modes as [`CalendarConverter::to_era`].
    pub fn today(&self, current_date: CalendarDate) -> Result<EraDate, EraError> {
        self.to_era(current_date)
    }
}
