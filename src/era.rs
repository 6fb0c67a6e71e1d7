use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{CalendarDate, MAX_ERA_NAME_LEN, ParseError, prelude::*};

/// One named era: a contiguous span of the Gregorian calendar with an
/// inclusive start date and an optional inclusive end date. An absent end
/// means the era is still in effect ("current").
///
/// Immutable after construction; equality is structural (name + start + end).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[display(fmt = "{name}")]
#[serde(try_from = "RawEra", into = "RawEra")]
pub struct EraInterval {
    name: String,
    start: CalendarDate,
    end: Option<CalendarDate>,
}

/// Error type for era construction, table queries, and conversions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EraError {
    /// Era name is empty after trimming.
    #[error("Era name must not be empty")]
    EmptyName,

    /// Era name exceeds the maximum length.
    #[error("Era name too long: {name:?} ({len} characters, max 10)")]
    NameTooLong { name: String, len: usize },

    /// Era end date is earlier than its start date.
    #[error("Era end ({end}) is before its start ({start})")]
    EndBeforeStart {
        start: CalendarDate,
        end: CalendarDate,
    },

    /// Query range start is after its end.
    #[error("Invalid date range: start ({start}) is after end ({end})")]
    ReversedRange {
        start: CalendarDate,
        end: CalendarDate,
    },

    /// Era table has no entries.
    #[error("Era table must not be empty")]
    EmptyTable,

    /// Era table does not have exactly one open-ended era.
    #[error("Era table must have exactly one open-ended era, found {0}")]
    CurrentEraCount(usize),

    /// Two adjacent table entries leave a gap or overlap on the timeline.
    #[error("Era {next:?} does not start the day after era {prev:?} ends")]
    Discontiguous { prev: String, next: String },

    /// Error validating a date or year component.
    #[error(transparent)]
    Date(#[from] ParseError),

    /// Name-based lookup found no matching era.
    #[error("No era named {0:?}")]
    UnknownEra(String),

    /// Date precedes the first era and belongs to no era.
    #[error("Date {0} precedes the first era")]
    NoEraForDate(CalendarDate),

    /// Year fails its era-membership check.
    #[error("Year {year} does not fall within era {era:?}")]
    YearOutsideEra { year: u16, era: String },
}

impl EraInterval {
    /// Creates a new era interval with validation. The name is trimmed.
    ///
    /// # Errors
    /// Returns `EraError::EmptyName` / `NameTooLong` for a bad name and
    /// `EraError::EndBeforeStart` if `end` precedes `start`.
    pub fn new(name: &str, start: CalendarDate, end: Option<CalendarDate>) -> Result<Self, EraError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(EraError::EmptyName);
        }
        let len = trimmed.chars().count();
        if len > MAX_ERA_NAME_LEN {
            return Err(EraError::NameTooLong {
                name: trimmed.to_owned(),
                len,
            });
        }
        if let Some(end) = end {
            if end < start {
                return Err(EraError::EndBeforeStart { start, end });
            }
        }
        Ok(Self {
            name: trimmed.to_owned(),
            start,
            end,
        })
    }

    /// Returns the era name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the inclusive start date
    pub const fn start(&self) -> CalendarDate {
        self.start
    }

    /// Returns the inclusive end date, or `None` for the current era
    pub const fn end(&self) -> Option<CalendarDate> {
        self.end
    }

    /// True iff `date` falls within `[start, end]` (open end contains
    /// everything from `start` onward)
    pub fn contains(&self, date: CalendarDate) -> bool {
        date >= self.start && self.end.is_none_or(|end| date <= end)
    }

    /// True iff the era has no end date, i.e. is still in effect
    pub const fn is_current(&self) -> bool {
        self.end.is_none()
    }

    /// Number of calendar years the era spans, counting both the first and
    /// last (possibly partial) years. For the current era the span is taken
    /// up to `as_of`, so the result is non-decreasing over time.
    pub fn duration_in_years(&self, as_of: CalendarDate) -> u16 {
        let end_year = self.end.map_or(as_of.year(), |end| end.year());
        end_year.saturating_sub(self.start.year()) + 1
    }
}

/// Plain serde shape for `EraInterval`; deserialization re-validates
/// through `EraInterval::new`.
#[derive(Serialize, Deserialize)]
struct RawEra {
    name: String,
    start: CalendarDate,
    end: Option<CalendarDate>,
}

impl TryFrom<RawEra> for EraInterval {
    type Error = EraError;

    fn try_from(raw: RawEra) -> Result<Self, Self::Error> {
        Self::new(&raw.name, raw.start, raw.end)
    }
}

impl From<EraInterval> for RawEra {
    fn from(era: EraInterval) -> Self {
        Self {
            name: era.name,
            start: era.start,
            end: era.end,
        }
    }
}

/// An ordered, non-overlapping sequence of eras tiling the timeline from the
/// first era's start date forward. Built once, immutable thereafter; the
/// intervals are shared via `Arc` so lookups hand out cheap references.
///
/// Invariants enforced at construction:
/// 1. the table is non-empty,
/// 2. exactly one era is open-ended and it is the last entry,
/// 3. each era's end is immediately followed by the next era's start,
///    with no gap and no overlap.
///
/// A date strictly before the first era's start belongs to no era.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<EraInterval>", into = "Vec<EraInterval>")]
pub struct EraTable {
    eras: Vec<Arc<EraInterval>>,
}

impl EraTable {
    /// Creates a table from eras in ascending order, validating the tiling
    /// invariants.
    ///
    /// # Errors
    /// Returns `EraError::EmptyTable`, `CurrentEraCount`, or `Discontiguous`
    /// when the era sequence does not tile the timeline.
    pub fn new(eras: Vec<EraInterval>) -> Result<Self, EraError> {
        if eras.is_empty() {
            return Err(EraError::EmptyTable);
        }

        let current_count = eras.iter().filter(|era| era.is_current()).count();
        if current_count != 1 {
            return Err(EraError::CurrentEraCount(current_count));
        }

        // Adjacent eras must meet exactly: succ(prev.end) == next.start.
        // This also rejects an open-ended era anywhere but last, and any
        // out-of-order sequence.
        for pair in eras.windows(2) {
            let boundary = pair[0].end().and_then(|end| end.succ());
            if boundary != Some(pair[1].start()) {
                return Err(EraError::Discontiguous {
                    prev: pair[0].name().to_owned(),
                    next: pair[1].name().to_owned(),
                });
            }
        }

        Ok(Self {
            eras: eras.into_iter().map(Arc::new).collect(),
        })
    }

    /// The fixed five-era Japanese table with its historical boundaries.
    pub fn japanese() -> Self {
        match Self::japanese_seed() {
            Ok(table) => table,
            // the five fixed eras tile the timeline exactly
            Err(_) => unreachable!("historical era seed is valid"),
        }
    }

    fn japanese_seed() -> Result<Self, EraError> {
        let eras = vec![
            EraInterval::new(
                "Meiji",
                CalendarDate::new(1868, 1, 25)?,
                Some(CalendarDate::new(1912, 7, 29)?),
            )?,
            EraInterval::new(
                "Taisho",
                CalendarDate::new(1912, 7, 30)?,
                Some(CalendarDate::new(1926, 12, 24)?),
            )?,
            EraInterval::new(
                "Showa",
                CalendarDate::new(1926, 12, 25)?,
                Some(CalendarDate::new(1989, 1, 7)?),
            )?,
            EraInterval::new(
                "Heisei",
                CalendarDate::new(1989, 1, 8)?,
                Some(CalendarDate::new(2019, 4, 30)?),
            )?,
            EraInterval::new("Reiwa", CalendarDate::new(2019, 5, 1)?, None)?,
        ];
        Self::new(eras)
    }

    /// Returns the unique era containing `date`, scanning in chronological
    /// order; `None` if the date precedes the table's start.
    pub fn lookup_by_date(&self, date: CalendarDate) -> Option<Arc<EraInterval>> {
        self.eras.iter().find(|era| era.contains(date)).cloned()
    }

    /// Exact, case-sensitive lookup by era name
    pub fn lookup_by_name(&self, name: &str) -> Option<Arc<EraInterval>> {
        self.eras.iter().find(|era| era.name() == name).cloned()
    }

    /// Returns the era still in effect (the open-ended, last entry)
    pub fn current(&self) -> Option<Arc<EraInterval>> {
        self.eras.iter().find(|era| era.is_current()).cloned()
    }

    /// Returns, in chronological order, every era whose interval intersects
    /// `[range_start, range_end]`. An open era end is treated as unbounded.
    ///
    /// # Errors
    /// Returns `EraError::ReversedRange` if `range_start > range_end`.
    pub fn overlapping(
        &self,
        range_start: CalendarDate,
        range_end: CalendarDate,
    ) -> Result<Vec<Arc<EraInterval>>, EraError> {
        if range_start > range_end {
            return Err(EraError::ReversedRange {
                start: range_start,
                end: range_end,
            });
        }

        // Two intervals intersect iff each starts before the other ends
        Ok(self
            .eras
            .iter()
            .filter(|era| {
                era.start() <= range_end && era.end().is_none_or(|end| end >= range_start)
            })
            .cloned()
            .collect())
    }

    /// Returns the eras in chronological order
    pub fn eras(&self) -> &[Arc<EraInterval>] {
        &self.eras
    }

    /// Number of eras in the table
    pub fn len(&self) -> usize {
        self.eras.len()
    }

    /// Always false for a validated table; kept for the `len` pair
    pub fn is_empty(&self) -> bool {
        self.eras.is_empty()
    }
}

impl TryFrom<Vec<EraInterval>> for EraTable {
    type Error = EraError;

    fn try_from(eras: Vec<EraInterval>) -> Result<Self, Self::Error> {
        Self::new(eras)
    }
}

impl From<EraTable> for Vec<EraInterval> {
    fn from(table: EraTable) -> Self {
        table.eras.iter().map(|era| (**era).clone()).collect()
    }
}
