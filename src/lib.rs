mod config;
mod consts;
mod delegate;
mod manager;
mod observe;
mod prelude;
mod sequence;
mod tracker;
mod types;

#[cfg(test)]
pub(crate) mod test_utils;

pub use config::{CalendarConfiguration, ConfigError, DateInterval, Theme};
pub use consts::*;
pub use delegate::{CalendarDataSource, CalendarDelegate, Dimensions, SelectedDayView};
pub use manager::{CalendarContext, CalendarManager, YearPager};
pub use observe::{ListenerId, Subject};
pub use sequence::{AnchorSequence, Granularity};
pub use tracker::{PageTracker, ScrollPolicy, ScrollSurface, TrackerError};
pub use types::{Day, Month, Year};

use crate::prelude::*;
use std::str::FromStr;

/// A concrete calendar date built from validated components.
///
/// This is the currency of the pagination model: configuration bounds,
/// page anchors, and selections are all `CalendarDate` values. Ordering
/// is plain calendar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{:04}-{:02}-{:02}", "year.get()", "month.get()", "day.get()")]
pub struct CalendarDate {
    year:  Year,
    month: Month,
    day:   Day,
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum DateError {
    #[display(fmt = "Invalid date format: {_0}")]
    InvalidFormat(String),
    #[display(fmt = "Invalid year: {} (must be 1-{})", "_0", MAX_YEAR)]
    InvalidYear(u16),
    #[display(fmt = "Invalid month: {} (must be 1-{})", "_0", MAX_MONTH)]
    InvalidMonth(u8),
    #[display(fmt = "Invalid day {day} for month {year}-{month:02}")]
    InvalidDay { month: u8, day: u8, year: u16 },
    #[display(fmt = "Empty date string")]
    EmptyInput,
}

impl std::error::Error for DateError {}

impl CalendarDate {
    /// Creates a date from raw components, validating each of them.
    ///
    /// # Errors
    /// Returns `DateError` if any component is out of range for the others.
    pub fn new(year: u16, month: u8, day: u8) -> Result<Self, DateError> {
        let year_t = Year::new(year)?;
        let month_t = Month::new(month)?;
        let day_t = Day::new(day, year, month)?;
        Ok(Self {
            year:  year_t,
            month: month_t,
            day:   day_t,
        })
    }

    /// Assembles a date from components that were already validated together.
    pub const fn from_parts(year: Year, month: Month, day: Day) -> Self {
        Self { year, month, day }
    }

    /// Returns the year component as u16
    pub const fn year(&self) -> u16 {
        self.year.get()
    }

    /// Returns the month component as u8
    pub const fn month(&self) -> u8 {
        self.month.get()
    }

    /// Returns the day component as u8
    pub const fn day(&self) -> u8 {
        self.day.get()
    }

    /// Returns the Year type
    pub const fn year_typed(&self) -> Year {
        self.year
    }

    /// Returns the Month type
    pub const fn month_typed(&self) -> Month {
        self.month
    }

    /// Returns the Day type
    pub const fn day_typed(&self) -> Day {
        self.day
    }
}

// --- start-of-unit arithmetic used by the pagination model ---

impl CalendarDate {
    /// First day of this date's month.
    pub const fn start_of_month(self) -> Self {
        Self {
            year:  self.year,
            month: self.month,
            day:   Day::FIRST,
        }
    }

    /// January 1st of this date's year.
    pub const fn start_of_year(self) -> Self {
        Self {
            year:  self.year,
            month: Month::JANUARY,
            day:   Day::FIRST,
        }
    }

    /// First day of the following month. This is the next month-start
    /// strictly after `self`, whatever day `self` falls on.
    /// Returns `None` past the `MAX_YEAR` ceiling.
    pub fn first_of_next_month(self) -> Option<Self> {
        match self.month.succ() {
            Some(month) => Some(Self {
                year: self.year,
                month,
                day: Day::FIRST,
            }),
            None => self.first_of_next_year(),
        }
    }

    /// January 1st of the following year, the next year-start strictly
    /// after `self`. Returns `None` past the `MAX_YEAR` ceiling.
    pub fn first_of_next_year(self) -> Option<Self> {
        let year = self.year.succ()?;
        Some(Self {
            year,
            month: Month::JANUARY,
            day: Day::FIRST,
        })
    }

    /// Signed number of whole months from this date's month to `other`'s.
    /// Day components are ignored, matching page-index arithmetic.
    pub fn months_until(self, other: Self) -> i64 {
        let years = i64::from(other.year()) - i64::from(self.year());
        let months = i64::from(other.month()) - i64::from(self.month());
        years * MONTHS_PER_YEAR + months
    }

    /// Signed number of whole years from this date's year to `other`'s.
    pub fn years_until(self, other: Self) -> i64 {
        i64::from(other.year()) - i64::from(self.year())
    }
}

impl FromStr for CalendarDate {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DateError::EmptyInput);
        }

        // ISO format only: YYYY-MM-DD
        let parts: Vec<&str> = trimmed.split(DATE_SEPARATOR).map(str::trim).collect();
        if parts.len() != 3 {
            return Err(DateError::InvalidFormat(format!(
                "expected YYYY{DATE_SEPARATOR}MM{DATE_SEPARATOR}DD, got: {trimmed}"
            )));
        }

        let year = parse_u16(parts[0])?;
        let month = parse_u8(parts[1])?;
        let day = parse_u8(parts[2])?;
        Self::new(year, month, day)
    }
}

/// Helper to parse u16 with better error messages
fn parse_u16(s: &str) -> Result<u16, DateError> {
    s.parse::<u16>()
        .map_err(|_| DateError::InvalidFormat(s.to_owned()))
}

/// Helper to parse u8 with better error messages
fn parse_u8(s: &str) -> Result<u8, DateError> {
    s.parse::<u8>()
        .map_err(|_| DateError::InvalidFormat(s.to_owned()))
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
