use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{CalendarDate, DateError, prelude::*};

/// Error type for configuration construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The configured date range is empty or inverted.
    #[error("Invalid date range: start ({start}) is not before end ({end})")]
    InvalidRange {
        start: CalendarDate,
        end:   CalendarDate,
    },

    /// Error validating a date component.
    #[error(transparent)]
    Date(#[from] DateError),
}

/// A half-open date interval `[start, end)`.
///
/// Construction validates `start < end`, so an inverted or empty interval
/// is unrepresentable once a value exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display(fmt = "{start}..{end}")]
pub struct DateInterval {
    start: CalendarDate,
    end:   CalendarDate,
}

impl DateInterval {
    /// Creates a new interval with validation.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidRange` if `end <= start`.
    pub fn new(start: CalendarDate, end: CalendarDate) -> Result<Self, ConfigError> {
        if end <= start {
            return Err(ConfigError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Returns the inclusive start of the interval
    pub const fn start(&self) -> CalendarDate {
        self.start
    }

    /// Returns the exclusive end of the interval
    pub const fn end(&self) -> CalendarDate {
        self.end
    }

    /// Checks whether a date falls inside `[start, end)`
    pub fn contains(&self, date: CalendarDate) -> bool {
        self.start <= date && date < self.end
    }
}

/// Accent color carried through to rendering components.
///
/// Opaque to the pagination model: the crate stores and hands it back out
/// through the read-only context, nothing more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct Theme(u32);

impl Theme {
    /// Creates a theme from a 24-bit `0xRRGGBB` value.
    pub const fn new(rgb: u32) -> Self {
        Self(rgb & 0x00FF_FFFF)
    }

    /// Returns the 24-bit `0xRRGGBB` value.
    pub const fn rgb(self) -> u32 {
        self.0
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::new(0x0041_69E1) // royal blue
    }
}

impl From<u32> for Theme {
    fn from(rgb: u32) -> Self {
        Self::new(rgb)
    }
}

impl From<Theme> for u32 {
    fn from(theme: Theme) -> Self {
        theme.rgb()
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.0)
    }
}

/// Immutable calendar configuration shared read-only by every sub-manager.
///
/// Holds the valid date range and the theme. Construction fails fast on an
/// empty or inverted range; the error never surfaces later as a missing
/// first page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ConfigRepr", into = "ConfigRepr")]
pub struct CalendarConfiguration {
    interval: DateInterval,
    theme:    Theme,
}

impl CalendarConfiguration {
    /// Creates a configuration with validation.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidRange` if `end <= start`.
    pub fn new(
        start: CalendarDate,
        end: CalendarDate,
        theme: Theme,
    ) -> Result<Self, ConfigError> {
        let interval = DateInterval::new(start, end)?;
        Ok(Self { interval, theme })
    }

    /// Returns the first date of the calendar's valid range
    pub const fn start_date(&self) -> CalendarDate {
        self.interval.start()
    }

    /// Returns the exclusive end of the calendar's valid range
    pub const fn end_date(&self) -> CalendarDate {
        self.interval.end()
    }

    /// Returns the configured interval
    pub const fn interval(&self) -> DateInterval {
        self.interval
    }

    /// Returns the configured theme
    pub const fn theme(&self) -> Theme {
        self.theme
    }
}

/// Raw serde shape for `CalendarConfiguration`; validated on the way in.
#[derive(Serialize, Deserialize)]
struct ConfigRepr {
    start_date: CalendarDate,
    end_date:   CalendarDate,
    #[serde(default)]
    theme:      Theme,
}

impl TryFrom<ConfigRepr> for CalendarConfiguration {
    type Error = ConfigError;

    fn try_from(repr: ConfigRepr) -> Result<Self, Self::Error> {
        Self::new(repr.start_date, repr.end_date, repr.theme)
    }
}

impl From<CalendarConfiguration> for ConfigRepr {
    fn from(config: CalendarConfiguration) -> Self {
        Self {
            start_date: config.start_date(),
            end_date:   config.end_date(),
            theme:      config.theme(),
        }
    }
}
