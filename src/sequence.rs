//! Anchor-date sequence generation: maps a bounded date interval onto an
//! ordered list of page anchors at month or year granularity.

use crate::config::{ConfigError, DateInterval};
use crate::{CalendarDate, prelude::*};

/// The unit one page covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Granularity {
    #[display(fmt = "month")]
    Month,
    #[display(fmt = "year")]
    Year,
}

impl Granularity {
    /// Canonical start-of-unit for a date.
    pub const fn start_of(self, date: CalendarDate) -> CalendarDate {
        match self {
            Self::Month => date.start_of_month(),
            Self::Year => date.start_of_year(),
        }
    }

    /// The next start-of-unit strictly after `date` ("next occurrence"
    /// matching policy). `None` only at the year-9999 ceiling.
    pub fn next_start_after(self, date: CalendarDate) -> Option<CalendarDate> {
        match self {
            Self::Month => date.first_of_next_month(),
            Self::Year => date.first_of_next_year(),
        }
    }

    /// Signed whole-unit distance between the units containing `a` and `b`.
    pub fn units_between(self, a: CalendarDate, b: CalendarDate) -> i64 {
        match self {
            Self::Month => a.months_until(b),
            Self::Year => a.years_until(b),
        }
    }
}

/// Ordered, duplicate-free sequence of page-anchor dates.
///
/// The first element is always the interval start, even when it is not
/// unit-aligned; every later element is a start-of-unit strictly inside
/// the interval. Never empty, strictly increasing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorSequence {
    anchors:     Vec<CalendarDate>,
    granularity: Granularity,
}

impl AnchorSequence {
    /// Generates the anchor sequence for `[start, end)`.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidRange` if `end <= start`.
    pub fn generate(
        start: CalendarDate,
        end: CalendarDate,
        granularity: Granularity,
    ) -> Result<Self, ConfigError> {
        let interval = DateInterval::new(start, end)?;
        Ok(Self::from_interval(interval, granularity))
    }

    /// Generates the anchor sequence for an already-validated interval.
    /// Infallible: a valid interval always yields at least its start.
    pub fn from_interval(interval: DateInterval, granularity: Granularity) -> Self {
        let mut anchors = vec![interval.start()];
        let mut cursor = interval.start();
        while let Some(candidate) = granularity.next_start_after(cursor) {
            if candidate >= interval.end() {
                break;
            }
            anchors.push(candidate);
            cursor = candidate;
        }

        tracing::debug!(
            %interval,
            %granularity,
            pages = anchors.len(),
            "generated anchor sequence"
        );
        Self {
            anchors,
            granularity,
        }
    }

    /// Number of pages. Always at least 1.
    pub fn page_count(&self) -> usize {
        self.anchors.len()
    }

    /// Anchor for page `index`, if in range.
    pub fn get(&self, index: usize) -> Option<CalendarDate> {
        self.anchors.get(index).copied()
    }

    /// First anchor: the interval start. Total by the non-empty invariant.
    pub fn first(&self) -> CalendarDate {
        self.anchors[0]
    }

    /// Last anchor. Total by the non-empty invariant.
    pub fn last(&self) -> CalendarDate {
        self.anchors[self.anchors.len() - 1]
    }

    /// All anchors in page order.
    pub fn as_slice(&self) -> &[CalendarDate] {
        &self.anchors
    }

    pub const fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Resolves a date to the page index covering it: the unit distance
    /// from the first anchor's unit, clamped into the page domain. Dates
    /// outside the interval land on the nearest boundary page.
    pub fn resolve(&self, date: CalendarDate) -> usize {
        let units = self.granularity.units_between(self.first(), date);
        let max_index = self.anchors.len() as i64 - 1;
        units.clamp(0, max_index) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::date;

    fn months(start: (u16, u8, u8), end: (u16, u8, u8)) -> AnchorSequence {
        AnchorSequence::generate(
            date(start.0, start.1, start.2),
            date(end.0, end.1, end.2),
            Granularity::Month,
        )
        .unwrap()
    }

    fn years(start: (u16, u8, u8), end: (u16, u8, u8)) -> AnchorSequence {
        AnchorSequence::generate(
            date(start.0, start.1, start.2),
            date(end.0, end.1, end.2),
            Granularity::Year,
        )
        .unwrap()
    }

    #[test]
    fn month_sequence_from_spec_example() {
        // 2020-01-15 .. 2020-04-01 keeps the unaligned start and
        // excludes April, which equals the exclusive end.
        let pages = months((2020, 1, 15), (2020, 4, 1));
        assert_eq!(
            pages.as_slice(),
            &[date(2020, 1, 15), date(2020, 2, 1), date(2020, 3, 1)]
        );
    }

    #[test]
    fn aligned_start_is_not_duplicated() {
        let pages = months((2020, 1, 1), (2020, 3, 1));
        assert_eq!(pages.as_slice(), &[date(2020, 1, 1), date(2020, 2, 1)]);
    }

    #[test]
    fn single_page_when_no_unit_start_inside() {
        let pages = months((2020, 1, 15), (2020, 2, 1));
        assert_eq!(pages.as_slice(), &[date(2020, 1, 15)]);
    }

    #[test]
    fn year_sequence_keeps_unaligned_start() {
        let pages = years((2019, 6, 15), (2022, 1, 1));
        assert_eq!(
            pages.as_slice(),
            &[date(2019, 6, 15), date(2020, 1, 1), date(2021, 1, 1)]
        );
    }

    #[test]
    fn invalid_range_is_rejected() {
        let result =
            AnchorSequence::generate(date(2020, 4, 1), date(2020, 1, 15), Granularity::Month);
        assert!(matches!(result, Err(ConfigError::InvalidRange { .. })));

        let result =
            AnchorSequence::generate(date(2020, 1, 15), date(2020, 1, 15), Granularity::Year);
        assert!(matches!(result, Err(ConfigError::InvalidRange { .. })));
    }

    #[test]
    fn sequence_is_strictly_increasing_and_unique() {
        let pages = months((2019, 11, 20), (2021, 2, 2));
        let anchors = pages.as_slice();
        assert!(!anchors.is_empty());
        for pair in anchors.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        assert_eq!(anchors[0], date(2019, 11, 20));
    }

    #[test]
    fn accessors() {
        let pages = months((2020, 1, 15), (2020, 4, 1));
        assert_eq!(pages.page_count(), 3);
        assert_eq!(pages.first(), date(2020, 1, 15));
        assert_eq!(pages.last(), date(2020, 3, 1));
        assert_eq!(pages.get(1), Some(date(2020, 2, 1)));
        assert_eq!(pages.get(3), None);
        assert_eq!(pages.granularity(), Granularity::Month);
    }

    #[test]
    fn resolve_maps_dates_to_covering_page() {
        let pages = months((2020, 1, 15), (2020, 4, 1));
        // Dates before the first month-start after the unaligned start
        // share page 0 with it.
        assert_eq!(pages.resolve(date(2020, 1, 15)), 0);
        assert_eq!(pages.resolve(date(2020, 1, 31)), 0);
        assert_eq!(pages.resolve(date(2020, 2, 1)), 1);
        assert_eq!(pages.resolve(date(2020, 2, 29)), 1);
        assert_eq!(pages.resolve(date(2020, 3, 31)), 2);
    }

    #[test]
    fn resolve_satisfies_covering_property() {
        fn next_day(d: CalendarDate) -> CalendarDate {
            if d.day() < crate::types::days_in_month(d.year(), d.month()) {
                CalendarDate::new(d.year(), d.month(), d.day() + 1).unwrap()
            } else {
                d.first_of_next_month().unwrap()
            }
        }

        // pages[i] <= start_of_unit(d) < pages[i + 1] for every d in range.
        let pages = months((2020, 1, 15), (2020, 7, 1));
        let mut day = date(2020, 1, 15);
        while day < date(2020, 7, 1) {
            let i = pages.resolve(day);
            let anchor = pages.get(i).unwrap();
            assert!(anchor.start_of_month() <= day.start_of_month());
            if let Some(next) = pages.get(i + 1) {
                assert!(day.start_of_month() < next);
            }
            day = next_day(day);
        }
    }

    #[test]
    fn resolve_clamps_out_of_range_dates() {
        let pages = months((2020, 1, 15), (2020, 4, 1));
        assert_eq!(pages.resolve(date(2019, 6, 1)), 0);
        assert_eq!(pages.resolve(date(2020, 12, 25)), 2);
    }

    #[test]
    fn year_resolve_uses_year_distance() {
        let pages = years((2019, 6, 15), (2022, 1, 1));
        assert_eq!(pages.resolve(date(2019, 12, 31)), 0);
        assert_eq!(pages.resolve(date(2020, 7, 4)), 1);
        assert_eq!(pages.resolve(date(2021, 1, 1)), 2);
    }
}
