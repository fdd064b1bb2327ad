//! Shared constructors and recording doubles for unit tests.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::{CalendarConfiguration, Theme};
use crate::delegate::CalendarDelegate;
use crate::tracker::ScrollSurface;
use crate::CalendarDate;

/// Builds a date from raw parts, panicking on invalid input.
pub(crate) fn date(year: u16, month: u8, day: u8) -> CalendarDate {
    CalendarDate::new(year, month, day).expect("test date must be valid")
}

/// Builds a default-theme configuration from raw date parts.
pub(crate) fn config(start: (u16, u8, u8), end: (u16, u8, u8)) -> CalendarConfiguration {
    CalendarConfiguration::new(
        date(start.0, start.1, start.2),
        date(end.0, end.1, end.2),
        Theme::default(),
    )
    .expect("test configuration must be valid")
}

/// Scroll surface double that records every issued page command.
pub(crate) struct RecordingSurface {
    log: Rc<RefCell<Vec<usize>>>,
}

impl RecordingSurface {
    /// Returns the surface and a shared handle onto its command log.
    pub(crate) fn new() -> (Self, Rc<RefCell<Vec<usize>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        (Self { log: Rc::clone(&log) }, log)
    }
}

impl ScrollSurface for RecordingSurface {
    fn scroll_to_page(&mut self, index: usize) {
        self.log.borrow_mut().push(index);
    }
}

/// Delegate notification captured by [`RecordingDelegate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DelegateEvent {
    Selected(CalendarDate),
    WillDisplay(CalendarDate),
}

/// Delegate double that records every notification in order.
pub(crate) struct RecordingDelegate {
    events: Rc<RefCell<Vec<DelegateEvent>>>,
}

impl RecordingDelegate {
    /// Returns the delegate and a shared handle onto its event log.
    pub(crate) fn new() -> (Self, Rc<RefCell<Vec<DelegateEvent>>>) {
        let events = Rc::new(RefCell::new(Vec::new()));
        (
            Self {
                events: Rc::clone(&events),
            },
            events,
        )
    }
}

impl CalendarDelegate for RecordingDelegate {
    fn did_select_date(&mut self, date: CalendarDate) {
        self.events.borrow_mut().push(DelegateEvent::Selected(date));
    }

    fn will_display_month(&mut self, month: CalendarDate) {
        self.events
            .borrow_mut()
            .push(DelegateEvent::WillDisplay(month));
    }
}
