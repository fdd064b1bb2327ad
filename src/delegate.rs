//! External collaborator interfaces: per-day decoration queries and
//! state-change notifications. Both are optional; every method carries a
//! default body, so implementors override only what they need.

use crate::CalendarDate;
use crate::consts::OPAQUE;

/// Size hint handed to the datasource when it builds a selected-day view.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Dimensions {
    pub width:  f64,
    pub height: f64,
}

impl Dimensions {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Abstract renderable returned for a selected day. The model never
/// interprets it; the host maps it onto its own view type.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SelectedDayView {
    /// Nothing to show, the datasource default.
    #[default]
    Empty,
    /// A host-interpreted label.
    Label(String),
}

/// Supplies per-day visual decoration. No other contract.
pub trait CalendarDataSource {
    /// Opacity applied to a day cell's accent color.
    fn opacity_for_day(&self, _day: CalendarDate) -> f64 {
        OPAQUE
    }

    /// View shown under the month when a day is selected.
    fn view_for_selected_day(&self, _day: CalendarDate, _size: Dimensions) -> SelectedDayView {
        SelectedDayView::default()
    }
}

/// Receives calendar state-change notifications.
pub trait CalendarDelegate {
    /// A day was selected by the user.
    fn did_select_date(&mut self, _date: CalendarDate) {}

    /// A different month page is about to become current.
    fn will_display_month(&mut self, _month: CalendarDate) {}
}
