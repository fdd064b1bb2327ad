//! Cross-scale coordination: the month-granularity manager, its owned
//! year-granularity pager, and the read-only context handed to rendering
//! components.

use std::fmt;

use crate::config::{CalendarConfiguration, ConfigError, Theme};
use crate::consts::OPAQUE;
use crate::delegate::{CalendarDataSource, CalendarDelegate, Dimensions, SelectedDayView};
use crate::observe::{ListenerId, Subject};
use crate::sequence::{AnchorSequence, Granularity};
use crate::tracker::{PageTracker, ScrollPolicy, ScrollSurface, TrackerError};
use crate::{CalendarDate, DateInterval};

/// Year-granularity peer of the calendar manager.
///
/// Owned 1:1 by [`CalendarManager`] over the same configuration; external
/// consumers reach it only through the manager facade. Its tracker skips
/// scroll commands that target the already-current year page.
pub struct YearPager {
    tracker:      PageTracker,
    current_year: Subject<CalendarDate>,
}

impl YearPager {
    pub(crate) fn new(config: &CalendarConfiguration) -> Self {
        let pages = AnchorSequence::from_interval(config.interval(), Granularity::Year);
        let first = pages.first();
        Self {
            tracker:      PageTracker::new(pages, ScrollPolicy::SkipWhenCurrent),
            current_year: Subject::new(first),
        }
    }

    /// Binds the year-page domain to a host surface. Idempotent.
    ///
    /// # Errors
    /// Propagates tracker errors.
    pub fn attach(&mut self, surface: Box<dyn ScrollSurface>) -> Result<(), TrackerError> {
        self.tracker.attach(surface, None)
    }

    /// Scrolls to the year page covering `date`.
    ///
    /// # Errors
    /// Returns `TrackerError::NotAttached` before `attach`.
    pub fn scroll_to_year(&mut self, date: CalendarDate) -> Result<usize, TrackerError> {
        self.tracker.scroll_to_date(date)
    }

    /// Convenience: scrolls back to the page covering `today`.
    ///
    /// # Errors
    /// Returns `TrackerError::NotAttached` before `attach`.
    pub fn scroll_back_to(&mut self, today: CalendarDate) -> Result<usize, TrackerError> {
        self.scroll_to_year(today)
    }

    /// Host callback: year page `index` settled into view.
    ///
    /// # Errors
    /// Returns `TrackerError::PageOutOfRange` for an unknown index.
    pub fn page_became_visible(&mut self, index: usize) -> Result<(), TrackerError> {
        if let Some(anchor) = self.tracker.page_became_visible(index)? {
            self.current_year.set(anchor);
        }
        Ok(())
    }

    /// Anchor date of the current year page.
    pub fn current_year(&self) -> CalendarDate {
        self.current_year.get()
    }

    /// Observes current-year changes.
    pub fn observe_current_year(
        &mut self,
        listener: impl FnMut(&CalendarDate) + 'static,
    ) -> ListenerId {
        self.current_year.subscribe(listener)
    }

    /// Drops a current-year listener.
    pub fn unobserve_current_year(&mut self, id: ListenerId) -> bool {
        self.current_year.unsubscribe(id)
    }

    /// The year-page anchor sequence.
    pub const fn pages(&self) -> &AnchorSequence {
        self.tracker.pages()
    }

    /// Whether a surface has been attached.
    pub const fn is_attached(&self) -> bool {
        self.tracker.is_attached()
    }
}

impl fmt::Debug for YearPager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YearPager")
            .field("tracker", &self.tracker)
            .field("current_year", &self.current_year)
            .finish()
    }
}

/// Top-level month-granularity calendar manager.
///
/// Owns the month page tracker, the published `current_month` and
/// `selected_date` state, the year pager, and the optional datasource and
/// delegate collaborators. All mutation happens here, synchronously, on
/// the UI-event path; everything else reads or observes.
pub struct CalendarManager {
    config:        CalendarConfiguration,
    tracker:       PageTracker,
    years:         YearPager,
    current_month: Subject<CalendarDate>,
    selected_date: Subject<Option<CalendarDate>>,
    datasource:    Option<Box<dyn CalendarDataSource>>,
    delegate:      Option<Box<dyn CalendarDelegate>>,
}

impl CalendarManager {
    /// Creates a manager and its year pager over one configuration.
    pub fn new(config: CalendarConfiguration) -> Self {
        let pages = AnchorSequence::from_interval(config.interval(), Granularity::Month);
        let first = pages.first();
        Self {
            config,
            tracker: PageTracker::new(pages, ScrollPolicy::Always),
            years: YearPager::new(&config),
            current_month: Subject::new(first),
            selected_date: Subject::new(None),
            datasource: None,
            delegate: None,
        }
    }

    /// Installs the per-day decoration datasource.
    pub fn set_datasource(&mut self, datasource: impl CalendarDataSource + 'static) {
        self.datasource = Some(Box::new(datasource));
    }

    /// Installs the state-change delegate.
    pub fn set_delegate(&mut self, delegate: impl CalendarDelegate + 'static) {
        self.delegate = Some(Box::new(delegate));
    }

    /// The shared configuration.
    pub const fn configuration(&self) -> CalendarConfiguration {
        self.config
    }

    /// The month-page anchor sequence.
    pub const fn months(&self) -> &AnchorSequence {
        self.tracker.pages()
    }

    /// Read-only access to the owned year pager.
    pub const fn year_pager(&self) -> &YearPager {
        &self.years
    }

    /// Binds the month-page domain to a host surface. Idempotent; an
    /// initial month, when supplied on first attach, is scrolled to
    /// immediately.
    ///
    /// # Errors
    /// Propagates tracker errors from the initial scroll.
    pub fn attach(
        &mut self,
        surface: Box<dyn ScrollSurface>,
        initial_month: Option<CalendarDate>,
    ) -> Result<(), TrackerError> {
        self.tracker.attach(surface, initial_month)
    }

    /// Binds the year-page domain to its host surface (facade for the
    /// owned year pager).
    ///
    /// # Errors
    /// Propagates tracker errors.
    pub fn attach_year_surface(
        &mut self,
        surface: Box<dyn ScrollSurface>,
    ) -> Result<(), TrackerError> {
        self.years.attach(surface)
    }

    /// Scrolls to the month page covering `date`. Always issues the
    /// scroll command, even when already on the target page.
    ///
    /// # Errors
    /// Returns `TrackerError::NotAttached` before `attach`.
    pub fn scroll_to_month(&mut self, date: CalendarDate) -> Result<usize, TrackerError> {
        self.tracker.scroll_to_date(date)
    }

    /// Scrolls to the year page covering `date` (facade).
    ///
    /// # Errors
    /// Returns `TrackerError::NotAttached` before the year surface is
    /// attached.
    pub fn scroll_to_year(&mut self, date: CalendarDate) -> Result<usize, TrackerError> {
        self.years.scroll_to_year(date)
    }

    /// Convenience: scrolls back to `today`'s month and selects `today`.
    ///
    /// # Errors
    /// Returns `TrackerError::NotAttached` before `attach`; the selection
    /// is skipped when the scroll fails.
    pub fn scroll_back_to_today(&mut self, today: CalendarDate) -> Result<usize, TrackerError> {
        let index = self.scroll_to_month(today)?;
        self.select_date(today);
        Ok(index)
    }

    /// Marks `date` as selected and notifies the delegate. Never moves
    /// the current page.
    pub fn select_date(&mut self, date: CalendarDate) {
        tracing::trace!(%date, "day selected");
        self.selected_date.set(Some(date));
        if let Some(delegate) = self.delegate.as_deref_mut() {
            delegate.did_select_date(date);
        }
    }

    /// Host callback: month page `index` settled into view. On an actual
    /// anchor change this clears the selection, publishes the new current
    /// month and notifies the delegate; a repeat of the current index is
    /// a no-op.
    ///
    /// # Errors
    /// Returns `TrackerError::PageOutOfRange` for an unknown index.
    pub fn page_became_visible(&mut self, index: usize) -> Result<(), TrackerError> {
        if let Some(anchor) = self.tracker.page_became_visible(index)? {
            self.selected_date.set(None);
            self.current_month.set(anchor);
            if let Some(delegate) = self.delegate.as_deref_mut() {
                delegate.will_display_month(anchor);
            }
        }
        Ok(())
    }

    /// Host callback: year page `index` settled into view (facade).
    ///
    /// # Errors
    /// Returns `TrackerError::PageOutOfRange` for an unknown index.
    pub fn year_page_became_visible(&mut self, index: usize) -> Result<(), TrackerError> {
        self.years.page_became_visible(index)
    }

    /// Drill-down: a date on a year page was tapped; navigate the month
    /// pager to it.
    ///
    /// # Errors
    /// Returns `TrackerError::NotAttached` before `attach`.
    pub fn year_page_tapped(&mut self, date: CalendarDate) -> Result<usize, TrackerError> {
        // TODO: collapse the year pager before issuing the month scroll;
        // needs a dismiss hook on the host surface that does not exist yet.
        tracing::debug!(%date, "drilling down from year page");
        self.scroll_to_month(date)
    }

    /// Anchor date of the current month page.
    pub fn current_month(&self) -> CalendarDate {
        self.current_month.get()
    }

    /// The currently selected day, if any.
    pub fn selected_date(&self) -> Option<CalendarDate> {
        self.selected_date.get()
    }

    /// Anchor date of the current year page (facade).
    pub fn current_year(&self) -> CalendarDate {
        self.years.current_year()
    }

    /// Observes current-month changes.
    pub fn observe_current_month(
        &mut self,
        listener: impl FnMut(&CalendarDate) + 'static,
    ) -> ListenerId {
        self.current_month.subscribe(listener)
    }

    /// Observes selection changes, including clears.
    pub fn observe_selected_date(
        &mut self,
        listener: impl FnMut(&Option<CalendarDate>) + 'static,
    ) -> ListenerId {
        self.selected_date.subscribe(listener)
    }

    /// Observes current-year changes (facade).
    pub fn observe_current_year(
        &mut self,
        listener: impl FnMut(&CalendarDate) + 'static,
    ) -> ListenerId {
        self.years.observe_current_year(listener)
    }

    /// Drops a current-month listener.
    pub fn unobserve_current_month(&mut self, id: ListenerId) -> bool {
        self.current_month.unsubscribe(id)
    }

    /// Drops a selection listener.
    pub fn unobserve_selected_date(&mut self, id: ListenerId) -> bool {
        self.selected_date.unsubscribe(id)
    }

    /// Datasource query with the documented default of full opacity.
    pub fn day_opacity(&self, day: CalendarDate) -> f64 {
        self.datasource
            .as_deref()
            .map_or(OPAQUE, |datasource| datasource.opacity_for_day(day))
    }

    /// Datasource query with the documented default of an empty view.
    pub fn selected_day_view(&self, day: CalendarDate, size: Dimensions) -> SelectedDayView {
        self.datasource
            .as_deref()
            .map_or_else(SelectedDayView::default, |datasource| {
                datasource.view_for_selected_day(day, size)
            })
    }

    /// Read-only context for rendering components.
    pub const fn context(&self) -> CalendarContext<'_> {
        CalendarContext { manager: self }
    }
}

impl fmt::Debug for CalendarManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CalendarManager")
            .field("config", &self.config)
            .field("tracker", &self.tracker)
            .field("years", &self.years)
            .field("current_month", &self.current_month)
            .field("selected_date", &self.selected_date)
            .field("datasource", &self.datasource.is_some())
            .field("delegate", &self.delegate.is_some())
            .finish()
    }
}

/// Read-only derived access for rendering components.
///
/// Hands UI code everything it may query about the calendar without a
/// path to mutate it: configuration, current month/year, selection, and
/// the datasource-backed decoration queries.
#[derive(Clone, Copy)]
pub struct CalendarContext<'a> {
    manager: &'a CalendarManager,
}

impl CalendarContext<'_> {
    pub fn start_date(&self) -> CalendarDate {
        self.manager.config.start_date()
    }

    pub fn end_date(&self) -> CalendarDate {
        self.manager.config.end_date()
    }

    pub fn interval(&self) -> DateInterval {
        self.manager.config.interval()
    }

    pub fn theme(&self) -> Theme {
        self.manager.config.theme()
    }

    pub fn current_month(&self) -> CalendarDate {
        self.manager.current_month()
    }

    pub fn current_year(&self) -> CalendarDate {
        self.manager.current_year()
    }

    pub fn selected_date(&self) -> Option<CalendarDate> {
        self.manager.selected_date()
    }

    pub fn months(&self) -> &AnchorSequence {
        self.manager.months()
    }

    /// Pass-through sequence generation for ad-hoc sub-ranges.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidRange` if `end <= start`.
    pub fn generate_dates(
        &self,
        start: CalendarDate,
        end: CalendarDate,
        granularity: Granularity,
    ) -> Result<AnchorSequence, ConfigError> {
        AnchorSequence::generate(start, end, granularity)
    }

    pub fn day_opacity(&self, day: CalendarDate) -> f64 {
        self.manager.day_opacity(day)
    }

    pub fn selected_day_view(&self, day: CalendarDate, size: Dimensions) -> SelectedDayView {
        self.manager.selected_day_view(day, size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{
        DelegateEvent, RecordingDelegate, RecordingSurface, config, date,
    };
    use std::cell::RefCell;
    use std::rc::Rc;

    fn manager() -> CalendarManager {
        // 2020-01-15 .. 2022-01-01: 24 month pages, 2 year pages.
        CalendarManager::new(config((2020, 1, 15), (2022, 1, 1)))
    }

    #[test]
    fn new_manager_starts_on_first_pages() {
        let manager = manager();
        assert_eq!(manager.current_month(), date(2020, 1, 15));
        assert_eq!(manager.current_year(), date(2020, 1, 15));
        assert_eq!(manager.selected_date(), None);
        assert_eq!(manager.months().first(), date(2020, 1, 15));
        assert_eq!(manager.year_pager().pages().page_count(), 2);
    }

    #[test]
    fn attach_with_initial_month() {
        let mut manager = manager();
        let (surface, log) = RecordingSurface::new();
        manager
            .attach(Box::new(surface), Some(date(2020, 6, 10)))
            .unwrap();
        assert_eq!(*log.borrow(), vec![5]);
    }

    #[test]
    fn month_scroll_always_issues_command() {
        let mut manager = manager();
        let (surface, log) = RecordingSurface::new();
        manager.attach(Box::new(surface), None).unwrap();

        // Already on page 0: the month tracker still scrolls.
        manager.scroll_to_month(date(2020, 1, 20)).unwrap();
        manager.scroll_to_month(date(2020, 1, 20)).unwrap();
        assert_eq!(*log.borrow(), vec![0, 0]);
    }

    #[test]
    fn year_scroll_skips_when_on_target() {
        let mut manager = manager();
        let (surface, log) = RecordingSurface::new();
        manager.attach_year_surface(Box::new(surface)).unwrap();

        // Current year page is 0; scrolling to a 2020 date issues nothing.
        manager.scroll_to_year(date(2020, 6, 1)).unwrap();
        assert!(log.borrow().is_empty());

        manager.scroll_to_year(date(2021, 6, 1)).unwrap();
        assert_eq!(*log.borrow(), vec![1]);
    }

    #[test]
    fn page_change_clears_selection_and_notifies_once() {
        let mut manager = manager();
        let (delegate, events) = RecordingDelegate::new();
        manager.set_delegate(delegate);

        manager.select_date(date(2020, 1, 20));
        assert_eq!(manager.selected_date(), Some(date(2020, 1, 20)));

        manager.page_became_visible(1).unwrap();
        assert_eq!(manager.current_month(), date(2020, 2, 1));
        assert_eq!(manager.selected_date(), None);

        // Repeating the same index stays silent.
        manager.page_became_visible(1).unwrap();

        assert_eq!(
            *events.borrow(),
            vec![
                DelegateEvent::Selected(date(2020, 1, 20)),
                DelegateEvent::WillDisplay(date(2020, 2, 1)),
            ]
        );
    }

    #[test]
    fn no_op_page_visibility_keeps_selection() {
        let mut manager = manager();
        manager.page_became_visible(2).unwrap();
        manager.select_date(date(2020, 3, 14));

        // Re-render of the already-current page must not clear it.
        manager.page_became_visible(2).unwrap();
        assert_eq!(manager.selected_date(), Some(date(2020, 3, 14)));
    }

    #[test]
    fn selection_never_moves_the_page() {
        let mut manager = manager();
        manager.page_became_visible(3).unwrap();
        manager.select_date(date(2020, 9, 9));
        assert_eq!(manager.current_month(), date(2020, 4, 1));
        assert_eq!(manager.months().resolve(date(2020, 9, 9)), 8);
    }

    #[test]
    fn scroll_back_to_today_scrolls_and_selects() {
        let mut manager = manager();
        let (surface, log) = RecordingSurface::new();
        let (delegate, events) = RecordingDelegate::new();
        manager.set_delegate(delegate);
        manager.attach(Box::new(surface), None).unwrap();

        let today = date(2021, 3, 14);
        let index = manager.scroll_back_to_today(today).unwrap();
        assert_eq!(index, 14);
        assert_eq!(*log.borrow(), vec![14]);
        assert_eq!(manager.selected_date(), Some(today));
        assert_eq!(*events.borrow(), vec![DelegateEvent::Selected(today)]);
    }

    #[test]
    fn scroll_back_to_today_before_attach_selects_nothing() {
        let mut manager = manager();
        assert_eq!(
            manager.scroll_back_to_today(date(2021, 3, 14)),
            Err(TrackerError::NotAttached)
        );
        assert_eq!(manager.selected_date(), None);
    }

    #[test]
    fn year_page_tapped_drills_into_month() {
        let mut manager = manager();
        let (surface, log) = RecordingSurface::new();
        manager.attach(Box::new(surface), None).unwrap();

        let index = manager.year_page_tapped(date(2021, 5, 1)).unwrap();
        assert_eq!(index, 16);
        assert_eq!(*log.borrow(), vec![16]);
    }

    #[test]
    fn year_visibility_updates_current_year_through_facade() {
        let mut manager = manager();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        manager.observe_current_year(move |year| sink.borrow_mut().push(*year));

        manager.year_page_became_visible(1).unwrap();
        assert_eq!(manager.current_year(), date(2021, 1, 1));
        assert_eq!(*seen.borrow(), vec![date(2021, 1, 1)]);
    }

    #[test]
    fn observers_fire_in_order_and_unsubscribe() {
        let mut manager = manager();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let id = manager.observe_current_month(move |month| sink.borrow_mut().push(*month));

        manager.page_became_visible(1).unwrap();
        assert!(manager.unobserve_current_month(id));
        manager.page_became_visible(2).unwrap();

        assert_eq!(*seen.borrow(), vec![date(2020, 2, 1)]);
    }

    #[test]
    fn datasource_defaults_without_installation() {
        let manager = manager();
        assert!((manager.day_opacity(date(2020, 1, 20)) - 1.0).abs() < f64::EPSILON);
        assert_eq!(
            manager.selected_day_view(date(2020, 1, 20), Dimensions::new(320.0, 160.0)),
            SelectedDayView::Empty
        );
    }

    #[test]
    fn datasource_queries_are_forwarded() {
        struct HalfFaded;
        impl CalendarDataSource for HalfFaded {
            fn opacity_for_day(&self, _day: CalendarDate) -> f64 {
                0.5
            }
            fn view_for_selected_day(
                &self,
                day: CalendarDate,
                _size: Dimensions,
            ) -> SelectedDayView {
                SelectedDayView::Label(day.to_string())
            }
        }

        let mut manager = manager();
        manager.set_datasource(HalfFaded);
        assert!((manager.day_opacity(date(2020, 1, 20)) - 0.5).abs() < f64::EPSILON);
        assert_eq!(
            manager.selected_day_view(date(2020, 1, 20), Dimensions::default()),
            SelectedDayView::Label("2020-01-20".to_owned())
        );
    }

    #[test]
    fn context_exposes_read_only_state() {
        let mut manager = manager();
        manager.page_became_visible(1).unwrap();
        manager.select_date(date(2020, 2, 14));

        let context = manager.context();
        assert_eq!(context.start_date(), date(2020, 1, 15));
        assert_eq!(context.end_date(), date(2022, 1, 1));
        assert_eq!(context.theme(), Theme::default());
        assert_eq!(context.current_month(), date(2020, 2, 1));
        assert_eq!(context.current_year(), date(2020, 1, 15));
        assert_eq!(context.selected_date(), Some(date(2020, 2, 14)));
        assert_eq!(context.months().page_count(), 24);

        let spring = context
            .generate_dates(date(2020, 2, 1), date(2020, 5, 1), Granularity::Month)
            .unwrap();
        assert_eq!(spring.page_count(), 3);
    }
}
