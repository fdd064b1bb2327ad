//! Binds an anchor sequence to a linear page index on a host scroll
//! surface, and folds the host's visibility callbacks back into
//! current-page state.

use std::fmt;

use crate::CalendarDate;
use crate::sequence::AnchorSequence;

/// Capability consumed from the host: issue a scroll command to a page.
/// The host answers asynchronously through `page_became_visible` once the
/// scroll settles.
pub trait ScrollSurface {
    fn scroll_to_page(&mut self, index: usize);
}

/// Whether a scroll command is issued when the target page is already
/// current. The month tracker always scrolls; the year tracker skips the
/// redundant command. Intentional asymmetry, kept from the original design.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollPolicy {
    Always,
    SkipWhenCurrent,
}

/// Error type for page-tracker operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrackerError {
    /// A scroll was requested before a surface was attached.
    #[error("Tracker is not attached to a scroll surface")]
    NotAttached,

    /// A page index outside the tracked domain.
    #[error("Page index {index} out of range (0..{count})")]
    PageOutOfRange { index: usize, count: usize },
}

/// Tracks which page of an [`AnchorSequence`] is current and converts
/// between semantic dates and page indices.
///
/// The tracker is the single writer of current-page state; everything
/// else observes. It starts detached: scroll requests before [`attach`]
/// fail with [`TrackerError::NotAttached`] instead of faulting.
///
/// [`attach`]: PageTracker::attach
pub struct PageTracker {
    pages:   AnchorSequence,
    current: usize,
    policy:  ScrollPolicy,
    surface: Option<Box<dyn ScrollSurface>>,
}

impl PageTracker {
    /// Creates a detached tracker over `pages`, current page 0.
    pub fn new(pages: AnchorSequence, policy: ScrollPolicy) -> Self {
        Self {
            pages,
            current: 0,
            policy,
            surface: None,
        }
    }

    /// Binds the page domain to a host surface. Idempotent: a second call
    /// keeps the first surface and ignores the new one. When an initial
    /// target date is supplied on first attach, it is resolved to a page
    /// and a scroll command is issued immediately.
    ///
    /// # Errors
    /// Propagates `scroll_to_date` errors for the initial target.
    pub fn attach(
        &mut self,
        surface: Box<dyn ScrollSurface>,
        initial: Option<CalendarDate>,
    ) -> Result<(), TrackerError> {
        if self.surface.is_some() {
            tracing::debug!("tracker already attached, ignoring surface");
            return Ok(());
        }
        self.surface = Some(surface);
        if let Some(target) = initial {
            self.scroll_to_date(target)?;
        }
        Ok(())
    }

    /// Whether a surface has been attached.
    pub const fn is_attached(&self) -> bool {
        self.surface.is_some()
    }

    /// Resolves `date` to its covering page and scrolls there. Returns
    /// the resolved index.
    ///
    /// # Errors
    /// Returns `TrackerError::NotAttached` before [`PageTracker::attach`].
    pub fn scroll_to_date(&mut self, date: CalendarDate) -> Result<usize, TrackerError> {
        let index = self.pages.resolve(date);
        self.scroll_to_index(index)?;
        Ok(index)
    }

    /// Requests a host scroll to page `index`, subject to the tracker's
    /// [`ScrollPolicy`].
    ///
    /// # Errors
    /// `NotAttached` before attach; `PageOutOfRange` for an index outside
    /// the page domain.
    pub fn scroll_to_index(&mut self, index: usize) -> Result<(), TrackerError> {
        let count = self.pages.page_count();
        if index >= count {
            return Err(TrackerError::PageOutOfRange { index, count });
        }
        let surface = self.surface.as_deref_mut().ok_or(TrackerError::NotAttached)?;

        if self.policy == ScrollPolicy::SkipWhenCurrent && index == self.current {
            tracing::debug!(index, "already on target page, skipping scroll command");
            return Ok(());
        }

        tracing::debug!(index, "issuing scroll command");
        surface.scroll_to_page(index);
        Ok(())
    }

    /// Host callback: page `index` settled into view. Updates the current
    /// index and returns the new anchor date, or `None` when the anchor
    /// did not change (de-duplicated, so a no-op re-render never fans out
    /// downstream notifications).
    ///
    /// # Errors
    /// `PageOutOfRange` for an index outside the page domain.
    pub fn page_became_visible(
        &mut self,
        index: usize,
    ) -> Result<Option<CalendarDate>, TrackerError> {
        let anchor = self
            .pages
            .get(index)
            .ok_or(TrackerError::PageOutOfRange {
                index,
                count: self.pages.page_count(),
            })?;

        let changed = index != self.current;
        self.current = index;
        if changed {
            tracing::trace!(index, %anchor, "page became visible");
            Ok(Some(anchor))
        } else {
            Ok(None)
        }
    }

    /// Index of the current page.
    pub const fn current_index(&self) -> usize {
        self.current
    }

    /// Anchor date of the current page. Total: the sequence is non-empty
    /// and `current` stays inside the page domain.
    pub fn current_anchor(&self) -> CalendarDate {
        self.pages
            .get(self.current)
            .unwrap_or_else(|| self.pages.first())
    }

    /// The tracked anchor sequence.
    pub const fn pages(&self) -> &AnchorSequence {
        &self.pages
    }
}

impl fmt::Debug for PageTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageTracker")
            .field("pages", &self.pages.page_count())
            .field("current", &self.current)
            .field("policy", &self.policy)
            .field("attached", &self.surface.is_some())
            .finish()
    }
}
