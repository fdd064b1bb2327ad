//! Explicit subject/observer cells for published calendar state.
//!
//! Replaces implicit reactive property wrappers with a plain object:
//! exactly one owner mutates a [`Subject`], every registered listener is
//! notified synchronously and in subscription order.

use std::fmt;

/// Handle identifying a registered listener, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener<T> = Box<dyn FnMut(&T)>;

/// An observable value cell.
///
/// Single-threaded by design: the calendar model is UI-thread-bound, so
/// listeners are plain `FnMut` closures with no `Send`/`Sync` bounds.
pub struct Subject<T> {
    value:     T,
    next_id:   u64,
    listeners: Vec<(ListenerId, Listener<T>)>,
}

impl<T> Subject<T> {
    /// Creates a subject holding `initial` with no listeners.
    pub fn new(initial: T) -> Self {
        Self {
            value:     initial,
            next_id:   0,
            listeners: Vec::new(),
        }
    }

    /// Returns a reference to the current value.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Registers a listener, returning its id. Listeners run in
    /// subscription order on every subsequent `set`.
    pub fn subscribe(&mut self, listener: impl FnMut(&T) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns false if the id was already gone.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Replaces the value and notifies every listener.
    pub fn set(&mut self, value: T) {
        self.value = value;
        for (_, listener) in &mut self.listeners {
            listener(&self.value);
        }
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl<T: Copy> Subject<T> {
    /// Returns a copy of the current value.
    pub fn get(&self) -> T {
        self.value
    }
}

impl<T: PartialEq> Subject<T> {
    /// Replaces the value only if it differs, notifying listeners on a
    /// change and staying silent otherwise. Returns whether it changed.
    pub fn set_if_changed(&mut self, value: T) -> bool {
        if self.value == value {
            return false;
        }
        self.set(value);
        true
    }
}

impl<T: fmt::Debug> fmt::Debug for Subject<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subject")
            .field("value", &self.value)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
