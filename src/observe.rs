//! Listener registry and subscription handles.
//!
//! DESIGN
//! ======
//! Everything here runs on the UI thread, so listeners are `Rc<dyn Fn>` and
//! registries live behind `RefCell`. Notification always snapshots the
//! listener list and releases the borrow before invoking anything, which lets
//! a listener unsubscribe itself (or anyone else) mid-dispatch.

#[cfg(test)]
#[path = "observe_test.rs"]
mod observe_test;

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A change listener receiving the new value.
pub type Listener<T> = Rc<dyn Fn(T)>;

/// Opaque identifier handed out by [`Listeners::add`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Ordered set of listeners keyed by [`ListenerId`].
pub struct Listeners<T> {
    next_id: u64,
    entries: Vec<(ListenerId, Listener<T>)>,
}

impl<T> Default for Listeners<T> {
    fn default() -> Self {
        Self { next_id: 0, entries: Vec::new() }
    }
}

impl<T> fmt::Debug for Listeners<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners").field("len", &self.entries.len()).finish()
    }
}

impl<T> Listeners<T> {
    pub fn add(&mut self, listener: Listener<T>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    /// Remove a listener. Returns `false` if it was already gone.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clone the current listeners in registration order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Listener<T>> {
        self.entries.iter().map(|(_, listener)| Rc::clone(listener)).collect()
    }
}

/// Invoke every listener in `listeners` with `value`.
///
/// The registry is not borrowed while listeners run.
pub fn emit<T: Clone>(listeners: &RefCell<Listeners<T>>, value: &T) {
    let snapshot = listeners.borrow().snapshot();
    for listener in snapshot {
        listener(value.clone());
    }
}

/// Handle returned by `on_change`.
///
/// `unsubscribe` may be called any number of times; only the first call does
/// anything. Dropping the handle unsubscribes as well.
#[must_use = "dropping a Subscription unsubscribes its listener"]
pub struct Subscription {
    cancel: RefCell<Option<Box<dyn FnOnce()>>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self { cancel: RefCell::new(Some(Box::new(cancel))) }
    }

    /// A subscription that was never attached to anything.
    pub fn inert() -> Self {
        Self { cancel: RefCell::new(None) }
    }

    /// Combine several subscriptions into one handle.
    pub fn merge(parts: Vec<Subscription>) -> Self {
        Self::new(move || {
            for part in &parts {
                part.unsubscribe();
            }
        })
    }

    pub fn unsubscribe(&self) {
        let cancel = self.cancel.borrow_mut().take();
        if let Some(cancel) = cancel {
            cancel();
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.cancel.borrow().is_some()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("active", &self.is_active()).finish()
    }
}
