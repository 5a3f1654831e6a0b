#[cfg(test)]
#[path = "color_scheme_test.rs"]
mod color_scheme_test;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::env::{Environment, Registration};
use crate::observe::{Listeners, Subscription, emit};

/// The host's color-scheme preference.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorSchemePreference {
    #[default]
    Light,
    Dark,
}

impl ColorSchemePreference {
    #[must_use]
    pub fn from_dark(dark: bool) -> Self {
        if dark { Self::Dark } else { Self::Light }
    }

    #[must_use]
    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }

    /// Read the host preference. Hosts without media support count as light.
    #[must_use]
    pub fn sample(env: &dyn Environment) -> Self {
        env.prefers_dark().map_or(Self::Light, Self::from_dark)
    }
}

struct Shared {
    current: Cell<ColorSchemePreference>,
    listeners: RefCell<Listeners<ColorSchemePreference>>,
    registration: RefCell<Option<Registration>>,
}

/// Live view of the host color-scheme preference.
///
/// Holds one host registration from construction until its last listener
/// unsubscribes, and re-registers on the next `on_change`. Every host
/// notification updates the value and is forwarded to all listeners, in
/// registration order.
pub struct PreferenceWatcher {
    env: Rc<dyn Environment>,
    shared: Rc<Shared>,
}

impl PreferenceWatcher {
    pub fn new(env: Rc<dyn Environment>) -> Self {
        let shared = Shared {
            current: Cell::new(ColorSchemePreference::sample(env.as_ref())),
            listeners: RefCell::new(Listeners::default()),
            registration: RefCell::new(None),
        };
        let watcher = Self { env, shared: Rc::new(shared) };
        watcher.attach();
        watcher
    }

    /// The preference as of the latest host notification.
    ///
    /// While detached the host is sampled directly.
    #[must_use]
    pub fn current(&self) -> ColorSchemePreference {
        if !self.is_attached() {
            self.shared.current.set(ColorSchemePreference::sample(self.env.as_ref()));
        }
        self.shared.current.get()
    }

    #[must_use]
    pub fn is_dark(&self) -> bool {
        self.current().is_dark()
    }

    /// Call `listener` on every color-scheme notification until unsubscribed.
    ///
    /// Unsubscribing the last listener tears down the host registration.
    pub fn on_change(&self, listener: impl Fn(ColorSchemePreference) + 'static) -> Subscription {
        if !self.is_attached() {
            self.shared.current.set(ColorSchemePreference::sample(self.env.as_ref()));
            self.attach();
        }
        let id = self.shared.listeners.borrow_mut().add(Rc::new(listener));
        let shared = Rc::downgrade(&self.shared);
        Subscription::new(move || {
            let Some(shared) = shared.upgrade() else {
                return;
            };
            let drained = {
                let mut listeners = shared.listeners.borrow_mut();
                listeners.remove(id) && listeners.is_empty()
            };
            if drained {
                let released = shared.registration.borrow_mut().take();
                drop(released);
            }
        })
    }

    /// Whether a host registration is currently held.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.shared.registration.borrow().is_some()
    }

    fn attach(&self) {
        let shared = Rc::downgrade(&self.shared);
        let registration = self.env.watch_color_scheme(Rc::new(move |dark: bool| {
            let Some(shared) = shared.upgrade() else {
                return;
            };
            let value = ColorSchemePreference::from_dark(dark);
            shared.current.set(value);
            emit(&shared.listeners, &value);
        }));
        *self.shared.registration.borrow_mut() = registration;
    }
}
