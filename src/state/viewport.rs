#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::consts::NARROW_BREAKPOINT_PX;
use crate::env::{Environment, Registration};
use crate::observe::{Listeners, Subscription, emit};

/// Coarse viewport size class used for responsive layout decisions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewportClass {
    Narrow,
    #[default]
    Wide,
}

impl ViewportClass {
    /// `Narrow` when `width < breakpoint`, otherwise `Wide`.
    #[must_use]
    pub fn classify(width: f64, breakpoint: f64) -> Self {
        if width < breakpoint { Self::Narrow } else { Self::Wide }
    }

    #[must_use]
    pub fn is_narrow(self) -> bool {
        self == Self::Narrow
    }

    /// CSS `background-attachment` for full-page hero backgrounds.
    ///
    /// Mobile browsers repaint fixed backgrounds poorly, so narrow viewports scroll.
    #[must_use]
    pub fn background_attachment(self) -> &'static str {
        match self {
            Self::Narrow => "scroll",
            Self::Wide => "fixed",
        }
    }

    fn sample(env: &dyn Environment, breakpoint: f64) -> Self {
        env.viewport_width().map_or(Self::Wide, |width| Self::classify(width, breakpoint))
    }
}

struct Shared {
    breakpoint: f64,
    current: Cell<ViewportClass>,
    listeners: RefCell<Listeners<ViewportClass>>,
    registration: RefCell<Option<Registration>>,
}

/// Live narrow/wide classification of the host viewport.
///
/// Listeners hear about class transitions only; resizes that stay on the same
/// side of the breakpoint are absorbed.
pub struct ViewportClassifier {
    env: Rc<dyn Environment>,
    shared: Rc<Shared>,
}

impl ViewportClassifier {
    pub fn new(env: Rc<dyn Environment>) -> Self {
        Self::with_breakpoint(env, NARROW_BREAKPOINT_PX)
    }

    pub fn with_breakpoint(env: Rc<dyn Environment>, breakpoint: f64) -> Self {
        let shared = Shared {
            breakpoint,
            current: Cell::new(ViewportClass::sample(env.as_ref(), breakpoint)),
            listeners: RefCell::new(Listeners::default()),
            registration: RefCell::new(None),
        };
        let classifier = Self { env, shared: Rc::new(shared) };
        classifier.attach();
        classifier
    }

    #[must_use]
    pub fn breakpoint(&self) -> f64 {
        self.shared.breakpoint
    }

    #[must_use]
    pub fn current(&self) -> ViewportClass {
        if !self.is_attached() {
            self.resample();
        }
        self.shared.current.get()
    }

    #[must_use]
    pub fn is_narrow(&self) -> bool {
        self.current().is_narrow()
    }

    /// Call `listener` whenever the class flips, until unsubscribed.
    pub fn on_change(&self, listener: impl Fn(ViewportClass) + 'static) -> Subscription {
        if !self.is_attached() {
            self.resample();
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

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.shared.registration.borrow().is_some()
    }

    fn resample(&self) {
        self.shared.current.set(ViewportClass::sample(self.env.as_ref(), self.shared.breakpoint));
    }

    fn attach(&self) {
        let shared = Rc::downgrade(&self.shared);
        let registration = self.env.watch_resize(Rc::new(move |width: f64| {
            let Some(shared) = shared.upgrade() else {
                return;
            };
            let next = ViewportClass::classify(width, shared.breakpoint);
            if shared.current.replace(next) != next {
                emit(&shared.listeners, &next);
            }
        }));
        *self.shared.registration.borrow_mut() = registration;
    }
}
