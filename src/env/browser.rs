//! Browser host backed by `web-sys`.
//!
//! Wires the [`Environment`] capabilities to `matchMedia` change events, the
//! window `resize` event, `localStorage`, and `location.search`. Each watch
//! call owns its `Closure` inside the returned [`Registration`], so dropping
//! the registration both removes the DOM listener and frees the closure.

use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use web_sys::{MediaQueryList, MediaQueryListEvent, Storage, Window};

use super::{Environment, KeyValueStore, Registration, StorageError};
use crate::consts::DARK_SCHEME_QUERY;

/// The page's `window`, viewed as a site host.
pub struct BrowserEnvironment {
    window: Window,
}

impl BrowserEnvironment {
    /// `None` outside a browsing context (workers, SSR).
    #[must_use]
    pub fn new() -> Option<Self> {
        web_sys::window().map(|window| Self { window })
    }

    fn dark_query(&self) -> Option<MediaQueryList> {
        match self.window.match_media(DARK_SCHEME_QUERY) {
            Ok(query) => query,
            Err(err) => {
                log::debug!("matchMedia unavailable: {err:?}");
                None
            }
        }
    }
}

fn read_width(window: &Window) -> Option<f64> {
    match window.inner_width() {
        Ok(width) => width.as_f64(),
        Err(err) => {
            log::debug!("innerWidth unavailable: {err:?}");
            None
        }
    }
}

impl Environment for BrowserEnvironment {
    fn prefers_dark(&self) -> Option<bool> {
        self.dark_query().map(|query| query.matches())
    }

    fn watch_color_scheme(&self, on_change: Rc<dyn Fn(bool)>) -> Option<Registration> {
        let query = self.dark_query()?;
        let closure = Closure::<dyn FnMut(MediaQueryListEvent)>::new(move |event: MediaQueryListEvent| {
            on_change(event.matches());
        });
        if let Err(err) = query.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref()) {
            log::debug!("color scheme listener refused: {err:?}");
            return None;
        }
        Some(Registration::new(move || {
            if let Err(err) = query.remove_event_listener_with_callback("change", closure.as_ref().unchecked_ref()) {
                log::debug!("color scheme listener removal failed: {err:?}");
            }
        }))
    }

    fn viewport_width(&self) -> Option<f64> {
        read_width(&self.window)
    }

    fn watch_resize(&self, on_resize: Rc<dyn Fn(f64)>) -> Option<Registration> {
        let source = self.window.clone();
        let closure = Closure::<dyn FnMut()>::new(move || {
            if let Some(width) = read_width(&source) {
                on_resize(width);
            }
        });
        if let Err(err) = self.window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref()) {
            log::debug!("resize listener refused: {err:?}");
            return None;
        }
        let window = self.window.clone();
        Some(Registration::new(move || {
            if let Err(err) = window.remove_event_listener_with_callback("resize", closure.as_ref().unchecked_ref()) {
                log::debug!("resize listener removal failed: {err:?}");
            }
        }))
    }

    fn storage(&self) -> Result<Rc<dyn KeyValueStore>, StorageError> {
        match self.window.local_storage() {
            Ok(Some(storage)) => Ok(Rc::new(LocalStorage { storage })),
            Ok(None) => Err(StorageError::Unavailable("localStorage missing".to_owned())),
            Err(err) => Err(StorageError::Unavailable(describe(&err))),
        }
    }

    fn query_string(&self) -> Option<String> {
        match self.window.location().search() {
            Ok(search) => Some(search),
            Err(err) => {
                log::debug!("location.search unavailable: {err:?}");
                None
            }
        }
    }
}

/// `window.localStorage` as a [`KeyValueStore`].
struct LocalStorage {
    storage: Storage,
}

fn describe(err: &JsValue) -> String {
    match err.dyn_ref::<web_sys::DomException>() {
        Some(exception) => format!("{}: {}", exception.name(), exception.message()),
        None => format!("{err:?}"),
    }
}

fn is_quota_error(err: &JsValue) -> bool {
    err.dyn_ref::<web_sys::DomException>()
        .is_some_and(|exception| exception.name() == "QuotaExceededError")
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage
            .get_item(key)
            .map_err(|err| StorageError::Unavailable(describe(&err)))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage.set_item(key, value).map_err(|err| {
            if is_quota_error(&err) {
                StorageError::QuotaExceeded { key: key.to_owned(), bytes: value.len() }
            } else {
                StorageError::Rejected(describe(&err))
            }
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.storage
            .remove_item(key)
            .map_err(|err| StorageError::Rejected(describe(&err)))
    }
}
