//! In-process host environment.
//!
//! Serves two roles: the fake host every provider test runs against, and the
//! environment non-browser builds (SSR, native tools) render with. Hosts are
//! configured with builder methods before being shared, then driven through
//! `&self` mutators that dispatch notifications synchronously, the way a
//! browser event loop would.

#[cfg(test)]
#[path = "memory_test.rs"]
mod memory_test;

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use super::{Environment, KeyValueStore, Registration, StorageError};
use crate::observe::{Listeners, emit};

/// String map with optional byte capacity, standing in for `localStorage`.
#[derive(Debug)]
pub struct MemoryStorage {
    entries: RefCell<BTreeMap<String, String>>,
    capacity: Option<usize>,
    available: Cell<bool>,
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self { entries: RefCell::new(BTreeMap::new()), capacity: None, available: Cell::new(true) }
    }

    /// Storage that refuses writes pushing total key+value bytes past `bytes`.
    #[must_use]
    pub fn with_capacity(bytes: usize) -> Self {
        Self { capacity: Some(bytes), ..Self::new() }
    }

    /// Simulate the medium being switched off (or back on) mid-session.
    pub fn set_available(&self, available: bool) {
        self.available.set(available);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Total bytes of keys and values currently stored.
    #[must_use]
    pub fn used_bytes(&self) -> usize {
        self.entries.borrow().iter().map(|(k, v)| k.len() + v.len()).sum()
    }

    fn check_available(&self) -> Result<(), StorageError> {
        if self.available.get() {
            Ok(())
        } else {
            Err(StorageError::Unavailable("memory storage disabled".to_owned()))
        }
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.check_available()?;
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check_available()?;
        if let Some(capacity) = self.capacity {
            let replaced = self.entries.borrow().get(key).map_or(0, |old| key.len() + old.len());
            let needed = self.used_bytes() - replaced + key.len() + value.len();
            if needed > capacity {
                return Err(StorageError::QuotaExceeded { key: key.to_owned(), bytes: value.len() });
            }
        }
        self.entries.borrow_mut().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.check_available()?;
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Scriptable host: color scheme, viewport width, storage and query string.
pub struct MemoryEnvironment {
    prefers_dark: Cell<Option<bool>>,
    width: Cell<Option<f64>>,
    storage: Option<Rc<MemoryStorage>>,
    query: Option<String>,
    scheme_listeners: Rc<RefCell<Listeners<bool>>>,
    resize_listeners: Rc<RefCell<Listeners<f64>>>,
}

impl Default for MemoryEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryEnvironment {
    /// Light scheme, unknown width, fresh session storage, no query string.
    #[must_use]
    pub fn new() -> Self {
        Self {
            prefers_dark: Cell::new(Some(false)),
            width: Cell::new(None),
            storage: Some(Rc::new(MemoryStorage::new())),
            query: None,
            scheme_listeners: Rc::new(RefCell::new(Listeners::default())),
            resize_listeners: Rc::new(RefCell::new(Listeners::default())),
        }
    }

    #[must_use]
    pub fn with_dark(self, dark: bool) -> Self {
        self.prefers_dark.set(Some(dark));
        self
    }

    /// Host without a media-preference capability.
    #[must_use]
    pub fn without_media_support(self) -> Self {
        self.prefers_dark.set(None);
        self
    }

    #[must_use]
    pub fn with_width(self, width: f64) -> Self {
        self.width.set(Some(width));
        self
    }

    /// Share `storage` with this host (and any other host given the same one).
    #[must_use]
    pub fn with_storage(mut self, storage: Rc<MemoryStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Host whose storage is disabled outright.
    #[must_use]
    pub fn without_storage(mut self) -> Self {
        self.storage = None;
        self
    }

    #[must_use]
    pub fn with_query(mut self, query: &str) -> Self {
        self.query = Some(query.to_owned());
        self
    }

    /// Change the color-scheme preference and notify registered watchers.
    ///
    /// Ignored when media support was disabled.
    pub fn set_prefers_dark(&self, dark: bool) {
        if self.prefers_dark.get().is_none() {
            return;
        }
        self.prefers_dark.set(Some(dark));
        emit(&self.scheme_listeners, &dark);
    }

    /// Change the viewport width and notify registered watchers.
    pub fn resize(&self, width: f64) {
        self.width.set(Some(width));
        emit(&self.resize_listeners, &width);
    }

    /// Live color-scheme registrations held against this host.
    #[must_use]
    pub fn scheme_registrations(&self) -> usize {
        self.scheme_listeners.borrow().len()
    }

    /// Live resize registrations held against this host.
    #[must_use]
    pub fn resize_registrations(&self) -> usize {
        self.resize_listeners.borrow().len()
    }

    #[must_use]
    pub fn memory_storage(&self) -> Option<Rc<MemoryStorage>> {
        self.storage.clone()
    }
}

fn register<T: 'static>(listeners: &Rc<RefCell<Listeners<T>>>, listener: Rc<dyn Fn(T)>) -> Registration {
    let id = listeners.borrow_mut().add(listener);
    let registry = Rc::downgrade(listeners);
    Registration::new(move || {
        if let Some(registry) = registry.upgrade() {
            registry.borrow_mut().remove(id);
        }
    })
}

impl Environment for MemoryEnvironment {
    fn prefers_dark(&self) -> Option<bool> {
        self.prefers_dark.get()
    }

    fn watch_color_scheme(&self, on_change: Rc<dyn Fn(bool)>) -> Option<Registration> {
        self.prefers_dark.get()?;
        Some(register(&self.scheme_listeners, on_change))
    }

    fn viewport_width(&self) -> Option<f64> {
        self.width.get()
    }

    fn watch_resize(&self, on_resize: Rc<dyn Fn(f64)>) -> Option<Registration> {
        Some(register(&self.resize_listeners, on_resize))
    }

    fn storage(&self) -> Result<Rc<dyn KeyValueStore>, StorageError> {
        match &self.storage {
            Some(storage) => Ok(Rc::clone(storage) as Rc<dyn KeyValueStore>),
            None => Err(StorageError::Unavailable("storage disabled for this host".to_owned())),
        }
    }

    fn query_string(&self) -> Option<String> {
        self.query.clone()
    }
}
