//! Host environment capabilities.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every provider in [`crate::state`] receives an [`Environment`] at
//! construction instead of reaching for browser globals. The browser host
//! lives in [`browser`] (feature `hydrate`); [`memory`] is the in-process
//! host used by tests and by non-browser builds.
//!
//! ERROR HANDLING
//! ==============
//! Missing capabilities are `None`, never errors. Storage operations return
//! [`StorageError`] so callers can log what happened, but no caller in this
//! crate lets one escape.

#[cfg(feature = "hydrate")]
pub mod browser;
pub mod memory;

use std::fmt;
use std::rc::Rc;

pub use memory::{MemoryEnvironment, MemoryStorage};

/// Failure reported by a [`KeyValueStore`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// Storage is disabled, missing, or blocked by privacy settings.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    /// The write would exceed the medium's capacity; prior contents are intact.
    #[error("storage quota exceeded writing {bytes} bytes under {key}")]
    QuotaExceeded { key: String, bytes: usize },
    /// Any other failure raised by the medium.
    #[error("storage rejected operation: {0}")]
    Rejected(String),
}

/// Durable string key-value medium (browser `localStorage` or equivalent).
pub trait KeyValueStore {
    /// Read the value for `key`, `Ok(None)` when absent.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the medium cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`, replacing any prior value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the write is refused. A failed write
    /// must leave the prior value in place.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Deleting an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the medium cannot be modified.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Everything the site core needs from its host.
pub trait Environment {
    /// Current color-scheme preference: `Some(true)` for dark, `None` when the
    /// host has no media-preference capability.
    fn prefers_dark(&self) -> Option<bool>;

    /// Register for color-scheme change notifications.
    ///
    /// Returns `None` when the host cannot notify; the registration is removed
    /// when the returned handle is dropped.
    fn watch_color_scheme(&self, on_change: Rc<dyn Fn(bool)>) -> Option<Registration>;

    /// Current viewport width in logical pixels, `None` if unknown.
    fn viewport_width(&self) -> Option<f64>;

    /// Register for resize notifications carrying the new width.
    fn watch_resize(&self, on_resize: Rc<dyn Fn(f64)>) -> Option<Registration>;

    /// Durable storage scoped to the site origin.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] when no durable storage exists.
    fn storage(&self) -> Result<Rc<dyn KeyValueStore>, StorageError>;

    /// The page URL's query string, with or without the leading `?`.
    fn query_string(&self) -> Option<String>;
}

/// Host-level listener registration.
///
/// Owns the teardown for one host listener and runs it exactly once, either
/// on [`Registration::release`] or on drop.
pub struct Registration {
    teardown: Option<Box<dyn FnOnce()>>,
}

impl Registration {
    pub fn new(teardown: impl FnOnce() + 'static) -> Self {
        Self { teardown: Some(Box::new(teardown)) }
    }

    /// Remove the host listener now.
    pub fn release(mut self) {
        self.run_teardown();
    }

    fn run_teardown(&mut self) {
        if let Some(teardown) = self.teardown.take() {
            teardown();
        }
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.run_teardown();
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration").field("live", &self.teardown.is_some()).finish()
    }
}

/// The host this build runs in.
///
/// Browser builds use the page's window when one exists; everything else gets
/// an in-memory host with the safe baseline (light, wide, session storage).
#[must_use]
pub fn default_environment() -> Rc<dyn Environment> {
    #[cfg(feature = "hydrate")]
    {
        if let Some(browser) = browser::BrowserEnvironment::new() {
            return Rc::new(browser);
        }
        log::info!("no browser window; using in-memory environment");
    }
    Rc::new(MemoryEnvironment::new())
}
