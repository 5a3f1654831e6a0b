//! Admin-replaceable site images persisted in local storage.
//!
//! SYSTEM CONTEXT
//! ==============
//! Pages render images through [`ImageOverrideStore::resolve`], passing the
//! stock URL as fallback. When an admin uploads a replacement, it is encoded
//! as an inline data URI and stored under the image's key (one entry per key,
//! last write wins). Resetting deletes the entry.
//!
//! ERROR HANDLING
//! ==============
//! Nothing here fails outward. Unreadable or malformed entries resolve to the
//! fallback. Rejected writes (quota) leave the previous entry in effect. If
//! the medium is unavailable, the store switches to a session-only map for
//! the rest of its life.
//!
//! The store does not check the admin flag; callers obtain it through
//! [`crate::state::admin::AdminFlag::gate`].

#[cfg(test)]
#[path = "images_test.rs"]
mod images_test;

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::env::{Environment, KeyValueStore, StorageError};
use crate::util::data_uri;

/// What an `<img src>` should point at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageSource {
    /// A stored inline payload (`data:` URI).
    Override(String),
    /// The caller-supplied stock URL.
    Fallback(String),
}

impl ImageSource {
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::Override(url) | Self::Fallback(url) => url,
        }
    }

    #[must_use]
    pub fn into_url(self) -> String {
        match self {
            Self::Override(url) | Self::Fallback(url) => url,
        }
    }

    #[must_use]
    pub fn is_override(&self) -> bool {
        matches!(self, Self::Override(_))
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url())
    }
}

enum Backend {
    Durable(Rc<dyn KeyValueStore>),
    Session(HashMap<String, String>),
}

/// Key-value image overrides over the host's durable storage.
pub struct ImageOverrideStore {
    backend: RefCell<Backend>,
}

impl ImageOverrideStore {
    /// Open the host's storage, or fall back to session memory if it has none.
    pub fn new(env: &dyn Environment) -> Self {
        let backend = match env.storage() {
            Ok(store) => Backend::Durable(store),
            Err(err) => {
                log::info!("image overrides kept for this session only: {err}");
                Backend::Session(HashMap::new())
            }
        };
        Self { backend: RefCell::new(backend) }
    }

    pub fn with_store(store: Rc<dyn KeyValueStore>) -> Self {
        Self { backend: RefCell::new(Backend::Durable(store)) }
    }

    /// `false` once overrides no longer survive a reload.
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        matches!(*self.backend.borrow(), Backend::Durable(_))
    }

    /// The stored override for `key` if present and well-formed, else `fallback_url`.
    pub fn resolve(&self, key: &str, fallback_url: &str) -> ImageSource {
        match self.read(key) {
            Some(payload) => ImageSource::Override(payload),
            None => ImageSource::Fallback(fallback_url.to_owned()),
        }
    }

    /// Store `bytes` as the override for `key`, detecting the image type.
    pub fn set_override(&self, key: &str, bytes: &[u8]) -> ImageSource {
        self.set_override_with_mime(key, data_uri::sniff_mime(bytes), bytes)
    }

    /// Store `bytes` as the override for `key` with a caller-known type.
    ///
    /// A malformed `mime` is replaced by the sniffed type. The returned source
    /// is the new payload even when persisting it failed, so the current
    /// render still shows the upload.
    pub fn set_override_with_mime(&self, key: &str, mime: &str, bytes: &[u8]) -> ImageSource {
        let mime = if data_uri::is_valid_mime(mime) { mime } else { data_uri::sniff_mime(bytes) };
        let payload = data_uri::encode(mime, bytes);
        self.write(key, &payload);
        ImageSource::Override(payload)
    }

    /// Delete the override for `key` (absent is fine) and return the fallback.
    pub fn clear_override(&self, key: &str, fallback_url: &str) -> ImageSource {
        self.delete(key);
        ImageSource::Fallback(fallback_url.to_owned())
    }

    fn read(&self, key: &str) -> Option<String> {
        let raw = match &*self.backend.borrow() {
            Backend::Durable(store) => store.get(key),
            Backend::Session(entries) => Ok(entries.get(key).cloned()),
        };
        let raw = match raw {
            Ok(raw) => raw?,
            Err(err) => {
                self.absorb(key, &err);
                return None;
            }
        };
        match data_uri::parse(&raw) {
            Ok(_) => Some(raw),
            Err(err) => {
                log::debug!("ignoring unreadable image override {key}: {err}");
                None
            }
        }
    }

    fn write(&self, key: &str, payload: &str) {
        let result = match &mut *self.backend.borrow_mut() {
            Backend::Durable(store) => store.set(key, payload),
            Backend::Session(entries) => {
                entries.insert(key.to_owned(), payload.to_owned());
                Ok(())
            }
        };
        if let Err(err) = result {
            if self.absorb(key, &err) {
                self.write(key, payload);
            }
        }
    }

    fn delete(&self, key: &str) {
        let result = match &mut *self.backend.borrow_mut() {
            Backend::Durable(store) => store.remove(key),
            Backend::Session(entries) => {
                entries.remove(key);
                Ok(())
            }
        };
        if let Err(err) = result {
            self.absorb(key, &err);
        }
    }

    /// Log a storage failure; switch to session memory if the medium is gone.
    ///
    /// Returns `true` when the store degraded and the operation may be retried.
    fn absorb(&self, key: &str, err: &StorageError) -> bool {
        match err {
            StorageError::Unavailable(_) => {
                log::info!("image override storage lost while handling {key}: {err}; continuing in memory");
                *self.backend.borrow_mut() = Backend::Session(HashMap::new());
                true
            }
            StorageError::QuotaExceeded { .. } | StorageError::Rejected(_) => {
                log::debug!("image override for {key} not saved: {err}");
                false
            }
        }
    }
}
