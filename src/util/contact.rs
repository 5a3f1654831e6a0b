//! Contact form hand-off to the visitor's mail client.
//!
//! The Contact page has no backend. Submitting composes a `mailto:` link with
//! a fixed subject and a plain-text body listing the form fields, and the
//! presentation layer navigates to it.

#[cfg(test)]
#[path = "contact_test.rs"]
mod contact_test;

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::config::SiteConfig;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContactError {
    #[error("{0} is required")]
    MissingField(&'static str),
}

/// Contact form contents as typed by the visitor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

impl ContactDraft {
    /// Name and email are required; phone and message are optional.
    ///
    /// # Errors
    ///
    /// Returns [`ContactError::MissingField`] for the first blank required field.
    pub fn validate(&self) -> Result<(), ContactError> {
        if self.name.trim().is_empty() {
            return Err(ContactError::MissingField("name"));
        }
        if self.email.trim().is_empty() {
            return Err(ContactError::MissingField("email"));
        }
        Ok(())
    }

    /// Plain-text mail body with the fields exactly as typed.
    #[must_use]
    pub fn body(&self) -> String {
        format!("Name: {}\nEmail: {}\nPhone: {}\n\n{}", self.name, self.email, self.phone, self.message)
    }

    /// The `mailto:` link for this draft.
    ///
    /// # Errors
    ///
    /// Returns [`ContactError`] when a required field is blank.
    pub fn mailto(&self, config: &SiteConfig) -> Result<String, ContactError> {
        self.validate()?;
        Ok(format!(
            "mailto:{}?subject={}&body={}",
            config.contact_email,
            encode_component(&config.quote_subject),
            encode_component(&self.body())
        ))
    }
}

/// Percent-encode for a URI component, spaces as `%20`.
///
/// `form_urlencoded` writes spaces as `+` and escapes a literal `+` as `%2B`,
/// so swapping every remaining `+` is exact. Mail clients do not decode `+`.
#[must_use]
pub fn encode_component(raw: &str) -> String {
    form_urlencoded::byte_serialize(raw.as_bytes()).collect::<String>().replace('+', "%20")
}
