#[cfg(test)]
#[path = "admin_test.rs"]
mod admin_test;

use url::Url;
use url::form_urlencoded;

use crate::consts::{ADMIN_QUERY_PARAM, ADMIN_QUERY_VALUE};
use crate::env::Environment;

/// Whether image override controls are exposed on this page load.
///
/// Derived from `?admin=true`. This keeps casual visitors away from the
/// upload controls and nothing more; it is not an access-control check.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AdminFlag(bool);

impl AdminFlag {
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self(enabled)
    }

    /// Parse a query string (`?a=b&admin=true`, leading `?` optional).
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        Self::from_query_param(query, ADMIN_QUERY_PARAM)
    }

    /// Like [`AdminFlag::from_query`] with a custom parameter name.
    ///
    /// Only the first occurrence of `param` counts, and only the exact value
    /// `true` enables admin mode.
    #[must_use]
    pub fn from_query_param(query: &str, param: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let enabled = form_urlencoded::parse(query.as_bytes())
            .find(|(name, _)| name == param)
            .is_some_and(|(_, value)| value == ADMIN_QUERY_VALUE);
        Self(enabled)
    }

    /// Parse a full page URL. Unparsable URLs are not admin.
    #[must_use]
    pub fn from_url(url: &str) -> Self {
        match Url::parse(url) {
            Ok(url) => url.query().map_or(Self::default(), Self::from_query),
            Err(err) => {
                log::debug!("admin flag: ignoring unparsable url: {err}");
                Self::default()
            }
        }
    }

    /// Read the flag from the host's current page URL.
    #[must_use]
    pub fn from_environment(env: &dyn Environment, param: &str) -> Self {
        env.query_string()
            .map_or(Self::default(), |query| Self::from_query_param(&query, param))
    }

    #[must_use]
    pub fn is_admin(self) -> bool {
        self.0
    }

    /// Hand out `capability` only in admin mode.
    #[must_use]
    pub fn gate<T>(self, capability: T) -> Option<T> {
        self.0.then_some(capability)
    }
}
