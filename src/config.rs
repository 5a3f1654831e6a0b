//! Site configuration.
//!
//! Defaults match the production site. Overrides come from a JSON document
//! (embedded by the page, for example) or from environment variables when the
//! core runs natively:
//!
//! - `SITE_NARROW_BREAKPOINT_PX`: viewport breakpoint, default 768
//! - `SITE_ADMIN_PARAM`: query parameter gating image controls, default `admin`
//! - `SITE_CONTACT_EMAIL`: mail hand-off recipient
//! - `SITE_CONTACT_PHONE`: displayed phone number

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::{
    ADMIN_QUERY_PARAM, BUSINESS_NAME, CONTACT_EMAIL, CONTACT_PHONE, NARROW_BREAKPOINT_PX, QUOTE_SUBJECT,
};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be a positive number of pixels, got {value:?}")]
    InvalidBreakpoint { var: String, value: String },
    #[error("{var} must not be empty")]
    Empty { var: String },
    #[error("invalid site config json: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub narrow_breakpoint_px: f64,
    pub admin_param: String,
    pub business_name: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub quote_subject: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            narrow_breakpoint_px: NARROW_BREAKPOINT_PX,
            admin_param: ADMIN_QUERY_PARAM.to_owned(),
            business_name: BUSINESS_NAME.to_owned(),
            contact_email: CONTACT_EMAIL.to_owned(),
            contact_phone: CONTACT_PHONE.to_owned(),
            quote_subject: QUOTE_SUBJECT.to_owned(),
        }
    }
}

impl SiteConfig {
    /// Build config from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an unparsable breakpoint or an empty override.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build config from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an unparsable breakpoint or an empty override.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(raw) = lookup("SITE_NARROW_BREAKPOINT_PX") {
            config.narrow_breakpoint_px = parse_breakpoint("SITE_NARROW_BREAKPOINT_PX", &raw)?;
        }
        if let Some(value) = non_empty(&lookup, "SITE_ADMIN_PARAM")? {
            config.admin_param = value;
        }
        if let Some(value) = non_empty(&lookup, "SITE_CONTACT_EMAIL")? {
            config.contact_email = value;
        }
        if let Some(value) = non_empty(&lookup, "SITE_CONTACT_PHONE")? {
            config.contact_phone = value;
        }
        Ok(config)
    }

    /// Parse a JSON object; missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] for malformed JSON,
    /// [`ConfigError::InvalidBreakpoint`] for a non-positive breakpoint and
    /// [`ConfigError::Empty`] for a blank admin parameter or contact email.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_json::from_str(raw)?;
        if !is_valid_breakpoint(config.narrow_breakpoint_px) {
            return Err(ConfigError::InvalidBreakpoint {
                var: "narrow_breakpoint_px".into(),
                value: config.narrow_breakpoint_px.to_string(),
            });
        }
        config.admin_param = required("admin_param", &config.admin_param)?;
        config.contact_email = required("contact_email", &config.contact_email)?;
        Ok(config)
    }
}

fn is_valid_breakpoint(px: f64) -> bool {
    px.is_finite() && px > 0.0
}

fn parse_breakpoint(var: &str, raw: &str) -> Result<f64, ConfigError> {
    match raw.trim().parse::<f64>() {
        Ok(px) if is_valid_breakpoint(px) => Ok(px),
        _ => Err(ConfigError::InvalidBreakpoint { var: var.into(), value: raw.into() }),
    }
}

fn non_empty(lookup: &impl Fn(&str) -> Option<String>, var: &str) -> Result<Option<String>, ConfigError> {
    lookup(var).map(|value| required(var, &value)).transpose()
}

fn required(var: &str, value: &str) -> Result<String, ConfigError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ConfigError::Empty { var: var.into() });
    }
    Ok(value.to_owned())
}
