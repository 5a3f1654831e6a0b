//! JavaScript bindings for the site core.
//!
//! The page script constructs one `SiteHandle` and reads `isDarkMode`,
//! `isMobileViewport` and `imageFor` at render time, re-rendering from the
//! `onChange` callback. Palette, business details and the contact `mailto:`
//! hand-off are read from the same handle. Upload and reset calls are refused
//! unless the page was opened with the admin query parameter.

use js_sys::Function;
use wasm_bindgen::prelude::*;

use crate::config::SiteConfig;
use crate::observe::Subscription;
use crate::site::Site;
use crate::util::contact::ContactDraft;

#[wasm_bindgen(start)]
pub fn start() {
    crate::logging::init();
}

#[wasm_bindgen]
pub struct SiteHandle {
    site: Site,
}

/// Keeps an `onChange` callback registered until `unsubscribe` or `free`.
#[wasm_bindgen]
pub struct ChangeSubscription {
    inner: Subscription,
}

#[wasm_bindgen]
impl ChangeSubscription {
    pub fn unsubscribe(&self) {
        self.inner.unsubscribe();
    }
}

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen]
impl SiteHandle {
    /// Build the handle, optionally from a JSON config object string.
    ///
    /// # Errors
    ///
    /// Returns the config error message when `config_json` is malformed.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<SiteHandle, JsValue> {
        let config = match config_json {
            Some(raw) => SiteConfig::from_json(&raw).map_err(js_error)?,
            None => SiteConfig::default(),
        };
        Ok(Self { site: Site::from_default_environment(config) })
    }

    #[wasm_bindgen(js_name = isDarkMode)]
    pub fn is_dark_mode(&self) -> bool {
        self.site.is_dark_mode()
    }

    #[wasm_bindgen(js_name = isMobileViewport)]
    pub fn is_mobile_viewport(&self) -> bool {
        self.site.is_mobile_viewport()
    }

    #[wasm_bindgen(js_name = isAdmin)]
    pub fn is_admin(&self) -> bool {
        self.site.admin().is_admin()
    }

    #[wasm_bindgen(js_name = businessName)]
    pub fn business_name(&self) -> String {
        self.site.config().business_name.clone()
    }

    #[wasm_bindgen(js_name = contactEmail)]
    pub fn contact_email(&self) -> String {
        self.site.config().contact_email.clone()
    }

    #[wasm_bindgen(js_name = contactPhone)]
    pub fn contact_phone(&self) -> String {
        self.site.config().contact_phone.clone()
    }

    /// Current page colors as a JSON object string.
    ///
    /// # Errors
    ///
    /// Returns the serialization error message.
    pub fn palette(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.site.palette()).map_err(js_error)
    }

    #[wasm_bindgen(js_name = backgroundAttachment)]
    pub fn background_attachment(&self) -> String {
        self.site.background_attachment().to_owned()
    }

    /// Build the `mailto:` link for a contact form given as a JSON object string.
    ///
    /// # Errors
    ///
    /// Returns a message for malformed JSON or a blank required field.
    #[wasm_bindgen(js_name = contactLink)]
    pub fn contact_link(&self, draft_json: &str) -> Result<String, JsValue> {
        let draft: ContactDraft = serde_json::from_str(draft_json).map_err(js_error)?;
        self.site.contact_link(&draft).map_err(js_error)
    }

    #[wasm_bindgen(js_name = aboutTeamImage)]
    pub fn about_team_image(&self, fallback_url: &str) -> String {
        self.site.about_team_image(fallback_url).into_url()
    }

    #[wasm_bindgen(js_name = imageFor)]
    pub fn image_for(&self, key: &str, fallback_url: &str) -> String {
        self.site.image_for(key, fallback_url).into_url()
    }

    /// Replace the image under `key` with the uploaded bytes.
    ///
    /// Returns the URL to render, or `undefined` outside admin mode.
    #[wasm_bindgen(js_name = setImage)]
    pub fn set_image(&self, key: &str, bytes: &[u8], mime: Option<String>) -> Option<String> {
        let editor = self.site.image_editor()?;
        let source = match mime {
            Some(mime) => editor.set_override_with_mime(key, &mime, bytes),
            None => editor.set_override(key, bytes),
        };
        Some(source.into_url())
    }

    /// Drop the uploaded image under `key`. Returns the fallback URL.
    #[wasm_bindgen(js_name = resetImage)]
    pub fn reset_image(&self, key: &str, fallback_url: &str) -> String {
        match self.site.image_editor() {
            Some(editor) => editor.clear_override(key, fallback_url).into_url(),
            None => self.site.image_for(key, fallback_url).into_url(),
        }
    }

    /// Call `callback(snapshot)` whenever the color scheme or viewport class changes.
    #[wasm_bindgen(js_name = onChange)]
    pub fn on_change(&self, callback: Function) -> ChangeSubscription {
        let inner = self.site.on_change(move |snapshot| {
            let payload = match serde_json::to_string(&snapshot) {
                Ok(json) => JsValue::from_str(&json),
                Err(err) => {
                    log::debug!("snapshot serialization failed: {err}");
                    JsValue::NULL
                }
            };
            if let Err(err) = callback.call1(&JsValue::NULL, &payload) {
                log::warn!("onChange callback threw: {err:?}");
            }
        });
        ChangeSubscription { inner }
    }
}
