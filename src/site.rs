//! Composition root for the presentation layer.
//!
//! A page builds one [`Site`] per load and reads everything it renders from
//! it: color scheme, viewport class, admin mode, palette and images. It
//! subscribes once through [`Site::on_change`] and re-renders on notify.

#[cfg(test)]
#[path = "site_test.rs"]
mod site_test;

use std::cell::Cell;
use std::rc::Rc;

use serde::Serialize;

use crate::config::SiteConfig;
use crate::consts::ABOUT_TEAM_IMAGE_KEY;
use crate::env::{self, Environment};
use crate::observe::Subscription;
use crate::state::admin::AdminFlag;
use crate::state::color_scheme::{ColorSchemePreference, PreferenceWatcher};
use crate::state::images::{ImageOverrideStore, ImageSource};
use crate::state::theme::Palette;
use crate::state::viewport::{ViewportClass, ViewportClassifier};
use crate::util::contact::{ContactDraft, ContactError};

/// Render-time view of the live state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SiteSnapshot {
    pub scheme: ColorSchemePreference,
    pub viewport: ViewportClass,
    pub admin: bool,
}

pub struct Site {
    config: SiteConfig,
    scheme: PreferenceWatcher,
    viewport: ViewportClassifier,
    images: ImageOverrideStore,
    admin: AdminFlag,
}

impl Site {
    pub fn new(env: Rc<dyn Environment>, config: SiteConfig) -> Self {
        let admin = AdminFlag::from_environment(env.as_ref(), &config.admin_param);
        let images = ImageOverrideStore::new(env.as_ref());
        let viewport = ViewportClassifier::with_breakpoint(Rc::clone(&env), config.narrow_breakpoint_px);
        let scheme = PreferenceWatcher::new(env);
        log::debug!(
            "site state ready: scheme={:?} viewport={:?} admin={} persistent_images={}",
            scheme.current(),
            viewport.current(),
            admin.is_admin(),
            images.is_persistent()
        );
        Self { config, scheme, viewport, images, admin }
    }

    /// Site over this build's default host.
    #[must_use]
    pub fn from_default_environment(config: SiteConfig) -> Self {
        Self::new(env::default_environment(), config)
    }

    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    #[must_use]
    pub fn is_dark_mode(&self) -> bool {
        self.scheme.is_dark()
    }

    #[must_use]
    pub fn is_mobile_viewport(&self) -> bool {
        self.viewport.is_narrow()
    }

    #[must_use]
    pub fn admin(&self) -> AdminFlag {
        self.admin
    }

    #[must_use]
    pub fn snapshot(&self) -> SiteSnapshot {
        SiteSnapshot { scheme: self.scheme.current(), viewport: self.viewport.current(), admin: self.admin.is_admin() }
    }

    #[must_use]
    pub fn palette(&self) -> Palette {
        Palette::for_scheme(self.scheme.current())
    }

    /// CSS `background-attachment` for the hero backgrounds at the current width.
    #[must_use]
    pub fn background_attachment(&self) -> &'static str {
        self.viewport.current().background_attachment()
    }

    pub fn image_for(&self, key: &str, fallback_url: &str) -> ImageSource {
        self.images.resolve(key, fallback_url)
    }

    /// The About page team photo.
    pub fn about_team_image(&self, fallback_url: &str) -> ImageSource {
        self.image_for(ABOUT_TEAM_IMAGE_KEY, fallback_url)
    }

    /// `mailto:` hand-off for a submitted contact form.
    ///
    /// # Errors
    ///
    /// Returns [`ContactError`] when a required field is blank.
    pub fn contact_link(&self, draft: &ContactDraft) -> Result<String, ContactError> {
        draft.mailto(&self.config)
    }

    /// Mutation access to image overrides, admin mode only.
    #[must_use]
    pub fn image_editor(&self) -> Option<&ImageOverrideStore> {
        self.admin.gate(&self.images)
    }

    #[must_use]
    pub fn color_scheme(&self) -> &PreferenceWatcher {
        &self.scheme
    }

    #[must_use]
    pub fn viewport(&self) -> &ViewportClassifier {
        &self.viewport
    }

    /// Notify `listener` with a fresh snapshot whenever scheme or viewport changes.
    pub fn on_change(&self, listener: impl Fn(SiteSnapshot) + 'static) -> Subscription {
        let listener = Rc::new(listener);
        let state = Rc::new(Cell::new(self.snapshot()));

        let on_scheme = {
            let listener = Rc::clone(&listener);
            let state = Rc::clone(&state);
            self.scheme.on_change(move |scheme| {
                let snapshot = SiteSnapshot { scheme, ..state.get() };
                state.set(snapshot);
                listener(snapshot);
            })
        };
        let on_viewport = self.viewport.on_change(move |viewport| {
            let snapshot = SiteSnapshot { viewport, ..state.get() };
            state.set(snapshot);
            listener(snapshot);
        });
        Subscription::merge(vec![on_scheme, on_viewport])
    }
}
