use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::consts::ABOUT_TEAM_IMAGE_KEY;
use crate::env::MemoryEnvironment;

const FALLBACK: &str = "/about-team.jpg";
const GIF: &[u8] = b"GIF89a\x01\x00\x01\x00";

fn site(env: &Rc<MemoryEnvironment>) -> Site {
    Site::new(Rc::clone(env) as Rc<dyn Environment>, SiteConfig::default())
}

// =============================================================
// Render-time queries
// =============================================================

#[test]
fn snapshot_reflects_host_at_construction() {
    let env = Rc::new(MemoryEnvironment::new().with_dark(true).with_width(500.0));
    let site = site(&env);

    assert_eq!(
        site.snapshot(),
        SiteSnapshot { scheme: ColorSchemePreference::Dark, viewport: ViewportClass::Narrow, admin: false }
    );
    assert!(site.is_dark_mode());
    assert!(site.is_mobile_viewport());
}

#[test]
fn bare_host_renders_safe_baseline() {
    let env = Rc::new(MemoryEnvironment::new().without_media_support().without_storage());
    let site = site(&env);

    assert!(!site.is_dark_mode());
    assert!(!site.is_mobile_viewport());
    assert_eq!(site.about_team_image(FALLBACK).url(), FALLBACK);
}

#[test]
fn palette_follows_scheme() {
    let env = Rc::new(MemoryEnvironment::new().with_dark(false));
    let site = site(&env);
    assert_eq!(site.palette(), Palette::for_scheme(ColorSchemePreference::Light));

    env.set_prefers_dark(true);
    assert_eq!(site.palette(), Palette::for_scheme(ColorSchemePreference::Dark));
}

#[test]
fn configured_breakpoint_is_used() {
    let env = Rc::new(MemoryEnvironment::new().with_width(900.0));
    let config = SiteConfig { narrow_breakpoint_px: 1000.0, ..SiteConfig::default() };
    let site = Site::new(env, config);
    assert!(site.is_mobile_viewport());
}

#[test]
fn background_attachment_follows_viewport() {
    let env = Rc::new(MemoryEnvironment::new().with_width(1280.0));
    let site = site(&env);
    assert_eq!(site.background_attachment(), "fixed");

    env.resize(390.0);
    assert_eq!(site.background_attachment(), "scroll");
}

#[test]
fn contact_link_uses_configured_recipient() {
    let env = Rc::new(MemoryEnvironment::new());
    let config = SiteConfig { contact_email: "quotes@example.com".into(), ..SiteConfig::default() };
    let site = Site::new(env, config);
    let draft = ContactDraft { name: "Dana".into(), email: "dana@example.com".into(), ..ContactDraft::default() };

    let link = site.contact_link(&draft).unwrap();
    assert!(link.starts_with("mailto:quotes@example.com?subject="));
}

#[test]
fn contact_link_refuses_incomplete_draft() {
    let env = Rc::new(MemoryEnvironment::new());
    let site = site(&env);
    let draft = ContactDraft { name: "Dana".into(), ..ContactDraft::default() };
    assert_eq!(site.contact_link(&draft), Err(ContactError::MissingField("email")));
}

// =============================================================
// Admin gating
// =============================================================

#[test]
fn image_editor_hidden_without_admin_query() {
    let env = Rc::new(MemoryEnvironment::new().with_query("?admin=false"));
    let site = site(&env);
    assert!(!site.admin().is_admin());
    assert!(site.image_editor().is_none());
}

#[test]
fn admin_can_replace_and_reset_image() {
    let env = Rc::new(MemoryEnvironment::new().with_query("?admin=true"));
    let site = site(&env);
    let Some(editor) = site.image_editor() else {
        panic!("admin query should expose the image editor");
    };

    let uploaded = editor.set_override(ABOUT_TEAM_IMAGE_KEY, GIF);
    assert_eq!(site.about_team_image(FALLBACK), uploaded);

    editor.clear_override(ABOUT_TEAM_IMAGE_KEY, FALLBACK);
    assert_eq!(site.image_for(ABOUT_TEAM_IMAGE_KEY, FALLBACK).url(), FALLBACK);
}

#[test]
fn override_survives_reload_on_same_storage() {
    let storage = Rc::new(crate::env::MemoryStorage::new());
    let admin_env = Rc::new(MemoryEnvironment::new().with_storage(Rc::clone(&storage)).with_query("?admin=true"));
    let visitor_env = Rc::new(MemoryEnvironment::new().with_storage(storage));

    let uploaded = site(&admin_env).image_editor().map(|editor| editor.set_override(ABOUT_TEAM_IMAGE_KEY, GIF));

    let reloaded = site(&visitor_env);
    assert_eq!(Some(reloaded.image_for(ABOUT_TEAM_IMAGE_KEY, FALLBACK)), uploaded);
}

#[test]
fn custom_admin_param_from_config() {
    let env = Rc::new(MemoryEnvironment::new().with_query("?edit=true"));
    let config = SiteConfig { admin_param: "edit".into(), ..SiteConfig::default() };
    let site = Site::new(env, config);
    assert!(site.admin().is_admin());
}

// =============================================================
// Change notifications
// =============================================================

#[test]
fn on_change_delivers_merged_snapshots() {
    let env = Rc::new(MemoryEnvironment::new().with_dark(false).with_width(1024.0));
    let site = site(&env);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let _subscription = site.on_change(move |snapshot| sink.borrow_mut().push(snapshot));

    env.set_prefers_dark(true);
    env.resize(500.0);

    assert_eq!(
        *seen.borrow(),
        vec![
            SiteSnapshot { scheme: ColorSchemePreference::Dark, viewport: ViewportClass::Wide, admin: false },
            SiteSnapshot { scheme: ColorSchemePreference::Dark, viewport: ViewportClass::Narrow, admin: false },
        ]
    );
}

#[test]
fn unsubscribing_releases_both_host_registrations() {
    let env = Rc::new(MemoryEnvironment::new().with_width(1024.0));
    let site = site(&env);
    let subscription = site.on_change(|_| {});
    assert_eq!(env.scheme_registrations(), 1);
    assert_eq!(env.resize_registrations(), 1);

    subscription.unsubscribe();
    subscription.unsubscribe();

    assert_eq!(env.scheme_registrations(), 0);
    assert_eq!(env.resize_registrations(), 0);
}
