use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::*;
use crate::env::MemoryEnvironment;

fn host(dark: bool) -> Rc<MemoryEnvironment> {
    Rc::new(MemoryEnvironment::new().with_dark(dark))
}

fn recorder() -> (Rc<RefCell<Vec<ColorSchemePreference>>>, impl Fn(ColorSchemePreference) + 'static) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    (seen, move |value: ColorSchemePreference| sink.borrow_mut().push(value))
}

// =============================================================
// ColorSchemePreference
// =============================================================

#[test]
fn preference_default_is_light() {
    assert_eq!(ColorSchemePreference::default(), ColorSchemePreference::Light);
}

#[test]
fn from_dark_maps_both_ways() {
    assert_eq!(ColorSchemePreference::from_dark(true), ColorSchemePreference::Dark);
    assert_eq!(ColorSchemePreference::from_dark(false), ColorSchemePreference::Light);
    assert!(ColorSchemePreference::Dark.is_dark());
    assert!(!ColorSchemePreference::Light.is_dark());
}

#[test]
fn preference_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&ColorSchemePreference::Dark).unwrap(), "\"dark\"");
    assert_eq!(serde_json::to_string(&ColorSchemePreference::Light).unwrap(), "\"light\"");
}

// =============================================================
// PreferenceWatcher: initial sample
// =============================================================

#[test]
fn current_matches_dark_host_at_construction() {
    let watcher = PreferenceWatcher::new(host(true));
    assert_eq!(watcher.current(), ColorSchemePreference::Dark);
    assert!(watcher.is_dark());
}

#[test]
fn current_matches_light_host_at_construction() {
    let watcher = PreferenceWatcher::new(host(false));
    assert_eq!(watcher.current(), ColorSchemePreference::Light);
}

#[test]
fn host_without_media_support_defaults_to_light() {
    let env = Rc::new(MemoryEnvironment::new().without_media_support());
    let watcher = PreferenceWatcher::new(env);
    assert_eq!(watcher.current(), ColorSchemePreference::Light);
    assert!(!watcher.is_attached());
}

// =============================================================
// PreferenceWatcher: notifications
// =============================================================

#[test]
fn host_change_updates_current_and_notifies() {
    let env = host(false);
    let watcher = PreferenceWatcher::new(env.clone());
    let (seen, listener) = recorder();
    let _subscription = watcher.on_change(listener);

    env.set_prefers_dark(true);

    assert_eq!(watcher.current(), ColorSchemePreference::Dark);
    assert_eq!(*seen.borrow(), vec![ColorSchemePreference::Dark]);
}

#[test]
fn every_host_notification_reaches_every_listener() {
    let env = host(false);
    let watcher = PreferenceWatcher::new(env.clone());
    let (first, a) = recorder();
    let (second, b) = recorder();
    let _a = watcher.on_change(a);
    let _b = watcher.on_change(b);

    env.set_prefers_dark(true);
    env.set_prefers_dark(true);
    env.set_prefers_dark(false);

    let expected = vec![ColorSchemePreference::Dark, ColorSchemePreference::Dark, ColorSchemePreference::Light];
    assert_eq!(*first.borrow(), expected);
    assert_eq!(*second.borrow(), expected);
}

#[test]
fn current_tracks_host_without_any_listener() {
    let env = host(false);
    let watcher = PreferenceWatcher::new(env.clone());
    env.set_prefers_dark(true);
    assert_eq!(watcher.current(), ColorSchemePreference::Dark);
}

#[test]
fn unsubscribed_listener_is_not_called() {
    let env = host(false);
    let watcher = PreferenceWatcher::new(env.clone());
    let (seen, listener) = recorder();
    let (_, keep) = recorder();
    let _keep = watcher.on_change(keep);
    let subscription = watcher.on_change(listener);

    subscription.unsubscribe();
    env.set_prefers_dark(true);

    assert!(seen.borrow().is_empty());
}

#[test]
fn listener_can_unsubscribe_itself_mid_notification() {
    let env = host(false);
    let watcher = PreferenceWatcher::new(env.clone());
    let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
    let hits = Rc::new(Cell::new(0));

    let own = Rc::clone(&slot);
    let sink = Rc::clone(&hits);
    let subscription = watcher.on_change(move |_| {
        sink.set(sink.get() + 1);
        if let Some(subscription) = own.borrow().as_ref() {
            subscription.unsubscribe();
        }
    });
    *slot.borrow_mut() = Some(subscription);

    env.set_prefers_dark(true);
    env.set_prefers_dark(false);

    assert_eq!(hits.get(), 1);
}

// =============================================================
// PreferenceWatcher: host registration lifecycle
// =============================================================

#[test]
fn last_unsubscribe_tears_down_host_registration() {
    let env = host(false);
    let watcher = PreferenceWatcher::new(env.clone());
    let (_, a) = recorder();
    let (_, b) = recorder();
    let first = watcher.on_change(a);
    let second = watcher.on_change(b);
    assert_eq!(env.scheme_registrations(), 1);

    first.unsubscribe();
    assert_eq!(env.scheme_registrations(), 1);

    second.unsubscribe();
    assert_eq!(env.scheme_registrations(), 0);
    assert!(!watcher.is_attached());
}

#[test]
fn unsubscribe_twice_is_harmless() {
    let env = host(false);
    let watcher = PreferenceWatcher::new(env.clone());
    let (_, listener) = recorder();
    let subscription = watcher.on_change(listener);

    subscription.unsubscribe();
    subscription.unsubscribe();

    assert_eq!(env.scheme_registrations(), 0);
}

#[test]
fn detached_watcher_samples_host_and_reattaches_on_subscribe() {
    let env = host(false);
    let watcher = PreferenceWatcher::new(env.clone());
    let (_, first) = recorder();
    watcher.on_change(first).unsubscribe();

    env.set_prefers_dark(true);
    assert_eq!(watcher.current(), ColorSchemePreference::Dark);

    let (seen, listener) = recorder();
    let _subscription = watcher.on_change(listener);
    assert_eq!(env.scheme_registrations(), 1);

    env.set_prefers_dark(false);
    assert_eq!(*seen.borrow(), vec![ColorSchemePreference::Light]);
}

#[test]
fn dropping_watcher_releases_host_registration() {
    let env = host(false);
    let watcher = PreferenceWatcher::new(env.clone());
    let (_, listener) = recorder();
    let subscription = watcher.on_change(listener);

    drop(watcher);
    assert_eq!(env.scheme_registrations(), 0);

    subscription.unsubscribe();
}
