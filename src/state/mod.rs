//! Adaptive state the pages render from.
//!
//! DESIGN
//! ======
//! Each provider is independent and takes its host capabilities explicitly.
//! The live providers ([`color_scheme`], [`viewport`]) expose
//! `current()` plus `on_change(listener) -> Subscription`; the presentation
//! layer re-renders itself when notified.

pub mod admin;
pub mod color_scheme;
pub mod images;
pub mod theme;
pub mod viewport;
