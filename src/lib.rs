//! # strongguys-site
//!
//! Client-side state core for the Strong Guys's LLC marketing site.
//! The pages themselves (Home, Services, About, Contact) live in the
//! presentation layer; this crate supplies the three pieces of adaptive state
//! they render from, plus the small helpers around them.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`env`] | Host capability traits, in-memory host, browser host (`hydrate`) |
//! | [`observe`] | Listener registry and [`observe::Subscription`] handles |
//! | [`state`] | Color scheme, viewport class, image overrides, admin flag, palette |
//! | [`util`] | Inline image payload codec and the contact mail hand-off |
//! | [`site`] | Composition root wiring the providers together |
//! | [`config`] | [`config::SiteConfig`] defaults, JSON and env loading |
//! | [`consts`] | Shared constants (breakpoint, query names, contact details) |
//! | [`logging`] | Logger setup for browser builds |

pub mod config;
pub mod consts;
pub mod env;
pub mod logging;
pub mod observe;
pub mod site;
pub mod state;
pub mod util;

#[cfg(feature = "hydrate")]
pub mod wasm;

pub use config::SiteConfig;
pub use env::{Environment, KeyValueStore, StorageError};
pub use site::Site;
pub use state::admin::AdminFlag;
pub use state::color_scheme::{ColorSchemePreference, PreferenceWatcher};
pub use state::images::{ImageOverrideStore, ImageSource};
pub use state::viewport::{ViewportClass, ViewportClassifier};
