//! Shared constants for the site core.

// ── Viewport ────────────────────────────────────────────────────

/// Widths strictly below this many logical pixels are classified as narrow.
pub const NARROW_BREAKPOINT_PX: f64 = 768.0;

// ── Host queries ────────────────────────────────────────────────

/// Media query matched by hosts whose color-scheme preference is dark.
pub const DARK_SCHEME_QUERY: &str = "(prefers-color-scheme: dark)";

/// URL query parameter that exposes the image override controls.
pub const ADMIN_QUERY_PARAM: &str = "admin";

/// The only value of [`ADMIN_QUERY_PARAM`] that enables admin mode.
pub const ADMIN_QUERY_VALUE: &str = "true";

// ── Image overrides ─────────────────────────────────────────────

/// Storage key for the team photo on the About page.
pub const ABOUT_TEAM_IMAGE_KEY: &str = "sg_about_team";

/// Content type used when an upload's format cannot be recognized.
pub const FALLBACK_MIME: &str = "application/octet-stream";

// ── Business details ────────────────────────────────────────────

pub const BUSINESS_NAME: &str = "Strong Guys's LLC";
pub const CONTACT_EMAIL: &str = "strongguysmovers@gmail.com";
pub const CONTACT_PHONE: &str = "541-264-8502";
pub const QUOTE_SUBJECT: &str = "Website Quote Request - Strong Guys's LLC";
