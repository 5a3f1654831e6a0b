#[cfg(test)]
#[path = "theme_test.rs"]
mod theme_test;

use serde::Serialize;

use super::color_scheme::ColorSchemePreference;

/// Brand red used for buttons, links and the logo badge.
pub const ACCENT: &str = "#dc2626";
/// Darker brand red for hover states.
pub const ACCENT_HOVER: &str = "#b91c1c";

/// Page colors for one color scheme.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub text: &'static str,
    pub card_background: &'static str,
    pub card_border: &'static str,
    pub input_background: &'static str,
    pub input_border: &'static str,
    pub input_text: &'static str,
    pub panel_background: &'static str,
    pub accent: &'static str,
    pub accent_hover: &'static str,
}

const LIGHT: Palette = Palette {
    text: "#374151",
    card_background: "white",
    card_border: "#d1d5db",
    input_background: "white",
    input_border: "#d1d5db",
    input_text: "inherit",
    panel_background: "#f9fafb",
    accent: ACCENT,
    accent_hover: ACCENT_HOVER,
};

const DARK: Palette = Palette {
    text: "#e5e7eb",
    card_background: "#1f2937",
    card_border: "#374151",
    input_background: "#1f2937",
    input_border: "#374151",
    input_text: "#e5e7eb",
    panel_background: "#1f2937",
    accent: ACCENT,
    accent_hover: ACCENT_HOVER,
};

impl Palette {
    #[must_use]
    pub fn for_scheme(scheme: ColorSchemePreference) -> Self {
        match scheme {
            ColorSchemePreference::Light => LIGHT,
            ColorSchemePreference::Dark => DARK,
        }
    }
}
