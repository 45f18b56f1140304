//! Style resolution: maps a free-text travel mood to a content profile.
//!
//! Profiles are defined in `profiles.toml` and embedded in the binary at
//! compile time. Resolution walks the profiles in file order and returns the
//! first one with a marker contained in the style string. The marker-less
//! default profile is last, so resolution always yields a profile.

use std::sync::LazyLock;

use serde::Deserialize;

/// A bundle of phrase pools that controls the tone of a generated itinerary.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StyleProfile {
    /// Profile identifier (e.g. `foodie`, `classic`).
    pub name: String,
    /// Substrings that select this profile. Empty for the default profile.
    #[serde(default)]
    pub markers: Vec<String>,
    /// Tip shared by every slot when tips are not randomized.
    pub tips_base: String,
    /// Per-day themes, drawn once per day when themed days are enabled.
    pub theme_pool: Vec<String>,
    /// Per-slot tips, drawn independently when tips are randomized.
    pub tip_pool: Vec<String>,
    /// Lunch suggestions embedded in the noon slot's detail.
    pub lunch_pool: Vec<String>,
}

impl StyleProfile {
    fn matches(&self, style: &str) -> bool {
        self.markers
            .iter()
            .any(|marker| style.contains(marker.as_str()))
    }
}

#[derive(Debug, Deserialize)]
struct ProfileLibrary {
    profiles: Vec<StyleProfile>,
}

static PROFILES_TOML: &str = include_str!("profiles.toml");

static PROFILES: LazyLock<Vec<StyleProfile>> = LazyLock::new(|| {
    let lib: ProfileLibrary =
        toml::from_str(PROFILES_TOML).expect("embedded profiles.toml is invalid");
    lib.profiles
});

/// All embedded profiles, in resolution order.
///
/// # Panics
///
/// Panics if the embedded TOML is malformed. The file is compiled into the
/// binary, so a build that passes its tests cannot hit this.
pub fn profiles() -> &'static [StyleProfile] {
    &PROFILES
}

/// The default "classic sightseeing" profile.
pub fn default_profile() -> &'static StyleProfile {
    profiles()
        .iter()
        .find(|p| p.markers.is_empty())
        .expect("embedded profiles.toml has no default profile")
}

/// Resolve a style string to exactly one profile. First match wins.
///
/// Markers are compared against the lowercased style so that ASCII markers
/// match regardless of case.
pub fn resolve(style: &str) -> &'static StyleProfile {
    let style = style.to_lowercase();
    profiles()
        .iter()
        .find(|p| p.matches(&style))
        .unwrap_or_else(default_profile)
}
