//! Viewer preferences: colour theme and preview audio.

use crate::storage::PersistentStore;
use std::str::FromStr;

/// Storage key for the theme name.
pub const THEME_KEY: &str = "theme";
/// Storage key for the preview mute flag.
pub const PREVIEW_MUTED_KEY: &str = "previewMuted";

/// Colour theme.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
    /// Light surfaces.
    Light,
    /// Dark surfaces.
    #[default]
    Dark,
    /// Pure black surfaces.
    Oled,
}

impl Theme {
    /// Identifier stored in preferences and used in CSS.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::Oled => "oled",
        }
    }

    /// Next theme in the `light -> dark -> oled -> light` cycle.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Oled,
            Self::Oled => Self::Light,
        }
    }

    /// Toggle button glyph for the current theme.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Light => "☀️",
            Self::Dark => "🔅",
            Self::Oled => "🌙",
        }
    }

    /// Toggle button label announcing the next theme.
    #[must_use]
    pub const fn toggle_label(self) -> &'static str {
        match self {
            Self::Light => "Switch to dark mode",
            Self::Dark => "Switch to OLED mode",
            Self::Oled => "Switch to light mode",
        }
    }

    /// Class applied to the document root.
    #[must_use]
    pub fn root_class(self) -> String {
        format!("{}-mode", self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "oled" => Ok(Self::Oled),
            _ => Err(()),
        }
    }
}

/// Glyph for the preview volume button.
#[must_use]
pub const fn mute_icon(muted: bool) -> &'static str {
    if muted { "🔇" } else { "🔊" }
}

/// Label for the preview volume button.
#[must_use]
pub const fn mute_label(muted: bool) -> &'static str {
    if muted { "Unmute preview" } else { "Mute preview" }
}

/// Reads and writes viewer preferences.
#[derive(Clone, Debug)]
pub struct Preferences {
    store: PersistentStore,
}

impl Preferences {
    /// Preferences backed by `store`.
    #[must_use]
    pub const fn new(store: PersistentStore) -> Self {
        Self { store }
    }

    /// Stored theme, or [`Theme::Dark`] when absent or unknown.
    #[must_use]
    pub fn theme(&self) -> Theme {
        self.store
            .get_text(THEME_KEY)
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }

    /// Persist `theme`.
    pub fn set_theme(&self, theme: Theme) {
        self.store.set_text(THEME_KEY, theme.as_str());
    }

    /// Advance to the next theme, persist it and return it.
    pub fn cycle_theme(&self) -> Theme {
        let next = self.theme().next();
        self.set_theme(next);
        next
    }

    /// Whether previews play muted. Anything except a stored `"false"` means
    /// muted.
    #[must_use]
    pub fn preview_muted(&self) -> bool {
        self.store.get_text(PREVIEW_MUTED_KEY).as_deref() != Some("false")
    }

    /// Flip the preview mute flag, persist it and return the new value.
    pub fn toggle_preview_mute(&self) -> bool {
        let muted = !self.preview_muted();
        self.store
            .set_text(PREVIEW_MUTED_KEY, if muted { "true" } else { "false" });
        muted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{KeyValueStore, MemoryStore};
    use std::rc::Rc;

    fn preferences() -> (Rc<MemoryStore>, Preferences) {
        let backend = Rc::new(MemoryStore::new());
        (
            backend.clone(),
            Preferences::new(PersistentStore::new(backend)),
        )
    }

    #[test]
    fn theme_cycles_through_three_modes() {
        assert_eq!(Theme::Light.next(), Theme::Dark);
        assert_eq!(Theme::Dark.next(), Theme::Oled);
        assert_eq!(Theme::Oled.next(), Theme::Light);
        assert_eq!(Theme::Oled.root_class(), "oled-mode");
    }

    #[test]
    fn theme_defaults_to_dark_and_persists() {
        let (backend, prefs) = preferences();
        assert_eq!(prefs.theme(), Theme::Dark);
        backend.set(THEME_KEY, "sepia").unwrap();
        assert_eq!(prefs.theme(), Theme::Dark);

        assert_eq!(prefs.cycle_theme(), Theme::Oled);
        assert_eq!(backend.get(THEME_KEY).unwrap().as_deref(), Some("oled"));
        assert_eq!(prefs.cycle_theme(), Theme::Light);
    }

    #[test]
    fn preview_mute_defaults_on_and_toggles() {
        let (backend, prefs) = preferences();
        assert!(prefs.preview_muted());
        assert!(!prefs.toggle_preview_mute());
        assert_eq!(
            backend.get(PREVIEW_MUTED_KEY).unwrap().as_deref(),
            Some("false")
        );
        assert!(prefs.toggle_preview_mute());
        assert_eq!(mute_icon(true), "🔇");
        assert_eq!(mute_label(false), "Mute preview");
    }
}
