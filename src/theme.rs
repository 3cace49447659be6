//! Dark/light theme preference.
//!
//! Dark is the default. Only a stored value of exactly `light` selects the
//! light theme; anything else (missing, garbled, stale) falls back to dark.
//! Storage is target-specific:
//! - WASM: `localStorage["theme"]`
//! - Native: a small JSON file

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Storage key used for the preference.
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("light") => Theme::Light,
            _ => Theme::Dark,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Somewhere the raw preference string can be kept.
pub trait ThemeStore {
    fn read(&self) -> Option<String>;
    fn write(&mut self, value: &str) -> Result<()>;
}

pub fn load_theme<S: ThemeStore>(store: &S) -> Theme {
    Theme::from_stored(store.read().as_deref())
}

pub fn save_theme<S: ThemeStore>(store: &mut S, theme: Theme) -> Result<()> {
    store.write(theme.as_str())?;
    log::info!("Theme set to {}", theme);
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::FileThemeStore;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use super::{ThemeStore, THEME_KEY};
    use anyhow::{Context, Result};
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    /// Preference kept as `{"theme": "..."}` in a JSON file.
    pub struct FileThemeStore {
        path: PathBuf,
    }

    impl FileThemeStore {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        fn entries(&self) -> Option<BTreeMap<String, String>> {
            let contents = std::fs::read_to_string(&self.path).ok()?;
            match serde_json::from_str(&contents) {
                Ok(map) => Some(map),
                Err(e) => {
                    log::warn!("Ignoring unreadable preferences {:?}: {}", self.path, e);
                    None
                }
            }
        }
    }

    impl ThemeStore for FileThemeStore {
        fn read(&self) -> Option<String> {
            self.entries()?.remove(THEME_KEY)
        }

        fn write(&mut self, value: &str) -> Result<()> {
            let mut entries = self.entries().unwrap_or_default();
            entries.insert(THEME_KEY.to_string(), value.to_string());
            if let Some(parent) = self.path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            let json = serde_json::to_string_pretty(&entries)?;
            std::fs::write(&self.path, json)
                .with_context(|| format!("Failed to write preferences {:?}", self.path))
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::{apply_theme, LocalStorageThemeStore};

#[cfg(target_arch = "wasm32")]
mod browser {
    use super::{Theme, ThemeStore, THEME_KEY};
    use anyhow::Result;

    pub struct LocalStorageThemeStore {
        storage: Option<web_sys::Storage>,
    }

    impl LocalStorageThemeStore {
        pub fn new() -> Self {
            let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
            if storage.is_none() {
                log::warn!("localStorage unavailable; theme will not persist");
            }
            Self { storage }
        }
    }

    impl ThemeStore for LocalStorageThemeStore {
        fn read(&self) -> Option<String> {
            self.storage.as_ref()?.get_item(THEME_KEY).ok().flatten()
        }

        fn write(&mut self, value: &str) -> Result<()> {
            if let Some(storage) = &self.storage {
                storage
                    .set_item(THEME_KEY, value)
                    .map_err(|e| anyhow::anyhow!("localStorage write failed: {:?}", e))?;
            }
            Ok(())
        }
    }

    /// Swap the `dark`/`light` class on the document element.
    pub fn apply_theme(theme: Theme) {
        let root = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.document_element());
        let Some(root) = root else {
            log::warn!("No document element to apply theme to");
            return;
        };
        let classes = root.class_list();
        let result = classes
            .remove_1(theme.toggled().as_str())
            .and_then(|_| classes.add_1(theme.as_str()));
        if let Err(e) = result {
            log::warn!("Failed to apply theme class: {:?}", e);
        }
    }
}
