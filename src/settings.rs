//! Game settings and preferences
//!
//! Persisted in LocalStorage on the web and as a JSON file natively (path
//! taken from `ASTEROID_DODGE_SETTINGS`).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::platform::{InputSource, normalize_key};
use crate::sim::TickInput;

/// Environment variable naming the native settings file
pub const SETTINGS_PATH_ENV: &str = "ASTEROID_DODGE_SETTINGS";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to access settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Keys that steer the ship (matched against `KeyboardEvent.key`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindings {
    pub left: Vec<String>,
    pub right: Vec<String>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            left: vec!["ArrowLeft".into(), "a".into()],
            right: vec!["ArrowRight".into(), "d".into()],
        }
    }
}

impl KeyBindings {
    /// Snapshot the held keys into a tick input
    pub fn read<I: InputSource + ?Sized>(&self, input: &I, autopilot: bool) -> TickInput {
        TickInput {
            left: self.left.iter().any(|k| input.is_held(k)),
            right: self.right.iter().any(|k| input.is_held(k)),
            autopilot,
        }
    }

    /// Whether `key` is bound to any steering direction (letter case is
    /// ignored)
    pub fn is_bound(&self, key: &str) -> bool {
        let key = normalize_key(key);
        self.left
            .iter()
            .chain(&self.right)
            .any(|k| normalize_key(k) == key)
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub keys: KeyBindings,
    /// Fixed RNG seed for reproducible asteroid fields (None = seed from clock)
    pub seed: Option<u64>,
    /// Let the ship fly itself
    pub autopilot: bool,
    /// Show the leaderboard on game over
    pub show_high_scores: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            keys: KeyBindings::default(),
            seed: None,
            autopilot: false,
            show_high_scores: true,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read settings from a JSON file. A missing file yields defaults.
    pub fn load_from_path(path: &Path) -> Result<Self, SettingsError> {
        match std::fs::read_to_string(path) {
            Ok(json) => Self::from_json(&json),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(SettingsError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), SettingsError> {
        std::fs::write(path, self.to_json()?).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "asteroid_dodge_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let stored = crate::platform::web::local_storage()
            .and_then(|storage| storage.get_item(Self::STORAGE_KEY).ok().flatten());

        match stored.map(|json| Self::from_json(&json)) {
            Some(Ok(settings)) => {
                log::info!("Loaded settings from LocalStorage");
                settings
            }
            Some(Err(e)) => {
                log::warn!("Ignoring stored settings: {}", e);
                Self::default()
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let Some(storage) = crate::platform::web::local_storage() else {
            return;
        };
        match self.to_json() {
            Ok(json) => match storage.set_item(Self::STORAGE_KEY, &json) {
                Ok(()) => log::info!("Settings saved"),
                Err(e) => log::warn!("LocalStorage rejected the settings: {:?}", e),
            },
            Err(e) => log::warn!("Could not save settings: {}", e),
        }
    }

    /// Load from the file named by `ASTEROID_DODGE_SETTINGS`, falling back
    /// to defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Some(path) = std::env::var_os(SETTINGS_PATH_ENV).map(PathBuf::from) else {
            log::info!("Using default settings");
            return Self::default();
        };

        match Self::load_from_path(&path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("{}; using default settings", e);
                Self::default()
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        if let Some(path) = std::env::var_os(SETTINGS_PATH_ENV).map(PathBuf::from) {
            match self.save_to_path(&path) {
                Ok(()) => log::info!("Settings saved to {}", path.display()),
                Err(e) => log::warn!("Could not save settings: {}", e),
            }
        }
    }
}
