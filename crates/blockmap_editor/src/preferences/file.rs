//! Preferences file save/load operations

use super::EditorPreferences;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

const PREFERENCES_FILE: &str = "preferences.json";

#[derive(Debug)]
pub enum PreferencesError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
    NoConfigDir,
}

impl std::fmt::Display for PreferencesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PreferencesError::IoError(e) => write!(f, "IO error: {}", e),
            PreferencesError::ParseError(e) => write!(f, "Parse error: {}", e),
            PreferencesError::SerializeError(e) => write!(f, "Serialize error: {}", e),
            PreferencesError::NoConfigDir => write!(f, "Could not determine config directory"),
        }
    }
}

impl std::error::Error for PreferencesError {}

impl EditorPreferences {
    /// Platform config directory for blockmap
    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "blockmap", "blockmap").map(|dirs| dirs.config_dir().to_path_buf())
    }

    pub fn preferences_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join(PREFERENCES_FILE))
    }

    /// Load preferences from the config directory, returning defaults on any failure
    pub fn load() -> Self {
        let loaded = Self::preferences_path()
            .ok_or(PreferencesError::NoConfigDir)
            .and_then(|path| Self::load_from_path(&path));
        match loaded {
            Ok(prefs) => prefs,
            Err(e) => {
                tracing::warn!("Could not load preferences: {}. Using defaults.", e);
                Self::default()
            }
        }
    }

    /// Load preferences from `path`; a missing file yields the defaults
    pub fn load_from_path(path: &Path) -> Result<Self, PreferencesError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content =
            std::fs::read_to_string(path).map_err(|e| PreferencesError::IoError(e.to_string()))?;

        serde_json::from_str(&content).map_err(|e| PreferencesError::ParseError(e.to_string()))
    }

    /// Save preferences to the config directory
    pub fn save(&self) -> Result<(), PreferencesError> {
        let path = Self::preferences_path().ok_or(PreferencesError::NoConfigDir)?;
        self.save_to_path(&path)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), PreferencesError> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| PreferencesError::IoError(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| PreferencesError::SerializeError(e.to_string()))?;

        std::fs::write(path, content).map_err(|e| PreferencesError::IoError(e.to_string()))?;

        tracing::info!("Saved preferences to {:?}", path);
        Ok(())
    }
}
