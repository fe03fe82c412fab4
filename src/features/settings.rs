//! Application preferences persistence
//!
//! Handles saving and loading user preferences: theme, the onboarding and
//! developer-mode flags, and the focus-timer durations.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Color theme for the frontend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    /// Follow the OS preference
    #[default]
    System,
    Dark,
    Light,
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Theme::System => write!(f, "System"),
            Theme::Dark => write!(f, "Dark"),
            Theme::Light => write!(f, "Light"),
        }
    }
}

impl Theme {
    pub fn all() -> &'static [Theme] {
        &[Theme::System, Theme::Dark, Theme::Light]
    }
}

/// Focus timer durations, in minutes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FocusPreferences {
    pub focus_minutes: u32,
    pub short_break_minutes: u32,
    pub long_break_minutes: u32,
    /// Focus sessions completed before a long break is earned
    pub sessions_before_long_break: u32,
}

impl Default for FocusPreferences {
    fn default() -> Self {
        Self {
            focus_minutes: 25,
            short_break_minutes: 5,
            long_break_minutes: 15,
            sessions_before_long_break: 4,
        }
    }
}

/// Application preferences
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Preferences {
    /// Color theme
    pub theme: Theme,
    /// Whether first-run onboarding has been finished
    #[serde(default)]
    pub setup_complete: bool,
    /// Unlocks the hidden developer panel
    #[serde(default)]
    pub developer_mode: bool,
    /// Focus timer durations
    #[serde(default)]
    pub focus: FocusPreferences,
}

impl Preferences {
    /// Get the preferences file path
    pub fn file_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("app", "studynest", "StudyNest")
            .map(|dirs| dirs.config_dir().join("preferences.json"))
    }

    /// Load preferences from file, or return defaults if not found
    pub fn load() -> Self {
        Self::file_path()
            .and_then(|path| Self::load_from_file(&path).ok())
            .unwrap_or_default()
    }

    /// Load preferences from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self, PreferencesError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| PreferencesError::Io(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| PreferencesError::Parse(e.to_string()))
    }

    /// Save preferences to the default file
    pub fn save(&self) -> Result<(), PreferencesError> {
        if let Some(path) = Self::file_path() {
            self.save_to_file(&path)
        } else {
            Err(PreferencesError::Io(
                "Could not determine config directory".to_string(),
            ))
        }
    }

    /// Save preferences to a specific file
    pub fn save_to_file(&self, path: &Path) -> Result<(), PreferencesError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| PreferencesError::Io(e.to_string()))?;
        }

        let content =
            serde_json::to_string_pretty(self).map_err(|e| PreferencesError::Parse(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| PreferencesError::Io(e.to_string()))?;
        Ok(())
    }
}

/// Errors that can occur with preferences
#[derive(Debug, Clone)]
pub enum PreferencesError {
    Io(String),
    Parse(String),
}

impl std::fmt::Display for PreferencesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PreferencesError::Io(e) => write!(f, "IO error: {}", e),
            PreferencesError::Parse(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for PreferencesError {}
