//! Application preferences stored as JSON.
//!
//! Only preferences live here. Band configurations are never persisted.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dsp::source::{TestSource, DEFAULT_TONE_HZ};
use crate::editor::band::{MAX_FREQ, MIN_FREQ};
use crate::editor::frame::DEFAULT_CURVE_STEP;
use crate::engine::audio_processor::{DEFAULT_LEVEL_DB, MAX_LEVEL_DB, MIN_LEVEL_DB};

/// Current settings format version.
pub const SETTINGS_VERSION: u32 = 1;

/// Bounds for the curve sampling step, in surface units.
pub const CURVE_STEP_RANGE: (f32, f32) = (0.5, 16.0);

const MIN_WINDOW: (f32, f32) = (640.0, 420.0);

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("File error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Incompatible settings version: found {found}, expected <= {expected}")]
    IncompatibleVersion { found: u32, expected: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Start the preview signal when the app opens.
    pub autostart: bool,
    pub source: TestSource,
    pub tone_hz: f32,
    pub level_db: f32,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            autostart: false,
            source: TestSource::default(),
            tone_hz: DEFAULT_TONE_HZ,
            level_db: DEFAULT_LEVEL_DB,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    pub show_spectrum: bool,
    pub curve_step: f32,
    pub show_labels: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            show_spectrum: true,
            curve_step: DEFAULT_CURVE_STEP,
            show_labels: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub width: f32,
    pub height: f32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: 1100.0,
            height: 720.0,
        }
    }
}

/// Everything persisted between sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub version: u32,
    pub audio: AudioSettings,
    pub display: DisplaySettings,
    pub window: WindowSettings,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            audio: AudioSettings::default(),
            display: DisplaySettings::default(),
            window: WindowSettings::default(),
        }
    }
}

impl AppSettings {
    pub fn is_compatible(&self) -> bool {
        self.version <= SETTINGS_VERSION
    }

    /// Pulls every value into its valid range. Non-finite values fall back to
    /// their defaults.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        let fix = |value: f32, fallback: f32, min: f32, max: f32| {
            if value.is_finite() {
                value.clamp(min, max)
            } else {
                fallback
            }
        };

        self.version = SETTINGS_VERSION;
        self.audio.tone_hz = fix(self.audio.tone_hz, defaults.audio.tone_hz, MIN_FREQ, MAX_FREQ);
        self.audio.level_db = fix(
            self.audio.level_db,
            defaults.audio.level_db,
            MIN_LEVEL_DB,
            MAX_LEVEL_DB,
        );
        self.display.curve_step = fix(
            self.display.curve_step,
            defaults.display.curve_step,
            CURVE_STEP_RANGE.0,
            CURVE_STEP_RANGE.1,
        );
        self.window.width = fix(self.window.width, defaults.window.width, MIN_WINDOW.0, 8192.0);
        self.window.height = fix(self.window.height, defaults.window.height, MIN_WINDOW.1, 8192.0);
        self
    }
}

/// `<config_dir>/eq-editor/settings.json`, falling back to the home or
/// working directory.
pub fn default_settings_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
        .join("eq-editor")
        .join("settings.json")
}

/// Writes settings as pretty JSON, creating the parent directory.
pub fn save_to_file(settings: &AppSettings, path: &Path) -> Result<(), SettingsError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(settings)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Reads settings, rejecting files written by a newer version.
pub fn load_from_file(path: &Path) -> Result<AppSettings, SettingsError> {
    let json = std::fs::read_to_string(path)?;
    let settings: AppSettings = serde_json::from_str(&json)?;

    if !settings.is_compatible() {
        return Err(SettingsError::IncompatibleVersion {
            found: settings.version,
            expected: SETTINGS_VERSION,
        });
    }

    Ok(settings.sanitized())
}

/// Loads settings for startup. Never fails.
///
/// A missing file gives defaults. An unreadable or malformed file gives
/// defaults and a warning.
pub fn load_or_default(path: &Path) -> AppSettings {
    if !path.exists() {
        log::info!("[settings] no settings at {:?}, using defaults", path);
        return AppSettings::default();
    }

    match load_from_file(path) {
        Ok(settings) => {
            log::info!("[settings] loaded from {:?}", path);
            settings
        }
        Err(e) => {
            log::warn!("[settings] {}; using defaults", e);
            AppSettings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("eq-editor-test-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_defaults() {
        let settings = AppSettings::default();
        assert_eq!(settings.version, SETTINGS_VERSION);
        assert!(!settings.audio.autostart);
        assert_eq!(settings.audio.source, TestSource::PinkNoise);
        assert!(settings.display.show_spectrum);
        assert_eq!(settings.display.curve_step, DEFAULT_CURVE_STEP);
    }

    #[test]
    fn test_file_round_trip() {
        let path = temp_path("round_trip/settings.json");
        let mut settings = AppSettings::default();
        settings.audio.source = TestSource::Tone;
        settings.audio.tone_hz = 440.0;
        settings.display.show_labels = false;
        settings.window.width = 1400.0;

        save_to_file(&settings, &path).unwrap();
        let loaded = load_from_file(&path).unwrap();
        assert_eq!(loaded, settings);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = temp_path("does/not/exist.json");
        assert_eq!(load_or_default(&path), AppSettings::default());
    }

    #[test]
    fn test_malformed_file_gives_defaults() {
        let path = temp_path("malformed/settings.json");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(load_from_file(&path), Err(SettingsError::Json(_))));
        assert_eq!(load_or_default(&path), AppSettings::default());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let json = r#"{ "audio": { "source": "white_noise" } }"#;
        let settings: AppSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.audio.source, TestSource::WhiteNoise);
        assert_eq!(settings.audio.level_db, DEFAULT_LEVEL_DB);
        assert_eq!(settings.display, DisplaySettings::default());
    }

    #[test]
    fn test_future_version_rejected() {
        let path = temp_path("future/settings.json");
        let settings = AppSettings {
            version: SETTINGS_VERSION + 1,
            ..AppSettings::default()
        };
        save_to_file(&settings, &path).unwrap();
        assert!(matches!(
            load_from_file(&path),
            Err(SettingsError::IncompatibleVersion { .. })
        ));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_sanitized_clamps() {
        let mut settings = AppSettings::default();
        settings.audio.level_db = 12.0;
        settings.audio.tone_hz = 5.0;
        settings.display.curve_step = 0.0;
        settings.window.width = 10.0;

        let clean = settings.sanitized();
        assert_eq!(clean.audio.level_db, MAX_LEVEL_DB);
        assert_eq!(clean.audio.tone_hz, MIN_FREQ);
        assert_eq!(clean.display.curve_step, CURVE_STEP_RANGE.0);
        assert_eq!(clean.window.width, MIN_WINDOW.0);
    }

    #[test]
    fn test_settings_path_name() {
        let path = default_settings_path();
        assert!(path.ends_with("eq-editor/settings.json"));
    }
}
