//! Persistence module
//!
//! Application settings saved as JSON with serde.

pub mod settings;

pub use settings::{
    default_settings_path, load_from_file, load_or_default, save_to_file, AppSettings,
    AudioSettings, DisplaySettings, SettingsError, WindowSettings, SETTINGS_VERSION,
};
