// Keyview Settings Module
// User configuration loaded from ~/.config/keyview/settings.toml

use std::path::{Path, PathBuf};

use crate::catalog::{CatalogError, KeyCatalog};
use crate::key::SHIFT_KEY_ID;
use crate::modifier::ModifierTracker;

/// Runtime settings for the visualizer
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// evdev device names or paths; empty means autodetect
    devices: Vec<String>,

    /// Key ids the Modifier Tracker treats as Shift
    shift_keys: Vec<String>,

    /// Optional custom layout file
    layout_path: Option<PathBuf>,

    /// Whether the headless binary prints new log entries
    echo: bool,

    /// Path to the settings file (for reload and relative layout paths)
    source_path: Option<PathBuf>,
}

/// Errors that can occur when loading settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("Invalid setting value: {0}")]
    InvalidValue(String),

    #[error("Layout error: {0}")]
    Layout(#[from] CatalogError),
}

/// TOML representation for deserializing settings
#[derive(Debug, Clone, serde::Deserialize, Default)]
struct SettingsToml {
    #[serde(default)]
    input: Option<InputSettings>,

    #[serde(default)]
    catalog: Option<CatalogSettings>,

    #[serde(default)]
    log: Option<LogSettings>,
}

#[derive(Debug, Clone, serde::Deserialize, Default)]
struct InputSettings {
    #[serde(default)]
    devices: Option<Vec<String>>,
    #[serde(default)]
    shift_keys: Option<Vec<String>>,
}

#[derive(Debug, Clone, serde::Deserialize, Default)]
struct CatalogSettings {
    #[serde(default)]
    layout: Option<PathBuf>,
}

#[derive(Debug, Clone, serde::Deserialize, Default)]
struct LogSettings {
    #[serde(default)]
    echo: Option<bool>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

impl Settings {
    pub fn new() -> Self {
        Self {
            devices: Vec::new(),
            shift_keys: vec![SHIFT_KEY_ID.to_string()],
            layout_path: None,
            echo: true,
            source_path: None,
        }
    }

    /// Load settings from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(&path)?;
        let mut settings = Self::from_toml(&content)?;
        settings.source_path = Some(path.as_ref().to_path_buf());
        Ok(settings)
    }

    /// Load settings from TOML string
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        let parsed: SettingsToml =
            toml::from_str(content).map_err(|e| SettingsError::TomlParse(e.to_string()))?;

        let mut settings = Self::new();

        if let Some(input) = parsed.input {
            if let Some(devices) = input.devices {
                settings.devices = devices;
            }
            if let Some(shift_keys) = input.shift_keys {
                if shift_keys.is_empty() || shift_keys.iter().any(|k| k.trim().is_empty()) {
                    return Err(SettingsError::InvalidValue(
                        "input.shift_keys must list at least one non-empty key id".to_string(),
                    ));
                }
                settings.shift_keys = shift_keys;
            }
        }

        if let Some(catalog) = parsed.catalog {
            settings.layout_path = catalog.layout;
        }

        if let Some(echo) = parsed.log.and_then(|l| l.echo) {
            settings.echo = echo;
        }

        Ok(settings)
    }

    /// Get the default settings path
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("keyview").join("settings.toml"))
    }

    /// Load from the default location, falling back to defaults when the
    /// file does not exist
    pub fn load_default() -> Result<Self, SettingsError> {
        if let Some(path) = Self::default_path() {
            if path.exists() {
                return Self::from_file(path);
            }
        }
        Ok(Self::new())
    }

    pub fn devices(&self) -> &[String] {
        &self.devices
    }

    /// Replace the device filter (CLI `--devices` wins over the file)
    pub fn set_devices(&mut self, devices: Vec<String>) {
        self.devices = devices;
    }

    pub fn shift_keys(&self) -> &[String] {
        &self.shift_keys
    }

    pub fn echo(&self) -> bool {
        self.echo
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    /// Layout path, resolved against the settings file's directory when
    /// relative
    pub fn layout_path(&self) -> Option<PathBuf> {
        let layout = self.layout_path.as_ref()?;
        if layout.is_absolute() {
            return Some(layout.clone());
        }
        match self.source_path.as_deref().and_then(Path::parent) {
            Some(dir) => Some(dir.join(layout)),
            None => Some(layout.clone()),
        }
    }

    /// The configured catalog, or the standard layout
    pub fn catalog(&self) -> Result<KeyCatalog, SettingsError> {
        match self.layout_path() {
            Some(path) => Ok(KeyCatalog::from_file(path)?),
            None => Ok(KeyCatalog::standard()),
        }
    }

    /// Modifier Tracker recognising the configured Shift keys
    pub fn modifier_tracker(&self) -> ModifierTracker {
        ModifierTracker::with_shift_keys(self.shift_keys.iter().cloned())
    }

    /// Reload settings from the original file
    pub fn reload(&mut self) -> Result<(), SettingsError> {
        match self.source_path.clone() {
            Some(path) => {
                *self = Self::from_file(path)?;
                Ok(())
            }
            None => Err(SettingsError::InvalidValue("No source path set".to_string())),
        }
    }
}

/// Default settings content for a new installation
pub fn default_settings_content() -> &'static str {
    r#"# Keyview Settings
# Place this file at: ~/.config/keyview/settings.toml

[input]
# evdev devices to listen to, by name or path (empty = all keyboards)
devices = []
# Key ids that count as Shift
shift_keys = ["shift"]

[catalog]
# Optional custom layout, relative to this file
# layout = "layout.toml"

[log]
# Print each new event description (headless mode)
echo = true
"#
}
