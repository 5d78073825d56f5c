use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SETTINGS_FILE_NAME: &str = ".lightpdf_settings.json";

/// Flat per-user settings, persisted as a single JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub preview_enabled: bool,
    /// When set, every operation exports here instead of next to its input.
    pub default_output_dir: Option<PathBuf>,
    pub last_used_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            preview_enabled: false,
            default_output_dir: None,
            last_used_dir: dirs::home_dir(),
        }
    }
}

/// Owns the settings value together with the file it persists to. Constructed
/// once in `main` and passed to whichever command needs it; every mutation
/// writes the file back immediately.
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    settings: Settings,
}

impl SettingsStore {
    /// Load from the fixed per-user location (`~/.lightpdf_settings.json`).
    pub fn open_default() -> Self {
        let path = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(SETTINGS_FILE_NAME);
        Self::open(path)
    }

    /// Load from an explicit path. A missing file or malformed content falls
    /// back to defaults; neither is surfaced as an error.
    pub fn open<P: Into<PathBuf>>(path: P) -> Self {
        let path = path.into();
        let settings = match std::fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(settings) => settings,
                Err(err) => {
                    warn!(
                        "malformed settings file {}, using defaults: {}",
                        path.display(),
                        err
                    );
                    Settings::default()
                }
            },
            Err(_) => Settings::default(),
        };
        SettingsStore { path, settings }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_preview_enabled(&mut self, enabled: bool) -> Result<()> {
        self.settings.preview_enabled = enabled;
        self.save()
    }

    pub fn set_default_output_dir(&mut self, dir: Option<PathBuf>) -> Result<()> {
        self.settings.default_output_dir = dir;
        self.save()
    }

    pub fn set_last_used_dir(&mut self, dir: PathBuf) -> Result<()> {
        self.settings.last_used_dir = Some(dir);
        self.save()
    }

    /// Record the directory an operation just read its input from. Failures
    /// here must not fail the operation itself.
    pub fn remember_input_dir(&mut self, input: &Path) {
        let Some(parent) = input.parent().filter(|p| !p.as_os_str().is_empty()) else {
            return;
        };
        if let Err(err) = self.set_last_used_dir(parent.to_path_buf()) {
            warn!("could not persist settings: {:#}", err);
        }
    }

    fn save(&self) -> Result<()> {
        let text = serde_json::to_string_pretty(&self.settings)?;
        std::fs::write(&self.path, text)
            .with_context(|| format!("Failed to write settings: {}", self.path.display()))?;
        Ok(())
    }
}
