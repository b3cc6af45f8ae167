//! Fact-gathering settings
//!
//! Optional JSON file at ~/.config/xrfacts/settings.json. Every field has a
//! default, so a missing file or a partial one is fine.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::constants::{paths, preferences, tools};
use crate::data::Resolution;
use crate::engine::Preferences;
use crate::error::{Result, XrFactsError};

/// Top-level settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactsSettings {
    /// X display to query
    #[serde(default = "default_display")]
    pub display: String,

    /// Connector types, most preferred first
    #[serde(default = "preferences::outputs")]
    pub preferred_outputs: Vec<String>,

    /// Refresh rates in Hz, most preferred first
    #[serde(default = "preferences::refresh_rates")]
    pub preferred_refreshrates: Vec<u32>,

    /// `WxH` resolutions, most preferred first
    #[serde(default = "preferences::resolutions")]
    pub preferred_resolutions: Vec<String>,

    /// Persist EDIDs and correlate them with the kernel connectors
    #[serde(default = "default_true")]
    pub write_edids: bool,

    #[serde(default)]
    pub paths: PathSettings,

    #[serde(default)]
    pub tools: ToolSettings,
}

/// Filesystem locations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathSettings {
    #[serde(default = "default_edid_dir")]
    pub edid_dir: PathBuf,

    #[serde(default = "default_drm_dir")]
    pub drm_dir: PathBuf,

    /// DRM card whose connectors are scanned, e.g. `card0`
    #[serde(default = "default_drm_card")]
    pub drm_card: String,
}

/// External tool programs, looked up in PATH unless absolute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSettings {
    #[serde(default = "default_xrandr")]
    pub xrandr: String,

    #[serde(default = "default_edid_decode")]
    pub edid_decode: String,

    #[serde(default = "default_nvidia_smi")]
    pub nvidia_smi: String,
}

fn default_display() -> String {
    preferences::DISPLAY.to_string()
}

fn default_true() -> bool {
    true
}

fn default_edid_dir() -> PathBuf {
    PathBuf::from(paths::EDID_DIR)
}

fn default_drm_dir() -> PathBuf {
    PathBuf::from(paths::DRM_DIR)
}

fn default_drm_card() -> String {
    paths::DRM_CARD.to_string()
}

fn default_xrandr() -> String {
    tools::XRANDR.to_string()
}

fn default_edid_decode() -> String {
    tools::EDID_DECODE.to_string()
}

fn default_nvidia_smi() -> String {
    xf_gpu::gpu_const::NVIDIA_SMI.to_string()
}

impl Default for FactsSettings {
    fn default() -> Self {
        Self {
            display: default_display(),
            preferred_outputs: preferences::outputs(),
            preferred_refreshrates: preferences::refresh_rates(),
            preferred_resolutions: preferences::resolutions(),
            write_edids: true,
            paths: PathSettings::default(),
            tools: ToolSettings::default(),
        }
    }
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            edid_dir: default_edid_dir(),
            drm_dir: default_drm_dir(),
            drm_card: default_drm_card(),
        }
    }
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            xrandr: default_xrandr(),
            edid_decode: default_edid_decode(),
            nvidia_smi: default_nvidia_smi(),
        }
    }
}

impl FactsSettings {
    /// Preference lists for the mode ranker
    pub fn preferences(&self) -> Result<Preferences> {
        let resolutions = self
            .preferred_resolutions
            .iter()
            .map(|r| {
                r.parse::<Resolution>().map_err(|_| {
                    XrFactsError::invalid_config("preferred_resolutions", format!("'{}' is not WxH", r))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Preferences {
            resolutions,
            refresh_rates: self.preferred_refreshrates.clone(),
            outputs: self.preferred_outputs.clone(),
        })
    }
}

/// Reject values the pipeline cannot work with
pub fn validate_settings(settings: &FactsSettings) -> Result<()> {
    settings.preferences()?;

    if settings.preferred_refreshrates.contains(&0) {
        return Err(XrFactsError::invalid_config(
            "preferred_refreshrates",
            "refresh rates must be positive",
        ));
    }

    if settings.display.trim().is_empty() {
        return Err(XrFactsError::invalid_config("display", "must not be empty"));
    }

    if settings.paths.drm_card.is_empty() || settings.paths.drm_card.contains('/') {
        return Err(XrFactsError::invalid_config(
            "paths.drm_card",
            format!("'{}' is not a card name", settings.paths.drm_card),
        ));
    }

    for (field, program) in [
        ("tools.xrandr", &settings.tools.xrandr),
        ("tools.edid_decode", &settings.tools.edid_decode),
        ("tools.nvidia_smi", &settings.tools.nvidia_smi),
    ] {
        if program.trim().is_empty() {
            return Err(XrFactsError::invalid_config(field, "program name must not be empty"));
        }
    }

    Ok(())
}

/// Get the settings file path
/// Linux/BSD: ~/.config/xrfacts/settings.json
pub fn get_settings_path() -> Result<PathBuf> {
    let dir = paths::user_config_dir()
        .ok_or_else(|| XrFactsError::config("Could not determine config directory"))?;
    Ok(dir.join(paths::SETTINGS_FILE))
}

/// Load settings from the default location
pub fn load_settings() -> Result<FactsSettings> {
    load_settings_from(&get_settings_path()?)
}

/// Load settings from `path`; a missing file yields the defaults
pub fn load_settings_from(path: &Path) -> Result<FactsSettings> {
    if !path.exists() {
        debug!("No settings file at {:?}, using defaults", path);
        return Ok(FactsSettings::default());
    }

    let content = fs::read_to_string(path).map_err(|e| XrFactsError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let settings: FactsSettings = serde_json::from_str(&content).map_err(|e| {
        warn!("Malformed settings file {:?}", path);
        XrFactsError::JsonParse(e)
    })?;

    validate_settings(&settings)?;
    debug!("Loaded settings from {:?}", path);
    Ok(settings)
}
