//! Core data types for xrfacts
//!
//! Defines the display topology built by the parser, the flattened mode
//! candidates fed to the ranker and the report structures.

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::constants::enrichment;
use crate::error::{Result, XrFactsError};

// ============================================================================
// Resolution
// ============================================================================

/// A `WxH` resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Resolution {
    type Err = XrFactsError;

    /// Accepts only `<digits>x<digits>`
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || XrFactsError::InvalidResolution(s.to_string());

        let (w, h) = s.split_once('x').ok_or_else(invalid)?;
        let all_digits = |p: &str| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(w) || !all_digits(h) {
            return Err(invalid());
        }

        Ok(Self {
            width: w.parse().map_err(|_| invalid())?,
            height: h.parse().map_err(|_| invalid())?,
        })
    }
}

impl Serialize for Resolution {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Resolution {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Label of a mode as used by X.Org configs: `<resolution>_<rate>`
pub fn mode_label(resolution: &Resolution, refresh_rate: u32) -> String {
    format!("{}_{}", resolution, refresh_rate)
}

/// `Modeline "<name>"  <timings>`, the spacing xrandr and X.Org logs use
pub fn format_modeline(name: &str, timings: &str) -> String {
    format!("{} \"{}\"  {}", enrichment::MODELINE_PREFIX, name, timings.trim())
        .trim_end()
        .to_string()
}

// ============================================================================
// Topology
// ============================================================================

/// Refresh rates per resolution, in discovery order
///
/// Every rate is listed once per resolution; a rate never exists without
/// its resolution key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModeTable {
    entries: Vec<(Resolution, Vec<u32>)>,
}

impl ModeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a mode, returning false if it was already known
    pub fn insert(&mut self, resolution: Resolution, refresh_rate: u32) -> bool {
        match self.entries.iter_mut().find(|(r, _)| *r == resolution) {
            Some((_, rates)) => {
                if rates.contains(&refresh_rate) {
                    false
                } else {
                    rates.push(refresh_rate);
                    true
                }
            }
            None => {
                self.entries.push((resolution, vec![refresh_rate]));
                true
            }
        }
    }

    /// Rates known for a resolution
    pub fn rates(&self, resolution: &Resolution) -> Option<&[u32]> {
        self.entries
            .iter()
            .find(|(r, _)| r == resolution)
            .map(|(_, rates)| rates.as_slice())
    }

    pub fn contains(&self, resolution: &Resolution, refresh_rate: u32) -> bool {
        self.rates(resolution)
            .map(|rates| rates.contains(&refresh_rate))
            .unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Resolution, &[u32])> {
        self.entries.iter().map(|(r, rates)| (r, rates.as_slice()))
    }

    /// Number of (resolution, rate) pairs
    pub fn len(&self) -> usize {
        self.entries.iter().map(|(_, rates)| rates.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ModeTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (resolution, rates) in &self.entries {
            map.serialize_entry(&resolution.to_string(), rates)?;
        }
        map.end()
    }
}

/// A named output port as reported by the mode-listing tool
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Connector {
    #[serde(skip)]
    pub name: String,
    pub connected: bool,
    /// The X server marks one output as primary
    pub primary: bool,
    /// Hex EDID, empty when the tool printed none
    pub edid: String,
    pub modes: ModeTable,
    /// X.Org modelines keyed by mode label
    pub modelines: BTreeMap<String, String>,
    pub preferred: Option<String>,
    pub current: Option<String>,
}

impl Connector {
    pub fn new(name: impl Into<String>, connected: bool, primary: bool) -> Self {
        Self {
            name: name.into(),
            connected,
            primary,
            edid: String::new(),
            modes: ModeTable::new(),
            modelines: BTreeMap::new(),
            preferred: None,
            current: None,
        }
    }
}

/// Connector name truncated at the first hyphen
pub fn connector_type(name: &str) -> &str {
    name.split('-').next().unwrap_or(name)
}

/// An X screen and its connectors in discovery order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub name: String,
    pub connectors: Vec<Connector>,
}

impl Screen {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            connectors: Vec::new(),
        }
    }

    pub fn connector(&self, name: &str) -> Option<&Connector> {
        self.connectors.iter().find(|c| c.name == name)
    }

    /// Insert a connector, replacing one with the same name in place.
    /// Returns its index.
    pub fn upsert_connector(&mut self, connector: Connector) -> usize {
        match self.connectors.iter().position(|c| c.name == connector.name) {
            Some(idx) => {
                self.connectors[idx] = connector;
                idx
            }
            None => {
                self.connectors.push(connector);
                self.connectors.len() - 1
            }
        }
    }
}

impl Serialize for Screen {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.connectors.len()))?;
        for connector in &self.connectors {
            map.serialize_entry(&connector.name, connector)?;
        }
        map.end()
    }
}

/// A mode block the parser had to drop
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseDiagnostic {
    /// 1-based line number of the offending block
    pub line: usize,
    pub reason: String,
}

/// Everything parsed from one mode-listing run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Topology {
    pub screens: Vec<Screen>,
    pub diagnostics: Vec<ParseDiagnostic>,
}

impl Topology {
    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }

    pub fn screen(&self, name: &str) -> Option<&Screen> {
        self.screens.iter().find(|s| s.name == name)
    }

    /// All connectors across all screens
    pub fn connectors(&self) -> impl Iterator<Item = &Connector> {
        self.screens.iter().flat_map(|s| s.connectors.iter())
    }

    /// Flatten every connector's mode table into ranking candidates
    pub fn modes(&self) -> Vec<Mode> {
        let mut modes = Vec::new();
        for connector in self.connectors() {
            for (resolution, rates) in connector.modes.iter() {
                for &refresh_rate in rates {
                    modes.push(Mode {
                        connector: connector.name.clone(),
                        resolution: *resolution,
                        refresh_rate,
                    });
                }
            }
        }
        modes
    }
}

impl Serialize for Topology {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.screens.len()))?;
        for screen in &self.screens {
            map.serialize_entry(&screen.name, screen)?;
        }
        map.end()
    }
}

// ============================================================================
// Ranking Types
// ============================================================================

/// A candidate mode: one (connector, resolution, refresh rate) triple
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Mode {
    pub connector: String,
    pub resolution: Resolution,
    pub refresh_rate: u32,
}

impl Mode {
    pub fn new(connector: impl Into<String>, resolution: Resolution, refresh_rate: u32) -> Self {
        Self {
            connector: connector.into(),
            resolution,
            refresh_rate,
        }
    }

    pub fn label(&self) -> String {
        mode_label(&self.resolution, self.refresh_rate)
    }
}

/// Best mode overall plus the best mode on any other connector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedSelection {
    pub primary: Mode,
    pub secondary: Option<Mode>,
}

// ============================================================================
// Persistence and Correlation Types
// ============================================================================

/// An EDID blob written to disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersistedEdid {
    pub connector: String,
    pub path: PathBuf,
    pub bytes: usize,
    /// SHA-256 of the blob, lowercase hex
    pub sha256: String,
}

/// A kernel connector as found under the DRM class directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrmConnectorRecord {
    /// Name without the card prefix, e.g. `HDMI-A-1`
    pub name: String,
    pub connected: bool,
    /// Raw EDID bytes; None when unreadable or not connected
    pub edid: Option<Vec<u8>>,
}

/// One tool connector joined to one kernel connector
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrmMapping {
    /// Basename of the persisted EDID file
    pub edid: String,
    pub drm_connector: String,
    pub xrandr_connector: String,
}

/// Result of joining tool connectors to kernel connectors by EDID bytes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CorrelationResult {
    pub primary: Option<DrmMapping>,
    pub secondary: Option<DrmMapping>,
    pub ignored_outputs: Vec<String>,
}

impl CorrelationResult {
    pub fn is_empty(&self) -> bool {
        self.primary.is_none() && self.secondary.is_none() && self.ignored_outputs.is_empty()
    }
}

// ============================================================================
// Report Types
// ============================================================================

/// Vendor, model and modelines decoded from an EDID file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdidDescription {
    pub vendor: String,
    pub model: String,
    pub modelines: Vec<String>,
}

/// A selected output in the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputEntry {
    pub connector: String,
    pub resolution: Resolution,
    pub refresh_rate: u32,
    pub mode: String,
    pub edid_path: PathBuf,
    pub vendor: String,
    pub model: String,
    pub modelines: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpu_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bus_id: Option<String>,
}

/// Primary and optional secondary recommendation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BestOutput {
    pub primary: Option<OutputEntry>,
    pub secondary: Option<OutputEntry>,
}

/// The complete fact report
#[derive(Debug, Clone, Default, Serialize)]
pub struct DisplayFacts {
    pub displays: Topology,
    pub best_output: BestOutput,
    pub drm_correlation: CorrelationResult,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub edid_files: Vec<PersistedEdid>,
}
