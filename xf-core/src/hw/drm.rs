//! Kernel DRM connector scan and EDID correlation
//!
//! Kernel connector names (`HDMI-A-1`) and mode-listing connector names
//! (`HDMI-1`) are unrelated vocabularies. The only join key is the raw EDID
//! blob: a kernel connector belongs to a logical output when its `edid`
//! node is byte-identical to the file persisted for that output.
//!
//! Layout scanned:
//!
//! ```text
//! /sys/class/drm/card0-HDMI-A-1/status   "connected" | "disconnected"
//! /sys/class/drm/card0-HDMI-A-1/edid     raw bytes
//! ```
//!
//! Some proprietary drivers expose no connector nodes at all; the result is
//! then simply empty.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace};

use crate::constants::paths;
use crate::data::{edid_path, read_edid_file, CorrelationResult, DrmConnectorRecord, DrmMapping};
use crate::error::Result;

/// EDID bytes persisted for one selected logical output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdidReference {
    pub connector: String,
    pub edid_path: PathBuf,
    pub bytes: Vec<u8>,
}

impl EdidReference {
    /// Read the persisted EDID of `connector` from `edid_dir`
    pub fn load(edid_dir: &Path, connector: &str) -> Result<Self> {
        let edid_path = edid_path(edid_dir, connector);
        let bytes = read_edid_file(&edid_path)?;
        Ok(Self {
            connector: connector.to_string(),
            edid_path,
            bytes,
        })
    }

    fn matches(&self, edid: &[u8]) -> bool {
        !self.bytes.is_empty() && self.bytes == edid
    }

    fn mapping(&self, drm_connector: &str) -> DrmMapping {
        DrmMapping {
            edid: self
                .edid_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            drm_connector: drm_connector.to_string(),
            xrandr_connector: self.connector.clone(),
        }
    }
}

/// Enumerate the connectors of `card` under `drm_dir`, sorted by name.
///
/// Entries without a status node are not connectors and are skipped. An
/// unreadable status counts as disconnected; an unreadable EDID is `None`.
pub fn scan_drm_connectors(drm_dir: &Path, card: &str) -> Vec<DrmConnectorRecord> {
    let entries = match fs::read_dir(drm_dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("No DRM connectors in {:?}: {}", drm_dir, e);
            return Vec::new();
        }
    };

    let prefix = format!("{}-", card);
    let mut records = Vec::new();

    for entry in entries.flatten() {
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str().and_then(|n| n.strip_prefix(&prefix)) else {
            continue;
        };

        let dir = entry.path();
        let status_path = dir.join(paths::DRM_STATUS_FILE);
        if !status_path.exists() {
            trace!("Skipping {:?} (no status node)", dir);
            continue;
        }

        let connected = match fs::read_to_string(&status_path) {
            Ok(status) => status.trim() == "connected",
            Err(e) => {
                debug!("Unreadable status {:?}: {}", status_path, e);
                false
            }
        };

        let edid = if connected {
            match fs::read(dir.join(paths::DRM_EDID_FILE)) {
                Ok(bytes) => Some(bytes),
                Err(e) => {
                    debug!("Unreadable EDID for {}: {}", name, e);
                    None
                }
            }
        } else {
            None
        };

        trace!(connector = name, connected, edid_bytes = edid.as_ref().map(Vec::len), "Found DRM connector");
        records.push(DrmConnectorRecord {
            name: name.to_string(),
            connected,
            edid,
        });
    }

    records.sort_by(|a, b| a.name.cmp(&b.name));
    records
}

/// Match kernel connectors to the selected outputs by EDID bytes.
///
/// Each kernel connector takes at most one role and each role is filled by
/// the first matching connector. A connector carrying the primary's bytes
/// after the primary role is taken is tried against the secondary, which
/// covers two identical monitors. Everything else is ignored.
pub fn correlate(
    records: &[DrmConnectorRecord],
    primary: Option<&EdidReference>,
    secondary: Option<&EdidReference>,
) -> CorrelationResult {
    let mut result = CorrelationResult::default();

    for record in records {
        let edid = match (&record.edid, record.connected) {
            (Some(edid), true) if !edid.is_empty() => edid.as_slice(),
            _ => {
                result.ignored_outputs.push(record.name.clone());
                continue;
            }
        };

        if result.primary.is_none() {
            if let Some(reference) = primary.filter(|r| r.matches(edid)) {
                result.primary = Some(reference.mapping(&record.name));
                continue;
            }
        }

        if result.secondary.is_none() {
            if let Some(reference) = secondary.filter(|r| r.matches(edid)) {
                result.secondary = Some(reference.mapping(&record.name));
                continue;
            }
        }

        result.ignored_outputs.push(record.name.clone());
    }

    info!(
        primary = ?result.primary.as_ref().map(|m| &m.drm_connector),
        secondary = ?result.secondary.as_ref().map(|m| &m.drm_connector),
        ignored = result.ignored_outputs.len(),
        "DRM correlation done"
    );
    result
}

/// Correlate already persisted EDID files with the kernel connectors.
///
/// A reference whose file cannot be read simply matches nothing.
pub fn correlate_persisted(
    drm_dir: &Path,
    card: &str,
    edid_dir: &Path,
    primary: &str,
    secondary: Option<&str>,
) -> CorrelationResult {
    let load = |connector: &str| match EdidReference::load(edid_dir, connector) {
        Ok(reference) => Some(reference),
        Err(e) => {
            debug!("No persisted EDID for {}: {}", connector, e);
            None
        }
    };

    let primary = load(primary);
    let secondary = secondary.and_then(load);
    let records = scan_drm_connectors(drm_dir, card);
    correlate(&records, primary.as_ref(), secondary.as_ref())
}
