//! EDID persistence
//!
//! Writes one binary EDID file per connector to `<dir>/edid.<connector>.bin`.
//! The files outlive the run: the DRM correlator and the EDID decoder read
//! them back, and X.Org configs may reference them later.

use sha2::{Digest, Sha256};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::constants::paths;
use crate::data::types::{PersistedEdid, Topology};
use crate::data::validation::{validate_connector_name, validate_directory, validate_edid_hex};
use crate::error::{Result, XrFactsError};

/// Path of the EDID file for a connector
pub fn edid_path(dir: &Path, connector: &str) -> PathBuf {
    dir.join(format!(
        "{}{}{}",
        paths::EDID_FILE_PREFIX,
        connector,
        paths::EDID_FILE_SUFFIX
    ))
}

/// Decode a hex EDID string into raw bytes
pub fn decode_edid_hex(hex: &str) -> Result<Vec<u8>> {
    validate_edid_hex(hex)?;

    hex.as_bytes()
        .chunks(2)
        .map(|pair| {
            let digits = std::str::from_utf8(pair)
                .map_err(|e| XrFactsError::InvalidEdid(e.to_string()))?;
            u8::from_str_radix(digits, 16).map_err(|e| XrFactsError::InvalidEdid(e.to_string()))
        })
        .collect()
}

/// SHA-256 of an EDID blob as lowercase hex
pub fn edid_fingerprint(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Write the EDID of every connector that has one, overwriting old files.
///
/// Any failure aborts: the correlator depends on these files, so a run
/// with a partially written set is not usable.
pub fn persist_edids(topology: &Topology, dir: &Path) -> Result<Vec<PersistedEdid>> {
    if topology.connectors().all(|c| c.edid.is_empty()) {
        debug!("No EDID data to persist");
        return Ok(Vec::new());
    }
    validate_directory(dir)?;

    let mut written = Vec::new();
    for connector in topology.connectors() {
        if connector.edid.is_empty() {
            continue;
        }

        let name = validate_connector_name(&connector.name)?;
        let bytes = decode_edid_hex(&connector.edid)?;
        let path = edid_path(dir, name);
        write_edid_file(&path, &bytes)?;

        let sha256 = edid_fingerprint(&bytes);
        debug!(connector = %name, path = %path.display(), sha256 = %sha256, "Wrote EDID");
        written.push(PersistedEdid {
            connector: name.to_string(),
            path,
            bytes: bytes.len(),
            sha256,
        });
    }

    info!("Persisted {} EDID file(s) to {:?}", written.len(), dir);
    Ok(written)
}

/// Atomically replace `path` with `bytes`
pub fn write_edid_file(path: &Path, bytes: &[u8]) -> Result<()> {
    let temp_path = path.with_extension("bin.tmp");

    let mut file = fs::File::create(&temp_path)
        .map_err(|e| XrFactsError::FileWrite { path: temp_path.clone(), source: e })?;

    file.write_all(bytes)
        .map_err(|e| XrFactsError::FileWrite { path: temp_path.clone(), source: e })?;

    file.sync_all()
        .map_err(|e| XrFactsError::FileWrite { path: temp_path.clone(), source: e })?;

    drop(file);

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        XrFactsError::FileWrite { path: path.to_path_buf(), source: e }
    })
}

/// Read a persisted EDID file
pub fn read_edid_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| XrFactsError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::types::{Connector, Screen};
    use tempfile::TempDir;

    const EDID_HEX: &str = "00ffffffffffff004c2d0d0a01000000";

    fn topology_with(connectors: Vec<Connector>) -> Topology {
        let mut screen = Screen::new("Screen 0");
        for c in connectors {
            screen.upsert_connector(c);
        }
        Topology {
            screens: vec![screen],
            diagnostics: Vec::new(),
        }
    }

    fn connector_with_edid(name: &str, edid: &str) -> Connector {
        let mut c = Connector::new(name, true, false);
        c.edid = edid.to_string();
        c
    }

    #[test]
    fn test_edid_path() {
        assert_eq!(
            edid_path(Path::new("/etc/X11"), "HDMI-1"),
            PathBuf::from("/etc/X11/edid.HDMI-1.bin")
        );
    }

    #[test]
    fn test_decode_edid_hex() {
        assert_eq!(decode_edid_hex("00ff7A").unwrap(), vec![0x00, 0xff, 0x7a]);
        assert!(decode_edid_hex("00f").is_err());
        assert!(decode_edid_hex("zz").is_err());
        assert!(decode_edid_hex("").unwrap().is_empty());
    }

    #[test]
    fn test_persist_and_read_back_is_byte_identical() {
        let dir = TempDir::new().unwrap();
        let topology = topology_with(vec![connector_with_edid("HDMI-1", EDID_HEX)]);

        let written = persist_edids(&topology, dir.path()).unwrap();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].bytes, 16);

        let read_back = read_edid_file(&edid_path(dir.path(), "HDMI-1")).unwrap();
        assert_eq!(read_back, decode_edid_hex(EDID_HEX).unwrap());
        assert_eq!(written[0].sha256, edid_fingerprint(&read_back));
    }

    #[test]
    fn test_skips_connectors_without_edid() {
        let dir = TempDir::new().unwrap();
        let topology = topology_with(vec![
            connector_with_edid("HDMI-1", EDID_HEX),
            Connector::new("DP-1", false, false),
        ]);

        let written = persist_edids(&topology, dir.path()).unwrap();
        assert_eq!(written.len(), 1);
        assert!(!edid_path(dir.path(), "DP-1").exists());
    }

    #[test]
    fn test_overwrites_previous_content() {
        let dir = TempDir::new().unwrap();
        let path = edid_path(dir.path(), "HDMI-1");
        fs::write(&path, b"stale data from an earlier run").unwrap();

        let topology = topology_with(vec![connector_with_edid("HDMI-1", "0102")]);
        persist_edids(&topology, dir.path()).unwrap();

        assert_eq!(fs::read(&path).unwrap(), vec![0x01, 0x02]);
        assert!(!path.with_extension("bin.tmp").exists());
    }

    #[test]
    fn test_missing_directory_is_fatal() {
        let dir = TempDir::new().unwrap();
        let topology = topology_with(vec![connector_with_edid("HDMI-1", EDID_HEX)]);

        let err = persist_edids(&topology, &dir.path().join("missing")).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_nothing_to_write_needs_no_directory() {
        let dir = TempDir::new().unwrap();
        let topology = topology_with(vec![Connector::new("HDMI-1", true, false)]);

        let written = persist_edids(&topology, &dir.path().join("missing")).unwrap();
        assert!(written.is_empty());
    }

    #[test]
    fn test_unsafe_connector_name_is_rejected() {
        let dir = TempDir::new().unwrap();
        let topology = topology_with(vec![connector_with_edid("../HDMI-1", EDID_HEX)]);

        let err = persist_edids(&topology, dir.path()).unwrap_err();
        assert!(matches!(err, XrFactsError::InvalidPath { .. }));
    }
}
