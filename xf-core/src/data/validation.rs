//! Input validation for xrfacts
//!
//! Connector names come verbatim from an external tool and end up in
//! file names under a system directory, so they are checked before any
//! path is built from them.

use std::path::Path;

use crate::error::{Result, XrFactsError};

/// Validates that a connector name can be used as part of a file name
pub fn validate_connector_name(name: &str) -> Result<&str> {
    if name.is_empty() {
        return Err(XrFactsError::invalid_path(name, "empty connector name"));
    }

    if name == "." || name == ".." || name.contains('/') || name.contains('\0') {
        return Err(XrFactsError::invalid_path(
            name,
            "connector name is not a plain file name component",
        ));
    }

    if name.chars().any(|c| c.is_control() || c.is_whitespace()) {
        return Err(XrFactsError::invalid_path(
            name,
            "connector name contains whitespace or control characters",
        ));
    }

    Ok(name)
}

/// Validates that a string is an even-length run of hex digits
pub fn validate_edid_hex(hex: &str) -> Result<()> {
    if hex.len() % 2 != 0 {
        return Err(XrFactsError::InvalidEdid(format!(
            "odd number of hex digits ({})",
            hex.len()
        )));
    }

    if let Some(pos) = hex.bytes().position(|b| !b.is_ascii_hexdigit()) {
        return Err(XrFactsError::InvalidEdid(format!(
            "non-hex character at offset {}",
            pos
        )));
    }

    Ok(())
}

/// Validates that a directory exists and is a directory
pub fn validate_directory(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(XrFactsError::invalid_path(path, "directory does not exist"));
    }
    if !path.is_dir() {
        return Err(XrFactsError::invalid_path(path, "not a directory"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_connector_name() {
        assert!(validate_connector_name("HDMI-1").is_ok());
        assert!(validate_connector_name("eDP-1-1").is_ok());
        assert!(validate_connector_name("Virtual1").is_ok());
        assert!(validate_connector_name("").is_err());
        assert!(validate_connector_name("..").is_err());
        assert!(validate_connector_name("../../etc/passwd").is_err());
        assert!(validate_connector_name("HDMI 1").is_err());
    }

    #[test]
    fn test_validate_edid_hex() {
        assert!(validate_edid_hex("00ffffffffffff00").is_ok());
        assert!(validate_edid_hex("").is_ok());
        assert!(validate_edid_hex("0ff").is_err());
        assert!(validate_edid_hex("00fg").is_err());
    }

    #[test]
    fn test_validate_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(validate_directory(dir.path()).is_ok());
        assert!(validate_directory(&dir.path().join("missing")).is_err());

        let file = dir.path().join("file");
        std::fs::write(&file, b"x").unwrap();
        assert!(validate_directory(&file).is_err());
    }
}
