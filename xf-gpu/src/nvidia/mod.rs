//! NVIDIA GPU identity via `nvidia-smi`
//!
//! The query asks for `name,pci.bus_id` of GPU 0 as CSV without a header
//! row, e.g. `NVIDIA GeForce GT 1030, 00000000:01:00.0`.

use crate::{gpu_const, DisplayGpu, PciAddress, Result};
use xf_error::XrFactsError;
use tracing::{debug, trace};

/// Parse the CSV output of the identity query.
///
/// The first row with a usable bus id wins. The name column may itself
/// contain commas, so each row is split on its last comma.
pub fn parse_query_output(stdout: &str) -> Result<DisplayGpu> {
    for line in stdout.lines() {
        if line.trim().is_empty() {
            continue;
        }

        let Some((name, bus_id)) = line.rsplit_once(',') else {
            trace!("Skipping malformed nvidia-smi line: {}", line);
            continue;
        };
        let name = name.trim();
        let bus_id = bus_id.trim();

        if name.is_empty() || is_unavailable(bus_id) {
            trace!("Skipping nvidia-smi row without identity: {}", line);
            continue;
        }

        match parse_bus_id(bus_id) {
            Some(pci_address) => {
                debug!(gpu = %name, bus_id = %bus_id, "Found display GPU");
                return Ok(DisplayGpu {
                    name: name.to_string(),
                    pci_address,
                });
            }
            None => {
                tracing::warn!("Failed to parse PCI bus id '{}'", bus_id);
            }
        }
    }

    Err(XrFactsError::GpuQuery(
        "nvidia-smi returned no GPU with a PCI bus id".to_string(),
    ))
}

/// Parse a `domain:bus:device.function` hex address.
pub fn parse_bus_id(raw: &str) -> Option<PciAddress> {
    let mut parts = raw.trim().split(':');
    let domain = parts.next()?;
    let bus = parts.next()?;
    let slot = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    let (device, function) = slot.split_once('.')?;

    Some(PciAddress {
        domain: parse_hex(domain)?,
        bus: parse_hex(bus)?,
        device: parse_hex(device)?,
        function: parse_hex(function)?,
    })
}

fn parse_hex(s: &str) -> Option<u32> {
    if s.is_empty() {
        return None;
    }
    u32::from_str_radix(s, 16).ok()
}

fn is_unavailable(s: &str) -> bool {
    s.is_empty() || gpu_const::UNAVAILABLE_MARKERS.contains(&s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query_output() {
        let gpu = parse_query_output("NVIDIA GeForce GT 1030, 00000000:01:00.0\n").unwrap();
        assert_eq!(gpu.name, "NVIDIA GeForce GT 1030");
        assert_eq!(gpu.xorg_bus_id(), "PCI:1@0:0:0");
    }

    #[test]
    fn test_bus_id_fields_are_hex() {
        let addr = parse_bus_id("0000000A:1f:0b.1").unwrap();
        assert_eq!(addr.domain, 10);
        assert_eq!(addr.bus, 31);
        assert_eq!(addr.device, 11);
        assert_eq!(addr.function, 1);
        assert_eq!(addr.to_xorg_bus_id(), "PCI:31@10:11:1");
    }

    #[test]
    fn test_name_with_comma() {
        let gpu = parse_query_output("Quadro K620, rev. B, 00000000:02:00.0").unwrap();
        assert_eq!(gpu.name, "Quadro K620, rev. B");
        assert_eq!(gpu.pci_address.bus, 2);
    }

    #[test]
    fn test_unavailable_bus_id_is_an_error() {
        assert!(parse_query_output("GeForce 210, [N/A]\n").is_err());
        assert!(parse_query_output("").is_err());
        assert!(parse_query_output("no comma here").is_err());
    }

    #[test]
    fn test_malformed_bus_ids() {
        assert!(parse_bus_id("01:00.0").is_none());
        assert!(parse_bus_id("0000:01:00").is_none());
        assert!(parse_bus_id("0000:zz:00.0").is_none());
        assert!(parse_bus_id("0000:01:00.0:1").is_none());
    }

    #[test]
    fn test_skips_unusable_rows_before_usable_one() {
        let out = "Broken, garbage\nGeForce GTX 960, 00000000:03:00.0\n";
        let gpu = parse_query_output(out).unwrap();
        assert_eq!(gpu.name, "GeForce GTX 960");
        assert_eq!(gpu.xorg_bus_id(), "PCI:3@0:0:0");
    }
}
