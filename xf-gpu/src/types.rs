//! GPU data types

use serde::{Deserialize, Serialize};

/// PCI address as printed by nvidia-smi: `domain:bus:device.function`, all hex
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct PciAddress {
    pub domain: u32,
    pub bus: u32,
    pub device: u32,
    pub function: u32,
}

impl PciAddress {
    /// Format in the X.Org `BusID` notation, decimal fields: `PCI:bus@domain:device:function`
    pub fn to_xorg_bus_id(&self) -> String {
        format!(
            "PCI:{}@{}:{}:{}",
            self.bus, self.domain, self.device, self.function
        )
    }
}

/// The GPU driving the displays, as reported by the GPU-info tool
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct DisplayGpu {
    /// GPU name/model
    pub name: String,
    /// PCI address of the device
    pub pci_address: PciAddress,
}

impl DisplayGpu {
    /// Bus id in the form expected by the X server configuration
    pub fn xorg_bus_id(&self) -> String {
        self.pci_address.to_xorg_bus_id()
    }
}
