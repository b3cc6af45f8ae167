//! GPU-related constants

/// Default GPU-info tool
pub const NVIDIA_SMI: &str = "nvidia-smi";

/// Arguments asking for name and PCI bus id of the first GPU, one CSV row without header
pub const QUERY_ARGS: [&str; 3] = ["--query-gpu=name,pci.bus_id", "--format=csv,noheader", "-i0"];

/// Placeholder values nvidia-smi prints for unavailable fields
pub const UNAVAILABLE_MARKERS: [&str; 3] = ["N/A", "[N/A]", "[Not Supported]"];
