//! Hardware and external tool access
//!
//! Kernel DRM connector nodes plus the three external tools: the mode
//! lister, the EDID decoder and the GPU-info tool.

pub mod command;
mod drm;
mod edid;
mod gpu;
mod xrandr;

pub use command::{run_checked, CommandOutput, CommandRunner, SystemCommandRunner};
pub use drm::{correlate, correlate_persisted, scan_drm_connectors, EdidReference};
pub use edid::{describe_edid, parse_edid_decode, rename_modeline};
pub use gpu::probe_display_gpu;
pub use xrandr::{query_verbose, xrandr_args};
