//! Constants and configuration values for xrfacts
//!
//! Centralizes paths, tool names, parser tokens and preference defaults.
//! Never use magic strings in other files - add them here first.

/// System paths
pub mod paths {
    /// Directory the EDID blobs are persisted to
    pub const EDID_DIR: &str = "/etc/X11";

    /// File name prefix of a persisted EDID blob: `edid.<connector>.bin`
    pub const EDID_FILE_PREFIX: &str = "edid.";

    /// File name suffix of a persisted EDID blob
    pub const EDID_FILE_SUFFIX: &str = ".bin";

    /// Kernel DRM class directory
    pub const DRM_DIR: &str = "/sys/class/drm";

    /// DRM card whose connectors are correlated
    pub const DRM_CARD: &str = "card0";

    /// Connector status file inside a DRM connector directory
    pub const DRM_STATUS_FILE: &str = "status";

    /// Raw EDID file inside a DRM connector directory
    pub const DRM_EDID_FILE: &str = "edid";

    /// Settings file name inside the user configuration directory
    pub const SETTINGS_FILE: &str = "settings.json";

    /// Application directory name under the configuration base
    pub const APP_DIR: &str = "xrfacts";

    /// User configuration directory
    ///
    /// Honors `XDG_CONFIG_HOME`, then `HOME/.config`, then the platform default.
    pub fn user_config_dir() -> Option<std::path::PathBuf> {
        let config_base = if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
            Some(std::path::PathBuf::from(xdg))
        } else if let Ok(home) = std::env::var("HOME") {
            Some(std::path::PathBuf::from(home).join(".config"))
        } else {
            dirs::config_dir()
        };

        config_base.map(|p| p.join(APP_DIR))
    }
}

/// External tool names and arguments
pub mod tools {
    /// Mode-listing tool
    pub const XRANDR: &str = "xrandr";

    /// EDID decoding tool
    pub const EDID_DECODE: &str = "edid-decode";

    /// edid-decode flags; `X` makes it print X11 modelines
    pub const EDID_DECODE_ARGS: [&str; 1] = ["-LnpsX"];
}

/// Tokens recognized in `xrandr --verbose` output
pub mod xrandr {
    /// Marker line opening a hex EDID block
    pub const EDID_MARKER: &str = "EDID:";

    /// Unit that identifies a mode-timing header line
    pub const PIXEL_CLOCK_UNIT: &str = "MHz";

    /// Interlaced modes are not offered as candidates
    pub const INTERLACE_FLAG: &str = "Interlace";

    /// Annotation on the mode currently in use
    pub const CURRENT_FLAG: &str = "*current";

    /// Annotation on the mode the monitor prefers
    pub const PREFERRED_FLAG: &str = "+preferred";

    /// Prefix of the horizontal timing continuation line
    pub const HORIZONTAL_PREFIX: &str = "h:";

    /// Prefix of the vertical timing continuation line
    pub const VERTICAL_PREFIX: &str = "v:";

    /// Unit suffix on the vertical refresh clock
    pub const REFRESH_UNIT: &str = "Hz";
}

/// Values reported when enrichment is unavailable
pub mod enrichment {
    /// Vendor/model placeholder
    pub const UNKNOWN: &str = "Unknown";

    /// edid-decode label carrying the PNP vendor
    pub const MANUFACTURER_LABEL: &str = "Manufacturer:";

    /// edid-decode label carrying the monitor name
    pub const PRODUCT_NAME_LABEL: &str = "Display Product Name:";

    /// edid-decode line prefix of an X11 modeline
    pub const MODELINE_PREFIX: &str = "Modeline";
}

/// Default preference lists, most preferred first
pub mod preferences {
    /// Connector type prefixes
    pub fn outputs() -> Vec<String> {
        ["HDMI", "DP", "eDP", "DVI", "VGA", "TV", "Virtual"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Refresh rates in Hz
    pub fn refresh_rates() -> Vec<u32> {
        vec![50, 60, 75, 30, 25]
    }

    /// Resolutions as `WxH`
    pub fn resolutions() -> Vec<String> {
        ["7680x4320", "3840x2160", "1920x1080", "1280x720", "720x576"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// X display to query
    pub const DISPLAY: &str = ":0";
}
