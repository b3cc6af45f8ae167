//! xrfacts Core Library
//!
//! Display topology discovery for X11 hosts.
//!
//! # Features
//!
//! - **Topology Parsing**: Screens, connectors, EDIDs and modes from `xrandr --verbose`
//! - **Mode Ranking**: Deterministic scoring against ordered preference lists
//! - **EDID Persistence**: One binary EDID file per connector
//! - **DRM Correlation**: Kernel connectors matched to outputs by EDID bytes
//! - **Enrichment**: Vendor/model via edid-decode, GPU identity via nvidia-smi
//!
//! # Module Structure
//!
//! - `parser/` - Line classification and the topology parser
//! - `engine/` - Mode ranking
//! - `data/` - Data types, EDID persistence, validation
//! - `hw/` - External tools and kernel DRM nodes
//!
//! # Example
//!
//! ```no_run
//! use xf_core::{collect_display_facts, load_settings, SystemCommandRunner};
//!
//! let settings = load_settings().unwrap();
//! let facts = collect_display_facts(&settings, &SystemCommandRunner).unwrap();
//! println!("{}", serde_json::to_string_pretty(&facts).unwrap());
//! ```

// Grouped modules
pub mod data;
pub mod engine;
pub mod hw;
pub mod parser;

// Standalone modules
pub mod constants;
pub mod display;
pub mod error;
pub mod facts;
pub mod settings;

// Re-export primary types from data/
pub use data::{
    connector_type, mode_label, BestOutput, Connector, CorrelationResult, DisplayFacts,
    DrmConnectorRecord, DrmMapping, EdidDescription, Mode, ModeTable, OutputEntry,
    ParseDiagnostic, PersistedEdid, RankedSelection, Resolution, Screen, Topology,
};

// Re-export persistence functions from data/
pub use data::{
    decode_edid_hex, edid_fingerprint, edid_path, persist_edids, read_edid_file,
    write_edid_file,
};

// Re-export validation functions from data/
pub use data::{validate_connector_name, validate_directory, validate_edid_hex};

// Re-export error types
pub use error::{Result, XrFactsError};

// Re-export parser
pub use parser::{classify, looks_like_verbose_listing, parse_verbose, LineKind};

// Re-export engine types
pub use engine::{preference_rank, rank_modes, select, ModeScore, Preferences, RankedMode};

// Re-export hardware functions from hw/
pub use hw::{
    correlate, correlate_persisted, describe_edid, parse_edid_decode, probe_display_gpu,
    query_verbose, scan_drm_connectors, CommandOutput, CommandRunner, EdidReference,
    SystemCommandRunner,
};

// Re-export settings
pub use settings::{
    get_settings_path, load_settings, load_settings_from, validate_settings, FactsSettings,
    PathSettings, ToolSettings,
};

// Re-export the pipeline
pub use facts::{build_facts, collect_display_facts};

// GPU identity type
pub use xf_gpu::DisplayGpu;
