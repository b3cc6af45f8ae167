//! Data types, persistence, and validation modules
//!
//! Contains the topology and report structures plus EDID file handling.

mod persistence;
mod types;
mod validation;

pub use types::{
    connector_type, format_modeline, mode_label, BestOutput, Connector, CorrelationResult, DisplayFacts,
    DrmConnectorRecord, DrmMapping, EdidDescription, Mode, ModeTable, OutputEntry,
    ParseDiagnostic, PersistedEdid, RankedSelection, Resolution, Screen, Topology,
};
pub use persistence::{
    decode_edid_hex, edid_fingerprint, edid_path, persist_edids, read_edid_file,
    write_edid_file,
};
pub use validation::{validate_connector_name, validate_directory, validate_edid_hex};
