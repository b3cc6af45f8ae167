//! Display Formatting Helpers
//!
//! Plain-text renderings used by the command line frontend.

use crate::data::{Connector, CorrelationResult, Topology};
use crate::engine::{ModeScore, RankedMode};

/// Format a score tuple as `refresh/resolution/WxH/connector`
///
/// # Returns
/// Formatted string like "r2 s1 1280x720 c1"
pub fn format_score(score: &ModeScore) -> String {
    format!(
        "r{} s{} {}x{} c{}",
        score.refresh_rank, score.resolution_rank, score.width, score.height, score.connector_rank
    )
}

/// One line of the ranked mode list, `position` starting at 1
pub fn format_ranked_mode(position: usize, ranked: &RankedMode) -> String {
    format!(
        "{:>3}. {:<12} {:<16} {}",
        position,
        ranked.mode.connector,
        ranked.mode.label(),
        format_score(&ranked.score)
    )
}

/// Size of a hex EDID string in bytes, or "no EDID"
pub fn format_edid_size(hex: &str) -> String {
    if hex.is_empty() {
        "no EDID".to_string()
    } else {
        format!("EDID {} bytes", hex.len() / 2)
    }
}

/// One-line summary of a connector
pub fn format_connector(connector: &Connector) -> String {
    let state = match (connector.connected, connector.primary) {
        (true, true) => "connected primary",
        (true, false) => "connected",
        (false, _) => "disconnected",
    };
    let mut line = format!(
        "{} {}, {} mode(s), {}",
        connector.name,
        state,
        connector.modes.len(),
        format_edid_size(&connector.edid)
    );
    if let Some(current) = &connector.current {
        line.push_str(&format!(", current {}", current));
    }
    line
}

/// Multi-line summary of a parsed topology
pub fn format_topology_summary(topology: &Topology) -> String {
    let mut out = String::new();
    for screen in &topology.screens {
        out.push_str(&screen.name);
        out.push('\n');
        for connector in &screen.connectors {
            out.push_str("  ");
            out.push_str(&format_connector(connector));
            out.push('\n');
        }
    }
    if !topology.diagnostics.is_empty() {
        out.push_str(&format!("{} mode block(s) skipped\n", topology.diagnostics.len()));
    }
    out
}

/// `drm <- xrandr` lines for a correlation result
pub fn format_correlation(result: &CorrelationResult) -> String {
    let mut out = String::new();
    for (role, mapping) in [("primary", &result.primary), ("secondary", &result.secondary)] {
        if let Some(m) = mapping {
            out.push_str(&format!(
                "{}: {} <- {} ({})\n",
                role, m.drm_connector, m.xrandr_connector, m.edid
            ));
        }
    }
    if !result.ignored_outputs.is_empty() {
        out.push_str(&format!("ignored: {}\n", result.ignored_outputs.join(", ")));
    }
    out
}
