//! Fact-gathering pipeline
//!
//! mode listing -> topology -> ranked selection -> EDID files -> DRM
//! correlation -> vendor/model and GPU enrichment -> [`DisplayFacts`].
//!
//! Only EDID persistence can fail a run. Everything else degrades to an
//! empty or defaulted field of the report.

use tracing::{debug, info, warn};

use crate::data::{
    edid_path, persist_edids, BestOutput, CorrelationResult, DisplayFacts, EdidDescription, Mode,
    OutputEntry, Topology,
};
use crate::engine::select;
use crate::error::Result;
use crate::hw::{correlate_persisted, describe_edid, probe_display_gpu, query_verbose, CommandRunner};
use crate::parser::parse_verbose;
use crate::settings::FactsSettings;
use xf_gpu::DisplayGpu;

/// Enumerate, parse and report.
///
/// An unavailable mode-listing tool gives an empty topology, not an error.
pub fn collect_display_facts(settings: &FactsSettings, runner: &dyn CommandRunner) -> Result<DisplayFacts> {
    let topology = match query_verbose(runner, &settings.tools.xrandr, &settings.display) {
        Ok(text) => parse_verbose(&text),
        Err(e) => {
            warn!("Reporting an empty topology: {}", e);
            Topology::default()
        }
    };

    build_facts(topology, settings, runner)
}

/// Everything after parsing, on an already parsed topology
pub fn build_facts(
    topology: Topology,
    settings: &FactsSettings,
    runner: &dyn CommandRunner,
) -> Result<DisplayFacts> {
    let prefs = settings.preferences()?;
    let edid_dir = &settings.paths.edid_dir;

    let edid_files = if settings.write_edids {
        persist_edids(&topology, edid_dir)?
    } else {
        Vec::new()
    };

    let modes = topology.modes();
    let Some(selection) = select(&modes, &prefs) else {
        info!("No display modes found");
        return Ok(DisplayFacts {
            displays: topology,
            edid_files,
            ..Default::default()
        });
    };

    let gpu = probe_display_gpu(runner, &settings.tools.nvidia_smi);
    let entry = |mode: &Mode| output_entry(mode, settings, runner, gpu.as_ref());
    let best_output = BestOutput {
        primary: Some(entry(&selection.primary)),
        secondary: selection.secondary.as_ref().map(entry),
    };

    let drm_correlation = if settings.write_edids {
        correlate_persisted(
            &settings.paths.drm_dir,
            &settings.paths.drm_card,
            edid_dir,
            &selection.primary.connector,
            selection.secondary.as_ref().map(|m| m.connector.as_str()),
        )
    } else {
        debug!("EDID persistence disabled, skipping DRM correlation");
        CorrelationResult::default()
    };

    Ok(DisplayFacts {
        displays: topology,
        best_output,
        drm_correlation,
        edid_files,
    })
}

fn output_entry(
    mode: &Mode,
    settings: &FactsSettings,
    runner: &dyn CommandRunner,
    gpu: Option<&DisplayGpu>,
) -> OutputEntry {
    let edid_path = edid_path(&settings.paths.edid_dir, &mode.connector);
    let description = if edid_path.exists() {
        describe_edid(runner, &settings.tools.edid_decode, &edid_path)
    } else {
        debug!("No EDID file for {}, vendor unknown", mode.connector);
        EdidDescription::unknown()
    };

    OutputEntry {
        connector: mode.connector.clone(),
        resolution: mode.resolution,
        refresh_rate: mode.refresh_rate,
        mode: mode.label(),
        edid_path,
        vendor: description.vendor,
        model: description.model,
        modelines: description.modelines,
        gpu_name: gpu.map(|g| g.name.clone()),
        bus_id: gpu.map(DisplayGpu::xorg_bus_id),
    }
}
