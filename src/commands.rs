/*
 * This file is part of xrfacts.
 *
 * Copyright (C) 2025 xrfacts contributors
 *
 * xrfacts is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * xrfacts is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with xrfacts. If not, see <https://www.gnu.org/licenses/>.
 */

//! Subcommand handlers
//!
//! Reports go to `out`; logs and diagnostics go to stderr.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::fs;
use std::io::{Read, Write};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::cli::{Cli, CollectArgs, Commands, SettingsCommands};
use xf_core::display::{format_correlation, format_ranked_mode, format_topology_summary};
use xf_core::{
    collect_display_facts, correlate_persisted, get_settings_path, load_settings,
    load_settings_from, looks_like_verbose_listing, parse_verbose, probe_display_gpu,
    query_verbose, rank_modes, validate_settings, CommandRunner, FactsSettings,
};

/// Dispatch the parsed command line
pub fn run(cli: &Cli, runner: &dyn CommandRunner, out: &mut dyn Write) -> Result<()> {
    let settings = resolve_settings(cli)?;

    match &cli.command {
        Commands::Collect(args) => cmd_collect(settings, args, runner, out),
        Commands::Parse { input, summary } => {
            cmd_parse(&settings, input.as_deref(), *summary, runner, out)
        }
        Commands::Rank { input, limit } => cmd_rank(&settings, input.as_deref(), *limit, runner, out),
        Commands::Correlate { primary, secondary, summary } => {
            cmd_correlate(&settings, primary, secondary.as_deref(), *summary, out)
        }
        Commands::Gpu => cmd_gpu(&settings, runner, out),
        Commands::Settings(SettingsCommands::Show) => write_json(out, &settings, false),
        Commands::Settings(SettingsCommands::Path) => cmd_settings_path(cli, out),
    }
}

/// Settings from `--config` or the default location, with `--display` applied
///
/// A missing default file means defaults; a missing explicit file is an error.
pub fn resolve_settings(cli: &Cli) -> Result<FactsSettings> {
    let mut settings = match &cli.config {
        Some(path) => {
            if !path.exists() {
                bail!("Settings file {} does not exist", path.display());
            }
            load_settings_from(path)
                .with_context(|| format!("Failed to load settings from {}", path.display()))?
        }
        None => load_settings().context("Failed to load settings")?,
    };

    if let Some(display) = &cli.display {
        settings.display = display.clone();
    }

    validate_settings(&settings).context("Invalid settings")?;
    Ok(settings)
}

/// Mode listing text from a file, stdin (`-`) or the live tool
///
/// An unavailable tool yields empty text, which parses to an empty topology.
fn read_input(settings: &FactsSettings, input: Option<&Path>, runner: &dyn CommandRunner) -> Result<String> {
    let text = match input {
        None => match query_verbose(runner, &settings.tools.xrandr, &settings.display) {
            Ok(text) => text,
            Err(e) => {
                warn!("Mode listing unavailable: {}", e);
                String::new()
            }
        },
        Some(path) if path.as_os_str() == "-" => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read mode listing from stdin")?;
            text
        }
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read mode listing {}", path.display()))?,
    };

    if !text.is_empty() && !looks_like_verbose_listing(&text) {
        warn!("Input does not look like a verbose mode listing");
    }
    Ok(text)
}

fn write_json<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T, compact: bool) -> Result<()> {
    if compact {
        serde_json::to_writer(&mut *out, value)?;
    } else {
        serde_json::to_writer_pretty(&mut *out, value)?;
    }
    writeln!(out)?;
    Ok(())
}

fn cmd_collect(
    mut settings: FactsSettings,
    args: &CollectArgs,
    runner: &dyn CommandRunner,
    out: &mut dyn Write,
) -> Result<()> {
    if args.no_write_edids {
        settings.write_edids = false;
    }
    if let Some(dir) = &args.edid_dir {
        settings.paths.edid_dir = dir.clone();
    }
    debug!(display = %settings.display, write_edids = settings.write_edids, "Collecting display facts");

    let facts = collect_display_facts(&settings, runner).context("Failed to collect display facts")?;
    write_json(out, &facts, args.compact)
}

fn cmd_parse(
    settings: &FactsSettings,
    input: Option<&Path>,
    summary: bool,
    runner: &dyn CommandRunner,
    out: &mut dyn Write,
) -> Result<()> {
    let topology = parse_verbose(&read_input(settings, input, runner)?);

    if summary {
        write!(out, "{}", format_topology_summary(&topology))?;
        return Ok(());
    }

    write_json(out, &topology, false)?;
    if !topology.diagnostics.is_empty() {
        eprintln!("{} mode block(s) skipped", topology.diagnostics.len());
        for d in &topology.diagnostics {
            eprintln!("  line {}: {}", d.line, d.reason);
        }
    }
    Ok(())
}

fn cmd_rank(
    settings: &FactsSettings,
    input: Option<&Path>,
    limit: Option<usize>,
    runner: &dyn CommandRunner,
    out: &mut dyn Write,
) -> Result<()> {
    let prefs = settings.preferences()?;
    let topology = parse_verbose(&read_input(settings, input, runner)?);
    let ranked = rank_modes(&topology.modes(), &prefs);
    info!("{} candidate mode(s)", ranked.len());

    let shown = limit.unwrap_or(ranked.len());
    for (i, mode) in ranked.iter().take(shown).enumerate() {
        writeln!(out, "{}", format_ranked_mode(i + 1, mode))?;
    }
    Ok(())
}

fn cmd_correlate(
    settings: &FactsSettings,
    primary: &str,
    secondary: Option<&str>,
    summary: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let result = correlate_persisted(
        &settings.paths.drm_dir,
        &settings.paths.drm_card,
        &settings.paths.edid_dir,
        primary,
        secondary,
    );

    if summary {
        write!(out, "{}", format_correlation(&result))?;
        Ok(())
    } else {
        write_json(out, &result, false)
    }
}

#[derive(Serialize)]
struct GpuReport {
    name: String,
    bus_id: String,
}

fn cmd_gpu(settings: &FactsSettings, runner: &dyn CommandRunner, out: &mut dyn Write) -> Result<()> {
    let report = probe_display_gpu(runner, &settings.tools.nvidia_smi).map(|gpu| GpuReport {
        bus_id: gpu.xorg_bus_id(),
        name: gpu.name,
    });
    write_json(out, &report, false)
}

fn cmd_settings_path(cli: &Cli, out: &mut dyn Write) -> Result<()> {
    let path = match &cli.config {
        Some(path) => path.clone(),
        None => get_settings_path()?,
    };
    writeln!(out, "{}", path.display())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serial_test::serial;
    use tempfile::TempDir;
    use xf_core::CommandOutput;

    mockall::mock! {
        Runner {}
        impl CommandRunner for Runner {
            fn run(&self, program: &str, args: &[String]) -> std::io::Result<CommandOutput>;
        }
    }

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("xrfacts").chain(args.iter().copied()))
    }

    fn output(cli: &Cli, runner: &MockRunner) -> Result<String> {
        let mut buf = Vec::new();
        run(cli, runner, &mut buf)?;
        Ok(String::from_utf8(buf)?)
    }

    fn config_file(dir: &TempDir, json: &str) -> String {
        let path = dir.path().join("settings.json");
        fs::write(&path, json).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_missing_explicit_config_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.json");
        let cli = cli(&["--config", path.to_str().unwrap(), "settings", "show"]);
        assert!(resolve_settings(&cli).is_err());
    }

    #[test]
    fn test_display_override() {
        let dir = TempDir::new().unwrap();
        let config = config_file(&dir, r#"{"display": ":3"}"#);
        let settings = resolve_settings(&cli(&["--config", &config, "gpu"])).unwrap();
        assert_eq!(settings.display, ":3");

        let settings = resolve_settings(&cli(&["--config", &config, "--display", ":7", "gpu"])).unwrap();
        assert_eq!(settings.display, ":7");
    }

    #[test]
    fn test_invalid_display_override_rejected() {
        let dir = TempDir::new().unwrap();
        let config = config_file(&dir, "{}");
        assert!(resolve_settings(&cli(&["--config", &config, "--display", " ", "gpu"])).is_err());
    }

    #[test]
    fn test_gpu_absent_prints_null() {
        let dir = TempDir::new().unwrap();
        let config = config_file(&dir, "{}");
        let mut runner = MockRunner::new();
        runner
            .expect_run()
            .returning(|_, _| Err(std::io::Error::from(std::io::ErrorKind::NotFound)));

        let text = output(&cli(&["--config", &config, "gpu"]), &runner).unwrap();
        assert_eq!(text.trim(), "null");
    }

    #[test]
    fn test_gpu_report() {
        let dir = TempDir::new().unwrap();
        let config = config_file(&dir, r#"{"tools": {"nvidia_smi": "/opt/bin/nvidia-smi"}}"#);
        let mut runner = MockRunner::new();
        runner
            .expect_run()
            .withf(|program, _| program == "/opt/bin/nvidia-smi")
            .returning(|_, _| Ok(CommandOutput::ok("NVIDIA T400, 00000000:01:00.0\n")));

        let text = output(&cli(&["--config", &config, "gpu"]), &runner).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["name"], "NVIDIA T400");
        assert_eq!(json["bus_id"], "PCI:1@0:0:0");
    }

    #[test]
    fn test_unavailable_listing_reads_as_empty() {
        let settings = FactsSettings::default();
        let mut runner = MockRunner::new();
        runner
            .expect_run()
            .returning(|_, _| Ok(CommandOutput::failed("Can't open display")));
        assert_eq!(read_input(&settings, None, &runner).unwrap(), "");
    }

    #[test]
    fn test_unreadable_input_file_is_error() {
        let dir = TempDir::new().unwrap();
        let settings = FactsSettings::default();
        let runner = MockRunner::new();
        assert!(read_input(&settings, Some(&dir.path().join("nope.txt")), &runner).is_err());
    }

    #[test]
    fn test_settings_path_prefers_explicit_config() {
        let dir = TempDir::new().unwrap();
        let config = config_file(&dir, "{}");
        let text = output(&cli(&["--config", &config, "settings", "path"]), &MockRunner::new()).unwrap();
        assert_eq!(text.trim(), config);
    }

    #[test]
    #[serial]
    fn test_settings_path_defaults_to_user_config() {
        let dir = TempDir::new().unwrap();
        let old = std::env::var("XDG_CONFIG_HOME").ok();
        std::env::set_var("XDG_CONFIG_HOME", dir.path());

        let text = output(&cli(&["settings", "path"]), &MockRunner::new());

        match old {
            Some(v) => std::env::set_var("XDG_CONFIG_HOME", v),
            None => std::env::remove_var("XDG_CONFIG_HOME"),
        }
        let expected = dir.path().join("xrfacts").join("settings.json");
        assert_eq!(text.unwrap().trim(), expected.to_string_lossy());
    }

    #[test]
    fn test_compact_json() {
        let mut buf = Vec::new();
        write_json(&mut buf, &serde_json::json!({"a": [1, 2]}), true).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "{\"a\":[1,2]}\n");
    }
}
