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

//! Command Line Interface

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "xrfacts")]
#[command(version)]
#[command(about = "xrfacts - display topology facts for X11 hosts")]
#[command(long_about = "xrfacts - display topology facts for X11 hosts

Parses `xrandr --verbose`, picks the best mode by preference, stores the
monitors' EDIDs and matches them to kernel DRM connectors.

EXAMPLES:
    xrfacts collect                    Full report as JSON
    xrfacts collect --no-write-edids   Report without touching /etc/X11
    xrfacts parse dump.txt             Topology of a saved listing
    xrandr --verbose | xrfacts rank -  Ranked modes of the live listing
    xrfacts correlate --primary HDMI-1 --secondary DP-1
    xrfacts parse --summary dump.txt   Connector overview
    xrfacts gpu                        Display GPU name and X.Org bus id
    xrfacts settings show              Effective settings as JSON

ENVIRONMENT VARIABLES:
    XRFACTS_LOG=debug      Log filter (overridden by -v)

FILES:
    ~/.config/xrfacts/settings.json    Preferences, paths and tool names
    /etc/X11/edid.<connector>.bin      Persisted EDIDs")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Settings file instead of ~/.config/xrfacts/settings.json
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// X display to query
    #[arg(long, global = true, value_name = "DISPLAY")]
    pub display: Option<String>,

    /// More log output: -v info, -vv debug, -vvv trace
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the whole pipeline and print the report
    Collect(CollectArgs),

    /// Parse a verbose mode listing and print the topology
    Parse {
        /// Listing file, `-` for stdin; runs xrandr when omitted
        input: Option<PathBuf>,

        /// Plain-text summary instead of JSON
        #[arg(long)]
        summary: bool,
    },

    /// Print every mode ranked by preference
    Rank {
        /// Listing file, `-` for stdin; runs xrandr when omitted
        input: Option<PathBuf>,

        /// Show only the best N modes
        #[arg(long, value_name = "N")]
        limit: Option<usize>,
    },

    /// Match persisted EDIDs to kernel DRM connectors
    Correlate {
        /// Connector chosen as primary, e.g. HDMI-1
        #[arg(long)]
        primary: String,

        /// Connector chosen as secondary
        #[arg(long)]
        secondary: Option<String>,

        /// Plain-text summary instead of JSON
        #[arg(long)]
        summary: bool,
    },

    /// Show the display GPU identity
    Gpu,

    /// Settings inspection
    #[command(subcommand)]
    Settings(SettingsCommands),
}

#[derive(Args, Debug, Default)]
pub struct CollectArgs {
    /// Do not write EDID files (disables DRM correlation)
    #[arg(long)]
    pub no_write_edids: bool,

    /// Directory for EDID files instead of /etc/X11
    #[arg(long, value_name = "DIR")]
    pub edid_dir: Option<PathBuf>,

    /// Single-line JSON
    #[arg(long)]
    pub compact: bool,
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommands {
    /// Print the effective settings as JSON
    Show,
    /// Print the settings file path
    Path,
}
