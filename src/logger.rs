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

//! Log setup
//!
//! Human-readable tracing output on stderr; stdout is reserved for reports.

use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter directive
pub const LOG_ENV: &str = "XRFACTS_LOG";

const DEFAULT_DIRECTIVE: &str = "warn";

/// Filter directive for `-v` count and the environment override
///
/// Explicit `-v` flags win over the environment.
pub fn filter_directive(verbose: u8, env: Option<&str>) -> String {
    match verbose {
        0 => env
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_DIRECTIVE)
            .to_string(),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Install the global subscriber. A second call is a no-op.
pub fn init_logging(verbose: u8) {
    let env = std::env::var(LOG_ENV).ok();
    let directive = filter_directive(verbose, env.as_deref());

    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|e| {
        eprintln!("Ignoring invalid {} directive '{}': {}", LOG_ENV, directive, e);
        EnvFilter::new(DEFAULT_DIRECTIVE)
    });

    let _ = tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
