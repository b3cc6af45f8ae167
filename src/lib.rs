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

//! xrfacts - display topology facts for X11 hosts
//!
//! The binary is a thin command line layer over `xf_core`: argument
//! parsing, logging setup and the subcommand handlers.

pub mod cli;
pub mod commands;
pub mod logger;
