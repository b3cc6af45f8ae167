//! Mode selection engine
//!
//! Ranks candidate modes against the configured preferences.

mod ranking;

pub use ranking::{preference_rank, rank_modes, select, ModeScore, Preferences, RankedMode};
