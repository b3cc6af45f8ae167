//! Mode ranking against ordered preference lists
//!
//! # How It Works
//!
//! Every candidate mode gets a [`ModeScore`], compared lexicographically:
//!
//! 1. **Refresh rate rank**: position in the preferred refresh rates
//! 2. **Resolution rank**: position in the preferred resolutions
//! 3. **Width**, then **height**: bigger modes win among equal preferences
//! 4. **Connector rank**: position of the connector type (`HDMI-1` -> `HDMI`)
//!    in the preferred outputs
//!
//! A rank is `list length - index` for a listed item and `0` otherwise, so
//! unlisted items score lowest but are never excluded. Modes with equal
//! scores keep their discovery order and the first one wins.

use std::cmp::Ordering;

use serde::Serialize;
use tracing::debug;

use crate::constants::preferences;
use crate::data::{connector_type, Mode, RankedSelection, Resolution};

/// Ordered preference lists, most preferred first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preferences {
    pub resolutions: Vec<Resolution>,
    pub refresh_rates: Vec<u32>,
    /// Connector types such as `HDMI` or `DP`
    pub outputs: Vec<String>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            resolutions: preferences::resolutions()
                .iter()
                .filter_map(|r| r.parse().ok())
                .collect(),
            refresh_rates: preferences::refresh_rates(),
            outputs: preferences::outputs(),
        }
    }
}

/// Score tuple of one mode; field order is comparison order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ModeScore {
    pub refresh_rank: usize,
    pub resolution_rank: usize,
    pub width: u32,
    pub height: u32,
    pub connector_rank: usize,
}

/// A mode together with its score
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedMode {
    #[serde(flatten)]
    pub mode: Mode,
    pub score: ModeScore,
}

/// `len - index` of the first occurrence, or 0 when absent
pub fn preference_rank<T, Q>(list: &[T], item: &Q) -> usize
where
    T: PartialEq<Q>,
    Q: ?Sized,
{
    list.iter()
        .position(|candidate| candidate == item)
        .map(|index| list.len() - index)
        .unwrap_or(0)
}

impl Preferences {
    pub fn score(&self, mode: &Mode) -> ModeScore {
        ModeScore {
            refresh_rank: preference_rank(&self.refresh_rates, &mode.refresh_rate),
            resolution_rank: preference_rank(&self.resolutions, &mode.resolution),
            width: mode.resolution.width,
            height: mode.resolution.height,
            connector_rank: preference_rank(&self.outputs, connector_type(&mode.connector)),
        }
    }

    /// Compare two modes; `Greater` means `a` is preferred
    pub fn compare(&self, a: &Mode, b: &Mode) -> Ordering {
        self.score(a).cmp(&self.score(b))
    }
}

/// All modes, best first. Equal scores keep discovery order.
pub fn rank_modes(modes: &[Mode], prefs: &Preferences) -> Vec<RankedMode> {
    let mut ranked: Vec<RankedMode> = modes
        .iter()
        .map(|mode| RankedMode {
            mode: mode.clone(),
            score: prefs.score(mode),
        })
        .collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked
}

/// First mode with the highest score among those accepted by `filter`
fn best_mode<'m>(
    modes: &'m [Mode],
    prefs: &Preferences,
    filter: impl Fn(&Mode) -> bool,
) -> Option<&'m Mode> {
    let mut best: Option<(&Mode, ModeScore)> = None;
    for mode in modes.iter().filter(|m| filter(m)) {
        let score = prefs.score(mode);
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((mode, score)),
        }
    }
    best.map(|(mode, _)| mode)
}

/// Pick the primary mode and the best mode on any other connector
pub fn select(modes: &[Mode], prefs: &Preferences) -> Option<RankedSelection> {
    let primary = best_mode(modes, prefs, |_| true)?.clone();
    let secondary = best_mode(modes, prefs, |m| m.connector != primary.connector).cloned();

    debug!(
        primary = %primary.label(),
        primary_connector = %primary.connector,
        secondary = ?secondary.as_ref().map(|m| format!("{} {}", m.connector, m.label())),
        candidates = modes.len(),
        "Selected display modes"
    );

    Some(RankedSelection { primary, secondary })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn res(s: &str) -> Resolution {
        s.parse().unwrap()
    }

    fn mode(connector: &str, resolution: &str, rate: u32) -> Mode {
        Mode::new(connector, res(resolution), rate)
    }

    fn prefs(resolutions: &[&str], rates: &[u32], outputs: &[&str]) -> Preferences {
        Preferences {
            resolutions: resolutions.iter().map(|r| res(r)).collect(),
            refresh_rates: rates.to_vec(),
            outputs: outputs.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_preference_rank() {
        let list = vec!["HDMI".to_string(), "DP".to_string(), "VGA".to_string()];
        assert_eq!(preference_rank(&list, "HDMI"), 3);
        assert_eq!(preference_rank(&list, "VGA"), 1);
        assert_eq!(preference_rank(&list, "DVI"), 0);
    }

    #[test]
    fn test_score_tuple() {
        let p = prefs(&["1920x1080", "1280x720"], &[50, 60], &["HDMI", "DP"]);
        assert_eq!(
            p.score(&mode("HDMI-1", "1920x1080", 60)),
            ModeScore { refresh_rank: 1, resolution_rank: 2, width: 1920, height: 1080, connector_rank: 2 }
        );
        assert_eq!(
            p.score(&mode("Virtual1", "800x600", 75)),
            ModeScore { refresh_rank: 0, resolution_rank: 0, width: 800, height: 600, connector_rank: 0 }
        );
    }

    #[test]
    fn test_refresh_rate_is_compared_first() {
        // refresh rank 2 for DP-1 beats refresh rank 1 for HDMI-1
        let p = prefs(&["1920x1080", "1280x720"], &[50, 60], &["HDMI", "DP"]);
        let modes = vec![mode("HDMI-1", "1920x1080", 60), mode("DP-1", "1280x720", 50)];

        let selection = select(&modes, &p).unwrap();
        assert_eq!(selection.primary, mode("DP-1", "1280x720", 50));
        assert_eq!(selection.secondary, Some(mode("HDMI-1", "1920x1080", 60)));
    }

    #[test]
    fn test_size_breaks_preference_ties() {
        let p = prefs(&[], &[60], &["HDMI"]);
        let modes = vec![mode("HDMI-1", "1280x720", 60), mode("HDMI-1", "2560x1440", 60)];
        assert_eq!(select(&modes, &p).unwrap().primary.resolution, res("2560x1440"));
    }

    #[test]
    fn test_connector_rank_is_last() {
        let p = prefs(&["1920x1080"], &[60], &["DP", "HDMI"]);
        let modes = vec![mode("HDMI-1", "1920x1080", 60), mode("DP-2", "1920x1080", 60)];
        let selection = select(&modes, &p).unwrap();
        assert_eq!(selection.primary.connector, "DP-2");
        assert_eq!(selection.secondary.unwrap().connector, "HDMI-1");
    }

    #[test]
    fn test_full_ties_keep_discovery_order() {
        let p = prefs(&["1920x1080"], &[60], &[]);
        let modes = vec![mode("HDMI-1", "1920x1080", 60), mode("HDMI-2", "1920x1080", 60)];
        let selection = select(&modes, &p).unwrap();
        assert_eq!(selection.primary.connector, "HDMI-1");
        assert_eq!(selection.secondary.unwrap().connector, "HDMI-2");

        let ranked = rank_modes(&modes, &p);
        assert_eq!(ranked[0].mode.connector, "HDMI-1");
    }

    #[test]
    fn test_no_secondary_on_single_connector() {
        let p = Preferences::default();
        let modes = vec![mode("HDMI-1", "1920x1080", 60), mode("HDMI-1", "1280x720", 50)];
        let selection = select(&modes, &p).unwrap();
        assert!(selection.secondary.is_none());
    }

    #[test]
    fn test_empty_mode_list() {
        assert!(select(&[], &Preferences::default()).is_none());
        assert!(rank_modes(&[], &Preferences::default()).is_empty());
    }

    #[test]
    fn test_earliest_preferences_win() {
        let p = Preferences::default();
        let best = mode("VGA-1", "7680x4320", 50);
        let others = [
            mode("HDMI-1", "7680x4320", 60),
            mode("HDMI-1", "3840x2160", 50),
            mode("HDMI-1", "8192x4320", 50),
            mode("HDMI-1", "1920x1080", 144),
        ];
        for other in &others {
            assert_eq!(p.compare(&best, other), Ordering::Greater, "{:?}", other);
        }
    }

    #[test]
    fn test_ranking_is_total_and_deterministic() {
        let p = Preferences::default();
        let modes = vec![
            mode("HDMI-1", "1920x1080", 60),
            mode("HDMI-1", "1920x1080", 50),
            mode("DP-1", "3840x2160", 30),
            mode("DP-1", "1280x720", 50),
            mode("eDP-1", "1366x768", 60),
            mode("Virtual1", "1024x768", 75),
            mode("DVI-D-0", "1920x1200", 60),
        ];

        for a in &modes {
            for b in &modes {
                for c in &modes {
                    if p.compare(a, b) != Ordering::Less && p.compare(b, c) != Ordering::Less {
                        assert_ne!(p.compare(a, c), Ordering::Less);
                    }
                }
                assert_eq!(p.compare(a, b), p.compare(b, a).reverse());
            }
        }

        let first = select(&modes, &p);
        for _ in 0..5 {
            assert_eq!(select(&modes, &p), first);
        }
        let ranked = rank_modes(&modes, &p);
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
        assert_eq!(first.unwrap().primary, ranked[0].mode);
    }
}
