//! Line classification for `xrandr --verbose` output
//!
//! Recognized shapes:
//!
//! ```text
//! Screen 0: minimum 320 x 200, current 1920 x 1080, maximum 16384 x 16384
//! HDMI-1 connected primary 1920x1080+0+0 (0x48) normal (normal left inverted right x axis y axis) 531mm x 299mm
//! 	EDID:
//! 		00ffffffffffff004c2d...
//!   1920x1080 (0x48) 148.500MHz +HSync +VSync *current +preferred
//!         h: width  1920 start 2008 end 2052 total 2200 skew    0 clock  67.50KHz
//!         v: height 1080 start 1084 end 1089 total 1125           clock  60.00Hz
//! ```
//!
//! Connector names are returned verbatim.

use regex::Regex;
use std::sync::OnceLock;
use tracing::trace;

use crate::constants::xrandr as tokens;
use crate::data::Resolution;

static SCREEN_RE: OnceLock<Option<Regex>> = OnceLock::new();
static CONNECTOR_RE: OnceLock<Option<Regex>> = OnceLock::new();
static MODE_RE: OnceLock<Option<Regex>> = OnceLock::new();

fn screen_re() -> Option<&'static Regex> {
    SCREEN_RE
        .get_or_init(|| Regex::new(r"^(?P<screen>Screen\s\d+):").ok())
        .as_ref()
}

fn connector_re() -> Option<&'static Regex> {
    CONNECTOR_RE
        .get_or_init(|| {
            Regex::new(
                r"^(?P<connector>\S+)\s+(?P<state>connected|disconnected)(?:\s+(?P<primary>primary))?(?:\s|$)",
            )
            .ok()
        })
        .as_ref()
}

fn mode_re() -> Option<&'static Regex> {
    MODE_RE
        .get_or_init(|| Regex::new(r"^\s+(?P<resolution>\d{3,}x\d{3,})").ok())
        .as_ref()
}

/// Connector header fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectorHeader<'a> {
    pub name: &'a str,
    pub connected: bool,
    pub primary: bool,
}

/// Mode-timing header fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeHeader<'a> {
    pub resolution: Resolution,
    /// Pixel clock in MHz without its unit, e.g. `148.500`
    pub pixel_clock: Option<&'a str>,
    /// Sync and other flags, annotations removed
    pub flags: Vec<&'a str>,
    pub preferred: bool,
    pub current: bool,
}

/// What a single line of verbose output opens or carries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    Screen(&'a str),
    Connector(ConnectorHeader<'a>),
    EdidMarker,
    ModeHeader(ModeHeader<'a>),
    HorizontalTiming,
    VerticalTiming,
    Other,
}

/// Classify one line. Matching is anchored at line start.
pub fn classify(line: &str) -> LineKind<'_> {
    if let Some(caps) = screen_re().and_then(|re| re.captures(line)) {
        if let Some(screen) = caps.name("screen") {
            return LineKind::Screen(screen.as_str());
        }
    }

    if let Some(caps) = connector_re().and_then(|re| re.captures(line)) {
        if let (Some(name), Some(state)) = (caps.name("connector"), caps.name("state")) {
            return LineKind::Connector(ConnectorHeader {
                name: name.as_str(),
                connected: state.as_str() == "connected",
                primary: caps.name("primary").is_some(),
            });
        }
    }

    let trimmed = line.trim_start();
    if trimmed.starts_with(tokens::EDID_MARKER) {
        return LineKind::EdidMarker;
    }

    if line.contains(tokens::PIXEL_CLOCK_UNIT) && !line.contains(tokens::INTERLACE_FLAG) {
        if let Some(header) = parse_mode_header(line) {
            return LineKind::ModeHeader(header);
        }
    }

    if trimmed.starts_with(tokens::HORIZONTAL_PREFIX) {
        return LineKind::HorizontalTiming;
    }
    if trimmed.starts_with(tokens::VERTICAL_PREFIX) {
        return LineKind::VerticalTiming;
    }

    LineKind::Other
}

fn parse_mode_header(line: &str) -> Option<ModeHeader<'_>> {
    let caps = mode_re()?.captures(line)?;
    let raw = caps.name("resolution")?.as_str();
    let resolution = match raw.parse::<Resolution>() {
        Ok(r) => r,
        Err(e) => {
            trace!("Ignoring mode line with unusable resolution: {}", e);
            return None;
        }
    };

    let mut pixel_clock = None;
    let mut flags = Vec::new();
    // name, mode id, clock, flags...
    for token in line.split_whitespace().skip(1) {
        if pixel_clock.is_none() {
            if let Some(clock) = token.strip_suffix(tokens::PIXEL_CLOCK_UNIT) {
                pixel_clock = Some(clock);
            }
            continue;
        }
        if token != tokens::CURRENT_FLAG && token != tokens::PREFERRED_FLAG {
            flags.push(token);
        }
    }

    Some(ModeHeader {
        resolution,
        pixel_clock,
        flags,
        preferred: line.contains(tokens::PREFERRED_FLAG),
        current: line.contains(tokens::CURRENT_FLAG),
    })
}

/// Number of leading whitespace characters
pub fn indentation(line: &str) -> usize {
    line.len() - line.trim_start().len()
}
