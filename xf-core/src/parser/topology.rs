//! Topology parser for `xrandr --verbose` output
//!
//! One forward pass over the lines. Nested readers for EDID hex blocks and
//! mode-timing blocks consume their continuation lines from the shared
//! cursor and push back the first line that is not theirs.

use tracing::{debug, trace, warn};

use crate::constants::xrandr as tokens;
use crate::data::{format_modeline, mode_label, validate_edid_hex, Connector, ParseDiagnostic, Screen, Topology};
use crate::error::{Result, XrFactsError};
use crate::parser::classify::{classify, indentation, ConnectorHeader, LineKind, ModeHeader};
use crate::parser::cursor::LineCursor;

/// Parse the verbose mode listing into a topology.
///
/// Never fails: malformed mode blocks are skipped and reported through
/// `Topology::diagnostics`.
pub fn parse_verbose(text: &str) -> Topology {
    let mut parser = TopologyParser::new(text);
    parser.run();
    parser.finish()
}

/// Where the parser currently is
#[derive(Debug, Default)]
struct ParserContext {
    topology: Topology,
    screen: Option<usize>,
    connector: Option<usize>,
    /// Inside the detail block of a connected connector
    in_connected_block: bool,
}

impl ParserContext {
    fn current_connector(&mut self) -> Option<&mut Connector> {
        let screen = self.topology.screens.get_mut(self.screen?)?;
        screen.connectors.get_mut(self.connector?)
    }

    fn diagnose(&mut self, err: XrFactsError) {
        warn!("{}", err);
        let diagnostic = match err {
            XrFactsError::ModeParse { line, reason } => ParseDiagnostic { line, reason },
            other => ParseDiagnostic { line: 0, reason: other.to_string() },
        };
        self.topology.diagnostics.push(diagnostic);
    }
}

struct TopologyParser<'a> {
    cursor: LineCursor<'a>,
    ctx: ParserContext,
}

impl<'a> TopologyParser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            cursor: LineCursor::new(text),
            ctx: ParserContext::default(),
        }
    }

    fn run(&mut self) {
        while let Some((line_no, line)) = self.cursor.next_line() {
            match classify(line) {
                LineKind::Screen(name) => self.open_screen(name),
                LineKind::Connector(header) => self.open_connector(header),
                LineKind::EdidMarker if self.ctx.in_connected_block => {
                    self.collect_edid(line_no, line)
                }
                LineKind::ModeHeader(header) if self.ctx.in_connected_block => {
                    if let Err(e) = self.collect_mode(line_no, line, header) {
                        self.ctx.diagnose(e);
                    }
                }
                _ => {}
            }
        }
    }

    fn finish(self) -> Topology {
        let topology = self.ctx.topology;
        debug!(
            screens = topology.screens.len(),
            connectors = topology.connectors().count(),
            diagnostics = topology.diagnostics.len(),
            "Parsed display topology"
        );
        topology
    }

    fn open_screen(&mut self, name: &str) {
        let screens = &mut self.ctx.topology.screens;
        let idx = match screens.iter().position(|s| s.name == name) {
            Some(idx) => {
                screens[idx] = Screen::new(name);
                idx
            }
            None => {
                screens.push(Screen::new(name));
                screens.len() - 1
            }
        };
        self.ctx.screen = Some(idx);
        self.ctx.connector = None;
        self.ctx.in_connected_block = false;
    }

    fn open_connector(&mut self, header: ConnectorHeader<'_>) {
        let Some(screen) = self.ctx.screen.and_then(|i| self.ctx.topology.screens.get_mut(i)) else {
            trace!(connector = header.name, "Connector outside of any screen, ignoring");
            self.ctx.connector = None;
            self.ctx.in_connected_block = false;
            return;
        };

        let connector = Connector::new(header.name, header.connected, header.primary);
        self.ctx.connector = Some(screen.upsert_connector(connector));
        self.ctx.in_connected_block = header.connected;
    }

    /// Concatenate every following line indented deeper than the marker
    fn collect_edid(&mut self, line_no: usize, marker: &str) {
        let marker_indent = indentation(marker);
        let mut hex = String::new();

        while let Some((_, line)) = self.cursor.next_line() {
            if indentation(line) <= marker_indent {
                self.cursor.push_back();
                break;
            }
            hex.push_str(line.trim());
        }

        if let Err(e) = validate_edid_hex(&hex) {
            self.ctx.diagnose(XrFactsError::mode_parse(line_no, format!("EDID dropped: {}", e)));
            return;
        }

        if let Some(connector) = self.ctx.current_connector() {
            trace!(connector = %connector.name, bytes = hex.len() / 2, "Collected EDID");
            connector.edid = hex;
        }
    }

    /// Read a mode block up to and including its `v:` line
    fn collect_mode(&mut self, line_no: usize, header_line: &str, header: ModeHeader<'_>) -> Result<()> {
        let header_indent = indentation(header_line);
        let mut horizontal = None;

        let vertical = loop {
            let Some((_, line)) = self.cursor.next_line() else {
                return Err(XrFactsError::mode_parse(line_no, "input ended before the vertical timing line"));
            };
            if indentation(line) <= header_indent {
                self.cursor.push_back();
                return Err(XrFactsError::mode_parse(line_no, "block ended before the vertical timing line"));
            }

            match classify(line) {
                LineKind::HorizontalTiming => horizontal = Some(parse_timing(line_no, line)?),
                LineKind::VerticalTiming => break parse_timing(line_no, line)?,
                _ => {}
            }
        };

        let refresh_rate = refresh_rate(line_no, &vertical)?;
        let label = mode_label(&header.resolution, refresh_rate);
        let modeline = horizontal
            .as_ref()
            .and_then(|h| build_modeline(&label, &header, h, &vertical));

        let Some(connector) = self.ctx.current_connector() else {
            return Ok(());
        };

        if !connector.modes.insert(header.resolution, refresh_rate) {
            trace!(connector = %connector.name, mode = %label, "Duplicate mode");
        }
        if let Some(modeline) = modeline {
            connector.modelines.entry(label.clone()).or_insert(modeline);
        }
        if header.preferred {
            connector.preferred = Some(label.clone());
        }
        if header.current {
            connector.current = Some(label);
        }
        Ok(())
    }
}

/// `key value` pairs of an `h:` or `v:` line
#[derive(Debug)]
struct TimingLine<'a> {
    fields: Vec<(&'a str, &'a str)>,
}

impl<'a> TimingLine<'a> {
    fn get(&self, key: &str) -> Option<&'a str> {
        self.fields.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }

    fn number(&self, key: &str) -> Option<u32> {
        self.get(key)?.parse().ok()
    }

    /// display, sync start, sync end, total
    fn geometry(&self, size_key: &str) -> Option<[u32; 4]> {
        Some([
            self.number(size_key)?,
            self.number("start")?,
            self.number("end")?,
            self.number("total")?,
        ])
    }
}

fn parse_timing(line_no: usize, line: &str) -> Result<TimingLine<'_>> {
    let mut words = line.split_whitespace();
    // h: / v:
    words.next();
    let words: Vec<&str> = words.collect();
    if words.len() % 2 != 0 {
        return Err(XrFactsError::mode_parse(
            line_no,
            format!("timing line has an unpaired field: {:?}", line.trim()),
        ));
    }

    Ok(TimingLine {
        fields: words.chunks(2).map(|pair| (pair[0], pair[1])).collect(),
    })
}

fn refresh_rate(line_no: usize, vertical: &TimingLine<'_>) -> Result<u32> {
    let raw = vertical
        .get("clock")
        .ok_or_else(|| XrFactsError::mode_parse(line_no, "vertical timing has no clock field"))?;

    let value: f64 = raw
        .strip_suffix(tokens::REFRESH_UNIT)
        .unwrap_or(raw)
        .parse()
        .map_err(|_| XrFactsError::mode_parse(line_no, format!("refresh rate {:?} is not a number", raw)))?;

    let rounded = value.round_ties_even();
    if !rounded.is_finite() || rounded < 1.0 || rounded > f64::from(u32::MAX) {
        return Err(XrFactsError::mode_parse(
            line_no,
            format!("refresh rate {:?} is not a positive integer", raw),
        ));
    }
    Ok(rounded as u32)
}

fn build_modeline(
    label: &str,
    header: &ModeHeader<'_>,
    horizontal: &TimingLine<'_>,
    vertical: &TimingLine<'_>,
) -> Option<String> {
    let pixel_clock = header.pixel_clock?;
    let [hdisp, hstart, hend, htotal] = horizontal.geometry("width")?;
    let [vdisp, vstart, vend, vtotal] = vertical.geometry("height")?;

    let timings = format!(
        "{} {} {} {} {} {} {} {} {} {}",
        pixel_clock,
        hdisp,
        hstart,
        hend,
        htotal,
        vdisp,
        vstart,
        vend,
        vtotal,
        header.flags.join(" ")
    );
    Some(format_modeline(label, &timings))
}

/// True when `text` looks like it came from the verbose listing
pub fn looks_like_verbose_listing(text: &str) -> bool {
    text.lines().any(|l| matches!(classify(l), LineKind::Screen(_)))
}
