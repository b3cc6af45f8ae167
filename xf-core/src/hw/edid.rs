//! Vendor and model lookup through edid-decode

use std::path::Path;
use tracing::{debug, trace};

use crate::constants::{enrichment, tools};
use crate::data::{format_modeline, EdidDescription};
use crate::hw::command::{run_checked, CommandRunner};

impl EdidDescription {
    /// Description used when nothing could be decoded
    pub fn unknown() -> Self {
        Self {
            vendor: enrichment::UNKNOWN.to_string(),
            model: enrichment::UNKNOWN.to_string(),
            modelines: Vec::new(),
        }
    }
}

/// Decode the EDID file at `path` with the EDID-decoding tool.
///
/// Never fails: a missing tool, a failing run or absent labels leave the
/// corresponding fields at `Unknown`.
pub fn describe_edid(runner: &dyn CommandRunner, program: &str, path: &Path) -> EdidDescription {
    let mut args: Vec<String> = tools::EDID_DECODE_ARGS.iter().map(|s| s.to_string()).collect();
    args.push(path.to_string_lossy().into_owned());

    match run_checked(runner, program, &args) {
        Ok(stdout) => parse_edid_decode(&stdout),
        Err(e) => {
            debug!("No EDID description for {:?}: {}", path, e);
            EdidDescription::unknown()
        }
    }
}

/// Extract vendor, model and modelines from edid-decode output
pub fn parse_edid_decode(output: &str) -> EdidDescription {
    let mut description = EdidDescription::unknown();

    for line in output.lines().map(str::trim) {
        if let Some(vendor) = label_value(line, enrichment::MANUFACTURER_LABEL) {
            description.vendor = vendor.to_string();
        } else if let Some(model) = label_value(line, enrichment::PRODUCT_NAME_LABEL) {
            description.model = model.trim_matches('\'').to_string();
        } else if line.starts_with(enrichment::MODELINE_PREFIX) {
            match rename_modeline(line) {
                Some(modeline) => description.modelines.push(modeline),
                None => trace!("Skipping modeline without usable timings: {}", line),
            }
        }
    }

    description
}

fn label_value<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    let value = line.strip_prefix(label)?.trim();
    (!value.is_empty()).then_some(value)
}

/// Rename `Modeline "Mode 0" <timings>` to `Modeline "<w>x<h>_<rate>[i]" <timings>`
///
/// The rate is the pixel clock divided by the frame size, rounded to Hz.
pub fn rename_modeline(line: &str) -> Option<String> {
    let mut quoted = line.splitn(3, '"');
    quoted.next();
    quoted.next()?;
    let timings = quoted.next()?.trim();

    let fields: Vec<&str> = timings.split_whitespace().collect();
    if fields.len() < 9 {
        return None;
    }

    let pixel_clock: f64 = fields[0].parse().ok()?;
    let hdisp: u32 = fields[1].parse().ok()?;
    let htotal: f64 = fields[4].parse().ok()?;
    let vdisp: u32 = fields[5].parse().ok()?;
    let vtotal: f64 = fields[8].parse().ok()?;

    let frame = htotal * vtotal;
    if frame <= 0.0 {
        return None;
    }
    let refresh = (pixel_clock * 1e6 / frame).round_ties_even();
    if !refresh.is_finite() || refresh < 0.0 {
        return None;
    }

    let interlaced = if fields[9..].iter().any(|f| f.eq_ignore_ascii_case("interlace")) {
        "i"
    } else {
        ""
    };

    let name = format!("{}x{}_{}{}", hdisp, vdisp, refresh as u64, interlaced);
    Some(format_modeline(&name, timings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hw::command::{CommandOutput, MockCommandRunner};
    use std::io;

    const DECODED: &str = "\
edid-decode (hex):

Block 0, Base EDID:
  EDID Structure Version & Revision: 1.3
  Vendor & Product Identification:
    Manufacturer: SAM
    Model: 3341
  Display Descriptor #3: Display Product Name: 'S24B300'
    Display Product Name: 'S24B300'
Modeline \"Mode 0\" 148.500 1920 2008 2052 2200 1080 1084 1089 1125 +hsync +vsync
Modeline \"Mode 1\" 74.250 1920 2448 2492 2640 1080 1084 1094 1125 interlace +hsync +vsync
Modeline \"Mode 2\"
";

    #[test]
    fn test_parse_labels_and_modelines() {
        let description = parse_edid_decode(DECODED);
        assert_eq!(description.vendor, "SAM");
        assert_eq!(description.model, "S24B300");
        assert_eq!(
            description.modelines,
            vec![
                "Modeline \"1920x1080_60\"  148.500 1920 2008 2052 2200 1080 1084 1089 1125 +hsync +vsync".to_string(),
                "Modeline \"1920x1080_25i\"  74.250 1920 2448 2492 2640 1080 1084 1094 1125 interlace +hsync +vsync".to_string(),
            ]
        );
    }

    #[test]
    fn test_missing_labels_are_unknown() {
        let description = parse_edid_decode("Block 0, Base EDID:\n");
        assert_eq!(description, EdidDescription::unknown());
    }

    #[test]
    fn test_rename_rejects_bad_timings() {
        assert!(rename_modeline("Modeline \"Mode 0\" abc 1920 2008 2052 2200 1080 1084 1089 1125").is_none());
        assert!(rename_modeline("Modeline \"Mode 0\" 148.5 1920 2008 2052 0 1080 1084 1089 1125").is_none());
        assert!(rename_modeline("Modeline \"Mode 0\" 148.5 1920").is_none());
        assert!(rename_modeline("Modeline without quotes").is_none());
    }

    #[test]
    fn test_describe_passes_flags_and_path() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .withf(|program, args| {
                program == "edid-decode"
                    && args == ["-LnpsX".to_string(), "/etc/X11/edid.HDMI-1.bin".to_string()].as_slice()
            })
            .times(1)
            .returning(|_, _| Ok(CommandOutput::ok(DECODED)));

        let description = describe_edid(&runner, "edid-decode", Path::new("/etc/X11/edid.HDMI-1.bin"));
        assert_eq!(description.vendor, "SAM");
    }

    #[test]
    fn test_tool_failure_defaults_to_unknown() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .times(1)
            .returning(|_, _| Ok(CommandOutput::failed("EDID parsing errors")));
        assert_eq!(
            describe_edid(&runner, "edid-decode", Path::new("/nope")),
            EdidDescription::unknown()
        );

        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .returning(|_, _| Err(io::Error::from(io::ErrorKind::NotFound)));
        assert_eq!(
            describe_edid(&runner, "edid-decode", Path::new("/nope")),
            EdidDescription::unknown()
        );
    }
}
