//! Mode-listing tool invocation

use tracing::{debug, warn};

use crate::error::{Result, XrFactsError};
use crate::hw::command::CommandRunner;

/// Arguments for a verbose listing of `display_name`
pub fn xrandr_args(display_name: &str) -> Vec<String> {
    vec!["-d".to_string(), display_name.to_string(), "--verbose".to_string()]
}

/// Run the mode-listing tool and return its verbose output.
///
/// Fails with `EnumerationUnavailable` when the tool cannot be started or
/// exits unsuccessfully.
pub fn query_verbose(runner: &dyn CommandRunner, program: &str, display_name: &str) -> Result<String> {
    let output = runner.run(program, &xrandr_args(display_name)).map_err(|e| {
        warn!("Failed to run {}: {}", program, e);
        XrFactsError::EnumerationUnavailable(format!("{}: {}", program, e))
    })?;

    if !output.success {
        warn!(display = %display_name, "{} failed: {}", program, output.stderr.trim());
        return Err(XrFactsError::EnumerationUnavailable(format!(
            "{} exited unsuccessfully: {}",
            program,
            output.stderr.trim()
        )));
    }

    debug!(program, display = %display_name, bytes = output.stdout.len(), "Read mode listing");
    Ok(output.stdout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hw::command::{CommandOutput, MockCommandRunner};
    use std::io;

    #[test]
    fn test_passes_display_and_verbose() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .withf(|program, args| program == "xrandr" && args == xrandr_args(":1").as_slice())
            .times(1)
            .returning(|_, _| Ok(CommandOutput::ok("Screen 0: minimum 8 x 8\n")));

        let text = query_verbose(&runner, "xrandr", ":1").unwrap();
        assert!(text.starts_with("Screen 0"));
    }

    #[test]
    fn test_spawn_failure_is_enumeration_unavailable() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .returning(|_, _| Err(io::Error::from(io::ErrorKind::NotFound)));

        let err = query_verbose(&runner, "xrandr", ":0").unwrap_err();
        assert!(matches!(err, XrFactsError::EnumerationUnavailable(_)));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_nonzero_exit_is_enumeration_unavailable() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .returning(|_, _| Ok(CommandOutput::failed("Can't open display :0")));

        let err = query_verbose(&runner, "xrandr", ":0").unwrap_err();
        assert!(err.to_string().contains("Can't open display"));
    }
}
