//! Display GPU identity
//!
//! Thin wrapper running the xf-gpu query through a [`CommandRunner`].

use tracing::debug;
use xf_gpu::{gpu_const, nvidia, DisplayGpu};

use crate::hw::command::{run_checked, CommandRunner};

/// Ask the GPU-info tool for the first GPU's name and bus id.
///
/// Any failure yields `None`.
pub fn probe_display_gpu(runner: &dyn CommandRunner, program: &str) -> Option<DisplayGpu> {
    let args: Vec<String> = gpu_const::QUERY_ARGS.iter().map(|s| s.to_string()).collect();

    let stdout = match run_checked(runner, program, &args) {
        Ok(stdout) => stdout,
        Err(e) => {
            debug!("GPU query unavailable: {}", e);
            return None;
        }
    };

    match nvidia::parse_query_output(&stdout) {
        Ok(gpu) => Some(gpu),
        Err(e) => {
            debug!("{}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hw::command::{CommandOutput, MockCommandRunner};
    use std::io;

    #[test]
    fn test_probe_reports_name_and_bus_id() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .withf(|program, args| program == "nvidia-smi" && args.len() == 3 && args[2] == "-i0")
            .returning(|_, _| Ok(CommandOutput::ok("NVIDIA GeForce GTX 1080, 00000000:0A:00.0\n")));

        let gpu = probe_display_gpu(&runner, "nvidia-smi").unwrap();
        assert_eq!(gpu.name, "NVIDIA GeForce GTX 1080");
        assert_eq!(gpu.xorg_bus_id(), "PCI:10@0:0:0");
    }

    #[test]
    fn test_missing_tool_is_none() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .returning(|_, _| Err(io::Error::from(io::ErrorKind::NotFound)));
        assert!(probe_display_gpu(&runner, "nvidia-smi").is_none());
    }

    #[test]
    fn test_failed_or_garbled_query_is_none() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .times(1)
            .returning(|_, _| Ok(CommandOutput::failed("No devices were found")));
        assert!(probe_display_gpu(&runner, "nvidia-smi").is_none());

        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .returning(|_, _| Ok(CommandOutput::ok("garbage without bus id\n")));
        assert!(probe_display_gpu(&runner, "nvidia-smi").is_none());
    }
}
