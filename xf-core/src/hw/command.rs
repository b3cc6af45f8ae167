//! External command execution
//!
//! Every external tool goes through [`CommandRunner`] so the pipeline can
//! be driven by canned output in tests.

use std::io;
use std::process::Command;
use tracing::trace;

use crate::error::{Result, XrFactsError};

/// Captured result of one finished process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Successful run with the given stdout
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Failed run with the given stderr
    pub fn failed(stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

/// Runs a program to completion and captures its output.
///
/// An `Err` means the process could not be started at all.
#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[String]) -> io::Result<CommandOutput>;
}

/// Runs real processes, blocking until they exit
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, program: &str, args: &[String]) -> io::Result<CommandOutput> {
        trace!(program, ?args, "Running command");
        let output = Command::new(program).args(args).output()?;

        Ok(CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Run `program` and return its stdout, failing on spawn errors and
/// unsuccessful exits
pub fn run_checked(runner: &dyn CommandRunner, program: &str, args: &[String]) -> Result<String> {
    let output = runner.run(program, args).map_err(|source| XrFactsError::CommandSpawn {
        program: program.to_string(),
        source,
    })?;

    if !output.success {
        return Err(XrFactsError::CommandFailed {
            program: program.to_string(),
            stderr: output.stderr.trim().to_string(),
        });
    }

    Ok(output.stdout)
}
