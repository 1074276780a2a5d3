use std::{
    error::Error,
    ffi::{OsStr, OsString},
    fmt::Display,
    process::Command,
};

use anyhow::{Context, Result};
use log::debug;

/// A program and its arguments, run to completion by a [CommandRunner].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalCommand {
    program: OsString,
    args: Vec<OsString>,
}

impl ExternalCommand {
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        Self {
            program: program.as_ref().to_owned(),
            args: vec![],
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_owned());
        self
    }

    pub fn program(&self) -> &OsStr {
        &self.program
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }
}

impl Display for ExternalCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was killed by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// Returned, wrapped in an [anyhow::Error], when a command exits unsuccessfully.
#[derive(Debug, Clone)]
pub struct CommandFailed {
    pub command: String,
    pub output: CommandOutput,
}

impl Display for CommandFailed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.output.status {
            Some(code) => write!(f, "`{}` exited with status {code}", self.command)?,
            None => write!(f, "`{}` was terminated by a signal", self.command)?,
        }

        let stderr = self.output.stderr.trim();
        let stdout = self.output.stdout.trim();
        if !stderr.is_empty() {
            write!(f, "\n{stderr}")?;
        } else if !stdout.is_empty() {
            write!(f, "\n{stdout}")?;
        }
        Ok(())
    }
}

impl Error for CommandFailed {}

pub trait CommandRunner {
    /// Runs the command to completion. Only failing to launch it is an error,
    /// a non-zero exit is reported through [CommandOutput::status].
    fn run(&mut self, command: &ExternalCommand) -> Result<CommandOutput>;
}

/// Runs commands as child processes, blocking until they exit.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&mut self, command: &ExternalCommand) -> Result<CommandOutput> {
        let output = Command::new(command.program())
            .args(command.args())
            .output()
            .with_context(|| format!("Couldn't launch `{command}`"))?;

        Ok(CommandOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Runs `command` and turns a non-zero exit into a [CommandFailed] error.
pub fn run_checked<R: CommandRunner + ?Sized>(
    runner: &mut R,
    command: &ExternalCommand,
) -> Result<CommandOutput> {
    debug!("Running {command}");
    let output = runner.run(command)?;

    if !output.stdout.trim().is_empty() {
        debug!("{}", output.stdout.trim_end());
    }

    if output.success() {
        Ok(output)
    } else {
        Err(CommandFailed {
            command: command.to_string(),
            output,
        }
        .into())
    }
}
