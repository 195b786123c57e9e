//! Typed command layer for external tool invocations
//!
//! Every external call the pipeline makes (`git`, `helm`, `curl`) goes
//! through [`Cmd`] and a [`CommandRunner`]. Arguments are discrete tokens,
//! never a shell string, so chart names and user-supplied flags cannot be
//! reinterpreted by a shell. Secret values (the access token) are registered
//! on the command and stripped from its display form and from captured
//! output before either can reach a log line or an error message.
//!
//! The trait exists so tests can substitute a recording runner and assert
//! on the exact invocation sequence without touching the real tools.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

const REDACTED: &str = "***";

/// Errors from spawning or waiting on an external process
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with code {code}: {stderr}")]
    Failed {
        program: String,
        code: i32,
        stderr: String,
    },
}

/// A single external command: program, argument tokens, working directory.
#[derive(Debug, Clone)]
pub struct Cmd {
    program: String,
    args: Vec<String>,
    cwd: Option<PathBuf>,
    secrets: Vec<String>,
}

impl Cmd {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            secrets: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Register a secret substring to be redacted from the command's
    /// display form and from any captured output.
    pub fn secret(mut self, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.is_empty() {
            self.secrets.push(value);
        }
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arg_list(&self) -> &[String] {
        &self.args
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    /// Replace every registered secret in `text` with a placeholder.
    pub fn redact(&self, text: &str) -> String {
        let mut out = text.to_string();
        for secret in &self.secrets {
            out = out.replace(secret, REDACTED);
        }
        out
    }
}

impl fmt::Display for Cmd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", self.redact(arg))?;
        }
        Ok(())
    }
}

/// Captured output of a completed command, secrets already redacted.
#[derive(Debug, Clone, Default)]
pub struct CmdOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Seam between the pipeline and the operating system.
pub trait CommandRunner {
    /// Run the command to completion, blocking. A non-zero exit is an error.
    fn run(&self, cmd: &Cmd) -> std::result::Result<CmdOutput, ProcessError>;
}

/// Runner backed by `std::process::Command`. Steps are strictly sequential,
/// so blocking waits are all the pipeline needs.
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, cmd: &Cmd) -> std::result::Result<CmdOutput, ProcessError> {
        tracing::debug!(command = %cmd, "running external command");

        let mut command = std::process::Command::new(cmd.program());
        command.args(cmd.arg_list());
        if let Some(dir) = cmd.working_dir() {
            command.current_dir(dir);
        }

        let output = command.output().map_err(|source| ProcessError::Spawn {
            program: cmd.program().to_string(),
            source,
        })?;

        let stdout = cmd.redact(&String::from_utf8_lossy(&output.stdout));
        let stderr = cmd.redact(&String::from_utf8_lossy(&output.stderr));

        if !output.status.success() {
            return Err(ProcessError::Failed {
                program: cmd.program().to_string(),
                code: output.status.code().unwrap_or(-1),
                stderr,
            });
        }

        Ok(CmdOutput { stdout, stderr })
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_joins_tokens_and_redacts_secrets() {
        let cmd = Cmd::new("git")
            .args(["clone", "-b", "main"])
            .arg("https://s3cret@github.com/org/app.git")
            .arg("sourceRepo")
            .secret("s3cret");

        insta::assert_snapshot!(cmd.to_string(), @"git clone -b main https://***@github.com/org/app.git sourceRepo");
    }

    #[test]
    fn redact_handles_multiple_occurrences() {
        let cmd = Cmd::new("echo").secret("tok");
        assert_eq!(cmd.redact("tok and tok again"), "*** and *** again");
    }

    #[test]
    fn empty_secret_is_not_registered() {
        let cmd = Cmd::new("echo").arg("hello").secret("");
        assert_eq!(cmd.to_string(), "echo hello");
    }

    #[test]
    fn system_runner_captures_stdout() {
        let cmd = Cmd::new("/bin/sh").args(["-c", "printf hello"]);
        let output = SystemRunner.run(&cmd).unwrap();
        assert_eq!(output.stdout, "hello");
    }

    #[test]
    fn system_runner_reports_exit_code() {
        let cmd = Cmd::new("/bin/sh").args(["-c", "echo oops >&2; exit 3"]);
        let err = SystemRunner.run(&cmd).unwrap_err();
        match err {
            ProcessError::Failed { code, stderr, .. } => {
                assert_eq!(code, 3);
                assert!(stderr.contains("oops"));
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[test]
    fn system_runner_reports_spawn_failure() {
        let cmd = Cmd::new("definitely-not-a-real-program-7f3a");
        let err = SystemRunner.run(&cmd).unwrap_err();
        assert!(matches!(err, ProcessError::Spawn { .. }));
    }

    #[test]
    fn output_is_redacted_by_system_runner() {
        let cmd = Cmd::new("/bin/sh")
            .args(["-c", "printf 'token is s3cret'"])
            .secret("s3cret");
        let output = SystemRunner.run(&cmd).unwrap();
        assert_eq!(output.stdout, "token is ***");
    }
}
