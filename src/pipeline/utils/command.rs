//! External command execution.
//!
//! Every external tool the pipeline touches goes through these helpers.
//! Arguments are passed as structured lists, never interpolated into a
//! shell string, so paths with spaces survive intact.

use crate::pipeline::error::{Error, Result};
use std::ffi::OsStr;
use std::path::Path;
use tokio::process::Command;

/// Runs a command and captures its output.
///
/// Returns stdout text on zero exit status and stderr text otherwise.
/// A non-zero exit is NOT an error: callers that key off command output
/// (notarization status polling, git summaries) inspect the returned text.
/// Only a spawn failure (missing binary, permission denied) errors.
pub async fn run_capture<P, S>(program: P, args: &[S]) -> Result<String>
where
    P: AsRef<OsStr>,
    S: AsRef<OsStr>,
{
    let name = display_name(program.as_ref());
    let mut command = Command::new(program.as_ref());
    command.args(args);
    capture(&mut command, &name).await
}

/// Same as [`run_capture`], executed from the given working directory.
pub async fn run_capture_in<P, S>(dir: &Path, program: P, args: &[S]) -> Result<String>
where
    P: AsRef<OsStr>,
    S: AsRef<OsStr>,
{
    let name = display_name(program.as_ref());
    let mut command = Command::new(program.as_ref());
    command.args(args).current_dir(dir);
    capture(&mut command, &name).await
}

/// Runs a command and fails on non-zero exit.
///
/// Used by call sites where a tool failure must abort the run (jpackage,
/// codesign, signtool). The error message carries the captured stderr.
pub async fn run_checked<P, S>(program: P, args: &[S]) -> Result<String>
where
    P: AsRef<OsStr>,
    S: AsRef<OsStr>,
{
    let name = display_name(program.as_ref());

    let output = Command::new(program.as_ref())
        .args(args)
        .output()
        .await
        .map_err(|e| Error::CommandFailed {
            command: name.clone(),
            error: e,
        })?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    } else {
        Err(Error::GenericError(format!(
            "{} failed (exit code {:?}): {}",
            name,
            output.status.code(),
            String::from_utf8_lossy(&output.stderr).trim()
        )))
    }
}

async fn capture(command: &mut Command, name: &str) -> Result<String> {
    let output = command.output().await.map_err(|e| Error::CommandFailed {
        command: name.to_string(),
        error: e,
    })?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    } else {
        log::debug!("{} exited with code {:?}", name, output.status.code());
        Ok(String::from_utf8_lossy(&output.stderr).into_owned())
    }
}

fn display_name(program: &OsStr) -> String {
    Path::new(program)
        .file_name()
        .unwrap_or(program)
        .to_string_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn capture_returns_stdout_on_success() {
        let out = run_capture("echo", &["hello"]).await.unwrap();
        assert_eq!(out.trim(), "hello");
    }

    #[tokio::test]
    async fn capture_returns_stderr_on_failure() {
        // ls on a missing path exits non-zero and complains on stderr
        let out = run_capture("ls", &["/definitely/not/a/path"]).await.unwrap();
        assert!(out.contains("No such file") || out.contains("cannot access"));
    }

    #[tokio::test]
    async fn capture_errors_on_missing_binary() {
        let err = run_capture("no-such-binary-xyz", &[""; 0]).await.unwrap_err();
        assert!(matches!(err, Error::CommandFailed { .. }));
    }

    #[tokio::test]
    async fn checked_errors_on_nonzero_exit() {
        let err = run_checked("ls", &["/definitely/not/a/path"])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::GenericError(_)));
    }
}
