//! Running shell commands through `sh -c`.

use std::process::{ExitStatus, Stdio};

use futures::StreamExt;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::{streams::merge_streams, ShellError};

fn shell(cmd: &str) -> Command {
    #[cfg(feature = "tracing")]
    tracing::info!(cmd, "running command");

    let mut command = Command::new("sh");
    command.arg("-c").arg(cmd).stdin(Stdio::inherit());
    command
}

fn spawn_error(cmd: &str, source: std::io::Error) -> ShellError {
    ShellError::Spawn {
        cmd: cmd.to_owned(),
        source,
    }
}

fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}

/// Runs `cmd` with inherited stdio; a non-zero exit is an error.
pub async fn run_cmd(cmd: &str) -> Result<(), ShellError> {
    let status = shell(cmd)
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .await
        .map_err(|err| spawn_error(cmd, err))?;

    if status.success() {
        return Ok(());
    }
    Err(ShellError::Failed {
        cmd: cmd.to_owned(),
        status: exit_code(status),
        stdout: String::new(),
        stderr: String::new(),
        output: String::new(),
    })
}

/// Runs `cmd` and returns its trimmed stdout.
///
/// On failure the error carries the trimmed stdout and stderr.
pub async fn capture_cmd(cmd: &str) -> Result<String, ShellError> {
    let output = shell(cmd)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|err| spawn_error(cmd, err))?;

    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_owned();
    if output.status.success() {
        return Ok(stdout);
    }
    Err(ShellError::Failed {
        cmd: cmd.to_owned(),
        status: exit_code(output.status),
        stdout,
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
        output: String::new(),
    })
}

/// Runs `cmd`, echoing its stdout and stderr lines to our stdout as they
/// arrive, and returns the combined output trimmed.
pub async fn run_and_capture_cmd(cmd: &str) -> Result<String, ShellError> {
    let mut child = shell(cmd)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|err| spawn_error(cmd, err))?;

    let (Some(child_stdout), Some(child_stderr)) = (child.stdout.take(), child.stderr.take())
    else {
        return Err(spawn_error(
            cmd,
            std::io::Error::other("child pipes were not captured"),
        ));
    };

    let mut echo = tokio::io::stdout();
    let mut output = String::new();
    let mut lines = merge_streams(child_stdout, child_stderr);
    while let Some(line) = lines.next().await {
        // Undecodable output is skipped rather than aborting the command.
        let Ok(line) = line else { continue };
        let _ = echo.write_all(format!("{line}\n").as_bytes()).await;
        output.push_str(&line);
        output.push('\n');
    }
    let _ = echo.flush().await;

    let status = child.wait().await.map_err(|err| spawn_error(cmd, err))?;
    if status.success() {
        return Ok(output.trim().to_owned());
    }
    Err(ShellError::Failed {
        cmd: cmd.to_owned(),
        status: exit_code(status),
        stdout: String::new(),
        stderr: String::new(),
        output,
    })
}
