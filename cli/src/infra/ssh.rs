//! Infrastructure implementation of the `RemoteShell` port over the system
//! `ssh` client.
//!
//! Development images accept passwordless root logins and regenerate their
//! host keys on reflash, so host keys are neither checked nor remembered.

use anyhow::Result;

use crate::application::ports::{Capture, CommandRunner, RemoteShell};
use crate::domain::config::SshConfig;
use crate::domain::error::ProvisionError;
use crate::domain::payload::redacted;

/// Bytes of streamed output kept for the error message of a failed command.
const OUTPUT_TAIL: usize = 4096;

/// `RemoteShell` that shells out to `ssh` through a [`CommandRunner`].
pub struct SshShell<R> {
    runner: R,
    config: SshConfig,
}

impl<R: CommandRunner> SshShell<R> {
    #[must_use]
    pub fn new(runner: R, config: SshConfig) -> Self {
        Self { runner, config }
    }

    /// Arguments passed to the ssh client for `command` on `address`.
    #[must_use]
    pub fn args(&self, address: &str, command: &str) -> Vec<String> {
        vec![
            "-p".to_string(),
            self.config.port.to_string(),
            "-o".to_string(),
            "StrictHostKeyChecking=no".to_string(),
            "-o".to_string(),
            "UserKnownHostsFile=/dev/null".to_string(),
            "-o".to_string(),
            "LogLevel=ERROR".to_string(),
            "-o".to_string(),
            "BatchMode=yes".to_string(),
            "-o".to_string(),
            "ConnectTimeout=10".to_string(),
            format!("{}@{address}", self.config.user),
            command.to_string(),
        ]
    }

    fn failure(address: &str, command: &str, code: Option<i32>, stderr: &[u8]) -> ProvisionError {
        ProvisionError::RemoteCommandFailed {
            address: address.to_string(),
            command: redacted(command).to_string(),
            code,
            stderr: String::from_utf8_lossy(stderr).into_owned(),
        }
    }
}

impl<R: CommandRunner> RemoteShell for SshShell<R> {
    async fn exec_buffered(&self, address: &str, command: &str) -> Result<String> {
        let args = self.args(address, command);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        tracing::debug!(address, command, "ssh");
        let output = self.runner.run(&self.config.program, &args).await?;
        if !output.status.success() {
            return Err(Self::failure(address, command, output.status.code(), &output.stderr).into());
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn exec(
        &self,
        address: &str,
        command: &str,
        sink: &mut dyn FnMut(&[u8]),
    ) -> Result<()> {
        let args = self.args(address, command);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        tracing::debug!(address, bytes = command.len(), "ssh (streaming)");

        let mut tail: Vec<u8> = Vec::new();
        let status = self
            .runner
            .run_streaming(&self.config.program, &args, Capture::Combined, &mut |chunk| {
                tail.extend_from_slice(chunk);
                if tail.len() > OUTPUT_TAIL {
                    tail.drain(..tail.len() - OUTPUT_TAIL);
                }
                sink(chunk);
            })
            .await?;
        if !status.success() {
            return Err(Self::failure(address, command, status.code(), &tail).into());
        }
        Ok(())
    }
}
