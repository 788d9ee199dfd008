//! Infrastructure implementation of the `CommandRunner` port.
//!
//! `TokioCommandRunner` is the production implementation that uses tokio
//! for async process execution. Children are killed if the future is dropped
//! (Ctrl-C), but no timeout is applied: a remote command that hangs keeps the
//! caller waiting.

use std::process::{ExitStatus, Output, Stdio};

use anyhow::{Context, Result};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::application::ports::{Capture, CommandRunner};

const CHUNK_SIZE: usize = 4096;

/// Production `CommandRunner`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioCommandRunner;

impl TokioCommandRunner {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[derive(Clone, Copy)]
enum Pipe {
    Stdout,
    Stderr,
}

async fn read_some<R: AsyncRead + Unpin>(pipe: Option<&mut R>, buf: &mut [u8]) -> std::io::Result<usize> {
    match pipe {
        Some(p) => p.read(buf).await,
        None => Ok(0),
    }
}

impl CommandRunner for TokioCommandRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        tokio::process::Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .with_context(|| format!("failed to run {program}"))
    }

    async fn run_streaming(
        &self,
        program: &str,
        args: &[&str],
        capture: Capture,
        on_chunk: &mut dyn FnMut(&[u8]),
    ) -> Result<ExitStatus> {
        let mut command = tokio::process::Command::new(program);
        command.args(args).stderr(Stdio::piped()).kill_on_drop(true);
        match capture {
            Capture::Combined => command.stdin(Stdio::null()).stdout(Stdio::piped()),
            Capture::StderrOnly => command.stdin(Stdio::inherit()).stdout(Stdio::inherit()),
        };
        let mut child = command
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        let mut stdout = child.stdout.take();
        let mut stderr = child.stderr.take();
        let mut out_buf = [0u8; CHUNK_SIZE];
        let mut err_buf = [0u8; CHUNK_SIZE];

        while stdout.is_some() || stderr.is_some() {
            let (pipe, read) = tokio::select! {
                n = read_some(stdout.as_mut(), &mut out_buf), if stdout.is_some() => (Pipe::Stdout, n),
                n = read_some(stderr.as_mut(), &mut err_buf), if stderr.is_some() => (Pipe::Stderr, n),
            };
            let n = read.with_context(|| format!("reading output of {program}"))?;
            match (pipe, n) {
                (Pipe::Stdout, 0) => stdout = None,
                (Pipe::Stderr, 0) => stderr = None,
                (Pipe::Stdout, n) => on_chunk(&out_buf[..n]),
                (Pipe::Stderr, n) => on_chunk(&err_buf[..n]),
            }
        }

        child
            .wait()
            .await
            .with_context(|| format!("waiting for {program}"))
    }
}
