// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Resource-limited child process execution
//!
//! The child runs in its own process group with an address-space ceiling
//! applied between fork and exec. The host waits against a wall-clock
//! deadline and, on expiry, kills the whole group and reaps the child.
//!
//! Isolation stops there: the child keeps the host's default filesystem and
//! network view.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::types::{ProcessOutput, SandboxError};

/// How long output readers and reaping may take once the child is gone
const REAP_GRACE: Duration = Duration::from_millis(500);

const DEFAULT_PATH: &str = "/usr/local/bin:/usr/bin:/bin";

/// Limits applied to one child process
#[derive(Debug, Clone, Copy)]
pub struct ProcessLimits {
    pub wall_time: Duration,
    pub memory_bytes: u64,
    /// Bytes of each output stream retained while draining
    pub capture_bytes: usize,
}

/// A program invocation to run under [`ProcessLimits`]
#[derive(Debug, Clone)]
pub struct SandboxCommand {
    pub program: String,
    pub args: Vec<OsString>,
    pub workdir: Option<PathBuf>,
    pub stdin: Option<Vec<u8>>,
}

impl SandboxCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            workdir: None,
            stdin: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn workdir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.workdir = Some(dir.into());
        self
    }

    pub fn stdin(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.stdin = Some(data.into());
        self
    }
}

/// Run `command` to completion or until the wall-clock deadline
pub async fn run_limited(
    command: SandboxCommand,
    limits: ProcessLimits,
) -> Result<ProcessOutput, SandboxError> {
    let mut cmd = Command::new(&command.program);
    cmd.args(&command.args)
        .stdin(if command.stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .env_clear()
        .env(
            "PATH",
            std::env::var_os("PATH").unwrap_or_else(|| DEFAULT_PATH.into()),
        )
        .env("LANG", "C.UTF-8")
        .kill_on_drop(true);

    if let Some(dir) = &command.workdir {
        cmd.current_dir(dir);
    }

    #[cfg(unix)]
    {
        cmd.process_group(0);
        let memory_bytes = limits.memory_bytes;
        // SAFETY: the closure only calls async-signal-safe libc functions
        unsafe {
            cmd.pre_exec(move || {
                apply_child_limits(memory_bytes);
                Ok(())
            });
        }
    }

    let mut child = cmd.spawn().map_err(|source| SandboxError::Spawn {
        program: command.program.clone(),
        source,
    })?;
    let pid = child.id();
    debug!("Spawned sandbox child {:?}: {}", pid, command.program);

    if let (Some(mut stdin), Some(data)) = (child.stdin.take(), command.stdin) {
        tokio::spawn(async move {
            let _ = stdin.write_all(&data).await;
            let _ = stdin.shutdown().await;
        });
    }

    let stdout_buf = Arc::new(Mutex::new(Vec::new()));
    let stderr_buf = Arc::new(Mutex::new(Vec::new()));
    let readers: Vec<JoinHandle<()>> = [
        child
            .stdout
            .take()
            .map(|out| tokio::spawn(drain(out, stdout_buf.clone(), limits.capture_bytes))),
        child
            .stderr
            .take()
            .map(|err| tokio::spawn(drain(err, stderr_buf.clone(), limits.capture_bytes))),
    ]
    .into_iter()
    .flatten()
    .collect();

    let (status, timed_out) = match tokio::time::timeout(limits.wall_time, child.wait()).await {
        Ok(Ok(status)) => (Some(status), false),
        Ok(Err(e)) => {
            terminate(&mut child, pid).await;
            return Err(SandboxError::Wait(e));
        }
        Err(_) => {
            warn!(
                "Sandbox child {:?} exceeded {}ms, killing",
                pid,
                limits.wall_time.as_millis()
            );
            terminate(&mut child, pid).await;
            (None, true)
        }
    };

    let mut group_signalled = timed_out;
    for mut reader in readers {
        if tokio::time::timeout(REAP_GRACE, &mut reader).await.is_ok() {
            continue;
        }
        if !group_signalled {
            // Descendants outlived the child and still hold the pipe. The
            // group id cannot be reused while they remain in it.
            debug!("Sandbox child {:?} left descendants, killing its group", pid);
            kill_group(pid);
            group_signalled = true;
            if tokio::time::timeout(REAP_GRACE, &mut reader).await.is_ok() {
                continue;
            }
        }
        reader.abort();
    }

    Ok(ProcessOutput {
        success: status.map(|s| s.success()).unwrap_or(false),
        exit_code: status.and_then(|s| s.code()),
        stdout: take_lossy(&stdout_buf),
        stderr: take_lossy(&stderr_buf),
        timed_out,
    })
}

/// Runs in the forked child before exec
#[cfg(unix)]
fn apply_child_limits(memory_bytes: u64) {
    let limit = libc::rlimit {
        rlim_cur: memory_bytes as libc::rlim_t,
        rlim_max: memory_bytes as libc::rlim_t,
    };
    let no_core = libc::rlimit {
        rlim_cur: 0,
        rlim_max: 0,
    };
    // Return codes ignored: a limit that cannot be set must not abort the run
    unsafe {
        libc::setrlimit(libc::RLIMIT_AS, &limit);
        libc::setrlimit(libc::RLIMIT_DATA, &limit);
        libc::setrlimit(libc::RLIMIT_CORE, &no_core);
    }
}

fn kill_group(pid: Option<u32>) {
    #[cfg(unix)]
    {
        if let Some(pid) = pid {
            // Spawned with process_group(0), so pgid == pid
            unsafe {
                libc::kill(-(pid as libc::pid_t), libc::SIGKILL);
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = pid;
    }
}

async fn terminate(child: &mut Child, pid: Option<u32>) {
    kill_group(pid);
    let _ = child.start_kill();
    if tokio::time::timeout(REAP_GRACE, child.wait()).await.is_err() {
        warn!("Sandbox child {:?} was not reaped within grace period", pid);
    }
}

async fn drain<R>(mut reader: R, sink: Arc<Mutex<Vec<u8>>>, cap: usize)
where
    R: AsyncRead + Unpin,
{
    let mut chunk = [0u8; 4096];
    loop {
        match reader.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                if let Ok(mut buf) = sink.lock() {
                    let room = cap.saturating_sub(buf.len());
                    buf.extend_from_slice(&chunk[..n.min(room)]);
                }
            }
        }
    }
}

fn take_lossy(buf: &Arc<Mutex<Vec<u8>>>) -> String {
    buf.lock()
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default()
}
